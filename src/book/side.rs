// ============================================================================
// Book Side
// Price-time priority structure for one side of a ticker's book
// ============================================================================

use crate::domain::error::{BookResult, OrderBookError};
use crate::domain::{Order, OrderDirection, TradeExecution};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A resting order keyed for the side's max-heap.
///
/// `priority` is the raw limit price, negated for asks so that the heap's
/// maximum is always the best order (lowest sell / highest buy). Ties at the
/// same price are broken by insertion sequence: earlier orders win
/// (price-time priority).
#[derive(Debug)]
struct RestingOrder {
    priority: i64,
    sequence: u64,
    order: Order,
}

impl PartialEq for RestingOrder {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.sequence == other.sequence
    }
}

impl Eq for RestingOrder {}

impl PartialOrd for RestingOrder {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RestingOrder {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .cmp(&other.priority)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// One side of a ticker's order book.
///
/// Not internally synchronized: callers must serialize access per ticker.
/// Removal of the best order and volume decrement of the best order are the
/// only two mutation primitives used by matching.
#[derive(Debug)]
pub struct BookSide {
    direction: OrderDirection,
    orders: BinaryHeap<RestingOrder>,
    next_sequence: u64,
    capacity: usize,
    resting_volume: i64,
}

impl BookSide {
    pub fn new(direction: OrderDirection, capacity: usize) -> Self {
        Self {
            direction,
            orders: BinaryHeap::new(),
            next_sequence: 0,
            capacity,
            resting_volume: 0,
        }
    }

    pub fn direction(&self) -> OrderDirection {
        self.direction
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Total volume currently resting on this side.
    pub fn resting_volume(&self) -> i64 {
        self.resting_volume
    }

    /// Whether the side can take one more resting order.
    pub fn can_accept(&self) -> bool {
        self.orders.len() < self.capacity
    }

    /// Insert a resting order. The order must carry a limit price; the
    /// insertion sequence number fixes its FIFO rank at that price level.
    pub fn insert(&mut self, order: Order) -> BookResult<()> {
        let price = order.price().ok_or(OrderBookError::MissingPrice)?;
        let priority = match self.direction {
            OrderDirection::Ask => -price.raw_value(),
            OrderDirection::Bid => price.raw_value(),
        };
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.resting_volume += order.volume();
        self.orders.push(RestingOrder {
            priority,
            sequence,
            order,
        });
        Ok(())
    }

    /// Best resting order: lowest-price ask, or highest-price bid.
    pub fn peek_best(&self) -> Option<&Order> {
        self.orders.peek().map(|resting| &resting.order)
    }

    /// Remove and return the best resting order, releasing its volume from
    /// the side's accounting.
    pub fn pop_best(&mut self) -> Option<Order> {
        let resting = self.orders.pop()?;
        self.resting_volume -= resting.order.volume();
        Some(resting.order)
    }

    /// Partially fill the best resting order in place without removing it.
    ///
    /// The volume decrement does not touch the heap key (price, sequence),
    /// so the order keeps its position.
    pub fn reduce_best(&mut self, amount: i64) -> BookResult<TradeExecution> {
        let mut best = self
            .orders
            .peek_mut()
            .ok_or_else(|| OrderBookError::VolumeNotAvailable {
                requested: amount,
                available: 0,
            })?;
        let execution = best.order.bought_partially(amount)?;
        self.resting_volume -= amount;
        Ok(execution)
    }

    /// Resting orders in natural (best-first) order.
    pub fn sorted_orders(&self) -> Vec<&Order> {
        let mut resting: Vec<&RestingOrder> = self.orders.iter().collect();
        resting.sort_by(|a, b| b.cmp(a));
        resting.into_iter().map(|entry| &entry.order).collect()
    }
}
