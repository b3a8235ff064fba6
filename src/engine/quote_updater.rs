// ============================================================================
// Quote Updater
// Asynchronous, ordered application of quote updates after matching
// ============================================================================

use crate::domain::{ExecutionBatch, RegisterOrderCommand};
use crate::quotation::QuotationAggregator;
use crossbeam::channel::{unbounded, Sender};
use parking_lot::RwLock;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::warn;

/// A finished registration queued for quote recomputation.
#[derive(Debug)]
pub struct QuoteUpdate {
    pub command: RegisterOrderCommand,
    pub executions: ExecutionBatch,
}

/// Owns the consumer thread that folds finished registrations into the
/// quotation aggregator.
///
/// A single consumer over a FIFO channel: updates are applied strictly in
/// submission order, so same-ticker quotes move in the order their trades
/// matched. The caller of `submit` never waits for the aggregator write.
pub struct QuoteUpdater {
    tx: Option<Sender<QuoteUpdate>>,
    handle: Option<JoinHandle<()>>,
}

impl QuoteUpdater {
    pub fn spawn(aggregator: Arc<RwLock<QuotationAggregator>>) -> Self {
        let (tx, rx) = unbounded::<QuoteUpdate>();
        let handle = thread::spawn(move || {
            for update in rx.iter() {
                let mut aggregator = aggregator.write();
                if let Err(error) = aggregator.handle(&update.command, &update.executions) {
                    warn!(ticker = %update.command.ticker, %error, "quote update dropped");
                }
            }
        });
        Self {
            tx: Some(tx),
            handle: Some(handle),
        }
    }

    /// Queue one update. A send after shutdown is silently discarded.
    pub fn submit(&self, update: QuoteUpdate) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(update);
        }
    }

    /// Close the channel and wait for every queued update to apply.
    pub fn shutdown(&mut self) {
        self.tx.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for QuoteUpdater {
    fn drop(&mut self) {
        self.shutdown();
    }
}
