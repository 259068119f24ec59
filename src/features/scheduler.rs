use super::ledger::Ledger;
use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use std::io;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterestConfig {
    pub rate_percent: Decimal,
    pub period: Duration,
}

impl Default for InterestConfig {
    fn default() -> Self {
        Self {
            rate_percent: dec!(5),
            period: Duration::from_secs(10),
        }
    }
}

/// One tick: credit interest on every account in the ledger.
/// Returns how many accounts were credited. An account that cannot take the
/// credit is skipped and the tick moves on.
pub fn apply_interest_to_all(ledger: &Ledger, rate_percent: Decimal) -> usize {
    ledger
        .accounts()
        .filter(|account| match account.apply_interest(rate_percent) {
            Ok(credited) => credited.is_some(),
            Err(e) => {
                warn!("Skipping interest for customer {}: {e}", account.id());
                false
            }
        })
        .count()
}

/// Background thread applying interest on a fixed period.
///
/// The first tick runs as soon as the thread starts. Between ticks the thread
/// waits on a stop channel, so `stop` (or dropping the handle) ends it
/// without waiting out the rest of the period.
#[derive(Debug)]
pub struct InterestScheduler {
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<usize>>,
}

impl InterestScheduler {
    pub fn spawn(config: InterestConfig, ledger: Arc<Ledger>) -> io::Result<Self> {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let handle = thread::Builder::new()
            .name("interest-scheduler".into())
            .spawn(move || {
                let mut ticks = 0;
                loop {
                    let credited = apply_interest_to_all(&ledger, config.rate_percent);
                    ticks += 1;
                    debug!(
                        "Interest tick {ticks}: {}% credited to {credited} of {} accounts",
                        config.rate_percent,
                        ledger.len()
                    );

                    match stop_rx.recv_timeout(config.period) {
                        Err(RecvTimeoutError::Timeout) => continue,
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                ticks
            })?;

        info!(
            "Interest scheduler started: {}% every {:?}",
            config.rate_percent, config.period
        );

        Ok(Self {
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        })
    }

    /// Stop the scheduler and wait for it to finish. Returns the number of
    /// ticks it ran.
    pub fn stop(mut self) -> usize {
        self.shutdown()
    }

    fn shutdown(&mut self) -> usize {
        if let Some(stop_tx) = self.stop_tx.take() {
            // The thread may already be gone; nothing to signal then
            let _ = stop_tx.send(());
        }

        let ticks = match self.handle.take().map(JoinHandle::join) {
            Some(Ok(ticks)) => ticks,
            Some(Err(_)) => {
                error!("Interest scheduler panicked");
                0
            }
            None => return 0,
        };
        info!("Interest scheduler stopped after {ticks} ticks");
        ticks
    }
}

impl Drop for InterestScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}
