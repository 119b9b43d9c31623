//! Key matrix monitor
//!
//! Polls the matrix report on a tokio task and forwards every new key press
//! through a bounded channel. The task blocks in exactly two places:
//!
//! - handing an event to the consumer (bounded `send`)
//! - waiting out the poll interval when nothing new was read
//!
//! Both race the cancellation signal, so the task ends promptly once
//! cancelled and the receiver then sees the channel close. Dropping the
//! receiver stops the task the same way, even while no key is pressed.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::KeyboardError;
use crate::settings::MatrixPos;
use crate::Controller;

/// Create a linked cancellation handle and signal
pub fn cancel_pair() -> (CancelHandle, CancelSignal) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle(tx), CancelSignal(rx))
}

/// Owner side: triggers cancellation
///
/// Dropping the handle cancels as well.
#[derive(Debug)]
pub struct CancelHandle(watch::Sender<bool>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.send_replace(true);
    }
}

/// Observer side, cloned into every task that must stop on cancel
#[derive(Debug, Clone)]
pub struct CancelSignal(watch::Receiver<bool>);

impl CancelSignal {
    pub fn is_cancelled(&self) -> bool {
        *self.0.borrow() || self.0.has_changed().is_err()
    }

    /// Resolves once cancelled (or the handle is gone)
    pub async fn cancelled(&mut self) {
        let _ = self.0.wait_for(|&c| c).await;
    }
}

/// Polling parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorConfig {
    /// Pause between reads when nothing new was seen
    pub interval: Duration,
    /// Events buffered before the task waits on the consumer
    pub capacity: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(10),
            capacity: 16,
        }
    }
}

/// Matrix polling task
pub struct MatrixMonitor;

impl MatrixMonitor {
    /// Start polling; events arrive on the returned receiver
    ///
    /// Only reads that differ from the previous raw read are considered, and
    /// the idle (0, 0) reading is never delivered. A transport error is
    /// delivered once and ends the task.
    pub fn spawn(
        controller: Controller,
        signal: CancelSignal,
        config: MonitorConfig,
    ) -> mpsc::Receiver<Result<MatrixPos, KeyboardError>> {
        Self::spawn_with_handle(controller, signal, config).0
    }

    /// Same as `spawn`, also returning the task handle
    pub fn spawn_with_handle(
        controller: Controller,
        signal: CancelSignal,
        config: MonitorConfig,
    ) -> (
        mpsc::Receiver<Result<MatrixPos, KeyboardError>>,
        JoinHandle<()>,
    ) {
        let (tx, rx) = mpsc::channel(config.capacity.max(1));
        let handle = tokio::spawn(monitor_loop(controller, signal, config.interval, tx));
        (rx, handle)
    }
}

async fn monitor_loop(
    controller: Controller,
    mut signal: CancelSignal,
    interval: Duration,
    tx: mpsc::Sender<Result<MatrixPos, KeyboardError>>,
) {
    let mut prev = MatrixPos::default();

    loop {
        if signal.is_cancelled() || tx.is_closed() {
            break;
        }

        // Matrix reads are single short control transfers
        let pos = match controller.get_matrix() {
            Ok(pos) => pos,
            Err(e) => {
                debug!("Matrix monitor stopping on error: {}", e);
                tokio::select! {
                    _ = tx.send(Err(e)) => {}
                    _ = signal.cancelled() => {}
                }
                break;
            }
        };

        if pos != prev {
            prev = pos;
            if pos.is_pressed() {
                debug!("Matrix: {}", pos);
                tokio::select! {
                    biased;
                    _ = signal.cancelled() => break,
                    sent = tx.send(Ok(pos)) => {
                        if sent.is_err() {
                            // Receiver dropped
                            break;
                        }
                        continue;
                    }
                }
            }
        }

        tokio::select! {
            biased;
            _ = signal.cancelled() => break,
            _ = tx.closed() => break,
            _ = tokio::time::sleep(interval) => {}
        }
    }

    debug!("Matrix monitor stopped");
}
