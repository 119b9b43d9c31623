//! Matrix monitor command.

use std::time::Duration;

use super::CommandResult;
use blusb::MonitorSettings;
use blusb_keyboard::{cancel_pair, Controller, KeyboardError, MatrixMonitor, MatrixPos};
use tokio::sync::mpsc;
use tracing::debug;

/// Why a monitoring session ended
#[derive(Debug, PartialEq, Eq)]
enum Stop {
    /// Same key reported twice in a row
    Repeat,
    /// Monitor task ended
    Closed,
}

/// Print key positions until one is reported twice in a row, the timeout
/// elapses or Ctrl-C is pressed
pub async fn monitor_matrix(
    controller: &Controller,
    settings: &MonitorSettings,
    timeout: Option<u64>,
) -> CommandResult {
    let timeout = timeout.map(Duration::from_secs).unwrap_or(settings.timeout());

    // Starting right after Enter would report the Enter key itself
    tokio::time::sleep(settings.settle()).await;

    println!(
        "Monitoring matrix for up to {timeout:?}.  Press the same key twice in a row to exit sooner.\n"
    );

    let (handle, signal) = cancel_pair();
    let mut rx = MatrixMonitor::spawn(controller.clone(), signal, settings.monitor_config());

    let result = tokio::select! {
        r = print_until_repeat(&mut rx, |pos| println!("{pos}")) => Some(r),
        _ = tokio::time::sleep(timeout) => None,
        _ = tokio::signal::ctrl_c() => None,
    };
    handle.cancel();

    match result {
        Some(Err(e)) => Err(format!("Monitor matrix error: {e}").into()),
        Some(Ok(stop)) => {
            debug!("Monitor stopped: {:?}", stop);
            Ok(())
        }
        None => Ok(()),
    }
}

/// Feed positions to `on_pos` until the same one arrives twice in a row
async fn print_until_repeat(
    rx: &mut mpsc::Receiver<Result<MatrixPos, KeyboardError>>,
    mut on_pos: impl FnMut(MatrixPos),
) -> Result<Stop, KeyboardError> {
    let mut prev = MatrixPos::default();
    while let Some(event) = rx.recv().await {
        let pos = event?;
        on_pos(pos);
        if pos == prev {
            return Ok(Stop::Repeat);
        }
        prev = pos;
    }
    Ok(Stop::Closed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use blusb_transport::TransportError;

    #[tokio::test]
    async fn test_stops_on_repeat() {
        let (tx, mut rx) = mpsc::channel(8);
        for pos in [(1, 2), (3, 4), (3, 4), (5, 6)] {
            tx.send(Ok(MatrixPos::new(pos.0, pos.1))).await.unwrap();
        }

        let mut printed = Vec::new();
        let stop = print_until_repeat(&mut rx, |p| printed.push(p)).await.unwrap();

        assert_eq!(stop, Stop::Repeat);
        assert_eq!(
            printed,
            vec![
                MatrixPos::new(1, 2),
                MatrixPos::new(3, 4),
                MatrixPos::new(3, 4)
            ]
        );
    }

    #[tokio::test]
    async fn test_closed_channel_ends_quietly() {
        let (tx, mut rx) = mpsc::channel(8);
        tx.send(Ok(MatrixPos::new(1, 1))).await.unwrap();
        drop(tx);

        let stop = print_until_repeat(&mut rx, |_| {}).await.unwrap();
        assert_eq!(stop, Stop::Closed);
    }

    #[tokio::test]
    async fn test_error_is_returned() {
        let (tx, mut rx) = mpsc::channel(8);
        tx.send(Err(KeyboardError::Transport(TransportError::Disconnected)))
            .await
            .unwrap();

        assert!(print_until_repeat(&mut rx, |_| {}).await.is_err());
    }
}
