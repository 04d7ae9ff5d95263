//! Ctrl-C handling.

use tokio::signal::ctrl_c;
use tokio_util::sync::CancellationToken;

use crate::TRACING_TARGET_SIGNAL;

/// Returns a token that is cancelled on the first Ctrl-C.
///
/// The watcher task ends as soon as the token is cancelled from either side.
/// Installing the handler disables the default SIGINT action, so callers keep
/// the token alive until their work is done and only then cancel it.
pub fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let watched = token.clone();

    tokio::spawn(async move {
        tokio::select! {
            result = ctrl_c() => match result {
                Ok(()) => {
                    tracing::info!(
                        target: TRACING_TARGET_SIGNAL,
                        "Received Ctrl+C signal, cancelling"
                    );
                    watched.cancel();
                }
                Err(err) => {
                    tracing::error!(
                        target: TRACING_TARGET_SIGNAL,
                        error = %err,
                        "Failed to install Ctrl+C handler"
                    );
                }
            },
            () = watched.cancelled() => {}
        }
    });

    token
}
