// Server loop module
// Accepts connections until the shutdown future resolves

use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

/// Accept loop.
///
/// Each connection is handed to a local task, so the loop must run inside a
/// `LocalSet`. When `shutdown` yields a signal name the loop returns and
/// in-flight connections are abandoned.
pub async fn start_server_loop<S>(listener: TcpListener, state: Arc<AppState>, shutdown: S)
where
    S: Future<Output = &'static str>,
{
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => accept_connection(stream, peer_addr, &state),
                    Err(e) => logger::log_accept_error(&e),
                }
            }

            signal = &mut shutdown => {
                logger::log_shutdown(signal);
                return;
            }
        }
    }
}
