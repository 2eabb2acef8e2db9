// Connection module
// Serves a single accepted TCP connection over HTTP/1

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::AppState;
use crate::handler;
use crate::logger;

/// Serve `stream` on a local task.
///
/// Must be called from within a `LocalSet`. There is no connection timeout
/// and no limit; errors are logged and the connection dropped.
pub fn accept_connection(stream: tokio::net::TcpStream, peer_addr: SocketAddr, state: &Arc<AppState>) {
    let state = Arc::clone(state);

    tokio::task::spawn_local(async move {
        let io = TokioIo::new(stream);

        let mut builder = http1::Builder::new();
        builder.keep_alive(state.config.server.keep_alive);

        let conn = builder.serve_connection(
            io,
            service_fn(move |req| handler::handle_request(req, Arc::clone(&state), peer_addr)),
        );

        if let Err(err) = conn.await {
            logger::log_connection_error(&peer_addr, &err);
        }
    });
}
