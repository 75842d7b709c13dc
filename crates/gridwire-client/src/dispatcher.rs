//! Response correlation
//!
//! The dispatcher owns the read half of the connection through a single
//! background task — the only consumer of the inbound stream. Call sites
//! register a one-shot channel under their request id before sending;
//! the reader matches each inbound response by id and wakes exactly that
//! waiter. No ordering is assumed: responses to concurrent requests may
//! arrive in any interleaving.
//!
//! Teardown discipline: when the reader task ends (server close,
//! transport failure, or local shutdown) it drains the pending table.
//! Dropping a registered sender closes its channel, so every
//! outstanding waiter observes a connection-closed failure rather than
//! hanging.

use std::sync::Arc;

use dashmap::DashMap;
use futures::StreamExt;
use tokio::sync::{broadcast, oneshot};
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, warn};

use gridwire_protocol::jsonrpc::JsonRpcResponse;

use crate::transport::WsReader;

type PendingTable = Arc<DashMap<String, oneshot::Sender<JsonRpcResponse>>>;

/// Pending-request table plus the reader task that resolves it.
pub(crate) struct MessageDispatcher {
    pending: PendingTable,
    shutdown_tx: broadcast::Sender<()>,
}

impl std::fmt::Debug for MessageDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageDispatcher")
            .field("pending", &self.pending.len())
            .finish()
    }
}

impl MessageDispatcher {
    /// Spawn the reader task over the connection's read half.
    pub(crate) fn spawn(reader: WsReader) -> Arc<Self> {
        let pending: PendingTable = Arc::new(DashMap::new());
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

        tokio::spawn(read_loop(reader, Arc::clone(&pending), shutdown_rx));

        Arc::new(Self {
            pending,
            shutdown_tx,
        })
    }

    /// Register interest in the response for `id`.
    ///
    /// Must be called before the request is written, so the response
    /// cannot race past an empty table. At most one entry per id; ids
    /// are never reused within a connection.
    pub(crate) fn register(&self, id: String) -> oneshot::Receiver<JsonRpcResponse> {
        let (tx, rx) = oneshot::channel();
        self.pending.insert(id, tx);
        rx
    }

    /// Drop the pending entry for `id`, if still present.
    ///
    /// Used when a send fails or a deadline fires; a response arriving
    /// later is then reported as unmatched instead of waking a waiter
    /// that gave up.
    pub(crate) fn discard(&self, id: &str) {
        self.pending.remove(id);
    }

    /// Stop the reader task and reject everything outstanding.
    pub(crate) fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
        self.pending.clear();
    }
}

impl Drop for MessageDispatcher {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Sole consumer of the inbound stream.
async fn read_loop(
    mut reader: WsReader,
    pending: PendingTable,
    mut shutdown_rx: broadcast::Receiver<()>,
) {
    loop {
        tokio::select! {
            _ = shutdown_rx.recv() => {
                debug!("reader shutting down");
                break;
            }
            frame = reader.next() => match frame {
                Some(Ok(Message::Text(text))) => deliver(text.as_str(), &pending),
                Some(Ok(Message::Close(_))) | None => {
                    debug!("server closed the connection");
                    break;
                }
                // Control frames carry no envelope.
                Some(Ok(_)) => continue,
                Some(Err(err)) => {
                    warn!(%err, "transport failure on read");
                    break;
                }
            }
        }
    }

    // Dropping the senders wakes every outstanding waiter with a closed
    // channel, which the call sites surface as ConnectionClosed.
    pending.clear();
}

/// Match one inbound frame to its waiter by id.
fn deliver(text: &str, pending: &DashMap<String, oneshot::Sender<JsonRpcResponse>>) {
    let response: JsonRpcResponse = match serde_json::from_str(text) {
        Ok(response) => response,
        Err(err) => {
            warn!(%err, "discarding unparseable inbound frame");
            return;
        }
    };

    let Some(id) = response.id.as_request_id() else {
        // Null-id responses are protocol-level failures not tied to any
        // request (e.g. the server could not parse something we sent).
        match response.rpc_error() {
            Some(error) => warn!(code = error.code, message = %error.message,
                "protocol-level error from server"),
            None => warn!("response with null id and no error"),
        }
        return;
    };

    let key = id.as_key();
    match pending.remove(&key) {
        // The waiter may have timed out and dropped its receiver; a
        // failed send here is not an error.
        Some((_, tx)) => {
            let _ = tx.send(response);
        }
        None => warn!(id = %key, "response matches no pending request"),
    }
}
