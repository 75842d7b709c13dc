//! Websocket transport
//!
//! Thin wrapper over `tokio-tungstenite`: connect, split, and type
//! aliases for the two halves. The write half lives behind a mutex in
//! the [`Client`](crate::Client); the read half is owned exclusively by
//! the dispatcher's reader task.

use futures::stream::{SplitSink, SplitStream};
use futures::StreamExt;
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

use crate::error::{ClientError, ClientResult};

pub(crate) type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
/// Write half of the connection.
pub(crate) type WsWriter = SplitSink<WsStream, Message>;
/// Read half of the connection.
pub(crate) type WsReader = SplitStream<WsStream>;

/// Open a websocket connection and split it into its halves.
pub(crate) async fn connect(url: &str) -> ClientResult<(WsWriter, WsReader)> {
    let (stream, _response) = connect_async(url)
        .await
        .map_err(|err| ClientError::Connect(err.to_string()))?;
    Ok(stream.split())
}
