//! Connection handling
//!
//! Manages one client connection: parses requests, dispatches them with
//! the connection's own session, and writes the replies back.

use crate::dispatch::Dispatcher;
use crate::protocol::{RespEncoder, RespParser, RespValue};
use crate::transaction::Session;
use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

/// Connection handler
pub struct Connection<S> {
    stream: S,
    read_buffer: BytesMut,
    write_buffer: BytesMut,
    session: Session,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S) -> Self {
        Connection {
            stream,
            read_buffer: BytesMut::with_capacity(4096),
            write_buffer: BytesMut::with_capacity(4096),
            session: Session::new(),
        }
    }

    /// Serve requests until the client disconnects or sends QUIT
    ///
    /// All complete requests already buffered are answered before the next
    /// read, and their replies go out in a single write. A malformed
    /// request gets an error reply and closes the connection.
    pub async fn handle(&mut self, dispatcher: &Dispatcher) -> anyhow::Result<()> {
        loop {
            self.write_buffer.clear();
            let mut closing = false;

            loop {
                match RespParser::parse_command(&mut self.read_buffer) {
                    Ok(Some(request)) if request.is_empty() => continue,
                    Ok(Some(request)) => {
                        let reply = dispatcher.dispatch(&mut self.session, request);
                        debug!(reply = %reply, "reply");
                        RespEncoder::encode_to(&mut self.write_buffer, &reply);
                        if self.session.is_closing() {
                            closing = true;
                            break;
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        warn!("Protocol error: {}", e);
                        RespEncoder::encode_to(&mut self.write_buffer, &RespValue::error(e.to_string()));
                        closing = true;
                        break;
                    }
                }
            }

            if !self.write_buffer.is_empty() {
                self.stream.write_all(&self.write_buffer).await?;
                self.stream.flush().await?;
            }
            if closing {
                return Ok(());
            }

            let n = self.stream.read_buf(&mut self.read_buffer).await?;
            if n == 0 {
                if !self.read_buffer.is_empty() {
                    debug!(pending = self.read_buffer.len(), "client left mid-request");
                }
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;
    use std::sync::Arc;
    use tokio_test::io::Builder;

    #[tokio::test]
    async fn test_request_reply() {
        let stream = Builder::new()
            .read(b"*3\r\n$5\r\nLPUSH\r\n$3\r\nfoo\r\n$3\r\nbar\r\n")
            .write(b":1\r\n")
            .read(b"LPOP foo\r\n")
            .write(b"$3\r\nbar\r\n")
            .build();
        let dispatcher = Dispatcher::new(Arc::new(Store::new()));

        Connection::new(stream).handle(&dispatcher).await.unwrap();
    }

    #[tokio::test]
    async fn test_pipelined_requests_share_one_write() {
        let stream = Builder::new()
            .read(b"PING\r\nECHO hi\r\n")
            .write(b"+PONG\r\n$2\r\nhi\r\n")
            .build();
        let dispatcher = Dispatcher::new(Arc::new(Store::new()));

        Connection::new(stream).handle(&dispatcher).await.unwrap();
    }

    #[tokio::test]
    async fn test_quit_stops_reading() {
        let stream = Builder::new()
            .read(b"QUIT\r\nPING\r\n")
            .write(b"+OK\r\n")
            .build();
        let dispatcher = Dispatcher::new(Arc::new(Store::new()));

        Connection::new(stream).handle(&dispatcher).await.unwrap();
        assert_eq!(dispatcher.store().command_count(), 1);
    }

    #[tokio::test]
    async fn test_protocol_error_closes() {
        let stream = Builder::new()
            .read(b"*1\r\n$x\r\n")
            .write(b"-ERR Protocol error: invalid bulk length\r\n")
            .build();
        let dispatcher = Dispatcher::new(Arc::new(Store::new()));

        Connection::new(stream).handle(&dispatcher).await.unwrap();
    }
}
