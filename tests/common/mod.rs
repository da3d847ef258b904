//! Minimal RESP client for driving a real server in tests

#![allow(dead_code)]

use bytes::BytesMut;
use ferrum_lite::protocol::{RespEncoder, RespParser};
use ferrum_lite::{RespValue, Server};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

pub struct Client {
    stream: TcpStream,
    buf: BytesMut,
}

impl Client {
    pub async fn connect(server: &Server) -> Client {
        let addr = server.addr().expect("server was started");
        let stream = TcpStream::connect(addr).await.expect("connect");
        Client {
            stream,
            buf: BytesMut::with_capacity(1024),
        }
    }

    /// Send one command and wait for its reply
    pub async fn cmd(&mut self, words: &[&str]) -> RespValue {
        self.send(words).await;
        self.reply().await.expect("server closed the connection")
    }

    pub async fn send(&mut self, words: &[&str]) {
        let request = RespEncoder::encode_command(words);
        self.stream.write_all(&request).await.expect("write");
    }

    /// Next reply, None once the server has closed the connection
    pub async fn reply(&mut self) -> Option<RespValue> {
        loop {
            if let Some(value) = RespParser::parse(&mut self.buf).expect("valid reply") {
                return Some(value);
            }
            match self.stream.read_buf(&mut self.buf).await {
                Ok(0) | Err(_) => return None,
                Ok(_) => {}
            }
        }
    }
}

pub fn ok() -> RespValue {
    RespValue::ok()
}

pub fn bulk(s: &str) -> RespValue {
    RespValue::bulk_string(s.to_string())
}

pub fn bulks(items: &[&str]) -> RespValue {
    RespValue::bulk_array(items.iter().map(|s| s.to_string()))
}

pub fn int(i: i64) -> RespValue {
    RespValue::integer(i)
}
