//! Minimal blocking HTTP/1.0 client.

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::time::Duration;

const CLIENT_TIMEOUT: Duration = Duration::from_secs(5);

/// Status and body of one request/reply exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpExchange {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpExchange {
    /// Sends `GET {target} HTTP/1.0` and reads until the server closes.
    pub fn get(addr: SocketAddr, target: &str) -> Result<Self, String> {
        Self::send(addr, format!("GET {target} HTTP/1.0\r\n\r\n").as_bytes())
    }

    /// Sends raw request bytes and parses the reply.
    pub fn send(addr: SocketAddr, request: &[u8]) -> Result<Self, String> {
        let mut stream =
            TcpStream::connect(addr).map_err(|error| format!("connect {addr}: {error}"))?;
        stream
            .set_read_timeout(Some(CLIENT_TIMEOUT))
            .map_err(|error| error.to_string())?;
        stream
            .write_all(request)
            .map_err(|error| format!("write request: {error}"))?;
        let mut raw = String::new();
        stream
            .read_to_string(&mut raw)
            .map_err(|error| format!("read reply: {error}"))?;
        Self::parse(&raw)
    }

    /// Value of the first header called `name`.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    fn parse(raw: &str) -> Result<Self, String> {
        let (head, body) = raw
            .split_once("\r\n\r\n")
            .ok_or_else(|| format!("reply has no header terminator: {raw:?}"))?;
        let mut lines = head.split("\r\n");
        let status_line = lines.next().unwrap_or_default();
        let status = status_line
            .split(' ')
            .nth(1)
            .and_then(|code| code.parse().ok())
            .ok_or_else(|| format!("bad status line: {status_line:?}"))?;
        let headers = lines
            .filter_map(|line| line.split_once(": "))
            .map(|(name, value)| (name.to_owned(), value.to_owned()))
            .collect();
        Ok(Self {
            status,
            headers,
            body: body.to_owned(),
        })
    }
}
