use anyhow::{Context, Result, bail};
use std::collections::HashMap;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::constants::{MAX_BODY_BYTES, MAX_HEAD_BYTES};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    GET,
    POST,
    PUT,
    DELETE,
}

impl TryFrom<&str> for Method {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, anyhow::Error> {
        match value {
            "GET" => Ok(Method::GET),
            "POST" => Ok(Method::POST),
            "PUT" => Ok(Method::PUT),
            "DELETE" => Ok(Method::DELETE),
            _ => Err(anyhow::anyhow!("Method not supported")),
        }
    }
}

#[derive(Debug)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub query: HashMap<String, String>,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl Request {
    /// Reads one request off the stream: head up to the blank line, then
    /// `Content-Length` bytes of body.
    pub async fn read_from<Reader>(mut reader: Reader) -> Result<Self>
    where
        Reader: AsyncRead + Unpin,
    {
        let mut buffer = Vec::with_capacity(1024);
        let mut chunk = [0u8; 1024];

        let head_end = loop {
            if let Some(pos) = find_head_end(&buffer) {
                break pos;
            }
            if buffer.len() > MAX_HEAD_BYTES {
                bail!("Request head too large");
            }
            let size = reader.read(&mut chunk).await.context("Read Error")?;
            if size == 0 {
                bail!("Connection closed before end of headers");
            }
            buffer.extend_from_slice(&chunk[..size]);
        };

        let head = String::from_utf8_lossy(&buffer[..head_end]).into_owned();
        let mut request = Self::parse_head(&head)?;

        let content_length = match request.headers.get("content-length") {
            Some(value) => value.parse::<usize>().context("Invalid Content-Length")?,
            None => 0,
        };
        if content_length > MAX_BODY_BYTES {
            bail!("Body too large");
        }

        let mut body = buffer.split_off(head_end + 4);
        while body.len() < content_length {
            let size = reader.read(&mut chunk).await.context("Read Error")?;
            if size == 0 {
                bail!("Connection closed before end of body");
            }
            body.extend_from_slice(&chunk[..size]);
        }
        body.truncate(content_length);

        request.body = String::from_utf8(body).context("Body is not UTF-8")?;
        Ok(request)
    }

    /// Parses a complete request held in memory.
    pub fn parse(raw: &str) -> Result<Self> {
        let mut parts = raw.splitn(2, "\r\n\r\n");
        let head = parts.next().context("Headline Error")?;
        let body = parts.next().unwrap_or("");
        let mut request = Self::parse_head(head)?;
        request.body = body.to_string();
        Ok(request)
    }

    fn parse_head(head: &str) -> Result<Self> {
        let mut head_line = head.lines();
        let first = head_line.next().context("Empty Request")?;
        let mut request_parts = first.split_whitespace();
        let method: Method = request_parts
            .next()
            .ok_or(anyhow::anyhow!("missing method"))
            .and_then(TryInto::try_into)
            .context("Missing Method")?;
        let target = request_parts.next().context("No Path")?;

        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, parse_query(query)),
            None => (target, HashMap::new()),
        };

        let mut headers = HashMap::new();
        for line in head_line {
            if let Some((k, v)) = line.split_once(':') {
                headers.insert(k.trim().to_lowercase(), v.trim().to_string());
            }
        }

        Ok(Request {
            method,
            path: path.to_string(),
            query,
            headers,
            body: String::new(),
        })
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }
}

fn find_head_end(buffer: &[u8]) -> Option<usize> {
    buffer.windows(4).position(|w| w == b"\r\n\r\n")
}

// Later duplicates win.
fn parse_query(query: &str) -> HashMap<String, String> {
    url::form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect()
}
