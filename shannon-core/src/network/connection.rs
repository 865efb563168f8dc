//! One request/response exchange per TCP connection.
//!
//! The requester opens an independent connection per job and the
//! authority serves each connection in its own task, so no state is
//! shared across connections. Ordering across lines is reconstructed by
//! the requester's ordering barrier, never by the authority.

use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_util::codec::Framed;
use tracing::debug;

use crate::codec::{AuthorityCodec, ClientCodec};
use crate::error::ShannonError;
use crate::frame::Request;
use crate::job::{EncodeJob, EncodedLine};

/// Where the computing authority listens.
#[derive(Debug, Clone)]
pub struct ConnectionInfo {
    host: String,
    port: u16,
}

impl ConnectionInfo {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl std::fmt::Display for ConnectionInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Requester side: connect, send one line, await one result frame.
///
/// Every failure here is scoped to this exchange; sibling jobs on their
/// own connections are unaffected.
pub async fn request_encoding(
    info: &ConnectionInfo,
    line: &str,
) -> Result<EncodedLine, ShannonError> {
    let request = Request::new(line)?;
    let stream = TcpStream::connect((info.host(), info.port())).await?;
    let mut framed = Framed::new(stream, ClientCodec::default());

    framed.send(request).await?;
    debug!(%info, len = line.len(), "request sent, awaiting result");

    match framed.next().await {
        Some(result) => result,
        None => Err(ShannonError::ConnectionClosed),
    }
}

/// Authority side: read one request, compute table and bitstring, write
/// the result frame back, and let the connection drop.
pub async fn serve_connection(stream: TcpStream) -> Result<(), ShannonError> {
    let mut framed = Framed::new(stream, AuthorityCodec::default());

    let request = match framed.next().await {
        Some(request) => request?,
        None => return Err(ShannonError::ConnectionClosed),
    };

    // Index is irrelevant on the authority; ordering lives with the
    // requester.
    let job = EncodeJob::new(0, request.into_line());
    let result = job.run()?;
    debug!(
        table_len = result.table.len(),
        bits = result.bits.len(),
        "request served"
    );

    framed.send(result).await?;
    Ok(())
}
