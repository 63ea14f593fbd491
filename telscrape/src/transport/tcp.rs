//! TCP transport for Telnet sessions.

use log::{debug, warn};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;

use super::config::TransportConfig;
use crate::error::{Result, TransportError};

/// A byte stream a session can run over.
///
/// Implemented for every `AsyncRead + AsyncWrite` type, so TCP streams,
/// in-memory duplex pipes and caller-provided tunnels all qualify.
pub trait TelnetStream: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T> TelnetStream for T where T: AsyncRead + AsyncWrite + Unpin + Send {}

/// Type-erased stream owned by a connected session.
pub type BoxedStream = Box<dyn TelnetStream>;

/// Open a TCP connection to the configured host.
pub async fn connect_tcp(config: &TransportConfig) -> Result<TcpStream> {
    debug!("connecting to {}", config.socket_addr());

    let stream = tokio::time::timeout(
        config.connect_timeout,
        TcpStream::connect((config.host.as_str(), config.port)),
    )
    .await
    .map_err(|_| TransportError::Timeout(config.connect_timeout))?
    .map_err(|source| TransportError::ConnectionFailed {
        host: config.host.clone(),
        port: config.port,
        source,
    })?;

    // Interactive traffic: one short line at a time.
    if let Err(e) = stream.set_nodelay(true) {
        warn!("Failed to set TCP_NODELAY: {}", e);
    }

    Ok(stream)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_connect_tcp() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let mut config = TransportConfig::new("127.0.0.1");
        config.port = port;

        let (client, accepted) = tokio::join!(connect_tcp(&config), listener.accept());
        assert!(client.is_ok());
        assert!(accepted.is_ok());
    }

    #[tokio::test]
    async fn test_connect_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let mut config = TransportConfig::new("127.0.0.1");
        config.port = port;

        let err = connect_tcp(&config).await.unwrap_err();
        assert!(err.is_connection_error());
        assert!(err.to_string().contains(&format!("127.0.0.1:{port}")));
    }
}
