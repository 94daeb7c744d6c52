use std::net::SocketAddr;

/// Boxed underlying error, so the variants do not depend on which
/// transport implementation is compiled in.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur in the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The listener could not bind its address.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Accepting a TCP connection failed.
    #[error("accept failed: {0}")]
    Accept(#[source] std::io::Error),

    /// The peer connected but the protocol upgrade failed.
    #[error("upgrade from {peer} failed: {source}")]
    Upgrade {
        peer: SocketAddr,
        #[source]
        source: BoxError,
    },

    /// Writing a frame failed.
    #[error("send failed: {0}")]
    Send(#[source] BoxError),

    /// Reading a frame failed, including frames over the size limit.
    #[error("receive failed: {0}")]
    Receive(#[source] BoxError),
}
