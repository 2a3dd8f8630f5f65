//! Socket-level operations: dial with retry, listen for one peer, send.
//!
//! Everything here works on plain TCP streams. Ordering (who gets the write
//! half, when the read loop starts) is the lifecycle's job; this module
//! only knows how to move bytes.

use std::{
    io,
    net::{Ipv4Addr, SocketAddr, SocketAddrV4},
    time::Duration,
};

use thiserror::Error;
use tokio::{
    io::{AsyncRead, AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpSocket, TcpStream, tcp::OwnedWriteHalf},
    time::sleep,
};

/// Upper bound for one receive call; chunk boundaries land wherever the
/// socket puts them.
pub const RECV_BUFFER_SIZE: usize = 2048;

/// Delay between refused connection attempts.
pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_secs(1);

/// Listen backlog: one peer per link, nobody queues behind them.
pub const LISTEN_BACKLOG: u32 = 1;

/// Fixed loopback endpoint the listening side binds by default.
pub const DEFAULT_BIND_ADDR: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 9092));

/// Transport-level failures.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connect failed with an error the retry policy does not cover.
    #[error("connect to {addr} failed: {source}")]
    ConnectFailed {
        /// Address the dial targeted.
        addr: SocketAddr,
        /// Underlying socket error.
        source: io::Error,
    },
    /// The listening socket failed while binding or accepting.
    #[error("listen on {addr} failed: {source}")]
    BindFailed {
        /// Address the listener bound (or tried to bind).
        addr: SocketAddr,
        /// Underlying socket error.
        source: io::Error,
    },
    /// A send on the established link failed.
    #[error("send failed: {0}")]
    SendFailed(#[source] io::Error),
    /// A receive on the established link failed.
    #[error("receive failed: {0}")]
    RecvFailed(#[source] io::Error),
}

/// Dial the peer, retrying refused attempts forever at a fixed backoff.
///
/// Refused means nobody is listening yet; the other side may simply not
/// have started, so keep knocking. Every other error kind ends the attempt.
///
/// # Errors
///
/// Returns [`TransportError::ConnectFailed`] for any socket error other
/// than a refused connection.
pub async fn dial(addr: SocketAddr, backoff: Duration) -> Result<TcpStream, TransportError> {
    loop {
        match TcpStream::connect(addr).await {
            Ok(stream) => return Ok(stream),
            Err(err) if err.kind() == io::ErrorKind::ConnectionRefused => {
                tracing::debug!(%addr, ?backoff, "connection refused; retrying");
                sleep(backoff).await;
            },
            Err(source) => return Err(TransportError::ConnectFailed { addr, source }),
        }
    }
}

/// A bound TCP listener that accepts exactly one peer.
///
/// Accepting consumes the listener, so a second peer cannot sneak in
/// behind the first; with [`LISTEN_BACKLOG`] of one the kernel turns most
/// of them away already.
#[derive(Debug)]
pub struct Listener {
    inner: TcpListener,
    local: SocketAddr,
}

impl Listener {
    /// Bind `addr` with address reuse, ready to accept.
    ///
    /// Reuse keeps quick restarts from tripping over the previous run's
    /// socket lingering in `TIME_WAIT`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::BindFailed`] when the socket cannot be
    /// created, configured, or bound.
    pub fn bind(addr: SocketAddr) -> Result<Self, TransportError> {
        let bind_failed = |source| TransportError::BindFailed { addr, source };

        let socket = match addr {
            SocketAddr::V4(_) => TcpSocket::new_v4(),
            SocketAddr::V6(_) => TcpSocket::new_v6(),
        }
        .map_err(bind_failed)?;
        socket.set_reuseaddr(true).map_err(bind_failed)?;
        socket.bind(addr).map_err(bind_failed)?;

        let inner = socket.listen(LISTEN_BACKLOG).map_err(bind_failed)?;
        let local = inner.local_addr().map_err(bind_failed)?;
        tracing::info!(%local, "listening for a peer");

        Ok(Self { inner, local })
    }

    /// Address the listener is bound to; resolves port 0 to the real port.
    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        self.local
    }

    /// Wait for the one peer, consuming the listener.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::BindFailed`] when the accept fails.
    pub async fn accept_peer(self) -> Result<(TcpStream, SocketAddr), TransportError> {
        self.inner
            .accept()
            .await
            .map_err(|source| TransportError::BindFailed { addr: self.local, source })
    }
}

/// One read of up to `buf.len()` bytes into `buf`.
///
/// `Ok(0)` is a peer-initiated close (EOF), distinct from `Err`. The
/// stream has no framing, so the `n` bytes read are exactly one chunk.
///
/// # Errors
///
/// Returns [`TransportError::RecvFailed`] on socket errors.
pub async fn receive_once<R>(reader: &mut R, buf: &mut [u8]) -> Result<usize, TransportError>
where
    R: AsyncRead + Unpin,
{
    reader.read(buf).await.map_err(TransportError::RecvFailed)
}

/// Send handle for the established link.
///
/// Owns the write half of the stream; the read half stays with the
/// lifecycle task. Dropping this half-closes the connection, which the
/// peer observes as EOF.
#[derive(Debug)]
pub struct Outbound {
    writer: OwnedWriteHalf,
    local: SocketAddr,
    peer: SocketAddr,
}

impl Outbound {
    pub(crate) fn new(writer: OwnedWriteHalf, local: SocketAddr, peer: SocketAddr) -> Self {
        Self { writer, local, peer }
    }

    /// Write the whole message as UTF-8 bytes.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::SendFailed`] when the socket rejects the
    /// write; the link may already be dead.
    pub async fn send(&mut self, text: &str) -> Result<(), TransportError> {
        self.writer
            .write_all(text.as_bytes())
            .await
            .map_err(TransportError::SendFailed)
    }

    /// Local address of the connected socket.
    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        self.local
    }

    /// Address of the peer.
    #[must_use]
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }
}

#[cfg(test)]
mod tests {
    use tokio::time::timeout;

    use super::*;

    fn ephemeral() -> SocketAddr {
        "127.0.0.1:0".parse().unwrap()
    }

    #[tokio::test]
    async fn listener_binds_an_ephemeral_port() {
        let listener = Listener::bind(ephemeral()).unwrap();
        assert_ne!(listener.local_addr().port(), 0);
    }

    #[tokio::test]
    async fn bind_conflict_reports_bind_failed() {
        let listener = Listener::bind(ephemeral()).unwrap();
        let result = Listener::bind(listener.local_addr());
        assert!(matches!(result, Err(TransportError::BindFailed { .. })));
    }

    #[tokio::test]
    async fn send_receive_and_peer_close() {
        let listener = Listener::bind(ephemeral()).unwrap();
        let addr = listener.local_addr();

        let accept = tokio::spawn(listener.accept_peer());
        let client = TcpStream::connect(addr).await.unwrap();
        let (server_stream, _) = accept.await.unwrap().unwrap();

        let local = client.local_addr().unwrap();
        let peer = client.peer_addr().unwrap();
        let (_client_read, client_write) = client.into_split();
        let mut outbound = Outbound::new(client_write, local, peer);
        outbound.send("hello").await.unwrap();

        let (mut server_read, _server_write) = server_stream.into_split();
        let mut buf = vec![0u8; RECV_BUFFER_SIZE];
        let n = receive_once(&mut server_read, &mut buf).await.unwrap();
        assert_eq!(&buf[..n], b"hello");

        // Dropping the write half shuts down our sending direction; the
        // peer reads it as EOF.
        drop(outbound);
        let n = receive_once(&mut server_read, &mut buf).await.unwrap();
        assert_eq!(n, 0);
    }

    #[tokio::test]
    async fn dial_retries_until_a_listener_appears() {
        // Grab a free port by binding and immediately dropping.
        let probe = Listener::bind(ephemeral()).unwrap();
        let addr = probe.local_addr();
        drop(probe);

        let backoff = Duration::from_millis(50);
        let dialing = tokio::spawn(dial(addr, backoff));

        // Give the dialer time for a few refused attempts first.
        sleep(backoff * 3).await;
        let listener = Listener::bind(addr).unwrap();
        let accept = tokio::spawn(listener.accept_peer());

        let stream = timeout(Duration::from_secs(5), dialing)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        assert_eq!(stream.peer_addr().unwrap(), addr);
        accept.await.unwrap().unwrap();
    }
}
