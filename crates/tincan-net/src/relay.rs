//! Inbound relay: the read loop feeding the inbox.
//!
//! Runs on the lifecycle task after the socket is split. Every exit path
//! yields a [`DisconnectReason`] so the lifecycle can always publish a
//! terminal event.

use bytes::BytesMut;
use tincan_core::{DisconnectReason, Inbox};
use tokio::io::AsyncRead;

use crate::transport::{self, RECV_BUFFER_SIZE};

/// Receive chunks until EOF or a failure, pushing decoded text to the inbox.
///
/// Never returns while the peer keeps sending valid text.
pub(crate) async fn run<R>(reader: &mut R, inbox: &Inbox) -> DisconnectReason
where
    R: AsyncRead + Unpin,
{
    let mut buf = BytesMut::with_capacity(RECV_BUFFER_SIZE);
    buf.resize(RECV_BUFFER_SIZE, 0);

    loop {
        let chunk = match transport::receive_once(reader, &mut buf).await {
            Ok(0) => return DisconnectReason::PeerClosed,
            Ok(n) => &buf[..n],
            Err(err) => {
                tracing::warn!(%err, "receive loop failed");
                return DisconnectReason::RecvFailed(err.to_string());
            },
        };

        // Chunk boundaries are arbitrary: a read can land inside a
        // multi-byte sequence, and the unframed stream gives us no point
        // to resynchronize at afterwards. Treat it as fatal.
        match std::str::from_utf8(chunk) {
            Ok(text) => inbox.push(text.to_owned()),
            Err(err) => {
                tracing::warn!(%err, "received invalid UTF-8; dropping the link");
                return DisconnectReason::InvalidUtf8;
            },
        }
    }
}
