//! Connection lifecycle controller.
//!
//! [`spawn_dial`] and [`spawn_listen`] start the single background network
//! task for one side of the link. The task orders startup (wait for an
//! address, connect or accept), hands the write half to the presentation
//! layer inside [`LinkEvent::Connected`], then runs the read loop into the
//! shared [`Inbox`]. Every exit path publishes [`LinkEvent::Disconnected`]
//! exactly once, so the presentation layer always learns about a dead link.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use tincan_core::{DisconnectReason, Inbox, Link, LinkError, PeerAddr};
use tokio::{
    net::TcpStream,
    sync::{mpsc, watch},
    task::AbortHandle,
};

use crate::{
    relay,
    transport::{self, Listener, Outbound},
};

/// Buffered lifecycle events per link; a link emits at most three.
const EVENT_CHANNEL_CAPACITY: usize = 8;

/// Lifecycle notifications from the network task to the presentation layer.
#[derive(Debug)]
pub enum LinkEvent {
    /// The listening socket is bound and waiting for the peer.
    Listening {
        /// Local address the listener bound, with port 0 resolved.
        local: SocketAddr,
    },
    /// The link is up. The write half is handed over here, exactly once.
    Connected {
        /// Send handle for the presentation layer.
        outbound: Outbound,
    },
    /// The link ended. Terminal: no further events follow.
    Disconnected {
        /// Why the link ended.
        reason: DisconnectReason,
    },
}

/// Handle to a spawned link task.
#[derive(Debug)]
pub struct LinkHandle {
    /// Lifecycle events, in order. `Disconnected` is always last.
    pub events: mpsc::Receiver<LinkEvent>,
    /// Received chunks; the consumer end of the delivery path.
    pub inbox: Arc<Inbox>,
    abort_handle: AbortHandle,
}

impl LinkHandle {
    /// Abort the network task. The socket closes when the task drops it.
    pub fn stop(&self) {
        self.abort_handle.abort();
    }
}

/// Spawn the dialing side: wait for an address on `addr_rx`, connect to it
/// (retrying refused attempts at `backoff`), then relay inbound text.
#[must_use]
pub fn spawn_dial(addr_rx: watch::Receiver<Option<PeerAddr>>, backoff: Duration) -> LinkHandle {
    let inbox = Arc::new(Inbox::new());
    let (events_tx, events) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let task = tokio::spawn(run_dial(addr_rx, backoff, Arc::clone(&inbox), events_tx));
    LinkHandle { events, inbox, abort_handle: task.abort_handle() }
}

/// Spawn the listening side: bind `bind_addr`, accept exactly one peer,
/// then relay inbound text.
#[must_use]
pub fn spawn_listen(bind_addr: SocketAddr) -> LinkHandle {
    let inbox = Arc::new(Inbox::new());
    let (events_tx, events) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let task = tokio::spawn(run_listen(bind_addr, Arc::clone(&inbox), events_tx));
    LinkHandle { events, inbox, abort_handle: task.abort_handle() }
}

async fn run_dial(
    addr_rx: watch::Receiver<Option<PeerAddr>>,
    backoff: Duration,
    inbox: Arc<Inbox>,
    events: mpsc::Sender<LinkEvent>,
) {
    let mut link = Link::new();
    let reason = match dial_session(&mut link, addr_rx, backoff, &inbox, &events).await {
        Ok(reason) => reason,
        Err(err) => {
            tracing::error!(%err, "dial task drove the link out of order");
            DisconnectReason::ConnectFailed(err.to_string())
        },
    };
    link.close(reason.clone());
    tracing::info!(%reason, "link ended");
    let _ = events.send(LinkEvent::Disconnected { reason }).await;
}

async fn run_listen(bind_addr: SocketAddr, inbox: Arc<Inbox>, events: mpsc::Sender<LinkEvent>) {
    let mut link = Link::new();
    let reason = match listen_session(&mut link, bind_addr, &inbox, &events).await {
        Ok(reason) => reason,
        Err(err) => {
            tracing::error!(%err, "listen task drove the link out of order");
            DisconnectReason::BindFailed(err.to_string())
        },
    };
    link.close(reason.clone());
    tracing::info!(%reason, "link ended");
    let _ = events.send(LinkEvent::Disconnected { reason }).await;
}

async fn dial_session(
    link: &mut Link,
    mut addr_rx: watch::Receiver<Option<PeerAddr>>,
    backoff: Duration,
    inbox: &Inbox,
    events: &mpsc::Sender<LinkEvent>,
) -> Result<DisconnectReason, LinkError> {
    // Block until the presentation layer supplies an address; on a first
    // run the user is still typing it into the form.
    let addr = loop {
        if let Some(addr) = *addr_rx.borrow_and_update() {
            break addr;
        }
        if addr_rx.changed().await.is_err() {
            return Ok(DisconnectReason::ConnectFailed("no address supplied".to_owned()));
        }
    };

    link.configure()?;
    tracing::info!(%addr, "dialing peer");

    let stream = match transport::dial(addr.socket_addr(), backoff).await {
        Ok(stream) => stream,
        Err(err) => return Ok(DisconnectReason::ConnectFailed(err.to_string())),
    };

    connected_session(link, stream, inbox, events).await
}

async fn listen_session(
    link: &mut Link,
    bind_addr: SocketAddr,
    inbox: &Inbox,
    events: &mpsc::Sender<LinkEvent>,
) -> Result<DisconnectReason, LinkError> {
    // The listening side needs no user-supplied address; it counts as
    // configured the moment it spawns.
    link.configure()?;

    let listener = match Listener::bind(bind_addr) {
        Ok(listener) => listener,
        Err(err) => return Ok(DisconnectReason::BindFailed(err.to_string())),
    };
    let _ = events.send(LinkEvent::Listening { local: listener.local_addr() }).await;

    let (stream, peer) = match listener.accept_peer().await {
        Ok(accepted) => accepted,
        Err(err) => return Ok(DisconnectReason::BindFailed(err.to_string())),
    };
    tracing::info!(%peer, "peer connected");

    connected_session(link, stream, inbox, events).await
}

/// Shared tail of both sides: publish the write half, then run the read
/// loop until it reports why it stopped.
async fn connected_session(
    link: &mut Link,
    stream: TcpStream,
    inbox: &Inbox,
    events: &mpsc::Sender<LinkEvent>,
) -> Result<DisconnectReason, LinkError> {
    let (local, peer) = match (stream.local_addr(), stream.peer_addr()) {
        (Ok(local), Ok(peer)) => (local, peer),
        (Err(err), _) | (_, Err(err)) => {
            return Ok(DisconnectReason::RecvFailed(format!(
                "socket address lookup failed: {err}"
            )));
        },
    };

    let (mut reader, writer) = stream.into_split();
    link.establish()?;
    tracing::info!(%local, %peer, "link established");

    // The write half must be handed over before the first read so the
    // presentation layer can send as soon as it sees Connected.
    let outbound = Outbound::new(writer, local, peer);
    let _ = events.send(LinkEvent::Connected { outbound }).await;

    Ok(relay::run(&mut reader, inbox).await)
}
