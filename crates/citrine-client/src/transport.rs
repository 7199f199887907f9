//! Blocking push/pull transport abstractions.
//!
//! The client only ever pushes whole frames at a destination address and
//! pulls whole frames off a bound endpoint, so that is the entire trait
//! surface. [`MemoryTransport`] wires both sides through in-process
//! channels for tests and simulations; [`crate::tcp::TcpTransport`] is the
//! real-socket implementation.

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Transport failure, distinct from a timed-out wait.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The address is not of the form `tcp://<host>:<port>`.
    #[error("invalid endpoint address {0:?}")]
    InvalidAddress(String),
    /// No endpoint is bound at the destination.
    #[error("no endpoint reachable at {0}")]
    Unreachable(String),
    /// The endpoint's channel has shut down.
    #[error("endpoint closed")]
    Closed,
    /// Socket-level failure.
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),
}

/// Outbound half: fire-and-forget frames to one destination.
pub trait PushSocket {
    fn send(&mut self, frame: &[u8]) -> Result<(), TransportError>;
}

/// Inbound half: a bound endpoint draining frames from any sender.
pub trait PullSocket {
    /// Block for up to `timeout` for one frame; `None` means the wait
    /// timed out.
    fn recv_timeout(&mut self, timeout: Duration) -> Result<Option<Vec<u8>>, TransportError>;
}

/// A factory for push and pull sockets over one medium.
pub trait Transport: Clone {
    type Push: PushSocket;
    type Pull: PullSocket;

    /// Create an outbound socket aimed at `addr` (connect form).
    fn connect_push(&self, addr: &str) -> Result<Self::Push, TransportError>;

    /// Bind an inbound socket at `addr` (bind form, wildcard host).
    fn bind_pull(&self, addr: &str) -> Result<Self::Pull, TransportError>;
}

/// Split `tcp://<host>:<port>` into host and port.
pub(crate) fn parse_endpoint(addr: &str) -> Result<(&str, u16), TransportError> {
    let invalid = || TransportError::InvalidAddress(addr.to_owned());

    let rest = addr.strip_prefix("tcp://").ok_or_else(invalid)?;
    let (host, port) = rest.rsplit_once(':').ok_or_else(invalid)?;
    if host.is_empty() {
        return Err(invalid());
    }
    let port: u16 = port.parse().map_err(|_| invalid())?;
    Ok((host, port))
}

/// Lazy one-socket-per-destination cache over a transport.
///
/// The first send to an address creates the push socket; every later send
/// reuses it.
pub struct SocketCache<T: Transport> {
    transport: T,
    sockets: HashMap<String, T::Push>,
}

impl<T: Transport> SocketCache<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            sockets: HashMap::new(),
        }
    }

    pub fn get(&mut self, addr: &str) -> Result<&mut T::Push, TransportError> {
        if !self.sockets.contains_key(addr) {
            debug!(addr, "opening push socket");
            let socket = self.transport.connect_push(addr)?;
            self.sockets.insert(addr.to_owned(), socket);
        }
        self.sockets
            .get_mut(addr)
            .ok_or_else(|| TransportError::Unreachable(addr.to_owned()))
    }

    pub fn len(&self) -> usize {
        self.sockets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sockets.is_empty()
    }
}

type Mailboxes = Mutex<HashMap<String, Sender<Vec<u8>>>>;

/// In-process transport: a shared hub of address-keyed mailboxes.
///
/// Clones share the hub, so a client and the mock servers it talks to are
/// built from clones of one `MemoryTransport`. A bind at `tcp://*:<port>`
/// receives frames pushed to any host on that port, mirroring a wildcard
/// socket bind.
#[derive(Clone, Default)]
pub struct MemoryTransport {
    mailboxes: Arc<Mailboxes>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn resolve(&self, host: &str, port: u16) -> Option<Sender<Vec<u8>>> {
        let mailboxes = self.mailboxes.lock();
        mailboxes
            .get(&format!("{host}:{port}"))
            .or_else(|| mailboxes.get(&format!("*:{port}")))
            .cloned()
    }
}

pub struct MemoryPush {
    hub: MemoryTransport,
    addr: String,
    host: String,
    port: u16,
}

impl PushSocket for MemoryPush {
    fn send(&mut self, frame: &[u8]) -> Result<(), TransportError> {
        let sender = self
            .hub
            .resolve(&self.host, self.port)
            .ok_or_else(|| TransportError::Unreachable(self.addr.clone()))?;
        sender
            .send(frame.to_vec())
            .map_err(|_| TransportError::Closed)
    }
}

pub struct MemoryPull {
    frames: Receiver<Vec<u8>>,
}

impl PullSocket for MemoryPull {
    fn recv_timeout(&mut self, timeout: Duration) -> Result<Option<Vec<u8>>, TransportError> {
        match self.frames.recv_timeout(timeout) {
            Ok(frame) => Ok(Some(frame)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(TransportError::Closed),
        }
    }
}

impl Transport for MemoryTransport {
    type Push = MemoryPush;
    type Pull = MemoryPull;

    fn connect_push(&self, addr: &str) -> Result<Self::Push, TransportError> {
        let (host, port) = parse_endpoint(addr)?;
        Ok(MemoryPush {
            hub: self.clone(),
            addr: addr.to_owned(),
            host: host.to_owned(),
            port,
        })
    }

    fn bind_pull(&self, addr: &str) -> Result<Self::Pull, TransportError> {
        let (host, port) = parse_endpoint(addr)?;
        let (tx, rx) = unbounded();
        debug!(addr, "binding pull endpoint");
        self.mailboxes.lock().insert(format!("{host}:{port}"), tx);
        Ok(MemoryPull { frames: rx })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: Duration = Duration::from_millis(10);

    #[test]
    fn parse_endpoint_accepts_connect_and_bind_forms() {
        assert_eq!(parse_endpoint("tcp://10.0.0.1:6460").unwrap(), ("10.0.0.1", 6460));
        assert_eq!(parse_endpoint("tcp://*:6760").unwrap(), ("*", 6760));

        assert!(parse_endpoint("udp://10.0.0.1:6460").is_err());
        assert!(parse_endpoint("tcp://10.0.0.1").is_err());
        assert!(parse_endpoint("tcp://:6460").is_err());
        assert!(parse_endpoint("tcp://h:not-a-port").is_err());
    }

    #[test]
    fn frames_flow_from_push_to_pull() {
        let hub = MemoryTransport::new();
        let mut pull = hub.bind_pull("tcp://10.0.0.1:7000").unwrap();
        let mut push = hub.connect_push("tcp://10.0.0.1:7000").unwrap();

        push.send(b"hello").unwrap();
        assert_eq!(pull.recv_timeout(TICK).unwrap(), Some(b"hello".to_vec()));
        assert_eq!(pull.recv_timeout(TICK).unwrap(), None);
    }

    #[test]
    fn wildcard_bind_matches_any_host() {
        let hub = MemoryTransport::new();
        let mut pull = hub.bind_pull("tcp://*:7001").unwrap();
        let mut push = hub.connect_push("tcp://192.168.0.9:7001").unwrap();

        push.send(b"frame").unwrap();
        assert_eq!(pull.recv_timeout(TICK).unwrap(), Some(b"frame".to_vec()));
    }

    #[test]
    fn send_to_unbound_address_is_unreachable() {
        let hub = MemoryTransport::new();
        let mut push = hub.connect_push("tcp://10.0.0.1:7002").unwrap();
        assert!(matches!(
            push.send(b"x"),
            Err(TransportError::Unreachable(_))
        ));
    }

    #[test]
    fn socket_cache_reuses_sockets() {
        let hub = MemoryTransport::new();
        let mut cache = SocketCache::new(hub.clone());
        let _pull = hub.bind_pull("tcp://10.0.0.1:7003").unwrap();

        cache.get("tcp://10.0.0.1:7003").unwrap();
        cache.get("tcp://10.0.0.1:7003").unwrap();
        cache.get("tcp://10.0.0.2:7003").unwrap();
        assert_eq!(cache.len(), 2);
    }
}
