//! TCP implementation of the push/pull transport.
//!
//! Frames are length-prefixed: a u32 little-endian byte count, then the
//! payload. A push socket connects lazily on first send and reconnects on
//! the send after a failure. A pull socket binds a listener and funnels
//! decoded frames from every inbound connection into one channel; its
//! acceptor and reader threads live for the life of the process.

use crate::transport::{
    parse_endpoint, PullSocket, PushSocket, Transport, TransportError,
};
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

/// Upper bound on a single frame; anything larger is a protocol violation
/// and drops the connection.
const MAX_FRAME_LEN: usize = 64 * 1024 * 1024;

/// Real-socket transport over TCP.
#[derive(Clone, Copy, Debug, Default)]
pub struct TcpTransport;

impl TcpTransport {
    pub fn new() -> Self {
        Self
    }
}

pub struct TcpPush {
    target: String,
    stream: Option<TcpStream>,
}

impl TcpPush {
    fn write_frame(&mut self, frame: &[u8]) -> Result<(), TransportError> {
        if self.stream.is_none() {
            debug!(target = %self.target, "connecting push socket");
            let stream = TcpStream::connect(&self.target)?;
            stream.set_nodelay(true)?;
            self.stream = Some(stream);
        }
        let Some(stream) = self.stream.as_mut() else {
            return Err(TransportError::Closed);
        };

        let len = u32::try_from(frame.len()).map_err(|_| {
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "frame too large")
        })?;
        stream.write_all(&len.to_le_bytes())?;
        stream.write_all(frame)?;
        Ok(())
    }
}

impl PushSocket for TcpPush {
    fn send(&mut self, frame: &[u8]) -> Result<(), TransportError> {
        let result = self.write_frame(frame);
        if result.is_err() {
            // Reconnect on the next send.
            self.stream = None;
        }
        result
    }
}

pub struct TcpPull {
    frames: Receiver<Vec<u8>>,
}

impl PullSocket for TcpPull {
    fn recv_timeout(&mut self, timeout: Duration) -> Result<Option<Vec<u8>>, TransportError> {
        match self.frames.recv_timeout(timeout) {
            Ok(frame) => Ok(Some(frame)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(TransportError::Closed),
        }
    }
}

fn read_frame(stream: &mut TcpStream) -> std::io::Result<Option<Vec<u8>>> {
    let mut len_bytes = [0u8; 4];
    if let Err(err) = stream.read_exact(&mut len_bytes) {
        return match err.kind() {
            std::io::ErrorKind::UnexpectedEof => Ok(None),
            _ => Err(err),
        };
    }

    let len = u32::from_le_bytes(len_bytes) as usize;
    if len > MAX_FRAME_LEN {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("frame of {len} bytes exceeds limit"),
        ));
    }

    let mut frame = vec![0u8; len];
    stream.read_exact(&mut frame)?;
    Ok(Some(frame))
}

fn pump_connection(mut stream: TcpStream, frames: Sender<Vec<u8>>) {
    loop {
        match read_frame(&mut stream) {
            Ok(Some(frame)) => {
                if frames.send(frame).is_err() {
                    return;
                }
            }
            Ok(None) => return,
            Err(err) => {
                warn!(%err, "dropping inbound connection");
                return;
            }
        }
    }
}

fn accept_loop(listener: TcpListener, frames: Sender<Vec<u8>>) {
    loop {
        match listener.accept() {
            Ok((stream, peer)) => {
                debug!(%peer, "accepted inbound connection");
                let frames = frames.clone();
                thread::spawn(move || pump_connection(stream, frames));
            }
            Err(err) => {
                warn!(%err, "accept failed");
            }
        }
    }
}

impl Transport for TcpTransport {
    type Push = TcpPush;
    type Pull = TcpPull;

    fn connect_push(&self, addr: &str) -> Result<Self::Push, TransportError> {
        let (host, port) = parse_endpoint(addr)?;
        Ok(TcpPush {
            target: format!("{host}:{port}"),
            stream: None,
        })
    }

    fn bind_pull(&self, addr: &str) -> Result<Self::Pull, TransportError> {
        let (host, port) = parse_endpoint(addr)?;
        let host = if host == "*" { "0.0.0.0" } else { host };

        let listener = TcpListener::bind(format!("{host}:{port}"))?;
        debug!(addr, "bound pull listener");

        let (tx, rx) = unbounded();
        thread::spawn(move || accept_loop(listener, tx));
        Ok(TcpPull { frames: rx })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WAIT: Duration = Duration::from_secs(2);

    #[test]
    fn frames_round_trip_over_tcp() {
        let transport = TcpTransport::new();
        let mut pull = transport.bind_pull("tcp://127.0.0.1:16460").unwrap();
        let mut push = transport.connect_push("tcp://127.0.0.1:16460").unwrap();

        push.send(b"one").unwrap();
        push.send(b"two").unwrap();

        assert_eq!(pull.recv_timeout(WAIT).unwrap(), Some(b"one".to_vec()));
        assert_eq!(pull.recv_timeout(WAIT).unwrap(), Some(b"two".to_vec()));
    }

    #[test]
    fn wildcard_bind_listens_on_all_interfaces() {
        let transport = TcpTransport::new();
        let mut pull = transport.bind_pull("tcp://*:16461").unwrap();
        let mut push = transport.connect_push("tcp://127.0.0.1:16461").unwrap();

        push.send(b"frame").unwrap();
        assert_eq!(pull.recv_timeout(WAIT).unwrap(), Some(b"frame".to_vec()));
    }

    #[test]
    fn multiple_senders_share_one_puller() {
        let transport = TcpTransport::new();
        let mut pull = transport.bind_pull("tcp://127.0.0.1:16462").unwrap();

        let mut a = transport.connect_push("tcp://127.0.0.1:16462").unwrap();
        let mut b = transport.connect_push("tcp://127.0.0.1:16462").unwrap();
        a.send(b"from-a").unwrap();
        b.send(b"from-b").unwrap();

        let mut got = vec![
            pull.recv_timeout(WAIT).unwrap().unwrap(),
            pull.recv_timeout(WAIT).unwrap().unwrap(),
        ];
        got.sort();
        assert_eq!(got, vec![b"from-a".to_vec(), b"from-b".to_vec()]);
    }
}
