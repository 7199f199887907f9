//! Client endpoint identity and address formatting.
//!
//! A client instance is identified by (ip, thread id). Its two reply
//! endpoints hang off fixed base ports plus the thread offset, in a bind
//! form (wildcard host, for the local puller) and a connect form (explicit
//! ip, handed to servers as the reply-to address). Pure string formatting,
//! no I/O.

/// Base port of the request-response pull endpoint.
pub const REQUEST_PULL_BASE_PORT: u16 = 6460;
/// Base port of the key-address (routing response) pull endpoint.
pub const KEY_ADDRESS_BASE_PORT: u16 = 6760;
/// First port the routing tier listens on.
pub const ROUTING_BASE_PORT: u16 = 6450;
/// How many routing ports a full cluster exposes.
const ROUTING_PORT_SPAN: u16 = 4;

/// The identity of one client thread and the addresses derived from it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientThread {
    ip: String,
    tid: u16,
}

impl ClientThread {
    pub fn new(ip: impl Into<String>, tid: u16) -> Self {
        Self { ip: ip.into(), tid }
    }

    pub fn ip(&self) -> &str {
        &self.ip
    }

    pub fn tid(&self) -> u16 {
        self.tid
    }

    pub fn request_pull_connect_addr(&self) -> String {
        format!("tcp://{}:{}", self.ip, REQUEST_PULL_BASE_PORT + self.tid)
    }

    pub fn request_pull_bind_addr(&self) -> String {
        format!("tcp://*:{}", REQUEST_PULL_BASE_PORT + self.tid)
    }

    pub fn key_address_connect_addr(&self) -> String {
        format!("tcp://{}:{}", self.ip, KEY_ADDRESS_BASE_PORT + self.tid)
    }

    pub fn key_address_bind_addr(&self) -> String {
        format!("tcp://*:{}", KEY_ADDRESS_BASE_PORT + self.tid)
    }
}

/// The routing-tier ports a client may query: one in local mode, the full
/// span against a cluster.
pub fn routing_ports(local: bool) -> Vec<u16> {
    if local {
        vec![ROUTING_BASE_PORT]
    } else {
        (ROUTING_BASE_PORT..ROUTING_BASE_PORT + ROUTING_PORT_SPAN).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addresses_derive_from_ip_and_thread() {
        let thread = ClientThread::new("10.0.0.7", 2);

        assert_eq!(thread.request_pull_connect_addr(), "tcp://10.0.0.7:6462");
        assert_eq!(thread.request_pull_bind_addr(), "tcp://*:6462");
        assert_eq!(thread.key_address_connect_addr(), "tcp://10.0.0.7:6762");
        assert_eq!(thread.key_address_bind_addr(), "tcp://*:6762");
    }

    #[test]
    fn routing_port_sets() {
        assert_eq!(routing_ports(true), vec![6450]);
        assert_eq!(routing_ports(false), vec![6450, 6451, 6452, 6453]);
    }
}
