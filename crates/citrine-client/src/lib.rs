// File: `crates/citrine-client/src/lib.rs`
pub mod client;
pub mod config;
pub mod correlator;
pub mod error;
pub mod identity;
pub mod routing;
pub mod tcp;
pub mod transport;

pub use client::{Client, GetResult, KeyBatch};
pub use config::{ClientConfig, ClientConfigBuilder};
pub use correlator::{collect_responses, RequestIdSource};
pub use error::ClientError;
pub use identity::{
    ClientThread, KEY_ADDRESS_BASE_PORT, REQUEST_PULL_BASE_PORT, ROUTING_BASE_PORT,
};
pub use routing::AddressCache;
pub use tcp::TcpTransport;
pub use transport::{
    MemoryTransport, PullSocket, PushSocket, SocketCache, Transport, TransportError,
};
