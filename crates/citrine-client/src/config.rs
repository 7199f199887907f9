//! Client configuration.

use std::time::Duration;

/// Configuration for a Citrine client.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Host of the routing tier (an ELB in a cluster, 127.0.0.1 locally).
    pub routing_address: String,
    /// This machine's reachable IP, handed to servers as the reply host.
    pub ip: String,
    /// Local mode: the routing tier listens on a single port.
    pub local: bool,
    /// Port offset for running several clients on one machine.
    pub thread_offset: u16,
    /// Deadline for each blocking collect of replies.
    pub request_timeout: Duration,
    /// Request-id counter wraps after this many requests. Must comfortably
    /// exceed the number of simultaneously outstanding requests.
    pub request_id_modulus: u32,
}

impl ClientConfig {
    pub fn new(routing_address: impl Into<String>, ip: impl Into<String>) -> Self {
        Self {
            routing_address: routing_address.into(),
            ip: ip.into(),
            local: false,
            thread_offset: 0,
            request_timeout: Duration::from_secs(5),
            request_id_modulus: 10_000,
        }
    }
}

/// Builder for client configuration.
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn new(routing_address: impl Into<String>, ip: impl Into<String>) -> Self {
        Self {
            config: ClientConfig::new(routing_address, ip),
        }
    }

    pub fn local(mut self, local: bool) -> Self {
        self.config.local = local;
        self
    }

    pub fn thread_offset(mut self, offset: u16) -> Self {
        self.config.thread_offset = offset;
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    pub fn request_id_modulus(mut self, modulus: u32) -> Self {
        self.config.request_id_modulus = modulus;
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_defaults() {
        let config = ClientConfigBuilder::new("10.0.0.1", "10.0.0.9")
            .local(true)
            .thread_offset(3)
            .request_timeout(Duration::from_millis(250))
            .request_id_modulus(100)
            .build();

        assert!(config.local);
        assert_eq!(config.thread_offset, 3);
        assert_eq!(config.request_timeout, Duration::from_millis(250));
        assert_eq!(config.request_id_modulus, 100);
        assert_eq!(config.routing_address, "10.0.0.1");
        assert_eq!(config.ip, "10.0.0.9");
    }
}
