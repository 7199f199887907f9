//! Request-id generation and reply correlation.
//!
//! Ids are `"<ip>:<counter>"` with the counter wrapping at a configurable
//! modulus; they only need to stay unique across a client's outstanding
//! requests. `collect_responses` drains a puller until every expected id
//! has one reply, discarding anything else that lands on the endpoint:
//! duplicates, stragglers from earlier calls, and frames that do not
//! decode as the expected message. Discarding is non-destructive for the
//! current caller but does drop replies a pipelined caller might have
//! wanted; this client is strictly one-call-at-a-time.

use crate::error::ClientError;
use crate::transport::PullSocket;
use citrine_proto::{decode_message, Correlated};
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::time::{Duration, Instant};
use tracing::warn;

/// Generates process-locally unique request ids.
#[derive(Clone, Debug)]
pub struct RequestIdSource {
    ip: String,
    counter: u32,
    modulus: u32,
}

impl RequestIdSource {
    pub fn new(ip: impl Into<String>, modulus: u32) -> Self {
        Self {
            ip: ip.into(),
            counter: 0,
            modulus: modulus.max(1),
        }
    }

    /// The next request id, wrapping after `modulus` requests.
    pub fn next(&mut self) -> String {
        let id = format!("{}:{}", self.ip, self.counter);
        self.counter = (self.counter + 1) % self.modulus;
        id
    }
}

/// Block until one reply per expected id has been collected.
///
/// Replies whose `response_id` is not outstanding are dropped and
/// reception continues. The deadline covers the whole collection; hitting
/// it surfaces [`ClientError::Timeout`].
pub fn collect_responses<R, P>(
    expected: &[String],
    puller: &mut P,
    timeout: Duration,
) -> Result<Vec<R>, ClientError>
where
    R: Correlated + DeserializeOwned,
    P: PullSocket,
{
    let mut outstanding: HashSet<&str> = expected.iter().map(String::as_str).collect();
    let mut responses = Vec::with_capacity(outstanding.len());
    let deadline = Instant::now() + timeout;

    while !outstanding.is_empty() {
        let remaining = deadline
            .checked_duration_since(Instant::now())
            .ok_or(ClientError::Timeout(timeout))?;

        let frame = puller
            .recv_timeout(remaining)?
            .ok_or(ClientError::Timeout(timeout))?;

        let response: R = match decode_message(&frame) {
            Ok(response) => response,
            Err(err) => {
                warn!(%err, "discarding undecodable frame");
                continue;
            }
        };

        if outstanding.remove(response.response_id()) {
            responses.push(response);
        } else {
            warn!(
                response_id = response.response_id(),
                "discarding reply for no outstanding request"
            );
        }
    }

    Ok(responses)
}
