//! Mock routing tier and storage workers for driving the client
//! end-to-end over the in-memory transport.

use citrine_client::{
    Client, ClientConfigBuilder, MemoryTransport, PullSocket, PushSocket, Transport,
};
use citrine_lattice::LatticeValue;
use citrine_proto::{
    decode_message, deserialize_lattice, encode_message, serialize_lattice, KeyAddress,
    KeyAddressRequest, KeyAddressResponse, KeyRequest, KeyResponse, KeyTuple, RequestType,
    TupleError,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

const POLL: Duration = Duration::from_millis(20);

/// A client wired to the shared hub, in local mode.
pub fn client(hub: &MemoryTransport, thread_offset: u16) -> Client<MemoryTransport> {
    let config = ClientConfigBuilder::new("127.0.0.1", "127.0.0.1")
        .local(true)
        .thread_offset(thread_offset)
        .request_timeout(Duration::from_secs(2))
        .build();
    Client::new(hub.clone(), config).unwrap()
}

/// A routing tier serving a fixed key → worker-address table.
pub struct MockRouting {
    pub queries: Arc<AtomicUsize>,
    stop: Arc<AtomicBool>,
}

impl Drop for MockRouting {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
    }
}

pub fn spawn_routing(
    hub: &MemoryTransport,
    table: HashMap<Vec<u8>, Vec<String>>,
) -> MockRouting {
    let mut puller = hub.bind_pull("tcp://127.0.0.1:6450").unwrap();
    let hub = hub.clone();
    let queries = Arc::new(AtomicUsize::new(0));
    let stop = Arc::new(AtomicBool::new(false));

    {
        let queries = Arc::clone(&queries);
        let stop = Arc::clone(&stop);
        thread::spawn(move || {
            while !stop.load(Ordering::SeqCst) {
                let Ok(Some(frame)) = puller.recv_timeout(POLL) else {
                    continue;
                };
                let request: KeyAddressRequest = decode_message(&frame).unwrap();
                queries.fetch_add(1, Ordering::SeqCst);

                let addresses = request
                    .keys
                    .iter()
                    .map(|key| KeyAddress {
                        key: key.clone(),
                        ips: table.get(key).cloned().unwrap_or_default(),
                    })
                    .collect();
                let response = KeyAddressResponse {
                    response_id: request.request_id,
                    error: 0,
                    addresses,
                };

                let mut push = hub.connect_push(&request.response_address).unwrap();
                push.send(&encode_message(&response).unwrap()).unwrap();
            }
        });
    }

    MockRouting { queries, stop }
}

#[derive(Default)]
pub struct WorkerOptions {
    /// The first N responses carry the invalidate flag.
    pub invalidate_times: usize,
    /// Respond to everything with this error instead of serving it.
    pub respond_error: Option<TupleError>,
}

/// One storage replica with its own in-memory store.
pub struct MockWorker {
    pub store: Arc<Mutex<HashMap<Vec<u8>, LatticeValue>>>,
    pub puts: Arc<AtomicUsize>,
    stop: Arc<AtomicBool>,
}

impl MockWorker {
    /// Seed a value directly into the replica's store.
    pub fn seed(&self, key: &[u8], value: LatticeValue) {
        self.store.lock().unwrap().insert(key.to_vec(), value);
    }
}

impl Drop for MockWorker {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
    }
}

pub fn spawn_worker(hub: &MemoryTransport, addr: &str, options: WorkerOptions) -> MockWorker {
    let mut puller = hub.bind_pull(addr).unwrap();
    let hub = hub.clone();
    let store = Arc::new(Mutex::new(HashMap::new()));
    let puts = Arc::new(AtomicUsize::new(0));
    let stop = Arc::new(AtomicBool::new(false));

    {
        let store = Arc::clone(&store);
        let puts = Arc::clone(&puts);
        let stop = Arc::clone(&stop);
        thread::spawn(move || {
            let mut invalidate_left = options.invalidate_times;
            while !stop.load(Ordering::SeqCst) {
                let Ok(Some(frame)) = puller.recv_timeout(POLL) else {
                    continue;
                };
                let request: KeyRequest = decode_message(&frame).unwrap();
                let mut response = KeyResponse::new(request.request_id.clone());

                for tuple in &request.tuples {
                    let mut out = KeyTuple::for_key(tuple.key.clone());

                    if let Some(error) = options.respond_error {
                        out.error = error;
                    } else {
                        match request.request_type {
                            RequestType::Get => {
                                match store.lock().unwrap().get(&tuple.key) {
                                    Some(value) => {
                                        let (payload, kind) =
                                            serialize_lattice(value).unwrap();
                                        out.set_payload(payload, kind);
                                    }
                                    None => out.error = TupleError::KeyMissing,
                                }
                            }
                            RequestType::Put => {
                                puts.fetch_add(1, Ordering::SeqCst);
                                let incoming = deserialize_lattice(
                                    &tuple.payload,
                                    tuple.lattice_type.unwrap(),
                                )
                                .unwrap();
                                let mut store = store.lock().unwrap();
                                match store.get_mut(&tuple.key) {
                                    Some(existing) => existing.merge(&incoming).unwrap(),
                                    None => {
                                        store.insert(tuple.key.clone(), incoming);
                                    }
                                }
                            }
                        }
                    }

                    if invalidate_left > 0 {
                        out.invalidate = true;
                        invalidate_left -= 1;
                    }
                    response.tuples.push(out);
                }

                let mut push = hub.connect_push(&request.response_address).unwrap();
                push.send(&encode_message(&response).unwrap()).unwrap();
            }
        });
    }

    MockWorker { store, puts, stop }
}
