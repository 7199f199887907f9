//! Citrine smoke runner
//!
//! Exercises a running local cluster over TCP: writes and reads an LWW
//! value, then fans a set value out to every replica and merges it back
//! with a quorum read. Expects the routing tier on 127.0.0.1:6450.

use citrine_client::{Client, ClientConfigBuilder, TcpTransport};
use citrine_lattice::{LatticeValue, LwwLattice, SetLattice};
use std::time::{SystemTime, UNIX_EPOCH};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "help" || a == "--help" || a == "-h") {
        print_usage();
        return;
    }

    let routing_address = args.get(1).cloned().unwrap_or_else(|| "127.0.0.1".to_owned());
    let ip = args.get(2).cloned().unwrap_or_else(|| "127.0.0.1".to_owned());

    let config = ClientConfigBuilder::new(routing_address, ip)
        .local(true)
        .build();
    let mut client = match Client::new(TcpTransport::new(), config) {
        Ok(client) => client,
        Err(err) => {
            eprintln!("failed to start client: {err}");
            std::process::exit(1);
        }
    };

    println!("reply endpoint: {}", client.response_address());

    let key = format!("smoke-{}", rand::random::<u32>());
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);

    let lww = LatticeValue::from(LwwLattice::new(timestamp, b"hello".to_vec()));
    match client.put(key.as_str(), &lww) {
        Ok(true) => println!("put {key}: acknowledged"),
        Ok(false) => println!("put {key}: rejected or unaddressable"),
        Err(err) => {
            eprintln!("put {key} failed: {err}");
            std::process::exit(1);
        }
    }

    match client.get(key.as_str()) {
        Ok(result) => match result.get(key.as_bytes()).and_then(Option::as_ref) {
            Some(value) => println!("get {key}: {value:?}"),
            None => println!("get {key}: no value"),
        },
        Err(err) => {
            eprintln!("get {key} failed: {err}");
            std::process::exit(1);
        }
    }

    let members: SetLattice = [b"alpha".to_vec(), b"beta".to_vec()].into_iter().collect();
    let set_key = format!("{key}-set");
    match client.put_all(set_key.as_str(), &LatticeValue::from(members)) {
        Ok(acked) => println!("put_all {set_key}: all replicas acked = {acked}"),
        Err(err) => {
            eprintln!("put_all {set_key} failed: {err}");
            std::process::exit(1);
        }
    }

    match client.get_all(set_key.as_str()) {
        Ok(result) => match result.get(set_key.as_bytes()).and_then(Option::as_ref) {
            Some(value) => println!("get_all {set_key}: {value:?}"),
            None => println!("get_all {set_key}: no value"),
        },
        Err(err) => {
            eprintln!("get_all {set_key} failed: {err}");
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("Usage: citrine-smoke [routing_address] [client_ip]");
    println!();
    println!("Runs a put/get and a put_all/get_all round against a local");
    println!("Citrine cluster. Both addresses default to 127.0.0.1; the");
    println!("routing tier is expected on port 6450.");
}
