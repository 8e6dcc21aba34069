//! Walk through adding and removing nodes, showing which keys move.

use std::collections::BTreeMap;

use consistent_ring::HashRing;

use clap::Parser;

use tracing::Level;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Virtual nodes per physical node
    #[arg(short, long, default_value_t = 3)]
    replicas: usize,
    /// Number of keys to assign
    #[arg(short, long, default_value_t = 3)]
    keys: usize,
}

fn main() {
    tracing_subscriber::fmt().with_max_level(Level::DEBUG).init();

    let cli = Cli::parse();

    let keys: Vec<String> = (1..=cli.keys).map(|i| format!("K{i}")).collect();

    let mut ring = HashRing::new(cli.replicas).expect("Invalid replica count");
    ring.add_node("S1");
    ring.add_node("S2");
    ring.add_node("S3");

    println!("Initial Distribution:");
    let mut previous = assign(&ring, &keys);
    print(&previous, &previous);

    ring.add_node("S4");
    println!("\nAfter Adding S4:");
    let current = assign(&ring, &keys);
    print(&previous, &current);
    previous = current;

    ring.remove_node("S2");
    println!("\nAfter Removing S2:");
    let current = assign(&ring, &keys);
    print(&previous, &current);
}

fn assign(ring: &HashRing, keys: &[String]) -> BTreeMap<String, String> {
    keys.iter()
        .map(|key| {
            let node = ring
                .lookup(key)
                .map(|node| node.to_string())
                .unwrap_or_else(|_| "-".to_string());

            (key.clone(), node)
        })
        .collect()
}

fn print(previous: &BTreeMap<String, String>, current: &BTreeMap<String, String>) {
    let mut moved = 0;

    for (key, node) in current {
        match previous.get(key) {
            Some(before) if before != node => {
                moved += 1;
                println!("Key {key} is assigned to Node {node} (moved from {before})");
            }
            _ => println!("Key {key} is assigned to Node {node}"),
        }
    }

    println!("{moved}/{} keys moved", current.len());
}
