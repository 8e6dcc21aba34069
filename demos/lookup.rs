//! Assign a fixed list of keys to three nodes.

use consistent_ring::HashRing;

use clap::Parser;

use tracing::Level;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Virtual nodes per physical node
    #[arg(short, long, default_value_t = 3)]
    replicas: usize,
    /// Nodes to add to the ring
    #[arg(short, long, value_delimiter = ',', default_value = "Node1,Node2,Node3")]
    nodes: Vec<String>,
}

fn main() {
    tracing_subscriber::fmt()
        // Switch to DEBUG to see nodes being added
        .with_max_level(Level::INFO)
        .init();

    let cli = Cli::parse();

    let mut ring = HashRing::new(cli.replicas).expect("Invalid replica count");

    for node in &cli.nodes {
        ring.add_node(node);
    }

    for virtual_node in ring.virtual_nodes() {
        println!(
            "Virtual node of {} at position {}",
            virtual_node.owner, virtual_node.position.0
        );
    }

    println!();

    for key in (1..=10).map(|i| format!("K{i}")) {
        match ring.lookup(&key) {
            Ok(node) => println!("Key {key} is assigned to Node {node}"),
            Err(error) => println!("Key {key} could not be assigned: {error}"),
        }
    }
}
