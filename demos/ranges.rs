//! Weighted nodes on a low resolution (MD5 modulo 1000) ring: ranges covered by each node,
//! and a histogram of where a batch of keys ends up.

use std::collections::BTreeMap;

use consistent_ring::{hash::Md5, hash::Modulo, HashRing, PositionFunction};

use clap::Parser;
use histo::Histogram;

use tracing::Level;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Size of the low resolution key space
    #[arg(short, long, default_value_t = 1000)]
    modulus: u32,
    /// Number of keys to distribute
    #[arg(short, long, default_value_t = 10_000)]
    keys: usize,
    /// Print every virtual node range
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let cli = Cli::parse();

    let position_fn = Modulo::new(Md5, cli.modulus).expect("Invalid modulus");

    let mut ring = HashRing::builder()
        .position_fn(position_fn)
        .build()
        .expect("Invalid configuration");

    ring.add_node_with_replicas("S1", 20).expect("Invalid replicas");
    ring.add_node_with_replicas("S2", 5).expect("Invalid replicas");
    ring.add_node_with_replicas("S3", 20).expect("Invalid replicas");

    for (node, replicas) in ring.nodes() {
        println!(
            "Node {node} has {replicas} virtual nodes, owns {} positions",
            ring.owned(node)
        );
    }

    let report = ring.range_report();

    if cli.verbose {
        for range in report.ranges() {
            println!(
                "Node {} covers range {} - {}",
                range.owner, range.start.0, range.end.0
            );
        }
    }

    println!();
    for (node, total) in report.totals() {
        println!(
            "Node {node} covers a total of {total} values ({:.1}%)",
            report.share(node) * 100.0
        );
    }

    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    let mut histogram = Histogram::with_buckets(10);

    for i in 0..cli.keys {
        let key = format!("K{i}");
        let position = ring.position_fn().position(key.as_bytes());

        histogram.add(position.0 as u64);

        if let Ok(node) = ring.lookup(&key) {
            *counts.entry(node.to_string()).or_default() += 1;
        }
    }

    println!();
    for (node, count) in &counts {
        println!(
            "Node {node} was assigned {count} keys ({:.1}%)",
            *count as f64 / cli.keys as f64 * 100.0
        );
    }

    println!("\nKey positions:\n{histogram}");
}
