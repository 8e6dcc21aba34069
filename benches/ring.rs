//! Micro-benchmarks for HashRing operations: add, lookup, range report and remove
//! at varying ring sizes. Reports nanoseconds-per-operation.
//!
//! Run: `cargo bench --bench ring`

use consistent_ring::HashRing;
use std::time::Instant;

const REPLICAS: usize = 100;

fn main() {
    println!("ring\n");

    bench_add();
    bench_lookup();
    bench_range_report();
    bench_remove();
}

fn ring_with(nodes: usize) -> HashRing {
    let mut ring = HashRing::new(REPLICAS).expect("valid replicas");
    for i in 0..nodes {
        ring.add_node(&format!("node-{i}"));
    }
    ring
}

fn bench_add() {
    println!("add ({REPLICAS} replicas)");

    for size in [0, 10, 100] {
        let mut ring = ring_with(size);

        let fresh: Vec<_> = (0..100).map(|i| format!("fresh-{i}")).collect();
        let start = Instant::now();
        for node in &fresh {
            ring.add_node(node);
        }
        let per_op = start.elapsed().as_nanos() / fresh.len() as u128;
        println!("{size:>4} nodes: {per_op}ns/op (final size: {})", ring.len());
    }
}

fn bench_lookup() {
    println!("\nlookup");

    let keys: Vec<_> = (0..100_000).map(|i| format!("key-{i}")).collect();

    for size in [1, 10, 100, 1000] {
        let ring = ring_with(size);

        let start = Instant::now();
        let mut found = 0;
        for key in &keys {
            if ring.lookup(key).is_ok() {
                found += 1;
            }
        }
        let per_op = start.elapsed().as_nanos() / keys.len() as u128;
        println!("{size:>4} nodes: {per_op}ns/op ({found} found)");
    }
}

fn bench_range_report() {
    println!("\nrange_report");

    for size in [10, 100, 1000] {
        let ring = ring_with(size);

        let start = Instant::now();
        let report = ring.range_report();
        println!(
            "{size:>4} nodes: {:?} ({} ranges)",
            start.elapsed(),
            report.ranges().len()
        );
    }
}

fn bench_remove() {
    println!("\nremove");

    for size in [10, 100, 1000] {
        let mut ring = ring_with(size);

        let start = Instant::now();
        for i in 0..size {
            ring.remove_node(&format!("node-{i}"));
        }
        let per_op = start.elapsed().as_nanos() / size as u128;
        println!("{size:>4} nodes: {per_op}ns/op (final size: {})", ring.len());
    }
}
