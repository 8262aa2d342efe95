use clap::Parser;
use flash_avl::workload::{LatencyReport, Op};
use flash_avl::AvlTree;
use std::time::Instant;

/// Synthetic per-operation latency benchmark.
#[derive(Parser, Debug)]
#[command(name = "latency-report")]
struct Args {
    /// Number of measured operations
    #[arg(long, default_value_t = 1_000_000)]
    ops: u64,

    /// Entries loaded before measuring
    #[arg(long, default_value_t = 100_000)]
    preload: u64,

    /// Pin the benchmark thread to the last CPU core
    #[arg(long)]
    pin: bool,
}

/// Scatter sequential ids across the key space (Fibonacci hashing).
#[inline]
fn scatter(i: u64) -> u64 {
    i.wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

fn main() {
    let args = Args::parse();

    if args.pin {
        if let Some(last_core) = core_affinity::get_core_ids().and_then(|ids| ids.last().copied()) {
            core_affinity::set_for_current(last_core);
        }
    }

    println!("Preparing Latency Benchmark...");

    let mut tree: AvlTree<u64, u64> = AvlTree::with_capacity((args.preload + args.ops) as usize);
    for i in 0..args.preload {
        if tree.insert(scatter(i), i).is_err() {
            break;
        }
    }

    println!("Preloaded {} entries, running {} operations...", tree.len(), args.ops);

    let mut report = LatencyReport::new();
    let mut next_id = args.preload;
    let mut oldest_id = 0u64;

    for i in 0..args.ops {
        // Mix: 40% get, 25% insert, 20% delete, 10% floor, 5% ceil
        let op = match i % 20 {
            0..=7 => Op::Get { key: scatter(oldest_id + i % (next_id - oldest_id).max(1)) },
            8..=12 => {
                next_id += 1;
                Op::Insert { key: scatter(next_id), value: next_id }
            }
            13..=16 => {
                oldest_id += 1;
                Op::Delete { key: scatter(oldest_id - 1) }
            }
            17 | 18 => Op::Floor { key: scatter(i) },
            _ => Op::Ceil { key: scatter(i) },
        };

        // Critical measurement section
        let start = Instant::now();
        std::hint::black_box(op.apply(&mut tree));
        report.record(op.kind(), start.elapsed());
    }

    report.print();
    println!("Final size: {} entries, height {}", tree.len(), tree.height());
}
