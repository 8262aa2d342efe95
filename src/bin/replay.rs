use clap::Parser;
use flash_avl::workload::{read_ops, LatencyReport};
use flash_avl::{AvlTree, KeyOrder, TreeConfig};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

/// Replay a CSV workload (`op,key,value,end`) and report latencies.
#[derive(Parser, Debug)]
#[command(name = "replay")]
struct Args {
    /// Path to the workload CSV
    path: PathBuf,

    /// Key ordering ("natural" or "reverse")
    #[arg(long, default_value = "natural")]
    ordering: String,

    /// Maximum number of live entries
    #[arg(long)]
    max_entries: Option<u32>,

    /// Check tree invariants after the replay
    #[arg(long)]
    validate: bool,
}

fn run(args: &Args) -> flash_avl::Result<()> {
    let file = File::open(&args.path).map_err(|e| {
        flash_avl::AvlError::InvalidConfig(format!("cannot open {}: {}", args.path.display(), e))
    })?;
    let ops = read_ops(BufReader::new(file))?;
    println!("Loaded {} operations from {}", ops.len(), args.path.display());

    let mut config = TreeConfig::new().ordering(args.ordering.as_str());
    if let Some(max) = args.max_entries {
        config = config.max_entries(max);
    }
    let mut tree: AvlTree<u64, u64, KeyOrder> = AvlTree::from_config(&config)?;

    let mut report = LatencyReport::new();
    let mut touched = 0usize;
    for op in &ops {
        let start = Instant::now();
        touched += std::hint::black_box(op.apply(&mut tree));
        report.record(op.kind(), start.elapsed());
    }

    report.print();
    println!("Entries touched: {}", touched);
    println!("Final size: {} entries, height {}", tree.len(), tree.height());

    if args.validate {
        tree.validate()?;
        println!("Invariants: OK");
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("replay failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
