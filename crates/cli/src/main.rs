//! Benchmark history CLI entry point.

fn main() {
    if let Err(e) = benchmark_history_cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
