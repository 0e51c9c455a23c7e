//! Hare and Hounds CLI - Command-line interface
//!
//! Commands:
//! - play: Play against the computer in the console
//! - match: Play computer-vs-computer games
//! - benchmark: Compare minimax and alpha-beta search
//! - explore: Enumerate every reachable position

mod benchmark;
mod explore;
mod match_cmd;
mod play;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hounds")]
#[command(about = "Hare and Hounds board game with a search-based computer player")]
struct Cli {
    /// Random seed for reproducible matches and benchmarks
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a game against the computer
    Play(play::PlayArgs),
    /// Play computer-vs-computer games
    Match(match_cmd::MatchArgs),
    /// Compare minimax and alpha-beta node counts and timings
    Benchmark(benchmark::BenchmarkArgs),
    /// Enumerate every position reachable from the start
    Explore(explore::ExploreArgs),
}

fn main() -> anyhow::Result<()> {
    // Initialize logging, RUST_LOG overrides the default level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => play::run(args),
        Commands::Match(args) => match_cmd::run(args, cli.seed),
        Commands::Benchmark(args) => benchmark::run(args, cli.seed),
        Commands::Explore(args) => explore::run(args),
    }
}
