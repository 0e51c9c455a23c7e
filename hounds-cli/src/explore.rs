//! Explore command - enumerate every reachable position

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;

use hounds_core::{reachable_positions, summarize, Board, ExploreSummary, Side};

#[derive(Args)]
pub struct ExploreArgs {
    /// Start position, rows separated by '/'; the standard opening if omitted
    #[arg(long)]
    pub start: Option<String>,

    /// Side that moves first
    #[arg(long, default_value = "hound")]
    pub first: Side,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: ExploreArgs) -> Result<()> {
    let start = match &args.start {
        Some(text) => text
            .parse::<Board>()
            .with_context(|| format!("Failed to parse start position: {}", text))?,
        None => Board::new_game(),
    };

    tracing::info!(
        "Exploring positions reachable from {} with the {} to move",
        start.to_string().replace('\n', "/"),
        args.first
    );

    let started = Instant::now();
    let positions = reachable_positions(start, args.first);
    let summary = summarize(&positions);
    tracing::info!("Explored {} positions in {:.2?}", summary.positions, started.elapsed());
    if summary.invariant_violations > 0 {
        tracing::warn!("{} positions break the occupancy invariant", summary.invariant_violations);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_text_summary(&summary);
    }

    Ok(())
}

fn print_text_summary(summary: &ExploreSummary) {
    println!("\n=== Reachable Positions ===");
    println!("Positions:        {}", summary.positions);
    println!("Hare wins:        {}", summary.hare_wins);
    println!("Hound wins:       {}", summary.hound_wins);
    println!("Stuck (passes):   {}", summary.stuck);
    println!("Longest vertical: {}", summary.max_streak);
    println!("Invariant breaks: {}", summary.invariant_violations);
}
