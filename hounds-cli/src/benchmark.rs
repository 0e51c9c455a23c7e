//! Benchmark command - compare minimax and alpha-beta search
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: sample_positions(), run_depth_benchmarks(), report_results()
//! - Level 3: benchmark_algorithm(), compare_depth()
//! - Level 4: timing utilities, formatting

use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Args;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use hounds_core::{Algorithm, Board, Difficulty, SearchAI, SearchConfig, SearchResult, Side};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct BenchmarkArgs {
    /// Maximum search depth to test
    #[arg(long, default_value = "6")]
    pub depth: u32,

    /// Number of positions searched at each depth
    #[arg(long, default_value = "10")]
    pub positions: usize,

    /// Random plies played from the start to reach each sampled position
    #[arg(long, default_value = "6")]
    pub random_plies: usize,

    /// Difficulty used by both algorithms, 1-10
    #[arg(long, default_value = "10")]
    pub difficulty: u8,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Totals for one algorithm at one depth
#[derive(Clone, Debug)]
struct BenchmarkResult {
    name: String,
    depth: u32,
    positions: usize,
    nodes: u64,
    cutoffs: u64,
    total_time: Duration,
}

/// Minimax and alpha-beta side by side at one depth
#[derive(Clone, Debug)]
struct DepthComparison {
    minimax: BenchmarkResult,
    alpha_beta: BenchmarkResult,
    #[cfg(feature = "parallel")]
    parallel: BenchmarkResult,
    /// Positions where both algorithms returned the same score and move
    agreements: usize,
}

/// All benchmark results
#[derive(Clone, Debug)]
struct AllResults {
    depths: Vec<DepthComparison>,
    system_info: String,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run benchmark command
///
/// 1. Sample positions with seeded random play
/// 2. Search every position with both algorithms at each depth
/// 3. Report node counts, timings and agreement
pub fn run(args: BenchmarkArgs, seed: Option<u64>) -> Result<()> {
    let difficulty = Difficulty::new(args.difficulty)?;
    tracing::info!(
        "Starting benchmarks: {} positions, max depth {}, difficulty {}",
        args.positions,
        args.depth,
        difficulty.level()
    );

    let mut rng = create_rng(seed);
    let positions = sample_positions(args.positions, args.random_plies, &mut rng);

    let results = AllResults {
        depths: run_depth_benchmarks(&positions, args.depth, difficulty),
        system_info: get_system_info(),
    };

    report_results(&results, &args);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Undecided positions reached by random play; the first is always the start
fn sample_positions(count: usize, random_plies: usize, rng: &mut ChaCha8Rng) -> Vec<(Board, Side)> {
    let mut positions = Vec::with_capacity(count);
    if count == 0 {
        return positions;
    }
    positions.push((Board::new_game(), Side::Hound));

    // at most 100 draws per requested position
    let mut attempts = 0;
    while positions.len() < count && attempts < count * 100 {
        attempts += 1;
        let (board, to_move) = random_position(random_plies, rng);
        if !board.is_terminal() {
            positions.push((board, to_move));
        }
    }

    positions
}

/// Run both algorithms at depths 1 through `max_depth`
fn run_depth_benchmarks(
    positions: &[(Board, Side)],
    max_depth: u32,
    difficulty: Difficulty,
) -> Vec<DepthComparison> {
    (1..=max_depth)
        .map(|depth| {
            tracing::info!("Benchmarking depth {}...", depth);
            compare_depth(positions, depth, difficulty)
        })
        .collect()
}

/// Report all benchmark results
fn report_results(results: &AllResults, args: &BenchmarkArgs) {
    if args.json {
        print_json_results(results);
    } else {
        print_text_results(results);
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Search every position with both algorithms and count agreements
fn compare_depth(
    positions: &[(Board, Side)],
    depth: u32,
    difficulty: Difficulty,
) -> DepthComparison {
    let (minimax, minimax_results) =
        benchmark_algorithm(positions, Algorithm::Minimax, depth, difficulty);
    let (alpha_beta, alpha_beta_results) =
        benchmark_algorithm(positions, Algorithm::AlphaBeta, depth, difficulty);

    let agreements = minimax_results
        .iter()
        .zip(&alpha_beta_results)
        .filter(|(a, b)| same_choice(a, b))
        .count();

    if agreements < positions.len() {
        tracing::warn!(
            "depth {}: algorithms disagree on {} of {} positions",
            depth,
            positions.len() - agreements,
            positions.len()
        );
    }

    DepthComparison {
        minimax,
        alpha_beta,
        #[cfg(feature = "parallel")]
        parallel: benchmark_parallel(positions, depth, difficulty),
        agreements,
    }
}

/// Time one algorithm over every position
fn benchmark_algorithm(
    positions: &[(Board, Side)],
    algorithm: Algorithm,
    depth: u32,
    difficulty: Difficulty,
) -> (BenchmarkResult, Vec<SearchResult>) {
    let start = Instant::now();
    let searches: Vec<SearchResult> = positions
        .iter()
        .map(|(board, to_move)| {
            searcher(algorithm, depth, difficulty, *to_move).search_from(board, *to_move)
        })
        .collect();
    let total_time = start.elapsed();

    let result = BenchmarkResult {
        name: algorithm.to_string(),
        depth,
        positions: positions.len(),
        nodes: searches.iter().map(|s| s.stats.nodes).sum(),
        cutoffs: searches.iter().map(|s| s.stats.cutoffs).sum(),
        total_time,
    };
    (result, searches)
}

#[cfg(feature = "parallel")]
fn benchmark_parallel(
    positions: &[(Board, Side)],
    depth: u32,
    difficulty: Difficulty,
) -> BenchmarkResult {
    let start = Instant::now();
    let searches: Vec<SearchResult> = positions
        .iter()
        .map(|(board, to_move)| {
            searcher(Algorithm::Minimax, depth, difficulty, *to_move)
                .search_parallel(board, *to_move)
        })
        .collect();

    BenchmarkResult {
        name: "minimax (parallel)".to_string(),
        depth,
        positions: positions.len(),
        nodes: searches.iter().map(|s| s.stats.nodes).sum(),
        cutoffs: 0,
        total_time: start.elapsed(),
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn searcher(algorithm: Algorithm, depth: u32, difficulty: Difficulty, side: Side) -> SearchAI {
    SearchAI::new(SearchConfig {
        algorithm,
        depth,
        difficulty,
        computer: side,
    })
}

/// Play random legal moves from the start; a stuck side passes
fn random_position(plies: usize, rng: &mut ChaCha8Rng) -> (Board, Side) {
    let mut board = Board::new_game();
    let mut to_move = Side::Hound;

    for _ in 0..plies {
        if board.is_terminal() {
            break;
        }
        if let Some(mv) = board.random_move(to_move, rng) {
            match board.apply_move(to_move, mv) {
                Ok(next) => board = next,
                Err(_) => break,
            }
        }
        to_move = to_move.opponent();
    }

    (board, to_move)
}

fn same_choice(a: &SearchResult, b: &SearchResult) -> bool {
    a.best_move == b.best_move && (a.score - b.score).abs() < 1e-4
}

/// Create RNG from seed or random
fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Get system information string
fn get_system_info() -> String {
    format!(
        "hounds {}, {} CPUs",
        env!("CARGO_PKG_VERSION"),
        std::thread::available_parallelism()
            .map(|p| p.get())
            .unwrap_or(1)
    )
}

/// Format duration for display
fn format_duration(d: Duration) -> String {
    if d.as_secs() >= 60 {
        let seconds = (d.as_secs() % 60) as f64 + d.subsec_millis() as f64 / 1000.0;
        format!("{}m {:.1}s", d.as_secs() / 60, seconds)
    } else if d.as_secs() >= 1 {
        format!("{:.2}s", d.as_secs_f64())
    } else if d.as_millis() >= 1 {
        format!("{:.1}ms", d.as_secs_f64() * 1000.0)
    } else {
        format!("{:.1}us", d.as_secs_f64() * 1_000_000.0)
    }
}

/// Fraction of minimax nodes that alpha-beta skipped
fn pruned_fraction(comparison: &DepthComparison) -> f64 {
    if comparison.minimax.nodes == 0 {
        return 0.0;
    }
    1.0 - comparison.alpha_beta.nodes as f64 / comparison.minimax.nodes as f64
}

fn rows(comparison: &DepthComparison) -> Vec<&BenchmarkResult> {
    #[allow(unused_mut)]
    let mut rows = vec![&comparison.minimax, &comparison.alpha_beta];
    #[cfg(feature = "parallel")]
    rows.push(&comparison.parallel);
    rows
}

/// Print results as JSON
fn print_json_results(results: &AllResults) {
    #[derive(serde::Serialize)]
    struct JsonBenchmark {
        name: String,
        depth: u32,
        positions: usize,
        nodes: u64,
        cutoffs: u64,
        total_time_ms: f64,
    }

    #[derive(serde::Serialize)]
    struct JsonDepth {
        depth: u32,
        agreements: usize,
        pruned_fraction: f64,
        runs: Vec<JsonBenchmark>,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput {
        system_info: String,
        depths: Vec<JsonDepth>,
    }

    let output = JsonOutput {
        system_info: results.system_info.clone(),
        depths: results
            .depths
            .iter()
            .map(|c| JsonDepth {
                depth: c.minimax.depth,
                agreements: c.agreements,
                pruned_fraction: pruned_fraction(c),
                runs: rows(c)
                    .into_iter()
                    .map(|r| JsonBenchmark {
                        name: r.name.clone(),
                        depth: r.depth,
                        positions: r.positions,
                        nodes: r.nodes,
                        cutoffs: r.cutoffs,
                        total_time_ms: r.total_time.as_secs_f64() * 1000.0,
                    })
                    .collect(),
            })
            .collect(),
    };

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

/// Print results as text table
fn print_text_results(results: &AllResults) {
    println!("\n=== Hare and Hounds Search Benchmark ===");
    println!("System: {}\n", results.system_info);

    println!(
        "{:<20} {:>6} {:>10} {:>12} {:>10} {:>12}",
        "Algorithm", "Depth", "Positions", "Nodes", "Cutoffs", "Total Time"
    );
    println!("{}", "-".repeat(75));

    for comparison in &results.depths {
        for r in rows(comparison) {
            println!(
                "{:<20} {:>6} {:>10} {:>12} {:>10} {:>12}",
                r.name,
                r.depth,
                r.positions,
                r.nodes,
                r.cutoffs,
                format_duration(r.total_time)
            );
        }
        println!(
            "  agreement {}/{}, alpha-beta skipped {:.1}% of nodes",
            comparison.agreements,
            comparison.minimax.positions,
            pruned_fraction(comparison) * 100.0
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert!(format_duration(Duration::from_millis(500)).contains("ms"));
        assert!(format_duration(Duration::from_secs(5)).contains("s"));
        assert!(format_duration(Duration::from_secs(90)).contains("m"));
    }

    #[test]
    fn test_sample_positions() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let positions = sample_positions(5, 6, &mut rng);
        assert_eq!(positions.len(), 5);
        assert_eq!(positions[0], (Board::new_game(), Side::Hound));
        assert!(positions.iter().all(|(board, _)| !board.is_terminal()));
    }

    #[test]
    fn test_algorithms_agree() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let positions = sample_positions(4, 5, &mut rng);
        let difficulty = Difficulty::new(10).unwrap();

        for depth in 1..=3 {
            let comparison = compare_depth(&positions, depth, difficulty);
            assert_eq!(comparison.agreements, positions.len());
            assert!(comparison.alpha_beta.nodes <= comparison.minimax.nodes);
            assert!(pruned_fraction(&comparison) >= 0.0);
        }
    }

    #[test]
    fn test_get_system_info() {
        let info = get_system_info();
        assert!(info.contains("hounds"));
        assert!(info.contains("CPUs"));
    }
}
