//! Walkroot CLI - command-line harness for the walkroot engines
//!
//! Usage:
//!   walkroot <file>                      # Report the best start vertex
//!   walkroot - --engine compare          # Read stdin, cross-check engines
//!   walkroot <file> -o json              # Output results as JSON
//!
//! Input format (whitespace separated): the vertex count N, then N weights
//! (vertex ids are assigned 1..N in order), then N-1 unordered id pairs
//! denoting the tree edges.

use std::io::Read;
use std::process;

use clap::{Parser, ValueEnum};
use walkroot_core::{
    compare_engines, dfs, message_passing, EngineError, EngineReport, MessagePassingConfig,
    VertexId, WalkTree,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Engine {
    /// Exact per-root DFS sweep (O(V^2))
    Exact,
    /// Branch-and-bound DFS sweep (fast, approximate)
    Pruned,
    /// All-roots iterative message passing
    MessagePassing,
    /// Run exact and message passing, report both with timings
    Compare,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Output {
    Summary,
    Json,
}

#[derive(Parser)]
#[command(name = "walkroot")]
#[command(version)]
#[command(about = "Find the start vertex minimizing the expected tree traversal cost")]
struct Cli {
    /// Input file, or '-' for stdin
    #[arg(value_name = "FILE")]
    file: String,

    /// Engine to run
    #[arg(short, long, value_enum, default_value_t = Engine::MessagePassing)]
    engine: Engine,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Output::Summary)]
    output: Output,

    /// Run the full round budget instead of stopping on convergence
    #[arg(long)]
    fixed_rounds: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing_subscriber::filter::LevelFilter::DEBUG)
            .with_writer(std::io::stderr)
            .init();
    }

    let source = match read_input(&cli.file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading '{}': {}", cli.file, e);
            process::exit(1);
        }
    };

    let tree = match parse_problem(&source) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Invalid input: {}", e);
            process::exit(1);
        }
    };

    let config = MessagePassingConfig {
        early_stop: !cli.fixed_rounds,
        ..Default::default()
    };

    let result = run(&tree, cli.engine, config);
    match result {
        Ok(outcome) => print_outcome(&outcome, cli.output),
        Err(e) => {
            eprintln!("Engine error: {}", e);
            process::exit(1);
        }
    }
}

enum Outcome {
    Single(EngineReport),
    Comparison(walkroot_core::ComparisonReport),
}

fn run(
    tree: &WalkTree,
    engine: Engine,
    config: MessagePassingConfig,
) -> Result<Outcome, EngineError> {
    match engine {
        Engine::Compare => Ok(Outcome::Comparison(compare_engines(tree, config, true)?)),
        _ => {
            let start = std::time::Instant::now();
            let (name, root) = match engine {
                Engine::Exact => ("dfs", dfs::min_cost_root(tree)?),
                Engine::Pruned => ("dfs-pruned", dfs::min_cost_root_pruned(tree)?),
                Engine::MessagePassing => (
                    "message-passing",
                    message_passing::min_cost_root_with_config(tree, config)?,
                ),
                Engine::Compare => unreachable!(),
            };
            Ok(Outcome::Single(EngineReport {
                engine: name,
                root,
                elapsed: start.elapsed(),
            }))
        }
    }
}

fn read_input(path: &str) -> std::io::Result<String> {
    if path == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path)
    }
}

/// Parses the N / weights / edge-pairs token stream into a tree.
fn parse_problem(source: &str) -> Result<WalkTree, String> {
    let mut tokens = source.split_whitespace();
    let mut next = |what: &str| {
        tokens
            .next()
            .ok_or_else(|| format!("unexpected end of input while reading {what}"))
    };

    let n: u32 = next("vertex count")?
        .parse()
        .map_err(|e| format!("bad vertex count: {e}"))?;

    let mut tree = WalkTree::with_capacity(n as usize);
    for id in 1..=n {
        let weight: f64 = next("vertex weight")?
            .parse()
            .map_err(|e| format!("bad weight for vertex {id}: {e}"))?;
        tree.add_vertex(VertexId(id), weight)
            .map_err(|e| e.to_string())?;
    }
    for _ in 1..n {
        let a: u32 = next("edge endpoint")?
            .parse()
            .map_err(|e| format!("bad edge endpoint: {e}"))?;
        let b: u32 = next("edge endpoint")?
            .parse()
            .map_err(|e| format!("bad edge endpoint: {e}"))?;
        tree.add_undirected_edge(VertexId(a), VertexId(b))
            .map_err(|e| e.to_string())?;
    }
    Ok(tree)
}

fn print_outcome(outcome: &Outcome, output: Output) {
    match (outcome, output) {
        (Outcome::Single(report), Output::Summary) => {
            // The winning vertex id is the answer; everything else is
            // diagnostic detail.
            println!("{}", report.root.vertex);
            eprintln!(
                "engine={} cost={:.6} elapsed={:?}",
                report.engine, report.root.expected_cost, report.elapsed
            );
        }
        (Outcome::Single(report), Output::Json) => {
            println!("{}", serde_json::to_string_pretty(&report_json(report)).unwrap());
        }
        (Outcome::Comparison(report), Output::Summary) => {
            print_report_line(&report.exact);
            print_report_line(&report.message_passing);
            if let Some(pruned) = &report.pruned {
                print_report_line(pruned);
            }
            println!(
                "agreement: {}",
                if report.agreement { "yes" } else { "NO" }
            );
        }
        (Outcome::Comparison(report), Output::Json) => {
            let mut value = serde_json::Map::new();
            value.insert("exact".into(), report_json(&report.exact));
            value.insert(
                "message_passing".into(),
                report_json(&report.message_passing),
            );
            if let Some(pruned) = &report.pruned {
                value.insert("pruned".into(), report_json(pruned));
            }
            value.insert("agreement".into(), report.agreement.into());
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::Value::Object(value)).unwrap()
            );
        }
    }
}

fn print_report_line(report: &EngineReport) {
    println!(
        "{:>16}: vertex={} cost={:.6} elapsed={:?}",
        report.engine, report.root.vertex, report.root.expected_cost, report.elapsed
    );
}

fn report_json(report: &EngineReport) -> serde_json::Value {
    serde_json::json!({
        "engine": report.engine,
        "vertex": report.root.vertex.0,
        "expected_cost": report.root.expected_cost,
        "elapsed_us": report.elapsed.as_micros() as u64,
    })
}
