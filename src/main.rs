//! Vanity Contract Address Search CLI
//!
//! Usage:
//!   deploy_vanity create -p 0xFFFF00
//!   deploy_vanity create2 -p 0xFFFF00 --deployer 0x4e59... --init-code-hash 3ba2...

use std::io::Write;
use std::sync::atomic::Ordering;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use deploy_vanity::{Config, Found, ProgressStats, SearchError, SearchMode, Searcher};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::parse();
    let task = config.search_task().context("Configuration error")?;

    let searcher = Searcher::new(task, config.worker_count())
        .context("Failed to start workers")?
        .with_report_interval(config.report_interval())
        .with_limits(config.limits());

    let task = searcher.task();
    println!("Vanity Contract Address Search");
    println!("==============================");
    println!("Mode:       {}", task.mode);
    println!("Prefix:     {}", task.prefix);
    if task.prefix.is_empty() {
        println!("            (empty prefix, any address matches)");
    }
    println!("Difficulty: {}", task.prefix.difficulty_description());
    println!("Workers:    {}", searcher.num_workers());
    println!(
        "Per round:  {} ({} per worker)",
        format_number(searcher.iterations_per_round()),
        format_number(task.iterations)
    );
    println!();

    let stop_flag = searcher.stop_flag_clone();
    ctrlc::set_handler(move || {
        stop_flag.store(true, Ordering::Relaxed);
    })
    .context("Error setting Ctrl-C handler")?;

    let mode = searcher.task().mode.clone();
    println!("Searching... (Press Ctrl+C to stop after the current round)\n");

    match searcher.run(print_progress) {
        Ok(found) => {
            print_result(&mode, &found);
            Ok(())
        }
        Err(SearchError::Stopped { reason, stats }) => {
            println!("\nStopped: {}.", reason);
            print_stats(&stats);
            Ok(())
        }
        Err(e) => Err(e).context("Search failed"),
    }
}

fn print_result(mode: &SearchMode, found: &Found) {
    let result = &found.result;
    println!("\n\nFound matching addresses!");
    println!("{}: {}", mode.secret_label(), result.secret_hex());
    match mode {
        SearchMode::Create { .. } => {
            if let Some(sender) = &result.sender {
                println!("Deployer Address: {}", sender);
            }
        }
        SearchMode::Create2 { deployer, .. } => {
            println!("Deployer Address: {}", deployer);
        }
    }
    println!("Contract Address: {}", result.contract);
    print_stats(&found.stats);
}

fn print_progress(stats: &ProgressStats) {
    print!(
        "\r[{:>4}s] Speed: {} iterations/second ({} tried)",
        stats.elapsed.as_secs(),
        format_number(stats.rate() as u64),
        format_number(stats.iterations)
    );
    let _ = std::io::stdout().flush();
}

fn print_stats(stats: &ProgressStats) {
    println!("\n--- Final Statistics ---");
    println!("Rounds:           {}", stats.rounds);
    println!("Total iterations: {}", format_number(stats.iterations));
    println!("Time elapsed:     {:.2}s", stats.elapsed.as_secs_f64());
    println!("Average speed:    {}/s", format_number(stats.rate() as u64));
}

fn format_number(n: u64) -> String {
    if n >= 1_000_000_000 {
        format!("{:.2}B", n as f64 / 1_000_000_000.0)
    } else if n >= 1_000_000 {
        format!("{:.2}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.2}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}
