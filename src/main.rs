mod db;
mod error;
mod output;
mod parser;
mod settings;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use parser::record::Record;
use settings::Settings;

#[derive(Parser)]
#[command(name = "wikipolls", about = "Convert wikitable opinion polls into CSV")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse tables, sort by end date and write CSV
    Convert {
        /// Wikitable files (default: configured files)
        files: Vec<PathBuf>,
        /// Output CSV path
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Also save the polls to the SQLite database
        #[arg(long)]
        db: bool,
    },
    /// Parse tables without writing anything
    Check {
        /// Wikitable files (default: configured files)
        files: Vec<PathBuf>,
    },
    /// Stored polls, newest first
    Overview {
        /// Filter by pollster name (substring)
        #[arg(short, long)]
        pollster: Option<String>,
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
        /// Print JSON lines instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show database statistics
    Stats,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load()?;
    info!(?settings, "settings loaded");

    let result = match cli.command {
        Commands::Convert {
            files,
            output: out,
            db: save_db,
        } => {
            let paths = settings.input_paths(&files);
            let mut records = flatten(load_tables(&paths)?);
            output::sort_by_end_date(&mut records);

            let out = out.unwrap_or_else(|| settings.output.clone());
            output::write_csv_file(&out, &records)?;
            println!("Wrote {} polls to {}", records.len(), out.display());

            if save_db {
                let conn = db::connect(&settings.db_path)?;
                db::init_schema(&conn)?;
                let saved = db::save_records(&conn, &records)?;
                println!("Saved {} polls to {}", saved, settings.db_path.display());
            }
            Ok(())
        }
        Commands::Check { files } => {
            let paths = settings.input_paths(&files);
            let tables = load_tables(&paths)?;
            for table in &tables {
                println!("{:>5} polls  {}", table.records.len(), table.path.display());
            }
            println!("{} polls OK", tables.iter().map(|t| t.records.len()).sum::<usize>());
            Ok(())
        }
        Commands::Overview {
            pollster,
            limit,
            json,
        } => {
            let conn = db::connect(&settings.db_path)?;
            db::init_schema(&conn)?;
            let rows = db::fetch_overview(&conn, pollster.as_deref(), limit)?;
            if rows.is_empty() {
                println!("No polls found. Run 'convert --db' first.");
                return Ok(());
            }
            if json {
                for r in &rows {
                    println!("{}", serde_json::to_string(r)?);
                }
            } else {
                print_overview(&rows);
            }
            Ok(())
        }
        Commands::Stats => {
            let conn = db::connect(&settings.db_path)?;
            db::init_schema(&conn)?;
            let s = db::get_stats(&conn)?;
            println!("Polls:     {}", s.total);
            if let (Some(first), Some(last)) = (s.first_end, s.last_end) {
                println!("Span:      {} .. {}", first, last);
            }
            if !s.by_pollster.is_empty() {
                println!("\n--- Pollsters ---");
                for (name, n) in &s.by_pollster {
                    println!("  {:>4}  {}", n, name);
                }
            }
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

/// Records decoded from one input file, in table order.
struct Table {
    path: PathBuf,
    records: Vec<Record>,
}

/// Parse every file. Files are independent so they run in parallel; each file
/// is decoded top to bottom and the first bad row aborts the whole run.
fn load_tables(paths: &[PathBuf]) -> anyhow::Result<Vec<Table>> {
    use indicatif::{ProgressBar, ProgressStyle};
    use rayon::prelude::*;

    let pb = ProgressBar::new(paths.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let results: Vec<anyhow::Result<Table>> = paths
        .par_iter()
        .map(|path| {
            let table = load_table(path);
            pb.inc(1);
            table
        })
        .collect();
    pb.finish_and_clear();

    // Report the first failure in input order, not completion order.
    results.into_iter().collect()
}

fn load_table(path: &Path) -> anyhow::Result<Table> {
    let name = path.display().to_string();
    let text =
        std::fs::read_to_string(path).with_context(|| format!("failed to read {}", name))?;
    let records = parser::parse_table(&text).map_err(|e| e.in_source(name.clone()))?;
    info!(file = %name, polls = records.len(), "parsed table");
    Ok(Table {
        path: path.to_path_buf(),
        records,
    })
}

fn flatten(tables: Vec<Table>) -> Vec<Record> {
    tables.into_iter().flat_map(|t| t.records).collect()
}

fn print_overview(rows: &[Record]) {
    println!(
        "{:>3} | {:<10} | {:<10} | {:<24} | {:<18} | {:>6} | {:>6} | {:>6} | {:>7}",
        "#", "Start", "End", "Pollster", "Client", "Sample", "Rejoin", "Stay", "Neither"
    );
    println!("{}", "-".repeat(112));

    for (i, r) in rows.iter().enumerate() {
        println!(
            "{:>3} | {:<10} | {:<10} | {:<24} | {:<18} | {:>6} | {:>6} | {:>6} | {:>7}",
            i + 1,
            r.start_date,
            r.end_date,
            truncate(&r.pollster_name, 24),
            truncate(&r.client, 18),
            r.sample_size,
            pct(r.rejoin),
            pct(r.stay_out),
            pct(r.neither),
        );
    }

    println!("\n{} polls", rows.len());
}

fn pct(v: f64) -> String {
    format!("{:.0}%", v * 100.0)
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
