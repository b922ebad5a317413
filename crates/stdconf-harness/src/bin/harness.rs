//! CLI entrypoint for the stdconf conformance harness.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use stdconf_harness::rng::parse_seed;
use stdconf_harness::structured_log::{LogEmitter, now_utc, validate_log_file};
use stdconf_harness::{CaseDriver, CaseRegistry, ConformanceReport, RunConfig, Selection};

/// Conformance tooling for stdconf-core.
#[derive(Debug, Parser)]
#[command(name = "stdconf-harness")]
#[command(about = "Conformance testing harness for stdconf-core")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List registered cases.
    List {
        /// Emit JSON instead of one line per case.
        #[arg(long)]
        json: bool,
    },
    /// Run cases and report verdicts.
    Run {
        /// Run seed (decimal or 0x...).
        #[arg(long, default_value = "0xDEAD_BEEF", value_parser = parse_seed)]
        seed: u64,
        /// Case id to run; repeatable. Defaults to every case.
        #[arg(long = "case")]
        cases: Vec<String>,
        /// Only run cases carrying this tag; repeatable.
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Skip cases carrying this tag; repeatable.
        #[arg(long = "skip-tag")]
        skip_tags: Vec<String>,
        /// Keep running after a failing case.
        #[arg(long)]
        keep_going: bool,
        /// Campaign name used in trace ids and the report.
        #[arg(long, default_value = "stdconf")]
        campaign: String,
        /// Output report path (markdown). A JSON report is written alongside.
        #[arg(long)]
        report: Option<PathBuf>,
        /// Structured JSONL log path.
        #[arg(long)]
        log: Option<PathBuf>,
        /// Optional fixed timestamp string for deterministic report generation.
        #[arg(long)]
        timestamp: Option<String>,
    },
    /// List the compile-time contracts proven by this build.
    StaticContracts {
        /// Output JSON path (if omitted, prints to stdout).
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Validate a structured JSONL log.
    ValidateLog {
        /// Structured JSONL log path.
        #[arg(long)]
        log: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::List { json } => {
            let registry = CaseRegistry::standard()?;
            if json {
                let rows: Vec<_> = registry
                    .iter()
                    .map(|case| {
                        serde_json::json!({
                            "id": case.id,
                            "clause": case.clause,
                            "description": case.description,
                            "tags": case.tags,
                            "parameter_sets": case.parameter_sets.len(),
                            "expected": case.expected,
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                for case in registry.iter() {
                    println!(
                        "{}\t{}\t[{}]\t{} parameter sets",
                        case.id,
                        case.clause,
                        case.tags.join(","),
                        case.parameter_sets.len()
                    );
                }
            }
        }
        Command::Run {
            seed,
            cases,
            tags,
            skip_tags,
            keep_going,
            campaign,
            report,
            log,
            timestamp,
        } => {
            let registry = CaseRegistry::standard()?;
            let selection = Selection {
                cases,
                tags,
                skip_tags,
            };
            let driver = CaseDriver::new(RunConfig {
                campaign: campaign.clone(),
                seed,
                keep_going,
            });

            eprintln!("Running conformance cases with seed {seed:#x}");
            let mut emitter = match &log {
                Some(path) => Some(LogEmitter::to_file(path, &campaign, &format!("{seed:016x}"))?),
                None => None,
            };
            let summary = driver.run_all(&registry, &selection, emitter.as_mut())?;

            for verdict in &summary.verdicts {
                let status = if verdict.passed() { "PASS" } else { "FAIL" };
                eprintln!("{status} {} [{}]", verdict.case_id, verdict.clause);
                if let Some(failure) = &verdict.failure {
                    eprintln!(
                        "  parameter set #{} {}: {}",
                        failure.parameter_index, failure.parameter_set, failure.message
                    );
                    if let Some(diff) = &failure.diff {
                        eprint!("{diff}");
                    }
                }
            }
            for id in &summary.not_run {
                eprintln!("SKIP {id} (not run after failure)");
            }
            eprintln!(
                "Verification complete: total={}, passed={}, failed={}, not_run={}",
                summary.total,
                summary.passed,
                summary.failed,
                summary.not_run.len()
            );
            eprintln!("Verdict fingerprint: {}", summary.fingerprint());
            if let Some(path) = &log {
                eprintln!("Wrote structured log to {}", path.display());
            }

            let report_doc = ConformanceReport::new(
                "stdconf Conformance Report",
                campaign,
                seed,
                timestamp.unwrap_or_else(now_utc),
                summary,
            )
            .with_static_contracts(stdconf_harness::static_checks::static_contracts());

            if let Some(report_path) = report {
                eprintln!("Writing report to {}", report_path.display());
                if let Some(parent) = report_path.parent()
                    && !parent.as_os_str().is_empty()
                {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(&report_path, report_doc.to_markdown())?;
                let json_path = report_path.with_extension("json");
                std::fs::write(&json_path, report_doc.to_json())?;
            }

            if !report_doc.summary.all_passed() {
                return Err("Conformance verification failed".into());
            }
        }
        Command::StaticContracts { output } => {
            let contracts = stdconf_harness::static_checks::static_contracts();
            let json = serde_json::to_string_pretty(&contracts)?;
            if let Some(path) = output {
                std::fs::write(&path, json)?;
                eprintln!(
                    "Wrote {} static contracts to {}",
                    contracts.len(),
                    path.display()
                );
            } else {
                println!("{json}");
            }
        }
        Command::ValidateLog { log } => {
            let (lines, errors) = validate_log_file(&log)?;
            for error in &errors {
                eprintln!("{error}");
            }
            eprintln!(
                "Validated {lines} log lines in {}: {} errors",
                log.display(),
                errors.len()
            );
            if !errors.is_empty() {
                return Err("Structured log validation failed".into());
            }
        }
    }

    Ok(())
}
