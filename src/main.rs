//! Agentboard - AI-agent issue workflow dashboard
//!
//! A terminal dashboard that polls the workflow backend and shows which
//! issues have a PR ready, failing tests, or low code quality.
//!
//! ## Usage
//!
//! ```bash
//! # Start the TUI dashboard
//! agentboard
//!
//! # Against another backend, refreshing every 5 seconds
//! agentboard --base-url http://workflow.internal:5050 --poll-interval-ms 5000
//!
//! # One-shot fetch, printed as JSON
//! agentboard snapshot --filter lowSonar --json
//!
//! # Trigger a workflow run
//! agentboard run-tasks --assignee AI-Agent
//! ```

use std::io::Write;
use std::panic;
use std::path::PathBuf;
use std::process::ExitCode;

use agentboard_client::{IssueSource, WorkflowClient};
use agentboard_config::BoardConfig;
use agentboard_core::{
    init_logging, AlertKind, BoardError, DerivedView, IssueFilter, IssueRecord, LogGuard, Stage,
};
use agentboard_tui::alert_panel::format_alert_summary_narrow;
use agentboard_tui::App;
use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{error, info};

/// Agentboard issue workflow dashboard
///
/// Watches AI agents move issues through planning, coding, review,
/// auto-fix and PR creation.
#[derive(Parser, Debug)]
#[command(name = "agentboard")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging (increases log level)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Directory for log files (defaults to ~/.agentboard/logs/)
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Config file (defaults to ~/.agentboard/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Workflow backend base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Refresh interval in milliseconds
    #[arg(long)]
    poll_interval_ms: Option<u64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch issues once and print the derived view
    Snapshot {
        /// all, prReady, failedTests or lowSonar
        #[arg(long, default_value = "all")]
        filter: IssueFilter,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Ask the backend to run the workflow for an assignee
    RunTasks {
        /// Assignee whose tasks should run (defaults to the configured one)
        #[arg(long)]
        assignee: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // The dashboard owns the terminal, so only subcommands log to stderr.
    let console = cli.command.is_some();
    let _guard = match setup_logging(&cli, console) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            return ExitCode::from(1);
        }
    };

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {:#}", e);
            eprintln!("Error: {:#}", e);
            let board_error = e.downcast_ref::<BoardError>();
            if let Some(hint) = board_error.and_then(BoardError::guidance) {
                eprintln!("Hint: {}", hint);
            }
            return if board_error.is_some_and(BoardError::is_config_error) {
                ExitCode::from(2)
            } else {
                ExitCode::from(1)
            };
        }
    };

    match cli.command {
        Some(command) => match run_command(command, &config) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!("Command failed: {:#}", e);
                eprintln!("Error: {:#}", e);
                ExitCode::from(1)
            }
        },
        None => {
            install_panic_hook();
            info!(base_url = %config.backend.base_url, "Starting agentboard dashboard");

            match run_app(&config) {
                Ok(()) => {
                    info!("Agentboard dashboard exited normally");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    error!("Agentboard dashboard error: {}", e);
                    eprintln!("Error: {}", e);
                    ExitCode::from(1)
                }
            }
        }
    }
}

/// Install a panic hook that restores the terminal before printing the panic message.
fn install_panic_hook() {
    let original_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));
}

/// Restore terminal to its normal state.
fn restore_terminal() -> std::io::Result<()> {
    let mut stdout = std::io::stdout();

    let _ = crossterm::terminal::disable_raw_mode();

    crossterm::execute!(
        stdout,
        crossterm::terminal::LeaveAlternateScreen,
        crossterm::event::DisableFocusChange
    )?;
    crossterm::execute!(stdout, crossterm::cursor::Show)?;
    stdout.flush()?;

    Ok(())
}

fn setup_logging(cli: &Cli, console: bool) -> agentboard_core::Result<LogGuard> {
    init_logging(cli.log_dir.clone(), cli.verbose > 0, console)
}

/// Config file first, then command-line overrides.
fn load_config(cli: &Cli) -> anyhow::Result<BoardConfig> {
    let mut config = match &cli.config {
        Some(path) => BoardConfig::load_from(path)?,
        None => BoardConfig::load()?,
    };

    if let Some(url) = &cli.base_url {
        config.backend = config.backend.with_base_url(url.as_str());
    }
    if let Some(ms) = cli.poll_interval_ms {
        config.dashboard.poll_interval_ms = ms;
    }

    config.validate()?;
    Ok(config)
}

fn run_app(config: &BoardConfig) -> agentboard_tui::AppResult<()> {
    let mut app = App::from_config(config)?;
    app.run()
}

fn run_command(command: Command, config: &BoardConfig) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    let client = WorkflowClient::new(&config.backend)?;

    match command {
        Command::Snapshot { filter, json } => {
            let issues = runtime
                .block_on(client.fetch_issues())
                .with_context(|| format!("fetching issues from {}", client.base_url()))?;
            info!(count = issues.len(), filter = filter.name(), "Fetched issues");

            let view = DerivedView::compute(&issues, filter);
            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print_view(&view, issues.len());
            }
        }
        Command::RunTasks { assignee, json } => {
            let assignee = assignee.unwrap_or_else(|| config.backend.assignee.clone());
            let results = runtime
                .block_on(client.run_tasks(&assignee))
                .with_context(|| format!("running tasks for {assignee}"))?;
            info!(count = results.len(), assignee = %assignee, "Run finished");

            if json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                println!("{} issue(s) returned for {}", results.len(), assignee);
                for issue in &results {
                    println!("{}", issue_row(issue));
                }
            }
        }
    }

    Ok(())
}

fn print_view(view: &DerivedView, total: usize) {
    println!(
        "Issues: {} of {} (filter: {})",
        view.len(),
        total,
        view.filter.title()
    );
    println!("Alerts: {}", format_alert_summary_narrow(view));
    println!();

    println!("{:<12} {:>6} {:>7} {:>7} {:>6}", "Stage", "Issues", "Passed", "Failed", "Sonar");
    for stage in Stage::ALL {
        let Some(summary) = view.summary_for(stage) else {
            continue;
        };
        println!(
            "{:<12} {:>6} {:>7} {:>7} {:>6.1}",
            summary.stage.display_name(),
            summary.count,
            summary.passed_tests,
            summary.failed_tests,
            summary.avg_sonar
        );
    }
    println!();

    for issue in &view.filtered_issues {
        let badges = if issue.alerts.is_clear() {
            "ok".to_string()
        } else {
            issue
                .alerts
                .kinds()
                .map(|kind: AlertKind| kind.badge())
                .collect::<Vec<_>>()
                .join(" ")
        };
        println!("{}  {}", issue_row(&issue.record), badges);
    }
}

fn issue_row(issue: &IssueRecord) -> String {
    format!(
        "#{:<8} {:<12} {:>3}%  {}",
        issue.issue_id,
        issue.fsm_state,
        issue.completion_percent(),
        issue.pr_link().unwrap_or("-")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("agentboard").chain(args.iter().copied()))
    }

    #[test]
    fn test_flags_override_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "backend:\n  base_url: http://file.example:5050").unwrap();
        let path = file.path().to_str().unwrap();

        let config = load_config(&cli(&["--config", path, "--poll-interval-ms", "5000"])).unwrap();
        assert_eq!(config.backend.base_url, "http://file.example:5050");
        assert_eq!(config.dashboard.poll_interval_ms, 5000);

        let config = load_config(&cli(&["--config", path, "--base-url", "http://flag.example"])).unwrap();
        assert_eq!(config.backend.base_url, "http://flag.example");
    }

    #[test]
    fn test_no_overrides_keeps_fixed_backend() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.path().to_str().unwrap();

        let config = load_config(&cli(&["--config", path])).unwrap();
        assert_eq!(config.backend.base_url, agentboard_config::DEFAULT_BASE_URL);
        assert_eq!(
            config.dashboard.poll_interval_ms,
            agentboard_config::DEFAULT_POLL_INTERVAL_MS
        );
    }

    #[test]
    fn test_invalid_override_is_config_error_with_hint() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.path().to_str().unwrap();

        let err = load_config(&cli(&["--config", path, "--poll-interval-ms", "10"])).unwrap_err();
        let board_error = err.downcast_ref::<BoardError>().unwrap();
        assert!(board_error.is_config_error());
        assert!(board_error.guidance().unwrap().contains("poll_interval_ms"));
    }

    #[test]
    fn test_missing_config_file_has_hint() {
        let err = load_config(&cli(&["--config", "/nonexistent/agentboard.yaml"])).unwrap_err();
        let board_error = err.downcast_ref::<BoardError>().unwrap();
        assert!(board_error.is_config_error());
        assert!(board_error.guidance().is_some());
    }

    #[test]
    fn test_snapshot_filter_parses() {
        let parsed = cli(&["snapshot", "--filter", "lowSonar", "--json"]);
        match parsed.command {
            Some(Command::Snapshot { filter, json }) => {
                assert_eq!(filter, IssueFilter::LowSonar);
                assert!(json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
