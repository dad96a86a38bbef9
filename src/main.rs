// vlab: a terminal Virtual Lab for bubble sort

use std::fs::{self, OpenOptions};
use std::io::{self, Stdout};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vlab::catalog::MockDataService;
use vlab::config::VlabConfig;
use vlab::grader::{Grader, TestInput};
use vlab::prefs::PreferenceStore;
use vlab::sort::{generate_steps_with, reference_sort, GeneratorOptions};
use vlab::ui::App;

#[derive(Parser, Debug)]
#[command(name = "vlab")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Config file (defaults to ~/.vlab/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Preferences file (overrides the config and the platform data dir)
    #[arg(long, global = true)]
    prefs: Option<PathBuf>,

    /// Seed for random arrays and mock catalogue data
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Open the interactive lab (default)
    Tui,

    /// Print the bubble sort trace for an array
    Trace {
        /// Values to sort; the configured demo array when omitted
        #[arg(allow_negative_numbers = true)]
        values: Vec<i32>,

        /// Stop after the first pass without a swap
        #[arg(short, long)]
        early_exit: bool,
    },

    /// Grade a C file defining `void bubble_sort(int arr[], int n)`
    Grade {
        file: PathBuf,

        /// Comma-separated input array
        #[arg(short, long, num_args = 1.., value_delimiter = ',', allow_negative_numbers = true)]
        input: Option<Vec<i32>>,

        /// Test against a random array instead of the fixed one
        #[arg(short, long, conflicts_with = "input")]
        random: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_env("VLAB_LOG")
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (log_file, init_warnings) = open_log_file();

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::info!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    // Writing logs to stdout/stderr would corrupt the TUI
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_log_file() -> (Option<(PathBuf, fs::File)>, Vec<String>) {
    let mut candidates = Vec::new();
    if let Some(config_dir) = VlabConfig::path().and_then(|p| p.parent().map(PathBuf::from)) {
        candidates.push(config_dir.join("logs").join("vlab.log"));
    }
    candidates.push(PathBuf::from(".vlab").join("logs").join("vlab.log"));

    let mut warnings = Vec::new();
    for candidate in candidates {
        if let Some(parent) = candidate.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                warnings.push(format!("Failed to create log dir {}: {e}", parent.display()));
                continue;
            }
        }

        match OpenOptions::new().create(true).append(true).open(&candidate) {
            Ok(file) => return (Some((candidate, file)), warnings),
            Err(e) => {
                warnings.push(format!(
                    "Failed to open log file {}: {e}",
                    candidate.display()
                ));
            }
        }
    }

    (None, warnings)
}

/// Raw mode plus alternate screen, undone on drop
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self> {
        enable_raw_mode()?;

        let mut out = io::stdout();
        if let Err(err) = execute!(out, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(err.into());
        }

        let terminal = match Terminal::new(CrosstermBackend::new(out)) {
            Ok(t) => t,
            Err(err) => {
                let _ = disable_raw_mode();
                let _ = execute!(io::stdout(), LeaveAlternateScreen);
                return Err(err.into());
            }
        };

        Ok(Self { terminal })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

fn grader(config: &VlabConfig, seed: Option<u64>) -> Grader {
    match seed {
        Some(seed) => Grader::with_seed(config.grader.clone(), seed),
        None => Grader::new(config.grader.clone()),
    }
}

fn run_tui(cli: &Cli, config: &VlabConfig) -> Result<()> {
    let prefs_path = cli
        .prefs
        .clone()
        .or_else(|| config.prefs.path.clone())
        .or_else(PreferenceStore::default_path)
        .unwrap_or_else(|| PathBuf::from(".vlab").join("preferences.json"));
    let prefs = PreferenceStore::load(prefs_path);

    let service = Arc::new(MockDataService::new(
        config.catalog.delays(),
        config.catalog.experiment_count,
        cli.seed,
    ));
    let mut app = App::new(config, prefs, grader(config, cli.seed), service);

    let mut session = TerminalSession::new()?;
    // The event loop polls the terminal synchronously; catalogue fetches keep
    // running on the other runtime workers
    tokio::task::block_in_place(|| app.run(&mut session.terminal))?;
    Ok(())
}

fn run_trace(config: &VlabConfig, values: Vec<i32>, early_exit: bool) {
    let values = if values.is_empty() {
        config.player.demo_array.clone()
    } else {
        values
    };
    let options = GeneratorOptions {
        early_exit: early_exit || config.player.early_exit,
    };

    println!("Input:  {:?}", values);
    let steps = generate_steps_with(&values, options);
    for (idx, step) in steps.iter().enumerate() {
        println!("{:4}  {}", idx + 1, step);
    }
    println!("Sorted: {:?}", reference_sort(&values));
}

fn run_grade(
    cli: &Cli,
    config: &VlabConfig,
    file: &Path,
    input: Option<Vec<i32>>,
    random: bool,
    json: bool,
) -> Result<bool> {
    let source = fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;

    let input = match (input, random) {
        (Some(values), _) => TestInput::Fixed(values),
        (None, true) => TestInput::Random,
        (None, false) => TestInput::default(),
    };
    let report = grader(config, cli.seed).grade(&source, input);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for line in &report.console {
            println!("| {}", line);
        }
        if report.console_truncated {
            println!("| [output truncated]");
        }
        println!("Input:    {:?}", report.input);
        println!("Expected: {:?}", report.expected);
        if let Some(actual) = &report.actual {
            println!("Actual:   {:?}", actual);
        }
        println!("{}", report.outcome);
    }
    Ok(report.passed())
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    init_tracing();

    let cli = Cli::parse();
    let config = VlabConfig::load(cli.config.as_deref())?;

    match &cli.command {
        None | Some(Commands::Tui) => run_tui(&cli, &config)?,
        Some(Commands::Trace { values, early_exit }) => {
            run_trace(&config, values.clone(), *early_exit)
        }
        Some(Commands::Grade {
            file,
            input,
            random,
            json,
        }) => {
            let passed = run_grade(&cli, &config, file, input.clone(), *random, *json)?;
            if !passed {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
