mod error_formatter;
mod formatter;
mod rulefile;
mod server;

use anyhow::Result;
use clap::{Parser, Subcommand};
use formatter::Formatter;
use primeproof::{FrontierOrder, Prover, ResourceLimits};
use rulefile::{Equation, RuleFileError};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "primeproof")]
#[command(about = "Prove equalities between token sequences by rewriting.")]
#[command(
    long_about = "Primeproof searches for a chain of axiom applications that turns one side of a theorem into the other.\nAxioms are read from .rules files, one `lhs = rhs` equation per line. The CLI proves theorems, shows the call graph between a theorem and the axioms, or serves the prover over HTTP."
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Log search progress to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Prove a theorem from the axioms in the workspace (try: "1 + 1 + 1 + 1 = 4")
    ///
    /// Loads all .rules files from the workspace, searches for a proof and
    /// verifies it token by token. Exits with status 2 when no proof is found.
    Prove {
        /// Theorem to prove (format: "lhs tokens = rhs tokens")
        theorem: String,
        /// Workspace root directory containing .rules files
        #[arg(short = 'd', long = "dir", default_value = ".")]
        workdir: PathBuf,
        /// Output the commit log only (for piping to other tools)
        #[arg(short = 'r', long)]
        raw: bool,
        /// Admission ceiling for sibling branches
        #[arg(long)]
        max_fanout: Option<usize>,
        /// Maximum number of states to pop before giving up
        #[arg(long)]
        max_states: Option<usize>,
        /// Search time budget in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
        /// Explore states in insertion order instead of largest composites first
        #[arg(long)]
        breadth_first: bool,
    },
    /// Show the call graph between a theorem and the axioms
    ///
    /// Lists, for every ordered pair of equations, which of the four rewrite
    /// relations hold by divisibility of their composites.
    Graph {
        /// Theorem (format: "lhs tokens = rhs tokens")
        theorem: String,
        /// Workspace root directory containing .rules files
        #[arg(short = 'd', long = "dir", default_value = ".")]
        workdir: PathBuf,
    },
    /// List all axioms with their guids
    List {
        /// Workspace root directory containing .rules files
        #[arg(default_value = ".")]
        root: PathBuf,
    },
    /// Start HTTP REST API server (default: localhost:3000)
    ///
    /// API: GET /health, GET /axioms, POST /prove with {lhs, rhs} token arrays
    Server {
        /// Workspace root directory containing .rules files
        #[arg(short = 'd', long = "dir", default_value = ".")]
        workdir: PathBuf,
        /// Host address to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        /// Port number to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let default_filter = if cli.verbose {
        "primeproof=debug,tower_http=debug"
    } else if matches!(cli.command, Commands::Server { .. }) {
        "primeproof=info,tower_http=info"
    } else {
        "primeproof=warn"
    };
    init_tracing(default_filter);

    let result = match &cli.command {
        Commands::Prove {
            theorem,
            workdir,
            raw,
            max_fanout,
            max_states,
            timeout_ms,
            breadth_first,
        } => {
            let mut limits = ResourceLimits::default();
            if let Some(max_fanout) = max_fanout {
                limits.max_fanout = *max_fanout;
            }
            if let Some(max_states) = max_states {
                limits.max_states = *max_states;
            }
            if let Some(timeout_ms) = timeout_ms {
                limits.max_search_time_ms = *timeout_ms;
            }
            if *breadth_first {
                limits.frontier_order = FrontierOrder::BreadthFirst;
            }
            prove_command(workdir, theorem, *raw, limits)
        }
        Commands::Graph { workdir, theorem } => graph_command(workdir, theorem),
        Commands::List { root } => list_command(root),
        Commands::Server {
            workdir,
            host,
            port,
        } => server_command(workdir, host, *port),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            if let Some(err) = e.downcast_ref::<RuleFileError>() {
                eprintln!("{}", error_formatter::format_rule_file_error(err));
            } else if let Some(err) = e.downcast_ref::<primeproof::ProofError>() {
                eprintln!("{}", error_formatter::format_proof_error(err));
            } else {
                eprintln!("Error: {}", e);
            }
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr; `RUST_LOG` overrides the default filter
fn init_tracing(default_filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn prove_command(
    workdir: &Path,
    theorem: &str,
    raw: bool,
    limits: ResourceLimits,
) -> Result<ExitCode> {
    let workspace = load_workspace(workdir)?;
    let (lhs, rhs) = rulefile::parse_equation(theorem, "<theorem>")?;

    let mut prover = Prover::with_limits(limits);
    prover.set_axioms(workspace.axioms)?;
    let report = prover.prove(&lhs, &rhs)?;

    let formatter = Formatter::default();
    print!("{}", formatter.format_report(theorem.trim(), &report, raw));

    if report.is_proved() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(2))
    }
}

fn graph_command(workdir: &Path, theorem: &str) -> Result<ExitCode> {
    let workspace = load_workspace(workdir)?;
    let (lhs, rhs) = rulefile::parse_equation(theorem, "<theorem>")?;

    let mut prover = Prover::new();
    prover.set_axioms(workspace.axioms)?;
    let graph = prover.call_graph(&lhs, &rhs)?;

    let formatter = Formatter::default();
    print!("{}", formatter.format_graph(&graph));
    Ok(ExitCode::SUCCESS)
}

fn list_command(root: &Path) -> Result<ExitCode> {
    println!("Loading workspace from {}...", root.display());
    let workspace = load_workspace(root)?;

    let mut prover = Prover::new();
    prover.set_axioms(workspace.axioms)?;

    println!();
    let formatter = Formatter::default();
    print!(
        "{}",
        formatter.format_axioms(workspace.file_count, prover.axioms())
    );
    Ok(ExitCode::SUCCESS)
}

fn server_command(workdir: &Path, host: &str, port: u16) -> Result<ExitCode> {
    #[cfg(feature = "server")]
    {
        use tokio::runtime::Runtime;
        let rt = Runtime::new()?;
        rt.block_on(async {
            let workspace = load_workspace(workdir)?;
            let mut prover = Prover::new();
            prover.set_axioms(workspace.axioms)?;

            println!(
                "Starting HTTP server with {} axiom(s) loaded",
                prover.axioms().len()
            );
            server::http::start_server(prover, host, port).await
        })?;
    }

    #[cfg(not(feature = "server"))]
    {
        let _ = (workdir, host, port);
        eprintln!("Error: Server feature not enabled");
        eprintln!("Recompile with: cargo build --features server");
        std::process::exit(1);
    }

    Ok(ExitCode::SUCCESS)
}

struct Workspace {
    file_count: usize,
    axioms: Vec<Equation>,
}

/// Load all .rules files from the workspace directory, in path order
fn load_workspace(workdir: &Path) -> Result<Workspace> {
    if !workdir.is_dir() {
        anyhow::bail!("Workspace directory '{}' not found", workdir.display());
    }

    let mut workspace = Workspace {
        file_count: 0,
        axioms: Vec::new(),
    };
    for entry in WalkDir::new(workdir).sort_by_file_name() {
        let entry = entry?;
        if entry.path().extension().and_then(|s| s.to_str()) == Some("rules") {
            let path = entry.path();
            let source_id = path.to_string_lossy().to_string();
            let axioms = rulefile::parse_rules(&fs::read_to_string(path)?, &source_id)?;
            debug!(file = %source_id, axioms = axioms.len(), "Loaded rule file");
            workspace.file_count += 1;
            workspace.axioms.extend(axioms);
        }
    }

    Ok(workspace)
}
