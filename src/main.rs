use anyhow::Context;
use auth_matrix::Result;
use auth_matrix::matrix::ResultsGrid;
use auth_matrix::render::render_table;
use auth_matrix::run::{self, SimulatedRunner};
use auth_matrix::spec::{AuthKind, SpecFile, SpecStore};
use clap::{Parser, Subcommand};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "auth-matrix")]
#[command(about = "Authorization test matrix toolkit", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a spec file and summarize it.
    Check {
        #[arg(long)]
        spec: String,
    },
    /// Drive a simulated run, repainting the grid as results arrive.
    Demo {
        /// Spec file to run; the built-in sample when omitted.
        #[arg(long)]
        spec: Option<String>,

        /// Pause between repaints, in milliseconds.
        #[arg(long, default_value_t = 150)]
        delay_ms: u64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.cmd {
        Commands::Check { spec } => check(&spec),
        Commands::Demo { spec, delay_ms } => demo(spec.as_deref(), delay_ms),
    }
}

fn load_store(path: &str) -> Result<SpecStore> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("read spec file {path}"))?;
    let spec = SpecFile::parse(&text)?.validate_and_build()?;
    Ok(SpecStore::from_spec(spec))
}

fn check(path: &str) -> Result<()> {
    let store = load_store(path)?;
    let spec = store.spec();

    println!("{path}: specification OK");
    println!("  roles: {}", spec.roles.len());
    for role in &spec.roles {
        let marker = match role.auth {
            AuthKind::None => "no auth",
            AuthKind::Header => "header auth",
        };
        println!("    {} ({marker})", role.name);
    }
    println!("  endpoints: {}", spec.endpoints.len());
    for endpoint in &spec.endpoints {
        let expected: Vec<String> = endpoint
            .expect
            .iter()
            .map(|(role, e)| format!("{role}={}", e.status))
            .collect();
        println!(
            "    {} [{} {}] expect: {}",
            endpoint.name,
            endpoint.method,
            endpoint.path,
            expected.join(" ")
        );
    }
    println!("  default headers: {}", spec.default_headers.len());
    Ok(())
}

fn demo(path: Option<&str>, delay_ms: u64) -> Result<()> {
    // 1) Spec + runner: a loaded file runs against a passthrough server,
    //    the built-in sample against its canned responses.
    let store = match path {
        Some(p) => load_store(p)?,
        None => run::sample_store(),
    };
    let mut runner = match path {
        Some(_) => SimulatedRunner::passthrough(),
        None => SimulatedRunner::sample(),
    };

    // 2) Drive the run, repainting after the initial render and after
    //    every delivered result.
    let delay = Duration::from_millis(delay_ms);
    let mut grid = ResultsGrid::new();
    let report = run::run_matrix_with(&store, &mut runner, &mut grid, |g| {
        println!("{}", render_table(g));
        if g.pending_cells() > 0 && !delay.is_zero() {
            std::thread::sleep(delay);
        }
        g.tick();
    })?;

    println!(
        "run complete: {} applied, {} ignored",
        report.applied, report.ignored
    );
    if grid.pending_cells() > 0 {
        eprintln!("warning: {} cells never resolved", grid.pending_cells());
    }
    Ok(())
}
