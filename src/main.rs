use clap::{Parser, Subcommand};
use eyre::{Context, Result, eyre};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tasklist::{Config, Outcome, Session};
use tracing::{Level, debug, info};

#[derive(Parser)]
#[command(name = "tasklist")]
#[command(about = "Tasklist - add, complete, star, filter and count tasks for one session")]
#[command(version)]
struct Cli {
    /// Path to a YAML config file (default: <config dir>/tasklist/config.yml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level: error, warn, info, debug or trace
    #[arg(short, long)]
    log_level: Option<String>,

    /// Emit the view as JSON instead of text
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Read commands interactively from stdin (default)
    Shell,

    /// Replay commands from a script file, one per line
    Run {
        /// Script to execute
        script: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;

    // Setup tracing
    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    let level: Level = level.parse().map_err(|_| eyre!("Invalid log level: {}", level))?;
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    // Config is read before the subscriber exists, so report its source here
    match Config::source_path(cli.config.as_deref()) {
        Some(path) => info!(path = ?path, "Loaded config"),
        None => debug!("No config file found, using defaults"),
    }

    let mut session = Session::new(&config, cli.json);

    match cli.command.unwrap_or(Commands::Shell) {
        Commands::Shell => run_shell(&mut session)?,
        Commands::Run { script } => run_script(&mut session, &script)?,
    }

    Ok(())
}

fn run_shell(session: &mut Session) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    writeln!(stdout, "{}", session.render())?;
    writeln!(stdout, "Type `help` for commands.")?;

    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).context("Failed to read from stdin")? == 0 {
            break;
        }

        match session.run_line(&line) {
            Outcome::Continue(out) if out.is_empty() => {}
            Outcome::Continue(out) => writeln!(stdout, "{}", out)?,
            Outcome::Quit => break,
        }
    }

    Ok(())
}

fn run_script(session: &mut Session, script: &Path) -> Result<()> {
    let content =
        fs::read_to_string(script).with_context(|| format!("Failed to read script {}", script.display()))?;
    info!(script = ?script, "Running script");

    let mut stdout = io::stdout().lock();
    for line in content.lines() {
        match session.run_line(line) {
            Outcome::Continue(out) if out.is_empty() => {}
            Outcome::Continue(out) => writeln!(stdout, "{}", out)?,
            Outcome::Quit => break,
        }
    }

    Ok(())
}
