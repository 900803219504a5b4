// calctty: step-through integer expression evaluator

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use anyhow::Context;
use clap::Parser as ClapParser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{error, info};
use tracing_subscriber::prelude::*;

use calctty::evaluator::engine::Evaluator;
use calctty::parser::parse::Parser;
use calctty::ui::App;

/// Default snapshot history budget (64 MiB)
const DEFAULT_SNAPSHOT_LIMIT: usize = 64 * 1024 * 1024;

/// Tokenize, parse and evaluate an integer arithmetic expression, then step
/// through the reduction in a terminal UI.
#[derive(ClapParser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// The expression to evaluate; read from --file or stdin when omitted
    expression: Option<String>,

    #[clap(short, long, help = "Read the expression from this file")]
    file: Option<PathBuf>,

    #[clap(short, long, help = "Print the result and exit instead of opening the UI")]
    print: bool,

    #[clap(short, long, help = "Print the token stream and exit")]
    tokens: bool,

    #[clap(
        long,
        default_value_t = DEFAULT_SNAPSHOT_LIMIT,
        help = "Memory budget for the reduction history, in bytes"
    )]
    snapshot_limit: usize,

    #[clap(
        short,
        long,
        long_help = "The file to write logs to

Logs are discarded by default since the UI owns the terminal."
    )]
    log_file: Option<String>,

    #[clap(
        short,
        long,
        action = clap::ArgAction::Count,
        help = "Show more in logs, may be provided multiple times",
    )]
    verbose: u8,
}

// Lets a locked log file act as an io::Write for the fmt layer
struct MutexGuardWriter<'a>(MutexGuard<'a, fs::File>);

impl io::Write for MutexGuardWriter<'_> {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.write(buf)
    }

    #[inline]
    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()
    }
}

struct LogWriterBuilder {
    log_file: Option<Mutex<fs::File>>,
}

impl<'writer> tracing_subscriber::fmt::MakeWriter<'writer> for LogWriterBuilder {
    type Writer = Box<dyn io::Write + 'writer>;

    fn make_writer(&'writer self) -> Self::Writer {
        match &self.log_file {
            Some(log_file) => Box::new(MutexGuardWriter(log_file.lock().expect("poisoned"))),
            None => Box::new(io::empty()),
        }
    }
}

fn init_logging(args: &Args) -> anyhow::Result<()> {
    let log_level_filter = match args.verbose {
        0 => tracing_subscriber::filter::LevelFilter::INFO,
        1 => tracing_subscriber::filter::LevelFilter::DEBUG,
        _ => tracing_subscriber::filter::LevelFilter::TRACE,
    };

    let log_file = match &args.log_file {
        Some(path) => Some(fs::File::create(path).context("unable to create log file")?),
        None => None,
    };
    let log_writer_builder = LogWriterBuilder {
        log_file: log_file.map(Mutex::new),
    };

    tracing_subscriber::registry::Registry::default()
        .with(log_level_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(log_writer_builder),
        )
        .init();

    Ok(())
}

fn read_source(args: &Args) -> anyhow::Result<String> {
    if let Some(expression) = &args.expression {
        return Ok(expression.clone());
    }

    if let Some(path) = &args.file {
        return fs::read_to_string(path)
            .with_context(|| format!("reading expression from {}", path.display()));
    }

    let mut source = String::new();
    io::stdin().read_to_string(&mut source).context("reading expression from stdin")?;
    Ok(source)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    let source = read_source(&args)?;
    info!(len = source.len(), "read expression");

    if args.tokens {
        for token in calctty::tokenize(&source) {
            let loc = token.location();
            let kind = token.kind();
            println!("{}@{}:{} {}", kind, loc.line, loc.column, token.lexeme());
        }
        return Ok(());
    }

    if args.print {
        match calctty::evaluate(&source) {
            Ok(value) => println!("{}", value),
            Err(e) => {
                error!(error = %e, "evaluation failed");
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    let expr = match Parser::new(&source).parse() {
        Ok(expr) => expr,
        Err(e) => {
            error!(error = %e, "parse failed");
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let mut evaluator = Evaluator::new(expr, args.snapshot_limit);
    match evaluator.run() {
        Ok(value) => info!(
            value,
            steps = evaluator.total_snapshots(),
            "evaluation completed"
        ),
        Err(e) => info!(error = %e, "entering UI with partial reduction history"),
    }

    // Rewind to the beginning for TUI
    if let Err(e) = evaluator.rewind_to_start() {
        eprintln!("Warning: Failed to rewind to start: {}", e);
    }

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(evaluator, source);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res.context("running terminal UI")
}
