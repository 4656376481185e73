// calctty: step-by-step symbolic calculator with a terminal UI

use std::fs::File;
use std::io;
use std::path::PathBuf;

use calctty::history::{History, HistoryEntry, Mode};
use calctty::interpreter::constants::DEFAULT_HISTORY_LIMIT;
use calctty::ui::App;
use clap::{Parser, Subcommand, ValueEnum};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use env_logger::{Env, Target};
use ratatui::{backend::CrosstermBackend, Terminal};

/// Step-by-step symbolic calculator
#[derive(Parser)]
#[command(
    name = "calctty",
    version,
    about = "Step-by-step symbolic calculator with a terminal UI",
    after_help = r#"
Examples:
  calctty                                  # Start the terminal UI
  calctty eval "2x+4=10"                   # Print the steps of one expression
  calctty solve "x+y=3" "x-y=1"            # Solve a linear system
  calctty matrix "I[1,2;3,4]"              # Invert a matrix
  calctty set "{1,2,3} union {2,3,4}"      # Combine two sets

Environment Variables:
  CALCTTY_LOG=debug            Log filter (overrides --log-level)
"#
)]
struct Cli {
    /// Set log level
    #[arg(long, value_enum, global = true, default_value = "warn")]
    log_level: LogLevel,

    /// Write logs to this file (the terminal UI never logs to stderr)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Entries kept in the session history
    #[arg(long, global = true, default_value_t = DEFAULT_HISTORY_LIMIT)]
    history_limit: usize,

    /// Command to execute
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate an expression or equation and print every step
    Eval {
        /// Expression such as "2+3*4" or "2x+4=10"
        expression: String,
    },

    /// Solve a system of linear equations
    Solve {
        /// One argument per equation
        #[arg(required = true)]
        equations: Vec<String>,
    },

    /// Apply a matrix request such as "2*I[1,2;3,4] + T[1,0;0,1]"
    Matrix { request: String },

    /// Apply a set request such as "{1,2,3} union {2,3,4}"
    Set { request: String },

    /// Start the terminal UI
    Tui,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

fn init_logging(cli: &Cli, interactive: bool) -> io::Result<()> {
    let level = if interactive && cli.log_file.is_none() {
        // Anything on stderr would tear the alternate screen
        "off"
    } else {
        cli.log_level.as_filter()
    };
    let mut builder = env_logger::Builder::from_env(Env::default().filter_or("CALCTTY_LOG", level));
    if let Some(path) = &cli.log_file {
        builder.target(Target::Pipe(Box::new(File::create(path)?)));
    }
    builder.init();
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let request = match &cli.command {
        None | Some(Commands::Tui) => None,
        Some(Commands::Eval { expression }) => Some((Mode::Expression, expression.clone())),
        Some(Commands::Solve { equations }) => Some((Mode::System, equations.join(";"))),
        Some(Commands::Matrix { request }) => Some((Mode::Matrix, request.clone())),
        Some(Commands::Set { request }) => Some((Mode::Set, request.clone())),
    };
    init_logging(&cli, request.is_none())?;
    log::info!("calctty v{} starting", env!("CARGO_PKG_VERSION"));

    match request {
        Some((mode, input)) => run_once(mode, &input),
        None => run_tui(History::new(cli.history_limit)),
    }
}

/// Compute one request and print its steps
fn run_once(mode: Mode, input: &str) -> Result<(), Box<dyn std::error::Error>> {
    let entry = HistoryEntry::compute(mode, input);
    for step in &entry.steps {
        println!("{}", step);
    }
    if let Err(err) = entry.outcome {
        eprintln!("{}: {}", err.category(), err);
        std::process::exit(1);
    }
    Ok(())
}

fn run_tui(history: History) -> Result<(), Box<dyn std::error::Error>> {
    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create and run app
    let mut app = App::new(history);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
