use clap::{ArgAction, Parser, Subcommand};
use eyre::Result;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;
use tasklist::{Backend, Config, Filter, Lang, Messages, Presenter, Settings, Slot, TaskStore, TerminalSurface, UiEvent};
use tracing::Level;

/// Exit status when one-shot input is rejected
const EXIT_INVALID: i32 = 1;

#[derive(Parser)]
#[command(name = "tasklist")]
#[command(about = "Task list manager - add, complete, delete and filter short text tasks")]
#[command(version = env!("GIT_DESCRIBE"))]
struct Cli {
    /// Config file (default: <config_dir>/tasklist/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the task list
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Storage backend
    #[arg(short, long, value_enum, global = true)]
    backend: Option<Backend>,

    /// Slot key the task list is stored under
    #[arg(short, long, global = true)]
    key: Option<String>,

    /// Language for labels and messages
    #[arg(long, value_enum, global = true)]
    lang: Option<Lang>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show tasks
    List {
        /// Which tasks to show
        #[arg(short, long, value_enum, default_value_t = Filter::All)]
        filter: Filter,
    },

    /// Add a task
    Add {
        /// Task text; multiple words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Flip a task between active and completed
    Toggle { id: i64 },

    /// Remove a task
    Delete { id: i64 },

    /// Remove every completed task
    ClearCompleted,

    /// Interactive session reading commands from stdin
    Shell,
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match run(cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

fn setup_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn settings(cli: &Cli) -> Result<Settings> {
    let flags = Config {
        data_dir: cli.data_dir.clone(),
        backend: cli.backend,
        key: cli.key.clone(),
        lang: cli.lang,
        color: cli.no_color.then_some(false),
    };

    Config::discover(cli.config.as_deref())?.merge(flags).resolve()
}

fn run(cli: Cli) -> Result<i32> {
    let settings = settings(&cli)?;
    let messages = Messages::for_lang(settings.lang);

    let store = TaskStore::open(settings.open_slot()?, settings.key.clone())?;
    let surface = TerminalSurface::new(io::stdout(), settings.color, messages.clone());
    let mut presenter = Presenter::new(store, surface, messages);

    let command = cli.command.unwrap_or(Commands::List { filter: Filter::All });
    execute(&mut presenter, command, io::stdin().lock())
}

/// Apply one subcommand and return the process exit status
fn execute<S, W, R>(presenter: &mut Presenter<S, TerminalSurface<W>>, command: Commands, input: R) -> Result<i32>
where
    S: Slot,
    W: Write,
    R: BufRead,
{
    match command {
        Commands::List { filter } => {
            presenter.handle(UiEvent::SelectFilter(filter))?;
            presenter.update_count();
        }
        Commands::Add { text } => {
            // Unlike the shell, rejected text is a failed run
            if presenter.add(&text.join(" "))?.is_none() {
                return Ok(EXIT_INVALID);
            }
        }
        Commands::Toggle { id } => {
            presenter.handle(UiEvent::Toggle(id))?;
        }
        Commands::Delete { id } => {
            presenter.handle(UiEvent::Delete(id))?;
        }
        Commands::ClearCompleted => {
            presenter.handle(UiEvent::ClearCompleted)?;
        }
        Commands::Shell => {
            tasklist::shell::run(presenter, input)?;
        }
    }

    Ok(0)
}
