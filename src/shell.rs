// Interactive line-oriented event loop

use crate::filter::Filter;
use crate::slot::Slot;
use crate::terminal::TerminalSurface;
use crate::view::{Presenter, Surface, UiEvent};
use eyre::Result;
use std::io::{BufRead, Write};
use tracing::{debug, info};

pub const HELP: &str = "\
commands:
  add <text>     add a task (bare text works too)
  toggle <ref>   flip a task between active and completed
  delete <ref>   remove a task
  clear          remove every completed task
  filter <name>  show all | active | completed
  list           redraw
  help           this text
  quit           leave
<ref> is a row number like #2 or a task id";

/// Which task a command points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// 1-based position in the last drawn rows
    Row(usize),
    Id(i64),
}

impl Target {
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        match s.strip_prefix('#') {
            Some(n) => n.parse().ok().map(Target::Row),
            None => s.parse().ok().map(Target::Id),
        }
    }
}

/// One parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(String),
    Toggle(Target),
    Delete(Target),
    ClearCompleted,
    Filter(Filter),
    List,
    Help,
    Quit,
    Nothing,
    Invalid(String),
}

/// Parse one line of shell input
pub fn parse_line(line: &str) -> Command {
    let line = line.trim();
    if line.is_empty() {
        return Command::Nothing;
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((w, r)) => (w, r.trim()),
        None => (line, ""),
    };

    // Command words only count as commands when the rest of the line fits
    // them; anything else is task text.
    let command = match (word.to_ascii_lowercase().as_str(), rest.is_empty()) {
        ("add", _) => Some(Command::Add(rest.to_string())),
        ("toggle" | "done", true) => Some(Command::Invalid("toggle needs a row (#n) or id".to_string())),
        ("toggle" | "done", false) => Target::parse(rest).map(Command::Toggle),
        ("delete" | "rm", true) => Some(Command::Invalid("delete needs a row (#n) or id".to_string())),
        ("delete" | "rm", false) => Target::parse(rest).map(Command::Delete),
        ("filter", true) => Some(Command::Invalid("filter needs all, active or completed".to_string())),
        ("filter", false) => Filter::from_name(rest).map(Command::Filter),
        ("clear", true) => Some(Command::ClearCompleted),
        ("list" | "ls", true) => Some(Command::List),
        ("help" | "?", true) => Some(Command::Help),
        ("quit" | "exit", true) => Some(Command::Quit),
        _ => None,
    };

    command.unwrap_or_else(|| Command::Add(line.to_string()))
}

/// Read commands from `input` until EOF or `quit`
pub fn run<S, W, R>(presenter: &mut Presenter<S, TerminalSurface<W>>, input: R) -> Result<()>
where
    S: Slot,
    W: Write,
    R: BufRead,
{
    presenter.refresh();
    presenter.surface_mut().prompt();

    for line in input.lines() {
        let line = line?;
        let command = parse_line(&line);
        debug!(?command, "Shell command");

        match command {
            Command::Quit => break,
            Command::Nothing => {}
            Command::Help => presenter.surface_mut().notify(HELP),
            Command::Invalid(msg) => presenter.surface_mut().notify(&msg),
            Command::List => presenter.refresh(),
            Command::Add(text) => presenter.handle(UiEvent::Add(text))?,
            Command::ClearCompleted => presenter.handle(UiEvent::ClearCompleted)?,
            Command::Filter(filter) => presenter.handle(UiEvent::SelectFilter(filter))?,
            Command::Toggle(target) => {
                if let Some(id) = resolve(presenter, target) {
                    presenter.handle(UiEvent::Toggle(id))?;
                }
            }
            Command::Delete(target) => {
                if let Some(id) = resolve(presenter, target) {
                    presenter.handle(UiEvent::Delete(id))?;
                }
            }
        }

        presenter.surface_mut().prompt();
    }

    info!("Shell session ended");
    Ok(())
}

fn resolve<S: Slot, W: Write>(presenter: &mut Presenter<S, TerminalSurface<W>>, target: Target) -> Option<i64> {
    match target {
        Target::Id(id) => Some(id),
        Target::Row(n) => {
            let id = presenter.surface().row_id(n);
            if id.is_none() {
                presenter.surface_mut().notify(&format!("no row #{}", n));
            }
            id
        }
    }
}
