// Terminal display surface

use crate::filter::Filter;
use crate::messages::Messages;
use crate::view::{Row, Surface};
use colored::Colorize;
use std::io::Write;
use tracing::warn;

/// Escape control and bidi formatting characters so task text is shown
/// literally.
///
/// Keeps an ESC byte in stored text from turning into a terminal control
/// sequence, and a direction override from visually reordering a row.
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_control() || is_bidi_format(c) {
            out.extend(c.escape_unicode());
        } else {
            out.push(c);
        }
    }
    out
}

// Marks, embeddings, overrides and isolates
fn is_bidi_format(c: char) -> bool {
    matches!(
        c,
        '\u{061C}' | '\u{200E}' | '\u{200F}' | '\u{202A}'..='\u{202E}' | '\u{2066}'..='\u{2069}'
    )
}

/// Writes the task list to any `io::Write`, one block per redraw
pub struct TerminalSurface<W: Write> {
    out: W,
    color: bool,
    messages: Messages,
    visible: Vec<i64>,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W, color: bool, messages: Messages) -> Self {
        Self {
            out,
            color,
            messages,
            visible: Vec::new(),
        }
    }

    /// Id of the task shown at 1-based `position` in the last redraw
    pub fn row_id(&self, position: usize) -> Option<i64> {
        position.checked_sub(1).and_then(|i| self.visible.get(i).copied())
    }

    /// Input prompt for the interactive shell
    pub fn prompt(&mut self) {
        if let Err(e) = write!(self.out, "> ").and_then(|_| self.out.flush()) {
            warn!(error = ?e, "Failed to write prompt");
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, line: &str) {
        if let Err(e) = writeln!(self.out, "{}", line) {
            warn!(error = ?e, "Failed to write to terminal");
        }
    }

    fn paint(&self, text: &str, style: fn(&str) -> colored::ColoredString) -> String {
        if self.color {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }
}

impl<W: Write> Surface for TerminalSurface<W> {
    fn replace_rows(&mut self, rows: &[Row]) {
        self.visible = rows.iter().map(|r| r.id).collect();

        for (i, row) in rows.iter().enumerate() {
            let checkbox = if row.completed { "[x]" } else { "[ ]" };
            let text = sanitize(&row.text);
            let text = if row.completed {
                self.paint(&text, |s| s.dimmed().strikethrough())
            } else {
                text
            };
            let meta = self.paint(&format!("[{}] id {}", self.messages.delete, row.id), |s| s.dimmed());
            self.line(&format!("#{:<3} {} {}  {}", i + 1, checkbox, text, meta));
        }
    }

    fn show_empty(&mut self, message: &str) {
        self.visible.clear();
        let message = self.paint(message, |s| s.dimmed().italic());
        self.line(&message);
    }

    fn set_count_label(&mut self, label: &str) {
        let label = self.paint(label, |s| s.bold());
        self.line(&label);
    }

    fn mark_filter(&mut self, active: Filter) {
        let bar: Vec<String> = Filter::ALL
            .iter()
            .map(|f| {
                if *f == active {
                    let marked = format!("[{}]", f);
                    self.paint(&marked, |s| s.cyan().bold())
                } else {
                    format!(" {} ", f)
                }
            })
            .collect();
        let bar = bar.join(" ");
        self.line(&bar);
    }

    fn notify(&mut self, message: &str) {
        let message = self.paint(&format!("! {}", message), |s| s.yellow().bold());
        self.line(&message);
    }
}
