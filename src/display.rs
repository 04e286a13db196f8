use crate::widget::transcript::{Row, RowKind};
use console::{measure_text_width, style};
use rustyline::ExternalPrinter;
use std::io::{self, Write};

/// Where transcript rows end up: above the live prompt through rustyline's
/// printer, or straight to stdout when no editor is running.
pub enum Surface {
    Printer(Box<dyn ExternalPrinter + Send>),
    Stdout,
}

impl Surface {
    pub fn emit(&mut self, rows: &[Row]) {
        let width = terminal_width();
        for row in rows {
            // The editor has already echoed what the user typed.
            if row.kind == RowKind::User && matches!(self, Surface::Printer(_)) {
                continue;
            }
            self.print(format_row(row, width));
        }
    }

    pub fn notice(&mut self, text: &str) {
        self.print(text.to_string());
    }

    pub fn error(&mut self, text: &str) {
        self.print(format_error(text));
    }

    fn print(&mut self, text: String) {
        match self {
            Surface::Printer(printer) => {
                if let Err(e) = printer.print(text) {
                    tracing::warn!(error = %e, "external printer failed");
                }
            }
            Surface::Stdout => {
                let mut out = io::stdout().lock();
                let _ = writeln!(out, "{}", text);
                let _ = out.flush();
            }
        }
    }
}

fn terminal_width() -> usize {
    let term = console::Term::stdout();
    let width = term.size().1 as usize;
    width.saturating_sub(4).clamp(40, 100)
}

/// Renders one transcript row as a labelled bubble.
pub fn format_row(row: &Row, width: usize) -> String {
    match row.kind {
        RowKind::Pending => format!("{}", style(format!("  {}", row.text)).dim().italic()),
        RowKind::Assistant if looks_like_markdown(&row.text) => {
            let skin = termimad::MadSkin::default();
            format!(
                "{}\n{}",
                style("🤖 Assistant").bold().blue(),
                skin.term_text(&row.text)
            )
        }
        RowKind::Assistant => bubble("🤖 Assistant", &row.text, width, false),
        RowKind::User => bubble("🧑 You", &row.text, width, true),
    }
}

fn looks_like_markdown(text: &str) -> bool {
    text.contains("```")
        || text.contains("**")
        || text.contains('`')
        || text.lines().any(|l| {
            let l = l.trim_start();
            l.starts_with('#') || l.starts_with("- ") || l.starts_with("* ")
        })
}

fn bubble(label: &str, text: &str, width: usize, is_user: bool) -> String {
    let inner = width.saturating_sub(4).max(1);
    let lines: Vec<String> = text.lines().flat_map(|l| wrap_line(l, inner)).collect();
    let content_width = lines
        .iter()
        .map(|l| measure_text_width(l))
        .max()
        .unwrap_or(0)
        .max(measure_text_width(label));
    let box_width = content_width + 4;

    let top = format!("┌{}┐", "─".repeat(box_width - 2));
    let bottom = format!("└{}┘", "─".repeat(box_width - 2));
    let paint = |s: &str| {
        if is_user {
            style(s.to_string()).dim().cyan()
        } else {
            style(s.to_string()).dim().blue()
        }
    };

    let mut out = Vec::with_capacity(lines.len() + 3);
    let title = if is_user {
        style(label).bold().cyan()
    } else {
        style(label).bold().blue()
    };
    out.push(title.to_string());
    out.push(paint(&top).to_string());
    for line in &lines {
        let padding = content_width.saturating_sub(measure_text_width(line));
        out.push(format!(
            "{} {}{} {}",
            paint("│"),
            line,
            " ".repeat(padding),
            paint("│")
        ));
    }
    out.push(paint(&bottom).to_string());
    out.join("\n")
}

/// Splits a line at spaces so no piece exceeds `max` columns; a single word
/// longer than `max` is cut.
pub fn wrap_line(line: &str, max: usize) -> Vec<String> {
    if line.is_empty() {
        return vec![String::new()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    for word in line.split(' ') {
        let candidate_width = if current.is_empty() {
            measure_text_width(word)
        } else {
            measure_text_width(&current) + 1 + measure_text_width(word)
        };

        if candidate_width <= max {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        let mut rest = word;
        while measure_text_width(rest) > max {
            let cut = split_at_width(rest, max);
            lines.push(rest[..cut].to_string());
            rest = &rest[cut..];
        }
        current.push_str(rest);
    }
    lines.push(current);
    lines
}

fn split_at_width(s: &str, max: usize) -> usize {
    let mut width = 0;
    for (idx, ch) in s.char_indices() {
        let w = measure_text_width(ch.encode_utf8(&mut [0; 4]));
        if width + w > max {
            return idx.max(ch.len_utf8());
        }
        width += w;
    }
    s.len()
}

fn format_error(message: &str) -> String {
    format!("{} {}", style("✖").bold().red(), style(message).red())
}

pub fn display_error(message: &str) {
    eprintln!("{}", format_error(message));
}

pub fn display_banner(model: &str) {
    println!(
        "{} {}",
        style("🛒 shopchat").bold().magenta(),
        style(format!("({})", model)).dim()
    );
    println!(
        "{}",
        style("Enter sends, Alt-Enter adds a line. Type /help for commands, Ctrl-D to exit.").dim()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<String>>>);

    impl ExternalPrinter for Recorder {
        fn print(&mut self, msg: String) -> rustyline::Result<()> {
            self.0.lock().unwrap().push(msg);
            Ok(())
        }
    }

    fn row(kind: RowKind, text: &str) -> Row {
        Row {
            kind,
            text: text.to_string(),
        }
    }

    #[test]
    fn printer_skips_rows_the_editor_echoed() {
        console::set_colors_enabled(false);
        let recorder = Recorder::default();
        let mut surface = Surface::Printer(Box::new(recorder.clone()));

        surface.emit(&[
            row(RowKind::User, "wireless mouse"),
            row(RowKind::Pending, "Thinking…"),
            row(RowKind::Assistant, "Try the ACME mouse"),
        ]);

        let printed = recorder.0.lock().unwrap();
        assert_eq!(printed.len(), 2);
        assert!(!printed.iter().any(|p| p.contains("wireless mouse")));
        assert!(printed[0].contains("Thinking…"));
        assert!(printed[1].contains("Try the ACME mouse"));
    }

    #[test]
    fn wraps_at_spaces() {
        assert_eq!(
            wrap_line("best price for wireless mouse", 12),
            vec!["best price", "for wireless", "mouse"]
        );
    }

    #[test]
    fn cuts_overlong_words() {
        assert_eq!(wrap_line("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn keeps_blank_lines() {
        assert_eq!(wrap_line("", 10), vec![""]);
    }

    #[test]
    fn rows_carry_their_text() {
        console::set_colors_enabled(false);
        let user = format_row(
            &Row {
                kind: RowKind::User,
                text: "hello there".to_string(),
            },
            60,
        );
        assert!(user.contains("You"));
        assert!(user.contains("│ hello there │"));

        let pending = format_row(
            &Row {
                kind: RowKind::Pending,
                text: "Thinking…".to_string(),
            },
            60,
        );
        assert!(pending.contains("Thinking…"));
    }

    #[test]
    fn markdown_detection() {
        assert!(looks_like_markdown("**bold** deal"));
        assert!(looks_like_markdown("- item one\n- item two"));
        assert!(!looks_like_markdown("Try the ACME mouse at $19.99"));
    }
}
