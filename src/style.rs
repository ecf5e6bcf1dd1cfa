//! Terminal styling for CLI messages and reports

use colored::Colorize;
use std::io::{self, IsTerminal, Write};

/// Print an error message to stderr
pub fn error(msg: &str) {
    eprintln!("{} {}", "error:".red().bold(), msg);
}

/// Print a warning message to stderr
pub fn warning(msg: &str) {
    eprintln!("{} {}", "warning:".yellow().bold(), msg);
}

pub fn success(msg: &str) {
    println!("{} {}", "✓".green().bold(), msg);
}

/// Print a hint message to stderr (dimmed)
pub fn hint(msg: &str) {
    eprintln!("{} {}", "hint:".dimmed(), msg.dimmed());
}

pub fn header(msg: &str) {
    println!("{}", msg.cyan().bold());
}

/// Print a progress line
pub fn status(msg: &str) {
    println!("{} {}", "→".blue(), msg);
}

pub fn path(p: &std::path::Path) -> String {
    p.display().to_string().bright_white().to_string()
}

/// Format a label-value pair, e.g. `cells: 12`
pub fn metric(label: &str, value: impl std::fmt::Display) -> String {
    format!("  {}: {}", label.dimmed(), value.to_string().cyan())
}

pub fn url(u: &str) -> String {
    u.bright_blue().underline().to_string()
}

pub fn is_terminal() -> bool {
    io::stdout().is_terminal()
}

/// Render markdown with the terminal skin when stdout is a TTY,
/// otherwise write it unchanged.
pub fn render_markdown(markdown: &str, output: &mut dyn Write) -> io::Result<()> {
    if is_terminal() {
        let skin = create_skin();
        let rendered = skin.term_text(markdown);
        write!(output, "{}", rendered)
    } else {
        write!(output, "{}", markdown)
    }
}

fn create_skin() -> termimad::MadSkin {
    use crossterm::style::Color;
    use termimad::*;

    let mut skin = MadSkin::default();

    skin.set_headers_fg(Color::Cyan);
    skin.bold.set_fg(Color::White);
    skin.bullet = StyledChar::from_fg_char(Color::Blue, '•');
    skin.inline_code.set_fg(Color::Yellow);
    // Tree ids and cell ids are written as italics in reports
    skin.italic.set_fg(Color::Magenta);
    skin.horizontal_rule = StyledChar::from_fg_char(Color::DarkGrey, '─');

    skin
}
