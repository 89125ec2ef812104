use owo_colors::OwoColorize;

use crate::sink::{LogSink, LogTag};

/// Small wrapper around stdout/stderr printing to provide consistent, colored
/// user-facing messages. Colors are enabled only when output is a TTY.
fn is_tty() -> bool {
    atty::is(atty::Stream::Stdout)
}

pub fn print_info(msg: &str) {
    if is_tty() {
        println!("{} {}", "info:".cyan().bold(), msg);
    } else {
        println!("info: {}", msg);
    }
}

pub fn print_warn(msg: &str) {
    if is_tty() {
        eprintln!("{} {}", "warn:".yellow().bold(), msg);
    } else {
        eprintln!("warn: {}", msg);
    }
}

pub fn print_error(msg: &str) {
    if is_tty() {
        eprintln!("{} {}", "error:".red().bold(), msg);
    } else {
        eprintln!("error: {}", msg);
    }
}

/// Print a plain user-facing line (no prefix).
pub fn print_user(msg: &str) {
    println!("{}", msg);
}

/// Transcript sink that prints each line to stdout as `[Tag] message`.
/// Clearing is a no-op: a terminal transcript just keeps scrolling.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl ConsoleSink {
    pub fn new() -> Self {
        Self
    }
}

impl LogSink for ConsoleSink {
    fn clear(&mut self) {}

    fn push(&mut self, tag: LogTag, message: String) {
        let label = format!("[{}]", tag.label());
        if !is_tty() {
            println!("{} {}", label, message);
            return;
        }
        match tag {
            LogTag::Ok => println!("{} {}", label.green().bold(), message),
            LogTag::Warn => println!("{} {}", label.yellow().bold(), message),
            LogTag::Error => println!("{} {}", label.red().bold(), message),
            LogTag::Info => println!("{} {}", label.cyan().bold(), message),
            LogTag::Done => println!("{} {}", label.green().bold().underline(), message),
        }
    }
}
