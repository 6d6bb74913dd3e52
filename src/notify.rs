//! User notifications.

use colored::Colorize;
use std::io::{self, BufRead, IsTerminal, Write};

/// Shows a message with a set of buttons and returns the index of the one
/// the user picked.
pub trait Notifier {
    fn show_message(&mut self, text: &str, buttons: &[&str]) -> usize;
}

/// [`Notifier`] that writes to the terminal.
///
/// When stdin is interactive and there is more than one button, the user is
/// prompted for a choice; otherwise the first button is selected.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn show_message(&mut self, text: &str, buttons: &[&str]) -> usize {
        eprintln!("{} {}", "⚠️ ".yellow(), text.bold());

        if buttons.len() <= 1 || !io::stdin().is_terminal() {
            if let Some(button) = buttons.first() {
                eprintln!("   [{}]", button.cyan());
            }
            return 0;
        }

        for (index, button) in buttons.iter().enumerate() {
            eprintln!("   {}) {}", index + 1, button.cyan());
        }
        eprint!("   choice [1]: ");
        let _ = io::stderr().flush();

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line).is_err() {
            return 0;
        }
        parse_choice(&line, buttons.len())
    }
}

fn parse_choice(line: &str, count: usize) -> usize {
    match line.trim().parse::<usize>() {
        Ok(n) if (1..=count).contains(&n) => n - 1,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_choice() {
        assert_eq!(parse_choice("2\n", 2), 1);
        assert_eq!(parse_choice("", 2), 0);
        assert_eq!(parse_choice("7", 2), 0);
        assert_eq!(parse_choice("abc", 3), 0);
    }
}
