use coolflow_core::Confirm;
use std::io::{self, Write};

/// Reads answers from stdin
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, question: &str) -> bool {
        ask_yes_no(question)
    }

    fn input(&self, prompt: &str) -> Option<String> {
        print!("{}: ", prompt);
        io::stdout().flush().ok()?;

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(input.trim().to_string()),
        }
    }
}

/// `[y/N]` question; anything but y/yes is no
pub fn ask_yes_no(question: &str) -> bool {
    print!("{} [y/N]: ", question);
    if io::stdout().flush().is_err() {
        return false;
    }

    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_err() {
        return false;
    }
    matches!(input.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
