use crate::core::ledger::{Confirmed, Ledger};
use anyhow::Result;
use chrono::NaiveDate;
use console::Term;
use tracing::debug;

/// Asks `question` on the terminal. `--yes` skips the prompt; without a
/// terminal to ask on, the answer is no.
pub fn confirm(question: &str, assume_yes: bool) -> Result<Option<Confirmed>> {
    if assume_yes {
        return Ok(Confirmed::from_answer(true));
    }
    let term = Term::stdout();
    if !term.is_term() {
        debug!("No terminal to confirm on, declining");
        return Ok(None);
    }
    term.write_str(&format!("{question} [y/N] "))?;
    let answer = term.read_line()?;
    Ok(Confirmed::from_answer(is_affirmative(&answer)))
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

pub fn reset_month(ledger: &mut Ledger, today: NaiveDate, assume_yes: bool) -> Result<()> {
    let question = format!(
        "Delete all transactions from {}? This cannot be undone.",
        today.format("%B %Y")
    );
    match confirm(&question, assume_yes)? {
        Some(confirmed) => {
            let removed = ledger.reset_month(confirmed, today);
            println!("Removed {removed} transactions.");
        }
        None => println!("Nothing was removed."),
    }
    Ok(())
}

pub fn reset_all(ledger: &mut Ledger, assume_yes: bool) -> Result<()> {
    match confirm("Delete ALL transactions? This cannot be undone.", assume_yes)? {
        Some(confirmed) => {
            let removed = ledger.reset_all(confirmed);
            println!("Removed {removed} transactions.");
        }
        None => println!("Nothing was removed."),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_affirmative_answers() {
        assert!(is_affirmative("y"));
        assert!(is_affirmative(" YES \n"));
        assert!(!is_affirmative(""));
        assert!(!is_affirmative("no"));
        assert!(!is_affirmative("yep"));
    }

    #[test]
    fn test_assume_yes_confirms() {
        assert!(confirm("Really?", true).unwrap().is_some());
    }
}
