//! The `eval` command: best hand category for a set of cards.

use crate::error::CliError;
use pokerlab_engine::cards::parse_cards;
use pokerlab_engine::hand::evaluate_hand;
use std::collections::HashSet;
use std::io::Write;

pub fn handle_eval_command(cards: &str, json: bool, out: &mut dyn Write) -> Result<(), CliError> {
    let parsed = parse_cards(cards).map_err(|e| CliError::InvalidInput(e.to_string()))?;
    if !(2..=7).contains(&parsed.len()) {
        return Err(CliError::InvalidInput(format!(
            "expected 2 to 7 cards, got {}",
            parsed.len()
        )));
    }
    let unique: HashSet<_> = parsed.iter().collect();
    if unique.len() != parsed.len() {
        return Err(CliError::InvalidInput("duplicate card".to_string()));
    }

    let strength = evaluate_hand(&parsed);
    let shown: Vec<String> = parsed.iter().map(|c| c.to_string()).collect();
    if json {
        let rec = serde_json::json!({
            "cards": shown,
            "category": strength.category,
            "label": strength.label(),
            "kickers": strength.kickers,
            "value": strength.value(),
        });
        writeln!(out, "{}", rec)?;
    } else {
        writeln!(out, "Cards: {}", shown.join(" "))?;
        writeln!(out, "Hand: {}", strength.label())?;
        writeln!(out, "Value: {}", strength.value())?;
    }
    Ok(())
}
