//! Parser for flashcard import batches.
//!
//! # Format
//! ```json
//! [
//!   { "front": "Capital of France?", "back": "Paris", "wrongOptions": ["London", "Madrid"] },
//!   { "front": "2 + 2", "back": "4", "wrongOptions": ["3", "5"] }
//! ]
//! ```
//!
//! The batch is validated as a whole: one bad card rejects everything.

use serde_json::Value;

use crate::error::ImportError;
use crate::types::{NewFlashcard, WRONG_OPTION_COUNT};

/// Parse an import batch into cards ready to be created.
pub fn parse_import(content: &str) -> Result<Vec<NewFlashcard>, ImportError> {
    let value: Value = serde_json::from_str(content)?;
    let items = value.as_array().ok_or(ImportError::NotAnArray)?;
    if items.is_empty() {
        return Err(ImportError::Empty);
    }

    items
        .iter()
        .enumerate()
        .map(|(index, item)| parse_card(index, item))
        .collect()
}

fn parse_card(index: usize, item: &Value) -> Result<NewFlashcard, ImportError> {
    let invalid = |reason: &str| ImportError::InvalidCard {
        index,
        reason: reason.to_string(),
    };

    let obj = item.as_object().ok_or_else(|| invalid("expected an object"))?;
    let front = required_text(obj.get("front")).ok_or_else(|| invalid("missing front"))?;
    let back = required_text(obj.get("back")).ok_or_else(|| invalid("missing back"))?;

    let options = obj
        .get("wrongOptions")
        .and_then(Value::as_array)
        .ok_or_else(|| invalid("missing wrongOptions"))?;
    if options.len() != WRONG_OPTION_COUNT {
        return Err(ImportError::InvalidCard {
            index,
            reason: format!(
                "expected {WRONG_OPTION_COUNT} wrongOptions, found {}",
                options.len()
            ),
        });
    }

    let mut wrong = options.iter().map(|o| required_text(Some(o)));
    let (Some(Some(first)), Some(Some(second))) = (wrong.next(), wrong.next()) else {
        return Err(invalid("wrongOptions must be non-empty strings"));
    };

    Ok(NewFlashcard {
        front,
        back,
        wrong_options: [first, second],
    })
}

fn required_text(value: Option<&Value>) -> Option<String> {
    let text = value?.as_str()?.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
