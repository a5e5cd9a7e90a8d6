//! Sinks for the on-screen text of the scene.
//!
//! The coordinator pushes formatted strings; nothing is ever read back into the
//! episode logic.
use log::info;
use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, Mutex},
};

/// Text fields shown by a display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayField {
    /// Remaining time of the episode, e.g. `"7.00 s"`.
    Time,

    /// Number of finished episodes.
    Iteration,

    /// Number of episodes won by the runner.
    RunnerScore,

    /// Number of episodes won by the chaser.
    ChaserScore,
}

impl fmt::Display for DisplayField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DisplayField::Time => "time",
            DisplayField::Iteration => "iteration",
            DisplayField::RunnerScore => "runner_score",
            DisplayField::ChaserScore => "chaser_score",
        };
        write!(f, "{}", s)
    }
}

/// Formats a remaining time the way it is shown on screen.
pub fn format_time(t: f32) -> String {
    format!("{:.2} s", t)
}

/// Receives text updates.
pub trait Display {
    /// Replaces the text of a field.
    fn update(&mut self, field: DisplayField, text: &str);
}

/// Writes updates to the log.
///
/// Time updates arrive every tick and are written at the `trace` level, the others
/// at the `info` level.
#[derive(Debug, Default)]
pub struct LogDisplay;

impl Display for LogDisplay {
    fn update(&mut self, field: DisplayField, text: &str) {
        match field {
            DisplayField::Time => log::trace!("{}: {}", field, text),
            _ => info!("{}: {}", field, text),
        }
    }
}

/// Discards updates.
#[derive(Debug, Default)]
pub struct NullDisplay;

impl Display for NullDisplay {
    fn update(&mut self, _field: DisplayField, _text: &str) {}
}

/// Keeps the latest text of every field.
///
/// Clones share the same board, so a clone kept outside of the environment sees
/// the updates made through the environment.
#[derive(Debug, Clone, Default)]
pub struct TextBoard {
    texts: Arc<Mutex<HashMap<DisplayField, String>>>,
}

impl TextBoard {
    /// Constructs an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest text of a field, if any.
    pub fn text(&self, field: DisplayField) -> Option<String> {
        match self.texts.lock() {
            Ok(texts) => texts.get(&field).cloned(),
            Err(poisoned) => poisoned.into_inner().get(&field).cloned(),
        }
    }
}

impl Display for TextBoard {
    fn update(&mut self, field: DisplayField, text: &str) {
        let mut texts = match self.texts.lock() {
            Ok(texts) => texts,
            Err(poisoned) => poisoned.into_inner(),
        };
        texts.insert(field, text.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(7.0), "7.00 s");
        assert_eq!(format_time(0.126), "0.13 s");
    }

    #[test]
    fn test_text_board_is_shared_between_clones() {
        let board = TextBoard::new();
        let mut sink = board.clone();
        sink.update(DisplayField::RunnerScore, "3");
        assert_eq!(board.text(DisplayField::RunnerScore), Some("3".to_string()));
        assert_eq!(board.text(DisplayField::Time), None);
    }
}
