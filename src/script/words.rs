use crate::foundation::core::FrameIndex;
use crate::foundation::error::{ToonError, ToonResult};

/// Words spoken per second when estimating the narrated duration.
const WORDS_PER_SECOND: usize = 3;

/// A free-form script split into whitespace-delimited words.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Script {
    words: Vec<String>,
}

impl Script {
    /// Tokenize `text`. Runs of whitespace never produce empty words.
    pub fn parse(text: &str) -> Self {
        Self {
            words: text.split_whitespace().map(str::to_owned).collect(),
        }
    }

    /// Tokenize and reject scripts without a single word.
    pub fn parse_non_empty(text: &str) -> ToonResult<Self> {
        let script = Self::parse(text);
        if script.is_empty() {
            return Err(ToonError::EmptyScript);
        }
        Ok(script)
    }

    /// All words in order.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Number of words.
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// `true` when the script has no words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Rough narration length, `ceil(words / 3)` seconds.
    pub fn estimated_duration_secs(&self) -> u64 {
        self.words.len().div_ceil(WORDS_PER_SECOND) as u64
    }

    /// Words visible at `frame` of a `max_frames` run.
    pub fn revealed(&self, frame: FrameIndex, max_frames: u64) -> &[String] {
        let n = revealed_count(frame, max_frames, self.words.len());
        &self.words[..n]
    }

    /// Visible words joined with single spaces.
    pub fn revealed_text(&self, frame: FrameIndex, max_frames: u64) -> String {
        self.revealed(frame, max_frames).join(" ")
    }
}

/// Number of words revealed at `frame`.
///
/// `floor(frame / max_frames * total) + 1`, clamped to `total`. The final frame of the budget
/// always shows every word, even for scripts longer than the budget.
pub fn revealed_count(frame: FrameIndex, max_frames: u64, total: usize) -> usize {
    if total == 0 {
        return 0;
    }
    if frame.0.saturating_add(1) >= max_frames {
        return total;
    }
    let total_u = total as u128;
    let shown = (u128::from(frame.0) * total_u) / u128::from(max_frames) + 1;
    shown.min(total_u) as usize
}

#[cfg(test)]
#[path = "../../tests/unit/script/words.rs"]
mod tests;
