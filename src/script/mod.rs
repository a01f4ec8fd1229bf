/// Cosmetic style/voice selections and the completion summary.
pub mod options;
/// Script tokenization and the word reveal schedule.
pub mod words;
