/// Motion curves for the character and sparkles.
pub mod motion;
