use crate::foundation::core::Canvas;
use crate::script::words::Script;

/// Animation style picked by the user. Purely a label: rendering ignores it.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum AnimationStyle {
    /// "Classic Cartoon".
    #[default]
    Cartoon,
    /// "Anime Style".
    Anime,
    /// "Pixar 3D".
    Pixar,
    /// "Comic Book".
    Comic,
}

impl AnimationStyle {
    /// Every style in display order.
    pub const ALL: [Self; 4] = [Self::Cartoon, Self::Anime, Self::Pixar, Self::Comic];

    /// Stable lowercase id.
    pub fn id(self) -> &'static str {
        match self {
            Self::Cartoon => "cartoon",
            Self::Anime => "anime",
            Self::Pixar => "pixar",
            Self::Comic => "comic",
        }
    }

    /// Human readable name.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Cartoon => "Classic Cartoon",
            Self::Anime => "Anime Style",
            Self::Pixar => "Pixar 3D",
            Self::Comic => "Comic Book",
        }
    }

    /// Badge shown next to the name.
    pub fn emoji(self) -> &'static str {
        match self {
            Self::Cartoon => "\u{1f3a8}",
            Self::Anime => "\u{26a1}",
            Self::Pixar => "\u{1f3ac}",
            Self::Comic => "\u{1f4a5}",
        }
    }
}

/// Narration voice picked by the user. No audio is ever produced.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum VoiceStyle {
    /// "Friendly Narrator".
    #[default]
    Friendly,
    /// "Energetic Host".
    Energetic,
    /// "Professional Voice".
    Professional,
    /// "Kid-Friendly".
    Kid,
}

impl VoiceStyle {
    /// Every voice in display order.
    pub const ALL: [Self; 4] = [
        Self::Friendly,
        Self::Energetic,
        Self::Professional,
        Self::Kid,
    ];

    /// Stable lowercase id.
    pub fn id(self) -> &'static str {
        match self {
            Self::Friendly => "friendly",
            Self::Energetic => "energetic",
            Self::Professional => "professional",
            Self::Kid => "kid",
        }
    }

    /// Human readable name.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Friendly => "Friendly Narrator",
            Self::Energetic => "Energetic Host",
            Self::Professional => "Professional Voice",
            Self::Kid => "Kid-Friendly",
        }
    }
}

/// Summary shown once a generation completes.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct VideoDetails {
    /// Style display name.
    pub style: String,
    /// Voice display name.
    pub voice: String,
    /// Estimated narration length in seconds.
    pub duration_secs: u64,
    /// Output format description.
    pub format: String,
}

impl VideoDetails {
    /// Build the summary for a finished generation.
    pub fn new(
        script: &Script,
        style: AnimationStyle,
        voice: VoiceStyle,
        canvas: Canvas,
    ) -> Self {
        Self {
            style: style.display_name().to_owned(),
            voice: voice.display_name().to_owned(),
            duration_secs: script.estimated_duration_secs(),
            format: format!("Animated Canvas ({}x{})", canvas.width, canvas.height),
        }
    }
}

impl std::fmt::Display for VideoDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Style: {}", self.style)?;
        writeln!(f, "Voice: {}", self.voice)?;
        writeln!(f, "Duration: ~{} seconds", self.duration_secs)?;
        write!(f, "Format: {}", self.format)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/script/options.rs"]
mod tests;
