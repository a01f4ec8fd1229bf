use crate::foundation::error::{ToonError, ToonResult};

pub use kurbo::{Point, Vec2};

/// Absolute 0-based frame index inside one animation run.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

impl FrameIndex {
    /// Frame position as a float, the time axis used by every motion curve.
    pub fn as_f64(self) -> f64 {
        self.0 as f64
    }

    /// Next frame (saturating).
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

/// Half-open frame range `[start, end)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameRange {
    /// Inclusive range start.
    pub start: FrameIndex,
    /// Exclusive range end.
    pub end: FrameIndex,
}

impl FrameRange {
    /// Create a validated range with `start <= end`.
    pub fn new(start: FrameIndex, end: FrameIndex) -> ToonResult<Self> {
        if start.0 > end.0 {
            return Err(ToonError::validation("FrameRange start must be <= end"));
        }
        Ok(Self { start, end })
    }

    /// The whole run `[0, max_frames)`.
    pub fn budget(max_frames: u64) -> Self {
        Self {
            start: FrameIndex(0),
            end: FrameIndex(max_frames),
        }
    }

    /// Number of frames contained in the range.
    pub fn len_frames(self) -> u64 {
        self.end.0.saturating_sub(self.start.0)
    }

    /// Return `true` when the range has no frames.
    pub fn is_empty(self) -> bool {
        self.start.0 == self.end.0
    }

    /// Return `true` when `f` is inside `[start, end)`.
    pub fn contains(self, f: FrameIndex) -> bool {
        self.start.0 <= f.0 && f.0 < self.end.0
    }

    /// Iterate frame indices in increasing order.
    pub fn iter(self) -> impl Iterator<Item = FrameIndex> {
        (self.start.0..self.end.0).map(FrameIndex)
    }
}

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32,
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> ToonResult<Self> {
        if den == 0 {
            return Err(ToonError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(ToonError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Wall-clock duration of one frame.
    pub fn frame_duration(self) -> std::time::Duration {
        let nanos = 1_000_000_000u64 * u64::from(self.den) / u64::from(self.num);
        std::time::Duration::from_nanos(nanos)
    }
}

/// Surface dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
        }
    }
}

impl Canvas {
    /// Center point, the anchor of the character and the sparkle orbit.
    pub fn center(self) -> Point {
        Point::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }
}

/// Straight-alpha RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Opaque color from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(s: &str) -> ToonResult<Self> {
        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| ToonError::validation(format!("color '{s}' must start with '#'")))?;
        let channel = |i: usize| -> ToonResult<u8> {
            hex.get(i..i + 2)
                .and_then(|c| u8::from_str_radix(c, 16).ok())
                .ok_or_else(|| ToonError::validation(format!("invalid color '{s}'")))
        };
        match hex.len() {
            6 => Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Ok(Self {
                r: channel(0)?,
                g: channel(2)?,
                b: channel(4)?,
                a: channel(6)?,
            }),
            _ => Err(ToonError::validation(format!(
                "color '{s}' must be #rrggbb or #rrggbbaa"
            ))),
        }
    }

    /// Convert to premultiplied bytes.
    pub fn premultiplied(self) -> [u8; 4] {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        [
            premul(self.r, self.a),
            premul(self.g, self.a),
            premul(self.b, self.a),
            self.a,
        ]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
