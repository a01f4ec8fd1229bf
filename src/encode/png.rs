use std::io::Cursor;
use std::path::Path;

use crate::foundation::error::{ToonError, ToonResult};
use crate::foundation::math::unpremul_u8;
use crate::render::backend::FrameRGBA;

/// File name offered for the downloaded snapshot.
pub const ARTIFACT_FILE_NAME: &str = "youtube-cartoon-animation.png";

/// Still image captured from the drawing surface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifact {
    /// Suggested file name.
    pub file_name: String,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Encoded PNG bytes.
    pub png: Vec<u8>,
}

impl Artifact {
    /// Encode `frame` as the downloadable snapshot.
    pub fn from_frame(frame: &FrameRGBA) -> ToonResult<Self> {
        Ok(Self {
            file_name: ARTIFACT_FILE_NAME.to_owned(),
            width: frame.width,
            height: frame.height,
            png: encode_png(frame)?,
        })
    }

    /// Write the PNG into `dir` under [`Artifact::file_name`], returning the full path.
    pub fn save_into(&self, dir: &Path) -> ToonResult<std::path::PathBuf> {
        std::fs::create_dir_all(dir).map_err(|e| {
            ToonError::encode(format!(
                "failed to create output directory '{}': {e}",
                dir.display()
            ))
        })?;
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.png)
            .map_err(|e| ToonError::encode(format!("failed to write '{}': {e}", path.display())))?;
        Ok(path)
    }
}

/// Encode a frame as PNG (straight-alpha RGBA8).
pub fn encode_png(frame: &FrameRGBA) -> ToonResult<Vec<u8>> {
    let expected = (frame.width as usize)
        .saturating_mul(frame.height as usize)
        .saturating_mul(4);
    if frame.data.len() != expected {
        return Err(ToonError::encode("frame.data size mismatch with width*height*4"));
    }

    let mut straight = frame.data.clone();
    if frame.premultiplied {
        unpremultiply_in_place(&mut straight);
    }

    let mut out = Cursor::new(Vec::new());
    image::write_buffer_with_format(
        &mut out,
        &straight,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .map_err(|e| ToonError::encode(format!("png encoding failed: {e}")))?;
    Ok(out.into_inner())
}

fn unpremultiply_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3];
        if a == 255 {
            continue;
        }
        px[0] = unpremul_u8(px[0], a);
        px[1] = unpremul_u8(px[1], a);
        px[2] = unpremul_u8(px[2], a);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
