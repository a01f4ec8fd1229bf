use crate::foundation::core::Canvas;

/// A rendered frame as RGBA8 pixels.
///
/// Frames are **premultiplied alpha**; the flag keeps that explicit at API boundaries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Pixel at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// The drawing surface frames are painted onto.
///
/// A surface whose dimensions cannot back a raster context (zero, or wider/taller than
/// `u16::MAX`) has no context: drawing into it is a silent no-op.
pub struct Surface {
    canvas: Canvas,
    raster: Option<Raster>,
}

pub(crate) struct Raster {
    pub(crate) ctx: vello_cpu::RenderContext,
    pub(crate) pixmap: vello_cpu::Pixmap,
}

impl Surface {
    /// Allocate a surface for `canvas`.
    pub fn new(canvas: Canvas) -> Self {
        let raster = match (u16::try_from(canvas.width), u16::try_from(canvas.height)) {
            (Ok(w), Ok(h)) if w > 0 && h > 0 => Some(Raster {
                ctx: vello_cpu::RenderContext::new(w, h),
                pixmap: vello_cpu::Pixmap::new(w, h),
            }),
            _ => None,
        };
        Self { canvas, raster }
    }

    /// A surface without a drawing context.
    pub fn detached(canvas: Canvas) -> Self {
        Self {
            canvas,
            raster: None,
        }
    }

    /// Surface dimensions.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// `true` when a drawing context is available.
    pub fn is_available(&self) -> bool {
        self.raster.is_some()
    }

    pub(crate) fn raster_mut(&mut self) -> Option<&mut Raster> {
        self.raster.as_mut()
    }

    /// Copy of the last painted content, `None` without a context.
    pub fn snapshot(&self) -> Option<FrameRGBA> {
        let raster = self.raster.as_ref()?;
        Some(FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data: raster.pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;
