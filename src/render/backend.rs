/// A rendered frame as RGBA8 pixels.
///
/// Frames are premultiplied alpha; the flag makes that explicit at API boundaries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

impl FrameRGBA {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; (width as usize) * (height as usize) * 4],
            premultiplied: true,
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + x as usize) * 4;
        Some([self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]])
    }

    /// Straight-alpha copy of the pixels.
    pub fn to_straight(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        if self.premultiplied {
            crate::render::pixel::unpremultiply_in_place(&mut out);
        }
        out
    }

    /// Copy `src` into this frame with its top-left corner at `(x, y)`, clipping at the edges.
    pub fn blit(&mut self, src: &FrameRGBA, x: u32, y: u32) {
        if x >= self.width || y >= self.height {
            return;
        }
        let w = src.width.min(self.width - x) as usize;
        for row in 0..src.height.min(self.height - y) {
            let s = (row as usize) * (src.width as usize) * 4;
            let d = (((y + row) as usize) * (self.width as usize) + x as usize) * 4;
            self.data[d..d + w * 4].copy_from_slice(&src.data[s..s + w * 4]);
        }
    }

    /// Count of pixels differing from `rgba`.
    pub fn count_not(&self, rgba: [u8; 4]) -> usize {
        self.data.chunks_exact(4).filter(|px| **px != rgba).count()
    }
}
