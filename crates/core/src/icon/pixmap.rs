use crate::color::Color;

/// RGBA image data produced by an icon backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pixmap {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

const SAMPLES: usize = 4;

fn byte_len(width: u32, height: u32) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(SAMPLES)
}

impl Pixmap {
    /// Creates a fully transparent pixmap.
    ///
    /// Dimensions whose byte length doesn't fit in memory yield an empty pixmap.
    pub fn new(width: u32, height: u32) -> Pixmap {
        match byte_len(width, height) {
            Some(len) => Pixmap {
                width,
                height,
                data: vec![0; len],
            },
            None => Pixmap {
                width: 0,
                height: 0,
                data: Vec::new(),
            },
        }
    }

    /// Wraps existing RGBA bytes, returning `None` when the length doesn't match.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Option<Pixmap> {
        if byte_len(width, height)? != data.len() {
            return None;
        }

        Some(Pixmap {
            width,
            height,
            data,
        })
    }

    /// Creates a pixmap filled with one color.
    pub fn filled(width: u32, height: u32, color: Color) -> Pixmap {
        let mut pixmap = Pixmap::new(width, height);
        for chunk in pixmap.data.chunks_exact_mut(SAMPLES) {
            chunk.copy_from_slice(&color.to_rgba());
        }
        pixmap
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> [u8; 4] {
        if x >= self.width || y >= self.height || self.data.is_empty() {
            return [0; 4];
        }

        let addr = SAMPLES * (y as usize * self.width as usize + x as usize);
        let mut rgba = [0; 4];
        rgba.copy_from_slice(&self.data[addr..addr + SAMPLES]);
        rgba
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height || self.data.is_empty() {
            return;
        }

        let addr = SAMPLES * (y as usize * self.width as usize + x as usize);
        self.data[addr..addr + SAMPLES].copy_from_slice(&rgba);
    }

    /// Nearest-neighbour scale so the image fits a `size`×`size` box,
    /// keeping the aspect ratio.
    pub fn fit_square(&self, size: u32) -> Pixmap {
        if size == 0 || self.width == 0 || self.height == 0 {
            return Pixmap::new(0, 0);
        }

        if self.width.max(self.height) == size {
            return self.clone();
        }

        let scale = size as f32 / self.width.max(self.height) as f32;
        let width = ((self.width as f32 * scale).round() as u32).max(1);
        let height = ((self.height as f32 * scale).round() as u32).max(1);

        let mut scaled = Pixmap::new(width, height);
        for y in 0..height {
            let sy = ((y as f32 / scale) as u32).min(self.height - 1);
            for x in 0..width {
                let sx = ((x as f32 / scale) as u32).min(self.width - 1);
                scaled.set_pixel(x, y, self.get_pixel(sx, sy));
            }
        }

        scaled
    }

    /// Source-in tint: every pixel takes the tint's color channels, alpha is
    /// the product of both alphas.
    pub fn tinted(&self, tint: Color) -> Pixmap {
        let [r, g, b, a] = tint.to_rgba();
        let mut out = self.clone();
        for chunk in out.data.chunks_exact_mut(SAMPLES) {
            let alpha = (chunk[3] as u16 * a as u16 + 127) / 255;
            chunk.copy_from_slice(&[r, g, b, alpha as u8]);
        }
        out
    }
}

/// A resolved icon as attached to a chrome element.
///
/// The source pixels are kept untouched and the tint is recorded separately,
/// so re-tinting replaces the previous tint instead of compounding it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Icon {
    source: Pixmap,
    tint: Option<Color>,
}

impl Icon {
    pub fn new(source: Pixmap) -> Icon {
        Icon { source, tint: None }
    }

    pub fn set_tint(&mut self, tint: Color) {
        self.tint = Some(tint);
    }

    pub fn tint(&self) -> Option<Color> {
        self.tint
    }

    pub fn source(&self) -> &Pixmap {
        &self.source
    }

    /// The pixels as they should appear on screen.
    pub fn rendered(&self) -> Pixmap {
        match self.tint {
            Some(tint) => self.source.tinted(tint),
            None => self.source.clone(),
        }
    }
}
