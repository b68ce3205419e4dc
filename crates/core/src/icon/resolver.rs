use super::{IconError, IconRequest, IconResolver, Pixmap};
use crate::settings::ChromeSettings;
use png::{ColorType, Transformations};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

const PNG_EXTENSION: &str = "png";

/// Largest accepted edge of a source image, in pixels.
pub const MAX_SOURCE_EDGE: u32 = 1024;
/// Decoder memory ceiling, enough for a full 16-bit RGBA image at the maximum edge.
const DECODER_BYTE_LIMIT: usize = 8 * MAX_SOURCE_EDGE as usize * MAX_SOURCE_EDGE as usize;

/// Resolves icon references as PNG files relative to a root directory.
///
/// Images of any PNG color type are normalised to 8-bit RGBA and scaled to
/// fit the requested square size.
#[derive(Debug, Clone)]
pub struct PngIconResolver {
    root: PathBuf,
}

impl PngIconResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        PngIconResolver { root: root.into() }
    }

    /// Uses the configured icon directory, or the working directory.
    pub fn from_settings(settings: &ChromeSettings) -> Self {
        PngIconResolver::new(
            settings
                .icon_directory
                .clone()
                .unwrap_or_else(|| PathBuf::from(".")),
        )
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn decode(path: &Path) -> Result<Pixmap, IconError> {
        let file = File::open(path)?;
        let mut limits = png::Limits::default();
        limits.bytes = DECODER_BYTE_LIMIT;
        let mut decoder = png::Decoder::new_with_limits(BufReader::new(file), limits);
        decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);
        let mut reader = decoder.read_info()?;

        let (width, height) = {
            let info = reader.info();
            (info.width, info.height)
        };
        // Headers are checked before anything is sized from them.
        if width > MAX_SOURCE_EDGE || height > MAX_SOURCE_EDGE {
            return Err(IconError::UnsupportedFormat(format!(
                "{}x{} exceeds {}px icon limit in {}",
                width,
                height,
                MAX_SOURCE_EDGE,
                path.display()
            )));
        }

        let mut buf = vec![0; 4 * width as usize * height as usize];
        let frame = reader.next_frame(&mut buf)?;
        buf.truncate(frame.buffer_size());

        let rgba = match frame.color_type {
            ColorType::Rgba => buf,
            ColorType::Rgb => buf
                .chunks_exact(3)
                .flat_map(|px| [px[0], px[1], px[2], 0xFF])
                .collect(),
            ColorType::Grayscale => buf.iter().flat_map(|&g| [g, g, g, 0xFF]).collect(),
            ColorType::GrayscaleAlpha => buf
                .chunks_exact(2)
                .flat_map(|px| [px[0], px[0], px[0], px[1]])
                .collect(),
            ColorType::Indexed => {
                return Err(IconError::UnsupportedFormat(format!(
                    "unexpanded palette in {}",
                    path.display()
                )))
            }
        };

        Pixmap::from_rgba(frame.width, frame.height, rgba).ok_or_else(|| {
            IconError::UnsupportedFormat(format!("truncated image data in {}", path.display()))
        })
    }
}

impl IconResolver for PngIconResolver {
    fn resolve(&self, request: &IconRequest<'_>) -> Result<Pixmap, IconError> {
        if request.size == 0 {
            return Err(IconError::EmptyTarget);
        }

        let path = self.root.join(request.icon.as_str());
        let is_png = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case(PNG_EXTENSION))
            .unwrap_or(false);
        if !is_png {
            return Err(IconError::UnsupportedFormat(request.icon.to_string()));
        }

        if !path.is_file() {
            return Err(IconError::NotFound(path));
        }

        let pixmap = Self::decode(&path)?;
        Ok(pixmap.fit_square(request.size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icon::IconRef;
    use anyhow::Error;
    use std::io::BufWriter;
    use tempfile::TempDir;

    fn write_png(path: &Path, width: u32, height: u32, color: ColorType, data: &[u8]) -> Result<(), Error> {
        let file = File::create(path)?;
        let mut encoder = png::Encoder::new(BufWriter::new(file), width, height);
        encoder.set_color(color);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(data)?;
        writer.finish()?;
        Ok(())
    }

    #[test]
    fn test_resolves_rgba_png_scaled_to_target() -> Result<(), Error> {
        let temp_dir = TempDir::new()?;
        let data: Vec<u8> = [0x10, 0x20, 0x30, 0xFF].repeat(8 * 8);
        write_png(&temp_dir.path().join("star.png"), 8, 8, ColorType::Rgba, &data)?;

        let resolver = PngIconResolver::new(temp_dir.path());
        let icon = IconRef::from("star.png");
        let pixmap = resolver.resolve(&IconRequest {
            icon: &icon,
            size: 4,
            tint: None,
        })?;

        assert_eq!((pixmap.width, pixmap.height), (4, 4));
        assert_eq!(pixmap.get_pixel(3, 3), [0x10, 0x20, 0x30, 0xFF]);

        Ok(())
    }

    #[test]
    fn test_grayscale_png_becomes_opaque_rgba() -> Result<(), Error> {
        let temp_dir = TempDir::new()?;
        write_png(&temp_dir.path().join("dot.png"), 2, 1, ColorType::Grayscale, &[0x00, 0x80])?;

        let resolver = PngIconResolver::new(temp_dir.path());
        let icon = IconRef::from("dot.png");
        let pixmap = resolver.resolve(&IconRequest {
            icon: &icon,
            size: 2,
            tint: None,
        })?;

        assert_eq!(pixmap.get_pixel(0, 0), [0x00, 0x00, 0x00, 0xFF]);
        assert_eq!(pixmap.get_pixel(1, 0), [0x80, 0x80, 0x80, 0xFF]);

        Ok(())
    }

    #[test]
    fn test_missing_file_is_not_found() -> Result<(), Error> {
        let temp_dir = TempDir::new()?;
        let resolver = PngIconResolver::new(temp_dir.path());
        let icon = IconRef::from("absent.png");

        let result = resolver.resolve(&IconRequest {
            icon: &icon,
            size: 16,
            tint: None,
        });

        assert!(matches!(result, Err(IconError::NotFound(_))));
        Ok(())
    }

    #[test]
    fn test_non_png_reference_is_rejected() {
        let resolver = PngIconResolver::new("icons");
        let icon = IconRef::from("icon.svg");

        let result = resolver.resolve(&IconRequest {
            icon: &icon,
            size: 16,
            tint: None,
        });

        assert!(matches!(result, Err(IconError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_zero_size_is_rejected_before_io() {
        let resolver = PngIconResolver::new("does-not-exist");
        let icon = IconRef::from("icon.png");

        let result = resolver.resolve(&IconRequest {
            icon: &icon,
            size: 0,
            tint: None,
        });

        assert!(matches!(result, Err(IconError::EmptyTarget)));
    }

    #[test]
    fn test_from_settings_uses_icon_directory() {
        let mut settings = ChromeSettings::default();
        assert_eq!(PngIconResolver::from_settings(&settings).root(), Path::new("."));

        settings.icon_directory = Some(PathBuf::from("assets/icons"));
        assert_eq!(
            PngIconResolver::from_settings(&settings).root(),
            Path::new("assets/icons")
        );
    }

    #[test]
    fn test_huge_header_is_rejected_without_allocating() -> Result<(), Error> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("bomb.png");
        {
            let file = File::create(&path)?;
            let mut encoder = png::Encoder::new(BufWriter::new(file), 1_000_000, 1_000_000);
            encoder.set_color(ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            // Header only: the writer is dropped before any image data.
            let _writer = encoder.write_header()?;
        }

        let resolver = PngIconResolver::new(temp_dir.path());
        let icon = IconRef::from("bomb.png");
        let result = resolver.resolve(&IconRequest {
            icon: &icon,
            size: 24,
            tint: None,
        });

        assert!(result.is_err());
        Ok(())
    }

    #[test]
    fn test_source_larger_than_edge_limit_is_unsupported() -> Result<(), Error> {
        let temp_dir = TempDir::new()?;
        let width = MAX_SOURCE_EDGE + 1;
        write_png(
            &temp_dir.path().join("wide.png"),
            width,
            1,
            ColorType::Grayscale,
            &vec![0x40; width as usize],
        )?;

        let resolver = PngIconResolver::new(temp_dir.path());
        let icon = IconRef::from("wide.png");
        let result = resolver.resolve(&IconRequest {
            icon: &icon,
            size: 24,
            tint: None,
        });

        assert!(matches!(result, Err(IconError::UnsupportedFormat(_))));
        Ok(())
    }
}
