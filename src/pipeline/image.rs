//! JPG → PNG worker.
//!
//! ## Pixel format
//!
//! Sources that carry an alpha channel keep it (RGBA8); everything else is
//! flattened to opaque RGB8, including greyscale and CMYK JPEGs. The format
//! is sniffed from the file content first and only falls back to the
//! extension, so a PNG with transparency saved as `.jpg` still keeps it.
//!
//! ## Compression level
//!
//! Level 0 stores the image data uncompressed (fastest, largest file);
//! levels 1–9 are passed to the deflate encoder as-is, 9 being the slowest
//! and smallest.
//!
//! PNG is lossless, so the level trades time for size only.

use super::atomic::write_atomically;
use super::{Converter, Format, JPG_TO_PNG};
use crate::config::ImageOptions;
use crate::error::{FileError, FileErrorKind};
use ::image::codecs::png::{CompressionType, FilterType, PngEncoder};
use ::image::{DynamicImage, ImageReader};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Re-encodes images as PNG.
#[derive(Debug, Clone, Default)]
pub struct ImageConverter {
    options: ImageOptions,
}

impl ImageConverter {
    pub fn new(options: ImageOptions) -> Self {
        Self { options }
    }
}

impl Converter for ImageConverter {
    fn format(&self) -> &'static Format {
        &JPG_TO_PNG
    }

    fn convert(&self, input: &Path, output: &Path) -> Result<(), FileError> {
        let decoded = decode(input)?;
        debug!(
            "Decoded {} → {}x{} {:?}",
            input.display(),
            decoded.width(),
            decoded.height(),
            decoded.color()
        );
        let pixels = normalise_pixels(decoded);
        let compression = compression_type(self.options.compression_level());

        write_atomically(output, |tmp| {
            let mut writer = BufWriter::new(tmp);
            let encoder = PngEncoder::new_with_quality(&mut writer, compression, FilterType::Adaptive);
            pixels
                .write_with_encoder(encoder)
                .map_err(|e| FileError::new(input, FileErrorKind::Encode, e))?;
            writer
                .flush()
                .map_err(|e| FileError::io(output, FileErrorKind::Write, e))
        })
    }
}

fn decode(input: &Path) -> Result<DynamicImage, FileError> {
    let reader = ImageReader::open(input)
        .map_err(|e| FileError::io(input, FileErrorKind::Read, e))?
        .with_guessed_format()
        .map_err(|e| FileError::io(input, FileErrorKind::Read, e))?;

    reader
        .decode()
        .map_err(|e| FileError::new(input, FileErrorKind::Decode, e))
}

/// Keep alpha when the source has it, otherwise flatten to opaque RGB.
pub fn normalise_pixels(img: DynamicImage) -> DynamicImage {
    if img.color().has_alpha() {
        DynamicImage::ImageRgba8(img.into_rgba8())
    } else {
        DynamicImage::ImageRgb8(img.into_rgb8())
    }
}

/// Map a 0–9 compression level onto the PNG encoder setting.
pub fn compression_type(level: u8) -> CompressionType {
    match level {
        0 => CompressionType::Uncompressed,
        n => CompressionType::Level(n.min(ImageOptions::MAX_COMPRESSION)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::image::{ColorType, ImageFormat, Luma, LumaA, Rgb, RgbImage, Rgba, RgbaImage};

    fn write_jpeg(path: &Path) {
        RgbImage::from_pixel(8, 6, Rgb([200, 40, 10]))
            .save_with_format(path, ImageFormat::Jpeg)
            .unwrap();
    }

    #[test]
    fn test_compression_mapping() {
        assert!(matches!(compression_type(0), CompressionType::Uncompressed));
        assert!(matches!(compression_type(1), CompressionType::Level(1)));
        assert!(matches!(compression_type(5), CompressionType::Level(5)));
        assert!(matches!(compression_type(9), CompressionType::Level(9)));
    }

    #[test]
    fn opaque_sources_flatten_to_rgb() {
        let grey = DynamicImage::ImageLuma8(::image::GrayImage::from_pixel(2, 2, Luma([7])));
        assert_eq!(normalise_pixels(grey).color(), ColorType::Rgb8);
    }

    #[test]
    fn alpha_sources_keep_alpha() {
        let grey_alpha =
            DynamicImage::ImageLumaA8(::image::GrayAlphaImage::from_pixel(2, 2, LumaA([7, 128])));
        assert_eq!(normalise_pixels(grey_alpha).color(), ColorType::Rgba8);
    }

    #[test]
    fn converts_jpeg_to_opaque_png() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("a.jpg");
        let output = dir.path().join("a.png");
        write_jpeg(&input);

        ImageConverter::default().convert(&input, &output).unwrap();

        let bytes = std::fs::read(&output).unwrap();
        assert_eq!(::image::guess_format(&bytes).unwrap(), ImageFormat::Png);
        let png = ::image::load_from_memory(&bytes).unwrap();
        assert_eq!(png.color(), ColorType::Rgb8);
        assert_eq!((png.width(), png.height()), (8, 6));
    }

    #[test]
    fn transparent_source_keeps_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("logo.jpg");
        let output = dir.path().join("logo.png");
        RgbaImage::from_pixel(4, 4, Rgba([0, 0, 255, 64]))
            .save_with_format(&input, ImageFormat::Png)
            .unwrap();

        ImageConverter::default().convert(&input, &output).unwrap();

        let png = ::image::open(&output).unwrap();
        assert_eq!(png.color(), ColorType::Rgba8);
        assert_eq!(png.to_rgba8().get_pixel(0, 0)[3], 64);
    }

    #[test]
    fn every_level_produces_the_same_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("a.jpg");
        write_jpeg(&input);

        let fast = dir.path().join("fast.png");
        let best = dir.path().join("best.png");
        ImageConverter::new(ImageOptions::new(0).unwrap())
            .convert(&input, &fast)
            .unwrap();
        ImageConverter::new(ImageOptions::new(9).unwrap())
            .convert(&input, &best)
            .unwrap();

        let a = ::image::open(&fast).unwrap().to_rgb8();
        let b = ::image::open(&best).unwrap().to_rgb8();
        assert_eq!(a, b);
    }

    #[test]
    fn level_zero_is_larger_than_level_nine() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("gradient.jpg");
        RgbImage::from_fn(128, 128, |x, y| {
            Rgb([(x * 2) as u8, (y * 2) as u8, ((x + y) % 256) as u8])
        })
        .save_with_format(&input, ImageFormat::Jpeg)
        .unwrap();

        let sizes: Vec<u64> = [0u8, 1, 6, 9]
            .into_iter()
            .map(|level| {
                let out = dir.path().join(format!("level{level}.png"));
                ImageConverter::new(ImageOptions::new(level).unwrap())
                    .convert(&input, &out)
                    .unwrap();
                std::fs::metadata(&out).unwrap().len()
            })
            .collect();

        assert!(sizes[0] > sizes[3], "sizes: {sizes:?}");
        assert!(sizes[0] > sizes[1], "sizes: {sizes:?}");
    }

    #[test]
    fn corrupt_input_is_a_decode_error_and_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("broken.jpg");
        let output = dir.path().join("broken.png");
        std::fs::write(&input, b"definitely not a jpeg").unwrap();

        let err = ImageConverter::default().convert(&input, &output).unwrap_err();
        assert_eq!(err.kind, FileErrorKind::Decode);
        assert_eq!(err.path, input);
        assert!(!output.exists());
    }

    #[test]
    fn missing_input_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ImageConverter::default()
            .convert(&dir.path().join("gone.jpg"), &dir.path().join("gone.png"))
            .unwrap_err();
        assert_eq!(err.kind, FileErrorKind::Read);
    }
}
