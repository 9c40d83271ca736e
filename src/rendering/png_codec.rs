//! PNG decoding to and encoding from [`PixelBuffer<Rgb>`].

use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::Path;

use luma_quant::{PixelBuffer, Rgb};
use serde::{Deserialize, Serialize};

use crate::error::ImageIoError;

/// PNG compression effort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    Fast,
    #[default]
    Default,
    /// Best zlib level, then re-compressed with oxipng.
    Best,
}

impl Compression {
    fn to_png(self) -> png::Compression {
        match self {
            Compression::Fast => png::Compression::Fast,
            Compression::Default => png::Compression::Default,
            Compression::Best => png::Compression::Best,
        }
    }
}

/// Read a PNG file into an RGB buffer.
pub fn load_png(path: &Path) -> Result<PixelBuffer<Rgb>, ImageIoError> {
    let file = File::open(path)?;
    read_png(BufReader::new(file))
}

/// Decode PNG bytes into an RGB buffer.
pub fn decode_png(bytes: &[u8]) -> Result<PixelBuffer<Rgb>, ImageIoError> {
    read_png(Cursor::new(bytes))
}

fn read_png<R: Read>(reader: R) -> Result<PixelBuffer<Rgb>, ImageIoError> {
    let mut decoder = png::Decoder::new(reader);
    // Palette and low bit depths expand to 8-bit, 16-bit strips to 8-bit
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder
        .read_info()
        .map_err(|e| ImageIoError::PngDecode(e.to_string()))?;

    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| ImageIoError::PngDecode(e.to_string()))?;
    let bytes = &buf[..info.buffer_size()];

    if info.bit_depth != png::BitDepth::Eight {
        return Err(ImageIoError::Unsupported(format!(
            "bit depth {:?} after expansion",
            info.bit_depth
        )));
    }

    // Alpha is dropped
    let pixels: Vec<Rgb> = match info.color_type {
        png::ColorType::Grayscale => bytes.iter().map(|&v| Rgb::gray(v)).collect(),
        png::ColorType::GrayscaleAlpha => bytes.chunks_exact(2).map(|c| Rgb::gray(c[0])).collect(),
        png::ColorType::Rgb => bytes
            .chunks_exact(3)
            .map(|c| Rgb::new(c[0], c[1], c[2]))
            .collect(),
        png::ColorType::Rgba => bytes
            .chunks_exact(4)
            .map(|c| Rgb::new(c[0], c[1], c[2]))
            .collect(),
        png::ColorType::Indexed => {
            return Err(ImageIoError::Unsupported(
                "indexed color was not expanded".to_string(),
            ))
        }
    };

    tracing::debug!(
        width = info.width,
        height = info.height,
        color_type = ?info.color_type,
        "Decoded PNG"
    );

    Ok(PixelBuffer::from_vec(
        info.width as usize,
        info.height as usize,
        pixels,
    )?)
}

/// Write an RGB buffer as a PNG file.
///
/// Images where every pixel is gray are stored as 8-bit grayscale,
/// anything else as 8-bit RGB.
pub fn save_png(
    path: &Path,
    image: &PixelBuffer<Rgb>,
    compression: Compression,
) -> Result<(), ImageIoError> {
    let bytes = encode_png(image, compression)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Encode an RGB buffer to PNG bytes.
pub fn encode_png(
    image: &PixelBuffer<Rgb>,
    compression: Compression,
) -> Result<Vec<u8>, ImageIoError> {
    let pixels = image.to_vec();
    let (color_type, data): (png::ColorType, Vec<u8>) = if pixels.iter().all(|p| p.is_gray()) {
        (
            png::ColorType::Grayscale,
            pixels.iter().map(|p| p.red).collect(),
        )
    } else {
        (
            png::ColorType::Rgb,
            pixels.iter().flat_map(|p| p.to_bytes()).collect(),
        )
    };

    let width = u32::try_from(image.width())
        .map_err(|_| ImageIoError::Unsupported(format!("width {}", image.width())))?;
    let height = u32::try_from(image.height())
        .map_err(|_| ImageIoError::Unsupported(format!("height {}", image.height())))?;

    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, width, height);
        encoder.set_color(color_type);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(compression.to_png());
        let mut writer = encoder
            .write_header()
            .map_err(|e| ImageIoError::PngEncode(e.to_string()))?;
        writer
            .write_image_data(&data)
            .map_err(|e| ImageIoError::PngEncode(e.to_string()))?;
        writer
            .finish()
            .map_err(|e| ImageIoError::PngEncode(e.to_string()))?;
    }
    let png_bytes = buf.into_inner();

    if compression != Compression::Best {
        return Ok(png_bytes);
    }

    // Re-compress with oxipng (zopfli + adaptive filter selection)
    match oxipng::optimize_from_memory(
        &png_bytes,
        &oxipng::Options {
            strip: oxipng::StripChunks::Safe,
            optimize_alpha: false,
            ..Default::default()
        },
    ) {
        Ok(optimized) => Ok(optimized),
        Err(e) => {
            tracing::warn!(%e, "oxipng failed, keeping zlib output");
            Ok(png_bytes)
        }
    }
}
