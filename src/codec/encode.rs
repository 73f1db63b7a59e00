use crate::error::ProcessError;
use crate::models::ImageType;
use colorquant_core::QuantizedImage;
use std::io::Cursor;

/// How a quantized image is written out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    pub image_type: ImageType,
    /// JPEG quality, 1-100
    pub quality: u8,
    /// Re-compress PNG output with oxipng
    pub optimize: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            image_type: ImageType::Jpg,
            quality: 100,
            optimize: false,
        }
    }
}

/// Encode to the container selected by `options`.
pub fn encode(image: &QuantizedImage, options: &EncodeOptions) -> Result<Vec<u8>, ProcessError> {
    match options.image_type {
        ImageType::Png => encode_png(image, options.optimize),
        ImageType::Jpg => encode_jpeg(image, options.quality),
    }
}

/// Encode as an indexed PNG.
///
/// The palette goes into PLTE (plus tRNS when any entry is translucent) and
/// the bit depth is the smallest that addresses every entry.
pub fn encode_png(image: &QuantizedImage, optimize: bool) -> Result<Vec<u8>, ProcessError> {
    let palette = image.palette();
    let width = image.width() as u32;
    let height = image.height() as u32;

    let (bit_depth, bits) = indexed_bit_depth(palette.len());
    let plte: Vec<u8> = palette
        .colors()
        .iter()
        .flat_map(|c| [c.r, c.g, c.b])
        .collect();
    let trns = transparency_chunk(image);
    let packed = if bits == 8 {
        image.indices().to_vec()
    } else {
        pack_nbits(image.indices(), width, bits)
    };

    // Fast settings; oxipng re-compresses when asked to
    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, width, height);
        encoder.set_color(png::ColorType::Indexed);
        encoder.set_depth(bit_depth);
        encoder.set_compression(png::Compression::Fast);
        encoder.set_filter(png::FilterType::NoFilter);
        encoder.set_palette(plte);
        if let Some(trns) = trns {
            encoder.set_trns(trns);
        }
        let mut writer = encoder
            .write_header()
            .map_err(|e| ProcessError::Encode(e.to_string()))?;
        writer
            .write_image_data(&packed)
            .map_err(|e| ProcessError::Encode(e.to_string()))?;
    }
    let png_bytes = buf.into_inner();

    if !optimize {
        return Ok(png_bytes);
    }

    match oxipng::optimize_from_memory(
        &png_bytes,
        &oxipng::Options {
            strip: oxipng::StripChunks::Safe,
            optimize_alpha: false,
            ..Default::default()
        },
    ) {
        Ok(optimized) => {
            tracing::debug!(
                before = png_bytes.len(),
                after = optimized.len(),
                "Optimized PNG"
            );
            Ok(optimized)
        }
        Err(e) => {
            tracing::warn!(%e, "PNG optimization failed, keeping unoptimized output");
            Ok(png_bytes)
        }
    }
}

/// Encode as a baseline RGB JPEG. Alpha is dropped.
pub fn encode_jpeg(image: &QuantizedImage, quality: u8) -> Result<Vec<u8>, ProcessError> {
    let rgb = image.to_rgb();
    let mut buf = Vec::new();
    let mut encoder =
        image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100));
    encoder
        .encode(
            &rgb,
            image.width() as u32,
            image.height() as u32,
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| ProcessError::Encode(e.to_string()))?;
    Ok(buf)
}

/// Smallest indexed bit depth for a palette of `len` entries.
fn indexed_bit_depth(len: usize) -> (png::BitDepth, u8) {
    match len {
        0..=2 => (png::BitDepth::One, 1),
        3..=4 => (png::BitDepth::Two, 2),
        5..=16 => (png::BitDepth::Four, 4),
        _ => (png::BitDepth::Eight, 8),
    }
}

/// Per-entry alpha, trimmed of trailing opaque entries; `None` when fully opaque.
fn transparency_chunk(image: &QuantizedImage) -> Option<Vec<u8>> {
    let colors = image.palette().colors();
    let last_translucent = colors.iter().rposition(|c| !c.is_opaque())?;
    Some(colors[..=last_translucent].iter().map(|c| c.a).collect())
}

/// Pack palette indices into N-bit PNG row data (1, 2, or 4 bits per pixel).
fn pack_nbits(indices: &[u8], width: u32, bits: u8) -> Vec<u8> {
    let pixels_per_byte = 8 / bits as usize;
    let bytes_per_row = (width as usize).div_ceil(pixels_per_byte);
    let height = indices.len() / width as usize;
    let mask = (1u8 << bits) - 1;
    let mut packed = Vec::with_capacity(bytes_per_row * height);

    for row in indices.chunks(width as usize) {
        let mut byte = 0u8;
        for (i, &idx) in row.iter().enumerate() {
            let shift = (8 - bits) - (i % pixels_per_byte) as u8 * bits;
            byte |= (idx & mask) << shift;

            if (i % pixels_per_byte) == pixels_per_byte - 1 || i == row.len() - 1 {
                packed.push(byte);
                byte = 0;
            }
        }
    }

    packed
}
