//! One-call entry points combining [`scale`](crate::scale::scale) and the
//! [`quantize`](crate::quantize) conversions.
//!
//! These hold no state. The device formats are always little-endian here; use the functions in
//! [`quantize`](crate::quantize) directly for other byte orders.

use crate::{
    config::{ConvertOptions, PixelFormat},
    quantize, scale,
    utils::LittleEndian,
    Error, PixelBuffer,
};
use std::borrow::Cow;

/// Optionally resamples `input` to `target` and packs it into `format`.
///
/// `target` of `None` (or the input's own size) skips resampling. The dither settings in
/// `options` only apply to [`PixelFormat::Rgb565`].
pub fn convert(
    input: &PixelBuffer,
    target: Option<(u32, u32)>,
    format: PixelFormat,
    options: &ConvertOptions,
) -> Result<Vec<u8>, Error> {
    let image = resample(input, target, options)?;

    tracing::debug!(
        %format,
        width = image.width(),
        height = image.height(),
        dither = options.dither.is_enabled(),
        "packing image"
    );

    Ok(match format {
        PixelFormat::Rgb565 => quantize::to_rgb565::<LittleEndian>(&image, options.dither),
        PixelFormat::Bgra => quantize::to_bgra(&image),
    })
}

/// Resamples `input` to `target` with the method and filter from `options`.
pub fn resample<'a>(
    input: &'a PixelBuffer,
    target: Option<(u32, u32)>,
    options: &ConvertOptions,
) -> Result<Cow<'a, PixelBuffer>, Error> {
    match target {
        Some((width, height)) if (width, height) != input.dimensions() => {
            scale::scale(input, width, height, options.method, options.downscale_filter)
                .map(Cow::Owned)
        }
        _ => Ok(Cow::Borrowed(input)),
    }
}

/// Unpacks device bytes in `format` into a buffer, padding short input with white.
pub fn decode(
    bytes: &[u8],
    width: u32,
    height: u32,
    format: PixelFormat,
) -> Result<PixelBuffer, Error> {
    match format {
        PixelFormat::Rgb565 => quantize::from_rgb565::<LittleEndian>(bytes, width, height),
        PixelFormat::Bgra => quantize::from_bgra(bytes, width, height),
    }
}

/// Number of bytes a `width` x `height` image takes in `format`.
pub fn packed_len(width: u32, height: u32, format: PixelFormat) -> Result<usize, Error> {
    crate::buffer::byte_len(width, height, format.bytes_per_pixel())
}
