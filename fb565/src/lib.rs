//! Image preparation for fixed-format, color-limited display framebuffers.
//!
//! `fb565` takes RGBA8 images and gets them ready for a device framebuffer: it resamples them to
//! arbitrary target dimensions and converts between RGBA and the packed device formats.
//!
//! # Pixel formats
//!
//! - [`PixelBuffer`]: RGBA8, four bytes per pixel, row-major.
//! - RGB565: 16 bits per pixel, `RRRRRGGG GGGBBBBB`, stored little-endian. See
//!   [`quantize::to_rgb565`] for the optional ordered dithering applied before quantization.
//! - BGRA: RGBA with the red and blue bytes swapped.
//!
//! # Resampling
//!
//! [`scale::scale`] supports nearest-neighbour and a "bilinear" mode that only interpolates
//! linearly on axes that grow. Shrinking axes go through one of the [`DownscaleFilter`]s instead,
//! since plain bilinear sampling aliases as badly as nearest-neighbour once an axis shrinks by
//! more than half.
//!
//! # Example
//!
//! ```
//! use fb565::{convert, ConvertOptions, PixelBuffer, PixelFormat};
//!
//! let image = PixelBuffer::filled(64, 48, [255, 128, 0, 255])?;
//! let packed = convert::convert(&image, Some((32, 24)), PixelFormat::Rgb565, &ConvertOptions::default())?;
//! assert_eq!(packed.len(), 32 * 24 * 2);
//! # Ok::<(), fb565::Error>(())
//! ```
#![forbid(unsafe_code)]

pub mod buffer;
pub mod config;
pub mod convert;
pub mod quantize;
pub mod scale;
pub mod utils;

#[cfg(feature = "image")]
mod image_interop;

pub use buffer::PixelBuffer;
pub use config::{
    ConfigError, ConvertOptions, DitherConfig, DownscaleFilter, PixelFormat, ScaleMethod,
};

use snafu::Snafu;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("image dimensions must be non-zero, got {width}x{height}"))]
    InvalidDimensions { width: u32, height: u32 },

    #[snafu(display("image dimensions {width}x{height} overflow the addressable buffer size"))]
    SizeOverflow { width: u32, height: u32 },

    #[snafu(display(
        "pixel data has {actual} bytes, but the dimensions require exactly {expected} bytes"
    ))]
    DataLength { expected: usize, actual: usize },

    #[snafu(context(false), display("invalid configuration: {source}"))]
    Config { source: ConfigError },
}

pub mod consts {
    /// Ordered-dithering threshold map.
    ///
    /// ```plain
    ///  0 32  8 40  2 34 10 42
    /// 48 16 56 24 50 18 58 26
    /// 12 44  4 36 14 46  6 38
    /// 60 28 52 20 62 30 54 22
    ///  3 35 11 43  1 33  9 41
    /// 51 19 59 27 49 17 57 25
    /// 15 47  7 39 13 45  5 37
    /// 63 31 55 23 61 29 53 21
    /// ```
    ///
    /// Indexed as `BAYER_8X8[y % 8][x % 8]`. Every value in `0..=63` appears exactly once.
    pub const BAYER_8X8: [[u8; 8]; 8] = [
        [0, 32, 8, 40, 2, 34, 10, 42],
        [48, 16, 56, 24, 50, 18, 58, 26],
        [12, 44, 4, 36, 14, 46, 6, 38],
        [60, 28, 52, 20, 62, 30, 54, 22],
        [3, 35, 11, 43, 1, 33, 9, 41],
        [51, 19, 59, 27, 49, 17, 57, 25],
        [15, 47, 7, 39, 13, 45, 5, 37],
        [63, 31, 55, 23, 61, 29, 53, 21],
    ];

    /// Subtracted from the red/blue threshold after it was rescaled to `0..=31`.
    ///
    /// The mean of the rescaled threshold is 15.5, so this leans the offset slightly towards
    /// darkening, which offsets the lightening skew of the matrix.
    pub const DITHER_RB_BIAS: f32 = 18.0;

    /// Subtracted from the raw threshold for the green channel.
    pub const DITHER_G_BIAS: f32 = 36.0;

    /// Green is perceptually dominant; full-strength dithering on it shows up as a color cast.
    pub const DITHER_G_SCALE: f32 = 0.5;

    pub const DEFAULT_DITHER_STRENGTH: f32 = 0.2;

    /// Alpha divisor for the alpha-aware color weights of the Hermite filter.
    ///
    /// Translucent source pixels contribute `weight * alpha / 250` to the color channels. Note
    /// that this is 250, not 255; it is kept as is.
    pub const HERMITE_ALPHA_DIVISOR: f32 = 250.0;
}
