use crate::{utils::clamp_u8, DataLengthSnafu, Error, InvalidDimensionsSnafu, SizeOverflowSnafu};
use snafu::{ensure, OptionExt};

pub const BYTES_PER_PIXEL: usize = 4;

/// An RGBA8 raster plane.
///
/// The data is row-major with four bytes per pixel in R, G, B, A order. The length of the data is
/// always exactly `4 * width * height` and both dimensions are non-zero.
///
/// Nothing in this crate mutates a buffer it was given; every operation allocates its result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

/// Returns `width * height * bytes_per_pixel`, rejecting zero dimensions and overflow.
pub(crate) fn byte_len(width: u32, height: u32, bytes_per_pixel: usize) -> Result<usize, Error> {
    ensure!(width > 0 && height > 0, InvalidDimensionsSnafu { width, height });

    (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(bytes_per_pixel))
        .context(SizeOverflowSnafu { width, height })
}

impl PixelBuffer {
    pub fn from_vec(width: u32, height: u32, data: Vec<u8>) -> Result<Self, Error> {
        let expected = byte_len(width, height, BYTES_PER_PIXEL)?;
        ensure!(
            data.len() == expected,
            DataLengthSnafu {
                expected,
                actual: data.len()
            }
        );

        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Creates a buffer with every pixel set to `rgba`.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self, Error> {
        let len = byte_len(width, height, BYTES_PER_PIXEL)?;
        let data = rgba.iter().copied().cycle().take(len).collect();

        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Builds a buffer row by row. `fill` receives the row index and the row's bytes, which start
    /// out zeroed.
    pub(crate) fn from_rows<F>(width: u32, height: u32, fill: F) -> Result<Self, Error>
    where
        F: Fn(usize, &mut [u8]) + Send + Sync,
    {
        let len = byte_len(width, height, BYTES_PER_PIXEL)?;
        let mut data = vec![0; len];
        fill_rows(&mut data, width as usize * BYTES_PER_PIXEL, fill);

        Ok(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    /// Returns the RGBA value at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        let i = self.index(x as usize, y as usize);
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    pub fn pixels(&self) -> impl Iterator<Item = [u8; 4]> + '_ {
        self.data
            .chunks_exact(BYTES_PER_PIXEL)
            .map(|p| [p[0], p[1], p[2], p[3]])
    }

    #[inline]
    pub(crate) fn index(&self, x: usize, y: usize) -> usize {
        (y * self.width as usize + x) * BYTES_PER_PIXEL
    }

    /// Per-channel linear blend: `self * factor + other * (1 - factor)`.
    ///
    /// Both buffers must have the same dimensions.
    pub(crate) fn blend(&self, other: &PixelBuffer, factor: f32) -> PixelBuffer {
        debug_assert_eq!(self.dimensions(), other.dimensions());

        let data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(&a, &b)| clamp_u8(f32::from(a) * factor + f32::from(b) * (1.0 - factor)))
            .collect();

        PixelBuffer {
            width: self.width,
            height: self.height,
            data,
        }
    }
}

/// Runs `fill` over every `row_len`-sized row of `data`.
///
/// With the `rayon` feature, rows are processed in parallel. Rows never read each other's output,
/// so the result does not depend on how rows are scheduled.
pub(crate) fn fill_rows<F>(data: &mut [u8], row_len: usize, fill: F)
where
    F: Fn(usize, &mut [u8]) + Send + Sync,
{
    #[cfg(feature = "rayon")]
    {
        use rayon::prelude::*;

        data.par_chunks_mut(row_len)
            .enumerate()
            .for_each(|(y, row)| fill(y, row));
    }

    #[cfg(not(feature = "rayon"))]
    {
        data.chunks_mut(row_len)
            .enumerate()
            .for_each(|(y, row)| fill(y, row));
    }
}
