//! Resampling of [`PixelBuffer`]s to a new size.

use crate::{
    config::{DownscaleFilter, ScaleMethod},
    Error, InvalidDimensionsSnafu, PixelBuffer,
};
use snafu::ensure;

mod halve;
mod hermite;
mod linear;
mod nearest;

/// How one axis changes size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AxisChange {
    Grow,
    Shrink,
    Keep,
}

impl AxisChange {
    fn of(from: u32, to: u32) -> Self {
        match to.cmp(&from) {
            core::cmp::Ordering::Greater => AxisChange::Grow,
            core::cmp::Ordering::Less => AxisChange::Shrink,
            core::cmp::Ordering::Equal => AxisChange::Keep,
        }
    }
}

/// Resamples `input` to `width` x `height`.
///
/// - [`ScaleMethod::NearestNeighbour`] copies the source pixel at
///   `(floor(x * src_w / w), floor(y * src_h / h))`.
/// - [`ScaleMethod::Bilinear`] interpolates linearly when growing and uses `filter` when
///   shrinking. If one axis grows and the other shrinks, the growing axis is scaled first and the
///   result is scaled again, which is then a pure downscale. Upscaling first keeps the result
///   noticeably sharper than the other way around.
///
/// Scaling to the input's own size returns an identical copy.
pub fn scale(
    input: &PixelBuffer,
    width: u32,
    height: u32,
    method: ScaleMethod,
    filter: DownscaleFilter,
) -> Result<PixelBuffer, Error> {
    ensure!(width > 0 && height > 0, InvalidDimensionsSnafu { width, height });

    if input.dimensions() == (width, height) {
        return Ok(input.clone());
    }

    match method {
        ScaleMethod::NearestNeighbour => nearest::scale(input, width, height),
        ScaleMethod::Bilinear => bilinear(input, width, height, filter),
    }
}

fn bilinear(
    input: &PixelBuffer,
    width: u32,
    height: u32,
    filter: DownscaleFilter,
) -> Result<PixelBuffer, Error> {
    use AxisChange::*;

    let x = AxisChange::of(input.width(), width);
    let y = AxisChange::of(input.height(), height);
    tracing::debug!(
        from = ?input.dimensions(),
        to = ?(width, height),
        ?x,
        ?y,
        %filter,
        "bilinear scale"
    );

    match (x, y) {
        (Grow | Keep, Grow | Keep) => linear::resize(input, width, height),
        (Shrink | Keep, Shrink | Keep) => downscale(input, width, height, filter),
        (Grow, Shrink) => {
            let partial = linear::resize(input, width, input.height())?;
            scale(&partial, width, height, ScaleMethod::Bilinear, filter)
        }
        (Shrink, Grow) => {
            let partial = linear::resize(input, input.width(), height)?;
            scale(&partial, width, height, ScaleMethod::Bilinear, filter)
        }
    }
}

fn downscale(
    input: &PixelBuffer,
    width: u32,
    height: u32,
    filter: DownscaleFilter,
) -> Result<PixelBuffer, Error> {
    match filter {
        DownscaleFilter::HalveToTarget => halve::halve_to_target(input, width, height),
        DownscaleFilter::Hermite => hermite::downscale(input, width, height),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const METHODS: [(ScaleMethod, DownscaleFilter); 3] = [
        (ScaleMethod::NearestNeighbour, DownscaleFilter::Hermite),
        (ScaleMethod::Bilinear, DownscaleFilter::Hermite),
        (ScaleMethod::Bilinear, DownscaleFilter::HalveToTarget),
    ];

    fn noise(width: u32, height: u32) -> PixelBuffer {
        let mut state = 0x2545_f491u32;
        let data = (0..width * height * 4)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                state as u8
            })
            .collect();
        PixelBuffer::from_vec(width, height, data).unwrap()
    }

    #[test]
    fn axis_classification() {
        assert_eq!(AxisChange::of(10, 20), AxisChange::Grow);
        assert_eq!(AxisChange::of(10, 5), AxisChange::Shrink);
        assert_eq!(AxisChange::of(10, 10), AxisChange::Keep);
    }

    #[test]
    fn same_size_is_identity() {
        let input = noise(13, 7);
        for (method, filter) in METHODS {
            assert_eq!(scale(&input, 13, 7, method, filter).unwrap(), input);
        }
    }

    #[test]
    fn zero_target_is_rejected() {
        let input = noise(4, 4);
        for (method, filter) in METHODS {
            assert!(matches!(
                scale(&input, 0, 4, method, filter),
                Err(Error::InvalidDimensions {
                    width: 0,
                    height: 4
                })
            ));
            assert!(scale(&input, 4, 0, method, filter).is_err());
        }
    }

    #[test]
    fn nearest_upscale_fills_quadrants() {
        let colors = [
            [255, 0, 0, 255],
            [0, 255, 0, 255],
            [0, 0, 255, 255],
            [10, 20, 30, 40],
        ];
        let input = PixelBuffer::from_vec(2, 2, colors.concat()).unwrap();

        let output = scale(
            &input,
            4,
            4,
            ScaleMethod::NearestNeighbour,
            DownscaleFilter::Hermite,
        )
        .unwrap();

        for y in 0..4 {
            for x in 0..4 {
                let expected = colors[((y / 2) * 2 + x / 2) as usize];
                assert_eq!(output.pixel(x, y), expected, "at ({x}, {y})");
            }
        }
    }

    #[test]
    fn mixed_directions_reach_exact_size() {
        let input = noise(100, 50);
        for (method, filter) in METHODS {
            let output = scale(&input, 150, 25, method, filter).unwrap();
            assert_eq!(output.dimensions(), (150, 25));

            let output = scale(&input, 40, 90, method, filter).unwrap();
            assert_eq!(output.dimensions(), (40, 90));
        }
    }

    #[test]
    fn uniform_color_survives_downscaling() {
        let color = [200, 100, 50, 255];
        let input = PixelBuffer::filled(97, 61, color).unwrap();

        for filter in [DownscaleFilter::Hermite, DownscaleFilter::HalveToTarget] {
            for (w, h) in [(48, 30), (10, 10), (1, 1), (96, 3), (97, 20)] {
                let output = scale(&input, w, h, ScaleMethod::Bilinear, filter).unwrap();
                assert_eq!(output.dimensions(), (w, h));
                assert!(
                    output.pixels().all(|p| p == color),
                    "{filter} to {w}x{h} changed the color"
                );
            }
        }
    }

    #[test]
    fn input_is_untouched() {
        let input = noise(31, 17);
        let copy = input.clone();
        for (method, filter) in METHODS {
            scale(&input, 62, 5, method, filter).unwrap();
            scale(&input, 8, 40, method, filter).unwrap();
        }
        assert_eq!(input, copy);
    }

    #[test]
    fn repeated_calls_are_deterministic() {
        let input = noise(64, 48);
        for (method, filter) in METHODS {
            let a = scale(&input, 23, 17, method, filter).unwrap();
            let b = scale(&input, 23, 17, method, filter).unwrap();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn upscale_keeps_endpoints() {
        let data = [[0, 0, 0, 255], [255, 255, 255, 255]].concat();
        let input = PixelBuffer::from_vec(2, 1, data).unwrap();

        let output = scale(&input, 8, 2, ScaleMethod::Bilinear, DownscaleFilter::Hermite).unwrap();
        let reds: Vec<_> = (0..8).map(|x| output.pixel(x, 1)[0]).collect();

        assert_eq!(reds[0], 0);
        assert_eq!(reds[7], 255);
        assert!(reds.windows(2).all(|w| w[0] <= w[1]), "{reds:?}");
    }
}
