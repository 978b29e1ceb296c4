//! Caller-facing configuration.
//!
//! The resampler and quantizer only ever see these enums. Names coming from outside (command line,
//! config files) are parsed here, and anything unrecognized is an error rather than a silent
//! fallback to a default.

use crate::consts::DEFAULT_DITHER_STRENGTH;
use core::{fmt, str::FromStr};
use snafu::{ensure, Snafu};

#[derive(Debug, Clone, PartialEq, Snafu)]
#[snafu(module)]
pub enum ConfigError {
    #[snafu(display("unknown scaling method `{name}` (expected `nearest` or `bilinear`)"))]
    UnknownMethod { name: String },
    #[snafu(display("unknown downscale filter `{name}` (expected `hermite` or `halve`)"))]
    UnknownFilter { name: String },
    #[snafu(display("unknown pixel format `{name}` (expected `rgb565` or `bgra`)"))]
    UnknownFormat { name: String },
    #[snafu(display("dither strength {strength} is outside of 0.0..=1.0"))]
    InvalidStrength { strength: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScaleMethod {
    NearestNeighbour,
    /// Linear interpolation on growing axes, a [`DownscaleFilter`] on shrinking ones.
    #[default]
    Bilinear,
}

/// Filter used when a [`ScaleMethod::Bilinear`] scale shrinks an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DownscaleFilter {
    /// Repeated 2x reductions, with the last step blended between two levels.
    HalveToTarget,
    /// Weighted-area convolution with a `2w³ - 3w² + 1` falloff.
    #[default]
    Hermite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PixelFormat {
    /// 16-bit little-endian RGB565.
    #[default]
    Rgb565,
    /// RGBA with red and blue swapped.
    Bgra,
}

impl PixelFormat {
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgb565 => 2,
            PixelFormat::Bgra => 4,
        }
    }
}

/// Ordered dithering applied before RGB565 quantization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DitherConfig {
    enabled: bool,
    strength: f32,
}

impl DitherConfig {
    pub const fn disabled() -> Self {
        Self {
            enabled: false,
            strength: DEFAULT_DITHER_STRENGTH,
        }
    }

    /// Dithering enabled at [`DEFAULT_DITHER_STRENGTH`].
    pub const fn default_enabled() -> Self {
        Self {
            enabled: true,
            strength: DEFAULT_DITHER_STRENGTH,
        }
    }

    /// Enables dithering with the given strength, which must be within `0.0..=1.0`.
    pub fn enabled(strength: f32) -> Result<Self, ConfigError> {
        ensure!(
            (0.0..=1.0).contains(&strength),
            config_error::InvalidStrengthSnafu { strength }
        );

        Ok(Self {
            enabled: true,
            strength,
        })
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The configured strength. Only consulted when dithering is enabled.
    #[inline]
    pub fn strength(&self) -> f32 {
        self.strength
    }
}

impl Default for DitherConfig {
    fn default() -> Self {
        Self::disabled()
    }
}

/// Everything the driver needs besides the image and its target size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ConvertOptions {
    pub method: ScaleMethod,
    pub downscale_filter: DownscaleFilter,
    pub dither: DitherConfig,
}

impl ConvertOptions {
    pub fn with_method(mut self, method: ScaleMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_downscale_filter(mut self, filter: DownscaleFilter) -> Self {
        self.downscale_filter = filter;
        self
    }

    pub fn with_dither(mut self, dither: DitherConfig) -> Self {
        self.dither = dither;
        self
    }
}

fn matches_any(s: &str, names: &[&str]) -> bool {
    names.iter().any(|name| s.trim().eq_ignore_ascii_case(name))
}

impl FromStr for ScaleMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if matches_any(
            s,
            &["nearest", "nearest-neighbour", "nearest neighbour", "nearest-neighbor"],
        ) {
            Ok(ScaleMethod::NearestNeighbour)
        } else if matches_any(s, &["bilinear", "linear"]) {
            Ok(ScaleMethod::Bilinear)
        } else {
            config_error::UnknownMethodSnafu { name: s }.fail()
        }
    }
}

impl FromStr for DownscaleFilter {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if matches_any(s, &["hermite"]) {
            Ok(DownscaleFilter::Hermite)
        } else if matches_any(s, &["halve", "halve-to-target", "halve to target"]) {
            Ok(DownscaleFilter::HalveToTarget)
        } else {
            config_error::UnknownFilterSnafu { name: s }.fail()
        }
    }
}

impl FromStr for PixelFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if matches_any(s, &["rgb565", "565"]) {
            Ok(PixelFormat::Rgb565)
        } else if matches_any(s, &["bgra"]) {
            Ok(PixelFormat::Bgra)
        } else {
            config_error::UnknownFormatSnafu { name: s }.fail()
        }
    }
}

impl fmt::Display for ScaleMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScaleMethod::NearestNeighbour => "nearest",
            ScaleMethod::Bilinear => "bilinear",
        })
    }
}

impl fmt::Display for DownscaleFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DownscaleFilter::HalveToTarget => "halve",
            DownscaleFilter::Hermite => "hermite",
        })
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PixelFormat::Rgb565 => "rgb565",
            PixelFormat::Bgra => "bgra",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_names() {
        assert_eq!("Nearest Neighbour".parse(), Ok(ScaleMethod::NearestNeighbour));
        assert_eq!("nearest".parse(), Ok(ScaleMethod::NearestNeighbour));
        assert_eq!("BILINEAR".parse(), Ok(ScaleMethod::Bilinear));
        assert_eq!("hermite".parse(), Ok(DownscaleFilter::Hermite));
        assert_eq!("halve-to-target".parse(), Ok(DownscaleFilter::HalveToTarget));
        assert_eq!("bgra".parse(), Ok(PixelFormat::Bgra));
        assert_eq!("rgb565".parse(), Ok(PixelFormat::Rgb565));
    }

    #[test]
    fn display_round_trips() {
        for method in [ScaleMethod::NearestNeighbour, ScaleMethod::Bilinear] {
            assert_eq!(method.to_string().parse(), Ok(method));
        }
        for filter in [DownscaleFilter::HalveToTarget, DownscaleFilter::Hermite] {
            assert_eq!(filter.to_string().parse(), Ok(filter));
        }
    }

    #[test]
    fn unknown_names_are_errors() {
        assert_eq!(
            "bicubic".parse::<ScaleMethod>(),
            Err(ConfigError::UnknownMethod {
                name: "bicubic".into()
            })
        );
        assert_eq!(
            "gaussian".parse::<DownscaleFilter>(),
            Err(ConfigError::UnknownFilter {
                name: "gaussian".into()
            })
        );
        assert!(matches!(
            "rgb888".parse::<PixelFormat>(),
            Err(ConfigError::UnknownFormat { .. })
        ));
        assert!("".parse::<ScaleMethod>().is_err());
    }

    #[test]
    fn defaults() {
        let options = ConvertOptions::default();
        assert_eq!(options.method, ScaleMethod::Bilinear);
        assert_eq!(options.downscale_filter, DownscaleFilter::Hermite);
        assert!(!options.dither.is_enabled());
        assert_eq!(options.dither.strength(), 0.2);
    }

    #[test]
    fn dither_strength_is_validated() {
        assert!(DitherConfig::enabled(0.0).is_ok());
        assert!(DitherConfig::enabled(1.0).is_ok());
        assert!(matches!(
            DitherConfig::enabled(1.5),
            Err(ConfigError::InvalidStrength { .. })
        ));
        assert!(DitherConfig::enabled(-0.1).is_err());
        assert!(DitherConfig::enabled(f32::NAN).is_err());
    }
}
