//! Downscaling by repeated halving, in the spirit of mip-level selection.
//!
//! Each axis is halved with the linear filter while it is more than twice its target, so every
//! step is an exact-enough 2x box reduction. The last step to the target size would otherwise
//! "pop" whenever the source crosses a power-of-two multiple of the target, so it is a blend
//! between the last level and one further halving, weighted by how close the target is to each.
//! The blend happens at the last level's size and is then resized to the target.

use super::linear;
use crate::{Error, PixelBuffer};
use std::borrow::Cow;

/// One axis that still needs the extra halving step.
#[derive(Debug, Clone, Copy)]
struct FinalStep {
    target: u32,
    current: u32,
    next: u32,
}

impl FinalStep {
    fn for_axis(current: u32, target: u32) -> Option<Self> {
        (current > target).then(|| FinalStep {
            target,
            current,
            next: current / 2,
        })
    }

    /// How much of the current (larger) level goes into the blend. `current > target >= next`
    /// keeps this within `0.0..=1.0`.
    fn factor(&self) -> f32 {
        (self.target - self.next) as f32 / (self.current - self.next) as f32
    }
}

/// Weight of the current level, averaged over the axes taking the final step.
fn blend_factor(steps: &[FinalStep]) -> f32 {
    if steps.is_empty() {
        return 1.0;
    }

    steps.iter().map(FinalStep::factor).sum::<f32>() / steps.len() as f32
}

#[inline]
fn halved(current: u32, target: u32) -> u32 {
    if u64::from(current) > 2 * u64::from(target) {
        current / 2
    } else {
        current
    }
}

pub(crate) fn halve_to_target(
    input: &PixelBuffer,
    width: u32,
    height: u32,
) -> Result<PixelBuffer, Error> {
    let mut current = Cow::Borrowed(input);
    let mut levels = 0;

    loop {
        let (w, h) = current.dimensions();
        let next = (halved(w, width), halved(h, height));
        if next == (w, h) {
            break;
        }

        current = Cow::Owned(linear::resize(&current, next.0, next.1)?);
        levels += 1;
    }

    let (w, h) = current.dimensions();
    let steps: Vec<_> = [FinalStep::for_axis(w, width), FinalStep::for_axis(h, height)]
        .into_iter()
        .flatten()
        .collect();

    tracing::trace!(levels, w, h, width, height, "halving settled");

    if steps.is_empty() {
        return linear::resize(&current, width, height);
    }

    let next_w = if w > width { w / 2 } else { w };
    let next_h = if h > height { h / 2 } else { h };
    let next = linear::resize(&current, next_w, next_h)?;

    let factor = blend_factor(&steps);
    tracing::trace!(factor, next_w, next_h, "blending final level");

    let next = linear::resize(&next, w, h)?;
    let blended = current.blend(&next, factor);

    linear::resize(&blended, width, height)
}
