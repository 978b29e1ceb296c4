use crate::{buffer::BYTES_PER_PIXEL, utils::clamp_u8, Error, PixelBuffer};

/// Where one output coordinate samples from along one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Tap {
    i0: usize,
    i1: usize,
    t: f32,
}

/// Sample positions for every output coordinate, with half-pixel centers and edge clamping.
fn taps(src_len: u32, dst_len: u32) -> Vec<Tap> {
    let scale = src_len as f32 / dst_len as f32;
    let max = (src_len - 1) as f32;
    let last = src_len as usize - 1;

    (0..dst_len)
        .map(|d| {
            let s = ((d as f32 + 0.5) * scale - 0.5).clamp(0.0, max);
            let i0 = s.floor() as usize;
            Tap {
                i0,
                i1: (i0 + 1).min(last),
                t: s - i0 as f32,
            }
        })
        .collect()
}

/// Bilinear resize to `width` x `height`.
///
/// At an exact 2x reduction every output pixel is the mean of a 2x2 source block. Larger
/// reductions skip source pixels, so callers only use this for growing axes and reductions of at
/// most 2x.
pub(crate) fn resize(input: &PixelBuffer, width: u32, height: u32) -> Result<PixelBuffer, Error> {
    if input.dimensions() == (width, height) {
        return Ok(input.clone());
    }

    let xs = taps(input.width(), width);
    let ys = taps(input.height(), height);
    let src = input.as_bytes();

    PixelBuffer::from_rows(width, height, |y, row| {
        let ty = ys[y];
        for (tx, px) in xs.iter().zip(row.chunks_exact_mut(BYTES_PER_PIXEL)) {
            let p00 = input.index(tx.i0, ty.i0);
            let p10 = input.index(tx.i1, ty.i0);
            let p01 = input.index(tx.i0, ty.i1);
            let p11 = input.index(tx.i1, ty.i1);

            for (c, out) in px.iter_mut().enumerate() {
                let [a, b, d, e] = [p00, p10, p01, p11].map(|i| f32::from(src[i + c]));
                let top = a + (b - a) * tx.t;
                let bottom = d + (e - d) * tx.t;
                *out = clamp_u8(top + (bottom - top) * ty.t);
            }
        }
    })
}
