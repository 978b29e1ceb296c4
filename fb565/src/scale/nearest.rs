use crate::{buffer::BYTES_PER_PIXEL, Error, PixelBuffer};

/// Maps each output coordinate to `floor(d * src_len / dst_len)`.
fn source_indices(src_len: u32, dst_len: u32) -> Vec<usize> {
    (0..u64::from(dst_len))
        .map(|d| (d * u64::from(src_len) / u64::from(dst_len)) as usize)
        .collect()
}

pub(crate) fn scale(input: &PixelBuffer, width: u32, height: u32) -> Result<PixelBuffer, Error> {
    let xs = source_indices(input.width(), width);
    let ys = source_indices(input.height(), height);
    let src = input.as_bytes();

    PixelBuffer::from_rows(width, height, |y, row| {
        let sy = ys[y];
        for (&sx, px) in xs.iter().zip(row.chunks_exact_mut(BYTES_PER_PIXEL)) {
            let i = input.index(sx, sy);
            px.copy_from_slice(&src[i..i + BYTES_PER_PIXEL]);
        }
    })
}
