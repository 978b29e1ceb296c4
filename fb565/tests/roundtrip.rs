use fb565::{
    quantize::{from_bgra, from_rgb565, to_bgra, to_rgb565},
    utils::LittleEndian,
    DitherConfig, PixelBuffer,
};
use image::{Rgba, RgbaImage};

fn from_image(image: RgbaImage) -> PixelBuffer {
    let (width, height) = image.dimensions();
    PixelBuffer::from_vec(width, height, image.into_raw()).unwrap()
}

fn gradient() -> PixelBuffer {
    from_image(RgbaImage::from_fn(256, 16, |x, y| {
        Rgba([x as u8, (255 - x) as u8, (x / 2 + y * 8) as u8, (y * 16) as u8])
    }))
}

fn channel_means(buffer: &PixelBuffer) -> [f64; 3] {
    let n = f64::from(buffer.width() * buffer.height());
    let mut sums = [0.0; 3];
    for p in buffer.pixels() {
        for c in 0..3 {
            sums[c] += f64::from(p[c]);
        }
    }
    sums.map(|s| s / n)
}

#[test]
fn rgb565_roundtrip() {
    let input = gradient();
    let (width, height) = input.dimensions();

    let packed = to_rgb565::<LittleEndian>(&input, DitherConfig::disabled());
    assert_eq!(packed.len(), (width * height * 2) as usize);

    let output = from_rgb565::<LittleEndian>(&packed, width, height).unwrap();
    for (a, b) in input.pixels().zip(output.pixels()) {
        assert!(a[0].abs_diff(b[0]) <= 255 / 31, "red {a:?} -> {b:?}");
        assert!(a[1].abs_diff(b[1]) <= 255 / 63, "green {a:?} -> {b:?}");
        assert!(a[2].abs_diff(b[2]) <= 255 / 31, "blue {a:?} -> {b:?}");
        assert_eq!(b[3], 255, "alpha is always opaque");
    }
}

#[test]
fn bgra_roundtrip() {
    let input = gradient();
    let (width, height) = input.dimensions();

    let bgra = to_bgra(&input);
    for (rgba, bgra) in input.as_bytes().chunks(4).zip(bgra.chunks(4)) {
        assert_eq!([rgba[2], rgba[1], rgba[0], rgba[3]], bgra);
    }

    assert_eq!(from_bgra(&bgra, width, height).unwrap(), input);
}

#[test]
fn concrete_bytes() {
    let white = PixelBuffer::filled(1, 1, [248, 252, 255, 255]).unwrap();
    assert_eq!(
        to_rgb565::<LittleEndian>(&white, DitherConfig::disabled()),
        [0xFF, 0xFF]
    );

    let red = from_rgb565::<LittleEndian>(&[0x00, 0xF8], 1, 1).unwrap();
    assert_eq!(red.pixel(0, 0), [255, 0, 0, 255]);
}

#[test]
fn dithering_perturbs_gradients() {
    let input = gradient();
    let plain = to_rgb565::<LittleEndian>(&input, DitherConfig::disabled());
    let dithered = to_rgb565::<LittleEndian>(&input, DitherConfig::default_enabled());

    assert_ne!(plain, dithered);
}

#[test]
fn dithering_preserves_flat_averages() {
    for color in [[100, 130, 60, 255], [180, 40, 220, 255]] {
        let input = PixelBuffer::filled(64, 64, color).unwrap();

        let plain = to_rgb565::<LittleEndian>(&input, DitherConfig::disabled());
        let dithered = to_rgb565::<LittleEndian>(&input, DitherConfig::default_enabled());

        let plain = channel_means(&from_rgb565::<LittleEndian>(&plain, 64, 64).unwrap());
        let dithered = channel_means(&from_rgb565::<LittleEndian>(&dithered, 64, 64).unwrap());

        for c in 0..3 {
            assert!(
                (plain[c] - dithered[c]).abs() <= 3.0,
                "channel {c} of {color:?}: {} vs {}",
                plain[c],
                dithered[c]
            );
        }
    }
}

#[test]
fn source_buffer_is_reusable() {
    let input = gradient();
    let copy = input.clone();

    let a = to_rgb565::<LittleEndian>(&input, DitherConfig::default_enabled());
    let _ = to_bgra(&input);
    let b = to_rgb565::<LittleEndian>(&input, DitherConfig::default_enabled());

    assert_eq!(a, b);
    assert_eq!(input, copy);
}
