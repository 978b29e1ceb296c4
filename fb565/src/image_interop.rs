use crate::{Error, PixelBuffer};
use image::RgbaImage;

impl TryFrom<RgbaImage> for PixelBuffer {
    type Error = Error;

    fn try_from(image: RgbaImage) -> Result<Self, Self::Error> {
        let (width, height) = image.dimensions();
        PixelBuffer::from_vec(width, height, image.into_raw())
    }
}

impl From<PixelBuffer> for RgbaImage {
    fn from(buffer: PixelBuffer) -> Self {
        let (width, height) = buffer.dimensions();
        RgbaImage::from_raw(width, height, buffer.into_vec())
            .expect("PixelBuffer data length always matches its dimensions")
    }
}
