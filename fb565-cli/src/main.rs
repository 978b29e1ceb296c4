use argh::FromArgs;
use fb565::{
    convert, ConvertOptions, DitherConfig, DownscaleFilter, PixelBuffer, PixelFormat, ScaleMethod,
};
use image::{ImageFormat, RgbaImage};
use std::str::FromStr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Prepares images for RGB565/BGRA display framebuffers.
#[derive(FromArgs)]
struct Cli {
    #[argh(subcommand)]
    command: Command,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum Command {
    Scale(Scale),
    Encode(Encode),
    Decode(Decode),
}

#[derive(Debug, Clone, Copy)]
enum Format {
    Png,
    Jpg,
    Bmp,
}

impl FromStr for Format {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        #[rustfmt::skip]
        let Some(format) = s.eq_ignore_ascii_case("png").then_some(Format::Png)
               .or_else(|| s.eq_ignore_ascii_case("jpg").then_some(Format::Jpg))
               .or_else(|| s.eq_ignore_ascii_case("bmp").then_some(Format::Bmp))
        else { return Err("invalid string"); };

        Ok(format)
    }
}

impl From<Format> for ImageFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Png => ImageFormat::Png,
            Format::Jpg => ImageFormat::Jpeg,
            Format::Bmp => ImageFormat::Bmp,
        }
    }
}

/// Resamples an image file.
#[derive(FromArgs)]
#[argh(subcommand, name = "scale")]
struct Scale {
    /// target width in pixels
    #[argh(option)]
    width: u32,
    /// target height in pixels
    #[argh(option)]
    height: u32,
    /// scaling method (nearest, bilinear)
    #[argh(option, default = "ScaleMethod::Bilinear")]
    method: ScaleMethod,
    /// filter for shrinking axes when using bilinear (hermite, halve)
    #[argh(option, default = "DownscaleFilter::Hermite")]
    filter: DownscaleFilter,
    /// output format, optional (png, jpg, bmp); guessed from the output path otherwise
    #[argh(option)]
    format: Option<Format>,

    /// the input file (PNG, JPG, BMP, or TIFF)
    #[argh(positional)]
    input: String,
    /// the output file
    #[argh(positional)]
    output: String,
}

/// Converts an image file into raw framebuffer bytes.
#[derive(FromArgs)]
#[argh(subcommand, name = "encode")]
struct Encode {
    /// target width in pixels; keeps the source size if omitted
    #[argh(option)]
    width: Option<u32>,
    /// target height in pixels; keeps the source size if omitted
    #[argh(option)]
    height: Option<u32>,
    /// packed pixel format (rgb565, bgra)
    #[argh(option, default = "PixelFormat::Rgb565")]
    format: PixelFormat,
    /// scaling method (nearest, bilinear)
    #[argh(option, default = "ScaleMethod::Bilinear")]
    method: ScaleMethod,
    /// filter for shrinking axes when using bilinear (hermite, halve)
    #[argh(option, default = "DownscaleFilter::Hermite")]
    filter: DownscaleFilter,
    /// apply ordered dithering before RGB565 quantization
    #[argh(switch)]
    dither: bool,
    /// dithering strength between 0.0 and 1.0 (default 0.2)
    #[argh(option)]
    strength: Option<f32>,

    /// the input file (PNG, JPG, BMP, or TIFF)
    #[argh(positional)]
    input: String,
    /// the output file
    #[argh(positional)]
    output: String,
}

/// Converts raw framebuffer bytes into an image file.
#[derive(FromArgs)]
#[argh(subcommand, name = "decode")]
struct Decode {
    /// image width in pixels
    #[argh(option)]
    width: u32,
    /// image height in pixels
    #[argh(option)]
    height: u32,
    /// packed pixel format (rgb565, bgra)
    #[argh(option, default = "PixelFormat::Rgb565")]
    format: PixelFormat,
    /// output format (png, jpg, bmp)
    #[argh(option, default = "Format::Png")]
    image_format: Format,

    /// the raw input file
    #[argh(positional)]
    input: String,
    /// the output file
    #[argh(positional)]
    output: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fb565=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let Cli { command } = argh::from_env();

    match command {
        Command::Scale(options) => scale(options),
        Command::Encode(options) => encode(options),
        Command::Decode(options) => decode(options),
    }
}

fn load(input: &str) -> Result<PixelBuffer, Box<dyn std::error::Error>> {
    let image = image::io::Reader::open(input)?
        .with_guessed_format()?
        .decode()?;

    tracing::debug!(input, color = ?image.color(), "decoded source image");

    Ok(PixelBuffer::try_from(image.into_rgba8())?)
}

fn scale(options: Scale) -> Result<(), Box<dyn std::error::Error>> {
    let Scale {
        width,
        height,
        method,
        filter,
        format,
        input,
        output,
    } = options;

    let source = load(&input)?;
    let (src_w, src_h) = source.dimensions();
    println!("Scaling {src_w}x{src_h} image to {width}x{height} ({method}, {filter})");

    let scaled = fb565::scale::scale(&source, width, height, method, filter)?;
    let image = RgbaImage::from(scaled);

    match format {
        Some(format) => image.save_with_format(&output, format.into())?,
        None => image.save(&output)?,
    }

    println!("Written {width}x{height} image to `{output}`");

    Ok(())
}

fn encode(options: Encode) -> Result<(), Box<dyn std::error::Error>> {
    let Encode {
        width,
        height,
        format,
        method,
        filter,
        dither,
        strength,
        input,
        output,
    } = options;

    let source = load(&input)?;
    let (src_w, src_h) = source.dimensions();
    let target = (width.unwrap_or(src_w), height.unwrap_or(src_h));

    let dither = match (dither, strength) {
        (true, Some(strength)) => DitherConfig::enabled(strength)?,
        (true, None) => DitherConfig::default_enabled(),
        (false, Some(_)) => return Err("--strength requires --dither".into()),
        (false, None) => DitherConfig::disabled(),
    };
    let options = ConvertOptions {
        method,
        downscale_filter: filter,
        dither,
    };

    println!(
        "Encoding {src_w}x{src_h} image as {}x{} {format}",
        target.0, target.1
    );

    let packed = convert::convert(&source, Some(target), format, &options)?;
    std::fs::write(&output, &packed)?;
    println!("Written {} bytes to `{output}`", packed.len());

    Ok(())
}

fn decode(options: Decode) -> Result<(), Box<dyn std::error::Error>> {
    let Decode {
        width,
        height,
        format,
        image_format,
        input,
        output,
    } = options;

    let packed = std::fs::read(&input)?;

    println!("Decoding `{input}`");

    let expected = convert::packed_len(width, height, format)?;
    if packed.len() < expected {
        println!(
            "Input has {} of {expected} bytes, padding the rest with white",
            packed.len()
        );
    }

    let buffer = convert::decode(&packed, width, height, format)?;
    let image = RgbaImage::from(buffer);

    // JPEG has no alpha channel
    match image_format {
        Format::Jpg => image::DynamicImage::ImageRgba8(image)
            .into_rgb8()
            .save_with_format(&output, ImageFormat::Jpeg)?,
        format => image.save_with_format(&output, format.into())?,
    }

    println!("Written {width}x{height} image to `{output}`");

    Ok(())
}
