//! Image format conversion between PNG, JPEG and WebP.
//!
//! JPEG has no alpha channel, so transparent pixels are composited onto
//! black the same way a 2D canvas exports them. PNG and WebP keep RGBA.

use std::io::Cursor;
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::codecs::webp::WebPEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageFormat, ImageReader, RgbImage};
use serde::{Deserialize, Serialize};

use crate::error::{WidgetError, WidgetResult};

/// Matches `HTMLCanvasElement.toBlob` when no quality is passed.
pub const DEFAULT_JPEG_QUALITY: u8 = 92;
pub const DEFAULT_PNG_COMPRESSION: u8 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetFormat {
    Png,
    Jpeg,
    Webp,
}

impl TargetFormat {
    pub fn parse(input: &str) -> WidgetResult<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            "webp" => Ok(Self::Webp),
            other => Err(WidgetError::unsupported("image format", other)),
        }
    }

    /// Used as the download extension.
    pub fn name(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Webp => "webp",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Webp => "image/webp",
        }
    }
}

#[derive(Debug, Default, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct ConvertOptions {
    /// JPEG quality 1-100.
    pub quality: Option<u8>,
    /// PNG compression level 0-9.
    pub compression: Option<u8>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConvertedImage {
    pub format: String,
    pub mime: String,
    pub width: u32,
    pub height: u32,
    pub data_base64: String,
    pub data_url: String,
    pub download_name: String,
}

impl ConvertedImage {
    pub(crate) fn from_encoded(
        format: TargetFormat,
        width: u32,
        height: u32,
        encoded: &[u8],
        download_name: String,
    ) -> Self {
        let data_base64 = STANDARD.encode(encoded);
        let data_url = format!("data:{};base64,{data_base64}", format.mime());
        Self {
            format: format.name().into(),
            mime: format.mime().into(),
            width,
            height,
            data_base64,
            data_url,
            download_name,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchEntry {
    pub bytes: Vec<u8>,
    #[serde(default)]
    pub file_name: Option<String>,
    pub to: String,
    #[serde(default)]
    pub options: ConvertOptions,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutcome {
    pub file_name: String,
    pub result: Option<ConvertedImage>,
    pub error: Option<String>,
}

pub fn convert_image_internal(
    bytes: &[u8],
    to: &str,
    file_name: Option<&str>,
    options: ConvertOptions,
) -> WidgetResult<ConvertedImage> {
    if bytes.is_empty() {
        return Err(WidgetError::EmptyInput("image"));
    }
    let target = TargetFormat::parse(to)?;
    let hint = file_name
        .and_then(|name| Path::new(name).extension())
        .and_then(ImageFormat::from_extension);
    let decoded = decode_image(bytes, hint)?;
    let (width, height) = (decoded.width(), decoded.height());
    let encoded = encode_image(&decoded, target, options)?;
    log::debug!(
        "converted {width}x{height} image to {}: {} -> {} bytes",
        target.name(),
        bytes.len(),
        encoded.len()
    );
    Ok(ConvertedImage::from_encoded(
        target,
        width,
        height,
        &encoded,
        download_name(file_name.unwrap_or_default(), target),
    ))
}

/// Converts every entry independently; one bad file never sinks the batch.
pub fn convert_image_batch_internal(entries: Vec<BatchEntry>) -> Vec<BatchOutcome> {
    entries
        .into_iter()
        .map(|entry| {
            let file_name = entry
                .file_name
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| "image".to_string());
            match convert_image_internal(&entry.bytes, &entry.to, Some(&file_name), entry.options)
            {
                Ok(result) => BatchOutcome {
                    file_name,
                    result: Some(result),
                    error: None,
                },
                Err(err) => {
                    log::warn!("batch conversion of {file_name} failed: {err}");
                    BatchOutcome {
                        file_name,
                        result: None,
                        error: Some(err.to_string()),
                    }
                }
            }
        })
        .collect()
}

/// `photo.final.png` -> `photo.final.webp`; directories are dropped.
pub fn download_name(original: &str, target: TargetFormat) -> String {
    let stem = Path::new(original.trim())
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.trim().is_empty())
        .unwrap_or("image");
    let stem: String = stem
        .chars()
        .map(|ch| if matches!(ch, '/' | '\\') { '_' } else { ch })
        .collect();
    format!("{stem}.{}", target.name())
}

fn decode_image(bytes: &[u8], hint: Option<ImageFormat>) -> WidgetResult<DynamicImage> {
    // Magic bytes win over the file extension.
    let sniffed = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()
        .filter(|reader| reader.format().is_some())
        .and_then(|reader| reader.decode().ok());
    if let Some(image) = sniffed {
        return Ok(image);
    }
    match hint {
        Some(format) => image::load_from_memory_with_format(bytes, format),
        None => image::load_from_memory(bytes),
    }
    .map_err(|err| WidgetError::Image(format!("failed to decode image: {err}")))
}

fn encode_image(
    image: &DynamicImage,
    target: TargetFormat,
    options: ConvertOptions,
) -> WidgetResult<Vec<u8>> {
    match target {
        TargetFormat::Jpeg => {
            let quality = options.quality.unwrap_or(DEFAULT_JPEG_QUALITY).clamp(1, 100);
            let rgb = flatten_onto_black(image);
            let mut buffer = Vec::new();
            JpegEncoder::new_with_quality(&mut buffer, quality)
                .write_image(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
                .map_err(|err| WidgetError::Image(format!("failed to encode JPEG: {err}")))?;
            Ok(buffer)
        }
        TargetFormat::Png => {
            let rgba = image.to_rgba8();
            encode_png(
                rgba.as_raw(),
                rgba.width(),
                rgba.height(),
                ExtendedColorType::Rgba8,
                options.compression.unwrap_or(DEFAULT_PNG_COMPRESSION),
            )
        }
        TargetFormat::Webp => {
            let rgba = image.to_rgba8();
            let mut buffer = Vec::new();
            WebPEncoder::new_lossless(&mut buffer)
                .write_image(rgba.as_raw(), rgba.width(), rgba.height(), ExtendedColorType::Rgba8)
                .map_err(|err| WidgetError::Image(format!("failed to encode WebP: {err}")))?;
            Ok(buffer)
        }
    }
}

/// PNG encoder shared with the barcode renderer. `level` is 0 (stored) to 9.
pub(crate) fn encode_png(
    pixels: &[u8],
    width: u32,
    height: u32,
    color: ExtendedColorType,
    level: u8,
) -> WidgetResult<Vec<u8>> {
    let compression = match level.min(9) {
        0 => CompressionType::Uncompressed,
        level => CompressionType::Level(level),
    };
    let mut buffer = Vec::new();
    PngEncoder::new_with_quality(&mut buffer, compression, FilterType::Adaptive)
        .write_image(pixels, width, height, color)
        .map_err(|err| WidgetError::Image(format!("failed to encode PNG: {err}")))?;
    Ok(buffer)
}

fn flatten_onto_black(image: &DynamicImage) -> RgbImage {
    let rgba = image.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let scale = |channel: u8| ((u16::from(channel) * u16::from(a) + 127) / 255) as u8;
        image::Rgb([scale(r), scale(g), scale(b)])
    })
}
