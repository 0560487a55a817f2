// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster image encoding into PDF image XObjects.
//
// JPEG data is embedded untouched behind a DCTDecode filter; only the header
// is parsed for dimensions and colour space. PNG data is decoded with the
// `image` crate and re-encoded as Flate-compressed samples, with any
// transparency split out into a soft mask.

use std::io::{Cursor, Write};

use flate2::Compression;
use flate2::write::ZlibEncoder;
use fusion_core::error::{FusionError, Result};
use image::codecs::jpeg::JpegDecoder;
use image::{ExtendedColorType, ImageDecoder, ImageFormat};
use lopdf::{Object, Stream, dictionary};
use tracing::{debug, instrument};

use crate::model::RasterFormat;

/// An image ready to be added to a PDF document.
pub struct RasterImage {
    /// Native width in pixels.
    pub width: u32,
    /// Native height in pixels.
    pub height: u32,
    /// The image XObject stream (without an /SMask entry).
    pub image: Stream,
    /// Soft mask for images with transparency.
    pub soft_mask: Option<Stream>,
}

/// Encode `bytes` of the given format as a PDF image.
pub fn encode(format: RasterFormat, bytes: &[u8]) -> Result<RasterImage> {
    match format {
        RasterFormat::Jpeg => from_jpeg(bytes),
        RasterFormat::Png => from_png(bytes),
    }
}

/// Wrap JPEG bytes as a DCTDecode image.
#[instrument(skip(bytes), fields(bytes_len = bytes.len()))]
pub fn from_jpeg(bytes: &[u8]) -> Result<RasterImage> {
    let decoder = JpegDecoder::new(Cursor::new(bytes))
        .map_err(|err| FusionError::ImageError(format!("failed to decode JPEG: {}", err)))?;
    let (width, height) = decoder.dimensions();
    ensure_dimensions(width, height)?;

    let color = decoder.original_color_type();
    let color_space = match color {
        ExtendedColorType::L8 | ExtendedColorType::L16 => "DeviceGray",
        ExtendedColorType::Cmyk8 => "DeviceCMYK",
        _ => "DeviceRGB",
    };

    let mut dict = image_dictionary(width, height, color_space);
    dict.set("Filter", "DCTDecode");
    if color_space == "DeviceCMYK" {
        // Adobe-style CMYK JPEGs store inverted samples.
        let decode: Vec<Object> = [1, 0, 1, 0, 1, 0, 1, 0]
            .into_iter()
            .map(Object::Integer)
            .collect();
        dict.set("Decode", decode);
    }

    debug!(width, height, ?color, "JPEG embedded");
    Ok(RasterImage {
        width,
        height,
        image: Stream::new(dict, bytes.to_vec()).with_compression(false),
        soft_mask: None,
    })
}

/// Decode PNG bytes and re-encode the samples as FlateDecode streams.
#[instrument(skip(bytes), fields(bytes_len = bytes.len()))]
pub fn from_png(bytes: &[u8]) -> Result<RasterImage> {
    let decoded = image::load_from_memory_with_format(bytes, ImageFormat::Png)
        .map_err(|err| FusionError::ImageError(format!("failed to decode PNG: {}", err)))?;
    let (width, height) = (decoded.width(), decoded.height());
    ensure_dimensions(width, height)?;

    let color = decoded.color();
    let (samples, color_space, alpha) = match (color.has_color(), color.has_alpha()) {
        (true, true) => {
            let (rgb, alpha) = split_alpha(decoded.to_rgba8().as_raw(), 4);
            (rgb, "DeviceRGB", Some(alpha))
        }
        (true, false) => (decoded.to_rgb8().into_raw(), "DeviceRGB", None),
        (false, true) => {
            let (gray, alpha) = split_alpha(decoded.to_luma_alpha8().as_raw(), 2);
            (gray, "DeviceGray", Some(alpha))
        }
        (false, false) => (decoded.to_luma8().into_raw(), "DeviceGray", None),
    };

    // A fully opaque alpha channel needs no mask.
    let alpha = alpha.filter(|mask| mask.iter().any(|&a| a != u8::MAX));

    let image = flate_stream(image_dictionary(width, height, color_space), &samples)?;
    let soft_mask = match alpha {
        Some(mask) => Some(flate_stream(
            image_dictionary(width, height, "DeviceGray"),
            &mask,
        )?),
        None => None,
    };

    debug!(
        width,
        height,
        ?color,
        has_mask = soft_mask.is_some(),
        "PNG embedded"
    );
    Ok(RasterImage {
        width,
        height,
        image,
        soft_mask,
    })
}

fn ensure_dimensions(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(FusionError::ImageError(format!(
            "image has no pixels ({}x{})",
            width, height
        )));
    }
    Ok(())
}

fn image_dictionary(width: u32, height: u32, color_space: &str) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => i64::from(width),
        "Height" => i64::from(height),
        "ColorSpace" => color_space,
        "BitsPerComponent" => 8,
    }
}

fn flate_stream(mut dict: lopdf::Dictionary, samples: &[u8]) -> Result<Stream> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(samples)?;
    let compressed = encoder.finish()?;
    dict.set("Filter", "FlateDecode");
    Ok(Stream::new(dict, compressed).with_compression(false))
}

/// Split interleaved samples whose last channel is alpha.
fn split_alpha(pixels: &[u8], channels: usize) -> (Vec<u8>, Vec<u8>) {
    let count = pixels.len() / channels;
    let mut color = Vec::with_capacity(count * (channels - 1));
    let mut alpha = Vec::with_capacity(count);
    for pixel in pixels.chunks_exact(channels) {
        color.extend_from_slice(&pixel[..channels - 1]);
        alpha.push(pixel[channels - 1]);
    }
    (color, alpha)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{DynamicImage, GrayAlphaImage, GrayImage, Luma, LumaA, Rgb, RgbImage, Rgba, RgbaImage};

    pub(crate) fn encode_image(image: DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut buf = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut buf), format)
            .expect("encode test image");
        buf
    }

    pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb([200, 30, 30]));
        encode_image(DynamicImage::ImageRgb8(img), ImageFormat::Png)
    }

    pub(crate) fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb([10, 120, 240]));
        encode_image(DynamicImage::ImageRgb8(img), ImageFormat::Jpeg)
    }

    fn name_of<'d>(dict: &'d lopdf::Dictionary, key: &[u8]) -> Option<&'d [u8]> {
        match dict.get(key) {
            Ok(Object::Name(name)) => Some(name.as_slice()),
            _ => None,
        }
    }

    #[test]
    fn jpeg_passes_through_untouched() {
        let bytes = jpeg_bytes(40, 30);
        let raster = from_jpeg(&bytes).expect("jpeg");
        assert_eq!((raster.width, raster.height), (40, 30));
        assert_eq!(raster.image.content, bytes);
        assert_eq!(name_of(&raster.image.dict, b"Filter"), Some(&b"DCTDecode"[..]));
        assert_eq!(name_of(&raster.image.dict, b"ColorSpace"), Some(&b"DeviceRGB"[..]));
        assert!(raster.soft_mask.is_none());
    }

    #[test]
    fn grayscale_jpeg_uses_device_gray() {
        let img = GrayImage::from_pixel(16, 16, Luma([128]));
        let bytes = encode_image(DynamicImage::ImageLuma8(img), ImageFormat::Jpeg);
        let raster = from_jpeg(&bytes).expect("jpeg");
        assert_eq!(name_of(&raster.image.dict, b"ColorSpace"), Some(&b"DeviceGray"[..]));
    }

    #[test]
    fn opaque_png_has_no_mask() {
        let raster = from_png(&png_bytes(8, 4)).expect("png");
        assert_eq!((raster.width, raster.height), (8, 4));
        assert_eq!(name_of(&raster.image.dict, b"Filter"), Some(&b"FlateDecode"[..]));
        assert!(raster.soft_mask.is_none());
    }

    #[test]
    fn transparent_png_gets_soft_mask() {
        let mut img = RgbaImage::from_pixel(4, 4, Rgba([0, 255, 0, 255]));
        img.put_pixel(0, 0, Rgba([0, 0, 0, 0]));
        let bytes = encode_image(DynamicImage::ImageRgba8(img), ImageFormat::Png);

        let raster = from_png(&bytes).expect("png");
        let mask = raster.soft_mask.expect("soft mask");
        assert_eq!(name_of(&mask.dict, b"ColorSpace"), Some(&b"DeviceGray"[..]));
        assert_eq!(name_of(&raster.image.dict, b"ColorSpace"), Some(&b"DeviceRGB"[..]));
    }

    fn inflate(data: &[u8]) -> Vec<u8> {
        use std::io::Read;
        let mut out = Vec::new();
        flate2::read::ZlibDecoder::new(data)
            .read_to_end(&mut out)
            .expect("inflate");
        out
    }

    #[test]
    fn gray_alpha_png_splits_into_gray_and_mask() {
        let mut img = GrayAlphaImage::from_pixel(2, 2, LumaA([90, 255]));
        img.put_pixel(1, 1, LumaA([90, 0]));
        let bytes = encode_image(DynamicImage::ImageLumaA8(img), ImageFormat::Png);

        let raster = from_png(&bytes).expect("png");
        assert_eq!(name_of(&raster.image.dict, b"ColorSpace"), Some(&b"DeviceGray"[..]));
        assert_eq!(inflate(&raster.image.content), vec![90, 90, 90, 90]);

        let mask = raster.soft_mask.expect("soft mask");
        assert_eq!(name_of(&mask.dict, b"ColorSpace"), Some(&b"DeviceGray"[..]));
        assert_eq!(inflate(&mask.content), vec![255, 255, 255, 0]);
    }

    #[test]
    fn garbage_is_an_image_error() {
        assert!(matches!(
            from_png(b"definitely not a png"),
            Err(FusionError::ImageError(_))
        ));
        assert!(matches!(
            from_jpeg(b"definitely not a jpeg"),
            Err(FusionError::ImageError(_))
        ));
    }

    #[test]
    fn png_bytes_are_not_a_jpeg() {
        assert!(encode(RasterFormat::Jpeg, &png_bytes(2, 2)).is_err());
    }

    #[test]
    fn split_alpha_separates_channels() {
        let (color, alpha) = split_alpha(&[1, 2, 3, 4, 5, 6, 7, 8], 4);
        assert_eq!(color, vec![1, 2, 3, 5, 6, 7]);
        assert_eq!(alpha, vec![4, 8]);
    }
}
