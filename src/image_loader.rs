use crate::error::{MapperError, MapperResult};
use egui::ColorImage;
use image::{DynamicImage, ImageFormat};
use std::fs;
use std::path::Path;

/// Decodes the image at `path` into pixels the canvas can upload.
///
/// Animated GIFs yield their first frame. Pixels are never rescaled, since
/// hotspot coordinates are image pixels.
pub fn load_page_image(path: &Path) -> MapperResult<ColorImage> {
    let bytes = fs::read(path).map_err(|err| MapperError::io("read", path, err))?;

    let format = image::guess_format(&bytes)
        .or_else(|_| ImageFormat::from_path(path))
        .map_err(|err| decode_error(path, err))?;

    let image =
        image::load_from_memory_with_format(&bytes, format).map_err(|err| decode_error(path, err))?;
    Ok(color_image_from_dynamic(image))
}

fn decode_error(path: &Path, err: image::ImageError) -> MapperError {
    MapperError::ImageDecode {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

fn color_image_from_dynamic(image: DynamicImage) -> ColorImage {
    let rgba = image.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    ColorImage::from_rgba_unmultiplied(size, &rgba.into_raw())
}
