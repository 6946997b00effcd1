use std::path::Path;

use image::{codecs::jpeg::JpegEncoder, DynamicImage};
use log::{debug, warn};

use crate::model::ImageAttachment;

const JPEG_QUALITY: u8 = 85;

/// Подготавливает выбранные изображения к отправке.
pub trait ImageResizer {
    /// Возвращает `None`, если изображение нужно пропустить.
    fn resize(&self, file_name: &str, bytes: &[u8]) -> Option<ImageAttachment>;
}

/// Уменьшает изображение так, чтобы оно вписалось в квадрат `target_size`
/// и перекодирует его в JPEG.
#[derive(Debug, Clone, Copy)]
pub struct JpegResizer {
    target_size: u32,
}

impl JpegResizer {
    pub fn new(target_size: u32) -> Self {
        Self { target_size }
    }
}

impl ImageResizer for JpegResizer {
    fn resize(&self, file_name: &str, bytes: &[u8]) -> Option<ImageAttachment> {
        let img = match image::load_from_memory(bytes) {
            Ok(img) => img,
            Err(e) => {
                warn!("Не удалось прочитать изображение {}: {}", file_name, e);
                return None;
            }
        };

        let thumb = img.thumbnail(self.target_size, self.target_size);
        debug!(
            "Изображение {} уменьшено с {}x{} до {}x{}",
            file_name,
            img.width(),
            img.height(),
            thumb.width(),
            thumb.height()
        );

        // JPEG не умеет в альфа-канал.
        let rgb = DynamicImage::ImageRgb8(thumb.to_rgb8());

        let mut buf = Vec::new();
        if let Err(e) = rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY)) {
            warn!("Не удалось перекодировать изображение {}: {}", file_name, e);
            return None;
        }

        Some(ImageAttachment::new(jpeg_file_name(file_name), buf))
    }
}

fn jpeg_file_name(file_name: &str) -> String {
    let path = Path::new(file_name).with_extension("jpg");

    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image.jpg".to_owned())
}
