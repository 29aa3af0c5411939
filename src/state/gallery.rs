/// Photo selection and previews
///
/// Holds the photos picked for a registration and a preview handle for
/// each, derived by decoding and downscaling the file. Picking again
/// replaces the whole selection; the previous previews are dropped with
/// it, so nothing outlives the selection that produced it.

use iced::widget::image::Handle;
use std::path::PathBuf;

/// Previews are decoded down to at most this many pixels per side
pub const PREVIEW_SIZE: u32 = 160;

/// One selected photo: the file contents plus its derived preview
#[derive(Debug, Clone)]
pub struct Photo {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub preview: Handle,
}

/// The ordered photo selection of the form screen
#[derive(Debug, Clone, Default)]
pub struct Gallery {
    photos: Vec<Photo>,
}

impl Gallery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entire selection; picking is never additive
    pub fn replace(&mut self, photos: Vec<Photo>) {
        self.photos = photos;
    }

    /// Selected photos in pick order
    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    /// Preview handles, order-aligned with [`photos`](Self::photos)
    pub fn previews(&self) -> impl Iterator<Item = &Handle> {
        self.photos.iter().map(|photo| &photo.preview)
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }
}

/// Load picked files into photos, preserving pick order
///
/// A file that cannot be read is logged and skipped; the remaining
/// photos and previews stay paired one-to-one.
pub async fn load_photos(paths: Vec<PathBuf>) -> Vec<Photo> {
    let mut photos = Vec::with_capacity(paths.len());

    for path in paths {
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "skipping unreadable photo");
                continue;
            }
        };

        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| String::from("photo"));

        // Decoding is CPU-bound
        let loaded = tokio::task::spawn_blocking(move || {
            let preview = derive_preview(&bytes);
            (bytes, preview)
        })
        .await;

        match loaded {
            Ok((bytes, preview)) => photos.push(Photo {
                filename,
                bytes,
                preview,
            }),
            Err(error) => {
                tracing::warn!(%error, "preview task failed");
            }
        }
    }

    photos
}

/// Derive a small preview handle from a photo's bytes
fn derive_preview(bytes: &[u8]) -> Handle {
    if let Ok(decoded) = image::load_from_memory(bytes) {
        let thumbnail = decoded.thumbnail(PREVIEW_SIZE, PREVIEW_SIZE);
        let rgba = thumbnail.to_rgba8();
        let (width, height) = rgba.dimensions();
        return Handle::from_rgba(width, height, rgba.into_raw());
    }

    // Decode failed; hand the renderer the raw bytes and let it try
    Handle::from_bytes(bytes.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo(filename: &str) -> Photo {
        Photo {
            filename: filename.to_string(),
            bytes: vec![0u8; 8],
            preview: Handle::from_bytes(vec![0u8; 8]),
        }
    }

    #[test]
    fn test_selection_replaces_instead_of_appending() {
        let mut gallery = Gallery::new();
        gallery.replace(vec![photo("a.png"), photo("b.png")]);
        assert_eq!(gallery.photos().len(), 2);

        gallery.replace(vec![photo("c.png")]);
        assert_eq!(gallery.photos().len(), 1);
        assert_eq!(gallery.photos()[0].filename, "c.png");
    }

    #[test]
    fn test_empty_selection_clears_everything() {
        let mut gallery = Gallery::new();
        gallery.replace(vec![photo("a.png")]);

        gallery.replace(Vec::new());
        assert!(gallery.is_empty());
        assert_eq!(gallery.previews().count(), 0);
    }

    #[test]
    fn test_previews_stay_paired_and_ordered() {
        let mut gallery = Gallery::new();
        gallery.replace(vec![photo("a.png"), photo("b.png"), photo("c.png")]);

        assert_eq!(gallery.photos().len(), gallery.previews().count());
        let names: Vec<_> = gallery.photos().iter().map(|p| p.filename.as_str()).collect();
        assert_eq!(names, vec!["a.png", "b.png", "c.png"]);
    }

    #[test]
    fn test_preview_of_a_real_image_is_derived() {
        // Encode a tiny PNG in memory and make sure it goes through the
        // decode-and-downscale path without panicking
        let mut bytes = Vec::new();
        let buffer = image::RgbaImage::from_pixel(4, 4, image::Rgba([10, 20, 30, 255]));
        image::DynamicImage::ImageRgba8(buffer)
            .write_to(
                &mut std::io::Cursor::new(&mut bytes),
                image::ImageFormat::Png,
            )
            .unwrap();

        let _preview = derive_preview(&bytes);
    }

    #[test]
    fn test_undecodable_bytes_still_yield_a_handle() {
        let _preview = derive_preview(&[0u8, 1, 2, 3]);
    }
}
