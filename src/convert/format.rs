use std::path::Path;

use crate::error::{ConvertError, Result};

/// The closed set of image formats the dialog can convert between.
///
/// The variant order is the order formats are offered in the UI; it never
/// changes at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Webp,
    Heif,
}

impl ImageFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageFormat::Png => "PNG",
            ImageFormat::Jpeg => "JPEG",
            ImageFormat::Webp => "WEBP",
            ImageFormat::Heif => "HEIF",
        }
    }

    /// Canonical extension used for output files. `jpeg` inputs are accepted
    /// but output always uses `jpg`.
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Webp => "webp",
            ImageFormat::Heif => "heif",
        }
    }

    pub fn all() -> &'static [ImageFormat] {
        &[
            ImageFormat::Png,
            ImageFormat::Jpeg,
            ImageFormat::Webp,
            ImageFormat::Heif,
        ]
    }

    /// Inverse lookup. Extensions are matched exactly; only the lowercase
    /// spellings are recognized.
    pub fn from_extension(ext: &str) -> Option<ImageFormat> {
        match ext {
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "webp" => Some(ImageFormat::Webp),
            "heif" => Some(ImageFormat::Heif),
            _ => None,
        }
    }

    /// Detects the format of `path` from its extension.
    pub fn for_path(path: &Path) -> Result<ImageFormat> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        Self::from_extension(ext).ok_or_else(|| ConvertError::UnsupportedExtension {
            extension: ext.to_string(),
        })
    }

    /// Default target offered when the dialog opens: the first catalog entry
    /// that differs from the source format.
    pub fn default_target(source: ImageFormat) -> ImageFormat {
        Self::all()
            .iter()
            .copied()
            .find(|format| *format != source)
            .unwrap_or(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn extension_round_trips_up_to_synonyms() {
        for ext in ["png", "jpg", "jpeg", "webp", "heif"] {
            let format = ImageFormat::from_extension(ext).unwrap();
            // The canonical extension must map back to the same format.
            assert_eq!(ImageFormat::from_extension(format.extension()), Some(format));
        }
    }

    #[test]
    fn jpg_and_jpeg_are_the_same_format() {
        assert_eq!(ImageFormat::from_extension("jpg"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_extension("jpeg"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::Jpeg.extension(), "jpg");
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert_eq!(ImageFormat::from_extension("PNG"), None);
        assert_eq!(ImageFormat::from_extension("Jpg"), None);
        assert_eq!(ImageFormat::from_extension("JPEG"), None);
    }

    #[test]
    fn unknown_and_missing_extensions_are_rejected() {
        assert!(ImageFormat::for_path(&PathBuf::from("photo.bmp")).is_err());
        assert!(ImageFormat::for_path(&PathBuf::from("photo")).is_err());
        let err = ImageFormat::for_path(&PathBuf::from("photo.PNG")).unwrap_err();
        assert!(err.to_string().contains("PNG"));
    }

    #[test]
    fn catalog_order_is_stable() {
        assert_eq!(
            ImageFormat::all(),
            &[
                ImageFormat::Png,
                ImageFormat::Jpeg,
                ImageFormat::Webp,
                ImageFormat::Heif,
            ]
        );
    }

    #[test]
    fn default_target_never_equals_source() {
        for &source in ImageFormat::all() {
            assert_ne!(ImageFormat::default_target(source), source);
        }
    }

    #[test]
    fn default_target_skips_to_second_entry_for_first_format() {
        assert_eq!(
            ImageFormat::default_target(ImageFormat::Png),
            ImageFormat::Jpeg
        );
        assert_eq!(
            ImageFormat::default_target(ImageFormat::Jpeg),
            ImageFormat::Png
        );
    }
}
