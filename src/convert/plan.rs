use std::path::{Path, PathBuf};

use super::format::ImageFormat;

/// Everything needed to run one conversion: where to read, where to write,
/// how hard to compress, and whether to remove the original afterwards.
///
/// Building a plan is pure path arithmetic; nothing here touches the
/// filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionPlan {
    source: PathBuf,
    destination: PathBuf,
    target: ImageFormat,
    quality: u8,
    replace_original: bool,
}

impl ConversionPlan {
    /// The destination keeps the source's directory and base name and only
    /// swaps the extension for the target format's canonical one.
    pub fn build(source: &Path, target: ImageFormat, quality: u8, replace_original: bool) -> Self {
        let destination = source.with_extension(target.extension());
        Self {
            source: source.to_path_buf(),
            destination,
            target,
            quality,
            replace_original,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub fn target(&self) -> ImageFormat {
        self.target
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    /// Whether the source should be removed after a successful conversion.
    /// Paths are compared literally; when a same-format conversion writes
    /// over the source path itself, the file is never deleted.
    pub fn deletes_source(&self) -> bool {
        self.replace_original && self.destination != self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn destination_only_swaps_the_extension() {
        let plan = ConversionPlan::build(
            Path::new("/home/user/pics/photo.png"),
            ImageFormat::Jpeg,
            90,
            true,
        );
        assert_eq!(plan.destination(), Path::new("/home/user/pics/photo.jpg"));
        assert_eq!(plan.destination().parent(), plan.source().parent());
        assert_eq!(plan.destination().file_stem(), plan.source().file_stem());
    }

    #[test]
    fn building_needs_no_filesystem() {
        // The directory does not exist; the computation works regardless.
        let plan = ConversionPlan::build(
            Path::new("/definitely/not/a/real/dir/photo.webp"),
            ImageFormat::Heif,
            55,
            false,
        );
        assert_eq!(
            plan.destination(),
            Path::new("/definitely/not/a/real/dir/photo.heif")
        );
    }

    #[test]
    fn same_format_conversion_targets_the_source_path() {
        let plan = ConversionPlan::build(Path::new("photo.png"), ImageFormat::Png, 90, true);
        assert_eq!(plan.destination(), plan.source());
        assert!(!plan.deletes_source());
    }

    #[test]
    fn jpeg_synonym_source_is_not_treated_as_same_path() {
        // photo.jpeg -> photo.jpg is a distinct path, so replace applies.
        let plan = ConversionPlan::build(Path::new("photo.jpeg"), ImageFormat::Jpeg, 90, true);
        assert_ne!(plan.destination(), plan.source());
        assert!(plan.deletes_source());
    }

    #[test]
    fn deletes_source_requires_the_replace_flag() {
        let plan = ConversionPlan::build(Path::new("photo.png"), ImageFormat::Jpeg, 90, false);
        assert!(!plan.deletes_source());
    }
}
