use std::io;
use std::process::ExitStatus;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConvertError>;

#[derive(Debug, Error)]
pub enum ConvertError {
    /// The source file's extension is not in the catalog. Raised before any
    /// window is shown; the process exits with a usage error.
    #[error("unrecognized image extension {extension:?} (expected .png, .jpg, .jpeg, .webp or .heif)")]
    UnsupportedExtension { extension: String },

    /// The converter executable could not be started at all.
    #[error("could not run {program:?}: {source}")]
    ConverterUnavailable {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The converter ran and reported failure. The source file is untouched.
    #[error("image converter failed ({status})")]
    ConverterFailed { status: ExitStatus },

    /// The conversion succeeded but the original file could not be removed.
    /// The converted output already exists at this point.
    #[error("converted file was written, but removing the original failed: {0}")]
    SourceCleanup(#[source] io::Error),
}
