use std::ffi::OsString;
use std::fs;
use std::process::Command;

use super::plan::ConversionPlan;
use crate::error::{ConvertError, Result};

/// ImageMagick's classic CLI entry point, resolved through PATH.
pub const DEFAULT_PROGRAM: &str = "convert";

/// Result of a completed conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionOutcome {
    pub source_deleted: bool,
}

/// Runs the external converter. The invocation blocks until the process
/// exits; its exit status is the only success signal consumed.
#[derive(Debug, Clone)]
pub struct Converter {
    program: OsString,
}

impl Default for Converter {
    fn default() -> Self {
        Self::with_program(DEFAULT_PROGRAM)
    }
}

impl Converter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Substitutes the converter executable. Tests use this to run fakes.
    pub fn with_program(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Invokes `<program> -quality <Q> <source> <destination>` and, on
    /// success, removes the source file when the plan calls for it.
    ///
    /// A converter failure leaves the source untouched. A cleanup failure is
    /// reported as its own error kind: the converted output exists by then,
    /// and the caller must not present it as a failed conversion.
    pub fn run(&self, plan: &ConversionPlan) -> Result<ConversionOutcome> {
        let status = Command::new(&self.program)
            .arg("-quality")
            .arg(plan.quality().to_string())
            .arg(plan.source())
            .arg(plan.destination())
            .status()
            .map_err(|source| ConvertError::ConverterUnavailable {
                program: self.program.to_string_lossy().into_owned(),
                source,
            })?;

        if !status.success() {
            return Err(ConvertError::ConverterFailed { status });
        }

        if plan.deletes_source() {
            fs::remove_file(plan.source()).map_err(ConvertError::SourceCleanup)?;
            return Ok(ConversionOutcome {
                source_deleted: true,
            });
        }

        Ok(ConversionOutcome {
            source_deleted: false,
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::convert::format::ImageFormat;
    use crate::convert::gate::OverwriteGate;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};

    fn plan_for(source: &Path, target: ImageFormat, replace: bool) -> ConversionPlan {
        ConversionPlan::build(source, target, 90, replace)
    }

    fn touch(path: &Path) {
        fs::write(path, b"pixels").unwrap();
    }

    /// Writes a stand-in converter that copies its source argument to its
    /// destination argument, mimicking the real tool's observable effect.
    fn fake_converter(dir: &Path) -> PathBuf {
        let script = dir.join("fake-convert");
        fs::write(&script, "#!/bin/sh\ncp \"$3\" \"$4\"\n").unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        script
    }

    #[test]
    fn failed_conversion_keeps_the_source() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("photo.png");
        touch(&source);

        let plan = plan_for(&source, ImageFormat::Jpeg, true);
        let err = Converter::with_program("false").run(&plan).unwrap_err();

        assert!(matches!(err, ConvertError::ConverterFailed { .. }));
        assert!(source.exists());
    }

    #[test]
    fn missing_converter_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("photo.png");
        touch(&source);

        let plan = plan_for(&source, ImageFormat::Jpeg, false);
        let err = Converter::with_program("/no/such/converter")
            .run(&plan)
            .unwrap_err();

        assert!(matches!(err, ConvertError::ConverterUnavailable { .. }));
        assert!(source.exists());
    }

    #[test]
    fn replace_deletes_the_source_on_success() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("photo.png");
        touch(&source);

        let plan = plan_for(&source, ImageFormat::Jpeg, true);
        let outcome = Converter::with_program("true").run(&plan).unwrap();

        assert!(outcome.source_deleted);
        assert!(!source.exists());
    }

    #[test]
    fn without_replace_the_source_stays() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("photo.png");
        touch(&source);

        let plan = plan_for(&source, ImageFormat::Jpeg, false);
        let outcome = Converter::with_program("true").run(&plan).unwrap();

        assert!(!outcome.source_deleted);
        assert!(source.exists());
    }

    #[test]
    fn same_path_destination_is_never_deleted() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("photo.png");
        touch(&source);

        let plan = plan_for(&source, ImageFormat::Png, true);
        assert_eq!(plan.destination(), plan.source());

        let outcome = Converter::with_program("true").run(&plan).unwrap();
        assert!(!outcome.source_deleted);
        assert!(source.exists());
    }

    #[test]
    fn cleanup_failure_is_distinct_from_conversion_failure() {
        let dir = tempfile::tempdir().unwrap();
        // Source vanished between conversion and cleanup: the conversion
        // itself still counts as successful.
        let source = dir.path().join("gone.png");

        let plan = plan_for(&source, ImageFormat::Jpeg, true);
        let err = Converter::with_program("true").run(&plan).unwrap_err();

        assert!(matches!(err, ConvertError::SourceCleanup(_)));
    }

    #[test]
    fn declined_overwrite_runs_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("photo.png");
        let destination = dir.path().join("photo.jpg");
        touch(&source);
        fs::write(&destination, b"previous").unwrap();

        let plan = plan_for(&source, ImageFormat::Jpeg, true);
        let gate = OverwriteGate::request(plan.destination().is_file());
        assert_eq!(gate, OverwriteGate::AwaitingConfirmation);
        assert_eq!(gate.resolve(false), OverwriteGate::Cancelled);

        // No converter ran; both files are untouched.
        assert_eq!(fs::read(&source).unwrap(), b"pixels");
        assert_eq!(fs::read(&destination).unwrap(), b"previous");
    }

    #[test]
    fn confirmed_overwrite_replaces_the_destination() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("photo.png");
        let destination = dir.path().join("photo.jpg");
        touch(&source);
        fs::write(&destination, b"previous").unwrap();
        let converter = fake_converter(dir.path());

        let plan = plan_for(&source, ImageFormat::Jpeg, false);
        let gate = OverwriteGate::request(plan.destination().is_file());
        assert_eq!(gate.resolve(true), OverwriteGate::Proceed);

        Converter::with_program(&converter).run(&plan).unwrap();
        assert_eq!(fs::read(&destination).unwrap(), b"pixels");
    }

    #[test]
    fn end_to_end_png_to_jpg_with_replace() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("photo.png");
        touch(&source);
        let converter = fake_converter(dir.path());

        let plan = plan_for(&source, ImageFormat::Jpeg, true);
        assert_eq!(plan.quality(), 90);
        assert!(!plan.destination().exists());

        let outcome = Converter::with_program(&converter).run(&plan).unwrap();

        assert!(outcome.source_deleted);
        assert!(dir.path().join("photo.jpg").exists());
        assert!(!source.exists());
    }
}
