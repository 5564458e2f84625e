pub mod format;
pub mod gate;
pub mod plan;
pub mod process;

pub use format::ImageFormat;
pub use gate::OverwriteGate;
pub use plan::ConversionPlan;
pub use process::{ConversionOutcome, Converter};
