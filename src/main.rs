#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod convert;
mod error;
mod style;

use std::path::PathBuf;
use std::process::ExitCode;

use app::ConvertApp;
use convert::ImageFormat;

fn main() -> ExitCode {
    let args = pico_args::Arguments::from_env();

    let source_path = match args.finish().into_iter().next() {
        Some(arg) => PathBuf::from(arg),
        None => {
            eprintln!("Usage: convert_image <image-file>");
            return ExitCode::FAILURE;
        }
    };

    // The source format must resolve before any window is shown.
    let source_format = match ImageFormat::for_path(&source_path) {
        Ok(format) => format,
        Err(err) => {
            eprintln!("convert_image: {err}");
            return ExitCode::FAILURE;
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([420.0, 420.0])
            .with_title("Convert Image")
            .with_resizable(false),
        ..Default::default()
    };

    let result = eframe::run_native(
        "convert_image",
        options,
        Box::new(move |cc| Ok(Box::new(ConvertApp::new(cc, source_path, source_format)))),
    );

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("convert_image: {err}");
            ExitCode::FAILURE
        }
    }
}
