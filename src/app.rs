use eframe::egui;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::convert::{ConversionPlan, Converter, ImageFormat, OverwriteGate};
use crate::error::ConvertError;
use crate::style::{self, ColorPalette, ThemeMode};

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq)]
pub enum ThemePreference {
    System,
    Light,
    Dark,
}

#[derive(Serialize, Deserialize)]
struct AppSettings {
    theme_preference: ThemePreference,
    quality: u8,
    replace_original: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme_preference: ThemePreference::System,
            quality: 90,
            replace_original: true,
        }
    }
}

impl AppSettings {
    fn load() -> Self {
        let config_path = Self::get_config_path();
        if let Ok(contents) = fs::read_to_string(&config_path) {
            if let Ok(settings) = serde_json::from_str(&contents) {
                return settings;
            }
        }
        Self::default()
    }

    fn save(&self) {
        let config_path = Self::get_config_path();
        if let Some(parent) = config_path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        if let Ok(json) = serde_json::to_string_pretty(self) {
            let _ = fs::write(config_path, json);
        }
    }

    fn get_config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("convert_image");
        path.push("settings.json");
        path
    }
}

/// The file named on the command line, with the bits shown in the header.
struct SourceFile {
    path: PathBuf,
    format: ImageFormat,
    size_kb: Option<u64>,
}

impl SourceFile {
    fn new(path: PathBuf, format: ImageFormat) -> Self {
        let size_kb = fs::metadata(&path).ok().map(|m| m.len() / 1024);
        Self {
            path,
            format,
            size_kb,
        }
    }

    fn file_name(&self) -> String {
        file_name_of(&self.path)
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("Unknown")
        .to_string()
}

/// Terminal state shown once a conversion has gone through. The form is gone
/// at this point; the only remaining action is closing the window.
struct Completion {
    destination_name: String,
    source_deleted: bool,
    warning: Option<String>,
}

pub struct ConvertApp {
    source: SourceFile,
    target_format: ImageFormat,
    quality: u8,
    replace_original: bool,
    converter: Converter,
    gate: OverwriteGate,
    pending_plan: Option<ConversionPlan>,
    completion: Option<Completion>,
    error: Option<String>,
    theme_mode: ThemeMode,
    theme_preference: ThemePreference,
}

impl ConvertApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        source_path: PathBuf,
        source_format: ImageFormat,
    ) -> Self {
        let settings = AppSettings::load();

        let system_theme = match cc.egui_ctx.theme() {
            egui::Theme::Dark => ThemeMode::Dark,
            egui::Theme::Light => ThemeMode::Light,
        };

        let initial_theme = match settings.theme_preference {
            ThemePreference::System => system_theme,
            ThemePreference::Light => ThemeMode::Light,
            ThemePreference::Dark => ThemeMode::Dark,
        };

        style::apply_theme(&cc.egui_ctx, initial_theme);

        Self {
            source: SourceFile::new(source_path, source_format),
            target_format: ImageFormat::default_target(source_format),
            quality: settings.quality.clamp(1, 100),
            replace_original: settings.replace_original,
            converter: Converter::new(),
            gate: OverwriteGate::Idle,
            pending_plan: None,
            completion: None,
            error: None,
            theme_mode: initial_theme,
            theme_preference: settings.theme_preference,
        }
    }

    fn save_settings(&self) {
        let settings = AppSettings {
            theme_preference: self.theme_preference,
            quality: self.quality,
            replace_original: self.replace_original,
        };
        settings.save();
    }

    fn request_convert(&mut self) {
        self.error = None;
        let plan = ConversionPlan::build(
            &self.source.path,
            self.target_format,
            self.quality,
            self.replace_original,
        );
        self.save_settings();

        self.gate = OverwriteGate::request(plan.destination().is_file());
        match self.gate {
            OverwriteGate::Proceed => {
                self.gate = OverwriteGate::Idle;
                self.run_conversion(plan);
            }
            OverwriteGate::AwaitingConfirmation => {
                self.pending_plan = Some(plan);
            }
            _ => {}
        }
    }

    fn resolve_overwrite(&mut self, confirmed: bool, ctx: &egui::Context) {
        self.gate = self.gate.resolve(confirmed);
        match self.gate {
            OverwriteGate::Proceed => {
                self.gate = OverwriteGate::Idle;
                if let Some(plan) = self.pending_plan.take() {
                    self.run_conversion(plan);
                }
            }
            OverwriteGate::Cancelled => {
                // Declining the prompt ends the session with no side effects.
                self.pending_plan = None;
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
            _ => {}
        }
    }

    /// Blocks until the external tool exits. There is exactly one conversion
    /// in flight per session and nothing to do meanwhile.
    fn run_conversion(&mut self, plan: ConversionPlan) {
        match self.converter.run(&plan) {
            Ok(outcome) => {
                self.completion = Some(Completion {
                    destination_name: file_name_of(plan.destination()),
                    source_deleted: outcome.source_deleted,
                    warning: None,
                });
            }
            Err(ConvertError::SourceCleanup(err)) => {
                // The converted file is already on disk; only the cleanup of
                // the original went wrong.
                let warning = format!("Could not remove {}: {}", self.source.file_name(), err);
                eprintln!("{warning}");
                self.completion = Some(Completion {
                    destination_name: file_name_of(plan.destination()),
                    source_deleted: false,
                    warning: Some(warning),
                });
            }
            Err(err) => {
                eprintln!("Failed to convert {}: {}", self.source.file_name(), err);
                self.error = Some(err.to_string());
            }
        }
    }

    fn render_source_summary(&self, ui: &mut egui::Ui) {
        let (text_color, weak_color) = if matches!(self.theme_mode, ThemeMode::Dark) {
            (ColorPalette::ZINC_100, ColorPalette::ZINC_500)
        } else {
            (ColorPalette::GRAY_900, ColorPalette::GRAY_500)
        };

        ui.label(
            egui::RichText::new(self.source.file_name())
                .size(16.0)
                .color(text_color),
        );

        let info = match self.source.size_kb {
            Some(kb) => format!("{} | {} KB", self.source.format.as_str(), kb),
            None => self.source.format.as_str().to_string(),
        };
        ui.label(egui::RichText::new(info).size(11.0).color(weak_color));
    }

    fn render_format_selector(&mut self, ui: &mut egui::Ui) {
        let (panel_bg, border_color, text_color) = if matches!(self.theme_mode, ThemeMode::Dark) {
            (
                ColorPalette::ZINC_800,
                ColorPalette::ZINC_700,
                ColorPalette::ZINC_200,
            )
        } else {
            (
                ColorPalette::GRAY_50,
                ColorPalette::GRAY_300,
                ColorPalette::GRAY_800,
            )
        };

        egui::Frame::new()
            .fill(panel_bg)
            .stroke(egui::Stroke::new(1.0, border_color))
            .corner_radius(8.0)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.label(egui::RichText::new("Format").size(13.0).color(text_color));
                ui.add_space(6.0);

                ui.horizontal_wrapped(|ui| {
                    for &format in ImageFormat::all() {
                        let is_selected = self.target_format == format;

                        let (bg_color, txt_color) = if is_selected {
                            (ColorPalette::BLUE_600, egui::Color32::WHITE)
                        } else if matches!(self.theme_mode, ThemeMode::Dark) {
                            (ColorPalette::ZINC_700, ColorPalette::ZINC_300)
                        } else {
                            (ColorPalette::GRAY_200, ColorPalette::GRAY_800)
                        };

                        let button = egui::Button::new(
                            egui::RichText::new(format.as_str())
                                .size(13.0)
                                .color(txt_color),
                        )
                        .fill(bg_color)
                        .stroke(egui::Stroke::NONE)
                        .corner_radius(6.0)
                        .min_size(egui::vec2(70.0, 30.0));

                        if ui.add(button).clicked() {
                            self.target_format = format;
                        }
                    }
                });
            });
    }

    fn render_quality_settings(&mut self, ui: &mut egui::Ui) {
        let (panel_bg, border_color, text_color, label_color) =
            if matches!(self.theme_mode, ThemeMode::Dark) {
                (
                    ColorPalette::ZINC_800,
                    ColorPalette::ZINC_700,
                    ColorPalette::ZINC_200,
                    ColorPalette::ZINC_400,
                )
            } else {
                (
                    ColorPalette::GRAY_50,
                    ColorPalette::GRAY_300,
                    ColorPalette::GRAY_800,
                    ColorPalette::GRAY_600,
                )
            };

        egui::Frame::new()
            .fill(panel_bg)
            .stroke(egui::Stroke::new(1.0, border_color))
            .corner_radius(8.0)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.label(egui::RichText::new("Quality").size(13.0).color(text_color));
                ui.add_space(6.0);
                ui.add(egui::Slider::new(&mut self.quality, 1..=100).suffix("%"));

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(4.0);

                ui.checkbox(
                    &mut self.replace_original,
                    egui::RichText::new("Replace original file").color(label_color),
                );
            });
    }

    fn render_error(&self, ui: &mut egui::Ui) {
        if let Some(error) = &self.error {
            let error_color = if matches!(self.theme_mode, ThemeMode::Dark) {
                ColorPalette::RED_400
            } else {
                ColorPalette::RED_600
            };
            ui.label(egui::RichText::new(error).size(12.0).color(error_color));
        }
    }

    fn render_action_buttons(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let label = format!("Convert to {}", self.target_format.as_str());
        let mut convert_clicked = false;
        let mut cancel_clicked = false;

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            convert_clicked = style::primary_button(ui, &label, self.theme_mode).clicked();
            cancel_clicked = style::secondary_button(ui, "Cancel", self.theme_mode).clicked();
        });

        if cancel_clicked {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
        if convert_clicked {
            self.request_convert();
        }
    }

    fn render_theme_picker(&mut self, ui: &mut egui::Ui) {
        let mut changed = false;
        ui.horizontal(|ui| {
            ui.weak("Theme:");
            for (preference, label) in [
                (ThemePreference::System, "System"),
                (ThemePreference::Light, "Light"),
                (ThemePreference::Dark, "Dark"),
            ] {
                if ui
                    .selectable_label(self.theme_preference == preference, label)
                    .clicked()
                {
                    self.theme_preference = preference;
                    changed = true;
                }
            }
        });

        if changed {
            self.theme_mode = match self.theme_preference {
                ThemePreference::System => match ui.ctx().theme() {
                    egui::Theme::Dark => ThemeMode::Dark,
                    egui::Theme::Light => ThemeMode::Light,
                },
                ThemePreference::Light => ThemeMode::Light,
                ThemePreference::Dark => ThemeMode::Dark,
            };
            style::apply_theme(ui.ctx(), self.theme_mode);
            self.save_settings();
        }
    }

    fn render_confirm_dialog(&mut self, ctx: &egui::Context) {
        if self.gate != OverwriteGate::AwaitingConfirmation {
            return;
        }

        let (destination_name, target_name) = match self.pending_plan.as_ref() {
            Some(plan) => (file_name_of(plan.destination()), plan.target().as_str()),
            None => return,
        };

        let (bg_color, border_color, text_color, sub_color, overlay_color) =
            if matches!(self.theme_mode, ThemeMode::Dark) {
                (
                    ColorPalette::ZINC_800,
                    ColorPalette::ZINC_700,
                    ColorPalette::ZINC_100,
                    ColorPalette::ZINC_400,
                    egui::Color32::from_rgba_premultiplied(0, 0, 0, 200),
                )
            } else {
                (
                    egui::Color32::WHITE,
                    ColorPalette::GRAY_300,
                    ColorPalette::GRAY_900,
                    ColorPalette::GRAY_600,
                    egui::Color32::from_rgba_premultiplied(0, 0, 0, 150),
                )
            };

        egui::Area::new(egui::Id::new("overwrite_overlay"))
            .fixed_pos(egui::pos2(0.0, 0.0))
            .order(egui::Order::Foreground)
            .interactable(false)
            .show(ctx, |ui| {
                let screen_rect = ctx.content_rect();
                ui.painter().rect_filled(screen_rect, 0.0, overlay_color);
            });

        let mut overwrite_clicked = false;
        let mut cancel_clicked = false;

        egui::Window::new("Overwrite File")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .order(egui::Order::Tooltip)
            .frame(
                egui::Frame::new()
                    .fill(bg_color)
                    .stroke(egui::Stroke::new(1.0, border_color))
                    .corner_radius(8.0)
                    .inner_margin(24.0),
            )
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.add_space(8.0);
                    ui.label(
                        egui::RichText::new(format!("{destination_name} already exists."))
                            .size(16.0)
                            .color(text_color),
                    );
                    ui.add_space(8.0);
                    ui.label(
                        egui::RichText::new(format!(
                            "Converting to {target_name} will replace its contents."
                        ))
                        .size(13.0)
                        .color(sub_color),
                    );
                    ui.add_space(24.0);
                    ui.horizontal(|ui| {
                        ui.spacing_mut().item_spacing.x = 12.0;
                        overwrite_clicked =
                            style::primary_button(ui, "Overwrite", self.theme_mode).clicked();
                        cancel_clicked =
                            style::secondary_button(ui, "Cancel", self.theme_mode).clicked();
                    });
                    ui.add_space(8.0);
                });
            });

        if overwrite_clicked {
            self.resolve_overwrite(true, ctx);
        } else if cancel_clicked {
            self.resolve_overwrite(false, ctx);
        }
    }

    fn render_completion(&self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let completion = match &self.completion {
            Some(completion) => completion,
            None => return,
        };

        let (success_color, weak_color, warning_color) =
            if matches!(self.theme_mode, ThemeMode::Dark) {
                (
                    ColorPalette::GREEN_500,
                    ColorPalette::ZINC_400,
                    ColorPalette::AMBER_400,
                )
            } else {
                (
                    ColorPalette::GREEN_600,
                    ColorPalette::GRAY_600,
                    ColorPalette::AMBER_600,
                )
            };

        ui.vertical_centered(|ui| {
            ui.add_space(32.0);
            ui.label(
                egui::RichText::new(format!("Saved {}", completion.destination_name))
                    .size(18.0)
                    .color(success_color),
            );
            ui.add_space(8.0);

            if completion.source_deleted {
                ui.label(
                    egui::RichText::new(format!("{} was removed.", self.source.file_name()))
                        .size(12.0)
                        .color(weak_color),
                );
            }
            if let Some(warning) = &completion.warning {
                ui.label(
                    egui::RichText::new(warning.as_str())
                        .size(12.0)
                        .color(warning_color),
                );
            }

            ui.add_space(24.0);
            if style::primary_button(ui, "Close", self.theme_mode).clicked() {
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
        });
    }
}

impl eframe::App for ConvertApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if matches!(self.theme_preference, ThemePreference::System) {
            let system_theme = match ctx.theme() {
                egui::Theme::Dark => ThemeMode::Dark,
                egui::Theme::Light => ThemeMode::Light,
            };
            if self.theme_mode != system_theme {
                self.theme_mode = system_theme;
                style::apply_theme(ctx, self.theme_mode);
            }
        }

        self.render_confirm_dialog(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            if self.completion.is_some() {
                self.render_completion(ui, ctx);
                return;
            }

            ui.add_space(8.0);
            self.render_source_summary(ui);
            ui.add_space(8.0);
            self.render_format_selector(ui);
            ui.add_space(8.0);
            self.render_quality_settings(ui);
            ui.add_space(8.0);
            self.render_error(ui);
            self.render_action_buttons(ui, ctx);
            ui.add_space(4.0);
            ui.separator();
            self.render_theme_picker(ui);
        });
    }
}
