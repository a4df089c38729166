use std::path::Path;
use std::time::Duration;

use eframe::egui;
use gifstudio_adapters::{present_details, present_metrics};
use gifstudio_application::{
    AddStepCommand, ApplicationError, MoveStepCommand, PumpEventsCommand, RemoveStepCommand,
    SelectSourceCommand, SetCreatePreviewCommand, SetOutputFilenameCommand,
    SetOutputFormatCommand, SetParamCommand, StudioService, SubmitPipelineCommand,
};
use gifstudio_domain::{FlipMode, OutputFormat, PadPosition, PipelineStep, PluginKind};
use rfd::FileDialog;
use serde_json::{json, Map, Value};

use crate::config::AppConfig;

const WINDOW_SIZE: [f32; 2] = [1160.0, 720.0];
const SETTINGS_PANEL_MIN_WIDTH: f32 = 360.0;
const PREVIEW_MAX_EDGE: f32 = 360.0;
const REPAINT_WHILE_BUSY_MS: u64 = 120;

pub fn launch_window(service: StudioService, config: &AppConfig) -> Result<(), String> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size(WINDOW_SIZE),
        ..Default::default()
    };
    let endpoint = config.endpoint.clone();

    eframe::run_native(
        "gifstudio",
        options,
        Box::new(move |_cc| Ok(Box::new(StudioApp::new(service, endpoint)))),
    )
    .map_err(|error| format!("failed to start UI window: {error}"))
}

#[derive(Debug, Clone, Copy)]
struct DragState {
    index: usize,
}

/// Edits collected while rendering a frame; applied after the frame so the
/// rendered list stays a consistent snapshot.
enum PendingAction {
    Add(PluginKind),
    Remove(usize),
    Move { from: usize, to: usize },
    SetParam { index: usize, key: &'static str, value: Value },
}

struct PreviewTexture {
    sequence: u64,
    texture: Option<egui::TextureHandle>,
}

struct StudioApp {
    service: StudioService,
    endpoint: String,
    drag: Option<DragState>,
    alert: Option<String>,
    preview_texture: Option<PreviewTexture>,
}

impl StudioApp {
    fn new(service: StudioService, endpoint: String) -> Self {
        Self {
            service,
            endpoint,
            drag: None,
            alert: None,
            preview_texture: None,
        }
    }

    fn pipeline_panel(&mut self, ui: &mut egui::Ui, actions: &mut Vec<PendingAction>) {
        ui.heading("Plugins");
        ui.separator();

        let pointer = ui.ctx().input(|input| input.pointer.interact_pos());
        egui::ScrollArea::vertical().auto_shrink(false).show(ui, |ui| {
            let steps = self.service.session().pipeline.steps().to_vec();
            for (index, step) in steps.iter().enumerate() {
                let dragging_this = self.drag.is_some_and(|drag| drag.index == index);
                let group = ui
                    .push_id(step.id, |ui| {
                        ui.group(|ui| {
                            let mut drag_started = false;
                            ui.horizontal(|ui| {
                                let handle = ui
                                    .add(egui::Button::new("≡").sense(egui::Sense::drag()))
                                    .on_hover_text("Drag to reorder");
                                if handle.drag_started() {
                                    drag_started = true;
                                }
                                ui.label(egui::RichText::new(step.kind.label()).strong());
                                if dragging_this {
                                    ui.label(egui::RichText::new("(moving)").weak());
                                }
                                ui.with_layout(
                                    egui::Layout::right_to_left(egui::Align::Center),
                                    |ui| {
                                        if ui.button("Remove").clicked() {
                                            actions.push(PendingAction::Remove(index));
                                        }
                                    },
                                );
                            });
                            ui.separator();
                            step_editor(ui, index, step, actions);
                            drag_started
                        })
                    })
                    .inner;

                if group.inner {
                    self.drag = Some(DragState { index });
                }

                let row_rect = group.response.rect;
                if let (Some(drag), Some(pointer)) = (self.drag, pointer) {
                    if pointer.y >= row_rect.top()
                        && pointer.y <= row_rect.bottom()
                        && should_swap(
                            drag.index,
                            index,
                            pointer.y,
                            row_rect.top(),
                            row_rect.bottom(),
                        )
                    {
                        actions.push(PendingAction::Move {
                            from: drag.index,
                            to: index,
                        });
                        self.drag = Some(DragState { index });
                    }
                }
                ui.add_space(6.0);
            }

            ui.separator();
            ui.label("Add plugin");
            egui::ComboBox::from_id_salt("add-plugin")
                .selected_text("Select plugin to add")
                .show_ui(ui, |ui| {
                    for kind in PluginKind::ALL {
                        if ui.selectable_label(false, kind.label()).clicked() {
                            actions.push(PendingAction::Add(kind));
                        }
                    }
                });
        });
    }

    fn settings_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Settings");
        ui.separator();

        if ui.button("Choose file…").clicked() {
            if let Some(path) = FileDialog::new()
                .add_filter("GIF image", &["gif"])
                .pick_file()
            {
                if let Err(error) = self.service.select_source(SelectSourceCommand { path }) {
                    log::error!("file selection failed: {error}");
                }
            }
        }
        let source_name = self
            .service
            .session()
            .source
            .as_ref()
            .map(|source| source.file_name.clone());
        if let Some(name) = source_name {
            ui.label(name);
        }

        let details = self.service.session().details.clone();
        if let Some(details) = details {
            ui.separator();
            ui.label(egui::RichText::new("File details").strong());
            ui.label(format!("Format: {}", details.format));
            ui.label(format!("Frames: {}", details.frame_count));
            ui.label(format!("File size: {}", details.file_size));
            ui.label(format!("Dimensions: {}", details.dimensions));
        }

        ui.separator();
        let current_format = self.service.session().settings.output_format;
        let mut format = current_format;
        ui.horizontal(|ui| {
            ui.label("Output format");
            egui::ComboBox::from_id_salt("output-format")
                .selected_text(format.label())
                .show_ui(ui, |ui| {
                    for candidate in OutputFormat::ALL {
                        ui.selectable_value(&mut format, candidate, candidate.label());
                    }
                });
        });
        if format != current_format {
            self.service
                .set_output_format(SetOutputFormatCommand { format });
        }

        let mut create_preview = self.service.session().settings.create_preview;
        if ui.checkbox(&mut create_preview, "Generate preview").changed() {
            self.service.set_create_preview(SetCreatePreviewCommand {
                enabled: create_preview,
            });
        }

        let mut output_filename = self.service.session().settings.output_filename.clone();
        let mut filename_changed = false;
        ui.horizontal(|ui| {
            ui.label("Output name");
            filename_changed = ui.text_edit_singleline(&mut output_filename).changed();
        });
        if filename_changed {
            self.service.set_output_filename(SetOutputFilenameCommand {
                name: output_filename,
            });
        }

        ui.separator();
        let busy = self.service.session().busy;
        let submit = ui.add_enabled(!busy, egui::Button::new("Generate"));
        if submit.clicked() {
            match self.service.submit(SubmitPipelineCommand) {
                Ok(sequence) => log::debug!("pipeline job seq={sequence} queued"),
                Err(ApplicationError::NoSourceFile) => {
                    self.alert = Some("Please upload a file".to_string());
                }
                Err(error) => log::error!("submission failed: {error}"),
            }
        }

        let preview_info = self
            .service
            .session()
            .preview
            .as_ref()
            .map(|slot| (slot.sequence, slot.artifact.path.clone()));
        if let Some((sequence, path)) = preview_info {
            ui.separator();
            ui.label(egui::RichText::new("Preview").strong());
            self.refresh_preview_texture(ui.ctx(), sequence, &path);
            if let Some(texture) = self
                .preview_texture
                .as_ref()
                .and_then(|cached| cached.texture.as_ref())
            {
                let size = fit_size(texture.size_vec2(), PREVIEW_MAX_EDGE);
                ui.image((texture.id(), size));
            } else {
                ui.label("Preview could not be decoded.");
            }
        }

        let archive_info = self
            .service
            .session()
            .archive
            .as_ref()
            .map(|slot| (slot.artifact.path.clone(), slot.download_name.clone()));
        if let Some((path, download_name)) = archive_info {
            ui.separator();
            ui.label(egui::RichText::new("Download frames").strong());
            if ui.button(format!("Save {download_name}…")).clicked() {
                if let Some(target) = FileDialog::new().set_file_name(&download_name).save_file() {
                    if let Err(error) = std::fs::copy(&path, &target) {
                        log::error!("failed to save archive: {error}");
                    }
                }
            }
        }
    }

    fn refresh_preview_texture(&mut self, ctx: &egui::Context, sequence: u64, path: &Path) {
        if self
            .preview_texture
            .as_ref()
            .map(|cached| cached.sequence)
            == Some(sequence)
        {
            return;
        }
        let texture = match load_preview_texture(ctx, path) {
            Ok(texture) => Some(texture),
            Err(error) => {
                log::warn!("failed to load preview artifact: {error}");
                None
            }
        };
        self.preview_texture = Some(PreviewTexture { sequence, texture });
    }

    fn apply_actions(&mut self, actions: Vec<PendingAction>) {
        for action in actions {
            let outcome = match action {
                PendingAction::Add(kind) => {
                    self.service.add_step(AddStepCommand { kind });
                    Ok(())
                }
                PendingAction::Remove(index) => {
                    self.service.remove_step(RemoveStepCommand { index })
                }
                PendingAction::Move { from, to } => {
                    self.service.move_step(MoveStepCommand { from, to })
                }
                PendingAction::SetParam { index, key, value } => {
                    self.service.set_param(SetParamCommand {
                        index,
                        key: key.to_string(),
                        value,
                    })
                }
            };
            if let Err(error) = outcome {
                log::warn!("pipeline edit rejected: {error}");
            }
        }
    }

    fn alert_window(&mut self, ctx: &egui::Context) {
        let Some(message) = self.alert.clone() else {
            return;
        };
        egui::Window::new("Notice")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label(message);
                if ui.button("OK").clicked() {
                    self.alert = None;
                }
            });
    }
}

impl eframe::App for StudioApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Err(error) = self.service.pump(PumpEventsCommand) {
            log::error!("event pump failed: {error}");
        }

        if self.service.session().busy || self.service.session().probing {
            ctx.request_repaint_after(Duration::from_millis(REPAINT_WHILE_BUSY_MS));
        }

        let mut actions: Vec<PendingAction> = Vec::new();

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("gifstudio");
                ui.separator();
                ui.label(format!("GIF processor client | {}", self.endpoint));
            });
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            let session = self.service.session();
            let mut line = format!(
                "{} | {}",
                session.status,
                present_metrics(self.service.metrics())
            );
            if let Some(details) = &session.details {
                line = format!("{line} | {}", present_details(details));
            }
            ui.label(line);
        });

        egui::SidePanel::right("settings")
            .min_width(SETTINGS_PANEL_MIN_WIDTH)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().auto_shrink(false).show(ui, |ui| {
                    self.settings_panel(ui);
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.pipeline_panel(ui, &mut actions);
        });

        if ctx.input(|input| input.pointer.any_released()) {
            self.drag = None;
        }

        self.apply_actions(actions);
        self.alert_window(ctx);
    }
}

fn step_editor(
    ui: &mut egui::Ui,
    index: usize,
    step: &PipelineStep,
    actions: &mut Vec<PendingAction>,
) {
    match step.kind {
        PluginKind::Resize => pair_editor(
            ui,
            index,
            "size",
            "Width (px)",
            "Height (px)",
            &step.params,
            actions,
        ),
        PluginKind::Flip => flip_editor(ui, index, step.id, &step.params, actions),
        PluginKind::Pad => {
            pair_editor(
                ui,
                index,
                "target_size",
                "Width (px)",
                "Height (px)",
                &step.params,
                actions,
            );
            pad_position_editor(ui, index, step.id, &step.params, actions);
            color_editor(ui, index, &step.params, actions);
        }
        PluginKind::Crop => crop_editor(ui, index, &step.params, actions),
        PluginKind::Rotate => rotate_editor(ui, index, &step.params, actions),
    }
}

/// Editor for parameters stored as a `[first, second]` pair. The two fields
/// edit independent halves; the pair is reassembled on every change.
fn pair_editor(
    ui: &mut egui::Ui,
    index: usize,
    key: &'static str,
    first_label: &str,
    second_label: &str,
    params: &Map<String, Value>,
    actions: &mut Vec<PendingAction>,
) {
    let (mut first, mut second) = param_pair(params, key);
    let mut changed = false;
    ui.horizontal(|ui| {
        ui.label(first_label);
        changed |= ui.add(egui::DragValue::new(&mut first)).changed();
    });
    ui.horizontal(|ui| {
        ui.label(second_label);
        changed |= ui.add(egui::DragValue::new(&mut second)).changed();
    });
    if changed {
        actions.push(PendingAction::SetParam {
            index,
            key,
            value: json!([first, second]),
        });
    }
}

fn flip_editor(
    ui: &mut egui::Ui,
    index: usize,
    step_id: u64,
    params: &Map<String, Value>,
    actions: &mut Vec<PendingAction>,
) {
    let current = FlipMode::from_wire(param_str(params, "mode", "vertical"));
    let mut selected = current;
    ui.horizontal(|ui| {
        ui.label("Mode");
        egui::ComboBox::from_id_salt(("flip-mode", step_id))
            .selected_text(selected.label())
            .show_ui(ui, |ui| {
                for mode in FlipMode::ALL {
                    ui.selectable_value(&mut selected, mode, mode.label());
                }
            });
    });
    if selected != current {
        actions.push(PendingAction::SetParam {
            index,
            key: "mode",
            value: json!(selected.wire_name()),
        });
    }
}

fn pad_position_editor(
    ui: &mut egui::Ui,
    index: usize,
    step_id: u64,
    params: &Map<String, Value>,
    actions: &mut Vec<PendingAction>,
) {
    let current = PadPosition::from_wire(param_str(params, "position", "center"));
    let mut selected = current;
    ui.horizontal(|ui| {
        ui.label("Position");
        egui::ComboBox::from_id_salt(("pad-position", step_id))
            .selected_text(selected.label())
            .show_ui(ui, |ui| {
                for position in PadPosition::ALL {
                    ui.selectable_value(&mut selected, position, position.label());
                }
            });
    });
    if selected != current {
        actions.push(PendingAction::SetParam {
            index,
            key: "position",
            value: json!(selected.wire_name()),
        });
    }
}

fn color_editor(
    ui: &mut egui::Ui,
    index: usize,
    params: &Map<String, Value>,
    actions: &mut Vec<PendingAction>,
) {
    let current = param_str(params, "color", "#000000");
    let mut rgb = parse_hex_color(current).unwrap_or([0, 0, 0]);
    ui.horizontal(|ui| {
        ui.label("Background color");
        if ui.color_edit_button_srgb(&mut rgb).changed() {
            actions.push(PendingAction::SetParam {
                index,
                key: "color",
                value: json!(format_hex_color(rgb)),
            });
        }
    });
}

fn crop_editor(
    ui: &mut egui::Ui,
    index: usize,
    params: &Map<String, Value>,
    actions: &mut Vec<PendingAction>,
) {
    let mut coordinates = param_quad(params, "coordinates");
    let mut changed = false;
    ui.horizontal(|ui| {
        for (slot, label) in coordinates.iter_mut().zip(["Left", "Top", "Right", "Bottom"]) {
            ui.label(label);
            changed |= ui.add(egui::DragValue::new(slot)).changed();
        }
    });
    if changed {
        actions.push(PendingAction::SetParam {
            index,
            key: "coordinates",
            value: json!(coordinates),
        });
    }
}

fn rotate_editor(
    ui: &mut egui::Ui,
    index: usize,
    params: &Map<String, Value>,
    actions: &mut Vec<PendingAction>,
) {
    let mut angle = param_i64(params, "angle", 0);
    ui.horizontal(|ui| {
        ui.label("Angle (degrees)");
        if ui.add(egui::DragValue::new(&mut angle)).changed() {
            actions.push(PendingAction::SetParam {
                index,
                key: "angle",
                value: json!(angle),
            });
        }
    });
}

fn param_i64(params: &Map<String, Value>, key: &str, fallback: i64) -> i64 {
    params
        .get(key)
        .and_then(Value::as_i64)
        .unwrap_or(fallback)
}

fn param_str<'a>(params: &'a Map<String, Value>, key: &str, fallback: &'a str) -> &'a str {
    params
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or(fallback)
}

fn param_pair(params: &Map<String, Value>, key: &str) -> (i64, i64) {
    let values = params.get(key).and_then(Value::as_array);
    let first = values
        .and_then(|values| values.first())
        .and_then(Value::as_i64)
        .unwrap_or(0);
    let second = values
        .and_then(|values| values.get(1))
        .and_then(Value::as_i64)
        .unwrap_or(0);
    (first, second)
}

fn param_quad(params: &Map<String, Value>, key: &str) -> [i64; 4] {
    let mut out = [0_i64; 4];
    if let Some(values) = params.get(key).and_then(Value::as_array) {
        for (slot, value) in out.iter_mut().zip(values) {
            *slot = value.as_i64().unwrap_or(0);
        }
    }
    out
}

fn parse_hex_color(text: &str) -> Option<[u8; 3]> {
    let hex = text.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let value = u32::from_str_radix(hex, 16).ok()?;
    Some([(value >> 16) as u8, (value >> 8) as u8, value as u8])
}

fn format_hex_color(rgb: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
}

/// The midpoint-crossing rule: while a drag hovers over another row, swap
/// only once the pointer passes the hovered row's vertical middle in the
/// direction of travel. Keeps adjacent rows from oscillating mid-drag.
fn should_swap(
    drag_index: usize,
    hover_index: usize,
    pointer_y: f32,
    hover_top: f32,
    hover_bottom: f32,
) -> bool {
    if drag_index == hover_index {
        return false;
    }
    let hover_middle = (hover_top + hover_bottom) / 2.0;
    if drag_index < hover_index && pointer_y < hover_middle {
        return false;
    }
    if drag_index > hover_index && pointer_y > hover_middle {
        return false;
    }
    true
}

fn fit_size(size: egui::Vec2, max_edge: f32) -> egui::Vec2 {
    let largest = size.x.max(size.y);
    if largest <= max_edge || largest <= 0.0 {
        return size;
    }
    size * (max_edge / largest)
}

fn load_preview_texture(
    ctx: &egui::Context,
    path: &Path,
) -> Result<egui::TextureHandle, String> {
    let bytes = std::fs::read(path).map_err(|error| error.to_string())?;
    let decoded = image::load_from_memory(&bytes).map_err(|error| error.to_string())?;
    let rgba = decoded.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    let pixels = egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw());
    Ok(ctx.load_texture("pipeline-preview", pixels, egui::TextureOptions::LINEAR))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downward_drag_swaps_only_past_the_midpoint() {
        // Hovered row spans 100..200, midpoint 150.
        assert!(!should_swap(0, 2, 120.0, 100.0, 200.0));
        assert!(should_swap(0, 2, 160.0, 100.0, 200.0));
    }

    #[test]
    fn upward_drag_swaps_only_past_the_midpoint() {
        assert!(!should_swap(2, 0, 180.0, 100.0, 200.0));
        assert!(should_swap(2, 0, 130.0, 100.0, 200.0));
    }

    #[test]
    fn hovering_the_dragged_row_never_swaps() {
        assert!(!should_swap(1, 1, 150.0, 100.0, 200.0));
    }

    #[test]
    fn hex_colors_roundtrip() {
        assert_eq!(parse_hex_color("#ffffff"), Some([255, 255, 255]));
        assert_eq!(parse_hex_color("#1a2b3c"), Some([0x1a, 0x2b, 0x3c]));
        assert_eq!(format_hex_color([0x1a, 0x2b, 0x3c]), "#1a2b3c");
        assert_eq!(parse_hex_color("red"), None);
        assert_eq!(parse_hex_color("#fff"), None);
    }

    #[test]
    fn param_helpers_fall_back_on_missing_or_malformed_values() {
        let mut params = Map::new();
        params.insert("size".to_string(), json!([320, 240]));
        params.insert("mode".to_string(), json!("horizontal"));

        assert_eq!(param_pair(&params, "size"), (320, 240));
        assert_eq!(param_pair(&params, "target_size"), (0, 0));
        assert_eq!(param_str(&params, "mode", "vertical"), "horizontal");
        assert_eq!(param_str(&params, "position", "center"), "center");
        assert_eq!(param_i64(&params, "angle", 90), 90);
        assert_eq!(param_quad(&params, "coordinates"), [0, 0, 0, 0]);
    }

    #[test]
    fn oversized_previews_shrink_to_fit() {
        let fitted = fit_size(egui::vec2(720.0, 360.0), 360.0);
        assert_eq!(fitted, egui::vec2(360.0, 180.0));

        let untouched = fit_size(egui::vec2(100.0, 50.0), 360.0);
        assert_eq!(untouched, egui::vec2(100.0, 50.0));
    }
}
