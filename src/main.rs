mod areas;
mod assets;
mod constants;
mod dialogs;
mod error;
mod export;
mod image_loader;
mod import;
mod macros;
mod page;
mod page_graph;
mod paths;

use assets::AssetLocator;
use constants::{
    COLOR_DRAFT_RECT, COLOR_HOTSPOT, COLOR_HOTSPOT_SELECTED, COLOR_MISSING_IMAGE,
    HOTSPOT_STROKE_WIDTH, INITIAL_WINDOW_HEIGHT, INITIAL_WINDOW_WIDTH, INSPECTOR_PANEL_WIDTH,
    INSPECTOR_ROW_HEIGHT, MIN_HOTSPOT_SIZE, PAGES_PANEL_WIDTH,
};
use dialogs::DialogAssetPrompt;
use eframe::egui::{self, pos2, Align2, Color32, Pos2, Rect, RichText, Sense, Stroke};
use egui_extras::{Column, TableBuilder};
use macros::MacroStore;
use page::{page_name_for, HotspotRect, PageImage};
use page_graph::PageGraph;
use std::path::PathBuf;

fn main() -> eframe::Result<()> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([INITIAL_WINDOW_WIDTH, INITIAL_WINDOW_HEIGHT]),
        ..Default::default()
    };

    eframe::run_native(
        "Multi-Page Image Mapper",
        options,
        Box::new(|cc| Ok(Box::new(ImageMapperApp::new(cc)))),
    )
}

/// Rectangle being dragged out on the canvas, in screen coordinates.
struct DraftRect {
    start: Pos2,
    end: Pos2,
}

enum MacroDialog {
    Save { name: String },
    Apply,
}

/// Everything the panels can ask for. Collected during layout, handled after.
enum UiAction {
    AddPage,
    ImportHtml,
    ExportHtml,
    SelectPage(String),
    SelectHotspot(usize),
    NewHotspot(HotspotRect),
    EditHotspot,
    DeleteHotspot,
    BeginSaveMacro,
    SaveMacro(String),
    BeginApplyMacro,
    ApplyMacro(String),
    CloseMacroDialog,
}

struct ImageMapperApp {
    graph: PageGraph,
    current_page: Option<String>,
    selected_hotspot: Option<usize>,
    draft: Option<DraftRect>,
    macros: MacroStore,
    macro_dialog: Option<MacroDialog>,
}

/// Directory used to find images referenced while editing.
fn working_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

impl ImageMapperApp {
    fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self {
            graph: PageGraph::new(),
            current_page: None,
            selected_hotspot: None,
            draft: None,
            macros: MacroStore::load(paths::macro_file()),
            macro_dialog: None,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Pages
    // ─────────────────────────────────────────────────────────────────────────────

    fn add_page(&mut self) {
        let Some(path) = dialogs::pick_image("Add Page") else {
            return;
        };
        let Some(name) = page_name_for(&path) else {
            log::error!("Unusable file name: {}", path.display());
            return;
        };
        self.graph.add_page(&name, Some(path));
        self.select_page(name);
    }

    fn select_page(&mut self, name: String) {
        self.current_page = Some(name);
        self.selected_hotspot = None;
        self.draft = None;
    }

    /// Decodes the page image the first time the page is shown.
    fn ensure_texture(&mut self, ctx: &egui::Context, name: &str) {
        let Some(page) = self.graph.get_mut(name) else {
            return;
        };
        if !matches!(page.image, PageImage::Pending) {
            return;
        }
        let Some(path) = page.source.clone() else {
            page.image = PageImage::Unavailable(format!("image '{name}' could not be located"));
            return;
        };
        page.image = match image_loader::load_page_image(&path) {
            Ok(image) => PageImage::Ready(ctx.load_texture(
                format!("page-{name}"),
                image,
                egui::TextureOptions::LINEAR,
            )),
            Err(err) => {
                log::error!("{err}");
                PageImage::Unavailable(err.to_string())
            }
        };
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Hotspots
    // ─────────────────────────────────────────────────────────────────────────────

    fn new_hotspot(&mut self, rect: HotspotRect) {
        let Some(page) = self.current_page.clone() else {
            return;
        };
        let Some(target_path) = dialogs::pick_image("Select Target Image for Hotspot") else {
            return;
        };
        let Some(target) = page_name_for(&target_path) else {
            return;
        };
        self.graph.add_page(&target, Some(target_path));

        let mut prompt = DialogAssetPrompt;
        let mut locator = AssetLocator::new(working_dir(), &mut prompt);
        if let Err(err) = self.graph.add_hotspot(&page, rect, &target, &mut locator) {
            dialogs::show_error(&err.to_string());
        }
    }

    fn edit_hotspot(&mut self) {
        let (Some(page), Some(index)) = (self.current_page.clone(), self.selected_hotspot) else {
            return;
        };
        let Some(target_path) = dialogs::pick_image("Select New Target Image") else {
            return;
        };
        let Some(target) = page_name_for(&target_path) else {
            return;
        };
        self.graph.add_page(&target, Some(target_path));

        let mut prompt = DialogAssetPrompt;
        let mut locator = AssetLocator::new(working_dir(), &mut prompt);
        if let Err(err) = self
            .graph
            .set_hotspot_target(&page, index, &target, &mut locator)
        {
            dialogs::show_error(&err.to_string());
        }
    }

    fn delete_hotspot(&mut self) {
        let (Some(page), Some(index)) = (self.current_page.as_deref(), self.selected_hotspot) else {
            return;
        };
        self.graph.remove_hotspot(page, index);
        self.selected_hotspot = None;
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Macros
    // ─────────────────────────────────────────────────────────────────────────────

    fn begin_save_macro(&mut self) {
        let Some(page) = self.current_page.as_deref().and_then(|n| self.graph.get(n)) else {
            dialogs::show_error("No page loaded.");
            return;
        };
        if page.hotspots.is_empty() {
            dialogs::show_error("No hotspots to save as a macro.");
            return;
        }
        self.macro_dialog = Some(MacroDialog::Save {
            name: String::new(),
        });
    }

    fn save_macro(&mut self, name: &str) {
        self.macro_dialog = None;
        if name.is_empty() {
            return;
        }
        let Some(page) = self.current_page.as_deref().and_then(|n| self.graph.get(n)) else {
            return;
        };
        match self.macros.save(name, &page.hotspots) {
            Ok(()) => dialogs::show_info("Saved", &format!("Macro '{name}' saved.")),
            Err(err) => dialogs::show_error(&format!("Macro '{name}' could not be saved: {err}")),
        }
    }

    fn begin_apply_macro(&mut self) {
        if self.macros.is_empty() {
            dialogs::show_error("No macros available.");
            return;
        }
        if self.current_page.is_none() {
            dialogs::show_error("No page loaded.");
            return;
        }
        self.macro_dialog = Some(MacroDialog::Apply);
    }

    fn apply_macro(&mut self, name: &str) {
        self.macro_dialog = None;
        let Some(page) = self.current_page.clone() else {
            return;
        };
        let mut prompt = DialogAssetPrompt;
        let mut locator = AssetLocator::new(working_dir(), &mut prompt);
        match macros::apply_macro(&self.macros, name, &mut self.graph, &page, &mut locator) {
            Ok(_) => dialogs::show_info(
                "Macro Applied",
                &format!("Macro '{name}' applied to this page."),
            ),
            Err(err) => dialogs::show_error(&err.to_string()),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Export / Import
    // ─────────────────────────────────────────────────────────────────────────────

    fn export_html(&mut self) {
        if self.graph.is_empty() {
            dialogs::show_error("No pages to export.");
            return;
        }
        let Some(dir) = dialogs::pick_export_dir() else {
            return;
        };
        match export::export_bundle(&self.graph, &dir) {
            Ok(report) if report.is_complete() => dialogs::show_info(
                "Export Complete",
                "The HTML simulator was created successfully!",
            ),
            Ok(report) => {
                let failures: Vec<String> = report
                    .failed
                    .iter()
                    .map(|(page, err)| format!("{page}: {err}"))
                    .collect();
                dialogs::show_warning(
                    "Export Incomplete",
                    &format!(
                        "The simulator was written, but some pages were not exported cleanly:\n{}",
                        failures.join("\n")
                    ),
                );
            }
            Err(err) => {
                log::error!("Export failed: {err}");
                dialogs::show_error(&format!("Export failed:\n{err}"));
            }
        }
    }

    fn import_html(&mut self) {
        let Some(path) = dialogs::pick_html() else {
            return;
        };
        let mut prompt = DialogAssetPrompt;
        match import::import_file(&mut self.graph, &path, &mut prompt) {
            Ok(()) => {
                self.current_page = None;
                if let Some(first) = self.graph.first_page().map(|p| p.name.clone()) {
                    self.select_page(first);
                }
                dialogs::show_info(
                    "Import Complete",
                    "HTML successfully imported into the editor!",
                );
            }
            Err(err) => {
                log::error!("Import of {} failed: {err}", path.display());
                dialogs::show_error(&err.to_string());
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Panels
    // ─────────────────────────────────────────────────────────────────────────────

    fn pages_panel(&self, ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
        ui.label(RichText::new("Pages").strong().size(16.0));
        ui.horizontal(|ui| {
            if ui.button("Add Page").clicked() {
                actions.push(UiAction::AddPage);
            }
            if ui.button("Import HTML").clicked() {
                actions.push(UiAction::ImportHtml);
            }
        });
        ui.separator();

        egui::ScrollArea::vertical()
            .id_salt("page_list")
            .show(ui, |ui| {
                for name in self.graph.page_names() {
                    let selected = self.current_page.as_deref() == Some(name);
                    if ui.selectable_label(selected, name).clicked() {
                        actions.push(UiAction::SelectPage(name.to_string()));
                    }
                }
            });
    }

    fn inspector_panel(&self, ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
        ui.label(RichText::new("Hotspots").strong().size(16.0));

        let labels: Vec<String> = self
            .current_page
            .as_deref()
            .and_then(|n| self.graph.get(n))
            .map(|page| {
                page.hotspots
                    .iter()
                    .enumerate()
                    .map(|(idx, hs)| hs.label(idx))
                    .collect()
            })
            .unwrap_or_default();

        let max_height = ui.available_height() * 0.6;
        ui.push_id("hotspot_table", |ui| {
            TableBuilder::new(ui)
                .striped(true)
                .max_scroll_height(max_height)
                .column(Column::remainder())
                .body(|mut body| {
                    for (idx, label) in labels.iter().enumerate() {
                        body.row(INSPECTOR_ROW_HEIGHT, |mut row| {
                            row.col(|ui| {
                                let selected = self.selected_hotspot == Some(idx);
                                if ui.selectable_label(selected, label.as_str()).clicked() {
                                    actions.push(UiAction::SelectHotspot(idx));
                                }
                            });
                        });
                    }
                });
        });

        ui.separator();
        if ui.button("Edit Hotspot Target").clicked() {
            actions.push(UiAction::EditHotspot);
        }
        if ui.button("Delete Hotspot").clicked() {
            actions.push(UiAction::DeleteHotspot);
        }

        ui.add_space(10.0);
        ui.label(RichText::new("Macros").strong().size(16.0));
        if ui.button("Save Current Page as Macro").clicked() {
            actions.push(UiAction::BeginSaveMacro);
        }
        if ui.button("Apply Macro to Page").clicked() {
            actions.push(UiAction::BeginApplyMacro);
        }

        ui.add_space(10.0);
        if ui.button("Export HTML").clicked() {
            actions.push(UiAction::ExportHtml);
        }
    }

    /// Paints the page with its hotspots and tracks rectangle dragging.
    /// Returns a finished rectangle in image coordinates.
    fn canvas(
        &mut self,
        ui: &mut egui::Ui,
        page: &str,
        texture: &egui::TextureHandle,
    ) -> Option<HotspotRect> {
        let (rect, response) = ui.allocate_exact_size(texture.size_vec2(), Sense::drag());
        let painter = ui.painter_at(rect);
        painter.image(
            texture.id(),
            rect,
            Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
            Color32::WHITE,
        );

        if let Some(page) = self.graph.get(page) {
            for (idx, hs) in page.hotspots.iter().enumerate() {
                let color = if self.selected_hotspot == Some(idx) {
                    COLOR_HOTSPOT_SELECTED
                } else {
                    COLOR_HOTSPOT
                };
                painter.rect_stroke(
                    hs.rect.to_egui(rect.min),
                    0.0,
                    Stroke::new(HOTSPOT_STROKE_WIDTH, color),
                );
            }
        }

        if response.drag_started() {
            if let Some(pos) = response.interact_pointer_pos() {
                let pos = rect.clamp(pos);
                self.draft = Some(DraftRect {
                    start: pos,
                    end: pos,
                });
            }
        }
        if response.dragged() {
            if let (Some(draft), Some(pos)) = (self.draft.as_mut(), response.interact_pointer_pos())
            {
                draft.end = rect.clamp(pos);
            }
        }
        if let Some(draft) = &self.draft {
            painter.rect_stroke(
                Rect::from_two_pos(draft.start, draft.end),
                0.0,
                Stroke::new(HOTSPOT_STROKE_WIDTH, COLOR_DRAFT_RECT),
            );
        }

        if response.drag_stopped() {
            if let Some(draft) = self.draft.take() {
                let drawn = Rect::from_two_pos(draft.start, draft.end);
                if drawn.width() >= MIN_HOTSPOT_SIZE && drawn.height() >= MIN_HOTSPOT_SIZE {
                    return Some(HotspotRect::from_points(rect.min, draft.start, draft.end));
                }
            }
        }
        None
    }

    fn macro_window(&mut self, ctx: &egui::Context, actions: &mut Vec<UiAction>) {
        let names = self.macros.list();
        let Some(dialog) = self.macro_dialog.as_mut() else {
            return;
        };

        match dialog {
            MacroDialog::Save { name } => {
                egui::Window::new("Macro Name")
                    .collapsible(false)
                    .resizable(false)
                    .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
                    .show(ctx, |ui| {
                        ui.label("Enter a name for this macro:");
                        let response = ui.text_edit_singleline(name);
                        let entered = response.lost_focus()
                            && ui.input(|i| i.key_pressed(egui::Key::Enter));
                        ui.horizontal(|ui| {
                            if ui.button("Save").clicked() || entered {
                                actions.push(UiAction::SaveMacro(name.trim().to_string()));
                            }
                            if ui.button("Cancel").clicked() {
                                actions.push(UiAction::CloseMacroDialog);
                            }
                        });
                    });
            }
            MacroDialog::Apply => {
                egui::Window::new("Apply Macro")
                    .collapsible(false)
                    .resizable(false)
                    .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
                    .show(ctx, |ui| {
                        ui.label("Choose a macro:");
                        for name in &names {
                            if ui.button(name.as_str()).clicked() {
                                actions.push(UiAction::ApplyMacro(name.clone()));
                            }
                        }
                        ui.separator();
                        if ui.button("Cancel").clicked() {
                            actions.push(UiAction::CloseMacroDialog);
                        }
                    });
            }
        }
    }

    fn handle(&mut self, action: UiAction) {
        match action {
            UiAction::AddPage => self.add_page(),
            UiAction::ImportHtml => self.import_html(),
            UiAction::ExportHtml => self.export_html(),
            UiAction::SelectPage(name) => self.select_page(name),
            UiAction::SelectHotspot(idx) => self.selected_hotspot = Some(idx),
            UiAction::NewHotspot(rect) => self.new_hotspot(rect),
            UiAction::EditHotspot => self.edit_hotspot(),
            UiAction::DeleteHotspot => self.delete_hotspot(),
            UiAction::BeginSaveMacro => self.begin_save_macro(),
            UiAction::SaveMacro(name) => self.save_macro(&name),
            UiAction::BeginApplyMacro => self.begin_apply_macro(),
            UiAction::ApplyMacro(name) => self.apply_macro(&name),
            UiAction::CloseMacroDialog => self.macro_dialog = None,
        }
    }
}

impl eframe::App for ImageMapperApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut actions = Vec::new();

        egui::SidePanel::left("pages")
            .exact_width(PAGES_PANEL_WIDTH)
            .show(ctx, |ui| self.pages_panel(ui, &mut actions));

        egui::SidePanel::right("inspector")
            .exact_width(INSPECTOR_PANEL_WIDTH)
            .show(ctx, |ui| self.inspector_panel(ui, &mut actions));

        if let Some(name) = self.current_page.clone() {
            self.ensure_texture(ctx, &name);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(name) = self.current_page.clone() else {
                ui.centered_and_justified(|ui| ui.label("Add a page to start mapping."));
                return;
            };
            let image = self.graph.get(&name).map(|p| p.image.clone());
            match image {
                Some(PageImage::Ready(texture)) => {
                    egui::ScrollArea::both()
                        .id_salt("canvas")
                        .auto_shrink([false, false])
                        .show(ui, |ui| {
                            if let Some(rect) = self.canvas(ui, &name, &texture) {
                                actions.push(UiAction::NewHotspot(rect));
                            }
                        });
                }
                Some(PageImage::Unavailable(reason)) => {
                    ui.colored_label(COLOR_MISSING_IMAGE, reason);
                }
                _ => {}
            }
        });

        self.macro_window(ctx, &mut actions);

        for action in actions {
            self.handle(action);
        }
    }
}
