//! TableMorph Main Application
//! Main window with the upload panel and one section per loaded file.

use std::fs;
use std::path::PathBuf;

use egui::{Color32, RichText, ScrollArea, SidePanel};
use polars::prelude::*;
use tracing::{info, warn};

use crate::data::projector::select_columns;
use crate::data::{compare, DataCleaner, FileSession, ParserRegistry, TableDiff, UploadedFile};
use crate::convert::Converter;
use crate::gui::{FilePanel, FilePanelAction};

/// Main application window.
pub struct TableMorphApp {
    registry: ParserRegistry,
    sessions: Vec<FileSession>,
    /// One entry per file that failed to load; failures never abort the
    /// remaining files.
    load_errors: Vec<String>,
}

impl TableMorphApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self {
            registry: ParserRegistry::with_default_parsers(),
            sessions: Vec::new(),
            load_errors: Vec::new(),
        }
    }

    /// Handle the file picker; each selected file is loaded
    /// independently.
    fn handle_open_files(&mut self) {
        let Some(paths) = rfd::FileDialog::new()
            .add_filter("Tabular Files", &["csv", "xlsx"])
            .pick_files()
        else {
            return;
        };
        for path in paths {
            self.load_file(path);
        }
    }

    fn load_file(&mut self, path: PathBuf) {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(file = %name, error = %err, "could not read file");
                self.load_errors.push(format!("{name}: {err}"));
                return;
            }
        };

        let file = UploadedFile::new(name.clone(), bytes);
        let table = match self.registry.parse(&file.name, &file.bytes) {
            Ok(table) => table,
            Err(err) => {
                warn!(file = %name, error = %err, "could not parse file");
                self.load_errors.push(format!("{name}: {err}"));
                return;
            }
        };

        match FileSession::new(file, table) {
            Ok(session) => {
                info!(
                    file = %name,
                    rows = session.table.height(),
                    columns = session.table.width(),
                    "file loaded"
                );
                self.sessions.push(session);
            }
            Err(err) => self.load_errors.push(format!("{name}: {err}")),
        }
    }

    fn handle_action(&mut self, idx: usize, action: FilePanelAction) {
        match action {
            FilePanelAction::None => {}
            FilePanelAction::RemoveDuplicates => {
                let result = DataCleaner::remove_duplicates(&self.sessions[idx].table)
                    .map_err(|e| e.to_string());
                self.apply_table_change(idx, result, "Duplicated rows removed.");
            }
            FilePanelAction::FillMissing => {
                let result = DataCleaner::fill_missing_numeric(&self.sessions[idx].table)
                    .map_err(|e| e.to_string());
                self.apply_table_change(idx, result, "Missing values have been filled.");
            }
            FilePanelAction::ApplySelection => {
                let names = self.sessions[idx].selected_column_names();
                let result = select_columns(&self.sessions[idx].table, &names)
                    .map_err(|e| e.to_string());
                let message = format!("Keeping {} columns.", names.len());
                self.apply_table_change(idx, result, &message);
            }
            FilePanelAction::Convert => self.handle_convert(idx),
            FilePanelAction::Compare(other_idx) => self.handle_compare(idx, other_idx),
        }
    }

    /// Swap a mutated table into the session, or surface the error in
    /// the session's status line.
    fn apply_table_change(&mut self, idx: usize, result: Result<DataFrame, String>, success: &str) {
        let session = &mut self.sessions[idx];
        match result {
            Ok(table) => match session.set_table(table) {
                Ok(()) => {
                    info!(file = %session.file.name, "{success}");
                    session.status = success.to_string();
                }
                Err(err) => session.status = format!("Error: {err}"),
            },
            Err(err) => {
                warn!(file = %session.file.name, error = %err, "operation failed");
                session.status = format!("Error: {err}");
            }
        }
    }

    /// Serialize the current table and offer it for download via a save
    /// dialog. The exported file is opened with the system default app.
    fn handle_convert(&mut self, idx: usize) {
        let session = &mut self.sessions[idx];
        let output = match Converter::convert(&session.table, &session.file, session.output_format)
        {
            Ok(output) => output,
            Err(err) => {
                warn!(file = %session.file.name, error = %err, "conversion failed");
                session.status = format!("Error: {err}");
                return;
            }
        };

        info!(
            file = %session.file.name,
            target = %output.file_name,
            mime = output.mime_type,
            bytes = output.bytes.len(),
            "table converted"
        );

        let Some(path) = rfd::FileDialog::new()
            .set_file_name(&output.file_name)
            .save_file()
        else {
            return; // User cancelled
        };

        match fs::write(&path, &output.bytes) {
            Ok(()) => {
                session.status = format!("Saved {}.", path.display());
                let _ = open::that(&path);
            }
            Err(err) => session.status = format!("Error: {err}"),
        }
    }

    fn handle_compare(&mut self, idx: usize, other_idx: usize) {
        if other_idx == idx || other_idx >= self.sessions.len() {
            return;
        }
        let diff = compare(&self.sessions[idx].table, &self.sessions[other_idx].table);
        let left = self.sessions[idx].file.name.clone();
        let right = self.sessions[other_idx].file.name.clone();
        info!(left = %left, right = %right, ?diff, "files compared");
        self.sessions[idx].status = match diff {
            TableDiff::Equal => format!("The files {left} and {right} are identical."),
            TableDiff::Different => format!("The files {left} and {right} are different."),
        };
    }
}

impl eframe::App for TableMorphApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - file list and upload
        SidePanel::left("upload_panel")
            .min_width(240.0)
            .max_width(300.0)
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.add_space(5.0);
                    ui.label(
                        RichText::new("📊 TableMorph")
                            .size(22.0)
                            .color(Color32::from_rgb(100, 149, 237)),
                    );
                    ui.label(
                        RichText::new("Clean, convert and compare tabular files")
                            .size(11.0)
                            .color(Color32::GRAY),
                    );
                });
                ui.add_space(10.0);
                ui.separator();
                ui.add_space(5.0);

                ui.vertical_centered(|ui| {
                    let button = egui::Button::new(RichText::new("📤 Open Files…").size(14.0))
                        .min_size(egui::vec2(180.0, 30.0));
                    if ui.add(button).clicked() {
                        self.handle_open_files();
                    }
                });
                ui.add_space(10.0);

                ui.label(RichText::new("📁 Loaded Files").size(14.0).strong());
                ui.add_space(5.0);
                if self.sessions.is_empty() {
                    ui.label(RichText::new("No files loaded").size(11.0).color(Color32::GRAY));
                }
                for session in &self.sessions {
                    ui.label(RichText::new(&session.file.name).size(12.0));
                }

                if !self.load_errors.is_empty() {
                    ui.add_space(10.0);
                    ui.separator();
                    ui.label(RichText::new("Errors").size(12.0).strong());
                    for error in &self.load_errors {
                        ui.label(
                            RichText::new(error)
                                .size(11.0)
                                .color(Color32::from_rgb(220, 53, 69)),
                        );
                    }
                }
            });

        // Central panel - one section per loaded file
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.sessions.is_empty() {
                ui.centered_and_justified(|ui| {
                    ui.label(
                        RichText::new("Open CSV or Excel files to get started")
                            .size(16.0)
                            .color(Color32::GRAY),
                    );
                });
                return;
            }

            let names: Vec<(usize, String)> = self
                .sessions
                .iter()
                .enumerate()
                .map(|(i, s)| (i, s.file.name.clone()))
                .collect();

            let mut pending: Option<(usize, FilePanelAction)> = None;
            ScrollArea::vertical().show(ui, |ui| {
                for idx in 0..self.sessions.len() {
                    let others: Vec<(usize, String)> = names
                        .iter()
                        .filter(|(other_idx, _)| *other_idx != idx)
                        .cloned()
                        .collect();

                    egui::Frame::none()
                        .fill(ui.visuals().widgets.noninteractive.bg_fill)
                        .rounding(5.0)
                        .inner_margin(10.0)
                        .show(ui, |ui| {
                            let action =
                                FilePanel::show(ui, &mut self.sessions[idx], &others);
                            if action != FilePanelAction::None {
                                pending = Some((idx, action));
                            }
                        });
                    ui.add_space(10.0);
                }
            });

            if let Some((idx, action)) = pending {
                self.handle_action(idx, action);
            }
        });
    }
}
