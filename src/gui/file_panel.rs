//! File Panel Widget
//! Per-file sections: metadata, preview, quality suggestions, cleaning,
//! column selection, visualization, conversion and comparison.

use egui::{CollapsingHeader, Color32, ComboBox, Grid, RichText, ScrollArea};

use crate::charts::{ChartError, ChartPlotter};
use crate::convert::OutputFormat;
use crate::data::FileSession;

const WARN_COLOR: Color32 = Color32::from_rgb(255, 152, 0);
const OK_COLOR: Color32 = Color32::from_rgb(40, 167, 69);
const ERROR_COLOR: Color32 = Color32::from_rgb(220, 53, 69);

/// Actions triggered by a file panel, handled by the app.
#[derive(Debug, Clone, PartialEq)]
pub enum FilePanelAction {
    None,
    RemoveDuplicates,
    FillMissing,
    ApplySelection,
    Convert,
    Compare(usize),
}

/// Draws all sections for one file session.
pub struct FilePanel;

impl FilePanel {
    /// Draw one session's panel. `others` lists the (session index,
    /// file name) pairs offered as comparison targets.
    pub fn show(
        ui: &mut egui::Ui,
        session: &mut FileSession,
        others: &[(usize, String)],
    ) -> FilePanelAction {
        let mut action = FilePanelAction::None;
        let panel_id = session.file.name.clone();

        // ===== Metadata =====
        ui.label(
            RichText::new(format!("📄 {}", session.file.name))
                .size(17.0)
                .strong(),
        );
        ui.label(
            RichText::new(format!(
                "{:.2} KB  ·  uploaded {}  ·  {}",
                session.file.size_kb(),
                session.file.uploaded_at.format("%Y-%m-%d %H:%M:%S"),
                session.file.extension().trim_start_matches('.').to_uppercase()
            ))
            .size(11.0)
            .color(Color32::GRAY),
        );
        ui.add_space(5.0);

        // ===== Preview =====
        CollapsingHeader::new(RichText::new("🔍 Preview").strong())
            .id_salt(format!("preview_{panel_id}"))
            .default_open(true)
            .show(ui, |ui| {
                ui.label(
                    RichText::new(format!(
                        "{} rows × {} columns",
                        session.table.height(),
                        session.table.width()
                    ))
                    .size(11.0)
                    .color(Color32::GRAY),
                );
                let (headers, rows) = session.preview(5);
                ScrollArea::horizontal()
                    .id_salt(format!("preview_scroll_{panel_id}"))
                    .show(ui, |ui| {
                        Grid::new(format!("preview_grid_{panel_id}"))
                            .striped(true)
                            .min_col_width(60.0)
                            .show(ui, |ui| {
                                for header in &headers {
                                    ui.label(RichText::new(header).strong().size(11.0));
                                }
                                ui.end_row();
                                for row in &rows {
                                    for cell in row {
                                        ui.label(RichText::new(cell).size(11.0));
                                    }
                                    ui.end_row();
                                }
                            });
                    });
            });

        // ===== Quality Suggestions =====
        CollapsingHeader::new(RichText::new("⚠ Data Quality Suggestions").strong())
            .id_salt(format!("quality_{panel_id}"))
            .default_open(true)
            .show(ui, |ui| {
                if session.quality.has_nulls {
                    ui.label(
                        RichText::new("This file contains missing values!").color(WARN_COLOR),
                    );
                }
                if session.quality.has_duplicates {
                    ui.label(
                        RichText::new("This file contains duplicate rows!").color(WARN_COLOR),
                    );
                }
                if session.quality.is_clean() {
                    ui.label(RichText::new("No issues detected.").color(OK_COLOR));
                } else {
                    ui.label(RichText::new("Suggested actions:").size(11.0));
                    ui.label(RichText::new("  - Remove duplicates.").size(11.0));
                    ui.label(RichText::new("  - Fill missing values.").size(11.0));
                }
            });

        // ===== Cleaning =====
        CollapsingHeader::new(RichText::new("🧹 Data Cleaning").strong())
            .id_salt(format!("cleaning_{panel_id}"))
            .default_open(true)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    if ui.button("Remove Duplicates").clicked() {
                        action = FilePanelAction::RemoveDuplicates;
                    }
                    if ui.button("Fill Missing Values").clicked() {
                        action = FilePanelAction::FillMissing;
                    }
                });
            });

        // ===== Column Selection =====
        CollapsingHeader::new(RichText::new("🔧 Select Columns").strong())
            .id_salt(format!("columns_{panel_id}"))
            .default_open(false)
            .show(ui, |ui| {
                let names = session.column_names();
                ScrollArea::vertical()
                    .id_salt(format!("columns_scroll_{panel_id}"))
                    .max_height(120.0)
                    .show(ui, |ui| {
                        for (i, name) in names.iter().enumerate() {
                            if i < session.selected_columns.len() {
                                ui.checkbox(&mut session.selected_columns[i], name);
                            }
                        }
                    });
                ui.horizontal(|ui| {
                    if ui.small_button("Select All").clicked() {
                        session.selected_columns.iter_mut().for_each(|v| *v = true);
                    }
                    if ui.small_button("Clear All").clicked() {
                        session.selected_columns.iter_mut().for_each(|v| *v = false);
                    }
                    if ui.button("Apply Selection").clicked() {
                        action = FilePanelAction::ApplySelection;
                    }
                });
            });

        // ===== Visualization =====
        CollapsingHeader::new(RichText::new("📈 Data Visualization").strong())
            .id_salt(format!("chart_{panel_id}"))
            .default_open(false)
            .show(ui, |ui| {
                ui.checkbox(&mut session.show_chart, "Show Bar Chart");
                if session.show_chart {
                    match ChartPlotter::bar_chart_series(&session.table) {
                        Ok(series) => {
                            ChartPlotter::draw_bar_chart(
                                ui,
                                &format!("bar_{panel_id}"),
                                &series,
                            );
                        }
                        Err(ChartError::NoNumericData) => {
                            ui.label(
                                RichText::new("No numeric columns available for visualization.")
                                    .color(WARN_COLOR),
                            );
                        }
                        Err(err) => {
                            ui.label(
                                RichText::new(format!("Chart error: {err}")).color(ERROR_COLOR),
                            );
                        }
                    }
                }
            });

        // ===== Conversion =====
        CollapsingHeader::new(RichText::new("🔄 Convert to Another Format").strong())
            .id_salt(format!("convert_{panel_id}"))
            .default_open(true)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.radio_value(&mut session.output_format, OutputFormat::Csv, "CSV");
                    ui.radio_value(&mut session.output_format, OutputFormat::Excel, "Excel");
                    if ui
                        .button(format!("🚀 Convert to {}", session.output_format.label()))
                        .clicked()
                    {
                        action = FilePanelAction::Convert;
                    }
                });
            });

        // ===== Comparison =====
        if !others.is_empty() {
            CollapsingHeader::new(RichText::new("🔍 File Comparison").strong())
                .id_salt(format!("compare_{panel_id}"))
                .default_open(false)
                .show(ui, |ui| {
                    let selected_label = session
                        .compare_with
                        .and_then(|idx| {
                            others
                                .iter()
                                .find(|(other_idx, _)| *other_idx == idx)
                                .map(|(_, name)| name.clone())
                        })
                        .unwrap_or_else(|| "Select another file".to_string());

                    ui.horizontal(|ui| {
                        ComboBox::from_id_salt(format!("compare_combo_{panel_id}"))
                            .width(200.0)
                            .selected_text(selected_label)
                            .show_ui(ui, |ui| {
                                for (other_idx, name) in others {
                                    if ui
                                        .selectable_label(
                                            session.compare_with == Some(*other_idx),
                                            name,
                                        )
                                        .clicked()
                                    {
                                        session.compare_with = Some(*other_idx);
                                    }
                                }
                            });
                        if let Some(other_idx) = session.compare_with {
                            if ui.button("Compare").clicked() {
                                action = FilePanelAction::Compare(other_idx);
                            }
                        }
                    });
                });
        }

        // ===== Status =====
        if !session.status.is_empty() {
            let color = if session.status.contains("Error") {
                ERROR_COLOR
            } else if session.status.contains("different") {
                WARN_COLOR
            } else {
                OK_COLOR
            };
            ui.add_space(3.0);
            ui.label(RichText::new(&session.status).size(11.0).color(color));
        }

        action
    }
}
