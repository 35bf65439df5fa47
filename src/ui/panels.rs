use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::chart::ChartKind;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – chart and neighborhood selectors
// ---------------------------------------------------------------------------

/// Render the left selector panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Charts");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for kind in ChartKind::ALL {
                let failed = state
                    .failures
                    .iter()
                    .any(|(table, _)| *table == kind.source_table());
                let mut text = RichText::new(kind.label());
                if failed {
                    text = text.color(Color32::RED);
                }
                if ui.selectable_label(state.chart == kind, text).clicked() {
                    state.select_chart(kind);
                }
            }

            if state.chart.needs_neighborhood() {
                ui.separator();
                ui.strong("Neighborhood");
                let current = state.neighborhood.clone().unwrap_or_default();
                let mut picked = None;
                egui::ComboBox::from_id_salt("neighborhood")
                    .selected_text(&current)
                    .width(ui.available_width())
                    .show_ui(ui, |ui: &mut Ui| {
                        for name in &state.neighborhoods {
                            if ui.selectable_label(current == *name, name.as_str()).clicked() {
                                picked = Some(name.clone());
                            }
                        }
                    });
                if let Some(name) = picked {
                    state.select_neighborhood(&name);
                }
            }

            if !state.failures.is_empty() {
                ui.separator();
                ui.strong("Failed tables");
                for (table, err) in &state.failures {
                    ui.label(RichText::new(format!("{table}: {err}")).color(Color32::RED));
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open market table…").clicked() {
                open_market_dialog(state);
                ui.close_menu();
            }
            if ui.button("Open coordinates…").clicked() {
                open_geo_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(engine) = &state.engine {
            ui.label(format!(
                "{} market rows, {} neighborhoods, {} coordinates",
                engine.market().len(),
                state.neighborhoods.len(),
                engine.geo().len()
            ));
            ui.separator();
        }

        if ui.selectable_label(state.show_table, "Table").clicked() {
            state.show_table = !state.show_table;
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_market_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open housing market table")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.status_message = None;
        let result = state.load_market(&path);
        state.report(result);
    }
}

pub fn open_geo_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open neighborhood coordinates")
        .add_filter("Supported files", &["csv", "json"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        state.status_message = None;
        let result = state.load_geo(&path);
        state.report(result);
    }
}
