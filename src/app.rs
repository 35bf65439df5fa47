use eframe::egui;

use crate::config::AppConfig;
use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct HousingLensApp {
    pub state: AppState,
}

impl HousingLensApp {
    /// Create the app and load the configured dataset, if present.
    pub fn new(config: AppConfig) -> Self {
        let mut state = AppState::new(config);
        state.load_configured_inputs();
        Self { state }
    }
}

impl eframe::App for HousingLensApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: chart selector ----
        egui::SidePanel::left("chart_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: chart or table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.show_table {
                table::table_view(ui, &self.state);
            } else {
                plot::chart_view(ui, &self.state);
            }
        });
    }
}
