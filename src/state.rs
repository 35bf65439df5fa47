use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::chart::{self, ChartError, ChartKind, ChartSpec};
use crate::config::AppConfig;
use crate::data::filter::neighborhood_list;
use crate::data::loader::{load_geo_file, load_market_file};
use crate::data::model::{GeoRecord, MarketRecord, TableName};
use crate::data::{AggregationEngine, EngineError};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// Only the user's choices live here; all domain data is owned by the
/// engine and only read.
pub struct AppState {
    pub config: AppConfig,

    /// Derived-table engine (None until both tables are loaded).
    pub engine: Option<AggregationEngine>,

    /// Raw tables loaded so far; the engine is rebuilt when both are present.
    pub market: Option<(PathBuf, Vec<MarketRecord>)>,
    pub geo: Option<(PathBuf, Vec<GeoRecord>)>,

    /// Tables that failed to derive at load time.
    pub failures: Vec<(TableName, EngineError)>,

    /// Selected chart.
    pub chart: ChartKind,

    /// Neighborhoods offered by the selector (first-seen order).
    pub neighborhoods: Vec<String>,

    /// Selected neighborhood for per-neighborhood charts.
    pub neighborhood: Option<String>,

    /// Show the chart's source table instead of the chart.
    pub show_table: bool,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            engine: None,
            market: None,
            geo: None,
            failures: Vec::new(),
            chart: ChartKind::ALL[0],
            neighborhoods: Vec::new(),
            neighborhood: None,
            show_table: false,
            status_message: None,
        }
    }

    /// Load the configured input files if they exist.
    pub fn load_configured_inputs(&mut self) {
        if !self.config.inputs_present() {
            log::info!(
                "No dataset at {} / {}; waiting for File → Open",
                self.config.market_path.display(),
                self.config.coords_path.display()
            );
            return;
        }
        let market = self.config.market_path.clone();
        let coords = self.config.coords_path.clone();
        let result = self.load_market(&market);
        self.report(result);
        let result = self.load_geo(&coords);
        self.report(result);
    }

    /// Record a load result in the status line.
    pub fn report(&mut self, result: Result<()>) {
        if let Err(e) = result {
            log::error!("Failed to load file: {e:#}");
            self.status_message = Some(format!("Error: {e:#}"));
        }
    }

    pub fn load_market(&mut self, path: &Path) -> Result<()> {
        let records = load_market_file(path)
            .with_context(|| format!("loading market table {}", path.display()))?;
        self.market = Some((path.to_path_buf(), records));
        let result = self.rebuild_engine();
        if result.is_err() {
            self.market = None;
        }
        result
    }

    pub fn load_geo(&mut self, path: &Path) -> Result<()> {
        let records = load_geo_file(path)
            .with_context(|| format!("loading coordinates {}", path.display()))?;
        self.geo = Some((path.to_path_buf(), records));
        let result = self.rebuild_engine();
        if result.is_err() {
            self.geo = None;
        }
        result
    }

    /// Build a fresh engine from both raw tables and derive everything once.
    ///
    /// Everything derived from the previous engine is dropped first. A table
    /// that fails validation is discarded by the caller.
    fn rebuild_engine(&mut self) -> Result<()> {
        self.engine = None;
        self.failures.clear();
        self.neighborhoods.clear();
        self.neighborhood = None;

        let (Some((_, market)), Some((_, geo))) = (&self.market, &self.geo) else {
            return Ok(());
        };

        let engine =
            AggregationEngine::with_top_n(market.clone(), geo.clone(), self.config.top_n)
                .context("validating input tables")?;
        self.set_engine(engine);
        Ok(())
    }

    /// Install an engine, warm its tables and reset the selections.
    pub fn set_engine(&mut self, engine: AggregationEngine) {
        self.failures = engine.warm();
        self.neighborhoods = engine
            .neighborhood_year_means()
            .map(neighborhood_list)
            .unwrap_or_default();
        self.neighborhood = self.neighborhoods.first().cloned();
        self.status_message = match self.failures.len() {
            0 => None,
            n => Some(format!("{n} derived table(s) failed; see the affected charts")),
        };
        self.engine = Some(engine);
    }

    /// Select a chart; the neighborhood choice is kept.
    pub fn select_chart(&mut self, chart: ChartKind) {
        self.chart = chart;
    }

    /// Select a neighborhood; only names offered by the selector are accepted.
    pub fn select_neighborhood(&mut self, neighborhood: &str) {
        if self.neighborhoods.iter().any(|n| n == neighborhood) {
            self.neighborhood = Some(neighborhood.to_string());
        }
    }

    /// Build the currently selected chart, if data is loaded.
    pub fn current_chart(&self) -> Option<Result<ChartSpec, ChartError>> {
        let engine = self.engine.as_ref()?;
        Some(chart::build_chart(
            engine,
            self.chart,
            self.neighborhood.as_deref(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(year: i32, n: &str) -> MarketRecord {
        MarketRecord {
            year,
            neighborhood: n.to_string(),
            sale_price_sqr_foot: 100.0,
            housing_units: 372_000,
            gross_rent: 1000.0,
        }
    }

    fn loaded_state() -> AppState {
        let mut state = AppState::new(AppConfig::default());
        let engine =
            AggregationEngine::new(vec![rec(2010, "North"), rec(2010, "East"), rec(2011, "North")], vec![])
                .unwrap();
        state.set_engine(engine);
        state
    }

    #[test]
    fn nothing_to_draw_before_loading() {
        let state = AppState::new(AppConfig::default());
        assert!(state.current_chart().is_none());
    }

    #[test]
    fn neighborhood_selector_defaults_to_first_seen() {
        let state = loaded_state();
        assert_eq!(state.neighborhoods, vec!["East", "North"]);
        assert_eq!(state.neighborhood.as_deref(), Some("East"));
        assert!(state.failures.is_empty());
    }

    #[test]
    fn unknown_neighborhood_selection_is_ignored() {
        let mut state = loaded_state();
        state.select_neighborhood("Nowhere");
        assert_eq!(state.neighborhood.as_deref(), Some("East"));
        state.select_neighborhood("North");
        assert_eq!(state.neighborhood.as_deref(), Some("North"));
    }

    #[test]
    fn selected_chart_is_built() {
        let mut state = loaded_state();
        state.select_chart(ChartKind::AverageRentByNeighborhood);
        let spec = state.current_chart().unwrap().unwrap();
        assert_eq!(spec.title, "Average Rent in East");
    }

    #[test]
    fn loads_only_after_both_tables() {
        let dir = tempfile::tempdir().unwrap();
        let market = dir.path().join("market.csv");
        let coords = dir.path().join("coords.csv");
        std::fs::write(
            &market,
            "year,neighborhood,sale_price_sqr_foot,housing_units,gross_rent\n2010,North,1.0,1,2.0\n",
        )
        .unwrap();
        std::fs::write(&coords, "Neighborhood,Lat,Lon\nNorth,37.8,-122.4\n").unwrap();

        let mut state = AppState::new(AppConfig::default());
        state.load_market(&market).unwrap();
        assert!(state.engine.is_none());
        state.load_geo(&coords).unwrap();
        assert!(state.engine.is_some());
        assert_eq!(state.neighborhoods, vec!["North"]);
    }

    #[test]
    fn invalid_reload_clears_previous_engine_state() {
        let dir = tempfile::tempdir().unwrap();
        let market = dir.path().join("market.csv");
        let coords = dir.path().join("coords.csv");
        let duplicate = dir.path().join("duplicate.csv");
        std::fs::write(
            &market,
            "year,neighborhood,sale_price_sqr_foot,housing_units,gross_rent
2010,A,1.0,1,2.0
",
        )
        .unwrap();
        std::fs::write(&coords, "Neighborhood,Lat,Lon
B,37.8,-122.4
").unwrap();
        std::fs::write(&duplicate, "Neighborhood,Lat,Lon
A,37.8,-122.4
A,37.7,-122.5
").unwrap();

        let mut state = AppState::new(AppConfig::default());
        state.load_market(&market).unwrap();
        state.load_geo(&coords).unwrap();
        assert_eq!(state.neighborhood.as_deref(), Some("A"));

        let result = state.load_geo(&duplicate);
        assert!(result.is_err());
        state.report(result);

        assert!(state.engine.is_none());
        assert!(state.failures.is_empty());
        assert!(state.neighborhoods.is_empty());
        assert!(state.neighborhood.is_none());
        assert!(state.geo.is_none());
        assert!(state.market.is_some());
        assert!(state.status_message.is_some());
        assert!(state.current_chart().is_none());
    }
}
