//! Presentation adapters.
//!
//! Each adapter turns one derived table into a [`ChartSpec`]: a plain
//! description of what to draw (series, colours, titles, axis labels). The
//! egui renderer in `ui::plot` is the only code that knows about widgets, so
//! everything here is testable without a window.

use std::fmt;

use eframe::egui::Color32;
use thiserror::Error;

use crate::color::{
    self, ColorScale, DARK_SLATE_GRAY, INDIGO, LIGHT_SLATE_GRAY, MIDNIGHT_BLUE,
    NEIGHBORHOOD_LINE, OLIVE_DRAB,
};
use crate::data::filter::neighborhood_subset;
use crate::data::model::{
    ExpensiveNeighborhoodProfile, GeoRentJoin, Metric, NeighborhoodYearMeans, TableName,
    TopNByPrice, YearlyAverage,
};
use crate::data::{AggregationEngine, EngineError};

/// Fixed y-window of the housing-units bar chart.
pub const HOUSING_UNITS_Y_RANGE: (f64, f64) = (370_000.0, 385_000.0);

/// Largest marker diameter on the rent map.
pub const MAP_MAX_MARKER: f32 = 15.0;

// ---------------------------------------------------------------------------
// Chart catalogue
// ---------------------------------------------------------------------------

/// Every chart the selector offers, in menu order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    HousingUnitsPerYear,
    AverageGrossRent,
    AverageSalesPrice,
    AveragePriceByNeighborhood,
    AverageRentByNeighborhood,
    TopExpensiveNeighborhoods,
    RentVsPrice,
    RentMap,
    ParallelCategories,
    ParallelCoordinates,
}

impl ChartKind {
    pub const ALL: [ChartKind; 10] = [
        ChartKind::HousingUnitsPerYear,
        ChartKind::AverageGrossRent,
        ChartKind::AverageSalesPrice,
        ChartKind::AveragePriceByNeighborhood,
        ChartKind::AverageRentByNeighborhood,
        ChartKind::TopExpensiveNeighborhoods,
        ChartKind::RentVsPrice,
        ChartKind::RentMap,
        ChartKind::ParallelCategories,
        ChartKind::ParallelCoordinates,
    ];

    /// Label shown in the chart selector.
    pub fn label(self) -> &'static str {
        match self {
            ChartKind::HousingUnitsPerYear => "Housing Units Per Year",
            ChartKind::AverageGrossRent => "Average Gross Rent",
            ChartKind::AverageSalesPrice => "Average Sales Price",
            ChartKind::AveragePriceByNeighborhood => "Average Price by Neighborhood",
            ChartKind::AverageRentByNeighborhood => "Average Rent by Neighborhood",
            ChartKind::TopExpensiveNeighborhoods => "Top 10 Most Expensive Neighborhoods",
            ChartKind::RentVsPrice => "Comparison of Rent and Sales Prices",
            ChartKind::RentMap => "Rent Map",
            ChartKind::ParallelCategories => "Parallel Categories Plot",
            ChartKind::ParallelCoordinates => "Parallel Coordinates Plot",
        }
    }

    /// Whether the chart is drawn for one selected neighborhood.
    pub fn needs_neighborhood(self) -> bool {
        matches!(
            self,
            ChartKind::AveragePriceByNeighborhood
                | ChartKind::AverageRentByNeighborhood
                | ChartKind::RentVsPrice
        )
    }

    /// The derived table the chart reads.
    pub fn source_table(self) -> TableName {
        match self {
            ChartKind::HousingUnitsPerYear => TableName::YearlyAverage(Metric::HousingUnits),
            ChartKind::AverageGrossRent => TableName::YearlyAverage(Metric::GrossRent),
            ChartKind::AverageSalesPrice => TableName::YearlyAverage(Metric::SalePriceSqrFoot),
            ChartKind::AveragePriceByNeighborhood
            | ChartKind::AverageRentByNeighborhood
            | ChartKind::RentVsPrice => TableName::NeighborhoodYearMeans,
            ChartKind::TopExpensiveNeighborhoods => TableName::TopNByPrice,
            ChartKind::RentMap => TableName::GeoRentJoin,
            ChartKind::ParallelCategories | ChartKind::ParallelCoordinates => {
                TableName::ExpensiveNeighborhoodProfile
            }
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChartError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("'{0}' needs a selected neighborhood")]
    NoNeighborhood(ChartKind),
}

// ---------------------------------------------------------------------------
// Chart description
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub body: ChartBody,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartBody {
    Bars(BarChartSpec),
    Lines(Vec<LineSeries>),
    Scatter(ScatterSpec),
    Parallel(ParallelSpec),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarChartSpec {
    pub series: Vec<BarSeries>,
    /// Fixed y-window, if any.
    pub y_range: Option<(f64, f64)>,
    /// Print each bar's value (truncated to an integer) above it.
    pub value_labels: bool,
    /// Tick labels for categorical x axes, indexed by bar position.
    pub categories: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    pub name: String,
    pub color: Color32,
    pub width: f64,
    pub bars: Vec<BarPoint>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarPoint {
    pub x: f64,
    pub value: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineSeries {
    pub name: String,
    pub color: Color32,
    pub points: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterSpec {
    pub points: Vec<ScatterPoint>,
    /// `None` when there is nothing to colour.
    pub legend: Option<ColorLegend>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub radius: f32,
    pub color: Color32,
}

/// Which continuous scale colours the chart, and over what value range.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorLegend {
    pub metric: Metric,
    pub scale: &'static str,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParallelSpec {
    pub axes: Vec<ParallelAxis>,
    pub lines: Vec<ParallelLine>,
    pub legend: Option<ColorLegend>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParallelAxis {
    pub label: String,
    pub kind: AxisKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AxisKind {
    Numeric { min: f64, max: f64 },
    /// Values on this axis are indices into the category list.
    Categorical(Vec<String>),
}

impl ParallelAxis {
    /// Position of `value` along the axis, in `[0, 1]`.
    pub fn position(&self, value: f64) -> f64 {
        match &self.kind {
            AxisKind::Numeric { min, max } => color::normalize(value, *min, *max),
            AxisKind::Categorical(cats) if cats.len() > 1 => value / (cats.len() - 1) as f64,
            AxisKind::Categorical(_) => 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParallelLine {
    pub label: String,
    pub values: Vec<f64>,
    pub color: Color32,
}

// ---------------------------------------------------------------------------
// Yearly charts
// ---------------------------------------------------------------------------

fn year_span(table: &YearlyAverage) -> String {
    match (table.rows.first(), table.rows.last()) {
        (Some(first), Some(last)) if first.year != last.year => {
            format!("from {} to {}", first.year, last.year)
        }
        (Some(only), _) => format!("in {}", only.year),
        _ => String::new(),
    }
}

fn yearly_line(table: &YearlyAverage, title: &str, y_label: &str, color: Color32) -> ChartSpec {
    ChartSpec {
        title: format!("{title} {}", year_span(table)),
        x_label: "Year".to_string(),
        y_label: y_label.to_string(),
        body: ChartBody::Lines(vec![LineSeries {
            name: table.metric.label().to_string(),
            color,
            points: table
                .rows
                .iter()
                .map(|r| [r.year as f64, r.value])
                .collect(),
        }]),
    }
}

pub fn housing_units_per_year(table: &YearlyAverage) -> ChartSpec {
    ChartSpec {
        title: format!("Housing Units {}", year_span(table)),
        x_label: "Year".to_string(),
        y_label: "Housing Units".to_string(),
        body: ChartBody::Bars(BarChartSpec {
            series: vec![BarSeries {
                name: Metric::HousingUnits.label().to_string(),
                color: OLIVE_DRAB,
                width: 0.8,
                bars: table
                    .rows
                    .iter()
                    .map(|r| BarPoint {
                        x: r.year as f64,
                        value: r.value,
                        label: r.year.to_string(),
                    })
                    .collect(),
            }],
            y_range: Some(HOUSING_UNITS_Y_RANGE),
            value_labels: true,
            categories: None,
        }),
    }
}

pub fn average_gross_rent(table: &YearlyAverage) -> ChartSpec {
    yearly_line(table, "Average Gross Rent", "Rent (USD)", MIDNIGHT_BLUE)
}

pub fn average_sales_price(table: &YearlyAverage) -> ChartSpec {
    yearly_line(table, "Average Price per SqFt", "Price (USD)", INDIGO)
}

// ---------------------------------------------------------------------------
// Per-neighborhood charts
// ---------------------------------------------------------------------------

fn neighborhood_line(
    means: &NeighborhoodYearMeans,
    neighborhood: &str,
    metric: Metric,
    title: String,
    y_label: &str,
) -> Result<ChartSpec, EngineError> {
    let rows = neighborhood_subset(means, neighborhood)?;
    Ok(ChartSpec {
        title,
        x_label: "Year".to_string(),
        y_label: y_label.to_string(),
        body: ChartBody::Lines(vec![LineSeries {
            name: neighborhood.to_string(),
            color: NEIGHBORHOOD_LINE,
            points: rows
                .iter()
                .map(|r| [r.year as f64, r.metric(metric)])
                .collect(),
        }]),
    })
}

pub fn average_price_by_neighborhood(
    means: &NeighborhoodYearMeans,
    neighborhood: &str,
) -> Result<ChartSpec, EngineError> {
    neighborhood_line(
        means,
        neighborhood,
        Metric::SalePriceSqrFoot,
        format!("Average Price Per Sq Ft in {neighborhood}"),
        "Price per Sq Ft",
    )
}

pub fn average_rent_by_neighborhood(
    means: &NeighborhoodYearMeans,
    neighborhood: &str,
) -> Result<ChartSpec, EngineError> {
    neighborhood_line(
        means,
        neighborhood,
        Metric::GrossRent,
        format!("Average Rent in {neighborhood}"),
        "Rent (USD)",
    )
}

/// Rent and price side by side for each year of one neighborhood.
pub fn rent_vs_price(
    means: &NeighborhoodYearMeans,
    neighborhood: &str,
) -> Result<ChartSpec, EngineError> {
    let rows = neighborhood_subset(means, neighborhood)?;
    let series = |metric: Metric, name: &str, color: Color32, offset: f64| BarSeries {
        name: name.to_string(),
        color,
        width: 0.4,
        bars: rows
            .iter()
            .map(|r| BarPoint {
                x: r.year as f64 + offset,
                value: r.metric(metric),
                label: r.year.to_string(),
            })
            .collect(),
    };

    Ok(ChartSpec {
        title: format!("Rent vs. Price per Sq Ft in {neighborhood}"),
        x_label: "Year".to_string(),
        y_label: "Value".to_string(),
        body: ChartBody::Bars(BarChartSpec {
            series: vec![
                series(Metric::GrossRent, "Gross Rent", DARK_SLATE_GRAY, -0.2),
                series(Metric::SalePriceSqrFoot, "Price per Sq Ft", LIGHT_SLATE_GRAY, 0.2),
            ],
            y_range: None,
            value_labels: false,
            categories: None,
        }),
    })
}

// ---------------------------------------------------------------------------
// Ranking, map, profile
// ---------------------------------------------------------------------------

pub fn top_expensive_neighborhoods(top: &TopNByPrice) -> ChartSpec {
    ChartSpec {
        title: format!(
            "Top {} Most Expensive Neighborhoods (On Average)",
            top.rows.len()
        ),
        x_label: "Neighborhoods".to_string(),
        y_label: "Average Sale Price per Square Foot".to_string(),
        body: ChartBody::Bars(BarChartSpec {
            series: vec![BarSeries {
                name: Metric::SalePriceSqrFoot.label().to_string(),
                color: OLIVE_DRAB,
                width: 0.8,
                bars: top
                    .rows
                    .iter()
                    .enumerate()
                    .map(|(i, r)| BarPoint {
                        x: i as f64,
                        value: r.sale_price_sqr_foot,
                        label: r.neighborhood.clone(),
                    })
                    .collect(),
            }],
            y_range: None,
            value_labels: false,
            categories: Some(top.rows.iter().map(|r| r.neighborhood.clone()).collect()),
        }),
    }
}

/// Smallest and largest value, or `None` for no values.
fn min_max(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    values.into_iter().fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// Coordinates coloured and sized by mean gross rent.
pub fn rent_map(join: &GeoRentJoin) -> ChartSpec {
    let scale = ColorScale::ice_fire();
    let range = min_max(join.rows.iter().map(|r| r.gross_rent));
    let (min, max) = range.unwrap_or_default();

    let points = join
        .rows
        .iter()
        .map(|r| {
            // Marker area is proportional to rent.
            let diameter = if max > 0.0 {
                MAP_MAX_MARKER * (r.gross_rent.max(0.0) / max).sqrt() as f32
            } else {
                MAP_MAX_MARKER
            };
            ScatterPoint {
                label: r.neighborhood.clone(),
                x: r.longitude,
                y: r.latitude,
                radius: (diameter / 2.0).max(1.0),
                color: scale.color_for(r.gross_rent, min, max),
            }
        })
        .collect();

    ChartSpec {
        title: "Average Gross Rent by Location".to_string(),
        x_label: "Longitude".to_string(),
        y_label: "Latitude".to_string(),
        body: ChartBody::Scatter(ScatterSpec {
            points,
            legend: range.map(|(min, max)| ColorLegend {
                metric: Metric::GrossRent,
                scale: scale.name,
                min,
                max,
            }),
        }),
    }
}

fn profile_chart(
    profile: &ExpensiveNeighborhoodProfile,
    title: &str,
    with_category_axis: bool,
) -> ChartSpec {
    let scale = ColorScale::inferno();
    let price_range = min_max(profile.rows.iter().map(|r| r.sale_price_sqr_foot));
    let (price_min, price_max) = price_range.unwrap_or_default();

    let mut axes = Vec::new();
    if with_category_axis {
        axes.push(ParallelAxis {
            label: "Neighborhood".to_string(),
            kind: AxisKind::Categorical(
                profile.rows.iter().map(|r| r.neighborhood.clone()).collect(),
            ),
        });
    }
    for metric in Metric::ALL {
        let (min, max) = min_max(profile.rows.iter().map(|r| r.metric(metric))).unwrap_or_default();
        axes.push(ParallelAxis {
            label: metric.label().to_string(),
            kind: AxisKind::Numeric { min, max },
        });
    }

    let lines = profile
        .rows
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let mut values = Vec::with_capacity(axes.len());
            if with_category_axis {
                values.push(i as f64);
            }
            values.extend(Metric::ALL.iter().map(|&m| r.metric(m)));
            ParallelLine {
                label: r.neighborhood.clone(),
                values,
                color: scale.color_for(r.sale_price_sqr_foot, price_min, price_max),
            }
        })
        .collect();

    ChartSpec {
        title: title.to_string(),
        x_label: String::new(),
        y_label: String::new(),
        body: ChartBody::Parallel(ParallelSpec {
            axes,
            lines,
            legend: price_range.map(|(min, max)| ColorLegend {
                metric: Metric::SalePriceSqrFoot,
                scale: scale.name,
                min,
                max,
            }),
        }),
    }
}

pub fn parallel_categories(profile: &ExpensiveNeighborhoodProfile) -> ChartSpec {
    profile_chart(profile, "Expensive Neighborhoods by Category", true)
}

pub fn parallel_coordinates(profile: &ExpensiveNeighborhoodProfile) -> ChartSpec {
    profile_chart(profile, "Expensive Neighborhoods, Parallel Coordinates", false)
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Build the chart `kind` from the engine's derived tables.
///
/// Engine errors are passed through unchanged; nothing is replaced with an
/// empty chart.
pub fn build_chart(
    engine: &AggregationEngine,
    kind: ChartKind,
    neighborhood: Option<&str>,
) -> Result<ChartSpec, ChartError> {
    let selected = || neighborhood.ok_or(ChartError::NoNeighborhood(kind));

    let spec = match kind {
        ChartKind::HousingUnitsPerYear => {
            housing_units_per_year(engine.yearly_mean(Metric::HousingUnits)?)
        }
        ChartKind::AverageGrossRent => average_gross_rent(engine.yearly_mean(Metric::GrossRent)?),
        ChartKind::AverageSalesPrice => {
            average_sales_price(engine.yearly_mean(Metric::SalePriceSqrFoot)?)
        }
        ChartKind::AveragePriceByNeighborhood => {
            average_price_by_neighborhood(engine.neighborhood_year_means()?, selected()?)?
        }
        ChartKind::AverageRentByNeighborhood => {
            average_rent_by_neighborhood(engine.neighborhood_year_means()?, selected()?)?
        }
        ChartKind::TopExpensiveNeighborhoods => {
            top_expensive_neighborhoods(engine.top_n_by_price()?)
        }
        ChartKind::RentVsPrice => rent_vs_price(engine.neighborhood_year_means()?, selected()?)?,
        ChartKind::RentMap => rent_map(engine.geo_rent_join()?),
        ChartKind::ParallelCategories => {
            parallel_categories(engine.expensive_neighborhood_profile()?)
        }
        ChartKind::ParallelCoordinates => {
            parallel_coordinates(engine.expensive_neighborhood_profile()?)
        }
    };
    Ok(spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{GeoRecord, MarketRecord};

    fn rec(year: i32, n: &str, price: f64, units: i64, rent: f64) -> MarketRecord {
        MarketRecord {
            year,
            neighborhood: n.to_string(),
            sale_price_sqr_foot: price,
            housing_units: units,
            gross_rent: rent,
        }
    }

    fn engine() -> AggregationEngine {
        AggregationEngine::new(
            vec![
                rec(2010, "Alpha", 300.0, 372_000, 1200.0),
                rec(2010, "Beta", 500.0, 372_000, 1500.0),
                rec(2011, "Alpha", 320.0, 374_000, 1500.0),
                rec(2011, "Beta", 540.0, 374_000, 1800.0),
            ],
            vec![
                GeoRecord {
                    neighborhood: "Alpha".to_string(),
                    latitude: 37.77,
                    longitude: -122.42,
                },
                GeoRecord {
                    neighborhood: "Beta".to_string(),
                    latitude: 37.75,
                    longitude: -122.45,
                },
            ],
        )
        .unwrap()
    }

    #[test]
    fn every_chart_builds_on_consistent_data() {
        let engine = engine();
        for kind in ChartKind::ALL {
            let neighborhood = kind.needs_neighborhood().then_some("Alpha");
            let spec = build_chart(&engine, kind, neighborhood)
                .unwrap_or_else(|e| panic!("{kind} failed: {e}"));
            assert!(!spec.title.is_empty());
        }
    }

    #[test]
    fn housing_units_bars_use_fixed_window() {
        let engine = engine();
        let spec = build_chart(&engine, ChartKind::HousingUnitsPerYear, None).unwrap();
        assert_eq!(spec.title, "Housing Units from 2010 to 2011");
        let ChartBody::Bars(bars) = spec.body else {
            panic!("expected bars");
        };
        assert_eq!(bars.y_range, Some(HOUSING_UNITS_Y_RANGE));
        assert!(bars.value_labels);
        assert_eq!(bars.series[0].bars.len(), 2);
        assert_eq!(bars.series[0].color, OLIVE_DRAB);
    }

    #[test]
    fn per_neighborhood_chart_requires_selection() {
        let engine = engine();
        let err = build_chart(&engine, ChartKind::RentVsPrice, None).unwrap_err();
        assert_eq!(err, ChartError::NoNeighborhood(ChartKind::RentVsPrice));
    }

    #[test]
    fn unknown_neighborhood_is_not_an_empty_chart() {
        let engine = engine();
        let err =
            build_chart(&engine, ChartKind::AveragePriceByNeighborhood, Some("Gamma")).unwrap_err();
        assert!(matches!(err, ChartError::Engine(EngineError::EmptyGroup { .. })));
    }

    #[test]
    fn neighborhood_line_follows_years() {
        let engine = engine();
        let spec = build_chart(&engine, ChartKind::AverageRentByNeighborhood, Some("Beta")).unwrap();
        assert_eq!(spec.title, "Average Rent in Beta");
        let ChartBody::Lines(lines) = spec.body else {
            panic!("expected lines");
        };
        assert_eq!(lines[0].points, vec![[2010.0, 1500.0], [2011.0, 1800.0]]);
    }

    #[test]
    fn rent_vs_price_offsets_series() {
        let engine = engine();
        let spec = build_chart(&engine, ChartKind::RentVsPrice, Some("Alpha")).unwrap();
        let ChartBody::Bars(bars) = spec.body else {
            panic!("expected bars");
        };
        assert_eq!(bars.series.len(), 2);
        assert_eq!(bars.series[0].bars[0].x, 2009.8);
        assert_eq!(bars.series[1].bars[0].x, 2010.2);
        assert_eq!(bars.series[1].bars[1].value, 320.0);
    }

    #[test]
    fn top_chart_is_categorical_in_rank_order() {
        let engine = engine();
        let spec = build_chart(&engine, ChartKind::TopExpensiveNeighborhoods, None).unwrap();
        let ChartBody::Bars(bars) = spec.body else {
            panic!("expected bars");
        };
        assert_eq!(
            bars.categories,
            Some(vec!["Beta".to_string(), "Alpha".to_string()])
        );
    }

    #[test]
    fn rent_map_largest_rent_gets_largest_marker() {
        let engine = engine();
        let spec = build_chart(&engine, ChartKind::RentMap, None).unwrap();
        let ChartBody::Scatter(scatter) = spec.body else {
            panic!("expected scatter");
        };
        let beta = scatter.points.iter().find(|p| p.label == "Beta").unwrap();
        let alpha = scatter.points.iter().find(|p| p.label == "Alpha").unwrap();
        assert_eq!(beta.radius, MAP_MAX_MARKER / 2.0);
        assert!(alpha.radius < beta.radius);
        let legend = scatter.legend.unwrap();
        assert_eq!(legend.min, 1350.0);
        assert_eq!(legend.max, 1650.0);
    }

    #[test]
    fn parallel_categories_adds_neighborhood_axis() {
        let engine = engine();
        let cats = build_chart(&engine, ChartKind::ParallelCategories, None).unwrap();
        let coords = build_chart(&engine, ChartKind::ParallelCoordinates, None).unwrap();
        let (ChartBody::Parallel(cats), ChartBody::Parallel(coords)) = (cats.body, coords.body)
        else {
            panic!("expected parallel charts");
        };
        assert_eq!(cats.axes.len(), 4);
        assert_eq!(coords.axes.len(), 3);
        assert_eq!(cats.lines[0].values.len(), 4);
        assert_eq!(cats.axes[0].position(1.0), 1.0);
    }

    #[test]
    fn empty_tables_draw_without_a_legend() {
        let map = rent_map(&GeoRentJoin::default());
        let ChartBody::Scatter(scatter) = map.body else {
            panic!("expected scatter");
        };
        assert!(scatter.points.is_empty());
        assert_eq!(scatter.legend, None);

        let profile = parallel_coordinates(&ExpensiveNeighborhoodProfile::default());
        let ChartBody::Parallel(parallel) = profile.body else {
            panic!("expected parallel chart");
        };
        assert_eq!(parallel.legend, None);
        assert!(parallel.axes.iter().all(|a| a.kind == AxisKind::Numeric { min: 0.0, max: 0.0 }));
    }
}
