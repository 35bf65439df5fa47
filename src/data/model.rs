use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Metric – one of the three measured quantities
// ---------------------------------------------------------------------------

/// A numeric column of the market table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Metric {
    SalePriceSqrFoot,
    HousingUnits,
    GrossRent,
}

impl Metric {
    pub const ALL: [Metric; 3] = [
        Metric::SalePriceSqrFoot,
        Metric::HousingUnits,
        Metric::GrossRent,
    ];

    /// Column name as it appears in the source files.
    pub fn column(self) -> &'static str {
        match self {
            Metric::SalePriceSqrFoot => "sale_price_sqr_foot",
            Metric::HousingUnits => "housing_units",
            Metric::GrossRent => "gross_rent",
        }
    }

    /// Human-readable label for axes and table headers.
    pub fn label(self) -> &'static str {
        match self {
            Metric::SalePriceSqrFoot => "Sale Price per Square Foot",
            Metric::HousingUnits => "Housing Units",
            Metric::GrossRent => "Gross Rent",
        }
    }

    /// Value of this metric on a raw record, widened to `f64`.
    pub fn of(self, record: &MarketRecord) -> f64 {
        match self {
            Metric::SalePriceSqrFoot => record.sale_price_sqr_foot,
            Metric::HousingUnits => record.housing_units as f64,
            Metric::GrossRent => record.gross_rent,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Metric::SalePriceSqrFoot => 0,
            Metric::HousingUnits => 1,
            Metric::GrossRent => 2,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

// ---------------------------------------------------------------------------
// Raw tables
// ---------------------------------------------------------------------------

/// One row of the yearly housing-market table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketRecord {
    pub year: i32,
    pub neighborhood: String,
    pub sale_price_sqr_foot: f64,
    pub housing_units: i64,
    pub gross_rent: f64,
}

/// One row of the neighborhood → coordinate lookup table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoRecord {
    pub neighborhood: String,
    pub latitude: f64,
    pub longitude: f64,
}

// ---------------------------------------------------------------------------
// Derived tables
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YearValue {
    pub year: i32,
    pub value: f64,
}

/// Mean of one metric across all neighborhoods, one row per year (ascending).
#[derive(Debug, Clone, PartialEq)]
pub struct YearlyAverage {
    pub metric: Metric,
    pub rows: Vec<YearValue>,
}

/// Mean of all three metrics for one `(year, neighborhood)` key.
#[derive(Debug, Clone, PartialEq)]
pub struct NeighborhoodYearRow {
    pub year: i32,
    pub neighborhood: String,
    pub sale_price_sqr_foot: f64,
    pub housing_units: f64,
    pub gross_rent: f64,
}

impl NeighborhoodYearRow {
    pub fn metric(&self, metric: Metric) -> f64 {
        match metric {
            Metric::SalePriceSqrFoot => self.sale_price_sqr_foot,
            Metric::HousingUnits => self.housing_units,
            Metric::GrossRent => self.gross_rent,
        }
    }
}

/// Ordered by `(year, neighborhood)`; keys are unique.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NeighborhoodYearMeans {
    pub rows: Vec<NeighborhoodYearRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NeighborhoodPrice {
    pub neighborhood: String,
    pub sale_price_sqr_foot: f64,
}

/// The most expensive neighborhoods, highest average price first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TopNByPrice {
    pub rows: Vec<NeighborhoodPrice>,
}

impl TopNByPrice {
    pub fn contains(&self, neighborhood: &str) -> bool {
        self.rows.iter().any(|r| r.neighborhood == neighborhood)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NeighborhoodRent {
    pub neighborhood: String,
    pub gross_rent: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NeighborhoodRentMeans {
    pub rows: Vec<NeighborhoodRent>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeoRent {
    pub neighborhood: String,
    pub latitude: f64,
    pub longitude: f64,
    pub gross_rent: f64,
}

/// Inner join of coordinates and rent means.
///
/// `dropped_geo` lists coordinate rows without rent data, `dropped_rent`
/// lists rent rows without coordinates. Neither is an error.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeoRentJoin {
    pub rows: Vec<GeoRent>,
    pub dropped_geo: Vec<String>,
    pub dropped_rent: Vec<String>,
}

impl GeoRentJoin {
    pub fn dropped_count(&self) -> usize {
        self.dropped_geo.len() + self.dropped_rent.len()
    }
}

/// All-year means of a top-priced neighborhood, rounded to cents.
#[derive(Debug, Clone, PartialEq)]
pub struct NeighborhoodProfile {
    pub neighborhood: String,
    pub sale_price_sqr_foot: f64,
    pub housing_units: f64,
    pub gross_rent: f64,
}

impl NeighborhoodProfile {
    pub fn metric(&self, metric: Metric) -> f64 {
        match metric {
            Metric::SalePriceSqrFoot => self.sale_price_sqr_foot,
            Metric::HousingUnits => self.housing_units,
            Metric::GrossRent => self.gross_rent,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExpensiveNeighborhoodProfile {
    pub rows: Vec<NeighborhoodProfile>,
}

// ---------------------------------------------------------------------------
// Table naming (diagnostics, table view)
// ---------------------------------------------------------------------------

/// Identifies one of the seven derived tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableName {
    YearlyAverage(Metric),
    NeighborhoodYearMeans,
    TopNByPrice,
    NeighborhoodRentMeans,
    GeoRentJoin,
    ExpensiveNeighborhoodProfile,
}

impl TableName {
    pub const ALL: [TableName; 8] = [
        TableName::YearlyAverage(Metric::HousingUnits),
        TableName::YearlyAverage(Metric::SalePriceSqrFoot),
        TableName::YearlyAverage(Metric::GrossRent),
        TableName::NeighborhoodYearMeans,
        TableName::TopNByPrice,
        TableName::NeighborhoodRentMeans,
        TableName::GeoRentJoin,
        TableName::ExpensiveNeighborhoodProfile,
    ];
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableName::YearlyAverage(m) => write!(f, "yearly mean of {m}"),
            TableName::NeighborhoodYearMeans => f.write_str("neighborhood/year means"),
            TableName::TopNByPrice => f.write_str("top neighborhoods by price"),
            TableName::NeighborhoodRentMeans => f.write_str("neighborhood rent means"),
            TableName::GeoRentJoin => f.write_str("coordinates/rent join"),
            TableName::ExpensiveNeighborhoodProfile => {
                f.write_str("expensive neighborhood profile")
            }
        }
    }
}
