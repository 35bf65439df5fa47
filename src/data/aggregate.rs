//! Derivations from the raw tables.
//!
//! Every function here is pure: same input, same output, bit for bit.
//! Grouping uses `BTreeMap`, so group order is the key order (ascending year,
//! then ascending neighborhood name) and never depends on hashing.

use std::collections::{BTreeMap, BTreeSet};

use super::error::EngineError;
use super::model::{
    ExpensiveNeighborhoodProfile, GeoRecord, GeoRent, GeoRentJoin, MarketRecord, Metric,
    NeighborhoodPrice, NeighborhoodProfile, NeighborhoodRent, NeighborhoodRentMeans,
    NeighborhoodYearMeans, NeighborhoodYearRow, TableName, TopNByPrice, YearValue,
    YearlyAverage,
};

/// Size of the "most expensive neighborhoods" ranking.
pub const DEFAULT_TOP_N: usize = 10;

/// Round to two decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ---------------------------------------------------------------------------
// Mean accumulator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
struct Mean {
    sum: f64,
    count: usize,
}

impl Mean {
    fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn value(&self) -> f64 {
        self.sum / self.count as f64
    }
}

/// Running means of all three metrics.
#[derive(Debug, Clone, Copy, Default)]
struct MetricMeans([Mean; 3]);

impl MetricMeans {
    fn push_record(&mut self, record: &MarketRecord) {
        for metric in Metric::ALL {
            self.0[metric.index()].push(metric.of(record));
        }
    }

    fn get(&self, metric: Metric) -> f64 {
        self.0[metric.index()].value()
    }
}

// ---------------------------------------------------------------------------
// Yearly averages
// ---------------------------------------------------------------------------

/// Mean of `metric` across all neighborhoods, one row per year.
///
/// Sale price means are rounded to cents; housing-unit and rent means are
/// left unrounded.
pub fn yearly_mean(market: &[MarketRecord], metric: Metric) -> Result<YearlyAverage, EngineError> {
    if market.is_empty() {
        return Err(EngineError::empty_group(
            TableName::YearlyAverage(metric),
            "any year",
        ));
    }

    let mut groups: BTreeMap<i32, Mean> = BTreeMap::new();
    for record in market {
        groups.entry(record.year).or_default().push(metric.of(record));
    }

    let rows = groups
        .into_iter()
        .map(|(year, mean)| {
            let value = match metric {
                Metric::SalePriceSqrFoot => round2(mean.value()),
                Metric::HousingUnits | Metric::GrossRent => mean.value(),
            };
            YearValue { year, value }
        })
        .collect();

    Ok(YearlyAverage { metric, rows })
}

// ---------------------------------------------------------------------------
// Per (year, neighborhood)
// ---------------------------------------------------------------------------

/// Collapse raw rows sharing a `(year, neighborhood)` key into their means.
///
/// Values are not rounded: every per-neighborhood table is derived from this
/// one and rounding here would compound.
pub fn neighborhood_year_means(
    market: &[MarketRecord],
) -> Result<NeighborhoodYearMeans, EngineError> {
    if market.is_empty() {
        return Err(EngineError::empty_group(
            TableName::NeighborhoodYearMeans,
            "any (year, neighborhood)",
        ));
    }

    let mut groups: BTreeMap<(i32, &str), MetricMeans> = BTreeMap::new();
    for record in market {
        groups
            .entry((record.year, record.neighborhood.as_str()))
            .or_default()
            .push_record(record);
    }

    let rows = groups
        .into_iter()
        .map(|((year, neighborhood), means)| NeighborhoodYearRow {
            year,
            neighborhood: neighborhood.to_string(),
            sale_price_sqr_foot: means.get(Metric::SalePriceSqrFoot),
            housing_units: means.get(Metric::HousingUnits),
            gross_rent: means.get(Metric::GrossRent),
        })
        .collect();

    Ok(NeighborhoodYearMeans { rows })
}

/// Average `metric` over all years, per neighborhood, in name order.
fn per_neighborhood_mean<'a>(
    means: &'a NeighborhoodYearMeans,
    metric: Metric,
) -> Vec<(&'a str, f64)> {
    let mut groups: BTreeMap<&str, Mean> = BTreeMap::new();
    for row in &means.rows {
        groups
            .entry(row.neighborhood.as_str())
            .or_default()
            .push(row.metric(metric));
    }
    groups
        .into_iter()
        .map(|(name, mean)| (name, mean.value()))
        .collect()
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

/// The `n` neighborhoods with the highest all-year mean sale price.
///
/// Sorting is stable over the name-ordered groups, so equal means keep
/// ascending neighborhood order.
pub fn top_n_by_price(means: &NeighborhoodYearMeans, n: usize) -> Result<TopNByPrice, EngineError> {
    if means.rows.is_empty() {
        return Err(EngineError::empty_group(TableName::TopNByPrice, "any neighborhood"));
    }

    let mut ranked = per_neighborhood_mean(means, Metric::SalePriceSqrFoot);
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.truncate(n);

    let rows = ranked
        .into_iter()
        .map(|(name, price)| NeighborhoodPrice {
            neighborhood: name.to_string(),
            sale_price_sqr_foot: price,
        })
        .collect();

    Ok(TopNByPrice { rows })
}

/// All-year mean gross rent per neighborhood.
pub fn neighborhood_rent_means(
    means: &NeighborhoodYearMeans,
) -> Result<NeighborhoodRentMeans, EngineError> {
    if means.rows.is_empty() {
        return Err(EngineError::empty_group(
            TableName::NeighborhoodRentMeans,
            "any neighborhood",
        ));
    }

    let rows = per_neighborhood_mean(means, Metric::GrossRent)
        .into_iter()
        .map(|(name, rent)| NeighborhoodRent {
            neighborhood: name.to_string(),
            gross_rent: rent,
        })
        .collect();

    Ok(NeighborhoodRentMeans { rows })
}

// ---------------------------------------------------------------------------
// Join
// ---------------------------------------------------------------------------

/// Inner join on exact neighborhood name. Output follows `geo` order.
pub fn geo_rent_join(geo: &[GeoRecord], rents: &NeighborhoodRentMeans) -> GeoRentJoin {
    let rent_by_name: BTreeMap<&str, f64> = rents
        .rows
        .iter()
        .map(|r| (r.neighborhood.as_str(), r.gross_rent))
        .collect();

    let mut rows = Vec::new();
    let mut dropped_geo = Vec::new();
    for g in geo {
        match rent_by_name.get(g.neighborhood.as_str()) {
            Some(&gross_rent) => rows.push(GeoRent {
                neighborhood: g.neighborhood.clone(),
                latitude: g.latitude,
                longitude: g.longitude,
                gross_rent,
            }),
            None => dropped_geo.push(g.neighborhood.clone()),
        }
    }

    let geo_names: BTreeSet<&str> = geo.iter().map(|g| g.neighborhood.as_str()).collect();
    let dropped_rent = rents
        .rows
        .iter()
        .filter(|r| !geo_names.contains(r.neighborhood.as_str()))
        .map(|r| r.neighborhood.clone())
        .collect();

    GeoRentJoin {
        rows,
        dropped_geo,
        dropped_rent,
    }
}

// ---------------------------------------------------------------------------
// Profile of the most expensive neighborhoods
// ---------------------------------------------------------------------------

/// Raw-row means of the three metrics for each ranked neighborhood, rounded
/// to two decimals. Rows follow the ranking order of `top`.
pub fn expensive_neighborhood_profile(
    market: &[MarketRecord],
    top: &TopNByPrice,
) -> Result<ExpensiveNeighborhoodProfile, EngineError> {
    let mut groups: BTreeMap<&str, MetricMeans> = BTreeMap::new();
    for record in market.iter().filter(|r| top.contains(&r.neighborhood)) {
        groups
            .entry(record.neighborhood.as_str())
            .or_default()
            .push_record(record);
    }

    let rows = top
        .rows
        .iter()
        .map(|ranked| {
            let means = groups.get(ranked.neighborhood.as_str()).ok_or_else(|| {
                EngineError::empty_group(
                    TableName::ExpensiveNeighborhoodProfile,
                    format!("neighborhood '{}'", ranked.neighborhood),
                )
            })?;
            Ok(NeighborhoodProfile {
                neighborhood: ranked.neighborhood.clone(),
                sale_price_sqr_foot: round2(means.get(Metric::SalePriceSqrFoot)),
                housing_units: round2(means.get(Metric::HousingUnits)),
                gross_rent: round2(means.get(Metric::GrossRent)),
            })
        })
        .collect::<Result<Vec<_>, EngineError>>()?;

    Ok(ExpensiveNeighborhoodProfile { rows })
}
