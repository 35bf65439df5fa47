use std::cell::OnceCell;
use std::collections::BTreeSet;

use super::aggregate::{self, DEFAULT_TOP_N};
use super::error::{EngineError, SourceTable};
use super::model::{
    ExpensiveNeighborhoodProfile, GeoRecord, GeoRentJoin, MarketRecord, Metric,
    NeighborhoodRentMeans, NeighborhoodYearMeans, TableName, TopNByPrice, YearlyAverage,
};

type Cached<T> = OnceCell<Result<T, EngineError>>;

/// Owns the two raw tables and hands out the derived tables.
///
/// Each derived table is computed on first access and kept for the lifetime
/// of the engine. A failure is cached too, so a broken table keeps reporting
/// the same error instead of being recomputed or replaced by empty data.
#[derive(Debug)]
pub struct AggregationEngine {
    market: Vec<MarketRecord>,
    geo: Vec<GeoRecord>,
    top_n: usize,

    yearly: [Cached<YearlyAverage>; 3],
    neighborhood_year: Cached<NeighborhoodYearMeans>,
    top_prices: Cached<TopNByPrice>,
    rent_means: Cached<NeighborhoodRentMeans>,
    geo_rent: Cached<GeoRentJoin>,
    profile: Cached<ExpensiveNeighborhoodProfile>,
}

/// Read a cache cell, computing it on first use.
fn cached<T>(cell: &Cached<T>, init: impl FnOnce() -> Result<T, EngineError>) -> Result<&T, EngineError> {
    cell.get_or_init(init).as_ref().map_err(Clone::clone)
}

impl AggregationEngine {
    /// Validate the raw tables and build an engine ranking the default
    /// number of neighborhoods.
    pub fn new(market: Vec<MarketRecord>, geo: Vec<GeoRecord>) -> Result<Self, EngineError> {
        Self::with_top_n(market, geo, DEFAULT_TOP_N)
    }

    pub fn with_top_n(
        market: Vec<MarketRecord>,
        geo: Vec<GeoRecord>,
        top_n: usize,
    ) -> Result<Self, EngineError> {
        validate_market(&market)?;
        validate_geo(&geo)?;

        Ok(Self {
            market,
            geo,
            top_n,
            yearly: Default::default(),
            neighborhood_year: OnceCell::new(),
            top_prices: OnceCell::new(),
            rent_means: OnceCell::new(),
            geo_rent: OnceCell::new(),
            profile: OnceCell::new(),
        })
    }

    pub fn market(&self) -> &[MarketRecord] {
        &self.market
    }

    pub fn geo(&self) -> &[GeoRecord] {
        &self.geo
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    pub fn yearly_mean(&self, metric: Metric) -> Result<&YearlyAverage, EngineError> {
        cached(&self.yearly[metric.index()], || {
            aggregate::yearly_mean(&self.market, metric)
        })
    }

    pub fn neighborhood_year_means(&self) -> Result<&NeighborhoodYearMeans, EngineError> {
        cached(&self.neighborhood_year, || {
            aggregate::neighborhood_year_means(&self.market)
        })
    }

    pub fn top_n_by_price(&self) -> Result<&TopNByPrice, EngineError> {
        cached(&self.top_prices, || {
            aggregate::top_n_by_price(self.neighborhood_year_means()?, self.top_n)
        })
    }

    pub fn neighborhood_rent_means(&self) -> Result<&NeighborhoodRentMeans, EngineError> {
        cached(&self.rent_means, || {
            aggregate::neighborhood_rent_means(self.neighborhood_year_means()?)
        })
    }

    pub fn geo_rent_join(&self) -> Result<&GeoRentJoin, EngineError> {
        cached(&self.geo_rent, || {
            let join = aggregate::geo_rent_join(&self.geo, self.neighborhood_rent_means()?);
            if join.dropped_count() > 0 {
                log::debug!(
                    "coordinates/rent join dropped {} neighborhood(s): without rent {:?}, without coordinates {:?}",
                    join.dropped_count(),
                    join.dropped_geo,
                    join.dropped_rent
                );
            }
            Ok(join)
        })
    }

    pub fn expensive_neighborhood_profile(
        &self,
    ) -> Result<&ExpensiveNeighborhoodProfile, EngineError> {
        cached(&self.profile, || {
            aggregate::expensive_neighborhood_profile(&self.market, self.top_n_by_price()?)
        })
    }

    /// Compute every derived table once, returning the ones that failed.
    pub fn warm(&self) -> Vec<(TableName, EngineError)> {
        let mut failures = Vec::new();
        for table in TableName::ALL {
            let result = match table {
                TableName::YearlyAverage(metric) => self.yearly_mean(metric).map(|_| ()),
                TableName::NeighborhoodYearMeans => self.neighborhood_year_means().map(|_| ()),
                TableName::TopNByPrice => self.top_n_by_price().map(|_| ()),
                TableName::NeighborhoodRentMeans => self.neighborhood_rent_means().map(|_| ()),
                TableName::GeoRentJoin => self.geo_rent_join().map(|_| ()),
                TableName::ExpensiveNeighborhoodProfile => {
                    self.expensive_neighborhood_profile().map(|_| ())
                }
            };
            if let Err(e) = result {
                log::warn!("Failed to derive {table}: {e}");
                failures.push((table, e));
            }
        }
        log::info!(
            "Derived {}/{} tables from {} market rows and {} coordinate rows",
            TableName::ALL.len() - failures.len(),
            TableName::ALL.len(),
            self.market.len(),
            self.geo.len()
        );
        failures
    }
}

// ---------------------------------------------------------------------------
// Raw-table validation
// ---------------------------------------------------------------------------

fn validate_market(market: &[MarketRecord]) -> Result<(), EngineError> {
    for (row, r) in market.iter().enumerate() {
        if r.neighborhood.trim().is_empty() {
            return Err(EngineError::schema(
                SourceTable::Market,
                row,
                "neighborhood",
                "empty neighborhood name",
            ));
        }
        for (column, value) in [
            ("sale_price_sqr_foot", r.sale_price_sqr_foot),
            ("gross_rent", r.gross_rent),
        ] {
            if !value.is_finite() {
                return Err(EngineError::schema(
                    SourceTable::Market,
                    row,
                    column,
                    format!("non-finite value {value}"),
                ));
            }
        }
    }
    Ok(())
}

fn validate_geo(geo: &[GeoRecord]) -> Result<(), EngineError> {
    let mut seen = BTreeSet::new();
    for (row, g) in geo.iter().enumerate() {
        if g.neighborhood.trim().is_empty() {
            return Err(EngineError::schema(
                SourceTable::Geo,
                row,
                "neighborhood",
                "empty neighborhood name",
            ));
        }
        if !seen.insert(g.neighborhood.as_str()) {
            return Err(EngineError::schema(
                SourceTable::Geo,
                row,
                "neighborhood",
                format!("duplicate neighborhood '{}'", g.neighborhood),
            ));
        }
        for (column, value) in [("latitude", g.latitude), ("longitude", g.longitude)] {
            if !value.is_finite() {
                return Err(EngineError::schema(
                    SourceTable::Geo,
                    row,
                    column,
                    format!("non-finite value {value}"),
                ));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(year: i32, n: &str, price: f64, units: i64, rent: f64) -> MarketRecord {
        MarketRecord {
            year,
            neighborhood: n.to_string(),
            sale_price_sqr_foot: price,
            housing_units: units,
            gross_rent: rent,
        }
    }

    fn geo(n: &str, lat: f64) -> GeoRecord {
        GeoRecord {
            neighborhood: n.to_string(),
            latitude: lat,
            longitude: -122.4,
        }
    }

    #[test]
    fn rejects_non_finite_metric() {
        let err = AggregationEngine::new(vec![rec(2010, "A", f64::NAN, 1, 1.0)], vec![]).unwrap_err();
        match err {
            EngineError::Schema { table, row, column, .. } => {
                assert_eq!(table, SourceTable::Market);
                assert_eq!(row, 0);
                assert_eq!(column, "sale_price_sqr_foot");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rejects_duplicate_coordinates() {
        let err = AggregationEngine::new(
            vec![rec(2010, "A", 1.0, 1, 1.0)],
            vec![geo("A", 37.7), geo("A", 37.8)],
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate neighborhood 'A'"));
    }

    #[test]
    fn rejects_blank_neighborhood() {
        let err = AggregationEngine::new(vec![rec(2010, "  ", 1.0, 1, 1.0)], vec![]).unwrap_err();
        assert!(matches!(err, EngineError::Schema { .. }));
    }

    #[test]
    fn accessors_are_memoized() {
        let engine = AggregationEngine::new(
            vec![rec(2010, "A", 1.0, 1, 1.0), rec(2011, "B", 2.0, 2, 2.0)],
            vec![geo("A", 37.7)],
        )
        .unwrap();
        let first = engine.top_n_by_price().unwrap() as *const TopNByPrice;
        let second = engine.top_n_by_price().unwrap() as *const TopNByPrice;
        assert_eq!(first, second);
    }

    #[test]
    fn empty_market_fails_every_table() {
        let engine = AggregationEngine::new(vec![], vec![geo("A", 37.7)]).unwrap();
        let failures = engine.warm();
        assert_eq!(failures.len(), TableName::ALL.len());
        assert!(engine.geo_rent_join().is_err());
        // The cached error is the same on every access.
        assert_eq!(
            engine.neighborhood_year_means().unwrap_err(),
            engine.neighborhood_year_means().unwrap_err()
        );
    }

    #[test]
    fn warm_succeeds_on_consistent_data() {
        let engine = AggregationEngine::with_top_n(
            vec![rec(2010, "A", 1.0, 1, 1.0), rec(2010, "B", 2.0, 2, 2.0)],
            vec![geo("A", 37.7)],
            1,
        )
        .unwrap();
        assert!(engine.warm().is_empty());
        assert_eq!(engine.top_n_by_price().unwrap().rows[0].neighborhood, "B");
        assert_eq!(engine.expensive_neighborhood_profile().unwrap().rows.len(), 1);
        assert_eq!(engine.geo_rent_join().unwrap().rows.len(), 1);
    }
}
