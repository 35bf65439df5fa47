use std::collections::{BTreeMap, BTreeSet};

use quickcheck_macros::quickcheck;

use housing_lens::data::aggregate::round2;
use housing_lens::data::model::{GeoRecord, MarketRecord, Metric};
use housing_lens::data::AggregationEngine;

/// `(year offset, neighborhood index, price, units, rent)`
type RawRow = (u8, u8, u16, u16, u16);

fn market(raw: &[RawRow]) -> Vec<MarketRecord> {
    raw.iter()
        .map(|&(y, n, price, units, rent)| MarketRecord {
            year: 2010 + i32::from(y % 7),
            neighborhood: format!("N{}", n % 13),
            sale_price_sqr_foot: f64::from(price) / 7.0,
            housing_units: 370_000 + i64::from(units),
            gross_rent: f64::from(rent) / 3.0,
        })
        .collect()
}

fn geo(names: &[u8]) -> Vec<GeoRecord> {
    names
        .iter()
        .map(|n| n % 17)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(|n| GeoRecord {
            neighborhood: format!("N{n}"),
            latitude: 37.7 + f64::from(n) / 1000.0,
            longitude: -122.4 - f64::from(n) / 1000.0,
        })
        .collect()
}

fn engine(raw: &[RawRow], names: &[u8]) -> AggregationEngine {
    AggregationEngine::new(market(raw), geo(names)).unwrap()
}

fn close(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() <= tolerance * b.abs().max(1.0)
}

#[quickcheck]
fn yearly_mean_matches_direct_average(raw: Vec<RawRow>) -> bool {
    if raw.is_empty() {
        return true;
    }
    let records = market(&raw);
    let engine = AggregationEngine::new(records.clone(), Vec::new()).unwrap();

    Metric::ALL.into_iter().all(|metric| {
        let mut expected: BTreeMap<i32, (f64, usize)> = BTreeMap::new();
        for r in &records {
            let slot = expected.entry(r.year).or_default();
            slot.0 += metric.of(r);
            slot.1 += 1;
        }
        let table = engine.yearly_mean(metric).unwrap();
        let tolerance = match metric {
            Metric::SalePriceSqrFoot => 0.0051,
            _ => 1e-9,
        };

        table.rows.len() == expected.len()
            && table.rows.iter().zip(&expected).all(|(row, (year, (sum, n)))| {
                row.year == *year && close(row.value, sum / *n as f64, tolerance)
            })
    })
}

#[quickcheck]
fn neighborhood_year_keys_are_unique_and_ordered(raw: Vec<RawRow>) -> bool {
    if raw.is_empty() {
        return true;
    }
    let engine = engine(&raw, &[]);
    let table = engine.neighborhood_year_means().unwrap();
    let keys: Vec<(i32, &str)> = table
        .rows
        .iter()
        .map(|r| (r.year, r.neighborhood.as_str()))
        .collect();
    keys.windows(2).all(|w| w[0] < w[1])
}

#[quickcheck]
fn top_n_is_bounded_and_descending(raw: Vec<RawRow>) -> bool {
    if raw.is_empty() {
        return true;
    }
    let engine = engine(&raw, &[]);
    let distinct: BTreeSet<&str> = engine
        .market()
        .iter()
        .map(|r| r.neighborhood.as_str())
        .collect();
    let year_mean_names: BTreeSet<&str> = engine
        .neighborhood_year_means()
        .unwrap()
        .rows
        .iter()
        .map(|r| r.neighborhood.as_str())
        .collect();
    let top = engine.top_n_by_price().unwrap();

    top.rows.len() == distinct.len().min(10)
        && top
            .rows
            .iter()
            .all(|r| year_mean_names.contains(r.neighborhood.as_str()))
        && top
            .rows
            .windows(2)
            .all(|w| w[0].sale_price_sqr_foot >= w[1].sale_price_sqr_foot)
}

#[quickcheck]
fn join_keeps_exactly_the_shared_names(raw: Vec<RawRow>, names: Vec<u8>) -> bool {
    if raw.is_empty() {
        return true;
    }
    let engine = engine(&raw, &names);
    let rent_names: BTreeSet<String> = engine
        .neighborhood_rent_means()
        .unwrap()
        .rows
        .iter()
        .map(|r| r.neighborhood.clone())
        .collect();
    let geo_names: BTreeSet<String> = engine.geo().iter().map(|g| g.neighborhood.clone()).collect();
    let shared: BTreeSet<String> = rent_names.intersection(&geo_names).cloned().collect();

    let join = engine.geo_rent_join().unwrap();
    let joined: BTreeSet<String> = join.rows.iter().map(|r| r.neighborhood.clone()).collect();
    let dropped_geo: BTreeSet<String> = join.dropped_geo.iter().cloned().collect();
    let dropped_rent: BTreeSet<String> = join.dropped_rent.iter().cloned().collect();

    join.rows.len() == shared.len()
        && joined == shared
        && dropped_geo == geo_names.difference(&shared).cloned().collect::<BTreeSet<_>>()
        && dropped_rent == rent_names.difference(&shared).cloned().collect::<BTreeSet<_>>()
}

#[quickcheck]
fn profile_follows_ranking_and_is_rounded(raw: Vec<RawRow>) -> bool {
    if raw.is_empty() {
        return true;
    }
    let engine = engine(&raw, &[]);
    let ranked: Vec<&str> = engine
        .top_n_by_price()
        .unwrap()
        .rows
        .iter()
        .map(|r| r.neighborhood.as_str())
        .collect();
    let profile = engine.expensive_neighborhood_profile().unwrap();
    let names: Vec<&str> = profile.rows.iter().map(|r| r.neighborhood.as_str()).collect();

    names == ranked
        && profile.rows.iter().all(|r| {
            Metric::ALL
                .into_iter()
                .all(|m| round2(r.metric(m)) == r.metric(m))
        })
}

#[quickcheck]
fn recomputation_is_bit_identical(raw: Vec<RawRow>, names: Vec<u8>) -> bool {
    if raw.is_empty() {
        return true;
    }
    let a = engine(&raw, &names);
    let b = engine(&raw, &names);

    Metric::ALL
        .into_iter()
        .all(|m| a.yearly_mean(m).unwrap() == b.yearly_mean(m).unwrap())
        && a.neighborhood_year_means().unwrap() == b.neighborhood_year_means().unwrap()
        && a.top_n_by_price().unwrap() == b.top_n_by_price().unwrap()
        && a.neighborhood_rent_means().unwrap() == b.neighborhood_rent_means().unwrap()
        && a.geo_rent_join().unwrap() == b.geo_rent_join().unwrap()
        && a.expensive_neighborhood_profile().unwrap() == b.expensive_neighborhood_profile().unwrap()
}
