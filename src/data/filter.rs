use std::collections::BTreeSet;

use super::error::EngineError;
use super::model::{NeighborhoodYearMeans, NeighborhoodYearRow, TableName};

// ---------------------------------------------------------------------------
// Neighborhood selection over the (year, neighborhood) table
// ---------------------------------------------------------------------------

/// Distinct neighborhoods in first-seen order.
///
/// This is the list offered by the neighborhood selector.
pub fn neighborhood_list(means: &NeighborhoodYearMeans) -> Vec<String> {
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    means
        .rows
        .iter()
        .filter(|row| seen.insert(row.neighborhood.as_str()))
        .map(|row| row.neighborhood.clone())
        .collect()
}

/// Rows of one neighborhood, in year order.
///
/// An unknown neighborhood is an error: a chart for it would silently be
/// empty.
pub fn neighborhood_subset<'a>(
    means: &'a NeighborhoodYearMeans,
    neighborhood: &str,
) -> Result<Vec<&'a NeighborhoodYearRow>, EngineError> {
    let rows: Vec<&NeighborhoodYearRow> = means
        .rows
        .iter()
        .filter(|row| row.neighborhood == neighborhood)
        .collect();

    if rows.is_empty() {
        return Err(EngineError::empty_group(
            TableName::NeighborhoodYearMeans,
            format!("neighborhood '{neighborhood}'"),
        ));
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(year: i32, n: &str) -> NeighborhoodYearRow {
        NeighborhoodYearRow {
            year,
            neighborhood: n.to_string(),
            sale_price_sqr_foot: 1.0,
            housing_units: 1.0,
            gross_rent: 1.0,
        }
    }

    fn table() -> NeighborhoodYearMeans {
        NeighborhoodYearMeans {
            rows: vec![row(2010, "B"), row(2010, "C"), row(2011, "A"), row(2011, "B")],
        }
    }

    #[test]
    fn list_is_first_seen_order() {
        assert_eq!(neighborhood_list(&table()), vec!["B", "C", "A"]);
    }

    #[test]
    fn subset_keeps_year_order() {
        let means = table();
        let subset = neighborhood_subset(&means, "B").unwrap();
        let years: Vec<i32> = subset.iter().map(|r| r.year).collect();
        assert_eq!(years, vec![2010, 2011]);
    }

    #[test]
    fn unknown_neighborhood_is_reported() {
        let err = neighborhood_subset(&table(), "Z").unwrap_err();
        assert!(err.to_string().contains("'Z'"));
    }
}
