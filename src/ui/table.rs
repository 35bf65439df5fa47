use eframe::egui::{Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::AggregationEngine;
use crate::data::EngineError;
use crate::data::model::TableName;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Derived-table view (central panel, "Table" toggle)
// ---------------------------------------------------------------------------

/// A derived table flattened to text cells for display.
#[derive(Debug, Clone, PartialEq)]
pub struct TextTable {
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
    pub footer: Option<String>,
}

fn num(v: f64) -> String {
    format!("{v:.2}")
}

/// Flatten one derived table.
pub fn text_table(engine: &AggregationEngine, table: TableName) -> Result<TextTable, EngineError> {
    let t = match table {
        TableName::YearlyAverage(metric) => TextTable {
            headers: vec!["year", metric.column()],
            rows: engine
                .yearly_mean(metric)?
                .rows
                .iter()
                .map(|r| vec![r.year.to_string(), num(r.value)])
                .collect(),
            footer: None,
        },
        TableName::NeighborhoodYearMeans => TextTable {
            headers: vec!["year", "neighborhood", "sale_price_sqr_foot", "housing_units", "gross_rent"],
            rows: engine
                .neighborhood_year_means()?
                .rows
                .iter()
                .map(|r| {
                    vec![
                        r.year.to_string(),
                        r.neighborhood.clone(),
                        num(r.sale_price_sqr_foot),
                        num(r.housing_units),
                        num(r.gross_rent),
                    ]
                })
                .collect(),
            footer: None,
        },
        TableName::TopNByPrice => TextTable {
            headers: vec!["neighborhood", "sale_price_sqr_foot"],
            rows: engine
                .top_n_by_price()?
                .rows
                .iter()
                .map(|r| vec![r.neighborhood.clone(), num(r.sale_price_sqr_foot)])
                .collect(),
            footer: None,
        },
        TableName::NeighborhoodRentMeans => TextTable {
            headers: vec!["neighborhood", "gross_rent"],
            rows: engine
                .neighborhood_rent_means()?
                .rows
                .iter()
                .map(|r| vec![r.neighborhood.clone(), num(r.gross_rent)])
                .collect(),
            footer: None,
        },
        TableName::GeoRentJoin => {
            let join = engine.geo_rent_join()?;
            TextTable {
                headers: vec!["neighborhood", "latitude", "longitude", "gross_rent"],
                rows: join
                    .rows
                    .iter()
                    .map(|r| {
                        vec![
                            r.neighborhood.clone(),
                            format!("{:.6}", r.latitude),
                            format!("{:.6}", r.longitude),
                            num(r.gross_rent),
                        ]
                    })
                    .collect(),
                footer: (join.dropped_count() > 0).then(|| {
                    format!(
                        "Not shown: {} without rent data, {} without coordinates",
                        join.dropped_geo.len(),
                        join.dropped_rent.len()
                    )
                }),
            }
        }
        TableName::ExpensiveNeighborhoodProfile => TextTable {
            headers: vec!["neighborhood", "sale_price_sqr_foot", "housing_units", "gross_rent"],
            rows: engine
                .expensive_neighborhood_profile()?
                .rows
                .iter()
                .map(|r| {
                    vec![
                        r.neighborhood.clone(),
                        num(r.sale_price_sqr_foot),
                        num(r.housing_units),
                        num(r.gross_rent),
                    ]
                })
                .collect(),
            footer: None,
        },
    };
    Ok(t)
}

/// Render the source table of the selected chart.
pub fn table_view(ui: &mut Ui, state: &AppState) {
    let Some(engine) = &state.engine else {
        ui.label("No dataset loaded.");
        return;
    };

    let name = state.chart.source_table();
    ui.heading(name.to_string());
    ui.separator();

    let table = match text_table(engine, name) {
        Ok(t) => t,
        Err(e) => {
            ui.label(RichText::new(format!("Error: {e}")).color(Color32::RED));
            return;
        }
    };

    if let Some(footer) = &table.footer {
        ui.label(footer.as_str());
    }

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .columns(Column::auto().at_least(80.0), table.headers.len())
        .header(20.0, |mut header| {
            for h in &table.headers {
                header.col(|ui| {
                    ui.strong(*h);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, table.rows.len(), |mut row| {
                let cells = &table.rows[row.index()];
                for cell in cells {
                    row.col(|ui| {
                        ui.label(cell.as_str());
                    });
                }
            });
        });
}
