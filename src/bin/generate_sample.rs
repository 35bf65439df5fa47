use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int32Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use housing_lens::data::model::{GeoRecord, MarketRecord};

const OUTPUT_DIR: &str = "Data";
const YEARS: std::ops::RangeInclusive<i32> = 2010..=2016;

/// (name, base price per sq ft, latitude, longitude)
const NEIGHBORHOODS: &[(&str, f64, f64, f64)] = &[
    ("Alamo Square", 291.18, 37.791012, -122.402100),
    ("Anza Vista", 267.93, 37.779598, -122.443451),
    ("Bayview", 170.10, 37.734670, -122.401060),
    ("Bernal Heights", 340.80, 37.728630, -122.443050),
    ("Cow Hollow", 569.38, 37.797500, -122.436200),
    ("Diamond Heights", 434.99, 37.728630, -122.443050),
    ("Glen Park", 365.47, 37.728630, -122.443050),
    ("Hayes Valley", 355.93, 37.791012, -122.402100),
    ("Marina", 411.32, 37.800730, -122.436640),
    ("Merced Heights", 473.80, 37.719930, -122.465950),
    ("Miraloma Park", 430.22, 37.738870, -122.449910),
    ("Mission Bay", 422.70, 37.770750, -122.391360),
    ("Noe Valley", 392.55, 37.750410, -122.433420),
    ("Pacific Heights", 521.06, 37.792980, -122.435790),
    ("Presidio Heights", 480.67, 37.788700, -122.454970),
    ("Russian Hill", 467.29, 37.798220, -122.418310),
    ("Telegraph Hill", 441.73, 37.801680, -122.406270),
    ("Union Square District", 552.56, 37.791012, -122.402100),
    ("Westwood Park", 375.21, 37.734820, -122.457570),
];

/// Present in the market table only; has no coordinates.
const MARKET_ONLY: &str = "Outer Mission";
/// Present in the coordinates table only; has no market rows.
const COORDINATES_ONLY: (&str, f64, f64) = ("Silver Terrace", 37.734670, -122.401060);

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform in `[lo, hi)`.
    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

/// City-wide totals grow by a roughly constant step each year.
fn housing_units(year: i32) -> i64 {
    372_560 + i64::from(year - 2010) * 2_000
}

/// Rents roughly tripled over the period in the source data.
fn gross_rent(year: i32) -> f64 {
    const RENTS: [f64; 7] = [1239.0, 1530.0, 2324.0, 2971.0, 3528.0, 3739.0, 4390.0];
    RENTS[(year - 2010) as usize]
}

fn market_rows(rng: &mut SimpleRng) -> Vec<MarketRecord> {
    let mut names: Vec<(&str, f64)> = NEIGHBORHOODS.iter().map(|&(n, p, _, _)| (n, p)).collect();
    names.push((MARKET_ONLY, 315.0));

    let mut rows = Vec::new();
    for year in YEARS {
        for &(name, base) in &names {
            // Not every neighborhood reports every year.
            if rng.next_f64() < 0.15 {
                continue;
            }
            let trend = 1.0 + 0.06 * f64::from(year - 2010);
            rows.push(MarketRecord {
                year,
                neighborhood: name.to_string(),
                sale_price_sqr_foot: base * trend * rng.uniform(0.85, 1.15),
                housing_units: housing_units(year),
                gross_rent: gross_rent(year),
            });
        }
    }
    rows
}

fn geo_rows() -> Vec<GeoRecord> {
    let (extra, lat, lon) = COORDINATES_ONLY;
    NEIGHBORHOODS
        .iter()
        .map(|&(name, _, lat, lon)| (name, lat, lon))
        .chain(std::iter::once((extra, lat, lon)))
        .map(|(name, latitude, longitude)| GeoRecord {
            neighborhood: name.to_string(),
            latitude,
            longitude,
        })
        .collect()
}

fn write_market_csv(path: &Path, rows: &[MarketRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_geo_csv(path: &Path, rows: &[GeoRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(["Neighborhood", "Lat", "Lon"])?;
    for row in rows {
        writer.write_record([
            row.neighborhood.clone(),
            row.latitude.to_string(),
            row.longitude.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_market_parquet(path: &Path, rows: &[MarketRecord]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("year", DataType::Int32, false),
        Field::new("neighborhood", DataType::Utf8, false),
        Field::new("sale_price_sqr_foot", DataType::Float64, false),
        Field::new("housing_units", DataType::Int64, false),
        Field::new("gross_rent", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int32Array::from_iter_values(rows.iter().map(|r| r.year))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.neighborhood.as_str()))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.sale_price_sqr_foot))),
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.housing_units))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.gross_rent))),
        ],
    )
    .context("building record batch")?;

    let file = fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let dir = Path::new(OUTPUT_DIR);
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    let mut rng = SimpleRng::new(42);
    let market = market_rows(&mut rng);
    let geo = geo_rows();

    let market_csv = dir.join("sfo_neighborhoods_census_data.csv");
    let market_parquet = dir.join("sfo_neighborhoods_census_data.parquet");
    let coords_csv = dir.join("neighborhoods_coordinates.csv");

    write_market_csv(&market_csv, &market)?;
    write_market_parquet(&market_parquet, &market)?;
    write_geo_csv(&coords_csv, &geo)?;

    println!(
        "Wrote {} market rows to {} and {}",
        market.len(),
        market_csv.display(),
        market_parquet.display()
    );
    println!("Wrote {} coordinates to {}", geo.len(), coords_csv.display());
    Ok(())
}
