use eframe::egui::Color32;
use palette::{LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Named chart colors
// ---------------------------------------------------------------------------

pub const OLIVE_DRAB: Color32 = Color32::from_rgb(107, 142, 35);
pub const MIDNIGHT_BLUE: Color32 = Color32::from_rgb(25, 25, 112);
pub const INDIGO: Color32 = Color32::from_rgb(75, 0, 130);
pub const DARK_SLATE_GRAY: Color32 = Color32::from_rgb(47, 79, 79);
pub const LIGHT_SLATE_GRAY: Color32 = Color32::from_rgb(119, 136, 153);
pub const NEIGHBORHOOD_LINE: Color32 = Color32::from_rgb(48, 162, 218);

fn to_color32(rgb: Srgb) -> Color32 {
    let rgb: Srgb<u8> = rgb.into_format();
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}

// ---------------------------------------------------------------------------
// Continuous scales: value in [min, max] → Color32
// ---------------------------------------------------------------------------

/// Piecewise-linear colour scale over evenly spaced stops, interpolated in
/// linear RGB.
#[derive(Debug, Clone)]
pub struct ColorScale {
    pub name: &'static str,
    stops: Vec<LinSrgb>,
}

impl ColorScale {
    fn from_rgb(name: &'static str, stops: &[(u8, u8, u8)]) -> Self {
        let stops = stops
            .iter()
            .map(|&(r, g, b)| Srgb::new(r, g, b).into_format::<f32>().into_linear())
            .collect();
        Self { name, stops }
    }

    /// Cyclical dark-centred blue → black → red scale used for rent maps.
    pub fn ice_fire() -> Self {
        Self::from_rgb(
            "IceFire",
            &[
                (0, 0, 0),
                (0, 55, 120),
                (40, 135, 200),
                (190, 230, 245),
                (0, 0, 0),
                (245, 200, 130),
                (225, 90, 40),
                (140, 20, 20),
                (0, 0, 0),
            ],
        )
    }

    /// Sequential black → purple → orange → pale yellow scale.
    pub fn inferno() -> Self {
        Self::from_rgb(
            "Inferno",
            &[
                (0, 0, 4),
                (40, 11, 84),
                (101, 21, 110),
                (159, 42, 99),
                (212, 72, 66),
                (245, 125, 21),
                (250, 193, 39),
                (252, 255, 164),
            ],
        )
    }

    /// Colour at position `t` in `[0, 1]`; values outside are clamped.
    pub fn sample(&self, t: f64) -> Color32 {
        let Some(last) = self.stops.len().checked_sub(1) else {
            return Color32::GRAY;
        };
        if last == 0 {
            return to_color32(Srgb::from_linear(self.stops[0]));
        }
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let pos = t * last as f64;
        let i = (pos.floor() as usize).min(last - 1);
        let frac = (pos - i as f64) as f32;
        let mixed = self.stops[i].mix(self.stops[i + 1], frac);
        to_color32(Srgb::from_linear(mixed))
    }

    /// Colour of `value` on a scale spanning `[min, max]`.
    pub fn color_for(&self, value: f64, min: f64, max: f64) -> Color32 {
        self.sample(normalize(value, min, max))
    }
}

/// Map `value` into `[0, 1]` relative to `[min, max]`; a flat range maps to 0.5.
pub fn normalize(value: f64, min: f64, max: f64) -> f64 {
    let range = max - min;
    if !range.is_finite() || range.abs() < f64::EPSILON {
        0.5
    } else {
        (value - min) / range
    }
}
