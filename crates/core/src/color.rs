use serde::{Deserialize, Serialize};

use crate::domain::{CountryRecord, Metric};

/// Opaque color used by terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// A base hue with an intensity in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub rgb: Rgb,
    pub alpha: f64,
}

impl Rgba {
    pub const fn new(rgb: Rgb, alpha: f64) -> Self {
        Self { rgb, alpha }
    }

    /// Alpha-blends onto an opaque background.
    pub fn over(self, background: Rgb) -> Rgb {
        let alpha = self.alpha.clamp(0.0, 1.0);
        Rgb::new(
            blend_channel(self.rgb.r, background.r, alpha),
            blend_channel(self.rgb.g, background.g, alpha),
            blend_channel(self.rgb.b, background.b, alpha),
        )
    }

    pub fn to_css(self) -> String {
        format!(
            "rgba({}, {}, {}, {:.2})",
            self.rgb.r, self.rgb.g, self.rgb.b, self.alpha
        )
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn blend_channel(fg: u8, bg: u8, alpha: f64) -> u8 {
    let value = f64::from(fg).mul_add(alpha, f64::from(bg) * (1.0 - alpha));
    value.round().clamp(0.0, 255.0) as u8
}

pub const NEUTRAL_GRAY: Rgba = Rgba::new(Rgb::new(0xD1, 0xD5, 0xDB), 1.0);
pub const DEFICIT_RED: Rgb = Rgb::new(0xEF, 0x44, 0x44);
pub const SURPLUS_BLUE: Rgb = Rgb::new(0x3B, 0x82, 0xF6);
pub const TARIFF_ORANGE: Rgb = Rgb::new(0xF9, 0x73, 0x16);
pub const DEFAULT_TEAL: Rgb = Rgb::new(0x14, 0xB8, 0xA6);

pub const MIN_INTENSITY: f64 = 0.1;
pub const MAX_INTENSITY: f64 = 0.9;

/// Fixed color-scale denominator for each metric.
pub const fn metric_max(metric: Metric) -> f64 {
    match metric {
        Metric::Gdp2023 | Metric::Gdp2024 => 30_000.0,
        Metric::UsTradeBalance => 300_000.0,
        Metric::ShareOfUsImports | Metric::ShareOfUsExports => 20.0,
        Metric::ReciprocalTariff | Metric::TariffsToUs => 50.0,
    }
}

pub fn metric_value(record: &CountryRecord, metric: Metric) -> Option<f64> {
    match metric {
        Metric::Gdp2023 => record.gdp.actual_2023,
        Metric::Gdp2024 => record.gdp.estimate_2024,
        Metric::UsTradeBalance => record.us_trade_balance,
        Metric::ShareOfUsImports => record.share_of_us_imports,
        Metric::ShareOfUsExports => record.share_of_us_exports,
        Metric::ReciprocalTariff => record.reciprocal_tariff,
        Metric::TariffsToUs => record.tariffs_to_us,
    }
}

fn intensity(magnitude: f64, max: f64) -> f64 {
    (magnitude / max).clamp(MIN_INTENSITY, MAX_INTENSITY)
}

pub fn metric_color(value: Option<f64>, metric: Metric) -> Rgba {
    let Some(value) = value.filter(|value| value.is_finite()) else {
        return NEUTRAL_GRAY;
    };

    let max = metric_max(metric);
    match metric {
        Metric::UsTradeBalance => {
            let hue = if value < 0.0 { DEFICIT_RED } else { SURPLUS_BLUE };
            Rgba::new(hue, intensity(value.abs().min(max), max))
        }
        Metric::ReciprocalTariff | Metric::TariffsToUs => {
            Rgba::new(TARIFF_ORANGE, intensity(value, max))
        }
        _ => Rgba::new(DEFAULT_TEAL, intensity(value, max)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MappedValue {
    pub value: Option<f64>,
    pub color: Rgba,
}

pub fn map_metric(record: &CountryRecord, metric: Metric) -> MappedValue {
    let value = metric_value(record, metric);
    MappedValue {
        value,
        color: metric_color(value, metric),
    }
}
