use crate::domain::Metric;

pub const NOT_AVAILABLE: &str = "N/A";

pub fn format_metric(value: Option<f64>, metric: Metric) -> String {
    let Some(value) = value.filter(|value| value.is_finite()) else {
        return NOT_AVAILABLE.to_string();
    };

    match metric {
        Metric::Gdp2023 | Metric::Gdp2024 => format!("${}B", group_thousands(value, 1)),
        Metric::UsTradeBalance => {
            let sign = if value < 0.0 { "-" } else { "" };
            format!("{sign}${}M", group_thousands(value.abs(), 0))
        }
        Metric::ShareOfUsImports
        | Metric::ShareOfUsExports
        | Metric::ReciprocalTariff
        | Metric::TariffsToUs => format!("{value:.1}%"),
    }
}

/// `1234567.891` with one decimal -> `1,234,567.9`.
fn group_thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (whole, fraction) = formatted
        .split_once('.')
        .map_or((formatted.as_str(), None), |(whole, fraction)| {
            (whole, Some(fraction))
        });

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    match fraction {
        Some(fraction) => format!("{sign}{grouped}.{fraction}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Renders an optional list, `N/A` when empty.
pub fn format_list(items: &[String]) -> String {
    if items.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        items.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_values_render_as_not_available() {
        for metric in Metric::ALL {
            assert_eq!(format_metric(None, metric), "N/A");
        }
        assert_eq!(format_metric(Some(f64::NAN), Metric::Gdp2023), "N/A");
    }

    #[test]
    fn currency_and_percent_formats() {
        assert_eq!(format_metric(Some(2107.0), Metric::Gdp2023), "$2,107.0B");
        assert_eq!(format_metric(Some(-60_801.0), Metric::UsTradeBalance), "-$60,801M");
        assert_eq!(format_metric(Some(295_401.6), Metric::UsTradeBalance), "$295,402M");
        assert_eq!(format_metric(Some(25.0), Metric::ReciprocalTariff), "25.0%");
        assert_eq!(format_metric(Some(0.26), Metric::ShareOfUsImports), "0.3%");
    }

    #[test]
    fn grouping_handles_small_and_large_numbers() {
        assert_eq!(group_thousands(999.0, 0), "999");
        assert_eq!(group_thousands(1000.0, 0), "1,000");
        assert_eq!(group_thousands(1_234_567.891, 1), "1,234,567.9");
        assert_eq!(group_thousands(-4500.0, 0), "-4,500");
    }

    #[test]
    fn lists_join_or_fall_back() {
        assert_eq!(format_list(&[]), "N/A");
        assert_eq!(
            format_list(&["Autos".to_string(), "Steel".to_string()]),
            "Autos, Steel"
        );
    }
}
