use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use tariff_core::color::{metric_color, metric_max, NEUTRAL_GRAY};
use tariff_core::{format_metric, Metric, Rgb, NOT_AVAILABLE};

use crate::ui::widgets::palette::fill_color;

const STEPS: usize = 6;
const SWATCH: &str = "██";

/// Sample values across the color scale, low to high.
#[allow(clippy::cast_precision_loss)]
pub fn legend_samples(metric: Metric) -> Vec<f64> {
    let max = metric_max(metric);
    let ramp = (1..=STEPS).map(|step| max * step as f64 / STEPS as f64);

    if metric == Metric::UsTradeBalance {
        let mut samples: Vec<f64> = ramp.clone().rev().map(|value| -value).collect();
        samples.extend(ramp);
        samples
    } else {
        ramp.collect()
    }
}

/// One-line legend: the scale for `metric` plus the no-data swatch.
pub fn legend_line(metric: Metric, background: Rgb) -> Line<'static> {
    let label = Style::default().fg(Color::Gray);
    let samples = legend_samples(metric);

    let (low, high) = if metric == Metric::UsTradeBalance {
        ("Deficit ".to_string(), " Surplus".to_string())
    } else {
        (
            format!("{} ", format_metric(Some(0.0), metric)),
            format!(" {}+", format_metric(Some(metric_max(metric)), metric)),
        )
    };

    let mut spans = vec![Span::styled(low, label)];
    spans.extend(samples.into_iter().map(|value| {
        Span::styled(
            SWATCH,
            Style::default().fg(fill_color(metric_color(Some(value), metric), background)),
        )
    }));
    spans.push(Span::styled(high, label));
    spans.push(Span::raw("   "));
    spans.push(Span::styled(
        SWATCH,
        Style::default().fg(fill_color(NEUTRAL_GRAY, background)),
    ));
    spans.push(Span::styled(format!(" {NOT_AVAILABLE}"), label));

    Line::from(spans)
}
