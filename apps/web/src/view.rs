use ratzilla::ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line as TextLine, Span, Text},
    widgets::{
        canvas::{Canvas, Circle, Map, MapResolution, Points},
        Block, Borders, Clear, Paragraph, Wrap,
    },
    Frame,
};
use tariff_core::color::{metric_value, Rgb};
use tariff_core::format::format_list;
use tariff_core::lead::LeadField;
use tariff_core::map::{ChoroplethChart, MapFeature};
use tariff_core::{format_metric, CountryRecord, Metric, PageState, ToastKind, NOT_AVAILABLE};

use crate::animation::pulse_radius;
use crate::state::WebState;

const MARKER_RADIUS_DEG: f64 = 3.0;

const fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}

pub fn render(state: &WebState, f: &mut Frame<'_>) {
    let area = f.area();
    let block = Block::default()
        .title("U.S. Tariffs 2025 Tracker")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let inner = block.inner(area).inner(Margin::new(1, 1));
    f.render_widget(block, area);

    match state.dataset.state() {
        PageState::Loading => {
            let paragraph = Paragraph::new(Text::from(TextLine::from("Loading countries.json...")))
                .alignment(Alignment::Center);
            f.render_widget(paragraph, inner);
        }
        PageState::Failed(message) => {
            let paragraph = Paragraph::new(Text::from(vec![
                TextLine::from(Span::styled(
                    "Could not load country data",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )),
                TextLine::from(message.clone()),
                TextLine::from(""),
                TextLine::from(Span::styled("Press R to retry", Style::default().fg(Color::Gray))),
            ]))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
            f.render_widget(paragraph, inner);
        }
        PageState::Ready(_) => render_dashboard(state, f, inner),
    }

    if state.lead_form.is_some() {
        render_lead_form(state, f, area);
    }
    render_toast(state, f, area);
}

fn render_dashboard(state: &WebState, f: &mut Frame<'_>, area: Rect) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(12),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(state, f, layout[0]);

    let content = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(64), Constraint::Percentage(36)])
        .split(layout[1]);

    render_map_panel(state, f, content[0]);
    render_details_panel(state, f, content[1]);

    let hints = Paragraph::new(TextLine::from(vec![
        Span::styled("←/→", Style::default().fg(Color::Gray)),
        Span::raw(" focus  "),
        Span::styled("Enter", Style::default().fg(Color::Gray)),
        Span::raw(" details  "),
        Span::styled("m/M", Style::default().fg(Color::Gray)),
        Span::raw(" metric  "),
        Span::styled("t", Style::default().fg(Color::Gray)),
        Span::raw(" tariffs  "),
        Span::styled("r", Style::default().fg(Color::Gray)),
        Span::raw(" region  "),
        Span::styled("l", Style::default().fg(Color::Gray)),
        Span::raw(" updates"),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(hints, layout[2]);
}

fn render_header(state: &WebState, f: &mut Frame<'_>, area: Rect) {
    let metric = state.options.active_metric();
    let mut spans = vec![
        Span::styled(metric.label(), Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        Span::styled(state.options.region.label(), Style::default().fg(Color::Gray)),
    ];
    if let Some(tariff) = state.options.tariff {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(tariff.label(), Style::default().fg(Color::Yellow)));
    }
    if let Some(tooltip) = state.tooltip.as_deref() {
        spans.push(Span::raw("  |  "));
        spans.push(Span::raw(tooltip.to_string()));
    } else if !state.status.is_empty() {
        spans.push(Span::raw("  |  "));
        spans.push(Span::styled(state.status.clone(), Style::default().fg(Color::Red)));
    }

    let paragraph = Paragraph::new(TextLine::from(spans)).block(
        Block::default()
            .title("Overview")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(paragraph, area);
}

fn marker_points(feature: &MapFeature) -> Vec<(f64, f64)> {
    let mut points = Vec::new();
    for step_x in -4_i32..=4 {
        for step_y in -4_i32..=4 {
            let dx = f64::from(step_x) * MARKER_RADIUS_DEG / 4.0;
            let dy = f64::from(step_y) * MARKER_RADIUS_DEG / 4.0;
            if dx.hypot(dy) <= MARKER_RADIUS_DEG {
                points.push((feature.lon + dx, feature.lat + dy));
            }
        }
    }
    points
}

fn render_map_panel(state: &WebState, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title("World")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let Some(chart) = state.chart() else {
        let paragraph = Paragraph::new(state.status.clone())
            .block(block)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Red));
        f.render_widget(paragraph, area);
        return;
    };

    f.render_widget(world_canvas(chart, state.pulse_phase).block(block), area);
}

fn world_canvas(
    chart: &ChoroplethChart,
    pulse_phase: f64,
) -> Canvas<'static, impl Fn(&mut ratzilla::ratatui::widgets::canvas::Context<'_>)> {
    let theme = chart.theme();
    let outline = color(theme.outline);
    let highlight = color(theme.highlight);
    let markers: Vec<(Vec<(f64, f64)>, Color)> = chart
        .scene()
        .features
        .iter()
        .map(|feature| (marker_points(feature), color(feature.fill.over(theme.background))))
        .collect();
    let focused = chart
        .hovered_feature()
        .map(|feature| (feature.lon, feature.lat));
    let radius = pulse_radius(pulse_phase);

    Canvas::default()
        .background_color(color(theme.background))
        .marker(Marker::Braille)
        .x_bounds([-180.0, 180.0])
        .y_bounds([-90.0, 90.0])
        .paint(move |ctx| {
            ctx.draw(&Map {
                color: outline,
                resolution: MapResolution::High,
            });
            ctx.layer();
            for (points, fill) in &markers {
                ctx.draw(&Points {
                    coords: points.as_slice(),
                    color: *fill,
                });
            }
            if let Some((x, y)) = focused {
                ctx.draw(&Circle {
                    x,
                    y,
                    radius,
                    color: highlight,
                });
            }
        })
}

fn detail_line(label: &str, value: String) -> TextLine<'static> {
    TextLine::from(vec![
        Span::styled(format!("{label}: "), Style::default().fg(Color::Gray)),
        Span::styled(value, Style::default().fg(Color::White)),
    ])
}

fn record_lines(record: &CountryRecord) -> Vec<TextLine<'static>> {
    let mut lines = vec![
        TextLine::from(Span::styled(
            format!("{} ({})", record.name, record.id),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        detail_line(
            "Region",
            record.region.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        ),
        detail_line("G20", if record.is_g20() { "Yes" } else { "No" }.to_string()),
        TextLine::from(""),
    ];
    lines.extend(
        Metric::ALL
            .iter()
            .map(|metric| detail_line(metric.label(), format_metric(metric_value(record, *metric), *metric))),
    );
    lines.extend([
        TextLine::from(""),
        detail_line("Sectors", format_list(&record.impacted_sectors)),
        detail_line("Insights", format_list(&record.key_insights)),
        detail_line("Retaliatory", format_list(&record.national_reaction.retaliatory)),
        detail_line(
            "Domestic support",
            format_list(&record.national_reaction.domestic_support),
        ),
        TextLine::from(""),
        TextLine::from(Span::styled(
            "d: request report   Esc: close",
            Style::default().fg(Color::Gray),
        )),
    ]);
    lines
}

fn render_details_panel(state: &WebState, f: &mut Frame<'_>, area: Rect) {
    let lines = state.selected_record().map_or_else(
        || {
            vec![TextLine::from(Span::styled(
                "Focus a country and press Enter to see its trade profile.",
                Style::default().fg(Color::Gray),
            ))]
        },
        record_lines,
    );

    let paragraph = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .title("Country")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Gray)),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn popup_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_lead_form(state: &WebState, f: &mut Frame<'_>, area: Rect) {
    let Some(form) = state.lead_form.as_ref() else {
        return;
    };
    let popup = popup_rect(56, 14, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .title(form.title.clone())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
        ])
        .split(inner);

    for (field, row) in LeadField::ALL.into_iter().zip(rows.iter()) {
        let focused = form.focus == field;
        let paragraph = Paragraph::new(form.value(field).to_string()).block(
            Block::default()
                .title(field.label())
                .borders(Borders::ALL)
                .border_style(Style::default().fg(if focused { Color::Green } else { Color::DarkGray })),
        );
        f.render_widget(paragraph, *row);
    }

    let hint = if state.lead_submitting {
        "Sending..."
    } else {
        "Tab: next field   Enter: submit   Esc: close"
    };
    f.render_widget(
        Paragraph::new(hint)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray)),
        rows[3],
    );
}

fn render_toast(state: &WebState, f: &mut Frame<'_>, area: Rect) {
    let Some(toast) = state.toast.as_ref() else {
        return;
    };
    let fg = match toast.kind {
        ToastKind::Info => Color::Cyan,
        ToastKind::Success => Color::Green,
        ToastKind::Error => Color::Red,
    };
    let width = u16::try_from(toast.message.chars().count() + 4)
        .unwrap_or(u16::MAX)
        .clamp(20, area.width.max(20));
    let toast_area = Rect {
        x: area.x + area.width.saturating_sub(width + 2),
        y: area.y + area.height.saturating_sub(4),
        width: width.min(area.width),
        height: 3.min(area.height),
    };

    f.render_widget(Clear, toast_area);
    f.render_widget(
        Paragraph::new(toast.message.clone())
            .style(Style::default().fg(fg))
            .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(fg))),
        toast_area,
    );
}
