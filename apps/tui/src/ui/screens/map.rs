use crate::app::App;
use crate::ui::widgets::legend::legend_line;
use crate::ui::widgets::world_map::render_world_map;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;
use tariff_core::color::metric_value;
use tariff_core::map::Theme;
use tariff_core::{format_metric, CountryRecord};

const SIDE_PANEL_WIDTH: u16 = 34;
const TOP_COUNT: usize = 8;

pub fn render_map(app: &App, f: &mut Frame<'_>, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(SIDE_PANEL_WIDTH)])
        .split(area);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(1)])
        .split(columns[0]);

    let metric = app.options.active_metric();
    let title = app.options.tariff.map_or_else(
        || format!(" {} ", metric.label()),
        |tariff| format!(" {} ({}) ", metric.label(), tariff.label()),
    );
    let block = Block::default()
        .title(title)
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    match app.map.chart() {
        Some(chart) => {
            let inner = render_world_map(f, rows[0], chart, block);
            app.map_area.set(inner);
            f.render_widget(
                Paragraph::new(legend_line(metric, chart.theme().background))
                    .alignment(Alignment::Center),
                rows[1],
            );
        }
        None => {
            app.map_area.set(Rect::default());
            let message = app.map.last_error().map_or_else(
                || "Map is not ready".to_string(),
                |err| format!("Map unavailable: {err}"),
            );
            let paragraph = Paragraph::new(Span::styled(message, Style::default().fg(Color::Red)))
                .block(block)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true });
            f.render_widget(paragraph, rows[0]);
            f.render_widget(
                Paragraph::new(legend_line(metric, Theme::default().background))
                    .alignment(Alignment::Center),
                rows[1],
            );
        }
    }

    render_side_panel(app, f, columns[1]);
}

/// Highest values for the active metric within the region filter.
pub fn top_countries(app: &App, count: usize) -> Vec<(&CountryRecord, f64)> {
    let metric = app.options.active_metric();
    let mut ranked: Vec<(&CountryRecord, f64)> = app
        .records()
        .iter()
        .filter(|record| app.options.region.matches(record))
        .filter_map(|record| metric_value(record, metric).map(|value| (record, value)))
        .filter(|(_, value)| value.is_finite())
        .collect();
    ranked.sort_by(|(_, a), (_, b)| b.abs().total_cmp(&a.abs()));
    ranked.truncate(count);
    ranked
}

fn render_side_panel(app: &App, f: &mut Frame<'_>, area: Rect) {
    let metric = app.options.active_metric();
    let label_style = Style::default().fg(Color::Gray);
    let heading = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    let mut lines = vec![
        TextLine::from(vec![
            Span::styled("Region: ", label_style),
            Span::raw(app.options.region.label()),
        ]),
        TextLine::from(""),
    ];

    let focused = app
        .map
        .chart()
        .and_then(|chart| chart.hovered_feature().or_else(|| chart.focused_feature()));
    if let Some(feature) = focused {
        lines.push(TextLine::from(Span::styled(feature.name.clone(), heading)));
        lines.push(TextLine::from(format_metric(feature.value, metric)));
        if feature.interactive {
            lines.push(TextLine::from(Span::styled(
                "Enter or click for details",
                label_style,
            )));
        }
        lines.push(TextLine::from(""));
    }

    let heading_text = if metric == tariff_core::Metric::UsTradeBalance {
        "Largest balances"
    } else {
        "Top countries"
    };
    lines.push(TextLine::from(Span::styled(heading_text, heading)));
    let top = top_countries(app, TOP_COUNT);
    if top.is_empty() {
        lines.push(TextLine::from(Span::styled("No data", label_style)));
    }
    for (index, (record, value)) in top.into_iter().enumerate() {
        lines.push(TextLine::from(vec![
            Span::styled(format!("{:>2}. ", index + 1), label_style),
            Span::raw(record.name.clone()),
            Span::styled(
                format!(" {}", format_metric(Some(value), metric)),
                Style::default().fg(Color::White),
            ),
        ]));
    }

    let paragraph = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .title(" Overview ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}
