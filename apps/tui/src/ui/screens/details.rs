use crate::app::App;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;
use tariff_core::color::metric_value;
use tariff_core::format::format_list;
use tariff_core::{format_metric, CountryRecord, Metric, NOT_AVAILABLE};

pub fn render_details(app: &App, f: &mut Frame<'_>, area: Rect) {
    let Some(record) = app.selected_record() else {
        let paragraph = Paragraph::new("No country selected.").block(
            Block::default()
                .title("Details")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        );
        f.render_widget(paragraph, area);
        return;
    };

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let block = Block::default()
        .title(format!(" {} ({}) ", record.name, record.id))
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let paragraph = Paragraph::new(Text::from(detail_lines(record)))
        .block(block)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, columns[0]);

    render_country_timeline(app, record, f, columns[1]);
}

fn info_line(label: &str, value: String) -> TextLine<'static> {
    TextLine::from(vec![
        Span::styled(format!("{label}: "), Style::default().fg(Color::Gray)),
        Span::styled(value, Style::default().fg(Color::White)),
    ])
}

fn section(title: &str) -> TextLine<'static> {
    TextLine::from(Span::styled(
        title.to_string(),
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    ))
}

/// Every field of the record, `N/A` where missing.
pub fn detail_lines(record: &CountryRecord) -> Vec<TextLine<'static>> {
    let groups: Vec<String> = record
        .policy_groups
        .iter()
        .map(|group| group.as_str().to_string())
        .collect();

    let mut lines = vec![
        info_line(
            "Region",
            record
                .region
                .clone()
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        ),
        info_line("Policy groups", format_list(&groups)),
        TextLine::from(""),
        section("Economy"),
    ];
    lines.extend(Metric::ALL.iter().map(|metric| {
        info_line(
            metric.label(),
            format_metric(metric_value(record, *metric), *metric),
        )
    }));

    lines.extend([
        TextLine::from(""),
        section("Impacted sectors"),
        TextLine::from(format_list(&record.impacted_sectors)),
        TextLine::from(""),
        section("Key insights"),
    ]);
    if record.key_insights.is_empty() {
        lines.push(TextLine::from(NOT_AVAILABLE));
    } else {
        lines.extend(
            record
                .key_insights
                .iter()
                .map(|insight| TextLine::from(format!("- {insight}"))),
        );
    }

    lines.extend([
        TextLine::from(""),
        section("National reaction"),
        info_line(
            "Retaliatory",
            format_list(&record.national_reaction.retaliatory),
        ),
        info_line(
            "Domestic support",
            format_list(&record.national_reaction.domestic_support),
        ),
    ]);
    lines
}

fn render_country_timeline(app: &App, record: &CountryRecord, f: &mut Frame<'_>, area: Rect) {
    let events = app.timeline.events_for(&record.id, false);
    let mut lines = Vec::new();
    if events.is_empty() {
        lines.push(TextLine::from(Span::styled(
            "No country-specific events",
            Style::default().fg(Color::Gray),
        )));
    }
    for event in events {
        lines.push(TextLine::from(vec![
            Span::styled(
                event.date.format("%Y-%m-%d ").to_string(),
                Style::default().fg(Color::Gray),
            ),
            Span::styled(
                event.title.clone(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ]));
        lines.push(TextLine::from(event.description.clone()));
        lines.push(TextLine::from(""));
    }

    lines.push(TextLine::from(vec![
        Span::styled(
            "d",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(": Request report   "),
        Span::styled(
            "Esc",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(": Back"),
    ]));

    let paragraph = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .title(" Timeline ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(lines: &[TextLine<'_>]) -> String {
        lines
            .iter()
            .map(|line| {
                line.spans
                    .iter()
                    .map(|span| span.content.as_ref())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn missing_fields_render_as_not_available() {
        let record = CountryRecord::new("ZZ", "Nowhere");
        let rendered = text(&detail_lines(&record));

        assert!(rendered.contains("Region: N/A"));
        assert!(rendered.contains("Reciprocal Tariff: N/A"));
        assert!(rendered.contains("Retaliatory: N/A"));
    }

    #[test]
    fn present_fields_are_formatted() {
        let mut record = CountryRecord::new("VN", "Vietnam");
        record.region = Some("Asia".to_string());
        record.reciprocal_tariff = Some(46.0);
        record.impacted_sectors = vec!["Textiles".to_string(), "Electronics".to_string()];

        let rendered = text(&detail_lines(&record));
        assert!(rendered.contains("Region: Asia"));
        assert!(rendered.contains("Reciprocal Tariff: 46.0%"));
        assert!(rendered.contains("Textiles, Electronics"));
    }
}
