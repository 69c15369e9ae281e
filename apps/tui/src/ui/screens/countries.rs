use crate::app::App;
use crate::ui::widgets::palette::fill_color;
use crate::ui::widgets::tables::scroll_offset;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;
use tariff_core::map::Theme;
use tariff_core::{format_metric, map_metric, NOT_AVAILABLE};

pub fn render_countries(app: &App, f: &mut Frame<'_>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5)])
        .split(area);

    render_search_bar(app, f, chunks[0]);

    let countries = app.visible_countries();
    if countries.is_empty() {
        let block = Block::default()
            .title("Countries")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow));
        let paragraph = Paragraph::new("No countries match the current filter.")
            .block(block)
            .alignment(Alignment::Center);
        f.render_widget(paragraph, chunks[1]);
        return;
    }

    let metric = app.options.active_metric();
    let header = Row::new(vec![
        Cell::from("ID"),
        Cell::from("Country"),
        Cell::from("Region"),
        Cell::from("G20"),
        Cell::from(metric.label()),
    ])
    .style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    let total_rows = countries.len();
    let selected = app.country_index.min(total_rows - 1);
    let max_visible_rows = chunks[1].height.saturating_sub(3) as usize;
    let scroll_offset = scroll_offset(total_rows, max_visible_rows, selected);
    let background = Theme::default().background;

    let rows = countries
        .iter()
        .skip(scroll_offset)
        .take(max_visible_rows)
        .enumerate()
        .map(|(i, record)| {
            let mapped = map_metric(record, metric);
            let style = if i + scroll_offset == selected {
                Style::default()
                    .bg(Color::Rgb(0, 0, 238))
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            Row::new(vec![
                Cell::from(record.id.clone()),
                Cell::from(record.name.clone()),
                Cell::from(record.region.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string())),
                Cell::from(if record.is_g20() { "Yes" } else { "No" }),
                Cell::from(Span::styled(
                    format_metric(mapped.value, metric),
                    Style::default().fg(fill_color(mapped.color, background)),
                )),
            ])
            .style(style)
        });

    let widths = [
        Constraint::Length(4),
        Constraint::Min(16),
        Constraint::Length(18),
        Constraint::Length(4),
        Constraint::Length(18),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(format!(
                    "Countries ({} of {}) | {}",
                    selected + 1,
                    total_rows,
                    app.options.region.label()
                ))
                .borders(Borders::ALL),
        )
        .column_spacing(1);

    f.render_widget(table, chunks[1]);
}

fn render_search_bar(app: &App, f: &mut Frame<'_>, area: Rect) {
    let border = if app.searching {
        Color::Green
    } else {
        Color::DarkGray
    };
    let line = if app.searching || !app.search_query.is_empty() {
        let cursor = if app.searching { "_" } else { "" };
        TextLine::from(vec![
            Span::styled("Search: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{}{cursor}", app.search_query),
                Style::default().fg(Color::White),
            ),
        ])
    } else {
        TextLine::from(Span::styled(
            "Press / to search, Enter for details",
            Style::default().fg(Color::Gray),
        ))
    };

    let paragraph = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    );
    f.render_widget(paragraph, area);
}
