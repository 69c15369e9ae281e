use crate::app::App;
use crate::ui::widgets::tables::scroll_offset;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap};
use chrono::{Local, NaiveDate};
use ratatui::Frame;
use tariff_core::timeline::EventCategory;
use tariff_core::Timeline;

/// Most recent event and how many are still ahead of `today`.
pub fn timeline_summary(timeline: &Timeline, today: NaiveDate) -> String {
    let Some(latest) = timeline.latest() else {
        return String::new();
    };
    format!(
        " Latest: {} {} | {} upcoming ",
        latest.date.format("%Y-%m-%d"),
        latest.title,
        timeline.upcoming(today).len()
    )
}

const fn category_color(category: EventCategory) -> Color {
    match category {
        EventCategory::Announcement => Color::Cyan,
        EventCategory::Implementation => Color::Yellow,
        EventCategory::Escalation => Color::Red,
        EventCategory::Pause => Color::Gray,
        EventCategory::Agreement => Color::Green,
        EventCategory::Retaliation => Color::Magenta,
    }
}

pub fn render_timeline(app: &App, f: &mut Frame<'_>, area: Rect) {
    let events = app.timeline.events();
    if events.is_empty() {
        let paragraph = Paragraph::new("No timeline events available.").block(
            Block::default()
                .title("Timeline")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        );
        f.render_widget(paragraph, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(7)])
        .split(area);

    let total_rows = events.len();
    let selected = app.timeline_index.min(total_rows - 1);
    let max_visible_rows = chunks[0].height.saturating_sub(3) as usize;
    let scroll_offset = scroll_offset(total_rows, max_visible_rows, selected);

    let header = Row::new(vec![
        Cell::from("Date"),
        Cell::from("Category"),
        Cell::from("Event"),
        Cell::from("Countries"),
    ])
    .style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    let rows = events
        .iter()
        .skip(scroll_offset)
        .take(max_visible_rows)
        .enumerate()
        .map(|(i, event)| {
            let style = if i + scroll_offset == selected {
                Style::default()
                    .bg(Color::Rgb(0, 0, 238))
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let countries = if event.is_global() {
                "Global".to_string()
            } else {
                event.countries.join(", ")
            };

            Row::new(vec![
                Cell::from(event.date.format("%Y-%m-%d").to_string()),
                Cell::from(Span::styled(
                    event.category.label(),
                    Style::default().fg(category_color(event.category)),
                )),
                Cell::from(event.title.clone()),
                Cell::from(countries),
            ])
            .style(style)
        });

    let widths = [
        Constraint::Length(10),
        Constraint::Length(14),
        Constraint::Min(20),
        Constraint::Length(16),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(format!("Timeline ({} of {})", selected + 1, total_rows))
                .borders(Borders::ALL),
        )
        .column_spacing(1);
    f.render_widget(table, chunks[0]);

    let event = &events[selected];
    let description = Paragraph::new(Text::from(vec![
        TextLine::from(Span::styled(
            event.title.clone(),
            Style::default()
                .fg(category_color(event.category))
                .add_modifier(Modifier::BOLD),
        )),
        TextLine::from(event.description.clone()),
    ]))
    .block(
        Block::default()
            .title(timeline_summary(&app.timeline, Local::now().date_naive()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    )
    .wrap(Wrap { trim: true });
    f.render_widget(description, chunks[1]);
}
