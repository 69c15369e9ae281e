use crate::ui::widgets::popup::{centered_rect, ClearWidget};
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

pub fn render_help_popup(f: &mut Frame<'_>, area: Rect) {
    let popup_area = centered_rect(70, 80, area);
    f.render_widget(ClearWidget, popup_area);

    let help_block = Block::default()
        .title("== Help & Keyboard Shortcuts ==")
        .title_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let help_paragraph = Paragraph::new(Text::from(build_help_lines()))
        .block(help_block)
        .wrap(Wrap { trim: true });
    f.render_widget(help_paragraph, popup_area);

    let hint = Paragraph::new(TextLine::from(Span::styled(
        "Press ? or Esc to close",
        Style::default().fg(Color::Gray),
    )))
    .alignment(Alignment::Center);
    let hint_area = Rect {
        x: popup_area.x,
        y: popup_area.y + popup_area.height.saturating_sub(2),
        width: popup_area.width,
        height: 1,
    };
    f.render_widget(hint, hint_area);
}

fn section(title: &'static str) -> TextLine<'static> {
    TextLine::from(Span::styled(
        title,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ))
}

fn key_line(key: &'static str, action: &'static str) -> TextLine<'static> {
    TextLine::from(vec![
        Span::styled(
            format!("  {key:<12}"),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(action),
    ])
}

fn build_help_lines() -> Vec<TextLine<'static>> {
    vec![
        section("Global"),
        key_line("Tab/S-Tab", "Switch between Map, Countries and Timeline"),
        key_line("m / M", "Next / previous metric"),
        key_line("t", "Tariff mode, press again to flip direction"),
        key_line("r", "Cycle region filter (All, G20, Non-G20, regions)"),
        key_line("l", "Sign up for tariff updates"),
        key_line("R", "Retry after a failed load"),
        key_line("q", "Quit"),
        TextLine::from(""),
        section("Map"),
        key_line("←/→ n/p", "Move focus between countries"),
        key_line("Enter", "Open details for the focused country"),
        key_line("Mouse", "Hover for a tooltip, click for details"),
        TextLine::from(""),
        section("Countries"),
        key_line("↑/↓", "Navigate"),
        key_line("PgUp/PgDn", "Jump 5 rows"),
        key_line("/", "Fuzzy search by name or code"),
        key_line("Enter", "Open details"),
        TextLine::from(""),
        section("Details"),
        key_line("d", "Request a tariff impact report"),
        key_line("Esc", "Back"),
        TextLine::from(""),
        section("Forms"),
        key_line("Tab/↑/↓", "Move between fields"),
        key_line("Enter", "Submit"),
        key_line("Esc", "Close"),
    ]
}
