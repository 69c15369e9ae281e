// Terminal rendering for the tariff tracker.

pub mod screens;
pub mod widgets;

use crate::app::state::AppScreen;
use crate::app::App;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Tabs, Wrap};
use ratatui::Frame;
use tariff_core::ToastKind;
use throbber_widgets_tui::Throbber;

use crate::ui::widgets::popup::{corner_rect, ClearWidget};

pub fn ui(app: &App, f: &mut Frame<'_>) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Min(5),    // Content
            Constraint::Length(3), // Status
            Constraint::Length(1), // Shortcuts hint
        ])
        .split(f.area().inner(Margin::new(1, 0)));

    render_tabs(app, f, layout[0]);

    if app.is_loading() {
        render_loading(app, f, layout[1]);
    } else if let Some(message) = app.load_error() {
        render_load_error(message, f, layout[1]);
    } else {
        match app.screen {
            AppScreen::Map => screens::map::render_map(app, f, layout[1]),
            AppScreen::Countries => screens::countries::render_countries(app, f, layout[1]),
            AppScreen::Timeline => screens::timeline::render_timeline(app, f, layout[1]),
            AppScreen::CountryDetails => screens::details::render_details(app, f, layout[1]),
        }
    }

    render_status_section(app, f, layout[2]);
    render_shortcuts(app, f, layout[3]);

    if app.show_help {
        let area = f.area();
        screens::help::render_help_popup(f, area);
    }
    if let Some(form) = app.lead_form.as_ref() {
        screens::lead_form::render_lead_form(app, form, f);
    }
    render_toast(app, f);
}

fn render_tabs(app: &App, f: &mut Frame<'_>, area: Rect) {
    let titles: Vec<&str> = AppScreen::TABS.iter().map(|tab| tab.label()).collect();
    let selected = app
        .screen
        .tab_index()
        .or_else(|| app.previous_screen.tab_index())
        .unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .block(
            Block::default()
                .title("== Tariff Tracker ==")
                .title_style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                )
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    f.render_widget(tabs, area);
}

fn render_loading(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let row = Rect {
        x: inner.x + inner.width.saturating_sub(32) / 2,
        y: inner.y + inner.height / 2,
        width: inner.width.min(32),
        height: 1,
    };

    let throbber = Throbber::default()
        .label(format!("Loading {}", app.actions.source().describe()))
        .style(Style::default().fg(Color::Cyan))
        .throbber_set(throbber_widgets_tui::BRAILLE_SIX);
    f.render_stateful_widget(throbber, row, &mut app.throbber.clone());
}

fn render_load_error(message: &str, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(" Error ")
        .title_style(Style::default().fg(Color::Red))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    let text = Text::from(vec![
        TextLine::from(""),
        TextLine::from(Span::styled(
            "Could not load country data",
            Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
        )),
        TextLine::from(message.to_string()),
        TextLine::from(""),
        TextLine::from(vec![
            Span::styled(
                "R",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" to retry"),
        ]),
    ]);

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn render_status_section(app: &App, f: &mut Frame<'_>, area: Rect) {
    let status_block = Block::default()
        .title(" Status ")
        .title_style(Style::default().fg(Color::Yellow))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let filter = format!(
        "{} | {} | {} countries",
        app.options.active_metric().label(),
        app.options.region.label(),
        app.records()
            .iter()
            .filter(|record| app.options.region.matches(record))
            .count(),
    );

    let mut spans = vec![Span::styled(filter, Style::default().fg(Color::Gray))];
    if let Some(tooltip) = app.hover_tooltip.as_deref() {
        spans.push(Span::raw("   "));
        spans.push(Span::styled(
            tooltip.replace('\n', " | "),
            Style::default().fg(Color::White),
        ));
    } else if !app.status_message.is_empty() {
        let style = if app.status_message.starts_with("Error") {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::Green)
        };
        spans.push(Span::raw("   "));
        spans.push(Span::styled(app.status_message.clone(), style));
    }

    let status_paragraph = Paragraph::new(TextLine::from(spans))
        .block(status_block)
        .wrap(Wrap { trim: true });
    f.render_widget(status_paragraph, area);
}

fn render_shortcuts(app: &App, f: &mut Frame<'_>, area: Rect) {
    let key = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let mut spans = vec![
        Span::styled("Tab", key),
        Span::raw(": Views   "),
        Span::styled("m/M", key),
        Span::raw(": Metric   "),
        Span::styled("t", key),
        Span::raw(": Tariffs   "),
        Span::styled("r", key),
        Span::raw(": Region   "),
        Span::styled("l", key),
        Span::raw(": Get updates   "),
        Span::styled("?", key),
        Span::raw(": Help   "),
        Span::styled("q", key),
        Span::raw(": Quit"),
    ];
    if app.load_error().is_some() {
        spans.push(Span::raw("   "));
        spans.push(Span::styled("R", key));
        spans.push(Span::raw(": Retry"));
    }

    let shortcuts = Paragraph::new(TextLine::from(spans)).alignment(Alignment::Center);
    f.render_widget(shortcuts, area);
}

fn render_toast(app: &App, f: &mut Frame<'_>) {
    let Some(toast) = app.toast.as_ref() else {
        return;
    };

    let color = match toast.kind {
        ToastKind::Info => Color::Cyan,
        ToastKind::Success => Color::Green,
        ToastKind::Error => Color::Red,
    };
    let width = u16::try_from(toast.message.chars().count() + 4)
        .unwrap_or(u16::MAX)
        .clamp(20, 60);
    let area = corner_rect(width, 3, f.area().inner(Margin::new(2, 1)));

    f.render_widget(ClearWidget, area);
    let paragraph = Paragraph::new(toast.message.as_str())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        )
        .style(Style::default().fg(color))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}
