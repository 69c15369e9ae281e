use crate::app::App;
use crate::ui::widgets::popup::{centered_rect, ClearWidget};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use tachyonfx::EffectRenderer;
use tariff_core::lead::LeadField;
use tariff_core::{FormType, LeadForm};

const fn intro(form_type: FormType) -> &'static str {
    match form_type {
        FormType::Popup => "Get notified when tariffs on your markets change.",
        FormType::Cta => "Weekly updates on tariff rates and trade policy.",
        FormType::Report => "We will email you a detailed impact report.",
    }
}

pub fn render_lead_form(app: &App, form: &LeadForm, f: &mut Frame<'_>) {
    let popup_area = centered_rect(60, 60, f.area());
    f.render_widget(ClearWidget, popup_area);

    let block = Block::default()
        .title(format!(" {} ", form.title))
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(popup_area);
    f.render_widget(block, popup_area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Intro
            Constraint::Length(3), // Name
            Constraint::Length(3), // Email
            Constraint::Length(3), // Company
            Constraint::Min(1),    // Hint
        ])
        .split(inner);

    f.render_widget(
        Paragraph::new(Span::styled(
            intro(form.form_type),
            Style::default().fg(Color::Gray),
        )),
        rows[0],
    );

    for (field, area) in LeadField::ALL.into_iter().zip(rows.iter().skip(1)) {
        render_field(app, form, field, f, *area);
    }

    let hint = if app.lead_submitting {
        Span::styled("Sending...", Style::default().fg(Color::Yellow))
    } else {
        Span::styled(
            "Tab: Next field   Enter: Submit   Esc: Close",
            Style::default().fg(Color::Gray),
        )
    };
    f.render_widget(
        Paragraph::new(TextLine::from(hint)).alignment(Alignment::Center),
        rows[4],
    );

    if let Ok(mut effect) = app.popup_fx.lock() {
        if let Some(effect) = effect.as_mut() {
            let buffer = f.buffer_mut();
            buffer.render_effect(effect, popup_area, app.last_tick);
        }
    }
}

fn render_field(app: &App, form: &LeadForm, field: LeadField, f: &mut Frame<'_>, area: Rect) {
    let focused = form.focus == field;
    let border = if focused { Color::Green } else { Color::DarkGray };
    let cursor = if focused && !app.lead_submitting && app.animation_counter.sin() > 0.0 {
        "_"
    } else {
        ""
    };
    let title = if field == LeadField::Company {
        format!(" {} (optional) ", field.label())
    } else {
        format!(" {} ", field.label())
    };

    let paragraph = Paragraph::new(format!("{}{cursor}", form.value(field))).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    );
    f.render_widget(paragraph, area);
}
