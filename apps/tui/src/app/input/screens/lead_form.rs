use crate::app::state::App;
use crossterm::event::KeyCode;

pub fn handle_lead_form_input(app: &mut App, key: KeyCode) {
    if key == KeyCode::Esc {
        app.close_lead_form();
        return;
    }

    if key == KeyCode::Enter {
        app.submit_lead_form();
        return;
    }

    if app.lead_submitting {
        return;
    }

    let Some(form) = app.lead_form.as_mut() else {
        return;
    };

    match key {
        KeyCode::Tab | KeyCode::Down => form.focus_next(),
        KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
        KeyCode::Backspace => form.pop_char(),
        KeyCode::Char(ch) => form.push_char(ch),
        _ => {}
    }
}
