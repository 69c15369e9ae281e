use crate::app::state::App;
use crossterm::event::KeyCode;
use tariff_core::FormType;

pub fn handle_details_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Esc | KeyCode::Backspace => app.close_details(),
        KeyCode::Char('d') => app.open_lead_form(FormType::Report),
        _ => {}
    }
}
