use crate::app::state::{App, AppScreen};
use crossterm::event::KeyCode;
use tariff_core::FormType;

mod countries;
mod details;
mod help;
mod lead_form;
pub mod map;
mod timeline;

pub fn dispatch_input(app: &mut App, key: KeyCode) {
    if app.lead_form.is_some() {
        lead_form::handle_lead_form_input(app, key);
        return;
    }

    if help::handle_help_toggle(app, key) {
        return;
    }

    // Typing into the search box swallows the global shortcuts.
    if app.searching {
        countries::handle_search_input(app, key);
        return;
    }

    if handle_global_input(app, key) {
        return;
    }

    match app.screen {
        AppScreen::Map => map::handle_map_input(app, key),
        AppScreen::Countries => countries::handle_countries_input(app, key),
        AppScreen::Timeline => timeline::handle_timeline_input(app, key),
        AppScreen::CountryDetails => details::handle_details_input(app, key),
    }
}

fn handle_global_input(app: &mut App, key: KeyCode) -> bool {
    match key {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Tab => app.next_tab(true),
        KeyCode::BackTab => app.next_tab(false),
        KeyCode::Char('m') => app.cycle_metric(true),
        KeyCode::Char('M') => app.cycle_metric(false),
        KeyCode::Char('t') => app.toggle_tariff(),
        KeyCode::Char('r') => app.cycle_region(),
        KeyCode::Char('l') => app.open_lead_form(FormType::Cta),
        KeyCode::Char('R') if app.load_error().is_some() => app.retry_loading(),
        _ => return false,
    }
    true
}
