use crate::app::input::helpers::{clamp_index, wrap_decrement, wrap_increment};
use crate::app::state::App;
use crossterm::event::KeyCode;

pub fn handle_countries_input(app: &mut App, key: KeyCode) {
    let len = app.visible_countries().len();

    match key {
        KeyCode::Up | KeyCode::Char('k') => {
            app.country_index = wrap_decrement(app.country_index, len);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.country_index = wrap_increment(app.country_index, len);
        }
        KeyCode::PageUp => {
            app.country_index = app.country_index.saturating_sub(5);
        }
        KeyCode::PageDown => {
            app.country_index = clamp_index(app.country_index + 5, len);
        }
        KeyCode::Home => app.country_index = 0,
        KeyCode::End => app.country_index = len.saturating_sub(1),
        KeyCode::Char('/') => {
            app.searching = true;
        }
        KeyCode::Enter => {
            let id = app
                .visible_countries()
                .get(app.country_index)
                .map(|record| record.id.clone());
            if let Some(id) = id {
                app.select_country(&id);
            }
        }
        KeyCode::Esc => {
            if app.search_query.is_empty() {
                app.next_tab(false);
            } else {
                app.search_query.clear();
                app.country_index = 0;
            }
        }
        _ => {}
    }
}

pub fn handle_search_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Esc => {
            app.searching = false;
            app.search_query.clear();
        }
        KeyCode::Enter => {
            app.searching = false;
        }
        KeyCode::Backspace => {
            app.search_query.pop();
        }
        KeyCode::Char(ch) => {
            app.search_query.push(ch);
        }
        _ => return,
    }

    app.country_index = clamp_index(0, app.visible_countries().len());
}
