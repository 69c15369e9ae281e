use crate::app::state::App;
use crate::ui::widgets::world_map::cell_to_lon_lat;
use crossterm::event::{KeyCode, MouseButton, MouseEvent, MouseEventKind};

pub fn handle_map_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Right | KeyCode::Char('n') => app.map_focus(true),
        KeyCode::Left | KeyCode::Char('p') => app.map_focus(false),
        KeyCode::Enter => app.map_activate(),
        KeyCode::Esc => app.quit(),
        _ => {}
    }
}

pub fn handle_map_mouse(app: &mut App, mouse: MouseEvent) {
    if app.lead_form.is_some() || app.show_help || app.screen != crate::app::AppScreen::Map {
        return;
    }

    let Some((lon, lat)) = cell_to_lon_lat(app.map_area.get(), mouse.column, mouse.row) else {
        if matches!(mouse.kind, MouseEventKind::Moved) {
            app.map_pointer_out();
        }
        return;
    };

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => app.map_click(lon, lat),
        MouseEventKind::Moved => app.map_hover(lon, lat),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::test_app;
    use crossterm::event::KeyModifiers;
    use ratatui::layout::Rect;
    use tariff_core::normalize_json;

    fn moved(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Moved,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn leaving_the_canvas_clears_the_highlight() {
        let (mut app, _rx) = test_app();
        let ticket = app.dataset.begin();
        let normalized = normalize_json(
            r#"[{"id":"JP","name":"Japan","us_trade_data":[{"reciprocal_tariff":24}]}]"#,
        )
        .expect("array");
        app.apply_dataset(ticket, Ok(normalized));
        app.map_area.set(Rect::new(0, 0, 360, 180));

        handle_map_mouse(&mut app, moved(318, 54));
        assert!(app.hover_tooltip.is_some());
        let hovered = app.map.chart().and_then(|chart| chart.hovered_feature());
        assert_eq!(hovered.map(|feature| feature.name.as_str()), Some("Japan"));

        handle_map_mouse(&mut app, moved(400, 200));
        assert!(app.hover_tooltip.is_none());
        assert!(app.map.chart().and_then(|chart| chart.hovered_feature()).is_none());
    }
}
