mod helpers;
pub mod screens;

use crate::app::state::App;
use crossterm::event::{KeyCode, MouseEvent};

pub fn handle_input(app: &mut App, key: KeyCode) {
    screens::dispatch_input(app, key);
}

pub fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    screens::map::handle_map_mouse(app, mouse);
}
