mod animation;
mod net;
mod state;
mod storage;
mod view;

use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::time::Duration;

use ratzilla::event::KeyCode;
use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};
use wasm_bindgen_futures::spawn_local;

use crate::state::{Command, Key, WebState};
use crate::storage::SessionStorageFlags;

/// Baked in at build time; lead capture is disabled when unset.
const LEAD_WEBHOOK_URL: Option<&str> = option_env!("LEAD_WEBHOOK_URL");

fn now_millis() -> f64 {
    js_sys::Date::now()
}

fn elapsed_since(start_millis: f64) -> Duration {
    Duration::from_secs_f64(((now_millis() - start_millis) / 1000.0).max(0.0))
}

fn map_key(code: &KeyCode, shift: bool) -> Option<Key> {
    Some(match code {
        KeyCode::Char(ch) => Key::Char(*ch),
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Esc,
        KeyCode::Tab if shift => Key::BackTab,
        KeyCode::Tab => Key::Tab,
        KeyCode::Backspace => Key::Backspace,
        _ => return None,
    })
}

fn start_load(state: &Rc<RefCell<WebState>>) {
    let ticket = state.borrow_mut().begin_load();
    let state = Rc::clone(state);
    spawn_local(async move {
        let result = net::fetch_countries().await;
        if let Err(message) = &result {
            web_sys::console::error_1(&format!("Failed to load countries: {message}").into());
        }
        state.borrow_mut().apply_dataset(ticket, result);
    });
}

fn run_command(state: &Rc<RefCell<WebState>>, command: Command, started: f64) {
    match command {
        Command::Reload => start_load(state),
        Command::Submit {
            webhook_url,
            submission,
        } => {
            let state = Rc::clone(state);
            spawn_local(async move {
                let result = net::post_lead(&webhook_url, &submission).await;
                state
                    .borrow_mut()
                    .finish_submission(result, elapsed_since(started));
            });
        }
    }
}

fn main() -> io::Result<()> {
    let started = now_millis();
    let state = Rc::new(RefCell::new(WebState::new(
        Box::new(SessionStorageFlags::new()),
        LEAD_WEBHOOK_URL.map(str::to_string),
    )));

    start_load(&state);

    let backend = DomBackend::new()?;
    let mut terminal = Terminal::new(backend)?;

    terminal.on_key_event({
        let state = Rc::clone(&state);
        move |event| {
            let Some(key) = map_key(&event.code, event.shift) else {
                return;
            };
            let command = state
                .borrow_mut()
                .handle_key(key, now_millis(), elapsed_since(started));
            if let Some(command) = command {
                run_command(&state, command, started);
            }
        }
    });

    terminal.draw_web(move |f| {
        let mut current = state.borrow_mut();
        current.tick(now_millis() / 1000.0, elapsed_since(started));
        view::render(&current, f);
    });

    Ok(())
}
