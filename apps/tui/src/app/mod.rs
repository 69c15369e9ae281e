// Application state and the async actions it triggers

pub mod actions;
pub mod input;
pub mod state;

pub use input::{handle_input, handle_mouse};
pub use state::{App, AppScreen};
