mod loop_handler;

pub use loop_handler::{run, run_headless};

use tariff_core::{LoadTicket, Normalized};

/// Results delivered to the event loop from background tasks and map callbacks.
#[derive(Debug)]
pub enum AppEvent {
    DatasetLoaded {
        ticket: LoadTicket,
        result: Result<Normalized, String>,
    },
    CountrySelected(String),
    LeadSubmitted {
        id: String,
        result: Result<(), String>,
    },
}
