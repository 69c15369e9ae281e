// Network and file access for the dataset and the lead webhook

pub mod fetch;
pub mod webhook;

#[cfg(test)]
mod test_server;

pub use fetch::{fetch_dataset, http_client, load_dataset, FetchError};
pub use webhook::{submit_lead, SubmitError};
