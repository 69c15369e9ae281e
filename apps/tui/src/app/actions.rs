use tariff_core::{LeadSubmission, LoadTicket};
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::config::DataSource;
use crate::data;
use crate::event::AppEvent;

/// Background work. Results come back to the event loop as [`AppEvent`]s.
#[derive(Debug, Clone)]
pub struct AppActions {
    client: reqwest::Client,
    source: DataSource,
    webhook_url: Option<String>,
    events: UnboundedSender<AppEvent>,
}

impl AppActions {
    pub const fn new(
        client: reqwest::Client,
        source: DataSource,
        webhook_url: Option<String>,
        events: UnboundedSender<AppEvent>,
    ) -> Self {
        Self {
            client,
            source,
            webhook_url,
            events,
        }
    }

    pub const fn source(&self) -> &DataSource {
        &self.source
    }

    pub const fn can_submit(&self) -> bool {
        self.webhook_url.is_some()
    }

    pub fn events(&self) -> UnboundedSender<AppEvent> {
        self.events.clone()
    }

    pub fn spawn_load(&self, ticket: LoadTicket) {
        let client = self.client.clone();
        let source = self.source.clone();
        let events = self.events.clone();

        tokio::spawn(async move {
            let result = data::load_dataset(&client, &source).await;
            // The receiver is gone once the UI has shut down.
            if events.send(AppEvent::DatasetLoaded { ticket, result }).is_err() {
                debug!(?ticket, "dataset arrived after shutdown");
            }
        });
    }

    pub fn spawn_submit(&self, submission: LeadSubmission) {
        let client = self.client.clone();
        let webhook_url = self.webhook_url.clone();
        let events = self.events.clone();

        tokio::spawn(async move {
            let result = data::submit_lead(&client, webhook_url.as_deref(), &submission)
                .await
                .map_err(|e| e.to_string());
            events
                .send(AppEvent::LeadSubmitted {
                    id: submission.id,
                    result,
                })
                .ok();
        });
    }
}
