use color_eyre::eyre::eyre;
use color_eyre::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use serde::Serialize;
use std::convert::TryFrom;
use std::fmt;
use std::io::Stdout;
use tariff_core::color::{map_metric, metric_value};
use tariff_core::{format_metric, Metric, Normalized, RegionFilter, ToastKind};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, warn};

use crate::app::{handle_input, handle_mouse, App};
use crate::config::AppConfig;
use crate::data;
use crate::event::AppEvent;
use crate::ui;

// States of a lead submission
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum SubmitState {
    Idle,
    Submitting,
    Sent,
    Failed,
}

impl fmt::Display for SubmitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Submitting => write!(f, "Submitting"),
            Self::Sent => write!(f, "Sent"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

#[derive(Clone, Debug)]
enum SubmitEvent {
    Start(String),
    Sent,
    Failed(String),
    Reset,
}

impl fmt::Display for SubmitEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start(id) => write!(f, "Start({id})"),
            Self::Sent => write!(f, "Sent"),
            Self::Failed(msg) => write!(f, "Failed({msg})"),
            Self::Reset => write!(f, "Reset"),
        }
    }
}

#[derive(Debug)]
struct StateTransitionError {
    from: SubmitState,
    event: SubmitEvent,
}

impl fmt::Display for StateTransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid transition from {} with event {}",
            self.from, self.event
        )
    }
}

impl std::error::Error for StateTransitionError {}

struct SubmitMachine {
    state: SubmitState,
}

impl SubmitMachine {
    const fn new(initial_state: SubmitState) -> Self {
        Self {
            state: initial_state,
        }
    }

    const fn state(&self) -> SubmitState {
        self.state
    }

    fn process_event(
        &mut self,
        event: &SubmitEvent,
        app: &mut App,
    ) -> std::result::Result<(), StateTransitionError> {
        let next_state = NextState::try_from((self.state, event, app))?;
        debug!(from = %self.state, to = %next_state.0, %event, "lead submission transition");
        self.state = next_state.0;
        Ok(())
    }
}

struct NextState(SubmitState);

impl TryFrom<(SubmitState, &SubmitEvent, &mut App)> for NextState {
    type Error = StateTransitionError;

    fn try_from(
        value: (SubmitState, &SubmitEvent, &mut App),
    ) -> std::result::Result<Self, Self::Error> {
        let (current_state, event, app) = value;

        match (current_state, event) {
            (SubmitState::Idle, SubmitEvent::Start(_)) => {
                app.lead_submitting = true;
                app.status_message = "Sending...".to_string();
                Ok(Self(SubmitState::Submitting))
            }
            (SubmitState::Submitting, SubmitEvent::Sent) => {
                app.lead_submitting = false;
                app.status_message.clear();
                app.close_lead_form();
                app.show_toast("Thanks! We'll be in touch.", ToastKind::Success);
                Ok(Self(SubmitState::Sent))
            }
            (SubmitState::Submitting, SubmitEvent::Failed(error)) => {
                // The form stays open with its values so the user can retry.
                app.lead_submitting = false;
                app.status_message.clear();
                app.show_toast(format!("Could not send: {error}"), ToastKind::Error);
                Ok(Self(SubmitState::Failed))
            }
            (SubmitState::Sent | SubmitState::Failed, SubmitEvent::Reset) => {
                Ok(Self(SubmitState::Idle))
            }
            _ => Err(StateTransitionError {
                from: current_state,
                event: event.clone(),
            }),
        }
    }
}

fn handle_app_event(app: &mut App, event: AppEvent, machine: &mut SubmitMachine) {
    match event {
        AppEvent::DatasetLoaded { ticket, result } => app.apply_dataset(ticket, result),
        AppEvent::CountrySelected(id) => app.select_country(&id),
        AppEvent::LeadSubmitted { id, result } => {
            let outcome = match result {
                Ok(()) => SubmitEvent::Sent,
                Err(error) => SubmitEvent::Failed(error),
            };
            if let Err(e) = machine.process_event(&outcome, app) {
                warn!(%id, error = %e, "unexpected submission result");
                return;
            }
            if let Err(e) = machine.process_event(&SubmitEvent::Reset, app) {
                warn!(%id, error = %e, "could not reset submission state");
            }
        }
    }
}

fn dispatch_pending_submission(app: &mut App, machine: &mut SubmitMachine) {
    if machine.state() != SubmitState::Idle {
        return;
    }
    let Some(submission) = app.pending_submission.take() else {
        return;
    };

    if machine
        .process_event(&SubmitEvent::Start(submission.id.clone()), app)
        .is_ok()
    {
        app.actions.spawn_submit(submission);
    }
}

/// Loads the dataset once and prints a summary instead of starting the UI.
pub async fn run_headless(config: &AppConfig, json: bool) -> Result<()> {
    let client = data::http_client()?;
    let normalized = data::load_dataset(&client, &config.data_source)
        .await
        .map_err(|message| eyre!("Failed to load dataset: {message}"))?;

    let stats = build_headless_stats(
        &normalized,
        &config.data_source.describe(),
        config.metric,
        &config.region,
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        render_headless_stats(&stats);
    }

    Ok(())
}

fn render_headless_stats(stats: &HeadlessStats) {
    println!("\nU.S. Tariffs 2025 Tracker");
    println!("=========================");
    println!("Source: {}", stats.source);
    println!("Countries: {}", stats.total_countries);
    println!("Dropped rows: {}", stats.dropped_rows);
    println!("G20 members: {}", stats.g20_countries);

    println!("\nCountries by Region:");
    for (region, count) in &stats.by_region {
        println!("- {region}: {count}");
    }

    println!("\n{} ({}):", stats.metric_label, stats.region);
    println!(
        "- with data: {} / {}",
        stats.summary.with_value, stats.summary.in_filter
    );
    if let (Some(min), Some(max)) = (stats.summary.min, stats.summary.max) {
        println!("- range: {min:.1} .. {max:.1}");
    }

    println!("\nTop Countries:");
    for country in &stats.top_countries {
        println!("- {} | {} | {}", country.id, country.name, country.formatted);
    }
}

fn build_headless_stats(
    normalized: &Normalized,
    source: &str,
    metric: Metric,
    region: &RegionFilter,
) -> HeadlessStats {
    let records = &normalized.records;

    let mut by_region: Vec<(String, usize)> = Vec::new();
    for record in records {
        let name = record
            .region
            .clone()
            .unwrap_or_else(|| "(unknown)".to_string());
        match by_region.iter_mut().find(|(region, _)| *region == name) {
            Some((_, count)) => *count += 1,
            None => by_region.push((name, 1)),
        }
    }
    by_region.sort();

    let in_filter: Vec<_> = records.iter().filter(|record| region.matches(record)).collect();
    let values: Vec<f64> = in_filter
        .iter()
        .filter_map(|record| metric_value(record, metric))
        .collect();

    let mut ranked: Vec<_> = in_filter
        .iter()
        .filter_map(|record| metric_value(record, metric).map(|value| (value, *record)))
        .collect();
    ranked.sort_by(|(a, _), (b, _)| b.total_cmp(a));

    let top_countries = ranked
        .into_iter()
        .take(5)
        .map(|(_, record)| {
            let mapped = map_metric(record, metric);
            HeadlessCountry {
                id: record.id.clone(),
                name: record.name.clone(),
                value: mapped.value,
                formatted: format_metric(mapped.value, metric),
                fill: mapped.color.to_css(),
            }
        })
        .collect();

    HeadlessStats {
        source: source.to_string(),
        metric: metric.as_str(),
        metric_label: metric.label(),
        region: region.label(),
        total_countries: records.len(),
        dropped_rows: normalized.dropped.len(),
        g20_countries: records.iter().filter(|record| record.is_g20()).count(),
        by_region,
        summary: MetricSummary {
            in_filter: in_filter.len(),
            with_value: values.len(),
            min: values.iter().copied().reduce(f64::min),
            max: values.iter().copied().reduce(f64::max),
        },
        top_countries,
    }
}

#[derive(Serialize)]
struct HeadlessStats {
    source: String,
    metric: &'static str,
    metric_label: &'static str,
    region: String,
    total_countries: usize,
    dropped_rows: usize,
    g20_countries: usize,
    by_region: Vec<(String, usize)>,
    summary: MetricSummary,
    top_countries: Vec<HeadlessCountry>,
}

#[derive(Serialize)]
struct MetricSummary {
    in_filter: usize,
    with_value: usize,
    min: Option<f64>,
    max: Option<f64>,
}

#[derive(Serialize)]
struct HeadlessCountry {
    id: String,
    name: String,
    value: Option<f64>,
    formatted: String,
    fill: String,
}

/// Run the main application event loop
pub async fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    events: &mut UnboundedReceiver<AppEvent>,
) -> Result<()> {
    // Configure event poll timeout (ms)
    const EVENT_POLL_TIMEOUT: u64 = 50;

    let mut submit_machine = SubmitMachine::new(SubmitState::Idle);
    app.start_loading();

    while app.running {
        app.update();

        if let Err(e) = terminal.draw(|f| ui::ui(app, f)) {
            return Err(eyre!("Terminal draw error: {e}"));
        }

        while let Ok(event) = events.try_recv() {
            handle_app_event(app, event, &mut submit_machine);
        }
        dispatch_pending_submission(app, &mut submit_machine);

        if matches!(
            event::poll(std::time::Duration::from_millis(EVENT_POLL_TIMEOUT)),
            Ok(true)
        ) {
            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    handle_input(app, key.code);
                }
                Ok(Event::Mouse(mouse)) => handle_mouse(app, mouse),
                Ok(Event::Resize(_, _)) => {
                    if terminal.draw(|f| ui::ui(app, f)).is_err() {
                        // Non-fatal redraw error
                    }
                }
                Ok(_) | Err(_) => {}
            }
        }

        // Let spawned fetch and submit tasks progress between frames.
        tokio::task::yield_now().await;
    }

    app.teardown();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::test_app;
    use tariff_core::{CountryRecord, FormType, PolicyGroup};

    fn normalized() -> Normalized {
        let mut canada = CountryRecord::new("CA", "Canada");
        canada.region = Some("North America".to_string());
        canada.policy_groups = vec![PolicyGroup::G20];
        canada.reciprocal_tariff = Some(35.0);
        let mut vietnam = CountryRecord::new("VN", "Vietnam");
        vietnam.region = Some("Asia".to_string());
        vietnam.reciprocal_tariff = Some(46.0);
        let mut chile = CountryRecord::new("CL", "Chile");
        chile.region = Some("South America".to_string());
        Normalized {
            records: vec![canada, vietnam, chile],
            dropped: Vec::new(),
        }
    }

    #[test]
    fn headless_stats_rank_by_metric() {
        let stats = build_headless_stats(
            &normalized(),
            "data/countries.json",
            Metric::ReciprocalTariff,
            &RegionFilter::All,
        );

        assert_eq!(stats.total_countries, 3);
        assert_eq!(stats.g20_countries, 1);
        assert_eq!(stats.summary.with_value, 2);
        assert_eq!(stats.summary.max, Some(46.0));
        let top: Vec<&str> = stats.top_countries.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(top, ["VN", "CA"]);
        assert_eq!(stats.top_countries[0].formatted, "46.0%");
    }

    #[test]
    fn headless_stats_respect_region_filter() {
        let stats = build_headless_stats(
            &normalized(),
            "data/countries.json",
            Metric::ReciprocalTariff,
            &RegionFilter::NonG20,
        );

        assert_eq!(stats.summary.in_filter, 2);
        assert_eq!(stats.summary.with_value, 1);
        let json = serde_json::to_value(&stats).expect("serializes");
        assert_eq!(json["region"], "Non-G20");
        assert_eq!(json["top_countries"][0]["name"], "Vietnam");
    }

    fn open_valid_form(app: &mut App) {
        app.open_lead_form(FormType::Cta);
        if let Some(form) = app.lead_form.as_mut() {
            form.name = "Ada".to_string();
            form.email = "ada@example.com".to_string();
        }
    }

    #[test]
    fn successful_submission_closes_form() {
        let (mut app, _rx) = test_app();
        let mut machine = SubmitMachine::new(SubmitState::Idle);
        open_valid_form(&mut app);

        machine
            .process_event(&SubmitEvent::Start("cta-1".to_string()), &mut app)
            .expect("start");
        assert!(app.lead_submitting);

        handle_app_event(
            &mut app,
            AppEvent::LeadSubmitted {
                id: "cta-1".to_string(),
                result: Ok(()),
            },
            &mut machine,
        );

        assert_eq!(machine.state(), SubmitState::Idle);
        assert!(app.lead_form.is_none());
        assert_eq!(app.toast.as_ref().map(|t| t.kind), Some(ToastKind::Success));
    }

    #[test]
    fn failed_submission_keeps_form_values() {
        let (mut app, _rx) = test_app();
        let mut machine = SubmitMachine::new(SubmitState::Idle);
        open_valid_form(&mut app);

        machine
            .process_event(&SubmitEvent::Start("cta-1".to_string()), &mut app)
            .expect("start");
        handle_app_event(
            &mut app,
            AppEvent::LeadSubmitted {
                id: "cta-1".to_string(),
                result: Err("network error".to_string()),
            },
            &mut machine,
        );

        assert_eq!(machine.state(), SubmitState::Idle);
        assert!(!app.lead_submitting);
        assert_eq!(app.lead_form.as_ref().map(|f| f.email.as_str()), Some("ada@example.com"));
        assert_eq!(app.toast.as_ref().map(|t| t.kind), Some(ToastKind::Error));
    }

    #[test]
    fn result_without_pending_submission_is_rejected() {
        let (mut app, _rx) = test_app();
        let mut machine = SubmitMachine::new(SubmitState::Idle);
        assert!(machine.process_event(&SubmitEvent::Sent, &mut app).is_err());
        assert_eq!(machine.state(), SubmitState::Idle);
    }
}
