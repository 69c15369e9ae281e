use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use ratatui::layout::Rect;
use std::cell::Cell;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tachyonfx::{fx, Effect, Interpolation};
use tariff_core::domain::known_regions;
use tariff_core::map::{
    BundledLoader, ChoroplethRenderer, MapOptions, MapWidget, MountPoint, Theme,
};
use tariff_core::{
    CountryRecord, DatasetSlot, FormType, LeadForm, LeadPopupGate, LeadSubmission, LoadTicket,
    MemoryFlagStore, Normalized, PageState, RegionFilter, TariffKind, Timeline, Toast, ToastKind,
};
use throbber_widgets_tui::ThrobberState;
use tracing::{debug, info, warn};

use crate::app::actions::AppActions;
use crate::config::AppConfig;
use crate::event::AppEvent;

pub const MAP_MOUNT_ID: &str = "tariff-map";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppScreen {
    Map,
    Countries,
    Timeline,
    CountryDetails,
}

impl AppScreen {
    pub const TABS: [Self; 3] = [Self::Map, Self::Countries, Self::Timeline];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Map => "Map",
            Self::Countries => "Countries",
            Self::Timeline => "Timeline",
            Self::CountryDetails => "Details",
        }
    }

    pub fn tab_index(self) -> Option<usize> {
        Self::TABS.iter().position(|tab| *tab == self)
    }
}

pub struct App {
    pub running: bool,
    pub screen: AppScreen,
    pub previous_screen: AppScreen,
    pub show_help: bool,
    pub status_message: String,
    pub actions: AppActions,
    pub dataset: DatasetSlot,
    pub map: MapWidget<ChoroplethRenderer>,
    pub loader: BundledLoader,
    pub options: MapOptions,
    pub regions: Vec<String>,
    pub timeline: Timeline,
    pub selected_country: Option<String>,
    pub country_index: usize,
    pub search_query: String,
    pub searching: bool,
    pub timeline_index: usize,
    pub hover_tooltip: Option<String>,
    pub lead_form: Option<LeadForm>,
    pub pending_submission: Option<LeadSubmission>,
    pub lead_submitting: bool,
    pub toast: Option<Toast>,
    pub flags: MemoryFlagStore,
    pub popup_gate: LeadPopupGate,
    pub animation_counter: f64,
    pub throbber: ThrobberState,
    pub popup_fx: Mutex<Option<Effect>>,
    pub last_tick: Duration,
    /// Inner canvas area from the last draw, for mouse hit-testing.
    pub map_area: Cell<Rect>,
    started: Instant,
    last_frame: Instant,
    matcher: SkimMatcherV2,
}

impl App {
    pub fn new(config: &AppConfig, actions: AppActions) -> Self {
        let timeline = Timeline::bundled().unwrap_or_else(|e| {
            warn!(error = %e, "bundled timeline unavailable");
            Timeline::default()
        });
        let now = Instant::now();

        Self {
            running: true,
            screen: AppScreen::Map,
            previous_screen: AppScreen::Map,
            show_help: false,
            status_message: String::new(),
            actions,
            dataset: DatasetSlot::new(),
            map: MapWidget::new(ChoroplethRenderer::default(), MountPoint::new(MAP_MOUNT_ID)),
            loader: BundledLoader::new(Theme::default()),
            options: MapOptions {
                metric: config.metric,
                region: config.region.clone(),
                tariff: None,
            },
            regions: Vec::new(),
            timeline,
            selected_country: None,
            country_index: 0,
            search_query: String::new(),
            searching: false,
            timeline_index: 0,
            hover_tooltip: None,
            lead_form: None,
            pending_submission: None,
            lead_submitting: false,
            toast: None,
            flags: MemoryFlagStore::default(),
            popup_gate: LeadPopupGate::new(config.popup_delay),
            animation_counter: 0.0,
            throbber: ThrobberState::default(),
            popup_fx: Mutex::new(None),
            last_tick: Duration::ZERO,
            map_area: Cell::new(Rect::default()),
            started: now,
            last_frame: now,
            matcher: SkimMatcherV2::default(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Starts (or restarts) the dataset fetch.
    pub fn start_loading(&mut self) {
        let ticket = self.dataset.begin();
        info!(source = %self.actions.source().describe(), "loading dataset");
        self.actions.spawn_load(ticket);
    }

    pub fn retry_loading(&mut self) {
        self.show_toast("Retrying dataset load", ToastKind::Info);
        self.start_loading();
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.dataset.state(), PageState::Loading)
    }

    pub fn load_error(&self) -> Option<&str> {
        match self.dataset.state() {
            PageState::Failed(message) => Some(message),
            PageState::Loading | PageState::Ready(_) => None,
        }
    }

    pub fn records(&self) -> &[CountryRecord] {
        self.dataset.records()
    }

    pub fn apply_dataset(&mut self, ticket: LoadTicket, result: Result<Normalized, String>) {
        if !self.dataset.apply(ticket, result) {
            return;
        }

        self.regions = known_regions(self.records());
        self.country_index = 0;
        self.rebuild_map();
    }

    /// Recreates the map chart for the current data and options.
    pub fn rebuild_map(&mut self) {
        if !matches!(self.dataset.state(), PageState::Ready(_)) {
            return;
        }

        let events = self.actions.events();
        let on_select = Box::new(move |record: &CountryRecord| {
            events
                .send(AppEvent::CountrySelected(record.id.clone()))
                .ok();
        });

        self.hover_tooltip = None;
        if let Err(e) = self.map.update(
            &mut self.loader,
            self.dataset.records(),
            &self.options,
            on_select,
        ) {
            self.status_message = format!("Error: {e}");
        }
    }

    pub fn cycle_metric(&mut self, forward: bool) {
        let current = self.options.active_metric();
        self.options.metric = if forward { current.next() } else { current.prev() };
        self.options.tariff = None;
        debug!(metric = self.options.metric.as_str(), "metric changed");
        self.rebuild_map();
    }

    /// Switches to tariff mode, or flips the tariff direction when already in it.
    pub fn toggle_tariff(&mut self) {
        self.options.tariff = Some(
            self.options
                .tariff
                .map_or(TariffKind::Reciprocal, TariffKind::toggle),
        );
        self.rebuild_map();
    }

    pub fn cycle_region(&mut self) {
        self.options.region = self.options.region.next(&self.regions);
        self.country_index = 0;
        self.rebuild_map();
    }

    pub fn set_region(&mut self, region: RegionFilter) {
        self.options.region = region;
        self.country_index = 0;
        self.rebuild_map();
    }

    /// Countries in the list view: region filter, then fuzzy search.
    pub fn visible_countries(&self) -> Vec<&CountryRecord> {
        let in_region = self
            .records()
            .iter()
            .filter(|record| self.options.region.matches(record));

        let query = self.search_query.trim();
        if query.is_empty() {
            let mut countries: Vec<&CountryRecord> = in_region.collect();
            countries.sort_by(|a, b| a.name.cmp(&b.name));
            return countries;
        }

        let mut scored: Vec<(i64, &CountryRecord)> = in_region
            .filter_map(|record| {
                self.matcher
                    .fuzzy_match(&record.name, query)
                    .or_else(|| self.matcher.fuzzy_match(&record.id, query))
                    .map(|score| (score, record))
            })
            .collect();
        scored.sort_by(|(a, left), (b, right)| b.cmp(a).then_with(|| left.name.cmp(&right.name)));
        scored.into_iter().map(|(_, record)| record).collect()
    }

    pub fn selected_record(&self) -> Option<&CountryRecord> {
        let id = self.selected_country.as_deref()?;
        self.records().iter().find(|record| record.id == id)
    }

    pub fn select_country(&mut self, id: &str) {
        if !self.records().iter().any(|record| record.id == id) {
            return;
        }
        self.selected_country = Some(id.to_string());
        if self.screen != AppScreen::CountryDetails {
            self.previous_screen = self.screen;
        }
        self.screen = AppScreen::CountryDetails;
    }

    pub fn close_details(&mut self) {
        self.screen = self.previous_screen;
    }

    pub fn next_tab(&mut self, forward: bool) {
        let tabs = AppScreen::TABS;
        let index = self.screen.tab_index().unwrap_or(0);
        let next = if forward {
            (index + 1) % tabs.len()
        } else {
            (index + tabs.len() - 1) % tabs.len()
        };
        self.screen = tabs[next];
    }

    /// Clicks the map at a lon/lat position.
    pub fn map_click(&mut self, lon: f64, lat: f64) {
        if let Some(chart) = self.map.chart_mut() {
            chart.click(lon, lat);
        }
    }

    pub fn map_hover(&mut self, lon: f64, lat: f64) {
        self.hover_tooltip = self
            .map
            .chart_mut()
            .and_then(|chart| chart.pointer_over(lon, lat).map(str::to_string));
    }

    pub fn map_pointer_out(&mut self) {
        self.hover_tooltip = None;
        if let Some(chart) = self.map.chart_mut() {
            chart.pointer_out();
        }
    }

    pub fn map_focus(&mut self, forward: bool) {
        self.hover_tooltip = self.map.chart_mut().and_then(|chart| {
            let feature = if forward {
                chart.focus_next()
            } else {
                chart.focus_prev()
            };
            feature.and_then(|feature| feature.tooltip.clone())
        });
    }

    pub fn map_activate(&mut self) {
        if let Some(chart) = self.map.chart_mut() {
            chart.activate_focused();
        }
    }

    pub fn open_lead_form(&mut self, form_type: FormType) {
        let title = match form_type {
            FormType::Popup => "Stay ahead of tariff changes".to_string(),
            FormType::Cta => "Get tariff updates".to_string(),
            FormType::Report => self.selected_record().map_or_else(
                || "Tariff impact report".to_string(),
                |record| format!("Tariff impact report: {}", record.name),
            ),
        };
        self.lead_form = Some(LeadForm::new(title, form_type));
        if let Ok(mut effect) = self.popup_fx.lock() {
            *effect = Some(fx::coalesce((400, Interpolation::QuadOut)));
        }
    }

    pub fn close_lead_form(&mut self) {
        self.lead_form = None;
        if let Ok(mut effect) = self.popup_fx.lock() {
            *effect = None;
        }
    }

    /// Validates the open form and queues it for the event loop to send.
    pub fn submit_lead_form(&mut self) {
        if self.lead_submitting {
            return;
        }
        let Some(form) = self.lead_form.as_ref() else {
            return;
        };

        if !self.actions.can_submit() {
            self.show_toast("Lead capture is not configured", ToastKind::Error);
            return;
        }

        let id = format!(
            "{}-{}",
            form.form_type.as_str(),
            chrono::Utc::now().timestamp_millis()
        );
        match form.to_submission(id) {
            Ok(submission) => self.pending_submission = Some(submission),
            Err(e) => self.show_toast(capitalize(&e.to_string()), ToastKind::Error),
        }
    }

    pub fn show_toast(&mut self, message: impl Into<String>, kind: ToastKind) {
        self.toast = Some(Toast::new(message, kind, self.elapsed()));
    }

    pub fn update(&mut self) {
        let now = Instant::now();
        let delta = now.duration_since(self.last_frame);
        self.last_frame = now;
        self.last_tick = delta;

        self.animation_counter += delta.as_secs_f64() * 2.0;
        if self.animation_counter > 2.0 * std::f64::consts::PI {
            self.animation_counter -= 2.0 * std::f64::consts::PI;
        }

        if self.is_loading() {
            self.throbber.calc_next();
        }

        let elapsed = self.elapsed();
        if self.toast.as_ref().is_some_and(|toast| toast.is_expired(elapsed)) {
            self.toast = None;
        }

        if self.lead_form.is_none()
            && !self.is_loading()
            && self.popup_gate.poll(elapsed, &mut self.flags)
        {
            info!("opening timed lead popup");
            self.open_lead_form(FormType::Popup);
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
        self.teardown();
    }

    /// Disposes the map and discards any in-flight fetch.
    pub fn teardown(&mut self) {
        self.dataset.teardown();
        self.map.teardown();
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[cfg(test)]
pub(crate) fn test_app() -> (App, tokio::sync::mpsc::UnboundedReceiver<AppEvent>) {
    use crate::config::DataSource;
    use tariff_core::domain::Metric;

    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
    let config = AppConfig {
        data_source: DataSource::File("data/countries.json".into()),
        webhook_url: Some("http://127.0.0.1:9/lead".to_string()),
        popup_delay: Duration::from_secs(30),
        log_file: "tariff-tracker.log".into(),
        metric: Metric::ReciprocalTariff,
        region: RegionFilter::All,
        debug: false,
    };
    let actions = AppActions::new(
        reqwest::Client::new(),
        config.data_source.clone(),
        config.webhook_url.clone(),
        tx,
    );
    (App::new(&config, actions), rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tariff_core::domain::Metric;
    use tariff_core::map::WidgetState;
    use tokio::sync::mpsc;

    fn app() -> (App, mpsc::UnboundedReceiver<AppEvent>) {
        test_app()
    }

    fn dataset() -> Normalized {
        let mut japan = CountryRecord::new("JP", "Japan");
        japan.reciprocal_tariff = Some(24.0);
        japan.region = Some("Asia".to_string());
        japan.policy_groups = vec![tariff_core::PolicyGroup::G20];
        let mut vietnam = CountryRecord::new("VN", "Vietnam");
        vietnam.reciprocal_tariff = Some(46.0);
        vietnam.region = Some("Asia".to_string());
        let mut germany = CountryRecord::new("DE", "Germany");
        germany.region = Some("Europe".to_string());
        Normalized {
            records: vec![japan, vietnam, germany],
            dropped: Vec::new(),
        }
    }

    fn loaded_app() -> (App, mpsc::UnboundedReceiver<AppEvent>) {
        let (mut app, rx) = app();
        let ticket = app.dataset.begin();
        app.apply_dataset(ticket, Ok(dataset()));
        (app, rx)
    }

    #[test]
    fn dataset_builds_map_and_regions() {
        let (app, _rx) = loaded_app();
        assert_eq!(app.map.state(), WidgetState::Ready);
        assert_eq!(app.regions, ["Asia", "Europe"]);
        assert!(!app.is_loading());
    }

    #[test]
    fn malformed_rows_are_dropped_without_user_notice() {
        let (mut app, _rx) = app();
        let status = app.status_message.clone();
        let ticket = app.dataset.begin();
        let normalized = tariff_core::normalize_json(
            r#"[{"id":"JP","name":"Japan"},{"name":"Nameless"},{"id":"KR","name":"Korea","country_gdp":5}]"#,
        )
        .expect("array");
        assert_eq!(normalized.dropped.len(), 2);

        app.apply_dataset(ticket, Ok(normalized));
        assert_eq!(app.records().len(), 1);
        assert_eq!(app.status_message, status);
        assert!(app.toast.is_none());
    }

    #[test]
    fn failed_fetch_is_page_level() {
        let (mut app, _rx) = app();
        let ticket = app.dataset.begin();
        app.apply_dataset(ticket, Err("HTTP 503".to_string()));
        assert_eq!(app.load_error(), Some("HTTP 503"));
        assert_eq!(app.map.state(), WidgetState::Uninitialized);
    }

    #[test]
    fn map_selection_arrives_as_event() {
        let (mut app, mut rx) = loaded_app();
        app.map_focus(true);
        app.map_activate();

        match rx.try_recv() {
            Ok(AppEvent::CountrySelected(id)) => {
                app.select_country(&id);
                assert_eq!(app.screen, AppScreen::CountryDetails);
                assert!(app.selected_record().is_some());
            }
            _ => panic!("expected a selection event"),
        }

        app.close_details();
        assert_eq!(app.screen, AppScreen::Map);
    }

    #[test]
    fn search_is_fuzzy_and_respects_region() {
        let (mut app, _rx) = loaded_app();
        app.search_query = "vtnm".to_string();
        let names: Vec<&str> = app.visible_countries().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Vietnam"]);

        app.search_query.clear();
        app.set_region(RegionFilter::Region("Europe".to_string()));
        let names: Vec<&str> = app.visible_countries().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Germany"]);
    }

    #[test]
    fn tariff_toggle_overrides_metric_until_metric_changes() {
        let (mut app, _rx) = loaded_app();
        app.toggle_tariff();
        assert_eq!(app.options.active_metric(), Metric::ReciprocalTariff);
        app.toggle_tariff();
        assert_eq!(app.options.active_metric(), Metric::TariffsToUs);
        app.cycle_metric(true);
        assert_eq!(app.options.tariff, None);
        assert_eq!(app.map.state(), WidgetState::Ready);
    }

    #[test]
    fn invalid_lead_form_keeps_values_and_warns() {
        let (mut app, _rx) = loaded_app();
        app.open_lead_form(FormType::Cta);
        if let Some(form) = app.lead_form.as_mut() {
            form.name = "Ada".to_string();
            form.email = "not-an-email".to_string();
        }

        app.submit_lead_form();
        assert!(app.pending_submission.is_none());
        assert_eq!(app.lead_form.as_ref().map(|f| f.name.as_str()), Some("Ada"));
        assert_eq!(app.toast.as_ref().map(|t| t.kind), Some(ToastKind::Error));
    }

    #[test]
    fn valid_lead_form_is_queued() {
        let (mut app, _rx) = loaded_app();
        app.open_lead_form(FormType::Report);
        if let Some(form) = app.lead_form.as_mut() {
            form.name = "Ada".to_string();
            form.email = "ada@example.com".to_string();
        }

        app.submit_lead_form();
        let submission = app.pending_submission.as_ref().expect("queued");
        assert_eq!(submission.form_type, FormType::Report);
        assert!(submission.id.starts_with("report-"));
    }

    #[test]
    fn teardown_discards_late_dataset() {
        let (mut app, _rx) = app();
        let ticket = app.dataset.begin();
        app.quit();
        app.apply_dataset(ticket, Ok(dataset()));
        assert!(app.records().is_empty());
        assert_eq!(app.map.state(), WidgetState::Disposed);
    }
}
