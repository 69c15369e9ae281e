use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use tariff_core::domain::known_regions;
use tariff_core::map::{
    BundledLoader, ChoroplethChart, ChoroplethRenderer, LibraryLoader, MapOptions, MapWidget,
    MountPoint, Theme,
};
use tariff_core::{
    CountryRecord, DatasetSlot, FormType, LeadForm, LeadPopupGate, LeadSubmission, LoadTicket,
    Normalized, PageState, SessionFlagStore, TariffKind, Toast, ToastKind,
};

use crate::animation::{advance_pulse, PulseMode};

pub const MAP_MOUNT_ID: &str = "tariff-map";
pub const LEAD_POPUP_DELAY: Duration = Duration::from_secs(30);

/// Keys the dashboard reacts to, decoupled from the DOM event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Left,
    Right,
    Up,
    Down,
    Enter,
    Esc,
    Tab,
    BackTab,
    Backspace,
}

/// Async work the key handler asks `main` to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Reload,
    Submit {
        webhook_url: String,
        submission: LeadSubmission,
    },
}

pub struct WebState {
    pub dataset: DatasetSlot,
    pub map: MapWidget<ChoroplethRenderer>,
    pub options: MapOptions,
    pub selected: Option<String>,
    pub tooltip: Option<String>,
    pub lead_form: Option<LeadForm>,
    pub lead_submitting: bool,
    pub toast: Option<Toast>,
    pub pulse_phase: f64,
    pub status: String,
    loader: Box<dyn LibraryLoader>,
    regions: Vec<String>,
    selection: Rc<RefCell<Option<String>>>,
    flags: Box<dyn SessionFlagStore>,
    popup_gate: LeadPopupGate,
    webhook_url: Option<String>,
    last_frame: Option<f64>,
}

impl WebState {
    pub fn new(flags: Box<dyn SessionFlagStore>, webhook_url: Option<String>) -> Self {
        Self::with_loader(
            flags,
            webhook_url,
            Box::new(BundledLoader::new(Theme::default())),
        )
    }

    pub fn with_loader(
        flags: Box<dyn SessionFlagStore>,
        webhook_url: Option<String>,
        loader: Box<dyn LibraryLoader>,
    ) -> Self {
        Self {
            dataset: DatasetSlot::new(),
            map: MapWidget::new(ChoroplethRenderer::default(), MountPoint::new(MAP_MOUNT_ID)),
            options: MapOptions::default(),
            selected: None,
            tooltip: None,
            lead_form: None,
            lead_submitting: false,
            toast: None,
            pulse_phase: 0.0,
            status: String::new(),
            loader,
            regions: Vec::new(),
            selection: Rc::new(RefCell::new(None)),
            flags,
            popup_gate: LeadPopupGate::new(LEAD_POPUP_DELAY),
            webhook_url: webhook_url.filter(|url| !url.trim().is_empty()),
            last_frame: None,
        }
    }

    pub fn begin_load(&mut self) -> LoadTicket {
        self.dataset.begin()
    }

    pub fn records(&self) -> &[CountryRecord] {
        self.dataset.records()
    }

    pub fn chart(&self) -> Option<&ChoroplethChart> {
        self.map.chart()
    }

    pub fn apply_dataset(&mut self, ticket: LoadTicket, result: Result<Normalized, String>) {
        if !self.dataset.apply(ticket, result) {
            return;
        }
        if let PageState::Failed(message) = self.dataset.state() {
            log_error(&format!("dataset failed: {message}"));
            return;
        }
        self.regions = known_regions(self.records());
        self.rebuild_map();
    }

    fn rebuild_map(&mut self) {
        if !matches!(self.dataset.state(), PageState::Ready(_)) {
            return;
        }

        let selection = Rc::clone(&self.selection);
        let on_select = Box::new(move |record: &CountryRecord| {
            *selection.borrow_mut() = Some(record.id.clone());
        });

        self.tooltip = None;
        if let Err(e) = self
            .map
            .update(&mut *self.loader, self.dataset.records(), &self.options, on_select)
        {
            log_error(&format!("map failed: {e}"));
            self.status = format!("Map unavailable: {e}");
        }
    }

    pub fn selected_record(&self) -> Option<&CountryRecord> {
        let id = self.selected.as_deref()?;
        self.records().iter().find(|record| record.id == id)
    }

    fn take_selection(&mut self) {
        if let Some(id) = self.selection.borrow_mut().take() {
            self.selected = Some(id);
        }
    }

    /// Per-frame bookkeeping: pulse, toast expiry, timed popup.
    pub fn tick(&mut self, now_seconds: f64, elapsed: Duration) {
        let mode = if self.lead_form.is_some() {
            PulseMode::Paused
        } else {
            PulseMode::Running
        };
        (self.pulse_phase, self.last_frame) =
            advance_pulse(self.pulse_phase, self.last_frame, now_seconds, mode);

        if self.toast.as_ref().is_some_and(|toast| toast.is_expired(elapsed)) {
            self.toast = None;
        }

        let ready = matches!(self.dataset.state(), PageState::Ready(_));
        if ready
            && self.lead_form.is_none()
            && self.popup_gate.poll(elapsed, self.flags.as_mut())
        {
            self.open_lead_form(FormType::Popup);
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
    }

    pub fn finish_submission(&mut self, result: Result<(), String>, elapsed: Duration) {
        self.lead_submitting = false;
        match result {
            Ok(()) => {
                self.lead_form = None;
                self.toast = Some(Toast::new("Thanks! You're on the list.", ToastKind::Success, elapsed));
            }
            Err(message) => {
                self.toast = Some(Toast::new(
                    format!("Submission failed: {message}"),
                    ToastKind::Error,
                    elapsed,
                ));
            }
        }
    }

    pub fn handle_key(&mut self, key: Key, now_millis: f64, elapsed: Duration) -> Option<Command> {
        if self.lead_form.is_some() {
            return self.handle_form_key(key, now_millis, elapsed);
        }

        match key {
            Key::Char('m') => self.set_metric(true),
            Key::Char('M') => self.set_metric(false),
            Key::Char('t') => {
                self.options.tariff = Some(
                    self.options
                        .tariff
                        .map_or(TariffKind::Reciprocal, TariffKind::toggle),
                );
                self.rebuild_map();
            }
            Key::Char('r') => {
                self.options.region = self.options.region.next(&self.regions);
                self.rebuild_map();
            }
            Key::Char('l') => self.open_lead_form(FormType::Cta),
            Key::Char('d') if self.selected.is_some() => self.open_lead_form(FormType::Report),
            Key::Char('R') if matches!(self.dataset.state(), PageState::Failed(_)) => {
                self.toast = Some(Toast::new("Retrying dataset load", ToastKind::Info, elapsed));
                return Some(Command::Reload);
            }
            Key::Right | Key::Down | Key::Tab => self.focus(true),
            Key::Left | Key::Up | Key::BackTab => self.focus(false),
            Key::Enter => {
                if let Some(chart) = self.map.chart_mut() {
                    chart.activate_focused();
                }
                self.take_selection();
            }
            Key::Esc => self.selected = None,
            _ => {}
        }
        None
    }

    fn set_metric(&mut self, forward: bool) {
        let current = self.options.active_metric();
        self.options.metric = if forward { current.next() } else { current.prev() };
        self.options.tariff = None;
        self.rebuild_map();
    }

    fn focus(&mut self, forward: bool) {
        self.tooltip = self.map.chart_mut().and_then(|chart| {
            let feature = if forward {
                chart.focus_next()
            } else {
                chart.focus_prev()
            };
            feature.and_then(|feature| feature.tooltip.clone())
        });
    }

    fn handle_form_key(&mut self, key: Key, now_millis: f64, elapsed: Duration) -> Option<Command> {
        if key == Key::Esc {
            self.lead_form = None;
            return None;
        }
        if self.lead_submitting {
            return None;
        }
        let form = self.lead_form.as_mut()?;

        match key {
            Key::Tab | Key::Down => form.focus_next(),
            Key::BackTab | Key::Up => form.focus_prev(),
            Key::Backspace => form.pop_char(),
            Key::Char(ch) => form.push_char(ch),
            Key::Enter => {
                let Some(webhook_url) = self.webhook_url.clone() else {
                    self.toast = Some(Toast::new(
                        "Lead capture is not configured",
                        ToastKind::Error,
                        elapsed,
                    ));
                    return None;
                };
                let id = format!("{}-{now_millis:.0}", form.form_type.as_str());
                match form.to_submission(id) {
                    Ok(submission) => {
                        self.lead_submitting = true;
                        return Some(Command::Submit {
                            webhook_url,
                            submission,
                        });
                    }
                    Err(e) => {
                        self.toast = Some(Toast::new(e.to_string(), ToastKind::Error, elapsed));
                    }
                }
            }
            _ => {}
        }
        None
    }

    pub fn teardown(&mut self) {
        self.dataset.teardown();
        self.map.teardown();
    }
}

#[cfg(target_arch = "wasm32")]
fn log_error(message: &str) {
    web_sys::console::error_1(&message.into());
}

#[cfg(not(target_arch = "wasm32"))]
thread_local! {
    static CONSOLE_ERRORS: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

/// Native builds have no browser console; errors are kept per thread.
#[cfg(not(target_arch = "wasm32"))]
fn log_error(message: &str) {
    CONSOLE_ERRORS.with(|errors| errors.borrow_mut().push(message.to_string()));
}
