//! Lead capture: the contact form, its submission payload, and the
//! once-per-session popup gate.

use std::collections::HashSet;
use std::time::Duration;

use serde::Serialize;

use crate::error::LeadError;

pub const POPUP_SHOWN_KEY: &str = "lead-popup-shown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormType {
    Popup,
    Cta,
    Report,
}

impl FormType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Popup => "popup",
            Self::Cta => "cta",
            Self::Report => "report",
        }
    }
}

/// Body posted to the lead webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadSubmission {
    pub id: String,
    pub title: String,
    pub form_type: FormType,
    pub name: String,
    pub email: String,
    pub company: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadField {
    Name,
    Email,
    Company,
}

impl LeadField {
    pub const ALL: [Self; 3] = [Self::Name, Self::Email, Self::Company];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Email => "Email",
            Self::Company => "Company",
        }
    }

    pub const fn next(self) -> Self {
        match self {
            Self::Name => Self::Email,
            Self::Email => Self::Company,
            Self::Company => Self::Name,
        }
    }

    pub const fn prev(self) -> Self {
        match self {
            Self::Name => Self::Company,
            Self::Email => Self::Name,
            Self::Company => Self::Email,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadForm {
    pub title: String,
    pub form_type: FormType,
    pub name: String,
    pub email: String,
    pub company: String,
    pub focus: LeadField,
}

impl LeadForm {
    pub fn new(title: impl Into<String>, form_type: FormType) -> Self {
        Self {
            title: title.into(),
            form_type,
            name: String::new(),
            email: String::new(),
            company: String::new(),
            focus: LeadField::Name,
        }
    }

    pub fn value(&self, field: LeadField) -> &str {
        match field {
            LeadField::Name => &self.name,
            LeadField::Email => &self.email,
            LeadField::Company => &self.company,
        }
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            LeadField::Name => &mut self.name,
            LeadField::Email => &mut self.email,
            LeadField::Company => &mut self.company,
        }
    }

    pub fn push_char(&mut self, ch: char) {
        self.focused_mut().push(ch);
    }

    pub fn pop_char(&mut self) {
        self.focused_mut().pop();
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    pub fn validate(&self) -> Result<(), LeadError> {
        if self.name.trim().is_empty() {
            return Err(LeadError::MissingName);
        }
        if !is_plausible_email(self.email.trim()) {
            return Err(LeadError::InvalidEmail);
        }
        Ok(())
    }

    /// Builds the webhook payload. The form keeps its values either way.
    pub fn to_submission(&self, id: impl Into<String>) -> Result<LeadSubmission, LeadError> {
        self.validate()?;
        Ok(LeadSubmission {
            id: id.into(),
            title: self.title.clone(),
            form_type: self.form_type,
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            company: self.company.trim().to_string(),
        })
    }
}

fn is_plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !local.is_empty()
        && !host.is_empty()
        && tld.len() >= 2
        && !email.chars().any(char::is_whitespace)
        && !domain.contains('@')
}

/// Session-scoped boolean flags.
pub trait SessionFlagStore {
    fn get(&self, key: &str) -> bool;

    fn set(&mut self, key: &str);
}

/// Flags that live as long as the process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryFlagStore {
    flags: HashSet<String>,
}

impl SessionFlagStore for MemoryFlagStore {
    fn get(&self, key: &str) -> bool {
        self.flags.contains(key)
    }

    fn set(&mut self, key: &str) {
        self.flags.insert(key.to_string());
    }
}

/// Opens the timed lead popup at most once per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeadPopupGate {
    delay: Duration,
}

impl LeadPopupGate {
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Returns `true` exactly once per session, after `delay` has elapsed,
    /// and records that the popup was shown.
    pub fn poll<S: SessionFlagStore + ?Sized>(&self, elapsed: Duration, store: &mut S) -> bool {
        if elapsed < self.delay || store.get(POPUP_SHOWN_KEY) {
            return false;
        }
        store.set(POPUP_SHOWN_KEY);
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

/// A transient notification. Times are offsets from the app's start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub expires_at: Duration,
}

impl Toast {
    pub const DEFAULT_TTL: Duration = Duration::from_secs(4);

    pub fn new(message: impl Into<String>, kind: ToastKind, now: Duration) -> Self {
        Self {
            message: message.into(),
            kind,
            expires_at: now + Self::DEFAULT_TTL,
        }
    }

    pub fn is_expired(&self, now: Duration) -> bool {
        now >= self.expires_at
    }
}
