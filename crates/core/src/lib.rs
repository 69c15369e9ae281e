//! Shared model for the tariff tracker dashboards.
//!
//! The terminal and web front ends both fetch the same raw country dataset,
//! run it through [`normalize`], color it with [`color`] and hand the result
//! to a [`map::MapWidget`].

pub mod color;
pub mod domain;
pub mod error;
pub mod format;
pub mod geo;
pub mod lead;
pub mod load;
pub mod map;
pub mod normalize;
pub mod timeline;

pub use color::{map_metric, metric_color, MappedValue, Rgb, Rgba};
pub use domain::{CountryRecord, Metric, PolicyGroup, RegionFilter, TariffKind};
pub use error::{DatasetError, LeadError, MapError, RecordError, TimelineError};
pub use format::{format_metric, NOT_AVAILABLE};
pub use lead::{
    FormType, LeadForm, LeadPopupGate, LeadSubmission, MemoryFlagStore, SessionFlagStore, Toast,
    ToastKind,
};
pub use load::{DatasetSlot, LoadTicket, PageState};
pub use normalize::{normalize_countries, normalize_json, Normalized};
pub use timeline::{Timeline, TimelineEvent};
