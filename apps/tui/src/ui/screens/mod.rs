pub mod countries;
pub mod details;
pub mod help;
pub mod lead_form;
pub mod map;
pub mod timeline;
