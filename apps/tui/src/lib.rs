// Terminal front end for the tariff tracker

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod event;
pub mod telemetry;
pub mod terminal;
pub mod ui;
