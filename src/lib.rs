// src/lib.rs

pub mod api;
pub mod app;
pub mod cards;
pub mod chat;
pub mod config;
pub mod constants;
pub mod errors;
pub mod key_handlers;
pub mod log_view;
pub mod logging;
pub mod models;
pub mod status_indicator;
pub mod tui;
pub mod ui;
