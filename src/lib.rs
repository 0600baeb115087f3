// Exposes the drill, generator and session modules to `tests/` and `benches/`.
// Screen and key handling code is only called from main.rs, so dead_code is
// allowed for this target.
#![allow(dead_code)]

rust_i18n::i18n!("locales", fallback = "en");

pub mod config;
pub mod drill;
pub mod generator;
pub mod session;
pub mod source;
pub mod speech;

// Crate-private; the app tests reach them from here
mod app;
mod event;
mod logging;
mod ui;
