//! Library exports shared by the desktop app, the CLI and the tests.
/// Typed client for the diagnosis backend.
pub mod api;
/// Application directory helpers.
pub mod app_dirs;
/// TOML configuration with environment overrides.
pub mod config;
/// Form state, presets and the diagnosis controller.
pub mod diagnosis;
/// Shared HTTP agent construction and retry helpers.
pub mod http_client;
/// Logging setup.
pub mod logging;
/// egui front end.
pub mod ui;
