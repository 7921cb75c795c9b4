//! User configuration (`~/.mpm.toml`).

pub mod settings;

pub use settings::Settings;
