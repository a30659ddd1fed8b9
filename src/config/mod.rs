//! Configuration loaded from `<data_dir>/config.toml`.

pub mod settings;

pub use settings::{default_data_dir, Settings};
