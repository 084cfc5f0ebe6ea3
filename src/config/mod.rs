pub mod settings;

pub use settings::{load_config, Environment, Settings};
