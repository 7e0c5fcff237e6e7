pub mod settings;

pub use settings::{global, Config};
