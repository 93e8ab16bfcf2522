//! Output serializations for simulation results.

pub mod recorder;

pub use recorder::{write_config_json, GenerationRecorder};
