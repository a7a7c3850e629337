pub use direction::*;
pub use error::*;
pub use history::{Decision, History, HistoryStrategy};
pub use superposition::*;
pub use tileset::*;
pub use wfc_task::{Status, WfcOutput, WfcSettings, WfcTask};

pub mod direction;
pub mod entropy;
pub mod error;
pub mod grid;
pub mod history;
pub mod propagator;
pub mod superposition;
pub mod support;
pub mod tileset;
pub mod wave;
pub mod wfc_backend;
pub mod wfc_task;
