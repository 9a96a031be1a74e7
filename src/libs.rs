pub mod seq;
pub mod gene;
pub mod io;
pub mod usage;
pub mod metrics;
pub mod sample;
pub mod checker;
pub mod rbs;
pub mod design;
pub mod config;
pub mod error;
pub mod stats;

mod constants;

pub use crate::config::DesignConfig;
pub use crate::design::{Transcript, TranscriptDesigner};
pub use crate::error::{Error, Result};
pub use crate::metrics::ReferenceMotifs;
pub use crate::rbs::{RbsChooser, RbsOption};
pub use crate::usage::CodonUsageTable;
