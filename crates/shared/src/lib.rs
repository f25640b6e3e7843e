mod command;
mod date;
pub mod settings;

pub use command::*;
pub use date::*;
pub use settings::{EmailTemplates, Settings};
