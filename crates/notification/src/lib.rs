mod dispatcher;
mod placeholder;
mod reminder;
mod service;

pub use dispatcher::*;
pub use placeholder::*;
pub use reminder::*;
pub use service::*;
