mod admission;
mod bulk;
mod export;
mod filter;
mod lock;
mod store;
mod types;

pub use admission::*;
pub use bulk::*;
pub use export::*;
pub use filter::*;
pub use lock::EventLocks;
pub use store::*;
pub use types::*;
