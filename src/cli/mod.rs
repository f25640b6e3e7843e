pub mod admin;
pub mod event;
pub mod migrate;
pub mod server;
