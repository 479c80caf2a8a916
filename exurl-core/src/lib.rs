pub mod cli;
pub mod config;
pub mod error;
pub mod headers;
pub mod identity;
pub mod inspect;
pub mod logging;
mod proxy;
pub mod server;
pub mod target;
pub mod upstream;
