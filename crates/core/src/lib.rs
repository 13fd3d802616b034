//! Core types and pure logic for repairdesk
//!
//! Domain records shared by every other crate: shops, call and booking
//! sessions, cache entries, the quote ranking function and runtime
//! configuration.

mod cache;
mod config;
mod constants;
mod env_config;
mod error;
mod fallback;
mod ranking;
mod session;
mod shop;
mod task;

pub use cache::*;
pub use config::*;
pub use constants::*;
pub use env_config::*;
pub use error::*;
pub use fallback::*;
pub use ranking::*;
pub use session::*;
pub use shop::*;
pub use task::*;
