//! Storage trait abstraction
//!
//! Session stores and the remote cache tier sit behind traits so services can
//! be exercised against in-memory or mocked backends.

pub mod cache;
pub mod session;

pub use cache::RemoteCacheTier;
pub use session::{SessionRecord, SessionStore};
