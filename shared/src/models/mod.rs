//! Data models
//!
//! Shared between admin-server and frontend (via API).
//! Wire field names (`reporting_ids`, `page`, `actions`) match the
//! existing backend contract and must not change.

pub mod hierarchy;
pub mod permission;
pub mod role;

// Re-exports
pub use hierarchy::*;
pub use permission::*;
pub use role::*;
