//! Data models for the courtclub backend.
//!
//! JSON field names are camelCase to match the club frontend.

mod booking;
mod court;
mod member;
mod wallet;

pub use booking::*;
pub use court::*;
pub use member::*;
pub use wallet::*;
