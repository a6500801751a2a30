//! # Domain Services
//!
//! Business rules that don't belong to a single entity.
//!
//! - **notification_policy**: which actions notify whom

mod notification_policy;

pub use notification_policy::*;
