//! Shared foundation for CampaignForge services
//!
//! Provides the common error type, the event bus used for host
//! notification, and configuration resolution.

pub mod config;
pub mod error;
pub mod events;

pub use error::{Error, Result};
