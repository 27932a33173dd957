//! System-level modules
//!
//! - Logging initialization
//! - Session change notifications

pub mod event;
pub mod logging;
