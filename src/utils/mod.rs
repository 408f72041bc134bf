//! Utility modules
//!
//! This module contains common utilities used throughout the application,
//! including error handling, logging setup, id generation, and helper
//! functions.

pub mod errors;
pub mod helpers;
pub mod ids;
pub mod logging;

pub use errors::{CampusBuddyError, Result};
