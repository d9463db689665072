//! Uptime tracking for resource-constrained nodes.
//!
//! This crate provides:
//! - [`accumulator`]: seconds counter fed from a wrapping tick timer
//! - [`resource`]: GET handler rendering uptime as text or JSON
//! - [`rest`]: content formats, accept classification and response callbacks
//! - [`timer`]: tick and wall-clock sources
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use uptime_core::{init, BootClock, HostTimer, UptimeResource};
//!
//! let clock = init(true, &config.timer, HostTimer::new, Arc::new(BootClock::new()))?;
//! let resource = UptimeResource::new(clock, "system/uptime");
//! ```

pub mod accumulator;
pub mod format;
pub mod resource;
pub mod rest;
pub mod timer;

pub use accumulator::*;
pub use format::*;
pub use resource::*;
pub use rest::*;
pub use timer::*;
