#![no_std]

//! Electronic lead screw core: a ratio-tracking step generator for a lathe power feed.
//!
//! The following pieces are implemented:
//!
//! 1. Tick-driven trapezoidal ramping, tracking a sensed lead axis by a configurable ratio.
//! 1. Direction management, decelerating to rest before ever reversing.
//! 1. Soft stops on either end of travel, and a fixed-rate jog mode for manual positioning.
//! 1. Host-testable hardware abstraction: the controller is generic over the pin I/O and
//!    lead-axis sensor capability traits, so it never touches chip registers directly.
//!
//! This crate has no knowledge of any particular microcontroller, UI, or persistence layer. An
//! embedding binary wires a concrete [`pin::PinIo`] and [`sensor::LeadAxisSensor`] in and drives
//! [`tick::TickDriver`] from its timer interrupt.

#[cfg(test)]
extern crate std;

pub mod config;
pub mod error;
pub mod leadscrew;
pub mod pin;
pub mod sensor;
pub mod state;
pub mod tick;

pub use config::Config;
pub use error::{ConfigError, RatioError};
pub use leadscrew::{Direction, Leadscrew, StopEnd};
pub use pin::{Level, PinIo};
pub use sensor::LeadAxisSensor;
pub use state::{GlobalState, MotionMode, RatioPreset, ThreadSyncState, DEFAULT_RATIO_PRESETS};
pub use tick::TickDriver;
