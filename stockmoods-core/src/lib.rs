//! Board-agnostic watchface logic
//!
//! This crate contains everything the watchface decides, independent of the
//! board it runs on:
//!
//! - Clock formatting (12/24-hour `HH:MM`)
//! - Mood selection from the companion's mood code
//! - Quote message decoding and display text composition
//! - Refresh cadence
//! - The display surface (icon, time, quote regions)
//! - Application state driven by the event loop
//! - Configuration type definitions

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod app;
pub mod clock;
pub mod config;
pub mod link;
pub mod mood;
pub mod quote;
pub mod refresh;
pub mod surface;
pub mod traits;

pub use app::{App, RefreshOutcome, TickReport};
pub use clock::{format_time, ClockSync, DisplayTime, WallTime};
pub use mood::{select_icon, MoodIcon};
pub use quote::{decode_quote, DecodeWarning, QuoteSignal, QuoteUpdate};
pub use surface::{Regions, Surface};
