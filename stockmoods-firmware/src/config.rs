//! Build-time configuration
//!
//! `build.rs` validates `watch.toml` and generates `WATCH_CONFIG`.

use stockmoods_core::config::{ClockConfig, CompanionConfig, RefreshConfig, WatchConfig};

include!(concat!(env!("OUT_DIR"), "/watch_config.rs"));
