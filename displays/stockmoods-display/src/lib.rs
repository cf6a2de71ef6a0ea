//! Display abstraction and watchface renderer for Stock Moods
//!
//! This crate provides:
//! - `DisplayBackend` trait for drawing the three watchface regions
//! - `GraphicsBackend`, a `DisplayBackend` over any embedded-graphics
//!   `DrawTarget<Color = BinaryColor>`
//! - `FrameBuffer`, a 1-bit buffer with per-line dirty tracking
//! - Screen layout and mood face artwork
//! - `Renderer`, which redraws only the regions whose content changed
//!
//! # Architecture
//!
//! The controller owns the [`Surface`](stockmoods_core::Surface) and hands
//! snapshots to the display task. The display task feeds them to a
//! [`Renderer`], which draws into the panel's frame buffer through a
//! [`DisplayBackend`]; the panel driver then pushes the buffer out.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod backend;
pub mod framebuffer;
pub mod graphics;
pub mod icons;
pub mod layout;
pub mod render;

// Re-export key types
pub use backend::{DisplayBackend, DisplayError};
pub use framebuffer::FrameBuffer;
pub use graphics::GraphicsBackend;
pub use render::Renderer;
