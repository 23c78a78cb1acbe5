//! Buffer module: double-buffered frames for the renderer.
//!
//! This module contains:
//! - [`Cell`]: one character plus its [`Style`]
//! - [`Frame`]: a grid of cells representing the viewport
//! - [`diff`]: diffing engine for generating minimal ANSI sequences

mod cell;
pub mod diff;
mod frame;

pub use cell::{Cell, Style};
pub use frame::Frame;
