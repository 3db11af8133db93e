//! Cursor/Screen Renderer.
//!
//! - [`cursor`] - single escape-sequence primitives as crossterm commands
//! - [`theme`] - color palette, styles and platform glyphs
//! - [`screen`] - composite prompt rendering on top of the primitives

pub mod cursor;
pub mod screen;
pub mod theme;

pub use screen::{Phase, Renderer};
pub use theme::{Color, Glyphs, Style, Theme, GLYPHS};
