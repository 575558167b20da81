//! Rendering module
//!
//! The view snapshot is backend-agnostic; the terminal backend rasterizes it
//! into character cells.

pub mod terminal;
pub mod view;

pub use terminal::{Canvas, TerminalRenderer, Viewport, rasterize};
pub use view::FrameView;
