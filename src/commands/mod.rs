//! Tauri command handlers for the frontend.
//!
//! This module exposes commands that can be invoked from the webview:
//! - [`pick_image`] / [`ingest_file`]: Choose the source image
//! - [`submit_filter`]: Apply a filter remotely
//! - [`set_view_mode`] / [`slider_pointer`]: Drive the comparison view
//! - [`export_processed`]: Save the processed image

mod image;
mod view;

pub use image::*;
pub use view::*;
