//! Filesystem storage for downloaded instructions
//!
//! Path resolution and on-demand directory creation live in [`layout`];
//! the run report is persisted by [`RunReport::save`](crate::models::RunReport::save).

pub mod layout;

pub use layout::{ensure_directory, filename_tail, temp_path, Layout};
