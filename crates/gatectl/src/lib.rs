//! gatectl library - exposes modules for testing

pub mod cli;
pub mod commands;
pub mod errors;
pub mod report_display;
