//! Output formatting for panel results

pub mod console;
pub mod formatter;
