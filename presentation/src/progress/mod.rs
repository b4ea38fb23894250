//! Progress reporting for the command line

pub mod reporter;
