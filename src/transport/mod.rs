//! Transport layer: command-line front end

pub mod cli;
