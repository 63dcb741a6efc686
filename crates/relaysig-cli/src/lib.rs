//! Library side of the `relaysig` command: settings and logging setup.

#![deny(unsafe_code)]

pub mod config;
pub mod logging;
