//! Core taxchat library (session lifecycle, backend client, config).

pub mod backend;
pub mod config;
pub mod logging;
pub mod message;
pub mod session;
pub mod textflow;
