pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod gui;
pub mod icons;
pub mod modal;

pub use error::{Error, Result};
