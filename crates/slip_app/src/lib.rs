//! Payment-slip application layer: the controller that wires the pure core to
//! storage, the shortening service and the UI collaborators.
mod collaborators;
mod config;
mod controller;
pub mod logging;
pub mod terminal;

pub use collaborators::{LinkClipboard, SlipRenderer};
pub use config::{AppConfig, ConfigError, CONFIG_FILENAME};
pub use controller::{Collaborators, Controller, PageContext, PendingShorten};
