#![warn(missing_docs)]
//! camwatch reacts to camera captures landing in object storage: it
//! classifies them within a monthly API call budget, emails an alert at most
//! once per cooldown period when a watched label shows up, and archives past
//! months of captures into zip bundles.

pub mod archive;
pub mod clock;
pub mod cmd;
pub mod config;
pub mod engine;
pub mod handlers;
pub mod http_client;
pub mod logging;
pub mod mail;
pub mod models;
pub mod notification;
pub mod persistence;
pub mod storage;
pub mod test_helpers;
pub mod vision;
