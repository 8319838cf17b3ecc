//! Terminal front end: each command boots the dashboard against the configured
//! backend and prints one view of it.

pub mod commands;
pub mod display;
