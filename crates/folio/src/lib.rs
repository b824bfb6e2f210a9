//! Headless driver for the portfolio effects.
//!
//! Mounts the effects on the in-memory sample page and replays the timer
//! queue, either instantly or paced by a `tokio` runtime.

pub mod cli;
pub mod timeline;

pub use cli::Cli;
pub use timeline::{Change, Frame, HeadlessPage, Recorder, boot, render, replay, replay_live};
