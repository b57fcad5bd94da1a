//! Scrolling two-line display engine for ircspy.
//!
//! Event handlers push text into a shared [`display::DisplayState`]; a
//! [`scheduler::Scheduler`] drives a [`render::Renderer`] that windows both
//! lines and writes the frame to a [`sink::DisplaySink`].

pub mod config;
pub mod display;
pub mod logging;
pub mod render;
pub mod scheduler;
pub mod sink;
