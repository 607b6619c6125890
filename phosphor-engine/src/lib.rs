//! Sequencing and pipeline for Phosphor
//!
//! This crate owns the demo's time base and its two production pipelines:
//! - Effect: the fixed timeline (order, durations, palettes, wipes)
//! - Scheduler: frame counter, countdown, and the one-shot frame prologue
//! - Demo/compositor: per-scanline generator dispatch and OR compositing
//! - FrameRing: non-blocking scanline handoff to the presenter
//! - Track: the compiled-in chiptune payload and its playback cursor

mod compositor;
mod effect;
mod event;
mod ring;
mod scheduler;
mod track;

pub use compositor::{Demo, LEAD_ROWS};
pub use effect::{Effect, Wipe};
pub use event::{event_channel, DemoEvent, EventReceiver, EventSender};
pub use ring::FrameRing;
pub use scheduler::Scheduler;
pub use track::{Track, TrackCursor, TRACK_RATE};
