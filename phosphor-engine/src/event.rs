//! Events from the worker threads to the presenter loop

use crossbeam_channel::{bounded, Receiver, Sender};

use crate::effect::Effect;

/// Notifications the presenter cares about. Effect changes feed the status
/// line; an audio fault is fatal for a fixed-timeline production.
#[derive(Debug, Clone)]
pub enum DemoEvent {
    EffectChanged(Effect),
    AudioFault(String),
}

pub type EventSender = Sender<DemoEvent>;
pub type EventReceiver = Receiver<DemoEvent>;

/// Bounded channel for demo events. 64 slots is generous: transitions are
/// seconds apart and faults terminate the run.
pub fn event_channel() -> (EventSender, EventReceiver) {
    bounded(64)
}
