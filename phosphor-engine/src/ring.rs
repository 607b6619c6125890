//! Scanline handoff - non-blocking row exchange with the presenter
//!
//! One slot per display row: a tiny mutex around the pixel words plus an
//! atomic frame stamp. The producer writes rows in scan order and is the
//! only locker on its side; the presenter copies rows out with `try_lock`
//! and simply keeps its previous copy when it loses the race. Worst case is
//! a one-frame-stale row on screen for one tick - a bounded glitch, never a
//! stall on either side.

use std::sync::atomic::{AtomicU32, Ordering};

use parking_lot::Mutex;
use phosphor_fx::{VIDEO_H, VIDEO_W};

struct RowSlot {
    pixels: Mutex<Box<[u16]>>,
    frame: AtomicU32,
}

pub struct FrameRing {
    rows: Vec<RowSlot>,
}

impl FrameRing {
    pub fn new() -> Self {
        let rows = (0..VIDEO_H)
            .map(|_| RowSlot {
                pixels: Mutex::new(vec![0u16; VIDEO_W].into_boxed_slice()),
                frame: AtomicU32::new(0),
            })
            .collect();
        Self { rows }
    }

    /// Producer side: install a finished row and stamp it with its frame.
    /// The lock is uncontended unless the presenter is copying this exact
    /// row at this exact moment, and the presenter never holds it for more
    /// than one row copy.
    pub fn publish(&self, y: usize, frame: u32, pixels: &[u16]) {
        let slot = &self.rows[y];
        slot.pixels.lock().copy_from_slice(pixels);
        slot.frame.store(frame, Ordering::Release);
    }

    /// Presenter side: copy a row out without ever blocking the producer.
    /// Returns the frame stamp, or `None` when the producer holds the row
    /// right now - the previous contents of `out` stand.
    pub fn snapshot(&self, y: usize, out: &mut [u16]) -> Option<u32> {
        let slot = &self.rows[y];
        let guard = slot.pixels.try_lock()?;
        out.copy_from_slice(&guard);
        Some(slot.frame.load(Ordering::Acquire))
    }

    /// Frame stamp of a row without touching the pixels.
    pub fn frame_stamp(&self, y: usize) -> u32 {
        self.rows[y].frame.load(Ordering::Acquire)
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }
}

impl Default for FrameRing {
    fn default() -> Self {
        Self::new()
    }
}
