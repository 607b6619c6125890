//! Frame/scanline scheduler - the demo's only time authority
//!
//! Owns the frame counter, the per-effect countdown, the active effect and
//! palette, and the scan position. Nothing else writes these. The frame
//! prologue is a guarded one-shot: however many times it is called between
//! two scanline wraps, the transition and counter bookkeeping run exactly
//! once, because re-running them mid-frame would corrupt layer state.

use phosphor_fx::Layer;

use crate::effect::{Effect, Wipe};

pub struct Scheduler {
    effect: Effect,
    palette: usize,
    frame: u32,
    remaining: u32,
    row: usize,
    prologue_done: bool,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            effect: Effect::Start,
            palette: Effect::Start.palette(),
            frame: 0,
            remaining: Effect::Start.duration(),
            row: 0,
            prologue_done: false,
        }
    }

    #[inline]
    pub fn effect(&self) -> Effect {
        self.effect
    }

    #[inline]
    pub fn palette(&self) -> usize {
        self.palette
    }

    #[inline]
    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// Scanlines handed out so far this frame.
    #[inline]
    pub fn row(&self) -> usize {
        self.row
    }

    /// Allow the next `begin_frame` call to run.
    pub fn rearm(&mut self) {
        self.prologue_done = false;
    }

    /// Frame prologue. When the countdown has expired: advance the effect,
    /// reload the countdown, switch the palette, and apply the buffer wipe
    /// policy. Always: bump the frame counter, burn one countdown frame, and
    /// reset the scan position. Repeated calls before the next `rearm` are
    /// no-ops. Returns the new effect when a transition happened.
    pub fn begin_frame(&mut self, bg: &mut Layer, fg: &mut Layer) -> Option<Effect> {
        if self.prologue_done {
            return None;
        }

        let mut switched = None;
        if self.remaining == 0 {
            self.effect = self.effect.next();
            self.remaining = self.effect.duration();
            self.palette = self.effect.palette();

            match self.effect.wipe() {
                Wipe::Clear => bg.clear(),
                Wipe::Half => bg.dim_half(),
                Wipe::Quarter => bg.dim_quarter(),
            }
            fg.clear();

            tracing::debug!(
                effect = self.effect.label(),
                frame = self.frame,
                "effect transition"
            );
            switched = Some(self.effect);
        }

        self.frame += 1;
        self.remaining = self.remaining.saturating_sub(1);
        self.row = 0;
        self.prologue_done = true;
        switched
    }

    /// Scheduler dropped mid-timeline, for pipeline tests.
    #[cfg(test)]
    pub(crate) fn with_state(effect: Effect, frame: u32, remaining: u32) -> Self {
        Self {
            effect,
            palette: effect.palette(),
            frame,
            remaining,
            row: 0,
            prologue_done: true,
        }
    }

    /// Hand out the next scanline index of the current frame.
    #[inline]
    pub fn take_row(&mut self) -> usize {
        let row = self.row;
        self.row += 1;
        row
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::SEQUENCE;
    use phosphor_fx::VIDEO_H;

    /// Drive the scheduler through whole frames the way the render loop does.
    fn run_frames(sched: &mut Scheduler, bg: &mut Layer, fg: &mut Layer, frames: u32) {
        for _ in 0..frames {
            sched.rearm();
            sched.begin_frame(bg, fg);
            for _ in 0..VIDEO_H {
                sched.take_row();
            }
        }
    }

    /// Effect expected while the given frame is being rendered.
    fn expected_effect(frame: u32) -> Effect {
        for effect in SEQUENCE.iter().rev() {
            if frame > effect.start_frame() {
                return *effect;
            }
        }
        Effect::Start
    }

    #[test]
    fn test_prologue_is_one_shot() {
        let mut sched = Scheduler::new();
        let (mut bg, mut fg) = (Layer::new(), Layer::new());

        sched.begin_frame(&mut bg, &mut fg);
        let frame = sched.frame();
        assert!(sched.begin_frame(&mut bg, &mut fg).is_none());
        assert_eq!(sched.frame(), frame);

        sched.rearm();
        sched.begin_frame(&mut bg, &mut fg);
        assert_eq!(sched.frame(), frame + 1);
    }

    #[test]
    fn test_transition_exactly_at_countdown_zero() {
        let mut sched = Scheduler::new();
        let (mut bg, mut fg) = (Layer::new(), Layer::new());

        run_frames(&mut sched, &mut bg, &mut fg, 10);
        assert_eq!(sched.effect(), Effect::Start);

        sched.rearm();
        assert_eq!(sched.begin_frame(&mut bg, &mut fg), Some(Effect::Water));
        assert_eq!(sched.palette(), Effect::Water.palette());
    }

    #[test]
    fn test_effect_matches_cumulative_lookup() {
        let mut sched = Scheduler::new();
        let (mut bg, mut fg) = (Layer::new(), Layer::new());

        for _ in 0..2000u32 {
            sched.rearm();
            sched.begin_frame(&mut bg, &mut fg);
            assert_eq!(
                sched.effect(),
                expected_effect(sched.frame()),
                "frame {}",
                sched.frame()
            );
        }
    }

    #[test]
    fn test_full_run_lands_on_terminal_effect() {
        let mut sched = Scheduler::new();
        let (mut bg, mut fg) = (Layer::new(), Layer::new());

        run_frames(&mut sched, &mut bg, &mut fg, Effect::End.start_frame());
        assert_ne!(sched.effect(), Effect::End);

        sched.rearm();
        assert_eq!(sched.begin_frame(&mut bg, &mut fg), Some(Effect::End));
        assert_eq!(sched.palette(), 3);

        // The terminal effect holds from here on.
        run_frames(&mut sched, &mut bg, &mut fg, 500);
        assert_eq!(sched.effect(), Effect::End);
    }

    #[test]
    fn test_wipe_policies_applied_on_transition() {
        let mut sched = Scheduler::new();
        let (mut bg, mut fg) = (Layer::new(), Layer::new());

        // Into Water: background quartered, foreground cleared.
        run_frames(&mut sched, &mut bg, &mut fg, 10);
        bg.set(5, 5, 200);
        fg.set(5, 5, 200);
        sched.rearm();
        sched.begin_frame(&mut bg, &mut fg);
        assert_eq!(sched.effect(), Effect::Water);
        assert_eq!(bg.get(5, 5), 50);
        assert_eq!(fg.get(5, 5), 0);

        // Into Acid: background halved.
        run_frames(&mut sched, &mut bg, &mut fg, 214);
        bg.set(5, 5, 200);
        sched.rearm();
        sched.begin_frame(&mut bg, &mut fg);
        assert_eq!(sched.effect(), Effect::Acid);
        assert_eq!(bg.get(5, 5), 100);

        // Into the wireframe scene: background cleared.
        run_frames(&mut sched, &mut bg, &mut fg, 130);
        bg.set(5, 5, 200);
        sched.rearm();
        sched.begin_frame(&mut bg, &mut fg);
        assert_eq!(sched.effect(), Effect::Wireframe);
        assert_eq!(bg.get(5, 5), 0);
    }
}
