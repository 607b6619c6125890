//! Audio track - compiled-in chiptune payload and its playback cursor
//!
//! The soundtrack is a two-voice square-wave pattern rendered once at
//! startup into an 8 kHz signed 8-bit payload, then streamed out through a
//! cursor that widens each sample to 16 bits and saturates at the end of the
//! payload. There is no loop: the demo outlives its soundtrack by design.

/// Payload sample rate in Hz.
pub const TRACK_RATE: u32 = 8_000;

/// Sixteenth-note length in payload samples (~150 BPM).
const STEP_SAMPLES: usize = 800;

/// Rest marker in the pattern tables.
const REST: i8 = i8::MIN;

/// One pattern row: lead note, bass note (semitones relative to A-4 and
/// A-2), and length in sixteenths.
#[derive(Clone, Copy)]
struct Step {
    lead: i8,
    bass: i8,
    len: u8,
}

const fn step(lead: i8, bass: i8, len: u8) -> Step {
    Step { lead, bass, len }
}

/// Main phrase: a minor arpeggio walk over a droning root.
const PHRASE_A: &[Step] = &[
    step(0, 0, 2),
    step(3, 0, 2),
    step(7, 0, 2),
    step(12, 0, 2),
    step(7, -5, 2),
    step(3, -5, 2),
    step(0, -5, 4),
    step(REST, -5, 2),
];

/// Answer phrase: the walk shifted onto the relative major.
const PHRASE_B: &[Step] = &[
    step(-2, -2, 2),
    step(2, -2, 2),
    step(5, -2, 2),
    step(10, -2, 2),
    step(5, -7, 2),
    step(2, -7, 2),
    step(-2, -7, 4),
    step(REST, -7, 2),
];

/// Closing phrase: held chord tones ringing out.
const PHRASE_C: &[Step] = &[
    step(0, 0, 4),
    step(3, -5, 4),
    step(7, 0, 4),
    step(12, -12, 8),
    step(REST, REST, 4),
];

/// Arrangement: (phrase, transpose in semitones).
const ARRANGEMENT: &[(&[Step], i8)] = &[
    (PHRASE_A, 0),
    (PHRASE_A, 0),
    (PHRASE_B, 0),
    (PHRASE_A, 0),
    (PHRASE_A, -2),
    (PHRASE_B, -2),
    (PHRASE_A, 0),
    (PHRASE_A, 3),
    (PHRASE_B, 3),
    (PHRASE_A, 0),
    (PHRASE_A, -2),
    (PHRASE_B, -2),
    (PHRASE_A, 0),
    (PHRASE_A, 0),
    (PHRASE_B, 0),
    (PHRASE_A, 3),
    (PHRASE_B, 3),
    (PHRASE_A, 0),
    (PHRASE_A, 0),
    (PHRASE_C, 0),
];

/// Frequency of a note in Hz, `semitones` relative to the given base.
fn note_hz(base: f32, semitones: i8) -> f32 {
    base * 2.0f32.powf(semitones as f32 / 12.0)
}

/// The rendered payload. Write-once at startup, read-only afterwards.
pub struct Track {
    samples: Vec<i8>,
}

impl Track {
    /// Render the arrangement. A square lead with a linear decay envelope
    /// over a quieter square bass, mixed and clamped into signed 8-bit.
    pub fn render() -> Self {
        let mut samples = Vec::new();
        let mut lead_phase = 0.0f32;
        let mut bass_phase = 0.0f32;

        for &(phrase, transpose) in ARRANGEMENT {
            for row in phrase {
                let count = row.len as usize * STEP_SAMPLES;
                let lead_step = if row.lead == REST {
                    0.0
                } else {
                    note_hz(440.0, row.lead.saturating_add(transpose)) / TRACK_RATE as f32
                };
                let bass_step = if row.bass == REST {
                    0.0
                } else {
                    note_hz(110.0, row.bass.saturating_add(transpose)) / TRACK_RATE as f32
                };

                for i in 0..count {
                    let mut mix = 0i32;

                    if lead_step > 0.0 {
                        // Envelope: full at the attack, fading to a third.
                        let env = 64 - (i * 42 / count) as i32;
                        mix += if lead_phase < 0.5 { env } else { -env };
                        lead_phase += lead_step;
                        if lead_phase >= 1.0 {
                            lead_phase -= 1.0;
                        }
                    }
                    if bass_step > 0.0 {
                        mix += if bass_phase < 0.5 { 28 } else { -28 };
                        bass_phase += bass_step;
                        if bass_phase >= 1.0 {
                            bass_phase -= 1.0;
                        }
                    }

                    samples.push(mix.clamp(-127, 127) as i8);
                }
            }
        }

        tracing::debug!(samples = samples.len(), "track rendered");
        Self { samples }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[inline]
    fn sample(&self, index: usize) -> i8 {
        self.samples[index]
    }

    #[cfg(test)]
    fn from_samples(samples: Vec<i8>) -> Self {
        Self { samples }
    }
}

/// Position cursor over a track. The step is the ratio of the payload rate
/// to the output device rate, so one device sample advances the payload by
/// the right fraction; the position saturates at the final sample.
pub struct TrackCursor {
    position: f64,
    step: f64,
}

impl TrackCursor {
    pub fn new(output_rate: u32) -> Self {
        Self {
            position: 0.0,
            step: TRACK_RATE as f64 / output_rate.max(1) as f64,
        }
    }

    /// Fill a buffer of mono f32 samples, widening each payload byte to 16
    /// bits first. Past the end of the payload the last sample holds.
    pub fn fill(&mut self, track: &Track, out: &mut [f32]) {
        if track.is_empty() {
            out.fill(0.0);
            return;
        }
        let last = (track.len() - 1) as f64;
        for sample in out.iter_mut() {
            let wide = (track.sample(self.position as usize) as i16) << 8;
            *sample = wide as f32 / 32768.0;
            self.position = (self.position + self.step).min(last);
        }
    }

    #[inline]
    pub fn position(&self) -> f64 {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_is_nontrivial_and_bounded() {
        let track = Track::render();
        // Long enough to cover the timeline at 60 frames/s.
        assert!(track.len() > 30 * TRACK_RATE as usize);
        assert!(track.samples.iter().any(|&s| s != 0));
    }

    #[test]
    fn test_cursor_widens_samples() {
        let track = Track::from_samples(vec![0, 64, -64, 127]);
        let mut cursor = TrackCursor::new(TRACK_RATE);
        let mut out = [0.0f32; 4];
        cursor.fill(&track, &mut out);
        assert_eq!(out[0], 0.0);
        assert_eq!(out[1], (64 << 8) as f32 / 32768.0);
        assert_eq!(out[2], ((-64i16) << 8) as f32 / 32768.0);
    }

    #[test]
    fn test_cursor_saturates_at_end() {
        let track = Track::from_samples(vec![10, 20, 30, 40]);
        let mut cursor = TrackCursor::new(TRACK_RATE);
        let mut out = [0.0f32; 8];
        cursor.fill(&track, &mut out);
        let held = (40i16 << 8) as f32 / 32768.0;
        // The tail holds the final sample.
        assert_eq!(out[4], held);
        assert_eq!(out[7], held);
        assert_eq!(cursor.position(), 3.0);
    }

    #[test]
    fn test_cursor_rate_conversion() {
        let track = Track::from_samples(vec![0; 100]);
        let mut cursor = TrackCursor::new(TRACK_RATE * 2);
        let mut out = [0.0f32; 4];
        cursor.fill(&track, &mut out);
        // Half-rate step: two output samples per payload sample.
        assert_eq!(cursor.position(), 2.0);
    }
}
