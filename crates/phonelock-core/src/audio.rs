//! Chime synthesis and the audio output capability seam.
//!
//! The synthesizer owns the user's audio preference and a lazily-acquired
//! output slot. Hosts without any audio capability degrade to a silent
//! no-op; the chime emission itself (frequency pick, event) still happens.

use rand::Rng;

use crate::config::ChimeConfig;

/// Host-supplied audio output device.
///
/// Implementations play already-rendered mono `f32` buffers at their own
/// sample rate.
pub trait AudioOutput {
    fn sample_rate(&self) -> u32;

    /// Queue one rendered buffer for playback.
    fn play(&mut self, samples: &[f32]);

    /// Bring the device back from a suspended state. Best effort.
    fn resume(&mut self) {}
}

/// Factory lazily acquiring an [`AudioOutput`].
pub trait AudioOutputFactory {
    /// Try to open the host's audio output. `None` means the capability is
    /// absent, which is never an error.
    fn acquire(&mut self) -> Option<Box<dyn AudioOutput>>;
}

/// Factory for hosts without any audio capability.
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioOutputFactory for NullAudio {
    fn acquire(&mut self) -> Option<Box<dyn AudioOutput>> {
        None
    }
}

enum OutputSlot {
    Unacquired,
    Absent,
    Ready(Box<dyn AudioOutput>),
}

/// Synthesizes short notification chimes.
///
/// The output device is acquired once on first use and kept for the process
/// lifetime; it is resumed before every playback in case the host suspended
/// it in the meantime.
pub struct ChimeSynth {
    config: ChimeConfig,
    enabled: bool,
    slot: OutputSlot,
    factory: Box<dyn AudioOutputFactory>,
}

impl ChimeSynth {
    /// Starts muted, matching a phone that has not been interacted with yet.
    pub fn new(config: ChimeConfig, factory: Box<dyn AudioOutputFactory>) -> Self {
        Self {
            config,
            enabled: false,
            slot: OutputSlot::Unacquired,
            factory,
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Flip the audio preference. Enabling also acquires/resumes the output.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if enabled {
            self.ensure_output();
        }
    }

    /// Whether an output device is currently held.
    pub fn has_output(&self) -> bool {
        matches!(self.slot, OutputSlot::Ready(_))
    }

    /// Emit one chime: pick a frequency in the configured band, render the
    /// tone and play it. Returns the frequency, or `None` when audio is
    /// disabled. Playback silently degrades when no output exists.
    pub fn emit(&mut self, rng: &mut impl Rng) -> Option<f32> {
        if !self.enabled {
            return None;
        }
        let freq_hz = rng.gen_range(self.config.min_freq_hz..=self.config.max_freq_hz);
        self.ensure_output();
        if let OutputSlot::Ready(out) = &mut self.slot {
            out.resume();
            let samples = render_chime(freq_hz, out.sample_rate(), &self.config);
            out.play(&samples);
        }
        Some(freq_hz)
    }

    fn ensure_output(&mut self) {
        if matches!(self.slot, OutputSlot::Unacquired) {
            self.slot = match self.factory.acquire() {
                Some(out) => OutputSlot::Ready(out),
                None => {
                    tracing::debug!("no audio output available, chimes will be silent");
                    OutputSlot::Absent
                }
            };
        }
        if let OutputSlot::Ready(out) = &mut self.slot {
            out.resume();
        }
    }
}

const ENVELOPE_FLOOR: f32 = 1e-4;

/// Render one chime: a triangle oscillator under a fast exponential
/// attack/decay envelope, followed by a silent tail up to `total_ms`.
pub fn render_chime(freq_hz: f32, sample_rate: u32, config: &ChimeConfig) -> Vec<f32> {
    let sr = sample_rate as f32;
    let total = (sr * config.total_ms as f32 / 1000.0) as usize;
    let attack_s = config.attack_ms as f32 / 1000.0;
    let decay_s = config.decay_ms.max(1) as f32 / 1000.0;
    let peak = config.peak_gain;

    let mut samples = Vec::with_capacity(total);
    for i in 0..total {
        let t = i as f32 / sr;
        let gain = if t < attack_s {
            ENVELOPE_FLOOR * (peak / ENVELOPE_FLOOR).powf(t / attack_s)
        } else if t < attack_s + decay_s {
            peak * (ENVELOPE_FLOOR / peak).powf((t - attack_s) / decay_s)
        } else {
            0.0
        };
        let phase = (freq_hz * t).fract();
        let tri = 1.0 - 4.0 * (phase - 0.5).abs();
        samples.push(tri * gain);
    }
    samples
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    use rand::SeedableRng;
    use rand_pcg::Mcg128Xsl64;

    struct CountingOutput {
        plays: Rc<Cell<usize>>,
    }

    impl AudioOutput for CountingOutput {
        fn sample_rate(&self) -> u32 {
            48_000
        }
        fn play(&mut self, samples: &[f32]) {
            assert!(!samples.is_empty());
            self.plays.set(self.plays.get() + 1);
        }
    }

    struct CountingFactory {
        acquisitions: Rc<Cell<usize>>,
        plays: Rc<Cell<usize>>,
    }

    impl AudioOutputFactory for CountingFactory {
        fn acquire(&mut self) -> Option<Box<dyn AudioOutput>> {
            self.acquisitions.set(self.acquisitions.get() + 1);
            Some(Box::new(CountingOutput {
                plays: self.plays.clone(),
            }))
        }
    }

    fn rng() -> Mcg128Xsl64 {
        Mcg128Xsl64::seed_from_u64(42)
    }

    #[test]
    fn disabled_synth_is_a_no_op() {
        let mut synth = ChimeSynth::new(ChimeConfig::default(), Box::new(NullAudio));
        assert!(synth.emit(&mut rng()).is_none());
        assert!(!synth.has_output());
    }

    #[test]
    fn absent_output_still_emits() {
        let mut synth = ChimeSynth::new(ChimeConfig::default(), Box::new(NullAudio));
        synth.set_enabled(true);
        let freq = synth.emit(&mut rng()).unwrap();
        assert!((440.0..=880.0).contains(&freq));
        assert!(!synth.has_output());
    }

    #[test]
    fn output_acquired_once_and_played() {
        let acquisitions = Rc::new(Cell::new(0));
        let plays = Rc::new(Cell::new(0));
        let factory = CountingFactory {
            acquisitions: acquisitions.clone(),
            plays: plays.clone(),
        };
        let mut synth = ChimeSynth::new(ChimeConfig::default(), Box::new(factory));
        synth.set_enabled(true);
        let mut rng = rng();
        synth.emit(&mut rng);
        synth.emit(&mut rng);
        synth.emit(&mut rng);
        assert_eq!(acquisitions.get(), 1);
        assert_eq!(plays.get(), 3);
    }

    #[test]
    fn rendered_chime_spans_total_length() {
        let config = ChimeConfig::default();
        let samples = render_chime(440.0, 48_000, &config);
        assert_eq!(samples.len(), 12_000); // 250ms at 48kHz
    }

    #[test]
    fn envelope_peaks_near_configured_gain() {
        let config = ChimeConfig::default();
        let samples = render_chime(440.0, 48_000, &config);
        let max = samples.iter().fold(0.0f32, |m, s| m.max(s.abs()));
        assert!(max <= config.peak_gain * 1.01, "max {max}");
        assert!(max >= config.peak_gain * 0.7, "max {max}");
    }

    #[test]
    fn envelope_starts_and_ends_quiet() {
        let config = ChimeConfig::default();
        let samples = render_chime(600.0, 48_000, &config);
        assert!(samples[0].abs() <= ENVELOPE_FLOOR);
        assert_eq!(*samples.last().unwrap(), 0.0);
    }
}
