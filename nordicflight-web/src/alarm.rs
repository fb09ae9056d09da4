use macroquad::audio::{Sound, load_sound_from_bytes, play_sound_once};
use tracing::{debug, warn};

const SAMPLE_RATE: u32 = 22_050;
const TONE_SECONDS: f32 = 0.5;
const SWEEP_SECONDS: f32 = 0.1;
const START_HZ: f32 = 440.0;
const END_HZ: f32 = 880.0;
const START_GAIN: f32 = 0.1;
const END_GAIN: f32 = 0.001;
/// Delay between arming the alarm and the beep.
pub const ALARM_DELAY_SECS: f64 = 1.0;

/// Square-wave pitch: exponential 440 -> 880 Hz sweep, then held.
pub fn tone_frequency(t: f32) -> f32 {
    if t >= SWEEP_SECONDS {
        END_HZ
    } else {
        START_HZ * (END_HZ / START_HZ).powf(t.max(0.0) / SWEEP_SECONDS)
    }
}

/// Exponential decay from 0.1 to 0.001 over the tone.
pub fn tone_gain(t: f32) -> f32 {
    START_GAIN * (END_GAIN / START_GAIN).powf(t.clamp(0.0, TONE_SECONDS) / TONE_SECONDS)
}

pub fn alert_tone_samples() -> Vec<i16> {
    let count = (SAMPLE_RATE as f32 * TONE_SECONDS) as usize;
    let mut phase = 0.0_f32;
    let mut samples = Vec::with_capacity(count);
    for index in 0..count {
        let t = index as f32 / SAMPLE_RATE as f32;
        let level = if phase < 0.5 { 1.0 } else { -1.0 };
        samples.push((level * tone_gain(t) * f32::from(i16::MAX)) as i16);
        phase = (phase + tone_frequency(t) / SAMPLE_RATE as f32).fract();
    }
    samples
}

/// Mono 16-bit PCM WAV container around `samples`.
pub fn encode_wav(samples: &[i16], sample_rate: u32) -> Vec<u8> {
    let data_len = (samples.len() * 2) as u32;
    let mut wav = Vec::with_capacity(44 + samples.len() * 2);
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data_len).to_le_bytes());
    wav.extend_from_slice(b"WAVE");
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
    wav.extend_from_slice(&1u16.to_le_bytes()); // mono
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&(sample_rate * 2).to_le_bytes());
    wav.extend_from_slice(&2u16.to_le_bytes());
    wav.extend_from_slice(&16u16.to_le_bytes());
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_len.to_le_bytes());
    for sample in samples {
        wav.extend_from_slice(&sample.to_le_bytes());
    }
    wav
}

/// Pending one-shot alarm; re-arming replaces the previous deadline.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AlarmSchedule {
    due_at: Option<f64>,
}

impl AlarmSchedule {
    pub fn arm(&mut self, now: f64) {
        self.due_at = Some(now + ALARM_DELAY_SECS);
    }

    /// True exactly once, on the first call at or after the deadline.
    pub fn take_due(&mut self, now: f64) -> bool {
        match self.due_at {
            Some(due_at) if now >= due_at => {
                self.due_at = None;
                true
            }
            _ => false,
        }
    }
}

pub struct AlertTone {
    sound: Option<Sound>,
}

impl AlertTone {
    pub async fn load() -> Self {
        let wav = encode_wav(&alert_tone_samples(), SAMPLE_RATE);
        let sound = match load_sound_from_bytes(&wav).await {
            Ok(sound) => Some(sound),
            Err(err) => {
                warn!(error = ?err, "alert tone unavailable");
                None
            }
        };
        Self { sound }
    }

    pub fn play(&self) {
        if let Some(sound) = &self.sound {
            debug!("playing alert tone");
            play_sound_once(sound);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sweep_and_decay_match_the_console_beep() {
        assert!((tone_frequency(0.0) - 440.0).abs() < 1e-3);
        assert!((tone_frequency(0.05) - 440.0 * 2f32.sqrt()).abs() < 1e-2);
        assert_eq!(tone_frequency(0.3), 880.0);
        assert!((tone_gain(0.0) - 0.1).abs() < 1e-6);
        assert!((tone_gain(TONE_SECONDS) - 0.001).abs() < 1e-6);
    }

    #[test]
    fn wav_header_describes_the_samples() {
        let samples = alert_tone_samples();
        assert_eq!(samples.len(), 11_025);
        let peak = samples.iter().map(|sample| sample.unsigned_abs()).max().unwrap();
        assert!(peak <= (f32::from(i16::MAX) * 0.1) as u16 + 1);

        let wav = encode_wav(&samples, SAMPLE_RATE);
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..16], b"WAVEfmt ");
        assert_eq!(&wav[36..40], b"data");
        let data_len = u32::from_le_bytes([wav[40], wav[41], wav[42], wav[43]]);
        assert_eq!(data_len as usize, samples.len() * 2);
        assert_eq!(wav.len(), 44 + samples.len() * 2);
    }

    #[test]
    fn schedule_fires_once_after_the_delay() {
        let mut schedule = AlarmSchedule::default();
        assert!(!schedule.take_due(10.0));

        schedule.arm(2.0);
        assert!(!schedule.take_due(2.5));
        assert!(schedule.take_due(3.0));
        assert!(!schedule.take_due(4.0));

        schedule.arm(4.0);
        schedule.arm(4.5);
        assert!(!schedule.take_due(5.2));
        assert!(schedule.take_due(5.5));
    }
}
