use log::debug;
use sdl2::audio::{AudioCallback, AudioDevice, AudioSpecDesired};

const SAMPLE_RATE: i32 = 44_100;
const VOLUME: f32 = 0.25;

/// A mono square wave at a fixed pitch
pub struct SquareWave {
    phase_inc: f32,
    phase: f32,
    volume: f32,
}

impl AudioCallback for SquareWave {
    type Channel = f32;

    fn callback(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = if self.phase < 0.5 {
                self.volume
            } else {
                -self.volume
            };
            self.phase = (self.phase + self.phase_inc) % 1.0;
        }
    }
}

/// # Beeper
/// The Chip-8 buzzer. It sounds for as long as the sound timer is non-zero.
pub struct Beeper {
    device: AudioDevice<SquareWave>,
    playing: bool,
}

impl Beeper {
    /// Opens a paused playback device on `sdl`
    ///
    /// # Arguments
    /// * `tone_hz` the pitch of the buzzer
    pub fn new(sdl: &sdl2::Sdl, tone_hz: u32) -> Result<Self, String> {
        let audio_subsystem = sdl.audio()?;
        let desired = AudioSpecDesired {
            freq: Some(SAMPLE_RATE),
            channels: Some(1),
            samples: None,
        };
        let device = audio_subsystem.open_playback(None, &desired, |spec| SquareWave {
            phase_inc: tone_hz as f32 / spec.freq as f32,
            phase: 0.0,
            volume: VOLUME,
        })?;
        Ok(Beeper {
            device,
            playing: false,
        })
    }

    /// Starts or stops the tone when `active` differs from what is playing
    pub fn update(&mut self, active: bool) {
        if active == self.playing {
            return;
        }
        if active {
            self.device.resume();
        } else {
            self.device.pause();
        }
        debug!("buzzer {}", if active { "on" } else { "off" });
        self.playing = active;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_wave_alternates() {
        let mut wave = SquareWave {
            phase_inc: 0.25,
            phase: 0.0,
            volume: VOLUME,
        };
        let mut out = [0.0; 8];
        wave.callback(&mut out);
        assert_eq!(
            out,
            [VOLUME, VOLUME, -VOLUME, -VOLUME, VOLUME, VOLUME, -VOLUME, -VOLUME]
        );
    }
}
