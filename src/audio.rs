//! Audio cues driven by simulation events
//!
//! The simulation never touches audio. `AudioDirector` turns `GameEvent`s into
//! cues and tracks whether the music loop should be running; the Web Audio
//! backend (wasm only) synthesizes the cues procedurally, no asset files.

use crate::sim::GameEvent;

/// Something the audio backend should do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    /// One-shot pickup chime
    Collect,
    /// One-shot crash
    Crash,
    StartMusic,
    StopMusic,
}

/// Maps events to cues and owns the music-loop flag
#[derive(Debug, Clone, Default)]
pub struct AudioDirector {
    music_playing: bool,
}

impl AudioDirector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn music_playing(&self) -> bool {
        self.music_playing
    }

    /// Cues for one event, in playback order
    pub fn cues_for(&mut self, event: &GameEvent) -> Vec<AudioCue> {
        match event {
            GameEvent::CoinCollected { .. } => vec![AudioCue::Collect],
            GameEvent::GameOver { .. } => {
                let mut cues = self.stop_music();
                cues.push(AudioCue::Crash);
                cues
            }
            GameEvent::GameStarted | GameEvent::Resumed => self.start_music(),
            GameEvent::Paused => self.stop_music(),
        }
    }

    /// Cue to restart the loop after the backend was unmuted
    ///
    /// The director keeps tracking the loop while muted, so music comes back
    /// only if a run is still in progress.
    pub fn unmute_cue(&self) -> Option<AudioCue> {
        self.music_playing.then_some(AudioCue::StartMusic)
    }

    /// Cues for a frame's worth of events
    pub fn cues_for_all(&mut self, events: &[GameEvent]) -> Vec<AudioCue> {
        events.iter().flat_map(|e| self.cues_for(e)).collect()
    }

    fn start_music(&mut self) -> Vec<AudioCue> {
        // Restarting replaces the running loop
        let mut cues = self.stop_music();
        self.music_playing = true;
        cues.push(AudioCue::StartMusic);
        cues
    }

    fn stop_music(&mut self) -> Vec<AudioCue> {
        if std::mem::take(&mut self.music_playing) {
            vec![AudioCue::StopMusic]
        } else {
            Vec::new()
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::AudioCue;

    /// Web Audio backend
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        master_volume: f32,
        sfx_volume: f32,
        music_volume: f32,
        muted: bool,
        /// Running music voices, stopped on `StopMusic`
        music: Vec<OscillatorNode>,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                master_volume: 0.8,
                sfx_volume: 1.0,
                music_volume: 0.7,
                muted: false,
                music: Vec::new(),
            }
        }

        pub fn set_volumes(&mut self, master: f32, sfx: f32, music: f32) {
            self.master_volume = master.clamp(0.0, 1.0);
            self.sfx_volume = sfx.clamp(0.0, 1.0);
            self.music_volume = music.clamp(0.0, 1.0);
        }

        pub fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
            if muted {
                self.stop_music();
            }
        }

        fn volume(&self, channel: f32) -> f32 {
            if self.muted { 0.0 } else { self.master_volume * channel }
        }

        pub fn play(&mut self, cue: AudioCue) {
            let Some(ctx) = self.ctx.clone() else { return };

            // Browsers suspend the context until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match cue {
                AudioCue::Collect => self.play_collect(&ctx, self.volume(self.sfx_volume)),
                AudioCue::Crash => self.play_crash(&ctx, self.volume(self.sfx_volume)),
                AudioCue::StartMusic => self.start_music(&ctx, self.volume(self.music_volume)),
                AudioCue::StopMusic => self.stop_music(),
            }
        }

        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Rising two-note ding
        fn play_collect(&self, ctx: &AudioContext, vol: f32) {
            if vol <= 0.0 {
                return;
            }
            for (i, freq) in [880.0, 1320.0].iter().enumerate() {
                let delay = i as f64 * 0.06;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.25, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.12)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.15).ok();
                }
            }
        }

        /// Low sawtooth drop
        fn play_crash(&self, ctx: &AudioContext, vol: f32) {
            if vol <= 0.0 {
                return;
            }
            let Some((osc, gain)) = self.create_osc(ctx, 220.0, OscillatorType::Sawtooth) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.5, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.6)
                .ok();
            osc.frequency().set_value_at_time(220.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(30.0, t + 0.6)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.7).ok();
        }

        /// Sustained bass plus fifth, runs until stopped
        fn start_music(&mut self, ctx: &AudioContext, vol: f32) {
            self.stop_music();
            if vol <= 0.0 {
                return;
            }
            for (freq, level) in [(55.0, 0.12), (82.5, 0.06)] {
                if let Some((osc, gain)) = self.create_osc(ctx, freq, OscillatorType::Triangle) {
                    gain.gain().set_value(vol * level);
                    if osc.start().is_ok() {
                        self.music.push(osc);
                    }
                }
            }
        }

        fn stop_music(&mut self) {
            for osc in self.music.drain(..) {
                let _ = osc.stop();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_lifecycle_cues() {
        let mut director = AudioDirector::new();
        let cues = director.cues_for_all(&[
            GameEvent::GameStarted,
            GameEvent::CoinCollected { score: 1 },
            GameEvent::Paused,
            GameEvent::Resumed,
            GameEvent::GameOver { score: 1 },
        ]);
        assert_eq!(
            cues,
            vec![
                AudioCue::StartMusic,
                AudioCue::Collect,
                AudioCue::StopMusic,
                AudioCue::StartMusic,
                AudioCue::StopMusic,
                AudioCue::Crash,
            ]
        );
        assert!(!director.music_playing());
    }

    #[test]
    fn test_restart_replaces_music_loop() {
        let mut director = AudioDirector::new();
        director.cues_for(&GameEvent::GameStarted);
        let cues = director.cues_for(&GameEvent::GameStarted);
        assert_eq!(cues, vec![AudioCue::StopMusic, AudioCue::StartMusic]);
        assert!(director.music_playing());
    }

    #[test]
    fn test_unmute_restarts_music_only_mid_run() {
        let mut director = AudioDirector::new();
        assert_eq!(director.unmute_cue(), None);

        director.cues_for(&GameEvent::GameStarted);
        assert_eq!(director.unmute_cue(), Some(AudioCue::StartMusic));

        director.cues_for(&GameEvent::Paused);
        assert_eq!(director.unmute_cue(), None);
    }

    #[test]
    fn test_crash_without_music_only_crashes() {
        let mut director = AudioDirector::new();
        assert_eq!(
            director.cues_for(&GameEvent::GameOver { score: 0 }),
            vec![AudioCue::Crash]
        );
    }
}
