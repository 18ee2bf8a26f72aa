//! Sound cues and the playback seam.
//!
//! The scene only ever raises [`AudioCue`]s. Whatever implements
//! [`AudioSink`] decides what to do with them; a missing device or a missing
//! file never reaches the frame loop.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::error::Error;

/// Volume of the ambient city loop.
pub const AMBIENT_VOLUME: f32 = 0.18;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sound {
    Ambient,
    PoliceSiren,
    Helicopter,
    Thunder,
    UfoWhoosh,
}

impl Sound {
    pub const ALL: [Sound; 5] = [
        Sound::Ambient,
        Sound::PoliceSiren,
        Sound::Helicopter,
        Sound::Thunder,
        Sound::UfoWhoosh,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Sound::Ambient => "ambient-city",
            Sound::PoliceSiren => "police-siren",
            Sound::Helicopter => "helicopter",
            Sound::Thunder => "thunder",
            Sound::UfoWhoosh => "ufo-whoosh",
        }
    }

    pub fn file_name(self) -> String {
        format!("{}.mp3", self.name())
    }
}

impl fmt::Display for Sound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A request raised by the scene for the audio collaborator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AudioCue {
    Play { sound: Sound, volume: f32, looped: bool },
    Stop(Sound),
}

impl AudioCue {
    pub fn play(sound: Sound, volume: f32) -> Self {
        AudioCue::Play { sound, volume, looped: false }
    }

    pub fn looped(sound: Sound, volume: f32) -> Self {
        AudioCue::Play { sound, volume, looped: true }
    }
}

/// Identifies one playing sound on a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SoundHandle(pub u64);

/// Playback backend. Implementations swallow their own failures: `None`
/// from [`AudioSink::play_sound`] just means nothing is playing.
pub trait AudioSink {
    /// Start `sound`. A looped sound keeps playing until stopped.
    fn play_sound(&mut self, sound: Sound, volume: f32, looped: bool) -> Option<SoundHandle>;

    fn stop(&mut self, handle: SoundHandle);

    /// Flip the master mute and return the new state.
    fn toggle_mute(&mut self) -> bool;

    fn is_muted(&self) -> bool;
}

/// Backend used when there is no output device or audio is compiled out.
/// Cues are only logged.
#[derive(Debug, Default)]
pub struct SilentAudio {
    muted: bool,
}

impl SilentAudio {
    pub fn new(muted: bool) -> Self {
        SilentAudio { muted }
    }
}

impl AudioSink for SilentAudio {
    fn play_sound(&mut self, sound: Sound, volume: f32, looped: bool) -> Option<SoundHandle> {
        log::debug!("sound {sound} volume={volume:.2} looped={looped} (silent)");
        None
    }

    fn stop(&mut self, _handle: SoundHandle) {}

    fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    fn is_muted(&self) -> bool {
        self.muted
    }
}

/// Turns scene cues into backend calls, remembering looped sounds so a
/// later [`AudioCue::Stop`] can find them.
pub struct Mixer {
    sink: Box<dyn AudioSink>,
    loops: HashMap<Sound, SoundHandle>,
}

impl Mixer {
    pub fn new(sink: Box<dyn AudioSink>) -> Self {
        Mixer { sink, loops: HashMap::new() }
    }

    pub fn silent() -> Self {
        Mixer::new(Box::new(SilentAudio::default()))
    }

    pub fn apply(&mut self, cue: AudioCue) {
        match cue {
            AudioCue::Play { sound, volume, looped } => {
                let handle = self.sink.play_sound(sound, volume, looped);
                if let (true, Some(handle)) = (looped, handle) {
                    if let Some(old) = self.loops.insert(sound, handle) {
                        self.sink.stop(old);
                    }
                }
            }
            AudioCue::Stop(sound) => {
                if let Some(handle) = self.loops.remove(&sound) {
                    self.sink.stop(handle);
                }
            }
        }
    }

    pub fn toggle_mute(&mut self) -> bool {
        let muted = self.sink.toggle_mute();
        log::info!("audio {}", if muted { "muted" } else { "unmuted" });
        muted
    }

    pub fn is_muted(&self) -> bool {
        self.sink.is_muted()
    }
}

/// Encoded sound files, loaded once at startup.
#[derive(Debug, Default, Clone)]
pub struct SoundBank {
    clips: HashMap<Sound, Arc<[u8]>>,
}

impl SoundBank {
    /// Load every known sound from `dir`. Missing or unreadable files are
    /// logged and skipped.
    pub fn load(dir: &Path) -> Self {
        let mut clips = HashMap::new();
        for sound in Sound::ALL {
            let path = dir.join(sound.file_name());
            match std::fs::read(&path) {
                Ok(bytes) => {
                    log::debug!("loaded {} ({} bytes)", path.display(), bytes.len());
                    clips.insert(sound, Arc::from(bytes));
                }
                Err(e) => {
                    let err = Error::ResourceUnavailable {
                        name: sound.name().to_string(),
                        reason: format!("{}: {e}", path.display()),
                    };
                    log::warn!("{err}");
                }
            }
        }
        SoundBank { clips }
    }

    pub fn get(&self, sound: Sound) -> Option<&Arc<[u8]>> {
        self.clips.get(&sound)
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}

#[cfg(feature = "audio")]
pub use device::RodioAudio;

#[cfg(feature = "audio")]
mod device {
    use std::collections::HashMap;
    use std::io::Cursor;

    use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

    use super::{AudioSink, Sound, SoundBank, SoundHandle};
    use crate::error::{Error, Result};

    /// Plays the sound bank on the default output device.
    pub struct RodioAudio {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        bank: SoundBank,
        playing: HashMap<SoundHandle, (Sink, f32)>,
        next: u64,
        muted: bool,
    }

    impl RodioAudio {
        pub fn new(bank: SoundBank, muted: bool) -> Result<Self> {
            let (stream, handle) = OutputStream::try_default().map_err(|e| Error::ResourceUnavailable {
                name: "output device".to_string(),
                reason: e.to_string(),
            })?;
            Ok(RodioAudio { _stream: stream, handle, bank, playing: HashMap::new(), next: 0, muted })
        }
    }

    impl AudioSink for RodioAudio {
        fn play_sound(&mut self, sound: Sound, volume: f32, looped: bool) -> Option<SoundHandle> {
            self.playing.retain(|_, (sink, _)| !sink.empty());

            let Some(bytes) = self.bank.get(sound) else {
                log::debug!("{sound} not loaded, skipping");
                return None;
            };
            let Ok(sink) = Sink::try_new(&self.handle) else {
                log::warn!("no sink available for {sound}");
                return None;
            };
            let source = match Decoder::new(Cursor::new(bytes.clone())) {
                Ok(source) => source,
                Err(e) => {
                    log::warn!("cannot decode {sound}: {e}");
                    return None;
                }
            };
            sink.set_volume(if self.muted { 0.0 } else { volume });
            if looped {
                sink.append(source.repeat_infinite());
            } else {
                sink.append(source);
            }

            self.next += 1;
            let handle = SoundHandle(self.next);
            self.playing.insert(handle, (sink, volume));
            Some(handle)
        }

        fn stop(&mut self, handle: SoundHandle) {
            if let Some((sink, _)) = self.playing.remove(&handle) {
                sink.stop();
            }
        }

        fn toggle_mute(&mut self) -> bool {
            self.muted = !self.muted;
            for (sink, volume) in self.playing.values() {
                sink.set_volume(if self.muted { 0.0 } else { *volume });
            }
            self.muted
        }

        fn is_muted(&self) -> bool {
            self.muted
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Play(Sound, bool),
        Stop(SoundHandle),
    }

    #[derive(Default)]
    struct Recorder {
        calls: Rc<RefCell<Vec<Call>>>,
        next: u64,
        muted: bool,
    }

    impl AudioSink for Recorder {
        fn play_sound(&mut self, sound: Sound, _volume: f32, looped: bool) -> Option<SoundHandle> {
            self.calls.borrow_mut().push(Call::Play(sound, looped));
            self.next += 1;
            Some(SoundHandle(self.next))
        }

        fn stop(&mut self, handle: SoundHandle) {
            self.calls.borrow_mut().push(Call::Stop(handle));
        }

        fn toggle_mute(&mut self) -> bool {
            self.muted = !self.muted;
            self.muted
        }

        fn is_muted(&self) -> bool {
            self.muted
        }
    }

    #[test]
    fn test_mixer_stops_looped_sound_by_name() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut mixer = Mixer::new(Box::new(Recorder { calls: calls.clone(), ..Default::default() }));
        mixer.apply(AudioCue::play(Sound::Thunder, 0.3));
        mixer.apply(AudioCue::looped(Sound::Helicopter, 0.25));
        mixer.apply(AudioCue::Stop(Sound::Helicopter));
        mixer.apply(AudioCue::Stop(Sound::Helicopter));
        assert_eq!(
            *calls.borrow(),
            vec![
                Call::Play(Sound::Thunder, false),
                Call::Play(Sound::Helicopter, true),
                Call::Stop(SoundHandle(2)),
            ]
        );
    }

    #[test]
    fn test_mixer_without_device_ignores_cues() {
        let mut mixer = Mixer::silent();
        mixer.apply(AudioCue::looped(Sound::Ambient, AMBIENT_VOLUME));
        mixer.apply(AudioCue::Stop(Sound::Ambient));
        assert!(mixer.toggle_mute());
        assert!(mixer.is_muted());
    }

    #[test]
    fn test_missing_directory_yields_empty_bank() {
        let bank = SoundBank::load(Path::new("/definitely/not/a/real/audio/dir"));
        assert!(bank.is_empty());
        assert!(bank.get(Sound::Thunder).is_none());
    }

    #[test]
    fn test_bank_loads_present_files_only() {
        let dir = std::env::temp_dir().join(format!("nightfacade-bank-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("thunder.mp3"), b"not really audio").unwrap();
        let bank = SoundBank::load(&dir);
        assert_eq!(bank.len(), 1);
        assert_eq!(bank.get(Sound::Thunder).map(|b| b.len()), Some(16));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_silent_backend_toggles_mute() {
        let mut s = SilentAudio::new(false);
        assert!(s.toggle_mute());
        assert!(s.is_muted());
        assert!(!s.toggle_mute());
    }
}
