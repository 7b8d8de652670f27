//! Audio collaborator contract
//!
//! The interaction code treats playback as fire-and-forget: it asks for a
//! clip to start, fades channel volumes, and polls whether a channel is
//! still playing. Mixing and decoding belong to the host engine; the
//! in-memory sink below backs tests and headless runs.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::ObjectId;

/// Reference to a sound asset by path
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SoundClip(pub String);

impl SoundClip {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }
}

/// Playback tracks an object can occupy. One clip per (owner, track) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioTrack {
    /// Looping creak/spin sound while a mechanism moves
    Movement,
    Snap,
    Kickback,
    Shut,
    Locked,
    Impact,
    Press,
    Feedback,
}

/// A pollable playback channel owned by a world object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelId {
    pub owner: ObjectId,
    pub track: AudioTrack,
}

impl ChannelId {
    pub fn new(owner: ObjectId, track: AudioTrack) -> Self {
        Self { owner, track }
    }
}

/// Playback collaborator the interactions drive
pub trait AudioSink {
    /// Fire-and-forget one-shot
    fn play(&mut self, clip: &SoundClip, volume: f32);
    /// One-shot on a channel that can be polled and stopped
    fn play_on(&mut self, channel: ChannelId, clip: &SoundClip, volume: f32);
    /// Start (or restart) a looping clip on a channel
    fn play_looping(&mut self, channel: ChannelId, clip: &SoundClip, volume: f32);
    /// Adjust the volume of a playing channel
    fn set_volume(&mut self, channel: ChannelId, volume: f32);
    /// Stop a channel
    fn stop(&mut self, channel: ChannelId);
    /// Whether the channel is currently playing
    fn is_playing(&self, channel: ChannelId) -> bool;
}

#[derive(Debug, Clone)]
struct ChannelState {
    clip: SoundClip,
    volume: f32,
    playing: bool,
}

/// In-memory audio sink used by tests and headless runs.
///
/// Channel playback stays "playing" until [`MemoryAudio::finish`] is called,
/// which lets tests exercise the is-playing serialization guards.
#[derive(Debug, Default)]
pub struct MemoryAudio {
    /// One-shots in playback order: (clip, volume)
    pub oneshots: Vec<(SoundClip, f32)>,
    channels: HashMap<ChannelId, ChannelState>,
}

impl MemoryAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current volume of a channel, if playing
    pub fn channel_volume(&self, channel: ChannelId) -> Option<f32> {
        self.channels
            .get(&channel)
            .filter(|c| c.playing)
            .map(|c| c.volume)
    }

    /// Clip loaded on a channel, playing or not
    pub fn channel_clip(&self, channel: ChannelId) -> Option<&SoundClip> {
        self.channels.get(&channel).map(|c| &c.clip)
    }

    /// Simulate a channel's clip reaching its end
    pub fn finish(&mut self, channel: ChannelId) {
        if let Some(state) = self.channels.get_mut(&channel) {
            state.playing = false;
        }
    }

    /// Number of one-shots played for a clip path
    pub fn times_played(&self, path: &str) -> usize {
        self.oneshots.iter().filter(|(clip, _)| clip.0 == path).count()
    }
}

impl AudioSink for MemoryAudio {
    fn play(&mut self, clip: &SoundClip, volume: f32) {
        self.oneshots.push((clip.clone(), volume));
    }

    fn play_on(&mut self, channel: ChannelId, clip: &SoundClip, volume: f32) {
        self.oneshots.push((clip.clone(), volume));
        self.channels.insert(
            channel,
            ChannelState {
                clip: clip.clone(),
                volume,
                playing: true,
            },
        );
    }

    fn play_looping(&mut self, channel: ChannelId, clip: &SoundClip, volume: f32) {
        self.channels.insert(
            channel,
            ChannelState {
                clip: clip.clone(),
                volume,
                playing: true,
            },
        );
    }

    fn set_volume(&mut self, channel: ChannelId, volume: f32) {
        if let Some(state) = self.channels.get_mut(&channel) {
            state.volume = volume;
        }
    }

    fn stop(&mut self, channel: ChannelId) {
        if let Some(state) = self.channels.get_mut(&channel) {
            state.playing = false;
        }
    }

    fn is_playing(&self, channel: ChannelId) -> bool {
        self.channels.get(&channel).is_some_and(|c| c.playing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_lifecycle() {
        let mut audio = MemoryAudio::new();
        let channel = ChannelId::new(ObjectId(1), AudioTrack::Movement);
        let clip = SoundClip::new("sfx/door_creak.ogg");

        assert!(!audio.is_playing(channel));
        audio.play_looping(channel, &clip, 0.5);
        assert!(audio.is_playing(channel));
        assert_eq!(audio.channel_volume(channel), Some(0.5));

        audio.set_volume(channel, 1.0);
        assert_eq!(audio.channel_volume(channel), Some(1.0));

        audio.stop(channel);
        assert!(!audio.is_playing(channel));
    }

    #[test]
    fn test_oneshot_counting() {
        let mut audio = MemoryAudio::new();
        let clip = SoundClip::new("sfx/thud.ogg");
        audio.play(&clip, 1.0);
        audio.play(&clip, 1.0);
        assert_eq!(audio.times_played("sfx/thud.ogg"), 2);
    }
}
