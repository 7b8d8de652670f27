//! Continuous rotation actuator
//!
//! Shared by doors, switches and wheels through composition: each mechanism
//! embeds a [`RotationActuator`] carrying its angle state and the movement
//! sound crossfade, then applies its own drag and clamp policy on top.

use serde::{Deserialize, Serialize};

use gloam_core::{AudioSink, AudioTrack, ChannelId, ObjectId, SoundClip};

use crate::interaction::lerp;

/// Quiet attack level for a movement loop that is just starting
const START_VOLUME: f32 = 0.178;
/// Volume below which a fading loop is considered silent and stopped
const SILENCE_FLOOR: f32 = 0.001;

/// Audio-shaping constants of a rotation mechanism
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RotationConfig {
    /// Angular speed below which the mechanism is considered silent
    pub creak_velocity_threshold: f32,
    /// Crossfade rate toward the target volume, per second
    pub fade_speed: f32,
    /// Maps angular speed above the threshold to volume
    pub volume_scale: f32,
    /// Exponential smoothing divisor for pointer-driven velocity
    pub smoothing: f32,
}

/// Angle state and movement-sound crossfade of a rotation mechanism
#[derive(Debug, Clone)]
pub struct RotationActuator {
    pub starting_angle: f32,
    pub max_angle: f32,
    pub current_angle: f32,
    pub previous_angle: f32,
    pub angular_velocity: f32,
    /// Set when pointer input moved the mechanism this frame
    pub input_active: bool,
    /// Gates the movement-sound fade-out
    pub allow_movement_sound: bool,
    pub config: RotationConfig,
    movement_clip: SoundClip,
    channel: ChannelId,
    /// Linear volume mirror of the movement channel
    volume: f32,
}

impl RotationActuator {
    /// Create an actuator spanning `starting_angle..max_angle`
    pub fn new(
        owner: ObjectId,
        movement_clip: SoundClip,
        config: RotationConfig,
        starting_angle: f32,
        max_angle: f32,
    ) -> Self {
        Self {
            starting_angle,
            max_angle,
            current_angle: starting_angle,
            previous_angle: starting_angle,
            angular_velocity: 0.0,
            input_active: false,
            allow_movement_sound: false,
            config,
            movement_clip,
            channel: ChannelId::new(owner, AudioTrack::Movement),
            volume: 0.0,
        }
    }

    /// Progress from the starting angle toward the maximum, 0 at start and
    /// 1 at max. Returns 0 (never NaN) for a degenerate zero-span range.
    pub fn percentage(&self) -> f32 {
        let span = self.max_angle - self.starting_angle;
        if span.abs() < f32::EPSILON {
            return 0.0;
        }
        (self.current_angle - self.starting_angle) / span
    }

    /// Clamp the current angle into the mechanism's range, whichever way
    /// around the endpoints are
    pub fn clamp_to_range(&mut self) {
        let lo = self.starting_angle.min(self.max_angle);
        let hi = self.starting_angle.max(self.max_angle);
        self.current_angle = self.current_angle.clamp(lo, hi);
    }

    /// Decay velocity toward rest while no input drives the mechanism
    pub fn damp(&mut self, dt: f32) {
        self.angular_velocity = lerp(self.angular_velocity, 0.0, dt * 4.0);
    }

    /// Fold a new pointer-derived velocity target into the smoothed velocity
    pub fn smooth_toward(&mut self, target: f32) {
        self.angular_velocity = lerp(self.angular_velocity, target, 1.0 / self.config.smoothing);
    }

    /// Drive the movement loop from this frame's angular travel: silent
    /// below the creak threshold, louder with speed above it, crossfaded at
    /// the configured rate.
    pub fn play_movement_sound(&mut self, audio: &mut dyn AudioSink, dt: f32) {
        let velocity = (self.current_angle - self.previous_angle).abs();
        let target_volume = if velocity > self.config.creak_velocity_threshold {
            ((velocity - self.config.creak_velocity_threshold) * self.config.volume_scale)
                .clamp(0.0, 1.5)
        } else {
            0.0
        };

        if !audio.is_playing(self.channel) && target_volume > 0.0 {
            self.volume = START_VOLUME;
            audio.play_looping(self.channel, &self.movement_clip, self.volume);
        }

        if audio.is_playing(self.channel) {
            self.volume = lerp(self.volume, target_volume, dt * self.config.fade_speed).clamp(0.0, 1.5);
            audio.set_volume(self.channel, self.volume);
            if self.volume < SILENCE_FLOOR && target_volume == 0.0 {
                audio.stop(self.channel);
            }
        }
    }

    /// Fade a playing movement loop out toward silence
    pub fn stop_movement_sound(&mut self, audio: &mut dyn AudioSink, dt: f32) {
        if !self.allow_movement_sound || !audio.is_playing(self.channel) {
            return;
        }

        self.volume = lerp(self.volume, 0.0, dt * self.config.fade_speed).clamp(0.0, 1.0);
        audio.set_volume(self.channel, self.volume);
        if self.volume < SILENCE_FLOOR {
            audio.stop(self.channel);
        }
    }

    /// Silence the movement loop immediately
    pub fn cut_movement_sound(&mut self, audio: &mut dyn AudioSink) {
        self.allow_movement_sound = false;
        self.volume = 0.0;
        audio.stop(self.channel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gloam_core::MemoryAudio;

    fn actuator() -> RotationActuator {
        RotationActuator::new(
            ObjectId(1),
            SoundClip::new("sfx/door_creak.ogg"),
            RotationConfig {
                creak_velocity_threshold: 0.005,
                fade_speed: 1.0,
                volume_scale: 1000.0,
                smoothing: 80.0,
            },
            0.0,
            1.6,
        )
    }

    #[test]
    fn test_percentage_endpoints() {
        let mut rot = actuator();
        assert_eq!(rot.percentage(), 0.0);
        rot.current_angle = 1.6;
        assert!((rot.percentage() - 1.0).abs() < 1.0e-6);
        rot.current_angle = 0.8;
        assert!((rot.percentage() - 0.5).abs() < 1.0e-6);
    }

    #[test]
    fn test_percentage_degenerate_range_is_zero() {
        let mut rot = actuator();
        rot.max_angle = rot.starting_angle;
        rot.current_angle = 0.4;
        assert_eq!(rot.percentage(), 0.0);
    }

    #[test]
    fn test_clamp_handles_reversed_range() {
        let mut rot = actuator();
        rot.max_angle = -1.6;
        rot.current_angle = 0.5;
        rot.clamp_to_range();
        assert_eq!(rot.current_angle, 0.0);
        rot.current_angle = -2.0;
        rot.clamp_to_range();
        assert_eq!(rot.current_angle, -1.6);
    }

    #[test]
    fn test_movement_sound_starts_above_threshold_and_fades_out() {
        let mut rot = actuator();
        let mut audio = MemoryAudio::new();
        let channel = ChannelId::new(ObjectId(1), AudioTrack::Movement);

        // Below the creak threshold: silence
        rot.previous_angle = 0.0;
        rot.current_angle = 0.001;
        rot.play_movement_sound(&mut audio, 0.016);
        assert!(!audio.is_playing(channel));

        // Fast travel: loop starts
        rot.current_angle = 0.1;
        rot.play_movement_sound(&mut audio, 0.016);
        assert!(audio.is_playing(channel));

        // Stopped: repeated silent frames fade the loop out and stop it
        rot.allow_movement_sound = true;
        rot.previous_angle = rot.current_angle;
        for _ in 0..2000 {
            rot.stop_movement_sound(&mut audio, 0.016);
        }
        assert!(!audio.is_playing(channel));
    }

    #[test]
    fn test_damp_decays_velocity() {
        let mut rot = actuator();
        rot.angular_velocity = 1.0;
        for _ in 0..200 {
            rot.damp(0.016);
        }
        assert!(rot.angular_velocity.abs() < 0.01);
    }
}
