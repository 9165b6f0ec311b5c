// SPDX-License-Identifier: MIT OR Apache-2.0
//! Mapping of a physical time series onto animation frames.

use crate::config::{AnimationSettings, FrameCountPolicy};
use crate::error::{AnimationError, Result};
use sixdof_scene::SceneContext;

/// Frame indices for every sample of a time series.
///
/// Frames are spread evenly by sample index between frame 1 and the total
/// frame count, not by elapsed time, and truncated to integers. Rounding can
/// put two samples on the same frame; the later sample then overwrites the
/// earlier keyframe.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClock {
    frame_rate: f64,
    speed_up: f64,
    frames: Vec<i32>,
    frame_duration: i32,
}

impl AnimationClock {
    /// Build a clock with [`FrameCountPolicy::Floor`]
    pub fn build(times: &[f64], frame_rate: f64, speed_up: f64) -> Result<Self> {
        Self::build_with_policy(times, frame_rate, speed_up, FrameCountPolicy::Floor)
    }

    /// Build a clock with an explicit frame count rule
    pub fn build_with_policy(
        times: &[f64],
        frame_rate: f64,
        speed_up: f64,
        policy: FrameCountPolicy,
    ) -> Result<Self> {
        if times.len() < 2 {
            return Err(AnimationError::invalid(format!(
                "time series needs at least 2 samples, got {}",
                times.len()
            )));
        }
        if times.iter().any(|t| !t.is_finite()) {
            return Err(AnimationError::invalid("time series contains non-finite values"));
        }
        if let Some(i) = times.windows(2).position(|w| w[1] <= w[0]) {
            return Err(AnimationError::invalid(format!(
                "time series not strictly increasing at sample {}",
                i + 1
            )));
        }
        if !(frame_rate.is_finite() && frame_rate > 0.0) {
            return Err(AnimationError::invalid(format!(
                "frame rate must be positive, got {frame_rate}"
            )));
        }
        if !(speed_up.is_finite() && speed_up > 0.0) {
            return Err(AnimationError::invalid(format!(
                "speed_up must be positive, got {speed_up}"
            )));
        }

        let t_last = times[times.len() - 1];
        let total = policy.total_frames(t_last * frame_rate / speed_up);
        let frames = spread_frames(total, times.len());

        let duplicates = frames.windows(2).filter(|w| w[0] == w[1]).count();
        if duplicates > 0 {
            tracing::warn!(
                "{} samples share a frame with their neighbour; later samples win",
                duplicates
            );
        }

        Ok(Self {
            frame_rate,
            speed_up,
            frame_duration: total,
            frames,
        })
    }

    /// Frame index of every sample
    pub fn frames(&self) -> &[i32] {
        &self.frames
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the clock has no samples (never true for a built clock)
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Last frame index
    pub fn frame_duration(&self) -> i32 {
        self.frame_duration
    }

    /// Host frame rate the clock was built for
    pub fn frame_rate(&self) -> f64 {
        self.frame_rate
    }

    /// Speed-up factor
    pub fn speed_up(&self) -> f64 {
        self.speed_up
    }

    /// Timeline playback range `[1, frame_duration + 1]`
    pub fn timeline_range(&self) -> (i32, i32) {
        (1, self.frame_duration.saturating_add(1))
    }

    /// Check that a series has one value per sample
    pub fn ensure_len(&self, series: &str, len: usize) -> Result<()> {
        if len != self.frames.len() {
            return Err(AnimationError::invalid(format!(
                "{series} has {len} samples, clock has {}",
                self.frames.len()
            )));
        }
        Ok(())
    }
}

/// `count` integer frames evenly spaced over `[1, total]`, truncated
fn spread_frames(total: i32, count: usize) -> Vec<i32> {
    let start = 1.0;
    let stop = f64::from(total);
    let step = (stop - start) / (count - 1) as f64;

    let mut frames: Vec<i32> = (0..count)
        .map(|i| (start + i as f64 * step) as i32)
        .collect();
    if let Some(last) = frames.last_mut() {
        *last = total;
    }
    frames
}

/// A clock together with the global scale, applied to a host timeline
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    clock: AnimationClock,
    scale: f64,
}

impl Animation {
    /// Build the clock at the host's frame rate and set the host timeline range
    pub fn new(
        ctx: &mut dyn SceneContext,
        times: &[f64],
        settings: &AnimationSettings,
    ) -> Result<Self> {
        settings.validate()?;
        let clock = AnimationClock::build_with_policy(
            times,
            ctx.frame_rate(),
            settings.speed_up,
            settings.frame_count,
        )?;

        let (start, end) = clock.timeline_range();
        ctx.set_frame_range(start, end);

        tracing::info!(
            "Animation clock: {} samples over frames {}..={} at {} fps (speed-up {})",
            clock.len(),
            start,
            clock.frame_duration(),
            clock.frame_rate(),
            clock.speed_up()
        );

        Ok(Self {
            clock,
            scale: settings.global_scale,
        })
    }

    /// The frame clock
    pub fn clock(&self) -> &AnimationClock {
        &self.clock
    }

    /// Global physical scale
    pub fn scale(&self) -> f64 {
        self.scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sixdof_scene::MemoryScene;

    #[test]
    fn test_evenly_spaced_example() {
        let clock = AnimationClock::build(&[0.0, 1.0, 2.0, 3.0], 24.0, 1.0).unwrap();
        assert_eq!(clock.frame_duration(), 72);
        assert_eq!(clock.frames(), &[1, 24, 48, 72]);
        assert_eq!(clock.timeline_range(), (1, 73));
    }

    #[test]
    fn test_plus_one_policy() {
        let clock = AnimationClock::build_with_policy(
            &[0.0, 1.0, 2.0, 3.0],
            24.0,
            1.0,
            FrameCountPolicy::FloorPlusOne,
        )
        .unwrap();
        assert_eq!(clock.frame_duration(), 73);
        assert_eq!(clock.frames(), &[1, 25, 49, 73]);
    }

    #[test]
    fn test_speed_up_shortens_timeline() {
        let clock = AnimationClock::build(&[0.0, 5.0, 10.0], 30.0, 3.0).unwrap();
        assert_eq!(clock.frame_duration(), 100);
        assert_eq!(clock.frames()[0], 1);
        assert_eq!(*clock.frames().last().unwrap(), 100);
    }

    #[test]
    fn test_frames_follow_index_not_time() {
        // Non-uniform samples still get even frame spacing
        let clock = AnimationClock::build(&[0.0, 0.1, 0.2, 3.0], 24.0, 1.0).unwrap();
        assert_eq!(clock.frames(), &[1, 24, 48, 72]);
    }

    #[test]
    fn test_invariants_hold_for_many_series() {
        for n in 2..40 {
            for speed_up in [0.5, 1.0, 7.0, 4000.0] {
                let times: Vec<f64> = (0..n).map(|i| i as f64 * 0.37).collect();
                let clock = AnimationClock::build(&times, 24.0, speed_up).unwrap();
                assert_eq!(clock.len(), times.len());
                assert_eq!(clock.frames()[0], 1);
                assert!(clock.frames().windows(2).all(|w| w[0] <= w[1]));
                assert_eq!(*clock.frames().last().unwrap(), clock.frame_duration());
            }
        }
    }

    #[test]
    fn test_short_timeline_duplicates_frames() {
        let clock = AnimationClock::build(&[0.0, 0.01, 0.02, 0.03], 24.0, 1.0).unwrap();
        assert_eq!(clock.frame_duration(), 1);
        assert_eq!(clock.frames(), &[1, 1, 1, 1]);
    }

    #[test]
    fn test_rejects_invalid_input() {
        let invalid = |r: Result<AnimationClock>| matches!(r, Err(AnimationError::InvalidParameter(_)));
        assert!(invalid(AnimationClock::build(&[], 24.0, 1.0)));
        assert!(invalid(AnimationClock::build(&[1.0], 24.0, 1.0)));
        assert!(invalid(AnimationClock::build(&[0.0, 1.0], 24.0, 0.0)));
        assert!(invalid(AnimationClock::build(&[0.0, 1.0], 24.0, -2.0)));
        assert!(invalid(AnimationClock::build(&[0.0, 1.0], 0.0, 1.0)));
        assert!(invalid(AnimationClock::build(&[0.0, 2.0, 1.0], 24.0, 1.0)));
        assert!(invalid(AnimationClock::build(&[0.0, 1.0, 1.0], 24.0, 1.0)));
        assert!(invalid(AnimationClock::build(&[0.0, f64::NAN], 24.0, 1.0)));
    }

    #[test]
    fn test_tiny_speed_up_caps_frame_count() {
        let clock = AnimationClock::build(&[0.0, 3.0], 24.0, 1e-9).unwrap();
        assert_eq!(clock.frame_duration(), FrameCountPolicy::MAX_FRAMES);
        assert_eq!(clock.frames(), &[1, FrameCountPolicy::MAX_FRAMES]);
        assert_eq!(clock.timeline_range(), (1, i32::MAX));

        let mut scene = MemoryScene::new(24.0);
        Animation::new(&mut scene, &[0.0, 3.0], &AnimationSettings::new(1e-9, 1.0)).unwrap();
        assert_eq!(scene.frame_range(), (1, i32::MAX));
    }

    #[test]
    fn test_ensure_len() {
        let clock = AnimationClock::build(&[0.0, 1.0], 24.0, 1.0).unwrap();
        assert!(clock.ensure_len("x", 2).is_ok());
        assert!(matches!(
            clock.ensure_len("x", 3),
            Err(AnimationError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_animation_sets_timeline_range() {
        let mut scene = MemoryScene::new(24.0);
        let anim = Animation::new(
            &mut scene,
            &[0.0, 1.0, 2.0, 3.0],
            &AnimationSettings::new(1.0, 2.0),
        )
        .unwrap();
        assert_eq!(scene.frame_range(), (1, 73));
        assert_eq!(anim.scale(), 2.0);
        assert_eq!(anim.clock().frames(), &[1, 24, 48, 72]);
    }
}
