//! Lighting mode controller
//!
//! Switches the light rig between two presets and drives the point-light
//! flicker while the "thriller" preset is active. The flicker is gated on a
//! frame counter, not wall-clock time, so its cadence follows the display
//! refresh rate.

mod random;

pub use random::*;

use glam::Vec3;

use crate::scene::LightRig;

/// Frames between point-light flickers in thriller mode
pub const BLINK_INTERVAL: u64 = 20;

/// Upper (exclusive) bound of the randomized point-light range
pub const BLINK_MAX_DISTANCE: f32 = 5.0;

/// Named lighting preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LightingMode {
    /// Soft, fully lit scene
    #[default]
    Calm,
    /// Near-dark scene lit by the area light and a flickering point light
    Thriller,
}

impl LightingMode {
    /// Label shown on the panel button that activates this mode
    pub fn label(&self) -> &'static str {
        match self {
            LightingMode::Calm => "Dreamy Mode",
            LightingMode::Thriller => "Thriller Mode",
        }
    }

    pub fn preset(&self) -> &'static LightingPreset {
        match self {
            LightingMode::Calm => &LightingPreset::CALM,
            LightingMode::Thriller => &LightingPreset::THRILLER,
        }
    }
}

/// Light parameter values written when a mode is activated
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightingPreset {
    /// `None` leaves the point light's intensity as it is
    pub point_intensity: Option<f32>,
    pub ambient_intensity: f32,
    pub directional_intensity: f32,
    pub hemisphere_intensity: f32,
    pub area_intensity: f32,
    pub area_height: f32,
    pub area_position: Vec3,
}

impl LightingPreset {
    pub const CALM: Self = Self {
        point_intensity: Some(0.5),
        ambient_intensity: 0.3,
        directional_intensity: 0.3,
        hemisphere_intensity: 0.5,
        area_intensity: 3.0,
        area_height: 1.0,
        area_position: Vec3::new(0.0, 1.0, 1.0),
    };

    pub const THRILLER: Self = Self {
        point_intensity: None,
        ambient_intensity: 0.01,
        directional_intensity: 0.01,
        hemisphere_intensity: 0.01,
        area_intensity: 0.9,
        area_height: 1.0,
        area_position: Vec3::new(-0.4, 1.1, -1.5),
    };

    /// Write every preset value into the rig
    pub fn apply(&self, lights: &mut LightRig) {
        if let Some(intensity) = self.point_intensity {
            lights.point.intensity = intensity;
        }
        lights.ambient.intensity = self.ambient_intensity;
        lights.directional.intensity = self.directional_intensity;
        lights.hemisphere.intensity = self.hemisphere_intensity;
        lights.area.intensity = self.area_intensity;
        lights.area.height = self.area_height;
        lights.area.position = self.area_position;
    }
}

/// Current lighting mode plus the frame counter that paces the flicker.
///
/// The state does not own the lights; it mutates the [`LightRig`] it is
/// handed. The counter keeps running across mode changes.
#[derive(Debug, Clone)]
pub struct LightingState {
    mode: LightingMode,
    blink_counter: u64,
    blink_interval: u64,
}

impl Default for LightingState {
    fn default() -> Self {
        Self::new()
    }
}

impl LightingState {
    pub fn new() -> Self {
        Self {
            mode: LightingMode::Calm,
            blink_counter: 0,
            blink_interval: BLINK_INTERVAL,
        }
    }

    /// Use a different flicker cadence. Zero is treated as one (every frame).
    pub fn with_blink_interval(mut self, interval: u64) -> Self {
        self.blink_interval = interval.max(1);
        self
    }

    pub fn mode(&self) -> LightingMode {
        self.mode
    }

    pub fn blink_counter(&self) -> u64 {
        self.blink_counter
    }

    pub fn blink_interval(&self) -> u64 {
        self.blink_interval
    }

    /// Switch to thriller mode: dim the fill lights and move the area light
    /// behind the objects. The point light's intensity is left alone.
    pub fn activate_thriller(&mut self, lights: &mut LightRig) {
        self.activate(LightingMode::Thriller, lights);
    }

    /// Switch back to calm mode and restore the calm light levels
    pub fn activate_calm(&mut self, lights: &mut LightRig) {
        self.activate(LightingMode::Calm, lights);
    }

    /// Switch to `mode`, re-applying its preset even if it is already active
    pub fn activate(&mut self, mode: LightingMode, lights: &mut LightRig) {
        if self.mode != mode {
            log::info!("Lighting mode: {:?} -> {:?}", self.mode, mode);
        }
        self.mode = mode;
        mode.preset().apply(lights);
    }

    /// Per-frame update for frame number `frame_count`.
    ///
    /// In thriller mode, every frame whose number is a multiple of the blink
    /// interval (including frame 0) gets a new point-light range drawn from
    /// `[0, BLINK_MAX_DISTANCE)`. Returns `true` when the range was changed.
    pub fn tick<R: RandomSource + ?Sized>(
        &self,
        frame_count: u64,
        lights: &mut LightRig,
        rng: &mut R,
    ) -> bool {
        if self.mode != LightingMode::Thriller || frame_count % self.blink_interval != 0 {
            return false;
        }
        let distance = rng.next_in(0.0, BLINK_MAX_DISTANCE);
        log::debug!("Frame {}: point light distance -> {:.3}", frame_count, distance);
        lights.point.distance = distance;
        true
    }

    /// Run [`tick`](Self::tick) for the internal counter, then advance it
    pub fn advance<R: RandomSource + ?Sized>(
        &mut self,
        lights: &mut LightRig,
        rng: &mut R,
    ) -> bool {
        let fired = self.tick(self.blink_counter, lights, rng);
        self.blink_counter += 1;
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_calm_values(lights: &LightRig) {
        assert_eq!(lights.ambient.intensity, 0.3);
        assert_eq!(lights.directional.intensity, 0.3);
        assert_eq!(lights.hemisphere.intensity, 0.5);
        assert_eq!(lights.area.intensity, 3.0);
        assert_eq!(lights.area.height, 1.0);
        assert_eq!(lights.area.position, Vec3::new(0.0, 1.0, 1.0));
        assert_eq!(lights.point.intensity, 0.5);
    }

    #[test]
    fn starts_calm() {
        let state = LightingState::new();
        assert_eq!(state.mode(), LightingMode::Calm);
        assert_eq!(state.blink_counter(), 0);
    }

    #[test]
    fn thriller_then_calm_restores_calm_values() {
        let mut lights = LightRig::new();
        let mut state = LightingState::new();
        lights.point.intensity = 0.9;

        state.activate_thriller(&mut lights);
        state.activate_calm(&mut lights);

        assert_eq!(state.mode(), LightingMode::Calm);
        assert_calm_values(&lights);
    }

    #[test]
    fn thriller_sets_its_values_and_keeps_point_intensity() {
        let mut lights = LightRig::new();
        lights.point.intensity = 0.8;
        let mut state = LightingState::new();

        state.activate_thriller(&mut lights);

        assert_eq!(state.mode(), LightingMode::Thriller);
        assert_eq!(lights.ambient.intensity, 0.01);
        assert_eq!(lights.directional.intensity, 0.01);
        assert_eq!(lights.hemisphere.intensity, 0.01);
        assert_eq!(lights.area.intensity, 0.9);
        assert_eq!(lights.area.height, 1.0);
        assert_eq!(lights.area.position, Vec3::new(-0.4, 1.1, -1.5));
        assert_eq!(lights.point.intensity, 0.8);
    }

    #[test]
    fn thriller_ticks_on_interval_frames() {
        let mut lights = LightRig::new();
        let mut state = LightingState::new();
        state.activate_thriller(&mut lights);
        let mut rng = ScriptedRandom::new(vec![0.1, 0.5, 0.99]);

        for frame in [0, 20, 40] {
            lights.point.distance = 42.0;
            assert!(state.tick(frame, &mut lights, &mut rng));
            assert!((0.0..BLINK_MAX_DISTANCE).contains(&lights.point.distance));
        }
        assert_eq!(rng.calls(), 3);

        lights.point.distance = 42.0;
        for frame in 1..20 {
            assert!(!state.tick(frame, &mut lights, &mut rng));
        }
        assert_eq!(lights.point.distance, 42.0);
        assert_eq!(rng.calls(), 3);
    }

    #[test]
    fn calm_ticks_never_touch_distance() {
        let mut lights = LightRig::new();
        let state = LightingState::new();
        let mut rng = ScriptedRandom::new(vec![0.3]);

        for frame in [0, 1, 19, 20, 40, 1000, u64::MAX] {
            assert!(!state.tick(frame, &mut lights, &mut rng));
        }
        assert_eq!(lights.point.distance, 5.0);
        assert_eq!(rng.calls(), 0);
    }

    #[test]
    fn reactivating_same_mode_is_idempotent() {
        let mut once = LightRig::new();
        let mut twice = LightRig::new();
        let mut a = LightingState::new();
        let mut b = LightingState::new();

        a.activate_thriller(&mut once);
        b.activate_thriller(&mut twice);
        b.activate_thriller(&mut twice);
        assert_eq!(once, twice);
        assert_eq!(a.mode(), b.mode());

        a.activate_calm(&mut once);
        b.activate_calm(&mut twice);
        b.activate_calm(&mut twice);
        assert_eq!(once, twice);
    }

    #[test]
    fn first_frame_fires_immediately_after_entering_thriller() {
        let mut lights = LightRig::new();
        let mut state = LightingState::new();
        state.activate_thriller(&mut lights);
        let mut rng = ScriptedRandom::new(vec![0.25]);

        assert!(state.advance(&mut lights, &mut rng));
        assert_eq!(lights.point.distance, 1.25);
        assert_eq!(state.blink_counter(), 1);
    }

    #[test]
    fn counter_keeps_running_across_mode_changes() {
        let mut lights = LightRig::new();
        let mut state = LightingState::new();
        let mut rng = ScriptedRandom::new(vec![0.5]);

        for _ in 0..7 {
            assert!(!state.advance(&mut lights, &mut rng));
        }
        state.activate_thriller(&mut lights);
        assert_eq!(state.blink_counter(), 7);

        let fired: Vec<u64> = (0..40)
            .filter_map(|_| {
                let frame = state.blink_counter();
                state.advance(&mut lights, &mut rng).then_some(frame)
            })
            .collect();
        assert_eq!(fired, vec![20, 40]);
    }

    #[test]
    fn custom_blink_interval() {
        let mut lights = LightRig::new();
        let mut state = LightingState::new().with_blink_interval(3);
        state.activate_thriller(&mut lights);
        let mut rng = ScriptedRandom::new(vec![0.5]);

        assert!(state.tick(3, &mut lights, &mut rng));
        assert!(!state.tick(4, &mut lights, &mut rng));
        assert_eq!(LightingState::new().with_blink_interval(0).blink_interval(), 1);
    }

    #[test]
    fn thread_rng_stays_in_range() {
        let mut lights = LightRig::new();
        let mut state = LightingState::new();
        state.activate_thriller(&mut lights);
        let mut rng = rand::thread_rng();

        for frame in (0..2000).step_by(20) {
            state.tick(frame, &mut lights, &mut rng);
            assert!(lights.point.distance >= 0.0);
            assert!(lights.point.distance < BLINK_MAX_DISTANCE);
        }
    }

    #[test]
    fn mode_labels_match_panel_buttons() {
        assert_eq!(LightingMode::Thriller.label(), "Thriller Mode");
        assert_eq!(LightingMode::Calm.label(), "Dreamy Mode");
    }
}
