//! Light tuning panel
//!
//! One egui window with a collapsible folder per light and two buttons that
//! switch the lighting preset.

use std::ops::RangeInclusive;

use glam::Vec3;

use crate::lighting::{LightingMode, LightingState};
use crate::scene::LightRig;

/// Bounds and step of a numeric slider
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderRange {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl SliderRange {
    pub const fn new(min: f32, max: f32, step: f32) -> Self {
        Self { min, max, step }
    }

    fn range(&self) -> RangeInclusive<f32> {
        self.min..=self.max
    }
}

pub const INTENSITY_RANGE: SliderRange = SliderRange::new(0.0, 1.0, 0.1);
pub const POINT_POSITION_RANGE: SliderRange = SliderRange::new(0.0, 20.0, 0.5);
pub const POINT_DECAY_RANGE: SliderRange = SliderRange::new(1.0, 10.0, 0.1);
pub const POINT_DISTANCE_RANGE: SliderRange = SliderRange::new(1.0, 10.0, 0.1);
pub const DIRECTIONAL_TARGET_RANGE: SliderRange = SliderRange::new(-5.0, 5.0, 0.1);
pub const AREA_INTENSITY_RANGE: SliderRange = SliderRange::new(0.0, 5.0, 0.1);
pub const AREA_HEIGHT_RANGE: SliderRange = SliderRange::new(0.0, 3.0, 0.1);
pub const AREA_POSITION_RANGE: SliderRange = SliderRange::new(-5.0, 5.0, 0.1);

/// Something the panel asks the demo to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelAction {
    /// "Thriller Mode" button
    ThrillerMode,
    /// "Dreamy Mode" button
    DreamyMode,
}

impl PanelAction {
    pub const BUTTONS: [PanelAction; 2] = [PanelAction::ThrillerMode, PanelAction::DreamyMode];

    pub fn mode(self) -> LightingMode {
        match self {
            PanelAction::ThrillerMode => LightingMode::Thriller,
            PanelAction::DreamyMode => LightingMode::Calm,
        }
    }

    pub fn label(self) -> &'static str {
        self.mode().label()
    }

    pub fn apply(self, lights: &mut LightRig, lighting: &mut LightingState) {
        match self {
            PanelAction::ThrillerMode => lighting.activate_thriller(lights),
            PanelAction::DreamyMode => lighting.activate_calm(lights),
        }
    }
}

/// Debug panel for the light rig.
///
/// The window collapses but cannot be closed, so the mode buttons stay
/// reachable for the whole session.
#[derive(Debug, Default)]
pub struct DebugPanel;

impl DebugPanel {
    pub fn new() -> Self {
        Self
    }

    /// Draw the panel for this frame and apply any button press.
    pub fn show(
        &mut self,
        ctx: &egui::Context,
        lights: &mut LightRig,
        lighting: &mut LightingState,
    ) -> Option<PanelAction> {
        let mut pressed = None;

        egui::Window::new("Lights")
            .default_pos([12.0, 12.0])
            .collapsible(true)
            .resizable(false)
            .show(ctx, |ui| {
                light_folders(ui, lights);

                ui.separator();
                ui.label(format!("Mode: {}", lighting.mode().label()));
                for action in PanelAction::BUTTONS {
                    if ui.button(action.label()).clicked() {
                        pressed = Some(action);
                    }
                }
            });

        if let Some(action) = pressed {
            action.apply(lights, lighting);
        }
        pressed
    }
}

fn light_folders(ui: &mut egui::Ui, lights: &mut LightRig) {
    egui::CollapsingHeader::new("Ambient Light").show(ui, |ui| {
        slider(ui, "intensity", &mut lights.ambient.intensity, INTENSITY_RANGE);
        color(ui, "color", &mut lights.ambient.color);
    });

    egui::CollapsingHeader::new("Point Light").show(ui, |ui| {
        let point = &mut lights.point;
        slider(ui, "intensity", &mut point.intensity, INTENSITY_RANGE);
        color(ui, "color", &mut point.color);
        slider(ui, "x", &mut point.position.x, POINT_POSITION_RANGE);
        slider(ui, "y", &mut point.position.y, POINT_POSITION_RANGE);
        slider(ui, "z", &mut point.position.z, POINT_POSITION_RANGE);
        slider(ui, "decay", &mut point.decay, POINT_DECAY_RANGE);
        slider(ui, "distance", &mut point.distance, POINT_DISTANCE_RANGE);
    });

    egui::CollapsingHeader::new("Directional Light").show(ui, |ui| {
        let directional = &mut lights.directional;
        slider(ui, "intensity", &mut directional.intensity, INTENSITY_RANGE);
        color(ui, "color", &mut directional.color);
        slider(ui, "x", &mut directional.target.x, DIRECTIONAL_TARGET_RANGE);
        slider(ui, "y", &mut directional.target.y, DIRECTIONAL_TARGET_RANGE);
        slider(ui, "z", &mut directional.target.z, DIRECTIONAL_TARGET_RANGE);
    });

    egui::CollapsingHeader::new("HemiSphere Light").show(ui, |ui| {
        let hemisphere = &mut lights.hemisphere;
        slider(ui, "intensity", &mut hemisphere.intensity, INTENSITY_RANGE);
        color(ui, "Sky Color", &mut hemisphere.sky_color);
        color(ui, "Ground Color", &mut hemisphere.ground_color);
    });

    egui::CollapsingHeader::new("Area Light").show(ui, |ui| {
        let area = &mut lights.area;
        slider(ui, "intensity", &mut area.intensity, AREA_INTENSITY_RANGE);
        slider(ui, "height", &mut area.height, AREA_HEIGHT_RANGE);
        slider(ui, "x", &mut area.position.x, AREA_POSITION_RANGE);
        slider(ui, "y", &mut area.position.y, AREA_POSITION_RANGE);
        slider(ui, "z", &mut area.position.z, AREA_POSITION_RANGE);
    });
}

/// Values set outside the range by code (the thriller flicker) are shown as-is
fn slider(ui: &mut egui::Ui, label: &str, value: &mut f32, range: SliderRange) -> bool {
    ui.add(
        egui::Slider::new(value, range.range())
            .clamp_to_range(false)
            .step_by(range.step as f64)
            .text(label),
    )
    .changed()
}

/// Linear RGB color picker bound to a `Vec3`
fn color(ui: &mut egui::Ui, label: &str, value: &mut Vec3) -> bool {
    let mut rgb = value.to_array();
    let changed = ui
        .horizontal(|ui| {
            let changed = ui.color_edit_button_rgb(&mut rgb).changed();
            ui.label(label);
            changed
        })
        .inner;
    if changed {
        *value = Vec3::from_array(rgb);
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lighting::LightingPreset;

    fn run_frame(panel: &mut DebugPanel, lights: &mut LightRig, lighting: &mut LightingState) {
        let ctx = egui::Context::default();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            panel.show(ctx, lights, lighting);
        });
    }

    #[test]
    fn idle_frame_leaves_lights_untouched() {
        let mut panel = DebugPanel::new();
        let mut lights = LightRig::new();
        let mut lighting = LightingState::new();
        let before = lights.clone();

        run_frame(&mut panel, &mut lights, &mut lighting);

        assert_eq!(lights, before);
        assert_eq!(lighting.mode(), LightingMode::Calm);
    }

    #[test]
    fn thriller_button_darkens_scene() {
        let mut lights = LightRig::new();
        let mut lighting = LightingState::new();

        PanelAction::ThrillerMode.apply(&mut lights, &mut lighting);

        assert_eq!(lighting.mode(), LightingMode::Thriller);
        assert_eq!(lights.ambient.intensity, 0.01);
        assert_eq!(lights.directional.intensity, 0.01);
        assert_eq!(lights.hemisphere.intensity, 0.01);
        assert_eq!(lights.area.intensity, 0.9);
    }

    #[test]
    fn dreamy_button_restores_calm_levels() {
        let mut lights = LightRig::new();
        let mut lighting = LightingState::new();
        let calm = lights.clone();

        PanelAction::ThrillerMode.apply(&mut lights, &mut lighting);
        PanelAction::DreamyMode.apply(&mut lights, &mut lighting);

        assert_eq!(lighting.mode(), LightingMode::Calm);
        assert_eq!(lights.ambient.intensity, 0.3);
        assert_eq!(lights.point.intensity, 0.5);
        assert_eq!(lights.area.intensity, 3.0);
        assert_eq!(lights.area.position, Vec3::new(0.0, 1.0, 1.0));
        assert_eq!(lights.hemisphere, calm.hemisphere);
    }

    #[test]
    fn buttons_carry_mode_labels() {
        let labels = PanelAction::BUTTONS.map(PanelAction::label);
        assert_eq!(labels, ["Thriller Mode", "Dreamy Mode"]);
    }

    #[test]
    fn ranges_cover_preset_values() {
        let presets = [LightingPreset::CALM, LightingPreset::THRILLER];
        for preset in presets {
            assert!(AREA_INTENSITY_RANGE.range().contains(&preset.area_intensity));
            assert!(AREA_HEIGHT_RANGE.range().contains(&preset.area_height));
            assert!(INTENSITY_RANGE.range().contains(&preset.ambient_intensity));
            assert!(INTENSITY_RANGE.range().contains(&preset.hemisphere_intensity));
        }
    }

    #[test]
    fn point_sliders_use_coarser_position_step() {
        assert_eq!(POINT_POSITION_RANGE.step, 0.5);
        assert_eq!(POINT_POSITION_RANGE.max, 20.0);
        assert_eq!(POINT_DISTANCE_RANGE.min, 1.0);
    }
}
