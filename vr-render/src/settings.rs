use crate::camera_rig::{DEFAULT_FAR_CLIP, DEFAULT_NEAR_CLIP};
use crate::engine::DebugMode;
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use vr_render_api::VRRuntimeKind;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("cannot read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid settings file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid setting {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

// Renderer configuration. Every field has a default, so a settings file
// only needs to list what it changes.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct RendererSettings {
    // Runtimes tried in order until one initializes.
    pub runtime_preference: Vec<VRRuntimeKind>,

    pub near_clipping_distance: f32,

    pub far_clipping_distance: f32,

    // Copy the runtime mirror texture into the window.
    pub mirror_hmd_view: bool,

    pub debug_mode: DebugMode,

    // Minimum time between two haptic pulses on one controller.
    pub haptic_interval_ms: u64,

    // OpenVR pulse length for strength 1.0, in microseconds.
    pub openvr_haptic_pulse_us: u16,

    // Ask the runtime for motion-predicted poses.
    pub predict_tracking: bool,
}

impl Default for RendererSettings {
    fn default() -> RendererSettings {
        RendererSettings {
            runtime_preference: vec![VRRuntimeKind::Oculus, VRRuntimeKind::OpenVR, VRRuntimeKind::Headless],
            near_clipping_distance: DEFAULT_NEAR_CLIP,
            far_clipping_distance: DEFAULT_FAR_CLIP,
            mirror_hmd_view: true,
            debug_mode: DebugMode::HmdMirror,
            haptic_interval_ms: 50,
            openvr_haptic_pulse_us: 3500,
            predict_tracking: true,
        }
    }
}

impl RendererSettings {
    pub fn haptic_interval(&self) -> Duration {
        Duration::from_millis(self.haptic_interval_ms)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.near_clipping_distance > 0.0) {
            return Err(SettingsError::Invalid {
                name: "nearClippingDistance",
                reason: format!("must be positive, got {}", self.near_clipping_distance),
            });
        }
        if !(self.far_clipping_distance > self.near_clipping_distance) {
            return Err(SettingsError::Invalid {
                name: "farClippingDistance",
                reason: format!(
                    "must be greater than the near distance {}, got {}",
                    self.near_clipping_distance, self.far_clipping_distance
                ),
            });
        }
        if self.runtime_preference.is_empty() {
            return Err(SettingsError::Invalid {
                name: "runtimePreference",
                reason: "no runtime listed".into(),
            });
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<RendererSettings, SettingsError> {
        let settings: RendererSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }
}

pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<RendererSettings, SettingsError> {
    RendererSettings::from_json(&fs::read_to_string(path)?)
}

// Falls back to the defaults when the file is missing or invalid.
pub fn load_settings_or_default<P: AsRef<Path>>(path: P) -> RendererSettings {
    let path = path.as_ref();
    match load_settings(path) {
        Ok(settings) => settings,
        Err(e) => {
            warn!("{}: {}. Using default settings.", path.display(), e);
            RendererSettings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let settings = RendererSettings::from_json("{}").unwrap();
        assert_eq!(settings, RendererSettings::default());
        assert_eq!(settings.near_clipping_distance, 0.01);
        assert_eq!(settings.far_clipping_distance, 500.0);
        assert_eq!(settings.haptic_interval(), Duration::from_millis(50));
    }

    #[test]
    fn partial_file_overrides_fields() {
        let json = r#"{ "runtimePreference": ["OpenVR", "Headless"], "mirrorHmdView": false, "debugMode": "Monoscopic" }"#;
        let settings = RendererSettings::from_json(json).unwrap();
        assert_eq!(settings.runtime_preference, vec![VRRuntimeKind::OpenVR, VRRuntimeKind::Headless]);
        assert!(!settings.mirror_hmd_view);
        assert_eq!(settings.debug_mode, DebugMode::Monoscopic);
        assert_eq!(settings.far_clipping_distance, 500.0);
    }

    #[test]
    fn rejects_inverted_clip_planes() {
        let json = r#"{ "nearClippingDistance": 10.0, "farClippingDistance": 1.0 }"#;
        match RendererSettings::from_json(json) {
            Err(SettingsError::Invalid { name, .. }) => assert_eq!(name, "farClippingDistance"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let settings = load_settings_or_default("/nonexistent/vr-render-settings.json");
        assert_eq!(settings, RendererSettings::default());
    }
}
