//! Tour configuration.
//!
//! Values come from three layers: built-in defaults, an optional JSON file,
//! then command-line flags. Every field of the file is optional.

use anyhow::{Context, Result};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::intro::IntroSettings;
use crate::tour::{Anchor, ControlCommand, DEFAULT_TIME_SCALE};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 800,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnchorConfig {
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    pub position: [f32; 3],
    pub control: ControlCommand,
}

impl AnchorConfig {
    fn new(name: &str, position: [f64; 3], button: u32) -> Self {
        Self {
            name: name.to_string(),
            label: None,
            position: position.map(|c| c as f32),
            control: ControlCommand::Select { button },
        }
    }

    /// Button caption; the anchor name when no label is set
    pub fn to_anchor(&self) -> Anchor {
        Anchor {
            name: self.name.clone(),
            label: self.label.clone().unwrap_or_else(|| self.name.clone()),
            position: Vec3::from(self.position),
            control: self.control,
        }
    }
}

fn default_anchors() -> Vec<AnchorConfig> {
    vec![
        AnchorConfig::new(
            "island1",
            [0.4329507251944667, 2.979791312544256, -0.8677406491402966],
            1,
        ),
        AnchorConfig::new(
            "island2",
            [-9.652038259892244, 0.1998752561480579, 2.9010576615271613],
            2,
        ),
        AnchorConfig::new(
            "island3",
            [-1.4776348324758652, -0.02655733907587776, 9.018948022344265],
            3,
        ),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectionalLightConfig {
    pub color: [f32; 3],
    pub intensity: f32,
    /// Light shines from this point towards the origin
    pub position: [f32; 3],
}

impl Default for DirectionalLightConfig {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            intensity: 0.8,
            position: [1.0, 1.0, 1.0],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbientLightConfig {
    pub color: [f32; 3],
    pub intensity: f32,
}

impl Default for AmbientLightConfig {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            intensity: 0.8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    pub directional: DirectionalLightConfig,
    pub ambient: AmbientLightConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TourConfig {
    pub model: PathBuf,
    pub title: String,
    pub time_scale: f32,
    pub clear_color: [f32; 4],
    pub window: WindowConfig,
    pub anchors: Vec<AnchorConfig>,
    pub lighting: LightingConfig,
    pub intro: IntroSettings,
    #[serde(skip)]
    pub debug: bool,
    #[serde(skip)]
    pub show_ui: bool,
}

impl Default for TourConfig {
    fn default() -> Self {
        Self {
            model: PathBuf::from("model/island3.glb"),
            title: "Island Tour".to_string(),
            time_scale: DEFAULT_TIME_SCALE,
            clear_color: [0.93, 0.95, 0.97, 1.0],
            window: WindowConfig::default(),
            anchors: default_anchors(),
            lighting: LightingConfig::default(),
            intro: IntroSettings::default(),
            debug: false,
            show_ui: true,
        }
    }
}

impl TourConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .context(format!("Failed to read config file: {:?}", path))?;
        Self::from_json(&text).context(format!("Failed to parse config file: {:?}", path))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Defaults, then the config file named by `--config`, then flags
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_cli(cli);
        log::info!("Config: model {:?}, time scale {}", config.model, config.time_scale);
        Ok(config)
    }

    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(model) = &cli.model {
            self.model = model.clone();
        }
        if let Some(time_scale) = cli.time_scale {
            self.time_scale = time_scale;
        }
        if let Some(title) = &cli.title {
            self.title = title.clone();
        }
        self.debug = cli.debug;
        self.show_ui = !cli.no_ui;
    }

    pub fn anchors(&self) -> Vec<Anchor> {
        self.anchors.iter().map(AnchorConfig::to_anchor).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TourConfig::default();
        assert_eq!(config.model, PathBuf::from("model/island3.glb"));
        assert_eq!(config.time_scale, 1.5);
        assert_eq!(config.lighting.directional.intensity, 0.8);
        assert_eq!(config.lighting.ambient.intensity, 0.8);

        let anchors = config.anchors();
        assert_eq!(anchors.len(), 3);
        assert_eq!(anchors[1].name, "island2");
        assert_eq!(anchors[1].label, "island2");
        assert_eq!(anchors[1].control, ControlCommand::Select { button: 2 });
        assert!((anchors[2].position.z - 9.018948).abs() < 1e-5);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = TourConfig::from_json(
            r#"{ "time_scale": 2.0, "window": { "width": 640 }, "lighting": { "ambient": { "intensity": 0.3 } } }"#,
        )
        .unwrap();
        assert_eq!(config.time_scale, 2.0);
        assert_eq!(config.window, WindowConfig { width: 640, height: 800 });
        assert_eq!(config.lighting.ambient.intensity, 0.3);
        assert_eq!(config.lighting.directional, DirectionalLightConfig::default());
        assert_eq!(config.anchors.len(), 3);
        assert!(config.show_ui);
    }

    #[test]
    fn test_anchor_entries() {
        let config = TourConfig::from_json(
            r#"{ "anchors": [ { "name": "pier", "label": "Pier", "position": [1, 2, 3], "control": "back" } ] }"#,
        )
        .unwrap();
        let anchors = config.anchors();
        assert_eq!(anchors.len(), 1);
        assert_eq!(anchors[0].label, "Pier");
        assert_eq!(anchors[0].position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(anchors[0].control, ControlCommand::Back);

        assert!(TourConfig::from_json(r#"{ "anchors": [ { "name": "x", "position": [0, 0, 0], "control": "left" } ] }"#).is_err());
    }

    #[test]
    fn test_cli_overrides_file() {
        let mut config = TourConfig::from_json(r#"{ "model": "a.glb", "title": "File" }"#).unwrap();
        let cli = Cli {
            model: Some(PathBuf::from("b.glb")),
            no_ui: true,
            debug: true,
            ..Default::default()
        };
        config.apply_cli(&cli);
        assert_eq!(config.model, PathBuf::from("b.glb"));
        assert_eq!(config.title, "File");
        assert!(config.debug);
        assert!(!config.show_ui);
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = TourConfig::load("does/not/exist.json").unwrap_err();
        assert!(err.to_string().contains("does/not/exist.json"));
    }
}
