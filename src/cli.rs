// cli.rs - Command-line interface configuration
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "island-tour")]
#[command(about = "Camera tour through an animated glTF model", long_about = None)]
pub struct Cli {
    /// JSON tour configuration
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// glTF/GLB model to load, overriding the configuration
    #[arg(long)]
    pub model: Option<PathBuf>,

    /// Playback speed of camera clips
    #[arg(long = "time-scale")]
    pub time_scale: Option<f32>,

    /// Intro title text
    #[arg(long)]
    pub title: Option<String>,

    /// Show the debug window
    #[arg(long, default_value = "false")]
    pub debug: bool,

    /// Disable UI elements
    #[arg(long = "no-ui", default_value = "false")]
    pub no_ui: bool,
}
