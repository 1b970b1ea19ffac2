pub mod animation;
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod frame;
pub mod input;
pub mod intro;
pub mod loaders;
pub mod renderer;
pub mod scene;
pub mod text;
pub mod tour;
pub mod viewport;

pub use config::TourConfig;
pub use scene::SceneAsset;
pub use tour::Tour;
