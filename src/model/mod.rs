pub mod config;
pub mod editor;
pub mod engine;
pub mod playback;
pub mod schedule;

pub use config::*;
pub use editor::*;
pub use engine::*;
pub use playback::*;
pub use schedule::*;
