pub mod director;
pub mod playback;
pub mod resolve;
pub mod timecode;
