pub mod config_io;
pub mod enhance;
pub mod link;
pub mod logging;
pub mod schedule_file;
