pub mod affinity;
pub mod clock;
pub mod config;
pub mod driver;
pub mod errors;
pub mod pingpong;
pub mod report;
pub mod stats;
