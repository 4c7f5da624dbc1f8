#![forbid(unsafe_code)]

pub mod level;
pub mod model;
pub mod streak;
pub mod time;

pub use level::{LevelProgress, level_for};
pub use streak::{StreakUpdate, advance_streak};
pub use time::Clock;
