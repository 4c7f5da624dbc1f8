#![forbid(unsafe_code)]

pub mod error;
pub mod journey_seed;
pub mod progression_service;
pub mod stats_service;
pub mod streak_sweep;

pub use journey_core::Clock;

pub use error::{ProgressionError, SeedError, StatsError, SweepError};
pub use journey_seed::{JourneySeeder, SeedPlan, SeedSummary};
pub use progression_service::{
    CheckOutcome, CompletionOutcome, ProgressionService, TaskOutcome,
};
pub use stats_service::{DailyXp, JourneyStats, StatsService};
pub use streak_sweep::StreakSweep;
