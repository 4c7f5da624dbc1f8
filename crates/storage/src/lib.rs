#![forbid(unsafe_code)]

pub mod repository;
pub mod sqlite;

pub use repository::{
    DayRepository, InMemoryRepository, KnowledgeCheckRepository, ProfileRepository, Storage,
    StorageError, TaskRepository, WeekRepository,
};
pub use sqlite::{SqliteInitError, SqliteRepository};
