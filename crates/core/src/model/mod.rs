mod check;
mod day;
mod ids;
mod profile;
mod task;
mod week;

pub use ids::{CheckId, DayId, ParseIdError, TaskId, UserId, WeekId};

pub use check::{AnswerState, CheckError, KnowledgeCheck};
pub use day::{CompletionKind, Day, DayError, DayStatus};
pub use profile::{Profile, XpAward};
pub use task::{Difficulty, Task, TaskError, TaskState};
pub use week::{DEFAULT_COLOR_ACCENT, Week, WeekError};
