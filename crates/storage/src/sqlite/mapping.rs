use std::str::FromStr;

use journey_core::model::{
    CheckId, CompletionKind, Day, DayId, DayStatus, Difficulty, KnowledgeCheck, Profile, Task,
    TaskId, UserId, Week, WeekId,
};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn i64_to_u64(field: &'static str, v: i64) -> Result<u64, StorageError> {
    u64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} sign overflow")))
}

fn i64_to_u32(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

pub(crate) fn id_to_i64(field: &'static str, v: u64) -> Result<i64, StorageError> {
    i64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} overflow")))
}

pub(crate) fn user_id_from_str(s: &str) -> Result<UserId, StorageError> {
    UserId::from_str(s).map_err(ser)
}

pub(crate) fn parse_day_status(s: &str) -> Result<DayStatus, StorageError> {
    match s {
        "upcoming" => Ok(DayStatus::Upcoming),
        "active" => Ok(DayStatus::Active),
        "completed" => Ok(DayStatus::Completed),
        "pre_completed" => Ok(DayStatus::PreCompleted),
        "post_completed" => Ok(DayStatus::PostCompleted),
        "missed" => Ok(DayStatus::Missed),
        _ => Err(StorageError::Serialization(format!("invalid status: {s}"))),
    }
}

pub(crate) fn parse_completion_kind(s: &str) -> Result<CompletionKind, StorageError> {
    match s {
        "normal" => Ok(CompletionKind::Normal),
        "pre" => Ok(CompletionKind::Pre),
        "post" => Ok(CompletionKind::Post),
        _ => Err(StorageError::Serialization(format!(
            "invalid completion type: {s}"
        ))),
    }
}

pub(crate) fn parse_difficulty(s: &str) -> Result<Difficulty, StorageError> {
    match s {
        "easy" => Ok(Difficulty::Easy),
        "medium" => Ok(Difficulty::Medium),
        "hard" => Ok(Difficulty::Hard),
        "boss" => Ok(Difficulty::Boss),
        _ => Err(StorageError::Serialization(format!(
            "invalid difficulty: {s}"
        ))),
    }
}

pub(crate) fn map_profile_row(row: &SqliteRow) -> Result<Profile, StorageError> {
    let user_id = user_id_from_str(row.try_get::<String, _>("user_id").map_err(ser)?.as_str())?;

    Ok(Profile::from_persisted(
        user_id,
        row.try_get::<String, _>("display_name").map_err(ser)?,
        i64_to_u32("total_xp", row.try_get("total_xp").map_err(ser)?)?,
        i64_to_u32("current_streak", row.try_get("current_streak").map_err(ser)?)?,
        i64_to_u32("longest_streak", row.try_get("longest_streak").map_err(ser)?)?,
        row.try_get("last_active_date").map_err(ser)?,
    ))
}

pub(crate) fn map_week_row(row: &SqliteRow) -> Result<Week, StorageError> {
    let user_id = user_id_from_str(row.try_get::<String, _>("user_id").map_err(ser)?.as_str())?;

    Week::from_persisted(
        WeekId::new(i64_to_u64("id", row.try_get::<i64, _>("id").map_err(ser)?)?),
        user_id,
        i64_to_u32("week_number", row.try_get("week_number").map_err(ser)?)?,
        row.try_get::<String, _>("title").map_err(ser)?,
        row.try_get::<String, _>("theme").map_err(ser)?,
        row.try_get::<String, _>("color_accent").map_err(ser)?,
        row.try_get::<i64, _>("bonus_awarded").map_err(ser)? != 0,
        row.try_get("created_at").map_err(ser)?,
    )
    .map_err(ser)
}

pub(crate) fn map_day_row(row: &SqliteRow) -> Result<Day, StorageError> {
    let user_id = user_id_from_str(row.try_get::<String, _>("user_id").map_err(ser)?.as_str())?;

    let status_str: String = row.try_get("status").map_err(ser)?;
    let status = parse_day_status(status_str.as_str())?;
    let kind_str: String = row.try_get("completion_type").map_err(ser)?;
    let completion_type = parse_completion_kind(kind_str.as_str())?;

    Day::from_persisted(
        DayId::new(i64_to_u64("id", row.try_get::<i64, _>("id").map_err(ser)?)?),
        user_id,
        WeekId::new(i64_to_u64(
            "week_id",
            row.try_get::<i64, _>("week_id").map_err(ser)?,
        )?),
        i64_to_u32("day_number", row.try_get("day_number").map_err(ser)?)?,
        row.try_get("date").map_err(ser)?,
        row.try_get::<String, _>("title").map_err(ser)?,
        status,
        completion_type,
        row.try_get("xp_modifier").map_err(ser)?,
        i64_to_u32("xp_reward", row.try_get("xp_reward").map_err(ser)?)?,
        i64_to_u32("xp_earned", row.try_get("xp_earned").map_err(ser)?)?,
        row.try_get::<String, _>("notes").map_err(ser)?,
        row.try_get("completed_at").map_err(ser)?,
        row.try_get("created_at").map_err(ser)?,
    )
    .map_err(ser)
}

pub(crate) fn map_task_row(row: &SqliteRow) -> Result<Task, StorageError> {
    let difficulty_str: String = row.try_get("difficulty").map_err(ser)?;

    Task::from_persisted(
        TaskId::new(i64_to_u64("id", row.try_get::<i64, _>("id").map_err(ser)?)?),
        DayId::new(i64_to_u64(
            "day_id",
            row.try_get::<i64, _>("day_id").map_err(ser)?,
        )?),
        row.try_get::<String, _>("title").map_err(ser)?,
        row.try_get::<String, _>("description").map_err(ser)?,
        parse_difficulty(difficulty_str.as_str())?,
        i64_to_u32("xp_value", row.try_get("xp_value").map_err(ser)?)?,
        i64_to_u32("sort_order", row.try_get("sort_order").map_err(ser)?)?,
        row.try_get("completed_at").map_err(ser)?,
    )
    .map_err(ser)
}

pub(crate) fn map_check_row(row: &SqliteRow) -> Result<KnowledgeCheck, StorageError> {
    KnowledgeCheck::from_persisted(
        CheckId::new(i64_to_u64("id", row.try_get::<i64, _>("id").map_err(ser)?)?),
        DayId::new(i64_to_u64(
            "day_id",
            row.try_get::<i64, _>("day_id").map_err(ser)?,
        )?),
        row.try_get::<String, _>("question").map_err(ser)?,
        row.try_get::<String, _>("answer_notes").map_err(ser)?,
        i64_to_u32("sort_order", row.try_get("sort_order").map_err(ser)?)?,
        row.try_get::<i64, _>("is_answered").map_err(ser)? != 0,
    )
    .map_err(ser)
}
