use chrono::Utc;
use sqlx::SqlitePool;

use super::SqliteInitError;

/// Runs a single, consolidated migration for the current schema.
///
/// Creates the full schema (profiles, weeks, days, tasks, knowledge checks,
/// and indexes). Ownership cascades from weeks down to tasks and checks.
#[allow(clippy::too_many_lines)]
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), SqliteInitError> {
    async fn is_applied(pool: &SqlitePool, version: i64) -> Result<bool, sqlx::Error> {
        let row = sqlx::query("SELECT 1 FROM schema_migrations WHERE version = ?1")
            .bind(version)
            .fetch_optional(pool)
            .await?;
        Ok(row.is_some())
    }

    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            );
            ",
    )
    .execute(pool)
    .await?;

    // Version 1: full schema.
    if !is_applied(pool, 1).await? {
        let mut tx = pool.begin().await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS profiles (
                    user_id TEXT PRIMARY KEY,
                    display_name TEXT NOT NULL,
                    total_xp INTEGER NOT NULL CHECK (total_xp >= 0),
                    current_streak INTEGER NOT NULL CHECK (current_streak >= 0),
                    longest_streak INTEGER NOT NULL CHECK (longest_streak >= current_streak),
                    last_active_date TEXT
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS weeks (
                    id INTEGER NOT NULL,
                    user_id TEXT NOT NULL,
                    week_number INTEGER NOT NULL CHECK (week_number >= 1),
                    title TEXT NOT NULL,
                    theme TEXT NOT NULL,
                    color_accent TEXT NOT NULL,
                    bonus_awarded INTEGER NOT NULL CHECK (bonus_awarded IN (0, 1)),
                    created_at TEXT NOT NULL,
                    PRIMARY KEY (id, user_id)
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS days (
                    id INTEGER NOT NULL,
                    user_id TEXT NOT NULL,
                    week_id INTEGER NOT NULL,
                    day_number INTEGER NOT NULL CHECK (day_number >= 1),
                    date TEXT,
                    title TEXT NOT NULL,
                    status TEXT NOT NULL,
                    completion_type TEXT NOT NULL,
                    xp_modifier REAL NOT NULL,
                    xp_reward INTEGER NOT NULL CHECK (xp_reward >= 0),
                    xp_earned INTEGER NOT NULL CHECK (xp_earned >= 0),
                    notes TEXT NOT NULL,
                    completed_at TEXT,
                    created_at TEXT NOT NULL,
                    PRIMARY KEY (id, user_id),
                    FOREIGN KEY (week_id, user_id) REFERENCES weeks(id, user_id) ON DELETE CASCADE
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS tasks (
                    id INTEGER NOT NULL,
                    user_id TEXT NOT NULL,
                    day_id INTEGER NOT NULL,
                    title TEXT NOT NULL,
                    description TEXT NOT NULL,
                    difficulty TEXT NOT NULL,
                    xp_value INTEGER NOT NULL CHECK (xp_value >= 0),
                    sort_order INTEGER NOT NULL,
                    completed_at TEXT,
                    PRIMARY KEY (id, user_id),
                    FOREIGN KEY (day_id, user_id) REFERENCES days(id, user_id) ON DELETE CASCADE
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS knowledge_checks (
                    id INTEGER NOT NULL,
                    user_id TEXT NOT NULL,
                    day_id INTEGER NOT NULL,
                    question TEXT NOT NULL,
                    answer_notes TEXT NOT NULL,
                    sort_order INTEGER NOT NULL,
                    is_answered INTEGER NOT NULL CHECK (is_answered IN (0, 1)),
                    PRIMARY KEY (id, user_id),
                    FOREIGN KEY (day_id, user_id) REFERENCES days(id, user_id) ON DELETE CASCADE
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE INDEX IF NOT EXISTS idx_days_user_date
                    ON days(user_id, date);
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE INDEX IF NOT EXISTS idx_days_user_week
                    ON days(user_id, week_id, day_number);
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE INDEX IF NOT EXISTS idx_tasks_user_day
                    ON tasks(user_id, day_id, sort_order);
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE INDEX IF NOT EXISTS idx_checks_user_day
                    ON knowledge_checks(user_id, day_id, sort_order);
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE INDEX IF NOT EXISTS idx_profiles_last_active
                    ON profiles(last_active_date);
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                INSERT INTO schema_migrations (version, applied_at)
                VALUES (?1, ?2)
                ON CONFLICT(version) DO NOTHING
            ",
        )
        .bind(1_i64)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
    }

    Ok(())
}
