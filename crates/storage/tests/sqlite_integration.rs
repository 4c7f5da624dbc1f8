use chrono::Duration;
use journey_core::model::{
    CheckId, CompletionKind, Day, DayId, DayStatus, Difficulty, KnowledgeCheck, Profile, Task,
    TaskId, UserId, Week, WeekId,
};
use journey_core::time::{fixed_now, fixed_today};
use storage::repository::{
    DayRepository, KnowledgeCheckRepository, ProfileRepository, StorageError, TaskRepository,
    WeekRepository,
};
use storage::sqlite::SqliteRepository;

fn build_week(user: UserId, id: u64, number: u32) -> Week {
    Week::new(
        WeekId::new(id),
        user,
        number,
        format!("Week {number}"),
        "fundamentals",
        journey_core::model::DEFAULT_COLOR_ACCENT,
        fixed_now(),
    )
    .unwrap()
}

fn build_day(user: UserId, week: WeekId, id: u64, number: u32) -> Day {
    Day::new(
        DayId::new(id),
        user,
        week,
        number,
        Some(fixed_today() + Duration::days(i64::from(number) - 1)),
        format!("Day {number}"),
        100,
        DayStatus::Upcoming,
        fixed_now(),
    )
    .unwrap()
}

#[tokio::test]
async fn sqlite_roundtrip_persists_finalized_day() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_day_roundtrip?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let user = UserId::generate();
    let week = build_week(user, 1, 1);
    repo.upsert_week(&week).await.unwrap();

    let mut day = build_day(user, week.id(), 1, 1);
    day.finalize(CompletionKind::Post, fixed_now()).unwrap();
    repo.upsert_day(&day).await.unwrap();

    let fetched = repo.get_day(user, day.id()).await.expect("fetch");
    assert_eq!(fetched.status(), DayStatus::PostCompleted);
    assert_eq!(fetched.completion_type(), CompletionKind::Post);
    assert_eq!(fetched.xp_earned(), 75);
    assert_eq!(fetched.completed_at(), Some(fixed_now()));
    assert_eq!(fetched.date(), day.date());
}

#[tokio::test]
async fn sqlite_scopes_all_reads_by_user() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_scoping?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let owner = UserId::generate();
    let intruder = UserId::generate();

    let week = build_week(owner, 1, 1);
    repo.upsert_week(&week).await.unwrap();
    let day = build_day(owner, week.id(), 1, 1);
    repo.upsert_day(&day).await.unwrap();
    let task = Task::new(TaskId::new(1), day.id(), "Two Sum", "", Difficulty::Easy, 0).unwrap();
    repo.upsert_task(owner, &task).await.unwrap();
    let check = KnowledgeCheck::new(CheckId::new(1), day.id(), "Why hashing?", 0).unwrap();
    repo.upsert_check(owner, &check).await.unwrap();

    assert!(matches!(
        repo.get_week(intruder, week.id()).await,
        Err(StorageError::NotFound)
    ));
    assert!(matches!(
        repo.get_day(intruder, day.id()).await,
        Err(StorageError::NotFound)
    ));
    assert!(matches!(
        repo.get_task(intruder, task.id()).await,
        Err(StorageError::NotFound)
    ));
    assert!(matches!(
        repo.get_check(intruder, check.id()).await,
        Err(StorageError::NotFound)
    ));
    assert!(
        repo.day_on_date(intruder, fixed_today())
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn sqlite_cascades_week_deletion() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_cascade?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let user = UserId::generate();
    let week = build_week(user, 1, 1);
    repo.upsert_week(&week).await.unwrap();
    let day = build_day(user, week.id(), 1, 1);
    repo.upsert_day(&day).await.unwrap();
    let task = Task::new(TaskId::new(1), day.id(), "Two Sum", "", Difficulty::Hard, 0).unwrap();
    repo.upsert_task(user, &task).await.unwrap();
    let check = KnowledgeCheck::new(CheckId::new(1), day.id(), "Why hashing?", 0).unwrap();
    repo.upsert_check(user, &check).await.unwrap();

    repo.delete_weeks(user).await.unwrap();

    assert!(repo.list_weeks(user).await.unwrap().is_empty());
    assert!(repo.list_days(user).await.unwrap().is_empty());
    assert!(repo.tasks_for_day(user, day.id()).await.unwrap().is_empty());
    assert!(
        repo.checks_for_day(user, day.id())
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn sqlite_persists_profile_and_stale_query() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_profiles?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let today = fixed_today();

    let mut stale = Profile::new(UserId::generate(), "Stale");
    stale.add_xp(1_250);
    stale.record_activity(today - Duration::days(4));
    repo.upsert_profile(&stale).await.unwrap();

    let mut fresh = Profile::new(UserId::generate(), "Fresh");
    fresh.record_activity(today);
    repo.upsert_profile(&fresh).await.unwrap();

    let never = Profile::new(UserId::generate(), "Never");
    repo.upsert_profile(&never).await.unwrap();

    let fetched = repo.get_profile(stale.user_id()).await.unwrap();
    assert_eq!(fetched.total_xp(), 1_250);
    assert_eq!(fetched.current_level(), 3);
    assert_eq!(fetched.last_active_date(), Some(today - Duration::days(4)));

    let found = repo
        .profiles_last_active_before(today - Duration::days(1))
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].user_id(), stale.user_id());
}

#[tokio::test]
async fn sqlite_task_and_check_state_round_trips() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_task_state?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let user = UserId::generate();
    let week = build_week(user, 1, 1);
    repo.upsert_week(&week).await.unwrap();
    let day = build_day(user, week.id(), 1, 1);
    repo.upsert_day(&day).await.unwrap();

    let mut task = Task::new(TaskId::new(1), day.id(), "Two Sum", "", Difficulty::Boss, 2).unwrap();
    task.complete(fixed_now()).unwrap();
    repo.upsert_task(user, &task).await.unwrap();

    let fetched = repo.get_task(user, task.id()).await.unwrap();
    assert!(fetched.is_done());
    assert_eq!(fetched.completed_at(), Some(fixed_now()));
    assert_eq!(fetched.xp_value(), 100);
    assert_eq!(fetched.order(), 2);

    let mut check = KnowledgeCheck::new(CheckId::new(1), day.id(), "Why hashing?", 0).unwrap();
    check.record_answer(true);
    check.set_answer_notes("constant time lookups");
    repo.upsert_check(user, &check).await.unwrap();

    let fetched = repo.get_check(user, check.id()).await.unwrap();
    assert!(fetched.is_answered());
    assert_eq!(fetched.answer_notes(), "constant time lookups");
}
