use scheduler_core::db::open_db_in_memory;
use scheduler_core::{
    CalendarEvent, EventQueryService, ProjectRepository, SqliteProjectRepository,
    SqliteTaskRepository, TaskRepository, TaskStatus,
};
use rusqlite::{params, Connection};

fn seed(conn: &Connection) -> i64 {
    let project_id = SqliteProjectRepository::try_new(conn)
        .unwrap()
        .create_project("Harbor House")
        .unwrap()
        .id;
    conn.execute(
        "INSERT INTO tasks (id, title, project_id, start_date, end_date, status, progress)
         VALUES ('T1', 'Framing', ?1, '2024-03-10', '2024-03-12', 'in_progress', 50),
                ('T2', 'Paint', ?1, '2024-04-01', '2024-04-01', 'todo', NULL);",
        params![project_id],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO assignments (task_id, assignee) VALUES ('T1', 'ana'), ('T1', 'bo');",
        [],
    )
    .unwrap();
    project_id
}

fn find<'a>(events: &'a [CalendarEvent], id: &str) -> &'a CalendarEvent {
    events.iter().find(|event| event.id.as_str() == id).unwrap()
}

#[test]
fn stored_inclusive_end_is_listed_as_exclusive_end() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn);
    let service = EventQueryService::new(SqliteTaskRepository::try_new(&conn).unwrap());

    let events = service.list_events().unwrap();
    assert_eq!(events.len(), 2);

    let framing = find(&events, "T1");
    assert_eq!(framing.title, "Harbor House: Framing");
    assert_eq!(framing.start.to_rfc3339(), "2024-03-10T00:00:00+00:00");
    assert_eq!(framing.end.to_rfc3339(), "2024-03-13T00:00:00+00:00");
    assert!(framing.all_day);
    assert_eq!(framing.extended_props.status, TaskStatus::InProgress);
    assert_eq!(framing.extended_props.progress, Some(50.0));

    let paint = find(&events, "T2");
    assert_eq!(paint.end.date_naive().to_string(), "2024-04-02");
    assert_eq!(paint.extended_props.progress, None);
}

#[test]
fn listing_is_recomputed_on_every_call() {
    let conn = open_db_in_memory().unwrap();
    let project_id = seed(&conn);
    let service = EventQueryService::new(SqliteTaskRepository::try_new(&conn).unwrap());
    assert_eq!(service.list_events().unwrap().len(), 2);

    conn.execute(
        "INSERT INTO tasks (id, title, project_id, start_date, end_date)
         VALUES ('T3', 'Trim', ?1, '2024-05-01', '2024-05-02');",
        params![project_id],
    )
    .unwrap();
    assert_eq!(service.list_events().unwrap().len(), 3);
}

#[test]
fn records_carry_eagerly_loaded_assignments() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn);
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let records = repo.list_tasks_with_projects().unwrap();
    let framing = records.iter().find(|r| r.task.id.as_str() == "T1").unwrap();
    let assignees: Vec<&str> = framing
        .assignments
        .iter()
        .map(|a| a.assignee.as_str())
        .collect();
    assert_eq!(assignees, vec!["ana", "bo"]);
    assert_eq!(framing.project.name, "Harbor House");

    let paint = records.iter().find(|r| r.task.id.as_str() == "T2").unwrap();
    assert!(paint.assignments.is_empty());
}

#[test]
fn corrupt_stored_dates_surface_as_errors() {
    let conn = open_db_in_memory().unwrap();
    let project_id = seed(&conn);
    conn.execute(
        "INSERT INTO tasks (id, title, project_id, start_date, end_date)
         VALUES ('bad', 'Broken', ?1, '2024-03-10', 'Invalid Date');",
        params![project_id],
    )
    .unwrap();
    let service = EventQueryService::new(SqliteTaskRepository::try_new(&conn).unwrap());

    assert!(service.list_events().is_err());
}

#[test]
fn empty_store_lists_no_events() {
    let conn = open_db_in_memory().unwrap();
    let service = EventQueryService::new(SqliteTaskRepository::try_new(&conn).unwrap());
    assert!(service.list_events().unwrap().is_empty());
}
