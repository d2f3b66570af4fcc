//! Services running against a hand-written storage fake, without SQLite.

use chrono::NaiveDate;
use scheduler_core::{
    CoreError, CreateTaskInput, DateChange, EventQueryService, Project, RepoError, RepoResult,
    Task, TaskId, TaskRecord, TaskRepository, TaskService, TaskStatus, UpdateDatesInput,
};
use scheduler_core::model::task::check_date_range;
use std::cell::RefCell;

#[derive(Default)]
struct InMemoryTasks {
    projects: Vec<Project>,
    tasks: RefCell<Vec<Task>>,
    writes: RefCell<usize>,
    calls: RefCell<Vec<&'static str>>,
}

impl InMemoryTasks {
    fn with_project(id: i64, name: &str) -> Self {
        Self {
            projects: vec![Project {
                id,
                name: name.to_string(),
            }],
            ..Self::default()
        }
    }
}

impl TaskRepository for InMemoryTasks {
    fn find_task_by_id(&self, id: &TaskId) -> RepoResult<Option<Task>> {
        self.calls.borrow_mut().push("find");
        Ok(self.tasks.borrow().iter().find(|t| &t.id == id).cloned())
    }

    fn update_task_dates(&self, id: &TaskId, change: &DateChange) -> RepoResult<Task> {
        self.calls.borrow_mut().push("update");
        let mut tasks = self.tasks.borrow_mut();
        let task = tasks
            .iter_mut()
            .find(|t| &t.id == id)
            .ok_or_else(|| RepoError::NotFound(id.clone()))?;
        let end_date = change.end_date.unwrap_or(task.end_date);
        check_date_range(change.start_date, end_date)?;
        task.start_date = change.start_date;
        task.end_date = end_date;
        *self.writes.borrow_mut() += 1;
        Ok(task.clone())
    }

    fn create_task(&self, task: &Task) -> RepoResult<Task> {
        self.calls.borrow_mut().push("create");
        task.validate()?;
        if !self.projects.iter().any(|p| p.id == task.project_id) {
            return Err(RepoError::UnknownProject(task.project_id));
        }
        self.tasks.borrow_mut().push(task.clone());
        *self.writes.borrow_mut() += 1;
        Ok(task.clone())
    }

    fn list_tasks_with_projects(&self) -> RepoResult<Vec<TaskRecord>> {
        self.calls.borrow_mut().push("list");
        self.tasks
            .borrow()
            .iter()
            .map(|task| -> RepoResult<TaskRecord> {
                let project = self
                    .projects
                    .iter()
                    .find(|p| p.id == task.project_id)
                    .cloned()
                    .ok_or_else(|| RepoError::InvalidData("dangling project".to_string()))?;
                Ok(TaskRecord {
                    task: task.clone(),
                    project,
                    assignments: Vec::new(),
                })
            })
            .collect()
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn stored_task(id: &str, start: NaiveDate, end: NaiveDate) -> Task {
    Task {
        id: TaskId::new(id),
        title: "Roofing".to_string(),
        project_id: 7,
        start_date: start,
        end_date: end,
        status: TaskStatus::Todo,
        progress: None,
        is_all_day: true,
    }
}

#[test]
fn create_update_and_list_round_trip_through_fake() {
    let store = InMemoryTasks::with_project(7, "Harbor House");
    let tasks = TaskService::new(&store);
    let events = EventQueryService::new(&store);

    let id = tasks
        .create(&CreateTaskInput {
            title: Some("X".to_string()),
            start_date: Some("2024-05-01".to_string()),
            project_id: Some(7),
            ..CreateTaskInput::default()
        })
        .unwrap();

    let stored = store.find_task_by_id(&id).unwrap().unwrap();
    assert_eq!(stored.start_date, date(2024, 5, 1));
    assert_eq!(stored.end_date, date(2024, 5, 1));
    assert_eq!(stored.status, TaskStatus::Todo);

    tasks
        .update_dates(&UpdateDatesInput {
            id: Some(id.clone()),
            start: Some("2024-05-02T00:00:00Z".to_string()),
            end: Some("2024-05-06T00:00:00Z".to_string()),
            all_day: Some(true),
        })
        .unwrap();

    let listed = events.list_events().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].title, "Harbor House: X");
    assert_eq!(listed[0].start.date_naive(), date(2024, 5, 2));
    assert_eq!(listed[0].end.date_naive(), date(2024, 5, 6));
    assert_eq!(*store.writes.borrow(), 2);
}

#[test]
fn rejected_input_never_reaches_storage() {
    let store = InMemoryTasks::with_project(7, "Harbor House");
    let tasks = TaskService::new(&store);

    let err = tasks
        .create(&CreateTaskInput {
            title: Some("X".to_string()),
            start_date: Some("31/12/2024".to_string()),
            project_id: Some(7),
            ..CreateTaskInput::default()
        })
        .unwrap_err();
    assert!(matches!(err, CoreError::InvalidDate(_)));

    let err = tasks
        .update_dates(&UpdateDatesInput {
            start: Some("2024-05-02".to_string()),
            ..UpdateDatesInput::default()
        })
        .unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));

    assert_eq!(*store.writes.borrow(), 0);
}

#[test]
fn unknown_project_maps_to_validation() {
    let store = InMemoryTasks::with_project(7, "Harbor House");
    let err = TaskService::new(&store)
        .create(&CreateTaskInput {
            title: Some("X".to_string()),
            start_date: Some("2024-05-01".to_string()),
            project_id: Some(8),
            ..CreateTaskInput::default()
        })
        .unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));
}

#[test]
fn each_use_case_makes_one_storage_call() {
    let store = InMemoryTasks::with_project(7, "Harbor House");
    store
        .tasks
        .borrow_mut()
        .push(stored_task("T1", date(2024, 3, 1), date(2024, 3, 9)));
    let tasks = TaskService::new(&store);

    tasks
        .update_dates(&UpdateDatesInput {
            id: Some(TaskId::new("T1")),
            start: Some("2024-03-04T10:00:00Z".to_string()),
            ..UpdateDatesInput::default()
        })
        .unwrap();
    assert_eq!(*store.calls.borrow(), vec!["update"]);

    let err = tasks
        .update_dates(&UpdateDatesInput {
            id: Some(TaskId::new("T1")),
            start: Some("2024-03-20T10:00:00Z".to_string()),
            ..UpdateDatesInput::default()
        })
        .unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));
    assert_eq!(*store.calls.borrow(), vec!["update", "update"]);

    EventQueryService::new(&store).list_events().unwrap();
    assert_eq!(*store.calls.borrow(), vec!["update", "update", "list"]);

    let stored = store.tasks.borrow()[0].clone();
    assert_eq!(stored.start_date, date(2024, 3, 4));
    assert_eq!(stored.end_date, date(2024, 3, 9));
}

#[test]
fn unprojectable_stored_end_is_a_storage_error() {
    let store = InMemoryTasks::with_project(7, "Harbor House");
    store
        .tasks
        .borrow_mut()
        .push(stored_task("T1", date(2024, 3, 1), NaiveDate::MAX));

    let err = EventQueryService::new(&store).list_events().unwrap_err();
    assert!(matches!(err, CoreError::Storage(RepoError::InvalidData(_))), "{err}");
}

