//! Project repository contract and SQLite implementation.

use crate::db::ensure_schema_current;
use crate::model::project::Project;
use crate::repo::RepoResult;
use rusqlite::{params, Connection};

pub trait ProjectRepository {
    fn create_project(&self, name: &str) -> RepoResult<Project>;
    /// Lists all projects ordered by id ascending.
    fn list_projects(&self) -> RepoResult<Vec<Project>>;
}

/// SQLite-backed project repository.
pub struct SqliteProjectRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProjectRepository<'conn> {
    /// Wraps a migrated connection.
    ///
    /// # Errors
    /// - Returns `Db(SchemaNotReady)` when migrations have not been applied.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_current(conn)?;
        Ok(Self { conn })
    }
}

impl ProjectRepository for SqliteProjectRepository<'_> {
    fn create_project(&self, name: &str) -> RepoResult<Project> {
        self.conn
            .execute("INSERT INTO projects (name) VALUES (?1);", params![name])?;
        Ok(Project {
            id: self.conn.last_insert_rowid(),
            name: name.to_string(),
        })
    }

    fn list_projects(&self) -> RepoResult<Vec<Project>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM projects ORDER BY id ASC;")?;
        let projects = stmt
            .query_map([], |row| {
                Ok(Project {
                    id: row.get("id")?,
                    name: row.get("name")?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(projects)
    }
}

impl<T: ProjectRepository + ?Sized> ProjectRepository for &T {
    fn create_project(&self, name: &str) -> RepoResult<Project> {
        (**self).create_project(name)
    }

    fn list_projects(&self) -> RepoResult<Vec<Project>> {
        (**self).list_projects()
    }
}
