use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::NaiveDate;
use rusqlite::{params, params_from_iter, Connection};
use thiserror::Error;

use crate::types::{Category, ListFilter, Priority, Status, Todo, TodoPatch};

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("date parse error: {0}")]
    Chrono(#[from] chrono::ParseError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage task join error: {0}")]
    Task(String),

    #[error("invalid todo data: {0}")]
    InvalidData(String),
}

#[async_trait]
pub trait TodoStorage: Send + Sync {
    async fn init(&self) -> StorageResult<()>;

    async fn list(&self, filter: ListFilter) -> StorageResult<Vec<Todo>>;

    async fn agenda(&self, due_date: NaiveDate) -> StorageResult<Vec<Todo>>;

    async fn fetch(&self, id: i64) -> StorageResult<Option<Todo>>;

    async fn insert(&self, todo: Todo) -> StorageResult<()>;

    /// Merge the patch over the stored row and rewrite it. Returns the
    /// merged row, or `None` when no row has the given id.
    async fn update(&self, id: i64, patch: TodoPatch) -> StorageResult<Option<Todo>>;

    /// Remove the row if present. Deleting an absent id is not an error.
    async fn delete(&self, id: i64) -> StorageResult<()>;
}

#[derive(Debug, Clone)]
pub struct SqliteTodoStorage {
    db_path: PathBuf,
}

impl SqliteTodoStorage {
    pub fn new(db_path: impl AsRef<Path>) -> Self {
        Self {
            db_path: db_path.as_ref().to_path_buf(),
        }
    }

    async fn with_connection<T, F>(&self, func: F) -> StorageResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> StorageResult<T> + Send + 'static,
    {
        let db_path = self.db_path.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = open_connection(&db_path)?;
            func(&mut connection)
        })
        .await
        .map_err(|error| StorageError::Task(error.to_string()))?
    }
}

#[async_trait]
impl TodoStorage for SqliteTodoStorage {
    async fn init(&self) -> StorageResult<()> {
        self.with_connection(|connection| {
            connection.execute_batch(
                r#"
                CREATE TABLE IF NOT EXISTS todo (
                    id INTEGER PRIMARY KEY,
                    todo TEXT NOT NULL,
                    priority TEXT NOT NULL,
                    status TEXT NOT NULL,
                    category TEXT NOT NULL,
                    due_date TEXT NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_todo_due_date ON todo(due_date);
                CREATE INDEX IF NOT EXISTS idx_todo_category ON todo(category);
                "#,
            )?;
            Ok(())
        })
        .await
    }

    async fn list(&self, filter: ListFilter) -> StorageResult<Vec<Todo>> {
        self.with_connection(move |connection| {
            let mut params_vec = Vec::new();
            let where_clause = build_list_where_clause(&filter, &mut params_vec);
            let sql = format!(
                "SELECT id, todo, priority, status, category, due_date FROM todo WHERE {}",
                where_clause
            );

            let mut stmt = connection.prepare(&sql)?;
            let mut rows = stmt.query(params_from_iter(params_vec.iter()))?;
            let mut todos = Vec::new();

            while let Some(row) = rows.next()? {
                todos.push(todo_from_row(row)?);
            }

            Ok(todos)
        })
        .await
    }

    async fn agenda(&self, due_date: NaiveDate) -> StorageResult<Vec<Todo>> {
        self.with_connection(move |connection| {
            let mut stmt = connection.prepare(
                "SELECT id, todo, priority, status, category, due_date FROM todo WHERE due_date = ?1",
            )?;
            let mut rows = stmt.query(params![format_due_date(due_date)])?;
            let mut todos = Vec::new();

            while let Some(row) = rows.next()? {
                todos.push(todo_from_row(row)?);
            }

            Ok(todos)
        })
        .await
    }

    async fn fetch(&self, id: i64) -> StorageResult<Option<Todo>> {
        self.with_connection(move |connection| fetch_todo(connection, id)).await
    }

    async fn insert(&self, todo: Todo) -> StorageResult<()> {
        self.with_connection(move |connection| {
            connection.execute(
                r#"
                INSERT INTO todo (id, todo, priority, status, category, due_date)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
                params![
                    todo.id,
                    todo.todo,
                    todo.priority.as_str(),
                    todo.status.as_str(),
                    todo.category.as_str(),
                    format_due_date(todo.due_date),
                ],
            )?;
            Ok(())
        })
        .await
    }

    async fn update(&self, id: i64, patch: TodoPatch) -> StorageResult<Option<Todo>> {
        self.with_connection(move |connection| {
            // The merge reads the previous row, so fetch and rewrite must not
            // interleave with a concurrent update to the same id.
            let tx = connection.transaction()?;

            let previous = fetch_todo(&tx, id)?;
            let Some(previous) = previous else {
                return Ok(None);
            };

            let merged = patch.apply(previous);
            tx.execute(
                r#"
                UPDATE todo
                SET todo = ?1,
                    priority = ?2,
                    status = ?3,
                    category = ?4,
                    due_date = ?5
                WHERE id = ?6
                "#,
                params![
                    merged.todo,
                    merged.priority.as_str(),
                    merged.status.as_str(),
                    merged.category.as_str(),
                    format_due_date(merged.due_date),
                    id,
                ],
            )?;

            tx.commit()?;
            Ok(Some(merged))
        })
        .await
    }

    async fn delete(&self, id: i64) -> StorageResult<()> {
        self.with_connection(move |connection| {
            connection.execute("DELETE FROM todo WHERE id = ?1", params![id])?;
            Ok(())
        })
        .await
    }
}

fn open_connection(path: &Path) -> StorageResult<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let connection = Connection::open(path)?;
    connection.execute_batch(
        r#"
        PRAGMA journal_mode = WAL;
        PRAGMA foreign_keys = ON;
        PRAGMA synchronous = NORMAL;
        "#,
    )?;
    Ok(connection)
}

fn fetch_todo(connection: &Connection, id: i64) -> StorageResult<Option<Todo>> {
    let mut stmt = connection.prepare(
        "SELECT id, todo, priority, status, category, due_date FROM todo WHERE id = ?1",
    )?;
    let mut rows = stmt.query(params![id])?;
    match rows.next()? {
        Some(row) => Ok(Some(todo_from_row(row)?)),
        None => Ok(None),
    }
}

/// Select the filter predicate for the list query. Branches are checked in
/// fixed order and are mutually exclusive; the first present combination
/// wins. The category branches ignore `search_q`.
fn build_list_where_clause(filter: &ListFilter, params_vec: &mut Vec<String>) -> String {
    let mut conditions = Vec::new();

    if filter.priority.is_some() && filter.status.is_some() {
        push_search(&mut conditions, params_vec, &filter.search_q);
        push_equals(&mut conditions, params_vec, "status", filter.status.clone());
        push_equals(&mut conditions, params_vec, "priority", filter.priority.clone());
    } else if filter.priority.is_some() {
        push_search(&mut conditions, params_vec, &filter.search_q);
        push_equals(&mut conditions, params_vec, "priority", filter.priority.clone());
    } else if filter.status.is_some() {
        push_search(&mut conditions, params_vec, &filter.search_q);
        push_equals(&mut conditions, params_vec, "status", filter.status.clone());
    } else if filter.category.is_some() && filter.status.is_some() {
        push_equals(&mut conditions, params_vec, "category", filter.category.clone());
        push_equals(&mut conditions, params_vec, "status", filter.status.clone());
    } else if filter.category.is_some() {
        push_equals(&mut conditions, params_vec, "category", filter.category.clone());
    } else {
        push_search(&mut conditions, params_vec, &filter.search_q);
    }

    conditions.join(" AND ")
}

fn push_search(conditions: &mut Vec<String>, params_vec: &mut Vec<String>, search_q: &str) {
    conditions.push("todo LIKE '%' || ? || '%'".to_string());
    params_vec.push(search_q.to_string());
}

fn push_equals(
    conditions: &mut Vec<String>,
    params_vec: &mut Vec<String>,
    column: &str,
    value: Option<String>,
) {
    if let Some(value) = value {
        conditions.push(format!("{} = ?", column));
        params_vec.push(value);
    }
}

fn format_due_date(due_date: NaiveDate) -> String {
    due_date.format("%Y-%m-%d").to_string()
}

fn todo_from_row(row: &rusqlite::Row<'_>) -> StorageResult<Todo> {
    let priority_raw: String = row.get(2)?;
    let status_raw: String = row.get(3)?;
    let category_raw: String = row.get(4)?;
    let due_date_raw: String = row.get(5)?;

    let priority = Priority::parse(&priority_raw).ok_or_else(|| {
        StorageError::InvalidData(format!("unknown todo priority: {}", priority_raw))
    })?;
    let status = Status::parse(&status_raw)
        .ok_or_else(|| StorageError::InvalidData(format!("unknown todo status: {}", status_raw)))?;
    let category = Category::parse(&category_raw).ok_or_else(|| {
        StorageError::InvalidData(format!("unknown todo category: {}", category_raw))
    })?;
    let due_date = NaiveDate::parse_from_str(&due_date_raw, "%Y-%m-%d")?;

    Ok(Todo {
        id: row.get(0)?,
        todo: row.get(1)?,
        priority,
        status,
        category,
        due_date,
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use tempfile::tempdir;

    use super::{SqliteTodoStorage, TodoStorage};
    use crate::types::{Category, ListFilter, Priority, Status, Todo, TodoPatch};

    fn sample_todo(id: i64, text: &str) -> Todo {
        Todo {
            id,
            todo: text.to_string(),
            priority: Priority::High,
            status: Status::ToDo,
            category: Category::Work,
            due_date: NaiveDate::from_ymd_opt(2021, 1, 15).expect("valid date"),
        }
    }

    async fn storage_with_fixtures(dir: &tempfile::TempDir) -> SqliteTodoStorage {
        let storage = SqliteTodoStorage::new(dir.path().join("todo.db"));
        storage.init().await.expect("init storage");

        let fixtures = [
            Todo {
                id: 1,
                todo: "buy milk".to_string(),
                priority: Priority::High,
                status: Status::ToDo,
                category: Category::Home,
                due_date: NaiveDate::from_ymd_opt(2021, 1, 15).expect("valid date"),
            },
            Todo {
                id: 2,
                todo: "finish report".to_string(),
                priority: Priority::High,
                status: Status::Done,
                category: Category::Work,
                due_date: NaiveDate::from_ymd_opt(2021, 1, 20).expect("valid date"),
            },
            Todo {
                id: 3,
                todo: "learn rust".to_string(),
                priority: Priority::Medium,
                status: Status::InProgress,
                category: Category::Learning,
                due_date: NaiveDate::from_ymd_opt(2021, 2, 1).expect("valid date"),
            },
        ];
        for todo in fixtures {
            storage.insert(todo).await.expect("insert fixture");
        }

        storage
    }

    #[tokio::test]
    async fn insert_then_fetch_returns_the_same_row() {
        let dir = tempdir().expect("temp dir");
        let storage = SqliteTodoStorage::new(dir.path().join("todo.db"));
        storage.init().await.expect("init storage");

        let todo = sample_todo(42, "write tests");
        storage.insert(todo.clone()).await.expect("insert");

        let fetched = storage.fetch(42).await.expect("fetch");
        assert_eq!(fetched, Some(todo));
    }

    #[tokio::test]
    async fn fetch_of_absent_id_returns_none() {
        let dir = tempdir().expect("temp dir");
        let storage = SqliteTodoStorage::new(dir.path().join("todo.db"));
        storage.init().await.expect("init storage");

        assert_eq!(storage.fetch(999).await.expect("fetch"), None);
    }

    #[tokio::test]
    async fn duplicate_id_insert_fails_at_the_storage_layer() {
        let dir = tempdir().expect("temp dir");
        let storage = SqliteTodoStorage::new(dir.path().join("todo.db"));
        storage.init().await.expect("init storage");

        storage.insert(sample_todo(1, "first")).await.expect("insert");
        let result = storage.insert(sample_todo(1, "second")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn list_with_priority_and_status_also_applies_search() {
        let dir = tempdir().expect("temp dir");
        let storage = storage_with_fixtures(&dir).await;

        let todos = storage
            .list(ListFilter {
                search_q: "report".to_string(),
                priority: Some("HIGH".to_string()),
                status: Some("DONE".to_string()),
                category: None,
            })
            .await
            .expect("list");
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].id, 2);

        let todos = storage
            .list(ListFilter {
                search_q: "milk".to_string(),
                priority: Some("HIGH".to_string()),
                status: Some("DONE".to_string()),
                category: None,
            })
            .await
            .expect("list");
        assert!(todos.is_empty());
    }

    #[tokio::test]
    async fn list_with_priority_alone_matches_search_and_priority() {
        let dir = tempdir().expect("temp dir");
        let storage = storage_with_fixtures(&dir).await;

        let todos = storage
            .list(ListFilter {
                search_q: String::new(),
                priority: Some("HIGH".to_string()),
                status: None,
                category: None,
            })
            .await
            .expect("list");
        let ids: Vec<i64> = todos.iter().map(|todo| todo.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn list_with_status_alone_matches_search_and_status() {
        let dir = tempdir().expect("temp dir");
        let storage = storage_with_fixtures(&dir).await;

        let todos = storage
            .list(ListFilter {
                search_q: String::new(),
                priority: None,
                status: Some("IN PROGRESS".to_string()),
                category: None,
            })
            .await
            .expect("list");
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].id, 3);
    }

    #[tokio::test]
    async fn status_branch_shadows_the_category_and_status_branch() {
        let dir = tempdir().expect("temp dir");
        let storage = storage_with_fixtures(&dir).await;

        // With both category and status present the status branch is chosen
        // first, so the category condition does not participate.
        let todos = storage
            .list(ListFilter {
                search_q: String::new(),
                priority: None,
                status: Some("DONE".to_string()),
                category: Some("HOME".to_string()),
            })
            .await
            .expect("list");
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].category, Category::Work);
    }

    #[tokio::test]
    async fn list_with_category_alone_ignores_search() {
        let dir = tempdir().expect("temp dir");
        let storage = storage_with_fixtures(&dir).await;

        let todos = storage
            .list(ListFilter {
                search_q: "no such text".to_string(),
                priority: None,
                status: None,
                category: Some("WORK".to_string()),
            })
            .await
            .expect("list");
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].id, 2);
    }

    #[tokio::test]
    async fn list_with_no_filters_searches_description_only() {
        let dir = tempdir().expect("temp dir");
        let storage = storage_with_fixtures(&dir).await;

        let todos = storage
            .list(ListFilter {
                search_q: "milk".to_string(),
                ..ListFilter::default()
            })
            .await
            .expect("list");
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].id, 1);

        let all = storage.list(ListFilter::default()).await.expect("list");
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn unmatched_filter_value_returns_no_rows() {
        let dir = tempdir().expect("temp dir");
        let storage = storage_with_fixtures(&dir).await;

        // A raw value outside the enum domain is a legal equality condition
        // that simply matches nothing.
        let todos = storage
            .list(ListFilter {
                search_q: String::new(),
                priority: Some("URGENT".to_string()),
                status: None,
                category: None,
            })
            .await
            .expect("list");
        assert!(todos.is_empty());
    }

    #[tokio::test]
    async fn agenda_returns_rows_due_on_the_given_date() {
        let dir = tempdir().expect("temp dir");
        let storage = storage_with_fixtures(&dir).await;

        let due = NaiveDate::from_ymd_opt(2021, 1, 15).expect("valid date");
        let todos = storage.agenda(due).await.expect("agenda");
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].id, 1);

        let empty = storage
            .agenda(NaiveDate::from_ymd_opt(1999, 1, 1).expect("valid date"))
            .await
            .expect("agenda");
        assert!(empty.is_empty());
    }

    #[tokio::test]
    async fn update_merges_patch_over_previous_row() {
        let dir = tempdir().expect("temp dir");
        let storage = storage_with_fixtures(&dir).await;

        let merged = storage
            .update(
                1,
                TodoPatch {
                    status: Some(Status::Done),
                    ..TodoPatch::default()
                },
            )
            .await
            .expect("update")
            .expect("row exists");

        assert_eq!(merged.status, Status::Done);
        assert_eq!(merged.todo, "buy milk");
        assert_eq!(merged.priority, Priority::High);
        assert_eq!(merged.category, Category::Home);
        assert_eq!(
            merged.due_date,
            NaiveDate::from_ymd_opt(2021, 1, 15).expect("valid date")
        );

        let stored = storage.fetch(1).await.expect("fetch").expect("row exists");
        assert_eq!(stored, merged);
    }

    #[tokio::test]
    async fn update_of_absent_id_returns_none() {
        let dir = tempdir().expect("temp dir");
        let storage = SqliteTodoStorage::new(dir.path().join("todo.db"));
        storage.init().await.expect("init storage");

        let result = storage
            .update(
                404,
                TodoPatch {
                    todo: Some("ghost".to_string()),
                    ..TodoPatch::default()
                },
            )
            .await
            .expect("update");
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn empty_patch_rewrites_the_row_unchanged() {
        let dir = tempdir().expect("temp dir");
        let storage = storage_with_fixtures(&dir).await;

        let before = storage.fetch(2).await.expect("fetch").expect("row exists");
        let merged = storage
            .update(2, TodoPatch::default())
            .await
            .expect("update")
            .expect("row exists");
        assert_eq!(merged, before);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let dir = tempdir().expect("temp dir");
        let storage = storage_with_fixtures(&dir).await;

        storage.delete(1).await.expect("delete existing");
        assert_eq!(storage.fetch(1).await.expect("fetch"), None);

        storage.delete(1).await.expect("delete absent");
        let remaining = storage.list(ListFilter::default()).await.expect("list");
        assert_eq!(remaining.len(), 2);
    }
}
