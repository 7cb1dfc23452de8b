//! Request and response shapes for the todo endpoints. The stored column
//! `due_date` is exposed as `dueDate` on every read path.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use todo_core::{Category, Priority, Status, Todo};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoDto {
    pub id: i64,
    pub todo: String,
    pub priority: Priority,
    pub status: Status,
    pub category: Category,
    #[serde(rename = "dueDate")]
    pub due_date: NaiveDate,
}

impl From<Todo> for TodoDto {
    fn from(todo: Todo) -> Self {
        TodoDto {
            id: todo.id,
            todo: todo.todo,
            priority: todo.priority,
            status: todo.status,
            category: todo.category,
            due_date: todo.due_date,
        }
    }
}

/// Query parameters for `GET /todos`. The enum-like fields arrive raw and
/// are validated before any query runs.
#[derive(Debug, Deserialize)]
pub struct ListTodosQuery {
    pub search_q: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub category: Option<String>,
    pub date: Option<String>,
}

/// Query parameters for `GET /agenda`. Only `date` drives the lookup, but
/// the other fields participate in read-side validation.
#[derive(Debug, Deserialize)]
pub struct AgendaQuery {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub category: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    pub id: i64,
    pub todo: String,
    pub priority: String,
    pub status: String,
    pub category: String,
    #[serde(rename = "dueDate")]
    pub due_date: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateTodoRequest {
    pub todo: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "dueDate")]
    pub due_date: Option<String>,
}
