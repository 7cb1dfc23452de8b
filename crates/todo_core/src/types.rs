use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Input formats accepted for due dates. Whatever parses is normalized to
/// ISO `yyyy-MM-dd` before it reaches storage.
const DUE_DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Parse a due-date string in any accepted format.
pub fn parse_due_date(value: &str) -> Option<NaiveDate> {
    DUE_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value.trim(), format).ok())
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "HIGH" => Some(Self::High),
            "MEDIUM" => Some(Self::Medium),
            "LOW" => Some(Self::Low),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Status {
    #[serde(rename = "TO DO")]
    ToDo,
    #[serde(rename = "IN PROGRESS")]
    InProgress,
    #[serde(rename = "DONE")]
    Done,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ToDo => "TO DO",
            Self::InProgress => "IN PROGRESS",
            Self::Done => "DONE",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "TO DO" => Some(Self::ToDo),
            "IN PROGRESS" => Some(Self::InProgress),
            "DONE" => Some(Self::Done),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    Work,
    Home,
    Learning,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Work => "WORK",
            Self::Home => "HOME",
            Self::Learning => "LEARNING",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "WORK" => Some(Self::Work),
            "HOME" => Some(Self::Home),
            "LEARNING" => Some(Self::Learning),
            _ => None,
        }
    }
}

/// A stored todo row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: i64,
    pub todo: String,
    pub priority: Priority,
    pub status: Status,
    pub category: Category,
    pub due_date: NaiveDate,
}

/// Filter for the list operation. The enum-like fields stay raw strings:
/// a value that slipped past read-side validation still participates in the
/// query as an equality condition and simply matches nothing.
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    pub search_q: String,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub category: Option<String>,
}

/// A partial update. Absent fields keep their stored values.
#[derive(Debug, Clone, Default)]
pub struct TodoPatch {
    pub todo: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
    pub category: Option<Category>,
    pub due_date: Option<NaiveDate>,
}

impl TodoPatch {
    /// Label for the field reported back as updated. First supplied field
    /// wins, checked as status, priority, todo, category, due date.
    pub fn updated_field(&self) -> Option<&'static str> {
        if self.status.is_some() {
            Some("Status")
        } else if self.priority.is_some() {
            Some("Priority")
        } else if self.todo.is_some() {
            Some("Todo")
        } else if self.category.is_some() {
            Some("Category")
        } else if self.due_date.is_some() {
            Some("Due Date")
        } else {
            None
        }
    }

    /// Merge this patch over a stored row.
    pub fn apply(&self, previous: Todo) -> Todo {
        Todo {
            id: previous.id,
            todo: self.todo.clone().unwrap_or(previous.todo),
            priority: self.priority.unwrap_or(previous.priority),
            status: self.status.unwrap_or(previous.status),
            category: self.category.unwrap_or(previous.category),
            due_date: self.due_date.unwrap_or(previous.due_date),
        }
    }
}
