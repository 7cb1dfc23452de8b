pub mod storage;
pub mod types;

pub use storage::{SqliteTodoStorage, StorageError, StorageResult, TodoStorage};
pub use types::{parse_due_date, Category, ListFilter, Priority, Status, Todo, TodoPatch};
