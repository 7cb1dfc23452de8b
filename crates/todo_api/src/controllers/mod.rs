pub mod agenda_controller;
pub mod todo_controller;
