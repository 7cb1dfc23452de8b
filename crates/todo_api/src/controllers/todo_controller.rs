use actix_web::{delete, get, post, put, web, HttpResponse};
use todo_core::{ListFilter, Todo, TodoPatch};

use crate::dto::{CreateTodoRequest, ListTodosQuery, TodoDto, UpdateTodoRequest};
use crate::error::AppError;
use crate::server::AppState;
use crate::validate;

#[get("/todos")]
async fn list_todos(
    app_state: web::Data<AppState>,
    query: web::Query<ListTodosQuery>,
) -> Result<HttpResponse, AppError> {
    validate::validate_read_query(
        query.status.as_deref(),
        query.priority.as_deref(),
        query.category.as_deref(),
        query.date.as_deref(),
    )?;

    let filter = ListFilter {
        search_q: query.search_q.clone().unwrap_or_default(),
        priority: query.priority.clone(),
        status: query.status.clone(),
        category: query.category.clone(),
    };

    let todos = app_state.storage.list(filter).await?;
    let body: Vec<TodoDto> = todos.into_iter().map(TodoDto::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

#[get("/todos/{id}")]
async fn get_todo(
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let todo = app_state
        .storage
        .fetch(id)
        .await?
        .ok_or(AppError::TodoNotFound)?;
    Ok(HttpResponse::Ok().json(TodoDto::from(todo)))
}

#[post("/todos")]
async fn create_todo(
    app_state: web::Data<AppState>,
    payload: web::Json<CreateTodoRequest>,
) -> Result<HttpResponse, AppError> {
    let body = payload.into_inner();
    let status = validate::parse_status(&body.status)?;
    let priority = validate::parse_priority(&body.priority)?;
    let category = validate::parse_category(&body.category)?;
    let due_date = validate::parse_due_date_value(&body.due_date)?;

    app_state
        .storage
        .insert(Todo {
            id: body.id,
            todo: body.todo,
            priority,
            status,
            category,
            due_date,
        })
        .await?;

    Ok(HttpResponse::Ok().body("Todo Successfully Added"))
}

#[put("/todos/{id}")]
async fn update_todo(
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
    payload: web::Json<UpdateTodoRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let body = payload.into_inner();

    let status = validate::parse_status_field(body.status.as_deref())?;
    let priority = validate::parse_priority_field(body.priority.as_deref())?;
    let category = validate::parse_category_field(body.category.as_deref())?;
    let due_date = validate::parse_due_date_field(body.due_date.as_deref())?;

    let patch = TodoPatch {
        todo: body.todo,
        priority,
        status,
        category,
        due_date,
    };
    let updated_field = patch.updated_field();

    app_state
        .storage
        .update(id, patch)
        .await?
        .ok_or(AppError::TodoNotFound)?;

    let message = match updated_field {
        Some(field) => format!("{field} Updated"),
        None => "Updated".to_string(),
    };
    Ok(HttpResponse::Ok().body(message))
}

#[delete("/todos/{id}")]
async fn delete_todo(
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    app_state.storage.delete(id).await?;
    Ok(HttpResponse::Ok().body("Todo Deleted"))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(list_todos)
        .service(get_todo)
        .service(create_todo)
        .service(update_todo)
        .service(delete_todo);
}
