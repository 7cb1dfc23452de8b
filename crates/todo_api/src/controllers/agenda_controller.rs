use actix_web::{get, web, HttpResponse};
use todo_core::parse_due_date;

use crate::dto::{AgendaQuery, TodoDto};
use crate::error::AppError;
use crate::server::AppState;
use crate::validate;

/// Rows due on the supplied date. The input date may arrive in any accepted
/// format and is normalized before the lookup.
#[get("/agenda")]
async fn agenda(
    app_state: web::Data<AppState>,
    query: web::Query<AgendaQuery>,
) -> Result<HttpResponse, AppError> {
    validate::validate_read_query(
        query.status.as_deref(),
        query.priority.as_deref(),
        query.category.as_deref(),
        query.date.as_deref(),
    )?;

    let due_date = query
        .date
        .as_deref()
        .and_then(parse_due_date)
        .ok_or(AppError::InvalidDueDate)?;

    let todos = app_state.storage.agenda(due_date).await?;
    let body: Vec<TodoDto> = todos.into_iter().map(TodoDto::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(agenda);
}
