use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::{
    dtos::{self, Envelope},
    error::{ApiError, ApiResult},
    metrics,
    models::Task,
    validation,
};

use super::AppState;

#[utoipa::path(
    post,
    path = "/task/create-task",
    summary = "Create a task",
    description = "Create a task from a title (2-100 characters) and a description (3-500 characters). New tasks always start as `Pending`.",
    request_body(content = dtos::NewTaskDto),
    responses(
        (status = 200, description = "Task created", body = Envelope<Task>),
        (status = 400, description = "Validation failed. `errors` holds the first failed rule per field."),
        (status = 500, description = "Store failure"),
    ),
    tag = "tasks"
)]
/// Create a new task
pub async fn create_task(
    state: web::Data<AppState>,
    form: web::Json<dtos::NewTaskDto>,
) -> ApiResult<HttpResponse> {
    let form = form.into_inner();
    if let Err(errors) = validation::validate_new_task(&form) {
        log::warn!("Task creation rejected: {:?}", errors);
        return Err(ApiError::validation(&errors));
    }

    let task = state
        .store
        .create(form.title, form.description)
        .await
        .map_err(|e| ApiError::from_store(e, "create", "Failed to create task"))?;

    metrics::record_task_created();
    log::info!("Created task {}", task.id);
    Ok(HttpResponse::Ok().json(Envelope::success("Task created successfully", task)))
}

#[utoipa::path(
    get,
    path = "/task/get-all-task",
    summary = "List tasks",
    description = "Returns every task, newest first. An empty store yields an empty list.",
    responses(
        (status = 200, description = "All tasks, ordered by creation time descending", body = Envelope<Vec<Task>>),
        (status = 500, description = "Store failure"),
    ),
    tag = "tasks"
)]
/// List all tasks
pub async fn get_all_task(state: web::Data<AppState>) -> ApiResult<HttpResponse> {
    let tasks = state
        .store
        .list()
        .await
        .map_err(|e| ApiError::from_store(e, "list", "Failed to retrieve tasks"))?;

    Ok(HttpResponse::Ok().json(Envelope::success("Tasks retrieved successfully", tasks)))
}

#[utoipa::path(
    get,
    path = "/task/show-task/{task_id}",
    summary = "Get a task",
    params(("task_id" = Uuid, Path, description = "The task id")),
    responses(
        (status = 200, description = "The task", body = Envelope<Task>),
        (status = 404, description = "No task with this id"),
        (status = 500, description = "Store failure"),
    ),
    tag = "tasks"
)]
/// Get a task by ID
pub async fn show_task(
    state: web::Data<AppState>,
    task_id: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let task = state
        .store
        .get(*task_id)
        .await
        .map_err(|e| ApiError::from_store(e, "get", "Failed to retrieve task"))?;

    Ok(HttpResponse::Ok().json(Envelope::success("Task retrieved successfully", task)))
}

#[utoipa::path(
    put,
    path = "/task/update-task/{task_id}",
    summary = "Update a task",
    description = "Replace the provided fields. Omitted fields are left unchanged and `updatedAt` is refreshed.

By default any status can be set from any other. When the server runs with `STATUS_TRANSITIONS=lifecycle`, only Pending -> Running -> Completed and Pending/Running -> Failed are accepted.",
    params(("task_id" = Uuid, Path, description = "The task id")),
    request_body(content = dtos::UpdateTaskDto),
    responses(
        (status = 200, description = "Task updated", body = Envelope<Task>),
        (status = 400, description = "Validation failed (bounds or unknown status)"),
        (status = 404, description = "No task with this id"),
        (status = 409, description = "Status change refused by the transition policy"),
        (status = 500, description = "Store failure"),
    ),
    tag = "tasks"
)]
/// Update a task
pub async fn update_task(
    state: web::Data<AppState>,
    task_id: web::Path<Uuid>,
    form: web::Json<dtos::UpdateTaskDto>,
) -> ApiResult<HttpResponse> {
    let changes = validation::validate_update_task(&form).map_err(|errors| {
        log::warn!("Update of task {} rejected: {:?}", task_id, errors);
        ApiError::validation(&errors)
    })?;

    log::debug!("Update task {}: {:?}", task_id, changes);
    let task = state
        .store
        .update(*task_id, changes)
        .await
        .map_err(|e| ApiError::from_store(e, "update", "Failed to update task"))?;

    log::info!("Updated task {} (status={})", task.id, task.status);
    Ok(HttpResponse::Ok().json(Envelope::success("Task updated successfully", task)))
}

#[utoipa::path(
    delete,
    path = "/task/delete-task/{task_id}",
    summary = "Delete a task",
    description = "Remove a task permanently. Its id is never handed out again.",
    params(("task_id" = Uuid, Path, description = "The task id")),
    responses(
        (status = 200, description = "Task deleted"),
        (status = 404, description = "No task with this id"),
        (status = 500, description = "Store failure"),
    ),
    tag = "tasks"
)]
/// Delete a task
pub async fn delete_task(
    state: web::Data<AppState>,
    task_id: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    state
        .store
        .delete(*task_id)
        .await
        .map_err(|e| ApiError::from_store(e, "delete", "Failed to delete task"))?;

    metrics::record_task_deleted();
    log::info!("Deleted task {}", task_id);
    Ok(HttpResponse::Ok().json(Envelope::done("Task deleted successfully")))
}
