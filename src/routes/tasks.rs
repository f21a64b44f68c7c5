use crate::{
    auth::AuthenticatedUserId,
    error::AppError,
    models::{Task, TaskInput, TaskPatch, TaskQuery},
    query,
    stats::{self, TaskStats},
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

const TASK_COLUMNS: &str =
    "id, title, description, category, due_date, completed, user_id, created_at, updated_at";

#[derive(Debug, Serialize, Deserialize)]
pub struct TaskListResponse {
    pub success: bool,
    pub tasks: Vec<Task>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TaskResponse {
    pub success: bool,
    pub message: String,
    pub task: Task,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub success: bool,
    pub stats: TaskStats,
}

/// Retrieves the authenticated user's tasks, filtered and sorted.
///
/// ## Query Parameters:
/// - `category` (optional): exact category name, or `all` for no filtering.
/// - `completed` (optional): `true`/`false` completion filter.
/// - `sortBy` (optional): `dueDate` (default), `category`, or `created`.
///
/// The store fetch is scoped to the authenticated owner before the engine runs,
/// so no filter combination can reach another user's tasks.
#[get("")]
pub async fn get_tasks(
    pool: web::Data<PgPool>,
    query_params: web::Query<TaskQuery>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let sql = format!(
        "SELECT {} FROM tasks WHERE user_id = $1 ORDER BY created_at DESC",
        TASK_COLUMNS
    );
    let tasks: Vec<Task> = sqlx::query_as(&sql)
        .bind(user_id.0)
        .fetch_all(&**pool)
        .await?;

    let tasks = query::apply(tasks, &query_params.into_inner());

    Ok(HttpResponse::Ok().json(TaskListResponse {
        success: true,
        tasks,
    }))
}

/// Creates a new task owned by the authenticated user.
///
/// Title and due date are required; description defaults to empty and category
/// to Personal. Responds 201 with the stored task.
#[post("")]
pub async fn create_task(
    pool: web::Data<PgPool>,
    task_data: web::Json<TaskInput>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let task = Task::new(task_data.into_inner(), user_id.0);

    let sql = format!(
        "INSERT INTO tasks (id, title, description, category, due_date, completed, user_id, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
         RETURNING {}",
        TASK_COLUMNS
    );
    let stored: Task = sqlx::query_as(&sql)
        .bind(task.id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.category)
        .bind(task.due_date)
        .bind(task.completed)
        .bind(task.user_id)
        .bind(task.created_at)
        .bind(task.updated_at)
        .fetch_one(&**pool)
        .await?;

    Ok(HttpResponse::Created().json(TaskResponse {
        success: true,
        message: "Task created successfully".into(),
        task: stored,
    }))
}

/// Updates a task the authenticated user owns.
///
/// Accepts an explicit patch of named optional fields; only supplied fields are
/// applied, each re-validated against the creation constraints. A task that
/// does not exist and a task owned by someone else are indistinguishable: both
/// yield 404.
#[put("/{id}")]
pub async fn update_task(
    pool: web::Data<PgPool>,
    task_id: web::Path<Uuid>,
    patch: web::Json<TaskPatch>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    patch.validate()?;

    let task_uuid = task_id.into_inner();

    let sql = format!(
        "SELECT {} FROM tasks WHERE id = $1 AND user_id = $2",
        TASK_COLUMNS
    );
    let task: Option<Task> = sqlx::query_as(&sql)
        .bind(task_uuid)
        .bind(user_id.0)
        .fetch_optional(&**pool)
        .await?;

    let mut task = task.ok_or_else(|| AppError::NotFound("Task not found".into()))?;
    task.apply_patch(patch.into_inner());

    let sql = format!(
        "UPDATE tasks
         SET title = $1, description = $2, category = $3, due_date = $4, completed = $5, updated_at = $6
         WHERE id = $7 AND user_id = $8
         RETURNING {}",
        TASK_COLUMNS
    );
    let updated: Task = sqlx::query_as(&sql)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.category)
        .bind(task.due_date)
        .bind(task.completed)
        .bind(task.updated_at)
        .bind(task_uuid)
        .bind(user_id.0)
        .fetch_one(&**pool)
        .await?;

    Ok(HttpResponse::Ok().json(TaskResponse {
        success: true,
        message: "Task updated successfully".into(),
        task: updated,
    }))
}

/// Deletes a task the authenticated user owns. 404 under the same ownership
/// rule as update.
#[delete("/{id}")]
pub async fn delete_task(
    pool: web::Data<PgPool>,
    task_id: web::Path<Uuid>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
        .bind(task_id.into_inner())
        .bind(user_id.0)
        .execute(&**pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Task not found".into()));
    }

    Ok(HttpResponse::Ok().json(MessageResponse {
        success: true,
        message: "Task deleted successfully".into(),
    }))
}

/// Today's completion statistics for the authenticated user.
///
/// Counts tasks whose due date falls in `[midnight, midnight + 1 day)` UTC.
#[get("/stats")]
pub async fn get_task_stats(
    pool: web::Data<PgPool>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let (start, end) = stats::day_window(Utc::now());

    let sql = format!(
        "SELECT {} FROM tasks WHERE user_id = $1 AND due_date >= $2 AND due_date < $3",
        TASK_COLUMNS
    );
    let todays_tasks: Vec<Task> = sqlx::query_as(&sql)
        .bind(user_id.0)
        .bind(start)
        .bind(end)
        .fetch_all(&**pool)
        .await?;

    Ok(HttpResponse::Ok().json(StatsResponse {
        success: true,
        stats: stats::summarize(&todays_tasks),
    }))
}
