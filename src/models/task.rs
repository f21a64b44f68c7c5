use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Fixed category enumeration for tasks.
/// Corresponds to the `task_category` SQL enum; serialized in PascalCase on the
/// wire (`"Work"`, `"Personal"`, ...).
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "task_category", rename_all = "PascalCase")]
pub enum Category {
    Work,
    Personal,
    Shopping,
    Health,
    Other,
}

impl Default for Category {
    fn default() -> Self {
        Category::Personal
    }
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Work => "Work",
            Category::Personal => "Personal",
            Category::Shopping => "Shopping",
            Category::Health => "Health",
            Category::Other => "Other",
        }
    }

    /// Parses a wire-format category name. Returns `None` for anything outside
    /// the enumeration.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Work" => Some(Category::Work),
            "Personal" => Some(Category::Personal),
            "Shopping" => Some(Category::Shopping),
            "Health" => Some(Category::Health),
            "Other" => Some(Category::Other),
            _ => None,
        }
    }
}

/// Input structure for creating a task.
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TaskInput {
    /// The title of the task. Required, at most 100 characters.
    #[validate(length(min = 1, max = 100))]
    pub title: String,

    /// An optional description, at most 500 characters. Persisted as an empty
    /// string when absent.
    #[validate(length(max = 500))]
    pub description: Option<String>,

    /// Category of the task. Defaults to Personal when absent.
    pub category: Option<Category>,

    /// When the task is due. Required.
    pub due_date: DateTime<Utc>,
}

/// Explicit patch structure for task updates.
///
/// Each field is independently optional and only supplied fields are applied;
/// unknown body fields are never persisted. Changed fields are re-validated
/// against the same constraints as creation.
#[derive(Debug, Serialize, Deserialize, Validate, Default)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[validate(length(min = 1, max = 100))]
    pub title: Option<String>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    pub category: Option<Category>,
    pub due_date: Option<DateTime<Utc>>,
    pub completed: Option<bool>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.due_date.is_none()
            && self.completed.is_none()
    }
}

/// A task entity as stored in the database and returned by the API.
#[derive(Debug, Serialize, Deserialize, Clone, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier for the task (UUID v4).
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub due_date: DateTime<Utc>,
    pub completed: bool,
    /// Identifier of the owning user. Every read and write is scoped by it.
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Query parameters accepted by the task listing endpoint.
#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TaskQuery {
    /// Category selector. `"all"` or absent means no category filtering; an
    /// unknown name matches no task.
    pub category: Option<String>,
    /// Completion-status selector. Absent means no status filtering.
    pub completed: Option<bool>,
    /// Sort selector: `dueDate` (default), `category`, or `created`.
    pub sort_by: Option<String>,
}

impl Task {
    /// Creates a new `Task` from `TaskInput` and the owner's user id, applying
    /// the documented defaults (empty description, Personal category, not
    /// completed) and a fresh UUID.
    pub fn new(input: TaskInput, user_id: i32) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description.unwrap_or_default(),
            category: input.category.unwrap_or_default(),
            due_date: input.due_date,
            completed: false,
            user_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a patch to this task, touching only the supplied fields and
    /// bumping `updated_at`.
    pub fn apply_patch(&mut self, patch: TaskPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        self.updated_at = Utc::now();
    }
}
