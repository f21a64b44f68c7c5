pub mod task;
pub mod user;

pub use task::{Category, Task, TaskInput, TaskPatch, TaskQuery};
pub use user::{User, UserProfile};
