//! Task CRUD: model, in-memory store, and HTTP handlers.

pub mod handlers;
pub mod model;
pub mod store;

pub use model::{CreateTask, Task, UpdateTask};
pub use store::TaskStore;
