//! In-memory task store.
//!
//! Every mutation reports its business event to `ServerMetrics` and recomputes
//! the `active_tasks` gauge from a full scan while the write lock is still
//! held, so concurrent mutations cannot publish a stale count last.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::obs::metrics::ServerMetrics;
use crate::tasks::model::{Task, UpdateTask};

pub struct TaskStore {
    tasks: RwLock<Vec<Task>>,
    metrics: Arc<ServerMetrics>,
}

impl TaskStore {
    pub fn new(metrics: Arc<ServerMetrics>) -> Self {
        Self {
            tasks: RwLock::new(Vec::new()),
            metrics,
        }
    }

    /// Snapshot in insertion order.
    pub async fn list(&self) -> Vec<Task> {
        self.tasks.read().await.clone()
    }

    pub async fn contains(&self, id: Uuid) -> bool {
        self.tasks.read().await.iter().any(|t| t.id == id)
    }

    pub async fn active_count(&self) -> usize {
        count_active(&self.tasks.read().await)
    }

    pub async fn create(&self, title: String, description: String) -> Task {
        let task = Task::new(title, description);
        let mut tasks = self.tasks.write().await;
        tasks.push(task.clone());

        self.metrics.on_task_created();
        self.metrics.recompute_active_gauge(count_active(&tasks));
        drop(tasks);

        info!(
            taskId = %task.id,
            title = %task.title,
            businessEvent = "task_created",
            "Task created"
        );
        task
    }

    /// Apply a partial update. `None` when the id is unknown.
    pub async fn update(&self, id: Uuid, patch: UpdateTask) -> Option<Task> {
        let mut tasks = self.tasks.write().await;
        let task = tasks.iter_mut().find(|t| t.id == id)?;

        let was_completed = task.completed;
        if let Some(title) = patch.title {
            task.title = title;
        }
        if let Some(description) = patch.description {
            task.description = description;
        }
        if let Some(completed) = patch.completed {
            task.completed = completed;
        }
        task.updated_at = Some(Utc::now());
        let updated = task.clone();

        self.metrics
            .on_task_status_changed(was_completed, updated.completed);
        self.metrics.recompute_active_gauge(count_active(&tasks));
        drop(tasks);

        if was_completed != updated.completed {
            let event = if updated.completed {
                "task_completed"
            } else {
                "task_reopened"
            };
            info!(
                taskId = %id,
                businessEvent = event,
                completed = updated.completed,
                "Task status changed"
            );
        }
        Some(updated)
    }

    /// Remove a task. `None` when the id is unknown.
    pub async fn delete(&self, id: Uuid) -> Option<Task> {
        let mut tasks = self.tasks.write().await;
        let idx = tasks.iter().position(|t| t.id == id)?;
        let removed = tasks.remove(idx);

        self.metrics.on_task_deleted();
        self.metrics.recompute_active_gauge(count_active(&tasks));
        drop(tasks);

        info!(taskId = %id, businessEvent = "task_deleted", "Task deleted");
        Some(removed)
    }
}

fn count_active(tasks: &[Task]) -> usize {
    tasks.iter().filter(|t| t.is_active()).count()
}
