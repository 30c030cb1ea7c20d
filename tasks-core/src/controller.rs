//! The task-list state machine: form draft, loading flag, transient
//! banner, and the delete confirmation step. Every successful mutation
//! reloads the full collection from the store so the server stays the
//! single source of truth; nothing is patched locally.

use tokio::time::{Duration, Instant};
use tracing::warn;

use crate::api::TaskStore;
use crate::models::{Task, TaskDraft, TaskPatch};

/// How long a success/error banner stays on screen.
pub const BANNER_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Error,
}

/// Transient user-facing message. Setting a new one replaces the previous;
/// [`App::tick`] drops it once the display window has passed.
#[derive(Debug, Clone)]
pub struct Banner {
    pub kind: BannerKind,
    pub text: String,
    expires_at: Instant,
}

impl Banner {
    fn new(kind: BannerKind, text: String) -> Self {
        Banner {
            kind,
            text,
            expires_at: Instant::now() + BANNER_TTL,
        }
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

pub struct App<S> {
    store: S,
    pub tasks: Vec<Task>,
    pub draft: TaskDraft,
    pub editing_task_id: Option<i64>,
    pub loading: bool,
    pub banner: Option<Banner>,
    pub pending_delete: Option<Task>,
}

impl<S: TaskStore> App<S> {
    pub fn new(store: S) -> Self {
        App {
            store,
            tasks: vec![],
            draft: TaskDraft::default(),
            editing_task_id: None,
            loading: false,
            banner: None,
            pending_delete: None,
        }
    }

    pub async fn load_tasks(&mut self) {
        self.loading = true;
        match self.store.get_tasks().await {
            Ok(tasks) => {
                self.tasks = tasks;
                self.loading = false;
            }
            Err(err) => {
                self.error(format!("Error al cargar tareas: {err}"));
                self.loading = false;
            }
        }
    }

    /// Create or update depending on the edit target. Does nothing when the
    /// draft has a blank title. Returns whether the write went through; on
    /// failure the draft and edit target are kept so the user's input
    /// survives.
    pub async fn submit(&mut self) -> bool {
        if !self.draft.is_valid() {
            return false;
        }
        self.loading = true;
        let result = match self.editing_task_id {
            Some(id) => self
                .store
                .update_task(id, &self.draft.as_patch())
                .await
                .map(|_| "Tarea actualizada correctamente")
                .map_err(|err| format!("Error al actualizar tarea: {err}")),
            None => self
                .store
                .create_task(&self.draft.as_new_task())
                .await
                .map(|_| "Tarea creada correctamente")
                .map_err(|err| format!("Error al crear tarea: {err}")),
        };
        match result {
            Ok(msg) => {
                self.success(msg.to_string());
                self.load_tasks().await;
                self.reset_form();
                true
            }
            Err(msg) => {
                self.error(msg);
                self.loading = false;
                false
            }
        }
    }

    /// Copy a task into the draft and switch the form to update mode.
    pub fn start_edit(&mut self, task: Task) {
        self.draft = TaskDraft {
            title: task.title.clone(),
            completed: task.completed,
        };
        self.editing_task_id = Some(task.id);
    }

    /// Flip the completion flag on the server, sending only that field.
    pub async fn toggle_complete(&mut self, task: Task) {
        self.loading = true;
        let patch = TaskPatch {
            completed: Some(!task.completed),
            ..TaskPatch::default()
        };
        match self.store.update_task(task.id, &patch).await {
            Ok(_) => {
                let msg = if task.completed {
                    "Tarea marcada como pendiente"
                } else {
                    "Tarea completada"
                };
                self.success(msg.to_string());
                self.load_tasks().await;
            }
            Err(err) => {
                self.error(format!("Error al actualizar tarea: {err}"));
                self.loading = false;
            }
        }
    }

    /// Remember which task the user asked to delete. Nothing goes out until
    /// [`App::confirm_delete`].
    pub fn request_delete(&mut self, task: Task) {
        self.pending_delete = Some(task);
    }

    pub async fn confirm_delete(&mut self) {
        let Some(task) = self.pending_delete.take() else {
            return;
        };
        self.loading = true;
        match self.store.delete_task(task.id).await {
            Ok(()) => {
                self.success("Tarea eliminada correctamente".to_string());
                self.load_tasks().await;
            }
            Err(err) => {
                self.error(format!("Error al eliminar tarea: {err}"));
                self.loading = false;
            }
        }
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    pub fn reset_form(&mut self) {
        self.draft = TaskDraft::default();
        self.editing_task_id = None;
        self.loading = false;
    }

    pub fn cancel_edit(&mut self) {
        self.reset_form();
    }

    /// Drop the banner once its display window has passed. Called from the
    /// UI loop on every poll tick.
    pub fn tick(&mut self) {
        if self.banner.as_ref().is_some_and(Banner::is_expired) {
            self.banner = None;
        }
    }

    fn success(&mut self, text: String) {
        self.banner = Some(Banner::new(BannerKind::Success, text));
    }

    fn error(&mut self, text: String) {
        warn!("{text}");
        self.banner = Some(Banner::new(BannerKind::Error, text));
    }
}
