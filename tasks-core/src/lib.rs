//! Client-side core for the tasks REST backend: wire types, the HTTP
//! service, and the task-list controller. Terminal rendering lives in the
//! `tasks-tui` crate.

pub mod api;
pub mod config;
pub mod controller;
pub mod models;

pub use api::{ApiError, TaskApi, TaskStore};
pub use config::Config;
pub use controller::{App, Banner, BannerKind, BANNER_TTL};
pub use models::{NewTask, Task, TaskDraft, TaskPatch};
