//! Drives `TaskApi` against an in-process HTTP backend that mimics the
//! real task service: same routes, same JSON shapes, same error bodies.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};

use tasks_core::{ApiError, NewTask, TaskApi, TaskPatch, TaskStore};

#[derive(Default)]
struct Backend {
    tasks: Mutex<Vec<Value>>,
    next_id: Mutex<i64>,
}

async fn list(State(backend): State<Arc<Backend>>) -> Json<Value> {
    Json(Value::Array(backend.tasks.lock().unwrap().clone()))
}

async fn create(State(backend): State<Arc<Backend>>, Json(body): Json<Value>) -> Response {
    let id = {
        let mut next = backend.next_id.lock().unwrap();
        *next += 1;
        *next
    };
    let task = json!({
        "id": id,
        "title": body["title"],
        "completed": body["completed"],
        "createdAt": "2024-01-01T00:00:00Z",
    });
    backend.tasks.lock().unwrap().push(task.clone());
    (StatusCode::CREATED, Json(task)).into_response()
}

async fn update(
    Path(id): Path<i64>,
    State(backend): State<Arc<Backend>>,
    Json(body): Json<Value>,
) -> Response {
    let mut tasks = backend.tasks.lock().unwrap();
    match tasks.iter_mut().find(|t| t["id"].as_i64() == Some(id)) {
        Some(task) => {
            if let Some(title) = body.get("title") {
                task["title"] = title.clone();
            }
            if let Some(completed) = body.get("completed") {
                task["completed"] = completed.clone();
            }
            (StatusCode::OK, Json(task.clone())).into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Tarea no encontrada" })),
        )
            .into_response(),
    }
}

async fn remove(Path(id): Path<i64>, State(backend): State<Arc<Backend>>) -> StatusCode {
    let mut tasks = backend.tasks.lock().unwrap();
    let before = tasks.len();
    tasks.retain(|t| t["id"].as_i64() != Some(id));
    if tasks.len() < before {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

/// Binds the mock backend on an ephemeral port and returns a client
/// pointed at it.
async fn spawn_backend() -> TaskApi {
    let state = Arc::new(Backend::default());
    let router = Router::new()
        .route("/tasks", get(list).post(create))
        .route("/tasks/{id}", put(update).delete(remove))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    TaskApi::new(format!("http://{addr}/tasks")).unwrap()
}

#[tokio::test]
async fn create_then_list_round_trip() {
    let api = spawn_backend().await;

    let created = api
        .create_task(&NewTask {
            title: "Buy milk".to_string(),
            completed: false,
        })
        .await
        .unwrap();
    assert_eq!(created.id, 1);
    assert_eq!(created.title, "Buy milk");
    assert!(!created.completed);

    let tasks = api.get_tasks().await.unwrap();
    assert_eq!(tasks, vec![created]);
}

#[tokio::test]
async fn update_touches_only_sent_fields() {
    let api = spawn_backend().await;

    let created = api
        .create_task(&NewTask {
            title: "Buy milk".to_string(),
            completed: false,
        })
        .await
        .unwrap();

    let updated = api
        .update_task(
            created.id,
            &TaskPatch {
                completed: Some(true),
                ..TaskPatch::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.title, "Buy milk");
    assert!(updated.completed);
}

#[tokio::test]
async fn delete_empties_the_collection() {
    let api = spawn_backend().await;

    let created = api
        .create_task(&NewTask {
            title: "Buy milk".to_string(),
            completed: false,
        })
        .await
        .unwrap();
    api.delete_task(created.id).await.unwrap();

    assert!(api.get_tasks().await.unwrap().is_empty());
}

#[tokio::test]
async fn server_error_body_is_normalized() {
    let api = spawn_backend().await;

    let err = api
        .update_task(999, &TaskPatch::default())
        .await
        .unwrap_err();

    match &err {
        ApiError::Server { status, message } => {
            assert_eq!(*status, 404);
            assert_eq!(message, "Tarea no encontrada");
        }
        other => panic!("expected server error, got {other:?}"),
    }
    assert_eq!(
        err.to_string(),
        "Código de error: 404, mensaje: Tarea no encontrada"
    );
}

#[tokio::test]
async fn transport_failure_is_normalized() {
    // Nothing listens on port 1.
    let api = TaskApi::new("http://127.0.0.1:1/tasks").unwrap();

    let err = api.get_tasks().await.unwrap_err();

    assert!(matches!(err, ApiError::Transport(_)));
    assert!(err.to_string().starts_with("Error: "));
}
