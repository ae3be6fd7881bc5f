use actix_web::http::StatusCode;
use taskboard::models::TaskStatus;
use uuid::Uuid;

use crate::common::*;

#[tokio::test]
async fn test_create_task_starts_pending() {
    let state = create_test_state();
    let app = test_service!(state);

    let task = create_task_ok(&app, &task_json("Buy milk", "2% milk")).await;

    assert_eq!(task.title, "Buy milk");
    assert_eq!(task.description, "2% milk");
    assert_eq!(task.status, TaskStatus::Pending);
    assert_eq!(task.created_at, task.updated_at);

    let listed = list_tasks_ok(&app).await;
    assert_eq!(listed[0].id, task.id);
}

#[tokio::test]
async fn test_create_ignores_client_status() {
    let state = create_test_state();
    let app = test_service!(state);

    let body = serde_json::json!({
        "title": "Sneaky",
        "description": "Tries to start completed",
        "status": "Completed"
    });
    let task = create_task_ok(&app, &body).await;
    assert_eq!(task.status, TaskStatus::Pending);
}

#[tokio::test]
async fn test_list_empty() {
    let state = create_test_state();
    let app = test_service!(state);

    assert!(list_tasks_ok(&app).await.is_empty());
}

#[tokio::test]
async fn test_list_newest_first() {
    let state = create_test_state();
    let app = test_service!(state);

    let mut created = Vec::new();
    for i in 0..10 {
        let task = create_task_ok(&app, &task_json(&format!("Task {}", i), "Some description")).await;
        created.push(task.id);
    }

    let listed: Vec<Uuid> = list_tasks_ok(&app).await.into_iter().map(|t| t.id).collect();
    created.reverse();
    assert_eq!(listed, created);
}

#[tokio::test]
async fn test_show_round_trip() {
    let state = create_test_state();
    let app = test_service!(state);

    let created = create_task_ok(&app, &task_json("Write report", "Quarterly numbers")).await;
    let found = show_task_ok(&app, created.id).await;

    assert_eq!(found, created);
}

#[tokio::test]
async fn test_show_missing_task() {
    let state = create_test_state();
    let app = test_service!(state);

    let req = actix_web::test::TestRequest::get()
        .uri(&format!("/task/show-task/{}", Uuid::new_v4()))
        .to_request();
    let (status, body) = call_envelope::<_, _, serde_json::Value>(&app, req).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(!body.status);
    assert_eq!(body.message, "Task not found");
    assert!(body.task_data.is_none());
}

#[tokio::test]
async fn test_show_malformed_id_is_not_found() {
    let state = create_test_state();
    let app = test_service!(state);

    let req = actix_web::test::TestRequest::get()
        .uri("/task/show-task/not-a-uuid")
        .to_request();
    let (status, body) = call_envelope::<_, _, serde_json::Value>(&app, req).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(!body.status);
}

#[tokio::test]
async fn test_update_status_only() {
    let state = create_test_state();
    let app = test_service!(state);

    let created = create_task_ok(&app, &task_json("Deploy", "Roll out v2")).await;
    let (status, body) = update_task(&app, created.id, &status_json("Completed")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.message, "Task updated successfully");
    let updated = body.task_data.unwrap();
    assert_eq!(updated.status, TaskStatus::Completed);
    assert_eq!(updated.title, created.title);
    assert_eq!(updated.description, created.description);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);

    assert_eq!(show_task_ok(&app, created.id).await, updated);
}

#[tokio::test]
async fn test_update_text_fields() {
    let state = create_test_state();
    let app = test_service!(state);

    let created = create_task_ok(&app, &task_json("Draft", "First pass")).await;
    let body = serde_json::json!({"title": "Final", "description": "Second pass"});
    let (status, envelope) = update_task(&app, created.id, &body).await;

    assert_eq!(status, StatusCode::OK);
    let updated = envelope.task_data.unwrap();
    assert_eq!(updated.title, "Final");
    assert_eq!(updated.description, "Second pass");
    assert_eq!(updated.status, TaskStatus::Pending);
}

#[tokio::test]
async fn test_update_missing_task() {
    let state = create_test_state();
    let app = test_service!(state);

    let (status, body) = update_task(&app, Uuid::new_v4(), &status_json("Running")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body.message, "Task not found");
}

#[tokio::test]
async fn test_delete_then_show() {
    let state = create_test_state();
    let app = test_service!(state);

    let keep = create_task_ok(&app, &task_json("Keep", "Stays around")).await;
    let victim = create_task_ok(&app, &task_json("Drop", "Goes away")).await;

    let (status, body) = delete_task(&app, victim.id).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.status);
    assert_eq!(body.message, "Task deleted successfully");

    let req = actix_web::test::TestRequest::get()
        .uri(&format!("/task/show-task/{}", victim.id))
        .to_request();
    let resp = actix_web::test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let remaining: Vec<Uuid> = list_tasks_ok(&app).await.into_iter().map(|t| t.id).collect();
    assert_eq!(remaining, vec![keep.id]);

    let (status, _) = delete_task(&app, victim.id).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
