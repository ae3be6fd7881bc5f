use actix_web::http::StatusCode;
use taskboard::models::TaskStatus;

use crate::common::*;

async fn post_create<S, B>(app: &S, body: &serde_json::Value) -> (StatusCode, taskboard::dtos::Envelope<serde_json::Value>)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse<B>,
            Error = actix_web::Error,
        >,
    B: actix_web::body::MessageBody,
{
    let req = actix_web::test::TestRequest::post()
        .uri("/task/create-task")
        .set_json(body)
        .to_request();
    call_envelope(app, req).await
}

#[tokio::test]
async fn test_create_empty_fields_rejected() {
    let state = create_test_state();
    let app = test_service!(state);
    create_task_ok(&app, &task_json("Existing", "Already here")).await;

    for body in [task_json("", "Valid description"), task_json("Valid title", "")] {
        let (status, envelope) = post_create(&app, &body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!envelope.status);
        assert!(envelope.message.starts_with("Validation failed"));
    }

    assert_eq!(list_tasks_ok(&app).await.len(), 1);
}

#[tokio::test]
async fn test_create_missing_fields_reported_per_field() {
    let state = create_test_state();
    let app = test_service!(state);

    let (status, envelope) = post_create(&app, &serde_json::json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let errors = envelope.errors.expect("field errors");
    assert_eq!(errors["title"], "Title is required");
    assert_eq!(errors["description"], "Description is required");
}

#[tokio::test]
async fn test_title_length_bounds() {
    let state = create_test_state();
    let app = test_service!(state);

    for len in [2, 100] {
        create_task_ok(&app, &task_json(&text_of_len(len), "Valid description")).await;
    }

    let (status, envelope) = post_create(&app, &task_json(&text_of_len(1), "Valid description")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        envelope.errors.unwrap()["title"],
        "Title must be at least 2 characters long"
    );

    let (status, envelope) =
        post_create(&app, &task_json(&text_of_len(101), "Valid description")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        envelope.errors.unwrap()["title"],
        "Title must be at most 100 characters long"
    );
}

#[tokio::test]
async fn test_description_length_bounds() {
    let state = create_test_state();
    let app = test_service!(state);

    for len in [3, 500] {
        create_task_ok(&app, &task_json("Title", &text_of_len(len))).await;
    }

    let (_, envelope) = post_create(&app, &task_json("Title", &text_of_len(2))).await;
    assert_eq!(
        envelope.errors.unwrap()["description"],
        "Description must be at least 3 characters long"
    );

    let (_, envelope) = post_create(&app, &task_json("Title", &text_of_len(501))).await;
    assert_eq!(
        envelope.errors.unwrap()["description"],
        "Description must be at most 500 characters long"
    );
}

#[tokio::test]
async fn test_malformed_json_body() {
    let state = create_test_state();
    let app = test_service!(state);

    let req = actix_web::test::TestRequest::post()
        .uri("/task/create-task")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let (status, envelope) = call_envelope::<_, _, serde_json::Value>(&app, req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!envelope.status);
    assert!(envelope.message.starts_with("Invalid request body"));
}

#[tokio::test]
async fn test_update_unknown_status() {
    let state = create_test_state();
    let app = test_service!(state);
    let task = create_task_ok(&app, &task_json("Deploy", "Roll out v2")).await;

    let (status, envelope) = update_task(&app, task.id, &status_json("Done")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        envelope.errors.unwrap()["status"],
        "Status must be one of Pending, Running, Completed, Failed"
    );
    assert_eq!(show_task_ok(&app, task.id).await.status, TaskStatus::Pending);
}

#[tokio::test]
async fn test_update_short_title_leaves_task_unchanged() {
    let state = create_test_state();
    let app = test_service!(state);
    let task = create_task_ok(&app, &task_json("Deploy", "Roll out v2")).await;

    let body = serde_json::json!({"title": "x", "status": "Running"});
    let (status, _) = update_task(&app, task.id, &body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(show_task_ok(&app, task.id).await, task);
}
