use chrono::Utc;
use portal_server::entity::user;
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::{Value, json};

use crate::common::{TestApp, routes};

fn user_event(kind: &str, id: &str, first_name: &str) -> Value {
    json!({
        "type": kind,
        "data": {
            "id": id,
            "email_addresses": [{ "email_address": format!("{id}@example.com") }],
            "first_name": first_name,
            "last_name": "Doe",
            "image_url": format!("https://img.example.com/{id}.png"),
        },
    })
}

async fn find_user(app: &TestApp, id: &str) -> Option<user::Model> {
    user::Entity::find_by_id(id).one(&app.db).await.unwrap()
}

mod signature {
    use super::*;

    #[tokio::test]
    async fn bad_signature_is_rejected_and_nothing_is_written() {
        let app = TestApp::spawn().await;
        let body = serde_json::to_vec(&user_event("user.created", "user_1", "Jane")).unwrap();

        let res = app
            .send_webhook_raw(
                "msg_1",
                Utc::now().timestamp(),
                "v1,c2lnbmF0dXJlLXRoYXQtZG9lcy1ub3QtbWF0Y2g=",
                body,
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
        assert_eq!(user::Entity::find().count(&app.db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn out_of_range_timestamp_is_rejected() {
        let app = TestApp::spawn().await;
        let body = serde_json::to_vec(&user_event("user.created", "user_1", "Jane")).unwrap();

        let res = app
            .send_webhook_raw("msg_1", i64::MIN, "v1,AAAA", body)
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
        assert_eq!(user::Entity::find().count(&app.db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn missing_headers_are_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::WEBHOOKS, &user_event("user.created", "user_1", "Jane"))
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }

    #[tokio::test]
    async fn signed_but_malformed_payload_is_validation_error() {
        let app = TestApp::spawn().await;

        let res = app
            .send_webhook(&json!({ "type": "user.created", "data": { "first_name": "Jane" } }))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod sync {
    use super::*;

    #[tokio::test]
    async fn created_event_inserts_user() {
        let app = TestApp::spawn().await;

        let res = app
            .send_webhook(&user_event("user.created", "user_1", "Jane"))
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["success"], true);
        let stored = find_user(&app, "user_1").await.unwrap();
        assert_eq!(stored.name, "Jane Doe");
        assert_eq!(stored.email, "user_1@example.com");
        assert_eq!(stored.image, "https://img.example.com/user_1.png");
        assert_eq!(stored.resume, "");
    }

    #[tokio::test]
    async fn updated_event_overwrites_profile() {
        let app = TestApp::spawn().await;
        app.send_webhook(&user_event("user.created", "user_1", "Jane"))
            .await;

        let res = app
            .send_webhook(&user_event("user.updated", "user_1", "Janet"))
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(find_user(&app, "user_1").await.unwrap().name, "Janet Doe");
    }

    #[tokio::test]
    async fn updated_event_for_unknown_user_creates_it() {
        let app = TestApp::spawn().await;

        let res = app
            .send_webhook(&user_event("user.updated", "user_1", "Jane"))
            .await;

        assert_eq!(res.status, 200);
        assert!(find_user(&app, "user_1").await.is_some());
    }

    #[tokio::test]
    async fn repeated_created_event_is_idempotent() {
        let app = TestApp::spawn().await;
        let event = user_event("user.created", "user_1", "Jane");

        assert_eq!(app.send_webhook(&event).await.status, 200);
        assert_eq!(app.send_webhook(&event).await.status, 200);

        assert_eq!(user::Entity::find().count(&app.db).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn deleted_event_removes_user_and_applicant_shows_as_null() {
        let app = TestApp::spawn().await;
        let acme = app.register_company("Acme", "hr@acme.test").await;
        let job_id = app.post_job(&acme, "Backend Engineer").await;
        app.send_webhook(&user_event("user.created", "user_1", "Jane"))
            .await;
        assert_eq!(app.apply("user_1", job_id).await.status, 201);

        let res = app
            .send_webhook(&json!({ "type": "user.deleted", "data": { "id": "user_1" } }))
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert!(find_user(&app, "user_1").await.is_none());

        let applicants = app.get_with_token(routes::APPLICANTS, &acme.token).await;
        let applications = applicants.body["applications"].as_array().unwrap();
        assert_eq!(applications.len(), 1);
        assert!(applications[0]["user"].is_null());
        assert_eq!(applications[0]["job"]["id"], job_id);
    }

    #[tokio::test]
    async fn deleting_unknown_user_is_acknowledged() {
        let app = TestApp::spawn().await;

        let res = app
            .send_webhook(&json!({ "type": "user.deleted", "data": { "id": "ghost" } }))
            .await;

        assert_eq!(res.status, 200);
    }

    #[tokio::test]
    async fn other_event_types_are_ignored() {
        let app = TestApp::spawn().await;

        let res = app
            .send_webhook(&json!({ "type": "session.created", "data": { "id": "sess_1" } }))
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(user::Entity::find().count(&app.db).await.unwrap(), 0);
    }
}
