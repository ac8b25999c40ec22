use chrono::Utc;
use portal_server::entity::job_application;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set, SqlErr,
};
use serde_json::json;

use crate::common::{TestApp, routes, user_token};

async fn application_ids(app: &TestApp, token: &str) -> Vec<i32> {
    let res = app.get_with_token(routes::APPLICANTS, token).await;
    assert_eq!(res.status, 200, "{}", res.text);
    res.body["applications"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["id"].as_i64().unwrap() as i32)
        .collect()
}

async fn stored_status(app: &TestApp, application_id: i32) -> String {
    job_application::Entity::find_by_id(application_id)
        .one(&app.db)
        .await
        .unwrap()
        .unwrap()
        .status
}

mod applying {
    use super::*;

    #[tokio::test]
    async fn apply_creates_pending_application() {
        let app = TestApp::spawn().await;
        let acme = app.register_company("Acme", "hr@acme.test").await;
        let job_id = app.post_job(&acme, "Backend Engineer").await;

        let res = app.apply("user_1", job_id).await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["message"], "Applied Successfully");

        let stored = job_application::Entity::find()
            .filter(job_application::Column::UserId.eq("user_1"))
            .one(&app.db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.job_id, job_id);
        assert_eq!(stored.company_id, acme.id);
        assert_eq!(stored.status, "Pending");
    }

    #[tokio::test]
    async fn applying_twice_is_conflict() {
        let app = TestApp::spawn().await;
        let acme = app.register_company("Acme", "hr@acme.test").await;
        let job_id = app.post_job(&acme, "Backend Engineer").await;
        assert_eq!(app.apply("user_1", job_id).await.status, 201);

        let res = app.apply("user_1", job_id).await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "CONFLICT");
        let count = job_application::Entity::find()
            .filter(job_application::Column::UserId.eq("user_1"))
            .count(&app.db)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn applying_to_unknown_job_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.apply("user_1", 4242).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn snake_case_job_id_is_accepted() {
        let app = TestApp::spawn().await;
        let acme = app.register_company("Acme", "hr@acme.test").await;
        let job_id = app.post_job(&acme, "Backend Engineer").await;

        let res = app
            .post_with_token(routes::APPLY, &json!({ "job_id": job_id }), &user_token("user_1"))
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
    }

    #[tokio::test]
    async fn apply_without_token_is_token_missing() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::APPLY, &json!({ "jobId": 1 }))
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn store_rejects_duplicate_pair_inserted_directly() {
        let app = TestApp::spawn().await;
        let acme = app.register_company("Acme", "hr@acme.test").await;
        let job_id = app.post_job(&acme, "Backend Engineer").await;
        assert_eq!(app.apply("user_1", job_id).await.status, 201);

        let err = job_application::ActiveModel {
            user_id: Set("user_1".to_string()),
            job_id: Set(job_id),
            company_id: Set(acme.id),
            status: Set("Pending".to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&app.db)
        .await
        .unwrap_err();

        assert!(matches!(
            err.sql_err(),
            Some(SqlErr::UniqueConstraintViolation(_))
        ));
    }
}

mod user_listing {
    use super::*;

    #[tokio::test]
    async fn user_sees_own_applications_with_company_and_job() {
        let app = TestApp::spawn().await;
        let acme = app.register_company("Acme", "hr@acme.test").await;
        let first = app.post_job(&acme, "First").await;
        let second = app.post_job(&acme, "Second").await;
        app.apply("user_1", first).await;
        app.apply("user_1", second).await;
        app.apply("user_2", first).await;

        let res = app
            .get_with_token(routes::USER_APPLICATIONS, &user_token("user_1"))
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        let applications = res.body["applications"].as_array().unwrap();
        assert_eq!(applications.len(), 2);
        assert_eq!(applications[0]["job"]["id"], first);
        assert_eq!(applications[0]["job"]["title"], "First");
        assert_eq!(applications[0]["company"]["name"], "Acme");
        assert_eq!(applications[0]["status"], "Pending");
        assert_eq!(applications[1]["job"]["id"], second);
    }

    #[tokio::test]
    async fn user_without_applications_gets_empty_list() {
        let app = TestApp::spawn().await;

        let res = app
            .get_with_token(routes::USER_APPLICATIONS, &user_token("user_1"))
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["applications"], json!([]));
    }
}

mod company_review {
    use super::*;

    #[tokio::test]
    async fn company_sees_only_applications_to_its_jobs() {
        let app = TestApp::spawn().await;
        let acme = app.register_company("Acme", "hr@acme.test").await;
        let globex = app.register_company("Globex", "hr@globex.test").await;
        let acme_job = app.post_job(&acme, "Acme job").await;
        let globex_job = app.post_job(&globex, "Globex job").await;
        app.create_user("user_1", "Jane Doe").await;
        app.apply("user_1", acme_job).await;
        app.apply("user_1", globex_job).await;

        let res = app.get_with_token(routes::APPLICANTS, &acme.token).await;

        assert_eq!(res.status, 200, "{}", res.text);
        let applications = res.body["applications"].as_array().unwrap();
        assert_eq!(applications.len(), 1);
        assert_eq!(applications[0]["job"]["id"], acme_job);
        assert_eq!(applications[0]["user"]["id"], "user_1");
        assert_eq!(applications[0]["user"]["name"], "Jane Doe");
        assert!(applications[0]["user"].get("email").is_none());
    }

    #[tokio::test]
    async fn owner_can_accept_and_reject() {
        let app = TestApp::spawn().await;
        let acme = app.register_company("Acme", "hr@acme.test").await;
        let job_id = app.post_job(&acme, "Backend Engineer").await;
        app.apply("user_1", job_id).await;
        let application_id = application_ids(&app, &acme.token).await[0];

        let res = app
            .post_with_token(
                routes::CHANGE_STATUS,
                &json!({ "id": application_id, "status": "Accepted" }),
                &acme.token,
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["message"], "Status Changed");
        assert_eq!(stored_status(&app, application_id).await, "Accepted");

        let res = app
            .post_with_token(
                routes::CHANGE_STATUS,
                &json!({ "id": application_id, "status": "Rejected" }),
                &acme.token,
            )
            .await;
        assert_eq!(res.status, 200);
        assert_eq!(stored_status(&app, application_id).await, "Rejected");
    }

    #[tokio::test]
    async fn non_owner_cannot_change_status_and_it_stays_unchanged() {
        let app = TestApp::spawn().await;
        let acme = app.register_company("Acme", "hr@acme.test").await;
        let globex = app.register_company("Globex", "hr@globex.test").await;
        let job_id = app.post_job(&acme, "Backend Engineer").await;
        app.apply("user_1", job_id).await;
        let application_id = application_ids(&app, &acme.token).await[0];

        let res = app
            .post_with_token(
                routes::CHANGE_STATUS,
                &json!({ "id": application_id, "status": "Accepted" }),
                &globex.token,
            )
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
        assert_eq!(stored_status(&app, application_id).await, "Pending");
    }

    #[tokio::test]
    async fn unknown_status_is_rejected() {
        let app = TestApp::spawn().await;
        let acme = app.register_company("Acme", "hr@acme.test").await;
        let job_id = app.post_job(&acme, "Backend Engineer").await;
        app.apply("user_1", job_id).await;
        let application_id = application_ids(&app, &acme.token).await[0];

        let res = app
            .post_with_token(
                routes::CHANGE_STATUS,
                &json!({ "id": application_id, "status": "Hired" }),
                &acme.token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert_eq!(stored_status(&app, application_id).await, "Pending");
    }

    #[tokio::test]
    async fn unknown_application_is_not_found() {
        let app = TestApp::spawn().await;
        let acme = app.register_company("Acme", "hr@acme.test").await;

        let res = app
            .post_with_token(
                routes::CHANGE_STATUS,
                &json!({ "id": 777, "status": "Accepted" }),
                &acme.token,
            )
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}

mod scenario {
    use super::*;

    #[tokio::test]
    async fn post_apply_review_and_hide() {
        let app = TestApp::spawn().await;
        let acme = app.register_company("Acme", "hr@acme.test").await;
        let job_id = app.post_job(&acme, "Backend Engineer").await;

        let webhook = app
            .send_webhook(&json!({
                "type": "user.created",
                "data": {
                    "id": "user_jane",
                    "email_addresses": [{ "email_address": "jane@example.com" }],
                    "first_name": "Jane",
                    "last_name": "Doe",
                    "image_url": "https://img.example.com/jane.png",
                },
            }))
            .await;
        assert_eq!(webhook.status, 200, "{}", webhook.text);

        let jane = user_token("user_jane");
        let listed = app.get_without_token(routes::JOBS).await;
        assert_eq!(listed.body["jobs"][0]["id"], job_id);

        assert_eq!(app.apply("user_jane", job_id).await.status, 201);

        let counts = app.get_with_token(routes::COMPANY_JOBS, &acme.token).await;
        assert_eq!(counts.body["jobs"][0]["applicants"], 1);

        let applicants = app.get_with_token(routes::APPLICANTS, &acme.token).await;
        let applicant = &applicants.body["applications"][0];
        assert_eq!(applicant["user"]["name"], "Jane Doe");
        let application_id = applicant["id"].as_i64().unwrap();

        let decided = app
            .post_with_token(
                routes::CHANGE_STATUS,
                &json!({ "id": application_id, "status": "Accepted" }),
                &acme.token,
            )
            .await;
        assert_eq!(decided.status, 200);

        let mine = app.get_with_token(routes::USER_APPLICATIONS, &jane).await;
        assert_eq!(mine.body["applications"][0]["status"], "Accepted");

        let hidden = app
            .post_with_token(routes::CHANGE_VISIBILITY, &json!({ "id": job_id }), &acme.token)
            .await;
        assert_eq!(hidden.body["job"]["visible"], false);

        let listed = app.get_without_token(routes::JOBS).await;
        assert_eq!(listed.body["jobs"], json!([]));

        let mine = app.get_with_token(routes::USER_APPLICATIONS, &jane).await;
        assert_eq!(mine.body["applications"][0]["job"]["id"], job_id);
    }
}
