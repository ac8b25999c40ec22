use portal_server::entity::job;
use sea_orm::EntityTrait;
use serde_json::json;

use crate::common::{TestApp, routes};

async fn toggle(app: &TestApp, token: &str, job_id: i32) -> crate::common::TestResponse {
    app.post_with_token(routes::CHANGE_VISIBILITY, &json!({ "id": job_id }), token)
        .await
}

mod listing {
    use super::*;

    #[tokio::test]
    async fn public_listing_includes_company_summary() {
        let app = TestApp::spawn().await;
        let acme = app.register_company("Acme", "hr@acme.test").await;
        let job_id = app.post_job(&acme, "Backend Engineer").await;

        let res = app.get_without_token(routes::JOBS).await;

        assert_eq!(res.status, 200, "{}", res.text);
        let jobs = res.body["jobs"].as_array().unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0]["id"], job_id);
        assert_eq!(jobs[0]["company"]["name"], "Acme");
        assert!(jobs[0]["company"].get("password").is_none());
    }

    #[tokio::test]
    async fn hidden_jobs_are_excluded_from_public_listing() {
        let app = TestApp::spawn().await;
        let acme = app.register_company("Acme", "hr@acme.test").await;
        let shown = app.post_job(&acme, "Shown").await;
        let hidden = app.post_job(&acme, "Hidden").await;
        assert_eq!(toggle(&app, &acme.token, hidden).await.status, 200);

        let res = app.get_without_token(routes::JOBS).await;

        let ids: Vec<i64> = res.body["jobs"]
            .as_array()
            .unwrap()
            .iter()
            .map(|j| j["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![shown as i64]);
    }

    #[tokio::test]
    async fn listing_keeps_posting_order() {
        let app = TestApp::spawn().await;
        let acme = app.register_company("Acme", "hr@acme.test").await;
        let first = app.post_job(&acme, "First").await;
        let second = app.post_job(&acme, "Second").await;

        let res = app.get_without_token(routes::JOBS).await;

        let jobs = res.body["jobs"].as_array().unwrap();
        assert_eq!(jobs[0]["id"], first);
        assert_eq!(jobs[1]["id"], second);
    }

    #[tokio::test]
    async fn get_job_returns_hidden_job_by_id() {
        let app = TestApp::spawn().await;
        let acme = app.register_company("Acme", "hr@acme.test").await;
        let job_id = app.post_job(&acme, "Backend Engineer").await;
        toggle(&app, &acme.token, job_id).await;

        let res = app.get_without_token(&routes::job(job_id)).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["job"]["visible"], false);
        assert_eq!(res.body["job"]["company"]["id"], acme.id);
    }

    #[tokio::test]
    async fn get_unknown_job_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(&routes::job(999)).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}

mod company_jobs {
    use super::*;

    #[tokio::test]
    async fn applicant_counts_are_zero_one_and_many() {
        let app = TestApp::spawn().await;
        let acme = app.register_company("Acme", "hr@acme.test").await;
        let none = app.post_job(&acme, "Nobody applied").await;
        let one = app.post_job(&acme, "One applicant").await;
        let many = app.post_job(&acme, "Three applicants").await;

        assert_eq!(app.apply("user_a", one).await.status, 201);
        for user in ["user_a", "user_b", "user_c"] {
            assert_eq!(app.apply(user, many).await.status, 201);
        }

        let res = app.get_with_token(routes::COMPANY_JOBS, &acme.token).await;

        assert_eq!(res.status, 200, "{}", res.text);
        let jobs = res.body["jobs"].as_array().unwrap();
        assert_eq!(jobs.len(), 3);
        let count_of = |id: i32| {
            jobs.iter()
                .find(|j| j["id"] == id)
                .map(|j| j["applicants"].as_u64().unwrap())
                .unwrap()
        };
        assert_eq!(count_of(none), 0);
        assert_eq!(count_of(one), 1);
        assert_eq!(count_of(many), 3);
    }

    #[tokio::test]
    async fn only_own_jobs_are_listed_including_hidden() {
        let app = TestApp::spawn().await;
        let acme = app.register_company("Acme", "hr@acme.test").await;
        let globex = app.register_company("Globex", "hr@globex.test").await;
        let mine = app.post_job(&acme, "Mine").await;
        app.post_job(&globex, "Theirs").await;
        toggle(&app, &acme.token, mine).await;

        let res = app.get_with_token(routes::COMPANY_JOBS, &acme.token).await;

        let jobs = res.body["jobs"].as_array().unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0]["id"], mine);
        assert_eq!(jobs[0]["visible"], false);
    }
}

mod visibility {
    use super::*;

    #[tokio::test]
    async fn toggling_twice_restores_visibility() {
        let app = TestApp::spawn().await;
        let acme = app.register_company("Acme", "hr@acme.test").await;
        let job_id = app.post_job(&acme, "Backend Engineer").await;

        let first = toggle(&app, &acme.token, job_id).await;
        assert_eq!(first.status, 200, "{}", first.text);
        assert_eq!(first.body["job"]["visible"], false);

        let second = toggle(&app, &acme.token, job_id).await;
        assert_eq!(second.status, 200);
        assert_eq!(second.body["job"]["visible"], true);

        let stored = job::Entity::find_by_id(job_id)
            .one(&app.db)
            .await
            .unwrap()
            .unwrap();
        assert!(stored.visible);
    }

    #[tokio::test]
    async fn non_owner_cannot_toggle_and_flag_is_unchanged() {
        let app = TestApp::spawn().await;
        let acme = app.register_company("Acme", "hr@acme.test").await;
        let globex = app.register_company("Globex", "hr@globex.test").await;
        let job_id = app.post_job(&acme, "Backend Engineer").await;

        let res = toggle(&app, &globex.token, job_id).await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
        let stored = job::Entity::find_by_id(job_id)
            .one(&app.db)
            .await
            .unwrap()
            .unwrap();
        assert!(stored.visible);
    }

    #[tokio::test]
    async fn toggling_unknown_job_is_not_found() {
        let app = TestApp::spawn().await;
        let acme = app.register_company("Acme", "hr@acme.test").await;

        let res = toggle(&app, &acme.token, 999).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}
