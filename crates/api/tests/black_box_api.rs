use chrono::{Duration as ChronoDuration, Utc};
use hireboard_api::config::ApiConfig;
use hireboard_auth::{Claims, Role};
use hireboard_core::AccountId;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::StatusCode;
use serde_json::{json, Value};

const JWT_SECRET: &str = "test-secret";

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod with in-memory stores, bound to an ephemeral port.
        let config = ApiConfig {
            jwt_secret: JWT_SECRET.to_string(),
            ..ApiConfig::default()
        };
        let app = hireboard_api::app::build_app(&config)
            .await
            .expect("failed to build app");
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

struct Identity {
    id: AccountId,
    token: String,
}

fn mint(secret: &str, roles: Vec<Role>) -> Identity {
    let now = Utc::now();
    let claims = Claims {
        id: AccountId::new(),
        roles,
        user_name: "tester".to_string(),
        issued_at: now,
        expires_at: now + ChronoDuration::minutes(10),
    };

    let token = jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("failed to encode jwt");

    Identity { id: claims.id, token }
}

fn identity(roles: Vec<Role>) -> Identity {
    mint(JWT_SECRET, roles)
}

async fn create_job(client: &reqwest::Client, srv: &TestServer, org: &Identity, title: &str) -> String {
    let res = client
        .post(srv.url("/jobs"))
        .bearer_auth(&org.token)
        .json(&json!({
            "title": title,
            "description": "Build things",
            "type": "Full-time",
            "category": "Engineering",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await.unwrap();
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_is_public_and_everything_else_needs_a_token() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client.get(srv.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client.get(srv.url("/jobs")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "unauthenticated");

    let res = client
        .get(srv.url("/jobs"))
        .bearer_auth("not-a-jwt")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let forged = mint("some-other-secret", vec![Role::Admin]);
    let res = client
        .get(srv.url("/jobs"))
        .bearer_auth(&forged.token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn registration_login_and_own_details() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/auth/registration"))
        .json(&json!({
            "username": "alice",
            "email": "alice@example.com",
            "password": "secret1",
            "firstName": "Ada",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = res.json().await.unwrap();
    assert_eq!(created["roles"], json!(["USER"]));
    assert!(created.get("passwordHash").is_none());

    let res = client
        .post(srv.url("/auth/registration"))
        .json(&json!({
            "username": "alice",
            "email": "other@example.com",
            "password": "secret1",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Username already exists");

    let res = client
        .post(srv.url("/auth/login"))
        .json(&json!({ "username": "alice@example.com", "password": "wrong" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .post(srv.url("/auth/login"))
        .json(&json!({ "username": "alice", "password": "secret1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let token = res.json::<Value>().await.unwrap()["token"]
        .as_str()
        .unwrap()
        .to_string();

    let res = client
        .get(srv.url("/auth/me"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let me: Value = res.json().await.unwrap();
    assert_eq!(me["id"], created["id"]);
    assert_eq!(me["firstName"], "Ada");
}

#[tokio::test]
async fn account_routes_enforce_self_or_admin() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let user = identity(vec![Role::User]);
    let admin = identity(vec![Role::Admin]);
    let stranger = AccountId::new();

    let res = client
        .get(srv.url(&format!("/auth/users/{stranger}")))
        .bearer_auth(&user.token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Self passes the gate; minted identities have no stored account.
    let res = client
        .get(srv.url(&format!("/auth/users/{}", user.id)))
        .bearer_auth(&user.token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // Admin passes the gate; the account simply does not exist.
    let res = client
        .get(srv.url(&format!("/auth/users/{stranger}")))
        .bearer_auth(&admin.token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .get(srv.url("/auth/users/not-a-uuid"))
        .bearer_auth(&admin.token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .get(srv.url("/auth/users"))
        .bearer_auth(&user.token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client
        .get(srv.url("/auth/users"))
        .bearer_auth(&admin.token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn job_publishing_and_likes() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let org = identity(vec![Role::Organization]);
    let user = identity(vec![Role::User]);

    let res = client
        .post(srv.url("/jobs"))
        .bearer_auth(&user.token)
        .json(&json!({ "title": "Engineer", "type": "Full-time", "category": "Engineering" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let job_id = create_job(&client, &srv, &org, "Engineer").await;

    let res = client
        .post(srv.url("/jobs"))
        .bearer_auth(&org.token)
        .json(&json!({ "title": "Engineer", "type": "Full-time", "category": "Engineering" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let like_url = srv.url(&format!("/jobs/{job_id}/like"));

    let res = client.post(&like_url).bearer_auth(&user.token).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "likes": 1, "isLiked": true }));

    let res = client.post(&like_url).bearer_auth(&org.token).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client.delete(&like_url).bearer_auth(&user.token).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["likes"], 0);

    let res = client.delete(&like_url).bearer_auth(&user.token).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "conflict");
    assert_eq!(body["message"], "You have not liked this job");

    // The public feed never exposes author or liker identities.
    let res = client.get(srv.url("/jobs")).bearer_auth(&user.token).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let feed: Value = res.json().await.unwrap();
    let first = &feed.as_array().unwrap()[0];
    assert!(first.get("author").is_none());
    assert!(first.get("likedBy").is_none());
    assert_eq!(first["isLiked"], false);
}

#[tokio::test]
async fn deactivated_jobs_reject_likes_until_reactivated() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let org = identity(vec![Role::Organization]);
    let user = identity(vec![Role::User]);
    let job_id = create_job(&client, &srv, &org, "Engineer").await;

    let res = client
        .patch(srv.url(&format!("/jobs/{job_id}/deactivate")))
        .bearer_auth(&org.token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let like_url = srv.url(&format!("/jobs/{job_id}/like"));
    let res = client.post(&like_url).bearer_auth(&user.token).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = client
        .patch(srv.url(&format!("/jobs/{job_id}/activate")))
        .bearer_auth(&org.token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client.post(&like_url).bearer_auth(&user.token).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn application_lifecycle() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let org = identity(vec![Role::Organization]);
    let other_org = identity(vec![Role::Organization]);
    let applicant = identity(vec![Role::User]);
    let job_id = create_job(&client, &srv, &org, "Engineer").await;

    let apply_url = srv.url(&format!("/applications/apply/{job_id}"));
    let res = client
        .post(&apply_url)
        .bearer_auth(&applicant.token)
        .json(&json!({ "coverLetter": "Hi" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let application: Value = res.json().await.unwrap();
    assert_eq!(application["status"], "PENDING");
    let application_id = application["id"].as_str().unwrap().to_string();

    let res = client
        .post(&apply_url)
        .bearer_auth(&applicant.token)
        .json(&json!({ "coverLetter": "Hi again" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = client
        .post(&apply_url)
        .bearer_auth(&org.token)
        .json(&json!({ "coverLetter": "Hi" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let status_url = srv.url(&format!("/applications/{application_id}/status"));
    let res = client
        .patch(&status_url)
        .bearer_auth(&org.token)
        .json(&json!({ "status": "ACCEPTED" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let updated: Value = res.json().await.unwrap();
    assert_eq!(updated["status"], "ACCEPTED");
    assert_eq!(updated["job"], job_id.as_str());

    let res = client
        .patch(&status_url)
        .bearer_auth(&other_org.token)
        .json(&json!({ "status": "REJECTED" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client
        .patch(&status_url)
        .bearer_auth(&applicant.token)
        .json(&json!({ "status": "REJECTED" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client
        .patch(&status_url)
        .bearer_auth(&org.token)
        .json(&json!({ "status": "HIRED" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    for body in [json!({ "status": 5 }), json!({})] {
        let res = client
            .patch(&status_url)
            .bearer_auth(&org.token)
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let err: Value = res.json().await.unwrap();
        assert_eq!(err["error"], "validation_error");
    }

    let res = client
        .get(srv.url("/applications/mine"))
        .bearer_auth(&applicant.token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let mine: Value = res.json().await.unwrap();
    assert_eq!(mine.as_array().unwrap().len(), 1);
    assert_eq!(mine[0]["job"]["id"], job_id.as_str());

    let res = client
        .get(srv.url(&format!("/applications/job/{job_id}")))
        .bearer_auth(&other_org.token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // The applicant holds no account record here, so the join yields nothing.
    let res = client
        .get(srv.url(&format!("/applications/job/{job_id}")))
        .bearer_auth(&org.token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let applicants: Value = res.json().await.unwrap();
    assert!(applicants.as_array().unwrap().is_empty());
}
