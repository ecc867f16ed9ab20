//! HTTP API integration tests.
//!
//! Drives the real router over loopback: auth lifecycle (register, login,
//! logout, revocation), project CRUD, membership authorization, and the
//! whole-tree persistence endpoint.

mod fixtures;

use fixtures::{TestServer, create_project, register};

#[tokio::test]
async fn test_health_endpoint() {
    // given:
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    // when:
    let response = client
        .get(format!("{}/api/health", server.base_url()))
        .send()
        .await
        .expect("request failed");

    // then:
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_register_returns_token() {
    // given:
    let server = TestServer::start().await;

    // when:
    let token = register(&server, "a@x.com", "secret1").await;

    // then: the token authenticates a profile request
    let client = reqwest::Client::new();
    let response = client
        .get(format!("{}/users/profile", server.base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["user"]["email"], "a@x.com");
}

#[tokio::test]
async fn test_register_validation_errors() {
    // given:
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    // when: bad email and short password in one request
    let response = client
        .post(format!("{}/users/register", server.base_url()))
        .json(&serde_json::json!({"email": "not-an-email", "password": "abc"}))
        .send()
        .await
        .unwrap();

    // then: 400 with field-level messages
    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    let errors = body["errors"].as_array().expect("errors array");
    assert_eq!(errors.len(), 2);
    let fields: Vec<&str> = errors.iter().map(|e| e["field"].as_str().unwrap()).collect();
    assert!(fields.contains(&"email"));
    assert!(fields.contains(&"password"));
}

#[tokio::test]
async fn test_register_duplicate_email_rejected() {
    // given:
    let server = TestServer::start().await;
    register(&server, "a@x.com", "secret1").await;
    let client = reqwest::Client::new();

    // when:
    let response = client
        .post(format!("{}/users/register", server.base_url()))
        .json(&serde_json::json!({"email": "a@x.com", "password": "secret2"}))
        .send()
        .await
        .unwrap();

    // then:
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_login_success_and_failures() {
    // given:
    let server = TestServer::start().await;
    register(&server, "a@x.com", "secret1").await;
    let client = reqwest::Client::new();
    let login_url = format!("{}/users/login", server.base_url());

    // when / then: correct credentials
    let ok = client
        .post(&login_url)
        .json(&serde_json::json!({"email": "a@x.com", "password": "secret1"}))
        .send()
        .await
        .unwrap();
    assert_eq!(ok.status(), 200);
    let body: serde_json::Value = ok.json().await.unwrap();
    assert!(body["user"]["token"].as_str().is_some());

    // when / then: wrong password
    let bad_password = client
        .post(&login_url)
        .json(&serde_json::json!({"email": "a@x.com", "password": "wrong1"}))
        .send()
        .await
        .unwrap();
    assert_eq!(bad_password.status(), 401);

    // when / then: unknown user
    let unknown = client
        .post(&login_url)
        .json(&serde_json::json!({"email": "ghost@x.com", "password": "secret1"}))
        .send()
        .await
        .unwrap();
    assert_eq!(unknown.status(), 404);
}

#[tokio::test]
async fn test_logout_revokes_token() {
    // given:
    let server = TestServer::start().await;
    let token = register(&server, "a@x.com", "secret1").await;
    let client = reqwest::Client::new();

    // when: logout, then reuse the token
    let logout = client
        .get(format!("{}/users/logout", server.base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(logout.status(), 200);

    let reuse = client
        .get(format!("{}/users/profile", server.base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    // then: the revoked token no longer authenticates
    assert_eq!(reuse.status(), 401);
    let body: serde_json::Value = reuse.json().await.unwrap();
    assert_eq!(body["error"], "Unauthorized");
}

#[tokio::test]
async fn test_unauthenticated_request_rejected() {
    // given:
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    // when: no Authorization header at all
    let response = client
        .get(format!("{}/users/profile", server.base_url()))
        .send()
        .await
        .unwrap();

    // then:
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_all_users_excludes_caller() {
    // given:
    let server = TestServer::start().await;
    let token_a = register(&server, "a@x.com", "secret1").await;
    register(&server, "b@x.com", "secret1").await;
    register(&server, "c@x.com", "secret1").await;
    let client = reqwest::Client::new();

    // when:
    let response = client
        .get(format!("{}/users/all", server.base_url()))
        .bearer_auth(&token_a)
        .send()
        .await
        .unwrap();

    // then:
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    let emails: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["email"].as_str().unwrap())
        .collect();
    assert_eq!(emails, vec!["b@x.com", "c@x.com"]);
}

#[tokio::test]
async fn test_create_and_list_projects() {
    // given:
    let server = TestServer::start().await;
    let token_a = register(&server, "a@x.com", "secret1").await;
    let token_b = register(&server, "b@x.com", "secret1").await;
    let project_id = create_project(&server, &token_a, "demo").await;
    let client = reqwest::Client::new();

    // when: each user lists their projects
    let mine: serde_json::Value = client
        .get(format!("{}/projects/all", server.base_url()))
        .bearer_auth(&token_a)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let theirs: serde_json::Value = client
        .get(format!("{}/projects/all", server.base_url()))
        .bearer_auth(&token_b)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // then: only the creator sees it
    assert_eq!(mine.as_array().unwrap().len(), 1);
    assert_eq!(mine[0]["id"], project_id.as_str());
    assert_eq!(theirs.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_get_project_detail() {
    // given:
    let server = TestServer::start().await;
    let token = register(&server, "a@x.com", "secret1").await;
    let project_id = create_project(&server, &token, "demo").await;
    let client = reqwest::Client::new();

    // when:
    let response = client
        .get(format!(
            "{}/projects/all-project/{project_id}",
            server.base_url()
        ))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    // then:
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["name"], "demo");
    assert_eq!(body["users"][0], "a@x.com");

    // and a malformed id is a validation error, not a lookup miss
    let malformed = client
        .get(format!(
            "{}/projects/all-project/not-a-valid-id",
            server.base_url()
        ))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(malformed.status(), 400);
}

#[tokio::test]
async fn test_add_user_requires_membership() {
    // given: b is not a member of a's project
    let server = TestServer::start().await;
    let token_a = register(&server, "a@x.com", "secret1").await;
    let token_b = register(&server, "b@x.com", "secret1").await;
    register(&server, "c@x.com", "secret1").await;
    let project_id = create_project(&server, &token_a, "demo").await;
    let client = reqwest::Client::new();
    let url = format!("{}/projects/add-user", server.base_url());

    // when: the outsider tries to add someone
    let forbidden = client
        .put(&url)
        .bearer_auth(&token_b)
        .json(&serde_json::json!({"projectId": project_id, "users": ["c@x.com"]}))
        .send()
        .await
        .unwrap();

    // then: 403 with a message field
    assert_eq!(forbidden.status(), 403);
    let body: serde_json::Value = forbidden.json().await.unwrap();
    assert!(body["message"].as_str().is_some());

    // when: the member adds both
    let ok = client
        .put(&url)
        .bearer_auth(&token_a)
        .json(&serde_json::json!({"projectId": project_id, "users": ["b@x.com", "c@x.com"]}))
        .send()
        .await
        .unwrap();

    // then:
    assert_eq!(ok.status(), 200);
    let body: serde_json::Value = ok.json().await.unwrap();
    assert_eq!(body["users"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_file_tree_roundtrip() {
    // given:
    let server = TestServer::start().await;
    let token = register(&server, "a@x.com", "secret1").await;
    let project_id = create_project(&server, &token, "demo").await;
    let client = reqwest::Client::new();

    // when: persist a tree with one file
    let response = client
        .put(format!("{}/projects/update-file-tree", server.base_url()))
        .bearer_auth(&token)
        .json(&serde_json::json!({
            "projectId": project_id,
            "fileTree": {"app.js": {"contents": "console.log('X')"}}
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    // then: reading the project back yields the same contents
    let body: serde_json::Value = client
        .get(format!(
            "{}/projects/all-project/{project_id}",
            server.base_url()
        ))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["fileTree"]["app.js"]["contents"], "console.log('X')");
}

#[tokio::test]
async fn test_update_file_tree_requires_membership_until_added() {
    // given: b holds a token but is not a member yet
    let server = TestServer::start().await;
    let token_a = register(&server, "a@x.com", "secret1").await;
    let token_b = register(&server, "b@x.com", "secret1").await;
    let project_id = create_project(&server, &token_a, "demo").await;
    let client = reqwest::Client::new();
    let tree = serde_json::json!({
        "projectId": project_id,
        "fileTree": {"app.js": {"contents": "x"}}
    });

    // when / then: rejected before membership
    let forbidden = client
        .put(format!("{}/projects/update-file-tree", server.base_url()))
        .bearer_auth(&token_b)
        .json(&tree)
        .send()
        .await
        .unwrap();
    assert_eq!(forbidden.status(), 403);

    // when: a adds b, b retries
    client
        .put(format!("{}/projects/add-user", server.base_url()))
        .bearer_auth(&token_a)
        .json(&serde_json::json!({"projectId": project_id, "users": ["b@x.com"]}))
        .send()
        .await
        .unwrap();
    let allowed = client
        .put(format!("{}/projects/update-file-tree", server.base_url()))
        .bearer_auth(&token_b)
        .json(&tree)
        .send()
        .await
        .unwrap();

    // then:
    assert_eq!(allowed.status(), 200);
}
