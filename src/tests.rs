//! Integration tests for the tracker backend.

use std::sync::Arc;

use reqwest::Client;
use serde_json::{json, Value};
use tempfile::TempDir;

use crate::db::{collections, init_database, Repository, HIDEOUT_DOC_ID};
use crate::models::STASH_STATION_ID;
use crate::{create_router, AppState};

/// Test fixture for integration tests.
struct TestFixture {
    client: Client,
    base_url: String,
    repo: Arc<Repository>,
    _temp_dir: TempDir,
}

impl TestFixture {
    async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.sqlite");

        // Initialize database
        let pool = init_database(&db_path).await.expect("Failed to init DB");
        let repo = Arc::new(Repository::new(pool));

        let state = AppState {
            repo: Arc::clone(&repo),
        };

        let app = create_router(state);

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");
        let base_url = format!("http://{}", addr);

        // Spawn server
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait for server to start
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        TestFixture {
            client: Client::new(),
            base_url,
            repo,
            _temp_dir: temp_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn seed(&self, collection: &str, id: &str, document: &Value) {
        self.repo
            .put_document(collection, id, document)
            .await
            .expect("Failed to seed document");
    }

    async fn seed_token(&self, token_id: &str, owner: &str, permissions: &[&str]) {
        self.seed(
            collections::TOKEN,
            token_id,
            &json!({
                "token": token_id,
                "owner": owner,
                "permissions": permissions,
                "calls": 0,
            }),
        )
        .await;
    }

    async fn seed_stash_hideout(&self) {
        self.seed(
            collections::TARKOV_DATA,
            HIDEOUT_DOC_ID,
            &json!({
                "hideoutStations": [
                    {
                        "id": "some-other-station",
                        "levels": [
                            { "id": "x1", "level": 1, "itemRequirements": [] }
                        ]
                    },
                    {
                        "id": STASH_STATION_ID,
                        "levels": [
                            {
                                "id": "m1",
                                "level": 1,
                                "itemRequirements": [{ "id": "p1", "count": 3 }]
                            },
                            { "id": "m2", "level": 2, "itemRequirements": [] },
                            { "id": "m3", "level": 3, "itemRequirements": [] }
                        ]
                    }
                ]
            }),
        )
        .await;
    }

    async fn get(&self, path: &str, token: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await
            .unwrap()
    }
}

#[tokio::test]
async fn test_health_check() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_missing_authorization_header() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/api/v2/token"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 401);
    assert_eq!(resp.text().await.unwrap(), "");
}

#[tokio::test]
async fn test_bearer_without_value() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/api/v2/token"))
        .header("Authorization", "Bearer")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "No bearer token set");
}

#[tokio::test]
async fn test_unknown_token() {
    let fixture = TestFixture::new().await;

    let resp = fixture.get("/api/v2/token", "does-not-exist").await;

    assert_eq!(resp.status(), 401);
    assert_eq!(resp.text().await.unwrap(), "");
}

#[tokio::test]
async fn test_token_endpoint() {
    let fixture = TestFixture::new().await;
    fixture.seed_token("tok-1", "user-1", &["GP", "TP"]).await;

    let resp = fixture.get("/api/v2/token", "tok-1").await;

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["token"], "tok-1");
    assert_eq!(body["permissions"], json!(["GP", "TP"]));
}

#[tokio::test]
async fn test_token_endpoint_defaults_missing_permissions() {
    let fixture = TestFixture::new().await;
    fixture
        .seed(
            collections::TOKEN,
            "tok-1",
            &json!({ "token": "tok-1", "owner": "user-1" }),
        )
        .await;

    let resp = fixture.get("/api/v2/token", "tok-1").await;

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["permissions"], json!([]));
}

#[tokio::test]
async fn test_call_counter_incremented() {
    let fixture = TestFixture::new().await;
    fixture.seed_token("tok-1", "user-1", &[]).await;

    let resp = fixture.get("/api/v2/token", "tok-1").await;
    assert_eq!(resp.status(), 200);

    // The increment runs off the response path; give it a moment
    let mut calls = 0;
    for _ in 0..20 {
        tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        calls = fixture
            .repo
            .get_token("tok-1")
            .await
            .unwrap()
            .unwrap()
            .calls;
        if calls > 0 {
            break;
        }
    }
    assert_eq!(calls, 1);
}

#[tokio::test]
async fn test_progress_requires_permission() {
    let fixture = TestFixture::new().await;
    fixture.seed_token("tok-1", "user-1", &["TP"]).await;

    let resp = fixture.get("/api/v2/progress", "tok-1").await;

    assert_eq!(resp.status(), 401);
    assert_eq!(resp.text().await.unwrap(), "");
}

#[tokio::test]
async fn test_progress_defaults_without_document() {
    let fixture = TestFixture::new().await;
    fixture
        .seed_token("tok-1", "abc123def456", &["GP"])
        .await;

    let resp = fixture.get("/api/v2/progress", "tok-1").await;

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["meta"]["self"], "abc123def456");
    assert_eq!(body["data"]["userId"], "abc123def456");
    assert_eq!(body["data"]["displayName"], "abc123");
    assert_eq!(body["data"]["playerLevel"], 1);
    assert_eq!(body["data"]["gameEdition"], 1);
    assert_eq!(body["data"]["tasksProgress"], json!([]));
    assert_eq!(body["data"]["taskObjectivesProgress"], json!([]));
    assert_eq!(body["data"]["hideoutModulesProgress"], json!([]));
    assert_eq!(body["data"]["hideoutPartsProgress"], json!([]));
}

#[tokio::test]
async fn test_progress_with_hideout_merge() {
    let fixture = TestFixture::new().await;
    fixture.seed_token("tok-1", "user-1", &["GP"]).await;
    fixture.seed_stash_hideout().await;
    fixture
        .seed(
            collections::PROGRESS,
            "user-1",
            &json!({
                "displayName": "Nikita",
                "level": 15,
                "gameEdition": 2,
                "taskCompletions": { "q1": { "complete": true } },
                "taskObjectives": { "o1": { "complete": true, "count": 5 } },
            }),
        )
        .await;

    let resp = fixture.get("/api/v2/progress", "tok-1").await;

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["displayName"], "Nikita");
    assert_eq!(body["data"]["playerLevel"], 15);
    assert_eq!(body["data"]["gameEdition"], 2);
    assert_eq!(
        body["data"]["tasksProgress"],
        json!([{ "id": "q1", "complete": true }])
    );
    assert_eq!(
        body["data"]["taskObjectivesProgress"],
        json!([{ "id": "o1", "complete": true, "count": 5 }])
    );

    // Edition 2 unlocks stash levels 1 and 2, but not 3
    let modules = body["data"]["hideoutModulesProgress"].as_array().unwrap();
    assert_eq!(modules.len(), 2);
    assert!(modules
        .iter()
        .any(|m| m["id"] == "m1" && m["complete"] == true));
    assert!(modules
        .iter()
        .any(|m| m["id"] == "m2" && m["complete"] == true));

    assert_eq!(
        body["data"]["hideoutPartsProgress"],
        json!([{ "id": "p1", "complete": true, "count": 3 }])
    );
}

#[tokio::test]
async fn test_progress_with_undecodable_hideout_data() {
    let fixture = TestFixture::new().await;
    fixture.seed_token("tok-1", "user-1", &["GP"]).await;
    fixture
        .seed(
            collections::TARKOV_DATA,
            HIDEOUT_DOC_ID,
            &json!({ "hideoutStations": "not-a-list" }),
        )
        .await;
    fixture
        .seed(
            collections::PROGRESS,
            "user-1",
            &json!({ "gameEdition": 3 }),
        )
        .await;

    // Bad hideout data is recovered; the request succeeds unmerged
    let resp = fixture.get("/api/v2/progress", "tok-1").await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["hideoutModulesProgress"], json!([]));
}

#[tokio::test]
async fn test_team_progress_requires_permission() {
    let fixture = TestFixture::new().await;
    fixture.seed_token("tok-1", "user-1", &["GP"]).await;

    let resp = fixture.get("/api/v2/team/progress", "tok-1").await;

    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn test_team_progress_solo() {
    let fixture = TestFixture::new().await;
    fixture.seed_token("tok-1", "user-1", &["TP"]).await;
    fixture
        .seed(collections::SYSTEM, "user-1", &json!({ "team": null }))
        .await;

    let resp = fixture.get("/api/v2/team/progress", "tok-1").await;

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["meta"]["self"], "user-1");
    assert_eq!(body["meta"]["hiddenTeammates"], json!([]));

    let members = body["data"].as_array().unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0]["userId"], "user-1");
}

#[tokio::test]
async fn test_team_progress_full_team() {
    let fixture = TestFixture::new().await;
    fixture.seed_token("tok-1", "user-1", &["TP"]).await;
    fixture
        .seed(collections::SYSTEM, "user-1", &json!({ "team": "team-9" }))
        .await;
    fixture
        .seed(
            collections::TEAM,
            "team-9",
            &json!({ "members": ["user-2", "user-1", "user-3"] }),
        )
        .await;
    // user-2 is hidden; user-4 is hidden but not on the roster
    fixture
        .seed(
            collections::USER,
            "user-1",
            &json!({ "teamHide": { "user-2": true, "user-3": false, "user-4": true } }),
        )
        .await;
    fixture
        .seed(
            collections::PROGRESS,
            "user-2",
            &json!({ "displayName": "Second", "level": 8 }),
        )
        .await;

    let resp = fixture.get("/api/v2/team/progress", "tok-1").await;

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["meta"]["self"], "user-1");
    assert_eq!(body["meta"]["hiddenTeammates"], json!(["user-2"]));

    // Members come back in roster order; hidden members are not filtered
    let members = body["data"].as_array().unwrap();
    assert_eq!(members.len(), 3);
    assert_eq!(members[0]["userId"], "user-2");
    assert_eq!(members[0]["displayName"], "Second");
    assert_eq!(members[0]["playerLevel"], 8);
    assert_eq!(members[1]["userId"], "user-1");
    assert_eq!(members[2]["userId"], "user-3");
    // user-3 has no progress document, so defaults apply
    assert_eq!(members[2]["displayName"], "user-3");
    assert_eq!(members[2]["playerLevel"], 1);
}

#[tokio::test]
async fn test_team_progress_missing_system_record() {
    let fixture = TestFixture::new().await;
    fixture.seed_token("tok-1", "user-1", &["TP"]).await;

    let resp = fixture.get("/api/v2/team/progress", "tok-1").await;

    assert_eq!(resp.status(), 500);
}

#[tokio::test]
async fn test_team_progress_dangling_team_reference() {
    let fixture = TestFixture::new().await;
    fixture.seed_token("tok-1", "user-1", &["TP"]).await;
    fixture
        .seed(collections::SYSTEM, "user-1", &json!({ "team": "ghost-team" }))
        .await;

    let resp = fixture.get("/api/v2/team/progress", "tok-1").await;

    assert_eq!(resp.status(), 500);
}
