use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use common::{event_log::Level, EventLog, RecordingEventLog};
use migration::MigratorTrait;
use models::system_role::{Model, SystemRolePatch};
use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use service::{errors::StoreError, InMemorySystemRoleRepository, SeaOrmSystemRoleRepository, SystemRoleRepository};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use server::routes::auth::issue_token;
use server::{build_router, build_router_without_auth, ServerAuthConfig, ServerState};

const SECRET: &str = "test-secret";
const GENERIC_ERROR: &str = "An unhandled exception occurred on the server.";

fn cors() -> CorsLayer { CorsLayer::very_permissive() }

struct TestApp {
    base_url: String,
    log: Arc<RecordingEventLog>,
    token: String,
}

impl TestApp {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

async fn serve(app: Router) -> anyhow::Result<String> {
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });
    Ok(format!("http://{}:{}", addr.ip(), addr.port()))
}

fn state_for(repo: Arc<dyn SystemRoleRepository>, log: Arc<RecordingEventLog>) -> ServerState {
    let log: Arc<dyn EventLog> = log;
    ServerState::new(repo, log, ServerAuthConfig { jwt_secret: SECRET.into() })
}

async fn start_with(repo: Arc<dyn SystemRoleRepository>) -> anyhow::Result<TestApp> {
    let log = Arc::new(RecordingEventLog::new());
    let base_url = serve(build_router(state_for(repo, Arc::clone(&log)), cors())).await?;
    let token = issue_token(SECRET, Uuid::new_v4(), 300)?;
    Ok(TestApp { base_url, log, token })
}

async fn start_server() -> anyhow::Result<TestApp> {
    start_with(Arc::new(InMemorySystemRoleRepository::new())).await
}

fn client() -> reqwest::Client {
    reqwest::Client::new()
}

async fn create(app: &TestApp, body: Value) -> anyhow::Result<(HttpStatusCode, Value)> {
    let res = client().post(app.url("/system-roles")).bearer_auth(&app.token).json(&body).send().await?;
    let status = res.status();
    Ok((status, res.json::<Value>().await?))
}

fn assert_generic_500(status: HttpStatusCode, body: &Value) {
    assert_eq!(status, HttpStatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["hasError"], true);
    assert_eq!(body["message"], "ERROR: Requested operation failed.");
    assert_eq!(body["error"]["error"], GENERIC_ERROR);
    assert!(body.get("data").is_none());
}

/// Every call panics with a message that must never reach the client.
struct PanickingRepository;

#[async_trait]
impl SystemRoleRepository for PanickingRepository {
    async fn insert(&self, _record: Model) -> Result<Model, StoreError> {
        panic!("driver exploded: postgres://admin:hunter2@db")
    }
    async fn find_all(&self) -> Result<Vec<Model>, StoreError> {
        panic!("driver exploded: postgres://admin:hunter2@db")
    }
    async fn find_by_id(&self, _id: Uuid) -> Result<Option<Model>, StoreError> {
        panic!("driver exploded: postgres://admin:hunter2@db")
    }
    async fn update_by_id(&self, _id: Uuid, _patch: &SystemRolePatch, _actor: Uuid) -> Result<Option<Model>, StoreError> {
        panic!("driver exploded: postgres://admin:hunter2@db")
    }
}

/// Every call fails with an unclassified storage error.
struct UnavailableRepository;

#[async_trait]
impl SystemRoleRepository for UnavailableRepository {
    async fn insert(&self, _record: Model) -> Result<Model, StoreError> {
        Err(StoreError::Other("connection refused".into()))
    }
    async fn find_all(&self) -> Result<Vec<Model>, StoreError> {
        Err(StoreError::Other("connection refused".into()))
    }
    async fn find_by_id(&self, _id: Uuid) -> Result<Option<Model>, StoreError> {
        Err(StoreError::Other("connection refused".into()))
    }
    async fn update_by_id(&self, _id: Uuid, _patch: &SystemRolePatch, _actor: Uuid) -> Result<Option<Model>, StoreError> {
        Err(StoreError::Other("connection refused".into()))
    }
}

#[tokio::test]
async fn e2e_public_health() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client().get(app.url("/health")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn e2e_openapi_document_is_public() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client().get(app.url("/api-docs/openapi.json")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert!(body["paths"].get("/system-roles").is_some());
    Ok(())
}

#[tokio::test]
async fn e2e_create_returns_201_with_record() -> anyhow::Result<()> {
    let app = start_server().await?;
    let (status, body) = create(&app, json!({"name": "Admin", "permissions": ["roles.read"]})).await?;
    assert_eq!(status, HttpStatusCode::CREATED);
    assert_eq!(body["hasError"], false);
    assert_eq!(body["message"], "SUCCESS: Requested operation successful.");
    let role = &body["data"]["systemRole"];
    assert_eq!(role["name"], "Admin");
    assert_eq!(role["isDeleted"], false);
    assert_eq!(role["permissions"], json!(["roles.read"]));
    assert!(Uuid::parse_str(role["id"].as_str().unwrap_or_default()).is_ok());
    assert!(role.get("version").is_none());
    assert!(body.get("error").is_none());
    assert!(app.log.entries().is_empty());
    Ok(())
}

#[tokio::test]
async fn e2e_duplicate_name_is_409_and_logged_once() -> anyhow::Result<()> {
    let app = start_server().await?;
    let (first, _) = create(&app, json!({"name": "Admin"})).await?;
    assert_eq!(first, HttpStatusCode::CREATED);

    let (status, body) = create(&app, json!({"name": "Admin"})).await?;
    assert_eq!(status, HttpStatusCode::CONFLICT);
    assert_eq!(body["hasError"], true);
    assert_eq!(body["message"], "ERROR: Requested operation failed.");
    assert!(body["error"]["error"].as_str().unwrap_or_default().contains("Admin"));

    let entries = app.log.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].level, Level::Error);
    assert!(entries[0].message.contains("duplicate field(s)"));
    Ok(())
}

#[tokio::test]
async fn e2e_list_reports_total_in_creation_order() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client().get(app.url("/system-roles")).bearer_auth(&app.token).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["data"]["totalSystemRoles"], 0);
    assert_eq!(body["data"]["systemRoles"], json!([]));

    for name in ["Admin", "Viewer", "Auditor"] {
        let (status, _) = create(&app, json!({"name": name})).await?;
        assert_eq!(status, HttpStatusCode::CREATED);
    }
    let body = client().get(app.url("/system-roles")).bearer_auth(&app.token).send().await?.json::<Value>().await?;
    assert_eq!(body["data"]["totalSystemRoles"], 3);
    let names: Vec<&str> = body["data"]["systemRoles"]
        .as_array()
        .map(|a| a.iter().filter_map(|r| r["name"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(names, vec!["Admin", "Viewer", "Auditor"]);
    Ok(())
}

#[tokio::test]
async fn e2e_get_update_and_soft_delete() -> anyhow::Result<()> {
    let app = start_server().await?;
    let (_, body) = create(&app, json!({"name": "Ops", "description": "on call"})).await?;
    let id = body["data"]["systemRole"]["id"].as_str().unwrap_or_default().to_string();
    let c = client();

    let res = c.get(app.url(&format!("/system-roles/{id}"))).bearer_auth(&app.token).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?["data"]["systemRole"]["description"], "on call");

    let res = c
        .patch(app.url(&format!("/system-roles/{id}")))
        .bearer_auth(&app.token)
        .json(&json!({"permissions": ["ops.page"]}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let updated = res.json::<Value>().await?;
    assert_eq!(updated["data"]["systemRole"]["permissions"], json!(["ops.page"]));
    assert_eq!(updated["data"]["systemRole"]["name"], "Ops");
    assert!(updated["data"]["systemRole"]["updatedBy"].is_string());

    let res = c.delete(app.url(&format!("/system-roles/{id}"))).bearer_auth(&app.token).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let deleted = res.json::<Value>().await?;
    assert_eq!(deleted["data"]["systemRole"], json!(id));

    let res = c.get(app.url(&format!("/system-roles/{id}"))).bearer_auth(&app.token).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?["data"]["systemRole"]["isDeleted"], true);

    let res = c
        .put(app.url(&format!("/system-roles/{id}")))
        .bearer_auth(&app.token)
        .json(&json!({"isDeleted": false}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?["data"]["systemRole"]["isDeleted"], false);
    assert!(app.log.entries().is_empty());
    Ok(())
}

#[tokio::test]
async fn e2e_unknown_and_malformed_ids_are_404() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();
    for id in [Uuid::new_v4().to_string(), "not-a-valid-id".to_string()] {
        let res = c.get(app.url(&format!("/system-roles/{id}"))).bearer_auth(&app.token).send().await?;
        assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
        let body = res.json::<Value>().await?;
        assert_eq!(body["hasError"], true);
        assert_eq!(body["message"], "ERROR: Requested operation failed. System role not found.");
        assert_eq!(body["error"]["error"], "System role not found.");

        let res = c.delete(app.url(&format!("/system-roles/{id}"))).bearer_auth(&app.token).send().await?;
        assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    }
    assert_eq!(app.log.count(Level::Error), 4);
    Ok(())
}

#[tokio::test]
async fn e2e_undecodable_id_is_404() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();
    let url = app.url("/system-roles/%FF");

    let res = c.get(&url).bearer_auth(&app.token).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    let body = res.json::<Value>().await?;
    assert_eq!(body["message"], "ERROR: Requested operation failed. System role not found.");
    assert_eq!(body["error"]["error"], "System role not found.");

    let res = c.patch(&url).bearer_auth(&app.token).json(&json!({"name": "X"})).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    let res = c.delete(&url).bearer_auth(&app.token).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);

    let entries = app.log.entries();
    assert_eq!(entries.len(), 3);
    assert!(entries.iter().all(|e| e.level == Level::Error && e.message.contains("System role not found")));
    Ok(())
}

#[tokio::test]
async fn e2e_missing_or_invalid_token_is_401() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    let res = c.get(app.url("/system-roles")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::UNAUTHORIZED);
    assert_eq!(res.json::<Value>().await?["hasError"], true);

    let wrong = issue_token("other-secret", Uuid::new_v4(), 300)?;
    let res = c.post(app.url("/system-roles")).bearer_auth(wrong).json(&json!({"name": "X"})).send().await?;
    assert_eq!(res.status(), HttpStatusCode::UNAUTHORIZED);

    // Expired token signed with the right secret
    use jsonwebtoken::{encode, EncodingKey, Header};
    let now = std::time::SystemTime::now().duration_since(std::time::UNIX_EPOCH)?.as_secs() as usize;
    let claims = json!({"sub": Uuid::new_v4().to_string(), "exp": now.saturating_sub(3600)});
    let expired = encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET.as_bytes()))?;
    let res = c.get(app.url("/system-roles")).bearer_auth(expired).send().await?;
    assert_eq!(res.status(), HttpStatusCode::UNAUTHORIZED);

    // Subject that is not an actor id
    let claims = json!({"sub": "svc-user", "exp": now + 3600});
    let odd = encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET.as_bytes()))?;
    let res = c.get(app.url("/system-roles")).bearer_auth(odd).send().await?;
    assert_eq!(res.status(), HttpStatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn e2e_malformed_body_is_generic_500() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client()
        .post(app.url("/system-roles"))
        .bearer_auth(&app.token)
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await?;
    let status = res.status();
    let body = res.json::<Value>().await?;
    assert_generic_500(status, &body);
    let entries = app.log.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].message, "ERROR @ add_system_role");
    Ok(())
}

#[tokio::test]
async fn e2e_missing_actor_without_auth_layer_is_generic_500() -> anyhow::Result<()> {
    let log = Arc::new(RecordingEventLog::new());
    let repo: Arc<dyn SystemRoleRepository> = Arc::new(InMemorySystemRoleRepository::new());
    let base_url = serve(build_router_without_auth(state_for(repo, Arc::clone(&log)), cors())).await?;
    let c = client();

    let res = c.post(format!("{base_url}/system-roles")).json(&json!({"name": "Admin"})).send().await?;
    let status = res.status();
    assert_generic_500(status, &res.json::<Value>().await?);
    assert_eq!(log.count(Level::Error), 1);
    assert!(log.entries()[0].detail.as_deref().unwrap_or_default().contains("actor"));

    // Reads need no actor
    let res = c.get(format!("{base_url}/system-roles")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn e2e_panicking_storage_is_generic_500_without_detail() -> anyhow::Result<()> {
    let app = start_with(Arc::new(PanickingRepository)).await?;
    let res = client().get(app.url("/system-roles")).bearer_auth(&app.token).send().await?;
    let status = res.status();
    let text = res.text().await?;
    assert!(!text.contains("hunter2"));
    let body: Value = serde_json::from_str(&text)?;
    assert_generic_500(status, &body);

    let entries = app.log.entries();
    assert_eq!(entries.len(), 1);
    assert!(entries[0].detail.as_deref().unwrap_or_default().contains("driver exploded"));
    Ok(())
}

#[tokio::test]
async fn e2e_storage_failure_is_500_with_detail() -> anyhow::Result<()> {
    let app = start_with(Arc::new(UnavailableRepository)).await?;
    let res = client().get(app.url("/system-roles")).bearer_auth(&app.token).send().await?;
    assert_eq!(res.status(), HttpStatusCode::INTERNAL_SERVER_ERROR);
    let body = res.json::<Value>().await?;
    assert_eq!(body["message"], "ERROR: Requested operation failed.");
    assert!(body["error"]["error"].as_str().unwrap_or_default().contains("connection refused"));
    let entries = app.log.entries();
    assert_eq!(entries.len(), 1);
    assert!(entries[0].message.contains("Unknown database error"));
    Ok(())
}

#[tokio::test]
async fn e2e_postgres_backed_round_trip() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("DATABASE_URL missing; skip postgres e2e test.");
        return Ok(());
    }
    let db = models::db::connect().await?;
    if let Err(e) = migration::Migrator::up(&db, None).await { eprintln!("migrations notice: {}", e); }

    let app = start_with(Arc::new(SeaOrmSystemRoleRepository::new(db))).await?;
    let name = format!("e2e-{}", Uuid::new_v4());
    let (status, body) = create(&app, json!({"name": name})).await?;
    assert_eq!(status, HttpStatusCode::CREATED);
    let id = body["data"]["systemRole"]["id"].as_str().unwrap_or_default().to_string();

    let (status, _) = create(&app, json!({"name": name})).await?;
    assert_eq!(status, HttpStatusCode::CONFLICT);

    let res = client().delete(app.url(&format!("/system-roles/{id}"))).bearer_auth(&app.token).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    Ok(())
}
