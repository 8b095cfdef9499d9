//! Integration tests for the `/employees` HTTP surface.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use employee_core::db::open_db_in_memory;
use employee_core::{
    Employee, EmployeeChanges, EmployeeDraft, EmployeeId, EmployeeRepository, RepoError,
    RepoResult, SharedEmployeeStore,
};
use employee_server::{employee_router, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

struct TestResponse {
    status: StatusCode,
    text: String,
}

impl TestResponse {
    fn json(&self) -> Value {
        serde_json::from_str(&self.text).expect("response body should be JSON")
    }
}

fn sqlite_router() -> Router {
    let conn = open_db_in_memory().expect("in-memory db");
    let store = SharedEmployeeStore::try_new(conn).expect("store");
    employee_router(AppState::with_shared_store(store))
}

fn fake_router(store: impl EmployeeRepository + Send + Sync + 'static) -> Router {
    employee_router(AppState::new(Arc::new(store)))
}

async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(payload) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    };
    send_request(router, request).await
}

async fn send_request(router: &Router, request: Request<Body>) -> TestResponse {
    let response = router.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("body");
    TestResponse {
        status,
        text: String::from_utf8(bytes.to_vec()).expect("utf-8 body"),
    }
}

async fn create(router: &Router, body: Value) -> String {
    let response = send(router, Method::POST, "/employees", Some(body)).await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.text);
    response.json()["id"]
        .as_str()
        .expect("id should be a string")
        .to_string()
}

#[tokio::test]
async fn list_on_empty_store_returns_empty_array() {
    let router = sqlite_router();

    let response = send(&router, Method::GET, "/employees", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), json!([]));
}

#[tokio::test]
async fn list_returns_every_record_with_its_fields() {
    let router = sqlite_router();
    let first = create(
        &router,
        json!({ "name": "John Doe", "position": "Developer", "level": "mid" }),
    )
    .await;
    let second = create(
        &router,
        json!({ "name": "Jane Smith", "position": "Designer", "level": "senior" }),
    )
    .await;

    let response = send(&router, Method::GET, "/employees", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.json(),
        json!([
            { "id": first, "name": "John Doe", "position": "Developer", "level": "mid" },
            { "id": second, "name": "Jane Smith", "position": "Designer", "level": "senior" }
        ])
    );
}

#[tokio::test]
async fn create_returns_201_and_record_is_retrievable() {
    let router = sqlite_router();

    let response = send(
        &router,
        Method::POST,
        "/employees",
        Some(json!({ "name": "New Employee", "position": "Tester", "level": "junior" })),
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED);
    let body = response.json();
    assert_eq!(body["message"], "Employee created successfully");
    let id = body["id"].as_str().expect("id").to_string();
    assert!(Uuid::parse_str(&id).is_ok());

    let fetched = send(&router, Method::GET, &format!("/employees/{id}"), None).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(
        fetched.json(),
        json!({ "id": id, "name": "New Employee", "position": "Tester", "level": "junior" })
    );
}

#[tokio::test]
async fn create_ignores_client_supplied_id() {
    let router = sqlite_router();
    let chosen = Uuid::new_v4().to_string();

    let id = create(
        &router,
        json!({ "id": chosen, "name": "A", "position": "B", "level": "mid" }),
    )
    .await;
    assert_ne!(id, chosen);
}

#[tokio::test]
async fn create_with_incomplete_document_returns_400_with_store_message() {
    let router = sqlite_router();

    let response = send(
        &router,
        Method::POST,
        "/employees",
        Some(json!({ "name": "Incomplete" })),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(
        response.text.contains("NOT NULL constraint failed"),
        "unexpected body: {}",
        response.text
    );

    let listed = send(&router, Method::GET, "/employees", None).await;
    assert_eq!(listed.json(), json!([]));
}

#[tokio::test]
async fn create_with_malformed_json_returns_400() {
    let router = sqlite_router();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/employees")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": "))
        .expect("request");
    let response = send_request(&router, request).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(!response.text.is_empty());
}

#[tokio::test]
async fn create_with_wrongly_typed_field_returns_400() {
    let router = sqlite_router();

    let response = send(
        &router,
        Method::POST,
        "/employees",
        Some(json!({ "name": 7, "position": "Tester", "level": "junior" })),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unrecognized_level_is_accepted_and_round_trips() {
    let router = sqlite_router();
    let id = create(
        &router,
        json!({ "name": "Grace", "position": "Admiral", "level": "principal" }),
    )
    .await;

    let fetched = send(&router, Method::GET, &format!("/employees/{id}"), None).await;
    assert_eq!(fetched.json()["level"], "principal");
}

#[tokio::test]
async fn get_unknown_id_returns_404_text() {
    let router = sqlite_router();

    let response = send(
        &router,
        Method::GET,
        &format!("/employees/{}", Uuid::new_v4()),
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.text, "Employee not found");
}

#[tokio::test]
async fn malformed_id_surfaces_as_500_on_every_id_route() {
    let router = sqlite_router();

    for (method, body) in [
        (Method::GET, None),
        (Method::PUT, Some(json!({ "name": "Test" }))),
        (Method::DELETE, None),
    ] {
        let response = send(&router, method.clone(), "/employees/not-a-valid-id", body).await;
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR, "{method}");
        assert!(response.text.contains("not-a-valid-id"), "{}", response.text);
    }
}

#[tokio::test]
async fn update_level_then_get_reflects_change() {
    let router = sqlite_router();
    let id = create(
        &router,
        json!({ "name": "John Doe", "position": "Developer", "level": "mid" }),
    )
    .await;

    let response = send(
        &router,
        Method::PUT,
        &format!("/employees/{id}"),
        Some(json!({ "level": "senior" })),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.json(),
        json!({ "message": "Employee updated successfully" })
    );

    let fetched = send(&router, Method::GET, &format!("/employees/{id}"), None).await;
    assert_eq!(
        fetched.json(),
        json!({ "id": id, "name": "John Doe", "position": "Developer", "level": "senior" })
    );
}

#[tokio::test]
async fn update_with_full_body_replaces_fields_but_not_id() {
    let router = sqlite_router();
    let id = create(
        &router,
        json!({ "name": "John Doe", "position": "Developer", "level": "mid" }),
    )
    .await;

    let response = send(
        &router,
        Method::PUT,
        &format!("/employees/{id}"),
        Some(json!({
            "id": Uuid::new_v4().to_string(),
            "name": "Updated Name",
            "position": "Senior Developer",
            "level": "senior"
        })),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);

    let fetched = send(&router, Method::GET, &format!("/employees/{id}"), None).await;
    assert_eq!(
        fetched.json(),
        json!({
            "id": id,
            "name": "Updated Name",
            "position": "Senior Developer",
            "level": "senior"
        })
    );
}

#[tokio::test]
async fn update_unknown_id_returns_404_text() {
    let router = sqlite_router();

    let response = send(
        &router,
        Method::PUT,
        &format!("/employees/{}", Uuid::new_v4()),
        Some(json!({ "name": "Test" })),
    )
    .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.text, "Employee not found");
}

#[tokio::test]
async fn update_without_json_content_type_changes_nothing() {
    let router = sqlite_router();
    let id = create(
        &router,
        json!({ "name": "Ada", "position": "Engineer", "level": "mid" }),
    )
    .await;

    let request = Request::builder()
        .method(Method::PUT)
        .uri(format!("/employees/{id}"))
        .body(Body::from(r#"{"level":"senior"}"#))
        .expect("request");
    let response = send_request(&router, request).await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.text);
    assert_eq!(
        response.json(),
        json!({ "message": "Employee updated successfully" })
    );

    let loaded = send(&router, Method::GET, &format!("/employees/{id}"), None).await;
    assert_eq!(loaded.json()["level"], "mid");

    let missing = send(
        &router,
        Method::PUT,
        &format!("/employees/{}", Uuid::new_v4()),
        None,
    )
    .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.text, "Employee not found");
}

#[tokio::test]
async fn create_without_json_content_type_is_refused_by_store() {
    let router = sqlite_router();

    let response = send(&router, Method::POST, "/employees", None).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(
        response.text.contains("NOT NULL constraint failed"),
        "unexpected body: {}",
        response.text
    );
}

#[tokio::test]
async fn collection_routes_accept_trailing_slash() {
    let router = sqlite_router();

    let created = send(
        &router,
        Method::POST,
        "/employees/",
        Some(json!({ "name": "Ada", "position": "Engineer", "level": "senior" })),
    )
    .await;
    assert_eq!(created.status, StatusCode::CREATED, "{}", created.text);

    let listed = send(&router, Method::GET, "/employees/", None).await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.json().as_array().map(Vec::len), Some(1));
    assert_eq!(listed.json()[0]["name"], "Ada");
}

#[tokio::test]
async fn delete_then_get_returns_404() {
    let router = sqlite_router();
    let id = create(
        &router,
        json!({ "name": "Temp", "position": "Contractor", "level": "junior" }),
    )
    .await;

    let response = send(&router, Method::DELETE, &format!("/employees/{id}"), None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.json(),
        json!({ "message": "Employee deleted successfully" })
    );

    let fetched = send(&router, Method::GET, &format!("/employees/{id}"), None).await;
    assert_eq!(fetched.status, StatusCode::NOT_FOUND);
    assert_eq!(fetched.text, "Employee not found");
}

#[tokio::test]
async fn deleting_twice_returns_200_then_404() {
    let router = sqlite_router();
    let id = create(
        &router,
        json!({ "name": "Twice", "position": "Tester", "level": "mid" }),
    )
    .await;
    let uri = format!("/employees/{id}");

    let first = send(&router, Method::DELETE, &uri, None).await;
    assert_eq!(first.status, StatusCode::OK);

    let second = send(&router, Method::DELETE, &uri, None).await;
    assert_eq!(second.status, StatusCode::NOT_FOUND);
    assert_eq!(second.text, "Employee not found");
}

#[tokio::test]
async fn concurrent_creates_are_all_listed() {
    let router = sqlite_router();

    let tasks = (0..16)
        .map(|index| {
            let router = router.clone();
            tokio::spawn(async move {
                create(
                    &router,
                    json!({ "name": format!("worker {index}"), "position": "Tester", "level": "junior" }),
                )
                .await
            })
        })
        .collect::<Vec<_>>();
    for task in tasks {
        task.await.expect("create task");
    }

    let response = send(&router, Method::GET, "/employees", None).await;
    assert_eq!(response.json().as_array().map(Vec::len), Some(16));
}

/// Store whose every call fails with a fixed connection error.
struct FailingStore {
    message: &'static str,
}

impl FailingStore {
    fn fail<T>(&self) -> RepoResult<T> {
        Err(RepoError::Connection(self.message.to_string()))
    }
}

impl EmployeeRepository for FailingStore {
    fn list_employees(&self) -> RepoResult<Vec<Employee>> {
        self.fail()
    }

    fn find_employee(&self, _id: &str) -> RepoResult<Option<Employee>> {
        self.fail()
    }

    fn insert_employee(&self, _draft: &EmployeeDraft) -> RepoResult<EmployeeId> {
        self.fail()
    }

    fn update_employee(&self, _id: &str, _changes: &EmployeeChanges) -> RepoResult<u64> {
        self.fail()
    }

    fn delete_employee(&self, _id: &str) -> RepoResult<u64> {
        self.fail()
    }
}

#[tokio::test]
async fn store_failure_during_list_passes_message_through() {
    let router = fake_router(FailingStore {
        message: "Database error",
    });

    let response = send(&router, Method::GET, "/employees", None).await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.text, "Database error");
}

#[tokio::test]
async fn store_failure_maps_per_operation() {
    let router = fake_router(FailingStore {
        message: "Database error",
    });
    let uri = format!("/employees/{}", Uuid::new_v4());

    let get = send(&router, Method::GET, &uri, None).await;
    assert_eq!(get.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(get.text, "Database error");

    let update = send(&router, Method::PUT, &uri, Some(json!({ "name": "x" }))).await;
    assert_eq!(update.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(update.text, "Database error");

    let delete = send(&router, Method::DELETE, &uri, None).await;
    assert_eq!(delete.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(delete.text, "Database error");

    let create = send(
        &router,
        Method::POST,
        "/employees",
        Some(json!({ "name": "n", "position": "p", "level": "mid" })),
    )
    .await;
    assert_eq!(create.status, StatusCode::BAD_REQUEST);
    assert_eq!(create.text, "Database error");
}

/// Store that panics inside every call and counts how often it was reached.
#[derive(Default)]
struct PanickingStore {
    calls: AtomicUsize,
}

impl PanickingStore {
    fn explode<T>(&self) -> RepoResult<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        panic!("store exploded");
    }
}

impl EmployeeRepository for PanickingStore {
    fn list_employees(&self) -> RepoResult<Vec<Employee>> {
        self.explode()
    }

    fn find_employee(&self, _id: &str) -> RepoResult<Option<Employee>> {
        self.explode()
    }

    fn insert_employee(&self, _draft: &EmployeeDraft) -> RepoResult<EmployeeId> {
        self.explode()
    }

    fn update_employee(&self, _id: &str, _changes: &EmployeeChanges) -> RepoResult<u64> {
        self.explode()
    }

    fn delete_employee(&self, _id: &str) -> RepoResult<u64> {
        self.explode()
    }
}

#[tokio::test]
async fn panicking_store_becomes_500_and_server_keeps_serving() {
    let store = Arc::new(PanickingStore::default());
    let router = employee_router(AppState::new(store.clone()));

    let first = send(&router, Method::GET, "/employees", None).await;
    assert_eq!(first.status, StatusCode::INTERNAL_SERVER_ERROR);

    let second = send(&router, Method::DELETE, "/employees/anything", None).await;
    assert_eq!(second.status, StatusCode::INTERNAL_SERVER_ERROR);

    assert_eq!(store.calls.load(Ordering::SeqCst), 2);
}
