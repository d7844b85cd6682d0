use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::{Value, json};

use stockroom_api::app::{build_app, services};
use stockroom_api::config::DatabaseConfig;

struct TestServer {
    base_url: String,
    client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        Self::spawn_with(services::in_memory_service()).await
    }

    async fn spawn_sqlite() -> Self {
        let database = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
        };
        let service = services::build_service(&database)
            .await
            .expect("failed to open sqlite store");
        Self::spawn_with(service).await
    }

    async fn spawn_with(service: services::AppService) -> Self {
        // Build app (same router as prod), but bind to an ephemeral port.
        let app = build_app(Arc::new(service));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            client: reqwest::Client::new(),
            handle,
        }
    }

    async fn post(&self, path: &str, body: Value) -> (StatusCode, Value) {
        let res = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = res.status();
        (status, res.json().await.unwrap_or(Value::Null))
    }

    async fn put(&self, path: &str, body: Value) -> (StatusCode, Value) {
        let res = self
            .client
            .put(format!("{}{}", self.base_url, path))
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = res.status();
        (status, res.json().await.unwrap_or(Value::Null))
    }

    async fn get(&self, path: &str) -> (StatusCode, Value) {
        let res = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .unwrap();
        let status = res.status();
        (status, res.json().await.unwrap_or(Value::Null))
    }

    async fn seed(&self, products: &[&str], locations: &[&str]) {
        for p in products {
            let (status, _) = self
                .post("/products", json!({ "product_id": p, "name": format!("Product {p}") }))
                .await;
            assert_eq!(status, StatusCode::CREATED);
        }
        for l in locations {
            let (status, _) = self
                .post("/locations", json!({ "location_id": l, "name": format!("Location {l}") }))
                .await;
            assert_eq!(status, StatusCode::CREATED);
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[tokio::test]
async fn health_is_public_and_ok() {
    let srv = TestServer::spawn().await;

    let res = srv
        .client
        .get(format!("{}/health", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn product_crud_round_trip() {
    let srv = TestServer::spawn().await;

    let (status, body) = srv
        .post(
            "/products",
            json!({ "product_id": " A ", "name": "Widget", "description": "blue" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["product_id"], "A");

    let (status, body) = srv
        .put("/products/A", json!({ "name": "Widget v2", "description": "" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Widget v2");
    assert_eq!(body["description"], Value::Null);

    let (status, body) = srv.get("/products/A").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Widget v2");

    let (status, body) = srv.get("/products/B").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn duplicate_product_is_conflict_and_keeps_original() {
    let srv = TestServer::spawn().await;
    srv.seed(&["A"], &[]).await;

    let (status, body) = srv
        .post("/products", json!({ "product_id": "A", "name": "Other" }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "duplicate_key");

    let (_, body) = srv.get("/products/A").await;
    assert_eq!(body["name"], "Product A");
}

#[tokio::test]
async fn editing_missing_location_is_not_found() {
    let srv = TestServer::spawn().await;

    let (status, body) = srv.put("/locations/X", json!({ "name": "Shelf" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn report_reflects_inflow_and_transfer() {
    let srv = TestServer::spawn().await;
    srv.seed(&["A", "B"], &["X", "Y"]).await;

    let (status, _) = srv
        .post(
            "/movements",
            json!({ "movement_id": "M1", "to_location": "X", "product_id": "A", "qty": 10 }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = srv
        .post(
            "/movements",
            json!({
                "movement_id": "M2",
                "from_location": "X",
                "to_location": "Y",
                "product_id": "A",
                "qty": "4",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["kind"], "transfer");

    let (status, report) = srv.get("/report").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["balance"]["A"]["X"], 6);
    assert_eq!(report["balance"]["A"]["Y"], 4);
    assert_eq!(report["balance"]["B"]["X"], 0);
    assert_eq!(report["balance"]["B"]["Y"], 0);
    assert_eq!(report["rows"][0]["total"], 10);
    assert_eq!(report["locations"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn movement_edit_replaces_previous_effect() {
    let srv = TestServer::spawn().await;
    srv.seed(&["A"], &["X"]).await;

    srv.post(
        "/movements",
        json!({ "movement_id": "M1", "to_location": "X", "product_id": "A", "qty": 10 }),
    )
    .await;

    let (status, _) = srv
        .put(
            "/movements/M1",
            json!({ "to_location": "X", "product_id": "A", "qty": 3 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, report) = srv.get("/report").await;
    assert_eq!(report["balance"]["A"]["X"], 3);
}

#[tokio::test]
async fn invalid_movements_are_unprocessable() {
    let srv = TestServer::spawn().await;
    srv.seed(&["A"], &["X"]).await;

    let cases = [
        (
            json!({ "to_location": "X", "product_id": "NOPE", "qty": 1 }),
            "invalid_reference",
        ),
        (
            json!({ "to_location": "X", "product_id": "A", "qty": "ten" }),
            "invalid_quantity",
        ),
        (
            json!({ "to_location": "X", "product_id": "A", "qty": 0 }),
            "invalid_quantity",
        ),
        (
            json!({ "from_location": "", "to_location": " ", "product_id": "A", "qty": 1 }),
            "invalid_movement",
        ),
    ];

    for (body, code) in cases {
        let (status, err) = srv.post("/movements", body).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err["error"], code);
    }

    let (_, movements) = srv.get("/movements").await;
    assert_eq!(movements, json!([]));
}

#[tokio::test]
async fn movement_onto_its_own_location_nets_to_zero() {
    let srv = TestServer::spawn().await;
    srv.seed(&["A"], &["X"]).await;

    let (status, body) = srv
        .post(
            "/movements",
            json!({ "movement_id": "M1", "from_location": "X", "to_location": "X", "product_id": "A", "qty": 5 }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["kind"], "transfer");

    let (_, report) = srv.get("/report").await;
    assert_eq!(report["balance"]["A"]["X"], 0);
}

#[tokio::test]
async fn unreadable_bodies_use_the_error_shape() {
    let srv = TestServer::spawn().await;
    srv.seed(&["A"], &["X"]).await;

    let (status, err) = srv
        .post("/movements", json!({ "to_location": "X", "product_id": "A", "qty": 2.5 }))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(err["error"], "invalid_body");
    assert!(err["message"].is_string());

    let (status, err) = srv.post("/products", json!({ "product_id": "B" })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(err["error"], "invalid_body");

    let res = srv
        .client
        .post(format!("{}/products", srv.base_url))
        .header("content-type", "application/json")
        .body("{")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let err: Value = res.json().await.unwrap();
    assert_eq!(err["error"], "malformed_json");
    assert!(err["message"].is_string());

    let (_, movements) = srv.get("/movements").await;
    assert_eq!(movements, json!([]));
}

#[tokio::test]
async fn movement_without_id_gets_generated_id() {
    let srv = TestServer::spawn().await;
    srv.seed(&["A"], &["X"]).await;

    let (status, body) = srv
        .post("/movements", json!({ "to_location": "X", "product_id": "A", "qty": 5 }))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let id = body["movement_id"].as_str().unwrap().to_string();
    assert!(!id.is_empty());

    let (status, fetched) = srv.get(&format!("/movements/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["qty"], 5);
    assert_eq!(fetched["kind"], "inflow");
}

#[tokio::test]
async fn sqlite_backend_serves_the_same_api() {
    let srv = TestServer::spawn_sqlite().await;
    srv.seed(&["A"], &["X", "Y"]).await;

    srv.post(
        "/movements",
        json!({ "movement_id": "M1", "to_location": "X", "product_id": "A", "qty": 10 }),
    )
    .await;
    let (status, _) = srv
        .post(
            "/movements",
            json!({ "movement_id": "M2", "from_location": "X", "product_id": "A", "qty": 4 }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = srv
        .post(
            "/movements",
            json!({ "movement_id": "M1", "to_location": "Y", "product_id": "A", "qty": 1 }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, report) = srv.get("/report").await;
    assert_eq!(report["balance"]["A"]["X"], 6);
    assert_eq!(report["balance"]["A"]["Y"], 0);

    let (_, products) = srv.get("/products").await;
    assert_eq!(products.as_array().map(Vec::len), Some(1));
}
