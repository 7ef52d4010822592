//! Shared harness for router tests.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::app::{App, Repositories};
use crate::infrastructure::memory::InMemoryStore;
use crate::infrastructure::sqlite::SqliteRepositories;
use crate::stores::DEFAULT_PLAN_TTL;

pub struct TestResponse {
    pub status: StatusCode,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body)
            .unwrap_or_else(|e| panic!("body is not JSON ({e}): {}", self.body))
    }
}

pub struct TestServer {
    router: Router,
}

impl TestServer {
    pub fn in_memory() -> Self {
        Self::with_repositories(
            Repositories::in_memory(Arc::new(InMemoryStore::new())),
            DEFAULT_PLAN_TTL,
        )
    }

    pub async fn sqlite() -> Self {
        let repos = SqliteRepositories::in_memory().await.unwrap();
        Self::with_repositories(Repositories::sqlite(repos), DEFAULT_PLAN_TTL)
    }

    pub fn with_repositories(repositories: Repositories, plan_ttl: Duration) -> Self {
        let app = Arc::new(App::new(repositories, plan_ttl));
        Self {
            router: crate::api::http::routes().with_state(app),
        }
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        TestResponse {
            status,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn post_empty(&self, uri: &str) -> TestResponse {
        self.request(Method::POST, uri, None).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.request(Method::DELETE, uri, None).await
    }

    /// Register a user and return its id.
    pub async fn create_user(&self, email: &str, xp: u32) -> String {
        let response = self
            .post(
                "/api/users",
                json!({ "name": "Test Witcher", "email": email, "xp": xp }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        id_of(&response.json())
    }

    /// Register a user with the default sheet and return `(user_id, sheet)`.
    pub async fn create_seeded_user(&self, email: &str, xp: u32) -> (String, Value) {
        let user_id = self.create_user(email, xp).await;
        let response = self
            .post_empty(&format!("/api/users/{user_id}/sheet/defaults"))
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        (user_id, response.json())
    }

    pub async fn sheet(&self, user_id: &str) -> Value {
        let response = self.get(&format!("/api/users/{user_id}/sheet")).await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.body);
        response.json()
    }
}

pub fn id_of(value: &Value) -> String {
    value["id"]
        .as_str()
        .unwrap_or_else(|| panic!("no id in {value}"))
        .to_string()
}

pub fn statistic<'a>(sheet: &'a Value, short_name: &str) -> &'a Value {
    sheet["statistics"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["short_name"] == short_name)
        .unwrap_or_else(|| panic!("no statistic {short_name}"))
}

pub fn skill<'a>(sheet: &'a Value, name: &str) -> &'a Value {
    sheet["statistics"]
        .as_array()
        .unwrap()
        .iter()
        .flat_map(|s| s["skills"].as_array().unwrap())
        .find(|s| s["name"] == name)
        .unwrap_or_else(|| panic!("no skill {name}"))
}
