//! Shared test helpers for integration tests.

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::Value;
use sqlx::PgPool;
use tokio::sync::OnceCell;
use tower::ServiceExt;
use uuid::Uuid;

use orgtime_api::AppState;
use orgtime_auth::password::PasswordHasher;
use orgtime_core::config::AppConfig;
use orgtime_core::config::app::ServerConfig;
use orgtime_core::config::auth::AuthConfig;
use orgtime_core::config::database::DatabaseConfig;
use orgtime_core::config::logging::LoggingConfig;
use orgtime_entity::employee::{CreateEmployee, Employee};

static CLEANED: OnceCell<()> = OnceCell::const_new();

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Database pool for direct queries
    pub db_pool: PgPool,
    /// Shared state, for driving services directly
    pub state: AppState,
}

impl TestApp {
    /// Creates a new test application, or `None` when no test database
    /// is configured.
    pub async fn new() -> Option<Self> {
        let url = match std::env::var("ORGTIME_TEST_DATABASE_URL") {
            Ok(url) => url,
            Err(_) => {
                eprintln!("ORGTIME_TEST_DATABASE_URL not set; skipping integration test");
                return None;
            }
        };

        let config = test_config(url);

        let database = orgtime_database::connection::DatabasePool::connect(&config.database)
            .await
            .expect("Failed to connect to test database");

        orgtime_database::migration::run_migrations(database.pool())
            .await
            .expect("Failed to run migrations");

        let db_pool = database.into_pool();

        // Clean once per test run; tests use unique usernames so they
        // can share the database within a run.
        CLEANED
            .get_or_init(|| async {
                Self::clean_database(&db_pool).await;
            })
            .await;

        let state = orgtime_api::build_state(config, db_pool.clone())
            .expect("Failed to build app state");
        let router = orgtime_api::build_app(state.clone());

        Some(Self {
            router,
            db_pool,
            state,
        })
    }

    /// Clean all test data from the database
    async fn clean_database(pool: &PgPool) {
        let tables = ["employee_hierarchy", "employees", "users"];

        for table in &tables {
            let query = format!("DELETE FROM {table}");
            let _ = sqlx::query(&query).execute(pool).await;
        }
    }

    /// Create a test user and return their ID
    pub async fn create_test_user(
        &self,
        username: &str,
        password: &str,
        is_superuser: bool,
    ) -> Uuid {
        let hash = PasswordHasher::new()
            .hash_password(password)
            .expect("Failed to hash password");

        sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO users (username, password_hash, is_superuser)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(username)
        .bind(&hash)
        .bind(is_superuser)
        .fetch_one(&self.db_pool)
        .await
        .expect("Failed to create test user")
    }

    /// Create an employee record through the service layer
    pub async fn create_test_employee(&self, user_id: Uuid, name: &str) -> Employee {
        self.state
            .employee_service
            .create_employee(&CreateEmployee {
                user_id,
                first_name: name.to_string(),
                last_name: "Test".to_string(),
            })
            .await
            .expect("Failed to create test employee")
    }

    /// Login and return JWT access token
    pub async fn login(&self, username: &str, password: &str) -> String {
        let body = serde_json::json!({
            "username": username,
            "password": password,
        });

        let response = self
            .request("POST", "/api/auth/login", Some(body), None)
            .await;

        assert_eq!(
            response.status,
            StatusCode::OK,
            "Login failed: {:?}",
            response.body
        );

        response.body["data"]["tokens"]["access_token"]
            .as_str()
            .expect("No access_token in login response")
            .to_string()
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Builds the in-code test configuration.
fn test_config(url: String) -> AppConfig {
    AppConfig {
        server: ServerConfig::default(),
        database: DatabaseConfig {
            url,
            max_connections: 5,
            min_connections: 1,
            connect_timeout_seconds: 10,
            idle_timeout_seconds: 300,
        },
        auth: AuthConfig {
            jwt_secret: "integration-test-secret".to_string(),
            ..AuthConfig::default()
        },
        logging: LoggingConfig::default(),
    }
}

/// Generates a unique username so parallel tests never collide.
pub fn unique(prefix: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{prefix}_{}", &suffix[..8])
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}
