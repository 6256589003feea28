use std::{error::Error, sync::Arc};

use chrono::{DateTime, Utc};
use rxlite::subscribe::{Handlers, Unsubscribeable};
use rxlite::{Observable, Subscribeable};
use tracing::info;
use tracing_subscriber::EnvFilter;

const HTTP_POST_METHOD: &str = "POST";
const HTTP_GET_METHOD: &str = "GET";

const HTTP_STATUS_OK: u16 = 200;
const HTTP_STATUS_INTERNAL_SERVER_ERROR: u16 = 500;

#[derive(Debug, Clone)]
struct User {
    name: String,
    age: u32,
    roles: Vec<String>,
    created_at: DateTime<Utc>,
    is_deleted: bool,
}

#[derive(Debug, Clone, Default)]
struct Params {
    id: Option<String>,
}

#[derive(Debug, Clone)]
struct MockRequest {
    method: &'static str,
    host: String,
    path: String,
    body: Option<User>,
    params: Params,
}

#[derive(Debug)]
struct Response {
    status: u16,
}

fn user_mock() -> User {
    User {
        name: "User Name".to_string(),
        age: 26,
        roles: vec!["user".to_string(), "admin".to_string()],
        created_at: Utc::now(),
        is_deleted: false,
    }
}

fn requests_mock() -> Vec<MockRequest> {
    vec![
        MockRequest {
            method: HTTP_POST_METHOD,
            host: "service.example".to_string(),
            path: "user".to_string(),
            body: Some(user_mock()),
            params: Params::default(),
        },
        MockRequest {
            method: HTTP_GET_METHOD,
            host: "service.example".to_string(),
            path: "user".to_string(),
            body: None,
            params: Params {
                id: Some("3f5h67s4s".to_string()),
            },
        },
    ]
}

fn handle_request(request: MockRequest) -> Response {
    info!(
        method = request.method,
        url = %format!("{}/{}", request.host, request.path),
        id = ?request.params.id,
        user = ?request.body.as_ref().map(|u| (&u.name, u.age, &u.roles, u.created_at, u.is_deleted)),
        "handling request"
    );
    Response {
        status: HTTP_STATUS_OK,
    }
}

fn handle_error(error: Arc<dyn Error + Send + Sync>) -> Response {
    tracing::error!(%error, "request stream failed");
    Response {
        status: HTTP_STATUS_INTERNAL_SERVER_ERROR,
    }
}

fn handle_complete() {
    info!("complete");
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let requests = Observable::from(requests_mock());

    let subscription = requests.subscribe(Handlers::new(
        |request: MockRequest| {
            let response = handle_request(request);
            info!(status = response.status, "responded");
        },
        |error| {
            let response = handle_error(error);
            info!(status = response.status, "responded");
        },
        handle_complete,
    ));

    subscription.unsubscribe();
}
