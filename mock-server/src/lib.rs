use std::{
    collections::{BTreeMap, HashMap, HashSet},
    sync::Arc,
};

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use md5::{Digest, Md5};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// Operations the mock answers besides `auth.getToken`.
pub const OPERATIONS: [&str; 8] = [
    "breed.list",
    "pet.get",
    "pet.getRandom",
    "pet.find",
    "shelter.find",
    "shelter.get",
    "shelter.getPets",
    "shelter.listByBreed",
];

#[derive(Clone, Debug)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
}

impl Credentials {
    pub fn new(api_key: &str, api_secret: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            api_secret: api_secret.to_string(),
        }
    }

    /// Signature the client must send with `auth.getToken`.
    pub fn expected_signature(&self, format: &str) -> String {
        let input = format!("{}key={}&format={format}", self.api_secret, self.api_key);
        format!("{:x}", Md5::digest(input.as_bytes()))
    }
}

pub struct AppState {
    credentials: Credentials,
    tokens: RwLock<HashSet<String>>,
}

pub type Db = Arc<AppState>;

pub fn app(credentials: Credentials) -> Router {
    let state: Db = Arc::new(AppState {
        credentials,
        tokens: RwLock::new(HashSet::new()),
    });
    Router::new()
        .route("/{method}", get(dispatch))
        .with_state(state)
}

pub async fn run(listener: TcpListener, credentials: Credentials) -> Result<(), std::io::Error> {
    axum::serve(listener, app(credentials)).await
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    Json,
    Xml,
}

impl Format {
    fn parse(value: Option<&String>) -> Option<Self> {
        match value.map(String::as_str) {
            Some("json") => Some(Format::Json),
            Some("xml") => Some(Format::Xml),
            _ => None,
        }
    }
}

async fn dispatch(
    State(state): State<Db>,
    Path(method): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    tracing::debug!(%method, ?params, "mock request");

    let Some(format) = Format::parse(params.get("format")) else {
        return (StatusCode::BAD_REQUEST, "format must be json or xml").into_response();
    };
    if params.get("key") != Some(&state.credentials.api_key) {
        return reply(format, StatusCode::FORBIDDEN, failure(format, "Invalid key"));
    }

    if method == "auth.getToken" {
        let expected = state.credentials.expected_signature(params["format"].as_str());
        if params.get("sig") != Some(&expected) {
            return reply(format, StatusCode::UNAUTHORIZED, failure(format, "Invalid signature"));
        }
        let token = Uuid::new_v4().simple().to_string();
        state.tokens.write().await.insert(token.clone());
        return reply(format, StatusCode::OK, token_body(format, &token));
    }

    if !OPERATIONS.contains(&method.as_str()) {
        return reply(format, StatusCode::NOT_FOUND, failure(format, "Unknown method"));
    }
    if let Some(token) = params.get("token") {
        if !state.tokens.read().await.contains(token) {
            return reply(format, StatusCode::UNAUTHORIZED, failure(format, "Invalid token"));
        }
    }

    let echoed: BTreeMap<&str, &str> = params
        .iter()
        .filter(|(k, _)| !matches!(k.as_str(), "key" | "format"))
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    reply(format, StatusCode::OK, echo_body(format, &method, &echoed))
}

fn reply(format: Format, status: StatusCode, body: String) -> Response {
    let content_type = match format {
        Format::Json => "application/json",
        Format::Xml => "text/xml",
    };
    (status, [(header::CONTENT_TYPE, content_type)], body).into_response()
}

fn token_body(format: Format, token: &str) -> String {
    match format {
        Format::Json => json!({
            "petfinder": {
                "header": { "status": { "code": { "$t": "100" } } },
                "auth": { "token": { "$t": token }, "expires": { "$t": "3600" } }
            }
        })
        .to_string(),
        Format::Xml => format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?><petfinder><header><status><code>100</code></status></header><auth><token>{token}</token><expires>3600</expires></auth></petfinder>"
        ),
    }
}

fn failure(format: Format, message: &str) -> String {
    match format {
        Format::Json => json!({
            "petfinder": { "header": { "status": { "code": { "$t": "300" }, "message": { "$t": message } } } }
        })
        .to_string(),
        Format::Xml => format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?><petfinder><header><status><code>300</code><message>{}</message></status></header></petfinder>",
            escape_xml(message)
        ),
    }
}

fn echo_body(format: Format, method: &str, params: &BTreeMap<&str, &str>) -> String {
    match format {
        Format::Json => {
            let params: serde_json::Map<String, serde_json::Value> = params
                .iter()
                .map(|(k, v)| (k.to_string(), json!({ "$t": v })))
                .collect();
            json!({ "petfinder": { "method": { "$t": method }, "params": params } }).to_string()
        }
        Format::Xml => {
            let params: String = params
                .iter()
                .map(|(k, v)| format!("<param name=\"{}\">{}</param>", escape_xml(k), escape_xml(v)))
                .collect();
            format!(
                "<?xml version=\"1.0\" encoding=\"UTF-8\"?><petfinder><method>{}</method><params>{params}</params></petfinder>",
                escape_xml(method)
            )
        }
    }
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
