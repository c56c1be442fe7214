use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use mock_server::{app, Credentials};
use tower::ServiceExt;

// md5("s3cretkey=test-key&format=xml") / md5("s3cretkey=test-key&format=json")
const XML_SIG: &str = "12abcf87b4998c80567e59e04ee6a20c";
const JSON_SIG: &str = "06cd109efecb9e3d0c8b50b8e9f530d5";

fn test_app() -> Router {
    app(Credentials::new("test-key", "s3cret"))
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes: bytes::Bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn get(app: &Router, uri: &str) -> axum::response::Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(String::new()).unwrap())
        .await
        .unwrap()
}

fn xml_token(body: &str) -> String {
    let start = body.find("<token>").unwrap() + "<token>".len();
    let end = body.find("</token>").unwrap();
    body[start..end].to_string()
}

// --- boilerplate ---

#[tokio::test]
async fn missing_format_returns_400() {
    let resp = get(&test_app(), "/pet.find?key=test-key&location=90210").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn wrong_key_returns_403() {
    let resp = get(&test_app(), "/pet.find?key=nope&format=xml&location=90210").await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert!(body_text(resp).await.contains("<message>Invalid key</message>"));
}

#[tokio::test]
async fn unknown_method_returns_404() {
    let resp = get(&test_app(), "/pet.adopt?key=test-key&format=json").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- auth.getToken ---

#[tokio::test]
async fn auth_get_token_xml() {
    let uri = format!("/auth.getToken?key=test-key&format=xml&sig={XML_SIG}");
    let resp = get(&test_app(), &uri).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["content-type"], "text/xml");
    let token = xml_token(&body_text(resp).await);
    assert_eq!(token.len(), 32);
}

#[tokio::test]
async fn auth_get_token_json() {
    let uri = format!("/auth.getToken?key=test-key&format=json&sig={JSON_SIG}");
    let resp = get(&test_app(), &uri).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body_text(resp).await).unwrap();
    assert_eq!(body["petfinder"]["auth"]["token"]["$t"].as_str().unwrap().len(), 32);
}

#[tokio::test]
async fn auth_get_token_signature_depends_on_format() {
    let uri = format!("/auth.getToken?key=test-key&format=json&sig={XML_SIG}");
    let resp = get(&test_app(), &uri).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn auth_get_token_without_sig_returns_401() {
    let resp = get(&test_app(), "/auth.getToken?key=test-key&format=xml").await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// --- operations ---

#[tokio::test]
async fn pet_find_echoes_params_in_xml() {
    let resp = get(&test_app(), "/pet.find?key=test-key&format=xml&location=90210").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_text(resp).await;
    assert!(body.contains("<method>pet.find</method>"));
    assert!(body.contains(r#"<param name="location">90210</param>"#));
    assert!(!body.contains("test-key"));
}

#[tokio::test]
async fn shelter_get_echoes_params_in_json() {
    let resp = get(&test_app(), "/shelter.get?key=test-key&format=json&id=CA12").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["content-type"], "application/json");
    let body: serde_json::Value = serde_json::from_str(&body_text(resp).await).unwrap();
    assert_eq!(body["petfinder"]["method"]["$t"], "shelter.get");
    assert_eq!(body["petfinder"]["params"]["id"]["$t"], "CA12");
}

#[tokio::test]
async fn every_operation_is_served() {
    let app = test_app();
    for operation in mock_server::OPERATIONS {
        let resp = get(&app, &format!("/{operation}?key=test-key&format=xml")).await;
        assert_eq!(resp.status(), StatusCode::OK, "{operation}");
    }
}

#[tokio::test]
async fn unknown_token_returns_401() {
    let resp = get(&test_app(), "/pet.get?key=test-key&format=xml&id=1&token=forged").await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// --- token lifecycle ---

#[tokio::test]
async fn issued_token_is_accepted() {
    let app = test_app();

    let resp = get(&app, &format!("/auth.getToken?key=test-key&format=xml&sig={XML_SIG}")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let token = xml_token(&body_text(resp).await);

    let resp = get(&app, &format!("/pet.get?key=test-key&format=xml&id=1&token={token}")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_text(resp).await;
    assert!(body.contains(&format!(r#"<param name="token">{token}</param>"#)));

    // a fresh app does not know the token
    let resp = get(&test_app(), &format!("/pet.get?key=test-key&format=xml&id=1&token={token}")).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
