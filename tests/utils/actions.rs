use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt; // for `oneshot`

use super::setup::TestSetup;

// ============================================================================
// HTTP Actions
// ============================================================================

pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestSetup {
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> ApiResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.dispatch(request).await
    }

    pub async fn dispatch(&self, request: Request<Body>) -> ApiResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        ApiResponse { status, body }
    }

    /// GET without decoding the body, for static files
    pub async fn fetch_raw(&self, uri: &str) -> (StatusCode, Vec<u8>) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes.to_vec())
    }

    pub async fn register(&self, email: &str, password: &str, role: Option<&str>) -> ApiResponse {
        let mut body = json!({ "name": email, "email": email, "password": password });
        if let Some(role) = role {
            body["role"] = json!(role);
        }
        self.send("POST", "/api/register", None, Some(body)).await
    }

    pub async fn login(&self, email: &str, password: &str) -> ApiResponse {
        self.send(
            "POST",
            "/api/login",
            None,
            Some(json!({ "email": email, "password": password })),
        )
        .await
    }

    /// Registers then logs in, returning the token
    pub async fn signed_in(&self, email: &str, role: &str) -> String {
        let registered = self.register(email, "pw1", Some(role)).await;
        assert_eq!(registered.status, StatusCode::OK);

        let login = self.login(email, "pw1").await;
        assert_eq!(login.status, StatusCode::OK);
        login.body["token"].as_str().unwrap().to_string()
    }

    /// POST /api/upload with a single multipart `file` part
    pub async fn upload(&self, file_name: &str, content: &[u8]) -> ApiResponse {
        const BOUNDARY: &str = "integration-boundary";

        let mut body = format!(
            "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\nContent-Type: image/jpeg\r\n\r\n",
            BOUNDARY, file_name
        )
        .into_bytes();
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

        let request = Request::builder()
            .method("POST")
            .uri("/api/upload")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap();

        self.dispatch(request).await
    }

    pub async fn list_drug(&self, token: &str, name: &str, expiry_date: &str) -> ApiResponse {
        self.send(
            "POST",
            "/api/drugs",
            Some(token),
            Some(json!({
                "name": name,
                "dosage": "500mg",
                "expiryDate": expiry_date,
                "condition": "sealed",
                "imageUrl": "/uploads/placeholder.png"
            })),
        )
        .await
    }
}
