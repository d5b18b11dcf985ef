use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
};
use serde_json::Value;
use tower::ServiceExt; // for `oneshot`

use super::setup::TestSetup;

// ============================================================================
// Action Helpers
// ============================================================================

/// Status, Location and Set-Cookie headers and body of a response
pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub set_cookies: Vec<String>,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).unwrap()
    }
}

impl TestSetup {
    /// Sends a request with the stored cookie and records any cookie change
    pub async fn send(&self, mut request: Request<Body>) -> TestResponse {
        if let Some(cookie) = self.cookie.lock().unwrap().clone() {
            request
                .headers_mut()
                .insert(header::COOKIE, cookie.parse().unwrap());
        }

        let response = self.app.clone().oneshot(request).await.unwrap();
        self.remember_cookie(&response);

        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .map(|value| value.to_str().unwrap().to_string());
        let set_cookies = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|value| value.to_str().unwrap().to_string())
            .collect();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec();

        TestResponse {
            status,
            location,
            set_cookies,
            body,
        }
    }

    fn remember_cookie(&self, response: &Response) {
        let cookie_name = self.cookie_name();

        for value in response.headers().get_all(header::SET_COOKIE) {
            let value = value.to_str().unwrap();
            let Some(pair) = value.split(';').next() else {
                continue;
            };
            let Some((name, id)) = pair.split_once('=') else {
                continue;
            };
            if name != cookie_name {
                continue;
            }

            let removed = id.is_empty() || value.contains("Max-Age=0");
            *self.cookie.lock().unwrap() = if removed {
                None
            } else {
                Some(pair.to_string())
            };
        }
    }

    pub async fn post_form(&self, uri: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    // ============================================================================
    // Convenience Action Methods
    // ============================================================================

    pub async fn register(&self, username: &str, password: &str) -> TestResponse {
        self.post_form(
            "/Account/Register",
            &format!(
                "username={}&password={}&first_name=Alice&last_name=Liddell&address=1+Rabbit+Hole&phone=555-0100",
                username, password
            ),
        )
        .await
    }

    pub async fn login(&self, username: &str, password: &str, remember_me: bool) -> TestResponse {
        let mut body = format!("username={}&password={}", username, password);
        if remember_me {
            body.push_str("&remember_me=true");
        }
        self.post_form("/Account/Login", &body).await
    }

    pub async fn profile(&self) -> TestResponse {
        self.get("/Account/Profile").await
    }

    pub async fn update_profile(&self, payload: Value) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri("/Account/UpdateProfile")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn logout(&self) -> TestResponse {
        self.post_form("/Account/Logout", "").await
    }

    pub async fn whoami(&self, token: &str) -> TestResponse {
        let request = Request::builder()
            .uri("/api/whoami")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }
}
