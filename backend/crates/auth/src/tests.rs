//! Router-level tests for the auth crate

mod support {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, Response, header};
    use axum::routing::get;
    use axum::{Extension, Router, middleware};
    use platform::storage::LocalStore;

    use crate::application::config::AuthConfig;
    use crate::application::directory::CredentialDirectory;
    use crate::domain::session::SessionRecord;
    use crate::infra::local_store::LocalSessionStore;
    use crate::presentation::handlers::AuthAppState;
    use crate::presentation::middleware::{require_admin, require_session};
    use crate::presentation::router::auth_router;

    pub struct TestApp {
        pub router: Router,
        pub store: Arc<LocalStore>,
        pub state: AuthAppState<LocalSessionStore>,
    }

    async fn whoami(Extension(record): Extension<SessionRecord>) -> String {
        format!("{} {}", record.email, record.role)
    }

    pub fn app() -> TestApp {
        let config = AuthConfig::development();
        let store = Arc::new(LocalStore::in_memory());
        let directory = CredentialDirectory::from_config(&config).unwrap();
        let state = AuthAppState::new(
            Arc::new(LocalSessionStore::new(store.clone())),
            Arc::new(directory),
            Arc::new(config),
        );

        let member = Router::new().route("/api/me", get(whoami)).layer(middleware::from_fn_with_state(
            state.middleware_state(),
            require_session::<LocalSessionStore>,
        ));
        let admin = Router::new().route("/api/admin", get(whoami)).layer(
            middleware::from_fn_with_state(state.middleware_state(), require_admin::<LocalSessionStore>),
        );

        let router = Router::new()
            .nest("/api/auth", auth_router(state.clone()))
            .merge(member)
            .merge(admin);

        TestApp {
            router,
            store,
            state,
        }
    }

    pub fn sign_in_request(email: &str, password: &str) -> Request<Body> {
        let body = serde_json::json!({ "email": email, "password": password });
        Request::post("/api/auth/signin")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    pub fn get_with_cookie(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::get(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    /// `name=value` part of the first Set-Cookie header
    pub fn cookie_pair<B>(response: &Response<B>) -> String {
        response.headers()[header::SET_COOKIE]
            .to_str()
            .unwrap()
            .split(';')
            .next()
            .unwrap()
            .to_string()
    }

    pub async fn body_json(response: Response<Body>) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    pub async fn body_text(response: Response<Body>) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }
}

mod sign_in_tests {
    use axum::http::StatusCode;
    use tower::ServiceExt;

    use super::support::*;

    #[tokio::test]
    async fn test_admin_sign_in_sets_cookie_and_record() {
        let app = app();
        let response = app
            .router
            .clone()
            .oneshot(sign_in_request("Admin@NewsHub.com", "admin123"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(cookie_pair(&response).starts_with("newshub_session="));
        assert_eq!(app.store.len(), 1);

        let json = body_json(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["user"]["email"], "admin@newshub.com");
        assert_eq!(json["user"]["role"], "admin");
        assert_eq!(json["user"]["isAuthenticated"], true);
    }

    #[tokio::test]
    async fn test_wrong_password_is_401_problem() {
        let app = app();
        let response = app
            .router
            .clone()
            .oneshot(sign_in_request("manager@newshub.com", "admin123"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().get("set-cookie").is_none());
        assert!(app.store.is_empty());

        let json = body_json(response).await;
        assert_eq!(json["status"], 401);
    }

    #[tokio::test]
    async fn test_malformed_email_is_401_not_400() {
        let app = app();
        let response = app
            .router
            .clone()
            .oneshot(sign_in_request("admin", "admin123"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}

mod gate_tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use kernel::id::SessionId;
    use tower::ServiceExt;

    use super::support::*;
    use crate::application::SessionGate;
    use crate::application::token::issue_token;
    use crate::domain::session::GateState;
    use crate::infra::local_store::LocalSessionStore;

    async fn signed_in_cookie(app: &TestApp, email: &str, password: &str) -> String {
        let response = app
            .router
            .clone()
            .oneshot(sign_in_request(email, password))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        cookie_pair(&response)
    }

    #[tokio::test]
    async fn test_status_without_cookie() {
        let app = app();
        let response = app
            .router
            .clone()
            .oneshot(get_with_cookie("/api/auth/status", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["state"], "unauthenticated");
        assert_eq!(json["authenticated"], false);
        assert!(json.get("user").is_none());
    }

    #[tokio::test]
    async fn test_status_after_sign_in() {
        let app = app();
        let cookie = signed_in_cookie(&app, "manager@newshub.com", "manager123").await;

        let response = app
            .router
            .clone()
            .oneshot(get_with_cookie("/api/auth/status", Some(&cookie)))
            .await
            .unwrap();

        let json = body_json(response).await;
        assert_eq!(json["state"], "authenticated");
        assert_eq!(json["user"]["role"], "manager");
    }

    #[tokio::test]
    async fn test_sign_out_removes_record_and_clears_cookie() {
        let app = app();
        let cookie = signed_in_cookie(&app, "admin@newshub.com", "admin123").await;
        assert_eq!(app.store.len(), 1);

        let response = app
            .router
            .clone()
            .oneshot(
                Request::post("/api/auth/signout")
                    .header(header::COOKIE, &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let cleared = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cleared.starts_with("newshub_session=;"));
        assert!(cleared.contains("Max-Age=0"));
        assert!(app.store.is_empty());

        // The old cookie no longer opens the gate
        let response = app
            .router
            .clone()
            .oneshot(get_with_cookie("/api/me", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_sign_out_without_session_still_clears() {
        let app = app();
        let response = app
            .router
            .clone()
            .oneshot(Request::post("/api/auth/signout").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(response.headers().contains_key(header::SET_COOKIE));
    }

    #[tokio::test]
    async fn test_require_session() {
        let app = app();

        let response = app
            .router
            .clone()
            .oneshot(get_with_cookie("/api/me", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()["x-auth-required"], "true");

        let cookie = signed_in_cookie(&app, "manager@newshub.com", "manager123").await;
        let response = app
            .router
            .clone()
            .oneshot(get_with_cookie("/api/me", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "manager@newshub.com manager");
    }

    #[tokio::test]
    async fn test_require_admin() {
        let app = app();

        let manager = signed_in_cookie(&app, "manager@newshub.com", "manager123").await;
        let response = app
            .router
            .clone()
            .oneshot(get_with_cookie("/api/admin", Some(&manager)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let admin = signed_in_cookie(&app, "admin@newshub.com", "admin123").await;
        let response = app
            .router
            .clone()
            .oneshot(get_with_cookie("/api/admin", Some(&admin)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .router
            .clone()
            .oneshot(get_with_cookie("/api/admin", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_tampered_cookie_is_rejected() {
        let app = app();
        let cookie = signed_in_cookie(&app, "admin@newshub.com", "admin123").await;
        let (_, signature) = cookie.split_once('.').unwrap();
        let forged = format!("newshub_session={}.{}", SessionId::new(), signature);

        let response = app
            .router
            .clone()
            .oneshot(get_with_cookie("/api/me", Some(&forged)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_gate_settles_from_stored_record() {
        let app = app();
        let gate = SessionGate::new(app.state.session_repo.clone(), app.state.config.clone());
        let secret = app.state.config.session_secret;
        let id = SessionId::new();
        let token = issue_token(&secret, id);
        let key = LocalSessionStore::key(id);

        // Absent
        assert_eq!(gate.resolve(Some(&token)).await, GateState::Unauthenticated);

        // Malformed
        app.store.set_item(&key, "[1, 2").unwrap();
        assert_eq!(gate.resolve(Some(&token)).await, GateState::Unauthenticated);

        // Flag false
        let record = serde_json::json!({
            "email": "admin@newshub.com",
            "role": "admin",
            "isAuthenticated": false,
            "loginTime": "2024-01-15T09:00:00Z",
        });
        app.store.set_item(&key, record.to_string()).unwrap();
        assert_eq!(gate.resolve(Some(&token)).await, GateState::Unauthenticated);

        // Flag true
        let record = serde_json::json!({
            "email": "admin@newshub.com",
            "role": "admin",
            "isAuthenticated": true,
            "loginTime": "2024-01-15T09:00:00Z",
        });
        app.store.set_item(&key, record.to_string()).unwrap();
        let state = gate.resolve(Some(&token)).await;
        assert!(state.is_authenticated());

        // No token at all
        assert_eq!(gate.resolve(None).await, GateState::Unauthenticated);
    }
}
