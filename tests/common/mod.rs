#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{
        Request, Response, StatusCode,
        header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE},
    },
};
use chrono_tz::Tz;
use http_body_util::BodyExt;
use jotter::{
    application::{
        auth::{SessionGate, hash_password},
        posts::PostService,
        repos::PostsRepo,
    },
    infra::{
        db::SqliteRepositories,
        http::{HttpState, SESSION_COOKIE, build_router},
    },
};
use tempfile::TempDir;
use tower::ServiceExt;

pub const ADMIN_PASSWORD: &str = "open sesame";
/// `ADMIN_PASSWORD` as an urlencoded login form.
pub const ADMIN_LOGIN_FORM: &str = "password=open+sesame";

pub async fn sqlite_repo(dir: &TempDir) -> Arc<SqliteRepositories> {
    let pool = SqliteRepositories::connect(&dir.path().join("blog.db"), 1)
        .await
        .expect("sqlite pool");
    let repo = Arc::new(SqliteRepositories::new(pool));
    repo.initialize().await.expect("posts table");
    repo
}

pub struct TestApp {
    pub router: Router,
    pub repo: Arc<SqliteRepositories>,
    _dir: TempDir,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let dir = TempDir::new().expect("temp dir");
        let repo = sqlite_repo(&dir).await;
        let posts = Arc::new(PostService::new(repo.clone(), Tz::UTC));
        let hash = hash_password(ADMIN_PASSWORD).expect("hash");
        let gate = Arc::new(SessionGate::new(hash, Duration::from_secs(3600)).expect("gate"));
        let router = build_router(HttpState::new(posts, gate, "Test Blog", false));

        Self {
            router,
            repo,
            _dir: dir,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    pub async fn get(&self, uri: &str, session: Option<&str>) -> Response<Body> {
        self.send(request("GET", uri, session, Body::empty())).await
    }

    pub async fn post_form(&self, uri: &str, form: &str, session: Option<&str>) -> Response<Body> {
        let mut request = request("POST", uri, session, Body::from(form.to_owned()));
        request.headers_mut().insert(
            CONTENT_TYPE,
            "application/x-www-form-urlencoded".parse().unwrap(),
        );
        self.send(request).await
    }

    /// Log in and return the session cookie value.
    pub async fn login(&self) -> String {
        let response = self
            .post_form("/login", ADMIN_LOGIN_FORM, None)
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        session_cookie(&response).expect("session cookie set")
    }
}

fn request(method: &str, uri: &str, session: Option<&str>, body: Body) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = session {
        builder = builder.header(COOKIE, format!("{SESSION_COOKIE}={token}"));
    }
    builder.body(body).unwrap()
}

pub fn location(response: &Response<Body>) -> Option<&str> {
    response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
}

/// Value of the session cookie set by `response`, if any.
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|value| {
            let pair = value.split(';').next()?;
            let (name, token) = pair.split_once('=')?;
            (name.trim() == SESSION_COOKIE).then(|| token.to_string())
        })
}

pub fn set_cookie_header(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}
