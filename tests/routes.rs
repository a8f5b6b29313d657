mod common;

use axum::http::StatusCode;
use jotter::application::repos::PostsRepo;

use common::{ADMIN_LOGIN_FORM, TestApp, body_text, location, session_cookie, set_cookie_header};

#[tokio::test]
async fn index_lists_posts_newest_first() {
    let app = TestApp::spawn().await;
    let session = app.login().await;

    app.post_form("/admin/new", "title=Older&content=first+body", Some(&session))
        .await;
    app.post_form("/admin/new", "title=Newer&content=second+body", Some(&session))
        .await;

    let response = app.get("/", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;

    let newer = body.find("Newer").expect("newer post rendered");
    let older = body.find("Older").expect("older post rendered");
    assert!(newer < older);
    assert!(body.contains("second body"));
    assert!(body.contains("Test Blog"));
}

#[tokio::test]
async fn empty_index_renders() {
    let app = TestApp::spawn().await;
    let response = app.get("/", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("No posts yet."));
}

#[tokio::test]
async fn post_content_is_html_escaped() {
    let app = TestApp::spawn().await;
    let session = app.login().await;

    app.post_form(
        "/admin/new",
        "title=Tags&content=%3Cscript%3Ealert(1)%3C%2Fscript%3E",
        Some(&session),
    )
    .await;

    let body = body_text(app.get("/", None).await).await;
    assert!(!body.contains("<script>alert(1)</script>"));
    assert!(body.contains("&#60;script&#62;") || body.contains("&lt;script&gt;"));
}

#[tokio::test]
async fn admin_requires_session() {
    let app = TestApp::spawn().await;

    let response = app.get("/admin", None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/login?notice=required"));

    let response = app.get("/admin", Some("forged-token")).await;
    assert_eq!(location(&response), Some("/login?notice=required"));
}

#[tokio::test]
async fn unauthenticated_mutations_have_no_effect() {
    let app = TestApp::spawn().await;
    let session = app.login().await;
    app.post_form("/admin/new", "title=Keep&content=me", Some(&session))
        .await;
    let existing = app.repo.list_all().await.unwrap();

    let response = app
        .post_form("/admin/new", "title=Sneaky&content=post", None)
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/login?notice=required"));

    let response = app
        .get(&format!("/admin/delete/{}", existing[0].id), None)
        .await;
    assert_eq!(location(&response), Some("/login?notice=required"));

    assert_eq!(app.repo.list_all().await.unwrap(), existing);
}

#[tokio::test]
async fn login_required_notice_is_shown() {
    let app = TestApp::spawn().await;

    let response = app.get("/login?notice=required", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        body_text(response)
            .await
            .contains("Please log in to access the admin panel.")
    );

    let body = body_text(app.get("/login", None).await).await;
    assert!(!body.contains("Please log in to access the admin panel."));
}

#[tokio::test]
async fn successful_login_sets_session_cookie() {
    let app = TestApp::spawn().await;

    let response = app
        .post_form("/login", ADMIN_LOGIN_FORM, None)
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/admin"));

    let header = set_cookie_header(&response).expect("cookie header");
    assert!(header.contains("HttpOnly"));
    assert!(header.contains("SameSite=Strict"));
    assert!(header.contains("Path=/"));
    assert!(!header.contains("Secure"));

    let session = session_cookie(&response).expect("session cookie");
    let response = app.get("/admin", Some(&session)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("New post"));
}

#[tokio::test]
async fn wrong_password_rerenders_login_form() {
    let app = TestApp::spawn().await;

    let response = app.post_form("/login", "password=guess", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(session_cookie(&response).is_none());
    assert!(body_text(response).await.contains("Invalid credentials"));

    let response = app.post_form("/login", "", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Invalid credentials"));
}

#[tokio::test]
async fn authenticated_login_page_redirects_to_admin() {
    let app = TestApp::spawn().await;
    let session = app.login().await;

    let response = app.get("/login", Some(&session)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/admin"));
}

#[tokio::test]
async fn logout_revokes_session() {
    let app = TestApp::spawn().await;
    let session = app.login().await;

    let response = app.get("/logout", Some(&session)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/"));
    let header = set_cookie_header(&response).expect("removal cookie");
    assert!(header.starts_with("jotter_admin_session="));
    assert!(header.contains("Max-Age=0"));

    let response = app.get("/admin", Some(&session)).await;
    assert_eq!(location(&response), Some("/login?notice=required"));
}

#[tokio::test]
async fn logout_without_session_still_redirects() {
    let app = TestApp::spawn().await;

    let response = app.get("/logout", None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/"));
}

#[tokio::test]
async fn create_then_delete_post() {
    let app = TestApp::spawn().await;
    let session = app.login().await;

    let response = app
        .post_form("/admin/new", "title=Hello&content=World", Some(&session))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/admin"));

    let posts = app.repo.list_all().await.unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].title, "Hello");
    assert_eq!(posts[0].content, "World");

    let admin = body_text(app.get("/admin", Some(&session)).await).await;
    assert!(admin.contains(&format!("/admin/delete/{}", posts[0].id)));

    let response = app
        .get(&format!("/admin/delete/{}", posts[0].id), Some(&session))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/admin"));
    assert!(app.repo.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn submitted_fields_are_stored_verbatim() {
    let app = TestApp::spawn().await;
    let session = app.login().await;

    let response = app
        .post_form(
            "/admin/new",
            "title=++Hi&content=++++code%0Aline1%0A",
            Some(&session),
        )
        .await;
    assert_eq!(location(&response), Some("/admin"));

    let posts = app.repo.list_all().await.unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].title, "  Hi");
    assert_eq!(posts[0].content, "    code\nline1\n");
}

#[tokio::test]
async fn deleting_unknown_post_redirects() {
    let app = TestApp::spawn().await;
    let session = app.login().await;

    let response = app.get("/admin/delete/9999", Some(&session)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/admin"));
}

#[tokio::test]
async fn non_numeric_delete_id_is_rejected() {
    let app = TestApp::spawn().await;
    let session = app.login().await;

    let response = app.get("/admin/delete/abc", Some(&session)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn invalid_post_form_creates_nothing() {
    let app = TestApp::spawn().await;
    let session = app.login().await;

    for form in ["title=&content=body", "title=Only", "title=+++&content=body", ""] {
        let response = app.post_form("/admin/new", form, Some(&session)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "form {form:?}");
        assert_eq!(location(&response), Some("/admin"));
    }

    assert!(app.repo.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn health_endpoint_reports_store() {
    let app = TestApp::spawn().await;

    let response = app.get("/_health/db", None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn unknown_path_renders_not_found() {
    let app = TestApp::spawn().await;

    let response = app.get("/nope", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response).await.contains("Page not found"));
}
