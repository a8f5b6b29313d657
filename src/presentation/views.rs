use crate::application::error::{ErrorReport, HttpError};
use crate::domain::entities::PostRecord;
use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

/// Render `template`, turning askama failures into a 500 with the error chain attached.
pub fn render_template<T: Template>(template: T) -> Result<Html<String>, HttpError> {
    template.render().map(Html).map_err(|err| {
        HttpError::from_error(
            "presentation::views::render_template",
            StatusCode::INTERNAL_SERVER_ERROR,
            "Page could not be rendered",
            &err,
        )
    })
}

pub fn render_template_response<T: Template>(template: T, status: StatusCode) -> Response {
    match render_template(template) {
        Ok(html) => (status, html).into_response(),
        Err(err) => err.into_response(),
    }
}

pub fn render_not_found_response(brand: BrandView) -> Response {
    let view = LayoutContext::new(brand, ());
    let mut response = render_template_response(NotFoundTemplate { view }, StatusCode::NOT_FOUND);
    if response.status() == StatusCode::NOT_FOUND {
        ErrorReport::from_message(
            "presentation::views::render_not_found_response",
            StatusCode::NOT_FOUND,
            "no route matched",
        )
        .attach(&mut response);
    }
    response
}

#[derive(Clone)]
pub struct BrandView {
    pub title: String,
    pub href: String,
}

impl BrandView {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            href: "/".to_string(),
        }
    }
}

#[derive(Clone)]
pub struct LayoutContext<T> {
    pub brand: BrandView,
    pub content: T,
}

impl<T> LayoutContext<T> {
    pub fn new(brand: BrandView, content: T) -> Self {
        Self { brand, content }
    }
}

#[derive(Clone)]
pub struct PostCard {
    pub title: String,
    pub content: String,
    pub date: String,
    pub delete_href: String,
}

impl From<PostRecord> for PostCard {
    fn from(post: PostRecord) -> Self {
        Self {
            delete_href: format!("/admin/delete/{}", post.id),
            title: post.title,
            content: post.content,
            date: post.date,
        }
    }
}

pub fn post_cards(posts: Vec<PostRecord>) -> Vec<PostCard> {
    posts.into_iter().map(PostCard::from).collect()
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub view: LayoutContext<Vec<PostCard>>,
}

/// Messages shown above the login form.
#[derive(Clone, Default)]
pub struct LoginView {
    pub notice: Option<&'static str>,
    pub error: Option<&'static str>,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub view: LayoutContext<LoginView>,
}

#[derive(Template)]
#[template(path = "admin.html")]
pub struct AdminTemplate {
    pub view: LayoutContext<Vec<PostCard>>,
}

#[derive(Template)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate {
    pub view: LayoutContext<()>,
}
