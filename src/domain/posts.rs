use time::{Date, format_description::FormatItem, macros::format_description};

use super::error::DomainError;

/// `October 05, 2026`: long month name, zero-padded day, four-digit year.
pub const HUMAN_DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[month repr:long] [day], [year]");

/// Title and content accepted for a new post.
///
/// Fields are kept exactly as submitted. A field with nothing but whitespace is
/// rejected, so a `NewPost` always satisfies the non-empty invariant of stored posts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    title: String,
    content: String,
}

impl NewPost {
    pub fn parse(title: &str, content: &str) -> Result<Self, DomainError> {
        let title = required("title", title)?;
        let content = required("content", content)?;
        Ok(Self { title, content })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn into_parts(self) -> (String, String) {
        (self.title, self.content)
    }
}

fn required(field: &'static str, value: &str) -> Result<String, DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(field, "must not be empty"));
    }
    Ok(value.to_string())
}

pub fn format_post_date(date: Date) -> Result<String, time::error::Format> {
    date.format(HUMAN_DATE_FORMAT)
}
