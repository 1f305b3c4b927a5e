//! Post model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A blog post
///
/// This is also the stored record: the JSON form of this struct is what lands
/// in the database, so field names are part of the on-disk format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Post {
    /// Author name, free text
    #[serde(skip_serializing_if = "String::is_empty")]
    pub author: String,

    /// Raw markdown body (untrusted)
    #[serde(skip_serializing_if = "String::is_empty")]
    pub body: String,

    /// When the post was last written
    #[serde(rename = "datePosted", skip_serializing_if = "Option::is_none")]
    pub date_posted: Option<DateTime<Utc>>,

    /// Post title
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,

    /// URL-friendly identifier, also the storage key
    #[serde(skip_serializing_if = "String::is_empty")]
    pub slug: String,
}

impl Post {
    /// Create an unsaved post with no slug or date
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            body: body.into(),
            ..Default::default()
        }
    }
}

/// The fields a caller may supply when creating or editing a post
///
/// Slug and date are absent on purpose: the store assigns both.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PostDraft {
    pub title: String,
    pub author: String,
    pub body: String,
}

impl From<PostDraft> for Post {
    fn from(draft: PostDraft) -> Self {
        Post::new(draft.title, draft.author, draft.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_empty_fields_are_omitted() {
        let post = Post::new("Hello", "", "");
        let json = serde_json::to_string(&post).unwrap();
        assert_eq!(json, r#"{"title":"Hello"}"#);
    }

    #[test]
    fn test_field_names() {
        let mut post = Post::new("T", "A", "B");
        post.slug = "s".to_string();
        post.date_posted = Some(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap());
        let value: serde_json::Value = serde_json::to_value(&post).unwrap();
        let obj = value.as_object().unwrap();
        let mut keys: Vec<_> = obj.keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, vec!["author", "body", "datePosted", "slug", "title"]);
        assert_eq!(obj["datePosted"], "2024-01-02T03:04:05Z");
    }

    #[test]
    fn test_partial_record_parses() {
        let post: Post = serde_json::from_str(r#"{"body":"only a body"}"#).unwrap();
        assert_eq!(post.body, "only a body");
        assert!(post.title.is_empty());
        assert!(post.date_posted.is_none());
    }

    #[test]
    fn test_draft_ignores_slug_and_date() {
        let draft: PostDraft = serde_json::from_str(
            r#"{"title":"T","author":"A","body":"B","slug":"evil","datePosted":"1999-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        let post = Post::from(draft);
        assert_eq!(post.title, "T");
        assert!(post.slug.is_empty());
        assert!(post.date_posted.is_none());
    }
}
