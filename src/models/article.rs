use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Session;

/// A row of the remote `articles` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub category: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub excerpt: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub author_id: Option<Uuid>,
}

impl Article {
    pub fn display_date(&self) -> String {
        self.created_at.format("%B %-d, %Y").to_string()
    }

    pub fn cover_image<'a>(&'a self, placeholder: &'a str) -> &'a str {
        self.image
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(placeholder)
    }
}

/// Fields an admin fills in before the store assigns `id` and `created_at`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleDraft {
    pub title: String,
    pub content: String,
    pub category: String,
    pub image: Option<String>,
}

/// Insert payload sent to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewArticle {
    pub title: String,
    pub content: String,
    pub category: String,
    pub image: String,
    pub excerpt: String,
    pub author_id: Uuid,
    pub published: bool,
}

#[derive(Debug, Clone, Copy)]
pub enum Visibility<'a> {
    /// Only `published = true` rows.
    Public,
    /// Every row, regardless of `published`, read with the admin's session.
    Admin(&'a Session),
}

impl Visibility<'_> {
    pub fn access_token(&self) -> Option<&str> {
        match self {
            Visibility::Public => None,
            Visibility::Admin(session) => Some(&session.access_token),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_store_row() {
        let row = r#"{
            "id": "7a1d5a8e-3a43-4b53-9f43-5a0f3c1a2b11",
            "title": "Budget passes",
            "content": "The council voted.",
            "category": "Politics",
            "image": null,
            "excerpt": "The council voted....",
            "created_at": "2026-10-18T09:30:00+00:00",
            "published": true,
            "author_id": null
        }"#;

        let article: Article = serde_json::from_str(row).unwrap();

        assert_eq!(article.title, "Budget passes");
        assert!(article.published);
        assert_eq!(article.display_date(), "October 18, 2026");
        assert_eq!(article.cover_image("placeholder.png"), "placeholder.png");
    }

    #[test]
    fn blank_image_uses_placeholder() {
        let article = Article {
            id: Uuid::new_v4(),
            title: "t".into(),
            content: "c".into(),
            category: "k".into(),
            image: Some("  ".into()),
            excerpt: "c...".into(),
            created_at: Utc::now(),
            published: true,
            author_id: None,
        };
        assert_eq!(article.cover_image("p.png"), "p.png");
    }
}
