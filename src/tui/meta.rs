use crate::models::Article;

pub const SITE_TITLE: &str = "Newsroom";
const DESCRIPTION_LENGTH: usize = 160;

/// Page metadata published for the current view (the terminal title here).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub category: Option<String>,
}

impl PageMeta {
    pub fn site() -> Self {
        Self {
            title: SITE_TITLE.to_string(),
            description: "Latest news and stories".to_string(),
            image: None,
            category: None,
        }
    }

    pub fn for_article(article: &Article, placeholder: &str) -> Self {
        let description = article
            .excerpt
            .chars()
            .take(DESCRIPTION_LENGTH)
            .collect::<String>();
        Self {
            title: format!("{} | {}", article.title, SITE_TITLE),
            description,
            image: Some(article.cover_image(placeholder).to_string()),
            category: Some(article.category.clone()),
        }
    }

    pub fn window_title(&self) -> &str {
        &self.title
    }
}

impl Default for PageMeta {
    fn default() -> Self {
        Self::site()
    }
}
