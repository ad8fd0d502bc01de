use crate::models::Article;

/// Articles whose title, content or category contains `query`, ignoring
/// case. Keeps the input order; an empty query keeps everything.
pub fn filter_articles<'a>(articles: &'a [Article], query: &str) -> Vec<&'a Article> {
    if query.is_empty() {
        return articles.iter().collect();
    }

    let needle = query.to_lowercase();
    articles
        .iter()
        .filter(|article| matches(article, &needle))
        .collect()
}

fn matches(article: &Article, needle: &str) -> bool {
    [&article.title, &article.content, &article.category]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}
