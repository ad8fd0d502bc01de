use crate::media::{parse_content, ContentBlock};
use crate::models::Article;

const WIDTH: usize = 80;

/// Plain-text card for `--list` and `--search`.
pub fn format_card(article: &Article) -> String {
    let mut out = String::new();
    out.push_str(&article.title);
    out.push('\n');
    out.push_str(&format!(
        "[{}] {}  ({})\n",
        article.category,
        article.display_date(),
        article.id
    ));
    for line in textwrap::wrap(&article.excerpt, WIDTH) {
        out.push_str("  ");
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// Full plain-text article for `--show`.
pub fn format_article(article: &Article, placeholder: &str) -> String {
    let mut out = String::new();
    out.push_str(&article.title);
    out.push('\n');
    out.push_str(&format!(
        "{} | {}\n",
        article.category,
        article.display_date()
    ));
    out.push_str(&format!("Cover: {}\n", article.cover_image(placeholder)));

    for block in parse_content(&article.content) {
        out.push('\n');
        match block {
            ContentBlock::Paragraph(text) => {
                for line in textwrap::wrap(&text, WIDTH) {
                    out.push_str(&line);
                    out.push('\n');
                }
            }
            ContentBlock::Image { alt, url } => {
                out.push_str(&format!("[{alt}: {url}]\n"));
            }
        }
    }
    out
}
