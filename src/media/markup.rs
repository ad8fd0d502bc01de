use std::sync::OnceLock;

use regex::Regex;

/// A piece of article content as the reader sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentBlock {
    Paragraph(String),
    Image { alt: String, url: String },
}

fn image_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"!\[([^\]]*)\]\(([^)\s]+)\)").ok())
        .as_ref()
}

/// Splits content into paragraphs (blank-line separated) and inline
/// `![alt](url)` image references.
pub fn parse_content(content: &str) -> Vec<ContentBlock> {
    let mut blocks = Vec::new();
    let mut last = 0;

    let Some(pattern) = image_pattern() else {
        push_paragraphs(&mut blocks, content);
        return blocks;
    };

    for caps in pattern.captures_iter(content) {
        let (Some(whole), Some(alt), Some(url)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            continue;
        };
        push_paragraphs(&mut blocks, &content[last..whole.start()]);
        blocks.push(ContentBlock::Image {
            alt: alt.as_str().to_string(),
            url: url.as_str().to_string(),
        });
        last = whole.end();
    }
    push_paragraphs(&mut blocks, &content[last..]);

    blocks
}

fn push_paragraphs(blocks: &mut Vec<ContentBlock>, text: &str) {
    let normalized = text.replace("\r\n", "\n");
    for paragraph in normalized.split("\n\n") {
        let paragraph = paragraph.trim();
        if !paragraph.is_empty() {
            blocks.push(ContentBlock::Paragraph(paragraph.to_string()));
        }
    }
}
