mod attach;
mod markup;

pub use attach::ImageAttacher;
pub use markup::{parse_content, ContentBlock};

#[cfg(test)]
pub use attach::splice_image;
