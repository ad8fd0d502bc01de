mod article;
mod session;
mod upload;

pub use article::{Article, ArticleDraft, NewArticle, Visibility};
pub use session::{Actor, Session};
pub use upload::{Splice, UploadFile};
