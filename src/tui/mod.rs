mod editor;
mod handler;
mod meta;
mod ui;

pub use editor::TextBuffer;
pub use handler::{handle_key_event, AppAction};
pub use meta::PageMeta;
pub use ui::draw;
