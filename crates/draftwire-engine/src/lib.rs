pub mod clipboard;
pub mod error;
pub mod model;
pub mod ranges;

pub use clipboard::{get_fragment_from_clipboard, set_fragment_to_clipboard};
pub use error::{ClipboardError, ModelError};
pub use model::{BlockMap, ContentBlock, ContentState};
