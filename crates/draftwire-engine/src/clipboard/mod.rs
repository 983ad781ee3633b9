//! Clipboard transport for block fragments.
//!
//! A copy writes three payloads: the host's plain text and HTML renderings of
//! the selection, and a JSON array of [`RawBlock`]s under [`DRAFT_MIME_TYPE`].
//! A paste reads only the custom payload back; the other two are for
//! applications that do not understand it.
//!
//! Entity references in the custom payload are renumbered to a
//! fragment-local index so the payload does not depend on the source
//! document's entity store.

mod channel;
mod decode;
mod encode;
mod html;
mod wire;

pub use channel::{
    ClipboardData, ClipboardEvent, HostSelection, MemoryClipboard, MemoryClipboardEvent,
};
pub use decode::{decode_fragment, get_fragment_from_clipboard, try_get_fragment_from_clipboard};
pub use encode::{EncodedFragment, encode_fragment, serialize_fragment, set_fragment_to_clipboard};
pub use html::{BlockMapSelection, render_html};
pub use wire::{PastedBlock, RawBlock};

pub const TEXT_PLAIN: &str = "text/plain";
pub const TEXT_HTML: &str = "text/html";
/// Name of the custom channel; must match between writer and reader
pub const DRAFT_MIME_TYPE: &str = "text/draft";
