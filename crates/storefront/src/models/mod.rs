//! Types stored in the session and shared by templates.

pub mod session;
pub mod view;

pub use session::{Flash, FlashLevel, keys as session_keys};
pub use view::{Layout, OrderView};
