//! Content module - post model, slugs, and body rendering

mod markdown;
mod post;
mod slug;

pub use markdown::ContentRenderer;
pub use post::{Post, PostDraft};
pub use self::slug::slug_for;
