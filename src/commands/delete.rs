//! Delete a post

use anyhow::Result;

use crate::Blog;

/// Delete the post at `slug`; a missing post is not an error
pub fn run(blog: &Blog, slug: &str) -> Result<()> {
    let store = blog.open_store()?;
    store.delete(slug)?;
    store.close();

    tracing::info!("Deleted: {}", slug);
    Ok(())
}
