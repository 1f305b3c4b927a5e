//! Print a single post

use anyhow::Result;

use crate::content::ContentRenderer;
use crate::Blog;

/// Print the post at `slug`, rendered to sanitized HTML unless `raw`
pub fn run(blog: &Blog, slug: &str, raw: bool) -> Result<()> {
    let store = blog.open_store()?;
    let post = store.get(slug)?;
    store.close();

    println!("{}", post.title);
    if !post.author.is_empty() {
        println!("by {}", post.author);
    }
    println!();

    if raw {
        println!("{}", post.body);
    } else {
        println!("{}", ContentRenderer::new().render(&post.body));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Post;
    use crate::store::StoreError;

    #[test]
    fn test_show_existing_post() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        let store = blog.open_store().unwrap();
        store.upsert(&Post::new("Hello", "A", "# Hi"), "hello").unwrap();
        store.close();

        assert!(run(&blog, "hello", false).is_ok());
        assert!(run(&blog, "hello", true).is_ok());
    }

    #[test]
    fn test_show_missing_post() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::new(dir.path()).unwrap();

        let err = run(&blog, "nope", false).unwrap_err();
        let store_err = err.downcast_ref::<StoreError>().unwrap();
        assert!(store_err.is_not_found());

        // The failed lookup still released the store
        assert!(blog.open_store().is_ok());
    }
}
