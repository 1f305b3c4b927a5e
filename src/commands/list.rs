//! List stored posts

use anyhow::Result;

use crate::Blog;

/// Print every post in slug order
pub fn run(blog: &Blog) -> Result<()> {
    let store = blog.open_store()?;
    let posts = store.list()?;
    store.close();

    println!("Posts ({}):", posts.len());
    for (slug, post) in posts {
        let date = post
            .date_posted
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "----------".to_string());
        println!("  {} - {} [{}]", date, post.title, slug);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Post;

    #[test]
    fn test_list_empty_blog() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        assert!(run(&blog).is_ok());
    }

    #[test]
    fn test_list_releases_store() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        let store = blog.open_store().unwrap();
        store.upsert(&Post::new("First", "A", "one"), "a-first").unwrap();
        store.upsert(&Post::new("Second", "B", "two"), "b-second").unwrap();
        store.close();

        run(&blog).unwrap();

        // The file lock is gone once the command returns
        let store = blog.open_store().unwrap();
        assert_eq!(store.count().unwrap(), 2);
    }
}
