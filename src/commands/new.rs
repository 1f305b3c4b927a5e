//! Create a new post

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::content::{Post, PostDraft};
use crate::Blog;

/// Create a post, reading the body from `file` when given
pub fn create_post(
    blog: &Blog,
    title: &str,
    author: &str,
    body: Option<&str>,
    file: Option<&Path>,
) -> Result<Post> {
    let body = match (body, file) {
        (Some(_), Some(_)) => anyhow::bail!("Pass either --body or --file, not both"),
        (Some(text), None) => text.to_string(),
        (None, Some(path)) => fs::read_to_string(path)?,
        (None, None) => String::new(),
    };

    let draft = PostDraft {
        title: title.to_string(),
        author: author.to_string(),
        body,
    };

    let store = blog.open_store()?;
    let post = store.create(draft, chrono::Utc::now())?;
    store.close();

    println!("Created: {}", post.slug);

    Ok(post)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let body_path = dir.path().join("body.md");
        fs::write(&body_path, "# From a file").unwrap();

        let blog = Blog::new(dir.path()).unwrap();
        let post = create_post(&blog, "File Post", "A", None, Some(&body_path)).unwrap();
        assert!(post.slug.ends_with("-file-post"));

        let store = blog.open_store().unwrap();
        assert_eq!(store.get(&post.slug).unwrap().body, "# From a file");
    }

    #[test]
    fn test_body_and_file_conflict() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        let result = create_post(&blog, "T", "A", Some("x"), Some(Path::new("y.md")));
        assert!(result.is_err());
    }
}
