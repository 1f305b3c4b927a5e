//! HTML pages served by the blog
//!
//! Every piece of user-controlled text goes through [`html_escape`] except the
//! post body, which arrives here already sanitized by the content renderer.

use crate::config::SiteConfig;
use crate::content::Post;

/// Form submission script shared by the create and edit pages
const FORM_SCRIPT: &str = r#"
<script>
document.getElementById('post-form').addEventListener('submit', function (e) {
    e.preventDefault();
    var form = e.target;
    var post = {
        title: form.title.value,
        author: form.author.value,
        body: form.body.value
    };
    fetch(form.getAttribute('action'), {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify(post)
    })
        .then(function (res) { return res.json(); })
        .then(function (saved) { window.location = '/' + saved.slug; });
});
</script>
"#;

/// Delete button handler for the edit page
const DELETE_SCRIPT: &str = r#"
<script>
document.getElementById('delete-post').addEventListener('click', function () {
    var target = this.getAttribute('data-target');
    fetch(target, { method: 'DELETE' }).then(function () { window.location = '/'; });
});
</script>
"#;

/// Home page listing every post
pub fn home(config: &SiteConfig, posts: &[(String, Post)]) -> String {
    let mut items = String::new();
    for (slug, post) in posts {
        let date = post
            .date_posted
            .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        items.push_str(&format!(
            r#"<li><a href="/{}">{}</a> <span class="meta">by {} on {}</span></li>"#,
            html_escape(slug),
            html_escape(&post.title),
            html_escape(&post.author),
            date
        ));
        items.push('\n');
    }

    let content = if items.is_empty() {
        "<p>No posts yet.</p>".to_string()
    } else {
        format!("<ul class=\"posts\">\n{}</ul>", items)
    };

    layout(
        config,
        &config.title,
        &format!(
            "<p>{}</p>\n{}\n<p><a href=\"/create\">Write a post</a></p>",
            html_escape(&config.description),
            content
        ),
    )
}

/// A single post with its rendered body
///
/// `slug` is the key the post was fetched by; `body_html` must come from the
/// content renderer.
pub fn post(config: &SiteConfig, slug: &str, post: &Post, body_html: &str) -> String {
    let date = post
        .date_posted
        .map(|d| d.format("%B %d, %Y").to_string())
        .unwrap_or_default();

    layout(
        config,
        &post.title,
        &format!(
            r#"<article>
<h1>{}</h1>
<p class="meta">by {} on {}</p>
<div class="body">
{}
</div>
</article>
<p><a href="/{}/edit">Edit</a> | <a href="/">Home</a></p>"#,
            html_escape(&post.title),
            html_escape(&post.author),
            date,
            body_html,
            html_escape(slug)
        ),
    )
}

/// Empty form for a new post
pub fn create_form(config: &SiteConfig) -> String {
    let form = post_form("/", &Post::default());
    layout(
        config,
        "New post",
        &format!("<h1>New post</h1>\n{}\n{}", form, FORM_SCRIPT),
    )
}

/// Form prefilled with the post stored under `slug`
pub fn edit_form(config: &SiteConfig, slug: &str, post: &Post) -> String {
    let target = format!("/{}", slug);
    let form = post_form(&target, post);
    layout(
        config,
        &format!("Edit {}", post.title),
        &format!(
            "<h1>Edit post</h1>\n{}\n{}\n{}{}",
            form,
            delete_button(&target),
            FORM_SCRIPT,
            DELETE_SCRIPT
        ),
    )
}

fn delete_button(target: &str) -> String {
    format!(
        r#"<button id="delete-post" data-target="{}">Delete</button>"#,
        html_escape(target)
    )
}

fn post_form(action: &str, post: &Post) -> String {
    format!(
        r#"<form id="post-form" action="{}">
<p><label>Title <input name="title" value="{}"></label></p>
<p><label>Author <input name="author" value="{}"></label></p>
<p><label>Body <textarea name="body" rows="20" cols="80">{}</textarea></label></p>
<p><button type="submit">Save</button></p>
</form>"#,
        html_escape(action),
        html_escape(&post.title),
        html_escape(&post.author),
        html_escape(&post.body)
    )
}

fn layout(config: &SiteConfig, title: &str, content: &str) -> String {
    let page_title = if title == config.title {
        html_escape(title)
    } else {
        format!("{} | {}", html_escape(title), html_escape(&config.title))
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{}</title>
</head>
<body>
<header><a href="/">{}</a></header>
<main>
{}
</main>
</body>
</html>
"#,
        page_title,
        html_escape(&config.title),
        content
    )
}

/// Simple HTML escaping
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
