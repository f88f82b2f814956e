//! Public blog pages: the listing and single posts.

use maud::{Markup, PreEscaped, html};
use nextdevs_core::Post;

use super::components::{Nav, format_count, format_date, is_safe_url, page_shell, truncate};
use crate::session::Notice;

/// Posts shown below the featured post.
pub const REGULAR_POSTS: usize = 6;

/// Tags shown on a card.
const CARD_TAGS: usize = 3;

/// Pick the featured post (first flagged `featured`, else the first post)
/// and up to [`REGULAR_POSTS`] others.
pub fn split_featured<'a>(posts: &[&'a Post]) -> Option<(&'a Post, Vec<&'a Post>)> {
    let featured = posts
        .iter()
        .copied()
        .find(|p| p.featured)
        .or_else(|| posts.first().copied())?;

    let regular = posts
        .iter()
        .copied()
        .filter(|p| p.id != featured.id)
        .take(REGULAR_POSTS)
        .collect();

    Some((featured, regular))
}

/// Render the `/blog` listing.
pub fn listing(site_name: &str, posts: &[Post], notice: Option<Notice>) -> Markup {
    let visible: Vec<&Post> = posts.iter().filter(|p| p.is_published()).collect();

    let body = match split_featured(&visible) {
        None => html! {
            div class="empty" {
                h2 { "No blogs found" }
                p { "Check back soon for new posts." }
            }
        },
        Some((featured, regular)) => html! {
            article class="featured" {
                @if is_safe_url(&featured.image_url) {
                    img src=(featured.image_url) alt=(featured.title) loading="lazy";
                }
                div {
                    (post_meta(featured))
                    a class="post-title" href={"/blog/" (featured.slug)} { (featured.title) }
                    p class="post-excerpt" { (featured.excerpt) }
                    (byline(featured))
                }
            }
            @if !regular.is_empty() {
                div class="post-grid" {
                    @for post in &regular {
                        (post_card(post))
                    }
                }
            }
        },
    };

    page_shell(site_name, "Blog", Nav::Public, notice, body)
}

/// Render a single post. `body_html` is the already-sanitized body.
pub fn post_page(site_name: &str, post: &Post, body_html: &str, notice: Option<Notice>) -> Markup {
    let body = html! {
        article {
            (post_meta(post))
            h1 class="article-title" { (post.title) }
            (byline(post))
            @if is_safe_url(&post.image_url) {
                img class="article-image" src=(post.image_url) alt=(post.title);
            }
            @if !post.tags.is_empty() {
                div class="tags" {
                    @for tag in &post.tags {
                        span class="tag" { (tag) }
                    }
                }
            }
            div class="article-content" {
                @if !body_html.trim().is_empty() {
                    (PreEscaped(body_html))
                } @else if post.content.trim().is_empty() {
                    p class="placeholder" { "This post has no content yet." }
                } @else {
                    p class="placeholder" { "This post could not be displayed." }
                }
            }
            p class="post-meta" {
                span { (format_count(post.view_count)) " views" }
                span { (format_count(post.likes_count)) " likes" }
                span { (format_count(post.comments_count)) " comments" }
            }
            p { a href="/blog" { "← Back to all posts" } }
        }
    };

    page_shell(site_name, &post.title, Nav::Public, notice, body)
}

fn post_card(post: &Post) -> Markup {
    html! {
        article class="post-card" {
            @if is_safe_url(&post.image_url) {
                img src=(post.image_url) alt=(post.title) loading="lazy";
            }
            (post_meta(post))
            a class="post-title" href={"/blog/" (post.slug)} { (post.title) }
            p class="post-excerpt" { (truncate(&post.excerpt, 160)) }
            @if !post.tags.is_empty() {
                div class="tags" {
                    @for tag in post.tags.iter().take(CARD_TAGS) {
                        span class="tag" { (tag) }
                    }
                }
            }
        }
    }
}

fn post_meta(post: &Post) -> Markup {
    html! {
        div class="post-meta" {
            span { (format_date(post.display_date())) }
            @if post.read_time > 0 {
                span { (post.read_time) " min read" }
            }
        }
    }
}

fn byline(post: &Post) -> Markup {
    let expertise = post
        .author
        .as_ref()
        .and_then(|a| a.expertise.as_deref())
        .filter(|e| !e.is_empty())
        .unwrap_or("Tech Content Writer");
    html! {
        p class="post-meta" {
            span { strong { (post.author_name()) } }
            span { (expertise) }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: &str, featured: bool) -> Post {
        Post {
            id: id.to_string(),
            title: format!("Title {id}"),
            slug: format!("slug-{id}"),
            featured,
            ..Default::default()
        }
    }

    #[test]
    fn featured_flag_wins() {
        let posts = [post("a", false), post("b", true), post("c", false)];
        let refs: Vec<&Post> = posts.iter().collect();
        let (featured, regular) = split_featured(&refs).unwrap();
        assert_eq!(featured.id, "b");
        let ids: Vec<&str> = regular.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn first_post_featured_without_flag() {
        let posts = [post("a", false), post("b", false)];
        let refs: Vec<&Post> = posts.iter().collect();
        let (featured, regular) = split_featured(&refs).unwrap();
        assert_eq!(featured.id, "a");
        assert_eq!(regular.len(), 1);
    }

    #[test]
    fn regular_posts_capped() {
        let posts: Vec<Post> = (0..10).map(|i| post(&i.to_string(), false)).collect();
        let refs: Vec<&Post> = posts.iter().collect();
        let (_, regular) = split_featured(&refs).unwrap();
        assert_eq!(regular.len(), REGULAR_POSTS);
    }

    #[test]
    fn empty_listing() {
        assert!(split_featured(&[]).is_none());
        let page = listing("Site", &[], None).into_string();
        assert!(page.contains("No blogs found"));
    }

    #[test]
    fn unpublished_posts_hidden() {
        let mut hidden = post("draft", true);
        hidden.published = Some(false);
        let page = listing("Site", &[hidden, post("live", false)], None).into_string();
        assert!(page.contains("slug-live"));
        assert!(!page.contains("slug-draft"));
    }

    #[test]
    fn unsafe_image_not_rendered() {
        let mut p = post("a", true);
        p.image_url = "javascript:alert(1)".to_string();
        let page = listing("Site", &[p], None).into_string();
        assert!(!page.contains("javascript:"));
    }

    #[test]
    fn post_page_embeds_body_and_placeholders() {
        let mut p = post("a", false);
        p.content = "Hello".to_string();
        let page = post_page("Site", &p, "<p>Hello</p>", None).into_string();
        assert!(page.contains("<p>Hello</p>"));

        let page = post_page("Site", &p, "", None).into_string();
        assert!(page.contains("could not be displayed"));

        p.content = String::new();
        let page = post_page("Site", &p, "", None).into_string();
        assert!(page.contains("no content yet"));
    }

    #[test]
    fn post_title_escaped() {
        let mut p = post("a", false);
        p.title = "<script>x</script>".to_string();
        let page = post_page("Site", &p, "", None).into_string();
        assert!(!page.contains("<script>x"));
    }
}
