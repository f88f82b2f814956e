//! Admin post search.

use std::collections::HashSet;

use crate::model::Post;

/// Maximum number of suggestions shown under the admin search box.
pub const MAX_RECOMMENDATIONS: usize = 5;

/// Posts whose title, body, excerpt, tags or author name contain `term`
/// (case-insensitive). A blank term matches everything.
pub fn filter_posts<'a>(posts: &'a [Post], term: &str) -> Vec<&'a Post> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return posts.iter().collect();
    }

    posts.iter().filter(|post| matches(post, &needle)).collect()
}

fn matches(post: &Post, needle: &str) -> bool {
    contains(&post.title, needle)
        || contains(&post.content, needle)
        || contains(&post.excerpt, needle)
        || post.tags.iter().any(|t| contains(t, needle))
        || post.author.as_ref().is_some_and(|a| contains(&a.name, needle))
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Search suggestions: matching titles, tags and author names, unique, in
/// the order they are found, at most `limit`.
pub fn recommendations(posts: &[Post], term: &str, limit: usize) -> Vec<String> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() || limit == 0 {
        return Vec::new();
    }

    let mut seen = HashSet::new();
    let mut out = Vec::new();
    let mut push = |candidate: &str| {
        if out.len() < limit && contains(candidate, &needle) && seen.insert(candidate.to_string()) {
            out.push(candidate.to_string());
        }
    };

    for post in posts {
        push(&post.title);
        for tag in &post.tags {
            push(tag);
        }
        if let Some(author) = &post.author {
            push(&author.name);
        }
    }

    out
}
