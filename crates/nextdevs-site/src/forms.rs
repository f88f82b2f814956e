//! Form bodies posted by the site's pages, and their validation.
//!
//! Forms keep the raw submitted text so a rejected submission can be shown
//! again exactly as typed.

use nextdevs_core::{EXCERPT_MAX_CHARS, Post, PostInput, normalize_slug, parse_tags};
use serde::Deserialize;

use crate::render::components::is_safe_url;

/// Shortest password accepted at sign-up.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Sign-in form fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignInForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Sign-up form fields. Avatar and bio are optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SignUpForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub avatar: String,
    pub bio: String,
}

impl SignUpForm {
    /// Check the form before it is sent to the backend.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() || self.email.trim().is_empty() || self.password.is_empty()
        {
            return Err("Name, email, and password are required.");
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err("Password must be at least 6 characters long.");
        }
        let avatar = self.avatar.trim();
        if !avatar.is_empty() && !is_safe_url(avatar) {
            return Err("Avatar URL must start with http:// or https://.");
        }
        Ok(())
    }
}

/// Which submit button of the post editor was pressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorIntent {
    /// Re-render with a body preview, saving nothing.
    Preview,
    #[default]
    Save,
}

/// Post editor fields, shared by the create and edit pages.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PostForm {
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub image_url: String,
    pub slug: String,
    /// Comma-separated.
    pub tags: String,
    /// Minutes; blank lets the backend estimate it.
    pub read_time: String,
    pub published: bool,
    pub featured: bool,
    pub intent: EditorIntent,
}

impl PostForm {
    /// Editor contents for an existing post.
    pub fn from_post(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            content: post.content.clone(),
            excerpt: post.excerpt.clone(),
            image_url: post.image_url.clone(),
            slug: post.slug.clone(),
            tags: post.tags.join(", "),
            read_time: match post.read_time {
                0 => String::new(),
                n => n.to_string(),
            },
            published: post.is_published(),
            featured: post.featured,
            intent: EditorIntent::Save,
        }
    }

    pub fn is_preview(&self) -> bool {
        self.intent == EditorIntent::Preview
    }

    /// Validate the form and build the API body from it.
    pub fn to_input(&self) -> Result<PostInput, String> {
        let title = self.title.trim();
        let content = self.content.trim();
        if title.is_empty() || content.is_empty() {
            return Err("Title and content are required for a blog post.".to_string());
        }

        let excerpt = self.excerpt.trim();
        if excerpt.chars().count() > EXCERPT_MAX_CHARS {
            return Err(format!(
                "The excerpt must be at most {EXCERPT_MAX_CHARS} characters."
            ));
        }

        let image_url = self.image_url.trim();
        if !image_url.is_empty() && !is_safe_url(image_url) {
            return Err("Image URL must start with http:// or https://.".to_string());
        }

        let read_time = match self.read_time.trim() {
            "" => None,
            minutes => match minutes.parse::<u32>() {
                Ok(n) if n >= 1 => Some(n),
                _ => return Err("Read time must be a whole number of minutes.".to_string()),
            },
        };

        let slug = normalize_slug(&self.slug);

        Ok(PostInput {
            title: title.to_string(),
            content: content.to_string(),
            excerpt: (!excerpt.is_empty()).then(|| excerpt.to_string()),
            published: self.published,
            featured: self.featured,
            image_url: (!image_url.is_empty()).then(|| image_url.to_string()),
            slug: (!slug.is_empty()).then_some(slug),
            tags: parse_tags(&self.tags),
            read_time,
        })
    }
}
