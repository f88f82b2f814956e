//! Wire types for the remote blog/user REST API.
//!
//! The backend is loose about which fields it sends (listing endpoints omit
//! bodies, admin endpoints add `published`), so every post field defaults.

use serde::{Deserialize, Deserializer, Serialize};

/// Treat an explicit JSON `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Post author as embedded in post payloads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Author {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub avatar: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expertise: Option<String>,
}

/// A blog post.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub excerpt: String,
    /// Raw body: plain text or partial HTML. Render with
    /// [`ContentRenderer`](crate::ContentRenderer) before display.
    #[serde(deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(deserialize_with = "null_as_default")]
    pub image_url: String,
    pub slug: String,
    #[serde(deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    /// Estimated reading time in minutes.
    pub read_time: u32,
    pub view_count: u64,
    pub featured: bool,
    /// Absent on public listings, which only carry published posts.
    pub published: Option<bool>,
    #[serde(deserialize_with = "null_as_default")]
    pub published_at: String,
    #[serde(deserialize_with = "null_as_default")]
    pub created_at: String,
    pub comments_count: u64,
    pub likes_count: u64,
    pub author: Option<Author>,
}

impl Post {
    /// Author name, or `"Anonymous"`.
    pub fn author_name(&self) -> &str {
        self.author
            .as_ref()
            .map(|a| a.name.as_str())
            .filter(|n| !n.is_empty())
            .unwrap_or("Anonymous")
    }

    /// Publication timestamp, falling back to the creation timestamp.
    pub fn display_date(&self) -> &str {
        if self.published_at.is_empty() {
            &self.created_at
        } else {
            &self.published_at
        }
    }

    pub fn is_published(&self) -> bool {
        self.published.unwrap_or(true)
    }
}

/// Optional pagination block on post listings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PostPagination {
    pub total_posts: Option<u64>,
}

/// `data` member of `GET /api/v1/blog/bulk`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogsData {
    pub posts: Vec<Post>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PostPagination>,
}

impl BlogsData {
    /// Find a post by its URL slug.
    pub fn find_by_slug(&self, slug: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.slug == slug)
    }
}

/// Body of `GET /api/v1/blog/bulk`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlogsResponse {
    pub data: BlogsData,
}

/// Longest excerpt the editor accepts, in characters.
pub const EXCERPT_MAX_CHARS: usize = 150;

/// Body of `POST /api/v1/blog` and `PUT /api/v1/blog/{id}`.
///
/// Optional fields left out of the JSON let the backend fill them in (the
/// slug is derived from the title, the read time from the body).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostInput {
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub featured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_time: Option<u32>,
}

/// Reduce `raw` to a URL slug: lower case ASCII letters, digits and single
/// hyphens, with no hyphen at either end. Other characters are dropped.
pub fn normalize_slug(raw: &str) -> String {
    let mut slug = String::with_capacity(raw.len());
    for c in raw.chars().flat_map(char::to_lowercase) {
        match c {
            'a'..='z' | '0'..='9' => slug.push(c),
            '-' if !slug.is_empty() && !slug.ends_with('-') => slug.push('-'),
            _ => {}
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Split a comma-separated tag list, trimming entries and dropping blanks and
/// repeats. Order of first appearance is kept.
pub fn parse_tags(raw: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

/// User role as stored by the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    #[default]
    User,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::User, Role::Admin];

    /// Wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::User => "USER",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ADMIN" => Ok(Role::Admin),
            "USER" => Ok(Role::User),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// A user as listed by the admin endpoints. Users may have no name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserData {
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Pagination block on the admin user listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Pagination {
    pub total_pages: u32,
    pub total_users: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_page: Option<u32>,
}

/// `data` member of `GET /api/v1/user/admin/users`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UsersData {
    pub users: Vec<UserData>,
    pub pagination: Pagination,
}

/// Body of `GET /api/v1/user/admin/users`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsersResponse {
    pub data: UsersData,
}

/// Error body returned by the backend on non-2xx responses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiErrorBody {
    pub error: Option<String>,
    pub message: Option<String>,
}

impl ApiErrorBody {
    /// The most specific message available, or `fallback`.
    pub fn message_or(&self, fallback: &str) -> String {
        self.error
            .as_deref()
            .or(self.message.as_deref())
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(fallback)
            .to_string()
    }
}

/// Admin overview counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_posts: u64,
    pub total_likes: u64,
    pub total_comments: u64,
    /// `None` if the user listing could not be fetched.
    pub total_users: Option<u64>,
}

impl DashboardStats {
    /// Aggregate counters from a post listing and (optionally) the user
    /// pagination block.
    pub fn compute(posts: &BlogsData, users: Option<&Pagination>) -> Self {
        let total_posts = posts
            .pagination
            .as_ref()
            .and_then(|p| p.total_posts)
            .unwrap_or(posts.posts.len() as u64);

        Self {
            total_posts,
            total_likes: posts.posts.iter().map(|p| p.likes_count).sum(),
            total_comments: posts.posts.iter().map(|p| p.comments_count).sum(),
            total_users: users.map(|p| p.total_users),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BULK_JSON: &str = r#"{
        "data": {
            "posts": [
                {
                    "id": "p1",
                    "title": "Growing a newsletter",
                    "excerpt": "How we did it",
                    "content": "Line one\nLine two",
                    "imageUrl": "https://img.test/1.png",
                    "slug": "growing-a-newsletter",
                    "tags": ["growth", "email"],
                    "readTime": 5,
                    "viewCount": 120,
                    "featured": true,
                    "publishedAt": "2025-03-01T10:00:00Z",
                    "createdAt": "2025-02-28T10:00:00Z",
                    "commentsCount": 3,
                    "likesCount": 10,
                    "author": { "id": "a1", "name": "Murali", "avatar": "" }
                },
                { "id": "p2", "title": "Sparse", "slug": "sparse", "likesCount": 2, "excerpt": null, "tags": null }
            ]
        }
    }"#;

    #[test]
    fn parse_bulk_response() {
        let resp: BlogsResponse = serde_json::from_str(BULK_JSON).unwrap();
        assert_eq!(resp.data.posts.len(), 2);
        let p = &resp.data.posts[0];
        assert_eq!(p.image_url, "https://img.test/1.png");
        assert_eq!(p.read_time, 5);
        assert!(p.featured);
        assert_eq!(p.author_name(), "Murali");
        assert!(p.is_published());
    }

    #[test]
    fn sparse_post_defaults() {
        let resp: BlogsResponse = serde_json::from_str(BULK_JSON).unwrap();
        let p = &resp.data.posts[1];
        assert_eq!(p.content, "");
        assert!(p.tags.is_empty());
        assert_eq!(p.author_name(), "Anonymous");
        assert_eq!(p.view_count, 0);
    }

    #[test]
    fn find_by_slug() {
        let resp: BlogsResponse = serde_json::from_str(BULK_JSON).unwrap();
        assert_eq!(resp.data.find_by_slug("sparse").unwrap().id, "p2");
        assert!(resp.data.find_by_slug("missing").is_none());
    }

    #[test]
    fn display_date_falls_back_to_created() {
        let post = Post {
            created_at: "2025-01-01T00:00:00Z".to_string(),
            ..Default::default()
        };
        assert_eq!(post.display_date(), "2025-01-01T00:00:00Z");
    }

    #[test]
    fn parse_users_response() {
        let json = r#"{
            "data": {
                "users": [
                    { "id": "u1", "name": "Ada", "email": "ada@x.test", "role": "ADMIN" },
                    { "id": "u2", "name": "Bob", "email": "bob@x.test", "role": "USER" }
                ],
                "pagination": { "totalPages": 3, "totalUsers": 25, "currentPage": 1 }
            }
        }"#;
        let resp: UsersResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.data.users[0].role, Role::Admin);
        assert_eq!(resp.data.users[1].role, Role::User);
        assert_eq!(resp.data.pagination.total_pages, 3);
        assert_eq!(resp.data.pagination.total_users, 25);
    }

    #[test]
    fn users_with_null_fields_still_parse() {
        let json = r#"{
            "data": {
                "users": [
                    { "id": "u1", "name": null, "email": "anon@x.test", "role": "USER", "avatar": null },
                    { "id": "u2", "name": "Ada", "email": null, "role": null }
                ],
                "pagination": { "totalPages": 1, "totalUsers": 2 }
            }
        }"#;
        let resp: UsersResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.data.users.len(), 2);
        assert_eq!(resp.data.users[0].name, "");
        assert_eq!(resp.data.users[0].avatar, None);
        assert_eq!(resp.data.users[1].email, "");
        assert_eq!(resp.data.users[1].role, Role::User);
    }

    #[test]
    fn author_with_null_fields_parses() {
        let json = r#"{ "id": "p1", "title": null, "author": { "id": "a1", "name": null, "avatar": null } }"#;
        let post: Post = serde_json::from_str(json).unwrap();
        assert_eq!(post.title, "");
        assert_eq!(post.author_name(), "Anonymous");
    }

    #[test]
    fn post_input_omits_unset_optionals() {
        let input = PostInput {
            title: "Hello".to_string(),
            content: "Body".to_string(),
            image_url: Some("https://img.test/a.png".to_string()),
            tags: vec!["rust".to_string()],
            ..Default::default()
        };
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "title": "Hello",
                "content": "Body",
                "published": false,
                "featured": false,
                "imageUrl": "https://img.test/a.png",
                "tags": ["rust"]
            })
        );
    }

    #[test]
    fn slug_normalization() {
        assert_eq!(normalize_slug("My Awesome Post"), "myawesomepost");
        assert_eq!(normalize_slug("--Rust--Tips--"), "rust-tips");
        assert_eq!(normalize_slug("a---b"), "a-b");
        assert_eq!(normalize_slug("Ünïcode & stuff-2"), "ncodestuff-2");
        assert_eq!(normalize_slug("---"), "");
    }

    #[test]
    fn tags_are_trimmed_and_deduplicated() {
        assert_eq!(parse_tags(" rust, email ,,rust, growth "), ["rust", "email", "growth"]);
        assert!(parse_tags(" , ").is_empty());
    }

    #[test]
    fn role_round_trip_strings() {
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(" USER ".parse::<Role>().unwrap(), Role::User);
        assert!("root".parse::<Role>().is_err());
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"ADMIN\"");
        assert_eq!(Role::User.to_string(), "USER");
    }

    #[test]
    fn api_error_message_preference() {
        let body: ApiErrorBody = serde_json::from_str(r#"{"error":"Forbidden"}"#).unwrap();
        assert_eq!(body.message_or("fallback"), "Forbidden");
        let body: ApiErrorBody = serde_json::from_str(r#"{"message":"Nope"}"#).unwrap();
        assert_eq!(body.message_or("fallback"), "Nope");
        let body = ApiErrorBody::default();
        assert_eq!(body.message_or("fallback"), "fallback");
    }

    #[test]
    fn dashboard_stats_from_posts() {
        let resp: BlogsResponse = serde_json::from_str(BULK_JSON).unwrap();
        let users = Pagination {
            total_pages: 1,
            total_users: 7,
            current_page: None,
        };
        let stats = DashboardStats::compute(&resp.data, Some(&users));
        assert_eq!(stats.total_posts, 2);
        assert_eq!(stats.total_likes, 12);
        assert_eq!(stats.total_comments, 3);
        assert_eq!(stats.total_users, Some(7));
    }

    #[test]
    fn dashboard_stats_prefers_pagination_total() {
        let data = BlogsData {
            posts: vec![Post::default()],
            pagination: Some(PostPagination {
                total_posts: Some(40),
            }),
        };
        let stats = DashboardStats::compute(&data, None);
        assert_eq!(stats.total_posts, 40);
        assert_eq!(stats.total_users, None);
    }
}
