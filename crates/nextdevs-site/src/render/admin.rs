//! Admin console pages.

use maud::{Markup, PreEscaped, html};
use nextdevs_core::{DashboardStats, EXCERPT_MAX_CHARS, Post, Role, UsersData};

use super::components::{Nav, format_count, format_date, page_shell, truncate};
use crate::forms::PostForm;
use crate::session::Notice;

fn admin_nav() -> Markup {
    html! {
        nav class="admin-nav" {
            a href="/admin" { "Overview" }
            a href="/admin/blogs" { "Manage Blogs" }
            a href="/admin/users" { "Manage Users" }
        }
    }
}

fn error_list(errors: &[String]) -> Markup {
    html! {
        @if !errors.is_empty() {
            div class="errors" {
                @for error in errors {
                    p { (error) }
                }
            }
        }
    }
}

/// Render the dashboard overview.
///
/// `stats` is `None` when the post listing could not be fetched; a missing
/// user total is shown as a dash.
pub fn overview(
    site_name: &str,
    admin_name: &str,
    stats: Option<&DashboardStats>,
    errors: &[String],
    notice: Option<Notice>,
) -> Markup {
    let body = html! {
        (admin_nav())
        h1 { "Dashboard Overview" }
        p { "Welcome back, " (admin_name) "." }
        (error_list(errors))
        @if let Some(stats) = stats {
            div class="stats" {
                (stat("Total Posts", Some(stats.total_posts)))
                (stat("Total Likes", Some(stats.total_likes)))
                (stat("Total Comments", Some(stats.total_comments)))
                (stat("Total Users", stats.total_users))
            }
        }
    };

    page_shell(site_name, "Dashboard", Nav::Admin, notice, body)
}

fn stat(label: &str, value: Option<u64>) -> Markup {
    html! {
        div class="stat" {
            div class="stat-value" {
                @match value {
                    Some(v) => { (format_count(v)) }
                    None => { "–" }
                }
            }
            div class="stat-label" { (label) }
        }
    }
}

/// Render the post management table.
pub fn blogs(
    site_name: &str,
    posts: &[&Post],
    term: &str,
    suggestions: &[String],
    notice: Option<Notice>,
) -> Markup {
    let body = html! {
        (admin_nav())
        div class="toolbar" {
            h1 { "Manage Blogs" }
            a class="button" href="/admin/blogs/new" { "New Post" }
        }
        form class="search" method="get" action="/admin/blogs" {
            input type="search" name="q" value=(term) placeholder="Search by title, tag or author";
            button class="button" type="submit" { "Search" }
        }
        @if !suggestions.is_empty() {
            div class="suggestions" {
                span { "Suggestions:" }
                @for suggestion in suggestions {
                    a href={"/admin/blogs?q=" (encode_query(suggestion))} { (suggestion) }
                }
            }
        }
        @if posts.is_empty() {
            p class="empty" {
                @if term.trim().is_empty() { "No posts yet." } @else { "No posts match your search." }
            }
        } @else {
            table class="data" {
                thead {
                    tr {
                        th { "Title" }
                        th { "Author" }
                        th { "Status" }
                        th { "Date" }
                        th { "Views" }
                        th { "" }
                    }
                }
                tbody {
                    @for post in posts {
                        tr {
                            td { a href={"/blog/" (post.slug)} { (truncate(&post.title, 80)) } }
                            td { (post.author_name()) }
                            td { @if post.is_published() { "Published" } @else { "Draft" } }
                            td { (format_date(post.display_date())) }
                            td { (format_count(post.view_count)) }
                            td {
                                a href={"/admin/blogs/" (post.id) "/edit"} { "Edit" }
                                " "
                                form class="inline-form" method="post" action={"/admin/blogs/" (post.id) "/delete"} {
                                    button class="button button-danger" type="submit" { "Delete" }
                                }
                            }
                        }
                    }
                }
            }
        }
    };

    page_shell(site_name, "Manage Blogs", Nav::Admin, notice, body)
}

/// Render one page of the user management table.
pub fn users(site_name: &str, data: &UsersData, page: u32, notice: Option<Notice>) -> Markup {
    let total_pages = data.pagination.total_pages.max(1);
    let body = html! {
        (admin_nav())
        h1 { "Manage Users" }
        p { (data.pagination.total_users) " users" }
        @if data.users.is_empty() {
            p class="empty" { "No users found." }
        } @else {
            table class="data" {
                thead {
                    tr {
                        th { "Name" }
                        th { "Email" }
                        th { "Joined" }
                        th { "Role" }
                    }
                }
                tbody {
                    @for user in &data.users {
                        tr {
                            td {
                                @if user.name.trim().is_empty() {
                                    span class="placeholder" { "No name" }
                                } @else {
                                    (user.name)
                                }
                            }
                            td { (user.email) }
                            td {
                                @if let Some(created) = &user.created_at {
                                    (format_date(created))
                                }
                            }
                            td {
                                form class="inline-form" method="post" action={"/admin/users/" (user.id) "/role"} {
                                    input type="hidden" name="page" value=(page);
                                    select name="role" {
                                        @for role in Role::ALL {
                                            option value=(role.as_str()) selected[role == user.role] { (role.as_str()) }
                                        }
                                    }
                                    " "
                                    button class="button" type="submit" { "Save" }
                                }
                            }
                        }
                    }
                }
            }
        }
        div class="pager" {
            @if page > 1 {
                a href={"/admin/users?page=" (page - 1)} { "← Previous" }
            }
            span { "Page " (page) " of " (total_pages) }
            @if page < total_pages {
                a href={"/admin/users?page=" (page + 1)} { "Next →" }
            }
        }
    };

    page_shell(site_name, "Manage Users", Nav::Admin, notice, body)
}

/// Which post the editor page is working on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorTarget<'a> {
    New,
    Existing(&'a str),
}

impl EditorTarget<'_> {
    fn action(self) -> String {
        match self {
            EditorTarget::New => "/admin/blogs/new".to_string(),
            EditorTarget::Existing(id) => format!("/admin/blogs/{id}/edit"),
        }
    }
}

/// Render the post editor.
///
/// `preview` is the already-rendered body HTML from
/// [`ContentRenderer`](nextdevs_core::ContentRenderer); it is inserted
/// unescaped.
pub fn post_editor(
    site_name: &str,
    target: EditorTarget<'_>,
    form: &PostForm,
    preview: Option<&str>,
    error: Option<&str>,
    notice: Option<Notice>,
) -> Markup {
    let (title, submit) = match target {
        EditorTarget::New => ("Create New Blog Post", "Create Post"),
        EditorTarget::Existing(_) => ("Edit Blog Post", "Save Changes"),
    };

    let body = html! {
        (admin_nav())
        h1 { (title) }
        @if let Some(error) = error {
            div class="notice notice-error" role="alert" { (error) }
        }
        form class="editor" method="post" action=(target.action()) {
            div class="field" {
                label for="title" { "Title" }
                input id="title" type="text" name="title" value=(form.title) required;
            }
            div class="field" {
                label for="content" { "Content" }
                textarea id="content" name="content" rows="14" required { (form.content) }
                span class="hint" { "Plain text or HTML. Unsafe markup is removed when the post is shown." }
            }
            div class="field" {
                label for="excerpt" { "Excerpt (Optional)" }
                textarea id="excerpt" name="excerpt" rows="3" maxlength=(EXCERPT_MAX_CHARS) { (form.excerpt) }
            }
            div class="field" {
                label for="image_url" { "Image URL (Optional)" }
                input id="image_url" type="url" name="image_url" value=(form.image_url)
                    placeholder="https://example.com/blog-hero-image.jpg";
            }
            div class="field" {
                label for="slug" { "Custom Slug (Optional)" }
                input id="slug" type="text" name="slug" value=(form.slug) placeholder="your-blog-post-slug";
                span class="hint" { "Will be auto-generated from title if left blank." }
            }
            div class="field" {
                label for="tags" { "Tags (Optional)" }
                input id="tags" type="text" name="tags" value=(form.tags) placeholder="growth, email, tips";
            }
            div class="field" {
                label for="read_time" { "Estimated Read Time (minutes, Optional)" }
                input id="read_time" type="number" name="read_time" min="1" value=(form.read_time);
            }
            label class="check" {
                input type="checkbox" name="published" value="true" checked[form.published];
                "Publish now"
            }
            label class="check" {
                input type="checkbox" name="featured" value="true" checked[form.featured];
                "Mark as featured"
            }
            div class="actions" {
                button class="button" type="submit" name="intent" value="save" { (submit) }
                button class="button button-secondary" type="submit" name="intent" value="preview" { "Preview" }
                a href="/admin/blogs" { "Cancel" }
            }
        }
        @if let Some(preview) = preview {
            section class="preview" {
                h2 { "Preview" }
                @if preview.is_empty() {
                    p class="placeholder" { "Nothing to preview yet." }
                } @else {
                    div class="article-content" { (PreEscaped(preview)) }
                }
            }
        }
    };

    page_shell(site_name, title, Nav::Admin, notice, body)
}

/// Percent-encode a query value.
fn encode_query(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use nextdevs_core::{Pagination, UserData};

    fn users_data(total_pages: u32) -> UsersData {
        UsersData {
            users: vec![
                UserData {
                    id: "u1".to_string(),
                    name: "Ada".to_string(),
                    email: "ada@x.test".to_string(),
                    role: Role::Admin,
                    ..Default::default()
                },
                UserData {
                    id: "u2".to_string(),
                    name: "<Bob>".to_string(),
                    email: "bob@x.test".to_string(),
                    role: Role::User,
                    ..Default::default()
                },
            ],
            pagination: Pagination {
                total_pages,
                total_users: 12,
                current_page: None,
            },
        }
    }

    #[test]
    fn overview_shows_stats_and_errors() {
        let stats = DashboardStats {
            total_posts: 4,
            total_likes: 1_200,
            total_comments: 9,
            total_users: None,
        };
        let page = overview(
            "Site",
            "Ada",
            Some(&stats),
            &["Failed to fetch users.".to_string()],
            None,
        )
        .into_string();
        assert!(page.contains("1.2K"));
        assert!(page.contains("Failed to fetch users."));
        assert!(page.contains("Welcome back, Ada."));
    }

    #[test]
    fn blogs_table_has_delete_forms() {
        let post = Post {
            id: "p1".to_string(),
            title: "Hello".to_string(),
            slug: "hello".to_string(),
            ..Default::default()
        };
        let page = blogs("Site", &[&post], "", &[], None).into_string();
        assert!(page.contains("action=\"/admin/blogs/p1/delete\""));
        assert!(page.contains("href=\"/admin/blogs/p1/edit\""));
        assert!(page.contains("href=\"/admin/blogs/new\""));
    }

    #[test]
    fn blogs_search_state() {
        let page = blogs("Site", &[], "rust", &["Rust Tips".to_string()], None).into_string();
        assert!(page.contains("No posts match your search."));
        assert!(page.contains("href=\"/admin/blogs?q=Rust%20Tips\""));
        assert!(page.contains("value=\"rust\""));
    }

    #[test]
    fn users_table_marks_current_role() {
        let page = users("Site", &users_data(2), 1, None).into_string();
        assert!(page.contains("&lt;Bob&gt;"));
        assert!(page.contains("action=\"/admin/users/u2/role\""));
        assert!(page.contains("<option value=\"ADMIN\" selected>ADMIN</option>"));
        assert!(page.contains("Page 1 of 2"));
        assert!(page.contains("/admin/users?page=2"));
        assert!(!page.contains("/admin/users?page=0"));
    }

    #[test]
    fn users_last_page_has_no_next() {
        let page = users("Site", &users_data(2), 2, None).into_string();
        assert!(page.contains("/admin/users?page=1"));
        assert!(!page.contains("/admin/users?page=3"));
    }

    #[test]
    fn users_without_name_show_placeholder() {
        let mut data = users_data(1);
        data.users[0].name = String::new();
        let page = users("Site", &data, 1, None).into_string();
        assert!(page.contains("No name"));
        assert!(page.contains("ada@x.test"));
    }

    #[test]
    fn editor_for_new_post() {
        let form = PostForm {
            title: "Draft \"one\"".to_string(),
            content: "</textarea><script>".to_string(),
            featured: true,
            ..Default::default()
        };
        let page = post_editor("Site", EditorTarget::New, &form, None, None, None).into_string();
        assert!(page.contains("action=\"/admin/blogs/new\""));
        assert!(page.contains("Create Post"));
        assert!(page.contains("value=\"Draft &quot;one&quot;\""));
        assert!(page.contains("&lt;/textarea&gt;&lt;script&gt;"));
        assert!(page.contains("name=\"featured\" value=\"true\" checked"));
        assert!(!page.contains("name=\"published\" value=\"true\" checked"));
        assert!(!page.contains("class=\"preview\""));
    }

    #[test]
    fn editor_for_existing_post_with_preview() {
        let form = PostForm::default();
        let page = post_editor(
            "Site",
            EditorTarget::Existing("p9"),
            &form,
            Some("<p>Rendered <strong>body</strong></p>"),
            Some("Title and content are required for a blog post."),
            None,
        )
        .into_string();
        assert!(page.contains("action=\"/admin/blogs/p9/edit\""));
        assert!(page.contains("Save Changes"));
        assert!(page.contains("<p>Rendered <strong>body</strong></p>"));
        assert!(page.contains("role=\"alert\""));
    }

    #[test]
    fn editor_empty_preview_placeholder() {
        let page = post_editor(
            "Site",
            EditorTarget::New,
            &PostForm::default(),
            Some(""),
            None,
            None,
        )
        .into_string();
        assert!(page.contains("Nothing to preview yet."));
    }

    #[test]
    fn encode_query_escapes() {
        assert_eq!(encode_query("a b&c"), "a%20b%26c");
        assert_eq!(encode_query("safe-_.~"), "safe-_.~");
    }
}
