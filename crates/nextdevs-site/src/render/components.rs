//! Shared HTML components used across all pages.
//!
//! These are maud functions that return `Markup` fragments for composition
//! into full pages.

use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::session::{Notice, NoticeKind};

/// Inline CSS for all pages.
pub const PAGE_CSS: &str = r#"
*{margin:0;padding:0;box-sizing:border-box}
:root{--bg:#fafafa;--fg:#111;--fg2:#555;--fg3:#999;--accent:#2563eb;--accent-hover:#1d4ed8;--surface:#fff;--border:rgba(37,99,235,.15);--ok:#15803d;--err:#b91c1c;--mono:"SF Mono",SFMono-Regular,ui-monospace,Menlo,monospace}
body{font-family:Inter,-apple-system,BlinkMacSystemFont,"Segoe UI",Roboto,sans-serif;line-height:1.6;color:var(--fg);background:var(--bg);min-height:100vh;display:flex;flex-direction:column;align-items:center;padding:1.5rem 1rem}
main{max-width:960px;width:100%;flex:1}
a{color:var(--accent);text-decoration:none}
a:hover{text-decoration:underline}
img{max-width:100%;height:auto}

.site-header{max-width:960px;width:100%;display:flex;align-items:center;justify-content:space-between;margin-bottom:2rem}
.site-name{font-weight:700;font-size:1.2rem;color:var(--fg)}
.site-nav{display:flex;gap:1.25rem;align-items:center;font-size:.95rem}
.inline-form{display:inline}
.link-button{background:none;border:none;color:var(--accent);cursor:pointer;font:inherit;padding:0}

.notice{padding:.75rem 1rem;border-radius:8px;margin-bottom:1.5rem;font-size:.95rem}
.notice-success{background:rgba(21,128,61,.08);color:var(--ok)}
.notice-error{background:rgba(185,28,28,.08);color:var(--err)}

.hero{padding:3rem 0;text-align:center}
.hero h1{font-size:2.4rem;letter-spacing:-.02em;margin-bottom:1rem}
.hero p{color:var(--fg2);font-size:1.15rem;margin-bottom:1.5rem}
.button{display:inline-block;padding:.55rem 1.1rem;background:var(--accent);color:#fff;border:none;border-radius:6px;font-size:.9rem;font-weight:500;cursor:pointer}
.button:hover{background:var(--accent-hover);text-decoration:none}
.button-danger{background:var(--err)}

.featured{display:grid;grid-template-columns:1fr 1fr;gap:1.5rem;padding:1.5rem;border:1px solid var(--border);border-radius:10px;margin-bottom:2rem}
.post-grid{display:grid;grid-template-columns:repeat(auto-fill,minmax(280px,1fr));gap:1.25rem}
.post-card{padding:1.25rem;border:1px solid var(--border);border-radius:10px;display:flex;flex-direction:column;gap:.5rem}
.post-card img,.featured img{width:100%;aspect-ratio:16/9;object-fit:cover;border-radius:8px}
.post-meta{font-size:.85rem;color:var(--fg3);display:flex;gap:.75rem;flex-wrap:wrap}
.post-title{font-size:1.2rem;font-weight:700;color:var(--fg);line-height:1.3}
.post-excerpt{color:var(--fg2)}
.tags{display:flex;gap:.4rem;flex-wrap:wrap}
.tag{font-size:.75rem;padding:.15rem .55rem;border-radius:100px;background:var(--border);color:var(--accent)}
.empty{text-align:center;padding:4rem 0;color:var(--fg2)}

.article-title{font-size:2rem;font-weight:700;margin-bottom:.5rem;line-height:1.25;letter-spacing:-.01em}
.article-image{width:100%;max-height:360px;object-fit:cover;border-radius:8px;margin:1rem 0}
.article-content{font-size:1.05rem;line-height:1.75;color:var(--fg);margin:1.5rem 0}
.article-content h1,.article-content h2,.article-content h3,.article-content h4{font-weight:700;margin:1.5rem 0 .75rem}
.article-content p{margin:.75rem 0}
.article-content ul,.article-content ol{margin:.75rem 0;padding-left:1.5rem}
.article-content blockquote{border-left:3px solid var(--border);padding:.5rem 0 .5rem 1rem;margin:.75rem 0;color:var(--fg2)}
.article-content pre{background:var(--surface);border:1px solid var(--border);border-radius:6px;padding:.75rem 1rem;overflow-x:auto;margin:.75rem 0;font-size:.85rem}
.article-content code{font-family:var(--mono);font-size:.88em}
.article-content table{border-collapse:collapse;width:100%;margin:.75rem 0}
.article-content th,.article-content td{border:1px solid var(--border);padding:.4rem .75rem;text-align:left}
.placeholder{color:var(--fg3);font-style:italic}

.stats{display:grid;grid-template-columns:repeat(auto-fill,minmax(180px,1fr));gap:1rem;margin:1.5rem 0}
.stat{padding:1.25rem;border:1px solid var(--border);border-radius:10px}
.stat-value{font-size:1.8rem;font-weight:700}
.stat-label{color:var(--fg3);font-size:.85rem}
.errors{color:var(--err);margin:1rem 0}
.admin-nav{display:flex;gap:1rem;margin-bottom:1.5rem;font-weight:500}
.search{display:flex;gap:.5rem;margin-bottom:.75rem}
.search input{flex:1}
.suggestions{display:flex;gap:.5rem;flex-wrap:wrap;font-size:.85rem;margin-bottom:1rem;color:var(--fg3)}
table.data{border-collapse:collapse;width:100%;font-size:.92rem}
table.data th,table.data td{border-bottom:1px solid var(--border);padding:.55rem .5rem;text-align:left;vertical-align:middle}
table.data th{color:var(--fg3);font-weight:600}
.pager{display:flex;gap:1rem;align-items:center;justify-content:center;margin:1.5rem 0;color:var(--fg2)}
input,select,textarea{font:inherit;padding:.45rem .6rem;border:1px solid var(--border);border-radius:6px;background:var(--surface);color:var(--fg)}
.toolbar{display:flex;justify-content:space-between;align-items:center;margin-bottom:1rem}
.editor{display:grid;gap:.25rem;margin-bottom:1.5rem}
.editor textarea{width:100%;resize:vertical}
.editor .hint{font-size:.8rem;color:var(--fg3)}
.check{display:flex;gap:.5rem;align-items:center;margin-bottom:.75rem}
.actions{display:flex;gap:.75rem;align-items:center;margin-top:.5rem}
.button-secondary{background:var(--fg2)}
.preview{border-top:1px solid var(--border);padding-top:1rem}

.auth-card{max-width:380px;margin:2rem auto;padding:1.75rem;border:1px solid var(--border);border-radius:10px}
.auth-card h1{font-size:1.6rem;margin-bottom:.25rem}
.auth-card p{color:var(--fg2);margin-bottom:1.25rem}
.field{display:flex;flex-direction:column;gap:.3rem;margin-bottom:1rem}
.field input,.field textarea{width:100%}
.auth-switch{margin-top:1rem;font-size:.9rem}

.footer{text-align:center;margin-top:2rem;padding-top:.75rem;font-size:.8rem;color:var(--fg3);width:100%;max-width:960px}

@media(max-width:700px){.featured{grid-template-columns:1fr}}
@media(prefers-color-scheme:dark){
:root{--bg:#0a0a0f;--fg:#e5e5e5;--fg2:#a0a0a0;--fg3:#666;--accent:#60a5fa;--accent-hover:#93c5fd;--surface:#111118;--border:rgba(96,165,250,.2)}
}
"#;

/// Inline CSS for error pages.
pub const ERROR_CSS: &str = r#"
*{margin:0;padding:0;box-sizing:border-box}
body{font-family:-apple-system,BlinkMacSystemFont,"Segoe UI",Roboto,sans-serif;display:flex;justify-content:center;align-items:center;min-height:100vh;background:#fafafa;color:#1a1a2e;padding:1rem}
.error-page{text-align:center;max-width:400px}
.error-page h1{font-size:1.5rem;margin-bottom:.75rem}
.error-page p{color:#666;margin-bottom:1rem;line-height:1.5}
.error-page a{color:#2563eb}
@media(prefers-color-scheme:dark){
body{background:#0f0f17;color:#e0e0e8}
.error-page p{color:#aaa}
.error-page a{color:#60a5fa}
}
"#;

/// Content-Security-Policy header value.
///
/// No scripts at all; forms may only post back to this origin.
pub const CSP_HEADER: &str = "default-src 'none'; style-src 'unsafe-inline'; img-src https: http: data:; form-action 'self'; frame-ancestors 'none'; base-uri 'none'";

/// Navigation variant shown in the page header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nav {
    Public,
    Admin,
}

/// Render the full HTML page shell.
pub fn page_shell(
    site_name: &str,
    title: &str,
    nav: Nav,
    notice: Option<Notice>,
    body_content: Markup,
) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) " | " (site_name) }
                @if nav == Nav::Admin {
                    meta name="robots" content="noindex";
                }
                style { (PreEscaped(PAGE_CSS)) }
            }
            body {
                header class="site-header" {
                    a class="site-name" href="/" { (site_name) }
                    nav class="site-nav" {
                        a href="/" { "Home" }
                        a href="/blog" { "Blog" }
                        a href="/admin" { "Dashboard" }
                        @match nav {
                            Nav::Public => {
                                a href="/signin" { "Sign in" }
                            }
                            Nav::Admin => {
                                form class="inline-form" method="post" action="/signout" {
                                    button class="link-button" type="submit" { "Sign out" }
                                }
                            }
                        }
                    }
                }
                main {
                    @if let Some(notice) = notice {
                        (notice_banner(notice))
                    }
                    (body_content)
                }
                footer class="footer" {
                    "© " (site_name)
                }
            }
        }
    }
}

/// Render a one-shot notice.
pub fn notice_banner(notice: Notice) -> Markup {
    let class = match notice.kind() {
        NoticeKind::Success => "notice notice-success",
        NoticeKind::Error => "notice notice-error",
    };
    html! {
        div class=(class) role="status" { (notice.message()) }
    }
}

/// Check if a URL is safe to use in `src` or `href` attributes.
pub fn is_safe_url(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}

/// Truncate a string to a maximum length, appending "..." if truncated.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        let mut end = max_len;
        while !s.is_char_boundary(end) && end > 0 {
            end -= 1;
        }
        format!("{}...", &s[..end])
    }
}

/// Format an API timestamp as "Month D, YYYY".
///
/// Accepts RFC 3339 timestamps and bare `YYYY-MM-DD` dates; anything else is
/// shown as-is.
pub fn format_date(raw: &str) -> String {
    let raw = raw.trim();
    if let Ok(ts) = chrono::DateTime::parse_from_rfc3339(raw) {
        return ts.format("%B %-d, %Y").to_string();
    }
    let date_part = raw.get(..10).unwrap_or(raw);
    match chrono::NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
        Ok(date) => date.format("%B %-d, %Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Format a count with K/M suffixes for display.
pub fn format_count(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}
