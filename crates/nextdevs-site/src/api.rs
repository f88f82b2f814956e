//! Client for the remote blog/user REST API.
//!
//! Every admin call forwards the caller's bearer token; the backend decides
//! whether the call is allowed.

use axum::http::{StatusCode, header};
use nextdevs_core::{
    ApiErrorBody, BlogsData, BlogsResponse, PostInput, Role, UsersData, UsersResponse,
};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::SiteError;

/// Users shown per page in the admin user table.
pub const USERS_PAGE_SIZE: u32 = 10;

/// Avatar service used when a new account does not supply one.
const DEFAULT_AVATAR_BASE: &str = "https://api.dicebear.com/8.x/pixel-art-neutral/svg";

/// Credentials posted to the sign-in endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Account details posted to the sign-up endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub avatar: String,
    pub bio: String,
}

/// Body of a successful sign-in or sign-up.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct SessionBody {
    token: Option<String>,
    jwt: Option<String>,
    message: Option<String>,
}

/// Result of a successful sign-in.
#[derive(Debug, Clone, PartialEq)]
pub struct SignIn {
    pub token: String,
    pub message: Option<String>,
}

/// Generated avatar URL for `seed` (the account name or email).
pub fn default_avatar_url(seed: &str) -> String {
    let seed = if seed.trim().is_empty() {
        "default-user"
    } else {
        seed.trim()
    };
    match Url::parse_with_params(
        DEFAULT_AVATAR_BASE,
        &[("seed", seed), ("size", "128"), ("radius", "50")],
    ) {
        Ok(url) => url.into(),
        Err(_) => DEFAULT_AVATAR_BASE.to_string(),
    }
}

/// Validate a record ID taken from a request path before it becomes a URL
/// segment. Dot segments would be dropped from the URL and address a
/// different endpoint.
fn resource_id(id: &str) -> Result<&str, SiteError> {
    let id = id.trim();
    if id.is_empty() || id == "." || id == ".." {
        return Err(SiteError::BadRequest(format!("invalid id {id:?}")));
    }
    Ok(id)
}

/// Thin wrapper around a shared [`reqwest::Client`].
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token_cookie: String,
}

impl ApiClient {
    /// Build a client from configuration.
    pub fn new(config: &Config) -> Result<Self, SiteError> {
        let http = reqwest::Client::builder()
            .timeout(config.api_timeout)
            .user_agent(concat!("nextdevs-site/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let base_url = Url::parse(&config.api_base_url).map_err(|e| {
            anyhow::anyhow!("invalid API base URL {:?}: {e}", config.api_base_url)
        })?;
        if base_url.cannot_be_a_base() {
            return Err(anyhow::anyhow!("API base URL {base_url} cannot carry a path").into());
        }

        Ok(Self {
            http,
            base_url,
            token_cookie: config.token_cookie.clone(),
        })
    }

    /// Endpoint URL for `segments`, each percent-encoded as a single path
    /// segment.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// `GET /api/v1/blog/bulk`, the public post listing.
    pub async fn fetch_posts(&self, token: Option<&str>) -> Result<BlogsData, SiteError> {
        let mut request = self.http.get(self.endpoint(&["api", "v1", "blog", "bulk"]));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        let body: BlogsResponse =
            read_json(request.send().await?, "Failed to fetch blog posts.").await?;
        tracing::debug!(posts = body.data.posts.len(), "fetched posts");
        Ok(body.data)
    }

    /// `GET /api/v1/user/admin/users?page=&limit=`.
    pub async fn fetch_users(
        &self,
        token: &str,
        page: u32,
        limit: u32,
    ) -> Result<UsersData, SiteError> {
        let request = self
            .http
            .get(self.endpoint(&["api", "v1", "user", "admin", "users"]))
            .query(&[("page", page), ("limit", limit)])
            .bearer_auth(token);
        let body: UsersResponse =
            read_json(request.send().await?, "Failed to fetch users.").await?;
        tracing::debug!(
            users = body.data.users.len(),
            total_users = body.data.pagination.total_users,
            page,
            "fetched users"
        );
        Ok(body.data)
    }

    /// `POST /api/v1/blog`.
    pub async fn create_post(&self, token: &str, input: &PostInput) -> Result<(), SiteError> {
        let response = self
            .http
            .post(self.endpoint(&["api", "v1", "blog"]))
            .bearer_auth(token)
            .json(input)
            .send()
            .await?;
        ensure_success(response, "Failed to create blog post. Please try again.").await?;
        tracing::info!(title = %input.title, published = input.published, "post created");
        Ok(())
    }

    /// `PUT /api/v1/blog/{id}`.
    pub async fn update_post(
        &self,
        token: &str,
        id: &str,
        input: &PostInput,
    ) -> Result<(), SiteError> {
        let id = resource_id(id)?;
        let response = self
            .http
            .put(self.endpoint(&["api", "v1", "blog", id]))
            .bearer_auth(token)
            .json(input)
            .send()
            .await?;
        ensure_success(response, "Failed to update blog post.").await?;
        tracing::info!(post_id = %id, published = input.published, "post updated");
        Ok(())
    }

    /// `DELETE /api/v1/blog/{id}`.
    pub async fn delete_post(&self, token: &str, id: &str) -> Result<(), SiteError> {
        let id = resource_id(id)?;
        let response = self
            .http
            .delete(self.endpoint(&["api", "v1", "blog", id]))
            .bearer_auth(token)
            .send()
            .await?;
        ensure_success(response, "Failed to delete post.").await?;
        tracing::info!(post_id = %id, "post deleted");
        Ok(())
    }

    /// `PUT /api/v1/user/admin/users/{id}/role`.
    pub async fn update_user_role(
        &self,
        token: &str,
        id: &str,
        role: Role,
    ) -> Result<(), SiteError> {
        let id = resource_id(id)?;
        let response = self
            .http
            .put(self.endpoint(&["api", "v1", "user", "admin", "users", id, "role"]))
            .bearer_auth(token)
            .json(&serde_json::json!({ "role": role }))
            .send()
            .await?;
        ensure_success(response, "Failed to update user role.").await?;
        tracing::info!(user_id = %id, role = %role, "user role updated");
        Ok(())
    }

    /// `POST /api/v1/user/signin`.
    ///
    /// The token is taken from the JSON body when present, otherwise from the
    /// token cookie the backend sets on its own origin.
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<SignIn, SiteError> {
        let response = self
            .http
            .post(self.endpoint(&["api", "v1", "user", "signin"]))
            .json(credentials)
            .send()
            .await?;

        let response =
            ensure_success(response, "Sign in failed. Please check your credentials.").await?;

        self.session_from(response)
            .await
            .ok_or_else(|| SiteError::Backend {
                status: StatusCode::BAD_GATEWAY,
                message: "Sign in succeeded but no token was returned.".to_string(),
            })
    }

    /// `POST /api/v1/user/signup`.
    ///
    /// Returns `None` when the account was created but the backend did not
    /// start a session for it.
    pub async fn sign_up(&self, account: &NewAccount) -> Result<Option<SignIn>, SiteError> {
        let response = self
            .http
            .post(self.endpoint(&["api", "v1", "user", "signup"]))
            .json(account)
            .send()
            .await?;

        let response = ensure_success(response, "Sign up failed. Please try again.").await?;
        tracing::info!(email = %account.email, "account created");
        Ok(self.session_from(response).await)
    }

    /// Session token of a successful sign-in or sign-up response.
    async fn session_from(&self, response: reqwest::Response) -> Option<SignIn> {
        let from_cookie = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find_map(|v| set_cookie_value(v, &self.token_cookie));

        let body: SessionBody = response.json().await.unwrap_or_default();

        body.token
            .or(body.jwt)
            .or(from_cookie)
            .filter(|t| !t.trim().is_empty())
            .map(|token| SignIn {
                token,
                message: body.message,
            })
    }
}

/// Turn a non-success response into [`SiteError::Backend`] with the
/// backend's own message when it sent one.
async fn ensure_success(
    response: reqwest::Response,
    fallback: &str,
) -> Result<reqwest::Response, SiteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body: ApiErrorBody = response.json().await.unwrap_or_default();
    Err(SiteError::Backend {
        status,
        message: body.message_or(fallback),
    })
}

async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
    fallback: &str,
) -> Result<T, SiteError> {
    let response = ensure_success(response, fallback).await?;
    Ok(response.json().await?)
}

/// Value of cookie `name` in a single `Set-Cookie` header value.
fn set_cookie_value(set_cookie: &str, name: &str) -> Option<String> {
    let pair = set_cookie.split(';').next()?;
    let (key, value) = pair.split_once('=')?;
    (key.trim() == name && !value.trim().is_empty()).then(|| value.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::test_config;

    #[test]
    fn set_cookie_value_extracts_named_cookie() {
        assert_eq!(
            set_cookie_value("jwtToken=abc.def.ghi; Path=/; HttpOnly", "jwtToken").as_deref(),
            Some("abc.def.ghi")
        );
        assert_eq!(set_cookie_value("other=1; Path=/", "jwtToken"), None);
        assert_eq!(set_cookie_value("jwtToken=; Max-Age=0", "jwtToken"), None);
    }

    #[test]
    fn endpoint_joins_base_and_segments() {
        let client = ApiClient::new(&test_config()).unwrap();
        assert_eq!(
            client.endpoint(&["api", "v1", "blog", "bulk"]).as_str(),
            "http://127.0.0.1:9/api/v1/blog/bulk"
        );
    }

    #[test]
    fn endpoint_keeps_base_path_prefix() {
        let mut config = test_config();
        config.api_base_url = "http://127.0.0.1:9/backend".to_string();
        let client = ApiClient::new(&config).unwrap();
        assert_eq!(
            client.endpoint(&["api", "v1", "blog"]).as_str(),
            "http://127.0.0.1:9/backend/api/v1/blog"
        );
    }

    #[test]
    fn endpoint_encodes_ids_as_one_segment() {
        let client = ApiClient::new(&test_config()).unwrap();
        let url = client.endpoint(&["api", "v1", "blog", "../user/admin/users"]);
        assert_eq!(url.path(), "/api/v1/blog/..%2Fuser%2Fadmin%2Fusers");
        let url = client.endpoint(&["api", "v1", "blog", "a b?c#d"]);
        assert_eq!(url.path(), "/api/v1/blog/a%20b%3Fc%23d");
        assert_eq!(url.query(), None);
    }

    #[test]
    fn dot_segment_ids_rejected() {
        for bad in ["", " ", ".", ".."] {
            assert!(matches!(resource_id(bad), Err(SiteError::BadRequest(_))), "{bad:?}");
        }
        assert_eq!(resource_id(" p1 ").unwrap(), "p1");
    }

    #[tokio::test]
    async fn delete_with_dot_segment_id_never_reaches_backend() {
        let client = ApiClient::new(&test_config()).unwrap();
        let err = client.delete_post("t", "..").await.unwrap_err();
        assert!(matches!(err, SiteError::BadRequest(_)));
    }

    #[test]
    fn default_avatar_is_seeded_by_name() {
        let url = default_avatar_url("Ada Lovelace");
        assert!(url.starts_with("https://api.dicebear.com/8.x/pixel-art-neutral/svg?seed=Ada"));
        assert!(url.contains("Lovelace"));
        assert!(url.contains("size=128"));
        assert!(default_avatar_url("  ").contains("seed=default-user"));
    }

    #[test]
    fn new_account_serializes_role_upper_case() {
        let account = NewAccount {
            name: "Ada".to_string(),
            email: "ada@x.test".to_string(),
            password: "secret1".to_string(),
            role: Role::User,
            avatar: String::new(),
            bio: String::new(),
        };
        let json = serde_json::to_value(&account).unwrap();
        assert_eq!(json["role"], "USER");
        assert_eq!(json["email"], "ada@x.test");
    }

    #[test]
    fn credentials_serialize_as_expected() {
        let creds = Credentials {
            email: "a@b.test".to_string(),
            password: "pw".to_string(),
        };
        let json = serde_json::to_value(&creds).unwrap();
        assert_eq!(json, serde_json::json!({ "email": "a@b.test", "password": "pw" }));
    }

    #[test]
    fn session_body_accepts_either_token_field() {
        let body: SessionBody = serde_json::from_str(r#"{"jwt":"x.y.z","user":{}}"#).unwrap();
        assert_eq!(body.jwt.as_deref(), Some("x.y.z"));
        let body: SessionBody = serde_json::from_str(r#"{"token":"a.b.c"}"#).unwrap();
        assert_eq!(body.token.as_deref(), Some("a.b.c"));
    }
}
