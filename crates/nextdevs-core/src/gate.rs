//! Admin access gate.
//!
//! Decides whether a client may see admin-only pages from the claims embedded
//! in its bearer token. By default the token is decoded **without** verifying
//! its signature, so the decision is advisory: it keeps protected pages from
//! rendering for the wrong audience, while the backend re-checks every admin
//! request on its own.
//!
//! When a signing secret is configured the gate also verifies the HS256
//! signature, and the expiry when the token carries one.

use std::collections::HashSet;

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Deserializer, Serialize};

use crate::ADMIN_ROLE;
use crate::error::Result;

// =============================================================================
// ClaimSet
// =============================================================================

/// Read a string claim leniently: numbers become their decimal text, and
/// any other non-string value reads as absent.
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        match Option::<serde_json::Value>::deserialize(deserializer)? {
            Some(serde_json::Value::String(s)) => Some(s),
            Some(serde_json::Value::Number(n)) => Some(n.to_string()),
            _ => None,
        },
    )
}

/// Decoded (not necessarily verified) token payload.
///
/// Named claims are read with [`lenient_string`], so a claim of an
/// unexpected type never makes an otherwise valid token unreadable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClaimSet {
    /// Role claim, e.g. `"ADMIN"` or `"USER"`.
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub role: Option<String>,

    /// Subject.
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub sub: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub email: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,

    /// Every other claim (`id`, `exp`, `iat`, ...), kept untyped.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ClaimSet {
    /// Best available user identifier (`id` claim, then `sub`).
    pub fn user_id(&self) -> Option<String> {
        match self.extra.get("id") {
            Some(serde_json::Value::String(id)) => Some(id.clone()),
            Some(serde_json::Value::Number(id)) => Some(id.to_string()),
            _ => self.sub.clone(),
        }
    }

    /// Best available display label (`name`, then `email`, then the ID).
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .or_else(|| self.email.clone())
            .or_else(|| self.user_id())
            .unwrap_or_else(|| "admin".to_string())
    }

    /// Returns `true` if the role claim equals `role` exactly.
    pub fn has_role(&self, role: &str) -> bool {
        self.role.as_deref() == Some(role)
    }
}

// =============================================================================
// AccessDecision
// =============================================================================

/// Why access was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// No token was supplied.
    MissingToken,
    /// A token was supplied but could not be decoded (or failed verification).
    MalformedToken,
    /// The token decoded fine but does not carry the admin role.
    InsufficientRole,
}

/// Outcome of an access check.
#[derive(Debug, Clone, PartialEq)]
pub enum AccessDecision {
    /// The claims carry the admin role.
    Authorized(ClaimSet),
    /// Access refused.
    Unauthorized(DenyReason),
}

impl AccessDecision {
    /// Returns `true` for [`AccessDecision::Authorized`].
    pub fn is_authorized(&self) -> bool {
        matches!(self, Self::Authorized(_))
    }

    /// The decoded claims, if access was granted.
    pub fn claims(&self) -> Option<&ClaimSet> {
        match self {
            Self::Authorized(claims) => Some(claims),
            Self::Unauthorized(_) => None,
        }
    }

    /// Where an unauthorized client should be sent.
    ///
    /// Anonymous clients go to the sign-in page; signed-in non-admins go home.
    pub fn redirect_target(&self) -> Option<&'static str> {
        match self {
            Self::Authorized(_) => None,
            Self::Unauthorized(DenyReason::MissingToken | DenyReason::MalformedToken) => {
                Some("/signin")
            }
            Self::Unauthorized(DenyReason::InsufficientRole) => Some("/"),
        }
    }
}

// =============================================================================
// AccessGate
// =============================================================================

/// Computes [`AccessDecision`]s from bearer tokens.
#[derive(Clone)]
pub struct AccessGate {
    admin_role: String,
    verification: Option<DecodingKey>,
}

impl Default for AccessGate {
    fn default() -> Self {
        Self {
            admin_role: ADMIN_ROLE.to_string(),
            verification: None,
        }
    }
}

impl AccessGate {
    /// Create a decode-only gate that admits the `"ADMIN"` role.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the role string that grants access.
    pub fn with_admin_role(mut self, role: impl Into<String>) -> Self {
        self.admin_role = role.into();
        self
    }

    /// Enables HS256 signature verification with the given secret. An `exp`
    /// claim is enforced when present but not required.
    pub fn with_verification_secret(mut self, secret: &[u8]) -> Self {
        self.verification = Some(DecodingKey::from_secret(secret));
        self
    }

    /// The role string that grants access.
    pub fn admin_role(&self) -> &str {
        &self.admin_role
    }

    /// Returns `true` if tokens are signature-checked.
    pub fn verifies_signatures(&self) -> bool {
        self.verification.is_some()
    }

    /// Decode a token into its claims.
    ///
    /// Without a verification secret the signature, expiry and audience are
    /// all ignored; only the structure and the JSON payload must be valid.
    pub fn decode(&self, token: &str) -> Result<ClaimSet> {
        let data = match &self.verification {
            Some(key) => {
                let mut validation = Validation::new(Algorithm::HS256);
                validation.validate_aud = false;
                validation.required_spec_claims = HashSet::new();
                decode::<ClaimSet>(token, key, &validation)?
            }
            None => {
                let mut validation = Validation::new(Algorithm::HS256);
                validation.insecure_disable_signature_validation();
                validation.validate_exp = false;
                validation.validate_aud = false;
                validation.required_spec_claims = HashSet::new();
                decode::<ClaimSet>(token, &DecodingKey::from_secret(&[]), &validation)?
            }
        };
        Ok(data.claims)
    }

    /// Decide whether the holder of `token` may view admin pages.
    ///
    /// Never fails: absent, malformed and non-admin tokens all produce
    /// [`AccessDecision::Unauthorized`].
    pub fn check(&self, token: Option<&str>) -> AccessDecision {
        let Some(token) = token.map(str::trim).filter(|t| !t.is_empty()) else {
            return AccessDecision::Unauthorized(DenyReason::MissingToken);
        };

        match self.decode(token) {
            Ok(claims) if claims.has_role(&self.admin_role) => AccessDecision::Authorized(claims),
            Ok(claims) => {
                tracing::debug!(role = ?claims.role, "token lacks admin role");
                AccessDecision::Unauthorized(DenyReason::InsufficientRole)
            }
            Err(e) => {
                tracing::debug!(error = %e, "token could not be decoded");
                AccessDecision::Unauthorized(DenyReason::MalformedToken)
            }
        }
    }
}

impl std::fmt::Debug for AccessGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessGate")
            .field("admin_role", &self.admin_role)
            .field("verifies_signatures", &self.verifies_signatures())
            .finish()
    }
}

// =============================================================================
// PageGate
// =============================================================================

/// Lifecycle state of a protected page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// The access check has not resolved yet.
    Checking,
    /// Protected content may render.
    Authorized,
    /// Terminal. The page redirects away.
    Unauthorized,
}

/// A redirect owed to an unauthorized client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Redirect {
    /// Path to navigate to.
    pub location: &'static str,
    /// Why access was refused.
    pub reason: DenyReason,
}

/// Per-page consumer of [`AccessGate`] decisions.
///
/// Starts in [`GateState::Checking`], resolves once, and hands out the
/// redirect of an unauthorized page exactly once.
#[derive(Debug, Clone)]
pub struct PageGate {
    state: GateState,
    pending: Option<Redirect>,
}

impl Default for PageGate {
    fn default() -> Self {
        Self {
            state: GateState::Checking,
            pending: None,
        }
    }
}

impl PageGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    /// Apply an access decision. Only the first call has any effect.
    pub fn resolve(&mut self, decision: &AccessDecision) -> GateState {
        if self.state != GateState::Checking {
            return self.state;
        }

        match decision {
            AccessDecision::Authorized(_) => self.state = GateState::Authorized,
            AccessDecision::Unauthorized(reason) => {
                self.state = GateState::Unauthorized;
                self.pending = decision.redirect_target().map(|location| Redirect {
                    location,
                    reason: *reason,
                });
            }
        }
        self.state
    }

    /// Take the pending redirect. Returns `Some` at most once per page.
    pub fn take_redirect(&mut self) -> Option<Redirect> {
        self.pending.take()
    }

    /// Returns `true` once the page may render protected content.
    pub fn permits_render(&self) -> bool {
        self.state == GateState::Authorized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde_json::json;

    const SECRET: &[u8] = b"test-secret-key-that-is-long-enough-for-testing";

    fn token_with(claims: serde_json::Value) -> String {
        encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET)).unwrap()
    }

    fn token_with_role(role: &str) -> String {
        token_with(json!({ "id": "u1", "email": "a@b.test", "role": role }))
    }

    fn future_exp() -> i64 {
        chrono::Utc::now().timestamp() + 3600
    }

    // -- check() --

    #[test]
    fn missing_token_unauthorized() {
        let gate = AccessGate::new();
        assert_eq!(
            gate.check(None),
            AccessDecision::Unauthorized(DenyReason::MissingToken)
        );
    }

    #[test]
    fn blank_token_counts_as_missing() {
        let gate = AccessGate::new();
        assert_eq!(
            gate.check(Some("   ")),
            AccessDecision::Unauthorized(DenyReason::MissingToken)
        );
    }

    #[test]
    fn malformed_token_unauthorized() {
        let gate = AccessGate::new();
        for bad in ["not-a-valid-token", "a.b.c", "....", "eyJhbGciOiJIUzI1NiJ9.!!!.sig"] {
            assert_eq!(
                gate.check(Some(bad)),
                AccessDecision::Unauthorized(DenyReason::MalformedToken),
                "{bad}"
            );
        }
    }

    #[test]
    fn admin_token_authorized() {
        let gate = AccessGate::new();
        let decision = gate.check(Some(&token_with_role("ADMIN")));
        assert!(decision.is_authorized());
        assert_eq!(decision.claims().unwrap().user_id().as_deref(), Some("u1"));
    }

    #[test]
    fn user_token_unauthorized() {
        let gate = AccessGate::new();
        assert_eq!(
            gate.check(Some(&token_with_role("USER"))),
            AccessDecision::Unauthorized(DenyReason::InsufficientRole)
        );
    }

    #[test]
    fn role_comparison_is_exact() {
        let gate = AccessGate::new();
        assert!(!gate.check(Some(&token_with_role("admin"))).is_authorized());
    }

    #[test]
    fn token_without_role_unauthorized() {
        let gate = AccessGate::new();
        let token = token_with(json!({ "id": "u1" }));
        assert_eq!(
            gate.check(Some(&token)),
            AccessDecision::Unauthorized(DenyReason::InsufficientRole)
        );
    }

    #[test]
    fn decode_only_ignores_signature_and_expiry() {
        let gate = AccessGate::new();
        let token = encode(
            &Header::default(),
            &json!({ "role": "ADMIN", "exp": 1 }),
            &EncodingKey::from_secret(b"some-other-secret"),
        )
        .unwrap();
        assert!(gate.check(Some(&token)).is_authorized());
    }

    #[test]
    fn custom_admin_role() {
        let gate = AccessGate::new().with_admin_role("OWNER");
        assert!(gate.check(Some(&token_with_role("OWNER"))).is_authorized());
        assert!(!gate.check(Some(&token_with_role("ADMIN"))).is_authorized());
    }

    #[test]
    fn numeric_user_id_accepted() {
        let gate = AccessGate::new();
        let token = token_with(json!({ "role": "ADMIN", "id": 42 }));
        let decision = gate.check(Some(&token));
        assert_eq!(decision.claims().unwrap().user_id().as_deref(), Some("42"));
    }

    #[test]
    fn extra_claims_preserved() {
        let gate = AccessGate::new();
        let token = token_with(json!({ "role": "ADMIN", "plan": "pro" }));
        let claims = gate.decode(&token).unwrap();
        assert_eq!(claims.extra.get("plan"), Some(&json!("pro")));
    }

    #[test]
    fn decode_only_accepts_foreign_algorithm() {
        // RS256 header with the payload of an HS256 token and a junk signature.
        const RS256_HEADER: &str = "eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCJ9";
        let hs256 = token_with(json!({ "id": "u1", "role": "ADMIN" }));
        let payload = hs256.split('.').nth(1).unwrap();
        let token = format!("{RS256_HEADER}.{payload}.bm90LWEtcmVhbC1zaWduYXR1cmU");

        let decision = AccessGate::new().check(Some(&token));
        assert!(decision.is_authorized());
        assert_eq!(decision.claims().unwrap().user_id().as_deref(), Some("u1"));
    }

    #[test]
    fn unexpected_claim_types_do_not_break_decoding() {
        let gate = AccessGate::new();
        let token = token_with(json!({
            "role": "ADMIN",
            "sub": 7,
            "email": null,
            "name": { "first": "Ada" }
        }));
        let decision = gate.check(Some(&token));
        assert!(decision.is_authorized());
        let claims = decision.claims().unwrap();
        assert_eq!(claims.sub.as_deref(), Some("7"));
        assert_eq!(claims.email, None);
        assert_eq!(claims.name, None);
    }

    #[test]
    fn numeric_role_is_not_admin() {
        let gate = AccessGate::new();
        let token = token_with(json!({ "role": 1 }));
        assert_eq!(
            gate.check(Some(&token)),
            AccessDecision::Unauthorized(DenyReason::InsufficientRole)
        );
    }

    // -- verification mode --

    #[test]
    fn verified_gate_accepts_token_without_exp() {
        let gate = AccessGate::new().with_verification_secret(SECRET);
        let token = token_with(json!({ "id": "u1", "role": "ADMIN" }));
        assert!(gate.check(Some(&token)).is_authorized());
    }

    #[test]
    fn verified_gate_accepts_signed_token() {
        let gate = AccessGate::new().with_verification_secret(SECRET);
        let token = token_with(json!({ "role": "ADMIN", "exp": future_exp() }));
        assert!(gate.check(Some(&token)).is_authorized());
    }

    #[test]
    fn verified_gate_rejects_wrong_secret() {
        let gate = AccessGate::new().with_verification_secret(b"a-completely-different-secret");
        let token = token_with(json!({ "role": "ADMIN", "exp": future_exp() }));
        assert_eq!(
            gate.check(Some(&token)),
            AccessDecision::Unauthorized(DenyReason::MalformedToken)
        );
    }

    #[test]
    fn verified_gate_rejects_expired_token() {
        let gate = AccessGate::new().with_verification_secret(SECRET);
        let token = token_with(json!({ "role": "ADMIN", "exp": 1_000 }));
        assert!(!gate.check(Some(&token)).is_authorized());
    }

    // -- decision helpers --

    #[test]
    fn redirect_targets() {
        assert_eq!(
            AccessDecision::Unauthorized(DenyReason::MissingToken).redirect_target(),
            Some("/signin")
        );
        assert_eq!(
            AccessDecision::Unauthorized(DenyReason::MalformedToken).redirect_target(),
            Some("/signin")
        );
        assert_eq!(
            AccessDecision::Unauthorized(DenyReason::InsufficientRole).redirect_target(),
            Some("/")
        );
        assert_eq!(
            AccessDecision::Authorized(ClaimSet::default()).redirect_target(),
            None
        );
    }

    #[test]
    fn display_name_fallbacks() {
        let mut claims = ClaimSet {
            sub: Some("s1".to_string()),
            ..Default::default()
        };
        assert_eq!(claims.display_name(), "s1");
        claims.email = Some("e@x.test".to_string());
        assert_eq!(claims.display_name(), "e@x.test");
        claims.name = Some("Ada".to_string());
        assert_eq!(claims.display_name(), "Ada");
    }

    // -- PageGate --

    #[test]
    fn page_gate_starts_checking() {
        let page = PageGate::new();
        assert_eq!(page.state(), GateState::Checking);
        assert!(!page.permits_render());
    }

    #[test]
    fn page_gate_authorized() {
        let mut page = PageGate::new();
        let state = page.resolve(&AccessDecision::Authorized(ClaimSet::default()));
        assert_eq!(state, GateState::Authorized);
        assert!(page.permits_render());
        assert_eq!(page.take_redirect(), None);
    }

    #[test]
    fn page_gate_redirects_exactly_once() {
        let mut page = PageGate::new();
        page.resolve(&AccessDecision::Unauthorized(DenyReason::MissingToken));
        assert_eq!(page.state(), GateState::Unauthorized);
        assert_eq!(
            page.take_redirect(),
            Some(Redirect {
                location: "/signin",
                reason: DenyReason::MissingToken
            })
        );
        assert_eq!(page.take_redirect(), None);
    }

    #[test]
    fn page_gate_unauthorized_is_terminal() {
        let mut page = PageGate::new();
        page.resolve(&AccessDecision::Unauthorized(DenyReason::InsufficientRole));
        let state = page.resolve(&AccessDecision::Authorized(ClaimSet::default()));
        assert_eq!(state, GateState::Unauthorized);
        assert!(!page.permits_render());
    }

    #[test]
    fn page_gate_authorized_not_rechecked() {
        let mut page = PageGate::new();
        page.resolve(&AccessDecision::Authorized(ClaimSet::default()));
        page.resolve(&AccessDecision::Unauthorized(DenyReason::MissingToken));
        assert!(page.permits_render());
        assert_eq!(page.take_redirect(), None);
    }
}
