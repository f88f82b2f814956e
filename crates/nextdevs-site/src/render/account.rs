//! Sign-in and sign-up pages.

use maud::{Markup, html};

use super::components::{Nav, page_shell};
use crate::forms::{MIN_PASSWORD_LEN, SignUpForm};
use crate::session::Notice;

fn form_error(error: Option<&str>) -> Markup {
    html! {
        @if let Some(error) = error {
            div class="notice notice-error" role="alert" { (error) }
        }
    }
}

/// Render the sign-in form. `error` is shown above the form and `email` is
/// kept so a failed attempt does not clear it.
pub fn signin(site_name: &str, email: &str, error: Option<&str>, notice: Option<Notice>) -> Markup {
    let body = html! {
        div class="auth-card" {
            h1 { "Sign In" }
            p { "Welcome back! Please sign in to continue." }
            (form_error(error))
            form method="post" action="/signin" {
                div class="field" {
                    label for="email" { "Email" }
                    input id="email" type="email" name="email" value=(email) required autocomplete="email";
                }
                div class="field" {
                    label for="password" { "Password" }
                    input id="password" type="password" name="password" required autocomplete="current-password";
                }
                button class="button" type="submit" { "Sign In" }
            }
            p class="auth-switch" {
                "Don't have an account? " a href="/signup" { "Sign Up" }
            }
        }
    };

    page_shell(site_name, "Sign In", Nav::Public, notice, body)
}

/// Render the sign-up form, refilled from `form` except for the password.
pub fn signup(
    site_name: &str,
    form: &SignUpForm,
    error: Option<&str>,
    notice: Option<Notice>,
) -> Markup {
    let body = html! {
        div class="auth-card" {
            h1 { "Sign Up" }
            p { "Create an account to get started." }
            (form_error(error))
            form method="post" action="/signup" {
                div class="field" {
                    label for="name" { "Name" }
                    input id="name" type="text" name="name" value=(form.name) required autocomplete="name";
                }
                div class="field" {
                    label for="email" { "Email" }
                    input id="email" type="email" name="email" value=(form.email) required autocomplete="email";
                }
                div class="field" {
                    label for="password" { "Password" }
                    input id="password" type="password" name="password" required
                        minlength=(MIN_PASSWORD_LEN) autocomplete="new-password";
                }
                div class="field" {
                    label for="avatar" { "Avatar URL (Optional)" }
                    input id="avatar" type="url" name="avatar" value=(form.avatar)
                        placeholder="https://example.com/avatar.jpg";
                }
                div class="field" {
                    label for="bio" { "Bio (Optional)" }
                    textarea id="bio" name="bio" rows="3" placeholder="Tell us about yourself..." { (form.bio) }
                }
                button class="button" type="submit" { "Sign Up" }
            }
            p class="auth-switch" {
                "Already have an account? " a href="/signin" { "Sign In" }
            }
        }
    };

    page_shell(site_name, "Sign Up", Nav::Public, notice, body)
}
