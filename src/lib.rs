//! # Roteiro (login demo frontend)
//!
//! `roteiro` serves the login screen of a vacation itinerary demo and holds
//! the client-side session core that drives it. Authentication itself lives
//! in an external API; this crate talks to it, keeps the resulting session,
//! and models the login page as an explicit state machine.
//!
//! ## Session core
//!
//! - [`auth::token`] decodes the claims segment of a bearer token without
//!   verifying its signature; verification authority stays with the backend
//!   that issued it. Only the expiry claim is inspected locally.
//! - [`auth::session`] persists the `authToken` / `username` / `userInfo`
//!   entries that make up a session, either in memory or in a JSON file.
//! - [`auth::AuthService`] issues login and password-recovery requests and
//!   converts every transport failure into a soft `success: false` result;
//!   callers never handle errors for network trouble.
//! - [`ui::PageController`] cycles the login, forgot-password, and about
//!   panels, replaces the single status message, and schedules role-based
//!   redirects through a cancellable [`nav::Navigator`].
//!
//! ## Frontend server
//!
//! The [`roteiro`] module is the thin collaborator around the core: static
//! demo pages, a pass-through `/api` proxy to the authentication backend,
//! and a `/health` endpoint.

pub mod auth;
pub mod cli;
pub mod nav;
pub mod roteiro;
pub mod ui;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }

        assert!(GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_app_user_agent() {
        assert!(APP_USER_AGENT.starts_with("roteiro/"));
    }
}
