//! Session authentication boundary
//!
//! Authentication proper (tokens, signatures, account lookup) lives outside
//! this service; matchmaking only needs a validated participant ID and a
//! comparability score, and trusts both without re-validation. The trait is
//! the seam; the header-based implementation stands in for the upstream
//! middleware that injects these values.

use crate::error::{MatchmakingError, Result};
use crate::types::SessionIdentity;
use axum::http::HeaderMap;

/// Header carrying the validated participant ID
pub const PARTICIPANT_HEADER: &str = "x-user-id";

/// Header carrying the participant's current currency holdings
pub const SCORE_HEADER: &str = "x-score";

/// Trait for resolving a request into a matchmaking identity
pub trait SessionAuthenticator: Send + Sync {
    /// Extract the validated identity for this session
    fn authenticate(&self, headers: &HeaderMap) -> Result<SessionIdentity>;
}

/// Authenticator that reads identity from trusted upstream headers
#[derive(Debug, Default)]
pub struct HeaderSessionAuthenticator;

impl HeaderSessionAuthenticator {
    pub fn new() -> Self {
        Self
    }

    fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Result<&'a str> {
        headers
            .get(name)
            .ok_or_else(|| MatchmakingError::InvalidSession {
                reason: format!("missing {} header", name),
            })?
            .to_str()
            .map_err(|_| {
                MatchmakingError::InvalidSession {
                    reason: format!("{} header is not valid UTF-8", name),
                }
                .into()
            })
    }
}

impl SessionAuthenticator for HeaderSessionAuthenticator {
    fn authenticate(&self, headers: &HeaderMap) -> Result<SessionIdentity> {
        let participant_id = Self::header_value(headers, PARTICIPANT_HEADER)?.to_string();
        if participant_id.is_empty() {
            return Err(MatchmakingError::InvalidSession {
                reason: "participant ID is empty".to_string(),
            }
            .into());
        }

        let score_raw = Self::header_value(headers, SCORE_HEADER)?;
        let score = score_raw
            .parse()
            .map_err(|_| MatchmakingError::InvalidSession {
                reason: format!("{} header is not a non-negative integer", SCORE_HEADER),
            })?;

        Ok(SessionIdentity {
            participant_id,
            score,
        })
    }
}
