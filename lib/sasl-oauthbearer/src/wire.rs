//! OAUTHBEARER wire format.
//!
//! See <https://datatracker.ietf.org/doc/html/rfc7628>.

use serde::Deserialize;
use zeroize::Zeroizing;

/// GS2 header: no channel binding, no authorization identity.
const GS2_HEADER: &[u8] = b"n,,";

/// Key-value separator (`%x01`).
const KVSEP: u8 = 0x01;

const AUTH_BEARER: &[u8] = b"auth=Bearer ";

/// Formats the client initial response for `token`.
///
/// The output is `n,,` `0x01` `auth=Bearer ` `<token>` `0x01` `0x01`. The token
/// is copied verbatim, without escaping or trimming.
pub fn initial_response(token: &str) -> Zeroizing<Vec<u8>> {
    let mut response = Zeroizing::new(Vec::with_capacity(
        GS2_HEADER.len() + AUTH_BEARER.len() + token.len() + 3,
    ));
    response.extend_from_slice(GS2_HEADER);
    response.push(KVSEP);
    response.extend_from_slice(AUTH_BEARER);
    response.extend_from_slice(token.as_bytes());
    response.push(KVSEP);
    response.push(KVSEP);
    response
}

/// Error object sent by the server when authentication fails (RFC 7628 §3.2.2).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerError {
    /// Error status, e.g. `invalid_token`.
    pub status: String,
    /// Scope required to access the resource.
    #[serde(default)]
    pub scope: Option<String>,
    /// URL of the OpenID Connect discovery document.
    #[serde(default, rename = "openid-configuration")]
    pub openid_configuration: Option<String>,
}

/// Parses a server challenge as an RFC 7628 error object.
///
/// # Errors
///
/// Returns the JSON error if the challenge is not a valid error object.
pub fn parse_server_error(challenge: &[u8]) -> Result<ServerError, serde_json::Error> {
    serde_json::from_slice(challenge)
}
