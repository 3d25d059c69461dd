//! Network description grammar.
//!
//! A topology description is a semicolon-separated list of signed integers
//! forming a pre-order traversal of the tree (`"3;-2;1;-1;2;0;-1"`). An
//! optional parallel link description lists one `{w|x}<speed>` token per
//! created link in creation order, e.g. `"w100;x10"` for a wired 100 link
//! followed by a wireless 10 link.

use std::sync::OnceLock;

use regex::Regex;

use crate::network::types::Medium;
use crate::network::NetworkError;

/// Medium and speed for one link, consumed in link creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkSpec {
    pub medium: Medium,
    pub speed: u32,
}

fn link_token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[wx][0-9]+$").expect("link token pattern is valid"))
}

/// Parse a network description string into signed tokens.
///
/// Every element between semicolons must be a (possibly negative) integer;
/// anything else is a structural error.
pub fn parse_description(text: &str) -> Result<Vec<i64>, NetworkError> {
    if text.trim().is_empty() {
        return Err(NetworkError::Description(
            "the description is empty".to_string(),
        ));
    }
    text.split(';')
        .map(|token| {
            let token = token.trim();
            token.parse::<i64>().map_err(|_| {
                NetworkError::Description(format!(
                    "element '{}' is not a signed integer",
                    token
                ))
            })
        })
        .collect()
}

/// Parse a link description string into per-link specs.
///
/// Tokens are `w<speed>` for wired and `x<speed>` for wireless links; the
/// speed must be a positive integer.
pub fn parse_link_description(text: &str) -> Result<Vec<LinkSpec>, NetworkError> {
    if text.trim().is_empty() {
        return Err(NetworkError::LinkDescription(
            "the link description is empty".to_string(),
        ));
    }
    text.split(';')
        .map(|token| {
            let token = token.trim();
            if !link_token_pattern().is_match(token) {
                return Err(NetworkError::LinkDescription(format!(
                    "element '{}' is not a valid link type and speed (expected e.g. 'w100' or 'x10')",
                    token
                )));
            }
            let medium = match &token[..1] {
                "w" => Medium::Wired,
                _ => Medium::Wireless,
            };
            let speed: u32 = token[1..].parse().map_err(|_| {
                NetworkError::LinkDescription(format!(
                    "link speed in '{}' is out of range",
                    token
                ))
            })?;
            if speed == 0 {
                return Err(NetworkError::LinkDescription(format!(
                    "link speed in '{}' must be a positive integer",
                    token
                )));
            }
            Ok(LinkSpec { medium, speed })
        })
        .collect()
}
