//! Session Identity Generation
//!
//! The chart protocol multiplexes two logical sub-sessions over one
//! connection: a quote session (`qs_` prefix) and a chart session
//! (`cs_` prefix). Each is identified by the prefix plus twelve random
//! lowercase letters drawn from the process RNG, so identifiers are
//! unguessable and fresh per connection. The address space is large
//! enough for single-process use that no collision detection is needed.

use rand::Rng;

/// Prefix of quote sub-session identifiers.
pub const QUOTE_SESSION_PREFIX: &str = "qs_";

/// Prefix of chart sub-session identifiers.
pub const CHART_SESSION_PREFIX: &str = "cs_";

/// Random suffix length in characters.
const SESSION_ID_LEN: usize = 12;

/// Generate a fresh sub-session identifier.
#[must_use]
pub fn new_session_id(prefix: &str) -> String {
    let mut rng = rand::rng();
    let mut id = String::with_capacity(prefix.len() + SESSION_ID_LEN);
    id.push_str(prefix);
    for _ in 0..SESSION_ID_LEN {
        id.push(rng.random_range(b'a'..=b'z') as char);
    }
    id
}
