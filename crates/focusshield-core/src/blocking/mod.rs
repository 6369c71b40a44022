//! Site blocking: hostname matching and the network-filter rule set.

pub mod filter;
pub mod matcher;

pub use filter::{derive_rules, BlockRule, MemoryRuleFilter, RuleFilter, SqliteRuleFilter};
pub use matcher::{hostname_matches, normalize_hostname, url_is_blocked};

use crate::store::{keys, Store};

/// Answer "is this URL blocked right now" from the store, failing closed:
/// store errors, a missing list, an inactive session and malformed URLs
/// all answer `false`.
pub fn check_url_blocked<S: Store>(store: &S, url: &str) -> bool {
    let active = match store.get::<bool>(keys::IS_ACTIVE) {
        Ok(flag) => flag.unwrap_or(false),
        Err(e) => {
            tracing::warn!("block check could not read store: {e}");
            return false;
        }
    };
    if !active {
        return false;
    }
    let sites: Vec<String> = match store.get(keys::BLOCKED_SITES) {
        Ok(Some(sites)) => sites,
        Ok(None) => return false,
        Err(e) => {
            tracing::warn!("block check could not read block list: {e}");
            return false;
        }
    };
    match matcher::url_is_blocked(url, &sites) {
        Ok(blocked) => blocked,
        Err(e) => {
            tracing::debug!(url, "unparseable url in block check: {e}");
            false
        }
    }
}
