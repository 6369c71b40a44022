//! Hostname matching against the block list.
//!
//! A hostname matches a list entry when it equals the entry exactly or
//! ends with `"." + entry`. The dot boundary keeps `notfacebook.com` from
//! matching `facebook.com` while `mail.facebook.com` still does.

use url::Url;

/// Lowercase and strip a single leading `www.`. List entries are assumed
/// already normalized.
pub fn normalize_hostname(host: &str) -> String {
    let host = host.to_ascii_lowercase();
    match host.strip_prefix("www.") {
        Some(rest) => rest.to_string(),
        None => host,
    }
}

/// Dot-boundary suffix match of a normalized hostname against one entry.
pub fn hostname_matches(hostname: &str, entry: &str) -> bool {
    hostname == entry || hostname.ends_with(&format!(".{entry}"))
}

/// Whether `url`'s hostname matches any entry in `sites`.
///
/// # Errors
/// Returns the parse error for malformed URLs; callers on the query path
/// treat that as "not blocked".
pub fn url_is_blocked(url: &str, sites: &[String]) -> Result<bool, url::ParseError> {
    let parsed = Url::parse(url)?;
    let Some(host) = parsed.host_str() else {
        return Ok(false);
    };
    let hostname = normalize_hostname(host);
    Ok(sites.iter().any(|site| hostname_matches(&hostname, site)))
}
