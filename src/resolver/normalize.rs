//! URL normalization for sitemap resolution

use url::Url;

/// Normalize a site URL to its canonical `scheme://www.host` form.
///
/// Lowercases and trims the input, defaults the scheme to `https://`, and
/// inserts a `www.` prefix when an `https` host lacks one. Path, query, and
/// fragment are stripped; the result is scheme + host only.
///
/// This function never fails: input that still does not parse as a URL after
/// the fixups is reconstructed best-effort by truncating at the first path
/// separator.
pub fn normalize_url(raw: &str) -> String {
    let mut url = raw.trim().to_lowercase();

    if !url.starts_with("http") {
        url = format!("https://{url}");
    }

    if url.starts_with("https://") && !url.starts_with("https://www.") {
        url = url.replacen("https://", "https://www.", 1);
    }

    match Url::parse(&url) {
        Ok(parsed) => match parsed.host_str() {
            Some(host) => format!("{}://{}", parsed.scheme(), host),
            None => strip_after_host(&url),
        },
        Err(_) => strip_after_host(&url),
    }
}

/// Best-effort fallback: keep the scheme and everything up to the first
/// path, query, or fragment separator.
fn strip_after_host(url: &str) -> String {
    for scheme in ["https://", "http://"] {
        if let Some(rest) = url.strip_prefix(scheme) {
            let host = rest
                .split(['/', '?', '#'])
                .next()
                .unwrap_or(rest);
            return format!("{scheme}{host}");
        }
    }
    url.split(['?', '#']).next().unwrap_or(url).to_string()
}
