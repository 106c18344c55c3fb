//! URL canonicalization.
//!
//! If the scheme is missing, `https://` is prepended (handled by
//! `CompanyInput::new`, upstream of Discovery). Discovery itself probes both
//! `www.` and bare-domain variants with a short HEAD request, bounded to one
//! redirect chain per variant; the first variant to answer 200 becomes the
//! canonical base. If neither responds, the original URL is used and a
//! warning is recorded.

use std::time::Duration;

use url::Url;

use crate::http_client::HttpFetcher;

const PROBE_TIMEOUT_SECS: u64 = 10;

pub struct CanonicalizeOutcome {
    pub canonical_url: String,
    pub warning: Option<String>,
}

fn www_and_bare_variants(url: &Url) -> Option<(String, String)> {
    let host = url.host_str()?;
    let (www_host, bare_host) = if let Some(bare) = host.strip_prefix("www.") {
        (host.to_string(), bare.to_string())
    } else {
        (format!("www.{host}"), host.to_string())
    };

    let mut www_url = url.clone();
    let mut bare_url = url.clone();
    www_url.set_host(Some(&www_host)).ok()?;
    bare_url.set_host(Some(&bare_host)).ok()?;
    Some((www_url.to_string(), bare_url.to_string()))
}

/// Probes the `www.` and bare-domain variants of `homepage_url`, in that
/// order, returning the first that answers HTTP 200. Falls back to the
/// original (already scheme-normalized) URL with a warning if neither does.
pub async fn canonicalize(fetcher: &dyn HttpFetcher, homepage_url: &str) -> CanonicalizeOutcome {
    let Ok(parsed) = Url::parse(homepage_url) else {
        return CanonicalizeOutcome {
            canonical_url: homepage_url.to_string(),
            warning: Some(format!("could not parse homepage URL {homepage_url} for canonicalization")),
        };
    };

    let Some((www_variant, bare_variant)) = www_and_bare_variants(&parsed) else {
        return CanonicalizeOutcome {
            canonical_url: homepage_url.to_string(),
            warning: Some(format!("homepage URL {homepage_url} has no host to canonicalize")),
        };
    };

    // Try the variant matching the user's input first, then the other.
    let ordered = if homepage_url.contains("://www.") {
        [www_variant, bare_variant]
    } else {
        [bare_variant, www_variant]
    };

    for variant in ordered {
        let timeout = Duration::from_secs(PROBE_TIMEOUT_SECS);
        if let Ok(head) = fetcher.head(&variant, timeout).await
            && head.status == 200
        {
            return CanonicalizeOutcome {
                canonical_url: head.final_url,
                warning: None,
            };
        }
    }

    CanonicalizeOutcome {
        canonical_url: homepage_url.to_string(),
        warning: Some(format!(
            "neither www nor bare-domain variant of {homepage_url} answered 200; using original URL"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variants_swap_www_prefix() {
        let url = Url::parse("https://www.example.com/x").unwrap();
        let (www, bare) = www_and_bare_variants(&url).unwrap();
        assert_eq!(www, "https://www.example.com/x");
        assert_eq!(bare, "https://example.com/x");
    }

    #[test]
    fn variants_add_www_prefix_when_bare() {
        let url = Url::parse("https://example.com/x").unwrap();
        let (www, bare) = www_and_bare_variants(&url).unwrap();
        assert_eq!(www, "https://www.example.com/x");
        assert_eq!(bare, "https://example.com/x");
    }
}
