//! robots.txt discovery.
//!
//! Fetches `/robots.txt`, parses `Allow`/`Disallow`/`Sitemap` lines under
//! the group matching `User-agent: *` (or the configured filter), and
//! surfaces restricted and allowed paths plus any sitemaps it references.

use std::time::Duration;

use crate::http_client::HttpFetcher;

pub struct RobotsOutcome {
    pub restricted_paths: Vec<String>,
    pub allowed_paths: Vec<String>,
    pub sitemap_references: Vec<String>,
}

/// Fetches and parses robots.txt. Any fetch failure (missing file, timeout,
/// non-200) is treated as "no restrictions known" rather than an error —
/// robots.txt is advisory and its absence is not exceptional.
pub async fn discover_robots(
    fetcher: &dyn HttpFetcher,
    canonical_url: &str,
    user_agent_filter: &str,
    timeout: Duration,
    user_agent: &str,
) -> RobotsOutcome {
    let Ok(robots_url) = url::Url::parse(canonical_url).and_then(|u| u.join("/robots.txt")) else {
        return RobotsOutcome {
            restricted_paths: Vec::new(),
            allowed_paths: Vec::new(),
            sitemap_references: Vec::new(),
        };
    };

    let body = match fetcher.fetch(robots_url.as_str(), timeout, user_agent).await {
        Ok(response) if response.status == 200 => response.body,
        _ => {
            return RobotsOutcome {
                restricted_paths: Vec::new(),
                allowed_paths: Vec::new(),
                sitemap_references: Vec::new(),
            };
        }
    };

    parse_robots(&body, user_agent_filter)
}

fn parse_robots(body: &str, user_agent_filter: &str) -> RobotsOutcome {
    let mut restricted_paths = Vec::new();
    let mut allowed_paths = Vec::new();
    let mut sitemap_references = Vec::new();

    let mut in_matching_group = false;
    let mut group_seen_any_agent = false;

    for raw_line in body.lines() {
        let line = strip_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim().to_ascii_lowercase();
        let value = value.trim();

        match key.as_str() {
            "user-agent" => {
                if !group_seen_any_agent {
                    in_matching_group = false;
                }
                group_seen_any_agent = true;
                if value == "*" || value.eq_ignore_ascii_case(user_agent_filter) {
                    in_matching_group = true;
                }
            }
            "disallow" if in_matching_group && !value.is_empty() => {
                restricted_paths.push(value.to_string());
            }
            "allow" if in_matching_group && !value.is_empty() => {
                allowed_paths.push(value.to_string());
            }
            "sitemap" => {
                sitemap_references.push(value.to_string());
            }
            _ => {
                // Any directive outside a user-agent line resets group tracking.
                if key != "disallow" && key != "allow" {
                    group_seen_any_agent = false;
                }
            }
        }
    }

    RobotsOutcome {
        restricted_paths,
        allowed_paths,
        sitemap_references,
    }
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(idx) => &line[..idx],
        None => line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wildcard_group() {
        let body = "User-agent: *\nDisallow: /admin\nAllow: /admin/public\nSitemap: https://x.com/sitemap.xml\n";
        let outcome = parse_robots(body, "*");
        assert_eq!(outcome.restricted_paths, vec!["/admin".to_string()]);
        assert_eq!(outcome.allowed_paths, vec!["/admin/public".to_string()]);
        assert_eq!(outcome.sitemap_references, vec!["https://x.com/sitemap.xml".to_string()]);
    }

    #[test]
    fn ignores_non_matching_group() {
        let body = "User-agent: Googlebot\nDisallow: /secret\nUser-agent: *\nDisallow: /admin\n";
        let outcome = parse_robots(body, "*");
        assert_eq!(outcome.restricted_paths, vec!["/admin".to_string()]);
    }

    #[test]
    fn strips_inline_comments() {
        let body = "User-agent: * # everyone\nDisallow: /admin # internal\n";
        let outcome = parse_robots(body, "*");
        assert_eq!(outcome.restricted_paths, vec!["/admin".to_string()]);
    }
}
