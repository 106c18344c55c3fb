//! Deterministic fallback path lists.
//!
//! Used whenever the Selection LLM call itself fails — network, parse, or
//! empty after retry. Pure function of `locale`; no I/O, no randomness, so
//! the pipeline can always make progress even with the LLM collaborator
//! entirely unavailable (grounded on `antoine_scraper_adapter.py`'s fallback
//! path lists and fixed `path_reasoning` string).

/// Reasoning string attached to every fallback-selected path, verbatim from
/// the original adapter's `"Fallback path when Nova Pro failed"`.
pub const FALLBACK_REASONING: &str = "Fallback path when primary selection failed";

pub const FALLBACK_MODEL: &str = "fallback";

/// Confidence assigned to every fallback path — "medium confidence" in the
/// original adapter (`0.5` for every entry).
pub const FALLBACK_PRIORITY: f64 = 0.5;

#[must_use]
pub fn fallback_paths(locale: Option<&str>) -> Vec<String> {
    match locale {
        Some(locale) => locale_aware_fallback(locale),
        None => standard_fallback(),
    }
}

fn locale_aware_fallback(locale: &str) -> Vec<String> {
    [
        format!("/{locale}"),
        format!("/{locale}/about"),
        format!("/{locale}/about-us"),
        format!("/{locale}/company"),
        format!("/{locale}/contact"),
        format!("/{locale}/contact-us"),
        format!("/{locale}/careers"),
        format!("/{locale}/products"),
        format!("/{locale}/services"),
        format!("/{locale}/news"),
        "/".to_string(),
        "/about".to_string(),
        "/contact".to_string(),
    ]
    .to_vec()
}

fn standard_fallback() -> Vec<String> {
    [
        "/",
        "/about",
        "/about-us",
        "/about/our-company",
        "/company",
        "/contact",
        "/contact-us",
        "/careers",
        "/jobs",
        "/business",
        "/enterprise",
        "/support",
        "/help",
        "/products",
        "/services",
        "/solutions",
        "/leadership",
        "/team",
        "/news",
        "/press",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}
