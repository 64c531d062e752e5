//! CSS length resolution.
//!
//! [§ 5 Distance Units](https://www.w3.org/TR/css-values-4/#lengths)
//!
//! Effective properties stay string-typed in this engine, so every length
//! consumer funnels through [`resolve`]. An unresolvable value is absence,
//! not an error: the caller falls back to its layout default.

use crate::warning::warn_once;

/// Resolve a CSS length string to pixels.
///
/// Supported forms: `px`, `em`, `rem` (resolved against the same basis as
/// `em` — the engine carries no separate root font-size channel), `pt`
/// (4/3 px per [§ 5.3.2](https://www.w3.org/TR/css-values-4/#absolute-lengths)),
/// `%` of `base`, bare numbers (pixels), and single-level
/// `calc(a + b)` / `calc(a - b)` expressions.
///
/// Returns `None` for empty, `auto`, or unparseable input.
pub fn resolve(value: &str, em: f32, base: f32) -> Option<f32> {
    let value = value.trim();
    if value.is_empty() || value == "auto" || value == "none" {
        return None;
    }

    if let Some(expr) = value.strip_prefix("calc(").and_then(|v| v.strip_suffix(')')) {
        return resolve_calc(expr, em, base);
    }

    if let Some(v) = value.strip_suffix("px") {
        return parse_number(v);
    }
    if let Some(v) = value.strip_suffix("rem") {
        return parse_number(v).map(|n| n * em);
    }
    if let Some(v) = value.strip_suffix("em") {
        return parse_number(v).map(|n| n * em);
    }
    if let Some(v) = value.strip_suffix("pt") {
        return parse_number(v).map(|n| n * 4.0 / 3.0);
    }
    if let Some(v) = value.strip_suffix('%') {
        return parse_number(v).map(|n| n / 100.0 * base);
    }

    // Bare numbers are treated as pixels (line-height multipliers are the
    // caller's concern).
    if let Some(n) = parse_number(value) {
        return Some(n);
    }

    warn_once("units", &format!("unsupported length '{value}'"));
    None
}

/// Resolve a length with a fallback default.
pub fn resolve_or(value: &str, em: f32, base: f32, default: f32) -> f32 {
    resolve(value, em, base).unwrap_or(default)
}

/// Evaluate a `calc()` body with one `+` or `-` between two lengths.
///
/// Nested calc and `*`/`/` are not supported; the scrollbar transformer only
/// ever emits `calc(<length> + <length>)`.
fn resolve_calc(expr: &str, em: f32, base: f32) -> Option<f32> {
    // Operators must be surrounded by whitespace so negative lengths and
    // "100%-14px" (emitted without spaces by generated styles) both work.
    for (pattern, sign) in [(" + ", 1.0_f32), (" - ", -1.0_f32), ("+", 1.0), ("-", -1.0)] {
        if let Some(idx) = expr.find(pattern) {
            let (lhs, rhs) = expr.split_at(idx);
            let rhs = &rhs[pattern.len()..];
            let l = resolve(lhs, em, base)?;
            let r = resolve(rhs, em, base)?;
            return Some(l + sign * r);
        }
    }
    resolve(expr, em, base)
}

fn parse_number(v: &str) -> Option<f32> {
    v.trim().parse::<f32>().ok()
}
