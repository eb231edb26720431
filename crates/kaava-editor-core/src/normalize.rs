//! Shorthand-to-LaTeX normalization.
//!
//! Users type calculator-style input (`a/b`, `x^2`, `2*x`). Before a formula
//! is previewed it is run through a fixed pipeline of text rewrites:
//!
//! 1. [`sanitize_latex`] strips one layer of `$...$` / `$$...$$`
//! 2. [`convert_asterisk_to_cdot`] turns `*` into `\cdot`
//! 3. [`expand_fraction_shorthand`] turns `a/b` into `\frac{a}{b}`
//! 4. [`expand_exponent_shorthand`] braces `^` exponents and nests chains
//!
//! Fraction expansion and exponent-chain collapsing are bounded fixed-point
//! loops. When the pass cap is reached the partially expanded string is
//! returned as-is; this is not an error. This is iterated substitution, not an
//! expression parser, and deep or ambiguous input is allowed to stay partially
//! expanded.
//!
//! The output is a display projection only. Stored content always keeps the
//! raw buffer.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::{DEFAULT_MAX_PASSES, NormalizerConfig};

// `token` is a maximal run of ASCII letters/digits; a leading backslash is
// not part of it, so `\pi/2` splits as `\` + `pi/2`.
// `expr` is parenthesised content without nested parentheses.
static FRAC_GROUP_OVER_GROUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([^()]*)\)/\(([^()]*)\)").unwrap());
static FRAC_GROUP_OVER_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([^()]*)\)/([A-Za-z0-9]+)").unwrap());
static FRAC_TOKEN_OVER_GROUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Za-z0-9]+)/\(([^()]*)\)").unwrap());
static FRAC_TOKEN_OVER_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Za-z0-9]+)/([A-Za-z0-9]+)").unwrap());

static EXP_GROUP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\^\(([^()]*)\)").unwrap());
static EXP_GROUP_BASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([^()]*)\)\^([A-Za-z0-9])").unwrap());
static EXP_SINGLE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\^([A-Za-z0-9])").unwrap());

const FRAC_REPLACEMENT: &str = r"\frac{$1}{$2}";

/// Run the full normalization pipeline with the default pass cap.
pub fn normalize_latex(input: &str) -> String {
    normalize_latex_with(input, &NormalizerConfig::default())
}

/// Run the full normalization pipeline.
pub fn normalize_latex_with(input: &str, config: &NormalizerConfig) -> String {
    let sanitized = sanitize_latex(input);
    let dotted = convert_asterisk_to_cdot(sanitized);
    let fractions = expand_fraction_shorthand_with(&dotted, config.max_passes);
    expand_exponent_shorthand_with(&fractions, config.max_passes)
}

/// Strip a single layer of `$...$` or `$$...$$` wrapping.
///
/// Only applies when the whole trimmed string is wrapped. Nested or
/// unbalanced dollar signs are not examined; unwrapped input comes back
/// untouched.
pub fn sanitize_latex(input: &str) -> &str {
    let trimmed = input.trim();
    if trimmed.len() >= 4 && trimmed.starts_with("$$") && trimmed.ends_with("$$") {
        return trimmed[2..trimmed.len() - 2].trim();
    }
    if trimmed.len() >= 2 && trimmed.starts_with('$') && trimmed.ends_with('$') {
        return trimmed[1..trimmed.len() - 1].trim();
    }
    input
}

/// Replace every `*` not directly preceded by a backslash with `\cdot `.
pub fn convert_asterisk_to_cdot(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut prev = None;
    for c in input.chars() {
        if c == '*' && prev != Some('\\') {
            out.push_str(r"\cdot ");
        } else {
            out.push(c);
        }
        prev = Some(c);
    }
    out
}

/// Expand `a/b`-style division into `\frac{a}{b}` with the default pass cap.
pub fn expand_fraction_shorthand(input: &str) -> String {
    expand_fraction_shorthand_with(input, DEFAULT_MAX_PASSES)
}

/// Expand `a/b`-style division into `\frac{a}{b}`.
///
/// One pass applies `(expr)/(expr)`, `(expr)/token`, `token/(expr)` and
/// `token/token` in that order. Passes repeat until nothing changes or
/// `max_passes` have run.
pub fn expand_fraction_shorthand_with(input: &str, max_passes: usize) -> String {
    let mut current = input.to_string();
    for pass in 0..max_passes {
        let mut next = current.clone();
        for re in [
            &*FRAC_GROUP_OVER_GROUP,
            &*FRAC_GROUP_OVER_TOKEN,
            &*FRAC_TOKEN_OVER_GROUP,
            &*FRAC_TOKEN_OVER_TOKEN,
        ] {
            next = re.replace_all(&next, FRAC_REPLACEMENT).into_owned();
        }
        if next == current {
            return current;
        }
        current = next;
        if pass + 1 == max_passes {
            tracing::debug!(max_passes, "fraction expansion hit pass cap");
        }
    }
    current
}

/// Brace `^` exponents and nest exponent chains, with the default pass cap.
pub fn expand_exponent_shorthand(input: &str) -> String {
    expand_exponent_shorthand_with(input, DEFAULT_MAX_PASSES)
}

/// Brace `^` exponents and nest exponent chains.
///
/// - `base^(exp)` becomes `base^{ exp }`
/// - `(base)^e` becomes `{base}^{ e }`
/// - `base^e` becomes `base^{ e }` for a single letter or digit `e`
///
/// Chains like `^{ a }^{ b }` are then collapsed right-associatively into
/// `^{ a^{ b } }`, one link per chain per pass, for at most `max_passes`.
pub fn expand_exponent_shorthand_with(input: &str, max_passes: usize) -> String {
    let braced = EXP_GROUP.replace_all(input, "^{ $1 }");
    let braced = EXP_GROUP_BASE.replace_all(&braced, "{$1}^{ $2 }");
    let mut current = EXP_SINGLE.replace_all(&braced, "^{ $1 }").into_owned();

    for pass in 0..max_passes {
        match collapse_exponent_chains(&current) {
            Some(next) => current = next,
            None => return current,
        }
        if pass + 1 == max_passes && collapse_exponent_chains(&current).is_some() {
            tracing::debug!(max_passes, "exponent chain collapse hit pass cap");
        }
    }
    current
}

/// One collapse pass. Returns `None` when there is nothing left to collapse.
fn collapse_exponent_chains(input: &str) -> Option<String> {
    let groups = exponent_groups(input);

    // Each chain collapses at its tail: the last two adjacent groups.
    let mut edits: Vec<(Range<usize>, String)> = Vec::new();
    for base in &groups {
        let Some(exp) = groups.iter().find(|g| g.start == base.end) else {
            continue;
        };
        if groups.iter().any(|g| g.start == exp.end) {
            continue;
        }
        let base_inner = &input[base.start + 2..base.end - 1];
        let exp_inner = &input[exp.start + 2..exp.end - 1];
        let merged = format!("^{{{}^{{{}}} }}", base_inner.trim_end(), exp_inner);
        edits.push((base.start..exp.end, merged));
    }
    if edits.is_empty() {
        return None;
    }

    // Apply right to left so earlier offsets stay valid; an edit that
    // overlaps one already applied waits for the next pass.
    edits.sort_by(|a, b| b.0.start.cmp(&a.0.start));
    let mut out = input.to_string();
    let mut applied: Vec<Range<usize>> = Vec::new();
    for (range, merged) in edits {
        if applied
            .iter()
            .any(|r| range.start < r.end && r.start < range.end)
        {
            continue;
        }
        out.replace_range(range.clone(), &merged);
        applied.push(range);
    }
    Some(out)
}

/// Byte ranges of every `^{...}` group with balanced braces.
fn exponent_groups(input: &str) -> Vec<Range<usize>> {
    let bytes = input.as_bytes();
    let mut groups = Vec::new();
    for i in 0..bytes.len().saturating_sub(1) {
        if bytes[i] == b'^' && bytes[i + 1] == b'{' {
            if let Some(close) = matching_brace(bytes, i + 1) {
                groups.push(i..close + 1);
            }
        }
    }
    groups
}

fn matching_brace(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, &b) in bytes.iter().enumerate().skip(open) {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;

    #[test]
    fn test_sanitize_strips_one_layer() {
        assert_eq!(sanitize_latex("$x^2$"), "x^2");
        assert_eq!(sanitize_latex("  $$ \\frac{a}{b} $$ "), "\\frac{a}{b}");
        assert_eq!(sanitize_latex("$$$x$$$"), "$x$");
    }

    #[test]
    fn test_sanitize_leaves_unwrapped_input() {
        assert_eq!(sanitize_latex(" x + 1 "), " x + 1 ");
        assert_eq!(sanitize_latex("$x + y"), "$x + y");
        assert_eq!(sanitize_latex("$"), "$");
    }

    #[test]
    fn test_asterisk_to_cdot() {
        assert_snapshot!(convert_asterisk_to_cdot("2*x"), @r"2\cdot x");
        assert_snapshot!(convert_asterisk_to_cdot(r"\alpha*2"), @r"\alpha\cdot 2");
        assert_eq!(convert_asterisk_to_cdot(r"a\*b"), r"a\*b");
    }

    #[test]
    fn test_fraction_shapes() {
        assert_snapshot!(expand_fraction_shorthand("a/b"), @r"\frac{a}{b}");
        assert_snapshot!(expand_fraction_shorthand("(a+1)/(b+2)"), @r"\frac{a+1}{b+2}");
        assert_snapshot!(expand_fraction_shorthand("x/2"), @r"\frac{x}{2}");
        assert_snapshot!(expand_fraction_shorthand("(x-1)/3"), @r"\frac{x-1}{3}");
        assert_snapshot!(expand_fraction_shorthand("1/(2y)"), @r"\frac{1}{2y}");
    }

    #[test]
    fn test_fraction_token_is_letters_and_digits_only() {
        assert_snapshot!(expand_fraction_shorthand(r"\pi/2"), @r"\\frac{pi}{2}");
        assert_snapshot!(expand_fraction_shorthand(r"2\cdot x/y"), @r"2\cdot \frac{x}{y}");
    }

    #[test]
    fn test_fraction_nesting_resolves_over_passes() {
        assert_eq!(
            expand_fraction_shorthand("((a)/(b))/c"),
            r"\frac{\frac{a}{b}}{c}"
        );
    }

    #[test]
    fn test_fraction_without_slash_is_untouched() {
        assert_eq!(expand_fraction_shorthand("x + y"), "x + y");
    }

    #[test]
    fn test_exponent_shapes() {
        assert_snapshot!(expand_exponent_shorthand("x^2"), @"x^{ 2 }");
        assert_snapshot!(expand_exponent_shorthand("e^(i+1)"), @"e^{ i+1 }");
        assert_snapshot!(expand_exponent_shorthand("(x+1)^2"), @"{x+1}^{ 2 }");
    }

    #[test]
    fn test_exponent_chain_is_right_associative() {
        assert_snapshot!(expand_exponent_shorthand("a^b^c"), @"a^{ b^{ c } }");
        assert_snapshot!(expand_exponent_shorthand("a^b^c^d"), @"a^{ b^{ c^{ d } } }");
    }

    #[test]
    fn test_separate_chains_collapse_in_the_same_pass() {
        assert_eq!(
            expand_exponent_shorthand_with("a^b^c + x^y^z", 1),
            "a^{ b^{ c } } + x^{ y^{ z } }"
        );
    }

    #[test]
    fn test_pipeline() {
        assert_snapshot!(normalize_latex("$2*x^2/3$"), @r"2\cdot x^\frac{2}{3}");
        assert_snapshot!(normalize_latex("(a+1)/(b+2) * x^2"), @r"\frac{a+1}{b+2} \cdot  x^{ 2 }");
    }

    #[test]
    fn test_pipeline_is_idempotent() {
        for input in [
            "a/b",
            "(a+1)/(b+2)",
            "2*x",
            "x^2",
            "a^b^c",
            "$x^(n+1)/(n+1)$",
            "((a)/(b))/c",
            r"\sqrt{x}*y",
            "a/b/c",
            "plain text",
        ] {
            let once = normalize_latex(input);
            assert_eq!(normalize_latex(&once), once, "input: {input}");
        }
    }

    #[test]
    fn test_deep_fraction_nesting_is_bounded() {
        let mut input = "a".to_string();
        for i in 0..25 {
            input = format!("({input})/(b{i})");
        }
        // Returns despite needing more passes than the cap allows.
        let out = expand_fraction_shorthand(&input);
        assert!(out.contains('/'));
        assert!(out.contains(r"\frac"));
    }

    #[test]
    fn test_deep_exponent_chain_is_bounded() {
        let input = ('a'..='t').map(String::from).collect::<Vec<_>>().join("^");
        let out = expand_exponent_shorthand(&input);
        assert!(out.contains("}^{"));

        let complete = expand_exponent_shorthand_with(&input, 100);
        assert!(!complete.contains("}^{"));
    }

    #[test]
    fn test_custom_pass_cap() {
        let config = NormalizerConfig { max_passes: 0 };
        assert_eq!(normalize_latex_with("a/b", &config), "a/b");
    }
}
