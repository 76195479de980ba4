//! Template-literal pattern algebra.
//!
//! Template-literal schemas carry an anchored pattern string such as
//! `^(on|off)$` denoting a set of string literals. This module decodes a
//! pattern back into a comparable schema: a finite language becomes a
//! `Literal` or a `Union` of literals, an infinite one widens to `String`.
//! It also classifies record keys against key patterns.
//!
//! The grammar is deliberately small: literal text, `\`-escapes,
//! alternation groups `(a|b)`, and the infinite atoms (`.`-wildcards and
//! character classes, with `*`/`+` postfixes). A `?` postfix stays finite:
//! it adds the empty string to the preceding text or group's language.
//! Anything a pattern encoder would not produce is rejected as malformed.

use tracing::trace;

use skema_common::interner::Atom;
use skema_common::limits::TEMPLATE_EXPANSION_LIMIT;

use crate::intern::SchemaInterner;
use crate::types::{SchemaError, SchemaId};

/// Key pattern admitting every string key.
pub const PATTERN_STRING: &str = "^(.*)$";
/// Key pattern admitting canonical non-negative integer keys.
pub const PATTERN_NUMBER: &str = "^(0|[1-9][0-9]*)$";
/// Pattern for the two boolean literals.
pub const PATTERN_BOOLEAN: &str = "^(true|false)$";

#[derive(Debug, Clone, PartialEq, Eq)]
enum PatternNode {
    /// Exact text run.
    Text(String),
    /// Alternation group; each alternative is a sequence.
    Group(Vec<Vec<PatternNode>>),
    /// An atom denoting an infinite (or unenumerated) language:
    /// wildcards, character classes, starred/plussed atoms.
    Infinite,
}

fn malformed(pattern: &str, reason: &str) -> SchemaError {
    SchemaError::MalformedPattern {
        pattern: pattern.to_string(),
        reason: reason.to_string(),
    }
}

/// Parse an anchored pattern into a node sequence.
fn parse(pattern: &str) -> Result<Vec<PatternNode>, SchemaError> {
    let body = pattern
        .strip_prefix('^')
        .and_then(|rest| rest.strip_suffix('$'))
        .ok_or_else(|| malformed(pattern, "pattern must be anchored with ^ and $"))?;
    let mut chars = body.chars().peekable();
    let nodes = parse_sequence(pattern, &mut chars, false)?;
    if chars.next().is_some() {
        return Err(malformed(pattern, "unbalanced group"));
    }
    Ok(nodes)
}

fn parse_sequence(
    pattern: &str,
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    in_group: bool,
) -> Result<Vec<PatternNode>, SchemaError> {
    let mut nodes: Vec<PatternNode> = Vec::new();
    let mut text = String::new();

    macro_rules! flush_text {
        () => {
            if !text.is_empty() {
                nodes.push(PatternNode::Text(std::mem::take(&mut text)));
            }
        };
    }

    while let Some(&c) = chars.peek() {
        match c {
            ')' | '|' if in_group => break,
            ')' => return Err(malformed(pattern, "unbalanced group")),
            '(' => {
                chars.next();
                flush_text!();
                let mut alternatives = Vec::new();
                loop {
                    // Non-capturing prefix is tolerated and ignored.
                    if chars.peek() == Some(&'?') {
                        chars.next();
                        if chars.next() != Some(':') {
                            return Err(malformed(pattern, "unsupported group prefix"));
                        }
                    }
                    alternatives.push(parse_sequence(pattern, chars, true)?);
                    match chars.next() {
                        Some('|') => continue,
                        Some(')') => break,
                        _ => return Err(malformed(pattern, "unbalanced group")),
                    }
                }
                let node = PatternNode::Group(alternatives);
                nodes.push(apply_postfix(chars, node));
            }
            '[' => {
                chars.next();
                flush_text!();
                let mut escaped = false;
                loop {
                    match chars.next() {
                        Some('\\') if !escaped => escaped = true,
                        Some(']') if !escaped => break,
                        Some(_) => escaped = false,
                        None => return Err(malformed(pattern, "unterminated character class")),
                    }
                }
                consume_postfix(chars);
                nodes.push(PatternNode::Infinite);
            }
            '.' => {
                chars.next();
                consume_postfix(chars);
                flush_text!();
                nodes.push(PatternNode::Infinite);
            }
            '\\' => {
                chars.next();
                match chars.next() {
                    Some(escaped) => text.push(escaped),
                    None => return Err(malformed(pattern, "dangling escape")),
                }
            }
            '*' | '+' => {
                // Postfix on a bare literal character.
                chars.next();
                if text.pop().is_none() {
                    return Err(malformed(pattern, "postfix without operand"));
                }
                flush_text!();
                nodes.push(PatternNode::Infinite);
            }
            '?' => {
                chars.next();
                let Some(last) = text.pop() else {
                    return Err(malformed(pattern, "postfix without operand"));
                };
                flush_text!();
                nodes.push(optional(PatternNode::Text(last.to_string())));
            }
            '^' | '$' => return Err(malformed(pattern, "anchor inside pattern body")),
            _ => {
                chars.next();
                text.push(c);
            }
        }
    }
    if !text.is_empty() {
        nodes.push(PatternNode::Text(text));
    }
    Ok(nodes)
}

/// A `*`/`+` postfix makes the preceding node unenumerated; `?` adds the
/// empty string to its language instead, keeping it finite.
fn apply_postfix(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    node: PatternNode,
) -> PatternNode {
    match chars.peek() {
        Some('*') | Some('+') => {
            chars.next();
            PatternNode::Infinite
        }
        Some('?') => {
            chars.next();
            optional(node)
        }
        _ => node,
    }
}

fn optional(node: PatternNode) -> PatternNode {
    match node {
        PatternNode::Infinite => PatternNode::Infinite,
        PatternNode::Group(mut alternatives) => {
            alternatives.push(Vec::new());
            PatternNode::Group(alternatives)
        }
        text => PatternNode::Group(vec![vec![text], Vec::new()]),
    }
}

fn consume_postfix(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) {
    if matches!(chars.peek(), Some('*') | Some('+') | Some('?')) {
        chars.next();
    }
}

/// Enumerate the finite language of a node sequence, or `None` if the
/// language is infinite or exceeds the expansion limit.
fn enumerate(nodes: &[PatternNode]) -> Option<Vec<String>> {
    let mut combinations = vec![String::new()];
    for node in nodes {
        match node {
            PatternNode::Infinite => return None,
            PatternNode::Text(text) => {
                for combo in &mut combinations {
                    combo.push_str(text);
                }
            }
            PatternNode::Group(alternatives) => {
                let mut expanded: Vec<Vec<String>> = Vec::with_capacity(alternatives.len());
                for alt in alternatives {
                    expanded.push(enumerate(alt)?);
                }
                let alt_total: usize = expanded.iter().map(|v| v.len()).sum();
                let new_size = combinations.len().checked_mul(alt_total)?;
                if new_size > TEMPLATE_EXPANSION_LIMIT {
                    return None;
                }
                let mut next = Vec::with_capacity(new_size);
                for combo in &combinations {
                    for alt in &expanded {
                        for value in alt {
                            next.push(format!("{combo}{value}"));
                        }
                    }
                }
                combinations = next;
            }
        }
    }
    Some(combinations)
}

/// Decode a template pattern into a comparable schema: a finite language
/// becomes a literal or union of literals, an infinite one widens to
/// `String`.
pub fn decode_template_literal(
    interner: &SchemaInterner,
    pattern: Atom,
) -> Result<SchemaId, SchemaError> {
    let text = interner.resolve_atom(pattern);
    let nodes = parse(text.as_ref())?;
    match enumerate(&nodes) {
        Some(values) => {
            trace!(
                pattern = text.as_ref(),
                count = values.len(),
                "decode_template_literal: finite expansion"
            );
            let literals: Vec<SchemaId> = values
                .iter()
                .map(|value| interner.literal_string(value))
                .collect();
            Ok(interner.union(literals))
        }
        None => {
            trace!(
                pattern = text.as_ref(),
                "decode_template_literal: infinite language, widening to String"
            );
            Ok(SchemaId::STRING)
        }
    }
}

/// Segment-stack matcher: does `text` belong to the pattern's language?
/// `Infinite` atoms match any substring, which over-approximates their
/// real language; callers that need exactness (numeric keys) special-case
/// the well-known patterns before falling through to this.
fn match_segments(segments: &[&[PatternNode]], text: &str) -> bool {
    let Some((seg_idx, segment)) = segments
        .iter()
        .enumerate()
        .find(|(_, seg)| !seg.is_empty())
    else {
        return text.is_empty();
    };
    let (node, rest) = (&segment[0], &segment[1..]);
    let mut next: Vec<&[PatternNode]> = Vec::with_capacity(segments.len() - seg_idx + 1);
    next.push(rest);
    next.extend_from_slice(&segments[seg_idx + 1..]);
    match node {
        PatternNode::Text(t) => match text.strip_prefix(t.as_str()) {
            Some(remaining) => match_segments(&next, remaining),
            None => false,
        },
        PatternNode::Infinite => {
            let mut boundaries: Vec<usize> =
                text.char_indices().map(|(i, _)| i).collect();
            boundaries.push(text.len());
            boundaries
                .into_iter()
                .any(|i| match_segments(&next, &text[i..]))
        }
        PatternNode::Group(alternatives) => alternatives.iter().any(|alt| {
            let mut with_alt: Vec<&[PatternNode]> = Vec::with_capacity(next.len() + 1);
            with_alt.push(alt.as_slice());
            with_alt.extend_from_slice(&next);
            match_segments(&with_alt, text)
        }),
    }
}

/// Is `text` a canonical non-negative integer (no sign, no leading zero)?
fn is_canonical_integer(text: &str) -> bool {
    match text.as_bytes() {
        [] => false,
        [b'0'] => true,
        [b'0', ..] => false,
        digits => digits.iter().all(|b| b.is_ascii_digit()),
    }
}

/// Does a key pattern admit the given literal key?
pub fn pattern_allows_key(
    interner: &SchemaInterner,
    pattern: Atom,
    key: &str,
) -> Result<bool, SchemaError> {
    let text = interner.resolve_atom(pattern);
    match text.as_ref() {
        PATTERN_STRING => Ok(true),
        PATTERN_NUMBER => Ok(is_canonical_integer(key)),
        _ => {
            let nodes = parse(text.as_ref())?;
            Ok(match_segments(&[nodes.as_slice()], key))
        }
    }
}

/// Does every key admitted by `left` fit `right`? Used for record-to-record
/// key covariance. Conservative: equal patterns, the universal string
/// pattern on the right, or finite-language inclusion.
pub fn key_pattern_subsumes(
    interner: &SchemaInterner,
    left: Atom,
    right: Atom,
) -> Result<bool, SchemaError> {
    if left == right {
        return Ok(true);
    }
    let right_text = interner.resolve_atom(right);
    if right_text.as_ref() == PATTERN_STRING {
        return Ok(true);
    }
    let left_text = interner.resolve_atom(left);
    let left_nodes = parse(left_text.as_ref())?;
    let Some(left_values) = enumerate(&left_nodes) else {
        return Ok(false);
    };
    for value in &left_values {
        if !pattern_allows_key(interner, right, value)? {
            return Ok(false);
        }
    }
    Ok(true)
}

#[cfg(test)]
#[path = "tests/template_literal_tests.rs"]
mod template_literal_tests;
