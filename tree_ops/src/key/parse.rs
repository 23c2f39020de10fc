//! Raw key string → [`KeyDescriptor`].

use crate::operators::OperatorRegistry;

use super::{FOREACH_MARKER, KeyDescriptor, LITERAL_ESCAPE, OperatorKind};

/// Operator recognised at the front of a key, plus the remaining base key.
struct Marker<'k> {
    kind: OperatorKind,
    foreach: bool,
    rest: &'k str,
}

/// Parse `raw` into a [`KeyDescriptor`].
///
/// Custom markers only resolve when `registry` knows the name; otherwise the
/// whole string stays part of a plain key.
///
/// # Examples
///
/// ```
/// use tree_ops::{OperatorKind, OperatorRegistry, parse_key};
///
/// let registry = OperatorRegistry::new();
/// let key = parse_key("#+defense", &registry);
/// assert_eq!(key.operator(), &OperatorKind::Add);
/// assert_eq!(key.base_key(), "defense");
/// assert!(key.is_foreach());
///
/// let escaped = parse_key("()*.kfg", &registry);
/// assert!(escaped.is_plain());
/// assert_eq!(escaped.base_key(), "*.kfg");
/// ```
#[must_use]
pub fn parse_key(raw: &str, registry: &OperatorRegistry) -> KeyDescriptor {
    if let Some(rest) = raw.strip_prefix(LITERAL_ESCAPE) {
        return KeyDescriptor::literal(rest, false);
    }

    let (foreach, body) = raw
        .strip_prefix(FOREACH_MARKER)
        .map_or((false, raw), |rest| (true, rest));

    if let Some(rest) = body.strip_prefix(LITERAL_ESCAPE) {
        return KeyDescriptor::literal(rest, foreach);
    }

    match parse_marker(body, registry) {
        Some(marker) => KeyDescriptor::new(marker.kind, marker.rest)
            .with_foreach(foreach || marker.foreach),
        None => KeyDescriptor::plain(body).with_foreach(foreach),
    }
}

fn parse_marker<'k>(body: &'k str, registry: &OperatorRegistry) -> Option<Marker<'k>> {
    match body.chars().next()? {
        '<' => parse_before(body),
        '*' => parse_star(body),
        '+' => parse_plus(body),
        '(' => parse_custom(body, registry),
        _ => None,
    }
}

fn marker(kind: OperatorKind, rest: &str) -> Marker<'_> {
    Marker {
        kind,
        foreach: false,
        rest,
    }
}

fn level_of(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}

fn parse_before(body: &str) -> Option<Marker<'_>> {
    let after = body.trim_start_matches('<');
    let chevrons = body.len() - after.len();
    if let Some(rest) = after.strip_prefix('*') {
        return Some(marker(OperatorKind::CombineBefore(level_of(chevrons)), rest));
    }
    if chevrons == 1 {
        return after
            .strip_prefix('+')
            .map(|rest| marker(OperatorKind::ConcatBefore, rest));
    }
    None
}

fn parse_star(body: &str) -> Option<Marker<'_>> {
    let after = body.strip_prefix('*')?;
    let rest = after.trim_start_matches('>');
    let chevrons = after.len() - rest.len();
    Some(if chevrons == 0 {
        marker(OperatorKind::Multiply, after)
    } else {
        marker(OperatorKind::CombineAfter(level_of(chevrons)), rest)
    })
}

fn parse_plus(body: &str) -> Option<Marker<'_>> {
    let after = body.strip_prefix('+')?;
    Some(after.strip_prefix('>').map_or_else(
        || marker(OperatorKind::Add, after),
        |rest| marker(OperatorKind::ConcatAfter, rest),
    ))
}

fn parse_custom<'k>(body: &'k str, registry: &OperatorRegistry) -> Option<Marker<'k>> {
    let (inner, rest) = body.strip_prefix('(')?.split_once(')')?;
    let (foreach, name) = inner
        .strip_prefix(FOREACH_MARKER)
        .map_or((false, inner), |name| (true, name));
    if !registry.contains(name) {
        tracing::trace!(key = body, name, "unregistered operator; treating key as plain");
        return None;
    }
    Some(Marker {
        kind: OperatorKind::Custom(name.to_owned()),
        foreach,
        rest,
    })
}
