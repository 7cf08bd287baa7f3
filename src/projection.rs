//! Field projection for `--fields`.
//!
//! A selection is a comma-separated list of dotted paths such as
//! `data.name,meta.pagination.nextToken`. Paths are merged into a prefix tree
//! and applied to the serialized envelope in one walk, so the output holds the
//! union of every path with only the nesting needed to reach each selected node.
//!
//! Arrays are addressed with the wildcard segment `*`: `data.*.name` keeps
//! `name` from every element of `data`. On an object, `*` matches every member.
//! Numeric segments are ordinary object keys. Array elements for which no
//! requested sub-path resolves are dropped. Paths that do not resolve are
//! omitted; projection never fails.

use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Key(String),
    Wildcard,
}

impl Segment {
    fn parse(raw: &str) -> Segment {
        if raw == "*" {
            Segment::Wildcard
        } else {
            Segment::Key(raw.to_string())
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct PathTrie {
    /// A requested path ends here; the whole subtree is selected.
    terminal: bool,
    /// Children in first-appearance order.
    children: Vec<(Segment, PathTrie)>,
}

impl PathTrie {
    fn insert(&mut self, segments: &[Segment]) {
        let Some((first, rest)) = segments.split_first() else {
            self.terminal = true;
            return;
        };
        let child = match self.children.iter().position(|(seg, _)| seg == first) {
            Some(idx) => &mut self.children[idx].1,
            None => {
                self.children.push((first.clone(), PathTrie::default()));
                let last = self.children.len() - 1;
                &mut self.children[last].1
            }
        };
        child.insert(rest);
    }

    fn child(&self, segment: &Segment) -> Option<&PathTrie> {
        self.children
            .iter()
            .find(|(seg, _)| seg == segment)
            .map(|(_, trie)| trie)
    }

    fn union(&self, other: &PathTrie) -> PathTrie {
        let mut merged = self.clone();
        merged.terminal |= other.terminal;
        for (segment, trie) in &other.children {
            match merged.children.iter_mut().find(|(seg, _)| seg == segment) {
                Some((_, existing)) => *existing = existing.union(trie),
                None => merged.children.push((segment.clone(), trie.clone())),
            }
        }
        merged
    }
}

/// Parsed `--fields` value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSelection {
    trie: PathTrie,
}

impl FieldSelection {
    /// Parse a comma-separated path list. Blank entries and paths with an
    /// empty segment (`data..x`) are ignored.
    pub fn parse(spec: &str) -> Self {
        let mut selection = FieldSelection::default();
        for raw in spec.split(',') {
            let path = raw.trim();
            if path.is_empty() {
                continue;
            }
            let parts: Vec<&str> = path.split('.').map(str::trim).collect();
            if parts.iter().any(|p| p.is_empty()) {
                continue;
            }
            let segments: Vec<Segment> = parts.into_iter().map(Segment::parse).collect();
            selection.trie.insert(&segments);
        }
        selection
    }

    /// True when no usable path was given; projection is then the identity.
    pub fn is_empty(&self) -> bool {
        self.trie.children.is_empty()
    }
}

/// Apply `selection` to `value`. An empty selection returns `value` unchanged;
/// a selection that resolves nothing yields an empty object.
pub fn project(value: &Value, selection: &FieldSelection) -> Value {
    if selection.is_empty() {
        return value.clone();
    }
    project_node(value, &selection.trie).unwrap_or_else(|| Value::Object(Map::new()))
}

/// Parse and apply in one call; `None` means no `--fields` flag.
pub fn project_fields(value: Value, fields: Option<&str>) -> Value {
    match fields {
        Some(spec) => project(&value, &FieldSelection::parse(spec)),
        None => value,
    }
}

fn project_node(value: &Value, trie: &PathTrie) -> Option<Value> {
    if trie.terminal {
        return Some(value.clone());
    }
    match value {
        Value::Object(map) => project_object(map, trie),
        Value::Array(items) => {
            let element_trie = trie.child(&Segment::Wildcard)?;
            let projected: Vec<Value> = items
                .iter()
                .filter_map(|item| project_node(item, element_trie))
                .collect();
            if projected.is_empty() {
                None
            } else {
                Some(Value::Array(projected))
            }
        }
        _ => None,
    }
}

fn project_object(map: &Map<String, Value>, trie: &PathTrie) -> Option<Value> {
    // Output keys follow the order in which paths first name them.
    let mut keys: Vec<&String> = Vec::new();
    for (segment, _) in &trie.children {
        match segment {
            Segment::Key(key) => {
                if let Some((existing, _)) = map.get_key_value(key) {
                    if !keys.contains(&existing) {
                        keys.push(existing);
                    }
                }
            }
            Segment::Wildcard => {
                for existing in map.keys() {
                    if !keys.contains(&existing) {
                        keys.push(existing);
                    }
                }
            }
        }
    }

    let wildcard = trie.child(&Segment::Wildcard);
    let mut out = Map::new();
    for key in keys {
        let by_key = trie.child(&Segment::Key(key.clone()));
        let combined = match (by_key, wildcard) {
            (Some(a), Some(b)) => a.union(b),
            (Some(a), None) => a.clone(),
            (None, Some(b)) => b.clone(),
            (None, None) => continue,
        };
        if let Some(projected) = project_node(&map[key.as_str()], &combined) {
            out.insert(key.clone(), projected);
        }
    }

    if out.is_empty() {
        None
    } else {
        Some(Value::Object(out))
    }
}
