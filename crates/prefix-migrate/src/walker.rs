//! Recursive prefix rewriting over decoded JSON
//!
//! Visits every string and object key reachable from a `serde_json::Value`,
//! rewriting the ones that mention the old prefix. Objects are rebuilt so a
//! renamed key keeps its original position; the value under a renamed key is
//! still processed like any other value.
//!
//! Recursion depth follows the input nesting depth. Genesis documents are
//! shallow in practice, but a pathologically deep input can exhaust the stack.

use crate::rewriter::AddressRewriter;
use serde::Serialize;
use serde_json::{Map, Value};

/// Counters collected while walking a value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WalkStats {
    /// Object keys whose text changed
    pub keys_rewritten: usize,
    /// String values (object members or array elements) whose text changed
    pub strings_rewritten: usize,
    /// Renamed keys that landed on a key already present in the same object
    pub key_collisions: usize,
}

impl WalkStats {
    /// Whether the walk changed anything
    #[inline]
    #[must_use]
    pub fn changed(&self) -> bool {
        self.keys_rewritten > 0 || self.strings_rewritten > 0
    }
}

/// Walks JSON values, rewriting address prefixes in place
#[derive(Debug)]
pub struct StructureWalker<'r> {
    rewriter: &'r AddressRewriter,
    stats: WalkStats,
}

impl<'r> StructureWalker<'r> {
    /// Create a walker backed by `rewriter`
    #[inline]
    #[must_use]
    pub fn new(rewriter: &'r AddressRewriter) -> Self {
        Self {
            rewriter,
            stats: WalkStats::default(),
        }
    }

    /// Counters accumulated so far
    #[inline]
    #[must_use]
    pub fn stats(&self) -> WalkStats {
        self.stats
    }

    /// Rewrite `value` in place
    pub fn walk(&mut self, value: &mut Value) {
        match value {
            Value::Object(map) => self.walk_object(map),
            Value::Array(items) => {
                for item in items.iter_mut() {
                    self.visit(item);
                }
            }
            Value::String(_) | Value::Number(_) | Value::Bool(_) | Value::Null => {}
        }
    }

    /// Handle one member or element: rewrite it if it is a string mentioning
    /// the old prefix, otherwise descend into it.
    fn visit(&mut self, value: &mut Value) {
        match value {
            Value::String(s) if self.rewriter.mentions_old(s.as_str()) => {
                if let Some(rewritten) = self.rewrite_text(s.as_str()) {
                    *s = rewritten;
                    self.stats.strings_rewritten += 1;
                }
            }
            other => self.walk(other),
        }
    }

    fn walk_object(&mut self, map: &mut Map<String, Value>) {
        // Rebuild instead of renaming during iteration.
        let entries = std::mem::take(map);
        for (key, mut value) in entries {
            let key = if self.rewriter.mentions_old(&key) {
                match self.rewrite_text(&key) {
                    Some(renamed) => {
                        self.stats.keys_rewritten += 1;
                        renamed
                    }
                    None => key,
                }
            } else {
                key
            };

            self.visit(&mut value);

            if map.insert(key, value).is_some() {
                self.stats.key_collisions += 1;
            }
        }
    }

    /// Rewritten text, or `None` if the rewrite left it unchanged
    fn rewrite_text(&self, text: &str) -> Option<String> {
        let rewritten = self.rewriter.rewrite(text);
        (rewritten != text).then(|| rewritten.into_owned())
    }
}

/// Rewrite `value` in place and return the collected counters
pub fn walk(rewriter: &AddressRewriter, value: &mut Value) -> WalkStats {
    let mut walker = StructureWalker::new(rewriter);
    walker.walk(value);
    walker.stats()
}
