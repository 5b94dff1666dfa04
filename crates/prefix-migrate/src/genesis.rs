//! Genesis document conversion
//!
//! The top level is decoded as an order-preserving mapping of raw JSON text.
//! Only `app_state` (decoded and walked) and `chain_id` (substring replace)
//! are touched; every other field, `consensus_params` and `validators`
//! included, keeps its token text exactly as read. Escapes and duplicate
//! member names inside those payloads survive; only whitespace is re-laid
//! out to the two-space indentation of the output.
//!
//! ```text
//! read → decode → walk app_state → rename chain_id → encode (2-space indent) → write
//! ```
//!
//! The output file is created or truncated in place; there is no
//! temp-file-then-rename step.

use crate::error::GenesisError;
use crate::rewriter::AddressRewriter;
use crate::walker::{self, WalkStats};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::value::{to_raw_value, RawValue};
use serde_json::Value;
use std::path::Path;

/// Application state field, walked recursively
pub const APP_STATE_FIELD: &str = "app_state";

/// Chain identifier field, renamed by plain substring replacement
pub const CHAIN_ID_FIELD: &str = "chain_id";

/// Top-level fields kept when unknown fields are dropped
pub const WELL_KNOWN_FIELDS: [&str; 6] = [
    APP_STATE_FIELD,
    CHAIN_ID_FIELD,
    "genesis_time",
    "consensus_params",
    "initial_height",
    "validators",
];

/// Decoded top level: field name to the raw JSON text of its value, in source order
pub type RawDocument = IndexMap<String, Box<RawValue>>;

const INDENT: &str = "  ";

/// Outcome of a genesis conversion
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenesisReport {
    /// Counters from walking `app_state`
    pub walk: WalkStats,
    /// Whether `chain_id` was renamed
    pub chain_id_changed: bool,
    /// Top-level fields dropped because they are not well-known
    pub dropped_fields: Vec<String>,
}

/// Converts genesis documents from the old prefix to the new one
#[derive(Debug, Clone)]
pub struct GenesisConverter<'r> {
    rewriter: &'r AddressRewriter,
    preserve_unknown_fields: bool,
}

impl<'r> GenesisConverter<'r> {
    /// Create a converter that keeps every top-level field
    #[inline]
    #[must_use]
    pub fn new(rewriter: &'r AddressRewriter) -> Self {
        Self {
            rewriter,
            preserve_unknown_fields: true,
        }
    }

    /// Keep or drop top-level fields outside [`WELL_KNOWN_FIELDS`]
    #[inline]
    #[must_use]
    pub fn with_preserve_unknown_fields(mut self, preserve: bool) -> Self {
        self.preserve_unknown_fields = preserve;
        self
    }

    /// Convert the document at `input` and write the result to `output`
    ///
    /// # Errors
    ///
    /// Fails with [`GenesisError::Read`] or [`GenesisError::Write`] on IO
    /// failure, [`GenesisError::Decode`] if the input is not a genesis
    /// document, and [`GenesisError::Encode`] if serialization fails.
    pub fn convert(&self, input: &Path, output: &Path) -> Result<GenesisReport, GenesisError> {
        tracing::info!(input = %input.display(), output = %output.display(), "processing genesis file");

        let bytes = std::fs::read(input).map_err(|e| GenesisError::read_error(input, e))?;
        let (converted, report) = self.convert_bytes(&bytes, input)?;
        std::fs::write(output, converted).map_err(|e| GenesisError::write_error(output, e))?;

        let prefixes = self.rewriter.prefixes();
        tracing::info!(
            old = prefixes.old(),
            new = prefixes.new_prefix(),
            output = %output.display(),
            keys = report.walk.keys_rewritten,
            strings = report.walk.strings_rewritten,
            chain_id_changed = report.chain_id_changed,
            "converted genesis addresses"
        );
        Ok(report)
    }

    /// Convert an in-memory document; `source` only labels decode errors
    ///
    /// # Errors
    ///
    /// Fails with [`GenesisError::Decode`] or [`GenesisError::Encode`].
    pub fn convert_bytes(
        &self,
        bytes: &[u8],
        source: &Path,
    ) -> Result<(Vec<u8>, GenesisReport), GenesisError> {
        let mut doc = decode_document(bytes, source)?;
        let report = self.convert_document(&mut doc, source)?;
        let encoded = encode_document(doc)?;
        Ok((encoded, report))
    }

    /// Convert a decoded top-level mapping in place
    ///
    /// `app_state` is replaced by its walked, compact re-encoding. `chain_id`
    /// is replaced only when renamed. Other fields are not looked at.
    ///
    /// # Errors
    ///
    /// Fails with [`GenesisError::Decode`] if `app_state` is missing or
    /// `chain_id` is not a string.
    pub fn convert_document(
        &self,
        doc: &mut RawDocument,
        source: &Path,
    ) -> Result<GenesisReport, GenesisError> {
        let mut report = GenesisReport::default();

        let raw_app_state = doc.get_mut(APP_STATE_FIELD).ok_or_else(|| {
            GenesisError::decode_error(source, format!("missing {APP_STATE_FIELD} field"))
        })?;
        let mut app_state = parse_raw(raw_app_state, source)?;
        report.walk = walker::walk(self.rewriter, &mut app_state);
        *raw_app_state = to_raw_value(&app_state).map_err(GenesisError::Encode)?;
        if report.walk.key_collisions > 0 {
            tracing::warn!(
                collisions = report.walk.key_collisions,
                "renamed keys replaced existing entries in app_state"
            );
        }

        report.chain_id_changed = self.rename_chain_id(doc, source)?;

        if !self.preserve_unknown_fields {
            doc.retain(|key, _| {
                let keep = WELL_KNOWN_FIELDS.contains(&key.as_str());
                if !keep {
                    report.dropped_fields.push(key.clone());
                }
                keep
            });
            if !report.dropped_fields.is_empty() {
                tracing::warn!(fields = ?report.dropped_fields, "dropped unknown top-level fields");
            }
        }

        Ok(report)
    }

    /// Replace every occurrence of the old prefix in `chain_id`
    fn rename_chain_id(&self, doc: &mut RawDocument, source: &Path) -> Result<bool, GenesisError> {
        let Some(raw) = doc.get_mut(CHAIN_ID_FIELD) else {
            return Ok(false);
        };

        let prefixes = self.rewriter.prefixes();
        match parse_raw(raw, source)? {
            Value::String(chain_id) if chain_id.contains(prefixes.old()) => {
                let renamed = chain_id.replace(prefixes.old(), prefixes.new_prefix());
                tracing::debug!(from = %chain_id, to = %renamed, "renaming chain id");
                *raw = to_raw_value(&renamed).map_err(GenesisError::Encode)?;
                Ok(true)
            }
            Value::String(_) | Value::Null => Ok(false),
            other => Err(GenesisError::decode_error(
                source,
                format!("{CHAIN_ID_FIELD} must be a string, found {other}"),
            )),
        }
    }
}

fn decode_document(bytes: &[u8], source: &Path) -> Result<RawDocument, GenesisError> {
    serde_json::from_slice(bytes).map_err(|e| {
        let reason = if e.is_data() {
            format!("top-level value is not an object: {e}")
        } else {
            e.to_string()
        };
        GenesisError::decode_error(source, reason)
    })
}

fn parse_raw(raw: &RawValue, source: &Path) -> Result<Value, GenesisError> {
    serde_json::from_str(raw.get()).map_err(|e| GenesisError::decode_error(source, e.to_string()))
}

/// Pretty-print the document, laying out each field's raw text one level deep
fn encode_document(doc: RawDocument) -> Result<Vec<u8>, GenesisError> {
    let mut indented = RawDocument::with_capacity(doc.len());
    for (key, raw) in doc {
        let text = reindent(raw.get(), INDENT, INDENT);
        indented.insert(key, RawValue::from_string(text).map_err(GenesisError::Encode)?);
    }
    serde_json::to_vec_pretty(&indented).map_err(GenesisError::Encode)
}

/// Re-lay out valid JSON text with one member or element per line
///
/// Whitespace between tokens is dropped and replaced; string tokens are
/// copied untouched. Each new line starts with `prefix` followed by one
/// `indent` per nesting level. Empty containers stay on one line.
fn reindent(raw: &str, prefix: &str, indent: &str) -> String {
    fn newline(out: &mut String, prefix: &str, indent: &str, depth: usize) {
        out.push('\n');
        out.push_str(prefix);
        for _ in 0..depth {
            out.push_str(indent);
        }
    }

    let mut out = String::with_capacity(raw.len() * 2);
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    // an opening bracket was just written and its first element is pending
    let mut opened = false;

    for c in raw.chars() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        if matches!(c, ' ' | '\t' | '\n' | '\r') {
            continue;
        }
        if opened && !matches!(c, '}' | ']') {
            opened = false;
            depth += 1;
            newline(&mut out, prefix, indent, depth);
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            '{' | '[' => {
                out.push(c);
                opened = true;
            }
            '}' | ']' => {
                if opened {
                    opened = false;
                } else {
                    depth = depth.saturating_sub(1);
                    newline(&mut out, prefix, indent, depth);
                }
                out.push(c);
            }
            ',' => {
                out.push(c);
                newline(&mut out, prefix, indent, depth);
            }
            ':' => out.push_str(": "),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PrefixPair;
    use serde_json::json;

    fn rewriter() -> AddressRewriter {
        AddressRewriter::new(PrefixPair::default()).unwrap()
    }

    fn convert(doc: &Value) -> Result<(Value, GenesisReport), GenesisError> {
        let rewriter = rewriter();
        let converter = GenesisConverter::new(&rewriter);
        let bytes = serde_json::to_vec(doc).unwrap();
        let (out, report) = converter.convert_bytes(&bytes, Path::new("genesis.json"))?;
        Ok((serde_json::from_slice(&out).unwrap(), report))
    }

    #[test]
    fn renames_chain_id() {
        let (out, report) = convert(&json!({"chain_id": "unicorn-1", "app_state": {}})).unwrap();
        assert_eq!(out["chain_id"], "esim-1");
        assert!(report.chain_id_changed);
    }

    #[test]
    fn chain_id_uses_plain_replacement() {
        // `unicorn-unicorn` has no address shape, yet both occurrences change.
        let (out, _) = convert(&json!({"chain_id": "unicorn-unicorn", "app_state": {}})).unwrap();
        assert_eq!(out["chain_id"], "esim-esim");
    }

    #[test]
    fn walks_app_state() {
        let (out, report) = convert(&json!({
            "chain_id": "test-1",
            "app_state": {"auth": {"accounts": [{"address": "unicorn1abc"}]}}
        }))
        .unwrap();

        assert_eq!(out["app_state"]["auth"]["accounts"][0]["address"], "esim1abc");
        assert_eq!(out["chain_id"], "test-1");
        assert_eq!(report.walk.strings_rewritten, 1);
        assert!(!report.chain_id_changed);
    }

    #[test]
    fn opaque_fields_are_not_walked() {
        let doc = json!({
            "app_state": {},
            "validators": [{"address": "unicorn1val"}],
            "consensus_params": {"block": {"max_bytes": "22020096"}}
        });
        let (out, _) = convert(&doc).unwrap();
        assert_eq!(out["validators"], doc["validators"]);
        assert_eq!(out["consensus_params"], doc["consensus_params"]);
    }

    #[test]
    fn unknown_fields_preserved_by_default() {
        let (out, report) = convert(&json!({"app_state": {}, "app_hash": "", "extra": 1})).unwrap();
        assert_eq!(out["extra"], 1);
        assert!(report.dropped_fields.is_empty());
    }

    #[test]
    fn unknown_fields_dropped_on_request() {
        let rewriter = rewriter();
        let converter = GenesisConverter::new(&rewriter).with_preserve_unknown_fields(false);
        let bytes = br#"{"app_state": {}, "chain_id": "x", "app_hash": ""}"#;

        let (out, report) = converter.convert_bytes(bytes, Path::new("g.json")).unwrap();
        let out: Value = serde_json::from_slice(&out).unwrap();

        assert!(out.get("app_hash").is_none());
        assert_eq!(out["chain_id"], "x");
        assert_eq!(report.dropped_fields, vec!["app_hash".to_string()]);
    }

    #[test]
    fn output_is_two_space_indented() {
        let rewriter = rewriter();
        let converter = GenesisConverter::new(&rewriter);
        let (out, _) = converter
            .convert_bytes(br#"{"chain_id":"c","app_state":{"a":1}}"#, Path::new("g.json"))
            .unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "{\n  \"chain_id\": \"c\",\n  \"app_state\": {\n    \"a\": 1\n  }\n}"
        );
    }

    #[test]
    fn opaque_fields_keep_their_token_text() {
        let rewriter = rewriter();
        let converter = GenesisConverter::new(&rewriter);
        let input = br#"{"app_state":{},"validators":[{"name":"caf\u00e9 \/ x","k":1,"k":2}],"extra":{ "a" : "q\"}" }}"#;
        let (out, _) = converter.convert_bytes(input, Path::new("g.json")).unwrap();

        let expected = r#"{
  "app_state": {},
  "validators": [
    {
      "name": "caf\u00e9 \/ x",
      "k": 1,
      "k": 2
    }
  ],
  "extra": {
    "a": "q\"}"
  }
}"#;
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[test]
    fn unchanged_chain_id_keeps_its_escapes() {
        let rewriter = rewriter();
        let converter = GenesisConverter::new(&rewriter);
        let (out, report) = converter
            .convert_bytes(br#"{"chain_id":"t\u0065st-1","app_state":{}}"#, Path::new("g.json"))
            .unwrap();

        assert!(String::from_utf8(out).unwrap().contains(r#""chain_id": "t\u0065st-1""#));
        assert!(!report.chain_id_changed);
    }

    #[test]
    fn reindent_lays_out_nested_containers() {
        let text = reindent(r#"[ 1 , {"a" : "x{,}\"" } , [] , {} ]"#, "", "  ");
        assert_eq!(text, "[\n  1,\n  {\n    \"a\": \"x{,}\\\"\"\n  },\n  [],\n  {}\n]");
    }

    #[test]
    fn reindent_scalars_are_unchanged() {
        assert_eq!(reindent("  42 ", "  ", "  "), "42");
        assert_eq!(reindent(r#""a b""#, "  ", "  "), r#""a b""#);
    }

    #[test]
    fn malformed_json_is_decode_error() {
        let rewriter = rewriter();
        let converter = GenesisConverter::new(&rewriter);
        let err = converter.convert_bytes(b"{\"app_state\":", Path::new("g.json")).unwrap_err();
        assert!(matches!(err, GenesisError::Decode { .. }));
    }

    #[test]
    fn missing_app_state_is_decode_error() {
        let err = convert(&json!({"chain_id": "unicorn-1"})).unwrap_err();
        assert!(err.to_string().contains("missing app_state"));
    }

    #[test]
    fn non_object_document_is_decode_error() {
        let err = convert(&json!([1, 2])).unwrap_err();
        assert!(matches!(err, GenesisError::Decode { .. }));
    }

    #[test]
    fn non_string_chain_id_is_decode_error() {
        let err = convert(&json!({"chain_id": 7, "app_state": {}})).unwrap_err();
        assert!(err.to_string().contains("chain_id must be a string"));
    }

    #[test]
    fn large_numbers_survive() {
        let rewriter = rewriter();
        let converter = GenesisConverter::new(&rewriter);
        let input = br#"{"app_state":{"supply":123456789012345678901234567890,"rate":0.100000000000000000}}"#;
        let (out, _) = converter.convert_bytes(input, Path::new("g.json")).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("123456789012345678901234567890"));
        assert!(text.contains("0.100000000000000000"));
    }
}
