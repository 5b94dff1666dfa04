//! Testing utilities for the prefix-migrate workspace
//!
//! Shared fixtures: sample genesis documents, temp workspaces, CSV helpers.

#![allow(missing_docs)]

use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A minimal but realistic genesis document using the `unicorn` prefix
pub fn sample_genesis() -> Value {
    json!({
        "genesis_time": "2024-01-01T00:00:00Z",
        "chain_id": "unicorn-1",
        "initial_height": "1",
        "consensus_params": {
            "block": {"max_bytes": "22020096", "max_gas": "-1"},
            "validator": {"pub_key_types": ["ed25519"]}
        },
        "app_hash": "",
        "app_state": {
            "auth": {
                "accounts": [
                    {"@type": "/cosmos.auth.v1beta1.BaseAccount", "address": "unicorn1abc9xyz", "account_number": "0"},
                    {"@type": "/cosmos.auth.v1beta1.BaseAccount", "address": "unicorn1def4uvw", "account_number": "1"}
                ]
            },
            "bank": {
                "balances": [
                    {"address": "unicorn1abc9xyz", "coins": [{"denom": "factory/unicorn1abc9xyz/mytoken", "amount": "1000"}]}
                ],
                "supply": [{"denom": "uunicorn", "amount": "123456789012345678901234567890"}]
            },
            "tokenfactory": {
                "factory_denoms": [
                    {"denom": "factory/unicorn1abc9xyz/mytoken", "authority_metadata": {"admin": "unicorn1abc9xyz"}}
                ]
            },
            "custom": {
                "unicorn1abc9xyz": {"weight": 3},
                "unicorn_balance": 42
            }
        },
        "validators": [
            {"address": "ABCDEF", "name": "unicorn1validator", "power": "10"}
        ]
    })
}

/// A genesis document with no occurrence of the `unicorn` prefix
pub fn clean_genesis() -> Value {
    json!({
        "genesis_time": "2024-01-01T00:00:00Z",
        "chain_id": "testnet-7",
        "initial_height": "1",
        "consensus_params": {"block": {"max_bytes": "22020096"}},
        "app_state": {"bank": {"balances": [{"address": "cosmos1abc", "coins": []}]}},
        "validators": []
    })
}

/// Temporary directory with helpers for writing fixtures
pub struct TestWorkspace {
    dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn join(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write `value` as compact JSON and return its path
    pub fn write_json(&self, name: &str, value: &Value) -> PathBuf {
        self.write_file(name, &serde_json::to_string(value).unwrap())
    }

    pub fn write_file(&self, name: &str, contents: &str) -> PathBuf {
        self.write_bytes(name, contents.as_bytes())
    }

    pub fn write_bytes(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, contents).unwrap();
        path
    }

    pub fn read_json(&self, name: &str) -> Value {
        serde_json::from_str(&self.read_file(name)).unwrap()
    }

    pub fn read_file(&self, name: &str) -> String {
        fs::read_to_string(self.join(name)).unwrap()
    }

    /// Sorted file names directly inside `subdir` ("" for the root)
    pub fn file_names(&self, subdir: &str) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.join(subdir))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

/// Render rows as CSV text with `\n` terminators and no quoting
pub fn csv_text(rows: &[&[&str]]) -> String {
    rows.iter()
        .map(|row| format!("{}\n", row.join(",")))
        .collect()
}
