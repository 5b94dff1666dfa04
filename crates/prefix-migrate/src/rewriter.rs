//! Address prefix rewriting
//!
//! Two surface forms are recognized, applied as two sequential global passes:
//!
//! 1. factory denoms: `factory/<old><alnum>+` → `factory/<new><alnum>+`
//! 2. bare tokens: `<old><alnum>+` → `<new><alnum>+`, run over the output of pass 1
//!
//! No bech32 checksum is validated or recomputed. Any alphanumeric run after
//! the old prefix is rewritten, including accidental collisions inside
//! unrelated identifiers.

use crate::config::PrefixPair;
use crate::error::ConfigError;
use regex::{Captures, Regex};
use std::borrow::Cow;

/// Rewrites occurrences of one bech32 prefix to another inside arbitrary text
#[derive(Debug, Clone)]
pub struct AddressRewriter {
    prefixes: PrefixPair,
    factory: Regex,
    bare: Regex,
}

impl AddressRewriter {
    /// Compile the rewrite patterns for a prefix pair
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Pattern`] if a pattern fails to compile.
    pub fn new(prefixes: PrefixPair) -> Result<Self, ConfigError> {
        let old = regex::escape(prefixes.old());
        let factory = compile(&format!("factory/{old}([a-zA-Z0-9]+)"))?;
        let bare = compile(&format!("{old}([a-zA-Z0-9]+)"))?;

        Ok(Self {
            prefixes,
            factory,
            bare,
        })
    }

    /// Prefix pair this rewriter was built for
    #[inline]
    #[must_use]
    pub fn prefixes(&self) -> &PrefixPair {
        &self.prefixes
    }

    /// Whether `text` contains the old prefix anywhere
    #[inline]
    #[must_use]
    pub fn mentions_old(&self, text: &str) -> bool {
        text.contains(self.prefixes.old())
    }

    /// Rewrite every recognized occurrence of the old prefix in `text`
    ///
    /// Borrows when nothing matched.
    #[must_use]
    pub fn rewrite<'t>(&self, text: &'t str) -> Cow<'t, str> {
        let new = self.prefixes.new_prefix();

        let after_factory = self
            .factory
            .replace_all(text, |caps: &Captures<'_>| format!("factory/{new}{}", &caps[1]));

        match after_factory {
            Cow::Borrowed(s) => self.replace_bare(s),
            Cow::Owned(s) => Cow::Owned(self.replace_bare(&s).into_owned()),
        }
    }

    fn replace_bare<'t>(&self, text: &'t str) -> Cow<'t, str> {
        let new = self.prefixes.new_prefix();
        self.bare
            .replace_all(text, |caps: &Captures<'_>| format!("{new}{}", &caps[1]))
    }
}

fn compile(pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|e| ConfigError::Pattern(e.to_string()))
}
