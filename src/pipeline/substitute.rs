use std::collections::HashMap;

use regex::{Captures, RegexBuilder};
use tracing::{debug, warn};

use crate::color::canonical_hex;
use crate::error::{Error, Result};
use crate::store::Palette;

/// Ordered canonical-input to canonical-output colour mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitution {
    pairs: Vec<(String, String)>,
}

impl Substitution {
    /// Pair up `input[i]` with `output[i]`.
    ///
    /// The palettes must have equal length and matching ids at each index.
    /// When two input colours normalize to the same hex, the key keeps its
    /// first position and takes the later output value.
    pub fn new(input: &Palette, output: &Palette) -> Result<Self> {
        if input.len() != output.len() {
            return Err(Error::PaletteMismatch(format!(
                "{} input colours but {} output colours",
                input.len(),
                output.len()
            )));
        }

        let mut pairs: Vec<(String, String)> = Vec::with_capacity(input.len());
        let mut index: HashMap<String, usize> = HashMap::with_capacity(input.len());
        for (i, (from, to)) in input.iter().zip(output.iter()).enumerate() {
            if from.id != to.id {
                return Err(Error::PaletteMismatch(format!(
                    "entry {i} has id {} in the input but {} in the output",
                    from.id, to.id
                )));
            }
            let key = canonical_hex(&from.value)?;
            let value = canonical_hex(&to.value)?;
            match index.get(&key) {
                Some(&at) => {
                    debug!(%key, "duplicate input colour, later mapping wins");
                    pairs[at].1 = value;
                }
                None => {
                    index.insert(key.clone(), pairs.len());
                    pairs.push((key, value));
                }
            }
        }
        Ok(Self { pairs })
    }

    /// Rewrite every mapped colour in `text` in a single left-to-right pass.
    ///
    /// Matching ignores case. At any position the earliest key in mapping
    /// order wins. Fails with [`Error::MatcherTooLarge`] when the mapping is
    /// too big to compile into a single matcher.
    pub fn apply(&self, text: &str) -> Result<String> {
        if self.pairs.is_empty() {
            return Ok(text.to_string());
        }

        let pattern = self
            .pairs
            .iter()
            .map(|(k, _)| regex::escape(k))
            .collect::<Vec<_>>()
            .join("|");
        let re = RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| {
                warn!(count = self.pairs.len(), "substitution matcher rejected: {e}");
                Error::MatcherTooLarge {
                    count: self.pairs.len(),
                    reason: e.to_string(),
                }
            })?;

        let lookup: HashMap<&str, &str> = self
            .pairs
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();

        Ok(re
            .replace_all(text, |caps: &Captures| {
                let matched = caps[0].to_ascii_lowercase();
                lookup
                    .get(matched.as_str())
                    .map_or_else(|| caps[0].to_string(), |v| v.to_string())
            })
            .into_owned())
    }
}

/// Replace colours of `input` found in `text` with their counterpart in
/// `output`.
pub fn substitute(text: &str, input: &Palette, output: &Palette) -> Result<String> {
    Substitution::new(input, output)?.apply(text)
}
