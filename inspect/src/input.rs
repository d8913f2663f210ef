//! JSON input files: validator tables and message lists.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use num_bigint::BigUint;
use serde::Deserialize;

use ibft_protocol::{Address, IbftMessage, VotingPowers};

/// Voting power as written in a table file. Strings carry values of any
/// size; plain JSON numbers are accepted for small tables written by hand.
#[derive(Deserialize)]
#[serde(untagged)]
enum PowerValue {
    Text(String),
    Number(u64),
}

/// Loads a validator table: `{"0x<address>": "<decimal power>", ...}`.
pub fn load_voting_powers(path: &Path) -> Result<VotingPowers> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read validator table {}", path.display()))?;
    let entries: HashMap<String, PowerValue> = serde_json::from_str(&raw)
        .with_context(|| format!("malformed validator table {}", path.display()))?;

    let mut powers = VotingPowers::with_capacity(entries.len());
    for (key, value) in entries {
        let address = Address::from_str(&key)
            .with_context(|| format!("invalid validator address {key:?}"))?;
        let power = match value {
            PowerValue::Number(n) => BigUint::from(n),
            PowerValue::Text(text) => BigUint::from_str(text.trim())
                .with_context(|| format!("invalid voting power {text:?} for {address}"))?,
        };
        // Two spellings of the same address, e.g. differing hex case.
        if powers.insert(address, power).is_some() {
            bail!("validator {address} listed twice in {}", path.display());
        }
    }

    tracing::debug!(path = %path.display(), validators = powers.len(), "validator table loaded");
    Ok(powers)
}

/// Loads a JSON array of messages.
pub fn load_messages(path: &Path) -> Result<Vec<IbftMessage>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read message file {}", path.display()))?;
    let messages: Vec<IbftMessage> = serde_json::from_str(&raw)
        .with_context(|| format!("malformed message file {}", path.display()))?;

    tracing::debug!(path = %path.display(), messages = messages.len(), "messages loaded");
    Ok(messages)
}
