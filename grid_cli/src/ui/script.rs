use anyhow::Context;
use grid_core::{Address, ProviderEvent};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// A recorded provider session to replay against the store.
///
/// ```json
/// { "chainId": 4201,
///   "accounts": ["0x…"], "contextAccounts": ["0x…"],
///   "events": [{ "event": "chainChanged", "payload": 42 }],
///   "select": "0x…", "transfer": "50" }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionScript {
    pub chain_id: u64,
    pub accounts: Vec<Address>,
    pub context_accounts: Vec<Address>,
    pub events: Vec<ProviderEvent>,
    /// Target override applied after the events.
    pub select: Option<Address>,
    /// Amount to send once the events have been replayed.
    pub transfer: Option<String>,
    /// Run as if no provider were injected.
    pub no_provider: bool,
}

impl SessionScript {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text =
            fs::read_to_string(path).with_context(|| format!("reading script {:?}", path))?;
        serde_json::from_str(&text).with_context(|| format!("parsing script {:?}", path))
    }
}
