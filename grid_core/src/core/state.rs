use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;
use std::sync::Arc;

const ADDRESS_LEN: usize = 20;

/// A 20-byte account address.
///
/// Parsed from hex with an optional `0x` prefix (any case) and always shown
/// as lowercase `0x…`, so two spellings of the same account compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address([u8; ADDRESS_LEN]);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressParseError(String);

impl Display for AddressParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid address '{}'", self.0)
    }
}

impl std::error::Error for AddressParseError {}

impl Address {
    pub const fn from_bytes(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// `0x1234…5678`, used wherever the UI has no profile name to show.
    pub fn short(&self) -> String {
        let full = self.to_string();
        format!("{}…{}", &full[..6], &full[full.len() - 4..])
    }
}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        let mut bytes = [0u8; ADDRESS_LEN];
        hex::decode_to_slice(digits, &mut bytes).map_err(|_| AddressParseError(s.to_string()))?;
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for Address {
    type Error = AddressParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Address> for String {
    fn from(address: Address) -> String {
        address.to_string()
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// Immutable, shared snapshot of an account list.
///
/// Account lists are only ever replaced, never edited, so `Arc::ptr_eq`
/// tells a consumer whether the list it rendered last is still current.
pub type Accounts = Arc<[Address]>;

/// The derived view of the wallet connection.
///
/// Only [`ConnectionStore`](crate::core::connection_store::ConnectionStore)
/// writes this; everyone else gets clones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionState {
    /// Active network; `0` while unknown.
    pub chain_id: u64,
    /// Addresses controlled by the local wallet, in provider order.
    pub accounts: Accounts,
    /// Addresses of the host page's context identity.
    pub context_accounts: Accounts,
    /// `true` iff both account lists are non-empty.
    pub connected: bool,
    pub selected_address: Option<Address>,
    pub searching: bool,
}

impl Default for ConnectionState {
    fn default() -> Self {
        Self {
            chain_id: 0,
            accounts: Arc::from(Vec::new()),
            context_accounts: Arc::from(Vec::new()),
            connected: false,
            selected_address: None,
            searching: false,
        }
    }
}

impl ConnectionState {
    /// Replace the local accounts and re-derive `connected` from the lists as
    /// they are now.
    pub(crate) fn replace_accounts(&mut self, accounts: Vec<Address>) {
        self.accounts = Arc::from(accounts);
        self.connected = self.derive_connected();
    }

    /// Replace the counterpart accounts and re-derive `connected`.
    pub(crate) fn replace_context_accounts(&mut self, accounts: Vec<Address>) {
        self.context_accounts = Arc::from(accounts);
        self.connected = self.derive_connected();
    }

    fn derive_connected(&self) -> bool {
        !self.accounts.is_empty() && !self.context_accounts.is_empty()
    }

    /// The address a transfer or profile lookup should target: the selected
    /// override, else the first counterpart account.
    pub fn target_address(&self) -> Option<Address> {
        self.selected_address
            .or_else(|| self.context_accounts.first().copied())
    }

    /// The local account transfers are sent from.
    pub fn sender(&self) -> Option<Address> {
        self.accounts.first().copied()
    }
}
