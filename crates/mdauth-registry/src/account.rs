//! # Accounts
//!
//! An address resolves to at most one account. Three kinds exist:
//!
//! - [`BaseAccount`]: an ordinary account. Key-holding users have a public
//!   key and a non-zero sequence once they have signed anything; automated
//!   (smart contract) accounts have neither.
//! - [`AssetAccount`]: a permissioned account holding an asset. Its
//!   access-control list grants named permissions to specific addresses.
//! - [`ModuleAccount`]: a system-owned account.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use mdauth_core::{Address, CoreError};

/// A permission on an asset account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    /// Create new supply.
    Mint,
    /// Destroy supply.
    Burn,
    /// Move value into the asset account.
    Deposit,
    /// Move value out of the asset account.
    Withdraw,
    /// Delete the asset account.
    Delete,
    /// Administer the access-control list.
    Admin,
    /// Transfer value on behalf of holders.
    Transfer,
    /// Transfer value without holder consent.
    ForceTransfer,
}

impl Access {
    /// The upper-case permission name, e.g. `ACCESS_WITHDRAW`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mint => "ACCESS_MINT",
            Self::Burn => "ACCESS_BURN",
            Self::Deposit => "ACCESS_DEPOSIT",
            Self::Withdraw => "ACCESS_WITHDRAW",
            Self::Delete => "ACCESS_DELETE",
            Self::Admin => "ACCESS_ADMIN",
            Self::Transfer => "ACCESS_TRANSFER",
            Self::ForceTransfer => "ACCESS_FORCE_TRANSFER",
        }
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts `ACCESS_WITHDRAW`, `withdraw`, or any casing of either.
impl FromStr for Access {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        let name = upper.strip_prefix("ACCESS_").unwrap_or(upper.as_str());
        match name {
            "MINT" => Ok(Self::Mint),
            "BURN" => Ok(Self::Burn),
            "DEPOSIT" => Ok(Self::Deposit),
            "WITHDRAW" => Ok(Self::Withdraw),
            "DELETE" => Ok(Self::Delete),
            "ADMIN" => Ok(Self::Admin),
            "TRANSFER" => Ok(Self::Transfer),
            "FORCE_TRANSFER" => Ok(Self::ForceTransfer),
            _ => Err(CoreError::UnknownPermission(s.to_string())),
        }
    }
}

/// Permissions granted to one address on an asset account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessGrant {
    /// Address string of the permission holder.
    pub address: String,
    /// Permissions held.
    pub permissions: Vec<Access>,
}

impl AccessGrant {
    /// Grant `permissions` to `address`.
    pub fn new(address: impl Into<String>, permissions: impl IntoIterator<Item = Access>) -> Self {
        Self {
            address: address.into(),
            permissions: permissions.into_iter().collect(),
        }
    }

    /// Whether this grant includes `access`.
    pub fn has_access(&self, access: Access) -> bool {
        self.permissions.contains(&access)
    }
}

/// An ordinary account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseAccount {
    /// Account address.
    pub address: Address,
    /// Number of transactions the account has signed.
    #[serde(default)]
    pub sequence: u64,
    /// Hex-encoded public key, once known.
    #[serde(default)]
    pub pub_key: Option<String>,
}

impl BaseAccount {
    /// A key-holding account that has signed `sequence` transactions.
    pub fn with_key(address: Address, pub_key: impl Into<String>, sequence: u64) -> Self {
        Self {
            address,
            sequence,
            pub_key: Some(pub_key.into()),
        }
    }

    /// An account with no public key and a zero sequence.
    pub fn keyless(address: Address) -> Self {
        Self {
            address,
            sequence: 0,
            pub_key: None,
        }
    }
}

/// A permissioned asset account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetAccount {
    /// Account address.
    pub address: Address,
    /// Denomination of the asset held.
    pub denom: String,
    /// Access-control list.
    #[serde(default)]
    pub access_control: Vec<AccessGrant>,
}

impl AssetAccount {
    /// Whether `address` holds `access` on this asset.
    pub fn has_access(&self, address: &str, access: Access) -> bool {
        self.access_control
            .iter()
            .any(|grant| grant.address == address && grant.has_access(access))
    }
}

/// A system-owned module account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleAccount {
    /// Account address.
    pub address: Address,
    /// Owning module name.
    pub name: String,
}

/// Any account the registry can hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Account {
    /// Ordinary account.
    Base(BaseAccount),
    /// Permissioned asset account.
    Asset(AssetAccount),
    /// Module account.
    Module(ModuleAccount),
}

impl Account {
    /// The account's address.
    pub fn address(&self) -> &Address {
        match self {
            Self::Base(acc) => &acc.address,
            Self::Asset(acc) => &acc.address,
            Self::Module(acc) => &acc.address,
        }
    }

    /// The asset account, if this is one.
    pub fn as_asset(&self) -> Option<&AssetAccount> {
        match self {
            Self::Asset(asset) => Some(asset),
            _ => None,
        }
    }

    /// Whether this looks like a program-controlled account: a plain
    /// account with sequence 0 and no public key.
    pub fn is_keyless_base(&self) -> bool {
        matches!(self, Self::Base(acc) if acc.sequence == 0 && acc.pub_key.is_none())
    }
}

/// Resolves addresses to accounts.
pub trait AccountRegistry: Send + Sync {
    /// The account at `address`, or `None` if no account exists there.
    fn account(&self, address: &Address) -> Option<Account>;
}
