//! # mdauth-registry: Collaborators of the Authorization Engine
//!
//! The engine decides whether a request's signers are authorized, but the
//! facts it decides on live elsewhere:
//!
//! - **Accounts** (`account.rs`): resolving an address to an account, which
//!   is either a plain key-holding account, a permissioned asset account
//!   with an access-control list, or a module account.
//!
//! - **Delegation grants** (`grant.rs`): a granter lets a grantee sign on
//!   its behalf for one request type. Checking a grant yields an
//!   [`AcceptResponse`] describing the side effect (delete the grant, or
//!   replace it with an updated one). The caller performs the effect.
//!
//! - **In-memory registries** (`memory.rs`): `parking_lot`-guarded maps
//!   implementing both traits, used by tests and the CLI.
//!
//! All registry calls are synchronous. Nothing here ever holds a lock
//! across a call back into caller code.

pub mod account;
pub mod error;
pub mod grant;
pub mod memory;

pub use account::{
    Access, AccessGrant, Account, AccountRegistry, AssetAccount, BaseAccount, ModuleAccount,
};
pub use error::{GrantError, RegistryError};
pub use grant::{AcceptResponse, Authorization, DelegationRegistry, StoredGrant};
pub use memory::{MemoryAccounts, MemoryDelegations};
