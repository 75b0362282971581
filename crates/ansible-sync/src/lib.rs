//! Keeps the Ansible inventory and vault files in sync with cloud-side
//! VM state.
//!
//! Both documents are read, edited in memory, and written back whole.
//! There is no locking: concurrent invocations racing on the same files
//! can lose updates.

pub mod inventory;
pub mod vault;

use std::path::{Path, PathBuf};

use tracing::{info, warn};

/// Inventory group this tool owns. Entries for other groups are never touched.
pub const NODE_GROUP: &str = "ar_io_nodes";

pub const INVENTORY_PATH: &str = "inventory/production/hosts";
pub const VAULT_PATH: &str = "group_vars/ar_io_nodes/vault.yml";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("vault document is not a mapping")]
    VaultNotMapping,

    #[error("vault key {key} is not a mapping")]
    VaultKeyNotMapping { key: &'static str },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Paths of the two managed documents.
///
/// `add`/`remove` degrade every failure to a `warn!` log: the cloud-side
/// operation has already succeeded by the time they run, so local drift is
/// reported for operator reconciliation rather than escalated.
#[derive(Debug, Clone)]
pub struct AnsibleState {
    inventory: PathBuf,
    vault: PathBuf,
}

impl AnsibleState {
    /// Documents at their fixed paths relative to the working directory.
    pub fn new() -> Self {
        Self {
            inventory: PathBuf::from(INVENTORY_PATH),
            vault: PathBuf::from(VAULT_PATH),
        }
    }

    /// Documents rooted at `root` instead of the working directory.
    pub fn in_dir(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            inventory: root.join(INVENTORY_PATH),
            vault: root.join(VAULT_PATH),
        }
    }

    /// Record a newly active VM in both documents.
    ///
    /// The vault is only updated after a successful inventory write.
    pub fn add(&self, name: &str, address: &str) {
        match inventory::add_host(&self.inventory, name, address) {
            Ok(()) => {
                info!(host = name, "added to inventory");
                match vault::set_address(&self.vault, name, address) {
                    Ok(()) => info!(host = name, "added to vault"),
                    Err(e) => warn!(host = name, error = %e, "failed to update vault"),
                }
            }
            Err(e) => warn!(host = name, error = %e, "failed to update inventory"),
        }
    }

    /// Drop a deleted VM from both documents. Each removal is independent
    /// and a no-op when its document is absent.
    pub fn remove(&self, name: &str) {
        match inventory::remove_host(&self.inventory, name) {
            Ok(()) => info!(host = name, "removed from inventory"),
            Err(e) => warn!(host = name, error = %e, "failed to update inventory"),
        }
        match vault::remove_address(&self.vault, name) {
            Ok(()) => info!(host = name, "removed from vault"),
            Err(e) => warn!(host = name, error = %e, "failed to update vault"),
        }
    }
}

impl Default for AnsibleState {
    fn default() -> Self {
        Self::new()
    }
}
