//! Edits of the vault YAML document.
//!
//! Only the `vault_domain_names` mapping is managed; every other top-level
//! key is carried through a rewrite unchanged.

use std::fs;
use std::path::Path;

use serde_yaml::{Mapping, Value};

use crate::{Error, Result};

const ADDRESSES_KEY: &str = "vault_domain_names";

/// Set `name`'s address under the managed mapping, normalizing a missing
/// or null mapping to an empty one first.
pub fn set_address(path: &Path, name: &str, address: &str) -> Result<()> {
    let mut doc = load(path)?;

    let mut addresses = match doc.get(ADDRESSES_KEY) {
        None | Some(Value::Null) => Mapping::new(),
        Some(Value::Mapping(m)) => m.clone(),
        Some(_) => {
            return Err(Error::VaultKeyNotMapping {
                key: ADDRESSES_KEY,
            });
        }
    };
    addresses.insert(Value::from(name), Value::from(address));
    doc.insert(Value::from(ADDRESSES_KEY), Value::Mapping(addresses));

    save(path, &doc)
}

/// Remove `name` from the managed mapping. An absent document, mapping,
/// or key is a no-op and the file is left unwritten.
pub fn remove_address(path: &Path, name: &str) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }

    let mut doc = load(path)?;
    let Some(Value::Mapping(addresses)) = doc.get_mut(ADDRESSES_KEY) else {
        return Ok(());
    };
    if addresses.remove(name).is_none() {
        return Ok(());
    }

    save(path, &doc)
}

/// Current address for `name`, if recorded.
pub fn get_address(path: &Path, name: &str) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }

    let doc = load(path)?;
    let address = doc
        .get(ADDRESSES_KEY)
        .and_then(Value::as_mapping)
        .and_then(|addresses| addresses.get(name))
        .and_then(Value::as_str)
        .map(str::to_string);
    Ok(address)
}

fn load(path: &Path) -> Result<Mapping> {
    if !path.exists() {
        return Ok(Mapping::new());
    }

    let text = fs::read_to_string(path)?;
    match serde_yaml::from_str::<Value>(&text)? {
        Value::Null => Ok(Mapping::new()),
        Value::Mapping(doc) => Ok(doc),
        _ => Err(Error::VaultNotMapping),
    }
}

fn save(path: &Path, doc: &Mapping) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_yaml::to_string(doc)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn vault_path(dir: &tempfile::TempDir) -> std::path::PathBuf {
        dir.path().join("group_vars/ar_io_nodes/vault.yml")
    }

    #[test]
    fn set_then_get_round_trips() {
        let dir = tempdir().unwrap();
        let path = vault_path(&dir);

        set_address(&path, "node1", "1.2.3.4").unwrap();

        assert_eq!(
            get_address(&path, "node1").unwrap(),
            Some("1.2.3.4".to_string())
        );
    }

    #[test]
    fn remove_deletes_only_the_named_entry() {
        let dir = tempdir().unwrap();
        let path = vault_path(&dir);

        set_address(&path, "node1", "1.2.3.4").unwrap();
        set_address(&path, "node2", "5.6.7.8").unwrap();
        remove_address(&path, "node1").unwrap();

        assert_eq!(get_address(&path, "node1").unwrap(), None);
        assert_eq!(
            get_address(&path, "node2").unwrap(),
            Some("5.6.7.8".to_string())
        );
    }

    #[test]
    fn unrelated_keys_survive_a_rewrite() {
        let dir = tempdir().unwrap();
        let path = vault_path(&dir);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "vault_admin_password: hunter2\n").unwrap();

        set_address(&path, "node1", "1.2.3.4").unwrap();
        remove_address(&path, "node1").unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("vault_admin_password: hunter2"));
    }

    #[test]
    fn null_mapping_is_normalized_before_insert() {
        let dir = tempdir().unwrap();
        let path = vault_path(&dir);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "vault_domain_names:\n").unwrap();

        set_address(&path, "node1", "1.2.3.4").unwrap();

        assert_eq!(
            get_address(&path, "node1").unwrap(),
            Some("1.2.3.4".to_string())
        );
    }

    #[test]
    fn non_mapping_key_is_an_error() {
        let dir = tempdir().unwrap();
        let path = vault_path(&dir);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "vault_domain_names: [not, a, mapping]\n").unwrap();

        let err = set_address(&path, "node1", "1.2.3.4").unwrap_err();
        assert!(matches!(err, Error::VaultKeyNotMapping { .. }));
    }

    #[test]
    fn remove_on_missing_file_or_key_is_a_noop() {
        let dir = tempdir().unwrap();
        let path = vault_path(&dir);

        remove_address(&path, "node1").unwrap();
        assert!(!path.exists());

        set_address(&path, "node1", "1.2.3.4").unwrap();
        remove_address(&path, "other").unwrap();
        assert_eq!(
            get_address(&path, "node1").unwrap(),
            Some("1.2.3.4".to_string())
        );
    }
}
