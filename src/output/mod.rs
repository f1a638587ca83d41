//! Secret export
//!
//! Stored secrets are grouped by hostname and written as one CSV file per
//! hostname under the output directory. An existing file is never
//! overwritten; a numeric suffix picks the next free name instead.

use crate::store::SecretStore;
use crate::Result;
use std::path::{Path, PathBuf};

/// Exports all recorded secrets as CSV files
///
/// Each hostname with secrets gets its own `<hostname>.csv` with a
/// `secret_key,value` header row. Nothing is written when the store is
/// empty; the output directory is created on demand otherwise.
///
/// # Arguments
///
/// * `store` - The secret store to export
/// * `dir` - Output directory for the CSV files
///
/// # Returns
///
/// * `Ok(Vec<PathBuf>)` - Paths of the files that were written
/// * `Err(SpinneretError)` - Directory creation or a write failed
pub fn export_secrets(store: &SecretStore, dir: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    if store.is_empty() {
        return Ok(written);
    }

    std::fs::create_dir_all(dir)?;

    for hostname in store.hostnames() {
        let secrets = store.secrets_for_hostname(&hostname);
        let path = unique_export_path(dir, &hostname);

        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(["secret_key", "value"])?;
        for secret in &secrets {
            writer.write_record([&secret.key, &secret.value])?;
        }
        writer.flush()?;

        written.push(path);
    }

    Ok(written)
}

/// Picks the first free export path for a hostname
///
/// `<hostname>.csv` when available, otherwise `<hostname>_1.csv`,
/// `<hostname>_2.csv`, and so on.
fn unique_export_path(dir: &Path, hostname: &str) -> PathBuf {
    let mut path = dir.join(format!("{}.csv", hostname));
    let mut suffix = 1;
    while path.exists() {
        path = dir.join(format!("{}_{}.csv", hostname, suffix));
        suffix += 1;
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Secret;

    fn store_with(secrets: &[(&str, &str, &str)]) -> SecretStore {
        let store = SecretStore::new();
        for (hostname, key, value) in secrets {
            store.insert(Secret::new(hostname, key, value));
        }
        store
    }

    #[test]
    fn test_export_writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_with(&[
            ("x.com", "email", "someone@example.com"),
            ("x.com", "jwt", "eyJhbGci.eyJzdWIi.sig"),
        ]);

        let written = export_secrets(&store, dir.path()).unwrap();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0], dir.path().join("x.com.csv"));

        let content = std::fs::read_to_string(&written[0]).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "secret_key,value");
        assert_eq!(lines[1], "email,someone@example.com");
        assert_eq!(lines[2], "jwt,eyJhbGci.eyJzdWIi.sig");
    }

    #[test]
    fn test_export_groups_by_hostname() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_with(&[
            ("a.com", "email", "one@example.com"),
            ("b.com", "email", "two@example.com"),
        ]);

        let written = export_secrets(&store, dir.path()).unwrap();
        assert_eq!(written.len(), 2);
        assert!(dir.path().join("a.com.csv").exists());
        assert!(dir.path().join("b.com.csv").exists());
    }

    #[test]
    fn test_existing_file_is_never_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let existing = dir.path().join("x.com.csv");
        std::fs::write(&existing, "sentinel").unwrap();

        let store = store_with(&[("x.com", "email", "someone@example.com")]);
        let written = export_secrets(&store, dir.path()).unwrap();

        assert_eq!(written[0], dir.path().join("x.com_1.csv"));
        assert_eq!(std::fs::read_to_string(&existing).unwrap(), "sentinel");
        assert!(std::fs::read_to_string(&written[0])
            .unwrap()
            .contains("someone@example.com"));
    }

    #[test]
    fn test_suffix_keeps_counting() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("x.com.csv"), "a").unwrap();
        std::fs::write(dir.path().join("x.com_1.csv"), "b").unwrap();

        let path = unique_export_path(dir.path(), "x.com");
        assert_eq!(path, dir.path().join("x.com_2.csv"));
    }

    #[test]
    fn test_empty_store_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out");
        let written = export_secrets(&SecretStore::new(), &target).unwrap();
        assert!(written.is_empty());
        // The directory is only created when there is something to write
        assert!(!target.exists());
    }
}
