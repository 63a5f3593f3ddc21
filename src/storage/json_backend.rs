//! File-backed key-value store keeping every key in a single JSON document.

use std::{
    collections::BTreeMap,
    env,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::errors::StoreResult;

use super::{KeyValueStore, StorageKey};

const STORE_FILE: &str = "store.json";
const DEFAULT_DIR_NAME: &str = ".jarify";
const TMP_SUFFIX: &str = "tmp";

/// Returns the application data directory, defaulting to `~/.jarify`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os("JARIFY_HOME") {
        return PathBuf::from(custom);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Durable backend persisting the key map to `store.json` under the app data
/// directory. Writes stage to a temporary file and rename into place.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: Option<PathBuf>) -> StoreResult<Self> {
        let base = root.unwrap_or_else(app_data_dir);
        fs::create_dir_all(&base)?;
        Ok(Self {
            path: base.join(STORE_FILE),
        })
    }

    pub fn new_default() -> StoreResult<Self> {
        Self::new(None)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> StoreResult<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let data = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&data)?)
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(map)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: StorageKey) -> StoreResult<Option<String>> {
        let map = self.read_map()?;
        Ok(map.get(key.as_str()).cloned())
    }

    fn set(&self, key: StorageKey, value: &str) -> StoreResult<()> {
        let mut map = self.read_map()?;
        map.insert(key.as_str().to_string(), value.to_string());
        self.write_map(&map)
    }

    fn remove(&self, key: StorageKey) -> StoreResult<()> {
        let mut map = self.read_map()?;
        if map.remove(key.as_str()).is_some() {
            self.write_map(&map)?;
        }
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> StoreResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_with_temp_dir() -> (JsonFileStore, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let store = JsonFileStore::new(Some(temp.path().to_path_buf())).expect("json store");
        (store, temp)
    }

    #[test]
    fn set_and_get_roundtrip() {
        let (store, _guard) = store_with_temp_dir();
        store.set(StorageKey::Categories, r#"[{"id":1}]"#).unwrap();
        let value = store.get(StorageKey::Categories).unwrap();
        assert_eq!(value.as_deref(), Some(r#"[{"id":1}]"#));
    }

    #[test]
    fn missing_key_reads_as_absent() {
        let (store, _guard) = store_with_temp_dir();
        assert_eq!(store.get(StorageKey::DarkMode).unwrap(), None);
    }

    #[test]
    fn values_survive_a_reopen() {
        let temp = TempDir::new().expect("temp dir");
        {
            let store = JsonFileStore::new(Some(temp.path().to_path_buf())).unwrap();
            store.set(StorageKey::DarkMode, "true").unwrap();
        }
        let store = JsonFileStore::new(Some(temp.path().to_path_buf())).unwrap();
        assert_eq!(store.get(StorageKey::DarkMode).unwrap().as_deref(), Some("true"));
    }

    #[test]
    fn remove_deletes_only_the_named_key() {
        let (store, _guard) = store_with_temp_dir();
        store.set(StorageKey::Jars, "[]").unwrap();
        store.set(StorageKey::Notes, "[]").unwrap();
        store.remove(StorageKey::Jars).unwrap();
        assert_eq!(store.get(StorageKey::Jars).unwrap(), None);
        assert_eq!(store.get(StorageKey::Notes).unwrap().as_deref(), Some("[]"));
    }
}
