use crate::domain::model::{CountryCode, CountryRecord, RateData, UpsertOutcome};
use crate::domain::ports::RateRepository;
use crate::utils::error::{Result, VatError};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| VatError::store("rate store lock poisoned"))
}

fn apply(
    records: &mut BTreeMap<CountryCode, CountryRecord>,
    code: &CountryCode,
    data: RateData,
) -> UpsertOutcome {
    let outcome = if records.contains_key(code) {
        UpsertOutcome::Updated
    } else {
        UpsertOutcome::Created
    };
    records.insert(code.clone(), CountryRecord::new(code.clone(), data));
    outcome
}

/// Process-local store, shared between clones.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    records: Arc<Mutex<BTreeMap<CountryCode, CountryRecord>>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RateRepository for InMemoryRepository {
    fn get(&self, code: &CountryCode) -> Result<Option<CountryRecord>> {
        Ok(lock(&self.records)?.get(code).cloned())
    }

    fn upsert(&self, code: &CountryCode, data: RateData) -> Result<UpsertOutcome> {
        let mut stored = lock(&self.records)?;
        Ok(apply(&mut stored, code, data))
    }

    fn upsert_batch(&self, records: Vec<(CountryCode, RateData)>) -> Result<Vec<UpsertOutcome>> {
        let mut stored = lock(&self.records)?;
        Ok(records
            .into_iter()
            .map(|(code, data)| apply(&mut stored, &code, data))
            .collect())
    }

    fn count(&self) -> Result<usize> {
        Ok(lock(&self.records)?.len())
    }

    fn country_codes(&self) -> Result<Vec<CountryCode>> {
        Ok(lock(&self.records)?.keys().cloned().collect())
    }
}

/// Store backed by a single JSON document mapping country codes to records.
///
/// Every write replaces the document through a temporary sibling file and a rename, so a
/// batch is either fully visible or not at all.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<CountryCode, CountryRecord>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        let stored: BTreeMap<String, CountryRecord> = serde_json::from_str(&content)?;
        stored
            .into_iter()
            .map(|(key, record)| match CountryCode::parse(&key) {
                Some(code) => Ok((code, record)),
                None => Err(VatError::store(format!(
                    "invalid country code {:?} in {}",
                    key,
                    self.path.display()
                ))),
            })
            .collect()
    }

    fn save(&self, records: &BTreeMap<CountryCode, CountryRecord>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let document: BTreeMap<&str, &CountryRecord> =
            records.iter().map(|(code, r)| (code.as_str(), r)).collect();
        let json = serde_json::to_vec_pretty(&document)?;

        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &self.path)?;
        tracing::debug!("Wrote {} records to {}", records.len(), self.path.display());
        Ok(())
    }
}

impl RateRepository for JsonFileRepository {
    fn get(&self, code: &CountryCode) -> Result<Option<CountryRecord>> {
        Ok(self.load()?.remove(code))
    }

    fn upsert(&self, code: &CountryCode, data: RateData) -> Result<UpsertOutcome> {
        let _guard = lock(&self.write_lock)?;
        let mut records = self.load()?;
        let outcome = apply(&mut records, code, data);
        self.save(&records)?;
        Ok(outcome)
    }

    fn upsert_batch(&self, batch: Vec<(CountryCode, RateData)>) -> Result<Vec<UpsertOutcome>> {
        let _guard = lock(&self.write_lock)?;
        let mut records = self.load()?;
        let outcomes = batch
            .into_iter()
            .map(|(code, data)| apply(&mut records, &code, data))
            .collect();
        self.save(&records)?;
        Ok(outcomes)
    }

    fn count(&self) -> Result<usize> {
        Ok(self.load()?.len())
    }

    fn country_codes(&self) -> Result<Vec<CountryCode>> {
        Ok(self.load()?.into_keys().collect())
    }
}
