use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::{RegistryError, StoreError};
use crate::model::{CreateOutcome, DeleteOutcome, Light};
use crate::store::LightStore;

pub const DEFAULT_CAPACITY: i64 = 8;
pub const MAX_NAME_LEN: usize = 64;

/// Turns a raw path segment into a light index the way a numeric cast would:
/// surrounding whitespace is ignored, an empty string is zero, `0x`/`0o`/`0b`
/// prefixes select hex, octal and binary, and integral floats such as `"2.0"`
/// are accepted. Anything else matches no light.
pub fn coerce_index(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(0);
    }
    if let Some(index) = parse_radix_prefixed(trimmed) {
        return index;
    }
    if let Ok(index) = trimmed.parse::<i64>() {
        return Some(index);
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64 => Some(v as i64),
        _ => None,
    }
}

/// `None` when `raw` carries no radix prefix. Prefixed literals take no sign.
fn parse_radix_prefixed(raw: &str) -> Option<Option<i64>> {
    let lower = raw.get(..2)?.to_ascii_lowercase();
    let radix = match lower.as_str() {
        "0x" => 16,
        "0o" => 8,
        "0b" => 2,
        _ => return None,
    };
    let digits = &raw[2..];
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Some(None);
    }
    Some(i64::from_str_radix(digits, radix).ok())
}

/// Capacity and indexing policy over a [`LightStore`].
///
/// Lights occupy indices `1..=count`. `create` appends at `count + 1` and
/// `delete` pops the light at `count`. Both read the count and then write, so
/// they are serialized through `write_lock`; reads and status updates go
/// straight to the store.
pub struct LightRegistry {
    store: Arc<dyn LightStore>,
    capacity: i64,
    write_lock: Mutex<()>,
}

impl LightRegistry {
    pub fn new(store: Arc<dyn LightStore>, capacity: i64) -> Self {
        Self {
            store,
            capacity,
            write_lock: Mutex::new(()),
        }
    }

    pub async fn count(&self) -> Result<i64, RegistryError> {
        Ok(self.store.count().await?)
    }

    /// Every light by index, or the single placeholder when none exist.
    pub async fn list(&self) -> Result<Vec<Light>, RegistryError> {
        let lights = self.store.find_all().await?;
        if lights.is_empty() {
            return Ok(vec![Light::placeholder()]);
        }
        Ok(lights)
    }

    pub async fn get(&self, id: &str) -> Result<Option<Light>, RegistryError> {
        let Some(index) = coerce_index(id) else {
            return Ok(None);
        };
        Ok(self.store.find_by_index(index).await?)
    }

    pub async fn create(&self, name: &str) -> Result<CreateOutcome, RegistryError> {
        let name = validate_name(name)?;

        let _guard = self.write_lock.lock().await;
        let count = self.store.count().await?;
        if count >= self.capacity {
            tracing::info!(count, capacity = self.capacity, "light capacity reached, rejecting create");
            return Ok(CreateOutcome::CapacityReached);
        }

        let index = count + 1;
        self.store.insert(&Light::new(index, name)).await?;

        // Read back so the caller sees what the store actually holds.
        let Some(created) = self.store.find_by_index(index).await? else {
            tracing::warn!(index, name, "inserted light not found on read back");
            return Err(StoreError::MissingAfterInsert(index).into());
        };
        tracing::info!(index, name, "light created");
        Ok(CreateOutcome::Created(created))
    }

    pub async fn update(&self, id: &str, status: bool) -> Result<Option<Light>, RegistryError> {
        let Some(index) = coerce_index(id) else {
            return Ok(None);
        };
        if self.store.set_status(index, status).await? == 0 {
            return Ok(None);
        }
        Ok(self.store.find_by_index(index).await?)
    }

    /// Removes the highest-indexed light. There is no way to target a
    /// specific light; see DESIGN.md.
    pub async fn delete(&self) -> Result<DeleteOutcome, RegistryError> {
        let _guard = self.write_lock.lock().await;
        let count = self.store.count().await?;
        if count == 0 {
            return Ok(DeleteOutcome::Empty);
        }

        let Some(last) = self.store.find_by_index(count).await? else {
            tracing::warn!(count, "no light sits at the last index, index space has a gap");
            return Ok(DeleteOutcome::Empty);
        };
        if self.store.delete_by_index(count).await? == 0 {
            return Ok(DeleteOutcome::Empty);
        }
        tracing::info!(index = count, name = %last.name, "light deleted");
        Ok(DeleteOutcome::Deleted(last))
    }
}

fn validate_name(name: &str) -> Result<&str, RegistryError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(RegistryError::Validation("name is required".to_owned()));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(RegistryError::Validation(format!(
            "name must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::db::Database;
    use crate::store::{LibsqlStore, MemoryStore};

    fn registry() -> LightRegistry {
        LightRegistry::new(Arc::new(MemoryStore::new()), DEFAULT_CAPACITY)
    }

    async fn libsql_registry() -> LightRegistry {
        let store = LibsqlStore::new(Database::in_memory().await.unwrap());
        LightRegistry::new(Arc::new(store), DEFAULT_CAPACITY)
    }

    async fn indices(reg: &LightRegistry) -> Vec<i64> {
        reg.list().await.unwrap().iter().map(|l| l.index).collect()
    }

    fn created(outcome: CreateOutcome) -> Light {
        match outcome {
            CreateOutcome::Created(light) => light,
            CreateOutcome::CapacityReached => panic!("expected a light to be created"),
        }
    }

    #[test]
    fn coerce_index_follows_numeric_cast_rules() {
        assert_eq!(coerce_index("3"), Some(3));
        assert_eq!(coerce_index(" 3 "), Some(3));
        assert_eq!(coerce_index("2.0"), Some(2));
        assert_eq!(coerce_index(""), Some(0));
        assert_eq!(coerce_index("-1"), Some(-1));
        assert_eq!(coerce_index("2.5"), None);
        assert_eq!(coerce_index("abc"), None);
        assert_eq!(coerce_index("NaN"), None);
        assert_eq!(coerce_index("inf"), None);
        assert_eq!(coerce_index("0x2"), Some(2));
        assert_eq!(coerce_index("0X1f"), Some(31));
        assert_eq!(coerce_index("0b1"), Some(1));
        assert_eq!(coerce_index("0o7"), Some(7));
        assert_eq!(coerce_index("0x"), None);
        assert_eq!(coerce_index("0b2"), None);
        assert_eq!(coerce_index("-0x2"), None);
    }

    #[tokio::test]
    async fn create_appends_at_count_plus_one() {
        let reg = registry();
        for expected in 1..=3 {
            let before = reg.count().await.unwrap();
            let light = created(reg.create("lamp").await.unwrap());
            assert_eq!(light.index, before + 1);
            assert_eq!(light.index, expected);
            assert!(!light.status);
            assert_eq!(reg.count().await.unwrap(), before + 1);
        }
    }

    #[tokio::test]
    async fn ninth_create_is_rejected_and_changes_nothing() {
        let reg = registry();
        for i in 0..8 {
            created(reg.create(&format!("light {i}")).await.unwrap());
        }

        assert_eq!(reg.create("one too many").await.unwrap(), CreateOutcome::CapacityReached);
        assert_eq!(reg.count().await.unwrap(), 8);
        assert!(reg.list().await.unwrap().iter().all(|l| l.name != "one too many"));
    }

    #[tokio::test]
    async fn capacity_is_configurable() {
        let reg = LightRegistry::new(Arc::new(MemoryStore::new()), 1);
        created(reg.create("only").await.unwrap());
        assert_eq!(reg.create("second").await.unwrap(), CreateOutcome::CapacityReached);
    }

    #[tokio::test]
    async fn blank_or_long_names_are_rejected() {
        let reg = registry();
        assert!(reg.create("   ").await.unwrap_err().is_validation());
        assert!(reg.create(&"x".repeat(MAX_NAME_LEN + 1)).await.unwrap_err().is_validation());
        assert_eq!(reg.count().await.unwrap(), 0);

        let light = created(reg.create("  trimmed  ").await.unwrap());
        assert_eq!(light.name, "trimmed");
    }

    #[tokio::test]
    async fn get_unknown_or_non_numeric_id_is_not_found() {
        let reg = registry();
        created(reg.create("a").await.unwrap());

        assert_eq!(reg.get("2").await.unwrap(), None);
        assert_eq!(reg.get("0").await.unwrap(), None);
        assert_eq!(reg.get("abc").await.unwrap(), None);
    }

    #[tokio::test]
    async fn update_only_touches_status() {
        let reg = registry();
        created(reg.create("a").await.unwrap());
        created(reg.create("b").await.unwrap());

        let updated = reg.update("2", true).await.unwrap().unwrap();
        assert_eq!(updated, Light { index: 2, name: "b".into(), status: true });
        assert_eq!(reg.get("1").await.unwrap(), Some(Light::new(1, "a")));

        assert_eq!(reg.update("7", true).await.unwrap(), None);
        assert_eq!(reg.update("x", true).await.unwrap(), None);
    }

    #[tokio::test]
    async fn delete_pops_the_last_light() {
        let reg = registry();
        created(reg.create("a").await.unwrap());
        created(reg.create("b").await.unwrap());
        created(reg.create("c").await.unwrap());

        assert_eq!(reg.delete().await.unwrap(), DeleteOutcome::Deleted(Light::new(3, "c")));
        assert_eq!(reg.count().await.unwrap(), 2);
        assert_eq!(reg.get("3").await.unwrap(), None);

        // The freed slot is reused by the next create.
        assert_eq!(created(reg.create("d").await.unwrap()).index, 3);
    }

    #[tokio::test]
    async fn delete_on_empty_is_a_defined_outcome() {
        let reg = registry();
        assert_eq!(reg.delete().await.unwrap(), DeleteOutcome::Empty);
        assert_eq!(reg.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn list_on_empty_returns_placeholder() {
        let reg = registry();
        assert_eq!(
            reg.list().await.unwrap(),
            vec![Light { index: 0, name: "No lights found".into(), status: false }]
        );
    }

    async fn create_list_update_delete_scenario(reg: &LightRegistry) {
        created(reg.create("A").await.unwrap());
        created(reg.create("B").await.unwrap());
        assert_eq!(reg.list().await.unwrap(), vec![Light::new(1, "A"), Light::new(2, "B")]);

        reg.update("1", true).await.unwrap();
        assert_eq!(
            reg.get("1").await.unwrap(),
            Some(Light { index: 1, name: "A".into(), status: true })
        );

        assert_eq!(reg.delete().await.unwrap(), DeleteOutcome::Deleted(Light::new(2, "B")));
        assert_eq!(reg.count().await.unwrap(), 1);
        assert!(reg.get("1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn scenario_on_memory_store() {
        create_list_update_delete_scenario(&registry()).await;
    }

    #[tokio::test]
    async fn scenario_on_libsql_store() {
        create_list_update_delete_scenario(&libsql_registry().await).await;
    }

    #[tokio::test]
    async fn capacity_and_empty_states_on_libsql_store() {
        let reg = libsql_registry().await;
        assert_eq!(reg.list().await.unwrap(), vec![Light::placeholder()]);
        assert_eq!(reg.delete().await.unwrap(), DeleteOutcome::Empty);

        for i in 0..8 {
            created(reg.create(&format!("l{i}")).await.unwrap());
        }
        assert_eq!(reg.create("ninth").await.unwrap(), CreateOutcome::CapacityReached);
        assert_eq!(reg.count().await.unwrap(), 8);
        assert_eq!(reg.update("9", true).await.unwrap(), None);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_creates_keep_indices_unique_and_bounded() {
        let reg = Arc::new(registry());
        let mut tasks = Vec::new();
        for i in 0..20 {
            let reg = reg.clone();
            tasks.push(tokio::spawn(async move { reg.create(&format!("l{i}")).await }));
        }

        let mut accepted = 0;
        for task in tasks {
            if let CreateOutcome::Created(_) = task.await.unwrap().unwrap() {
                accepted += 1;
            }
        }

        assert_eq!(accepted, 8);
        assert_eq!(indices(&reg).await, (1..=8).collect::<Vec<_>>());
    }

    async fn concurrent_creates_then_deletes(reg: Arc<LightRegistry>) {
        let mut creates = Vec::new();
        for i in 0..20 {
            let reg = reg.clone();
            creates.push(tokio::spawn(async move { reg.create(&format!("l{i}")).await }));
        }
        for task in creates {
            task.await.unwrap().unwrap();
        }
        assert_eq!(reg.count().await.unwrap(), 8);

        let mut deletes = Vec::new();
        for _ in 0..5 {
            let reg = reg.clone();
            deletes.push(tokio::spawn(async move { reg.delete().await }));
        }
        let mut popped = Vec::new();
        for task in deletes {
            match task.await.unwrap().unwrap() {
                DeleteOutcome::Deleted(light) => popped.push(light.index),
                DeleteOutcome::Empty => panic!("registry still held lights"),
            }
        }
        popped.sort();

        assert_eq!(popped, vec![4, 5, 6, 7, 8]);
        assert_eq!(reg.count().await.unwrap(), 3);
        assert_eq!(indices(&reg).await, vec![1, 2, 3]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_deletes_each_pop_one_light() {
        concurrent_creates_then_deletes(Arc::new(registry())).await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_writes_on_libsql_store() {
        concurrent_creates_then_deletes(Arc::new(libsql_registry().await)).await;
    }

    /// Accepts writes but never finds anything.
    struct ForgetfulStore(MemoryStore);

    #[async_trait]
    impl LightStore for ForgetfulStore {
        async fn count(&self) -> Result<i64, StoreError> {
            self.0.count().await
        }
        async fn find_all(&self) -> Result<Vec<Light>, StoreError> {
            self.0.find_all().await
        }
        async fn find_by_index(&self, _: i64) -> Result<Option<Light>, StoreError> {
            Ok(None)
        }
        async fn insert(&self, light: &Light) -> Result<(), StoreError> {
            self.0.insert(light).await
        }
        async fn set_status(&self, index: i64, status: bool) -> Result<u64, StoreError> {
            self.0.set_status(index, status).await
        }
        async fn delete_by_index(&self, index: i64) -> Result<u64, StoreError> {
            self.0.delete_by_index(index).await
        }
    }

    #[tokio::test]
    async fn create_reports_a_light_missing_after_insert() {
        let reg = LightRegistry::new(Arc::new(ForgetfulStore(MemoryStore::new())), DEFAULT_CAPACITY);

        let err = reg.create("ghost").await.unwrap_err();
        assert!(matches!(err, RegistryError::Store(StoreError::MissingAfterInsert(1))));
    }
}
