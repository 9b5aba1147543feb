//! `SQLite` store for collections and word entries.
//!
//! One database file holds both tables, so a single [`SqliteStore`] serves as
//! both the [`WordStore`] and the [`CollectionStore`] of the pipeline.

use super::connection::{acquire_lock, configure_connection, open_connection};
use super::entry_row::{
    COLLECTION_COLUMNS, CollectionRow, ENTRY_COLUMNS, EntryRow, encode_list, encode_timestamp,
};
use super::metrics::{record_operation_metrics, status_label};
use super::sql::contains_pattern;
use crate::models::{Collection, CollectionId, Entry, EntryId, OwnerId, canonical_text};
use crate::storage::traits::{CollectionStore, EntrySort, SearchField, WordStore};
use crate::{Error, Result};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;
use tracing::instrument;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS collections (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    owner_id TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    word_count INTEGER NOT NULL DEFAULT 0,
    UNIQUE (owner_id, name)
);
CREATE TABLE IF NOT EXISTS words (
    id TEXT PRIMARY KEY,
    collection_id TEXT NOT NULL REFERENCES collections(id) ON DELETE CASCADE,
    owner_id TEXT NOT NULL,
    word TEXT NOT NULL,
    definition TEXT NOT NULL,
    pronunciation TEXT NOT NULL DEFAULT '',
    examples TEXT NOT NULL DEFAULT '[]',
    categories TEXT NOT NULL DEFAULT '[]',
    notes TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    UNIQUE (collection_id, word)
);
CREATE INDEX IF NOT EXISTS idx_words_collection_created ON words(collection_id, created_at);
";

/// SQLite-backed collection and word store.
///
/// # Concurrency Model
///
/// Uses a `Mutex<Connection>` because `rusqlite::Connection` is not `Sync`.
/// WAL mode and `busy_timeout` handle contention with other processes.
///
/// # Uniqueness
///
/// `UNIQUE (collection_id, word)` is the backstop for the duplicate check:
/// when two imports race past [`WordStore::exists`], the second insert is
/// ignored and reported as `Ok(false)`.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens (or creates) a store at `db_path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref();
        let store = Self {
            conn: Mutex::new(open_connection(db_path)?),
        };
        store.initialize()?;
        tracing::debug!(path = %db_path.display(), "opened sqlite store");
        Ok(store)
    }

    /// Creates an in-memory store (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be created.
    pub fn in_memory() -> Result<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| Error::operation("open_sqlite_memory", e))?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize()?;
        Ok(store)
    }

    fn initialize(&self) -> Result<()> {
        let conn = acquire_lock(&self.conn);
        configure_connection(&conn)?;
        conn.execute_batch(SCHEMA)
            .map_err(|e| Error::operation("create_schema", e))
    }

    /// Runs `f` under the connection lock and records its metrics.
    fn run<T>(&self, operation: &'static str, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let start = Instant::now();
        let result = {
            let conn = acquire_lock(&self.conn);
            f(&conn)
        };
        record_operation_metrics(operation, start, status_label(&result));
        result
    }

    fn query_entries(
        conn: &Connection,
        operation: &'static str,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<Entry>> {
        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| Error::operation(operation, e))?;
        let rows = stmt
            .query_map(params, EntryRow::from_row)
            .map_err(|e| Error::operation(operation, e))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| Error::operation(operation, e))?;
        rows.into_iter().map(EntryRow::into_entry).collect()
    }

    fn query_collection(
        conn: &Connection,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Option<Collection>> {
        conn.query_row(sql, params, CollectionRow::from_row)
            .optional()
            .map_err(|e| Error::operation("get_collection", e))?
            .map(CollectionRow::into_collection)
            .transpose()
    }
}

impl WordStore for SqliteStore {
    #[instrument(skip(self), fields(backend = "sqlite", collection.id = %collection_id))]
    fn find_by_collection(
        &self,
        collection_id: &CollectionId,
        sort: EntrySort,
    ) -> Result<Vec<Entry>> {
        let order = match sort {
            EntrySort::CanonicalTextAsc => "word ASC",
            EntrySort::CreatedAtAsc => "created_at ASC, word ASC",
        };
        let sql = format!(
            "SELECT {ENTRY_COLUMNS} FROM words WHERE collection_id = ?1 ORDER BY {order}"
        );
        self.run("find_by_collection", |conn| {
            Self::query_entries(conn, "find_by_collection", &sql, params![collection_id.as_str()])
        })
    }

    #[instrument(skip(self), fields(backend = "sqlite", collection.id = %collection_id))]
    fn exists(
        &self,
        word: &str,
        collection_id: &CollectionId,
        exclude_id: Option<&EntryId>,
    ) -> Result<bool> {
        let word = canonical_text(word);
        self.run("word_exists", |conn| {
            conn.query_row(
                "SELECT EXISTS(
                    SELECT 1 FROM words
                    WHERE collection_id = ?1 AND word = ?2 AND (?3 IS NULL OR id != ?3)
                 )",
                params![collection_id.as_str(), word, exclude_id.map(EntryId::as_str)],
                |row| row.get::<_, bool>(0),
            )
            .map_err(|e| Error::operation("word_exists", e))
        })
    }

    #[instrument(
        skip(self, entry),
        fields(backend = "sqlite", entry.id = %entry.id, collection.id = %entry.collection_id)
    )]
    fn insert(&self, entry: &Entry) -> Result<bool> {
        let examples = encode_list(&entry.examples)?;
        let categories = encode_list(&entry.categories)?;
        self.run("insert_word", |conn| {
            let inserted = conn
                .execute(
                    "INSERT OR IGNORE INTO words
                        (id, collection_id, owner_id, word, definition, pronunciation,
                         examples, categories, notes, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                    params![
                        entry.id.as_str(),
                        entry.collection_id.as_str(),
                        entry.owner_id.as_str(),
                        canonical_text(&entry.word),
                        entry.definition,
                        entry.pronunciation,
                        examples,
                        categories,
                        entry.notes,
                        encode_timestamp(&entry.created_at),
                        encode_timestamp(&entry.updated_at),
                    ],
                )
                .map_err(|e| Error::operation("insert_word", e))?;
            if inserted == 0 {
                tracing::debug!(word = %entry.word, "insert ignored by uniqueness constraint");
            }
            Ok(inserted > 0)
        })
    }

    #[instrument(skip(self, query), fields(backend = "sqlite", collection.id = %collection_id))]
    fn search(
        &self,
        collection_id: &CollectionId,
        query: &str,
        field: SearchField,
    ) -> Result<Vec<Entry>> {
        // Words are stored folded; definitions are folded by `unicode_lower`
        // because LIKE alone only ignores ASCII case.
        let pattern = contains_pattern(&canonical_text(query));
        let condition = match field {
            SearchField::Word => "word LIKE ?2 ESCAPE '\\'",
            SearchField::Definition => "unicode_lower(definition) LIKE ?2 ESCAPE '\\'",
            SearchField::Both => {
                "(word LIKE ?2 ESCAPE '\\' OR unicode_lower(definition) LIKE ?2 ESCAPE '\\')"
            },
        };
        let sql = format!(
            "SELECT {ENTRY_COLUMNS} FROM words
             WHERE collection_id = ?1 AND {condition}
             ORDER BY word ASC"
        );
        self.run("search_words", |conn| {
            Self::query_entries(conn, "search_words", &sql, params![collection_id.as_str(), pattern])
        })
    }

    #[instrument(skip(self), fields(backend = "sqlite", collection.id = %collection_id))]
    fn categories(&self, collection_id: &CollectionId) -> Result<Vec<String>> {
        self.run("categories", |conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT DISTINCT c.value
                     FROM words w, json_each(w.categories) c
                     WHERE w.collection_id = ?1 AND c.value != ''
                     ORDER BY c.value ASC",
                )
                .map_err(|e| Error::operation("categories", e))?;
            stmt.query_map(params![collection_id.as_str()], |row| row.get::<_, String>(0))
                .map_err(|e| Error::operation("categories", e))?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(|e| Error::operation("categories", e))
        })
    }
}

impl CollectionStore for SqliteStore {
    #[instrument(skip(self, collection), fields(backend = "sqlite", collection.name = %collection.name))]
    fn create(&self, collection: &Collection) -> Result<bool> {
        let word_count = i64::try_from(collection.word_count).unwrap_or(i64::MAX);
        self.run("create_collection", |conn| {
            conn.execute(
                "INSERT OR IGNORE INTO collections
                    (id, name, description, owner_id, created_at, updated_at, word_count)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    collection.id.as_str(),
                    collection.name,
                    collection.description,
                    collection.owner_id.as_str(),
                    encode_timestamp(&collection.created_at),
                    encode_timestamp(&collection.updated_at),
                    word_count,
                ],
            )
            .map(|inserted| inserted > 0)
            .map_err(|e| Error::operation("create_collection", e))
        })
    }

    #[instrument(skip(self), fields(backend = "sqlite"))]
    fn get(&self, id: &CollectionId) -> Result<Option<Collection>> {
        let sql = format!("SELECT {COLLECTION_COLUMNS} FROM collections WHERE id = ?1");
        self.run("get_collection", |conn| {
            Self::query_collection(conn, &sql, params![id.as_str()])
        })
    }

    #[instrument(skip(self), fields(backend = "sqlite"))]
    fn find_by_name(&self, owner_id: &OwnerId, name: &str) -> Result<Option<Collection>> {
        let sql = format!(
            "SELECT {COLLECTION_COLUMNS} FROM collections WHERE owner_id = ?1 AND name = ?2"
        );
        self.run("find_collection_by_name", |conn| {
            Self::query_collection(conn, &sql, params![owner_id.as_str(), name.trim()])
        })
    }

    #[instrument(skip(self), fields(backend = "sqlite"))]
    fn list_by_owner(&self, owner_id: &OwnerId) -> Result<Vec<Collection>> {
        let sql = format!(
            "SELECT {COLLECTION_COLUMNS} FROM collections WHERE owner_id = ?1 ORDER BY name ASC"
        );
        self.run("list_collections", |conn| {
            let mut stmt = conn
                .prepare(&sql)
                .map_err(|e| Error::operation("list_collections", e))?;
            let rows = stmt
                .query_map(params![owner_id.as_str()], CollectionRow::from_row)
                .map_err(|e| Error::operation("list_collections", e))?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(|e| Error::operation("list_collections", e))?;
            rows.into_iter().map(CollectionRow::into_collection).collect()
        })
    }

    #[instrument(skip(self), fields(backend = "sqlite", collection.id = %id))]
    fn recount_entries(&self, id: &CollectionId) -> Result<usize> {
        let now = encode_timestamp(&Utc::now());
        self.run("recount_entries", |conn| {
            let updated = conn
                .execute(
                    "UPDATE collections
                     SET word_count = (SELECT COUNT(*) FROM words WHERE collection_id = ?1),
                         updated_at = ?2
                     WHERE id = ?1",
                    params![id.as_str(), now],
                )
                .map_err(|e| Error::operation("recount_entries", e))?;
            if updated == 0 {
                return Err(Error::NotFound(format!("collection '{id}'")));
            }
            let count: i64 = conn
                .query_row(
                    "SELECT word_count FROM collections WHERE id = ?1",
                    params![id.as_str()],
                    |row| row.get(0),
                )
                .map_err(|e| Error::operation("recount_entries", e))?;
            Ok(usize::try_from(count).unwrap_or(0))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntryFields;

    fn store_with_collection() -> (SqliteStore, Collection) {
        let store = SqliteStore::in_memory().unwrap();
        let collection = Collection::new("Spanish", OwnerId::new("alice"));
        assert!(store.create(&collection).unwrap());
        (store, collection)
    }

    fn entry(collection: &Collection, word: &str, definition: &str) -> Entry {
        Entry::create(
            collection.id.clone(),
            collection.owner_id.clone(),
            EntryFields::new(word, definition),
        )
    }

    #[test]
    fn test_insert_and_find_sorted_by_word() {
        let (store, collection) = store_with_collection();
        for (word, def) in [("zebra", "animal"), ("apple", "fruit"), ("mango", "fruit")] {
            assert!(store.insert(&entry(&collection, word, def)).unwrap());
        }

        let words: Vec<_> = store
            .find_by_collection(&collection.id, EntrySort::CanonicalTextAsc)
            .unwrap()
            .into_iter()
            .map(|e| e.word)
            .collect();
        assert_eq!(words, vec!["apple", "mango", "zebra"]);
    }

    #[test]
    fn test_find_sorted_by_creation() {
        let (store, collection) = store_with_collection();
        let mut first = entry(&collection, "zebra", "animal");
        first.created_at = at(1_000);
        let mut second = entry(&collection, "apple", "fruit");
        second.created_at = at(2_000);
        store.insert(&second).unwrap();
        store.insert(&first).unwrap();

        let words: Vec<_> = store
            .find_by_collection(&collection.id, EntrySort::CreatedAtAsc)
            .unwrap()
            .into_iter()
            .map(|e| e.word)
            .collect();
        assert_eq!(words, vec!["zebra", "apple"]);
    }

    fn at(secs: i64) -> chrono::DateTime<Utc> {
        chrono::DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn test_insert_roundtrips_all_fields() {
        let (store, collection) = store_with_collection();
        let original = Entry::create(
            collection.id.clone(),
            collection.owner_id.clone(),
            EntryFields::new("Hola", "Hello")
                .with_pronunciation("OH-lah")
                .with_example("¡Hola, amigo!")
                .with_example("Hola a todos")
                .with_category("greeting")
                .with_notes("informal"),
        );
        store.insert(&original).unwrap();

        let stored = store
            .find_by_collection(&collection.id, EntrySort::default())
            .unwrap();
        assert_eq!(stored, vec![original]);
    }

    #[test]
    fn test_unique_constraint_reports_false() {
        let (store, collection) = store_with_collection();
        assert!(store.insert(&entry(&collection, "apple", "fruit")).unwrap());
        assert!(!store.insert(&entry(&collection, "APPLE ", "again")).unwrap());

        let all = store
            .find_by_collection(&collection.id, EntrySort::default())
            .unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].definition, "fruit");
    }

    #[test]
    fn test_same_word_allowed_in_different_collections() {
        let (store, spanish) = store_with_collection();
        let french = Collection::new("French", OwnerId::new("alice"));
        store.create(&french).unwrap();

        assert!(store.insert(&entry(&spanish, "chat", "talk")).unwrap());
        assert!(store.insert(&entry(&french, "chat", "cat")).unwrap());
    }

    #[test]
    fn test_insert_into_missing_collection_fails() {
        let store = SqliteStore::in_memory().unwrap();
        let orphan = Collection::new("Ghost", OwnerId::new("alice"));
        assert!(store.insert(&entry(&orphan, "boo", "scare")).is_err());
    }

    #[test]
    fn test_exists_folds_and_excludes() {
        let (store, collection) = store_with_collection();
        let apple = entry(&collection, "apple", "fruit");
        store.insert(&apple).unwrap();

        assert!(store.exists("apple", &collection.id, None).unwrap());
        assert!(store.exists("  Apple ", &collection.id, None).unwrap());
        assert!(!store.exists("pear", &collection.id, None).unwrap());
        assert!(!store.exists("apple", &collection.id, Some(&apple.id)).unwrap());
        assert!(
            store
                .exists("apple", &collection.id, Some(&EntryId::new("other")))
                .unwrap()
        );
        assert!(!store.exists("apple", &CollectionId::new("nope"), None).unwrap());
    }

    #[test]
    fn test_search_by_field() {
        let (store, collection) = store_with_collection();
        store.insert(&entry(&collection, "apple", "A red fruit")).unwrap();
        store.insert(&entry(&collection, "pineapple", "Tropical fruit")).unwrap();
        store.insert(&entry(&collection, "carrot", "An orange vegetable")).unwrap();

        let words = |field| -> Vec<String> {
            store
                .search(&collection.id, "APPLE", field)
                .unwrap()
                .into_iter()
                .map(|e| e.word)
                .collect()
        };
        assert_eq!(words(SearchField::Word), vec!["apple", "pineapple"]);
        assert!(words(SearchField::Definition).is_empty());

        let fruit: Vec<_> = store
            .search(&collection.id, "fruit", SearchField::Both)
            .unwrap()
            .into_iter()
            .map(|e| e.word)
            .collect();
        assert_eq!(fruit, vec!["apple", "pineapple"]);
    }

    #[test]
    fn test_definition_search_ignores_non_ascii_case() {
        let (store, collection) = store_with_collection();
        store.insert(&entry(&collection, "tree", "Árbol grande")).unwrap();
        store.insert(&entry(&collection, "swan", "CISNE ÉLÉGANT")).unwrap();

        for (query, expected) in [("árbol", "tree"), ("ÁRBOL", "tree"), ("élégant", "swan")] {
            let hits = store
                .search(&collection.id, query, SearchField::Definition)
                .unwrap();
            assert_eq!(hits.len(), 1, "query {query}");
            assert_eq!(hits[0].word, expected);

            let default_hits: Vec<_> = store
                .find_by_collection(&collection.id, EntrySort::CanonicalTextAsc)
                .unwrap()
                .into_iter()
                .filter(|e| SearchField::Definition.matches(e, &canonical_text(query)))
                .collect();
            assert_eq!(default_hits.len(), hits.len(), "query {query}");
        }
    }

    #[test]
    fn test_search_treats_wildcards_literally() {
        let (store, collection) = store_with_collection();
        store.insert(&entry(&collection, "percent", "100% sure")).unwrap();
        store.insert(&entry(&collection, "other", "1000 things")).unwrap();

        let hits = store
            .search(&collection.id, "100%", SearchField::Definition)
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].word, "percent");
    }

    #[test]
    fn test_categories_distinct_sorted() {
        let (store, collection) = store_with_collection();
        let with_categories = |word: &str, categories: &[&str]| {
            let mut fields = EntryFields::new(word, "def");
            fields.categories = categories.iter().map(ToString::to_string).collect();
            Entry::create(collection.id.clone(), collection.owner_id.clone(), fields)
        };
        store.insert(&with_categories("a", &["noun", "food"])).unwrap();
        store.insert(&with_categories("b", &["verb", "noun", ""])).unwrap();

        assert_eq!(
            store.categories(&collection.id).unwrap(),
            vec!["food", "noun", "verb"]
        );
    }

    #[test]
    fn test_collection_names_unique_per_owner() {
        let (store, _) = store_with_collection();
        let clash = Collection::new("Spanish", OwnerId::new("alice"));
        let other_owner = Collection::new("Spanish", OwnerId::new("bob"));

        assert!(!store.create(&clash).unwrap());
        assert!(store.create(&other_owner).unwrap());
    }

    #[test]
    fn test_find_by_name_and_list() {
        let (store, spanish) = store_with_collection();
        let french = Collection::new("French", OwnerId::new("alice"));
        store.create(&french).unwrap();

        let found = store
            .find_by_name(&OwnerId::new("alice"), " Spanish ")
            .unwrap()
            .unwrap();
        assert_eq!(found, spanish);
        assert!(
            store
                .find_by_name(&OwnerId::new("bob"), "Spanish")
                .unwrap()
                .is_none()
        );

        let names: Vec<_> = store
            .list_by_owner(&OwnerId::new("alice"))
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["French", "Spanish"]);
    }

    #[test]
    fn test_recount_entries_updates_cache() {
        let (store, collection) = store_with_collection();
        store.insert(&entry(&collection, "uno", "one")).unwrap();
        store.insert(&entry(&collection, "dos", "two")).unwrap();

        let cached = store.get(&collection.id).unwrap().unwrap();
        assert_eq!(cached.word_count, 0, "cache is stale until reconciled");

        assert_eq!(store.recount_entries(&collection.id).unwrap(), 2);
        assert_eq!(store.get(&collection.id).unwrap().unwrap().word_count, 2);
    }

    #[test]
    fn test_recount_missing_collection() {
        let store = SqliteStore::in_memory().unwrap();
        let err = store.recount_entries(&CollectionId::new("missing")).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_file_backed_store_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vault.db");
        let collection = Collection::new("Persisted", OwnerId::new("alice"));
        {
            let store = SqliteStore::new(&path).unwrap();
            store.create(&collection).unwrap();
            store.insert(&entry(&collection, "kept", "still here")).unwrap();
        }

        let reopened = SqliteStore::new(&path).unwrap();
        let entries = reopened
            .find_by_collection(&collection.id, EntrySort::default())
            .unwrap();
        assert_eq!(entries.len(), 1);
    }
}
