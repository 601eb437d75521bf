use super::batch::WriteBatch;
use super::collection::{Collection, Document};
use super::markdown::{FrontmatterFormat, parse_document};
use crate::{
    config::FurrowConfig,
    error::{FurrowError, Result},
    validation,
};
use slug::slugify;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Raw file content of a document together with where it lives.
#[derive(Debug, Clone)]
pub(super) struct CachedDocument {
    pub path: PathBuf,
    pub content: String,
}

#[derive(Default)]
struct CollectionCache {
    /// True once every file of the collection has been loaded.
    listed: bool,
    by_id: HashMap<String, CachedDocument>,
}

/// In-memory cache of raw document files, per collection.
#[derive(Default)]
struct DocumentCache {
    collections: HashMap<Collection, CollectionCache>,
}

impl DocumentCache {
    fn invalidate(&mut self) {
        self.collections.clear();
    }

    fn get(&self, collection: Collection, id: &str) -> Option<&CachedDocument> {
        self.collections.get(&collection)?.by_id.get(id)
    }

    fn put(&mut self, collection: Collection, id: &str, doc: CachedDocument) {
        self.collections
            .entry(collection)
            .or_default()
            .by_id
            .insert(id.to_string(), doc);
    }

    fn remove(&mut self, collection: Collection, id: &str) {
        if let Some(cache) = self.collections.get_mut(&collection) {
            cache.by_id.remove(id);
        }
    }

    fn set_listed(&mut self, collection: Collection, docs: HashMap<String, CachedDocument>) {
        self.collections.insert(
            collection,
            CollectionCache {
                listed: true,
                by_id: docs,
            },
        );
    }

    fn listed(&self, collection: Collection) -> Option<Vec<CachedDocument>> {
        let cache = self.collections.get(&collection)?;
        cache.listed.then(|| cache.by_id.values().cloned().collect())
    }
}

/// Flat-file document store: one directory per collection, one markdown file per document.
pub struct Store {
    data_path: PathBuf,
    id_length: usize,
    frontmatter_format: FrontmatterFormat,
    cache: RefCell<DocumentCache>,
}

impl Store {
    pub fn new(config: &FurrowConfig, project_root: &Path) -> Self {
        Self::open(
            config.data_path(project_root),
            config.furrow.id_length,
            config.furrow.frontmatter_format(),
        )
    }

    pub fn open(data_path: PathBuf, id_length: usize, frontmatter_format: FrontmatterFormat) -> Self {
        Self {
            data_path,
            id_length,
            frontmatter_format,
            cache: RefCell::new(DocumentCache::default()),
        }
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    pub fn frontmatter_format(&self) -> FrontmatterFormat {
        self.frontmatter_format
    }

    pub fn collection_path(&self, collection: Collection) -> PathBuf {
        self.data_path.join(collection.name())
    }

    /// Invalidate the cache (call after external file changes)
    pub fn invalidate_cache(&self) {
        self.cache.borrow_mut().invalidate();
    }

    pub fn generate_id(&self, collection: Collection) -> String {
        const ALPHABET: [char; 36] = [
            '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f', 'g',
            'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x',
            'y', 'z',
        ];
        loop {
            let suffix = nanoid::format(nanoid::rngs::default, &ALPHABET, self.id_length);
            let id = format!("{}{}", collection.id_prefix(), suffix);
            if !matches!(self.find_file(collection, &id), Ok(Some(_))) {
                return id;
            }
        }
    }

    pub fn file_name<T: Document>(doc: &T) -> String {
        let slug = slugify(doc.label());
        if slug.is_empty() {
            return format!("{}.md", doc.id());
        }
        let slug: String = slug.chars().take(50).collect();
        format!("{}--{}.md", doc.id(), slug.trim_end_matches('-'))
    }

    pub fn get<T: Document>(&self, id: &str) -> Result<T> {
        self.find(id)?
            .ok_or_else(|| FurrowError::not_found(T::COLLECTION, id))
    }

    pub fn find<T: Document>(&self, id: &str) -> Result<Option<T>> {
        validation::validate_id(id)?;
        match self.load_raw(T::COLLECTION, id)? {
            Some(raw) => Ok(Some(parse_document(&raw.content)?)),
            None => Ok(None),
        }
    }

    /// Check if a document exists by ID
    pub fn exists<T: Document>(&self, id: &str) -> bool {
        matches!(self.load_raw(T::COLLECTION, id), Ok(Some(_)))
    }

    /// All documents of a collection, oldest first.
    pub fn list<T: Document>(&self) -> Result<Vec<T>> {
        let raw_docs = self.load_collection(T::COLLECTION)?;
        let mut docs = Vec::with_capacity(raw_docs.len());
        for raw in raw_docs {
            match parse_document::<T>(&raw.content) {
                Ok(doc) => docs.push(doc),
                Err(e) => {
                    tracing::warn!(path = %raw.path.display(), error = %e, "Skipping unparseable document");
                }
            }
        }
        docs.sort_by(|a, b| {
            a.created()
                .cmp(&b.created())
                .then_with(|| a.id().cmp(b.id()))
        });
        Ok(docs)
    }

    pub fn list_where<T: Document>(&self, predicate: impl Fn(&T) -> bool) -> Result<Vec<T>> {
        Ok(self.list::<T>()?.into_iter().filter(predicate).collect())
    }

    /// Number of documents in a collection, without parsing them.
    pub fn count(&self, collection: Collection) -> Result<usize> {
        Ok(self.load_collection(collection)?.len())
    }

    pub fn insert<T: Document>(&self, doc: &T) -> Result<PathBuf> {
        let mut batch = self.batch();
        let path = batch.insert(doc)?;
        batch.commit()?;
        Ok(path)
    }

    /// Write back a modified document.
    ///
    /// Fails with [`FurrowError::Conflict`] when the stored copy changed since `doc` was loaded.
    pub fn update<T: Document>(&self, doc: &mut T) -> Result<PathBuf> {
        let mut batch = self.batch();
        let path = batch.update(doc)?;
        batch.commit()?;
        Ok(path)
    }

    pub fn delete<T: Document>(&self, id: &str) -> Result<()> {
        let mut batch = self.batch();
        batch.delete::<T>(id)?;
        batch.commit()
    }

    /// Start a batch of writes that is committed all-or-nothing.
    pub fn batch(&self) -> WriteBatch<'_> {
        WriteBatch::new(self)
    }

    pub(super) fn load_raw(&self, collection: Collection, id: &str) -> Result<Option<CachedDocument>> {
        if let Some(doc) = self.cache.borrow().get(collection, id) {
            tracing::debug!(%collection, id, "Cache hit");
            return Ok(Some(doc.clone()));
        }

        let Some(doc) = self.read_from_disk(collection, id)? else {
            return Ok(None);
        };
        self.cache.borrow_mut().put(collection, id, doc.clone());
        Ok(Some(doc))
    }

    /// Read a document bypassing the cache.
    pub(super) fn read_from_disk(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<CachedDocument>> {
        let Some(path) = self.find_file(collection, id)? else {
            return Ok(None);
        };
        let content = std::fs::read_to_string(&path)?;
        Ok(Some(CachedDocument { path, content }))
    }

    fn load_collection(&self, collection: Collection) -> Result<Vec<CachedDocument>> {
        if let Some(docs) = self.cache.borrow().listed(collection) {
            return Ok(docs);
        }

        let dir = self.collection_path(collection);
        let mut docs = HashMap::new();
        if dir.exists() {
            for entry in std::fs::read_dir(&dir)? {
                let path = entry?.path();
                if !path.is_file() || path.extension().is_none_or(|ext| ext != "md") {
                    continue;
                }
                let Some(id) = id_from_path(&path) else {
                    continue;
                };
                match std::fs::read_to_string(&path) {
                    Ok(content) => {
                        docs.insert(id, CachedDocument { path, content });
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable document");
                    }
                }
            }
        }

        let list: Vec<CachedDocument> = docs.values().cloned().collect();
        self.cache.borrow_mut().set_listed(collection, docs);
        Ok(list)
    }

    pub(super) fn find_file(&self, collection: Collection, id: &str) -> Result<Option<PathBuf>> {
        validation::validate_id(id)?;

        let cached_path = self
            .cache
            .borrow()
            .get(collection, id)
            .map(|doc| doc.path.clone());
        if let Some(path) = cached_path.filter(|p| p.exists()) {
            return Ok(Some(path));
        }

        let dir = self.collection_path(collection);
        if !dir.exists() {
            return Ok(None);
        }

        for entry in std::fs::read_dir(&dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            if id_from_path(&path).as_deref() == Some(id) {
                return Ok(Some(path));
            }
        }
        Ok(None)
    }

    pub(super) fn cache_put(&self, collection: Collection, id: &str, doc: CachedDocument) {
        self.cache.borrow_mut().put(collection, id, doc);
    }

    pub(super) fn cache_remove(&self, collection: Collection, id: &str) {
        self.cache.borrow_mut().remove(collection, id);
    }

    /// Atomically write content to a file using temp file + rename
    pub(super) fn atomic_write(target_path: &Path, content: &str) -> Result<()> {
        let target_dir = target_path
            .parent()
            .ok_or_else(|| FurrowError::Storage("Target path has no parent directory".to_string()))?;
        std::fs::create_dir_all(target_dir)?;

        let mut temp_file = NamedTempFile::new_in(target_dir)
            .map_err(|e| FurrowError::Storage(format!("Failed to create temp file: {}", e)))?;

        use std::io::Write;
        temp_file
            .write_all(content.as_bytes())
            .map_err(|e| FurrowError::Storage(format!("Failed to write to temp file: {}", e)))?;

        temp_file
            .as_file()
            .sync_all()
            .map_err(|e| FurrowError::Storage(format!("Failed to sync temp file: {}", e)))?;

        temp_file
            .persist(target_path)
            .map_err(|e| FurrowError::Storage(format!("Failed to persist temp file: {}", e)))?;

        Ok(())
    }
}

/// Extract the document ID from `<id>--<slug>.md` or `<id>.md`.
fn id_from_path(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    let id = stem.split_once("--").map_or(stem, |(id, _)| id);
    (!id.is_empty()).then(|| id.to_string())
}
