use super::collection::{Collection, Document};
use super::markdown::{detect_format, parse_document, render_document};
use super::store::{CachedDocument, Store};
use crate::{
    error::{FurrowError, Result},
    validation,
};
use std::path::{Path, PathBuf};

enum StagedWrite {
    Put {
        collection: Collection,
        id: String,
        path: PathBuf,
        /// Old file to remove when the file name changed.
        replaces: Option<PathBuf>,
        content: String,
    },
    Remove {
        collection: Collection,
        id: String,
        path: PathBuf,
    },
}

impl StagedWrite {
    fn key(&self) -> (Collection, &str) {
        match self {
            StagedWrite::Put { collection, id, .. } | StagedWrite::Remove { collection, id, .. } => {
                (*collection, id.as_str())
            }
        }
    }
}

/// A set of document writes applied together.
///
/// Every precondition (duplicate IDs, stale copies, missing documents) is checked while
/// staging, before anything touches disk. If applying a write fails, every file already
/// changed by the batch is restored to its previous content.
pub struct WriteBatch<'a> {
    store: &'a Store,
    writes: Vec<StagedWrite>,
}

impl<'a> WriteBatch<'a> {
    pub(super) fn new(store: &'a Store) -> Self {
        Self {
            store,
            writes: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    fn ensure_not_staged(&self, collection: Collection, id: &str) -> Result<()> {
        if self.writes.iter().any(|w| w.key() == (collection, id)) {
            return Err(FurrowError::Storage(format!(
                "{} {} is already part of this batch",
                collection, id
            )));
        }
        Ok(())
    }

    /// Stage a new document. Returns the path it will be written to.
    pub fn insert<T: Document>(&mut self, doc: &T) -> Result<PathBuf> {
        let collection = T::COLLECTION;
        validation::validate_id(doc.id())?;
        validation::validate_notes(doc.notes())?;
        self.ensure_not_staged(collection, doc.id())?;

        if self.store.find_file(collection, doc.id())?.is_some() {
            return Err(FurrowError::Storage(format!(
                "{} {} already exists",
                collection,
                doc.id()
            )));
        }

        let content = render_document(doc, self.store.frontmatter_format())?;
        let path = self
            .store
            .collection_path(collection)
            .join(Store::file_name(doc));

        self.writes.push(StagedWrite::Put {
            collection,
            id: doc.id().to_string(),
            path: path.clone(),
            replaces: None,
            content,
        });
        Ok(path)
    }

    /// Stage a modified document, checking it against the copy on disk.
    ///
    /// The document's `updated` timestamp must match the stored one; on success it is
    /// touched so the caller holds the version that will be written.
    pub fn update<T: Document>(&mut self, doc: &mut T) -> Result<PathBuf> {
        let collection = T::COLLECTION;
        validation::validate_id(doc.id())?;
        validation::validate_notes(doc.notes())?;
        self.ensure_not_staged(collection, doc.id())?;

        let current = self
            .store
            .read_from_disk(collection, doc.id())?
            .ok_or_else(|| FurrowError::not_found(collection, doc.id()))?;
        let stored: T = parse_document(&current.content)?;
        if stored.updated() != doc.updated() {
            tracing::warn!(%collection, id = doc.id(), "Rejected stale update");
            return Err(FurrowError::Conflict {
                id: doc.id().to_string(),
            });
        }

        doc.touch();

        let format = detect_format(&current.content).unwrap_or(self.store.frontmatter_format());
        let content = render_document(doc, format)?;
        let path = self
            .store
            .collection_path(collection)
            .join(Store::file_name(doc));
        let replaces = (current.path != path).then_some(current.path);

        self.writes.push(StagedWrite::Put {
            collection,
            id: doc.id().to_string(),
            path: path.clone(),
            replaces,
            content,
        });
        Ok(path)
    }

    /// Stage the removal of a document.
    pub fn delete<T: Document>(&mut self, id: &str) -> Result<()> {
        let collection = T::COLLECTION;
        self.ensure_not_staged(collection, id)?;
        let path = self
            .store
            .find_file(collection, id)?
            .ok_or_else(|| FurrowError::not_found(collection, id))?;
        self.writes.push(StagedWrite::Remove {
            collection,
            id: id.to_string(),
            path,
        });
        Ok(())
    }

    /// Apply every staged write, or none of them.
    pub fn commit(self) -> Result<()> {
        if self.writes.is_empty() {
            return Ok(());
        }

        let mut journal = Vec::new();
        if let Err(e) = self.apply(&mut journal) {
            tracing::error!(error = %e, writes = self.writes.len(), "Batch failed, rolling back");
            rollback(journal);
            self.store.invalidate_cache();
            return Err(e);
        }

        for write in self.writes {
            match write {
                StagedWrite::Put {
                    collection,
                    id,
                    path,
                    content,
                    ..
                } => {
                    tracing::info!(%collection, id = %id, "Wrote document");
                    self.store
                        .cache_put(collection, &id, CachedDocument { path, content });
                }
                StagedWrite::Remove { collection, id, .. } => {
                    tracing::info!(%collection, id = %id, "Deleted document");
                    self.store.cache_remove(collection, &id);
                }
            }
        }
        Ok(())
    }

    /// Apply the writes in order, journaling the previous content of every touched file.
    fn apply(&self, journal: &mut Vec<(PathBuf, Option<String>)>) -> Result<()> {
        for write in &self.writes {
            match write {
                StagedWrite::Put {
                    path,
                    replaces,
                    content,
                    ..
                } => {
                    journal.push((path.clone(), read_optional(path)?));
                    Store::atomic_write(path, content)?;
                    if let Some(old_path) = replaces {
                        journal.push((old_path.clone(), read_optional(old_path)?));
                        std::fs::remove_file(old_path)?;
                    }
                }
                StagedWrite::Remove { path, .. } => {
                    journal.push((path.clone(), read_optional(path)?));
                    std::fs::remove_file(path)?;
                }
            }
        }
        Ok(())
    }
}

fn read_optional(path: &Path) -> Result<Option<String>> {
    if path.exists() {
        Ok(Some(std::fs::read_to_string(path)?))
    } else {
        Ok(None)
    }
}

/// Restore journaled files, newest change first.
fn rollback(journal: Vec<(PathBuf, Option<String>)>) {
    for (path, previous) in journal.into_iter().rev() {
        let restored = match previous {
            Some(content) => Store::atomic_write(&path, &content),
            None if path.exists() => std::fs::remove_file(&path).map_err(FurrowError::from),
            None => Ok(()),
        };
        if let Err(e) = restored {
            tracing::error!(path = %path.display(), error = %e, "Failed to restore file during rollback");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FurrowConfig;
    use crate::store::markdown::tests::Crate;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    fn setup_test_store() -> (Store, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = Store::new(&FurrowConfig::default(), temp_dir.path());
        (store, temp_dir)
    }

    #[test]
    fn test_batch_commits_all_writes() {
        let (store, _temp_dir) = setup_test_store();
        let mut existing = Crate::new("wt-keep", "Keep", dec!(1));
        store.insert(&existing).unwrap();
        store.insert(&Crate::new("wt-drop", "Drop", dec!(1))).unwrap();

        let mut batch = store.batch();
        existing.kg = dec!(2);
        batch.update(&mut existing).unwrap();
        batch.insert(&Crate::new("wt-new", "New", dec!(3))).unwrap();
        batch.delete::<Crate>("wt-drop").unwrap();
        assert_eq!(batch.len(), 3);
        batch.commit().unwrap();

        let ids: Vec<String> = store.list::<Crate>().unwrap().into_iter().map(|c| c.id).collect();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&"wt-keep".to_string()));
        assert!(ids.contains(&"wt-new".to_string()));
        assert_eq!(store.get::<Crate>("wt-keep").unwrap().kg, dec!(2));
    }

    #[test]
    fn test_precondition_failure_writes_nothing() {
        let (store, _temp_dir) = setup_test_store();
        store.insert(&Crate::new("wt-taken", "Taken", dec!(1))).unwrap();

        let mut batch = store.batch();
        batch.insert(&Crate::new("wt-fresh", "Fresh", dec!(1))).unwrap();
        assert!(batch.insert(&Crate::new("wt-taken", "Again", dec!(1))).is_err());
        // The failed staging leaves the batch usable but the caller drops it.
        drop(batch);

        assert!(!store.exists::<Crate>("wt-fresh"));
    }

    #[test]
    fn test_same_document_cannot_be_staged_twice() {
        let (store, _temp_dir) = setup_test_store();
        let mut doc = Crate::new("wt-twice", "Twice", dec!(1));
        store.insert(&doc).unwrap();

        let mut batch = store.batch();
        let mut copy = doc.clone();
        batch.update(&mut doc).unwrap();
        assert!(matches!(
            batch.update(&mut copy),
            Err(FurrowError::Storage(_))
        ));
    }

    #[test]
    fn test_failed_apply_rolls_back_earlier_writes() {
        let (store, _temp_dir) = setup_test_store();
        let mut first = Crate::new("wt-first", "First", dec!(1));
        store.insert(&first).unwrap();
        store.insert(&Crate::new("wt-gone", "Gone", dec!(1))).unwrap();

        let mut batch = store.batch();
        first.kg = dec!(100);
        batch.update(&mut first).unwrap();
        batch.insert(&Crate::new("wt-added", "Added", dec!(1))).unwrap();
        batch.delete::<Crate>("wt-gone").unwrap();

        // Remove the target behind the batch's back so the last write fails.
        let gone = store
            .find_file(Collection::PickerWeighEntries, "wt-gone")
            .unwrap()
            .unwrap();
        std::fs::remove_file(gone).unwrap();

        assert!(batch.commit().is_err());

        store.invalidate_cache();
        assert_eq!(store.get::<Crate>("wt-first").unwrap().kg, dec!(1));
        assert!(!store.exists::<Crate>("wt-added"));
    }

    #[test]
    fn test_empty_batch_is_noop() {
        let (store, _temp_dir) = setup_test_store();
        let batch = store.batch();
        assert!(batch.is_empty());
        batch.commit().unwrap();
        assert!(!store.data_path().exists());
    }
}
