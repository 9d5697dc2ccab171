//! Unified object database for git.
//!
//! Provides a single interface to read and write objects across loose storage
//! and packfiles. This is the primary abstraction that all higher-level git
//! operations use to access objects.

pub mod backend;
pub mod prefix;
mod search;

use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};

use git_hash::{HashAlgorithm, ObjectId};
use git_loose::LooseObjectStore;
use git_object::{Object, ObjectType};
use git_object::cache::ObjectCache;
use git_pack::pack::PackFile;
use git_utils::NamedMutex;

pub use backend::OdbBackend;
pub use error::OdbError;

mod error {
    use git_hash::ObjectId;

    #[derive(Debug, thiserror::Error)]
    pub enum OdbError {
        #[error("object not found: {0}")]
        NotFound(ObjectId),

        #[error("ambiguous object name: {prefix} matches {count} objects")]
        Ambiguous { prefix: String, count: usize },

        #[error("corrupt object {oid}: {reason}")]
        Corrupt { oid: ObjectId, reason: String },

        #[error(transparent)]
        Loose(#[from] git_loose::LooseError),

        #[error(transparent)]
        Pack(#[from] git_pack::PackError),

        #[error(transparent)]
        Io(#[from] std::io::Error),

        #[error(transparent)]
        Hash(#[from] git_hash::HashError),
    }
}

/// Lightweight object info (header only, no content).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectInfo {
    pub obj_type: ObjectType,
    pub size: usize,
}

/// Unified object database providing access across all storage backends.
pub struct ObjectDatabase {
    /// Loose object store.
    loose: LooseObjectStore,
    /// Pack files (protected by RwLock for refresh).
    packs: RwLock<Vec<PackFile>>,
    /// Object cache.
    cache: Mutex<ObjectCache>,
    /// Serializes loose writes of the same object id across threads.
    write_locks: NamedMutex,
    /// Path to the objects directory.
    objects_dir: PathBuf,
    /// Hash algorithm in use.
    hash_algo: HashAlgorithm,
}

impl ObjectDatabase {
    /// Open the object database at the given objects directory.
    pub fn open(objects_dir: impl AsRef<Path>) -> Result<Self, OdbError> {
        Self::open_with_algo(objects_dir, HashAlgorithm::Sha1)
    }

    /// Open the object database with a specific hash algorithm.
    ///
    /// Pack discovery runs synchronously here; callers that also need to load
    /// the loose-id scan and the reference index concurrently (the eager
    /// construction-time fan-out of `git-repository::Repository::open`) call
    /// this from a spawned thread alongside the others and join.
    pub fn open_with_algo(
        objects_dir: impl AsRef<Path>,
        hash_algo: HashAlgorithm,
    ) -> Result<Self, OdbError> {
        let objects_dir = objects_dir.as_ref().to_path_buf();
        let loose = LooseObjectStore::open(&objects_dir, hash_algo);
        let packs = Self::discover_packs(&objects_dir)?;

        Ok(Self {
            loose,
            packs: RwLock::new(packs),
            cache: Mutex::new(ObjectCache::new(1000)),
            write_locks: NamedMutex::new(),
            objects_dir,
            hash_algo,
        })
    }

    /// Read an object by OID (searches loose -> packs -> alternates).
    pub fn read(&self, oid: &ObjectId) -> Result<Option<Object>, OdbError> {
        search::find_object(self, oid)
    }

    /// Read an object with caching.
    pub fn read_cached(&self, oid: &ObjectId) -> Result<Option<Object>, OdbError> {
        // Check cache first
        {
            let mut cache = self.cache.lock().unwrap();
            if let Some(obj) = cache.get(oid) {
                return Ok(Some(obj.clone()));
            }
        }

        // Read from storage
        let obj = self.read(oid)?;

        // Insert into cache
        if let Some(ref obj) = obj {
            let mut cache = self.cache.lock().unwrap();
            cache.insert(*oid, obj.clone());
        }

        Ok(obj)
    }

    /// Read just the header (type + size) without full content.
    pub fn read_header(&self, oid: &ObjectId) -> Result<Option<ObjectInfo>, OdbError> {
        search::find_header(self, oid)
    }

    /// Check if an object exists (fast, no decompression for packed objects).
    pub fn contains(&self, oid: &ObjectId) -> bool {
        search::object_exists(self, oid)
    }

    /// Write a new object (always to loose store).
    ///
    /// Serialized per-OID: two threads writing the same object race on the
    /// underlying atomic rename regardless, but holding the lock across the
    /// write avoids redundant temp-file churn under contention. Short-circuits
    /// if the object is already present (loose or packed), and write-through
    /// inserts into the cache so a subsequent read does not re-hit disk.
    pub fn write(&self, obj: &Object) -> Result<ObjectId, OdbError> {
        let oid = hash_of(self.hash_algo, obj.object_type(), &obj.serialize_content())?;
        let _guard = self.write_locks.lock(&oid);
        if !self.contains(&oid) {
            self.loose.write(obj)?;
        }
        self.cache.lock().unwrap().insert(oid, obj.clone());
        Ok(oid)
    }

    /// Write raw content with type (always to loose store).
    ///
    /// Short-circuits if already present and write-through inserts into the
    /// cache, matching `write`.
    pub fn write_raw(
        &self,
        obj_type: ObjectType,
        content: &[u8],
    ) -> Result<ObjectId, OdbError> {
        let oid = hash_of(self.hash_algo, obj_type, content)?;
        let _guard = self.write_locks.lock(&oid);
        if !self.contains(&oid) {
            self.loose.write_raw(obj_type, content)?;
        }
        let obj = Object::parse_content(obj_type, content).map_err(|e| OdbError::Corrupt {
            oid,
            reason: e.to_string(),
        })?;
        self.cache.lock().unwrap().insert(oid, obj);
        Ok(oid)
    }

    /// Resolve an OID prefix to a full OID.
    /// Returns error if prefix is ambiguous.
    pub fn resolve_prefix(&self, prefix: &str) -> Result<ObjectId, OdbError> {
        prefix::resolve_prefix(self, prefix)
    }

    /// Refresh the list of pack files (call after gc/repack).
    pub fn refresh(&self) -> Result<(), OdbError> {
        let new_packs = Self::discover_packs(&self.objects_dir)?;
        let mut packs = self.packs.write().unwrap();
        *packs = new_packs;
        Ok(())
    }

    /// Iterate over all known object OIDs (for fsck/gc).
    pub fn iter_all_oids(
        &self,
    ) -> Result<Box<dyn Iterator<Item = Result<ObjectId, OdbError>> + '_>, OdbError> {
        let loose_iter = self.loose.iter()?.map(|r| r.map_err(OdbError::from));

        let packs = self.packs.read().unwrap();
        let mut pack_oids: Vec<Result<ObjectId, OdbError>> = Vec::new();
        for pack in packs.iter() {
            for (oid, _offset) in pack.index().iter() {
                pack_oids.push(Ok(oid));
            }
        }

        Ok(Box::new(loose_iter.chain(pack_oids)))
    }

    /// Get the path to the objects directory.
    pub fn objects_dir(&self) -> &Path {
        &self.objects_dir
    }

    /// Get the hash algorithm in use.
    pub fn hash_algo(&self) -> HashAlgorithm {
        self.hash_algo
    }

    /// Release open pack file handles.
    ///
    /// After `close`, no other method on this database may be called. Pack
    /// handles are backed by `mmap`, which closes infallibly on `Drop`; this
    /// still drains the list and surfaces the first error encountered, should
    /// a future backend make closing fallible.
    pub fn close(&self) -> Result<(), OdbError> {
        let mut packs = self.packs.write().unwrap();
        let mut first_err = None;
        for pack in packs.drain(..) {
            if let Err(e) = pack.close() {
                if first_err.is_none() {
                    first_err = Some(e);
                }
            }
        }
        match first_err {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }

    /// Discover pack files in the objects/pack directory.
    fn discover_packs(objects_dir: &Path) -> Result<Vec<PackFile>, OdbError> {
        let pack_dir = objects_dir.join("pack");
        if !pack_dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut packs = Vec::new();
        let mut entries: Vec<_> = std::fs::read_dir(&pack_dir)?
            .filter_map(|e| e.ok())
            .collect();

        // Sort by modification time (newest first) to match C git behavior
        entries.sort_by(|a, b| {
            let a_time = a.metadata().and_then(|m| m.modified()).ok();
            let b_time = b.metadata().and_then(|m| m.modified()).ok();
            b_time.cmp(&a_time)
        });

        for entry in entries {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "pack") {
                match PackFile::open(&path) {
                    Ok(pack) => packs.push(pack),
                    Err(e) => return Err(e.into()),
                }
            }
        }

        Ok(packs)
    }
}

/// Compute the OID a write would produce, without touching storage.
fn hash_of(
    algo: HashAlgorithm,
    obj_type: ObjectType,
    content: &[u8],
) -> Result<ObjectId, OdbError> {
    use git_hash::hasher::Hasher;
    let hdr = git_object::header::write_header(obj_type, content.len());
    let mut hasher = Hasher::new(algo);
    hasher.update(&hdr);
    hasher.update(content);
    Ok(hasher.finalize()?)
}
