//! redb-backed post storage.
//!
//! Posts live in a two-level namespace inside a single database file. The
//! outer container `BLOG` is a registry table naming its collections; the
//! posts themselves are in the `BLOG/POSTS` table, keyed by slug, with the
//! JSON-encoded [`Post`] as the value.
//!
//! All consistency comes from redb transactions: readers work against a
//! point-in-time snapshot and never block, writers are serialized.

mod error;

pub use error::{StoreError, StoreResult};

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use redb::{Database, ReadTransaction, ReadableTable, TableDefinition};
use tracing::{debug, info};

use crate::content::{slug_for, Post, PostDraft};

/// Name of the outer container.
pub const CONTAINER: &str = "BLOG";

/// Name of the post collection inside the container.
pub const POSTS: &str = "POSTS";

/// Table name backing the post collection.
const POSTS_TABLE_NAME: &str = "BLOG/POSTS";

/// Container registry.
/// Key: collection name
/// Value: backing table name
const CONTAINER_TABLE: TableDefinition<&str, &str> = TableDefinition::new(CONTAINER);

/// Post records.
/// Key: slug
/// Value: JSON-encoded post
const POSTS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new(POSTS_TABLE_NAME);

/// Persistent post store.
///
/// Open once at startup and share it (e.g. behind an `Arc`); it is safe to
/// use from many threads at once.
pub struct PostStore {
    db: Database,
    path: PathBuf,
}

impl PostStore {
    /// Open or create a post store at the given path.
    ///
    /// Safe to call on every start: the namespace is only created if missing.
    /// A new file is created readable and writable by its owner only.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();

        let file = open_file(&path)
            .map_err(|e| StoreError::unavailable(format!("{}: {}", path.display(), e)))?;
        let db = Database::builder()
            .create_file(file)
            .map_err(|e| StoreError::unavailable(format!("{}: {}", path.display(), e)))?;

        ensure_namespace(&db)?;

        debug!("Opened post store at {:?}", path);
        Ok(Self { db, path })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Begin a read transaction.
    ///
    /// Everything read through the returned snapshot reflects the last commit
    /// before this call, regardless of writes that happen afterwards.
    pub fn snapshot(&self) -> StoreResult<Snapshot> {
        let txn = self.db.begin_read().map_err(StoreError::read)?;
        Ok(Snapshot { txn })
    }

    /// Write `post` under `slug`, replacing anything already there.
    pub fn upsert(&self, post: &Post, slug: &str) -> StoreResult<()> {
        let buf = serde_json::to_vec(post).map_err(StoreError::Encoding)?;

        let write_txn = self.db.begin_write().map_err(StoreError::write)?;
        {
            let mut table = write_txn.open_table(POSTS_TABLE).map_err(StoreError::write)?;
            table
                .insert(slug, buf.as_slice())
                .map_err(StoreError::write)?;
        }
        write_txn.commit().map_err(StoreError::write)?;

        debug!(slug, bytes = buf.len(), "Stored post");
        Ok(())
    }

    /// Get the post stored under `slug`.
    pub fn get(&self, slug: &str) -> StoreResult<Post> {
        self.snapshot()?.get(slug)
    }

    /// All posts in ascending slug order.
    pub fn list(&self) -> StoreResult<Vec<(String, Post)>> {
        self.snapshot()?.list()
    }

    /// Number of stored posts.
    pub fn count(&self) -> StoreResult<u64> {
        self.snapshot()?.count()
    }

    /// Remove the post stored under `slug`. Removing a missing slug is not an error.
    pub fn delete(&self, slug: &str) -> StoreResult<()> {
        let write_txn = self.db.begin_write().map_err(StoreError::write)?;
        let removed = {
            let mut table = write_txn.open_table(POSTS_TABLE).map_err(StoreError::write)?;
            let existing = table.remove(slug).map_err(StoreError::write)?;
            existing.is_some()
        };
        write_txn.commit().map_err(StoreError::write)?;

        debug!(slug, removed, "Deleted post");
        Ok(())
    }

    /// Store a new post, stamping it with `now` and deriving its slug.
    pub fn create(&self, draft: PostDraft, now: DateTime<Utc>) -> StoreResult<Post> {
        let mut post = Post::from(draft);
        post.date_posted = Some(now);
        post.slug = slug_for(&post.title, &now);

        self.upsert(&post, &post.slug)?;
        Ok(post)
    }

    /// Replace the post at `slug`, keeping the slug and stamping it with `now`.
    ///
    /// A title change does not move the post to a new slug. Updating a slug
    /// that does not exist stores it there.
    pub fn update(&self, slug: &str, draft: PostDraft, now: DateTime<Utc>) -> StoreResult<Post> {
        let mut post = Post::from(draft);
        post.date_posted = Some(now);
        post.slug = slug.to_string();

        self.upsert(&post, slug)?;
        Ok(post)
    }

    /// Names of the collections registered in the container.
    pub fn collections(&self) -> StoreResult<Vec<String>> {
        let read_txn = self.db.begin_read().map_err(StoreError::read)?;
        let table = read_txn
            .open_table(CONTAINER_TABLE)
            .map_err(StoreError::read)?;

        let mut names = Vec::new();
        for entry in table.iter().map_err(StoreError::read)? {
            let (key, _) = entry.map_err(StoreError::read)?;
            names.push(key.value().to_string());
        }
        Ok(names)
    }

    /// Hold the single writer slot for `duration`, signalling `ready` once taken.
    #[cfg(test)]
    pub(crate) fn hold_writer(
        &self,
        ready: std::sync::mpsc::Sender<()>,
        duration: std::time::Duration,
    ) {
        let write_txn = self.db.begin_write().unwrap();
        ready.send(()).unwrap();
        std::thread::sleep(duration);
        write_txn.abort().unwrap();
    }

    /// Close the store, releasing the file lock.
    pub fn close(self) {
        let path = self.path.clone();
        drop(self.db);
        info!("Closed post store at {:?}", path);
    }
}

/// A read-only, point-in-time view of the post collection.
pub struct Snapshot {
    txn: ReadTransaction,
}

impl Snapshot {
    /// Get the post stored under `slug`.
    pub fn get(&self, slug: &str) -> StoreResult<Post> {
        let table = self.txn.open_table(POSTS_TABLE).map_err(StoreError::read)?;
        match table.get(slug).map_err(StoreError::read)? {
            Some(value) => decode(slug, value.value()),
            None => Err(StoreError::NotFound(slug.to_string())),
        }
    }

    /// All posts in ascending slug order.
    ///
    /// A single undecodable record fails the whole listing.
    pub fn list(&self) -> StoreResult<Vec<(String, Post)>> {
        let table = self.txn.open_table(POSTS_TABLE).map_err(StoreError::read)?;

        let mut posts = Vec::new();
        for entry in table.iter().map_err(StoreError::read)? {
            let (key, value) = entry.map_err(StoreError::read)?;
            let slug = key.value().to_string();
            let post = decode(&slug, value.value())?;
            posts.push((slug, post));
        }

        Ok(posts)
    }

    /// Number of posts in this snapshot.
    pub fn count(&self) -> StoreResult<u64> {
        let table = self.txn.open_table(POSTS_TABLE).map_err(StoreError::read)?;
        let mut count = 0u64;
        for entry in table.iter().map_err(StoreError::read)? {
            entry.map_err(StoreError::read)?;
            count += 1;
        }
        Ok(count)
    }
}

fn decode(slug: &str, bytes: &[u8]) -> StoreResult<Post> {
    serde_json::from_slice(bytes).map_err(|source| StoreError::Decoding {
        slug: slug.to_string(),
        source,
    })
}

/// Open the backing file, creating it with owner-only permissions if missing.
fn open_file(path: &Path) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.read(true).write(true).create(true).truncate(false);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    options.open(path)
}

/// Make sure the container and its post collection exist.
///
/// Only takes a write transaction when something is missing.
fn ensure_namespace(db: &Database) -> StoreResult<()> {
    if namespace_exists(db)? {
        return Ok(());
    }

    let write_txn = db.begin_write().map_err(StoreError::unavailable)?;
    {
        let mut container = write_txn
            .open_table(CONTAINER_TABLE)
            .map_err(StoreError::unavailable)?;
        let registered = container
            .get(POSTS)
            .map_err(StoreError::unavailable)?
            .is_some();
        if !registered {
            container
                .insert(POSTS, POSTS_TABLE_NAME)
                .map_err(StoreError::unavailable)?;
        }
    }
    {
        let _ = write_txn
            .open_table(POSTS_TABLE)
            .map_err(StoreError::unavailable)?;
    }
    write_txn.commit().map_err(StoreError::unavailable)?;

    debug!("Created namespace {}/{}", CONTAINER, POSTS);
    Ok(())
}

/// Whether the post collection is registered and its table exists.
fn namespace_exists(db: &Database) -> StoreResult<bool> {
    let read_txn = db.begin_read().map_err(StoreError::unavailable)?;

    let container = match read_txn.open_table(CONTAINER_TABLE) {
        Ok(table) => table,
        Err(redb::TableError::TableDoesNotExist(_)) => return Ok(false),
        Err(e) => return Err(StoreError::unavailable(e)),
    };
    if container
        .get(POSTS)
        .map_err(StoreError::unavailable)?
        .is_none()
    {
        return Ok(false);
    }

    match read_txn.open_table(POSTS_TABLE) {
        Ok(_) => Ok(true),
        Err(redb::TableError::TableDoesNotExist(_)) => Ok(false),
        Err(e) => Err(StoreError::unavailable(e)),
    }
}
