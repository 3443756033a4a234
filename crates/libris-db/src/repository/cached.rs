//! # Cache-Decorated Book Repository
//!
//! The consistency-critical component: implements the same contract as the
//! store adapter, serving reads from a cache and writing through to the
//! adapter.
//!
//! ## Consistency Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  READS   cache hit → return clone                               │
//! │          cache miss → load from adapter, populate, return       │
//! │                                                                 │
//! │  WRITES  adapter first; ONLY on adapter success:                │
//! │            bump generation → invalidate per-id + catalog keys   │
//! │          adapter failure → cache left untouched                 │
//! │                                                                 │
//! │  SELL    per-book-id async mutex around check-and-decrement;    │
//! │          different ids proceed fully in parallel;               │
//! │          reads never take the sell lock                         │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The durable write always happens-before the cache invalidation. The
//! generation counter closes the remaining race: a miss-path read that
//! fetched pre-write data records the generation before fetching and
//! re-checks it inside `Cache::put_if`, under the same write lock the
//! invalidation takes. Either the populate observes the bumped generation
//! and drops itself, or it lands first and the pending invalidation
//! removes it; a stale entry can never survive an invalidation.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tracing::debug;

use crate::cache::Cache;
use crate::error::DbResult;
use crate::repository::BookRepository;
use libris_core::{Book, BookId, NewBook};

/// Cache key for derived collections (currently just the full catalog).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum CatalogKey {
    AllBooks,
}

/// Decorates any [`BookRepository`] with transparent caching.
///
/// Holds the wrapped repository by ownership; callers receive clones of
/// cached values, never references into the cache.
pub struct CachedBookRepository<R> {
    inner: R,
    by_id: Cache<BookId, Book>,
    catalog: Cache<CatalogKey, Vec<Book>>,
    /// One async mutex per book id that has been sold; bounded by the
    /// catalog size, so the map is never pruned.
    sell_locks: Mutex<HashMap<BookId, Arc<tokio::sync::Mutex<()>>>>,
    /// Bumped on every invalidation; miss-path populates that observed an
    /// older generation are dropped.
    generation: AtomicU64,
}

impl<R: BookRepository> CachedBookRepository<R> {
    /// Wraps `inner` with an empty cache.
    pub fn new(inner: R) -> Self {
        CachedBookRepository {
            inner,
            by_id: Cache::new(),
            catalog: Cache::new(),
            sell_locks: Mutex::new(HashMap::new()),
            generation: AtomicU64::new(0),
        }
    }

    /// The wrapped repository (escape hatch for cache-bypassing reads).
    pub fn inner(&self) -> &R {
        &self.inner
    }

    /// Number of live cache entries across both keyspaces (diagnostics).
    pub fn cached_entries(&self) -> usize {
        self.by_id.len() + self.catalog.len()
    }

    fn sell_lock(&self, id: BookId) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self
            .sell_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(
            locks
                .entry(id)
                .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(()))),
        )
    }

    /// Invalidates the per-id and aggregate keys for `id`.
    ///
    /// Called only after a durable write succeeded. The generation bump
    /// precedes the removals so a concurrent miss-path populate carrying
    /// pre-write data can never land after the invalidation.
    fn invalidate_for(&self, id: BookId) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.by_id.invalidate(&id);
        self.catalog.invalidate(&CatalogKey::AllBooks);
    }

    fn invalidate_everything(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.by_id.invalidate_all();
        self.catalog.invalidate_all();
    }
}

#[async_trait]
impl<R: BookRepository> BookRepository for CachedBookRepository<R> {
    async fn find_all(&self) -> DbResult<Vec<Book>> {
        if let Some(books) = self.catalog.get(&CatalogKey::AllBooks) {
            debug!(count = books.len(), "Catalog served from cache");
            return Ok(books);
        }

        let generation = self.generation.load(Ordering::SeqCst);
        let books = self.inner.find_all().await?;

        self.catalog.put_if(CatalogKey::AllBooks, books.clone(), || {
            self.generation.load(Ordering::SeqCst) == generation
        });

        Ok(books)
    }

    async fn find_by_id(&self, id: BookId) -> DbResult<Option<Book>> {
        if let Some(book) = self.by_id.get(&id) {
            debug!(id, "Book served from cache");
            return Ok(Some(book));
        }

        let generation = self.generation.load(Ordering::SeqCst);
        let book = self.inner.find_by_id(id).await?;

        if let Some(ref book) = book {
            self.by_id.put_if(id, book.clone(), || {
                self.generation.load(Ordering::SeqCst) == generation
            });
        }

        Ok(book)
    }

    async fn save(&self, book: &NewBook) -> DbResult<Book> {
        // Write-through: persist first. On failure the `?` returns before
        // any cache state changes.
        let saved = self.inner.save(book).await?;
        self.invalidate_for(saved.id);
        Ok(saved)
    }

    async fn delete(&self, id: BookId) -> DbResult<()> {
        self.inner.delete(id).await?;
        self.invalidate_for(id);
        Ok(())
    }

    async fn update_stock(&self, id: BookId, new_stock: i64) -> DbResult<()> {
        self.inner.update_stock(id, new_stock).await?;
        self.invalidate_for(id);
        Ok(())
    }

    async fn sell(&self, id: BookId, quantity: i64) -> DbResult<Book> {
        // Serialize check-and-decrement per book id so two concurrent
        // sellers cannot both observe the same pre-sale stock. Sales of
        // different books do not contend.
        let lock = self.sell_lock(id);
        let _guard = lock.lock().await;

        let book = self.inner.sell(id, quantity).await?;
        self.invalidate_for(id);
        Ok(book)
    }

    async fn remove_all(&self) -> DbResult<()> {
        self.inner.remove_all().await?;
        self.invalidate_everything();
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};
    use crate::repository::book::SqliteBookRepository;
    use chrono::{NaiveDate, Utc};
    use libris_core::CoreError;
    use std::sync::atomic::AtomicBool;
    use std::sync::atomic::Ordering as AtomicOrdering;
    use std::sync::atomic::AtomicUsize;
    use std::sync::{OnceLock, Weak};

    async fn cached_repo() -> CachedBookRepository<SqliteBookRepository> {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        CachedBookRepository::new(db.books())
    }

    fn ficciones() -> NewBook {
        NewBook {
            title: "Ficciones".to_string(),
            author: "Jorge Luis Borges".to_string(),
            price_cents: 1450,
            stock: 3,
            publication_date: NaiveDate::from_ymd_opt(1944, 1, 1).unwrap(),
        }
    }

    /// Test double: counts reads and can be told to fail all writes.
    struct FlakyRepository {
        books: Mutex<HashMap<BookId, Book>>,
        fetches: AtomicUsize,
        fail_writes: AtomicBool,
    }

    impl FlakyRepository {
        fn new() -> Self {
            FlakyRepository {
                books: Mutex::new(HashMap::new()),
                fetches: AtomicUsize::new(0),
                fail_writes: AtomicBool::new(false),
            }
        }

        fn with_book(self, book: Book) -> Self {
            self.books.lock().unwrap().insert(book.id, book);
            self
        }

        fn check_writes(&self) -> DbResult<()> {
            if self.fail_writes.load(AtomicOrdering::SeqCst) {
                return Err(DbError::ConnectionFailed("simulated outage".into()));
            }
            Ok(())
        }
    }

    fn book(id: BookId, stock: i64) -> Book {
        Book {
            id,
            title: format!("Book {id}"),
            author: "Anon".to_string(),
            price_cents: 1000,
            stock,
            publication_date: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[async_trait]
    impl BookRepository for FlakyRepository {
        async fn find_all(&self) -> DbResult<Vec<Book>> {
            self.fetches.fetch_add(1, AtomicOrdering::SeqCst);
            let mut all: Vec<Book> = self.books.lock().unwrap().values().cloned().collect();
            all.sort_by_key(|b| b.id);
            Ok(all)
        }

        async fn find_by_id(&self, id: BookId) -> DbResult<Option<Book>> {
            self.fetches.fetch_add(1, AtomicOrdering::SeqCst);
            Ok(self.books.lock().unwrap().get(&id).cloned())
        }

        async fn save(&self, new: &NewBook) -> DbResult<Book> {
            self.check_writes()?;
            let mut books = self.books.lock().unwrap();
            let id = books.keys().max().copied().unwrap_or(0) + 1;
            let mut stored = book(id, new.stock);
            stored.title = new.title.clone();
            stored.author = new.author.clone();
            stored.price_cents = new.price_cents;
            books.insert(id, stored.clone());
            Ok(stored)
        }

        async fn delete(&self, id: BookId) -> DbResult<()> {
            self.check_writes()?;
            self.books.lock().unwrap().remove(&id);
            Ok(())
        }

        async fn update_stock(&self, id: BookId, new_stock: i64) -> DbResult<()> {
            self.check_writes()?;
            let mut books = self.books.lock().unwrap();
            match books.get_mut(&id) {
                Some(b) => {
                    b.stock = new_stock;
                    Ok(())
                }
                None => Err(DbError::not_found("Book", id)),
            }
        }

        async fn sell(&self, id: BookId, quantity: i64) -> DbResult<Book> {
            self.check_writes()?;
            let mut books = self.books.lock().unwrap();
            match books.get_mut(&id) {
                Some(b) if b.stock >= quantity => {
                    b.stock -= quantity;
                    Ok(b.clone())
                }
                Some(b) => Err(CoreError::InsufficientStock {
                    id,
                    available: b.stock,
                    requested: quantity,
                }
                .into()),
                None => Err(CoreError::BookNotFound(id).into()),
            }
        }

        async fn remove_all(&self) -> DbResult<()> {
            self.check_writes()?;
            self.books.lock().unwrap().clear();
            Ok(())
        }
    }

    /// Test double whose first fetch performs a decorated write mid-flight
    /// and then returns the pre-write row, reproducing a miss-path read
    /// racing an invalidation.
    struct RacingRepository {
        store: FlakyRepository,
        decorator: OnceLock<Weak<CachedBookRepository<RacingRepository>>>,
        race_once: AtomicBool,
    }

    #[async_trait]
    impl BookRepository for RacingRepository {
        async fn find_all(&self) -> DbResult<Vec<Book>> {
            self.store.find_all().await
        }

        async fn find_by_id(&self, id: BookId) -> DbResult<Option<Book>> {
            let stale = self.store.find_by_id(id).await?;
            if self.race_once.swap(false, AtomicOrdering::SeqCst) {
                if let Some(decorator) = self.decorator.get().and_then(Weak::upgrade) {
                    decorator.update_stock(id, 42).await.unwrap();
                }
            }
            Ok(stale)
        }

        async fn save(&self, new: &NewBook) -> DbResult<Book> {
            self.store.save(new).await
        }

        async fn delete(&self, id: BookId) -> DbResult<()> {
            self.store.delete(id).await
        }

        async fn update_stock(&self, id: BookId, new_stock: i64) -> DbResult<()> {
            self.store.update_stock(id, new_stock).await
        }

        async fn sell(&self, id: BookId, quantity: i64) -> DbResult<Book> {
            self.store.sell(id, quantity).await
        }

        async fn remove_all(&self) -> DbResult<()> {
            self.store.remove_all().await
        }
    }

    #[tokio::test]
    async fn test_reads_hit_cache_after_first_load() {
        let inner = FlakyRepository::new().with_book(book(1, 5));
        let repo = CachedBookRepository::new(inner);

        let first = repo.find_by_id(1).await.unwrap().unwrap();
        let second = repo.find_by_id(1).await.unwrap().unwrap();
        assert_eq!(first, second);
        // Only the miss touched the store.
        assert_eq!(repo.inner().fetches.load(AtomicOrdering::SeqCst), 1);

        repo.find_all().await.unwrap();
        repo.find_all().await.unwrap();
        assert_eq!(repo.inner().fetches.load(AtomicOrdering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_write_through_consistency() {
        let repo = cached_repo().await;

        let saved = repo.save(&ficciones()).await.unwrap();

        // Decorated view and raw adapter agree after the write.
        let via_cache = repo.find_by_id(saved.id).await.unwrap().unwrap();
        let via_store = repo.inner().find_by_id(saved.id).await.unwrap().unwrap();
        assert_eq!(via_cache, via_store);

        let catalog = repo.find_all().await.unwrap();
        assert_eq!(catalog, repo.inner().find_all().await.unwrap());
    }

    #[tokio::test]
    async fn test_sell_invalidates_cached_reads() {
        let repo = cached_repo().await;
        let saved = repo.save(&ficciones()).await.unwrap();

        // Warm both cache keys.
        repo.find_all().await.unwrap();
        repo.find_by_id(saved.id).await.unwrap();

        let after = repo.sell(saved.id, 2).await.unwrap();
        assert_eq!(after.stock, 1);

        // Subsequent reads observe the post-sale committed state.
        assert_eq!(repo.find_by_id(saved.id).await.unwrap().unwrap().stock, 1);
        let catalog = repo.find_all().await.unwrap();
        assert_eq!(catalog[0].stock, 1);
    }

    #[tokio::test]
    async fn test_failed_write_leaves_cache_untouched() {
        let inner = FlakyRepository::new().with_book(book(1, 5));
        let repo = CachedBookRepository::new(inner);

        // Warm the per-id entry, then change what the store would return.
        repo.find_by_id(1).await.unwrap();
        repo.inner().books.lock().unwrap().get_mut(&1).unwrap().stock = 99;

        repo.inner().fail_writes.store(true, AtomicOrdering::SeqCst);

        let err = repo
            .save(&ficciones())
            .await
            .unwrap_err();
        assert!(err.is_unavailable());
        assert!(repo.sell(1, 1).await.is_err());
        assert!(repo.update_stock(1, 7).await.is_err());

        // Cache was not invalidated by the failed writes: the stale-but-
        // consistent pre-call entry is still served.
        assert_eq!(repo.find_by_id(1).await.unwrap().unwrap().stock, 5);
    }

    #[tokio::test]
    async fn test_concurrent_sell_one_success() {
        // stock = 1, two concurrent sellers: exactly one success.
        let repo = Arc::new(cached_repo().await);
        let mut fixture = ficciones();
        fixture.stock = 1;
        let saved = repo.save(&fixture).await.unwrap();

        let a = tokio::spawn({
            let repo = Arc::clone(&repo);
            async move { repo.sell(saved.id, 1).await }
        });
        let b = tokio::spawn({
            let repo = Arc::clone(&repo);
            async move { repo.sell(saved.id, 1).await }
        });

        let results = [a.await.unwrap(), b.await.unwrap()];
        let successes = results.iter().filter(|r| r.is_ok()).count();
        let rejections = results
            .iter()
            .filter(|r| {
                matches!(
                    r,
                    Err(DbError::Domain(CoreError::InsufficientStock { .. }))
                )
            })
            .count();

        assert_eq!(successes, 1);
        assert_eq!(rejections, 1);

        // Final stock is zero, never negative.
        let final_stock = repo.find_by_id(saved.id).await.unwrap().unwrap().stock;
        assert_eq!(final_stock, 0);
    }

    #[tokio::test]
    async fn test_sell_non_positive_quantity_does_not_inflate_stock() {
        let repo = cached_repo().await;
        let saved = repo.save(&ficciones()).await.unwrap();
        assert_eq!(saved.stock, 3);

        // stock - (-5) would add copies; both quantities must be rejected.
        for qty in [0, -5] {
            let err = repo.sell(saved.id, qty).await.unwrap_err();
            assert!(matches!(err, DbError::Domain(CoreError::Validation(_))));
        }

        assert_eq!(repo.find_by_id(saved.id).await.unwrap().unwrap().stock, 3);
        let raw = repo.inner().find_by_id(saved.id).await.unwrap().unwrap();
        assert_eq!(raw.stock, 3);
    }

    #[tokio::test]
    async fn test_racing_populate_cannot_resurrect_stale_data() {
        let inner = RacingRepository {
            store: FlakyRepository::new().with_book(book(1, 5)),
            decorator: OnceLock::new(),
            race_once: AtomicBool::new(true),
        };
        let repo = Arc::new(CachedBookRepository::new(inner));
        let _ = repo.inner().decorator.set(Arc::downgrade(&repo));

        // The miss-path fetch returns the pre-write row while the
        // interleaved write invalidates; the caller still sees the value
        // it fetched, but the populate must be dropped.
        let seen = repo.find_by_id(1).await.unwrap().unwrap();
        assert_eq!(seen.stock, 5);
        assert_eq!(repo.cached_entries(), 0);

        // The next read refetches and observes the committed write
        // instead of a resurrected stale entry.
        let fresh = repo.find_by_id(1).await.unwrap().unwrap();
        assert_eq!(fresh.stock, 42);
    }

    #[tokio::test]
    async fn test_delete_and_remove_all_invalidate() {
        let repo = cached_repo().await;
        let saved = repo.save(&ficciones()).await.unwrap();
        repo.find_all().await.unwrap();
        repo.find_by_id(saved.id).await.unwrap();
        assert!(repo.cached_entries() > 0);

        repo.delete(saved.id).await.unwrap();
        assert!(repo.find_by_id(saved.id).await.unwrap().is_none());

        repo.remove_all().await.unwrap();
        assert_eq!(repo.cached_entries(), 0);
        assert!(repo.find_all().await.unwrap().is_empty());
    }
}
