//! In-memory document store.
//!
//! Each [`Collection`] holds one document type in a `HashMap` behind a
//! [`tokio::sync::RwLock`]. Reads clone documents out, so callers never
//! hold a lock across an `.await`. Writes run under the collection's
//! write lock, which gives single-document atomicity and lets
//! [`Collection::insert_unless`] check and insert in one step.

use std::collections::HashMap;
use std::collections::hash_map::Values;
use std::hash::Hash;

use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Arena, ArenaId, Booking, BookingId, Match, MatchId, Review, ReviewId, Team, TeamId};

/// Failures of the document store itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// No document of `kind` has the given id.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Document kind, e.g. `"arena"`.
        kind: &'static str,
        /// Requested identifier.
        id: Uuid,
    },

    /// A document with the same id is already stored.
    #[error("{kind} {id} already exists")]
    Duplicate {
        /// Document kind.
        kind: &'static str,
        /// Clashing identifier.
        id: Uuid,
    },
}

/// A document stored in a [`Collection`].
pub trait Document: Clone + Send + Sync {
    /// Typed identifier of the document.
    type Id: Copy + Eq + Hash + Send + Sync + Into<Uuid>;

    /// Kind name used in not-found errors.
    const KIND: &'static str;

    /// Returns the document's identifier.
    fn id(&self) -> Self::Id;
}

macro_rules! document {
    ($ty:ty, $id:ty, $kind:literal) => {
        impl Document for $ty {
            type Id = $id;
            const KIND: &'static str = $kind;

            fn id(&self) -> Self::Id {
                self.id
            }
        }
    };
}

document!(Arena, ArenaId, "arena");
document!(Booking, BookingId, "booking");
document!(Review, ReviewId, "review");
document!(Team, TeamId, "team");
document!(Match, MatchId, "match");

/// A keyed set of documents of one type.
#[derive(Debug)]
pub struct Collection<D: Document> {
    docs: RwLock<HashMap<D::Id, D>>,
}

impl<D: Document> Collection<D> {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self {
            docs: RwLock::new(HashMap::new()),
        }
    }

    /// Inserts a new document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Duplicate`] if a document with the same id
    /// already exists.
    pub async fn insert(&self, doc: D) -> Result<D::Id, StoreError> {
        let id = doc.id();
        let mut map = self.docs.write().await;
        if map.contains_key(&id) {
            return Err(StoreError::Duplicate {
                kind: D::KIND,
                id: id.into(),
            });
        }
        map.insert(id, doc);
        Ok(id)
    }

    /// Inserts `doc` unless `clashes` reports a conflict with the current
    /// contents. Both happen under one write lock, so no concurrent writer
    /// can slip a clashing document in between.
    ///
    /// Returns `None` if the document was rejected.
    pub async fn insert_unless<P>(&self, doc: D, clashes: P) -> Option<D::Id>
    where
        P: FnOnce(Values<'_, D::Id, D>) -> bool,
    {
        let id = doc.id();
        let mut map = self.docs.write().await;
        if map.contains_key(&id) || clashes(map.values()) {
            return None;
        }
        map.insert(id, doc);
        Some(id)
    }

    /// Returns a copy of the document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no document has the given id.
    pub async fn get(&self, id: D::Id) -> Result<D, StoreError> {
        self.docs
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found::<D>(id))
    }

    /// Applies `change` to a copy of the document and writes it back only
    /// if `change` succeeds. Returns the stored document and the closure's
    /// output.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] (converted into `E`) if no document
    /// has the given id, or whatever `change` returns. On error the stored
    /// document is untouched.
    pub async fn update<R, E, F>(&self, id: D::Id, change: F) -> Result<(D, R), E>
    where
        F: FnOnce(&mut D) -> Result<R, E>,
        E: From<StoreError>,
    {
        let mut map = self.docs.write().await;
        let slot = map.get_mut(&id).ok_or_else(|| not_found::<D>(id))?;
        let mut draft = slot.clone();
        let output = change(&mut draft)?;
        *slot = draft.clone();
        Ok((draft, output))
    }

    /// Removes a document, returning it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no document has the given id.
    pub async fn remove(&self, id: D::Id) -> Result<D, StoreError> {
        self.docs
            .write()
            .await
            .remove(&id)
            .ok_or_else(|| not_found::<D>(id))
    }

    /// Returns copies of all documents accepted by `keep`.
    pub async fn filter<F>(&self, keep: F) -> Vec<D>
    where
        F: Fn(&D) -> bool,
    {
        self.docs
            .read()
            .await
            .values()
            .filter(|doc| keep(doc))
            .cloned()
            .collect()
    }

    /// Returns `true` if any document satisfies `predicate`.
    pub async fn any<F>(&self, predicate: F) -> bool
    where
        F: Fn(&D) -> bool,
    {
        self.docs.read().await.values().any(predicate)
    }

    /// Returns the number of documents.
    pub async fn len(&self) -> usize {
        self.docs.read().await.len()
    }

    /// Returns `true` if the collection is empty.
    pub async fn is_empty(&self) -> bool {
        self.docs.read().await.is_empty()
    }
}

fn not_found<D: Document>(id: D::Id) -> StoreError {
    StoreError::NotFound {
        kind: D::KIND,
        id: id.into(),
    }
}

impl<D: Document> Default for Collection<D> {
    fn default() -> Self {
        Self::new()
    }
}

/// All document collections of the service.
#[derive(Debug, Default)]
pub struct Store {
    /// Arena listings.
    pub arenas: Collection<Arena>,
    /// Bookings.
    pub bookings: Collection<Booking>,
    /// Reviews.
    pub reviews: Collection<Review>,
    /// Teams.
    pub teams: Collection<Team>,
    /// Matches.
    pub matches: Collection<Match>,
}

impl Store {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}
