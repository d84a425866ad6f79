//! Places and the per-kind place arenas.

use std::sync::{Mutex, RwLock};

use ep_core::{PersonId, PlaceId, PlaceKind};

use crate::sync::{lock, read, write};
use crate::{CommunityError, CommunityResult};

/// A location persons can occupy.
///
/// A place never owns persons; it only holds back-references to the persons
/// currently inside it, under its own lock.
#[derive(Debug)]
pub struct Place {
    id:        PlaceId,
    occupants: Mutex<Vec<PersonId>>,
}

impl Place {
    pub fn new(id: PlaceId) -> Self {
        Self { id, occupants: Mutex::new(Vec::new()) }
    }

    #[inline]
    pub fn id(&self) -> PlaceId {
        self.id
    }

    #[inline]
    pub fn kind(&self) -> PlaceKind {
        self.id.kind
    }

    /// Register `person` as an occupant.  Adding a present occupant is a no-op.
    pub fn add(&self, person: PersonId) {
        let mut occupants = lock(&self.occupants);
        if !occupants.contains(&person) {
            occupants.push(person);
        }
    }

    /// Remove `person`; returns `false` if it was not an occupant.
    pub fn remove(&self, person: PersonId) -> bool {
        let mut occupants = lock(&self.occupants);
        match occupants.iter().position(|&p| p == person) {
            Some(i) => {
                occupants.swap_remove(i);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, person: PersonId) -> bool {
        lock(&self.occupants).contains(&person)
    }

    /// Copy of the current occupant list, in no particular order.
    pub fn occupants(&self) -> Vec<PersonId> {
        lock(&self.occupants).clone()
    }

    pub fn occupant_count(&self) -> usize {
        lock(&self.occupants).len()
    }

    pub fn snapshot(&self) -> PlaceSnapshot {
        PlaceSnapshot { id: self.id, occupants: self.occupants() }
    }
}

/// Read-only copy of one place.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaceSnapshot {
    pub id:        PlaceId,
    pub occupants: Vec<PersonId>,
}

// ── PlaceRegistry ─────────────────────────────────────────────────────────────

/// All places of a community, one arena per [`PlaceKind`].
///
/// `PlaceId::index` is a stable index into the arena for `PlaceId::kind`;
/// arenas only grow, so handles stay valid for the community's lifetime.
#[derive(Debug, Default)]
pub struct PlaceRegistry {
    arenas: [RwLock<Vec<Place>>; PlaceKind::ALL.len()],
}

impl PlaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new place of `kind` and return its handle.
    pub fn add(&self, kind: PlaceKind) -> PlaceId {
        let mut arena = write(&self.arenas[kind.slot()]);
        let id = PlaceId::new(kind, arena.len() as u32);
        arena.push(Place::new(id));
        id
    }

    pub fn count(&self, kind: PlaceKind) -> usize {
        read(&self.arenas[kind.slot()]).len()
    }

    pub fn contains(&self, id: PlaceId) -> bool {
        (id.index as usize) < self.count(id.kind)
    }

    /// Run `f` on place `id` under the shared arena lock.
    pub fn with_place<T>(&self, id: PlaceId, f: impl FnOnce(&Place) -> T) -> CommunityResult<T> {
        let arena = read(&self.arenas[id.kind.slot()]);
        arena
            .get(id.index as usize)
            .map(f)
            .ok_or(CommunityError::UnknownPlace(id))
    }

    /// Handle of the `n`-th place of `kind`.
    ///
    /// # Panics
    /// Panics if `n` is out of range.  Callers draw `n` below
    /// [`count`](Self::count) of a kind validated as non-empty.
    pub fn nth(&self, kind: PlaceKind, n: usize) -> PlaceId {
        read(&self.arenas[kind.slot()])[n].id()
    }

    /// Handles of every place of `kind`.
    pub fn ids(&self, kind: PlaceKind) -> Vec<PlaceId> {
        read(&self.arenas[kind.slot()]).iter().map(Place::id).collect()
    }

    /// Move `person` from `from` to `to`.
    ///
    /// Each step takes only the lock of the place it touches.
    pub fn relocate(&self, person: PersonId, from: PlaceId, to: PlaceId) -> CommunityResult<()> {
        if !self.contains(to) {
            return Err(CommunityError::UnknownPlace(to));
        }
        self.with_place(from, |p| p.remove(person))?;
        self.with_place(to, |p| p.add(person))
    }

    pub fn occupants(&self, id: PlaceId) -> CommunityResult<Vec<PersonId>> {
        self.with_place(id, Place::occupants)
    }

    /// Snapshots of every place of `kind`.
    pub fn snapshots(&self, kind: PlaceKind) -> Vec<PlaceSnapshot> {
        read(&self.arenas[kind.slot()]).iter().map(Place::snapshot).collect()
    }

    /// Non-empty places of every kind except `skip`, as `(id, occupants)`.
    pub fn occupied(&self, skip: &[PlaceKind]) -> Vec<(PlaceId, Vec<PersonId>)> {
        PlaceKind::ALL
            .iter()
            .filter(|kind| !skip.contains(kind))
            .flat_map(|&kind| {
                read(&self.arenas[kind.slot()])
                    .iter()
                    .filter_map(|place| {
                        let occupants = place.occupants();
                        (!occupants.is_empty()).then(|| (place.id(), occupants))
                    })
                    .collect::<Vec<_>>()
            })
            .collect()
    }
}
