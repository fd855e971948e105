//! In-memory managed-object store.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::SystemTime;

use kmip::{KeyBlock, Name, ObjectType, State};
use uuid::Uuid;

/// One stored cryptographic object and its lifecycle state.
///
/// Records are never removed: destruction clears the key block and parks the
/// record in `Destroyed`, so identifier lookups keep resolving instead of
/// turning into silent unknowns.
#[derive(Debug, Clone)]
pub struct ManagedObject {
    pub id: String,
    pub object_type: ObjectType,
    pub state: State,
    pub names: Vec<Name>,
    pub key_block: Option<KeyBlock>,
    pub created_at: SystemTime,
}

impl ManagedObject {
    /// A fresh `PreActive` object with a process-unique identifier.
    pub fn pre_active(object_type: ObjectType, names: Vec<Name>, key_block: KeyBlock) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            object_type,
            state: State::PreActive,
            names,
            key_block: Some(key_block),
            created_at: SystemTime::now(),
        }
    }
}

/// Thread-safe collection of managed objects keyed by identifier.
///
/// One coarse lock over the whole map: mutations take it exclusively, reads
/// shared. Read operations hand out clones, so no caller can observe a
/// half-applied mutation or hold a reference across one.
#[derive(Debug, Default)]
pub struct Repository {
    objects: RwLock<HashMap<String, ManagedObject>>,
}

impl Repository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a fully constructed object under its id. The caller guarantees
    /// id freshness by constructing via [`ManagedObject::pre_active`].
    pub fn insert(&self, object: ManagedObject) {
        let mut objects = self.objects.write().unwrap();
        objects.insert(object.id.clone(), object);
    }

    /// Point-in-time snapshot of one object.
    pub fn get(&self, id: &str) -> Option<ManagedObject> {
        let objects = self.objects.read().unwrap();
        objects.get(id).cloned()
    }

    /// Moves an object to `Active`. Returns false for unknown ids.
    ///
    /// Activation never fails on state grounds: re-activating an active
    /// object is a success, and so is activating a destroyed one, though
    /// the latter stays `Destroyed` since states never move backwards.
    pub fn activate(&self, id: &str) -> bool {
        let mut objects = self.objects.write().unwrap();
        match objects.get_mut(id) {
            Some(object) => {
                if object.state != State::Destroyed {
                    object.state = State::Active;
                }
                true
            }
            None => false,
        }
    }

    /// Moves an object to `Destroyed` and erases its key material; the
    /// record itself is retained. Returns false for unknown ids. Destroying
    /// an already-destroyed object succeeds again, clearing nothing.
    pub fn destroy(&self, id: &str) -> bool {
        let mut objects = self.objects.write().unwrap();
        match objects.get_mut(id) {
            Some(object) => {
                object.state = State::Destroyed;
                object.key_block = None; // zeroized on drop
                true
            }
            None => false,
        }
    }

    /// Identifiers of every object carrying a matching name, in no
    /// particular order.
    pub fn locate_by_name(&self, name: &str) -> Vec<String> {
        let objects = self.objects.read().unwrap();
        objects
            .values()
            .filter(|object| object.names.iter().any(|n| n.value == name))
            .map(|object| object.id.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.objects.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
