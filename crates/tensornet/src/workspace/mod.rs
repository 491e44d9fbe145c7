//! Named-variable store shared by a net and every sub-net it compiles.
//!
//! A [`Workspace`] is always handled through an `Arc`. Nets and operators created from
//! the same handle alias the same blobs, so a value written by a nested net (for example
//! a branch of an `If` operator) is visible to the enclosing net afterwards. The
//! workspace is never copied when sub-nets are built.

mod blob;

use std::any::Any;
use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;

pub use blob::{Blob, BlobRef};

use crate::definition::{NetDef, OperatorDef};
use crate::error::OperatorResult;
use crate::net::{create_net, Net};
use crate::operator::registry::create_operator;

#[derive(Default)]
pub struct Workspace {
    blobs: RwLock<BTreeMap<String, BlobRef>>,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty workspace behind the shared handle nets expect.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Returns the blob named `name`, creating an empty one when absent.
    pub fn create_blob(&self, name: &str) -> BlobRef {
        if let Some(existing) = self.blobs.read().get(name) {
            return Arc::clone(existing);
        }
        let mut blobs = self.blobs.write();
        let blob = blobs.entry(name.to_string()).or_insert_with(|| {
            tracing::trace!(blob = name, "creating blob");
            Arc::new(RwLock::new(Blob::new()))
        });
        Arc::clone(blob)
    }

    pub fn get_blob(&self, name: &str) -> Option<BlobRef> {
        self.blobs.read().get(name).cloned()
    }

    pub fn has_blob(&self, name: &str) -> bool {
        self.blobs.read().contains_key(name)
    }

    /// Removes the name from the workspace. Operators still holding the handle keep it.
    pub fn remove_blob(&self, name: &str) -> bool {
        self.blobs.write().remove(name).is_some()
    }

    /// Names of every blob, sorted.
    pub fn blob_names(&self) -> Vec<String> {
        self.blobs.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.blobs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.read().is_empty()
    }

    /// Stores `value` under `name`, creating the blob if needed.
    pub fn feed_blob<T: Any + Send + Sync>(&self, name: &str, value: T) {
        self.create_blob(name).write().set(value);
    }

    /// Returns a clone of the value under `name` when it exists and has type `T`.
    pub fn fetch_blob<T: Any + Clone>(&self, name: &str) -> Option<T> {
        let blob = self.get_blob(name)?;
        let guard = blob.read();
        guard.get::<T>().cloned()
    }

    /// Builds a net bound to this workspace without running it.
    pub fn create_net(self: &Arc<Self>, def: &NetDef) -> OperatorResult<Box<dyn Net>> {
        create_net(def, self)
    }

    /// Builds and runs a net once, dropping it afterwards.
    pub fn run_net_once(self: &Arc<Self>, def: &NetDef) -> OperatorResult<bool> {
        let mut net = create_net(def, self)?;
        net.run()
    }

    /// Builds and runs a single operator once.
    pub fn run_operator_once(self: &Arc<Self>, def: &OperatorDef) -> OperatorResult<bool> {
        let mut op = create_operator(def, self)?;
        op.run()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_blob_is_idempotent_and_aliases() {
        let ws = Workspace::shared();
        let first = ws.create_blob("x");
        let second = ws.create_blob("x");
        assert!(Arc::ptr_eq(&first, &second));

        first.write().set(3_i32);
        assert_eq!(ws.fetch_blob::<i32>("x"), Some(3));
        assert_eq!(ws.len(), 1);
    }

    #[test]
    fn blob_names_are_sorted() {
        let ws = Workspace::new();
        ws.feed_blob("b", 1_i32);
        ws.feed_blob("a", 2_i32);
        assert_eq!(ws.blob_names(), vec!["a".to_string(), "b".to_string()]);
        assert!(ws.remove_blob("a"));
        assert!(!ws.remove_blob("a"));
        assert!(!ws.has_blob("a"));
    }

    #[test]
    fn fetch_blob_checks_type() {
        let ws = Workspace::new();
        ws.feed_blob("flag", true);
        assert_eq!(ws.fetch_blob::<bool>("flag"), Some(true));
        assert_eq!(ws.fetch_blob::<i32>("flag"), None);
        assert_eq!(ws.fetch_blob::<bool>("missing"), None);
    }
}
