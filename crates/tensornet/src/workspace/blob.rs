use std::any::{type_name, Any};
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

/// Shared handle to a named workspace slot.
///
/// Operators resolve their input and output blobs once at construction and keep these
/// handles; the workspace and every operator holding the handle observe the same value.
pub type BlobRef = Arc<RwLock<Blob>>;

/// Type-erased value cell stored under a name in a [`super::Workspace`].
#[derive(Default)]
pub struct Blob {
    value: Option<Box<dyn Any + Send + Sync>>,
    type_name: &'static str,
}

impl Blob {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when nothing has been stored yet (or after [`Blob::reset`]).
    pub fn is_empty(&self) -> bool {
        self.value.is_none()
    }

    /// Rust type name of the stored value, `"<empty>"` when unset.
    pub fn type_name(&self) -> &'static str {
        if self.value.is_some() {
            self.type_name
        } else {
            "<empty>"
        }
    }

    pub fn is<T: Any>(&self) -> bool {
        self.value.as_ref().is_some_and(|value| value.is::<T>())
    }

    pub fn get<T: Any>(&self) -> Option<&T> {
        self.value.as_ref()?.downcast_ref::<T>()
    }

    pub fn get_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.value.as_mut()?.downcast_mut::<T>()
    }

    /// Replaces the stored value, whatever its previous type.
    pub fn set<T: Any + Send + Sync>(&mut self, value: T) {
        self.value = Some(Box::new(value));
        self.type_name = type_name::<T>();
    }

    /// Takes the stored value out when it has type `T`.
    pub fn take<T: Any>(&mut self) -> Option<T> {
        if !self.is::<T>() {
            return None;
        }
        let value = self.value.take()?;
        value.downcast::<T>().ok().map(|boxed| *boxed)
    }

    pub fn reset(&mut self) {
        self.value = None;
        self.type_name = "";
    }
}

impl fmt::Debug for Blob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Blob")
            .field("type", &self.type_name())
            .finish()
    }
}
