//! Container view over elements that own children

use std::ops::Deref;

use super::{ElementHandle, ElementKind};

/// Typed view over an element carrying the `CONTAINER` capability.
///
/// Obtained through [`ElementHandle::as_container`]; construction is always
/// checked, so a value of this type refers to a container. The wrapper
/// dereferences to the untyped handle, exposing the shared element surface.
///
/// Children of a container may themselves be containers or any other element
/// kind; all kinds share one namespace per container. The public surface is
/// read-only, structural mutation goes through the owning
/// [`Scene`](crate::scene::Scene).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerHandle {
    inner: ElementHandle,
}

impl ContainerHandle {
    /// Construct a detached container element.
    pub fn new(name: &str) -> Self {
        Self {
            inner: ElementHandle::new(ElementKind::CONTAINER, name),
        }
    }

    pub(crate) fn from_checked(inner: ElementHandle) -> Self {
        Self { inner }
    }

    /// The untyped handle.
    pub fn element(&self) -> &ElementHandle {
        &self.inner
    }

    /// Number of children.
    pub fn num_children(&self) -> usize {
        self.inner.with_children(super::ChildCollection::len)
    }

    /// Child stored under `name`.
    pub fn child(&self, name: &str) -> Option<ElementHandle> {
        self.inner.with_children(|c| c.find(name))
    }

    /// Child at `index` in insertion order.
    pub fn child_at(&self, index: usize) -> Option<ElementHandle> {
        self.inner.with_children(|c| c.at(index))
    }

    /// True when a child is stored under `name`.
    pub fn has_child(&self, name: &str) -> bool {
        self.inner.with_children(|c| c.count(name) > 0)
    }

    /// Snapshot of the children in insertion order.
    pub fn children(&self) -> Vec<ElementHandle> {
        self.inner.with_children(|c| c.iter().cloned().collect())
    }

    /// Collision-free child name derived from `want`.
    pub fn make_unique_child_name(&self, want: &str) -> String {
        self.inner.with_children(|c| c.make_unique_name(want))
    }

    pub(crate) fn attach_child(&self, child: &ElementHandle) {
        child.set_parent(Some(self.element()));
        self.inner.with_children_mut(|c| c.add(child.clone()));
    }

    pub(crate) fn detach_child(&self, name: &str) -> Option<ElementHandle> {
        let removed = self.inner.with_children_mut(|c| c.remove(name))?;
        removed.set_parent(None);
        Some(removed)
    }

    pub(crate) fn rename_child(&self, old_name: &str, new_name: &str) -> Option<String> {
        self.inner
            .with_children_mut(|c| c.rename(old_name, new_name))
    }
}

impl Deref for ContainerHandle {
    type Target = ElementHandle;

    fn deref(&self) -> &ElementHandle {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attach_detach_maintains_parentage() {
        let parent = ContainerHandle::new("parent");
        let child = ElementHandle::new(ElementKind::INPUT, "in");
        parent.attach_child(&child);

        assert_eq!(parent.num_children(), 1);
        assert!(parent.has_child("in"));
        assert_eq!(child.parent(), Some(parent.element().clone()));
        assert_eq!(child.path().to_string(), "/parent/in");

        let detached = parent.detach_child("in").unwrap();
        assert_eq!(detached, child);
        assert!(child.parent().is_none());
        assert_eq!(parent.num_children(), 0);
        assert!(parent.detach_child("in").is_none());
    }

    #[test]
    fn containers_and_ports_share_one_namespace() {
        let parent = ContainerHandle::new("parent");
        parent.attach_child(ContainerHandle::new("x").element());
        let port = ElementHandle::new(ElementKind::OUTPUT, "x");
        assert_eq!(parent.make_unique_child_name(&port.name()), "x1");
    }

    #[test]
    fn children_snapshot_is_ordered() {
        let parent = ContainerHandle::new("parent");
        for name in ["c", "a", "b"] {
            parent.attach_child(ContainerHandle::new(name).element());
        }
        let names: Vec<String> = parent.children().iter().map(ElementHandle::name).collect();
        assert_eq!(names, ["c", "a", "b"]);
        assert_eq!(parent.child_at(1).unwrap().name(), "a");
    }
}
