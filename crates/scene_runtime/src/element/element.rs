//! Base element type and its shared-ownership handle
//!
//! An element is the unit of the graph: named, capability-tagged, optionally
//! disposed, carrying an attribute map. Elements are only ever reached
//! through [`ElementHandle`], which shares ownership of the underlying data;
//! an element stays alive for as long as any handle to it exists, even after
//! it has been disposed. Parent and scene links are non-owning and are
//! revalidated on every access rather than trusted.
//!
//! Structural mutation (attach, detach, rename, dispose) is crate-internal:
//! it is only reachable through the owning [`Scene`](crate::scene::Scene).

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

use crate::error::SceneError;
use crate::foundation::{ScenePath, TypedValue, Value, ROOT_NAME};
use crate::scene::{Scene, SceneWeak};

use super::{ChildCollection, ContainerHandle, ElementKind};

pub(crate) struct ElementData {
    name: String,
    kind: ElementKind,
    parent: Weak<RwLock<ElementData>>,
    // Set on scene roots only; everything else reaches its scene via `root`.
    scene: SceneWeak,
    attributes: HashMap<String, TypedValue>,
    attribute_order: Vec<String>,
    children: ChildCollection,
    connections: Vec<Weak<RwLock<ElementData>>>,
}

/// Shared-ownership handle to an element.
///
/// Clones are cheap and refer to the same element; the element's lifetime is
/// the maximum lifetime across all outstanding handles. A handle remains
/// valid after its referent is disposed; only [`is_disposed`] distinguishes
/// a disposed-but-alive element from a live one. Handles compare and hash by
/// referent identity.
///
/// Handle copies and drops are thread-safe; traversing or mutating the graph
/// concurrently is not and must be serialized by the caller.
///
/// [`is_disposed`]: ElementHandle::is_disposed
#[derive(Clone)]
pub struct ElementHandle {
    inner: Arc<RwLock<ElementData>>,
}

impl ElementHandle {
    /// Create a detached element with the given capabilities.
    ///
    /// The lifecycle bit is not a constructor input and is ignored if set.
    pub fn new(kind: ElementKind, name: &str) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ElementData {
                name: name.to_string(),
                kind: kind.live(),
                parent: Weak::new(),
                scene: Weak::new(),
                attributes: HashMap::new(),
                attribute_order: Vec::new(),
                children: ChildCollection::new(),
                connections: Vec::new(),
            })),
        }
    }

    pub(crate) fn new_root(scene: SceneWeak) -> Self {
        let root = Self::new(ElementKind::CONTAINER, ROOT_NAME);
        root.write().scene = scene;
        root
    }

    fn read(&self) -> RwLockReadGuard<'_, ElementData> {
        self.inner.read().unwrap()
    }

    fn write(&self) -> RwLockWriteGuard<'_, ElementData> {
        self.inner.write().unwrap()
    }

    /// Element name.
    pub fn name(&self) -> String {
        self.read().name.clone()
    }

    pub(crate) fn set_name(&self, name: &str) {
        self.write().name = name.to_string();
    }

    /// Capability set, including the lifecycle bit.
    pub fn kind(&self) -> ElementKind {
        self.read().kind
    }

    /// True while the element is soft-deleted.
    pub fn is_disposed(&self) -> bool {
        self.read().kind.contains(ElementKind::DISPOSED)
    }

    pub(crate) fn set_disposed(&self, state: bool) {
        let mut data = self.write();
        if state {
            data.kind.insert(ElementKind::DISPOSED);
        } else {
            data.kind.remove(ElementKind::DISPOSED);
        }
    }

    /// True when the element's live capabilities intersect `kind`.
    pub fn is_compatible(&self, kind: ElementKind) -> bool {
        self.kind().compatible(kind)
    }

    /// True when the element satisfies `kind`. Alias of [`is_compatible`]
    /// kept for call sites that read as type queries.
    ///
    /// [`is_compatible`]: ElementHandle::is_compatible
    pub fn is_a(&self, kind: ElementKind) -> bool {
        self.is_compatible(kind)
    }

    fn check_cast(&self, expected: ElementKind) -> Result<(), SceneError> {
        let data = self.read();
        if data.kind.contains(ElementKind::DISPOSED) {
            return Err(SceneError::Disposed {
                name: data.name.clone(),
            });
        }
        if !data.kind.compatible(expected) {
            return Err(SceneError::IncompatibleCast {
                name: data.name.clone(),
                expected,
            });
        }
        Ok(())
    }

    /// Checked downcast to a container view.
    ///
    /// Fails with a State-class error when the element is disposed and a
    /// TypeMismatch-class error when it lacks the `CONTAINER` capability.
    pub fn as_container(&self) -> Result<ContainerHandle, SceneError> {
        self.check_cast(ElementKind::CONTAINER)?;
        Ok(ContainerHandle::from_checked(self.clone()))
    }

    /// The parent container, while attached.
    pub fn parent(&self) -> Option<ElementHandle> {
        self.read().parent.upgrade().map(|inner| Self { inner })
    }

    pub(crate) fn set_parent(&self, parent: Option<&ElementHandle>) {
        self.write().parent = parent.map_or_else(Weak::new, |p| Arc::downgrade(&p.inner));
    }

    /// The topmost ancestor; the element itself when detached.
    pub fn root(&self) -> ElementHandle {
        let mut current = self.clone();
        while let Some(parent) = current.parent() {
            current = parent;
        }
        current
    }

    /// The owning scene, reached through the root's back-reference.
    pub fn scene(&self) -> Option<Scene> {
        let weak = self.root().read().scene.clone();
        weak.upgrade().map(Scene::from_inner)
    }

    /// Path of the element from the top of its parent chain.
    ///
    /// Attached elements are addressed from their scene's root; for a
    /// detached chain the topmost element contributes the first segment.
    pub fn path(&self) -> ScenePath {
        let mut names = Vec::new();
        let mut current = self.clone();
        while let Some(parent) = current.parent() {
            names.push(current.name());
            current = parent;
        }
        let top = current.name();
        if top != ROOT_NAME {
            names.push(top);
        }
        let mut path = ScenePath::root();
        for name in names.iter().rev() {
            path.push(name);
        }
        path
    }

    // ------------------------------------------------------------------
    // Attributes
    // ------------------------------------------------------------------

    /// Create an attribute with the default payload for `type_name`.
    ///
    /// Returns the existing value when one is already stored under `name`
    /// with the same type; fails with a TypeMismatch-class error when the
    /// types differ and a NotSupported-class error for an unknown type name.
    pub fn create_attribute(
        &self,
        name: &str,
        type_name: &str,
    ) -> Result<TypedValue, SceneError> {
        let mut data = self.write();
        if let Some(existing) = data.attributes.get(name) {
            if existing.type_name() == type_name {
                return Ok(existing.clone());
            }
            return Err(SceneError::AttributeTypeMismatch {
                name: name.to_string(),
                existing: existing.type_name().to_string(),
                requested: type_name.to_string(),
            });
        }
        let value = TypedValue::new(type_name).ok_or_else(|| SceneError::UnknownValueType {
            type_name: type_name.to_string(),
        })?;
        data.attributes.insert(name.to_string(), value.clone());
        data.attribute_order.push(name.to_string());
        Ok(value)
    }

    /// Attribute stored under `name`, without a type check.
    pub fn attribute(&self, name: &str) -> Option<TypedValue> {
        self.read().attributes.get(name).cloned()
    }

    /// Attribute stored under `name`, absent unless its type matches
    /// `type_name` exactly.
    pub fn attribute_with_type(&self, name: &str, type_name: &str) -> Option<TypedValue> {
        self.read()
            .attributes
            .get(name)
            .filter(|value| value.type_name() == type_name)
            .cloned()
    }

    /// Overwrite the payload of an existing attribute.
    ///
    /// Fails with a NotFound-class error when no attribute is stored under
    /// `name` and a TypeMismatch-class error when the payload shape differs
    /// from the stored one.
    pub fn set_attribute(&self, name: &str, value: Value) -> Result<(), SceneError> {
        let mut data = self.write();
        let element = data.name.clone();
        let Some(stored) = data.attributes.get_mut(name) else {
            return Err(SceneError::AttributeNotFound {
                element,
                name: name.to_string(),
            });
        };
        if !stored.value().same_shape(&value) {
            return Err(SceneError::AttributeTypeMismatch {
                name: name.to_string(),
                existing: stored.type_name().to_string(),
                requested: value.shape_name().to_string(),
            });
        }
        stored.set_value(value);
        Ok(())
    }

    /// Remove the attribute stored under `name`. Removing an absent
    /// attribute is a no-op.
    pub fn remove_attribute(&self, name: &str) {
        let mut data = self.write();
        if data.attributes.remove(name).is_some() {
            data.attribute_order.retain(|n| n != name);
        }
    }

    /// Attribute names in insertion order.
    pub fn attribute_names(&self) -> Vec<String> {
        self.read().attribute_order.clone()
    }

    /// Attribute name/value pairs in insertion order.
    pub fn attributes(&self) -> Vec<(String, TypedValue)> {
        let data = self.read();
        data.attribute_order
            .iter()
            .filter_map(|name| {
                data.attributes
                    .get(name)
                    .map(|value| (name.clone(), value.clone()))
            })
            .collect()
    }

    pub(crate) fn insert_attribute(&self, name: &str, value: TypedValue) {
        let mut data = self.write();
        if data.attributes.insert(name.to_string(), value).is_none() {
            data.attribute_order.push(name.to_string());
        }
    }

    // ------------------------------------------------------------------
    // Children and connections (crate-internal structural surface)
    // ------------------------------------------------------------------

    pub(crate) fn with_children<R>(&self, f: impl FnOnce(&ChildCollection) -> R) -> R {
        f(&self.read().children)
    }

    pub(crate) fn with_children_mut<R>(&self, f: impl FnOnce(&mut ChildCollection) -> R) -> R {
        f(&mut self.write().children)
    }

    /// True when the element is a port with at least one live connection.
    pub fn is_connected(&self) -> bool {
        self.read()
            .connections
            .iter()
            .any(|peer| peer.upgrade().is_some())
    }

    pub(crate) fn add_connection(&self, peer: &ElementHandle) {
        self.write().connections.push(Arc::downgrade(&peer.inner));
    }

    pub(crate) fn remove_connection(&self, peer: &ElementHandle) {
        let target = Arc::downgrade(&peer.inner);
        self.write()
            .connections
            .retain(|existing| !existing.ptr_eq(&target));
    }

    // ------------------------------------------------------------------
    // Lifecycle recursion (used by Scene)
    // ------------------------------------------------------------------

    pub(crate) fn set_disposed_recursive(&self, state: bool) {
        self.set_disposed(state);
        let children: Vec<ElementHandle> =
            self.with_children(|c| c.iter().cloned().collect());
        for child in children {
            child.set_disposed_recursive(state);
        }
    }

    /// First connected port in the subtree, depth-first, or `None`.
    pub(crate) fn first_connected_port(&self) -> Option<ElementHandle> {
        if self.is_a(ElementKind::INPUT | ElementKind::OUTPUT) && self.is_connected() {
            return Some(self.clone());
        }
        let children: Vec<ElementHandle> =
            self.with_children(|c| c.iter().cloned().collect());
        children.iter().find_map(ElementHandle::first_connected_port)
    }

    /// Irreversibly strip the subtree, children first. Each node keeps its
    /// name and kind but loses attributes, children, connections and parent
    /// link, and reads as disposed through any outstanding handle.
    pub(crate) fn destroy_recursive(&self) {
        let children: Vec<ElementHandle> =
            self.with_children(|c| c.iter().cloned().collect());
        for child in children {
            child.destroy_recursive();
        }
        let mut data = self.write();
        data.kind.insert(ElementKind::DISPOSED);
        data.children.clear();
        data.attributes.clear();
        data.attribute_order.clear();
        data.connections.clear();
        data.parent = Weak::new();
    }
}

impl PartialEq for ElementHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for ElementHandle {}

impl Hash for ElementHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Arc::as_ptr(&self.inner), state);
    }
}

impl fmt::Debug for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // try_read: Debug must not block when the element is locked.
        match self.inner.try_read() {
            Ok(data) => f
                .debug_struct("ElementHandle")
                .field("name", &data.name)
                .field("kind", &data.kind)
                .finish_non_exhaustive(),
            Err(_) => f.write_str("ElementHandle(<locked>)"),
        }
    }
}
