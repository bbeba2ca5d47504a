//! Scenes: root ownership, composition and lifecycle
//!
//! A scene owns one root container and an ordered list of referenced
//! scenes. All structural mutation (creation, removal, disposal,
//! restoration, renaming, reparenting, reference management) goes through
//! the scene; elements are never restructured through a detached handle.
//!
//! Every operation validates its preconditions before touching the graph,
//! so a failed call leaves the scene unchanged.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

use crate::element::{ContainerHandle, ElementHandle, ElementKind};
use crate::error::SceneError;
use crate::foundation::ScenePath;

use super::factory::{instantiate_definition, CreateRegistry};
use super::iterator::{ComposedIterator, ElementPredicate};

pub(crate) type SceneWeak = Weak<RwLock<SceneData>>;

pub(crate) struct SceneData {
    name: String,
    root: ElementHandle,
    references: Vec<Scene>,
    // Referent identities of `references`, for O(1) duplicate detection.
    reference_set: HashSet<usize>,
    self_ref_count: usize,
}

/// A named owner of one root container plus an ordered list of referenced
/// scenes.
///
/// `Scene` is a shared handle: clones refer to the same scene, and a scene
/// referenced by several others is co-owned by all of them. Reference
/// counting on the handle is thread-safe; structural mutation and traversal
/// are serialized by the caller.
#[derive(Clone)]
pub struct Scene {
    inner: Arc<RwLock<SceneData>>,
}

impl Scene {
    /// Create an empty scene with the given name.
    pub fn new(name: &str) -> Self {
        let inner = Arc::new_cyclic(|weak: &SceneWeak| {
            RwLock::new(SceneData {
                name: name.to_string(),
                root: ElementHandle::new_root(weak.clone()),
                references: Vec::new(),
                reference_set: HashSet::new(),
                self_ref_count: 0,
            })
        });
        log::debug!("created scene '{name}'");
        Self { inner }
    }

    pub(crate) fn from_inner(inner: Arc<RwLock<SceneData>>) -> Self {
        Self { inner }
    }

    fn read(&self) -> RwLockReadGuard<'_, SceneData> {
        self.inner.read().unwrap()
    }

    fn write(&self) -> RwLockWriteGuard<'_, SceneData> {
        self.inner.write().unwrap()
    }

    fn id(&self) -> usize {
        Arc::as_ptr(&self.inner) as usize
    }

    /// Scene name.
    pub fn name(&self) -> String {
        self.read().name.clone()
    }

    /// The root container.
    pub fn root(&self) -> ContainerHandle {
        ContainerHandle::from_checked(self.read().root.clone())
    }

    /// Number of scenes currently referencing this one.
    ///
    /// Tracked for diagnostics; no operation consults it to block anything.
    pub fn self_ref_count(&self) -> usize {
        self.read().self_ref_count
    }

    // ------------------------------------------------------------------
    // Path resolution
    // ------------------------------------------------------------------

    /// Resolve `path` in this scene only.
    ///
    /// The empty path resolves to nothing; a one-segment path resolves to
    /// the root. Resolution fails as soon as any segment fails.
    pub fn element_at_path_local(&self, path: &ScenePath) -> Option<ElementHandle> {
        if path.is_empty() {
            return None;
        }
        let mut current = self.read().root.clone();
        for index in 1..path.len() {
            let segment = path.get(index)?;
            current = current.with_children(|c| c.find(segment))?;
        }
        Some(current)
    }

    /// Resolve `path` locally first, then through the referenced scenes in
    /// insertion order, recursively through their own references.
    pub fn element_at_path(&self, path: &ScenePath) -> Option<ElementHandle> {
        if let Some(found) = self.element_at_path_local(path) {
            return Some(found);
        }
        let references: Vec<Scene> = self.read().references.clone();
        references
            .iter()
            .find_map(|reference| reference.element_at_path(path))
    }

    // ------------------------------------------------------------------
    // Creation
    // ------------------------------------------------------------------

    /// Create an element of `type_name` named `name` under `parent_path`.
    ///
    /// The parent is resolved in this scene only. Creation then dispatches
    /// through a three-step chain, each step consulted only when the
    /// previous yielded nothing: a registered creator function, a
    /// registered reusable definition, and finally a definition resolved by
    /// treating `type_name` as a path through this scene and its
    /// references. The requested name is disambiguated against the
    /// parent's existing children before dispatch.
    pub fn create_element(
        &self,
        parent_path: &ScenePath,
        name: &str,
        type_name: &str,
        registry: &CreateRegistry,
    ) -> Result<ElementHandle, SceneError> {
        let parent = self
            .element_at_path_local(parent_path)
            .ok_or_else(|| SceneError::PathNotFound {
                path: parent_path.to_string(),
            })?
            .as_container()?;

        let unique = parent.make_unique_child_name(name);
        let element = if let Some(create) = registry.creator(type_name) {
            create(type_name, &unique, &parent)?
        } else if let Some(definition) = registry.definition(type_name) {
            instantiate_definition(&definition, &unique)?
        } else {
            let definition = self
                .element_at_path(&ScenePath::new(type_name))
                .filter(|candidate| candidate.is_a(ElementKind::DEFINITION))
                .ok_or_else(|| SceneError::UnknownElementType {
                    type_name: type_name.to_string(),
                })?;
            instantiate_definition(&definition, &unique)?
        };

        parent.attach_child(&element);
        log::debug!(
            "created '{}' of type '{type_name}' in scene '{}'",
            element.path(),
            self.name()
        );
        Ok(element)
    }

    /// Create an element at `path`, deriving the parent path and element
    /// name from its segments.
    pub fn create_element_at(
        &self,
        path: &ScenePath,
        type_name: &str,
        registry: &CreateRegistry,
    ) -> Result<ElementHandle, SceneError> {
        if path.len() < 2 {
            return Err(SceneError::PathNotFound {
                path: path.to_string(),
            });
        }
        self.create_element(&path.parent(), path.name(), type_name, registry)
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Resolve a path to an element that may be restructured: anything in
    /// this scene except the root.
    fn resolve_owned(
        &self,
        path: &ScenePath,
    ) -> Result<(ElementHandle, ContainerHandle), SceneError> {
        let element =
            self.element_at_path_local(path)
                .ok_or_else(|| SceneError::PathNotFound {
                    path: path.to_string(),
                })?;
        let parent = element.parent().ok_or(SceneError::RootImmutable)?;
        Ok((element, ContainerHandle::from_checked(parent)))
    }

    /// Irreversibly destroy the subtree at `path` and detach it from its
    /// parent.
    ///
    /// Fails with a NotFound-class error when the path does not resolve and
    /// a State-class error when it resolves to the root. Outstanding
    /// handles into the subtree stay valid but read as disposed husks.
    pub fn remove_element(&self, path: &ScenePath) -> Result<(), SceneError> {
        let (element, parent) = self.resolve_owned(path)?;
        parent.detach_child(&element.name());
        element.destroy_recursive();
        log::debug!("removed '{path}' from scene '{}'", self.name());
        Ok(())
    }

    /// Soft-delete the subtree at `path`: mark it disposed, detach it from
    /// its parent, keep it alive for a later [`restore_element`].
    ///
    /// Fails with a NotFound-class error when the path does not resolve, a
    /// State-class error when it resolves to the root, and a Conflict-class
    /// error naming the first connected port found anywhere in the subtree.
    /// The connection check runs to completion before any mutation.
    ///
    /// [`restore_element`]: Scene::restore_element
    pub fn dispose_element(&self, path: &ScenePath) -> Result<(), SceneError> {
        let (element, parent) = self.resolve_owned(path)?;
        if let Some(port) = element.first_connected_port() {
            return Err(SceneError::ConnectedPort { port: port.name() });
        }
        element.set_disposed_recursive(true);
        parent.detach_child(&element.name());
        log::debug!("disposed '{path}' in scene '{}'", self.name());
        Ok(())
    }

    /// Revive a disposed subtree under the container at `parent_path`.
    ///
    /// Fails with a State-class error when the element is not disposed and
    /// a NotFound-class error when the parent path does not resolve.
    pub fn restore_element(
        &self,
        parent_path: &ScenePath,
        element: &ElementHandle,
    ) -> Result<(), SceneError> {
        if !element.is_disposed() {
            return Err(SceneError::NotDisposed {
                name: element.name(),
            });
        }
        let parent = self
            .element_at_path_local(parent_path)
            .ok_or_else(|| SceneError::PathNotFound {
                path: parent_path.to_string(),
            })?
            .as_container()?;
        element.set_disposed_recursive(false);
        parent.attach_child(element);
        log::debug!("restored '{}' in scene '{}'", element.path(), self.name());
        Ok(())
    }

    /// Rename the element at `path`, returning the final name.
    ///
    /// A colliding name never fails; the final name is derived from
    /// `new_name` by numeric suffixing. The root cannot be renamed.
    pub fn rename_element(&self, path: &ScenePath, new_name: &str) -> Result<String, SceneError> {
        let (element, parent) = self.resolve_owned(path)?;
        let old_name = element.name();
        let final_name =
            parent
                .rename_child(&old_name, new_name)
                .ok_or_else(|| SceneError::PathNotFound {
                    path: path.to_string(),
                })?;
        log::debug!(
            "renamed '{path}' to '{final_name}' in scene '{}'",
            self.name()
        );
        Ok(final_name)
    }

    /// Move the element at `path` under the container at `new_parent_path`,
    /// returning its (possibly disambiguated) name.
    ///
    /// Moving an element onto its current parent is a no-op that returns
    /// the current name. The root cannot be moved.
    pub fn reparent_element(
        &self,
        path: &ScenePath,
        new_parent_path: &ScenePath,
    ) -> Result<String, SceneError> {
        let (element, old_parent) = self.resolve_owned(path)?;
        let new_parent = self
            .element_at_path_local(new_parent_path)
            .ok_or_else(|| SceneError::PathNotFound {
                path: new_parent_path.to_string(),
            })?
            .as_container()?;

        if new_parent.element() == old_parent.element() {
            return Ok(element.name());
        }

        let name = element.name();
        old_parent.detach_child(&name);
        let unique = new_parent.make_unique_child_name(&name);
        element.set_name(&unique);
        new_parent.attach_child(&element);
        log::debug!(
            "reparented '{path}' under '{new_parent_path}' as '{unique}' in scene '{}'",
            self.name()
        );
        Ok(unique)
    }

    // ------------------------------------------------------------------
    // References
    // ------------------------------------------------------------------

    /// Reference `scene`, making its top-level content resolvable from this
    /// scene without copying.
    ///
    /// Fails with a Conflict-class error when the same scene object is
    /// already referenced, or when a scene is asked to reference itself.
    pub fn add_reference(&self, scene: &Scene) -> Result<(), SceneError> {
        if Arc::ptr_eq(&self.inner, &scene.inner) {
            return Err(SceneError::SelfReference { name: self.name() });
        }
        let id = scene.id();
        if self.read().reference_set.contains(&id) {
            return Err(SceneError::DuplicateReference { name: scene.name() });
        }
        scene.write().self_ref_count += 1;
        let mut data = self.write();
        data.references.push(scene.clone());
        data.reference_set.insert(id);
        log::debug!("scene '{}' now references '{}'", self.name(), scene.name());
        Ok(())
    }

    /// Drop the reference to the scene named `name`. Unknown names are
    /// ignored.
    pub fn remove_reference(&self, name: &str) {
        let position = self
            .read()
            .references
            .iter()
            .position(|reference| reference.name() == name);
        if let Some(position) = position {
            let removed = {
                let mut data = self.write();
                let removed = data.references.remove(position);
                data.reference_set.remove(&removed.id());
                removed
            };
            {
                let mut data = removed.write();
                data.self_ref_count = data.self_ref_count.saturating_sub(1);
            }
            log::debug!("scene '{}' dropped reference '{name}'", self.name());
        }
    }

    /// Drop every reference.
    pub fn remove_references(&self) {
        let drained: Vec<Scene> = {
            let mut data = self.write();
            data.reference_set.clear();
            data.references.drain(..).collect()
        };
        for reference in drained {
            let mut data = reference.write();
            data.self_ref_count = data.self_ref_count.saturating_sub(1);
        }
    }

    /// Referenced scene with the given name, by linear search.
    pub fn reference(&self, name: &str) -> Option<Scene> {
        self.read()
            .references
            .iter()
            .find(|reference| reference.name() == name)
            .cloned()
    }

    /// Snapshot of the referenced scenes in insertion order.
    pub fn references(&self) -> Vec<Scene> {
        self.read().references.clone()
    }

    /// Number of referenced scenes.
    pub fn num_references(&self) -> usize {
        self.read().references.len()
    }

    pub(crate) fn nth_root_child(&self, index: usize) -> Option<ElementHandle> {
        let root = self.read().root.clone();
        root.with_children(|c| c.at(index))
    }

    pub(crate) fn nth_reference(&self, index: usize) -> Option<Scene> {
        self.read().references.get(index).cloned()
    }

    // ------------------------------------------------------------------
    // Traversal
    // ------------------------------------------------------------------

    /// Composed traversal over this scene's root children followed by those
    /// of every referenced scene, recursively.
    pub fn traverse(&self) -> ComposedIterator {
        ComposedIterator::new(self.clone(), None)
    }

    /// Composed traversal yielding only elements accepted by `predicate`.
    pub fn traverse_filtered(&self, predicate: ElementPredicate) -> ComposedIterator {
        ComposedIterator::new(self.clone(), Some(predicate))
    }
}

impl PartialEq for Scene {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Scene {}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_read() {
            Ok(data) => f
                .debug_struct("Scene")
                .field("name", &data.name)
                .field("references", &data.references.len())
                .field("self_ref_count", &data.self_ref_count)
                .finish_non_exhaustive(),
            Err(_) => f.write_str("Scene(<locked>)"),
        }
    }
}
