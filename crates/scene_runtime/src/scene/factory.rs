//! Element creation dispatch
//!
//! Scenes never construct domain elements themselves; they dispatch through
//! a [`CreateRegistry`]. The registry is an explicit object, owned by a
//! [`Session`](crate::scene::Session) or built standalone in tests, so
//! creation is deterministic and free of process-wide state.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::element::{ContainerHandle, ElementHandle, ElementKind};
use crate::error::SceneError;

/// Creator callback invoked as `(type_name, element_name, parent)`.
///
/// Returns a detached element; the calling scene attaches it under the
/// parent it resolved.
pub type CreatorFn =
    Arc<dyn Fn(&str, &str, &ContainerHandle) -> Result<ElementHandle, SceneError> + Send + Sync>;

/// Registry consulted by element creation.
///
/// Maps type names to creator functions and to reusable definitions. The
/// creation chain in [`Scene::create_element`](crate::scene::Scene::create_element)
/// consults creators first, then registered definitions, then definitions
/// resolved by path.
#[derive(Default)]
pub struct CreateRegistry {
    creators: HashMap<String, CreatorFn>,
    definitions: HashMap<String, ElementHandle>,
}

impl CreateRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `create` for `type_name`, replacing any previous creator.
    pub fn register_creator(&mut self, type_name: &str, create: CreatorFn) {
        self.creators.insert(type_name.to_string(), create);
    }

    /// Drop the creator registered for `type_name`, if any.
    pub fn unregister_creator(&mut self, type_name: &str) {
        self.creators.remove(type_name);
    }

    /// Creator registered for `type_name`.
    pub fn creator(&self, type_name: &str) -> Option<CreatorFn> {
        self.creators.get(type_name).cloned()
    }

    /// Register a reusable definition under `type_name`.
    ///
    /// The element must carry the `DEFINITION` capability.
    pub fn register_definition(
        &mut self,
        type_name: &str,
        definition: &ElementHandle,
    ) -> Result<(), SceneError> {
        if !definition.is_a(ElementKind::DEFINITION) {
            return Err(SceneError::IncompatibleCast {
                name: definition.name(),
                expected: ElementKind::DEFINITION,
            });
        }
        self.definitions
            .insert(type_name.to_string(), definition.clone());
        Ok(())
    }

    /// Drop the definition registered for `type_name`, if any.
    pub fn unregister_definition(&mut self, type_name: &str) {
        self.definitions.remove(type_name);
    }

    /// Definition registered for `type_name`.
    pub fn definition(&self, type_name: &str) -> Option<ElementHandle> {
        self.definitions.get(type_name).cloned()
    }
}

impl fmt::Debug for CreateRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateRegistry")
            .field("creators", &self.creators.len())
            .field("definitions", &self.definitions.len())
            .finish()
    }
}

/// Instantiate `definition` as a fresh container named `name`.
///
/// The instance mirrors the definition's interface: every port child is
/// copied over with its name, capabilities and attribute values. Non-port
/// children belong to the definition's implementation and are not copied.
/// The result is detached; the calling scene attaches it.
pub fn instantiate_definition(
    definition: &ElementHandle,
    name: &str,
) -> Result<ElementHandle, SceneError> {
    if definition.is_disposed() {
        return Err(SceneError::Disposed {
            name: definition.name(),
        });
    }
    if !definition.is_a(ElementKind::DEFINITION) {
        return Err(SceneError::IncompatibleCast {
            name: definition.name(),
            expected: ElementKind::DEFINITION,
        });
    }

    let instance = ContainerHandle::new(name);
    if definition.is_a(ElementKind::CONTAINER) {
        let ports: Vec<ElementHandle> = ContainerHandle::from_checked(definition.clone())
            .children()
            .into_iter()
            .filter(|child| child.is_a(ElementKind::INPUT | ElementKind::OUTPUT))
            .collect();
        for template in ports {
            let port = ElementHandle::new(template.kind(), &template.name());
            for (attr_name, value) in template.attributes() {
                port.insert_attribute(&attr_name, value);
            }
            instance.attach_child(&port);
        }
    }
    log::debug!(
        "instantiated '{name}' from definition '{}'",
        definition.name()
    );
    Ok(instance.element().clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::foundation::{value, Value};

    fn surface_definition() -> ElementHandle {
        let definition = ElementHandle::new(
            ElementKind::CONTAINER | ElementKind::DEFINITION,
            "ND_surface",
        );
        let container = definition.as_container().unwrap();
        let base = ElementHandle::new(ElementKind::INPUT, "base");
        base.create_attribute("default", value::FLOAT).unwrap();
        base.set_attribute("default", Value::Float(0.8)).unwrap();
        container.attach_child(&base);
        container.attach_child(&ElementHandle::new(ElementKind::OUTPUT, "out"));
        // Implementation detail, not interface:
        container.attach_child(ContainerHandle::new("impl").element());
        definition
    }

    #[test]
    fn registry_round_trip() {
        let mut registry = CreateRegistry::new();
        assert!(registry.creator("group").is_none());

        registry.register_creator(
            "group",
            Arc::new(|_, name, _| Ok(ContainerHandle::new(name).element().clone())),
        );
        assert!(registry.creator("group").is_some());
        registry.unregister_creator("group");
        assert!(registry.creator("group").is_none());

        let definition = surface_definition();
        registry
            .register_definition("ND_surface", &definition)
            .unwrap();
        assert_eq!(registry.definition("ND_surface"), Some(definition));
        registry.unregister_definition("ND_surface");
        assert!(registry.definition("ND_surface").is_none());
    }

    #[test]
    fn non_definitions_are_rejected() {
        let mut registry = CreateRegistry::new();
        let plain = ContainerHandle::new("plain");
        let err = registry
            .register_definition("plain", plain.element())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    }

    #[test]
    fn instances_mirror_the_definition_interface() {
        let definition = surface_definition();
        let instance = instantiate_definition(&definition, "surface1").unwrap();

        assert_eq!(instance.name(), "surface1");
        assert!(instance.is_a(ElementKind::CONTAINER));
        assert!(!instance.is_a(ElementKind::DEFINITION));

        let container = instance.as_container().unwrap();
        assert_eq!(container.num_children(), 2);
        let base = container.child("base").unwrap();
        assert!(base.is_a(ElementKind::INPUT));
        assert_eq!(
            base.attribute_with_type("default", value::FLOAT)
                .unwrap()
                .value(),
            &Value::Float(0.8)
        );
        assert!(container.child("out").unwrap().is_a(ElementKind::OUTPUT));
        assert!(container.child("impl").is_none());
    }

    #[test]
    fn disposed_definitions_cannot_instantiate() {
        let definition = surface_definition();
        definition.set_disposed(true);
        let err = instantiate_definition(&definition, "x").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::State);
    }
}
