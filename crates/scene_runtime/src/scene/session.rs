//! Session: top-level owner of configuration, registry and scenes

use std::collections::HashMap;

use crate::config::SessionConfig;
use crate::error::SceneError;

use super::factory::CreateRegistry;
use super::Scene;

/// Top-level context owning the creation registry and the scenes created
/// through it.
///
/// Everything the creation chain consults lives here. Nothing is process
/// global, so dispatch is deterministic and sessions can coexist in one
/// process (and in tests) without touching each other.
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    registry: CreateRegistry,
    scenes: HashMap<String, Scene>,
    order: Vec<String>,
}

impl Session {
    /// Create a session with the given configuration.
    pub fn new(config: SessionConfig) -> Self {
        log::info!("starting session '{}'", config.name);
        Self {
            config,
            registry: CreateRegistry::new(),
            scenes: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The creation registry.
    pub fn registry(&self) -> &CreateRegistry {
        &self.registry
    }

    /// Mutable access to the creation registry.
    pub fn registry_mut(&mut self) -> &mut CreateRegistry {
        &mut self.registry
    }

    /// Create and register a scene.
    ///
    /// Scenes named in the configuration's `implicit_references` and
    /// already present in the session are referenced by the new scene
    /// automatically; names that are not present are skipped with a
    /// warning. Fails with a Conflict-class error when `name` is taken.
    pub fn create_scene(&mut self, name: &str) -> Result<Scene, SceneError> {
        if self.scenes.contains_key(name) {
            return Err(SceneError::DuplicateScene {
                name: name.to_string(),
            });
        }
        let scene = Scene::new(name);
        for library in &self.config.implicit_references {
            // Skips the scene itself and duplicate config entries.
            if library == name || scene.reference(library).is_some() {
                continue;
            }
            if let Some(target) = self.scenes.get(library) {
                scene.add_reference(target)?;
            } else {
                log::warn!(
                    "implicit reference '{library}' is not registered in session '{}'",
                    self.config.name
                );
            }
        }
        self.scenes.insert(name.to_string(), scene.clone());
        self.order.push(name.to_string());
        log::info!("created scene '{name}' in session '{}'", self.config.name);
        Ok(scene)
    }

    /// Scene registered under `name`.
    pub fn scene(&self, name: &str) -> Option<Scene> {
        self.scenes.get(name).cloned()
    }

    /// Scene names in creation order.
    pub fn scene_names(&self) -> &[String] {
        &self.order
    }

    /// Drop the scene registered under `name`.
    ///
    /// The scene object stays alive while other scenes reference it; a
    /// non-zero reference count is reported but not enforced. Fails with a
    /// NotFound-class error for an unknown name.
    pub fn remove_scene(&mut self, name: &str) -> Result<(), SceneError> {
        let Some(scene) = self.scenes.remove(name) else {
            return Err(SceneError::SceneNotFound {
                name: name.to_string(),
            });
        };
        self.order.retain(|existing| existing != name);
        let referrers = scene.self_ref_count();
        if referrers > 0 {
            log::warn!("removing scene '{name}' while {referrers} scene(s) still reference it");
        }
        Ok(())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn scene_names_keep_creation_order() {
        let mut session = Session::default();
        session.create_scene("b").unwrap();
        session.create_scene("a").unwrap();
        assert_eq!(session.scene_names(), ["b", "a"]);
        assert!(session.scene("a").is_some());
        assert!(session.scene("missing").is_none());
    }

    #[test]
    fn duplicate_scene_names_are_rejected() {
        let mut session = Session::default();
        session.create_scene("main").unwrap();
        let err = session.create_scene("main").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[test]
    fn implicit_references_are_wired_in_config_order() {
        let mut session = Session::new(SessionConfig {
            name: "test".to_string(),
            implicit_references: vec!["stdlib".to_string(), "assets".to_string()],
        });
        // Created before the libraries exist: nothing to wire.
        let early = session.create_scene("early").unwrap();
        assert_eq!(early.num_references(), 0);

        let stdlib = session.create_scene("stdlib").unwrap();
        let assets = session.create_scene("assets").unwrap();
        // A library never implicitly references itself.
        assert_eq!(stdlib.num_references(), 0);
        assert_eq!(assets.num_references(), 1);

        let main = session.create_scene("main").unwrap();
        let references = main.references();
        assert_eq!(references.len(), 2);
        assert_eq!(references[0], stdlib);
        assert_eq!(references[1], assets);
        assert_eq!(stdlib.self_ref_count(), 2);
    }

    #[test]
    fn remove_scene_reports_unknown_names() {
        let mut session = Session::default();
        session.create_scene("main").unwrap();
        session.remove_scene("main").unwrap();
        let err = session.remove_scene("main").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(session.scene_names().is_empty());
    }
}
