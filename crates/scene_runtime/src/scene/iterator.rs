//! Composed scene traversal

use crate::element::ElementHandle;

use super::Scene;

/// Predicate deciding whether a traversed element is yielded.
pub type ElementPredicate = Box<dyn Fn(&ElementHandle) -> bool>;

// One frame per scene being traversed: the next local child to visit and
// the next reference to descend into once the children are exhausted.
struct Frame {
    scene: Scene,
    child: usize,
    reference: usize,
}

/// Depth-first traversal over a scene's local root children followed by the
/// root children of every referenced scene, recursively, in reference
/// insertion order.
///
/// The iterator is forward-only and fused: once the frame stack empties it
/// stays terminated. Elements rejected by the predicate are skipped without
/// being observable, but traversal still visits them: filtering changes
/// what is yielded, not what is walked.
pub struct ComposedIterator {
    stack: Vec<Frame>,
    predicate: Option<ElementPredicate>,
}

impl ComposedIterator {
    pub(crate) fn new(scene: Scene, predicate: Option<ElementPredicate>) -> Self {
        Self {
            stack: vec![Frame {
                scene,
                child: 0,
                reference: 0,
            }],
            predicate,
        }
    }

    /// True once traversal has terminated.
    pub fn is_terminated(&self) -> bool {
        self.stack.is_empty()
    }
}

impl Iterator for ComposedIterator {
    type Item = ElementHandle;

    fn next(&mut self) -> Option<ElementHandle> {
        loop {
            let frame = self.stack.last_mut()?;

            if let Some(child) = frame.scene.nth_root_child(frame.child) {
                frame.child += 1;
                if self.predicate.as_ref().map_or(true, |accept| accept(&child)) {
                    return Some(child);
                }
                continue;
            }

            if let Some(reference) = frame.scene.nth_reference(frame.reference) {
                frame.reference += 1;
                self.stack.push(Frame {
                    scene: reference,
                    child: 0,
                    reference: 0,
                });
                continue;
            }

            self.stack.pop();
        }
    }
}

impl std::iter::FusedIterator for ComposedIterator {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ContainerHandle;

    fn scene_with_children(name: &str, children: &[&str]) -> Scene {
        let scene = Scene::new(name);
        let root = scene.root();
        for child in children {
            root.attach_child(ContainerHandle::new(child).element());
        }
        scene
    }

    fn visited_names(iter: ComposedIterator) -> Vec<String> {
        iter.map(|element| element.name()).collect()
    }

    #[test]
    fn local_children_come_before_references() {
        let main = scene_with_children("main", &["a", "b"]);
        let library = scene_with_children("library", &["shader1"]);
        main.add_reference(&library).unwrap();

        assert_eq!(visited_names(main.traverse()), ["a", "b", "shader1"]);
    }

    #[test]
    fn references_nest_depth_first_in_insertion_order() {
        let main = scene_with_children("main", &["m"]);
        let first = scene_with_children("first", &["f"]);
        let second = scene_with_children("second", &["s"]);
        let nested = scene_with_children("nested", &["n"]);
        first.add_reference(&nested).unwrap();
        main.add_reference(&first).unwrap();
        main.add_reference(&second).unwrap();

        // Depth-first into `first`'s own reference before `second`.
        assert_eq!(visited_names(main.traverse()), ["m", "f", "n", "s"]);
    }

    #[test]
    fn empty_referenced_scenes_still_expose_their_references() {
        let main = scene_with_children("main", &[]);
        let empty = scene_with_children("empty", &[]);
        let leaf = scene_with_children("leaf", &["deep"]);
        empty.add_reference(&leaf).unwrap();
        main.add_reference(&empty).unwrap();

        assert_eq!(visited_names(main.traverse()), ["deep"]);
    }

    #[test]
    fn predicate_skips_without_stalling() {
        let main = scene_with_children("main", &["keep", "drop", "keep2"]);
        let filtered = main.traverse_filtered(Box::new(|element| {
            !element.name().starts_with("drop")
        }));
        assert_eq!(visited_names(filtered), ["keep", "keep2"]);
    }

    #[test]
    fn iterator_is_fused() {
        let main = scene_with_children("main", &["only"]);
        let mut iter = main.traverse();
        assert!(iter.next().is_some());
        assert!(!iter.is_terminated());
        assert!(iter.next().is_none());
        assert!(iter.is_terminated());
        assert!(iter.next().is_none());
    }
}
