//! Element capability bits

use bitflags::bitflags;

bitflags! {
    /// Capability set identifying which subtypes an element satisfies.
    ///
    /// `DISPOSED` is a reserved lifecycle bit orthogonal to the kind bits:
    /// disposing an element sets it without erasing the element's kind, so a
    /// disposed container is still a container.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ElementKind: u8 {
        /// Owns an ordered, name-indexed collection of children.
        const CONTAINER = 1 << 0;
        /// Connectable input port.
        const INPUT = 1 << 1;
        /// Connectable output port.
        const OUTPUT = 1 << 2;
        /// Reusable definition usable by the creation chain.
        const DEFINITION = 1 << 3;
        /// Lifecycle bit set while the element is soft-deleted.
        const DISPOSED = 1 << 7;
    }
}

impl ElementKind {
    /// The kind bits with the lifecycle bit masked out.
    #[must_use]
    pub const fn live(self) -> Self {
        self.difference(Self::DISPOSED)
    }

    /// True when the live portions of `self` and `other` intersect.
    #[must_use]
    pub const fn compatible(self, other: Self) -> bool {
        self.live().intersects(other.live())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn live_masks_the_lifecycle_bit() {
        let kind = ElementKind::CONTAINER | ElementKind::DISPOSED;
        assert_eq!(kind.live(), ElementKind::CONTAINER);
    }

    #[test]
    fn compatibility_ignores_disposal() {
        let disposed_container = ElementKind::CONTAINER | ElementKind::DISPOSED;
        assert!(disposed_container.compatible(ElementKind::CONTAINER));
        assert!(!disposed_container.compatible(ElementKind::INPUT));
        // Two disposed elements share no live bits.
        assert!(!ElementKind::DISPOSED.compatible(ElementKind::DISPOSED));
    }
}
