//! Member and class modifiers.

use bitflags::bitflags;

bitflags! {
    /// Modifiers reported by introspection for classes and their members.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Modifiers: u16 {
        const PUBLIC = 1 << 0;
        const PRIVATE = 1 << 1;
        const ABSTRACT = 1 << 2;
        const FINAL = 1 << 3;
        /// Generated by a compiler rather than declared in source.
        const SYNTHETIC = 1 << 4;
        /// Compiler-generated adapter forwarding to another method.
        const BRIDGE = 1 << 5;
        /// Trailing parameter accepts zero or more arguments.
        const VARARGS = 1 << 6;
        /// Interface method with a body.
        const DEFAULT = 1 << 7;
        /// Interface explicitly marked as a functional interface.
        const FUNCTIONAL = 1 << 8;
    }
}

impl Modifiers {
    /// Synthetic and bridge members never take part in direct matching.
    pub fn is_generated(self) -> bool {
        self.intersects(Modifiers::SYNTHETIC | Modifiers::BRIDGE)
    }

    pub fn is_accessible(self) -> bool {
        !self.contains(Modifiers::PRIVATE)
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Modifiers::PUBLIC
    }
}
