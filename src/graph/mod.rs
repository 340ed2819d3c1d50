//! Declared transition topology.
//!
//! A [`Topology`] lists the edges a machine is expected to take. It is
//! optional: the runtime only consults it in strict mode. It also feeds the
//! structural checks in [`validate`] and the diagram renderers.

mod render;
mod topology;
mod validate;

pub use render::{to_dot, to_mermaid, DiagramRenderer, DotRenderer, MermaidRenderer};
pub use topology::{Edge, Topology};
pub use validate::{validate, TopologyViolation};

pub(crate) use validate::violations;
