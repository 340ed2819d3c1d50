//! Diagram rendering for declared topologies.
//!
//! Two output formats: Graphviz DOT and Mermaid `stateDiagram-v2`. Both draw
//! every state of the enumeration, an entry arrow into the initial state and
//! one arrow per declared edge.

use crate::core::State;
use crate::graph::topology::Topology;

/// Renders a topology into diagram source text.
pub trait DiagramRenderer {
    fn render<S: State>(&self, topology: &Topology<S>, initial: S) -> String;
}

/// Graphviz DOT output.
#[derive(Clone, Copy, Debug, Default)]
pub struct DotRenderer;

/// Mermaid `stateDiagram-v2` output.
#[derive(Clone, Copy, Debug, Default)]
pub struct MermaidRenderer;

impl DiagramRenderer for DotRenderer {
    fn render<S: State>(&self, topology: &Topology<S>, initial: S) -> String {
        let mut lines = vec![
            "digraph StateMachine {".to_string(),
            "    fontname=\"Arial\"; node [fontname=\"Arial\"]; edge [fontname=\"Arial\"];"
                .to_string(),
            "    start [shape=point, width=0.15];".to_string(),
            format!("    start -> {};", initial.name()),
        ];

        for state in S::ALL {
            let peripheries = if state.is_final() { ", peripheries=2" } else { "" };
            lines.push(format!(
                "    {} [label=\"{}\", shape=box, style=\"rounded,filled\", fillcolor=white{}];",
                state.name(),
                escape_dot(state.name()),
                peripheries
            ));
        }

        for edge in topology.edges() {
            let mut attrs = Vec::new();
            if let Some(label) = &edge.label {
                attrs.push(format!("label=\"{}\"", escape_dot(label)));
            }
            attrs.push("fontsize=10".to_string());
            lines.push(format!(
                "    {} -> {} [{}];",
                edge.from.name(),
                edge.to.name(),
                attrs.join(", ")
            ));
        }

        lines.push("}".to_string());
        lines.join("\n")
    }
}

impl DiagramRenderer for MermaidRenderer {
    fn render<S: State>(&self, topology: &Topology<S>, initial: S) -> String {
        let mut lines = vec![
            "stateDiagram-v2".to_string(),
            format!("    [*] --> {}", initial.name()),
        ];

        for edge in topology.edges() {
            match &edge.label {
                Some(label) => lines.push(format!(
                    "    {} --> {} : {}",
                    edge.from.name(),
                    edge.to.name(),
                    escape_mermaid(label)
                )),
                None => lines.push(format!("    {} --> {}", edge.from.name(), edge.to.name())),
            }
        }

        for state in S::ALL.iter().filter(|s| s.is_final()) {
            lines.push(format!("    {} --> [*]", state.name()));
        }

        lines.join("\n")
    }
}

/// Render a topology as Graphviz DOT.
pub fn to_dot<S: State>(topology: &Topology<S>, initial: S) -> String {
    DotRenderer.render(topology, initial)
}

/// Render a topology as a Mermaid state diagram.
pub fn to_mermaid<S: State>(topology: &Topology<S>, initial: S) -> String {
    MermaidRenderer.render(topology, initial)
}

fn escape_dot(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

// Mermaid ends a label at a newline and treats ':' as a separator.
fn escape_mermaid(text: &str) -> String {
    text.replace('\n', " ").replace(':', "#58;")
}
