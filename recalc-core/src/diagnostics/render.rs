//! Graphviz Rendering
//!
//! Renders a snapshot as DOT text laid out left to right. Each level becomes
//! a `rank=same` subgraph so nodes at the same depth line up, and levels are
//! colored from a fixed palette. Edges point from a dependency to the node
//! that needs it.

use std::fmt::Write;

use super::{levels, DependencySnapshot};
use crate::error::Result;

const PALETTE: [&str; 6] = ["lightblue", "lightgreen", "pink", "yellow", "green", "red"];

/// Render the snapshot, failing if it cannot be leveled.
pub fn render_dot(snapshot: &DependencySnapshot) -> Result<String> {
    let levels = levels(snapshot)?;
    let mut dot = String::from("digraph {\n    rankdir=LR;\n");

    // Writing into a String cannot fail.
    for (index, level) in levels.iter().enumerate() {
        let color = PALETTE[index % PALETTE.len()];
        let _ = writeln!(dot, "    subgraph level_{index} {{");
        let _ = writeln!(dot, "        rank=same;");
        for node in level {
            let _ = writeln!(
                dot,
                "        {} [shape=circle, style=filled, fillcolor={color}];",
                quoted(node)
            );
        }
        let _ = writeln!(dot, "    }}");
    }

    for (node, dependencies) in snapshot.iter() {
        for dependency in dependencies {
            let _ = writeln!(dot, "    {} -> {};", quoted(dependency), quoted(node));
        }
    }

    dot.push_str("}\n");
    Ok(dot)
}

/// DOT quoted ID. Only `"` and `\` need escaping; everything else is literal.
fn quoted(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    out.push('"');
    for ch in name.chars() {
        if matches!(ch, '"' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GraphError;

    #[test]
    fn renders_levels_and_edges() {
        let snapshot: DependencySnapshot = [("A", vec![]), ("B", vec!["A"])].into_iter().collect();
        let dot = render_dot(&snapshot).unwrap();

        assert!(dot.starts_with("digraph {\n    rankdir=LR;\n"));
        assert!(dot.contains("subgraph level_0 {"));
        assert!(dot.contains(r#""A" [shape=circle, style=filled, fillcolor=lightblue];"#));
        assert!(dot.contains(r#""B" [shape=circle, style=filled, fillcolor=lightgreen];"#));
        assert!(dot.contains(r#""A" -> "B";"#));
        assert!(dot.ends_with("}\n"));
    }

    #[test]
    fn names_are_quoted_without_unicode_escapes() {
        let snapshot: DependencySnapshot = [
            ("café", vec![]),
            (r#"say "hi""#, vec!["café"]),
            (r"a\b", vec![]),
        ]
        .into_iter()
        .collect();
        let dot = render_dot(&snapshot).unwrap();

        assert!(dot.contains(r#""café" [shape=circle"#));
        assert!(dot.contains(r#""say \"hi\"" [shape=circle"#));
        assert!(dot.contains(r#""a\\b" [shape=circle"#));
        assert!(dot.contains(r#""café" -> "say \"hi\"";"#));
        assert!(!dot.contains("\\u{"));
    }

    #[test]
    fn cyclic_snapshot_is_not_rendered() {
        let snapshot: DependencySnapshot =
            [("A", vec!["B"]), ("B", vec!["A"])].into_iter().collect();
        assert!(matches!(render_dot(&snapshot), Err(GraphError::Cycle(_))));
    }
}
