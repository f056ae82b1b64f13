//! Graphviz backend.
//!
//! Translates a [`Diagram`] into a `dot_structures` graph and runs the `dot`
//! executable through `graphviz-rust`. Node and caption labels use Graphviz
//! HTML-like syntax; everything else is emitted as quoted strings.

use dot_structures::{
    Attribute, Edge, EdgeTy, Graph, GraphAttributes, Id, Node, NodeId, Stmt, Vertex,
};
use graphviz_rust::{
    cmd::{CommandArg, Format},
    exec,
    printer::{DotPrinter, PrinterContext},
};
use log::{debug, trace};

use crate::{
    config::OutputFormat,
    diagram::{Diagram, DiagramEdge, DiagramNode, EdgeStyle, NodeShape},
    export::{ExportError, Renderer},
};

/// Renders diagrams with the Graphviz `dot` layout engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphvizRenderer {
    format: OutputFormat,
}

impl GraphvizRenderer {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    fn command_format(&self) -> Format {
        match self.format {
            OutputFormat::Png => Format::Png,
            OutputFormat::Svg => Format::Svg,
        }
    }
}

impl Renderer for GraphvizRenderer {
    fn format(&self) -> OutputFormat {
        self.format
    }

    fn render(&self, diagram: &Diagram) -> Result<Vec<u8>, ExportError> {
        let graph = to_graph(diagram);
        trace!(dot = graph.print(&mut PrinterContext::default()); "Generated DOT source");

        let bytes = exec(
            graph,
            &mut PrinterContext::default(),
            vec![CommandArg::Format(self.command_format())],
        )?;

        if bytes.is_empty() {
            return Err(ExportError::Render(format!(
                "graphviz produced no output for `{}`",
                diagram.name()
            )));
        }

        debug!(name = diagram.name(), bytes = bytes.len(); "Diagram rendered");
        Ok(bytes)
    }
}

/// Returns the DOT source for `diagram`.
pub fn to_dot(diagram: &Diagram) -> String {
    to_graph(diagram).print(&mut PrinterContext::default())
}

fn to_graph(diagram: &Diagram) -> Graph {
    let mut stmts = vec![
        Stmt::GAttribute(GraphAttributes::Graph(vec![
            attr("rankdir", plain("LR")),
            attr("size", quoted(diagram.size())),
        ])),
        Stmt::GAttribute(GraphAttributes::Node(vec![
            attr("style", plain("filled")),
            attr("fillcolor", quoted(&diagram.default_fill().to_hex())),
            attr("shape", plain("box")),
        ])),
    ];

    stmts.extend(diagram.nodes().iter().map(node_stmt));
    stmts.extend(diagram.edges().iter().map(edge_stmt));
    stmts.push(Stmt::GAttribute(GraphAttributes::Graph(vec![attr(
        "label",
        html(diagram.caption()),
    )])));

    Graph::DiGraph {
        id: quoted(diagram.name()),
        strict: false,
        stmts,
    }
}

fn node_stmt(node: &DiagramNode) -> Stmt {
    let mut attributes = vec![
        attr("label", html(&node.label)),
        attr("fillcolor", quoted(&node.fill.to_hex())),
    ];
    if node.shape == NodeShape::Box3d {
        attributes.push(attr("shape", plain("box3d")));
    }

    Stmt::Node(Node {
        id: node_id(node.id.as_str()),
        attributes,
    })
}

fn edge_stmt(edge: &DiagramEdge) -> Stmt {
    let mut attributes = vec![attr("label", quoted(&edge.label))];
    match edge.style {
        EdgeStyle::Dashed => {
            attributes.push(attr("style", plain("dashed")));
            attributes.push(attr("color", plain("gray")));
        }
        EdgeStyle::Parallel => attributes.push(attr("color", quoted("black:invis:black"))),
        EdgeStyle::Plain => {}
        EdgeStyle::Bold => attributes.push(attr("penwidth", quoted("2.0"))),
    }

    Stmt::Edge(Edge {
        ty: EdgeTy::Pair(
            Vertex::N(node_id(edge.from.as_str())),
            Vertex::N(node_id(edge.to.as_str())),
        ),
        attributes,
    })
}

fn node_id(key: &str) -> NodeId {
    NodeId(quoted(key), None)
}

fn attr(name: &str, value: Id) -> Attribute {
    Attribute(plain(name), value)
}

fn plain(value: &str) -> Id {
    Id::Plain(value.to_string())
}

/// A double-quoted DOT string with `"` and `\` escaped.
fn quoted(value: &str) -> Id {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    Id::Escaped(format!("\"{escaped}\""))
}

/// An HTML-like label; `body` must already be escaped.
fn html(body: &str) -> Id {
    Id::Html(format!("<{body}>"))
}
