//! The pipe delimited graph format written by the graph construction and filter tools.
//!
//! ```text
//! id(,) | f0,f1,...,fk(,) | cluster(,) | n0-flag0,n1-flag1,...
//! ```
//!
//! A flag of exactly `1` marks a support edge, any other flag a regular edge.

use crate::{parse_integer, parse_real, parse_real_list, read_source, records, skip_line};
use chipviz_traits::{ChipResult, ClusterLabel, LineIssue, Parsed};
use log::{debug, info};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::Path;

pub type VertexId = i64;

const GRAPH_FIELDS: usize = 4;

/// One entry of a vertex adjacency list. The neighbor may be absent from the
/// graph, such dangling entries are kept but never resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Adjacency {
    pub neighbor: VertexId,
    pub support: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphVertex {
    pub id: VertexId,
    pub coords: Vec<f64>,
    /// Rendering group only.
    pub cluster: f64,
    pub adjacent: Vec<Adjacency>,
}

impl GraphVertex {
    pub fn cluster_label(&self) -> ClusterLabel {
        ClusterLabel::from_real(self.cluster)
    }

    pub fn support_neighbors(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.adjacent
            .iter()
            .filter(|adj| adj.support)
            .map(|adj| adj.neighbor)
    }
}

/// Set of undirected edges already emitted, keyed by the unordered id pair.
#[derive(Debug, Default, Clone)]
pub struct DrawnEdges {
    pairs: HashSet<(VertexId, VertexId)>,
}

impl DrawnEdges {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the edge `a`-`b` as drawn. Returns false if it already was, in either direction.
    pub fn insert(&mut self, a: VertexId, b: VertexId) -> bool {
        self.pairs.insert(Self::key(a, b))
    }

    fn key(a: VertexId, b: VertexId) -> (VertexId, VertexId) {
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }
}

/// An edge ready to be drawn: both endpoints resolved to coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeSegment<'a> {
    pub from: VertexId,
    pub to: VertexId,
    pub from_coords: &'a [f64],
    pub to_coords: &'a [f64],
    pub support: bool,
}

/// A parsed graph. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Graph {
    vertices: BTreeMap<VertexId, GraphVertex>,
}

impl Graph {
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn get(&self, id: VertexId) -> Option<&GraphVertex> {
        self.vertices.get(&id)
    }

    pub fn contains(&self, id: VertexId) -> bool {
        self.vertices.contains_key(&id)
    }

    /// Vertices in id order.
    pub fn iter(&self) -> impl Iterator<Item = &GraphVertex> {
        self.vertices.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices.keys().copied()
    }

    /// Number of adjacency entries pointing outside of the graph.
    pub fn dangling_count(&self) -> usize {
        self.iter()
            .flat_map(|v| v.adjacent.iter())
            .filter(|adj| !self.contains(adj.neighbor))
            .count()
    }

    /// Number of distinct undirected support edges between vertices of the graph.
    pub fn support_edge_count(&self) -> usize {
        self.edge_segments().iter().filter(|e| e.support).count()
    }

    pub fn cluster_labels(&self) -> BTreeSet<ClusterLabel> {
        self.iter().map(GraphVertex::cluster_label).collect()
    }

    /// Dense color index for each cluster label present in the graph.
    pub fn cluster_palette(&self) -> BTreeMap<ClusterLabel, usize> {
        ClusterLabel::palette(&self.cluster_labels())
    }

    /// Every undirected edge once, in vertex id order, skipping dangling references.
    /// The support flag is the one of the first vertex listing the edge.
    pub fn edge_segments(&self) -> Vec<EdgeSegment<'_>> {
        let mut drawn = DrawnEdges::new();
        let mut segments = Vec::new();
        for vertex in self.iter() {
            for adj in &vertex.adjacent {
                let Some(neighbor) = self.get(adj.neighbor) else {
                    continue;
                };
                if !drawn.insert(vertex.id, neighbor.id) {
                    continue;
                }
                segments.push(EdgeSegment {
                    from: vertex.id,
                    to: neighbor.id,
                    from_coords: &vertex.coords,
                    to_coords: &neighbor.coords,
                    support: adj.support,
                });
            }
        }
        segments
    }
}

impl<'a> IntoIterator for &'a Graph {
    type Item = &'a GraphVertex;
    type IntoIter = std::collections::btree_map::Values<'a, VertexId, GraphVertex>;

    fn into_iter(self) -> Self::IntoIter {
        self.vertices.values()
    }
}

fn parse_adjacency(field: &str) -> Result<Vec<Adjacency>, LineIssue> {
    let mut adjacent = Vec::new();
    for token in field.split(',').map(str::trim) {
        if token.is_empty() {
            continue;
        }
        let parts: Vec<&str> = token.split('-').collect();
        let [neighbor, flag] = parts.as_slice() else {
            debug!("ignoring adjacency token {token:?}");
            continue;
        };
        let neighbor = neighbor
            .trim()
            .parse::<VertexId>()
            .map_err(|_| LineIssue::BadAdjacencyToken {
                token: token.to_string(),
            })?;
        adjacent.push(Adjacency {
            neighbor,
            support: flag.trim() == "1",
        });
    }
    Ok(adjacent)
}

fn parse_vertex(line: &str) -> Result<GraphVertex, LineIssue> {
    let fields: Vec<&str> = line.split('|').collect();
    if fields.len() < GRAPH_FIELDS {
        return Err(LineIssue::WrongFieldCount {
            expected: GRAPH_FIELDS,
            found: fields.len(),
        });
    }
    Ok(GraphVertex {
        id: parse_integer(&fields[0].replace(',', ""))?,
        coords: parse_real_list(fields[1])?,
        cluster: parse_real(&fields[2].replace(',', ""))?,
        adjacent: parse_adjacency(fields[3])?,
    })
}

fn parse_graph(source: &str, content: &str) -> Parsed<Graph> {
    let mut vertices = BTreeMap::new();
    let mut diagnostics = Vec::new();
    for (number, line) in records(content) {
        match parse_vertex(line) {
            Ok(vertex) => {
                // last line wins
                vertices.insert(vertex.id, vertex);
            }
            Err(issue) => skip_line(&mut diagnostics, source, number, line, issue),
        }
    }
    Parsed {
        value: Graph { vertices },
        diagnostics,
    }
}

/// Parses graph text held in memory.
pub fn parse_graph_str(content: &str) -> Parsed<Graph> {
    parse_graph("<memory>", content)
}

pub fn read_graph_with_diagnostics(path: impl AsRef<Path>) -> ChipResult<Parsed<Graph>> {
    let path = path.as_ref();
    let content = read_source(path)?;
    let parsed = parse_graph(&path.display().to_string(), &content);
    info!(
        "{}: {} vertices, {} lines skipped",
        path.display(),
        parsed.value.len(),
        parsed.diagnostics.len()
    );
    Ok(parsed)
}

/// Reads a graph file. Malformed lines are logged and skipped.
pub fn read_graph(path: impl AsRef<Path>) -> ChipResult<Graph> {
    read_graph_with_diagnostics(path).map(Parsed::into_value)
}
