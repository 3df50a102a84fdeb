//! Dependency graph - file edges plus the module graph derived from them.

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::path::{Path, PathBuf};

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use petgraph::Direction;
use serde::Serialize;

use crate::core::{ModuleId, ProjectModel};
use crate::util::diagnostic::Warning;

/// A module edge, `from` depends on `to`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct ModuleEdge {
    pub from: ModuleId,
    pub to: ModuleId,
}

/// Result of ordering the module graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum ModuleOrder {
    /// Every dependency precedes its dependents.
    Acyclic { order: Vec<ModuleId> },

    /// The graph has cycles. `order` is still complete and deterministic,
    /// but the edges listed in `broken_edges` are not honoured by it.
    Cyclic {
        order: Vec<ModuleId>,
        /// Each cycle starts at its lowest identifier; the closing edge back
        /// to the first module is implied.
        cycles: Vec<Vec<ModuleId>>,
        broken_edges: Vec<ModuleEdge>,
    },
}

impl ModuleOrder {
    pub fn order(&self) -> &[ModuleId] {
        match self {
            ModuleOrder::Acyclic { order } | ModuleOrder::Cyclic { order, .. } => order,
        }
    }

    pub fn is_acyclic(&self) -> bool {
        matches!(self, ModuleOrder::Acyclic { .. })
    }

    pub fn cycles(&self) -> &[Vec<ModuleId>] {
        match self {
            ModuleOrder::Acyclic { .. } => &[],
            ModuleOrder::Cyclic { cycles, .. } => cycles,
        }
    }

    pub fn broken_edges(&self) -> &[ModuleEdge] {
        match self {
            ModuleOrder::Acyclic { .. } => &[],
            ModuleOrder::Cyclic { broken_edges, .. } => broken_edges,
        }
    }

    /// One structural warning per detected cycle.
    pub fn warnings(&self) -> Vec<Warning> {
        self.cycles()
            .iter()
            .map(|cycle| Warning::ModuleCycle {
                cycle: cycle.clone(),
            })
            .collect()
    }
}

/// File-level and module-level dependency graph.
///
/// Module nodes are created in discovery order, and that order is the
/// tie-breaker wherever several modules could come next.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// Project-relative file -> headers it includes
    files: BTreeMap<PathBuf, BTreeSet<PathBuf>>,

    /// Module graph, edge a -> b means a depends on b
    modules: DiGraph<ModuleId, ()>,

    /// Map from module identifier to node index
    nodes: HashMap<ModuleId, NodeIndex>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a graph holding one node per module of `model`.
    pub fn for_model(model: &ProjectModel) -> Self {
        let mut graph = Self::new();
        for module in model.modules() {
            graph.add_module(module.id().clone());
        }
        graph
    }

    /// Add a module node. Adding the same module twice is a no-op.
    pub fn add_module(&mut self, id: ModuleId) {
        if self.nodes.contains_key(&id) {
            return;
        }
        let node = self.modules.add_node(id.clone());
        self.nodes.insert(id, node);
    }

    /// Record that `from` includes `to` (both project-relative).
    pub fn add_file_edge(&mut self, from: &Path, to: &Path) {
        self.files
            .entry(from.to_path_buf())
            .or_default()
            .insert(to.to_path_buf());
    }

    /// Add a module dependency. Self-loops and unknown modules are ignored,
    /// and an existing edge is not duplicated.
    pub fn add_module_edge(&mut self, from: &ModuleId, to: &ModuleId) {
        if from == to {
            return;
        }
        if let (Some(&a), Some(&b)) = (self.nodes.get(from), self.nodes.get(to)) {
            if !self.modules.contains_edge(a, b) {
                self.modules.add_edge(a, b, ());
            }
        }
    }

    /// Headers included by `file`.
    pub fn file_deps(&self, file: &Path) -> Option<&BTreeSet<PathBuf>> {
        self.files.get(file)
    }

    /// Every file with at least one resolved include, sorted by path.
    pub fn file_edges(&self) -> impl Iterator<Item = (&PathBuf, &BTreeSet<PathBuf>)> {
        self.files.iter()
    }

    pub fn file_edge_count(&self) -> usize {
        self.files.values().map(|deps| deps.len()).sum()
    }

    pub fn module_count(&self) -> usize {
        self.modules.node_count()
    }

    pub fn module_edge_count(&self) -> usize {
        self.modules.edge_count()
    }

    pub fn contains_module(&self, id: &ModuleId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Modules in node order.
    pub fn modules(&self) -> impl Iterator<Item = &ModuleId> {
        self.modules.node_indices().map(|n| &self.modules[n])
    }

    /// Direct dependencies of a module, in discovery order.
    pub fn module_deps(&self, id: &ModuleId) -> Vec<ModuleId> {
        self.neighbors(id, Direction::Outgoing)
    }

    /// Modules depending directly on `id`, in discovery order.
    pub fn dependents(&self, id: &ModuleId) -> Vec<ModuleId> {
        self.neighbors(id, Direction::Incoming)
    }

    fn neighbors(&self, id: &ModuleId, dir: Direction) -> Vec<ModuleId> {
        let Some(&node) = self.nodes.get(id) else {
            return Vec::new();
        };
        let mut found: Vec<NodeIndex> = self.modules.neighbors_directed(node, dir).collect();
        found.sort();
        found.into_iter().map(|n| self.modules[n].clone()).collect()
    }

    /// Every module reachable from `id`, in discovery order.
    pub fn transitive_module_deps(&self, id: &ModuleId) -> Vec<ModuleId> {
        let Some(&start) = self.nodes.get(id) else {
            return Vec::new();
        };

        let mut reached = Vec::new();
        let mut dfs = Dfs::new(&self.modules, start);
        while let Some(node) = dfs.next(&self.modules) {
            if node != start {
                reached.push(node);
            }
        }
        reached.sort();
        reached.into_iter().map(|n| self.modules[n].clone()).collect()
    }

    /// Order modules so that dependencies precede dependents.
    ///
    /// Modules that become free at the same time are emitted in discovery
    /// order. When every remaining module is blocked, the lowest identifier
    /// among those sitting on a cycle is emitted anyway and its unsatisfied
    /// edges are recorded as broken.
    pub fn topological_order(&self) -> ModuleOrder {
        let count = self.modules.node_count();
        let mut blocked_on: Vec<usize> = self
            .modules
            .node_indices()
            .map(|n| self.modules.neighbors(n).count())
            .collect();
        let mut emitted = vec![false; count];
        let mut ready: BTreeSet<NodeIndex> = self
            .modules
            .node_indices()
            .filter(|n| blocked_on[n.index()] == 0)
            .collect();

        let mut order = Vec::with_capacity(count);
        let mut broken_edges = Vec::new();
        let mut cycle_nodes: Option<Vec<Vec<NodeIndex>>> = None;

        while order.len() < count {
            let next = match ready.pop_first() {
                Some(node) => node,
                None => {
                    let sccs = cycle_nodes.get_or_insert_with(|| self.cyclic_components());
                    let Some(node) = sccs
                        .iter()
                        .flatten()
                        .copied()
                        .filter(|n| !emitted[n.index()])
                        .min_by(|a, b| self.modules[*a].cmp(&self.modules[*b]))
                    else {
                        break;
                    };

                    let mut dropped: Vec<ModuleEdge> = self
                        .modules
                        .neighbors(node)
                        .filter(|dep| !emitted[dep.index()])
                        .map(|dep| ModuleEdge {
                            from: self.modules[node].clone(),
                            to: self.modules[dep].clone(),
                        })
                        .collect();
                    dropped.sort();
                    tracing::debug!(
                        "breaking cycle at `{}` ({} edges dropped)",
                        self.modules[node],
                        dropped.len()
                    );
                    broken_edges.extend(dropped);
                    node
                }
            };

            emitted[next.index()] = true;
            order.push(self.modules[next].clone());

            for dependent in self.modules.neighbors_directed(next, Direction::Incoming) {
                let slot = &mut blocked_on[dependent.index()];
                *slot = slot.saturating_sub(1);
                if *slot == 0 && !emitted[dependent.index()] {
                    ready.insert(dependent);
                }
            }
        }

        match cycle_nodes {
            None => ModuleOrder::Acyclic { order },
            Some(sccs) => {
                let mut cycles: Vec<Vec<ModuleId>> =
                    sccs.iter().map(|scc| self.cycle_path(scc)).collect();
                cycles.sort();
                ModuleOrder::Cyclic {
                    order,
                    cycles,
                    broken_edges,
                }
            }
        }
    }

    /// Strongly connected components with more than one module.
    fn cyclic_components(&self) -> Vec<Vec<NodeIndex>> {
        tarjan_scc(&self.modules)
            .into_iter()
            .filter(|scc| scc.len() > 1)
            .collect()
    }

    /// A concrete cycle through a component, starting at its lowest
    /// identifier and following the shortest path back to it.
    fn cycle_path(&self, scc: &[NodeIndex]) -> Vec<ModuleId> {
        let members: BTreeSet<NodeIndex> = scc.iter().copied().collect();
        let Some(start) = scc
            .iter()
            .copied()
            .min_by(|a, b| self.modules[*a].cmp(&self.modules[*b]))
        else {
            return Vec::new();
        };

        let mut came_from: HashMap<NodeIndex, NodeIndex> = HashMap::new();
        let mut queue = VecDeque::from([start]);
        let mut closing = None;

        'search: while let Some(node) = queue.pop_front() {
            let mut next: Vec<NodeIndex> = self
                .modules
                .neighbors(node)
                .filter(|n| members.contains(n))
                .collect();
            next.sort_by(|a, b| self.modules[*a].cmp(&self.modules[*b]));

            for n in next {
                if n == start {
                    closing = Some(node);
                    break 'search;
                }
                if let Entry::Vacant(slot) = came_from.entry(n) {
                    slot.insert(node);
                    queue.push_back(n);
                }
            }
        }

        let mut path = Vec::new();
        let mut cursor = closing;
        while let Some(node) = cursor {
            path.push(self.modules[node].clone());
            cursor = if node == start {
                None
            } else {
                came_from.get(&node).copied()
            };
        }
        path.reverse();
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(name: &str) -> ModuleId {
        ModuleId::from_rel_dir(Path::new(name))
    }

    fn graph(modules: &[&str], edges: &[(&str, &str)]) -> DependencyGraph {
        let mut graph = DependencyGraph::new();
        for m in modules {
            graph.add_module(id(m));
        }
        for (from, to) in edges {
            graph.add_module_edge(&id(from), &id(to));
        }
        graph
    }

    fn names(order: &[ModuleId]) -> Vec<&str> {
        order.iter().map(|m| m.as_str()).collect()
    }

    #[test]
    fn test_module_edges_are_deduplicated() {
        let mut g = graph(&["app", "lib"], &[("app", "lib"), ("app", "lib"), ("app", "app")]);
        g.add_module_edge(&id("app"), &id("unknown"));

        assert_eq!(g.module_edge_count(), 1);
        assert_eq!(g.module_deps(&id("app")), vec![id("lib")]);
        assert_eq!(g.dependents(&id("lib")), vec![id("app")]);
        assert!(g.module_deps(&id("lib")).is_empty());
    }

    #[test]
    fn test_dependencies_come_first() {
        // app -> math -> utils, app -> utils
        let g = graph(
            &["app", "math", "utils"],
            &[("app", "math"), ("math", "utils"), ("app", "utils")],
        );

        let order = g.topological_order();
        assert!(order.is_acyclic());
        assert_eq!(names(order.order()), vec!["utils", "math", "app"]);
        assert!(order.warnings().is_empty());
    }

    #[test]
    fn test_free_modules_keep_discovery_order() {
        let g = graph(&["zeta", "alpha", "mid"], &[]);
        assert_eq!(names(g.topological_order().order()), vec!["zeta", "alpha", "mid"]);

        // `b` becomes free after `c`; `a` was free all along and goes first
        let g = graph(&["b", "a", "c"], &[("b", "c")]);
        assert_eq!(names(g.topological_order().order()), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_two_module_cycle() {
        let g = graph(&["y", "x"], &[("x", "y"), ("y", "x")]);

        let order = g.topological_order();
        assert!(!order.is_acyclic());
        assert_eq!(names(order.order()), vec!["x", "y"]);
        assert_eq!(order.cycles(), &[vec![id("x"), id("y")]]);
        assert_eq!(
            order.broken_edges(),
            &[ModuleEdge {
                from: id("x"),
                to: id("y")
            }]
        );

        let warnings = order.warnings();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].to_string(), "circular module dependency: x → y → x");
    }

    #[test]
    fn test_cycle_ordering_is_stable() {
        let build = || {
            graph(
                &["app", "c", "b", "a", "leaf"],
                &[
                    ("app", "a"),
                    ("a", "b"),
                    ("b", "c"),
                    ("c", "a"),
                    ("c", "leaf"),
                ],
            )
        };

        let first = build().topological_order();
        for _ in 0..5 {
            assert_eq!(build().topological_order(), first);
        }

        // `a` is forced out first; `app` is then free and precedes `c`
        assert_eq!(names(first.order()), vec!["leaf", "a", "app", "c", "b"]);
        assert_eq!(first.cycles(), &[vec![id("a"), id("b"), id("c")]]);
        assert_eq!(first.broken_edges().len(), 1);
        assert_eq!(first.broken_edges()[0].from, id("a"));
        assert_eq!(first.broken_edges()[0].to, id("b"));
    }

    #[test]
    fn test_transitive_deps() {
        let g = graph(
            &["app", "math", "utils", "other"],
            &[("app", "math"), ("math", "utils")],
        );
        assert_eq!(g.transitive_module_deps(&id("app")), vec![id("math"), id("utils")]);
        assert!(g.transitive_module_deps(&id("other")).is_empty());
        assert!(g.transitive_module_deps(&id("missing")).is_empty());
    }

    #[test]
    fn test_file_edges() {
        let mut g = DependencyGraph::new();
        g.add_file_edge(Path::new("src/main.c"), Path::new("src/a.h"));
        g.add_file_edge(Path::new("src/main.c"), Path::new("src/a.h"));
        g.add_file_edge(Path::new("src/main.c"), Path::new("src/b.h"));

        assert_eq!(g.file_edge_count(), 2);
        assert_eq!(g.file_deps(Path::new("src/main.c")).map(|d| d.len()), Some(2));
        assert!(g.file_deps(Path::new("src/a.h")).is_none());
    }
}
