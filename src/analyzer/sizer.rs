//! Reachable code size computation
//!
//! A function's total footprint is its own size plus the size of every
//! function it can reach through direct calls, each counted once.

use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

use super::callgraph::CallGraph;
use super::symbols::SymbolTable;
use crate::error::FootprintError;

/// One function visited while sizing a root
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BreakdownEntry {
    /// Function name
    pub name: String,
    /// Own size in bytes (0 when absent from the map)
    pub size: u64,
}

/// Total size of a root function and everything it reaches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Footprint {
    /// Root function name
    pub root: String,
    /// Root's own size in bytes
    pub own_size: u64,
    /// Deduplicated size of the root and all reachable functions
    pub total_size: u64,
    /// Visited functions in breadth-first discovery order
    pub breakdown: Vec<BreakdownEntry>,
}

impl Footprint {
    /// Number of distinct functions reached, root included
    pub fn function_count(&self) -> usize {
        self.breakdown.len()
    }

    /// Bytes pulled in by callees alone
    pub fn dependency_size(&self) -> u64 {
        self.total_size.saturating_sub(self.own_size)
    }

    /// Breakdown sorted by size, largest first; equal sizes keep discovery order
    pub fn sorted_breakdown(&self) -> Vec<BreakdownEntry> {
        let mut sorted = self.breakdown.clone();
        sorted.sort_by(|a, b| b.size.cmp(&a.size));
        sorted
    }
}

/// Compute the deduplicated reachable size of `root`
///
/// Traversal is breadth-first over an explicit worklist, so deep or cyclic
/// call graphs neither recurse nor loop. Callees are enqueued in name order,
/// which makes the breakdown order reproducible.
///
/// Returns [`FootprintError::UnknownRoot`] when `root` appears in neither the
/// symbol table nor the call graph.
///
/// # Examples
///
/// ```
/// use fn_footprint::analyzer::callgraph::CallGraph;
/// use fn_footprint::analyzer::sizer::compute_total_size;
/// use fn_footprint::analyzer::symbols::{FunctionRecord, SymbolTable};
///
/// let symbols: SymbolTable = [("A", 10), ("B", 20), ("C", 5)]
///     .into_iter()
///     .map(|(name, size)| FunctionRecord { name: name.to_string(), address: 0, size })
///     .collect();
/// let graph: CallGraph = [("A", "B"), ("B", "C")].into_iter().collect();
///
/// let footprint = compute_total_size(&symbols, &graph, "A")?;
/// assert_eq!(footprint.total_size, 35);
/// assert_eq!(footprint.own_size, 10);
/// # Ok::<(), fn_footprint::error::FootprintError>(())
/// ```
pub fn compute_total_size(
    symbols: &SymbolTable,
    graph: &CallGraph,
    root: &str,
) -> Result<Footprint, FootprintError> {
    if !symbols.contains(root) && !graph.is_observed(root) {
        return Err(FootprintError::UnknownRoot {
            name: root.to_string(),
        });
    }

    let mut visited: HashSet<&str> = HashSet::new();
    let mut queue: VecDeque<&str> = VecDeque::from([root]);
    let mut breakdown = Vec::new();
    let mut total_size: u64 = 0;

    while let Some(func) = queue.pop_front() {
        if !visited.insert(func) {
            continue;
        }

        let size = symbols.size_of(func);
        total_size = total_size.saturating_add(size);
        breakdown.push(BreakdownEntry {
            name: func.to_string(),
            size,
        });

        if let Some(callees) = graph.callees(func) {
            let mut pending: Vec<&str> = callees
                .iter()
                .map(String::as_str)
                .filter(|callee| !visited.contains(callee))
                .collect();
            pending.sort_unstable();
            queue.extend(pending);
        }
    }

    Ok(Footprint {
        root: root.to_string(),
        own_size: symbols.size_of(root),
        total_size,
        breakdown,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::symbols::FunctionRecord;

    fn table(entries: &[(&str, u64)]) -> SymbolTable {
        entries
            .iter()
            .enumerate()
            .map(|(i, (name, size))| FunctionRecord {
                name: name.to_string(),
                address: 0x0800_0000 + (i as u64) * 0x100,
                size: *size,
            })
            .collect()
    }

    fn graph(edges: &[(&str, &str)]) -> CallGraph {
        edges.iter().copied().collect()
    }

    fn names(footprint: &Footprint) -> Vec<&str> {
        footprint.breakdown.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_compute_total_size_chain_sums_all_functions() {
        let symbols = table(&[("A", 10), ("B", 20), ("C", 5)]);
        let calls = graph(&[("A", "B"), ("B", "C")]);

        let footprint = compute_total_size(&symbols, &calls, "A").unwrap();

        assert_eq!(footprint.total_size, 35);
        assert_eq!(footprint.own_size, 10);
        assert_eq!(footprint.dependency_size(), 25);
        assert_eq!(names(&footprint), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_compute_total_size_cycle_visits_each_once() {
        let symbols = table(&[("A", 4), ("B", 6)]);
        let calls = graph(&[("A", "B"), ("B", "A")]);

        let footprint = compute_total_size(&symbols, &calls, "A").unwrap();

        assert_eq!(footprint.total_size, 10);
        assert_eq!(footprint.function_count(), 2);
    }

    #[test]
    fn test_compute_total_size_three_cycle_no_double_counting() {
        let symbols = table(&[("A", 1), ("B", 2), ("C", 3)]);
        let calls = graph(&[("A", "B"), ("B", "C"), ("C", "A")]);

        let footprint = compute_total_size(&symbols, &calls, "A").unwrap();

        assert_eq!(footprint.total_size, 6);
        let mut seen = names(&footprint);
        seen.sort();
        assert_eq!(seen, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_compute_total_size_diamond_counts_shared_callee_once() {
        let symbols = table(&[("top", 8), ("left", 4), ("right", 4), ("shared", 100)]);
        let calls = graph(&[
            ("top", "left"),
            ("top", "right"),
            ("left", "shared"),
            ("right", "shared"),
        ]);

        let footprint = compute_total_size(&symbols, &calls, "top").unwrap();

        assert_eq!(footprint.total_size, 116);
        assert_eq!(footprint.function_count(), 4);
    }

    #[test]
    fn test_compute_total_size_self_recursion() {
        let symbols = table(&[("fact", 12)]);
        let calls = graph(&[("fact", "fact")]);

        let footprint = compute_total_size(&symbols, &calls, "fact").unwrap();
        assert_eq!(footprint.total_size, 12);
        assert_eq!(footprint.function_count(), 1);
    }

    #[test]
    fn test_compute_total_size_leaf_equals_own_size() {
        let symbols = table(&[("leaf", 42), ("other", 7)]);
        let calls = graph(&[("other", "leaf")]);

        let footprint = compute_total_size(&symbols, &calls, "leaf").unwrap();
        assert_eq!(footprint.total_size, 42);
        assert_eq!(footprint.own_size, 42);
    }

    #[test]
    fn test_compute_total_size_unknown_root_is_error() {
        let symbols = table(&[("A", 1)]);
        let calls = graph(&[("A", "B")]);

        let err = compute_total_size(&symbols, &calls, "Z").unwrap_err();
        assert!(matches!(err, FootprintError::UnknownRoot { ref name } if name == "Z"));
    }

    #[test]
    fn test_compute_total_size_missing_symbol_contributes_zero_but_is_traversed() {
        let symbols = table(&[("root", 10), ("deep", 30)]);
        let calls = graph(&[("root", "W"), ("W", "deep")]);

        let footprint = compute_total_size(&symbols, &calls, "root").unwrap();

        assert_eq!(footprint.total_size, 40);
        let w = footprint
            .breakdown
            .iter()
            .find(|e| e.name == "W")
            .expect("W should be visited");
        assert_eq!(w.size, 0);
    }

    #[test]
    fn test_compute_total_size_root_only_in_graph_has_zero_own_size() {
        let symbols = table(&[("callee", 16)]);
        let calls = graph(&[("veneer", "callee")]);

        let footprint = compute_total_size(&symbols, &calls, "veneer").unwrap();
        assert_eq!(footprint.own_size, 0);
        assert_eq!(footprint.total_size, 16);
    }

    #[test]
    fn test_compute_total_size_root_only_in_map() {
        let symbols = table(&[("isolated", 64)]);
        let calls = CallGraph::default();

        let footprint = compute_total_size(&symbols, &calls, "isolated").unwrap();
        assert_eq!(footprint.total_size, 64);
        assert_eq!(names(&footprint), vec!["isolated"]);
    }

    #[test]
    fn test_compute_total_size_breakdown_order_is_deterministic() {
        let symbols = table(&[("r", 1), ("c", 1), ("a", 1), ("b", 1)]);
        let calls = graph(&[("r", "c"), ("r", "a"), ("r", "b")]);

        let first = compute_total_size(&symbols, &calls, "r").unwrap();
        let second = compute_total_size(&symbols, &calls, "r").unwrap();

        assert_eq!(names(&first), vec!["r", "a", "b", "c"]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_sorted_breakdown_descending_with_stable_ties() {
        let footprint = Footprint {
            root: "r".to_string(),
            own_size: 5,
            total_size: 25,
            breakdown: vec![
                BreakdownEntry { name: "r".to_string(), size: 5 },
                BreakdownEntry { name: "x".to_string(), size: 10 },
                BreakdownEntry { name: "y".to_string(), size: 5 },
                BreakdownEntry { name: "z".to_string(), size: 5 },
            ],
        };

        let sorted = footprint.sorted_breakdown();
        let order: Vec<&str> = sorted.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(order, vec!["x", "r", "y", "z"]);
        // Original discovery order is untouched
        assert_eq!(footprint.breakdown[0].name, "r");
    }

    #[test]
    fn test_compute_total_size_saturates_on_overflow() {
        let symbols = table(&[("a", u64::MAX), ("b", 10)]);
        let calls = graph(&[("a", "b")]);

        let footprint = compute_total_size(&symbols, &calls, "a").unwrap();
        assert_eq!(footprint.total_size, u64::MAX);
    }

    mod proptest_sizer {
        use super::*;
        use proptest::prelude::*;
        use std::collections::HashMap;

        fn node(i: usize) -> String {
            format!("f{}", i)
        }

        fn build(sizes: &[u64], edges: &[(usize, usize)]) -> (SymbolTable, CallGraph) {
            let symbols = sizes
                .iter()
                .enumerate()
                .map(|(i, size)| FunctionRecord {
                    name: node(i),
                    address: i as u64,
                    size: *size,
                })
                .collect();
            let calls = edges
                .iter()
                .map(|(from, to)| (node(*from), node(*to)))
                .collect();
            (symbols, calls)
        }

        /// Reference reachability computed by fixpoint iteration
        fn reachable(n: usize, edges: &[(usize, usize)], root: usize) -> HashSet<usize> {
            let mut adjacency: HashMap<usize, Vec<usize>> = HashMap::new();
            for (from, to) in edges {
                adjacency.entry(*from).or_default().push(*to);
            }
            let mut seen: HashSet<usize> = HashSet::from([root]);
            loop {
                let before = seen.len();
                let current: Vec<usize> = seen.iter().copied().collect();
                for f in current {
                    for to in adjacency.get(&f).into_iter().flatten() {
                        if *to < n {
                            seen.insert(*to);
                        }
                    }
                }
                if seen.len() == before {
                    return seen;
                }
            }
        }

        fn graph_strategy() -> impl Strategy<Value = (Vec<u64>, Vec<(usize, usize)>)> {
            (1usize..12).prop_flat_map(|n| {
                (
                    prop::collection::vec(0u64..10_000, n),
                    prop::collection::vec((0..n, 0..n), 0..30),
                )
            })
        }

        proptest! {
            #[test]
            fn test_total_matches_reference_reachability((sizes, edges) in graph_strategy()) {
                let (symbols, calls) = build(&sizes, &edges);
                let footprint = compute_total_size(&symbols, &calls, "f0").unwrap();

                let expected = reachable(sizes.len(), &edges, 0);
                let expected_total: u64 = expected.iter().map(|i| sizes[*i]).sum();

                prop_assert_eq!(footprint.total_size, expected_total);
                prop_assert_eq!(footprint.function_count(), expected.len());
            }

            #[test]
            fn test_each_function_visited_at_most_once((sizes, edges) in graph_strategy()) {
                let (symbols, calls) = build(&sizes, &edges);
                let footprint = compute_total_size(&symbols, &calls, "f0").unwrap();

                let unique: HashSet<&str> =
                    footprint.breakdown.iter().map(|e| e.name.as_str()).collect();
                prop_assert_eq!(unique.len(), footprint.breakdown.len());
                let summed: u64 = footprint.breakdown.iter().map(|e| e.size).sum();
                prop_assert_eq!(summed, footprint.total_size);
            }

            #[test]
            fn test_rerun_is_idempotent((sizes, edges) in graph_strategy()) {
                let (symbols, calls) = build(&sizes, &edges);
                let first = compute_total_size(&symbols, &calls, "f0").unwrap();
                let second = compute_total_size(&symbols, &calls, "f0").unwrap();

                let a: HashSet<BreakdownEntry> = first.breakdown.into_iter().collect();
                let b: HashSet<BreakdownEntry> = second.breakdown.into_iter().collect();
                prop_assert_eq!(first.total_size, second.total_size);
                prop_assert_eq!(a, b);
            }

            #[test]
            fn test_new_edge_to_unreachable_function_increases_total(
                (sizes, edges) in graph_strategy(),
                extra_size in 1u64..1_000,
            ) {
                let (symbols, calls) = build(&sizes, &edges);
                let before = compute_total_size(&symbols, &calls, "f0").unwrap();

                // A fresh function is unreachable until the new edge is added
                let fresh = sizes.len();
                let mut grown_sizes = sizes.clone();
                grown_sizes.push(extra_size);
                let mut grown_edges = edges.clone();
                grown_edges.push((0, fresh));
                let (symbols, calls) = build(&grown_sizes, &grown_edges);
                let after = compute_total_size(&symbols, &calls, "f0").unwrap();

                prop_assert_eq!(after.total_size, before.total_size + extra_size);
            }

            #[test]
            fn test_missing_symbols_contribute_zero((sizes, edges) in graph_strategy()) {
                let (_, calls) = build(&sizes, &edges);
                let empty = SymbolTable::default();

                let footprint = compute_total_size(&empty, &calls, "f0");
                if edges.iter().any(|(from, to)| *from == 0 || *to == 0) {
                    let footprint = footprint.unwrap();
                    prop_assert_eq!(footprint.total_size, 0);
                    let expected = reachable(sizes.len(), &edges, 0);
                    prop_assert_eq!(footprint.function_count(), expected.len());
                } else {
                    prop_assert!(footprint.is_err());
                }
            }
        }
    }
}
