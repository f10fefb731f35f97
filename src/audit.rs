//! Distance audit over the explored graph.
//!
//! If classical diagrams project to themselves, two classical diagrams that
//! are `k` moves apart through arbitrary diagrams should also be at most `k`
//! moves apart through classical diagrams alone. The audit indexes s-ified
//! nodes (in s-ify order, up to a limit), computes both distances by
//! breadth-first search restricted to the index, and reports every classical
//! pair whose classical distance is finite but longer than its virtual one.

use std::collections::{HashMap, VecDeque};
use tracing::{info, warn};

use crate::graph::{DiagramGraph, GraphError};
use crate::types::{AuditFinding, AuditReport, NodeId};

/// Default number of nodes indexed by the audit.
pub const DEFAULT_AUDIT_LIMIT: usize = 4000;

/// Compares virtual and classical move distances between classical nodes.
#[derive(Debug, Clone, Copy)]
pub struct DistanceAudit {
    limit: usize,
}

impl Default for DistanceAudit {
    fn default() -> Self {
        Self::new(DEFAULT_AUDIT_LIMIT)
    }
}

impl DistanceAudit {
    /// Audit at most `limit` nodes.
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    /// Run the audit.
    pub fn run(&self, graph: &DiagramGraph) -> Result<AuditReport, GraphError> {
        let order = graph.s_order();
        let indexed = &order[..order.len().min(self.limit)];
        let not_indexed = order.len() - indexed.len();
        if not_indexed > 0 {
            warn!(indexed = indexed.len(), not_indexed, "Audit index full");
        }

        let position: HashMap<NodeId, usize> =
            indexed.iter().enumerate().map(|(i, &id)| (id, i)).collect();

        let mut planar = Vec::with_capacity(indexed.len());
        let mut adjacency: Vec<Vec<usize>> = Vec::with_capacity(indexed.len());
        for &id in indexed {
            let node = graph.get(id)?;
            planar.push(node.is_planar());
            adjacency.push(
                node.neighbors
                    .iter()
                    .filter_map(|n| position.get(n).copied())
                    .collect(),
            );
        }

        let mut report = AuditReport { indexed: indexed.len(), not_indexed, ..Default::default() };
        for i in 0..indexed.len() {
            if !planar[i] {
                continue;
            }

            let virtual_dist = bfs(&adjacency, i, |_| true);
            let classical_dist = bfs(&adjacency, i, |k| planar[k]);

            for j in (i + 1)..indexed.len() {
                if !planar[j] {
                    continue;
                }
                report.pairs_checked += 1;

                let (Some(classical), Some(virt)) = (classical_dist[j], virtual_dist[j]) else {
                    continue;
                };
                if virt < classical {
                    report.findings.push(AuditFinding {
                        from: graph.get(indexed[i])?.code.clone(),
                        to: graph.get(indexed[j])?.code.clone(),
                        virtual_distance: virt,
                        classical_distance: classical,
                    });
                }
            }
        }

        info!(
            indexed = report.indexed,
            pairs = report.pairs_checked,
            findings = report.findings.len(),
            "Distance audit finished"
        );
        Ok(report)
    }
}

/// Hop distances from `start`, only passing through positions `allowed`.
fn bfs<F>(adjacency: &[Vec<usize>], start: usize, allowed: F) -> Vec<Option<u32>>
where
    F: Fn(usize) -> bool,
{
    let mut dist = vec![None; adjacency.len()];
    dist[start] = Some(0);
    let mut queue = VecDeque::from([start]);

    while let Some(cur) = queue.pop_front() {
        let next = dist[cur].unwrap_or(0) + 1;
        for &n in &adjacency[cur] {
            if dist[n].is_none() && allowed(n) {
                dist[n] = Some(next);
                queue.push_back(n);
            }
        }
    }
    dist
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Code, ElementModel};

    fn code(s: &str) -> Code {
        Code::parse(s).unwrap()
    }

    /// Two trefoils joined by a virtual shortcut and a longer classical path.
    fn shortcut_graph() -> DiagramGraph {
        let mut g = DiagramGraph::new(ElementModel::Oriented, 12).unwrap();
        let t1 = g.node(&code("U+0O+1U+2O+0U+1O+2")).unwrap();
        let t2 = g.node(&code("U-0O-1U-2O-0U-1O-2")).unwrap();
        let v = g.node(&code("U-0U+1O-0O+1")).unwrap();
        let k1 = g.node(&code("U+0O+0")).unwrap();
        let k2 = g.node(&code("U-0O-0")).unwrap();

        for (a, b) in [(t1, v), (v, t2), (t1, k1), (k1, k2), (k2, t2)] {
            g.link(a, b).unwrap();
        }
        for id in [t1, t2, v, k1, k2] {
            assert!(g.s_ify(id).unwrap());
        }
        g
    }

    #[test]
    fn test_bfs_respects_allowed() {
        let adjacency = vec![vec![1], vec![0, 2], vec![1]];
        assert_eq!(bfs(&adjacency, 0, |_| true), vec![Some(0), Some(1), Some(2)]);
        assert_eq!(bfs(&adjacency, 0, |k| k != 1), vec![Some(0), None, None]);
    }

    #[test]
    fn test_shortcut_is_reported() {
        let g = shortcut_graph();
        let report = DistanceAudit::default().run(&g).unwrap();

        assert_eq!(report.indexed, 5);
        assert_eq!(report.not_indexed, 0);
        assert_eq!(report.pairs_checked, 6);
        assert_eq!(
            report.findings,
            vec![AuditFinding {
                from: code("U+0O+1U+2O+0U+1O+2"),
                to: code("U-0O-1U-2O-0U-1O-2"),
                virtual_distance: 2,
                classical_distance: 3,
            }]
        );
    }

    #[test]
    fn test_limit_truncates_index() {
        let g = shortcut_graph();
        let report = DistanceAudit::new(2).run(&g).unwrap();
        assert_eq!(report.indexed, 2);
        assert_eq!(report.not_indexed, 3);
        assert!(report.findings.is_empty());
    }

    #[test]
    fn test_consistent_neighborhood_has_no_findings() {
        let mut g = DiagramGraph::new(ElementModel::Oriented, 12).unwrap();
        let root = g.node(&Code::empty()).unwrap();
        g.explore_neighbors(root, crate::moves::NeighborKind::Complete).unwrap();
        g.s_ify(root).unwrap();
        let neighbors: Vec<NodeId> = g.get(root).unwrap().neighbors.iter().copied().collect();
        for n in neighbors {
            g.s_ify(n).unwrap();
        }

        let report = DistanceAudit::default().run(&g).unwrap();
        assert_eq!(report.indexed, 7);
        assert!(report.findings.is_empty());
    }
}
