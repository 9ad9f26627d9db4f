//! §4.C Anchor clusterer (`Ancrage`): connected components of the bipartite
//! (T, Q) alignment graph, projected to T-nodes.

use crate::model::AlignmentRecord;
use crate::utils::intern::ContigId;
use crate::utils::{FastMap, FastSet};

/// Returns the connected components of `records`, each as a sorted list of
/// T-contig ids. Deterministic: components are emitted in ascending order of
/// their smallest member.
pub fn cluster(records: &[AlignmentRecord]) -> Vec<Vec<ContigId>> {
    cluster_edges(records.iter().map(|r| (r.tname, r.qname)))
}

/// Same connected-components algorithm as [`cluster`], but over bare
/// `(Tname, Qname)` edges rather than full records — used by the driver to
/// re-cluster verified `AggregatedPair`s without manufacturing fake
/// `AlignmentRecord`s.
pub fn cluster_edges(edges: impl Iterator<Item = (ContigId, ContigId)>) -> Vec<Vec<ContigId>> {
    let mut t_to_q: FastMap<ContigId, FastSet<ContigId>> = FastMap::default();
    let mut q_to_t: FastMap<ContigId, FastSet<ContigId>> = FastMap::default();

    for (tname, qname) in edges {
        t_to_q.entry(tname).or_default().insert(qname);
        q_to_t.entry(qname).or_default().insert(tname);
    }

    let mut all_t: Vec<ContigId> = t_to_q.keys().copied().collect();
    all_t.sort_unstable();

    let mut visited: FastSet<ContigId> = FastSet::default();
    let mut components = Vec::new();

    for &seed in &all_t {
        if visited.contains(&seed) {
            continue;
        }

        let mut t_set: FastSet<ContigId> = FastSet::default();
        t_set.insert(seed);
        let mut frontier_t = vec![seed];

        loop {
            let mut q_frontier: FastSet<ContigId> = FastSet::default();
            for t in &frontier_t {
                if let Some(qs) = t_to_q.get(t) {
                    q_frontier.extend(qs.iter().copied());
                }
            }

            let mut new_t = Vec::new();
            for q in &q_frontier {
                if let Some(ts) = q_to_t.get(q) {
                    for &t in ts {
                        if t_set.insert(t) {
                            new_t.push(t);
                        }
                    }
                }
            }

            if new_t.is_empty() {
                break;
            }
            frontier_t = new_t;
        }

        visited.extend(t_set.iter().copied());
        let mut component: Vec<ContigId> = t_set.into_iter().collect();
        component.sort_unstable();
        components.push(component);
    }

    components.sort_by_key(|c| c[0]);
    components
}
