use crate::error::{ResolveError, TraversalError};
use crate::lineage::graph::GenealogyGraph;
use crate::resolver::Resolver;
use crate::types::{PersonRecord, TraversalDirections};
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use tracing::{debug, info, warn};

/// Relation followed when expanding a queued id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraversalDirection {
    /// Towards advisors
    Ancestors,
    /// Towards advisees
    Descendants,
}

/// Breadth-first graph builder over a [`Resolver`].
///
/// Seeds expand in every enabled direction. Anything reached through an
/// advisor link keeps expanding advisors only, and likewise for advisees, so
/// a seed's academic siblings are never pulled in.
pub struct GraphTraversal<R> {
    resolver: R,
    directions: TraversalDirections,
    frontier: VecDeque<(u64, TraversalDirection)>,
    visited: HashSet<(u64, TraversalDirection)>,
    unresolved: BTreeSet<u64>,
    /// (advisor, advisee) links waiting for the keyed id to be resolved
    pending_links: HashMap<u64, Vec<(u64, u64)>>,
}

impl<R: Resolver> GraphTraversal<R> {
    pub fn new(resolver: R, directions: TraversalDirections) -> Self {
        Self {
            resolver,
            directions,
            frontier: VecDeque::new(),
            visited: HashSet::new(),
            unresolved: BTreeSet::new(),
            pending_links: HashMap::new(),
        }
    }

    pub fn directions(&self) -> TraversalDirections {
        self.directions
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Ids the resolver reported unknown during the last build, ascending.
    pub fn unresolved(&self) -> Vec<u64> {
        self.unresolved.iter().copied().collect()
    }

    /// Resolve the seeds and everything reachable from them in the enabled
    /// directions.
    ///
    /// An unknown seed aborts the build; an unknown id found along the way is
    /// skipped and reported by [`unresolved`](Self::unresolved).
    pub async fn build(&mut self, seeds: &[u64]) -> Result<GenealogyGraph, TraversalError> {
        if seeds.is_empty() {
            return Err(TraversalError::NoSeeds);
        }

        self.reset();
        let mut graph = GenealogyGraph::new();

        info!(
            "Building genealogy from {} seed(s) (ancestors: {}, descendants: {})",
            seeds.len(),
            self.directions.ancestors,
            self.directions.descendants
        );

        for &seed in seeds {
            if !graph.has_node(seed) {
                match self.resolver.resolve(seed).await {
                    Ok(person) => self.insert(&mut graph, seed, person, true)?,
                    Err(ResolveError::UnknownId(_)) => {
                        return Err(TraversalError::SeedUnresolvable(seed));
                    }
                    Err(e) => return Err(e.into()),
                }
            }

            if self.directions.ancestors {
                self.enqueue(seed, TraversalDirection::Ancestors);
            }
            if self.directions.descendants {
                self.enqueue(seed, TraversalDirection::Descendants);
            }
        }

        while let Some((id, direction)) = self.frontier.pop_front() {
            if !graph.has_node(id) {
                if self.unresolved.contains(&id) {
                    continue;
                }

                match self.resolver.resolve(id).await {
                    Ok(person) => self.insert(&mut graph, id, person, false)?,
                    Err(ResolveError::UnknownId(_)) => {
                        warn!("Skipping unknown identifier {}", id);
                        self.unresolved.insert(id);
                        continue;
                    }
                    Err(e) => return Err(e.into()),
                }
            }

            let node = graph.get_node(id)?;
            let next: Vec<u64> = match direction {
                TraversalDirection::Ancestors => node.ancestors().iter().copied().collect(),
                TraversalDirection::Descendants => node.descendants().iter().copied().collect(),
            };

            for related in next {
                self.enqueue(related, direction);
            }
        }

        info!(
            "Genealogy complete: {} node(s), {} edge(s), {} unresolved",
            graph.node_count(),
            graph.edge_count(),
            self.unresolved.len()
        );

        Ok(graph)
    }

    fn reset(&mut self) {
        self.frontier.clear();
        self.visited.clear();
        self.unresolved.clear();
        self.pending_links.clear();
    }

    fn enqueue(&mut self, id: u64, direction: TraversalDirection) {
        if self.visited.insert((id, direction)) {
            debug!("Queued {} ({:?})", id, direction);
            self.frontier.push_back((id, direction));
        }
    }

    /// Add a resolved person and reconcile links in both directions with
    /// every node already present.
    fn insert(
        &mut self,
        graph: &mut GenealogyGraph,
        id: u64,
        person: PersonRecord,
        is_seed: bool,
    ) -> Result<(), TraversalError> {
        let ancestors: BTreeSet<u64> = if self.directions.ancestors {
            person.ancestor_ids.into_iter().collect()
        } else {
            BTreeSet::new()
        };
        let descendants: BTreeSet<u64> = if self.directions.descendants {
            person.descendant_ids.into_iter().collect()
        } else {
            BTreeSet::new()
        };

        graph.add_node(
            person.name,
            person.institution,
            person.year,
            id,
            ancestors.clone(),
            descendants.clone(),
            is_seed,
        )?;

        let links = ancestors
            .into_iter()
            .map(|ancestor| (ancestor, id))
            .chain(descendants.into_iter().map(|descendant| (id, descendant)));

        for (advisor, advisee) in links {
            if advisor == advisee {
                continue;
            }
            let other = if advisor == id { advisee } else { advisor };
            if graph.has_node(other) {
                graph.link(advisor, advisee)?;
            } else {
                self.pending_links
                    .entry(other)
                    .or_default()
                    .push((advisor, advisee));
            }
        }

        for (advisor, advisee) in self.pending_links.remove(&id).unwrap_or_default() {
            graph.link(advisor, advisee)?;
        }

        Ok(())
    }
}
