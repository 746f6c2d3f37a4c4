use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, PoisonError};

use lru::LruCache;

use crate::graph::{GraphBuilder, RoadGraph};
use crate::store::RoadSnapshot;

/// Built road graphs keyed by store revision.
///
/// Graphs are built outside the lock, so two requests racing on a fresh
/// revision may both build; the second insert simply replaces the first.
pub struct GraphCache {
    builder: GraphBuilder,
    graphs: Mutex<LruCache<u64, Arc<RoadGraph>>>,
}

impl GraphCache {
    pub fn new(capacity: usize) -> Self {
        Self::with_builder(capacity, GraphBuilder::default())
    }

    pub fn with_builder(capacity: usize, builder: GraphBuilder) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            builder,
            graphs: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn get_or_build(&self, snapshot: &RoadSnapshot) -> Arc<RoadGraph> {
        if let Some(graph) = self.lock().get(&snapshot.revision) {
            return Arc::clone(graph);
        }

        let graph = Arc::new(self.builder.build(&snapshot.roads));
        tracing::debug!(
            revision = snapshot.revision,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "cached road graph"
        );
        self.lock().put(snapshot.revision, Arc::clone(&graph));
        graph
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LruCache<u64, Arc<RoadGraph>>> {
        self.graphs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
