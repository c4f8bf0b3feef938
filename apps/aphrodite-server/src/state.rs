//! Application state shared by all handlers.

use aphrodite::chart::{ChartAssembler, ChartId, NatalChart};
use aphrodite::ephemeris::PositionProvider;
use aphrodite::synastry::CompatibilityScorer;
use aphrodite::{ChartResult, EngineConfig};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::RwLock;

pub type SharedProvider = Arc<dyn PositionProvider>;

/// Recently built charts by id, oldest evicted first once full.
#[derive(Debug)]
pub struct ChartCache {
    capacity: usize,
    inner: RwLock<CacheInner>,
}

#[derive(Debug, Default)]
struct CacheInner {
    charts: HashMap<ChartId, Arc<NatalChart>>,
    order: VecDeque<ChartId>,
}

impl ChartCache {
    /// A capacity of 0 disables caching.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            inner: RwLock::new(CacheInner::default()),
        }
    }

    pub async fn get(&self, id: &ChartId) -> Option<Arc<NatalChart>> {
        self.inner.read().await.charts.get(id).cloned()
    }

    pub async fn insert(&self, chart: Arc<NatalChart>) {
        if self.capacity == 0 {
            return;
        }
        let mut inner = self.inner.write().await;
        let id = chart.id().clone();
        if inner.charts.insert(id.clone(), chart).is_none() {
            inner.order.push_back(id);
        }
        while inner.order.len() > self.capacity {
            if let Some(oldest) = inner.order.pop_front() {
                inner.charts.remove(&oldest);
            }
        }
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.charts.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub assembler: Arc<ChartAssembler<SharedProvider>>,
    pub scorer: Arc<CompatibilityScorer>,
    pub charts: Arc<ChartCache>,
}

impl AppState {
    /// Fails when the configuration has no `[scoring]` section.
    pub fn new(
        provider: SharedProvider,
        config: &EngineConfig,
        cache_capacity: usize,
    ) -> ChartResult<Self> {
        let assembler = ChartAssembler::from_config(provider, config)?;
        let scorer = CompatibilityScorer::new(
            config.require_scoring()?.clone(),
            config.aspects.clone(),
        )?;
        Ok(Self {
            assembler: Arc::new(assembler),
            scorer: Arc::new(scorer),
            charts: Arc::new(ChartCache::new(cache_capacity)),
        })
    }
}
