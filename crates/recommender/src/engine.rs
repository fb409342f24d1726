use crate::{
    assembler::{RecommendationOutcome, StrategyRun, assemble},
    config::EngineConfig,
    embedding::{CorpusIndex, EmbedError, Embedder, build_embedder},
    error::{EngineError, StrategyError},
    reference::ReferenceData,
    stats::CatalogStats,
    strategies::{MatchContext, MatchStrategy, default_strategies},
};
use models::{
    offering::{Interest, InterestId},
    recommendation::InterestSummary,
};
use parking_lot::RwLock;
use rayon::prelude::*;
use std::{
    any::Any,
    panic::{AssertUnwindSafe, catch_unwind},
    sync::Arc,
    time::Instant,
};

/// Catalog tables and the corpus embedded from them, never mutated once built
#[derive(Debug)]
pub struct Snapshot {
    pub reference: ReferenceData,
    pub corpus: CorpusIndex,
}

impl Snapshot {
    fn build(reference: ReferenceData, embedder: &dyn Embedder) -> Result<Self, EngineError> {
        let started = Instant::now();
        let corpus = CorpusIndex::build(&reference, embedder)?;

        log::info!(
            "Built snapshot with {} courses, {} offerings, {} interests and {} embedded courses ({} EAD) in {:?} using the {} embedder",
            reference.courses().count(),
            reference.offerings().len(),
            reference.interests().len(),
            corpus.full().len(),
            corpus.distance_learning().len(),
            started.elapsed(),
            embedder.name()
        );

        Ok(Self { reference, corpus })
    }
}

/// Recommends offerings for recorded interests.
///
/// The current snapshot sits behind a lock that is only held long enough to
/// clone its `Arc`, so [`RecommendationEngine::reload`] never waits for
/// requests and requests in flight finish on the snapshot they started with.
pub struct RecommendationEngine {
    snapshot: RwLock<Arc<Snapshot>>,
    embedder: Arc<dyn Embedder>,
    strategies: Vec<Box<dyn MatchStrategy>>,
    config: EngineConfig,
}

impl RecommendationEngine {
    /// Builds the engine with the five default strategies.
    ///
    /// Fails when the embedder cannot produce vectors, since neither the
    /// corpus nor any similarity query would work without it.
    pub fn new(
        reference: ReferenceData,
        embedder: Arc<dyn Embedder>,
        config: EngineConfig,
    ) -> Result<Self, EngineError> {
        if embedder.dimension() == 0 {
            return Err(EngineError::ZeroDimension);
        }

        let sample = embedder.embed("")?;
        if sample.len() != embedder.dimension() {
            return Err(EmbedError::DimensionMismatch {
                expected: embedder.dimension(),
                actual: sample.len(),
            }
            .into());
        }

        let snapshot = Snapshot::build(reference, embedder.as_ref())?;

        Ok(Self {
            snapshot: RwLock::new(Arc::new(snapshot)),
            embedder,
            strategies: default_strategies(),
            config,
        })
    }

    /// Builds the embedder selected in `config`, then the engine
    pub fn from_config(reference: ReferenceData, config: EngineConfig) -> Result<Self, EngineError> {
        let embedder = build_embedder(&config)?;
        Self::new(reference, embedder, config)
    }

    /// Replaces the strategy set, mostly useful for tests
    pub fn with_strategies(mut self, strategies: Vec<Box<dyn MatchStrategy>>) -> Self {
        self.strategies = strategies;
        self
    }

    /// Builds a snapshot from fresh catalog tables and swaps it in.
    ///
    /// On error the current snapshot stays in place.
    pub fn reload(&self, reference: ReferenceData) -> Result<(), EngineError> {
        let snapshot = Arc::new(Snapshot::build(reference, self.embedder.as_ref())?);
        *self.snapshot.write() = snapshot;
        log::info!("Swapped in the new catalog snapshot");
        Ok(())
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.snapshot.read().clone()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn embedder(&self) -> &dyn Embedder {
        self.embedder.as_ref()
    }

    /// Ranked recommendations for one interest
    pub fn generate_recommendations(&self, interest_id: InterestId) -> RecommendationOutcome {
        let snapshot = self.snapshot();

        let Some(interest) = snapshot.reference.interest(interest_id) else {
            log::warn!("Interest {interest_id} not found");
            return RecommendationOutcome::NotFound;
        };

        let runs = self.run_strategies(&snapshot, interest);
        let outcome = assemble(
            &snapshot.reference,
            interest,
            runs,
            self.config.similarity_floor,
        );

        match &outcome {
            RecommendationOutcome::Ranked(rows) => {
                log::info!("{} recommendations for interest {interest_id}", rows.len())
            }
            _ => log::info!("No recommendations for interest {interest_id}"),
        }

        outcome
    }

    /// Outcomes for several interests, in input order
    pub fn generate_batch(
        &self,
        interest_ids: &[InterestId],
    ) -> Vec<(InterestId, RecommendationOutcome)> {
        interest_ids
            .par_iter()
            .map(|&id| (id, self.generate_recommendations(id)))
            .collect()
    }

    /// The first interests of the snapshot, up to the configured list limit
    pub fn list_available_interests(&self) -> Vec<InterestSummary> {
        let snapshot = self.snapshot();
        snapshot
            .reference
            .interests()
            .iter()
            .take(self.config.list_limit)
            .map(|interest| snapshot.reference.interest_summary(interest))
            .collect()
    }

    pub fn interest_summary(&self, interest_id: InterestId) -> Option<InterestSummary> {
        let snapshot = self.snapshot();
        snapshot
            .reference
            .interest(interest_id)
            .map(|interest| snapshot.reference.interest_summary(interest))
    }

    pub fn stats(&self) -> CatalogStats {
        CatalogStats::collect(&self.snapshot().reference)
    }

    fn run_strategies(&self, snapshot: &Snapshot, interest: &Interest) -> Vec<StrategyRun> {
        let ctx = MatchContext {
            reference: &snapshot.reference,
            corpus: &snapshot.corpus,
            embedder: self.embedder.as_ref(),
            config: &self.config,
        };

        let run = |strategy: &Box<dyn MatchStrategy>| {
            let candidates = match run_isolated(strategy.as_ref(), &ctx, interest) {
                Ok(candidates) => candidates,
                Err(err) => {
                    log::error!(
                        "Strategy {} failed for interest {}: {err}",
                        strategy.strategy(),
                        interest.id
                    );
                    Vec::new()
                }
            };
            log::debug!(
                "{} found {} candidates for interest {}",
                strategy.strategy(),
                candidates.len(),
                interest.id
            );

            StrategyRun {
                strategy: strategy.strategy(),
                candidates,
            }
        };

        if self.config.parallel_strategies {
            self.strategies.par_iter().map(run).collect()
        } else {
            self.strategies.iter().map(run).collect()
        }
    }
}

fn run_isolated(
    strategy: &dyn MatchStrategy,
    ctx: &MatchContext<'_>,
    interest: &Interest,
) -> Result<Vec<crate::strategies::Candidate>, StrategyError> {
    catch_unwind(AssertUnwindSafe(|| strategy.find(ctx, interest)))
        .unwrap_or_else(|payload| Err(StrategyError::Panicked(panic_message(payload))))
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        embedding::HashEmbedder,
        strategies::fixtures::{course, interest, offering, unit},
    };
    use models::schedule::Schedule;

    fn reference(interest_unit: u64) -> ReferenceData {
        ReferenceData::new(
            vec![course(101, "Tecnologia", "Programador Web", "PRESENCIAL")],
            vec![unit(1, Some((0.0, 0.0))), unit(2, Some((1.0, 0.0)))],
            vec![],
            vec![
                offering(1, 101, 1, Schedule::default()),
                offering(2, 101, 2, Schedule::default()),
            ],
            vec![interest(101, interest_unit)],
        )
    }

    fn engine() -> RecommendationEngine {
        RecommendationEngine::new(
            reference(1),
            Arc::new(HashEmbedder::default()),
            EngineConfig::default(),
        )
        .unwrap()
    }

    struct Offline;

    impl Embedder for Offline {
        fn name(&self) -> &'static str {
            "offline"
        }

        fn dimension(&self) -> usize {
            8
        }

        fn embed(&self, _: &str) -> Result<Vec<f32>, EmbedError> {
            Err(EmbedError::Unavailable("model not loaded".to_string()))
        }
    }

    #[test]
    fn unavailable_embedder_fails_construction() {
        let result = RecommendationEngine::new(
            ReferenceData::default(),
            Arc::new(Offline),
            EngineConfig::default(),
        );
        assert!(matches!(result, Err(EngineError::Embedding(_))));
    }

    #[test]
    fn from_config_builds_the_selected_backend() {
        let engine = RecommendationEngine::from_config(
            reference(1),
            EngineConfig {
                embedder: crate::config::EmbedderKind::Hash,
                hash_dimension: 16,
                ..EngineConfig::default()
            },
        )
        .unwrap();

        assert_eq!(engine.embedder().name(), "hash");
        assert_eq!(engine.embedder().dimension(), 16);
        let rows = engine.generate_recommendations(1).into_recommendations();
        assert_eq!(rows[0].offering.offering_id, 1);
    }

    #[test]
    fn unknown_interest_is_not_found() {
        assert!(engine().generate_recommendations(42).is_not_found());
    }

    #[test]
    fn reload_swaps_the_snapshot() {
        let engine = engine();
        let before = engine.snapshot();

        engine.reload(reference(2)).unwrap();

        let rows = engine.generate_recommendations(1).into_recommendations();
        assert_eq!(rows[0].offering.offering_id, 2);
        // Holders of the old snapshot keep seeing it
        assert_eq!(before.reference.interests()[0].unit_id, 1);
    }

    #[test]
    fn batch_keeps_input_order() {
        let ids: Vec<InterestId> = engine()
            .generate_batch(&[42, 1, 7])
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        assert_eq!(ids, vec![42, 1, 7]);
    }

    #[test]
    fn list_is_bounded() {
        let engine = RecommendationEngine::new(
            reference(1),
            Arc::new(HashEmbedder::default()),
            EngineConfig {
                list_limit: 0,
                ..EngineConfig::default()
            },
        )
        .unwrap();
        assert!(engine.list_available_interests().is_empty());
    }

    #[test]
    fn panic_payloads_become_messages() {
        assert_eq!(panic_message(Box::new("boom")), "boom");
        assert_eq!(panic_message(Box::new("boom".to_string())), "boom");
        assert_eq!(panic_message(Box::new(3)), "unknown panic");
    }
}
