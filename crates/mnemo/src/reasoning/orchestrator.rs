//! Query reasoning over memory and rules
//!
//! [`Reasoner`] owns a [`MemoryStore`] and a [`RuleEngine`] and runs every
//! query through the same pipeline: direct facts, memory recall, forward
//! chaining, canned question handlers and episodic analogies. Each stage
//! appends to one [`ReasoningTrace`] whose confidence is the maximum over
//! its steps.

use std::fmt;
use std::sync::Arc;

use tokio::sync::Mutex as TokioMutex;
use tracing::{debug, info};

use crate::config::{Config, ReasoningConfig};
use crate::memory::{MemoryStore, RecallResult, Tier, TierFilter};
use crate::reasoning::analogy::analogy_confidence;
use crate::reasoning::handlers::match_question;
use crate::reasoning::trace::{ReasoningStep, ReasoningTrace, StepKind};
use crate::rules::RuleEngine;
use crate::snapshot::CortexSnapshot;

/// Reasoner shared across tasks. Every public operation runs under the lock.
pub type SharedReasoner = Arc<TokioMutex<Reasoner>>;

pub struct Reasoner {
    memory: MemoryStore,
    rules: RuleEngine,
    config: ReasoningConfig,
}

impl Reasoner {
    pub fn new(memory: MemoryStore, rules: RuleEngine, config: ReasoningConfig) -> Self {
        Self {
            memory,
            rules,
            config,
        }
    }

    /// Build an empty store and engine from a loaded config
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            MemoryStore::new(config.memory.clone()),
            RuleEngine::new(config.reasoning.clone()),
            config.reasoning.clone(),
        )
    }

    pub fn into_shared(self) -> SharedReasoner {
        Arc::new(TokioMutex::new(self))
    }

    pub fn config(&self) -> &ReasoningConfig {
        &self.config
    }

    pub fn memory(&self) -> &MemoryStore {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut MemoryStore {
        &mut self.memory
    }

    pub fn rules(&self) -> &RuleEngine {
        &self.rules
    }

    pub fn rules_mut(&mut self) -> &mut RuleEngine {
        &mut self.rules
    }

    pub fn history(&self) -> impl Iterator<Item = &ReasoningTrace> {
        self.rules.history().iter()
    }

    /// Reason about a query using the configured chaining depth
    pub fn reason(&mut self, query: &str) -> ReasoningTrace {
        self.reason_with_depth(query, self.config.max_depth)
    }

    pub fn reason_with_depth(&mut self, query: &str, max_depth: usize) -> ReasoningTrace {
        let mut trace = ReasoningTrace::new(query);

        self.direct_facts(query, &mut trace);
        self.recall_memory(query, &mut trace);
        self.rules.apply_rules(query, &mut trace, 0, max_depth);
        self.answer_question(query, &mut trace);
        self.find_analogies(query, &mut trace);

        trace.finish();
        info!(
            query,
            steps = trace.steps.len(),
            conclusions = trace.conclusions.len(),
            confidence = trace.confidence,
            "Reasoning complete"
        );

        self.rules.cache_inference(query, trace.conclusions.clone());
        self.rules.record_trace(trace.clone());
        trace
    }

    fn direct_facts(&self, query: &str, trace: &mut ReasoningTrace) {
        for fact in self.rules.facts_matching(query) {
            trace.add_conclusion(ReasoningStep::new(
                StepKind::Fact,
                fact.source.as_str(),
                fact.content.as_str(),
                fact.confidence,
            ));
        }
    }

    fn recall_memory(&mut self, query: &str, trace: &mut ReasoningTrace) {
        let results = self.memory.recall(query, TierFilter::All);
        let Some(best) = results.first() else {
            return;
        };
        if trace.conclusions.is_empty() {
            trace.add_conclusion(memory_step(StepKind::Memory, best.tier.as_str(), best));
        }
    }

    fn answer_question(&mut self, query: &str, trace: &mut ReasoningTrace) {
        let Some((kind, subject)) = match_question(query) else {
            return;
        };
        debug!(kind = kind.as_str(), subject = %subject, "Question handler matched");

        let results = self.memory.recall(&subject, TierFilter::All);
        let step = match results.first() {
            Some(hit) => memory_step(StepKind::Pattern, kind.as_str(), hit),
            None => {
                let language = self.memory.processor().detect_language(query);
                ReasoningStep::new(
                    StepKind::Pattern,
                    kind.as_str(),
                    kind.fallback_answer(&subject, language),
                    kind.fallback_confidence(),
                )
            }
        };
        trace.add_conclusion(step);
    }

    fn find_analogies(&mut self, query: &str, trace: &mut ReasoningTrace) {
        let min_relevance = self.config.analogy_min_relevance;
        let candidates: Vec<RecallResult> = self
            .memory
            .recall(query, TierFilter::Only(Tier::Episodic))
            .into_iter()
            .filter(|r| r.relevance > min_relevance)
            .take(self.config.analogy_candidates)
            .collect();

        let processor = Arc::clone(self.memory.processor());
        for candidate in candidates {
            let Some(text) = candidate.content.as_text() else {
                continue;
            };
            if let Some(confidence) =
                analogy_confidence(query, text, processor.as_ref(), self.config.analogy_discount)
            {
                trace.add_conclusion(ReasoningStep::new(
                    StepKind::Analogy,
                    Tier::Episodic.as_str(),
                    format!("Similar to: {text}"),
                    confidence,
                ));
            }
        }
    }

    pub fn save(&self) -> CortexSnapshot {
        CortexSnapshot {
            memory: self.memory.save(),
            rules: self.rules.save(),
        }
    }

    pub fn load(&mut self, snapshot: CortexSnapshot) {
        self.memory.load(snapshot.memory);
        self.rules.load(snapshot.rules);
    }
}

fn memory_step(kind: StepKind, source: &str, hit: &RecallResult) -> ReasoningStep {
    ReasoningStep::new(
        kind,
        source,
        hit.content.to_string(),
        hit.relevance * hit.importance,
    )
}

impl Default for Reasoner {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl fmt::Debug for Reasoner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reasoner")
            .field("memory", &self.memory)
            .field("rules", &self.rules)
            .field("max_depth", &self.config.max_depth)
            .finish()
    }
}
