//! Rule engine with bounded forward chaining
//!
//! Rules are applied heuristically: a rule whose patterns loosely match
//! the text is applied against its first pattern, and each new conclusion is
//! fed back in as the next query. Recursion is bounded by the depth
//! counter and a per-chain application budget. There is no cycle detection
//! beyond that, so a self-referential rule fires at most once per depth level
//! along a path.

use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use std::num::NonZeroUsize;

use lru::LruCache;

use crate::config::ReasoningConfig;
use crate::reasoning::trace::{ReasoningStep, ReasoningTrace, StepKind};
use crate::rules::snapshot::{RULE_SNAPSHOT_VERSION, RuleSnapshot};
use crate::rules::types::{Conclusion, DEFAULT_FACT_SOURCE, Fact, Rule, RuleSpec};

pub struct RuleEngine {
    config: ReasoningConfig,
    /// Ordered by name so chaining visits rules deterministically
    rules: BTreeMap<String, Rule>,
    facts: Vec<Fact>,
    inferences: LruCache<String, Vec<String>>,
    history: VecDeque<ReasoningTrace>,
}

impl RuleEngine {
    pub fn new(config: ReasoningConfig) -> Self {
        let cache_capacity =
            NonZeroUsize::new(config.inference_cache_capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            config,
            rules: BTreeMap::new(),
            facts: Vec::new(),
            inferences: LruCache::new(cache_capacity),
            history: VecDeque::new(),
        }
    }

    pub fn config(&self) -> &ReasoningConfig {
        &self.config
    }

    /// Register a rule, replacing any rule with the same name.
    ///
    /// Templates are not validated until the rule is matched.
    pub fn add_rule(&mut self, name: impl Into<String>, spec: RuleSpec) {
        let name = name.into();
        tracing::debug!(rule = %name, "Adding rule");
        self.rules.insert(name.clone(), Rule::new(name, spec));
    }

    pub fn remove_rule(&mut self, name: &str) -> Option<Rule> {
        self.rules.remove(name)
    }

    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.rules.get(name)
    }

    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules.values()
    }

    /// Assert a fact from the default source. Returns false if an equal
    /// fact is already stored.
    pub fn add_fact(&mut self, content: impl Into<String>, confidence: f64) -> bool {
        self.add_fact_with_source(content, confidence, DEFAULT_FACT_SOURCE)
    }

    pub fn add_fact_with_source(
        &mut self,
        content: impl Into<String>,
        confidence: f64,
        source: impl Into<String>,
    ) -> bool {
        self.insert_fact(Fact::new(content, confidence, source))
    }

    /// Store a fact unless a structurally equal one is already present
    pub fn insert_fact(&mut self, fact: Fact) -> bool {
        if self.facts.contains(&fact) {
            return false;
        }
        self.facts.push(fact);
        true
    }

    pub fn facts(&self) -> &[Fact] {
        &self.facts
    }

    /// Facts whose content contains the query or is contained by it,
    /// highest confidence first
    pub fn facts_matching(&self, query: &str) -> Vec<&Fact> {
        let query = query.to_lowercase();
        let mut matching: Vec<&Fact> = self
            .facts
            .iter()
            .filter(|f| {
                let content = f.content.to_lowercase();
                content.contains(&query) || query.contains(&content)
            })
            .collect();
        matching.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        matching
    }

    /// Does any of the rule's patterns loosely match the text?
    ///
    /// Unknown rules and malformed templates count as no match.
    pub fn matches_rule(&self, text: &str, name: &str) -> bool {
        let Some(rule) = self.rules.get(name) else {
            return false;
        };
        match rule.matches(text) {
            Ok(matched) => matched,
            Err(e) => {
                tracing::debug!(rule = %name, error = %e, "Rule pattern failed to compile");
                false
            }
        }
    }

    /// Apply one rule to the text, bumping its usage count on success
    pub fn apply_rule(&mut self, text: &str, name: &str) -> Option<Conclusion> {
        let rule = self.rules.get_mut(name)?;
        match rule.apply(text) {
            Ok(conclusion) => conclusion,
            Err(e) => {
                tracing::debug!(rule = %name, error = %e, "Rule application failed");
                None
            }
        }
    }

    /// Forward-chain from `query`, appending new conclusions to `trace`.
    ///
    /// Stops descending once `depth >= max_depth` or the application
    /// budget for this chain runs out.
    pub fn apply_rules(
        &mut self,
        query: &str,
        trace: &mut ReasoningTrace,
        depth: usize,
        max_depth: usize,
    ) {
        let mut budget = self.config.max_rule_applications;
        self.chain(query, trace, depth, max_depth, &mut budget);
        if budget == 0 {
            tracing::warn!(
                query,
                limit = self.config.max_rule_applications,
                "Rule application budget exhausted, chaining stopped early"
            );
        }
    }

    fn chain(
        &mut self,
        query: &str,
        trace: &mut ReasoningTrace,
        depth: usize,
        max_depth: usize,
        budget: &mut usize,
    ) {
        if depth >= max_depth {
            return;
        }

        let names: Vec<String> = self.rules.keys().cloned().collect();
        for name in names {
            if *budget == 0 {
                return;
            }
            if !self.matches_rule(query, &name) {
                continue;
            }
            *budget -= 1;

            let Some(conclusion) = self.apply_rule(query, &name) else {
                continue;
            };
            if trace.has_conclusion(&conclusion.content) {
                continue;
            }

            tracing::debug!(
                rule = %name,
                depth,
                conclusion = %conclusion.content,
                "Rule fired"
            );
            trace.add_conclusion(
                ReasoningStep::new(
                    StepKind::Rule,
                    name.as_str(),
                    conclusion.content.as_str(),
                    conclusion.confidence,
                )
                .at_depth(depth),
            );
            self.chain(&conclusion.content, trace, depth + 1, max_depth, budget);
        }
    }

    /// Remember the conclusions reached for a query
    pub fn cache_inference(&mut self, query: impl Into<String>, conclusions: Vec<String>) {
        self.inferences.put(query.into(), conclusions);
    }

    pub fn cached_inference(&self, query: &str) -> Option<&Vec<String>> {
        self.inferences.peek(query)
    }

    /// Append a finished trace, dropping the oldest beyond capacity
    pub fn record_trace(&mut self, trace: ReasoningTrace) {
        self.history.push_back(trace);
        while self.history.len() > self.config.history_capacity {
            self.history.pop_front();
        }
    }

    pub fn history(&self) -> &VecDeque<ReasoningTrace> {
        &self.history
    }

    pub fn save(&self) -> RuleSnapshot {
        let skip = self
            .history
            .len()
            .saturating_sub(self.config.snapshot_history);

        RuleSnapshot {
            version: RULE_SNAPSHOT_VERSION,
            rules: Some(
                self.rules
                    .iter()
                    .map(|(name, rule)| (name.clone(), rule.clone()))
                    .collect(),
            ),
            facts: Some(self.facts.clone()),
            // LruCache iterates most recent first; store oldest first so load replays in order
            inferences: Some(
                self.inferences
                    .iter()
                    .rev()
                    .map(|(q, c)| (q.clone(), c.clone()))
                    .collect(),
            ),
            reasoning_history: Some(self.history.iter().skip(skip).cloned().collect()),
        }
    }

    /// Restore from a snapshot; missing fields keep their current values.
    /// Rule templates are taken as-is.
    pub fn load(&mut self, snapshot: RuleSnapshot) {
        if snapshot.version != RULE_SNAPSHOT_VERSION {
            tracing::warn!(
                version = snapshot.version,
                expected = RULE_SNAPSHOT_VERSION,
                "Loading rule snapshot with unexpected version"
            );
        }

        if let Some(rules) = snapshot.rules {
            self.rules = rules.into_iter().collect();
        }
        if let Some(facts) = snapshot.facts {
            self.facts = facts;
        }
        if let Some(inferences) = snapshot.inferences {
            self.inferences.clear();
            for (query, conclusions) in inferences {
                self.inferences.put(query, conclusions);
            }
        }
        if let Some(history) = snapshot.reasoning_history {
            self.history = history.into();
            while self.history.len() > self.config.history_capacity {
                self.history.pop_front();
            }
        }

        tracing::info!(
            rules = self.rules.len(),
            facts = self.facts.len(),
            history = self.history.len(),
            "Loaded rule snapshot"
        );
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new(ReasoningConfig::default())
    }
}

impl fmt::Debug for RuleEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleEngine")
            .field("rules", &self.rules.len())
            .field("facts", &self.facts.len())
            .field("inferences", &self.inferences.len())
            .field("history", &self.history.len())
            .finish()
    }
}
