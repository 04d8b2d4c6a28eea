//! Task dependency inference.
//!
//! Compares task titles and descriptions through the preprocessor's
//! sentence vectors.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, warn};
use triage_core::config::DependencyConfig;
use triage_core::Task;
use triage_nlp::Preprocessor;

use crate::error::InsightError;
use crate::types::DependencyMap;

/// Advisory task-to-task dependency inference from semantic similarity.
///
/// Task A depends on B when A's description or A's title reads like B's
/// title. The relation is not symmetric.
pub struct DependencyAnalyzer {
    pre: Arc<Preprocessor>,
    config: DependencyConfig,
}

impl DependencyAnalyzer {
    pub fn new(pre: Arc<Preprocessor>, config: DependencyConfig) -> Self {
        Self { pre, config }
    }

    /// Dependencies per task; tasks without any are omitted. Only the first
    /// `max_tasks` tasks are compared. Failures yield an empty map.
    pub fn analyze(&self, tasks: &[Task]) -> DependencyMap {
        match self.try_analyze(tasks) {
            Ok(map) => map,
            Err(e) => {
                warn!(error = %e, tasks = tasks.len(), "Dependency analysis failed");
                DependencyMap::new()
            }
        }
    }

    pub fn try_analyze(&self, tasks: &[Task]) -> Result<DependencyMap, InsightError> {
        let mut map = DependencyMap::new();
        if tasks.is_empty() {
            return Ok(map);
        }

        let batch = if tasks.len() > self.config.max_tasks {
            warn!(
                tasks = tasks.len(),
                max_tasks = self.config.max_tasks,
                "Task batch exceeds limit, analyzing the first tasks only"
            );
            &tasks[..self.config.max_tasks]
        } else {
            tasks
        };

        let threshold = self.config.similarity_threshold;
        for a in batch {
            let mut deps = BTreeSet::new();
            for b in batch.iter().filter(|b| b.id != a.id) {
                if let Some(desc) = a.description.as_deref().filter(|d| !d.trim().is_empty()) {
                    if f64::from(self.pre.similarity(desc, &b.title)?) > threshold {
                        deps.insert(b.id);
                    }
                }
                if f64::from(self.pre.similarity(&a.title, &b.title)?) > threshold {
                    deps.insert(b.id);
                }
            }
            if !deps.is_empty() {
                debug!(task = %a.id, count = deps.len(), "Found task dependencies");
                map.insert(a.id, deps);
            }
        }
        Ok(map)
    }
}
