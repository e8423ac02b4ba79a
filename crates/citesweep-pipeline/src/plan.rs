//! Sweep plan - the combinatorial set of cells to run

use crate::config::SweepConfig;
use citesweep_domain::{PromptSpec, ProviderKind, SweepCell};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptItem {
    /// Prompt text
    pub prompt: String,

    /// Category label
    #[serde(default)]
    pub category: String,
}

/// Prompts grouped by conflict, then subcategory, in document order
pub type PromptCatalog = IndexMap<String, IndexMap<String, Vec<PromptItem>>>;

/// Flatten a catalog into labelled prompts, keeping at most `top_n`
pub fn flatten_catalog(catalog: &PromptCatalog, top_n: Option<usize>) -> Vec<PromptSpec> {
    let prompts = catalog.iter().flat_map(|(conflict, groups)| {
        groups.iter().flat_map(move |(subcategory, items)| {
            items.iter().map(move |item| PromptSpec {
                prompt: item.prompt.clone(),
                conflict: conflict.clone(),
                category: item.category.clone(),
                subcategory: subcategory.clone(),
            })
        })
    });

    match top_n {
        Some(n) => prompts.take(n).collect(),
        None => prompts.collect(),
    }
}

/// Ordered list of sweep cells
///
/// Nesting order is provider, prompt, temperature, iteration; iterations
/// are numbered from 1.
#[derive(Debug, Clone, Default)]
pub struct SweepPlan {
    cells: Vec<SweepCell>,
}

impl SweepPlan {
    /// Build the cartesian product of the sweep dimensions
    pub fn new(providers: &[ProviderKind], prompts: &[PromptSpec], config: &SweepConfig) -> Self {
        let mut cells = Vec::with_capacity(
            providers.len() * prompts.len() * config.temperatures.len() * config.iterations as usize,
        );
        for provider in providers {
            for prompt in prompts {
                for temperature in &config.temperatures {
                    for iteration in 1..=config.iterations {
                        cells.push(SweepCell {
                            provider: *provider,
                            prompt: prompt.clone(),
                            temperature: *temperature,
                            iteration,
                        });
                    }
                }
            }
        }
        Self { cells }
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the plan has no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The cells in execution order
    pub fn cells(&self) -> &[SweepCell] {
        &self.cells
    }

    /// Number of cells per provider
    pub fn calls_per_provider(&self) -> usize {
        let providers = self
            .cells
            .iter()
            .map(|c| c.provider)
            .collect::<std::collections::BTreeSet<_>>()
            .len();
        if providers == 0 {
            0
        } else {
            self.cells.len() / providers
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> PromptCatalog {
        toml::from_str(
            r#"
            [[conflict_b.timeline]]
            prompt = "B1"
            category = "neutral"

            [[conflict_b.timeline]]
            prompt = "B2"
            category = "loaded"

            [[conflict_a.casualties]]
            prompt = "A1"
            category = "neutral"
            "#,
        )
        .unwrap()
    }

    #[test]
    fn test_flatten_keeps_document_order() {
        let prompts = flatten_catalog(&catalog(), None);
        let texts: Vec<_> = prompts.iter().map(|p| p.prompt.as_str()).collect();
        assert_eq!(texts, vec!["B1", "B2", "A1"]);
        assert_eq!(prompts[2].conflict, "conflict_a");
        assert_eq!(prompts[2].subcategory, "casualties");
        assert_eq!(prompts[1].category, "loaded");
    }

    #[test]
    fn test_flatten_top_n() {
        assert_eq!(flatten_catalog(&catalog(), Some(2)).len(), 2);
        assert_eq!(flatten_catalog(&catalog(), Some(10)).len(), 3);
    }

    #[test]
    fn test_plan_is_cartesian_product() {
        let prompts = flatten_catalog(&catalog(), None);
        let config = SweepConfig {
            temperatures: vec![0.0, 1.0],
            iterations: 2,
            top_n: None,
        };
        let plan = SweepPlan::new(&[ProviderKind::Claude, ProviderKind::Gemini], &prompts, &config);

        assert_eq!(plan.len(), 2 * 3 * 2 * 2);
        assert_eq!(plan.calls_per_provider(), 12);

        let first = &plan.cells()[0];
        assert_eq!(first.provider, ProviderKind::Claude);
        assert_eq!(first.prompt.prompt, "B1");
        assert_eq!(first.temperature, 0.0);
        assert_eq!(first.iteration, 1);

        let second = &plan.cells()[1];
        assert_eq!(second.temperature, 0.0);
        assert_eq!(second.iteration, 2);

        assert_eq!(plan.cells()[12].provider, ProviderKind::Gemini);
    }

    #[test]
    fn test_empty_dimensions() {
        let plan = SweepPlan::new(&[], &[], &SweepConfig::default());
        assert!(plan.is_empty());
        assert_eq!(plan.calls_per_provider(), 0);
    }
}
