// Pricing service
//
// Resolves request-time model ids ("gpt-4o-B5") to per-token prices and a
// best-of-N count using the static alias map and pricing table.
// - Never fails: unknown models resolve to a zero-priced "Unknown" sentinel
// - Stateless: tables are read-only, results are built fresh per call

use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::models::{PricingRecord, ResolvedModel};
use crate::services::pricing_table::{BASE_PRICING, MODEL_ALIASES};
use crate::utils::model_helper::parse_best_of_n_model;

/// Summary of the loaded tables
#[derive(Debug, Clone, Serialize)]
pub struct PricingStatus {
    pub model_count: usize,
    pub alias_count: usize,
    /// Aliases whose canonical key has no pricing record
    pub unpriced_aliases: Vec<String>,
}

/// Model identifier and pricing resolver
#[derive(Debug, Clone, Copy)]
pub struct PricingService {
    pricing: &'static HashMap<&'static str, PricingRecord>,
    aliases: &'static HashMap<&'static str, &'static str>,
}

impl Default for PricingService {
    fn default() -> Self {
        Self::new()
    }
}

impl PricingService {
    /// Create a resolver over the built-in tables
    pub fn new() -> Self {
        Self {
            pricing: &BASE_PRICING,
            aliases: &MODEL_ALIASES,
        }
    }

    /// Canonical pricing key for a user-facing model name
    pub fn canonical_key(&self, base_model: &str) -> Option<&'static str> {
        self.aliases.get(base_model).copied()
    }

    /// Pricing record for a canonical key
    pub fn get_model_pricing(&self, canonical_key: &str) -> Option<&'static PricingRecord> {
        self.pricing.get(canonical_key)
    }

    /// Resolve a model id, with or without a `-B<n>` suffix
    pub fn resolve(&self, model_id: &str) -> ResolvedModel {
        let parsed = parse_best_of_n_model(model_id);

        let canonical = self.canonical_key(&parsed.base_model);
        let record = canonical.and_then(|key| self.get_model_pricing(key));

        match record {
            Some(record) => {
                debug!(
                    "💰 Resolved {} → {} (best of {})",
                    model_id,
                    canonical.unwrap_or_default(),
                    parsed.best_of_n
                );
                ResolvedModel::from_record(record, parsed.best_of_n)
            }
            None => {
                warn!(
                    "Pricing not found for model \"{}\" (mapped key: {:?})",
                    model_id, canonical
                );
                ResolvedModel::unknown(parsed.best_of_n)
            }
        }
    }

    /// Whether a model id resolves to a priced model
    pub fn is_model_supported(&self, model_id: &str) -> bool {
        let parsed = parse_best_of_n_model(model_id);
        self.canonical_key(&parsed.base_model)
            .and_then(|key| self.get_model_pricing(key))
            .is_some()
    }

    /// User-facing names that resolve to a priced model, sorted
    pub fn supported_models(&self) -> Vec<&'static str> {
        let mut models: Vec<&'static str> = self
            .aliases
            .iter()
            .filter(|(_, key)| self.pricing.contains_key(*key))
            .map(|(alias, _)| *alias)
            .collect();
        models.sort_unstable();
        models
    }

    /// Get table status
    pub fn get_status(&self) -> PricingStatus {
        let mut unpriced_aliases: Vec<String> = self
            .aliases
            .iter()
            .filter(|(_, key)| !self.pricing.contains_key(*key))
            .map(|(alias, _)| alias.to_string())
            .collect();
        unpriced_aliases.sort();

        PricingStatus {
            model_count: self.pricing.len(),
            alias_count: self.aliases.len(),
            unpriced_aliases,
        }
    }
}

/// Resolve a model id against the built-in tables
pub fn resolve_model(model_id: &str) -> ResolvedModel {
    PricingService::new().resolve(model_id)
}
