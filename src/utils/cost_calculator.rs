// Cost calculation
//
// Turns aggregated token sums into USD:
// - Per-model prices from the pricing service when the model is known
// - Flat fallback rates when no model is attached (token-type views)
// - Reasoning tokens are billed at the output rate

use serde::Serialize;

use crate::config::Settings;
use crate::models::{Dimension, TokenSums};
use crate::services::pricing_service::PricingService;

/// Service fee added on top of purchased credits
pub const CREDIT_SERVICE_FEE: f64 = 0.10;

const TOKENS_PER_MILLION: f64 = 1_000_000.0;

/// Flat rates used when a cost has no model to price against (USD per 1M tokens)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FallbackRates {
    pub input_per_million: f64,
    pub output_per_million: f64,
}

impl Default for FallbackRates {
    fn default() -> Self {
        Self {
            input_per_million: 1.0,
            output_per_million: 2.0,
        }
    }
}

impl FallbackRates {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            input_per_million: settings.pricing.fallback_input_per_million,
            output_per_million: settings.pricing.fallback_output_per_million,
        }
    }
}

/// Cost split by token type (USD)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CostBreakdown {
    pub input: f64,
    pub output: f64,
    pub reasoning: f64,
    pub total: f64,
}

impl CostBreakdown {
    fn from_rates(sums: &TokenSums, input_per_million: f64, output_per_million: f64) -> Self {
        let input = sums.input_tokens as f64 * input_per_million / TOKENS_PER_MILLION;
        let output = sums.output_tokens as f64 * output_per_million / TOKENS_PER_MILLION;
        let reasoning = sums.reasoning_tokens as f64 * output_per_million / TOKENS_PER_MILLION;

        Self {
            input,
            output,
            reasoning,
            total: input + output + reasoning,
        }
    }
}

/// Cost calculator
#[derive(Debug, Clone, Copy, Default)]
pub struct CostCalculator {
    rates: FallbackRates,
    pricing: PricingService,
}

impl CostCalculator {
    pub fn new(rates: FallbackRates) -> Self {
        Self {
            rates,
            pricing: PricingService::new(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(FallbackRates::from_settings(settings))
    }

    pub fn rates(&self) -> FallbackRates {
        self.rates
    }

    /// Cost of a set of token sums
    ///
    /// With a model the resolver's prices apply (unknown models cost nothing);
    /// without one the fallback rates apply.
    pub fn cost_breakdown(&self, sums: &TokenSums, model: Option<&str>) -> CostBreakdown {
        match model {
            Some(model_id) => {
                let resolved = self.pricing.resolve(model_id);
                CostBreakdown::from_rates(
                    sums,
                    resolved.input_price_per_million,
                    resolved.output_price_per_million,
                )
            }
            None => CostBreakdown::from_rates(
                sums,
                self.rates.input_per_million,
                self.rates.output_per_million,
            ),
        }
    }

    /// Value plotted for a set of sums in the chosen dimension
    pub fn value_of(&self, sums: &TokenSums, dimension: Dimension, model: Option<&str>) -> f64 {
        match dimension {
            Dimension::Tokens => sums.total_tokens() as f64,
            Dimension::Cost => self.cost_breakdown(sums, model).total,
        }
    }

    /// Fallback-rate cost of a single token type
    pub fn fallback_cost(&self, tokens: i64, is_input: bool) -> f64 {
        let rate = if is_input {
            self.rates.input_per_million
        } else {
            self.rates.output_per_million
        };
        tokens as f64 * rate / TOKENS_PER_MILLION
    }
}

/// Format a cost in USD
///
/// Costs of a dollar or more get cents, sub-cent amounts get `decimals`
/// places.
pub fn format_cost(cost: f64, decimals: usize) -> String {
    if cost >= 1.0 {
        format!("${:.2}", cost)
    } else if cost >= 0.001 {
        format!("${:.4}", cost)
    } else {
        format!("${:.1$}", cost, decimals)
    }
}

/// Amount charged for a credit purchase, fee included, rounded to cents
pub fn credit_purchase_total(credits: f64) -> f64 {
    if !credits.is_finite() || credits <= 0.0 {
        return 0.0;
    }
    (credits * (1.0 + CREDIT_SERVICE_FEE) * 100.0).round() / 100.0
}
