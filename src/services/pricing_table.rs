// Static pricing data
//
// Canonical provider model keys with their per-million-token prices, and the
// user-facing names that map onto them. Both tables are built once on first
// use and never mutated.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::models::PricingRecord;

/// Tokens billed per image by Anthropic models
const ANTHROPIC_IMAGE_TOKEN_RATIO: u32 = 750;

/// Canonical model key → pricing (USD per 1M tokens)
pub static BASE_PRICING: Lazy<HashMap<&'static str, PricingRecord>> = Lazy::new(|| {
    let anthropic = |input, output| {
        PricingRecord::new(input, output, "Anthropic").with_image_ratio(ANTHROPIC_IMAGE_TOKEN_RATIO)
    };

    HashMap::from([
        // Google
        ("gemini-1.5-flash-latest", PricingRecord::new(0.075, 0.300, "Google")),
        ("gemini-2.5-flash", PricingRecord::new(0.150, 0.600, "Google")),
        ("gemini-2.0-flash-lite-preview", PricingRecord::new(0.075, 0.300, "Google")),
        ("gemini-2.5-flash-thinking", PricingRecord::new(0.150, 3.500, "Google")),
        ("gemini-1.5-flash-8b", PricingRecord::new(0.0375, 0.150, "Google")),
        ("gemini-2.5-pro-exp-03-25", PricingRecord::new(1.250, 10.000, "Google")),
        // OpenAI
        ("gpt-3.5-turbo", PricingRecord::new(0.500, 1.500, "OpenAI")),
        ("gpt-4-turbo", PricingRecord::new(10.000, 30.000, "OpenAI")),
        ("gpt-4o-2024-11-20", PricingRecord::new(2.500, 10.000, "OpenAI")),
        ("chatgpt-4o-latest", PricingRecord::new(5.000, 15.000, "OpenAI")),
        ("o1-mini", PricingRecord::new(3.000, 12.000, "OpenAI")),
        ("o3", PricingRecord::new(10.000, 40.000, "OpenAI")),
        ("o1-pro", PricingRecord::new(150.000, 600.000, "OpenAI")),
        ("o4-mini", PricingRecord::new(1.100, 4.400, "OpenAI")),
        ("gpt-4.5-preview", PricingRecord::new(75.000, 150.000, "OpenAI")),
        ("gpt-4o-mini", PricingRecord::new(0.150, 0.600, "OpenAI")),
        ("gpt-4.1", PricingRecord::new(2.000, 8.000, "OpenAI")),
        ("gpt-4.1-mini", PricingRecord::new(0.400, 1.600, "OpenAI")),
        ("gpt-4.1-nano", PricingRecord::new(0.100, 0.400, "OpenAI")),
        // Anthropic
        ("claude-3-5-haiku-20241022", anthropic(1.000, 5.000)),
        ("claude-3-5-sonnet-20241022", anthropic(3.000, 15.000)),
        ("claude-3-7-sonnet-20250219", anthropic(3.000, 15.000)),
        ("claude-3-7-sonnet-thinking", anthropic(3.000, 15.000)),
        ("claude-3-opus-20240229", anthropic(15.000, 75.000)),
        ("claude-3-haiku-20240307", anthropic(0.250, 1.250)),
        // DeepSeek
        ("deepseek-chat", PricingRecord::new(0.140, 0.280, "DeepSeek")),
        ("deepseek-reasoner", PricingRecord::new(0.550, 2.190, "DeepSeek")),
        ("DeepSeek-R1-Zero", PricingRecord::new(0.550, 2.190, "DeepSeek")),
        ("DeepSeek-R1", PricingRecord::new(0.550, 2.190, "DeepSeek")),
        // X.AI
        ("grok-3-beta", PricingRecord::new(3.000, 15.000, "X.AI")),
        ("grok-3-fast-beta", PricingRecord::new(5.000, 25.000, "X.AI")),
        ("grok-3-mini-beta", PricingRecord::new(0.300, 0.500, "X.AI")),
        ("grok-3-mini-fast-beta", PricingRecord::new(0.600, 4.000, "X.AI")),
    ])
});

/// User-facing model name → canonical pricing key
///
/// Several names point at keys that have no pricing entry yet (Reka, Llama,
/// Cohere); those resolve as unknown.
pub static MODEL_ALIASES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        // OpenAI
        ("gpt-4o", "gpt-4o-2024-11-20"),
        ("gpt-4-turbo", "gpt-4-turbo"),
        ("gpt-3.5-turbo", "gpt-3.5-turbo"),
        ("chatgpt-4o-latest", "chatgpt-4o-latest"),
        ("o4-mini", "o4-mini"),
        ("o3", "o3"),
        ("o1-pro", "o1-pro"),
        ("gpt-4.1", "gpt-4.1"),
        ("gpt-4.1-mini", "gpt-4.1-mini"),
        ("gpt-4.1-nano", "gpt-4.1-nano"),
        // Anthropic
        ("claude-3-opus", "claude-3-opus-20240229"),
        ("claude-3-sonnet", "claude-3-5-sonnet-20241022"),
        ("claude-3-haiku", "claude-3-haiku-20240307"),
        ("claude-3-7-sonnet-20250219", "claude-3-7-sonnet-20250219"),
        ("claude-3-7-sonnet-thinking", "claude-3-7-sonnet-thinking"),
        ("claude-3-5-sonnet-20241022", "claude-3-5-sonnet-20241022"),
        ("claude-3-5-haiku-20241022", "claude-3-5-haiku-20241022"),
        // Google
        ("gemini-pro", "gemini-2.5-pro-exp-03-25"),
        ("gemini-1.5-flash-latest", "gemini-1.5-flash-latest"),
        ("gemini-2.5-flash", "gemini-2.5-flash"),
        ("gemini-2.5-flash-thinking", "gemini-2.5-flash-thinking"),
        ("gemini-2.0-flash-lite-preview", "gemini-2.0-flash-lite-preview"),
        ("gemini-1.5-flash-8b", "gemini-1.5-flash-8b"),
        // X.AI
        ("grok-3-beta", "grok-3-beta"),
        ("grok-3-fast-beta", "grok-3-fast-beta"),
        ("grok-3-mini-beta", "grok-3-mini-beta"),
        ("grok-3-mini-fast-beta", "grok-3-mini-fast-beta"),
        ("grok-2", "grok-3-mini-beta"),
        // DeepSeek
        ("deepseek-chat", "deepseek-chat"),
        ("deepseek-reasoner", "deepseek-reasoner"),
        ("DeepSeek-R1-Zero", "DeepSeek-R1-Zero"),
        ("DeepSeek-R1", "DeepSeek-R1"),
        // Reka
        ("reka-spark", "reka-spark"),
        ("reka-edge", "reka-edge"),
        ("reka-flash-3", "reka-flash-3"),
        ("reka-core", "reka-core"),
        ("reka-core-20240904", "reka-core-20240904"),
        ("reka-edge-20240208", "reka-edge-20240208"),
        // Meta
        ("Meta-Llama-3.1-70b-Instruct", "Meta-Llama-3.1-70b-Instruct"),
        ("Meta-Llama-3.1-8b-Instruct", "Meta-Llama-3.1-8b-Instruct"),
        ("Meta-Llama-3.1-405B-Instruct", "Meta-Llama-3.1-405B-Instruct"),
        // Cohere
        ("command-r-plus", "command-r-plus"),
        ("command-r-plus-08-2024", "command-r-plus-08-2024"),
        ("command-r", "command-r"),
        ("command-r7b", "command-r7b"),
        ("command-r7b-12-2024", "command-r7b-12-2024"),
    ])
});
