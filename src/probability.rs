//! Token probability helpers.
//!
//! Chat models score every candidate for the next token. These helpers turn
//! the log-probabilities the API returns into distributions that can be
//! re-tempered, ranked, sampled from, and printed.

use rand::Rng;
use serde::Serialize;

/// Number of alternatives requested per generated token.
pub const DEFAULT_TOP_K: usize = 5;

/// Added to every probability before taking its logarithm.
const EPSILON: f64 = 1e-10;

/// A candidate token and its probability.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenAlternative {
    pub token: String,
    pub probability: f64,
}

impl TokenAlternative {
    pub fn new(token: impl Into<String>, probability: f64) -> Self {
        Self {
            token: token.into(),
            probability,
        }
    }

    /// Build from a natural-log probability as reported by the API.
    pub fn from_logprob(token: impl Into<String>, logprob: f32) -> Self {
        Self::new(token, f64::from(logprob).exp())
    }
}

/// A generated token with its probability and the most likely alternatives at that position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenProbability {
    pub token: String,
    pub probability: f64,
    pub top_alternatives: Vec<TokenAlternative>,
}

/// Re-scale a distribution as if it had been sampled at `temperature`.
///
/// A temperature of 1 returns the input unchanged. Lower values sharpen the
/// distribution and higher values flatten it. A temperature of 0 or below
/// puts all mass on the most likely token. The result always sums to 1.
pub fn apply_temperature(probs: &[TokenAlternative], temperature: f64) -> Vec<TokenAlternative> {
    if probs.is_empty() || temperature == 1.0 {
        return probs.to_vec();
    }

    if temperature <= 0.0 || !temperature.is_finite() {
        let best = probs
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.probability.total_cmp(&b.1.probability))
            .map(|(i, _)| i);
        return probs
            .iter()
            .enumerate()
            .map(|(i, p)| TokenAlternative::new(p.token.clone(), if Some(i) == best { 1.0 } else { 0.0 }))
            .collect();
    }

    let logits: Vec<f64> = probs
        .iter()
        .map(|p| (p.probability + EPSILON).ln() / temperature)
        .collect();
    let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let weights: Vec<f64> = logits.iter().map(|l| (l - max).exp()).collect();
    let total: f64 = weights.iter().sum();

    probs
        .iter()
        .zip(weights)
        .map(|(p, w)| TokenAlternative::new(p.token.clone(), w / total))
        .collect()
}

/// Pick the token whose cumulative probability first exceeds `random`.
///
/// `random` is a draw from `[0, 1)`. If rounding leaves it above the total,
/// the last token is returned.
pub fn sample_from_distribution(probs: &[TokenAlternative], random: f64) -> Option<&TokenAlternative> {
    let mut cumulative = 0.0;
    for candidate in probs {
        cumulative += candidate.probability;
        if random < cumulative {
            return Some(candidate);
        }
    }
    probs.last()
}

/// Sample a token using `rng`.
pub fn sample<'a, R: Rng>(probs: &'a [TokenAlternative], rng: &mut R) -> Option<&'a TokenAlternative> {
    sample_from_distribution(probs, rng.gen::<f64>())
}

/// The `k` most likely tokens, most likely first.
pub fn top_k(probs: &[TokenAlternative], k: usize) -> Vec<TokenAlternative> {
    let mut sorted = probs.to_vec();
    sorted.sort_by(|a, b| b.probability.total_cmp(&a.probability));
    sorted.truncate(k);
    sorted
}

/// `0.4567` -> `"45.7%"`.
pub fn format_probability(probability: f64) -> String {
    format!("{:.1}%", probability * 100.0)
}

/// `3, 10` -> `"3/10"`.
pub fn format_as_fraction(count: usize, total: usize) -> String {
    format!("{}/{}", count, total)
}
