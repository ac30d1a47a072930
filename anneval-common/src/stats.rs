//! Aggregate statistics over submitted evaluations
//!
//! Recomputed in full on every fetch: the dashboard refetches when a change
//! event arrives, so duplicate or out-of-order delivery only costs a
//! redundant recomputation, never corrupts displayed state.

use crate::db::models::Evaluation;
use crate::rubric::Language;
use serde::Serialize;
use std::collections::BTreeSet;

/// Count / average / min / max over total scores for one language
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LanguageStats {
    pub count: usize,
    pub average: f64,
    pub min: f64,
    pub max: f64,
}

impl LanguageStats {
    fn zero() -> Self {
        Self {
            count: 0,
            average: 0.0,
            min: 0.0,
            max: 0.0,
        }
    }
}

/// Per-category average / min / max of per-evaluation category subtotals
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryStats {
    pub category: String,
    pub average: f64,
    pub min: f64,
    pub max: f64,
}

/// Stats over the total_score of evaluations in `language`.
///
/// All-zero when no evaluation matches (no division-by-zero fault).
pub fn compute_language_stats(evaluations: &[Evaluation], language: Language) -> LanguageStats {
    let totals: Vec<f64> = evaluations
        .iter()
        .filter(|e| e.language == language)
        .map(|e| e.total_score)
        .collect();

    if totals.is_empty() {
        return LanguageStats::zero();
    }

    let sum: f64 = totals.iter().sum();
    LanguageStats {
        count: totals.len(),
        average: sum / totals.len() as f64,
        min: totals.iter().copied().fold(f64::INFINITY, f64::min),
        max: totals.iter().copied().fold(f64::NEG_INFINITY, f64::max),
    }
}

/// Per-category stats for evaluations in `language`.
///
/// The category set is the union of category names present across all
/// matching evaluations; an evaluation missing a category contributes an
/// implicit 0 subtotal for it. Subtotals sum whatever items the stored
/// score map holds for that category.
pub fn compute_category_stats(evaluations: &[Evaluation], language: Language) -> Vec<CategoryStats> {
    let matching: Vec<&Evaluation> = evaluations
        .iter()
        .filter(|e| e.language == language)
        .collect();

    if matching.is_empty() {
        return Vec::new();
    }

    // BTreeSet keeps report rows in a stable order across refreshes
    let categories: BTreeSet<&str> = matching
        .iter()
        .flat_map(|e| e.scores.keys().map(String::as_str))
        .collect();

    categories
        .into_iter()
        .map(|category| {
            let subtotals: Vec<f64> = matching
                .iter()
                .map(|e| {
                    e.scores
                        .get(category)
                        .map(|items| items.values().sum())
                        .unwrap_or(0.0)
                })
                .collect();

            let sum: f64 = subtotals.iter().sum();
            CategoryStats {
                category: category.to_string(),
                average: sum / subtotals.len() as f64,
                min: subtotals.iter().copied().fold(f64::INFINITY, f64::min),
                max: subtotals.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            }
        })
        .collect()
}
