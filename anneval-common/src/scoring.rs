//! Score accumulation against a rubric
//!
//! Pure, total functions: missing entries count as zero, entries not
//! defined by the rubric are ignored. The submitted score map is an opaque
//! nested mapping (category → item → number) decoded from JSON.

use crate::rubric::Rubric;
use crate::{Error, Result};
use std::collections::HashMap;

/// Nested score mapping: category name → item name → score
pub type ScoreMap = HashMap<String, HashMap<String, f64>>;

/// Scores are entered in half-point steps
pub const SCORE_STEP: f64 = 0.5;

const STEP_EPSILON: f64 = 1e-9;

/// Sum of the scores for every item the rubric defines in `category`.
///
/// Items the evaluator left unfilled contribute 0; score entries for items
/// the rubric does not define are ignored.
pub fn category_total(rubric: &Rubric, category: &str, scores: &ScoreMap) -> f64 {
    let Some(rubric_category) = rubric.category(category) else {
        return 0.0;
    };

    let entered = scores.get(category);
    rubric_category
        .items
        .iter()
        .map(|item| {
            entered
                .and_then(|items| items.get(item.name))
                .copied()
                .unwrap_or(0.0)
        })
        .sum()
}

/// Grand total: sum of category totals over every rubric category.
pub fn overall_total(rubric: &Rubric, scores: &ScoreMap) -> f64 {
    rubric
        .categories
        .iter()
        .map(|c| category_total(rubric, c.name, scores))
        .sum()
}

/// Validate every entered score against the rubric: each value must lie in
/// `[0, item_max]` and fall on a half-point step, and every entry must name
/// a category/item the rubric defines.
///
/// The browser form constrains its inputs the same way; the server
/// re-checks so stored rows cannot exceed the rubric.
pub fn validate_scores(rubric: &Rubric, scores: &ScoreMap) -> Result<()> {
    for (category_name, items) in scores {
        let Some(category) = rubric.category(category_name) else {
            return Err(Error::InvalidInput(format!(
                "Unknown category: {}",
                category_name
            )));
        };

        for (item_name, value) in items {
            let Some(item) = category.items.iter().find(|i| i.name == item_name) else {
                return Err(Error::InvalidInput(format!(
                    "Unknown item: {} / {}",
                    category_name, item_name
                )));
            };

            if !value.is_finite() || *value < 0.0 || *value > item.max_score {
                return Err(Error::InvalidInput(format!(
                    "Score {} for {} / {} outside 0..={}",
                    value, category_name, item_name, item.max_score
                )));
            }

            let steps = value / SCORE_STEP;
            if (steps - steps.round()).abs() > STEP_EPSILON {
                return Err(Error::InvalidInput(format!(
                    "Score {} for {} / {} is not a multiple of {}",
                    value, category_name, item_name, SCORE_STEP
                )));
            }
        }
    }

    Ok(())
}
