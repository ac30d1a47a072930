//! Evaluation rubric definitions
//!
//! Static per-language scoring tables used identically by the evaluation
//! form (served as JSON) and the aggregation reports. Each language has an
//! ordered list of categories, each category an ordered list of items with
//! a maximum point value. Category max = sum of item maxima; the grand
//! total of each built-in rubric is 100.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Evaluation language tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Korean,
    English,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::Korean, Language::English];

    /// Storage representation ("korean" / "english")
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Korean => "korean",
            Language::English => "english",
        }
    }

    /// Parse the storage representation
    pub fn parse(s: &str) -> Option<Language> {
        match s {
            "korean" => Some(Language::Korean),
            "english" => Some(Language::English),
            _ => None,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One scored item within a category
#[derive(Debug, Clone, Serialize)]
pub struct RubricItem {
    pub name: &'static str,
    pub max_score: f64,
}

/// One rubric category with its items
#[derive(Debug, Clone, Serialize)]
pub struct RubricCategory {
    pub name: &'static str,
    pub items: &'static [RubricItem],
}

impl RubricCategory {
    /// Maximum attainable score for this category
    pub fn max_score(&self) -> f64 {
        self.items.iter().map(|i| i.max_score).sum()
    }
}

/// A complete per-language rubric (ordered categories)
#[derive(Debug, Clone, Serialize)]
pub struct Rubric {
    pub language: Language,
    pub categories: &'static [RubricCategory],
}

impl Rubric {
    /// Maximum attainable grand total (100 for the built-in rubrics)
    pub fn max_total(&self) -> f64 {
        self.categories.iter().map(|c| c.max_score()).sum()
    }

    /// Look up a category by name
    pub fn category(&self, name: &str) -> Option<&RubricCategory> {
        self.categories.iter().find(|c| c.name == name)
    }
}

const fn item(name: &'static str, max_score: f64) -> RubricItem {
    RubricItem { name, max_score }
}

/// Korean announcement criteria
static KOREAN_CATEGORIES: [RubricCategory; 5] = [
    RubricCategory {
        name: "발음",
        items: &[item("명료성", 10.0), item("속도", 10.0)],
    },
    RubricCategory {
        name: "억양",
        items: &[item("자연스러움", 10.0), item("높낮이", 10.0)],
    },
    RubricCategory {
        name: "전달력",
        items: &[item("성량", 10.0), item("전달의 명확성", 10.0)],
    },
    RubricCategory {
        name: "표현",
        items: &[item("친절함", 10.0), item("자신감", 10.0)],
    },
    RubricCategory {
        name: "전체 인상",
        items: &[item("전문성", 10.0), item("전반적 완성도", 10.0)],
    },
];

/// English announcement criteria
static ENGLISH_CATEGORIES: [RubricCategory; 5] = [
    RubricCategory {
        name: "Pronunciation",
        items: &[item("Clarity", 10.0), item("Pacing", 10.0)],
    },
    RubricCategory {
        name: "Intonation",
        items: &[item("Naturalness", 10.0), item("Stress", 10.0)],
    },
    RubricCategory {
        name: "Delivery",
        items: &[item("Volume", 10.0), item("Articulation", 10.0)],
    },
    RubricCategory {
        name: "Expression",
        items: &[item("Friendliness", 10.0), item("Confidence", 10.0)],
    },
    RubricCategory {
        name: "Overall Impression",
        items: &[item("Professionalism", 10.0), item("Completeness", 10.0)],
    },
];

static KOREAN_RUBRIC: Rubric = Rubric {
    language: Language::Korean,
    categories: &KOREAN_CATEGORIES,
};

static ENGLISH_RUBRIC: Rubric = Rubric {
    language: Language::English,
    categories: &ENGLISH_CATEGORIES,
};

/// Rubric for the given language
pub fn rubric_for(language: Language) -> &'static Rubric {
    match language {
        Language::Korean => &KOREAN_RUBRIC,
        Language::English => &ENGLISH_RUBRIC,
    }
}
