// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Static DISCERN criteria catalog
//!
//! The 15 questions of the published DISCERN instrument for judging the
//! quality of consumer health information, tagged with their category.
//! The catalog is a process-wide constant and is safe for unsynchronized
//! concurrent reads.

use serde::{Deserialize, Serialize};

/// Category a DISCERN criterion belongs to
///
/// Criteria 1-5 assess reliability, 6-8 assess quality of information,
/// 9-15 assess the coverage of treatment choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Reliability,
    Quality,
    Treatment,
}

impl Category {
    /// Human-readable category name for reports
    pub fn label(&self) -> &'static str {
        match self {
            Category::Reliability => "Reliability",
            Category::Quality => "Quality of Information",
            Category::Treatment => "Treatment Choices",
        }
    }
}

/// One of the 15 fixed DISCERN questions
#[derive(Debug, Clone, Serialize)]
pub struct DiscernCriterion {
    /// Criterion id, 1..=15, unique within the catalog
    pub id: u8,
    /// The DISCERN question
    pub question: &'static str,
    /// Category used for sub-scoring
    pub category: Category,
    /// What a reviewer should look for when scoring
    pub description: &'static str,
}

/// Number of criteria in the instrument
pub const CRITERIA_COUNT: usize = 15;

/// Minimum possible total score (15 criteria x 1)
pub const MIN_TOTAL_SCORE: u32 = 15;

/// Maximum possible total score (15 criteria x 5)
pub const MAX_TOTAL_SCORE: u32 = 75;

/// The full DISCERN catalog, ordered by id
pub static DISCERN_CRITERIA: [DiscernCriterion; CRITERIA_COUNT] = [
    DiscernCriterion {
        id: 1,
        question: "Are the aims clear?",
        category: Category::Reliability,
        description: "The publication makes clear what its aims are.",
    },
    DiscernCriterion {
        id: 2,
        question: "Does it achieve its aims?",
        category: Category::Reliability,
        description: "The publication achieves the aims stated in question 1.",
    },
    DiscernCriterion {
        id: 3,
        question: "Is it relevant?",
        category: Category::Reliability,
        description: "The publication is relevant to the patient or reader.",
    },
    DiscernCriterion {
        id: 4,
        question: "Are the sources identified?",
        category: Category::Reliability,
        description: "It is clear what sources of information were used to compile the publication.",
    },
    DiscernCriterion {
        id: 5,
        question: "Is the information dated?",
        category: Category::Reliability,
        description: "It is clear when the information used or reported was produced.",
    },
    DiscernCriterion {
        id: 6,
        question: "Is it balanced and unbiased?",
        category: Category::Quality,
        description: "The publication is balanced and free of bias.",
    },
    DiscernCriterion {
        id: 7,
        question: "Are additional sources provided?",
        category: Category::Quality,
        description: "The publication provides details of additional sources of support and information.",
    },
    DiscernCriterion {
        id: 8,
        question: "Are areas of uncertainty noted?",
        category: Category::Quality,
        description: "The publication refers to areas of uncertainty.",
    },
    DiscernCriterion {
        id: 9,
        question: "How does each treatment work?",
        category: Category::Treatment,
        description: "The publication describes how each treatment works.",
    },
    DiscernCriterion {
        id: 10,
        question: "What are the benefits of each treatment?",
        category: Category::Treatment,
        description: "The publication describes the benefits of each treatment.",
    },
    DiscernCriterion {
        id: 11,
        question: "What are the risks of each treatment?",
        category: Category::Treatment,
        description: "The publication describes the risks of each treatment.",
    },
    DiscernCriterion {
        id: 12,
        question: "What if no treatment is used?",
        category: Category::Treatment,
        description: "The publication describes what would happen if no treatment is used.",
    },
    DiscernCriterion {
        id: 13,
        question: "How do choices affect quality of life?",
        category: Category::Treatment,
        description: "The publication describes how the treatment choices affect overall quality of life.",
    },
    DiscernCriterion {
        id: 14,
        question: "Is more than one choice described?",
        category: Category::Treatment,
        description: "It is clear that there may be more than one possible treatment choice.",
    },
    DiscernCriterion {
        id: 15,
        question: "Does it support shared decision-making?",
        category: Category::Treatment,
        description: "The publication provides support for shared decision-making.",
    },
];

/// Look up a criterion by id
///
/// Ids are contiguous from 1, so this is an index into the catalog.
pub fn criterion_by_id(id: u8) -> Option<&'static DiscernCriterion> {
    if id == 0 || id as usize > CRITERIA_COUNT {
        return None;
    }
    Some(&DISCERN_CRITERIA[id as usize - 1])
}

/// Iterate the criteria belonging to a category
pub fn criteria_for_category(category: Category) -> impl Iterator<Item = &'static DiscernCriterion> {
    DISCERN_CRITERIA.iter().filter(move |c| c.category == category)
}
