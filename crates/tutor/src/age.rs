//! Age buckets: the four teaching styles a learner's age maps onto.

use kasa_core::ask::Age;
use serde::Serialize;
use std::fmt;

/// Below this age, numeric maths questions are guided without revealing
/// the final answer.
pub const MATH_FULL_ANSWER_AGE: f64 = 9.0;

/// Teaching style selected from the learner's age.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeBucket {
    /// Under 8
    Youngest,
    /// 8 to 11
    Child,
    /// 12 to 18
    Teen,
    /// 19 and over
    Adult,
}

impl AgeBucket {
    pub fn from_age(age: Age) -> Self {
        let years = age.years();
        if years < 8.0 {
            Self::Youngest
        } else if years < 12.0 {
            Self::Child
        } else if years < 19.0 {
            Self::Teen
        } else {
            Self::Adult
        }
    }

    /// Learners in these buckets get letter sounds rather than plain letters.
    pub fn uses_phonics(&self) -> bool {
        matches!(self, Self::Youngest | Self::Child)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Youngest => "under-8",
            Self::Child => "8-11",
            Self::Teen => "12-18",
            Self::Adult => "19+",
        }
    }

    /// Style rules spliced into the system prompt.
    pub fn style_rules(&self) -> &'static [&'static str] {
        match self {
            Self::Youngest => &[
                "Use very simple words a young child already knows.",
                "Keep every sentence short: ten words or fewer.",
                "Explain one small idea at a time and use friendly examples like toys, animals and snacks.",
                "When a word needs spelling, sound it out letter by letter using phonics.",
            ],
            Self::Child => &[
                "Give clear, simple explanations with one example.",
                "Break longer ideas into short numbered steps.",
                "Use phonics to sound out words when the learner asks about spelling or reading.",
            ],
            Self::Teen => &[
                "Give a structured, step-by-step explanation.",
                "Name the key idea first, then walk through each step in order.",
                "Check understanding with a short follow-up question when it helps.",
            ],
            Self::Adult => &[
                "Be practical and to the point.",
                "Frame explanations with real-world situations where the idea is used.",
                "Offer a short summary the learner can apply right away.",
            ],
        }
    }
}

impl fmt::Display for AgeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
