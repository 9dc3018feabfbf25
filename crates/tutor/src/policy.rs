//! Prompt policy: (age, subject, message) → system + user instructions.
//!
//! Pure and deterministic. The same `AskRequest` always yields byte-identical
//! prompts; nothing here reads config, clocks or randomness.

use kasa_core::ask::{AskRequest, PromptPair};
use serde::Serialize;
use std::fmt::Write;

use crate::age::{AgeBucket, MATH_FULL_ANSWER_AGE};
use crate::phonics;
use crate::subject::{self, Subject};

/// Safety rules present verbatim in every system prompt.
pub const SAFETY_RULES: [&str; 4] = [
    "Never ask for personal information such as full names, addresses, schools, photos or contact details.",
    "Never discuss adult, violent or frightening content; gently steer the learner back to learning.",
    "Never shame, tease or criticise the learner; mistakes are part of learning.",
    "Always end your reply with a short encouraging remark.",
];

pub const MATH_GUIDED_RULE: &str = "This is a maths question for a young learner: guide them step by step with hints and small questions, and do NOT state the final answer. Let them find it themselves.";

pub const MATH_WORKED_RULE: &str =
    "Show the full worked solution step by step, then state the final answer clearly.";

pub const PHONICS_RULE: &str = "The learner wants help with spelling or reading: break the word down letter by letter and give the phonics sound for each letter, then blend the sounds back into the whole word.";

pub const SPELLING_RULE: &str = "The learner wants help with spelling or reading: spell the word out letter by letter, then point out any tricky parts.";

/// How a maths question is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MathRule {
    /// Hints only; the final answer is withheld.
    Guided,
    /// Full worked solution including the result.
    WorkedSolution,
}

/// How a spelling request is broken down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpellingAid {
    pub phonics: bool,
    /// Word following the spelling keyword, when there is one.
    pub target: Option<String>,
}

/// Every decision the policy made for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptPlan {
    pub bucket: AgeBucket,
    pub subject: Subject,
    pub math: Option<MathRule>,
    pub spelling: Option<SpellingAid>,
}

impl PromptPlan {
    pub fn for_request(request: &AskRequest) -> Self {
        let bucket = AgeBucket::from_age(request.age);
        let subject = Subject::effective(&request.subject, &request.message);

        let math = (subject == Subject::Math && subject::has_digit(&request.message)).then(|| {
            if request.age.years() < MATH_FULL_ANSWER_AGE {
                MathRule::Guided
            } else {
                MathRule::WorkedSolution
            }
        });

        let spelling = subject::is_spelling_request(&request.message).then(|| SpellingAid {
            phonics: bucket.uses_phonics(),
            target: subject::spelling_target(&request.message),
        });

        Self {
            bucket,
            subject,
            math,
            spelling,
        }
    }
}

/// Builds prompt pairs. Stateless; kept as a type so callers can hold it
/// alongside the validator and gateway.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptPolicy;

impl PromptPolicy {
    pub fn new() -> Self {
        Self
    }

    pub fn plan(&self, request: &AskRequest) -> PromptPlan {
        PromptPlan::for_request(request)
    }

    pub fn build(&self, request: &AskRequest) -> PromptPair {
        let plan = self.plan(request);
        PromptPair {
            system: system_prompt(request, &plan),
            user: user_prompt(request, &plan),
        }
    }
}

fn system_prompt(request: &AskRequest, plan: &PromptPlan) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "You are AI KASA, a friendly and child-safe tutor.");
    let _ = writeln!(
        out,
        "The learner is {} years old. Topic: {}.",
        request.age, request.subject
    );

    let _ = writeln!(out);
    let _ = writeln!(out, "Teaching style ({}):", plan.bucket.label());
    for rule in plan.bucket.style_rules() {
        let _ = writeln!(out, "- {rule}");
    }

    match plan.math {
        Some(MathRule::Guided) => {
            let _ = writeln!(out, "- {MATH_GUIDED_RULE}");
        }
        Some(MathRule::WorkedSolution) => {
            let _ = writeln!(out, "- {MATH_WORKED_RULE}");
        }
        None => {}
    }

    if let Some(aid) = &plan.spelling {
        if aid.phonics {
            let _ = writeln!(out, "- {PHONICS_RULE}");
            let _ = writeln!(out, "- Letter sounds to use: {}.", phonics::table_summary());
        } else {
            let _ = writeln!(out, "- {SPELLING_RULE}");
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Safety rules (always follow):");
    for rule in SAFETY_RULES {
        let _ = writeln!(out, "- {rule}");
    }

    out.trim_end().to_string()
}

fn user_prompt(request: &AskRequest, plan: &PromptPlan) -> String {
    let mut out = format!(
        "Learner age: {}. Subject: {}. Learner says: \"{}\"",
        request.age, request.subject, request.message
    );

    if let Some(SpellingAid {
        phonics: use_phonics,
        target: Some(word),
    }) = &plan.spelling
    {
        if *use_phonics {
            let _ = write!(
                out,
                "\nSpelling guide for \"{word}\": letters {}, sounds {}.",
                phonics::letter_breakdown(word),
                phonics::phonics_breakdown(word)
            );
        } else {
            let _ = write!(
                out,
                "\nSpelling guide for \"{word}\": {}.",
                phonics::letter_breakdown(word)
            );
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use kasa_core::ask::Age;

    fn request(message: &str, age: f64, subject: &str) -> AskRequest {
        AskRequest {
            message: message.into(),
            age: Age::new(age).unwrap(),
            subject: subject.into(),
        }
    }

    fn build(message: &str, age: f64, subject: &str) -> PromptPair {
        PromptPolicy::new().build(&request(message, age, subject))
    }

    #[test]
    fn identical_inputs_give_identical_prompts() {
        let a = build("What is a noun?", 10.0, "english");
        let b = build("What is a noun?", 10.0, "english");
        assert_eq!(a, b);
    }

    #[test]
    fn every_system_prompt_carries_safety_rules() {
        for age in [3.0, 8.0, 12.0, 30.0] {
            let pair = build("tell me about volcanoes", age, "science");
            for rule in SAFETY_RULES {
                assert!(pair.system.contains(rule), "age {age} missing {rule}");
            }
        }
    }

    #[test]
    fn style_follows_bucket() {
        let cases = [
            (7.0, AgeBucket::Youngest),
            (8.0, AgeBucket::Child),
            (11.0, AgeBucket::Child),
            (12.0, AgeBucket::Teen),
            (18.0, AgeBucket::Teen),
            (19.0, AgeBucket::Adult),
        ];
        for (age, bucket) in cases {
            let pair = build("Why is the sky blue?", age, "general");
            assert!(pair.system.contains(&format!("Teaching style ({})", bucket.label())));
            assert!(pair.system.contains(bucket.style_rules()[0]));
        }
    }

    #[test]
    fn subject_and_age_appear_verbatim() {
        let pair = build("How do volcanoes work?", 9.5, "Earth Science");
        assert!(pair.system.contains("Topic: Earth Science."));
        assert!(pair.system.contains("9.5 years old"));
        assert!(pair.user.contains("Subject: Earth Science."));
        assert!(pair.user.contains("\"How do volcanoes work?\""));
    }

    #[test]
    fn math_under_nine_withholds_answer() {
        let pair = build("What is 7 + 5?", 8.0, "math");
        assert!(pair.system.contains(MATH_GUIDED_RULE));
        assert!(!pair.system.contains(MATH_WORKED_RULE));
    }

    #[test]
    fn math_from_nine_gives_worked_answer() {
        let pair = build("What is 7 + 5?", 9.0, "math");
        assert!(pair.system.contains(MATH_WORKED_RULE));
        assert!(!pair.system.contains(MATH_GUIDED_RULE));
    }

    #[test]
    fn math_rule_needs_a_numeric_question() {
        let plan = PromptPolicy::new().plan(&request("what is a triangle", 8.0, "math"));
        assert_eq!(plan.math, None);
    }

    #[test]
    fn math_rule_inferred_for_general_subject() {
        let plan = PromptPolicy::new().plan(&request("what is 3 times 4", 6.0, "general"));
        assert_eq!(plan.subject, Subject::Math);
        assert_eq!(plan.math, Some(MathRule::Guided));

        let pair = build("what is 3 times 4", 6.0, "general");
        assert!(pair.system.contains("Topic: general."));
    }

    #[test]
    fn math_rule_not_applied_to_other_named_subjects() {
        let plan =
            PromptPolicy::new().plan(&request("how many legs do 3 spiders have", 6.0, "science"));
        assert_eq!(plan.math, None);
    }

    #[test]
    fn spelling_under_twelve_uses_phonics() {
        let pair = build("spell cat", 6.0, "general");
        assert!(pair.system.contains(PHONICS_RULE));
        assert!(pair.system.contains("q→k"));
        assert!(pair.system.contains("u→uh"));
        assert!(pair.user.contains("sounds c-a-t"));
        assert!(pair.user.contains("letters C-A-T"));
    }

    #[test]
    fn spelling_guide_letters_and_sounds_agree() {
        let pair = build("spell 'café'", 6.0, "general");
        assert!(
            pair.user
                .contains("Spelling guide for \"café\": letters C-A-F, sounds c-a-f.")
        );
    }

    #[test]
    fn spelling_from_twelve_is_plain() {
        let pair = build("how do you spell necessary", 13.0, "english");
        assert!(pair.system.contains(SPELLING_RULE));
        assert!(!pair.system.contains(PHONICS_RULE));
        assert!(!pair.system.contains("q→k"));
        assert!(pair.user.contains("N-E-C-E-S-S-A-R-Y"));
    }

    #[test]
    fn no_spelling_aid_without_keyword() {
        let pair = build("what is a cat", 6.0, "general");
        assert!(!pair.system.contains(PHONICS_RULE));
        assert!(!pair.user.contains("Spelling guide"));
    }

    #[test]
    fn spelling_request_without_target_word() {
        let plan = PromptPolicy::new().plan(&request("can we practise reading", 7.0, "english"));
        let aid = plan.spelling.unwrap();
        assert!(aid.phonics);
        assert_eq!(aid.target, None);
    }
}
