//! The pattern-table router.
//!
//! Routing is a strict priority chain: summary, mark scheme, exam question,
//! quiz, then a scored information-vs-teaching fallback. Marking vocabulary
//! always beats exam vocabulary ("mark scheme for these exam questions" is a
//! mark-scheme request), and completely ambiguous queries default by length:
//! short ones read as lookups, long ones as requests to be taught.

use std::sync::LazyLock;

use async_trait::async_trait;
use biotutor_core::{ResponseType, RoutingDecision};
use regex::Regex;
use tracing::debug;

use crate::IntentRouter;

fn regexes(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(&format!("(?i){p}")).unwrap())
        .collect()
}

static SUMMARY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bsummar(y|ize|ise)|\brecap\b|\boverview\b").unwrap()
});

static MARK_SCHEME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(mark scheme|marking scheme|markscheme|model answer|grade scheme|grading|answer scheme|mark against|marking criteria|how to mark|mark my answer|check my answer|assess my answer|evaluate my answer|solution guide|answer key|scoring guide|examiner report|examiner|mark allocation|points awarded|grade my|correct my|score my|answers for)\b",
    )
    .unwrap()
});

static EXAM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(exam|past paper|exam question|question paper|past exam|previous exam|specimen paper|sample paper|practice exam|practice question|example question|past year|previous paper|exam-style|exam style|a-level question|real exam|biology exam|paper question)\b",
    )
    .unwrap()
});

/// Marking vocabulary that disqualifies an exam-question reading.
static MARKING_TERMS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(mark|marking|grade|assess|evaluate|correct|score|compare|solution|answer key)\b").unwrap()
});

static QUIZ_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(quiz|test me|test my|questions|question me|assessment|multiple choice|practice questions|problem set|exercise|check my knowledge|test my understanding|give me a quiz)\b",
    )
    .unwrap()
});

static STRONG_INFO: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    regexes(&[
        r"\bwhat is\b",
        r"\bwhat are\b",
        r"\bdefine\b",
        r"\blist\b",
        r"\bfacts about\b",
        r"\binformation on\b",
        r"\bdetails on\b",
        r"\bfactsheet\b",
        r"\bdefinition of\b",
        r"\bmeaning of\b",
        r"^does\b",
        r"\bis there\b",
        r"\bdo\b.*\binvolve\b",
    ])
});

static MODERATE_INFO: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    regexes(&[
        r"\bwhat does\b",
        r"\bwhat do\b",
        r"\btell me about\b",
        r"\bin the textbook\b",
        r"\bwhich page\b",
        r"\bwhich chapter\b",
        r"\bterm\b",
        r"\bterminology\b",
        r"\bconcept\b",
        r"\bdoes\b.*\binvolve\b",
        r"\bdoes\b.*\buse\b",
        r"\bdoes\b.*\brequire\b",
        r"\bdoes\b.*\boccur\b",
        r"\bis\b.*\bpart of\b",
        r"\bare\b.*\binvolved in\b",
    ])
});

static STRONG_TEACH: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    regexes(&[
        r"\bhelp me understand\b",
        r"\bcan you teach\b",
        r"\bi want to learn\b",
        r"\bexplain how\b",
        r"\bexplain why\b",
        r"\bwhy does\b",
        r"\bwhy do\b",
        r"\btutor\b",
    ])
});

static MODERATE_TEACH: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    regexes(&[
        r"\bexplain\b",
        r"\bunderstand\b",
        r"\belaborate\b",
        r"\bdescribe the process\b",
        r"\bshow me how\b",
        r"\brevision\b",
        r"\brevise\b",
        r"\blearn about\b",
        r"\bstudy\b",
    ])
});

static HOW_WORK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bhow\b.*\bwork\b").unwrap());
static WHY_HAPPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bwhy\b.*\bhappen\b").unwrap());
static WHY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bwhy\b").unwrap());
static EXPLAIN_WHAT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bexplain what\b").unwrap());

#[derive(Debug, Default, Clone, Copy)]
struct IntentScores {
    information: u32,
    teaching: u32,
}

fn score_intent(text: &str) -> IntentScores {
    let mut scores = IntentScores::default();

    scores.information += 3 * STRONG_INFO.iter().filter(|re| re.is_match(text)).count() as u32;
    scores.information += 2 * MODERATE_INFO.iter().filter(|re| re.is_match(text)).count() as u32;
    scores.teaching += 3 * STRONG_TEACH.iter().filter(|re| re.is_match(text)).count() as u32;
    scores.teaching += 2 * MODERATE_TEACH.iter().filter(|re| re.is_match(text)).count() as u32;

    if HOW_WORK_RE.is_match(text) {
        scores.teaching += 1;
    }
    if WHY_HAPPEN_RE.is_match(text) {
        scores.teaching += 1;
    }
    // Every "why" question leans toward teaching.
    if WHY_RE.is_match(text) {
        scores.teaching += 1;
    }
    if EXPLAIN_WHAT_RE.is_match(text) {
        scores.information += 1;
    }

    // Bare yes/no questions with no other signal read as lookups.
    if scores.information == 0 && scores.teaching == 0 {
        let leads_yes_no = ["does ", "is ", "are ", "can "]
            .iter()
            .any(|lead| text.starts_with(lead));
        if leads_yes_no {
            scores.information += 2;
        }
    }

    scores
}

/// Route a query by pattern tables alone.
pub fn classify(query: &str) -> ResponseType {
    let text = query.trim().to_lowercase();

    if SUMMARY_RE.is_match(&text) {
        return ResponseType::Summary;
    }
    if MARK_SCHEME_RE.is_match(&text) {
        return ResponseType::MarkScheme;
    }
    if EXAM_RE.is_match(&text) && !MARKING_TERMS_RE.is_match(&text) {
        return ResponseType::ExamQuestion;
    }
    if QUIZ_RE.is_match(&text) {
        return ResponseType::Quiz;
    }

    let scores = score_intent(&text);
    debug!(
        information = scores.information,
        teaching = scores.teaching,
        "intent scores"
    );

    if scores.information > 0 || scores.teaching > 0 {
        return if scores.information > scores.teaching {
            ResponseType::ContentCollector
        } else if scores.teaching > scores.information {
            ResponseType::Teach
        } else if STRONG_INFO
            .iter()
            .chain(MODERATE_INFO.iter())
            .any(|re| re.is_match(&text))
        {
            ResponseType::ContentCollector
        } else if STRONG_TEACH
            .iter()
            .chain(MODERATE_TEACH.iter())
            .any(|re| re.is_match(&text))
        {
            ResponseType::Teach
        } else {
            ResponseType::ContentCollector
        };
    }

    // No signal at all. Short queries are most likely simple lookups.
    if text.split_whitespace().count() < 10 {
        ResponseType::ContentCollector
    } else {
        ResponseType::Teach
    }
}

/// Router backed entirely by the pattern tables above.
#[derive(Debug, Default)]
pub struct LexicalRouter;

impl LexicalRouter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl IntentRouter for LexicalRouter {
    fn name(&self) -> &str {
        "lexical"
    }

    async fn route(&self, query: &str) -> RoutingDecision {
        let response_type = classify(query);
        debug!(query, %response_type, "lexical routing decision");
        RoutingDecision::for_type(response_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use biotutor_core::RetrievalTarget;

    #[test]
    fn summary_wins_over_everything() {
        assert_eq!(classify("summarize our conversation"), ResponseType::Summary);
        assert_eq!(classify("Summarise this please"), ResponseType::Summary);
        assert_eq!(
            classify("give me a recap of the exam questions we did"),
            ResponseType::Summary
        );
        assert_eq!(classify("an overview of what we covered"), ResponseType::Summary);
    }

    #[test]
    fn marking_vocabulary_beats_exam_vocabulary() {
        assert_eq!(
            classify("What's the mark scheme for photosynthesis questions?"),
            ResponseType::MarkScheme
        );
        assert_eq!(
            classify("show me the marking criteria for this past paper"),
            ResponseType::MarkScheme
        );
        assert_eq!(classify("can you grade my answer to the exam"), ResponseType::MarkScheme);
    }

    #[test]
    fn exam_vocabulary_without_marking_terms() {
        assert_eq!(
            classify("Show me past exam questions on photosynthesis"),
            ResponseType::ExamQuestion
        );
        assert_eq!(
            classify("find me a specimen paper on genetics"),
            ResponseType::ExamQuestion
        );
    }

    #[test]
    fn quiz_requests() {
        assert_eq!(classify("Quiz me on cell biology"), ResponseType::Quiz);
        assert_eq!(
            classify("give me some practice questions on enzymes"),
            ResponseType::Quiz
        );
        assert_eq!(
            classify("test my understanding of osmosis"),
            ResponseType::Quiz
        );
    }

    #[test]
    fn information_queries_route_to_content_collector() {
        assert_eq!(classify("What is photosynthesis?"), ResponseType::ContentCollector);
        assert_eq!(
            classify("define homeostasis for me"),
            ResponseType::ContentCollector
        );
        assert_eq!(
            classify("tell me about the krebs cycle"),
            ResponseType::ContentCollector
        );
    }

    #[test]
    fn teaching_queries_route_to_teach() {
        assert_eq!(
            classify("Explain how photosynthesis works"),
            ResponseType::Teach
        );
        assert_eq!(
            classify("help me understand natural selection"),
            ResponseType::Teach
        );
        assert_eq!(classify("why does osmosis happen"), ResponseType::Teach);
    }

    #[test]
    fn ambiguous_queries_default_by_length() {
        // No pattern hits at all in either of these.
        assert_eq!(classify("photosynthesis in plants"), ResponseType::ContentCollector);
        assert_eq!(
            classify(
                "photosynthesis in green plants during warm bright mornings across many tropical regions yearly"
            ),
            ResponseType::Teach
        );
    }

    #[test]
    fn leading_yes_no_reads_as_lookup() {
        assert_eq!(
            classify("does photosynthesis need sunlight"),
            ResponseType::ContentCollector
        );
    }

    #[tokio::test]
    async fn decisions_carry_retrieval_targets() {
        let router = LexicalRouter::new();

        let decision = router.route("summarize our conversation").await;
        assert_eq!(decision.response_type, ResponseType::Summary);
        assert_eq!(decision.retrieval_target, RetrievalTarget::None);

        let decision = router.route("Show me past exam questions on photosynthesis").await;
        assert_eq!(decision.response_type, ResponseType::ExamQuestion);
        assert_eq!(decision.retrieval_target, RetrievalTarget::ExamPapers);

        let decision = router.route("What is photosynthesis?").await;
        assert_eq!(decision.response_type, ResponseType::ContentCollector);
        assert_eq!(decision.retrieval_target, RetrievalTarget::Content);
    }
}
