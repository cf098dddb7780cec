//! Routing decision types.
//!
//! One canonical [`ResponseType`] enum is shared by every router, generator,
//! and caller; the serialized spellings are the wire names the rest of the
//! platform already speaks.

use serde::{Deserialize, Serialize};

/// The six kinds of response the tutor can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResponseType {
    /// Explanatory tutoring response
    #[serde(rename = "teach")]
    Teach,
    /// Factual information lookup
    #[serde(rename = "contentCollector")]
    ContentCollector,
    /// Generate a practice quiz
    #[serde(rename = "quiz")]
    Quiz,
    /// Retrieve past exam questions
    #[serde(rename = "examQuestion")]
    ExamQuestion,
    /// Retrieve marking guidance for exam questions
    #[serde(rename = "markScheme")]
    MarkScheme,
    /// Summarize the conversation so far
    #[serde(rename = "summary")]
    Summary,
}

impl ResponseType {
    /// The wire spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Teach => "teach",
            Self::ContentCollector => "contentCollector",
            Self::Quiz => "quiz",
            Self::ExamQuestion => "examQuestion",
            Self::MarkScheme => "markScheme",
            Self::Summary => "summary",
        }
    }

    /// Which document corpus this response type draws on.
    pub fn retrieval_target(&self) -> RetrievalTarget {
        match self {
            Self::Teach | Self::ContentCollector | Self::Quiz => RetrievalTarget::Content,
            Self::ExamQuestion | Self::MarkScheme => RetrievalTarget::ExamPapers,
            Self::Summary => RetrievalTarget::None,
        }
    }

    pub fn all() -> [ResponseType; 6] {
        [
            Self::Teach,
            Self::ContentCollector,
            Self::Quiz,
            Self::ExamQuestion,
            Self::MarkScheme,
            Self::Summary,
        ]
    }
}

impl std::fmt::Display for ResponseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which corpus a routed query should retrieve from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RetrievalTarget {
    /// Subject reference material
    #[serde(rename = "content")]
    Content,
    /// Past exam papers and mark schemes
    #[serde(rename = "examPapers")]
    ExamPapers,
    /// No retrieval at all
    #[default]
    #[serde(rename = "none")]
    None,
}

/// The outcome of routing one user message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingDecision {
    pub response_type: ResponseType,
    pub retrieval_target: RetrievalTarget,
}

impl RoutingDecision {
    /// Decision for a response type, with its canonical retrieval target.
    pub fn for_type(response_type: ResponseType) -> Self {
        Self {
            response_type,
            retrieval_target: response_type.retrieval_target(),
        }
    }

    /// The decision every failure path falls back to.
    pub fn fallback() -> Self {
        Self::for_type(ResponseType::Teach)
    }
}
