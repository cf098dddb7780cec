//! Prompt templates and canned responses for the six response types.
//!
//! Each builder takes the pieces the generators assemble (query, retrieved
//! reference text, rendered conversation block) and returns the full prompt
//! string. Canned responses cover the paths where the model is never
//! called: out-of-domain queries, empty retrieval, and generation failure.

use biotutor_core::ResponseType;

/// Bloom's-taxonomy teaching prompt.
pub fn teaching(query: &str, reference: &str, conversation: &str) -> String {
    format!(
        "You are an A-Level biology tutor. You receive all your subject knowledge \
         from the reference material below and must not invent facts beyond it.\n\n\
         Teach the student using Bloom's taxonomy: start by stating the key facts \
         (remember), explain the underlying mechanism in plain language (understand), \
         show how the concept applies with a concrete example (apply), and finish \
         with one short question that makes the student connect this topic to \
         something related (analyse).\n\n\
         If the student's message contains references like \"this topic\", \"it\", or \
         \"that\", use the conversation context to determine what they mean, paying \
         special attention to the most recent topic discussed.\n\n\
         {conversation}\
         Reference material:\n\
         --------------------\n\
         {reference}\n\
         --------------------\n\n\
         Student's request: {query}\n\n\
         If the request is not about biology, reply only that you are a biology \
         tutor and cannot help with other subjects."
    )
}

/// Factual-information prompt for the content collector.
pub fn content(query: &str, reference: &str, conversation: &str) -> String {
    format!(
        "You are a biology information assistant for A-Level students. Answer \
         factually and concisely using only the reference material below, citing \
         section or page numbers when the material carries them.\n\n\
         {conversation}\
         Reference material:\n\
         --------------------\n\
         {reference}\n\
         --------------------\n\n\
         Student's request: {query}\n\n\
         Present the relevant facts in an organised form. Do not add speculation \
         or material from outside the reference text."
    )
}

/// Practice-quiz prompt.
pub fn quiz(query: &str, reference: &str, conversation: &str) -> String {
    format!(
        "You are a quiz generator for A-Level biology. Create a short quiz from \
         the reference material below.\n\n\
         If the student's message contains references like \"this topic\", \"it\", or \
         \"that\", use the conversation context to determine the quiz topic.\n\n\
         {conversation}\
         Reference material:\n\
         --------------------\n\
         {reference}\n\
         --------------------\n\n\
         Student's request: {query}\n\n\
         Produce 5 questions mixing multiple choice and short answer, ordered from \
         easier to harder, followed by an answer key with one-line explanations. \
         If the request is not about a biology topic, reply exactly: \
         \"I'm a biology tutor specializing in A-Level biology topics. I can create \
         quizzes on biology subjects like cells, genetics, ecology, or human \
         physiology. Which biology topic would you like a quiz on?\""
    )
}

/// Exam question extraction prompt.
pub fn exam_questions(query: &str, reference: &str, conversation: &str) -> String {
    format!(
        "You are an exam question extractor for A-Level biology. Extract relevant \
         past-paper questions from the reference material below.\n\n\
         If the student's message contains references like \"this topic\", \"it\", or \
         \"that\", use the conversation context to determine the topic, paying \
         special attention to the most recent topic discussed.\n\n\
         {conversation}\
         Reference material from past exam papers:\n\
         --------------------\n\
         {reference}\n\
         --------------------\n\n\
         Topic or request: {query}\n\n\
         Extract numbered questions with their sub-questions and, where available, \
         the exam board, paper reference, date, topic, and marks allocation. Keep \
         marks notation (e.g. [2 marks]) and scientific notation intact. Skip \
         general instructions, copyright notices, and page navigation text. If the \
         student asked for a specific number of questions or a specific paper, \
         honour that. If nothing relevant to the request appears in the reference \
         material, reply \"I don't have that information.\""
    )
}

/// Mark scheme extraction prompt.
pub fn mark_scheme(query: &str, reference: &str, conversation: &str) -> String {
    format!(
        "You are a mark scheme extractor for A-Level biology. Extract marking \
         guidance from the reference material below.\n\n\
         If the student's message contains references like \"this topic\", \"it\", or \
         \"that\", use the conversation context to determine what they are asking \
         about, including questions previously provided.\n\n\
         {conversation}\
         Reference material from mark schemes:\n\
         --------------------\n\
         {reference}\n\
         --------------------\n\n\
         Topic or question to find mark schemes for: {query}\n\n\
         For each question present: the question number and marks, the exact \
         marking criteria, alternative acceptable answers, and examiner notes \
         (allowed and rejected responses). Identify the subject, exam board, paper \
         number, and date where the material states them. Keep numbering intact so \
         the scheme can be compared against the question paper."
    )
}

/// Conversation summary prompt; takes the rendered transcript rather than
/// retrieved reference text.
pub fn summary(transcript: &str) -> String {
    format!(
        "You are summarising a tutoring conversation between a student and an \
         A-Level biology tutor.\n\n\
         Conversation:\n\
         --------------------\n\
         {transcript}\n\
         --------------------\n\n\
         Write a concise summary covering: the biology topics discussed, the key \
         facts and explanations the tutor gave, and any questions the student \
         should follow up on. Address the student directly and keep it under 300 \
         words."
    )
}

/// Refusal for queries outside the biology domain. Names the topic when the
/// conversation resolved one.
pub fn out_of_domain(topic: Option<&str>) -> String {
    match topic {
        Some(topic) => format!(
            "I noticed you're asking about \"{topic}\". However, as a biology tutor, \
             I'm specialized in providing information only on biology topics, and \
             \"{topic}\" appears to be outside my area of expertise.\n\n\
             I'd be happy to help with any biology topic, such as cell structure, \
             DNA and genetics, protein synthesis, photosynthesis, ecosystems, or \
             human physiology. Would you like to ask about one of those instead?"
        ),
        None => "I am a biology tutor specialized in topics for which I have \
                 reference information. I can help you with questions related to \
                 biology such as cells, DNA, proteins, ecosystems, evolution, and \
                 other biological topics if they are in my reference materials."
            .to_string(),
    }
}

/// Response when retrieval found nothing for an in-domain query.
pub fn no_documents(response_type: ResponseType) -> &'static str {
    match response_type {
        ResponseType::ExamQuestion => {
            "I don't have any relevant exam questions about this topic in my \
             database. I can help you find past exam questions on biology topics \
             such as cells, DNA, proteins, ecosystems, and evolution if they are \
             in my reference materials."
        }
        ResponseType::MarkScheme => {
            "I don't have any relevant mark schemes about this topic in my \
             database. I can help you find mark schemes for biology topics such \
             as cells, DNA, proteins, ecosystems, and evolution if they are in \
             my reference materials."
        }
        _ => {
            "Unfortunately, I don't have any relevant information about this \
             topic in my reference materials. I can help you with other biology \
             topics such as cells, DNA, proteins, ecosystems, and evolution."
        }
    }
}

/// Apologetic fallback when generation itself failed.
pub fn generation_failure(response_type: ResponseType) -> &'static str {
    match response_type {
        ResponseType::Summary => {
            "I apologize, but I wasn't able to create a summary of our \
             conversation at this time. Please try again later."
        }
        _ => {
            "I encountered an error while trying to answer this. Could you try \
             asking about a different biology concept?"
        }
    }
}
