//! Oracle prompt and verdict parsing

use super::ContextLabel;

const IN_CONTEXT_VERDICT: &str = "IN_CONTEXT";

/// Build the instructional prompt sent to the classification oracle
pub fn classification_prompt(query: &str) -> String {
    format!(
        r#"
You are an assistant for a career and interview preparation chatbot.

Classify the following user question as either:
- IN_CONTEXT: if it relates to interview preparation, job roles, resume building, HR questions, salary negotiation, or technical topics that are commonly part of interviews. These include programming, data structures, algorithms, databases, machine learning, deep learning, linear algebra, probability, statistics, system design, and computer science fundamentals.
- OUT_OF_CONTEXT: if it's about fashion, food, drink suggestions, health routines, personal lifestyle, emotions, or topics unrelated to interviews or job preparation.

Respond with only IN_CONTEXT or OUT_OF_CONTEXT.

Here are some examples:
- "What is Big O notation?" → IN_CONTEXT
- "Tips for HR interview?" → IN_CONTEXT
- "What is linear algebra?" → IN_CONTEXT
- "What are joins in SQL?" → IN_CONTEXT
- "Should I drink tea before my interview?" → OUT_OF_CONTEXT
- "What shoes should I wear for interview?" → OUT_OF_CONTEXT
- "Tell me about your family." → OUT_OF_CONTEXT

Now classify the following question:
"{query}"
"#
    )
}

/// Parse the oracle reply; anything but `IN_CONTEXT` is out of context
pub fn parse_verdict(reply: &str) -> ContextLabel {
    ContextLabel::from_in_context(reply.trim().to_uppercase() == IN_CONTEXT_VERDICT)
}
