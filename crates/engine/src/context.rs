/// A single question, as asked and lowercased.
///
/// Built once per invocation; handlers that match case-insensitively read
/// `lowered`, the monthly handler reads `raw`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionContext {
    raw: String,
    lowered: String,
}

impl QuestionContext {
    pub fn new(question: impl Into<String>) -> Self {
        let raw = question.into();
        let lowered = raw.to_lowercase();
        Self { raw, lowered }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn lowered(&self) -> &str {
        &self.lowered
    }
}

impl From<&str> for QuestionContext {
    fn from(question: &str) -> Self {
        Self::new(question)
    }
}
