use tracing::{debug, warn};

use crate::context::QuestionContext;
use crate::error::GenerationError;
use crate::generate::TextGenerator;
use crate::outcome::Outcome;

/// Build the analyst prompt for a question the router could not place.
pub fn prompt<S: AsRef<str>>(question: &str, columns: &[S]) -> String {
    format!(
        "\nYou are an expert data analyst. Answer the user's question based on the provided sales data.\n\
         \n\
         Question: {question}\n\
         \n\
         Available data columns: {}\n\
         \n\
         Provide a helpful response. If you can't answer based on the data, say so.\n",
        column_list(columns)
    )
}

/// `['Product Name', '2021-07']`
fn column_list<S: AsRef<str>>(columns: &[S]) -> String {
    let quoted: Vec<String> = columns
        .iter()
        .map(|c| format!("'{}'", c.as_ref().replace('\'', "\\'")))
        .collect();
    format!("[{}]", quoted.join(", "))
}

/// Hand the question to the text generator, with the report's columns as context.
pub fn handle<S: AsRef<str>>(
    question: &QuestionContext,
    columns: &[S],
    generator: &dyn TextGenerator,
) -> Result<Outcome, GenerationError> {
    let prompt = prompt(question.raw(), columns);
    debug!(prompt_len = prompt.len(), "delegating to text generator");

    match generator.generate(&prompt) {
        Ok(text) => Ok(Outcome::text(text)),
        Err(e) => {
            warn!(error = %e, "text generation failed");
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::generate::DisabledGenerator;

    struct Recording {
        reply: Result<String, GenerationError>,
        prompts: RefCell<Vec<String>>,
    }

    impl TextGenerator for Recording {
        fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
            self.prompts.borrow_mut().push(prompt.to_string());
            self.reply.clone()
        }
    }

    #[test]
    fn test_prompt_embeds_question_and_columns() {
        let p = prompt("How many regions?", &["Product Name", "2021-07"]);
        assert!(p.contains("You are an expert data analyst."));
        assert!(p.contains("Question: How many regions?\n"));
        assert!(p.contains("Available data columns: ['Product Name', '2021-07']\n"));
        assert!(p.trim_end().ends_with("If you can't answer based on the data, say so."));
    }

    #[test]
    fn test_found_text_on_success() {
        let generator = Recording {
            reply: Ok("There are 3 regions.".into()),
            prompts: RefCell::new(Vec::new()),
        };
        let q = QuestionContext::new("How many regions?");
        let outcome = handle(&q, &["Product Name"], &generator).unwrap();
        assert_eq!(outcome, Outcome::text("There are 3 regions."));
        assert_eq!(generator.prompts.borrow().len(), 1);
    }

    #[test]
    fn test_failure_is_an_error_not_an_answer() {
        let generator = Recording {
            reply: Err(GenerationError::Timeout("120s".into())),
            prompts: RefCell::new(Vec::new()),
        };
        let q = QuestionContext::new("anything");
        let err = handle(&q, &["Product Name"], &generator).unwrap_err();
        assert_eq!(err, GenerationError::Timeout("120s".into()));
    }

    #[test]
    fn test_disabled_generator() {
        let q = QuestionContext::new("anything");
        let err = handle(&q, &["Product Name"], &DisabledGenerator::new("provider=none")).unwrap_err();
        assert!(matches!(err, GenerationError::Disabled(_)));
    }
}
