//! Grading prompt construction.

use crate::dataset::AlignedEntry;

/// Instructions and rubric sent ahead of the questions.
pub const GRADING_INSTRUCTIONS: &str = r#"You are evaluating how well AI assistant answers match expected answers for design system questions.

For each question below, rate the match between the AI answer and expected answer on a scale of 0-10:
- 10: Perfect match in meaning and content
- 8-9: Very good match, captures main points with minor differences
- 6-7: Good match, captures key concepts but missing some details
- 4-5: Partial match, some correct information but significant gaps
- 2-3: Poor match, minimal correct information
- 0-1: No match or completely incorrect

Format your response as:
Q1: [score] - [brief reason]
Q2: [score] - [brief reason]
...

Here are the questions to evaluate:

"#;

/// Builds the single batched grading request for all entries.
pub fn build_grading_prompt(entries: &[AlignedEntry]) -> String {
    let mut prompt = String::from(GRADING_INSTRUCTIONS);
    for entry in entries {
        prompt.push_str(&format!(
            "\nQ{}: {}\nAI Answer: {}\nExpected: {}\n\n",
            entry.number, entry.question, entry.answer, entry.expected
        ));
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(number: usize, question: &str, answer: &str, expected: &str) -> AlignedEntry {
        AlignedEntry {
            number,
            question: question.into(),
            answer: answer.into(),
            expected: expected.into(),
        }
    }

    #[test]
    fn test_prompt_contains_rubric_and_entries() {
        let prompt = build_grading_prompt(&[
            entry(1, "What colors exist?", "Blue and red.", "Primary and secondary."),
            entry(2, "How do I use Button?", "", "Import it."),
        ]);

        assert!(prompt.starts_with(GRADING_INSTRUCTIONS));
        assert!(prompt.contains("- 6-7: Good match, captures key concepts but missing some details"));
        assert!(prompt.contains(
            "\nQ1: What colors exist?\nAI Answer: Blue and red.\nExpected: Primary and secondary.\n\n"
        ));
        assert!(prompt.contains("\nQ2: How do I use Button?\nAI Answer: \nExpected: Import it.\n\n"));
        assert!(prompt.find("Q1: What").unwrap() < prompt.find("Q2: How").unwrap());
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let entries = vec![entry(1, "q", "a", "e")];
        assert_eq!(build_grading_prompt(&entries), build_grading_prompt(&entries));
    }

    #[test]
    fn test_empty_entries_yield_instructions_only() {
        assert_eq!(build_grading_prompt(&[]), GRADING_INSTRUCTIONS);
    }
}
