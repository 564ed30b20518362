//! End-to-end tests: run the batch, then score its answers.
//!
//! The assistant and the judge are stubbed, except for the ignored test that
//! drives a real `q` installation.
//! Run it with: cargo test --test pipeline -- --ignored

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use qa_harness::config::HarnessConfig;
use qa_harness::judge::{AnswerScorer, ScoreConfig};
use qa_harness::runner::{AgentError, AgentOutput, AssistantAdapter, BatchRunner, RunConfig};
use qa_harness::ScoringError;
use tempfile::TempDir;

/// Answers each question with a colored tool trace followed by a quoted answer.
struct StubAssistant;

#[async_trait]
impl AssistantAdapter for StubAssistant {
    fn name(&self) -> &str {
        "stub-assistant"
    }

    async fn invoke(&self, prompt: &str) -> Result<AgentOutput, AgentError> {
        let stdout = if prompt.contains("colors") {
            "\x1b[32m🛠️ Using tool: search_docs\x1b[0m\n ⋮ \n ● Completed in 0.2s\n\n> Hello\n> World\n"
        } else if prompt.contains("Button") {
            "Let me look that up.\n> Import Button from the library.\n"
        } else {
            "I could not find anything about that.\n"
        };
        Ok(AgentOutput::new(
            0,
            stdout.to_string(),
            String::new(),
            Duration::from_millis(1),
        ))
    }
}

/// Grades by checking whether the expected answer text appears in the prompt.
struct StubJudge {
    prompts: Mutex<Vec<String>>,
    reply: String,
}

#[async_trait]
impl AssistantAdapter for StubJudge {
    fn name(&self) -> &str {
        "stub-judge"
    }

    async fn invoke(&self, prompt: &str) -> Result<AgentOutput, AgentError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(AgentOutput::new(
            0,
            self.reply.clone(),
            String::new(),
            Duration::from_millis(1),
        ))
    }
}

fn write_evaluation_set(dir: &TempDir) -> RunConfig {
    let questions = dir.path().join("EVALUATION_SET_1.md");
    std::fs::write(
        &questions,
        "# Design system questions\n\n- What colors exist?\n- How do I use Button?\n- What is the grid gutter?\n",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("EVALUATION_SET_1_ANSWER_KEY.md"),
        "1. What colors exist?\nExpected Answer: Hello World\n\n2. How do I use Button?\nExpected Answer: Import Button.\n\n3. What is the grid gutter?\nExpected Answer: 16px.\n",
    )
    .unwrap();

    RunConfig::new(questions)
        .with_answers_path(dir.path().join("EVALUATION_ANSWERS_SET_1.md"))
        .with_transcripts_path(dir.path().join("EVALUATION_SET_1_FULL_OUTPUT.md"))
}

fn score_config(dir: &TempDir, run: &RunConfig) -> ScoreConfig {
    ScoreConfig::new(&run.answers_path)
        .with_questions_path(&run.questions_path)
        .with_key_path(dir.path().join("EVALUATION_SET_1_ANSWER_KEY.md"))
        .with_output_dir(dir.path().join("results"))
}

#[tokio::test]
async fn test_run_then_score() {
    let temp = TempDir::new().unwrap();
    let run_config = write_evaluation_set(&temp);

    let summary = BatchRunner::new(Arc::new(StubAssistant), run_config.clone())
        .run()
        .await
        .unwrap();
    assert_eq!(summary.total, 3);
    assert_eq!(summary.answered, 2);
    assert_eq!(summary.extraction_misses, 1);
    assert_eq!(summary.results[0].answer, "Hello\nWorld");

    let transcripts = std::fs::read_to_string(&run_config.transcripts_path).unwrap();
    assert!(transcripts.contains("🛠️ Using tool: search_docs"));
    assert!(!transcripts.contains('\x1b'));

    let judge = Arc::new(StubJudge {
        prompts: Mutex::new(Vec::new()),
        reply: "Here are my grades:\nQ1: 10 - exact match\nQ2: 7 - close enough\nQ3: 0 - no answer given\n\nOverall fair.\n".to_string(),
    });
    let outcome = AnswerScorer::new(judge.clone(), score_config(&temp, &run_config))
        .score()
        .await
        .unwrap();

    let prompts = judge.prompts.lock().unwrap().clone();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("\nQ1: What colors exist?\nAI Answer: Hello World\nExpected: Hello World\n"));
    assert!(prompts[0].contains("\nQ3: What is the grid gutter?\nAI Answer: \nExpected: 16px.\n"));

    let report = &outcome.report;
    assert_eq!(report.total, 3);
    assert_eq!(report.pass_count, 2);
    assert_eq!(report.total_points, 17);
    assert_eq!(report.failures, vec!["Q3: no answer given".to_string()]);

    assert!(outcome
        .results_path
        .ends_with("evaluation_results_with_pass_fail_set_1.txt"));
    let results = std::fs::read_to_string(&outcome.results_path).unwrap();
    assert!(results.contains("Q2: 7 - close enough [PASS]"));
    assert!(results.contains("- Average Score: 5.67/10 (17/30 total points)"));
    assert!(results.contains("- Pass Rate: 66.7% (2 out of 3 questions passed)"));
}

#[tokio::test]
async fn test_score_fails_without_grade_lines() {
    let temp = TempDir::new().unwrap();
    let run_config = write_evaluation_set(&temp);
    BatchRunner::new(Arc::new(StubAssistant), run_config.clone())
        .run()
        .await
        .unwrap();

    let judge = Arc::new(StubJudge {
        prompts: Mutex::new(Vec::new()),
        reply: "Sorry, I can't help with that.\n".to_string(),
    });
    let config = score_config(&temp, &run_config);
    let err = AnswerScorer::new(judge, config.clone())
        .score()
        .await
        .unwrap_err();

    assert!(matches!(err, ScoringError::NoScores));
    assert!(config.prompt_path().exists());
    assert!(!config.results_path().exists());
}

#[tokio::test]
#[ignore] // Requires an authenticated `q` CLI on PATH
async fn test_real_assistant_single_question() {
    let temp = TempDir::new().unwrap();
    let questions = temp.path().join("questions.md");
    std::fs::write(&questions, "- what is 2 + 2? Reply with just the number.\n").unwrap();

    let harness = HarnessConfig::load(None).expect("valid configuration");
    let run_config = RunConfig::new(questions)
        .with_answers_path(temp.path().join("answers.md"))
        .with_transcripts_path(temp.path().join("full.md"))
        .with_prompt_prefix("");

    let summary = BatchRunner::new(Arc::new(harness.run_adapter()), run_config)
        .run()
        .await
        .expect("batch should complete");

    assert_eq!(summary.total, 1);
    assert_eq!(summary.invocation_errors, 0, "{:?}", summary.results[0].error);
}
