//! Section format shared by the runner artifacts and the answer parser.
//!
//! ```text
//! ## Question <n>
//!
//! **Question:** <question text>
//!
//! **Answer:** <content>
//!
//! ```
//!
//! These markers are the compatibility contract between the two stages.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::ArtifactError;

/// Heading that opens every question section.
pub const SECTION_HEADING: &str = "## Question";
/// Field label carrying the question text.
pub const QUESTION_FIELD: &str = "**Question:**";
/// Field label carrying the answer (or transcript) content.
pub const ANSWER_FIELD: &str = "**Answer:**";
/// Field label that ends an answer when present.
pub const SOURCE_FIELD: &str = "**Source:**";

/// Renders one question section.
pub fn format_section(number: usize, question: &str, content: &str) -> String {
    format!(
        "{SECTION_HEADING} {number}\n\n{QUESTION_FIELD} {question}\n\n{ANSWER_FIELD} {content}\n\n"
    )
}

/// Append-only writer for a section artifact.
///
/// The file is truncated on creation and flushed after every section, so an
/// interrupted batch still leaves the completed sections on disk in order.
pub struct SectionWriter {
    path: PathBuf,
    file: File,
}

impl SectionWriter {
    /// Creates (or truncates) the artifact at `path`.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ArtifactError::write(parent, e))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)
            .map_err(|e| ArtifactError::write(&path, e))?;
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one section and flushes it to disk.
    pub fn write_section(
        &mut self,
        number: usize,
        question: &str,
        content: &str,
    ) -> Result<(), ArtifactError> {
        let section = format_section(number, question, content);
        self.file
            .write_all(section.as_bytes())
            .and_then(|_| self.file.flush())
            .map_err(|e| ArtifactError::write(&self.path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_format_section() {
        assert_eq!(
            format_section(3, "What is a token?", "A named value."),
            "## Question 3\n\n**Question:** What is a token?\n\n**Answer:** A named value.\n\n"
        );
    }

    #[test]
    fn test_writer_appends_in_order_and_truncates() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("out.md");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "stale content").unwrap();

        let mut writer = SectionWriter::create(&path).unwrap();
        writer.write_section(1, "q1", "a1").unwrap();
        writer.write_section(2, "q2", "").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(!content.contains("stale"));
        let first = content.find("## Question 1").unwrap();
        let second = content.find("## Question 2").unwrap();
        assert!(first < second);
        assert!(content.ends_with("**Answer:** \n\n"));
    }
}
