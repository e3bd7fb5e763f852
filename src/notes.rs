use std::path::{Path, PathBuf};

use sanitize_filename::sanitize;
use walkdir::WalkDir;

use crate::{
    client::{Summarizer, summarize_or_sentinel},
    config::Config,
    error::{NotesError, Result},
    title::normalize,
    utils::clean_text,
};

/// Display title of a transcript file, `01_intro.en.txt` -> `1. Intro`.
pub fn note_title(file_name: &str, suffix: &str) -> String {
    normalize(file_name.strip_suffix(suffix).unwrap_or(file_name))
}

#[derive(Debug, Default)]
pub struct NotesReport {
    pub written: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
}

/// Mirrors a transcripts tree into a vault of markdown notes.
#[derive(Debug, Clone)]
pub struct NoteWriter {
    transcripts: PathBuf,
    vault: PathBuf,
    suffix: String,
}

impl NoteWriter {
    pub fn new(transcripts: impl Into<PathBuf>, vault: impl Into<PathBuf>, suffix: &str) -> Self {
        Self {
            transcripts: transcripts.into(),
            vault: vault.into(),
            suffix: suffix.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            config.transcripts()?,
            config.vault()?,
            &config.notes.suffix,
        ))
    }

    /// Transcript files under the transcripts folder, sorted by path.
    pub fn transcripts(&self) -> Result<Vec<PathBuf>> {
        if !self.transcripts.is_dir() {
            return Err(NotesError::RootNotFound(self.transcripts.clone()));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.transcripts).sort_by_file_name() {
            let entry = entry?;
            let is_transcript = entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.ends_with(&self.suffix));
            if entry.file_type().is_file() && is_transcript {
                files.push(entry.into_path());
            }
        }

        Ok(files)
    }

    /// Where the note for `transcript` goes, keeping its folder layout.
    pub fn note_path(&self, transcript: &Path) -> PathBuf {
        let relative = transcript
            .strip_prefix(&self.transcripts)
            .unwrap_or(transcript);
        let file_name = relative
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        let title = sanitize(note_title(&file_name, &self.suffix));

        let mut path = self.vault.clone();
        if let Some(dir) = relative.parent().filter(|d| !d.as_os_str().is_empty()) {
            path.push(dir);
        }
        path.push(format!("{title}.md"));
        path
    }

    /// Summarizes one transcript into its note and returns the note path.
    pub async fn write_note(
        &self,
        transcript: &Path,
        summarizer: &dyn Summarizer,
    ) -> Result<PathBuf> {
        let path = self.note_path(transcript);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let text = tokio::fs::read_to_string(transcript).await?;
        let summary = summarize_or_sentinel(summarizer, &clean_text(&text)).await;

        tokio::fs::write(&path, summary).await?;
        tracing::info!("Saved summary to {}", path.display());
        Ok(path)
    }

    /// Writes a note for every transcript, one at a time.
    pub async fn process_all(&self, summarizer: &dyn Summarizer) -> Result<NotesReport> {
        let mut report = NotesReport::default();

        for transcript in self.transcripts()? {
            match self.write_note(&transcript, summarizer).await {
                Ok(path) => report.written.push(path),
                Err(e) => {
                    tracing::error!("processing {} failed: {}", transcript.display(), e);
                    report.failed.push((transcript, e.to_string()));
                }
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_strips_suffix() {
        assert_eq!(note_title("01_document.en.txt", ".en.txt"), "1. Document");
        assert_eq!(note_title("intro-video.en.txt", ".en.txt"), "Intro Video");
        assert_eq!(note_title("readme", ".en.txt"), "Readme");
    }

    #[test]
    fn note_path_mirrors_layout() {
        let writer = NoteWriter::new("/in", "/vault", ".en.txt");
        assert_eq!(
            writer.note_path(Path::new("/in/01_course/02_lesson-one.en.txt")),
            PathBuf::from("/vault/01_course/2. Lesson One.md")
        );
        assert_eq!(
            writer.note_path(Path::new("/in/03_top.en.txt")),
            PathBuf::from("/vault/3. Top.md")
        );
    }

    #[test]
    fn from_config_needs_both_folders() {
        let mut config = Config::default();
        config.paths.vault = Some(PathBuf::from("/vault"));
        assert!(matches!(
            NoteWriter::from_config(&config),
            Err(NotesError::MissingPath("transcripts"))
        ));
    }
}
