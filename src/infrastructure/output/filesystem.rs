use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::{DomainError, OutputSink, StoredOutput};

/// Naming and placement of output files
#[derive(Debug, Clone)]
pub struct OutputSettings {
    pub directory: PathBuf,
    pub prefix: String,
    pub extension: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("outputs"),
            prefix: "questions".to_string(),
            extension: "tex".to_string(),
        }
    }
}

/// Writes each result to its own file in a flat output directory.
///
/// Names are `{prefix}[_{suffix}]_{timestamp}_{uuid}.{ext}` and files are opened
/// with create-new semantics, so concurrent saves never collide or overwrite.
#[derive(Debug, Clone)]
pub struct FileOutputSink {
    settings: OutputSettings,
}

impl FileOutputSink {
    pub fn new(settings: OutputSettings) -> Self {
        Self { settings }
    }

    pub fn directory(&self) -> &Path {
        &self.settings.directory
    }

    fn file_name(&self, suffix: Option<&str>) -> String {
        let timestamp = Utc::now().format("%Y%m%dT%H%M%SZ");
        let id = Uuid::new_v4().simple();

        match suffix.map(sanitize_suffix).filter(|s| !s.is_empty()) {
            Some(suffix) => format!(
                "{}_{}_{}_{}.{}",
                self.settings.prefix, suffix, timestamp, id, self.settings.extension
            ),
            None => format!(
                "{}_{}_{}.{}",
                self.settings.prefix, timestamp, id, self.settings.extension
            ),
        }
    }
}

#[async_trait]
impl OutputSink for FileOutputSink {
    async fn save(&self, content: &str, suffix: Option<&'static str>) -> Result<StoredOutput, DomainError> {
        let directory = &self.settings.directory;

        tokio::fs::create_dir_all(directory).await.map_err(|e| {
            DomainError::storage(format!("Failed to create {}: {}", directory.display(), e))
        })?;

        let file_name = self.file_name(suffix);
        let path = directory.join(&file_name);

        let file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to create {}: {}", path.display(), e)))?;

        write_or_remove(file, &path, content).await?;

        debug!(file = %path.display(), bytes = content.len(), "Saved output");

        Ok(StoredOutput { file_name, path })
    }

    async fn resolve(&self, reference: &str) -> Result<StoredOutput, DomainError> {
        let not_found = || DomainError::not_found(format!("File '{}' not found", reference));

        let relative = Path::new(reference);
        let plain = !reference.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !plain {
            return Err(not_found());
        }

        let canonical_dir = match tokio::fs::canonicalize(&self.settings.directory).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(not_found()),
            Err(e) => return Err(DomainError::storage(e.to_string())),
        };

        // Canonicalizing resolves symlinks, so a link pointing outside fails the prefix check
        let path = match tokio::fs::canonicalize(canonical_dir.join(relative)).await {
            Ok(path) => path,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(not_found()),
            Err(e) => return Err(DomainError::storage(e.to_string())),
        };

        if !path.starts_with(&canonical_dir) {
            return Err(not_found());
        }

        let is_file = tokio::fs::metadata(&path)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false);
        if !is_file {
            return Err(not_found());
        }

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| reference.to_string());

        Ok(StoredOutput { file_name, path })
    }
}

/// Write the whole content; a failed write removes the file so no partial set is served
async fn write_or_remove<W>(mut writer: W, path: &Path, content: &str) -> Result<(), DomainError>
where
    W: AsyncWrite + Unpin,
{
    let written = match writer.write_all(content.as_bytes()).await {
        Ok(()) => writer.flush().await,
        Err(e) => Err(e),
    };

    if let Err(e) = written {
        drop(writer);
        if let Err(remove_err) = tokio::fs::remove_file(path).await {
            warn!(file = %path.display(), error = %remove_err, "Failed to remove partial output");
        }
        return Err(DomainError::storage(format!("Failed to write {}: {}", path.display(), e)));
    }

    Ok(())
}

/// Lower-case, keep `[a-z0-9-]`, replace everything else with `-`
fn sanitize_suffix(suffix: &str) -> String {
    suffix
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '-' })
        .collect::<String>()
        .trim_matches('-')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sink(dir: &Path) -> FileOutputSink {
        FileOutputSink::new(OutputSettings {
            directory: dir.to_path_buf(),
            ..OutputSettings::default()
        })
    }

    #[test]
    fn test_sanitize_suffix() {
        assert_eq!(sanitize_suffix("similar"), "similar");
        assert_eq!(sanitize_suffix(" From Sample/../x "), "from-sample----x");
        assert_eq!(sanitize_suffix("__"), "");
    }

    #[tokio::test]
    async fn test_save_creates_directory_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let output_dir = dir.path().join("outputs");
        let sink = sink(&output_dir);

        let stored = sink.save("\\question Persian: سلام", None).await.unwrap();

        assert!(stored.file_name.starts_with("questions_"));
        assert!(stored.file_name.ends_with(".tex"));
        assert_eq!(stored.path, output_dir.join(&stored.file_name));
        assert_eq!(
            std::fs::read_to_string(&stored.path).unwrap(),
            "\\question Persian: سلام"
        );
    }

    #[tokio::test]
    async fn test_suffix_in_name() {
        let dir = tempfile::tempdir().unwrap();
        let sink = sink(dir.path());

        let stored = sink.save("x", Some("Similar")).await.unwrap();
        assert!(stored.file_name.starts_with("questions_similar_"));

        let blank = sink.save("x", Some("..")).await.unwrap();
        assert!(!blank.file_name.contains(".._"));
        assert!(!blank.file_name.starts_with("questions__"));
    }

    #[tokio::test]
    async fn test_identical_saves_get_distinct_files() {
        let dir = tempfile::tempdir().unwrap();
        let sink = sink(dir.path());

        let first = sink.save("same", None).await.unwrap();
        let second = sink.save("same", None).await.unwrap();

        assert_ne!(first.path, second.path);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    /// Accepts nothing and fails every write
    struct BrokenWriter;

    impl AsyncWrite for BrokenWriter {
        fn poll_write(
            self: std::pin::Pin<&mut Self>,
            _cx: &mut std::task::Context<'_>,
            _buf: &[u8],
        ) -> std::task::Poll<std::io::Result<usize>> {
            std::task::Poll::Ready(Err(std::io::Error::other("no space left on device")))
        }

        fn poll_flush(
            self: std::pin::Pin<&mut Self>,
            _cx: &mut std::task::Context<'_>,
        ) -> std::task::Poll<std::io::Result<()>> {
            std::task::Poll::Ready(Ok(()))
        }

        fn poll_shutdown(
            self: std::pin::Pin<&mut Self>,
            _cx: &mut std::task::Context<'_>,
        ) -> std::task::Poll<std::io::Result<()>> {
            std::task::Poll::Ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn test_failed_write_removes_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("questions_partial.tex");
        std::fs::write(&path, "\\begin{questions}").unwrap();

        let err = write_or_remove(BrokenWriter, &path, "\\question").await.unwrap_err();

        assert!(matches!(err, DomainError::Storage { .. }));
        assert!(err.to_string().contains("no space left on device"));
        assert!(!path.exists());
        assert!(matches!(
            sink(dir.path()).resolve("questions_partial.tex").await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_write_keeps_complete_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("questions_full.tex");
        let file = tokio::fs::File::create(&path).await.unwrap();

        write_or_remove(file, &path, "\\question 1+1?").await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "\\question 1+1?");
    }

    #[tokio::test]
    async fn test_resolve_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let sink = sink(dir.path());

        let stored = sink.save("\\begin{questions}\\end{questions}", None).await.unwrap();
        let resolved = sink.resolve(&stored.file_name).await.unwrap();

        assert_eq!(resolved.file_name, stored.file_name);
        assert_eq!(
            std::fs::read_to_string(resolved.path).unwrap(),
            "\\begin{questions}\\end{questions}"
        );
    }

    #[tokio::test]
    async fn test_resolve_rejects_escapes() {
        let root = tempfile::tempdir().unwrap();
        let output_dir = root.path().join("outputs");
        std::fs::create_dir(&output_dir).unwrap();
        std::fs::write(root.path().join("secret.txt"), "secret").unwrap();
        let sink = sink(&output_dir);

        for reference in ["../secret.txt", "../../etc/passwd", "/etc/passwd", "", "a/../../secret.txt"] {
            let err = sink.resolve(reference).await.unwrap_err();
            assert!(
                matches!(err, DomainError::NotFound { .. }),
                "expected not found for {:?}",
                reference
            );
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_resolve_rejects_symlink_escape() {
        let root = tempfile::tempdir().unwrap();
        let output_dir = root.path().join("outputs");
        std::fs::create_dir(&output_dir).unwrap();
        std::fs::write(root.path().join("secret.txt"), "secret").unwrap();
        std::os::unix::fs::symlink(root.path().join("secret.txt"), output_dir.join("link.tex"))
            .unwrap();

        let err = sink(&output_dir).resolve("link.tex").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_resolve_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let sink = sink(dir.path());

        let err = sink.resolve("questions_missing.tex").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));

        let absent = FileOutputSink::new(OutputSettings {
            directory: dir.path().join("never-created"),
            ..OutputSettings::default()
        });
        assert!(matches!(
            absent.resolve("x.tex").await,
            Err(DomainError::NotFound { .. })
        ));
    }
}
