//! Changed-file list parsing and source loading

use std::path::Path;

use tracing::{debug, warn};

/// Maximum number of files a relay reads per invocation
pub const MAX_FILES: usize = 15;

/// Ordered list of changed file paths as handed over by CI
///
/// Order follows the input; duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangedFiles {
    paths: Vec<String>,
}

impl ChangedFiles {
    /// Parse a comma-separated path list, dropping blank entries
    pub fn parse(list: &str) -> Self {
        let paths = list
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(String::from)
            .collect();
        Self { paths }
    }

    /// Number of paths in the list
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// All listed paths
    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    /// The first [`MAX_FILES`] paths, the only ones a relay looks at
    pub fn limited(&self) -> &[String] {
        &self.paths[..self.paths.len().min(MAX_FILES)]
    }
}

impl From<Vec<String>> for ChangedFiles {
    fn from(paths: Vec<String>) -> Self {
        Self { paths }
    }
}

/// A file whose contents were read for review
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path as given in the changed-file list
    pub path: String,
    /// File contents, decoded lossily as UTF-8
    pub content: String,
}

/// Read the first [`MAX_FILES`] changed files, relative to `root`
///
/// Missing or unreadable files are logged and skipped; they still count
/// against the limit.
pub async fn read_sources(files: &ChangedFiles, root: &Path) -> Vec<SourceFile> {
    let mut sources = Vec::new();

    for path in files.limited() {
        let full_path = root.join(path);
        match tokio::fs::read(&full_path).await {
            Ok(bytes) => {
                debug!(path = %path, bytes = bytes.len(), "Read changed file");
                sources.push(SourceFile {
                    path: path.clone(),
                    content: String::from_utf8_lossy(&bytes).into_owned(),
                });
            }
            Err(e) => {
                warn!(path = %path, error = %e, "Error reading changed file, skipping");
            }
        }
    }

    sources
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_trims_and_drops_blanks() {
        let files = ChangedFiles::parse(" a.go, ,b.go,,c.go ");
        assert_eq!(files.paths(), &["a.go", "b.go", "c.go"]);
    }

    #[test]
    fn test_parse_keeps_duplicates_in_order() {
        let files = ChangedFiles::parse("b.go,a.go,b.go");
        assert_eq!(files.paths(), &["b.go", "a.go", "b.go"]);
    }

    #[test]
    fn test_parse_empty() {
        assert!(ChangedFiles::parse("").is_empty());
        assert!(ChangedFiles::parse(" , ,").is_empty());
    }

    #[test]
    fn test_limited_caps_at_max_files() {
        let list = (0..40).map(|i| format!("f{}.go", i)).collect::<Vec<_>>().join(",");
        let files = ChangedFiles::parse(&list);
        assert_eq!(files.len(), 40);
        assert_eq!(files.limited().len(), MAX_FILES);
        assert_eq!(files.limited()[0], "f0.go");
        assert_eq!(files.limited()[MAX_FILES - 1], "f14.go");
    }

    #[test]
    fn test_limited_short_list() {
        let files = ChangedFiles::parse("a.go,b.go");
        assert_eq!(files.limited().len(), 2);
    }

    #[tokio::test]
    async fn test_read_sources_skips_missing() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("main.go"), "package main\n").unwrap();

        let files = ChangedFiles::parse("main.go,missing.go");
        let sources = read_sources(&files, dir.path()).await;

        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].path, "main.go");
        assert_eq!(sources[0].content, "package main\n");
    }

    #[tokio::test]
    async fn test_read_sources_reads_at_most_max_files() {
        let dir = TempDir::new().unwrap();
        let mut names = Vec::new();
        for i in 0..20 {
            let name = format!("f{}.go", i);
            std::fs::write(dir.path().join(&name), format!("// {}", i)).unwrap();
            names.push(name);
        }

        let files = ChangedFiles::from(names);
        let sources = read_sources(&files, dir.path()).await;

        assert_eq!(sources.len(), MAX_FILES);
        assert_eq!(sources.last().unwrap().path, "f14.go");
    }

    #[tokio::test]
    async fn test_read_sources_directory_is_unreadable() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("pkg")).unwrap();

        let sources = read_sources(&ChangedFiles::parse("pkg"), dir.path()).await;
        assert!(sources.is_empty());
    }

    #[tokio::test]
    async fn test_read_sources_lossy_utf8() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("bin.go"), [0x66, 0x6f, 0xff, 0x6f]).unwrap();

        let sources = read_sources(&ChangedFiles::parse("bin.go"), dir.path()).await;
        assert_eq!(sources[0].content, "fo\u{FFFD}o");
    }
}
