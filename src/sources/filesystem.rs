use crate::error::FetchError;
use crate::sources::HtmlSource;
use crate::utils;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Reads pages from a built site directory
///
/// `/` maps to `index.html`, `/a/b/` to `a/b/index.html` and then to `a/b.html`.
pub struct FilesystemSource {
    root: PathBuf,
}

impl FilesystemSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Files that may hold the page, in lookup order
    ///
    /// Paths that try to climb out of the root resolve to nothing.
    pub fn candidates(&self, path: &str) -> Vec<PathBuf> {
        let path = utils::normalize_path(path);
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        if segments.iter().any(|s| *s == ".." || *s == ".") {
            return Vec::new();
        }

        let Some((last, parents)) = segments.split_last() else {
            return vec![self.root.join("index.html")];
        };

        let mut dir = self.root.clone();
        dir.extend(parents);

        vec![
            dir.join(last).join("index.html"),
            dir.join(format!("{}.html", last)),
        ]
    }
}

#[async_trait]
impl HtmlSource for FilesystemSource {
    async fn fetch(&self, path: &str) -> Result<Option<String>, FetchError> {
        for candidate in self.candidates(path) {
            match tokio::fs::read_to_string(&candidate).await {
                Ok(html) => {
                    ::log::debug!("Read {} from {}", path, candidate.display());
                    return Ok(Some(html));
                }
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(FetchError::Io(e)),
            }
        }

        Ok(None)
    }

    fn name(&self) -> &str {
        "filesystem"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidates() {
        let source = FilesystemSource::new("dist");
        assert_eq!(source.candidates("/"), vec![PathBuf::from("dist/index.html")]);
        assert_eq!(
            source.candidates("/printer-rental"),
            vec![
                PathBuf::from("dist/printer-rental/index.html"),
                PathBuf::from("dist/printer-rental.html"),
            ]
        );
        assert_eq!(
            source.candidates("/a/b/"),
            vec![PathBuf::from("dist/a/b/index.html"), PathBuf::from("dist/a/b.html")]
        );
        assert!(source.candidates("/../etc/passwd").is_empty());
    }

    #[tokio::test]
    async fn test_fetch_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<title>Home</title>").unwrap();
        std::fs::create_dir(dir.path().join("about")).unwrap();
        std::fs::write(dir.path().join("about/index.html"), "<title>About</title>").unwrap();
        std::fs::write(dir.path().join("contact.html"), "<title>Contact</title>").unwrap();

        let source = FilesystemSource::new(dir.path());
        assert_eq!(
            source.fetch("/").await.unwrap().as_deref(),
            Some("<title>Home</title>")
        );
        assert_eq!(
            source.fetch("/about").await.unwrap().as_deref(),
            Some("<title>About</title>")
        );
        assert_eq!(
            source.fetch("/contact/").await.unwrap().as_deref(),
            Some("<title>Contact</title>")
        );
        assert!(source.fetch("/missing/").await.unwrap().is_none());
    }
}
