use crate::error::FetchError;
use crate::sources::HtmlSource;
use async_trait::async_trait;

/// Reads from `primary` and falls back to `secondary` when the primary has no page
/// or fails
pub struct FallbackSource<A, B> {
    primary: A,
    secondary: B,
}

impl<A: HtmlSource, B: HtmlSource> FallbackSource<A, B> {
    pub fn new(primary: A, secondary: B) -> Self {
        Self { primary, secondary }
    }
}

#[async_trait]
impl<A: HtmlSource, B: HtmlSource> HtmlSource for FallbackSource<A, B> {
    async fn fetch(&self, path: &str) -> Result<Option<String>, FetchError> {
        match self.primary.fetch(path).await {
            Ok(Some(html)) => return Ok(Some(html)),
            Ok(None) => ::log::debug!(
                "{} has no page at {}, trying {}",
                self.primary.name(),
                path,
                self.secondary.name()
            ),
            Err(e) => ::log::warn!(
                "{} failed for {}: {}, trying {}",
                self.primary.name(),
                path,
                e,
                self.secondary.name()
            ),
        }

        self.secondary.fetch(path).await
    }

    fn name(&self) -> &str {
        "fallback"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Result<Option<&'static str>, ()>);

    #[async_trait]
    impl HtmlSource for Fixed {
        async fn fetch(&self, path: &str) -> Result<Option<String>, FetchError> {
            match self.0 {
                Ok(html) => Ok(html.map(str::to_string)),
                Err(()) => Err(FetchError::Timeout(path.to_string())),
            }
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    #[tokio::test]
    async fn test_primary_wins() {
        let source = FallbackSource::new(Fixed(Ok(Some("primary"))), Fixed(Ok(Some("secondary"))));
        assert_eq!(source.fetch("/").await.unwrap().as_deref(), Some("primary"));
    }

    #[tokio::test]
    async fn test_falls_back_on_missing_or_error() {
        let source = FallbackSource::new(Fixed(Ok(None)), Fixed(Ok(Some("secondary"))));
        assert_eq!(source.fetch("/").await.unwrap().as_deref(), Some("secondary"));

        let source = FallbackSource::new(Fixed(Err(())), Fixed(Ok(Some("secondary"))));
        assert_eq!(source.fetch("/").await.unwrap().as_deref(), Some("secondary"));
    }

    #[tokio::test]
    async fn test_secondary_error_propagates() {
        let source = FallbackSource::new(Fixed(Ok(None)), Fixed(Err(())));
        assert!(matches!(source.fetch("/").await, Err(FetchError::Timeout(_))));
    }
}
