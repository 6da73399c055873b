pub mod fallback;
pub mod filesystem;
pub mod webdriver;

pub use fallback::FallbackSource;
pub use filesystem::FilesystemSource;
pub use webdriver::WebDriverSource;

use crate::error::FetchError;
use async_trait::async_trait;
use std::sync::Arc;

/// Somewhere the HTML of a site page can be read from
#[async_trait]
pub trait HtmlSource: Send + Sync {
    /// Fetch the HTML served at a canonical site path
    ///
    /// `Ok(None)` means the source has no such page; `Err` means it could not be asked.
    async fn fetch(&self, path: &str) -> Result<Option<String>, FetchError>;

    /// Short name used in log output
    fn name(&self) -> &str;
}

#[async_trait]
impl<T: HtmlSource + ?Sized> HtmlSource for Box<T> {
    async fn fetch(&self, path: &str) -> Result<Option<String>, FetchError> {
        (**self).fetch(path).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

#[async_trait]
impl<T: HtmlSource + ?Sized> HtmlSource for Arc<T> {
    async fn fetch(&self, path: &str) -> Result<Option<String>, FetchError> {
        (**self).fetch(path).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
