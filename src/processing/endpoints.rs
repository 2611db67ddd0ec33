//! URL layout of the processing service.

use reqwest::Url;
use crate::core::ProcessedResult;
use crate::utils::{ClientConfig, StudioResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: Url,
}

impl Endpoints {
    /// `base` must be able to carry path segments (any http(s) URL can).
    pub fn new(base: Url) -> Self {
        Self { base }
    }

    pub fn from_config(config: &ClientConfig) -> StudioResult<Self> {
        config.endpoint_url().map(Self::new)
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// `POST /upload`
    pub fn upload(&self) -> Url {
        self.resource(&["upload"])
    }

    /// `GET /health`
    pub fn health(&self) -> Url {
        self.resource(&["health"])
    }

    /// `GET /uploads/{filename}`
    pub fn original(&self, filename: &str) -> Url {
        self.resource(&["uploads", filename])
    }

    /// `GET /processed/{reference}`
    pub fn processed_reference(&self, reference: &str) -> Url {
        self.resource(&["processed", reference])
    }

    /// Where the uploaded copy of a result's source can be fetched.
    ///
    /// Prefers the path the server reported; falls back to the file name.
    pub fn uploaded_for(&self, result: &ProcessedResult) -> Url {
        result
            .uploaded_path
            .as_deref()
            .and_then(|path| self.server_path(path))
            .unwrap_or_else(|| self.original(&result.filename))
    }

    /// Where a result's processed artifact can be fetched.
    ///
    /// Prefers the path the server reported; falls back to `{filter}_{filename}`.
    pub fn processed_for(&self, result: &ProcessedResult) -> Url {
        result
            .processed_path
            .as_deref()
            .and_then(|path| self.server_path(path))
            .unwrap_or_else(|| self.processed_reference(&result.processed_reference()))
    }

    fn server_path(&self, path: &str) -> Option<Url> {
        self.base.join(path).ok()
    }

    fn resource(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        url.set_query(None);
        url.set_fragment(None);
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FilterChoice;

    fn endpoints(base: &str) -> Endpoints {
        Endpoints::new(Url::parse(base).unwrap())
    }

    #[test]
    fn resources_hang_off_the_base() {
        let e = endpoints("http://127.0.0.1:5000");
        assert_eq!(e.upload().as_str(), "http://127.0.0.1:5000/upload");
        assert_eq!(e.health().as_str(), "http://127.0.0.1:5000/health");
        assert_eq!(e.original("cat.png").as_str(), "http://127.0.0.1:5000/uploads/cat.png");
        assert_eq!(
            e.processed_reference("blur_cat.png").as_str(),
            "http://127.0.0.1:5000/processed/blur_cat.png"
        );
    }

    #[test]
    fn base_paths_are_kept() {
        let e = endpoints("https://filters.example.com/api/");
        assert_eq!(e.upload().as_str(), "https://filters.example.com/api/upload");
        let e = endpoints("https://filters.example.com/api?x=1");
        assert_eq!(e.health().as_str(), "https://filters.example.com/api/health");
    }

    #[test]
    fn names_are_percent_encoded() {
        let e = endpoints("http://localhost:5000");
        assert_eq!(
            e.original("my cat#1.png").as_str(),
            "http://localhost:5000/uploads/my%20cat%231.png"
        );
    }

    #[test]
    fn server_reported_paths_win() {
        let e = endpoints("http://localhost:5000");
        let mut result = ProcessedResult::new("cat.png", FilterChoice::Blur);
        assert_eq!(e.processed_for(&result).as_str(), "http://localhost:5000/processed/blur_cat.png");
        assert_eq!(e.uploaded_for(&result).as_str(), "http://localhost:5000/uploads/cat.png");

        result.processed_path = Some("/processed/blur_3f2a_cat.png".into());
        result.uploaded_path = Some("/uploads/3f2a_cat.png".into());
        assert_eq!(e.processed_for(&result).as_str(), "http://localhost:5000/processed/blur_3f2a_cat.png");
        assert_eq!(e.uploaded_for(&result).as_str(), "http://localhost:5000/uploads/3f2a_cat.png");
    }
}
