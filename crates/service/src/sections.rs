use std::sync::Arc;

use models::{AboutSection, FeaturedData, ProfileData, Project, SiteSection};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error, instrument, warn};

use crate::errors::ServiceError;
use crate::storage::SectionBackend;

/// Result of a read that never fails: either the stored value or the caller's fallback.
#[derive(Clone, Debug, PartialEq)]
pub enum Fetched<T> {
    Stored(T),
    Fallback(T),
}

impl<T> Fetched<T> {
    pub fn into_inner(self) -> T {
        match self {
            Self::Stored(v) | Self::Fallback(v) => v,
        }
    }

    pub fn value(&self) -> &T {
        match self {
            Self::Stored(v) | Self::Fallback(v) => v,
        }
    }

    pub fn is_stored(&self) -> bool { matches!(self, Self::Stored(_)) }

    pub fn is_fallback(&self) -> bool { matches!(self, Self::Fallback(_)) }
}

/// Named JSON sections over whichever backend was selected at startup.
#[derive(Clone)]
pub struct SectionStore {
    backend: Arc<dyn SectionBackend>,
}

impl SectionStore {
    pub fn new(backend: Arc<dyn SectionBackend>) -> Self { Self { backend } }

    pub fn backend_name(&self) -> &'static str { self.backend.name() }

    /// Read `key` as `T`.
    ///
    /// Absent keys, unreadable or unparsable content and values that do not fit `T`
    /// all yield `Fetched::Fallback(fallback)`; failures are logged, never returned.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::{SectionStore, storage::mock::MemoryBackend};
    /// let store = SectionStore::new(Arc::new(MemoryBackend::new()));
    /// let got = tokio_test::block_on(store.get("about", vec!["default".to_string()]));
    /// assert!(got.is_fallback());
    /// tokio_test::block_on(store.set("about", &vec!["hello"])).unwrap();
    /// let got = tokio_test::block_on(store.get("about", Vec::<String>::new()));
    /// assert_eq!(got.into_inner(), vec!["hello".to_string()]);
    /// ```
    #[instrument(skip(self, fallback), fields(backend = self.backend.name()))]
    pub async fn get<T: DeserializeOwned>(&self, key: &str, fallback: T) -> Fetched<T> {
        let raw = match self.backend.read(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("section not set; using fallback");
                return Fetched::Fallback(fallback);
            }
            Err(e) => {
                warn!(key, error = %e, "section read failed; using fallback");
                return Fetched::Fallback(fallback);
            }
        };
        match serde_json::from_value::<T>(raw.clone()) {
            Ok(v) => Fetched::Stored(v),
            Err(e) => {
                warn!(key, raw = %raw, error = %e, "section does not match expected shape; using fallback");
                Fetched::Fallback(fallback)
            }
        }
    }

    /// Serialize `value` and overwrite whatever is stored under `key`.
    #[instrument(skip(self, value), fields(backend = self.backend.name()))]
    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), ServiceError> {
        let res = match serde_json::to_value(value) {
            Ok(json) => self.backend.write(key, &json).await,
            Err(e) => Err(e.into()),
        };
        match &res {
            Ok(()) => debug!("section written"),
            Err(e) => error!(key, error = %e, "section write failed"),
        }
        res
    }

    pub async fn profile(&self, fallback: ProfileData) -> Fetched<ProfileData> {
        self.get(SiteSection::Profile.key(), fallback).await
    }

    pub async fn featured(&self, fallback: FeaturedData) -> Fetched<FeaturedData> {
        self.get(SiteSection::Featured.key(), fallback).await
    }

    pub async fn projects(&self, fallback: Vec<Project>) -> Fetched<Vec<Project>> {
        self.get(SiteSection::Projects.key(), fallback).await
    }

    pub async fn about(&self, fallback: Vec<AboutSection>) -> Fetched<Vec<AboutSection>> {
        self.get(SiteSection::About.key(), fallback).await
    }

    pub async fn set_section<T: Serialize + ?Sized>(&self, section: SiteSection, value: &T) -> Result<(), ServiceError> {
        self.set(section.key(), value).await
    }
}
