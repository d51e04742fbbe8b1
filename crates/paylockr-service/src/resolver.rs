//! Payment link resolution.

use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use paylockr_core::error::AppError;
use paylockr_core::result::AppResult;
use paylockr_database::stores::{FileStore, LinkStore};
use paylockr_entity::{File, PaymentLink};

/// A link that passed every redeemability gate, with the file it sells.
#[derive(Debug, Clone)]
pub struct ResolvedLink {
    pub link: PaymentLink,
    pub file: File,
}

/// Validates payment links before anything downstream runs.
///
/// The gates fire in a fixed order: unknown or inactive codes are
/// `NOT_FOUND`, then expiry, then download exhaustion. Expiry always wins
/// over exhaustion when both hold. Resolution never writes.
#[derive(Debug, Clone)]
pub struct LinkResolver {
    links: Arc<dyn LinkStore>,
    files: Arc<dyn FileStore>,
}

impl LinkResolver {
    pub fn new(links: Arc<dyn LinkStore>, files: Arc<dyn FileStore>) -> Self {
        Self { links, files }
    }

    /// Resolve a link code to a redeemable link and its file.
    pub async fn resolve(&self, code: &str) -> AppResult<ResolvedLink> {
        let link = self
            .links
            .find_active_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found("Payment link not found"))?;

        if link.is_expired(Utc::now()) {
            debug!(code, "Rejected expired payment link");
            return Err(AppError::link_expired("This payment link has expired"));
        }

        if link.is_exhausted() {
            debug!(code, "Rejected exhausted payment link");
            return Err(AppError::link_exhausted(
                "This payment link has reached its download limit",
            ));
        }

        let file = self
            .files
            .find_by_id(link.file_id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))?;

        Ok(ResolvedLink { link, file })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use paylockr_core::error::ErrorKind;
    use paylockr_database::stores::Stores;

    use crate::testutil::{sample_link, seed};

    fn resolver(stores: &Stores) -> LinkResolver {
        LinkResolver::new(stores.links.clone(), stores.files.clone())
    }

    #[tokio::test]
    async fn test_resolves_active_link() {
        let stores = Stores::memory();
        seed(&stores, sample_link()).await;

        let resolved = resolver(&stores).resolve("abc123").await.unwrap();
        assert_eq!(resolved.link.link_code, "abc123");
        assert_eq!(resolved.file.title, "Ambient Pack Vol. 1");
    }

    #[tokio::test]
    async fn test_unknown_code_is_not_found() {
        let stores = Stores::memory();
        let err = resolver(&stores).resolve("nope").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_inactive_link_is_not_found() {
        let stores = Stores::memory();
        let link = PaymentLink {
            is_active: false,
            ..sample_link()
        };
        seed(&stores, link).await;

        let err = resolver(&stores).resolve("abc123").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_expiry_wins_over_exhaustion() {
        let stores = Stores::memory();
        let link = PaymentLink {
            expires_at: Some(Utc::now() - Duration::hours(1)),
            max_downloads: 1,
            current_downloads: 1,
            ..sample_link()
        };
        seed(&stores, link).await;

        let err = resolver(&stores).resolve("abc123").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::LinkExpired);
    }

    #[tokio::test]
    async fn test_exhausted_link_is_rejected() {
        let stores = Stores::memory();
        let link = PaymentLink {
            max_downloads: 2,
            current_downloads: 2,
            ..sample_link()
        };
        seed(&stores, link).await;

        let err = resolver(&stores).resolve("abc123").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::LinkExhausted);
    }
}
