use std::collections::HashSet;
use std::{fs, path::Path};

use thiserror::Error;
use tracing::info;

use crate::domain::Listing;

#[derive(Debug, Error)]
pub enum ListingError {
    #[error("failed to read listings from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse listings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("listing set is empty")]
    Empty,
    #[error("duplicate listing id '{0}'")]
    DuplicateId(String),
    #[error("listing '{id}' carries {found} flags but is_scam = {is_scam}")]
    MismatchedFlags {
        id: String,
        is_scam: bool,
        found: &'static str,
    },
}

/// Read and validate a JSON array of listings.
pub fn load_listings(path: impl AsRef<Path>) -> Result<Vec<Listing>, ListingError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| ListingError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let listings = parse_listings(&raw)?;
    info!(path = %path.display(), count = listings.len(), "listings.loaded");
    Ok(listings)
}

pub fn parse_listings(raw: &str) -> Result<Vec<Listing>, ListingError> {
    let listings: Vec<Listing> = serde_json::from_str(raw)?;
    validate(&listings)?;
    Ok(listings)
}

fn validate(listings: &[Listing]) -> Result<(), ListingError> {
    if listings.is_empty() {
        return Err(ListingError::Empty);
    }

    let mut seen = HashSet::new();
    for listing in listings {
        if !seen.insert(listing.id.as_str()) {
            return Err(ListingError::DuplicateId(listing.id.clone()));
        }
        // Only the flag list selected by is_scam may be populated.
        let stray = if listing.is_scam {
            (!listing.green_flags.is_empty()).then_some("green")
        } else {
            (!listing.red_flags.is_empty()).then_some("red")
        };
        if let Some(found) = stray {
            return Err(ListingError::MismatchedFlags {
                id: listing.id.clone(),
                is_scam: listing.is_scam,
                found,
            });
        }
    }
    Ok(())
}
