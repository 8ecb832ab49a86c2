use log::{debug, info};

use crate::providers::GeocodingProvider;
use crate::{Coordinate, Error};

/// Free-text destination lookup
#[derive(Debug, Clone)]
pub struct DestinationResolver<G> {
    geocoder: G,
}

impl<G: GeocodingProvider> DestinationResolver<G> {
    pub fn new(geocoder: G) -> Self {
        Self { geocoder }
    }

    /// Returns the top forward-geocoding match for `query`.
    ///
    /// `Ok(None)` means nothing matched, which callers present as
    /// "destination not found". Blank queries match nothing and are not sent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GeocodingUnavailable`] on transport or HTTP failure.
    pub async fn resolve_text(&self, query: &str) -> Result<Option<Coordinate>, Error> {
        let query = query.trim();
        if query.is_empty() {
            debug!("Ignoring blank destination query");
            return Ok(None);
        }

        let hit = self
            .geocoder
            .search(query)
            .await
            .map_err(Error::GeocodingUnavailable)?;

        match hit {
            Some(coordinate) => debug!("Destination '{query}' resolved to {coordinate}"),
            None => info!("No geocoding match for destination '{query}'"),
        }
        Ok(hit)
    }
}
