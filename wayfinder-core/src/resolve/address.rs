//! Reverse geocoding with confidence escalation
//!
//! A single reverse lookup is not trusted blindly. The resolver
//!
//! 1. asks for building-level precision restricted to addresses,
//! 2. retries at street level when the sensor is imprecise and no street
//!    came back,
//! 3. measures how far the provider's matched point is from the requested
//!    one and retries unrestricted when it is more than 20 m off, keeping
//!    whichever answer lies closer,
//! 4. trusts the provider's display string only when the match is within
//!    10 m, and otherwise assembles the address from its parts.

use itertools::Itertools;
use log::{debug, warn};

use crate::algo::haversine_distance;
use crate::providers::{AddressFields, GeocodingProvider, ReversePlace, ReverseQuery};
use crate::{
    AddressResolution, COARSE_ACCURACY_METERS, Coordinate, Error, SUSPECT_ROUND_TRIP_METERS,
    TRUSTED_ROUND_TRIP_METERS,
};

#[derive(Debug, Clone)]
pub struct AddressResolver<G> {
    geocoder: G,
}

/// A reverse answer together with its measured round-trip distance
struct Candidate {
    place: ReversePlace,
    round_trip: Option<f64>,
}

impl Candidate {
    fn new(requested: Coordinate, place: ReversePlace) -> Self {
        let round_trip = place.matched.map(|m| haversine_distance(requested, m));
        Self { place, round_trip }
    }

    fn is_closer_than(&self, other: &Candidate) -> bool {
        match (self.round_trip, other.round_trip) {
            (Some(mine), Some(theirs)) => mine < theirs,
            (Some(_), None) => true,
            _ => false,
        }
    }
}

impl<G: GeocodingProvider> AddressResolver<G> {
    pub fn new(geocoder: G) -> Self {
        Self { geocoder }
    }

    /// Resolves a coordinate to display text, never failing.
    ///
    /// Address text is cosmetic: when the provider is unreachable or knows
    /// nothing about the location the coordinate itself is returned as text.
    pub async fn resolve(
        &self,
        coordinate: Coordinate,
        accuracy_meters: Option<f64>,
    ) -> AddressResolution {
        match self.try_resolve(coordinate, accuracy_meters).await {
            Ok(resolution) => resolution,
            Err(e) => {
                warn!("{e}; showing raw coordinate {coordinate}");
                AddressResolution::coordinate_only(coordinate)
            }
        }
    }

    /// Resolves a coordinate to display text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ResolutionFailed`] when the first lookup cannot reach
    /// the provider or no lookup produced any address.
    pub async fn try_resolve(
        &self,
        coordinate: Coordinate,
        accuracy_meters: Option<f64>,
    ) -> Result<AddressResolution, Error> {
        let first = self
            .geocoder
            .reverse(ReverseQuery::precise(coordinate))
            .await
            .map_err(|e| Error::ResolutionFailed(e.to_string()))?;

        let mut best = first.map(|place| Candidate::new(coordinate, place));

        let lacks_street = best
            .as_ref()
            .is_none_or(|c| !c.place.address.has_street_level());
        if accuracy_meters.is_some_and(|a| a > COARSE_ACCURACY_METERS) && lacks_street {
            debug!(
                "Fix accuracy {:?} m without a street match, retrying at street level",
                accuracy_meters
            );
            if let Some(coarse) = self.optional_lookup(ReverseQuery::coarse(coordinate)).await {
                let coarse = Candidate::new(coordinate, coarse);
                if best.is_none() || coarse.place.address.has_street_level() {
                    best = Some(coarse);
                }
            }
        }

        let mut best = best.ok_or_else(|| {
            Error::ResolutionFailed(format!("no address known at {coordinate}"))
        })?;

        if let Some(distance) = best.round_trip
            && distance > SUSPECT_ROUND_TRIP_METERS
        {
            debug!("Provider matched a point {distance:.1} m away, retrying unrestricted");
            if let Some(retry) = self
                .optional_lookup(ReverseQuery::precise_unrestricted(coordinate))
                .await
            {
                let retry = Candidate::new(coordinate, retry);
                if retry.is_closer_than(&best) {
                    best = retry;
                }
            }
        }

        Ok(AddressResolution {
            formatted_address: format_place(&best.place, best.round_trip, coordinate),
            source_coordinate: coordinate,
            matched_coordinate: best.place.matched,
            confidence_meters: best.round_trip,
        })
    }

    /// Follow-up lookup whose failure is logged and treated as no answer
    async fn optional_lookup(&self, query: ReverseQuery) -> Option<ReversePlace> {
        match self.geocoder.reverse(query).await {
            Ok(place) => place,
            Err(e) => {
                warn!("Follow-up reverse lookup at zoom {} failed: {e}", query.zoom);
                None
            }
        }
    }
}

/// Chooses the text shown for a resolved place
pub fn format_place(place: &ReversePlace, round_trip: Option<f64>, requested: Coordinate) -> String {
    let trusted = round_trip.is_some_and(|d| d < TRUSTED_ROUND_TRIP_METERS);
    if trusted && let Some(display) = place.display_name.as_deref() {
        return match place.address.block_number() {
            Some(block) => with_block_number(display, block),
            None => display.to_string(),
        };
    }

    let assembled = assemble_address(&place.address);
    if assembled.is_empty() {
        requested.to_string()
    } else {
        assembled
    }
}

/// Prefixes the block number unless the display string already mentions it
fn with_block_number(display: &str, block: &str) -> String {
    let block = block.trim();
    if display.contains(block) {
        display.to_string()
    } else {
        format!("{block}, {display}")
    }
}

/// Joins the present address parts, most specific first
///
/// An empty string means no part was present.
pub fn assemble_address(fields: &AddressFields) -> String {
    let locality = fields
        .neighbourhood
        .as_deref()
        .or(fields.suburb.as_deref());
    let settlement = fields
        .city
        .as_deref()
        .or(fields.town.as_deref())
        .or(fields.village.as_deref());

    [
        fields.block.as_deref(),
        fields.building.as_deref(),
        fields.house_number.as_deref(),
        fields.unit.as_deref(),
        fields.level.as_deref(),
        fields.street(),
        locality,
        settlement,
        fields.state.as_deref(),
        country_name(fields),
    ]
    .into_iter()
    .flatten()
    .map(str::trim)
    .filter(|part| !part.is_empty())
    .dedup()
    .join(", ")
}

/// The country part, unless the provider filled it with a bare country code
fn country_name(fields: &AddressFields) -> Option<&str> {
    let country = fields.country.as_deref()?;
    let trimmed = country.trim();
    let matches_code = fields
        .country_code
        .as_deref()
        .is_some_and(|code| code.trim().eq_ignore_ascii_case(trimmed));
    let looks_like_code = trimmed.len() == 2 && trimmed.chars().all(|c| c.is_ascii_alphabetic());
    if matches_code || looks_like_code {
        None
    } else {
        Some(country)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> AddressFields {
        AddressFields {
            house_number: Some("391".to_string()),
            road: Some("Orchard Road".to_string()),
            suburb: Some("Orchard".to_string()),
            city: Some("Singapore".to_string()),
            country: Some("Singapore".to_string()),
            country_code: Some("sg".to_string()),
            ..AddressFields::default()
        }
    }

    fn here() -> Coordinate {
        Coordinate::new(1.3048, 103.8318).unwrap()
    }

    #[test]
    fn assembles_in_precedence_order() {
        let mut f = fields();
        f.block = Some("Blk 12".to_string());
        f.building = Some("Ngee Ann City".to_string());
        f.level = Some("#03".to_string());
        f.state = Some("Central".to_string());
        assert_eq!(
            assemble_address(&f),
            "Blk 12, Ngee Ann City, 391, #03, Orchard Road, Orchard, Singapore, Central, Singapore"
        );
    }

    #[test]
    fn neighbourhood_wins_over_suburb_and_city_over_village() {
        let f = AddressFields {
            neighbourhood: Some("Tanglin".to_string()),
            suburb: Some("Orchard".to_string()),
            town: Some("Town".to_string()),
            village: Some("Village".to_string()),
            ..AddressFields::default()
        };
        assert_eq!(assemble_address(&f), "Tanglin, Town");
    }

    #[test]
    fn repeated_neighbouring_parts_collapse() {
        let f = AddressFields {
            road: Some("Orchard Road".to_string()),
            city: Some("Singapore".to_string()),
            country: Some("Singapore".to_string()),
            ..AddressFields::default()
        };
        assert_eq!(assemble_address(&f), "Orchard Road, Singapore");
    }

    #[test]
    fn omits_bare_country_code() {
        let f = AddressFields {
            road: Some("Rue de Rivoli".to_string()),
            city: Some("Paris".to_string()),
            country: Some("FR".to_string()),
            ..AddressFields::default()
        };
        assert_eq!(assemble_address(&f), "Rue de Rivoli, Paris");

        let matching_code = AddressFields {
            country: Some("de".to_string()),
            country_code: Some("DE".to_string()),
            ..f
        };
        assert_eq!(assemble_address(&matching_code), "Rue de Rivoli, Paris");
    }

    #[test]
    fn two_letter_state_is_kept() {
        let f = AddressFields {
            house_number: Some("350".to_string()),
            road: Some("5th Avenue".to_string()),
            city: Some("New York".to_string()),
            state: Some("NY".to_string()),
            country_code: Some("us".to_string()),
            ..AddressFields::default()
        };
        assert_eq!(assemble_address(&f), "350, 5th Avenue, New York, NY");

        let with_country = AddressFields {
            country: Some("United States".to_string()),
            ..f
        };
        assert_eq!(
            assemble_address(&with_country),
            "350, 5th Avenue, New York, NY, United States"
        );
    }

    #[test]
    fn empty_fields_assemble_to_nothing() {
        assert_eq!(assemble_address(&AddressFields::default()), "");
    }

    #[test]
    fn close_match_prefers_display_name() {
        let place = ReversePlace {
            display_name: Some("ION Orchard, 2 Orchard Turn, Singapore".to_string()),
            matched: Some(here()),
            address: fields(),
        };
        assert_eq!(
            format_place(&place, Some(4.0), here()),
            "ION Orchard, 2 Orchard Turn, Singapore"
        );
    }

    #[test]
    fn display_name_gets_missing_block_number() {
        let mut place = ReversePlace {
            display_name: Some("Toa Payoh Lorong 1, Singapore".to_string()),
            matched: Some(here()),
            address: AddressFields {
                block: Some("Blk 123".to_string()),
                ..AddressFields::default()
            },
        };
        assert_eq!(
            format_place(&place, Some(2.0), here()),
            "Blk 123, Toa Payoh Lorong 1, Singapore"
        );

        place.display_name = Some("Blk 123, Toa Payoh Lorong 1, Singapore".to_string());
        assert_eq!(
            format_place(&place, Some(2.0), here()),
            "Blk 123, Toa Payoh Lorong 1, Singapore"
        );
    }

    #[test]
    fn distant_match_assembles_from_fields() {
        let place = ReversePlace {
            display_name: Some("Somewhere else entirely".to_string()),
            matched: Some(here()),
            address: fields(),
        };
        assert_eq!(
            format_place(&place, Some(35.0), here()),
            "391, Orchard Road, Orchard, Singapore"
        );
        // no echoed coordinate means the display string is not verified
        assert_eq!(
            format_place(&place, None, here()),
            "391, Orchard Road, Orchard, Singapore"
        );
    }

    #[test]
    fn nothing_usable_falls_back_to_coordinate_text() {
        let place = ReversePlace {
            display_name: None,
            matched: None,
            address: AddressFields::default(),
        };
        assert_eq!(format_place(&place, None, here()), "1.304800, 103.831800");
    }
}
