//! Wire shapes of the third-party geocoding and routing responses

use serde::{Deserialize, Deserializer};

use super::{AddressFields, ProviderError, ReversePlace};
use crate::{Coordinate, RouteInfo, RouteSource, RouteStep, TransportMode};

/// Geocoders send coordinates either as JSON numbers or as decimal strings
fn deserialize_flexible_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        Text(String),
    }

    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Number(n)) => Ok(Some(n)),
        Some(NumberOrString::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

fn echoed_coordinate(lat: Option<f64>, lon: Option<f64>) -> Option<Coordinate> {
    Coordinate::new(lat?, lon?).ok()
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawReverseResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default, deserialize_with = "deserialize_flexible_f64")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_flexible_f64")]
    pub lon: Option<f64>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub address: Option<AddressFields>,
}

impl RawReverseResponse {
    /// `None` when the provider found nothing at the location
    pub(crate) fn into_place(self) -> Option<ReversePlace> {
        if self.error.is_some() {
            return None;
        }
        let display_name = self.display_name.filter(|name| !name.trim().is_empty());
        if display_name.is_none() && self.address.is_none() {
            return None;
        }
        Some(ReversePlace {
            display_name,
            matched: echoed_coordinate(self.lat, self.lon),
            address: self.address.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawSearchResult {
    #[serde(default, deserialize_with = "deserialize_flexible_f64")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_flexible_f64")]
    pub lon: Option<f64>,
}

/// Top-ranked coordinate of a forward-geocoding answer
pub(crate) fn top_search_hit(results: Vec<RawSearchResult>) -> Result<Option<Coordinate>, ProviderError> {
    let Some(first) = results.into_iter().next() else {
        return Ok(None);
    };
    match (first.lat, first.lon) {
        (Some(lat), Some(lon)) => Coordinate::new(lat, lon)
            .map(Some)
            .map_err(|e| ProviderError::MalformedResponse(e.to_string())),
        _ => Err(ProviderError::MalformedResponse(
            "search result without coordinates".to_string(),
        )),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawDirectionsResponse {
    #[serde(default)]
    pub features: Vec<RawFeature>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawFeature {
    pub properties: RawProperties,
    pub geometry: RawLineString,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawProperties {
    #[serde(default)]
    pub summary: Option<RawSummary>,
    #[serde(default)]
    pub segments: Vec<RawSegment>,
}

// the provider omits zero-valued totals
#[derive(Debug, Deserialize)]
pub(crate) struct RawSummary {
    #[serde(default)]
    pub distance: f64,
    #[serde(default)]
    pub duration: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawSegment {
    #[serde(default)]
    pub steps: Vec<RawStep>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawStep {
    #[serde(default)]
    pub distance: f64,
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub instruction: String,
    #[serde(default, rename = "type")]
    pub maneuver_type: i32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawLineString {
    /// `[lon, lat]` positions, possibly with elevation
    pub coordinates: Vec<Vec<f64>>,
}

impl RawDirectionsResponse {
    /// Converts the first routed feature into a [`RouteInfo`].
    ///
    /// Steps of every segment are flattened in order. When the summary is
    /// missing the totals are summed from the steps.
    pub(crate) fn into_route(self, mode: TransportMode) -> Result<RouteInfo, ProviderError> {
        let feature = self.features.into_iter().next().ok_or_else(|| {
            ProviderError::MalformedResponse("response has no route feature".to_string())
        })?;

        let steps: Vec<RouteStep> = feature
            .properties
            .segments
            .into_iter()
            .flat_map(|segment| segment.steps)
            .map(|step| RouteStep {
                distance_meters: step.distance,
                duration_seconds: step.duration,
                instruction: step.instruction,
                maneuver_type: step.maneuver_type,
            })
            .collect();

        let (distance, duration) = match feature.properties.summary {
            Some(summary) => (summary.distance, summary.duration),
            None => steps.iter().fold((0.0, 0.0), |(d, t), step| {
                (d + step.distance_meters, t + step.duration_seconds)
            }),
        };

        let geometry = feature
            .geometry
            .coordinates
            .iter()
            .map(|position| Coordinate::from_lon_lat(position))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

        RouteInfo::new(distance, duration, steps, geometry, mode, RouteSource::Provider)
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))
    }
}
