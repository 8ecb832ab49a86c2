use geo::{Coord, LineString, Point};
use geojson::{Feature, FeatureCollection, Geometry, Value as GeoJsonValue};
use serde_json::json;

use crate::{Error, RouteInfo};

impl RouteInfo {
    /// Converts the route to a `GeoJSON` `FeatureCollection` for the map.
    ///
    /// The collection holds the route line followed by its origin and
    /// destination points.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidData`] if the geometry has no endpoints.
    pub fn to_geojson(&self) -> Result<FeatureCollection, Error> {
        let (Some(start), Some(end)) = (self.start(), self.end()) else {
            return Err(Error::InvalidData("route has no geometry".to_string()));
        };
        let coords: Vec<Coord<f64>> = self.geometry.iter().copied().map(Coord::from).collect();
        let line = LineString::new(coords);

        let route = json!({
            "type": "Feature",
            "geometry": Geometry::new(GeoJsonValue::from(&line)),
            "properties": {
                "kind": "route",
                "mode": self.mode,
                "source": self.source,
                "total_distance_meters": self.total_distance_meters,
                "total_duration_seconds": self.total_duration_seconds,
                "steps": self.steps,
            }
        });

        let features = vec![
            feature_from_value(route)?,
            endpoint_feature("origin", start.into())?,
            endpoint_feature("destination", end.into())?,
        ];

        Ok(FeatureCollection {
            features,
            bbox: None,
            foreign_members: None,
        })
    }

    pub fn to_geojson_string(&self) -> Result<String, Error> {
        serde_json::to_string(&self.to_geojson()?).map_err(|e| Error::InvalidData(e.to_string()))
    }
}

fn endpoint_feature(kind: &str, point: Point<f64>) -> Result<Feature, Error> {
    feature_from_value(json!({
        "type": "Feature",
        "geometry": Geometry::new(GeoJsonValue::from(&point)),
        "properties": { "kind": kind }
    }))
}

fn feature_from_value(value: serde_json::Value) -> Result<Feature, Error> {
    serde_json::from_value::<Feature>(value).map_err(|e| Error::InvalidData(e.to_string()))
}
