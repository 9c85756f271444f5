//! Decoders for route files exported by routing services.

use std::io::Read;

use csv::{ReaderBuilder, Trim};
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::geo::Coordinate;

const LAT_KEYS: &[&str] = &["lat", "latitude"];
const LNG_KEYS: &[&str] = &["lng", "lon", "long", "longitude"];

/// Decode a JSON document into route points.
///
/// Accepted shapes:
/// - `[{"lat": .., "lng": ..}, ..]`
/// - `{"coordinates": [{..}, ..]}` or `{"points": [{..}, ..]}`
/// - GeoJSON `LineString`, `Feature` or `FeatureCollection` (first LineString)
pub(crate) fn decode_json_str(text: &str) -> Result<Vec<Coordinate>> {
    let value: Value = serde_json::from_str(text)?;
    decode_json(&value)
}

fn decode_json(value: &Value) -> Result<Vec<Coordinate>> {
    match value {
        Value::Array(items) => decode_point_objects(items),
        Value::Object(map) if map.contains_key("type") => decode_geojson(map),
        Value::Object(map) => {
            let items = ["coordinates", "points"]
                .iter()
                .find_map(|key| map.get(*key).and_then(Value::as_array))
                .ok_or_else(|| {
                    Error::route_format(
                        "expected an array of points, a 'coordinates'/'points' array or GeoJSON",
                    )
                })?;
            decode_point_objects(items)
        }
        _ => Err(Error::route_format(
            "route JSON must be an array or an object",
        )),
    }
}

fn decode_point_objects(items: &[Value]) -> Result<Vec<Coordinate>> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let map = item.as_object().ok_or_else(|| {
                Error::route_format(format!(
                    "point {index} must be an object with lat/lng fields"
                ))
            })?;
            point_from_object(index, map)
        })
        .collect()
}

fn point_from_object(index: usize, map: &Map<String, Value>) -> Result<Coordinate> {
    let field = |keys: &[&str], label: &str| -> Result<f64> {
        keys.iter()
            .find_map(|key| map.get(*key))
            .and_then(Value::as_f64)
            .ok_or_else(|| Error::route_format(format!("point {index} has no numeric {label}")))
    };
    Ok(Coordinate::new(
        field(LAT_KEYS, "latitude")?,
        field(LNG_KEYS, "longitude")?,
    ))
}

fn decode_geojson(map: &Map<String, Value>) -> Result<Vec<Coordinate>> {
    let kind = map.get("type").and_then(Value::as_str).unwrap_or_default();
    match kind {
        "LineString" => {
            let positions = map
                .get("coordinates")
                .and_then(Value::as_array)
                .ok_or_else(|| Error::route_format("LineString has no coordinates array"))?;
            positions
                .iter()
                .enumerate()
                .map(|(index, position)| position_to_coordinate(index, position))
                .collect()
        }
        "Feature" => {
            let geometry = map
                .get("geometry")
                .and_then(Value::as_object)
                .ok_or_else(|| Error::route_format("Feature has no geometry"))?;
            decode_geojson(geometry)
        }
        "FeatureCollection" => {
            let features = map
                .get("features")
                .and_then(Value::as_array)
                .ok_or_else(|| Error::route_format("FeatureCollection has no features array"))?;
            let line = features
                .iter()
                .filter_map(Value::as_object)
                .find(|feature| {
                    feature
                        .get("geometry")
                        .and_then(|g| g.get("type"))
                        .and_then(Value::as_str)
                        == Some("LineString")
                })
                .ok_or_else(|| {
                    Error::route_format("FeatureCollection contains no LineString feature")
                })?;
            decode_geojson(line)
        }
        other => Err(Error::route_format(format!(
            "unsupported GeoJSON type '{other}'; expected LineString, Feature or FeatureCollection"
        ))),
    }
}

/// GeoJSON positions are `[longitude, latitude, (altitude)]`.
fn position_to_coordinate(index: usize, position: &Value) -> Result<Coordinate> {
    let values = position
        .as_array()
        .filter(|values| values.len() >= 2)
        .ok_or_else(|| {
            Error::route_format(format!("position {index} must be [longitude, latitude]"))
        })?;
    match (values[0].as_f64(), values[1].as_f64()) {
        (Some(lng), Some(lat)) => Ok(Coordinate::new(lat, lng)),
        _ => Err(Error::route_format(format!(
            "position {index} has non-numeric components"
        ))),
    }
}

/// Decode CSV with a header row naming latitude and longitude columns.
pub(crate) fn decode_csv<R: Read>(reader: R) -> Result<Vec<Coordinate>> {
    let mut csv_reader = ReaderBuilder::new().trim(Trim::Fields).from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let normalized: Vec<String> = headers
        .iter()
        .map(|h| h.trim().to_ascii_lowercase())
        .collect();
    let column = |keys: &[&str]| normalized.iter().position(|h| keys.contains(&h.as_str()));

    let (lat_col, lng_col) = match (column(LAT_KEYS), column(LNG_KEYS)) {
        (Some(lat), Some(lng)) => (lat, lng),
        _ => {
            return Err(Error::route_format(format!(
                "CSV needs latitude and longitude columns. Available: {}",
                headers.iter().collect::<Vec<_>>().join(", ")
            )))
        }
    };

    let mut points = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let number = |col: usize, label: &str| -> Result<f64> {
            let raw = record.get(col).unwrap_or_default();
            raw.parse::<f64>().map_err(|_| {
                Error::route_format(format!("line {line}: {label} '{raw}' is not a number"))
            })
        };
        points.push(Coordinate::new(
            number(lat_col, "latitude")?,
            number(lng_col, "longitude")?,
        ));
    }
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_plain_point_array() {
        let points = decode_json_str(r#"[{"lat": 1.0, "lng": 2.0}, {"latitude": 3, "lon": 4}]"#)
            .expect("decode");
        assert_eq!(
            points,
            vec![Coordinate::new(1.0, 2.0), Coordinate::new(3.0, 4.0)]
        );
    }

    #[test]
    fn decodes_wrapped_points() {
        let points =
            decode_json_str(r#"{"points": [{"lat": 1, "lng": 2}, {"lat": 3, "lng": 4}]}"#)
                .expect("decode");
        assert_eq!(points.len(), 2);
    }

    #[test]
    fn decodes_geojson_linestring_in_lng_lat_order() {
        let points = decode_json_str(
            r#"{"type": "LineString", "coordinates": [[-0.09, 51.5], [-0.08, 51.51, 12.0]]}"#,
        )
        .expect("decode");
        assert_eq!(
            points,
            vec![Coordinate::new(51.5, -0.09), Coordinate::new(51.51, -0.08)]
        );
    }

    #[test]
    fn decodes_first_linestring_of_feature_collection() {
        let text = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": [0, 0]}},
                {
                    "type": "Feature",
                    "geometry": {"type": "LineString", "coordinates": [[1, 2], [3, 4]]}
                }
            ]
        }"#;
        let points = decode_json_str(text).expect("decode");
        assert_eq!(
            points,
            vec![Coordinate::new(2.0, 1.0), Coordinate::new(4.0, 3.0)]
        );
    }

    #[test]
    fn rejects_unsupported_geojson_and_bad_points() {
        assert!(decode_json_str(r#"{"type": "Polygon", "coordinates": []}"#).is_err());
        assert!(decode_json_str(r#"[[51.5, -0.09]]"#).is_err());
        assert!(decode_json_str(r#"[{"lat": "north", "lng": 1}]"#).is_err());
        assert!(decode_json_str(r#"{"route": []}"#).is_err());
        assert!(decode_json_str("42").is_err());
        assert!(matches!(decode_json_str("{not json"), Err(Error::Json(_))));
    }

    #[test]
    fn decodes_csv_with_header_synonyms() {
        let csv = "Longitude, Latitude\n-0.09, 51.5\n-0.08, 51.51\n";
        let points = decode_csv(csv.as_bytes()).expect("decode");
        assert_eq!(
            points,
            vec![Coordinate::new(51.5, -0.09), Coordinate::new(51.51, -0.08)]
        );
    }

    #[test]
    fn csv_errors_name_the_line() {
        let csv = "lat,lng\n51.5,-0.09\n51.51,east\n";
        let err = decode_csv(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("line 3"), "{err}");

        let missing = decode_csv("x,y\n1,2\n".as_bytes()).unwrap_err();
        assert!(missing.to_string().contains("Available: x, y"), "{missing}");
    }

    #[test]
    fn csv_line_numbers_count_blank_and_quoted_lines() {
        let csv = "name,lat,lng\n\"two\nlines\",51.5,-0.09\n\nbad,north,-0.08\n";
        let err = decode_csv(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("line 5"), "{err}");
    }
}
