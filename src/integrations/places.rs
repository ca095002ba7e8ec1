use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::json;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const AUTOCOMPLETE_URL: &str = "https://places.googleapis.com/v1/places:autocomplete";
const GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Only the first few geocoder hits are worth scoring.
const MAX_SCORED_RESULTS: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressComponent {
    pub long_name: String,
    pub short_name: String,
    pub types: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Geometry {
    #[serde(default)]
    pub location_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodeResult {
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub address_components: Vec<AddressComponent>,
    #[serde(default)]
    pub formatted_address: String,
    #[serde(default)]
    pub geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

fn api_key() -> Result<String, String> {
    std::env::var("GOOGLE_API_KEY")
        .map_err(|_| "GOOGLE_API_KEY is not configured".to_string())
}

fn client() -> Result<reqwest::Client, String> {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|error| error.to_string())
}

/// Place predictions near a point, biased to a 500 m circle. The session
/// token groups keystrokes of one autocomplete interaction for billing.
pub async fn autocomplete(
    query: &str,
    latitude: f64,
    longitude: f64,
    session_token: &str,
) -> Result<serde_json::Value, String> {
    let body = json!({
        "input": query,
        "sessionToken": session_token,
        "locationBias": {
            "circle": {
                "center": {
                    "latitude": latitude,
                    "longitude": longitude,
                },
                "radius": 500.0,
            }
        }
    });

    let response = client()?
        .post(AUTOCOMPLETE_URL)
        .header("Content-Type", "application/json")
        .header("X-Goog-Api-Key", api_key()?)
        .json(&body)
        .send()
        .await
        .map_err(|error| error.to_string())?;

    if !response.status().is_success() {
        return Err(format!("places provider returned {}", response.status()));
    }

    response.json().await.map_err(|error| error.to_string())
}

/// Reverse geocode, keeping at most the first five raw results.
pub async fn reverse_geocode(
    latitude: f64,
    longitude: f64,
) -> Result<Vec<GeocodeResult>, String> {
    let response = client()?
        .get(GEOCODE_URL)
        .query(&[
            ("latlng", format!("{},{}", latitude, longitude)),
            ("key", api_key()?),
        ])
        .send()
        .await
        .map_err(|error| error.to_string())?;

    if !response.status().is_success() {
        return Err(format!("geocoding provider returned {}", response.status()));
    }

    let parsed: GeocodeResponse = response
        .json()
        .await
        .map_err(|error| error.to_string())?;

    let mut results = parsed.results;
    results.truncate(MAX_SCORED_RESULTS);
    Ok(results)
}

impl GeocodeResult {
    fn has_type(&self, wanted: &str) -> bool {
        self.types.iter().any(|t| t == wanted)
    }

    fn component(&self, wanted: &str) -> Option<&AddressComponent> {
        self.address_components
            .iter()
            .find(|c| c.types.iter().any(|t| t == wanted))
    }
}

/// Address-quality score: feature type, then geometry precision, with a
/// penalty for highway designations that make poor display names.
pub fn score_result(result: &GeocodeResult) -> i32 {
    let type_score = if result.has_type("point_of_interest") || result.has_type("establishment") {
        100
    }
    else if result.has_type("street_address") {
        80
    }
    else if result.has_type("route") {
        60
    }
    else if result.has_type("neighborhood") {
        40
    }
    else if result.has_type("postal_code") {
        20
    }
    else {
        0
    };

    let precision_score = match result.geometry.location_type.as_str() {
        "ROOFTOP" => 50,
        "RANGE_INTERPOLATED" => 30,
        "GEOMETRIC_CENTER" => 10,
        _ => 0,
    };

    let mut score = type_score + precision_score;

    if let Some(route) = result.component("route") {
        if is_highway_designation(&route.short_name) || is_highway_designation(&route.long_name) {
            score -= 30;
        }
    }

    score
}

/// National/regional road designations look like "A4", "S7", "DK91" or
/// "E40": one to three letters followed by digits, nothing else.
fn is_highway_designation(name: &str) -> bool {
    let name = name.trim();
    let letters = name.chars().take_while(|c| c.is_ascii_alphabetic()).count();

    letters >= 1
        && letters <= 3
        && name.len() > letters
        && name.chars().skip(letters).all(|c| c.is_ascii_digit())
}

/// Picks the highest scoring result and formats it as
/// `"<primary-feature>, <locality>"`.
pub fn best_address(results: &[GeocodeResult]) -> Option<String> {
    results
        .iter()
        .take(MAX_SCORED_RESULTS)
        .max_by_key(|result| score_result(result))
        .map(format_address)
}

fn format_address(result: &GeocodeResult) -> String {
    let locality = result
        .component("locality")
        .or_else(|| result.component("sublocality"))
        .map(|c| c.long_name.clone());

    let primary = if result.has_type("point_of_interest") || result.has_type("establishment") {
        result
            .component("point_of_interest")
            .or_else(|| result.component("establishment"))
            .map(|c| c.long_name.clone())
    }
    else if result.has_type("street_address") {
        match (result.component("route"), result.component("street_number")) {
            (Some(route), Some(number)) => {
                Some(format!("{} {}", route.long_name, number.long_name))
            },
            (Some(route), None) => Some(route.long_name.clone()),
            _ => None,
        }
    }
    else if result.has_type("route") {
        result.component("route").map(|c| c.long_name.clone())
    }
    else if result.has_type("neighborhood") {
        result.component("neighborhood").map(|c| c.long_name.clone())
    }
    else {
        None
    };

    match (primary, locality) {
        (Some(primary), Some(locality)) => format!("{}, {}", primary, locality),
        (Some(primary), None) => primary,
        // No template applies: first two comma segments of the provider's
        // own formatting.
        _ => result
            .formatted_address
            .split(',')
            .take(2)
            .map(|segment| segment.trim())
            .collect::<Vec<&str>>()
            .join(", "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component(long: &str, short: &str, types: &[&str]) -> AddressComponent {
        AddressComponent {
            long_name: long.to_string(),
            short_name: short.to_string(),
            types: types.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn result(
        types: &[&str],
        location_type: &str,
        components: Vec<AddressComponent>,
        formatted: &str,
    ) -> GeocodeResult {
        GeocodeResult {
            types: types.iter().map(|t| t.to_string()).collect(),
            address_components: components,
            formatted_address: formatted.to_string(),
            geometry: Geometry {
                location_type: location_type.to_string(),
            },
        }
    }

    #[test]
    fn type_and_precision_scores_add_up() {
        let poi = result(&["establishment"], "", vec![], "");
        let street = result(&["street_address"], "ROOFTOP", vec![], "");
        let neighborhood = result(&["neighborhood"], "GEOMETRIC_CENTER", vec![], "");

        assert_eq!(score_result(&poi), 100);
        assert_eq!(score_result(&street), 80 + 50);
        assert_eq!(score_result(&neighborhood), 40 + 10);
    }

    #[test]
    fn highway_routes_are_penalized() {
        let highway = result(
            &["route"],
            "GEOMETRIC_CENTER",
            vec![component("Autostrada A4", "A4", &["route"])],
            "",
        );
        let street = result(
            &["route"],
            "GEOMETRIC_CENTER",
            vec![component("Marszałkowska", "Marszałkowska", &["route"])],
            "",
        );

        assert_eq!(score_result(&highway), 60 + 10 - 30);
        assert_eq!(score_result(&street), 60 + 10);
    }

    #[test]
    fn highway_designation_shapes() {
        assert!(is_highway_designation("A4"));
        assert!(is_highway_designation("S7"));
        assert!(is_highway_designation("DK91"));
        assert!(is_highway_designation("E40"));
        assert!(!is_highway_designation("Marszałkowska"));
        assert!(!is_highway_designation("3 Maja"));
        assert!(!is_highway_designation("A"));
    }

    #[test]
    fn best_address_prefers_the_highest_score() {
        let results = vec![
            result(
                &["postal_code"],
                "",
                vec![],
                "00-001, Warszawa, Poland",
            ),
            result(
                &["establishment", "point_of_interest"],
                "ROOFTOP",
                vec![
                    component("Pałac Kultury", "PKiN", &["point_of_interest"]),
                    component("Warszawa", "Warszawa", &["locality"]),
                ],
                "plac Defilad 1, Warszawa",
            ),
        ];

        assert_eq!(best_address(&results).unwrap(), "Pałac Kultury, Warszawa");
    }

    #[test]
    fn street_address_formats_route_and_number() {
        let r = result(
            &["street_address"],
            "ROOFTOP",
            vec![
                component("Marszałkowska", "Marszałkowska", &["route"]),
                component("10", "10", &["street_number"]),
                component("Warszawa", "Warszawa", &["locality"]),
            ],
            "",
        );

        assert_eq!(format_address(&r), "Marszałkowska 10, Warszawa");
    }

    #[test]
    fn unknown_types_fall_back_to_formatted_address_segments() {
        let r = result(
            &["plus_code"],
            "",
            vec![],
            "X4MM+Q4, Warszawa, Poland",
        );

        assert_eq!(format_address(&r), "X4MM+Q4, Warszawa");
    }
}
