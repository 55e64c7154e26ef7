//! OSRM HTTP adapter for driving routes with alternatives.

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::http::{self, DEFAULT_USER_AGENT};
use crate::models::{CandidateRoute, GeoPoint};
use crate::polyline::Polyline;
use crate::traits::RouteProvider;

const SERVICE: &str = "osrm";

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://router.project-osrm.org".to_string(),
            profile: "driving".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self> {
        let client = http::build_client(SERVICE, config.timeout_secs, DEFAULT_USER_AGENT)?;
        Ok(Self { config, client })
    }

    fn route_url(&self, start: GeoPoint, end: GeoPoint) -> String {
        format!(
            "{}/route/v1/{}/{:.6},{:.6};{:.6},{:.6}",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile,
            start.lng,
            start.lat,
            end.lng,
            end.lat
        )
    }
}

impl RouteProvider for OsrmClient {
    fn routes(
        &self,
        start: GeoPoint,
        end: GeoPoint,
        alternatives: usize,
    ) -> Result<Vec<CandidateRoute>> {
        let request = self.client.get(self.route_url(start, end)).query(&[
            ("overview", "full".to_string()),
            ("geometries", "geojson".to_string()),
            ("alternatives", alternatives.to_string()),
        ]);
        tracing::debug!(?start, ?end, alternatives, "requesting routes");

        let body: OsrmRouteResponse = match http::get_json(SERVICE, request) {
            Ok(body) => body,
            // Any non-success status, including OSRM's 400 "NoRoute", means
            // no route for this query.
            Err(Error::ServiceUnavailable { status, .. }) => {
                tracing::debug!(status, "routing service refused the query");
                return Err(Error::NoRouteFound);
            }
            Err(err) => return Err(err),
        };
        body.into_routes(alternatives)
    }
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    code: String,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    distance: f64,
    #[serde(default)]
    duration: f64,
    geometry: OsrmGeometry,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    coordinates: Vec<[f64; 2]>,
}

impl OsrmRouteResponse {
    fn into_routes(self, alternatives: usize) -> Result<Vec<CandidateRoute>> {
        if self.code != "Ok" || self.routes.is_empty() {
            tracing::debug!(code = %self.code, "no route in OSRM response");
            return Err(Error::NoRouteFound);
        }
        Ok(self
            .routes
            .into_iter()
            .take(alternatives + 1)
            .map(|route| CandidateRoute {
                path: Polyline::from_lng_lat(&route.geometry.coordinates),
                length_meters: route.distance,
                duration_seconds: route.duration,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(json: &str) -> OsrmRouteResponse {
        serde_json::from_str(json).expect("valid OSRM json")
    }

    #[test]
    fn test_decodes_routes_with_geojson_geometry() {
        let body = decode(
            r#"{"code":"Ok","routes":[
                {"distance":1200.5,"duration":90.0,"geometry":{"type":"LineString","coordinates":[[77.2,28.6],[77.3,28.7]]}},
                {"distance":1500.0,"duration":110.0,"geometry":{"type":"LineString","coordinates":[[77.2,28.6],[77.4,28.8]]}}
            ],"waypoints":[]}"#,
        );
        let routes = body.into_routes(3).expect("routes");
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].length_meters, 1200.5);
        assert_eq!(routes[0].path.points()[0], GeoPoint::new(28.6, 77.2));
    }

    #[test]
    fn test_caps_number_of_routes() {
        let body = decode(
            r#"{"code":"Ok","routes":[
                {"distance":1,"geometry":{"coordinates":[[0,0]]}},
                {"distance":2,"geometry":{"coordinates":[[0,0]]}},
                {"distance":3,"geometry":{"coordinates":[[0,0]]}}
            ]}"#,
        );
        assert_eq!(body.into_routes(1).expect("routes").len(), 2);
    }

    #[test]
    fn test_non_ok_code_is_no_route() {
        let body = decode(r#"{"code":"NoRoute","message":"Impossible route"}"#);
        assert!(matches!(body.into_routes(3), Err(Error::NoRouteFound)));
    }

    #[test]
    fn test_empty_routes_is_no_route() {
        let body = decode(r#"{"code":"Ok","routes":[]}"#);
        assert!(matches!(body.into_routes(3), Err(Error::NoRouteFound)));
    }

    #[test]
    fn test_url_uses_lng_lat_order() {
        let client = OsrmClient::new(OsrmConfig::default()).expect("client");
        let url = client.route_url(GeoPoint::new(28.61, 77.2), GeoPoint::new(19.07, 72.87));
        assert_eq!(
            url,
            "https://router.project-osrm.org/route/v1/driving/77.200000,28.610000;72.870000,19.070000"
        );
    }

    /// Answers a single request on a loopback port with `status` and `body`.
    fn serve_once(status: &'static str, body: &'static str) -> String {
        use std::io::{Read, Write};
        use std::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
        let addr = listener.local_addr().expect("local addr");
        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("accept");
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).expect("read request");
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).expect("write response");
        });
        format!("http://{}", addr)
    }

    fn routes_from(status: &'static str, body: &'static str) -> Result<Vec<CandidateRoute>> {
        let client = OsrmClient::new(OsrmConfig {
            base_url: serve_once(status, body),
            timeout_secs: 5,
            ..OsrmConfig::default()
        })
        .expect("client");
        client.routes(GeoPoint::new(28.61, 77.2), GeoPoint::new(27.17, 78.0), 3)
    }

    #[test]
    fn test_bad_request_status_is_no_route() {
        let result = routes_from(
            "400 Bad Request",
            r#"{"code":"NoRoute","message":"Impossible route between points"}"#,
        );
        assert!(matches!(result, Err(Error::NoRouteFound)), "got {:?}", result);
    }

    #[test]
    fn test_server_error_status_is_no_route() {
        let result = routes_from("503 Service Unavailable", r#"{"message":"busy"}"#);
        assert!(matches!(result, Err(Error::NoRouteFound)), "got {:?}", result);
    }

    #[test]
    fn test_ok_status_with_no_route_code_is_no_route() {
        let result = routes_from("200 OK", r#"{"code":"NoRoute","routes":[]}"#);
        assert!(matches!(result, Err(Error::NoRouteFound)), "got {:?}", result);
    }

    #[test]
    fn test_ok_status_returns_routes() {
        let result = routes_from(
            "200 OK",
            r#"{"code":"Ok","routes":[{"distance":233000.0,"duration":12000.0,"geometry":{"coordinates":[[77.2,28.61],[78.0,27.17]]}}]}"#,
        );
        let routes = result.expect("routes");
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].distance_km(), 233.0);
    }
}
