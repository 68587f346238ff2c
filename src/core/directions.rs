//! Route fetching against the Google Directions API.

use crate::error::RouteError;
use crate::models::credential::Credential;
use crate::models::report_config::{CostSection, DirectionsSection, ReportConfig, StaticMapSection};
use crate::models::route::{CostSource, Money, RouteSummary};
use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde::Deserialize;
use std::error::Error as _;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    geocoded_waypoints: Vec<GeocodedWaypoint>,
    #[serde(default)]
    routes: Vec<ApiRoute>,
}

#[derive(Debug, Deserialize)]
struct GeocodedWaypoint {
    #[serde(default)]
    geocoder_status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiRoute {
    #[serde(default)]
    legs: Vec<ApiLeg>,
    #[serde(default)]
    fare: Option<ApiFare>,
    #[serde(default)]
    overview_polyline: Option<ApiPolyline>,
}

#[derive(Debug, Deserialize)]
struct ApiLeg {
    distance: TextValue,
    duration: TextValue,
}

#[derive(Debug, Deserialize)]
struct TextValue {
    text: String,
    value: f64,
}

#[derive(Debug, Deserialize)]
struct ApiFare {
    currency: String,
    value: f64,
}

#[derive(Debug, Deserialize)]
struct ApiPolyline {
    points: String,
}

/// Talks to the directions and static map endpoints with one HTTP client.
#[derive(Debug)]
pub struct RouteFetcher {
    pub(crate) client: Client,
    directions: DirectionsSection,
    pub(crate) static_map: StaticMapSection,
    cost: CostSection,
}

impl RouteFetcher {
    pub fn new(config: &ReportConfig) -> Result<Self, RouteError> {
        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(secs) = config.directions.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(transport_error)?;
        Ok(Self {
            client,
            directions: config.directions.clone(),
            static_map: config.static_map.clone(),
            cost: config.cost.clone(),
        })
    }

    /// One directions request; first route, first leg. No retries.
    pub fn fetch_route(
        &self,
        origin: &str,
        destination: &str,
        key: &Credential,
    ) -> Result<RouteSummary, RouteError> {
        info!(
            host = %endpoint_host(&self.directions.endpoint),
            mode = %self.directions.mode,
            "requesting directions"
        );
        let response = self
            .client
            .get(&self.directions.endpoint)
            .query(&[
                ("origin", origin),
                ("destination", destination),
                ("mode", self.directions.mode.as_str()),
                ("units", self.directions.units.as_str()),
                ("key", key.expose()),
            ])
            .send()
            .map_err(transport_error)?;
        let response = check_status(response)?;

        let body: DirectionsResponse = response
            .json()
            .map_err(|e| {
                RouteError::ApiUnavailable(format!(
                    "unexpected directions response: {}",
                    describe(&e.without_url())
                ))
            })?;
        debug!(status = %body.status, routes = body.routes.len(), "directions API responded");

        match body.status.as_str() {
            "OK" => {}
            "ZERO_RESULTS" => return Err(RouteError::NoRouteFound),
            "REQUEST_DENIED" => {
                return Err(RouteError::ApiAuthError(
                    body.error_message.unwrap_or_else(|| "REQUEST_DENIED".into()),
                ))
            }
            "NOT_FOUND" => {
                return Err(RouteError::InvalidLocation(unresolved_waypoints(
                    &body.geocoded_waypoints,
                    origin,
                    destination,
                )))
            }
            "INVALID_REQUEST" => {
                let detail = body.error_message.unwrap_or_else(|| "INVALID_REQUEST".into());
                return Err(RouteError::InvalidLocation(format!(
                    "origin or destination ({})",
                    detail
                )));
            }
            other => {
                let detail = match body.error_message {
                    Some(msg) => format!("{}: {}", other, msg),
                    None => other.to_string(),
                };
                return Err(RouteError::ApiUnavailable(detail));
            }
        }

        let route = body.routes.into_iter().next().ok_or(RouteError::NoRouteFound)?;
        let leg = route.legs.into_iter().next().ok_or(RouteError::NoRouteFound)?;
        let distance_meters = leg.distance.value.max(0.0).round() as u64;

        let estimated_cost = match route.fare {
            Some(fare) => Some(Money {
                amount: fare.value,
                currency: fare.currency,
                source: CostSource::Fare,
            }),
            None => self.cost.per_km.map(|rate| Money {
                amount: distance_meters as f64 / 1000.0 * rate,
                currency: self.cost.currency.clone(),
                source: CostSource::DistanceRate,
            }),
        };

        Ok(RouteSummary {
            origin: origin.to_string(),
            destination: destination.to_string(),
            distance_text: leg.distance.text,
            duration_text: leg.duration.text,
            distance_meters,
            duration_seconds: leg.duration.value.max(0.0).round() as u64,
            estimated_cost,
            overview_polyline: route
                .overview_polyline
                .map(|p| p.points)
                .filter(|p| !p.is_empty()),
        })
    }
}

/// Map HTTP-level failures. Auth statuses are kept apart from outages.
pub(crate) fn check_status(response: Response) -> Result<Response, RouteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    let snippet: String = body.trim().chars().take(200).collect();
    let detail = if snippet.is_empty() {
        format!("HTTP {}", status)
    } else {
        format!("HTTP {}: {}", status, snippet)
    };
    if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
        return Err(RouteError::ApiAuthError(detail));
    }
    if !status.is_server_error() {
        warn!(%status, "unexpected HTTP status from mapping API");
    }
    Err(RouteError::ApiUnavailable(detail))
}

/// Transport failures, with the request URL (which holds the key) stripped.
pub(crate) fn transport_error(err: reqwest::Error) -> RouteError {
    let err = err.without_url();
    if err.is_timeout() {
        return RouteError::ApiUnavailable(format!("request timed out: {}", describe(&err)));
    }
    RouteError::ApiUnavailable(describe(&err))
}

/// Error text plus its source chain.
fn describe(err: &reqwest::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}

pub(crate) fn endpoint_host(endpoint: &str) -> String {
    reqwest::Url::parse(endpoint)
        .ok()
        .and_then(|u| u.host_str().map(String::from))
        .unwrap_or_else(|| endpoint.to_string())
}

/// Name the waypoint(s) the geocoder could not resolve.
fn unresolved_waypoints(waypoints: &[GeocodedWaypoint], origin: &str, destination: &str) -> String {
    let failed = |idx: usize| {
        waypoints
            .get(idx)
            .and_then(|w| w.geocoder_status.as_deref())
            .is_some_and(|s| s != "OK")
    };
    match (failed(0), failed(1)) {
        (true, true) => format!("origin '{}' and destination '{}'", origin, destination),
        (true, false) => format!("origin '{}'", origin),
        (false, true) => format!("destination '{}'", destination),
        (false, false) => "origin or destination".to_string(),
    }
}
