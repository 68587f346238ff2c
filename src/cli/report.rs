//! The report pipeline: secret → route → (map) → PDF.

use crate::cli::{CliContext, ReportRequest};
use crate::core::directions::RouteFetcher;
use crate::core::render;
use crate::error::ReportError;
use std::path::PathBuf;
use tracing::{info, warn};

pub fn run(ctx: &CliContext, request: &ReportRequest) -> Result<PathBuf, ReportError> {
    if let Some(path) = &ctx.config_path {
        info!(config = %path.display(), "configuration resolved");
    }
    if request
        .output
        .extension()
        .map_or(true, |ext| !ext.eq_ignore_ascii_case("pdf"))
    {
        warn!(output = %request.output.display(), "output file does not end in .pdf");
    }

    info!(backend = request.source.backend_name(), "resolving API key");
    let key = request.source.resolve(&ctx.config)?;

    let fetcher = RouteFetcher::new(&ctx.config)?;
    let summary = fetcher.fetch_route(&request.origin, &request.destination, &key)?;
    info!(
        distance = %summary.distance_text,
        duration = %summary.duration_text,
        meters = summary.distance_meters,
        seconds = summary.duration_seconds,
        cost_source = ?summary.estimated_cost.as_ref().map(|c| c.source),
        "route fetched"
    );

    let map = if ctx.config.static_map.enabled {
        match &summary.overview_polyline {
            Some(polyline) => Some(fetcher.fetch_static_map(polyline, &key)?),
            None => {
                warn!("directions response carried no overview polyline; rendering without a map");
                None
            }
        }
    } else {
        None
    };
    drop(key);

    render::render_with_map(&summary, map.as_ref(), &request.output)?;
    Ok(request.output.clone())
}
