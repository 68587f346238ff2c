//! Static map image of the route, fetched as JPEG for embedding.

use crate::core::directions::{check_status, endpoint_host, transport_error, RouteFetcher};
use crate::error::RouteError;
use crate::models::credential::Credential;
use crate::models::route::MapImage;
use crate::util::jpeg;
use tracing::{debug, info};

impl RouteFetcher {
    /// Draw the encoded overview polyline on a roadmap.
    pub fn fetch_static_map(&self, polyline: &str, key: &Credential) -> Result<MapImage, RouteError> {
        let settings = &self.static_map;
        info!(
            host = %endpoint_host(&settings.endpoint),
            size = %settings.size,
            scale = settings.scale,
            "requesting static map"
        );
        let scale = settings.scale.to_string();
        let path = format!("enc:{}", polyline);
        let response = self
            .client
            .get(&settings.endpoint)
            .query(&[
                ("size", settings.size.as_str()),
                ("scale", scale.as_str()),
                ("maptype", settings.maptype.as_str()),
                ("format", "jpg"),
                ("path", path.as_str()),
                ("key", key.expose()),
            ])
            .send()
            .map_err(transport_error)?;
        let response = check_status(response)?;
        let data = response.bytes().map_err(transport_error)?.to_vec();

        let info = jpeg::sniff(&data).ok_or_else(|| {
            RouteError::ApiUnavailable("static map response is not a JPEG image".into())
        })?;
        debug!(width = info.width, height = info.height, bytes = data.len(), "static map received");
        Ok(MapImage {
            data,
            width: info.width,
            height: info.height,
            components: info.components,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::report_config::ReportConfig;
    use crate::util::jpeg::tests::tiny_jpeg;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MAP_PATH: &str = "/maps/api/staticmap";

    async fn fetch(server: &MockServer) -> Result<MapImage, RouteError> {
        let mut config = ReportConfig::default();
        config.static_map.endpoint = format!("{}{}", server.uri(), MAP_PATH);
        tokio::task::spawn_blocking(move || {
            let fetcher = RouteFetcher::new(&config)?;
            let key = Credential::new("test-key".into()).unwrap();
            fetcher.fetch_static_map("a~l~Fjk~uOwHJy@P", &key)
        })
        .await
        .unwrap()
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_fetch_static_map_returns_dimensions() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(MAP_PATH))
            .and(query_param("path", "enc:a~l~Fjk~uOwHJy@P"))
            .and(query_param("format", "jpg"))
            .and(query_param("scale", "2"))
            .and(query_param("key", "test-key"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(tiny_jpeg(1280, 800), "image/jpeg"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let map = fetch(&server).await.unwrap();
        assert_eq!((map.width, map.height, map.components), (1280, 800, 3));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_non_jpeg_body_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(MAP_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_raw(b"\x89PNG\r\n".to_vec(), "image/png"))
            .mount(&server)
            .await;
        assert!(matches!(
            fetch(&server).await.unwrap_err(),
            RouteError::ApiUnavailable(_)
        ));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_forbidden_is_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(MAP_PATH))
            .respond_with(ResponseTemplate::new(403).set_body_string(
                "The Google Maps Platform server rejected your request.",
            ))
            .mount(&server)
            .await;
        match fetch(&server).await.unwrap_err() {
            RouteError::ApiAuthError(msg) => assert!(msg.contains("rejected")),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
