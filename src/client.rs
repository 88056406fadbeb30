use reqwest::{Client, Method, Response, StatusCode, Url};
use serde::Serialize;
use tap::TapFallible;
use tracing::{trace, warn};

use crate::{
    builder::SeedboxBuilder,
    model::{AddTorrentArg, FileEntry, GetTorrentsArg, Torrent, TorrentPage},
    ApiError, Error, Result,
};

/// Typed client for the manager's HTTP API.
///
/// Construct one with [`Seedbox::new`] or [`Seedbox::builder`]. The client
/// is cheap to clone and holds no session state; the backend API is
/// unauthenticated.
#[derive(Debug, Clone)]
pub struct Seedbox {
    client: Client,
    endpoint: Url,
}

impl Seedbox {
    /// Creates a client for the API at `endpoint` using the given HTTP
    /// client.
    pub fn new(endpoint: Url, client: Client) -> Self {
        Self { client, endpoint }
    }

    /// Starts a [`SeedboxBuilder`].
    pub fn builder() -> SeedboxBuilder {
        SeedboxBuilder::new()
    }

    /// Lists every torrent known to the backend.
    pub async fn get_torrents(&self) -> Result<Vec<Torrent>> {
        self.get("torrents", NONE)
            .await?
            .accept()?
            .json()
            .await
            .map_err(Into::into)
    }

    /// Lists torrents one page at a time.
    pub async fn get_torrents_page(&self, arg: GetTorrentsArg) -> Result<TorrentPage> {
        self.get("torrents", Some(&arg))
            .await?
            .accept()?
            .json()
            .await
            .map_err(Into::into)
    }

    /// Torrent listing that degrades to an empty list instead of failing.
    ///
    /// Page loads prefer stale-or-empty data over a hard error; the failure
    /// is logged and the caller decides whether to surface it.
    pub async fn load_torrents(&self) -> Vec<Torrent> {
        match self.get_torrents().await {
            Ok(torrents) => torrents,
            Err(err) => {
                warn!(%err, "failed to load torrents, serving an empty list");
                Vec::new()
            }
        }
    }

    /// Fetches a single torrent by info-hash.
    pub async fn get_torrent(&self, hash: impl AsRef<str> + Send) -> Result<Torrent> {
        let hash = hash.as_ref();
        self.get(&format!("torrents/{hash}"), NONE)
            .await?
            .accept_torrent(hash)?
            .json()
            .await
            .map_err(Into::into)
    }

    /// Adds a torrent by magnet link.
    pub async fn add_torrent(&self, arg: AddTorrentArg) -> Result<()> {
        self.post("torrents", NONE, Some(&arg))
            .await?
            .accept()
            .map(|_| ())
    }

    /// Removes a torrent and its data.
    pub async fn delete_torrent(&self, hash: impl AsRef<str> + Send) -> Result<()> {
        let hash = hash.as_ref();
        self.request(Method::DELETE, &format!("torrents/{hash}"), NONE, NONE)
            .await?
            .accept_torrent(hash)
            .map(|_| ())
    }

    /// Queues the torrent's video files for conversion.
    pub async fn convert_torrent(&self, hash: impl AsRef<str> + Send) -> Result<()> {
        self.torrent_action(hash.as_ref(), "convert").await
    }

    /// Pauses the download.
    pub async fn pause_torrent(&self, hash: impl AsRef<str> + Send) -> Result<()> {
        self.torrent_action(hash.as_ref(), "pause").await
    }

    /// Resumes a paused download.
    pub async fn resume_torrent(&self, hash: impl AsRef<str> + Send) -> Result<()> {
        self.torrent_action(hash.as_ref(), "resume").await
    }

    /// Lists files under `path` on the backend's storage.
    pub async fn get_files(&self, path: impl AsRef<str> + Send) -> Result<Vec<FileEntry>> {
        #[derive(Serialize)]
        struct Query<'a> {
            path: &'a str,
        }

        self.get("files", Some(&Query { path: path.as_ref() }))
            .await?
            .accept()?
            .json()
            .await
            .map_err(Into::into)
    }

    /// Address of the video-serving route for `path`.
    ///
    /// The media itself is streamed by the backend; the client only builds
    /// the URL for a player to open.
    pub fn video_url(&self, path: impl AsRef<str>) -> Url {
        let mut url = self.url("video");
        url.query_pairs_mut().append_pair("path", path.as_ref());
        url
    }

    async fn torrent_action(&self, hash: &str, action: &str) -> Result<()> {
        self.post(&format!("torrents/{hash}/{action}"), NONE, NONE)
            .await?
            .accept_torrent(hash)
            .map(|_| ())
    }

    fn url(&self, path: &str) -> Url {
        self.endpoint
            .join("api/")
            .expect("Invalid API endpoint")
            .join(path)
            .expect("Invalid API endpoint")
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        qs: Option<&(impl Serialize + Sync)>,
        body: Option<&(impl Serialize + Sync)>,
    ) -> Result<Response> {
        let mut req = self.client.request(method, self.url(path));

        if let Some(qs) = qs {
            req = req.query(qs);
        }

        if let Some(body) = body {
            req = req.json(body);
        }

        trace!(%path, "Sending request");

        req.send()
            .await
            .map_err(Into::into)
            .tap_ok(|res| trace!(status = %res.status()))
    }

    async fn get(&self, path: &str, qs: Option<&(impl Serialize + Sync)>) -> Result<Response> {
        self.request(Method::GET, path, qs, NONE).await
    }

    async fn post(
        &self,
        path: &str,
        qs: Option<&(impl Serialize + Sync)>,
        body: Option<&(impl Serialize + Sync)>,
    ) -> Result<Response> {
        self.request(Method::POST, path, qs, body).await
    }
}

const NONE: Option<&'static ()> = Option::None;

trait ResponseExt: Sized {
    /// Rejects non-success responses.
    fn accept(self) -> Result<Self>;

    /// Like [`ResponseExt::accept`], mapping 404 on hash-addressed routes
    /// to [`ApiError::TorrentHashNotFound`].
    fn accept_torrent(self, hash: &str) -> Result<Self>;
}

impl ResponseExt for Response {
    fn accept(self) -> Result<Self> {
        let status = self.status();

        if status.is_success() {
            Ok(self)
        } else {
            Err(Error::UnknownHttpCode(status))
        }
    }

    fn accept_torrent(self, hash: &str) -> Result<Self> {
        if self.status() == StatusCode::NOT_FOUND {
            Err(Error::ApiError(ApiError::TorrentHashNotFound(
                hash.to_owned(),
            )))
        } else {
            self.accept()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api() -> Seedbox {
        Seedbox::new("http://localhost:8080".parse().unwrap(), Client::new())
    }

    #[test]
    fn joins_api_routes() {
        assert_eq!(
            api().url("torrents").as_str(),
            "http://localhost:8080/api/torrents"
        );
        assert_eq!(
            api().url("torrents/abc/convert").as_str(),
            "http://localhost:8080/api/torrents/abc/convert"
        );
    }

    #[test]
    fn builds_video_url() {
        let url = api().video_url("/movies/a b.mkv");
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/api/video?path=%2Fmovies%2Fa+b.mkv"
        );
    }

    // Exercises a live backend; skipped unless SEEDBOX_BASEURL is set
    // (e.g. via a local .env).
    #[tokio::test]
    async fn test_list_live() {
        dotenv::dotenv().ok();
        let Ok(base) = std::env::var("SEEDBOX_BASEURL") else {
            return;
        };
        tracing_subscriber::fmt().with_test_writer().try_init().ok();

        let api = Seedbox::builder().endpoint(base.as_str()).build();
        let torrents = api.get_torrents().await.unwrap();
        tracing::info!(count = torrents.len(), "Listing success");
    }
}
