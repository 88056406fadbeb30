use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_with::skip_serializing_none;

use crate::model::VideoFile;

/// A torrent tracked by the manager.
///
/// The backend pushes the full collection over the live channel; entries are
/// replaced wholesale per snapshot and never patched field-by-field.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Torrent {
    /// Info-hash identifying the torrent, unique within the collection
    pub info_hash: String,
    /// Display name
    pub name: String,
    /// Magnet URI the torrent was added from
    pub magnet: String,
    /// Total size (bytes) of the torrent's content
    pub size: i64,
    /// True once the download has finished
    pub done: bool,
    /// Download lifecycle code
    #[serde(default)]
    pub state: DownloadState,
    /// Conversion lifecycle code
    #[serde(default)]
    pub converting_state: ConvertState,
    /// Time the download completed
    pub completed_at: Option<DateTime<Utc>>,
    /// Time the torrent was queued for conversion
    pub queued_at: Option<DateTime<Utc>>,
    /// Time the conversion finished
    pub converted_at: Option<DateTime<Utc>>,
    /// Last time the backend checked on the torrent
    pub last_checked: DateTime<Utc>,
    /// Download progress, `0.0` to `100.0`
    pub downloaded_percent: f64,
    /// Current download rate (bytes/s)
    #[serde(default)]
    pub download_speed: f64,
    /// Probed video files, present once media inspection has run
    pub video_files: Option<Vec<VideoFile>>,
}

/// Download lifecycle of a torrent, as the integer code used on the wire.
///
/// Codes the backend may add later decode to [`DownloadState::Downloading`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, serde_repr::Serialize_repr,
)]
#[repr(i64)]
pub enum DownloadState {
    /// Torrent data is being downloaded
    #[default]
    Downloading = 0,
    /// Waiting in the download queue
    Queued      = 1,
    /// Download finished
    Completed   = 2,
    /// Download paused
    Paused      = 3,
}

impl DownloadState {
    /// Decodes a wire code. Total: unrecognized codes fall back to
    /// [`DownloadState::Downloading`].
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => Self::Queued,
            2 => Self::Completed,
            3 => Self::Paused,
            _ => Self::Downloading,
        }
    }

    /// Display label for this state.
    pub fn label(self) -> &'static str {
        match self {
            Self::Downloading => "Downloading",
            Self::Queued => "Queued",
            Self::Completed => "Download complete",
            Self::Paused => "Paused",
        }
    }
}

impl fmt::Display for DownloadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl<'de> Deserialize<'de> for DownloadState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        i64::deserialize(deserializer).map(Self::from_code)
    }
}

/// Conversion lifecycle of a torrent's video files, as the integer code used
/// on the wire.
///
/// Codes the backend may add later decode to [`ConvertState::NotConverted`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, serde_repr::Serialize_repr,
)]
#[repr(i64)]
pub enum ConvertState {
    /// No conversion has been requested
    #[default]
    NotConverted = 0,
    /// Waiting in the conversion queue
    Queued       = 1,
    /// Conversion in progress
    Converting   = 2,
    /// Conversion finished
    Converted    = 3,
    /// Conversion failed
    Failed       = 4,
}

impl ConvertState {
    /// Decodes a wire code. Total: unrecognized codes fall back to
    /// [`ConvertState::NotConverted`].
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => Self::Queued,
            2 => Self::Converting,
            3 => Self::Converted,
            4 => Self::Failed,
            _ => Self::NotConverted,
        }
    }

    /// Display label for this state.
    pub fn label(self) -> &'static str {
        match self {
            Self::NotConverted => "Not converted",
            Self::Queued => "Conversion queued",
            Self::Converting => "Converting",
            Self::Converted => "Converted",
            Self::Failed => "Conversion failed",
        }
    }
}

impl fmt::Display for ConvertState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl<'de> Deserialize<'de> for ConvertState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        i64::deserialize(deserializer).map(Self::from_code)
    }
}

/// One page of the torrent listing.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TorrentPage {
    /// Torrents on this page
    pub torrents: Vec<Torrent>,
    /// Total number of torrents known to the backend
    pub total: i64,
    /// 1-based index of this page
    pub page: i64,
    /// Page size the backend applied
    pub limit: i64,
}

/// Arguments for the paged torrent listing.
#[cfg_attr(feature = "builder", derive(typed_builder::TypedBuilder))]
#[cfg_attr(
    feature = "builder",
    builder(field_defaults(default, setter(strip_option)))
)]
#[skip_serializing_none]
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct GetTorrentsArg {
    /// 1-based page to fetch (default: `1`)
    pub page: Option<u32>,
    /// Page size (default: `20`)
    pub limit: Option<u32>,
}

/// Arguments for adding a torrent.
#[cfg_attr(feature = "builder", derive(typed_builder::TypedBuilder))]
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct AddTorrentArg {
    /// Magnet URI to add
    pub magnet: String,
}
