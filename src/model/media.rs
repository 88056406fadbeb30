use serde_with::skip_serializing_none;

/// A video file discovered inside a torrent, with the outcome of the
/// backend's media inspection. Read-only on the client.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VideoFile {
    /// Path of the file below the download root
    pub path: String,
    /// Probe result, absent when inspection failed
    pub video_info: Option<VideoInfo>,
    /// Inspection error message, if any
    pub error: Option<String>,
}

/// Root of the probe output for one media file.
///
/// The structures below mirror ffprobe's JSON output; field names follow
/// ffprobe exactly, including the uppercase Matroska tag keys.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VideoInfo {
    pub streams: Vec<Stream>,
    pub format: Format,
}

/// One stream (video, audio, subtitle, attachment) of a media container.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Stream {
    pub index: i64,
    pub codec_name: String,
    pub codec_long_name: Option<String>,
    pub profile: Option<String>,
    /// `video`, `audio`, `subtitle` or `attachment`
    pub codec_type: String,
    pub codec_tag_string: Option<String>,
    pub codec_tag: Option<String>,
    pub width: Option<i64>,
    pub height: Option<i64>,
    pub coded_width: Option<i64>,
    pub coded_height: Option<i64>,
    pub closed_captions: Option<i64>,
    pub has_b_frames: Option<i64>,
    pub sample_aspect_ratio: Option<String>,
    pub display_aspect_ratio: Option<String>,
    pub pix_fmt: Option<String>,
    pub level: Option<i64>,
    pub color_range: Option<String>,
    pub color_space: Option<String>,
    pub color_transfer: Option<String>,
    pub color_primaries: Option<String>,
    pub chroma_location: Option<String>,
    pub refs: Option<i64>,
    /// Rational as printed by ffprobe, e.g. `24000/1001`
    pub r_frame_rate: Option<String>,
    pub avg_frame_rate: Option<String>,
    pub time_base: Option<String>,
    pub start_pts: Option<i64>,
    pub start_time: Option<String>,
    pub duration_ts: Option<i64>,
    pub duration: Option<String>,
    pub bit_rate: Option<String>,
    pub disposition: Option<Disposition>,
    pub tags: Option<StreamTags>,

    // audio streams only
    pub sample_fmt: Option<String>,
    pub sample_rate: Option<String>,
    pub channels: Option<i64>,
    pub channel_layout: Option<String>,
    pub bits_per_sample: Option<i64>,
}

/// Stream flags, 0 or 1 each.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Disposition {
    pub default: i64,
    pub dub: i64,
    pub original: i64,
    pub comment: i64,
    pub lyrics: i64,
    pub karaoke: i64,
    pub forced: i64,
    pub hearing_impaired: i64,
    pub visual_impaired: i64,
    pub clean_effects: i64,
    pub attached_pic: i64,
    pub timed_thumbnails: i64,
}

/// Per-stream metadata tags.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StreamTags {
    pub language: Option<String>,
    pub title: Option<String>,
    #[serde(rename = "BPS")]
    pub bps: Option<String>,
    #[serde(rename = "DURATION")]
    pub duration: Option<String>,
    #[serde(rename = "NUMBER_OF_FRAMES")]
    pub number_of_frames: Option<String>,
    #[serde(rename = "NUMBER_OF_BYTES")]
    pub number_of_bytes: Option<String>,
    #[serde(rename = "_STATISTICS_WRITING_APP")]
    pub statistics_writing_app: Option<String>,
    #[serde(rename = "_STATISTICS_WRITING_DATE_UTC")]
    pub statistics_writing_date_utc: Option<String>,
    #[serde(rename = "_STATISTICS_TAGS")]
    pub statistics_tags: Option<String>,
    // attachment streams
    pub filename: Option<String>,
    pub mimetype: Option<String>,
}

/// Container-level information for one media file.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Format {
    pub filename: String,
    pub nb_streams: i64,
    pub nb_programs: i64,
    pub format_name: String,
    pub format_long_name: String,
    pub start_time: String,
    pub duration: String,
    /// Size in bytes, printed by ffprobe as a string
    pub size: String,
    /// Bit rate in bits/s, printed by ffprobe as a string
    pub bit_rate: String,
    pub probe_score: i64,
    #[serde(default)]
    pub tags: FormatTags,
}

/// Container-level metadata tags.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FormatTags {
    pub encoder: Option<String>,
    pub creation_time: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_probe_output() {
        let raw = r#"{
            "path": "/downloads/movie/movie.mkv",
            "video_info": {
                "streams": [
                    {
                        "index": 0,
                        "codec_name": "h264",
                        "codec_long_name": "H.264 / AVC / MPEG-4 AVC / MPEG-4 part 10",
                        "codec_type": "video",
                        "width": 1920,
                        "height": 1080,
                        "pix_fmt": "yuv420p",
                        "r_frame_rate": "24000/1001",
                        "disposition": {
                            "default": 1, "dub": 0, "original": 0, "comment": 0,
                            "lyrics": 0, "karaoke": 0, "forced": 0,
                            "hearing_impaired": 0, "visual_impaired": 0,
                            "clean_effects": 0, "attached_pic": 0, "timed_thumbnails": 0
                        },
                        "tags": {
                            "language": "eng",
                            "BPS": "7762283",
                            "DURATION": "01:37:52.291000000"
                        }
                    },
                    {
                        "index": 1,
                        "codec_name": "aac",
                        "codec_type": "audio",
                        "sample_rate": "48000",
                        "channels": 6,
                        "channel_layout": "5.1"
                    }
                ],
                "format": {
                    "filename": "/downloads/movie/movie.mkv",
                    "nb_streams": 2,
                    "nb_programs": 0,
                    "format_name": "matroska,webm",
                    "format_long_name": "Matroska / WebM",
                    "start_time": "0.000000",
                    "duration": "5872.291000",
                    "size": "5942214454",
                    "bit_rate": "8095519",
                    "probe_score": 100,
                    "tags": { "encoder": "libebml v1.4.2 + libmatroska v1.6.4" }
                }
            },
            "error": null
        }"#;

        let file: VideoFile = serde_json::from_str(raw).unwrap();
        let info = file.video_info.unwrap();
        assert_eq!(info.streams.len(), 2);
        assert_eq!(info.streams[0].codec_type, "video");
        assert_eq!(info.streams[0].width, Some(1920));
        assert_eq!(
            info.streams[0].tags.as_ref().unwrap().bps.as_deref(),
            Some("7762283")
        );
        assert_eq!(info.streams[1].channels, Some(6));
        assert_eq!(info.format.nb_streams, 2);
        assert!(file.error.is_none());
    }

    #[test]
    fn probe_failure_carries_error_only() {
        let raw = r#"{"path": "/downloads/bad.avi", "error": "moov atom not found"}"#;
        let file: VideoFile = serde_json::from_str(raw).unwrap();
        assert!(file.video_info.is_none());
        assert_eq!(file.error.as_deref(), Some("moov atom not found"));
    }
}
