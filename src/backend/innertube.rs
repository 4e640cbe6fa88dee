use async_trait::async_trait;
use rusty_ytdl::{
  RequestOptions, Video, VideoError, VideoOptions, VideoQuality,
  VideoSearchOptions,
};

use super::{BackendError, StreamHandle, VideoBackend, VideoInfo};

/// Client for the platform's internal retrieval protocol, on top of
/// `rusty_ytdl`. Signature and cipher computation happen inside the
/// library; this adapter only maps its surface onto the backend seam.
pub struct Innertube {
  options: VideoOptions,
}

impl Innertube {
  pub fn new() -> Result<Self, BackendError> {
    let client = reqwest::Client::builder()
      .user_agent(crate::USER_AGENT)
      .build()
      .map_err(|e| BackendError::new(e.to_string()))?;

    let options = VideoOptions {
      quality: VideoQuality::Highest,
      filter: VideoSearchOptions::VideoAudio,
      request_options: RequestOptions {
        client: Some(client),
        ..Default::default()
      },
      ..Default::default()
    };

    Ok(Self { options })
  }

  fn video(&self, video_id: &str) -> Result<Video, BackendError> {
    Ok(Video::new_with_options(video_id, self.options.clone())?)
  }
}

#[async_trait]
impl VideoBackend for Innertube {
  async fn video_info(&self, video_id: &str) -> Result<VideoInfo, BackendError> {
    let info = self.video(video_id)?.get_basic_info().await?;
    let details = info.video_details;

    let title = (!details.title.is_empty()).then_some(details.title);
    let duration = details.length_seconds.parse::<u64>().ok();

    Ok(VideoInfo { title, duration })
  }

  async fn open_stream(
    &self,
    video_id: &str,
  ) -> Result<StreamHandle, BackendError> {
    let video = self.video(video_id)?;
    let info = video.get_info().await?;

    match video.stream().await {
      Ok(stream) => Ok(StreamHandle::Bytes(chunked(stream))),
      Err(err) => {
        tracing::warn!("stream open failed for {video_id}: {err}");

        // the player response often still names a playable cdn url; hand
        // it up as a recoverable redirect.
        Err(match muxed_format_url(&info.formats) {
          Some(url) => BackendError::with_redirect(err.to_string(), url),
          None => err.into(),
        })
      }
    }
  }
}

impl From<VideoError> for BackendError {
  fn from(err: VideoError) -> Self {
    BackendError::new(err.to_string())
  }
}

// best muxed (audio+video) format, preferring mp4 as the platform's own
// players do
fn muxed_format_url(
  formats: &[rusty_ytdl::VideoFormat],
) -> Option<String> {
  formats
    .iter()
    .find(|f| {
      f.has_audio
        && f.has_video
        && f.mime_type.mime.to_string().contains("video/mp4")
    })
    .or_else(|| formats.iter().find(|f| f.has_audio && f.has_video))
    .map(|f| f.url.clone())
    .filter(|url| !url.is_empty())
}

// adapt the library's pull-based stream into the seam's byte stream
fn chunked(
  stream: Box<dyn rusty_ytdl::stream::Stream + Send + Sync>,
) -> super::ByteStream {
  use futures::StreamExt;
  use rusty_ytdl::stream::Stream as _;

  futures::stream::try_unfold(stream, |stream| async move {
    match stream.chunk().await {
      Ok(Some(bytes)) => Ok(Some((bytes, stream))),
      Ok(None) => Ok(None),
      Err(err) => Err(BackendError::from(err)),
    }
  })
  .boxed()
}
