mod innertube;

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use once_cell::sync::OnceCell;

pub use innertube::Innertube;

pub type ByteStream = BoxStream<'static, Result<Bytes, BackendError>>;

/// Basic metadata for a resolved video. Either field may be absent when the
/// player response does not carry it.
#[derive(Debug, Clone, Default)]
pub struct VideoInfo {
  pub title: Option<String>,
  pub duration: Option<u64>,
}

/// An opened download. `Bytes` can be consumed chunk by chunk; `Opaque` is
/// a payload kind the gateway has no way to read.
pub enum StreamHandle {
  Bytes(ByteStream),
  #[allow(unused)]
  Opaque,
}

impl StreamHandle {
  pub fn into_bytes(self) -> Option<ByteStream> {
    match self {
      StreamHandle::Bytes(stream) => Some(stream),
      StreamHandle::Opaque => None,
    }
  }
}

/// The innertube boundary. Implementations do all platform negotiation and
/// cipher work internally; this crate only consumes the two calls below.
#[async_trait]
pub trait VideoBackend: Send + Sync {
  async fn video_info(&self, video_id: &str) -> Result<VideoInfo, BackendError>;

  async fn open_stream(
    &self,
    video_id: &str,
  ) -> Result<StreamHandle, BackendError>;
}

/// Backend failure, optionally carrying a direct media-server URL salvaged
/// from the failing player response. Only URLs on the googlevideo host
/// family survive construction; anything else is dropped.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct BackendError {
  message: String,
  redirect_url: Option<String>,
}

impl BackendError {
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      message: message.into(),
      redirect_url: None,
    }
  }

  pub fn with_redirect(
    message: impl Into<String>,
    candidate: impl Into<String>,
  ) -> Self {
    let candidate = candidate.into();
    Self {
      message: message.into(),
      redirect_url: is_media_url(&candidate).then_some(candidate),
    }
  }

  pub fn redirect_url(&self) -> Option<&str> {
    self.redirect_url.as_deref()
  }
}

// the media-serving host family the platform redirects to
fn is_media_url(candidate: &str) -> bool {
  let Ok(url) = url::Url::parse(candidate) else {
    return false;
  };

  url
    .host_str()
    .map(|host| {
      host == "googlevideo.com" || host.ends_with(".googlevideo.com")
    })
    .unwrap_or(false)
}

/// Shared handle to the once-initialized backend client. Cloned into every
/// request; empty until startup finishes negotiating the session.
#[derive(Clone, Default)]
pub struct BackendHandle {
  inner: Arc<OnceCell<Arc<dyn VideoBackend>>>,
}

impl BackendHandle {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn install(&self, backend: Arc<dyn VideoBackend>) {
    // a second install is a no-op
    self.inner.set(backend).ok();
  }

  pub fn get(&self) -> Option<&Arc<dyn VideoBackend>> {
    self.inner.get()
  }
}
