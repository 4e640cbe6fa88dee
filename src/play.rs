use axum::{
  body::{Bytes, Full},
  extract::{Query, State},
  http::Response,
};
use http::{header, StatusCode};
use serde::{Deserialize, Serialize};

use crate::{
  backend::{BackendHandle, VideoBackend},
  video_id::extract_video_id,
  Result,
};

const MISSING_URL: &str = "Missing url parameter";
const INVALID_URL: &str = "Invalid YouTube URL";
const NOT_READY: &str = "Innertube not ready";
const INFO_FAILED: &str = "Failed to retrieve video info and stream URL";
const STREAM_FAILED: &str = "Failed to retrieve stream URL";
const UNSUPPORTED_STREAM: &str = "Unsupported stream type";

#[derive(Deserialize)]
pub struct PlayParams {
  url: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayBody {
  video_id: String,
  title: Option<String>,
  duration: Option<u64>,
  url: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  error: Option<&'static str>,
}

// reduced shape for requests rejected before a video id exists
#[derive(Serialize)]
struct ErrorBody {
  error: &'static str,
}

pub async fn play(
  State(handle): State<BackendHandle>,
  Query(params): Query<PlayParams>,
) -> Result<Response<Full<Bytes>>> {
  let Some(url) = params.url.as_deref().filter(|u| !u.is_empty()) else {
    return json_response(
      StatusCode::BAD_REQUEST,
      &ErrorBody { error: MISSING_URL },
    );
  };

  let Some(video_id) = extract_video_id(url) else {
    return json_response(
      StatusCode::BAD_REQUEST,
      &ErrorBody { error: INVALID_URL },
    );
  };

  let Some(backend) = handle.get() else {
    return json_response(
      StatusCode::SERVICE_UNAVAILABLE,
      &ErrorBody { error: NOT_READY },
    );
  };

  let (status, body) = resolve(backend.as_ref(), video_id).await;
  json_response(status, &body)
}

// the six-outcome table: info then stream, salvaging a direct media url
// from either failure when the backend surfaced one.
async fn resolve(
  backend: &dyn VideoBackend,
  video_id: &str,
) -> (StatusCode, PlayBody) {
  let video_id = video_id.to_owned();

  let info = match backend.video_info(&video_id).await {
    Ok(info) => info,
    Err(err) => {
      return match err.redirect_url() {
        Some(url) => (
          StatusCode::OK,
          PlayBody {
            video_id,
            title: None,
            duration: None,
            url: Some(url.to_owned()),
            error: None,
          },
        ),
        None => (
          StatusCode::INTERNAL_SERVER_ERROR,
          PlayBody {
            video_id,
            title: None,
            duration: None,
            url: None,
            error: Some(INFO_FAILED),
          },
        ),
      };
    }
  };

  match backend.open_stream(&video_id).await {
    Ok(handle) => match handle.into_bytes() {
      Some(stream) => {
        // acquisition is all we report; no bytes are forwarded
        drop(stream);
        (
          StatusCode::OK,
          PlayBody {
            video_id,
            title: info.title,
            duration: info.duration,
            url: None,
            error: None,
          },
        )
      }
      None => (
        StatusCode::INTERNAL_SERVER_ERROR,
        PlayBody {
          video_id,
          title: info.title,
          duration: info.duration,
          url: None,
          error: Some(UNSUPPORTED_STREAM),
        },
      ),
    },
    Err(err) => match err.redirect_url() {
      Some(url) => (
        StatusCode::OK,
        PlayBody {
          video_id,
          title: info.title,
          duration: info.duration,
          url: Some(url.to_owned()),
          error: None,
        },
      ),
      None => (
        StatusCode::INTERNAL_SERVER_ERROR,
        PlayBody {
          video_id,
          title: info.title,
          duration: info.duration,
          url: None,
          error: Some(STREAM_FAILED),
        },
      ),
    },
  }
}

fn json_response<T: Serialize>(
  status: StatusCode,
  body: &T,
) -> Result<Response<Full<Bytes>>> {
  let bytes = serde_json::to_vec(body)?;

  let resp = Response::builder()
    .status(status)
    .header(header::CONTENT_TYPE, "application/json; charset=utf-8")
    .header(header::CACHE_CONTROL, "no-store")
    .body(Full::new(Bytes::from(bytes)))?;

  Ok(resp)
}
