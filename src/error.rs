use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde_json::json;

pub type Result<T, E = Error> = std::result::Result<T, E>;

// transport-level failures only; the play handler maps every domain
// failure into its own response table.
#[derive(Debug)]
pub struct Error(anyhow::Error);

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let body = json!({ "error": self.0.to_string() }).to_string();
    (
      StatusCode::INTERNAL_SERVER_ERROR,
      [
        (http::header::CONTENT_TYPE, "application/json; charset=utf-8"),
        (http::header::CACHE_CONTROL, "no-store"),
      ],
      body,
    )
      .into_response()
  }
}

impl<E> From<E> for Error
where
  E: Into<anyhow::Error>,
{
  fn from(err: E) -> Self {
    Error(err.into())
  }
}
