use std::sync::Arc;

use axum::{routing::get, Router};

mod backend;
mod error;
mod play;
mod video_id;

pub use error::{Error, Result};

pub const PORT: u16 = 3000;

// fixed outbound identity for all innertube traffic
pub const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/144.0.0.0 Safari/537.36";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
  tracing_subscriber::fmt::init();

  let handle = backend::BackendHandle::new();

  // negotiate the innertube session in the background. /play answers 503
  // until the client is installed.
  tokio::spawn({
    let handle = handle.clone();
    async move {
      match backend::Innertube::new() {
        Ok(innertube) => {
          handle.install(Arc::new(innertube));
          tracing::info!("innertube client ready");
        }
        Err(err) => tracing::error!("innertube setup failed: {err}"),
      }
    }
  });

  let app = Router::new()
    .route("/play", get(play::play))
    .with_state(handle);

  tracing::info!("listening on 0.0.0.0:{PORT}");

  axum::Server::bind(&format!("0.0.0.0:{PORT}").parse().unwrap())
    .serve(app.into_make_service())
    .await
    .expect("Failed to start server");

  Ok(())
}
