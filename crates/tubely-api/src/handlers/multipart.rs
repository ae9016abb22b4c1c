//! Streaming access to multipart file parts.

use axum::extract::multipart::{Field, MultipartError};
use axum::http::StatusCode;
use futures::TryStreamExt;
use std::io;
use tokio::io::AsyncRead;
use tokio_util::io::StreamReader;
use tubely_processing::SizeLimitExceeded;

fn to_io_error(err: MultipartError) -> io::Error {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        io::Error::other(SizeLimitExceeded)
    } else {
        io::Error::other(err)
    }
}

/// Adapt a multipart part into a byte reader without buffering it.
///
/// A body limit hit mid-stream surfaces as a [`SizeLimitExceeded`] read error.
pub fn field_reader<'a>(field: Field<'a>) -> impl AsyncRead + Unpin + Send + 'a {
    StreamReader::new(Box::pin(field.map_err(to_io_error)))
}
