//! Static file serving module
//!
//! Resolves request paths under the static root and opens files for
//! streaming, with a single open + stat per file.

use hyper::header::{HeaderMap, HeaderValue, CONTENT_LENGTH, CONTENT_TYPE};
use hyper::{Response, StatusCode};
use std::io;
use std::path::{Component, Path, PathBuf};
use tokio::fs::File;

use crate::error::{Error, Result};
use crate::http::{build_response, mime, FileBody, ResponseBody};

/// Join `request_path` onto `root`
///
/// A leading `/` is ignored. Returns `None` for paths that try to leave the
/// root through `..` or a drive prefix.
pub fn resolve(root: &Path, request_path: &Path) -> Option<PathBuf> {
    let mut resolved = root.to_path_buf();
    for component in request_path.components() {
        match component {
            Component::Normal(part) => resolved.push(part),
            Component::RootDir | Component::CurDir => {}
            Component::ParentDir | Component::Prefix(_) => return None,
        }
    }
    Some(resolved)
}

/// An opened regular file ready to be streamed
#[derive(Debug)]
pub struct StaticFile {
    path: PathBuf,
    file: File,
    len: u64,
}

impl StaticFile {
    /// Open and stat `path`; directories and unreadable paths fail.
    pub async fn open(path: PathBuf) -> Result<Self> {
        let opened = File::open(&path).await;
        let file = match opened {
            Ok(f) => f,
            Err(source) => return Err(Error::FileReadFailure { path, source }),
        };
        let stat = file.metadata().await;
        let metadata = match stat {
            Ok(m) => m,
            Err(source) => return Err(Error::FileReadFailure { path, source }),
        };
        if !metadata.is_file() {
            return Err(Error::FileReadFailure {
                path,
                source: io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"),
            });
        }

        Ok(Self {
            path,
            file,
            len: metadata.len(),
        })
    }

    /// Open the file a request path points at, if one exists under `root`.
    pub async fn lookup(root: &Path, request_path: &str) -> Option<Self> {
        let path = resolve(root, Path::new(request_path))?;
        Self::open(path).await.ok()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub const fn len(&self) -> u64 {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Build a streaming response
    ///
    /// `content-length` and `content-type` override caller headers; unknown
    /// extensions get no content type.
    pub fn into_response(self, status: StatusCode, headers: Option<HeaderMap>) -> Response<ResponseBody> {
        let mut headers = headers.unwrap_or_default();
        headers.insert(CONTENT_LENGTH, HeaderValue::from(self.len));
        if let Some(content_type) = mime::content_type_for(&self.path) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        }

        build_response(status, Some(headers), FileBody::new(self.file, self.len).boxed())
    }
}
