// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read-only payload loaded once at startup

use std::path::Path;

/// Static page handed to the session layer as-is
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticAsset {
    pub body: Vec<u8>,
    pub mime_type: &'static str,
    /// Content encoding, e.g. `gzip` for `index.html.gz`
    pub encoding: Option<&'static str>,
}

impl StaticAsset {
    pub fn empty() -> Self {
        Self {
            body: Vec::new(),
            mime_type: "text/html",
            encoding: None,
        }
    }

    pub fn load(path: &Path) -> std::io::Result<Self> {
        let body = std::fs::read(path)?;

        let (stem, encoding) = match path.extension().and_then(|e| e.to_str()) {
            Some("gz") => (path.file_stem().map(Path::new), Some("gzip")),
            _ => (Some(path), None),
        };
        let mime_type = match stem.and_then(|s| s.extension()).and_then(|e| e.to_str()) {
            Some("html") | Some("htm") => "text/html",
            Some("txt") => "text/plain",
            Some("js") => "text/javascript",
            Some("css") => "text/css",
            _ => "application/octet-stream",
        };

        Ok(Self {
            body,
            mime_type,
            encoding,
        })
    }
}
