//! Turning local files into data URIs for the media slots.

use anyhow::{anyhow, Context};
use base64::{engine::general_purpose, Engine as _};
use std::path::Path;

/// MIME type for common image and audio extensions.
pub fn guess_mime(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "m4a" => "audio/mp4",
        _ => return None,
    };
    Some(mime)
}

pub fn encode_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", general_purpose::STANDARD.encode(bytes))
}

/// Read `path` and encode it, using `mime` or guessing from the extension.
pub fn read_data_uri(path: &Path, mime: Option<&str>) -> anyhow::Result<String> {
    let mime = match mime {
        Some(mime) => mime,
        None => guess_mime(path).ok_or_else(|| {
            anyhow!(
                "cannot infer media type of {}; pass --mime",
                path.display()
            )
        })?,
    };
    let bytes = std::fs::read(path).with_context(|| format!("read media {}", path.display()))?;
    Ok(encode_data_uri(mime, &bytes))
}
