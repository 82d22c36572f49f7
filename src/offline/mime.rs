use super::rules::file_extension;

pub const OCTET_STREAM: &str = "application/octet-stream";

/// Fixed extension table. Engine-specific binary formats are served as
/// octet-stream; the game runtime sniffs them itself.
pub const MIME_TABLE: &[(&str, &str)] = &[
    ("js", "application/javascript"),
    ("wasm", "application/wasm"),
    ("json", "application/json"),
    ("xml", "application/xml"),
    ("txt", "text/plain"),
    ("css", "text/css"),
    ("html", "text/html"),
    ("htm", "text/html"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("svg", "image/svg+xml"),
    ("ico", "image/x-icon"),
    ("mp3", "audio/mpeg"),
    ("wav", "audio/wav"),
    ("ogg", "audio/ogg"),
    ("m4a", "audio/mp4"),
    ("mp4", "video/mp4"),
    ("webm", "video/webm"),
    ("ttf", "font/ttf"),
    ("otf", "font/otf"),
    ("woff", "font/woff"),
    ("woff2", "font/woff2"),
    ("eot", "application/vnd.ms-fontobject"),
    ("sk", OCTET_STREAM),
    ("skel", OCTET_STREAM),
    ("atlas", "text/plain"),
    ("ani", OCTET_STREAM),
    ("dat", OCTET_STREAM),
    ("bin", OCTET_STREAM),
    ("fnt", OCTET_STREAM),
];

/// Content type for an asset path. Never empty.
///
/// Lookup order: fixed table, then the `mime_guess` database, then octet-stream.
pub fn resolve_mime(path: &str) -> &'static str {
    let Some(extension) = file_extension(path) else {
        return OCTET_STREAM;
    };

    if let Some((_, mime)) = MIME_TABLE.iter().find(|(ext, _)| *ext == extension) {
        return *mime;
    }

    mime_guess::from_ext(&extension)
        .first_raw()
        .filter(|mime| !mime.is_empty())
        .unwrap_or(OCTET_STREAM)
}
