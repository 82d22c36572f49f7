use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use url::Url;

/// Which requests the offline layer is allowed to answer from the bundle.
///
/// A request must pass both gates: its extension has to be recognized, and
/// its path has to look like game content (a known directory, a special
/// file name, or an always-local extension). Extension alone would catch
/// `.json` API traffic; path alone would miss root-level special files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InterceptRule {
    /// Extensions eligible for interception. Lowercase, without the dot.
    pub extensions: Vec<String>,
    /// Directory segments marking bundled content, e.g. `res` for `/res/`.
    pub directory_markers: Vec<String>,
    /// File names served locally wherever they appear.
    pub special_files: Vec<String>,
    /// Extensions that are always local regardless of directory.
    pub local_extensions: Vec<String>,
    /// Top-level folder the site is mounted under; everything after it is the asset path.
    pub content_folder: String,
    /// Extensions accepted by the bare-filename fallback of the path resolver.
    pub bare_file_extensions: Vec<String>,
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

impl Default for InterceptRule {
    fn default() -> Self {
        Self {
            extensions: owned(&[
                // code
                "js", "wasm", "css",
                // images
                "png", "jpg", "jpeg", "gif", "webp", "svg", "ico",
                // audio / video
                "mp3", "wav", "ogg", "m4a", "mp4", "webm",
                // fonts
                "ttf", "otf", "woff", "woff2", "eot",
                // spine skeletons and engine data
                "sk", "skel", "atlas", "ani", "dat", "bin",
                // config and text
                "json", "xml", "fnt", "txt",
            ]),
            directory_markers: owned(&[
                "js", "libs", "libs-es6", "res", "assets", "login", "update",
            ]),
            special_files: owned(&["NotoSansTC-Bold.ttf", "skillName.fnt", "skillName.png"]),
            local_extensions: owned(&["sk", "ani", "dat", "wasm", "atlas", "skel", "bin", "fnt"]),
            content_folder: "game".into(),
            bare_file_extensions: owned(&[
                "ttf", "fnt", "png", "sk", "ani", "dat", "wasm", "atlas", "skel", "bin",
            ]),
        }
    }
}

impl InterceptRule {
    /// Two-stage gate: recognized extension, then a content-looking path.
    pub fn should_intercept(&self, url: &str) -> bool {
        let clean = clean_url(url);

        let Some(extension) = file_extension(clean) else {
            return false;
        };
        if !contains_ignore_case(&self.extensions, &extension) {
            return false;
        }

        let path = url_path(clean);
        self.has_directory_marker(&path)
            || self.is_special_file(&path)
            || self.is_always_local(&extension)
    }

    fn has_directory_marker(&self, path: &str) -> bool {
        let lowered = path.to_ascii_lowercase();
        self.directory_markers
            .iter()
            .any(|marker| lowered.contains(&format!("/{}/", marker.to_ascii_lowercase())))
    }

    fn is_special_file(&self, path: &str) -> bool {
        let name = file_name(path);
        self.special_files
            .iter()
            .any(|special| special.eq_ignore_ascii_case(name))
    }

    fn is_always_local(&self, extension: &str) -> bool {
        contains_ignore_case(&self.local_extensions, extension)
    }
}

fn contains_ignore_case(items: &[String], needle: &str) -> bool {
    items.iter().any(|item| item.eq_ignore_ascii_case(needle))
}

/// Drops the query string and fragment.
pub fn clean_url(url: &str) -> &str {
    match url.find(|c: char| c == '?' || c == '#') {
        Some(idx) => &url[..idx],
        None => url,
    }
}

/// Path portion of an absolute URL (leading `/` kept). Relative input is returned as is.
///
/// Works for any scheme with an authority, so `offline://localhost/...` and
/// `http://offline.localhost/...` resolve the same way as the game server URLs.
pub fn url_path(url: &str) -> Cow<'_, str> {
    match Url::parse(url) {
        Ok(parsed) => Cow::Owned(parsed.path().to_string()),
        Err(_) => Cow::Borrowed(url),
    }
}

/// Last path segment.
pub fn file_name(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

/// Lowercased extension of the last path segment, query and fragment ignored.
///
/// `None` when there is no dot or the dot is the last character.
pub fn file_extension(url: &str) -> Option<String> {
    let path = url_path(clean_url(url));
    let name = file_name(&path);
    let dot = name.rfind('.')?;
    let extension = &name[dot + 1..];
    if extension.is_empty() {
        return None;
    }
    Some(extension.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_query_and_fragment() {
        assert_eq!(clean_url("https://h/js/a.js?v=3#top"), "https://h/js/a.js");
        assert_eq!(clean_url("https://h/js/a.js#x?y"), "https://h/js/a.js");
        assert_eq!(clean_url("https://h/js/a.js"), "https://h/js/a.js");
    }

    #[test]
    fn extension_is_taken_from_last_segment() {
        assert_eq!(file_extension("https://h/js/Main.JS?v=1").as_deref(), Some("js"));
        assert_eq!(file_extension("https://example.com/api/login"), None);
        assert_eq!(file_extension("https://h/res/file."), None);
        assert_eq!(file_extension("res/sprites/hero.png").as_deref(), Some("png"));
    }

    #[test]
    fn url_path_skips_authority() {
        assert_eq!(url_path("https://res/x.png"), "/x.png");
        assert_eq!(url_path("https://host"), "/");
        assert_eq!(url_path("js/main.js"), "js/main.js");
        assert_eq!(url_path("offline://localhost/game/js/a.js"), "/game/js/a.js");
        assert_eq!(url_path("http://offline.localhost/game/js/a.js"), "/game/js/a.js");
        assert_eq!(url_path("https://h/res/../js/a.js"), "/js/a.js");
    }

    #[test]
    fn unrecognized_extension_is_never_intercepted() {
        let rule = InterceptRule::default();
        assert!(!rule.should_intercept("https://host/game/js/page.html"));
        assert!(!rule.should_intercept("https://host/res/archive.zip"));
        assert!(!rule.should_intercept("https://host/api/v1/login"));
    }

    #[test]
    fn extension_without_content_path_is_rejected() {
        let rule = InterceptRule::default();
        assert!(!rule.should_intercept("https://host/api/v1/config.json"));
        assert!(!rule.should_intercept("https://host/avatar.png"));
    }

    #[test]
    fn directory_marker_and_extension_pass() {
        let rule = InterceptRule::default();
        assert!(rule.should_intercept("https://host/game/js/main.js"));
        assert!(rule.should_intercept("https://host/libs-es6/laya.core.js?v=2"));
        assert!(rule.should_intercept("https://host/RES/ui/Panel.PNG"));
        assert!(rule.should_intercept("https://host/update/version.json"));
    }

    #[test]
    fn marker_in_host_does_not_count() {
        let rule = InterceptRule::default();
        assert!(!rule.should_intercept("https://res/config.json"));
    }

    #[test]
    fn special_files_pass_at_root() {
        let rule = InterceptRule::default();
        assert!(rule.should_intercept("https://host/NotoSansTC-Bold.ttf"));
        assert!(rule.should_intercept("https://host/skillname.png"));
        assert!(!rule.should_intercept("https://host/other.ttf"));
    }

    #[test]
    fn always_local_extensions_pass_anywhere() {
        let rule = InterceptRule::default();
        assert!(rule.should_intercept("https://host/hero.sk"));
        assert!(rule.should_intercept("https://host/engine/physics.wasm"));
        assert!(!rule.should_intercept("https://host/engine/readme.txt"));
    }

    #[test]
    fn injected_rule_replaces_defaults() {
        let rule = InterceptRule {
            extensions: vec!["glb".into()],
            directory_markers: vec!["models".into()],
            special_files: vec![],
            local_extensions: vec![],
            content_folder: "site".into(),
            bare_file_extensions: vec![],
        };
        assert!(rule.should_intercept("https://host/models/ship.glb"));
        assert!(!rule.should_intercept("https://host/js/main.js"));
    }
}
