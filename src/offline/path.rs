use super::rules::{clean_url, file_name, url_path, InterceptRule};

/// One entry of the ordered path-extraction list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPattern {
    /// Everything after `/<folder>/`.
    AfterFolder(String),
    /// From `<marker>/` to the end of the path.
    FromMarker(String),
    /// A bare file name at the end of the path, restricted to these extensions.
    BareFile(Vec<String>),
}

impl PathPattern {
    /// Returns the captured asset path, or `None` if the pattern doesn't apply.
    ///
    /// Directory segments match case-insensitively; the capture keeps the
    /// case of the request so it can be joined onto the bundle root.
    pub fn capture<'a>(&self, path: &'a str) -> Option<&'a str> {
        let captured = match self {
            PathPattern::AfterFolder(folder) => {
                let needle = format!("/{}/", folder.to_ascii_lowercase());
                let start = last_occurrence(path, &needle)?;
                &path[start + needle.len()..]
            }
            PathPattern::FromMarker(marker) => {
                let needle = format!("/{}/", marker.to_ascii_lowercase());
                let start = last_occurrence(path, &needle)?;
                &path[start + 1..]
            }
            PathPattern::BareFile(extensions) => {
                path.rfind('/')?;
                let name = file_name(path);
                let (stem, extension) = name.rsplit_once('.')?;
                if stem.is_empty()
                    || !extensions.iter().any(|ext| ext.eq_ignore_ascii_case(extension))
                {
                    return None;
                }
                name
            }
        };

        if captured.is_empty() {
            None
        } else {
            Some(captured)
        }
    }
}

/// Start of the right-most `needle` that still has something after it.
///
/// Lowercasing is ASCII-only, so byte offsets carry over to `path`.
fn last_occurrence(path: &str, needle: &str) -> Option<usize> {
    path.to_ascii_lowercase()
        .rmatch_indices(needle)
        .map(|(start, _)| start)
        .find(|start| start + needle.len() < path.len())
}

/// Maps an interceptable URL to its path inside the asset bundle.
///
/// Patterns are tried in order and the first capture wins. Full-path
/// patterns come before the bare-filename fallback so a nested asset is
/// never resolved to a shorter suffix.
#[derive(Debug, Clone)]
pub struct PathResolver {
    patterns: Vec<PathPattern>,
}

impl PathResolver {
    pub fn new(patterns: Vec<PathPattern>) -> Self {
        Self { patterns }
    }

    /// Content folder first, then one pattern per directory marker, then bare files.
    pub fn from_rule(rule: &InterceptRule) -> Self {
        let mut patterns = Vec::with_capacity(rule.directory_markers.len() + 2);
        patterns.push(PathPattern::AfterFolder(rule.content_folder.clone()));
        patterns.extend(
            rule.directory_markers
                .iter()
                .map(|marker| PathPattern::FromMarker(marker.clone())),
        );
        patterns.push(PathPattern::BareFile(rule.bare_file_extensions.clone()));
        Self { patterns }
    }

    pub fn patterns(&self) -> &[PathPattern] {
        &self.patterns
    }

    /// `None` means "do not intercept", never an error.
    pub fn extract_resource_path(&self, url: &str) -> Option<String> {
        let path = url_path(clean_url(url));
        self.patterns
            .iter()
            .find_map(|pattern| pattern.capture(&path))
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> PathResolver {
        PathResolver::from_rule(&InterceptRule::default())
    }

    #[test]
    fn content_folder_wins_over_markers() {
        let resolver = resolver();
        assert_eq!(
            resolver.extract_resource_path("https://host/game/js/main.js").as_deref(),
            Some("js/main.js")
        );
        assert_eq!(
            resolver
                .extract_resource_path("https://host/game/sub/res/a.png?v=9#f")
                .as_deref(),
            Some("sub/res/a.png")
        );
    }

    #[test]
    fn marker_captures_to_end_of_path() {
        let resolver = resolver();
        assert_eq!(
            resolver
                .extract_resource_path("https://host/cdn/res/sprites/hero.png")
                .as_deref(),
            Some("res/sprites/hero.png")
        );
        assert_eq!(
            resolver
                .extract_resource_path("https://host/v2/libs-es6/laya.core.js")
                .as_deref(),
            Some("libs-es6/laya.core.js")
        );
    }

    #[test]
    fn marker_order_is_list_order() {
        // js is listed before res, so it is tried first
        let resolver = resolver();
        assert_eq!(
            resolver
                .extract_resource_path("https://host/res/js/boot.js")
                .as_deref(),
            Some("js/boot.js")
        );
    }

    #[test]
    fn bare_file_is_the_last_resort() {
        let resolver = resolver();
        assert_eq!(
            resolver.extract_resource_path("https://host/hero.sk").as_deref(),
            Some("hero.sk")
        );
        assert_eq!(
            resolver
                .extract_resource_path("https://host/a/b/NotoSansTC-Bold.ttf")
                .as_deref(),
            Some("NotoSansTC-Bold.ttf")
        );
        assert_eq!(resolver.extract_resource_path("https://host/a/b/readme.txt"), None);
    }

    #[test]
    fn nothing_after_marker_is_no_match() {
        let resolver = resolver();
        assert_eq!(resolver.extract_resource_path("https://host/res/"), None);
        assert_eq!(resolver.extract_resource_path("https://host/game/"), None);
        assert_eq!(resolver.extract_resource_path("https://host"), None);
    }

    #[test]
    fn patterns_are_testable_in_isolation() {
        let marker = PathPattern::FromMarker("assets".into());
        assert_eq!(marker.capture("/x/Assets/a.json"), Some("Assets/a.json"));
        assert_eq!(marker.capture("/x/assetsy/a.json"), None);

        let bare = PathPattern::BareFile(vec!["png".into()]);
        assert_eq!(bare.capture("/deep/dir/icon.png"), Some("icon.png"));
        assert_eq!(bare.capture("/deep/dir/.png"), None);
        assert_eq!(bare.capture("icon.png"), None);
    }

    #[test]
    fn repeated_segments_capture_from_the_last_one() {
        let resolver = resolver();
        assert_eq!(
            resolver.extract_resource_path("https://host/js/lib/js/x.js").as_deref(),
            Some("js/x.js")
        );
        assert_eq!(
            resolver
                .extract_resource_path("https://host/game/v2/game/js/a.js")
                .as_deref(),
            Some("js/a.js")
        );
        assert_eq!(
            resolver
                .extract_resource_path("https://cdn/res/skins/res/hero.png")
                .as_deref(),
            Some("res/hero.png")
        );
    }

    #[test]
    fn trailing_marker_falls_back_to_earlier_one() {
        let marker = PathPattern::FromMarker("res".into());
        assert_eq!(marker.capture("/res/a/res/"), Some("res/a/res/"));
        let folder = PathPattern::AfterFolder("game".into());
        assert_eq!(folder.capture("/game/x/game/"), Some("x/game/"));
    }

    #[test]
    fn resolver_order_is_explicit() {
        let resolver = resolver();
        assert_eq!(
            resolver.patterns().first(),
            Some(&PathPattern::AfterFolder("game".into()))
        );
        assert!(matches!(resolver.patterns().last(), Some(PathPattern::BareFile(_))));
    }
}
