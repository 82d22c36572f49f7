use std::{
    fs::File,
    io::{self, Read},
};

use super::{
    bundle::AssetBundle,
    mime::resolve_mime,
    path::PathResolver,
    rules::InterceptRule,
};

// Set to true to enable per-request logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_error};

pub const RESPONSE_ENCODING: &str = "UTF-8";

/// Bundled assets never change while the app runs.
pub const RESPONSE_HEADERS: [(&str, &str); 4] = [
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "GET, POST, OPTIONS"),
    ("Access-Control-Allow-Headers", "*"),
    ("Cache-Control", "max-age=31536000"),
];

/// A request answered from the bundle. Built per request and handed
/// straight to the content surface; nothing is cached here.
#[derive(Debug)]
pub struct AssetRecord {
    pub path: String,
    pub mime_type: &'static str,
    pub encoding: &'static str,
    pub headers: Vec<(String, String)>,
    pub body: File,
}

impl AssetRecord {
    pub fn into_bytes(mut self) -> io::Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.body.read_to_end(&mut bytes)?;
        Ok(bytes)
    }
}

/// Hook run once per outgoing request of the content surface.
///
/// Holds only immutable configuration, so one instance can be shared across
/// whatever threads the surface issues requests from.
#[derive(Debug, Clone)]
pub struct OfflineInterceptor {
    rule: InterceptRule,
    resolver: PathResolver,
    bundle: AssetBundle,
}

impl OfflineInterceptor {
    pub fn new(rule: InterceptRule, bundle: AssetBundle) -> Self {
        let resolver = PathResolver::from_rule(&rule);
        Self {
            rule,
            resolver,
            bundle,
        }
    }

    pub fn should_intercept(&self, url: &str) -> bool {
        self.rule.should_intercept(url)
    }

    pub fn extract_resource_path(&self, url: &str) -> Option<String> {
        self.resolver.extract_resource_path(url)
    }

    /// `Some` serves the bundled asset; `None` lets the request go to the network.
    ///
    /// Misses and I/O failures both end in `None`: the recognized URL space
    /// is wider than what is actually bundled.
    pub fn intercept(&self, url: &str) -> Option<AssetRecord> {
        if !self.should_intercept(url) {
            return None;
        }

        let path = self.extract_resource_path(url)?;

        match self.bundle.open(&path) {
            Ok(Some(body)) => {
                let mime_type = resolve_mime(&path);
                log_debug!("serving offline resource {} ({})", path, mime_type);
                Some(AssetRecord {
                    path,
                    mime_type,
                    encoding: RESPONSE_ENCODING,
                    headers: RESPONSE_HEADERS
                        .iter()
                        .map(|(name, value)| (name.to_string(), value.to_string()))
                        .collect(),
                    body,
                })
            }
            Ok(None) => {
                log_debug!("resource not bundled: {}", path);
                None
            }
            Err(err) => {
                log_error!("failed to open bundled resource for {}: {}", url, err);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn bundle_with(files: &[(&str, &[u8])]) -> (tempfile::TempDir, OfflineInterceptor) {
        let dir = tempfile::tempdir().expect("tempdir");
        for (path, body) in files {
            let full = dir.path().join(path);
            if let Some(parent) = full.parent() {
                fs::create_dir_all(parent).expect("mkdir");
            }
            fs::write(full, body).expect("write");
        }
        let interceptor =
            OfflineInterceptor::new(InterceptRule::default(), AssetBundle::new(dir.path()));
        (dir, interceptor)
    }

    #[test]
    fn serves_bundled_script_with_headers() {
        let (_dir, interceptor) = bundle_with(&[("js/main.js", b"main()".as_slice())]);

        let record = interceptor
            .intercept("https://host/game/js/main.js?v=12")
            .expect("bundled asset");
        assert_eq!(record.path, "js/main.js");
        assert_eq!(record.mime_type, "application/javascript");
        assert_eq!(record.encoding, "UTF-8");
        assert!(record
            .headers
            .iter()
            .any(|(name, value)| name == "Access-Control-Allow-Origin" && value == "*"));
        assert!(record
            .headers
            .iter()
            .any(|(name, value)| name == "Cache-Control" && value == "max-age=31536000"));
        assert_eq!(record.into_bytes().expect("read"), b"main()");
    }

    #[test]
    fn rejected_urls_never_touch_the_bundle() {
        let (_dir, interceptor) = bundle_with(&[("api/v1/login", b"nope".as_slice())]);
        assert!(interceptor.intercept("https://host/api/v1/login").is_none());
    }

    #[test]
    fn missing_asset_falls_through() {
        let (_dir, interceptor) = bundle_with(&[]);
        let url = "https://host/res/sprites/hero.png";
        assert!(interceptor.should_intercept(url));
        assert_eq!(
            interceptor.extract_resource_path(url).as_deref(),
            Some("res/sprites/hero.png")
        );
        assert!(interceptor.intercept(url).is_none());
    }

    #[test]
    fn traversal_is_treated_as_missing() {
        let (_dir, interceptor) = bundle_with(&[]);
        assert!(interceptor
            .intercept("https://host/res/../../../etc/hosts.txt")
            .is_none());
    }

    #[test]
    fn io_failure_is_treated_as_missing() {
        let (dir, interceptor) = bundle_with(&[("js/main.js", b"main()".as_slice())]);
        let url = "https://h/js/main.js/x.js";

        assert_eq!(
            interceptor.extract_resource_path(url).as_deref(),
            Some("js/main.js/x.js")
        );
        // a regular file sits where a directory is expected
        assert!(AssetBundle::new(dir.path()).open("js/main.js/x.js").is_err());
        assert!(interceptor.intercept(url).is_none());
    }

    #[test]
    fn repeated_calls_agree() {
        let (_dir, interceptor) = bundle_with(&[("res/ui/panel.png", b"\x89PNG".as_slice())]);
        let url = "https://host/res/ui/panel.png";
        let first = interceptor.intercept(url).map(|r| (r.path, r.mime_type));
        let second = interceptor.intercept(url).map(|r| (r.path, r.mime_type));
        assert_eq!(first, second);
        assert!(first.is_some());
    }

    #[test]
    fn concurrent_intercepts_share_one_instance() {
        let (_dir, interceptor) = bundle_with(&[("libs/laya.js", b"laya".as_slice())]);
        let interceptor = std::sync::Arc::new(interceptor);

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let interceptor = interceptor.clone();
                std::thread::spawn(move || {
                    interceptor
                        .intercept("https://host/libs/laya.js")
                        .map(|record| record.mime_type)
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().expect("join"), Some("application/javascript"));
        }
    }
}
