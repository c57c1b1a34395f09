use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    pages: HashMap<String, String>,
    configs: HashMap<String, String>,
}

/// A carousel container as laid out on a page.
#[derive(Debug, Clone, Deserialize)]
pub struct PageFixture {
    #[serde(default)]
    pub description: String,
    /// Width of the track's visible region.
    pub viewport_width: f64,
    /// `None` when the container has no track.
    pub track: Option<TrackFixture>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackFixture {
    #[serde(default)]
    pub slides: Vec<SlideFixture>,
    /// Whether the container has an indicator group.
    #[serde(default)]
    pub indicators: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SlideFixture {
    #[serde(default)]
    pub id: Option<String>,
    pub width: f64,
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn resolve_path(rel: &str) -> PathBuf {
    fixtures_root().join(rel)
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = resolve_path(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn load_json<T: DeserializeOwned>(rel: &str) -> Result<T> {
    let text = read_to_string(rel)?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse JSON fixture {rel}"))
}

fn lookup<'a, T>(map: &'a HashMap<String, T>, kind: &str, name: &str) -> Result<&'a T> {
    map.get(name)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

pub mod pages {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.pages.keys().cloned().collect()
    }

    pub fn load(name: &str) -> Result<PageFixture> {
        let rel = lookup(&MANIFEST.pages, "page", name)?;
        super::load_json(rel)
    }
}

pub mod configs {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.configs.keys().cloned().collect()
    }

    pub fn json(name: &str) -> Result<String> {
        let rel = lookup(&MANIFEST.configs, "config", name)?;
        read_to_string(rel)
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let rel = lookup(&MANIFEST.configs, "config", name)?;
        super::load_json(rel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_page_parses() {
        for name in pages::keys() {
            pages::load(&name).unwrap_or_else(|e| panic!("{name}: {e:#}"));
        }
    }

    #[test]
    fn every_config_is_json() {
        for name in configs::keys() {
            let _: serde_json::Value =
                configs::load(&name).unwrap_or_else(|e| panic!("{name}: {e:#}"));
        }
    }

    #[test]
    fn unknown_page_errors() {
        let err = pages::load("does-not-exist").unwrap_err();
        assert!(err.to_string().contains("unknown page fixture"));
    }
}
