// src/watch/patterns.rs

use std::fmt;

use anyhow::{Context, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

use crate::config::WatchSection;

/// Compiled watch/exclude glob patterns.
///
/// Patterns are relative to the project root, and `*` does not match `/`:
/// `*.elm` tracks `Main.elm` but not `src/Page.elm`. Use `**/*.elm` for a
/// whole tree.
#[derive(Clone)]
pub struct WatchProfile {
    patterns: Vec<String>,
    watch_set: GlobSet,
    exclude_set: Option<GlobSet>,
}

impl fmt::Debug for WatchProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchProfile")
            .field("patterns", &self.patterns)
            .finish_non_exhaustive()
    }
}

impl WatchProfile {
    pub fn new(watch: &[String], exclude: &[String]) -> Result<Self> {
        let watch_set = build_globset(watch).context("building watch globset")?;
        let exclude_set = if exclude.is_empty() {
            None
        } else {
            Some(build_globset(exclude).context("building exclude globset")?)
        };

        Ok(Self {
            patterns: watch.to_vec(),
            watch_set,
            exclude_set,
        })
    }

    pub fn from_config(watch: &WatchSection) -> Result<Self> {
        Self::new(&watch.patterns, &watch.exclude)
    }

    /// Returns true if a change to `rel_path` (relative to the project
    /// root, forward slashes) should trigger a compile.
    pub fn matches(&self, rel_path: &str) -> bool {
        if !self.watch_set.is_match(rel_path) {
            return false;
        }
        if let Some(exclude) = &self.exclude_set {
            if exclude.is_match(rel_path) {
                return false;
            }
        }
        true
    }
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = GlobBuilder::new(pat)
            .literal_separator(true)
            .build()
            .with_context(|| format!("invalid glob pattern: {pat}"))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn star_does_not_cross_directories() {
        let profile = WatchProfile::new(&strings(&["*.elm"]), &[]).unwrap();
        assert!(profile.matches("Main.elm"));
        assert!(profile.matches("Helpers.elm"));
        assert!(!profile.matches("src/Page.elm"));
        assert!(!profile.matches("main.js"));
        assert!(!profile.matches("elm-stuff/elmpipe/Main.js"));
    }

    #[test]
    fn exclude_wins_over_watch() {
        let profile =
            WatchProfile::new(&strings(&["**/*.elm"]), &strings(&["elm-stuff/**"])).unwrap();
        assert!(profile.matches("src/Page.elm"));
        assert!(!profile.matches("elm-stuff/packages/Foo.elm"));
    }
}
