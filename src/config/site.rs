// src/config/site.rs
//! Which organization and which apps the site shows.
//!
//! Lookup order:
//! 1) $SITE_CONFIG_PATH (must exist)
//! 2) config/site.toml
//! 3) built-in defaults

use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_SITE_CONFIG_PATH: &str = "SITE_CONFIG_PATH";
pub const DEFAULT_SITE_CONFIG_PATH: &str = "config/site.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SiteConfig {
    pub org: String,
    #[serde(default, rename = "app")]
    pub apps: Vec<AppEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppEntry {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub website_url: String,
    pub repo: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            org: "CodeClimbersIO".to_string(),
            apps: vec![
                AppEntry {
                    title: "Ebb".to_string(),
                    description: "Take your focus to the next level on macOS.".to_string(),
                    website_url: "https://ebb.cool".to_string(),
                    repo: "ebb-app".to_string(),
                },
                AppEntry {
                    title: "CodeClimbers CLI".to_string(),
                    description: "Track your time as a background process.".to_string(),
                    website_url: "https://local.codeclimbers.io/install".to_string(),
                    repo: "cli".to_string(),
                },
            ],
        }
    }
}

impl SiteConfig {
    /// Repository names of every app, in display order.
    pub fn repos(&self) -> Vec<String> {
        self.apps.iter().map(|a| a.repo.clone()).collect()
    }
}

pub fn load_site_config_from(path: &Path) -> Result<SiteConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading site config from {}", path.display()))?;
    parse_site_config(&content).with_context(|| format!("parsing {}", path.display()))
}

pub fn load_site_config_default() -> Result<SiteConfig> {
    if let Ok(p) = std::env::var(ENV_SITE_CONFIG_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_site_config_from(&pb);
        }
        return Err(anyhow!("SITE_CONFIG_PATH points to non-existent path"));
    }
    let default_p = PathBuf::from(DEFAULT_SITE_CONFIG_PATH);
    if default_p.exists() {
        return load_site_config_from(&default_p);
    }
    Ok(SiteConfig::default())
}

fn parse_site_config(s: &str) -> Result<SiteConfig> {
    let mut cfg: SiteConfig = toml::from_str(s)?;
    cfg.org = cfg.org.trim().to_string();
    if cfg.org.is_empty() {
        bail!("`org` must not be empty");
    }
    for app in &mut cfg.apps {
        app.repo = app.repo.trim().to_string();
        if app.repo.is_empty() {
            bail!("app `{}` has an empty `repo`", app.title);
        }
    }
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    const SAMPLE: &str = r#"
org = " CodeClimbersIO "

[[app]]
title = "Ebb"
description = "Focus"
website_url = "https://ebb.cool"
repo = "ebb-app"

[[app]]
title = "CLI"
repo = "cli"
"#;

    #[test]
    fn parses_org_and_apps_in_order() {
        let cfg = parse_site_config(SAMPLE).unwrap();
        assert_eq!(cfg.org, "CodeClimbersIO");
        assert_eq!(cfg.repos(), vec!["ebb-app".to_string(), "cli".to_string()]);
        assert_eq!(cfg.apps[1].website_url, "");
    }

    #[test]
    fn rejects_blank_org_and_repo() {
        assert!(parse_site_config(r#"org = "  ""#).is_err());
        let blank_repo = "org = \"x\"\n[[app]]\ntitle = \"t\"\nrepo = \" \"\n";
        assert!(parse_site_config(blank_repo).is_err());
    }

    #[test]
    fn defaults_match_the_published_apps() {
        let cfg = SiteConfig::default();
        assert_eq!(cfg.org, "CodeClimbersIO");
        assert_eq!(cfg.repos(), vec!["ebb-app".to_string(), "cli".to_string()]);
    }

    #[serial]
    #[test]
    fn env_path_wins_and_must_exist() {
        let tmp = tempfile::tempdir().unwrap();
        let p = tmp.path().join("site.toml");
        fs::write(&p, "org = \"acme\"\n").unwrap();

        env::set_var(ENV_SITE_CONFIG_PATH, p.display().to_string());
        let cfg = load_site_config_default().unwrap();
        assert_eq!(cfg.org, "acme");
        assert!(cfg.apps.is_empty());

        env::set_var(ENV_SITE_CONFIG_PATH, tmp.path().join("missing.toml"));
        assert!(load_site_config_default().is_err());
        env::remove_var(ENV_SITE_CONFIG_PATH);
    }
}
