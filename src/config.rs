//! JSON menu files.
//!
//! ```json
//! {
//!   "title": "my site",
//!   "items": [
//!     { "key": "s", "cmd": "bundle exec jekyll serve --trace" },
//!     { "key": "o", "desc": "open",
//!       "cmd": { "linux": "sensible-browser http://127.0.0.1:4000/",
//!                "other": "open http://127.0.0.1:4000/" } },
//!     { "key": "t", "desc": "tools", "lazy": true, "items": [] }
//!   ]
//! }
//! ```

use crate::menu::{Action, CachePolicy, MenuBuilder, MenuError, MenuItem, RootMenu};
use crate::platform::{resolve_command, PlatformInfo};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const FILE_NAME: &str = "hotmenu.json";
pub const HOME_DIR: &str = ".hotmenu";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid menu file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Menu(#[from] MenuError),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MenuFile {
    pub title: String,
    #[serde(default)]
    pub items: Vec<ItemSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ItemSpec {
    pub key: String,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub cmd: Option<CommandSpec>,
    #[serde(default)]
    pub items: Option<Vec<ItemSpec>>,
    /// Build this item only when it is entered.
    #[serde(default)]
    pub lazy: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CommandSpec {
    Plain(String),
    PerPlatform { linux: String, other: String },
}

impl CommandSpec {
    pub fn resolve(&self, platform: PlatformInfo) -> &str {
        match self {
            CommandSpec::Plain(cmd) => cmd.as_str(),
            CommandSpec::PerPlatform { linux, other } => resolve_command(platform, linux, other),
        }
    }
}

impl MenuFile {
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Eager sub-menus are validated here; lazy ones when first entered.
    pub fn into_root(
        self,
        platform: PlatformInfo,
        policy: CachePolicy,
    ) -> Result<RootMenu, MenuError> {
        let items = build_items(&self.items, platform, policy)?;
        RootMenu::new(self.title, items)
    }
}

fn build_items(
    specs: &[ItemSpec],
    platform: PlatformInfo,
    policy: CachePolicy,
) -> Result<Vec<MenuItem>, MenuError> {
    let mut builder = MenuBuilder::new();
    for spec in specs {
        builder.push(build_item(spec, platform, policy)?)?;
    }
    Ok(builder.finish())
}

fn build_item(
    spec: &ItemSpec,
    platform: PlatformInfo,
    policy: CachePolicy,
) -> Result<MenuItem, MenuError> {
    let desc = spec.desc.as_deref();
    match (&spec.cmd, &spec.items) {
        (Some(_), Some(_)) => Err(MenuError::ConflictingAction {
            key: spec.key.clone(),
        }),
        (None, None) => Err(MenuError::EmptyAction {
            key: spec.key.clone(),
        }),
        (Some(cmd), None) => {
            let cmd = cmd.resolve(platform).to_string();
            if spec.lazy {
                MenuItem::deferred(&spec.key, desc, policy, move || {
                    Ok(Action::command(cmd.clone()))
                })
            } else {
                MenuItem::leaf(&spec.key, desc, cmd)
            }
        }
        (None, Some(children)) => {
            if spec.lazy {
                let children = children.clone();
                MenuItem::deferred(&spec.key, desc, policy, move || {
                    build_items(&children, platform, policy).map(Action::SubMenu)
                })
            } else {
                MenuItem::submenu(&spec.key, desc, build_items(children, platform, policy)?)
            }
        }
    }
}

/// `./hotmenu.json`, then `~/.hotmenu/hotmenu.json`.
pub fn default_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(FILE_NAME)];
    if let Some(home) = std::env::var_os("HOME") {
        paths.push(PathBuf::from(home).join(HOME_DIR).join(FILE_NAME));
    }
    paths
}

/// The explicit path if given, else the first default location that exists.
pub fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => default_paths().into_iter().find(|p| p.is_file()),
    }
}

pub fn load(
    path: &Path,
    platform: PlatformInfo,
    policy: CachePolicy,
) -> Result<RootMenu, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file = MenuFile::parse(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!("loaded menu '{}' from {}", file.title, path.display());
    Ok(file.into_root(platform, policy)?)
}
