//! Built-in menu for working on the julienmoumne.github.io Jekyll site.

use crate::menu::{CachePolicy, RootMenu};
use crate::platform::{resolve_command, PlatformInfo};

pub const TITLE: &str = "julienmoumne.github.io";
pub const LOCAL_URL: &str = "http://127.0.0.1:4000/";

pub fn menu(platform: PlatformInfo, policy: CachePolicy) -> RootMenu {
    RootMenu::deferred(TITLE, policy, move |m| {
        let browser = resolve_command(platform, "sensible-browser", "open");

        m.leaf("s", None, "bundle exec jekyll serve --trace")?;
        m.leaf("u", Some("update GitHub Pages gem"), "bundle update")?;
        m.leaf("o", Some("open"), format!("{browser} {LOCAL_URL}"))?;
        Ok(())
    })
}
