use super::item::{Action, MenuError, MenuItem, RootMenu};
use std::fmt::Write;

const INDENT: &str = "  ";

/// Text outline of the root menu. The root builder runs; nested deferred
/// items are listed but not built.
pub fn render_root(root: &RootMenu) -> Result<String, MenuError> {
    let items = root.open()?;
    let mut out = String::new();
    let _ = writeln!(out, "{}", root.title());
    render_items(&mut out, &items, 1);
    Ok(out)
}

pub fn render(items: &[MenuItem]) -> String {
    let mut out = String::new();
    render_items(&mut out, items, 0);
    out
}

fn render_items(out: &mut String, items: &[MenuItem], depth: usize) {
    let pad = INDENT.repeat(depth);
    for item in items {
        match item.action() {
            Action::Command(cmd) => {
                if item.description().is_some() {
                    let _ = writeln!(out, "{pad}[{}] {}: {cmd}", item.key(), item.label());
                } else {
                    let _ = writeln!(out, "{pad}[{}] {cmd}", item.key());
                }
            }
            Action::SubMenu(children) => {
                let _ = writeln!(out, "{pad}[{}] {}/", item.key(), item.label());
                render_items(out, children, depth + 1);
            }
            Action::Deferred(_) => {
                let _ = writeln!(out, "{pad}[{}] {}/ ...", item.key(), item.label());
            }
        }
    }
}
