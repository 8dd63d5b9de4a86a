use super::item::{Entry, MenuError, MenuItem, RootMenu};

/// One materialized menu on the navigation stack.
#[derive(Debug, Clone)]
pub struct Level {
    pub title: String,
    pub items: Vec<MenuItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// A leaf was chosen; the command is handed to the shell runner.
    Run(String),
    /// A sub-menu was entered and is now current.
    Entered,
    Unknown,
}

/// Walks a menu tree on behalf of the front end.
#[derive(Debug)]
pub struct Session {
    levels: Vec<Level>,
}

impl Session {
    pub fn open(root: &RootMenu) -> Result<Self, MenuError> {
        let items = root.open()?;
        Ok(Self {
            levels: vec![Level {
                title: root.title().to_string(),
                items,
            }],
        })
    }

    pub fn current(&self) -> &Level {
        // levels is never empty: open() seeds the root and back() keeps it
        &self.levels[self.levels.len() - 1]
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.current().items
    }

    pub fn find(&self, key: &str) -> Option<&MenuItem> {
        self.items().iter().find(|i| i.key() == key)
    }

    /// True if some item in the current menu has a key starting with `prefix`.
    pub fn matches_prefix(&self, prefix: &str) -> bool {
        !prefix.is_empty() && self.items().iter().any(|i| i.key().starts_with(prefix))
    }

    pub fn select(&mut self, key: &str) -> Result<Selection, MenuError> {
        match self.items().iter().position(|i| i.key() == key) {
            Some(index) => self.activate(index),
            None => Ok(Selection::Unknown),
        }
    }

    pub fn activate(&mut self, index: usize) -> Result<Selection, MenuError> {
        let Some(item) = self.items().get(index) else {
            return Ok(Selection::Unknown);
        };
        let title = item.label().to_string();
        match item.enter()? {
            Entry::Run(command) => {
                tracing::debug!("selected '{}': {command}", item.key());
                Ok(Selection::Run(command))
            }
            Entry::Menu(items) => {
                tracing::debug!("entered '{title}' ({} items)", items.len());
                self.levels.push(Level { title, items });
                Ok(Selection::Entered)
            }
        }
    }

    /// Pops one level. Returns false when already at the root.
    pub fn back(&mut self) -> bool {
        if self.levels.len() > 1 {
            self.levels.pop();
            true
        } else {
            false
        }
    }

    pub fn depth(&self) -> usize {
        self.levels.len() - 1
    }

    pub fn breadcrumb(&self) -> Vec<&str> {
        self.levels.iter().map(|l| l.title.as_str()).collect()
    }

    /// Selects each key in turn, stopping at the first command or unknown key.
    pub fn walk<S: AsRef<str>>(&mut self, keys: &[S]) -> Result<Selection, MenuError> {
        let mut last = Selection::Entered;
        for key in keys {
            last = self.select(key.as_ref())?;
            if last != Selection::Entered {
                break;
            }
        }
        Ok(last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::{Action, CachePolicy};
    use pretty_assertions::assert_eq;
    use std::cell::Cell;
    use std::rc::Rc;

    fn sample() -> RootMenu {
        RootMenu::deferred("root", CachePolicy::Rebuild, |m| {
            m.leaf("s", None, "serve")?;
            m.submenu("t", Some("tools"), |t| {
                t.leaf("l", None, "ls -la")?;
                Ok(())
            })?;
            m.deferred("d", None, CachePolicy::Rebuild, || {
                Action::menu(|d| {
                    d.leaf("x", None, "echo deferred")?;
                    Ok(())
                })
            })?;
            m.leaf("gs", Some("git status"), "git status")?;
            Ok(())
        })
    }

    #[test]
    fn select_leaf_returns_command() {
        let mut s = Session::open(&sample()).unwrap();
        assert_eq!(s.select("s").unwrap(), Selection::Run("serve".into()));
        assert_eq!(s.depth(), 0);
    }

    #[test]
    fn enter_and_leave_submenu() {
        let mut s = Session::open(&sample()).unwrap();
        assert_eq!(s.select("t").unwrap(), Selection::Entered);
        assert_eq!(s.breadcrumb(), vec!["root", "tools"]);
        assert_eq!(s.select("l").unwrap(), Selection::Run("ls -la".into()));
        assert!(s.back());
        assert!(!s.back());
        assert_eq!(s.depth(), 0);
    }

    #[test]
    fn unknown_key() {
        let mut s = Session::open(&sample()).unwrap();
        assert_eq!(s.select("z").unwrap(), Selection::Unknown);
        assert_eq!(s.activate(99).unwrap(), Selection::Unknown);
    }

    #[test]
    fn walk_through_deferred() {
        let mut s = Session::open(&sample()).unwrap();
        assert_eq!(
            s.walk(&["d", "x"]).unwrap(),
            Selection::Run("echo deferred".into())
        );
    }

    #[test]
    fn walk_stops_at_first_command() {
        let mut s = Session::open(&sample()).unwrap();
        assert_eq!(s.walk(&["s", "t"]).unwrap(), Selection::Run("serve".into()));
        assert_eq!(s.depth(), 0);
    }

    #[test]
    fn prefix_matching_for_multi_char_keys() {
        let s = Session::open(&sample()).unwrap();
        assert!(s.matches_prefix("g"));
        assert!(s.matches_prefix("gs"));
        assert!(!s.matches_prefix("gx"));
        assert!(!s.matches_prefix(""));
    }

    #[test]
    fn reentering_rebuilds_by_default() {
        let calls = Rc::new(Cell::new(0));
        let c = calls.clone();
        let root = RootMenu::new(
            "r",
            vec![MenuItem::deferred_menu("d", None, CachePolicy::Rebuild, move |m| {
                c.set(c.get() + 1);
                m.leaf("x", None, "x")?;
                Ok(())
            })
            .unwrap()],
        )
        .unwrap();
        let mut s = Session::open(&root).unwrap();
        assert_eq!(calls.get(), 0);
        s.select("d").unwrap();
        s.back();
        s.select("d").unwrap();
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn reentering_reuses_cached_menu() {
        let calls = Rc::new(Cell::new(0));
        let c = calls.clone();
        let root = RootMenu::new(
            "r",
            vec![MenuItem::deferred_menu("d", None, CachePolicy::Once, move |m| {
                c.set(c.get() + 1);
                m.leaf("x", None, "x")?;
                Ok(())
            })
            .unwrap()],
        )
        .unwrap();
        let mut s = Session::open(&root).unwrap();
        s.select("d").unwrap();
        s.back();
        s.select("d").unwrap();
        assert_eq!(calls.get(), 1);
    }
}
