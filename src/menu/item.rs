use std::cell::OnceCell;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use super::builder::MenuBuilder;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MenuError {
    #[error("duplicate key '{key}' among sibling items")]
    DuplicateKey { key: String },
    #[error("menu item key must not be empty")]
    EmptyKey,
    #[error("item '{key}' has no command, sub-menu or builder")]
    EmptyAction { key: String },
    #[error("item '{key}' declares both a command and a sub-menu")]
    ConflictingAction { key: String },
    #[error("root menu '{title}' must produce a sub-menu, not a command")]
    RootNotMenu { title: String },
}

/// Whether a deferred builder runs on every entry or only the first one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CachePolicy {
    #[default]
    Rebuild,
    Once,
}

type BuildFn = dyn Fn() -> Result<Action, MenuError>;

/// A builder invoked when its item is entered, never while the parent menu
/// is being constructed.
#[derive(Clone)]
pub struct Deferred {
    build: Rc<BuildFn>,
    policy: CachePolicy,
    cache: Rc<OnceCell<Entry>>,
}

impl Deferred {
    pub fn new<F>(policy: CachePolicy, build: F) -> Self
    where
        F: Fn() -> Result<Action, MenuError> + 'static,
    {
        Self {
            build: Rc::new(build),
            policy,
            cache: Rc::new(OnceCell::new()),
        }
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    /// Runs the builder and validates its output, or returns the cached entry
    /// under [`CachePolicy::Once`]. Only a valid entry is ever cached.
    pub fn enter(&self, key: &str) -> Result<Entry, MenuError> {
        if let Some(cached) = self.cache.get() {
            return Ok(cached.clone());
        }
        tracing::debug!("materializing deferred item '{key}'");
        let entry = resolve((self.build)()?, key)?;
        if self.policy == CachePolicy::Once {
            let _ = self.cache.set(entry.clone());
        }
        Ok(entry)
    }
}

impl fmt::Debug for Deferred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred")
            .field("policy", &self.policy)
            .field("cached", &self.cache.get().is_some())
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub enum Action {
    Command(String),
    SubMenu(Vec<MenuItem>),
    Deferred(Deferred),
}

impl Action {
    pub fn command(command: impl Into<String>) -> Self {
        Action::Command(command.into())
    }

    /// Sub-menu declared through a [`MenuBuilder`], for use as a builder result.
    pub fn menu<F>(build: F) -> Result<Self, MenuError>
    where
        F: FnOnce(&mut MenuBuilder) -> Result<(), MenuError>,
    {
        MenuBuilder::build(build).map(Action::SubMenu)
    }
}

/// What entering an item yields once any deferred builder has run.
#[derive(Debug, Clone)]
pub enum Entry {
    Run(String),
    Menu(Vec<MenuItem>),
}

#[derive(Debug, Clone)]
pub struct MenuItem {
    key: String,
    description: Option<String>,
    action: Action,
}

impl MenuItem {
    pub fn leaf(
        key: impl Into<String>,
        description: Option<&str>,
        command: impl Into<String>,
    ) -> Result<Self, MenuError> {
        let key = checked_key(key.into())?;
        let command = command.into();
        if command.trim().is_empty() {
            return Err(MenuError::EmptyAction { key });
        }
        Ok(Self {
            key,
            description: description.map(str::to_string),
            action: Action::Command(command),
        })
    }

    pub fn submenu(
        key: impl Into<String>,
        description: Option<&str>,
        children: Vec<MenuItem>,
    ) -> Result<Self, MenuError> {
        let key = checked_key(key.into())?;
        ensure_unique_keys(&children)?;
        Ok(Self {
            key,
            description: description.map(str::to_string),
            action: Action::SubMenu(children),
        })
    }

    pub fn deferred<F>(
        key: impl Into<String>,
        description: Option<&str>,
        policy: CachePolicy,
        build: F,
    ) -> Result<Self, MenuError>
    where
        F: Fn() -> Result<Action, MenuError> + 'static,
    {
        let key = checked_key(key.into())?;
        Ok(Self {
            key,
            description: description.map(str::to_string),
            action: Action::Deferred(Deferred::new(policy, build)),
        })
    }

    /// Deferred sub-menu whose children are declared on a fresh [`MenuBuilder`]
    /// each time the builder runs.
    pub fn deferred_menu<F>(
        key: impl Into<String>,
        description: Option<&str>,
        policy: CachePolicy,
        build: F,
    ) -> Result<Self, MenuError>
    where
        F: Fn(&mut MenuBuilder) -> Result<(), MenuError> + 'static,
    {
        Self::deferred(key, description, policy, move || Action::menu(&build))
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn action(&self) -> &Action {
        &self.action
    }

    /// Display label: the description, else the command text, else the key.
    pub fn label(&self) -> &str {
        match (&self.description, &self.action) {
            (Some(desc), _) => desc.as_str(),
            (None, Action::Command(cmd)) => cmd.as_str(),
            (None, _) => self.key.as_str(),
        }
    }

    pub fn is_menu(&self) -> bool {
        !matches!(self.action, Action::Command(_))
    }

    /// Resolves the item's action, running deferred builders as needed.
    pub fn enter(&self) -> Result<Entry, MenuError> {
        resolve(self.action.clone(), &self.key)
    }
}

pub(crate) fn resolve(action: Action, key: &str) -> Result<Entry, MenuError> {
    match action {
        Action::Command(cmd) => {
            if cmd.trim().is_empty() {
                return Err(MenuError::EmptyAction {
                    key: key.to_string(),
                });
            }
            Ok(Entry::Run(cmd))
        }
        Action::SubMenu(children) => {
            ensure_unique_keys(&children)?;
            Ok(Entry::Menu(children))
        }
        // a builder may hand back another deferral; each resolves in turn
        Action::Deferred(deferred) => deferred.enter(key),
    }
}

fn checked_key(key: String) -> Result<String, MenuError> {
    if key.trim().is_empty() {
        Err(MenuError::EmptyKey)
    } else {
        Ok(key)
    }
}

pub fn ensure_unique_keys(items: &[MenuItem]) -> Result<(), MenuError> {
    let mut seen = HashSet::new();
    for item in items {
        if !seen.insert(item.key()) {
            return Err(MenuError::DuplicateKey {
                key: item.key().to_string(),
            });
        }
    }
    Ok(())
}

/// Entry point handed to the front end: a title plus the top-level items,
/// either fixed or produced by a deferred builder.
#[derive(Debug, Clone)]
pub struct RootMenu {
    title: String,
    action: Action,
}

impl RootMenu {
    pub fn new(title: impl Into<String>, items: Vec<MenuItem>) -> Result<Self, MenuError> {
        ensure_unique_keys(&items)?;
        Ok(Self {
            title: title.into(),
            action: Action::SubMenu(items),
        })
    }

    pub fn deferred<F>(title: impl Into<String>, policy: CachePolicy, build: F) -> Self
    where
        F: Fn(&mut MenuBuilder) -> Result<(), MenuError> + 'static,
    {
        Self {
            title: title.into(),
            action: Action::Deferred(Deferred::new(policy, move || Action::menu(&build))),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn action(&self) -> &Action {
        &self.action
    }

    /// Materializes the top-level items.
    pub fn open(&self) -> Result<Vec<MenuItem>, MenuError> {
        match resolve(self.action.clone(), &self.title)? {
            Entry::Menu(items) => Ok(items),
            Entry::Run(_) => Err(MenuError::RootNotMenu {
                title: self.title.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn counter() -> Rc<Cell<usize>> {
        Rc::new(Cell::new(0))
    }

    #[test]
    fn leaf_rejects_empty_key() {
        assert_eq!(
            MenuItem::leaf("", None, "ls").unwrap_err(),
            MenuError::EmptyKey
        );
    }

    #[test]
    fn leaf_rejects_blank_command() {
        assert_eq!(
            MenuItem::leaf("x", None, "   ").unwrap_err(),
            MenuError::EmptyAction { key: "x".into() }
        );
    }

    #[test]
    fn submenu_rejects_duplicate_children() {
        let children = vec![
            MenuItem::leaf("a", None, "one").unwrap(),
            MenuItem::leaf("a", None, "two").unwrap(),
        ];
        assert_eq!(
            MenuItem::submenu("m", None, children).unwrap_err(),
            MenuError::DuplicateKey { key: "a".into() }
        );
    }

    #[test]
    fn same_key_allowed_at_different_levels() {
        let inner = MenuItem::submenu("a", None, vec![MenuItem::leaf("a", None, "x").unwrap()]);
        assert!(inner.is_ok());
    }

    #[test]
    fn label_prefers_description_then_command_then_key() {
        let described = MenuItem::leaf("u", Some("update"), "bundle update").unwrap();
        assert_eq!(described.label(), "update");
        let bare = MenuItem::leaf("s", None, "bundle exec jekyll serve").unwrap();
        assert_eq!(bare.label(), "bundle exec jekyll serve");
        let menu = MenuItem::submenu("t", None, Vec::new()).unwrap();
        assert_eq!(menu.label(), "t");
    }

    #[test]
    fn deferred_not_invoked_on_construction() {
        let calls = counter();
        let c = calls.clone();
        let _item = MenuItem::deferred("d", None, CachePolicy::Rebuild, move || {
            c.set(c.get() + 1);
            Ok(Action::command("echo hi"))
        })
        .unwrap();
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn rebuild_policy_invokes_every_entry() {
        let calls = counter();
        let c = calls.clone();
        let item = MenuItem::deferred("d", None, CachePolicy::Rebuild, move || {
            c.set(c.get() + 1);
            Ok(Action::command("echo hi"))
        })
        .unwrap();
        item.enter().unwrap();
        item.enter().unwrap();
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn once_policy_invokes_first_entry_only() {
        let calls = counter();
        let c = calls.clone();
        let item = MenuItem::deferred("d", None, CachePolicy::Once, move || {
            c.set(c.get() + 1);
            Ok(Action::command("echo hi"))
        })
        .unwrap();
        let copy = item.clone();
        item.enter().unwrap();
        copy.enter().unwrap();
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn failed_build_is_not_cached() {
        let calls = counter();
        let c = calls.clone();
        let item = MenuItem::deferred("d", None, CachePolicy::Once, move || {
            c.set(c.get() + 1);
            if c.get() == 1 {
                Err(MenuError::EmptyKey)
            } else {
                Ok(Action::command("echo ok"))
            }
        })
        .unwrap();
        assert!(item.enter().is_err());
        assert!(matches!(item.enter().unwrap(), Entry::Run(cmd) if cmd == "echo ok"));
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn invalid_build_is_not_cached() {
        let calls = counter();
        let c = calls.clone();
        let item = MenuItem::deferred("d", None, CachePolicy::Once, move || {
            c.set(c.get() + 1);
            let mut children = vec![MenuItem::leaf("x", None, "echo x")?];
            if c.get() == 1 {
                children.push(MenuItem::leaf("x", None, "echo again")?);
            }
            Ok(Action::SubMenu(children))
        })
        .unwrap();
        assert_eq!(
            item.enter().unwrap_err(),
            MenuError::DuplicateKey { key: "x".into() }
        );
        assert!(matches!(item.enter().unwrap(), Entry::Menu(items) if items.len() == 1));
        assert!(matches!(item.enter().unwrap(), Entry::Menu(items) if items.len() == 1));
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn deferred_output_is_validated() {
        let item = MenuItem::deferred_menu("d", None, CachePolicy::Rebuild, |_m| Ok(())).unwrap();
        assert!(matches!(item.enter().unwrap(), Entry::Menu(items) if items.is_empty()));

        let dup = MenuItem::deferred("d", None, CachePolicy::Rebuild, || {
            Ok(Action::SubMenu(vec![
                MenuItem::leaf("x", None, "a")?,
                MenuItem::leaf("x", None, "b")?,
            ]))
        })
        .unwrap();
        assert_eq!(
            dup.enter().unwrap_err(),
            MenuError::DuplicateKey { key: "x".into() }
        );

        let blank = MenuItem::deferred("b", None, CachePolicy::Rebuild, || {
            Ok(Action::command(""))
        })
        .unwrap();
        assert_eq!(
            blank.enter().unwrap_err(),
            MenuError::EmptyAction { key: "b".into() }
        );
    }

    #[test]
    fn nested_deferral_resolves() {
        let item = MenuItem::deferred("d", None, CachePolicy::Rebuild, || {
            Ok(Action::Deferred(Deferred::new(CachePolicy::Rebuild, || {
                Ok(Action::command("echo nested"))
            })))
        })
        .unwrap();
        assert!(matches!(item.enter().unwrap(), Entry::Run(cmd) if cmd == "echo nested"));
    }

    #[test]
    fn root_rejects_command_builder_output() {
        let root = RootMenu {
            title: "r".into(),
            action: Action::Deferred(Deferred::new(CachePolicy::Rebuild, || {
                Ok(Action::command("ls"))
            })),
        };
        assert_eq!(
            root.open().unwrap_err(),
            MenuError::RootNotMenu { title: "r".into() }
        );
    }
}
