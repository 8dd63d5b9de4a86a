use super::item::{Action, CachePolicy, MenuError, MenuItem};

/// Collects an ordered list of sibling items, rejecting duplicate keys as
/// soon as they are declared.
#[derive(Debug, Default)]
pub struct MenuBuilder {
    items: Vec<MenuItem>,
}

impl MenuBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `declare` against a fresh builder and returns the items it added.
    pub fn build<F>(declare: F) -> Result<Vec<MenuItem>, MenuError>
    where
        F: FnOnce(&mut MenuBuilder) -> Result<(), MenuError>,
    {
        let mut builder = Self::new();
        declare(&mut builder)?;
        Ok(builder.finish())
    }

    pub fn push(&mut self, item: MenuItem) -> Result<&mut Self, MenuError> {
        if self.items.iter().any(|i| i.key() == item.key()) {
            return Err(MenuError::DuplicateKey {
                key: item.key().to_string(),
            });
        }
        self.items.push(item);
        Ok(self)
    }

    pub fn leaf(
        &mut self,
        key: impl Into<String>,
        description: Option<&str>,
        command: impl Into<String>,
    ) -> Result<&mut Self, MenuError> {
        self.push(MenuItem::leaf(key, description, command)?)
    }

    /// Eager sub-menu: `declare` runs now, against its own sibling scope.
    pub fn submenu<F>(
        &mut self,
        key: impl Into<String>,
        description: Option<&str>,
        declare: F,
    ) -> Result<&mut Self, MenuError>
    where
        F: FnOnce(&mut MenuBuilder) -> Result<(), MenuError>,
    {
        let children = Self::build(declare)?;
        self.push(MenuItem::submenu(key, description, children)?)
    }

    pub fn deferred<F>(
        &mut self,
        key: impl Into<String>,
        description: Option<&str>,
        policy: CachePolicy,
        build: F,
    ) -> Result<&mut Self, MenuError>
    where
        F: Fn() -> Result<Action, MenuError> + 'static,
    {
        self.push(MenuItem::deferred(key, description, policy, build)?)
    }

    pub fn deferred_menu<F>(
        &mut self,
        key: impl Into<String>,
        description: Option<&str>,
        policy: CachePolicy,
        declare: F,
    ) -> Result<&mut Self, MenuError>
    where
        F: Fn(&mut MenuBuilder) -> Result<(), MenuError> + 'static,
    {
        self.push(MenuItem::deferred_menu(key, description, policy, declare)?)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn finish(self) -> Vec<MenuItem> {
        self.items
    }
}
