//! Menu tree model: keyed items whose action is a shell command, a nested
//! sub-menu, or a builder deferred until the item is entered.

pub mod builder;
pub mod item;
pub mod outline;
pub mod session;

pub use builder::MenuBuilder;
pub use item::{
    ensure_unique_keys, Action, CachePolicy, Deferred, Entry, MenuError, MenuItem, RootMenu,
};
pub use session::{Level, Selection, Session};
