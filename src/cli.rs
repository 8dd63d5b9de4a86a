use clap::Parser;
use std::path::PathBuf;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "+", env!("BUILD_NUMBER"));

#[derive(Parser, Debug)]
#[command(name = "hotmenu", version = VERSION, about = "Hotkey-driven shell command menu")]
pub struct Cli {
    /// Menu file (defaults to ./hotmenu.json, then ~/.hotmenu/hotmenu.json)
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Working directory for menu commands
    #[arg(short = 'C', long)]
    pub chdir: Option<PathBuf>,

    /// Build deferred sub-menus once and reuse them
    #[arg(long)]
    pub cache_submenus: bool,

    /// Print the menu outline and exit
    #[arg(long, conflicts_with = "select")]
    pub print: bool,

    /// Walk the menu with these keys (space separated) and print the command
    #[arg(long, value_name = "KEYS")]
    pub select: Option<String>,

    /// Write debug logs to $XDG_STATE_HOME/hotmenu/debug.log
    #[arg(short, long)]
    pub verbose: bool,
}
