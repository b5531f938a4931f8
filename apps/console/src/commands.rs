// Keyboard commands read from stdin

use console_core::{Console, Event};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    ToggleRefresh,
    Select(String),
    Click(usize),
    Refresh,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let mut parts = line.split_whitespace();
        let Some(verb) = parts.next() else {
            return Ok(None);
        };
        let arg = parts.next();

        let cmd = match (verb, arg) {
            ("t", None) => Command::ToggleRefresh,
            ("r", None) => Command::Refresh,
            ("q", None) => Command::Quit,
            ("s", Some(id)) => Command::Select(id.to_string()),
            ("c", Some(n)) => Command::Click(
                n.parse()
                    .map_err(|_| format!("breadcrumb position must be a number, got '{n}'"))?,
            ),
            _ => return Err(format!("unknown command '{}'", line.trim())),
        };
        if parts.next().is_some() {
            return Err(format!("too many arguments in '{}'", line.trim()));
        }
        Ok(Some(cmd))
    }
}

pub const HELP: &str = "t: toggle auto refresh | r: refresh now | s <id>: select entity | c <n>: click breadcrumb | q: quit";

pub fn apply(console: &Console, cmd: Command) {
    match cmd {
        Command::ToggleRefresh => {
            let enabled = !console.activity.auto_refresh();
            if let Err(e) = console.activity.set_auto_refresh(enabled) {
                warn!(target: "console", error = %e, "Failed to toggle auto refresh");
            }
        }
        Command::Select(id) => {
            console.select_entity(id);
        }
        Command::Click(position) => {
            if let Err(e) = console.breadcrumbs.click(position) {
                warn!(target: "console", error = %e, "Click ignored");
            }
        }
        Command::Refresh => {
            let handlers = console.event_bus.publish(Event::Update);
            info!(target: "console", handlers, "Manual refresh");
        }
        Command::Quit => {}
    }
}
