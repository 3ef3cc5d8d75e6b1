//! Raw-mode terminal setup for the ratatui UI.

use std::io::{self, Stdout};
use std::panic;
use std::sync::Once;

use crossterm::{
    ExecutableCommand,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::debug;
use ratatui::{Terminal, backend::CrosstermBackend};

pub type ClientTerminal = Terminal<CrosstermBackend<Stdout>>;

static PANIC_HOOK: Once = Once::new();

/// Switch to the alternate screen in raw mode.
pub fn init() -> io::Result<ClientTerminal> {
    PANIC_HOOK.call_once(setup_panic_hook);
    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    debug!("Terminal switched to alternate screen");
    Terminal::new(CrosstermBackend::new(io::stdout()))
}

/// Leave the alternate screen and restore cooked mode.
pub fn restore() -> io::Result<()> {
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    debug!("Terminal restored");
    Ok(())
}

// A panic inside the UI would otherwise leave the shell in raw mode.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore();
        original_hook(panic_info);
    }));
}
