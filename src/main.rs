use std::{env, ffi::OsString, io, panic, path::Path};

use anyhow::{Context, Result, anyhow};
use termion::input::TermRead;
use type_editor::{
    LOG_FILE,
    editor::{Editor, Outcome},
    logger,
    screen::Screen,
    terminal::{self, Terminal},
};

fn main() -> Result<()> {
    let args: Vec<OsString> = env::args_os().collect();
    if args.len() != 2 {
        println!("Usage: type [FILE]");
        return Ok(());
    }

    if let Err(e) = logger::init(LOG_FILE) {
        eprintln!("failed to open {}: {}", LOG_FILE, e);
    }

    terminal::install_panic_hook();

    // run から戻った時点で Terminal は drop 済み (端末は復元されている)
    let path = Path::new(&args[1]);
    match panic::catch_unwind(|| run(path)) {
        Ok(result) => result,
        Err(_) => {
            let message = terminal::take_pending_panic()
                .unwrap_or_else(|| "unknown panic".to_string());
            Err(anyhow!("editor panicked: {}", message))
        }
    }
}

fn run(path: &Path) -> Result<()> {
    let mut editor = Editor::open(path);
    let mut terminal = Terminal::new().context("failed to enable raw mode")?;
    let mut keys = io::stdin().keys();

    // キー入力ループ
    loop {
        let size = terminal
            .size()
            .context("failed to query terminal size")?;
        Screen::refresh(terminal.stdout(), &mut editor, size).context("failed to draw screen")?;

        let Some(key) = keys.next() else {
            log::debug!("stdin closed");
            break;
        };
        let key = key.context("failed to read key")?;

        if editor.handle_key(key) == Outcome::Quit {
            if editor.is_dirty() {
                log::warn!("quit with unsaved changes");
            }
            break;
        }
    }

    Ok(())
}
