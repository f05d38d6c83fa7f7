use std::io::{self, Stdout, Write};
use std::panic;
use std::sync::Mutex;
use std::sync::Once;
use std::sync::atomic::{AtomicBool, Ordering};

use termion::raw::{IntoRawMode, RawTerminal};

static RAW_MODE: AtomicBool = AtomicBool::new(false);

/// raw mode 中に起きた panic のメッセージ
static PENDING_PANIC: Mutex<Option<String>> = Mutex::new(None);

/// raw mode の端末
///
/// drop 時に画面をクリアし、`RawTerminal` が元の端末設定を復元する。
/// 通常終了、エラーによる早期 return、panic のいずれでも drop は走る
pub struct Terminal {
    stdout: RawTerminal<Stdout>,
}

impl Terminal {
    pub fn new() -> io::Result<Self> {
        let stdout = io::stdout().into_raw_mode()?;
        RAW_MODE.store(true, Ordering::SeqCst);
        log::debug!("raw mode enabled");
        Ok(Self { stdout })
    }

    pub fn stdout(&mut self) -> &mut RawTerminal<Stdout> {
        &mut self.stdout
    }

    /// (cols, rows)
    pub fn size(&self) -> io::Result<(u16, u16)> {
        termion::terminal_size()
    }

    pub fn clear_screen(&mut self) -> io::Result<()> {
        write!(
            self.stdout,
            "{}{}{}{}",
            termion::clear::All,
            termion::cursor::Goto(1, 1),
            termion::cursor::SteadyBlock,
            termion::cursor::Show
        )?;
        self.stdout.flush()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        // 終了時の画面クリア
        let _ = self.clear_screen();
        RAW_MODE.store(false, Ordering::SeqCst);
        log::debug!("restoring terminal");
    }
}

/// panic hook を登録する
///
/// raw mode 中の panic はその場では出力せず、メッセージを保持する。
/// 端末の復元後に `take_pending_panic` で取り出す
pub fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            log::error!("panic: {}", info);
            if !RAW_MODE.load(Ordering::SeqCst) {
                default_panic(info);
                return;
            }
            if let Ok(mut pending) = PENDING_PANIC.lock() {
                *pending = Some(info.to_string());
            }
        }));
    });
}

pub fn take_pending_panic() -> Option<String> {
    PENDING_PANIC.lock().ok().and_then(|mut pending| pending.take())
}
