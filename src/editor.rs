use std::{
    io,
    path::{Path, PathBuf},
};

use termion::event::Key;

use crate::{
    buffer::Buffer, byte_buffer::ByteBuffer, command::Command, cursor::Cursor, file_io::FileIO,
    mode::Mode,
};

/// キー入力を処理した結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    /// エディタを終了する
    Quit,
}

pub struct Editor {
    buffer: Buffer,
    cursor: Cursor,
    mode: Mode,
    /// `:` 以降に入力された文字列 (`:` は含まない)
    command_buffer: ByteBuffer,
    path: Option<PathBuf>,
    /// ステータスラインに一時的に表示するメッセージ
    status_message: Option<String>,
    /// 未保存の変更があるか
    dirty: bool,
    /// 行末で `a` を押して列が進まなかった
    ///
    /// この状態で何も編集せずに Esc した場合はカーソルを戻さない
    clamped_append: bool,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    pub fn new() -> Self {
        Self::from_buffer(Buffer::new(), None)
    }

    pub fn from_buffer(buffer: Buffer, path: Option<PathBuf>) -> Self {
        let cursor = Cursor::at_end(&buffer);
        Self {
            buffer,
            cursor,
            mode: Mode::Normal,
            command_buffer: ByteBuffer::new(),
            path,
            status_message: None,
            dirty: false,
            clamped_append: false,
        }
    }

    /// ファイルを開く
    ///
    /// 読み込みに失敗しても終了はせず、空のバッファで起動する
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        match FileIO::open(&path) {
            Ok(buffer) => {
                log::debug!("opened {} ({} lines)", path.display(), buffer.len());
                Self::from_buffer(buffer, Some(path))
            }
            Err(e) => {
                log::warn!("failed to open {}: {}", path.display(), e);
                let message = if e.kind() == io::ErrorKind::NotFound {
                    format!("\"{}\" [New File]", path.display())
                } else {
                    format!("E: {}: {}", path.display(), e)
                };
                let mut editor = Self::from_buffer(Buffer::new(), Some(path));
                editor.status_message = Some(message);
                editor
            }
        }
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn command_buffer(&self) -> &[u8] {
        self.command_buffer.as_bytes()
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// カーソルが表示領域に入るようにスクロールする
    pub fn scroll(&mut self, text_rows: usize, text_cols: usize) {
        self.cursor.scroll(text_rows, text_cols);
    }

    fn current_line_len(&self) -> usize {
        self.buffer.line_len(self.cursor.row())
    }

    /// キー入力を 1 つ処理する
    pub fn handle_key(&mut self, key: Key) -> Outcome {
        // メッセージは次のキー入力まで表示する
        self.status_message = None;

        match self.mode {
            Mode::Normal => self.handle_normal(key),
            Mode::Insert => self.handle_insert(key),
            Mode::Command => self.handle_command(key),
        }
    }

    fn handle_normal(&mut self, key: Key) -> Outcome {
        match key {
            Key::Ctrl('q') => return Outcome::Quit,
            Key::Char('i') => {
                self.clamped_append = false;
                self.set_mode(Mode::Insert);
            }
            Key::Char('a') => {
                let line_len = self.current_line_len();
                self.clamped_append = self.cursor.col() >= line_len;
                self.cursor.move_right(line_len);
                self.set_mode(Mode::Insert);
            }
            Key::Char(':') => {
                self.command_buffer.clear();
                self.set_mode(Mode::Command);
            }
            // vim キーバインド
            Key::Char('h') => self.cursor.move_left(),
            Key::Char('j') => self.cursor.move_down(&self.buffer),
            Key::Char('k') => self.cursor.move_up(&self.buffer),
            Key::Char('l') => {
                let line_len = self.current_line_len();
                self.cursor.move_right(line_len);
            }
            _ => {}
        }
        Outcome::Continue
    }

    fn handle_insert(&mut self, key: Key) -> Outcome {
        match key {
            Key::Esc => {
                // 最後に入力した文字の上に戻る
                if !self.clamped_append {
                    self.cursor.move_left();
                }
                self.clamped_append = false;
                self.set_mode(Mode::Normal);
            }
            Key::Char('\n') => self.insert_newline(),
            Key::Backspace | Key::Ctrl('h') => self.delete_char_before_cursor(),
            Key::Char(ch) if ch == '\t' || !ch.is_control() => self.insert_char(ch),
            _ => {}
        }
        Outcome::Continue
    }

    fn handle_command(&mut self, key: Key) -> Outcome {
        match key {
            Key::Char('\n') => {
                let outcome = self.execute_command();
                self.command_buffer.clear();
                self.set_mode(Mode::Normal);
                return outcome;
            }
            Key::Esc => {
                // コマンドモードをキャンセル
                self.command_buffer.clear();
                self.set_mode(Mode::Normal);
            }
            Key::Backspace | Key::Ctrl('h') => {
                self.command_buffer.pop();
            }
            Key::Char(ch) => {
                let mut encoded = [0; 4];
                if let Err(e) = self
                    .command_buffer
                    .append(ch.encode_utf8(&mut encoded).as_bytes())
                {
                    log::error!("dropped command input {:?}: {}", ch, e);
                }
            }
            _ => {}
        }
        Outcome::Continue
    }

    fn set_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            log::debug!("mode {} -> {}", self.mode.as_str(), mode.as_str());
        }
        self.mode = mode;
    }

    fn execute_command(&mut self) -> Outcome {
        match Command::parse(self.command_buffer.as_bytes()) {
            Some(Command::Write) => {
                self.write_with_status();
                Outcome::Continue
            }
            Some(Command::Quit) => Outcome::Quit,
            None => {
                log::debug!(
                    "ignored command {:?}",
                    String::from_utf8_lossy(self.command_buffer.as_bytes())
                );
                Outcome::Continue
            }
        }
    }

    fn write_with_status(&mut self) {
        let message = match self.save() {
            Ok(written) => {
                let name = self
                    .path
                    .as_deref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                format!("\"{}\" {}L, {}B written", name, self.buffer.len(), written)
            }
            Err(e) => {
                log::error!("save failed: {}", e);
                format!("E: {}", e)
            }
        };
        self.status_message = Some(message);
    }

    /// ファイルに保存し、書き込んだバイト数を返す
    pub fn save(&mut self) -> io::Result<usize> {
        if let Some(path) = &self.path {
            let written = FileIO::save(path, &self.buffer)?;
            log::debug!("wrote {} bytes to {}", written, path.display());
            self.dirty = false;
            Ok(written)
        } else {
            Err(io::Error::new(
                io::ErrorKind::NotFound,
                "No filename specified",
            ))
        }
    }

    // 空のドキュメントへの最初の編集では行を作る
    fn ensure_row(&mut self) {
        if self.buffer.is_empty() {
            self.buffer.insert_row(0);
            self.cursor.set(0, 0);
        }
    }

    /// カーソル位置に文字を挿入する
    fn insert_char(&mut self, ch: char) {
        self.ensure_row();
        let mut encoded = [0; 4];
        let bytes = ch.encode_utf8(&mut encoded).as_bytes();
        let col = self.cursor.col();

        let Some(row) = self.buffer.row_mut(self.cursor.row()) else {
            return;
        };
        match row.insert(col, bytes) {
            Ok(()) => {
                self.cursor.set_col(col + bytes.len());
                self.dirty = true;
                self.clamped_append = false;
            }
            Err(e) => log::error!("dropped input {:?}: {}", ch, e),
        }
    }

    /// カーソル位置で行を分割する
    fn insert_newline(&mut self) {
        self.ensure_row();
        let row = self.cursor.row();
        let col = self.cursor.col();

        let tail = self
            .buffer
            .row_mut(row)
            .map(|r| r.split_off(col))
            .unwrap_or_default();
        self.buffer.insert_row_with(row + 1, tail);
        self.cursor.set(row + 1, 0);
        self.dirty = true;
        self.clamped_append = false;
    }

    /// カーソルの直前の 1 バイトを削除する
    ///
    /// 行頭では現在の行を前の行に結合する
    fn delete_char_before_cursor(&mut self) {
        let row = self.cursor.row();
        let col = self.cursor.col();

        if col > 0 {
            if let Some(line) = self.buffer.row_mut(row) {
                line.remove(col - 1);
                self.cursor.set_col(col - 1);
                self.dirty = true;
                self.clamped_append = false;
            }
            return;
        }
        if row == 0 {
            return;
        }

        let prev_len = self.buffer.line_len(row - 1);
        let moved_len = self.buffer.line_len(row);
        // 行を消す前に結合先の領域を確保しておく
        let Some(prev) = self.buffer.row_mut(row - 1) else {
            return;
        };
        if let Err(e) = prev.reserve(moved_len) {
            log::error!("failed to join line {}: {}", row, e);
            return;
        }
        if let Some(removed) = self.buffer.delete_row(row) {
            if let Some(prev) = self.buffer.row_mut(row - 1)
                && let Err(e) = prev.append(removed.as_bytes())
            {
                log::error!("failed to join line {}: {}", row, e);
            }
            self.cursor.set(row - 1, prev_len);
            self.dirty = true;
            self.clamped_append = false;
        }
    }
}
