use std::fmt::Display;
use std::io::{self, Write};

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::byte_buffer::ByteBuffer;
use crate::editor::Editor;
use crate::error::BufferError;
use crate::mode::Mode;
use crate::{GUTTER_WIDTH, LINE_NUMBER_WIDTH, STATUS_LINE_HEIGHT};

const TAB_STOP: usize = 8;

pub struct Screen;

impl Screen {
    /// テキスト表示に使える行数
    pub fn text_rows(rows: u16) -> u16 {
        rows.saturating_sub(STATUS_LINE_HEIGHT)
    }

    /// 本文の表示に使える桁数 (ガターを除く)
    pub fn text_cols(cols: u16) -> u16 {
        cols.saturating_sub(GUTTER_WIDTH)
    }

    /// 画面全体を再描画する
    ///
    /// `size` は (cols, rows)
    pub fn refresh(
        stdout: &mut impl Write,
        editor: &mut Editor,
        size: (u16, u16),
    ) -> io::Result<()> {
        editor.scroll(
            Self::text_rows(size.1) as usize,
            Self::text_cols(size.0) as usize,
        );

        let frame = Self::compose(editor, size)
            .map_err(|e| io::Error::new(io::ErrorKind::OutOfMemory, e))?;
        // ちらつき防止のためフレームはまとめて書き込む
        stdout.write_all(frame.as_bytes())?;

        write!(stdout, "{}", Self::cursor_sequence(editor, size))?;
        stdout.flush()?;
        Ok(())
    }

    /// 1 フレーム分のエスケープシーケンスと内容を組み立てる
    pub fn compose(editor: &Editor, size: (u16, u16)) -> Result<ByteBuffer, BufferError> {
        let (cols, rows) = size;
        let mut frame = ByteBuffer::new();

        put(&mut frame, termion::cursor::Hide)?;
        put(&mut frame, termion::clear::All)?;
        put(&mut frame, termion::cursor::Goto(1, 1))?;

        Self::draw_rows(&mut frame, editor, cols, Self::text_rows(rows))?;
        Self::draw_status_line(&mut frame, editor, cols)?;

        Ok(frame)
    }

    fn draw_rows(
        frame: &mut ByteBuffer,
        editor: &Editor,
        cols: u16,
        text_rows: u16,
    ) -> Result<(), BufferError> {
        let buffer = editor.buffer();
        let row_offset = editor.cursor().row_offset();
        let col_offset = editor.cursor().col_offset();
        let content_width = Self::text_cols(cols) as usize;

        for i in 0..text_rows as usize {
            let file_row = row_offset + i;

            if let Some(row) = buffer.row(file_row) {
                put(
                    frame,
                    format_args!("{:>width$}  ", file_row + 1, width = LINE_NUMBER_WIDTH),
                )?;
                let visible = row.as_bytes().get(col_offset..).unwrap_or_default();
                let text = String::from_utf8_lossy(visible);
                frame.append(fit(&text, content_width).as_bytes())?;
            } else {
                // ファイルの終端を超えたら ~ を表示
                frame.append(b"~")?;
            }
            frame.append(b"\r\n")?;
        }
        Ok(())
    }

    fn draw_status_line(
        frame: &mut ByteBuffer,
        editor: &Editor,
        cols: u16,
    ) -> Result<(), BufferError> {
        match editor.mode() {
            Mode::Command => frame.append(command_line(editor, cols).as_bytes())?,
            Mode::Normal | Mode::Insert => match editor.status_message() {
                Some(message) => frame.append(fit(message, cols as usize).as_bytes())?,
                None => frame.append(editor.mode().as_str().as_bytes())?,
            },
        }
        Ok(())
    }

    /// カーソル形状と位置のシーケンス
    pub fn cursor_sequence(editor: &Editor, size: (u16, u16)) -> String {
        let shape = match editor.mode() {
            // Insert モードでは縦棒カーソル
            Mode::Insert => termion::cursor::SteadyBar.to_string(),
            Mode::Normal | Mode::Command => termion::cursor::SteadyBlock.to_string(),
        };

        let goto = match editor.mode() {
            Mode::Command => {
                // コマンドライン上、入力の直後
                let x = command_line(editor, size.0).width() + 1;
                termion::cursor::Goto(to_u16(x).min(size.0.max(1)), size.1.max(1))
            }
            Mode::Normal | Mode::Insert => {
                let cursor = editor.cursor();
                let y = cursor.row().saturating_sub(cursor.row_offset()) + 1;
                let x = Self::cursor_offset(editor) + GUTTER_WIDTH as usize + 1;
                termion::cursor::Goto(to_u16(x).min(size.0.max(1)), to_u16(y))
            }
        };

        format!("{}{}{}", shape, goto, termion::cursor::Show)
    }

    /// 表示中の行頭からカーソルまでの表示幅
    fn cursor_offset(editor: &Editor) -> usize {
        let cursor = editor.cursor();
        let Some(row) = editor.buffer().row(cursor.row()) else {
            return 0;
        };
        let bytes = row.as_bytes();
        let end = cursor.col().min(bytes.len());
        let start = cursor.col_offset().min(end);
        fit(&String::from_utf8_lossy(&bytes[start..end]), usize::MAX).width()
    }
}

/// ステータスラインに表示するコマンドライン
///
/// 入力が長い場合は末尾を残し、直後のカーソル分の 1 桁を空けておく
fn command_line(editor: &Editor, cols: u16) -> String {
    let input = String::from_utf8_lossy(editor.command_buffer()).replace('\t', " ");
    let budget = (cols as usize).saturating_sub(2);
    fit(&format!(":{}", fit_tail(&input, budget)), cols as usize)
}

fn put(frame: &mut ByteBuffer, sequence: impl Display) -> Result<(), BufferError> {
    frame.append(sequence.to_string().as_bytes())
}

fn to_u16(value: usize) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}

/// 表示幅 `width` に収まるところまで切り詰める
///
/// タブは次のタブストップまでの空白に展開する
fn fit(text: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for grapheme in text.graphemes(true) {
        if grapheme == "\t" {
            let spaces = (TAB_STOP - used % TAB_STOP).min(width - used);
            out.extend(std::iter::repeat_n(' ', spaces));
            used += spaces;
            if used >= width {
                break;
            }
            continue;
        }
        let w = grapheme.width();
        if used + w > width {
            break;
        }
        out.push_str(grapheme);
        used += w;
    }
    out
}

/// 末尾から表示幅 `width` に収まる部分を返す
fn fit_tail(text: &str, width: usize) -> &str {
    let mut used = 0;
    for (index, grapheme) in text.grapheme_indices(true).rev() {
        used += grapheme.width();
        if used > width {
            return &text[index + grapheme.len()..];
        }
    }
    text
}
