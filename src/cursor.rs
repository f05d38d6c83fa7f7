use crate::buffer::Buffer;

/// 編集位置
///
/// `col` は行内のバイトオフセットで、行末 (`col == 行の長さ`) も取りうる。
/// `preferred_col` は縦移動で保持される列 (sticky column)。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    row: usize,
    col: usize,
    preferred_col: usize,
    /// 画面先頭に表示しているファイル行
    row_offset: usize,
    /// 画面左端に表示している行内のバイト位置
    col_offset: usize,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// 最終行の行末に置いたカーソルを作る (ファイルを開いた直後の位置)
    pub fn at_end(buffer: &Buffer) -> Self {
        let row = buffer.len().saturating_sub(1);
        let col = buffer.line_len(row);
        Self {
            row,
            col,
            preferred_col: col,
            row_offset: 0,
            col_offset: 0,
        }
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn col(&self) -> usize {
        self.col
    }

    pub fn preferred_col(&self) -> usize {
        self.preferred_col
    }

    pub fn row_offset(&self) -> usize {
        self.row_offset
    }

    pub fn col_offset(&self) -> usize {
        self.col_offset
    }

    /// 横方向の位置を設定する。sticky column も更新される
    pub fn set_col(&mut self, col: usize) {
        self.col = col;
        self.preferred_col = col;
    }

    /// 行と列を同時に設定する (改行・行結合用)
    pub fn set(&mut self, row: usize, col: usize) {
        self.row = row;
        self.set_col(col);
    }

    pub fn move_left(&mut self) {
        if self.col > 0 {
            self.set_col(self.col - 1);
        }
    }

    pub fn move_right(&mut self, line_len: usize) {
        if self.col < line_len {
            self.set_col(self.col + 1);
        }
    }

    pub fn move_up(&mut self, buffer: &Buffer) {
        if self.row > 0 {
            self.row -= 1;
            self.snap_to_preferred(buffer);
        }
    }

    pub fn move_down(&mut self, buffer: &Buffer) {
        if self.row + 1 < buffer.len() {
            self.row += 1;
            self.snap_to_preferred(buffer);
        }
    }

    // 縦移動では preferred_col は変えない
    fn snap_to_preferred(&mut self, buffer: &Buffer) {
        self.col = self.preferred_col.min(buffer.line_len(self.row));
    }

    /// カーソルが `text_rows` 行 x `text_cols` 桁の表示領域に収まるよう
    /// row_offset / col_offset を調整する
    pub fn scroll(&mut self, text_rows: usize, text_cols: usize) {
        self.row_offset = follow(self.row_offset, self.row, text_rows);
        self.col_offset = follow(self.col_offset, self.col, text_cols);
    }
}

// `pos` が [offset, offset + span) に入るように offset をずらす
fn follow(offset: usize, pos: usize, span: usize) -> usize {
    if span == 0 || pos < offset {
        pos
    } else if pos >= offset + span {
        pos + 1 - span
    } else {
        offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer_of(lines: &[&str]) -> Buffer {
        let mut buffer = Buffer::new();
        for line in lines {
            buffer.append_row(line.as_bytes()).unwrap();
        }
        buffer
    }

    #[test]
    fn test_at_end_positions_after_last_char() {
        let buffer = buffer_of(&["ab", "cde"]);
        let cursor = Cursor::at_end(&buffer);

        assert_eq!((cursor.row(), cursor.col()), (1, 3));
    }

    #[test]
    fn test_at_end_on_empty_buffer() {
        let cursor = Cursor::at_end(&Buffer::new());
        assert_eq!((cursor.row(), cursor.col()), (0, 0));
    }

    #[test]
    fn test_left_at_zero_is_noop() {
        let mut cursor = Cursor::new();
        cursor.move_left();
        assert_eq!((cursor.row(), cursor.col()), (0, 0));
    }

    #[test]
    fn test_horizontal_moves_stay_in_bounds_and_track_preferred() {
        let buffer = buffer_of(&["abc"]);
        let mut cursor = Cursor::new();
        let line_len = buffer.line_len(0);

        // l を行長より多く押してから h で戻る
        for _ in 0..5 {
            cursor.move_right(line_len);
            assert!(cursor.col() <= line_len);
            assert_eq!(cursor.preferred_col(), cursor.col());
        }
        assert_eq!(cursor.col(), 3);

        for _ in 0..5 {
            cursor.move_left();
            assert_eq!(cursor.preferred_col(), cursor.col());
        }
        assert_eq!(cursor.col(), 0);
    }

    #[test]
    fn test_vertical_moves_keep_sticky_column() {
        let buffer = buffer_of(&["long line", "ab", "another long"]);
        let mut cursor = Cursor::new();
        for _ in 0..6 {
            cursor.move_right(buffer.line_len(0));
        }

        cursor.move_down(&buffer);
        assert_eq!((cursor.row(), cursor.col()), (1, 2));
        assert_eq!(cursor.preferred_col(), 6);

        cursor.move_down(&buffer);
        assert_eq!((cursor.row(), cursor.col()), (2, 6));

        // 最終行より下には行かない
        cursor.move_down(&buffer);
        assert_eq!(cursor.row(), 2);

        cursor.move_up(&buffer);
        cursor.move_up(&buffer);
        cursor.move_up(&buffer);
        assert_eq!((cursor.row(), cursor.col()), (0, 6));
    }

    #[test]
    fn test_vertical_moves_col_is_min_of_preferred_and_len() {
        let buffer = buffer_of(&["abcd", "", "xy", "abcdefg"]);
        let mut cursor = Cursor::at_end(&buffer);

        for _ in 0..4 {
            cursor.move_up(&buffer);
            let expected = cursor.preferred_col().min(buffer.line_len(cursor.row()));
            assert_eq!(cursor.col(), expected);
            assert!(cursor.row() < buffer.len());
        }
        for _ in 0..4 {
            cursor.move_down(&buffer);
            let expected = cursor.preferred_col().min(buffer.line_len(cursor.row()));
            assert_eq!(cursor.col(), expected);
            assert!(cursor.row() < buffer.len());
        }
    }

    #[test]
    fn test_vertical_moves_on_empty_buffer() {
        let buffer = Buffer::new();
        let mut cursor = Cursor::new();
        cursor.move_down(&buffer);
        cursor.move_up(&buffer);
        assert_eq!((cursor.row(), cursor.col()), (0, 0));
    }

    #[test]
    fn test_scroll_follows_cursor() {
        let mut cursor = Cursor::new();
        cursor.set(10, 0);
        cursor.scroll(4, 80);
        assert_eq!(cursor.row_offset(), 7);

        cursor.set(2, 0);
        cursor.scroll(4, 80);
        assert_eq!(cursor.row_offset(), 2);

        // 表示領域内なら動かない
        cursor.set(4, 0);
        cursor.scroll(4, 80);
        assert_eq!(cursor.row_offset(), 2);
    }

    #[test]
    fn test_scroll_follows_cursor_horizontally() {
        let mut cursor = Cursor::new();
        cursor.set(0, 30);
        cursor.scroll(4, 10);
        assert_eq!(cursor.col_offset(), 21);

        // 表示領域内なら動かない
        cursor.set_col(25);
        cursor.scroll(4, 10);
        assert_eq!(cursor.col_offset(), 21);

        cursor.set_col(3);
        cursor.scroll(4, 10);
        assert_eq!(cursor.col_offset(), 3);
    }
}
