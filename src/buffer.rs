use crate::byte_buffer::ByteBuffer;
use crate::error::BufferError;

/// ドキュメントの行を保持する
#[derive(Debug)]
pub struct Buffer {
    rows: Vec<ByteBuffer>,
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Buffer {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// 末尾に行を追加する (ファイル読み込み時のみ使用)
    pub fn append_row(&mut self, bytes: &[u8]) -> Result<(), BufferError> {
        let row = ByteBuffer::from_slice(bytes)?;
        self.rows.push(row);
        Ok(())
    }

    /// `at` の手前に空行を挿入する。`at == len()` なら末尾
    pub fn insert_row(&mut self, at: usize) -> bool {
        self.insert_row_with(at, ByteBuffer::new())
    }

    /// `at` の手前に指定した内容の行を挿入する
    pub fn insert_row_with(&mut self, at: usize, row: ByteBuffer) -> bool {
        if at <= self.rows.len() {
            self.rows.insert(at, row);
            true
        } else {
            false
        }
    }

    /// `at` の行を削除し、その内容を返す
    pub fn delete_row(&mut self, at: usize) -> Option<ByteBuffer> {
        if at < self.rows.len() {
            Some(self.rows.remove(at))
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<&ByteBuffer> {
        self.rows.get(index)
    }

    pub fn row_mut(&mut self, index: usize) -> Option<&mut ByteBuffer> {
        self.rows.get_mut(index)
    }

    pub fn rows(&self) -> &[ByteBuffer] {
        &self.rows
    }

    /// 指定行のバイト長。存在しない行は 0
    pub fn line_len(&self, index: usize) -> usize {
        self.rows.get(index).map(|r| r.len()).unwrap_or(0)
    }
}
