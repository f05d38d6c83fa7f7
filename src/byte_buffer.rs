use crate::error::BufferError;

/// 伸長可能なバイト列
///
/// ドキュメントの各行と、描画時のフレームの両方で使う
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ByteBuffer {
    bytes: Vec<u8>,
}

impl ByteBuffer {
    pub fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, BufferError> {
        let mut buffer = Self::new();
        buffer.append(bytes)?;
        Ok(buffer)
    }

    /// `additional` バイト分の領域を確保する
    ///
    /// 確保に失敗した場合はバッファを変更せずにエラーを返す
    pub fn reserve(&mut self, additional: usize) -> Result<(), BufferError> {
        self.bytes
            .try_reserve(additional)
            .map_err(|source| BufferError::Alloc { additional, source })
    }

    /// 末尾にバイト列を追加する
    pub fn append(&mut self, bytes: &[u8]) -> Result<(), BufferError> {
        self.reserve(bytes.len())?;
        self.bytes.extend_from_slice(bytes);
        Ok(())
    }

    /// 末尾の 1 バイトを取り除く (backspace)
    pub fn pop(&mut self) -> Option<u8> {
        self.bytes.pop()
    }

    /// 空にする。確保済みの領域は保持する
    pub fn clear(&mut self) {
        self.bytes.clear();
    }

    /// `at` の位置にバイト列を挿入する
    ///
    /// `at` が長さを超える場合は末尾に追加する
    pub fn insert(&mut self, at: usize, bytes: &[u8]) -> Result<(), BufferError> {
        let at = at.min(self.bytes.len());
        self.reserve(bytes.len())?;
        self.bytes.splice(at..at, bytes.iter().copied());
        Ok(())
    }

    /// `at` の位置のバイトを取り除く
    pub fn remove(&mut self, at: usize) -> Option<u8> {
        if at < self.bytes.len() {
            Some(self.bytes.remove(at))
        } else {
            None
        }
    }

    /// `at` 以降を切り出して新しいバッファとして返す
    pub fn split_off(&mut self, at: usize) -> ByteBuffer {
        let at = at.min(self.bytes.len());
        Self {
            bytes: self.bytes.split_off(at),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
