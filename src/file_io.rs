use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use crate::buffer::Buffer;

pub struct FileIO;

impl FileIO {
    /// ファイルを読み込み、1 行 1 エントリのバッファを作る
    ///
    /// 各行末尾の `\n` / `\r` は取り除く。空ファイルは 0 行
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Buffer> {
        let content = std::fs::read(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &[u8]) -> io::Result<Buffer> {
        let mut buffer = Buffer::new();
        if content.is_empty() {
            return Ok(buffer);
        }

        // 末尾が改行で終わる場合、最後の空要素は行として扱わない
        let body = content.strip_suffix(b"\n").unwrap_or(content);
        for line in body.split(|&b| b == b'\n') {
            let end = line
                .iter()
                .rposition(|&b| b != b'\r' && b != b'\n')
                .map_or(0, |i| i + 1);
            buffer
                .append_row(&line[..end])
                .map_err(|e| io::Error::new(io::ErrorKind::OutOfMemory, e))?;
        }
        Ok(buffer)
    }

    /// 各行の後ろに改行を付けて書き出す。既存の内容は上書きする
    ///
    /// 書き込んだバイト数を返す
    pub fn save<P: AsRef<Path>>(path: P, buffer: &Buffer) -> io::Result<usize> {
        let mut file = BufWriter::new(File::create(path)?);
        let mut written = 0;

        for row in buffer.rows() {
            file.write_all(row.as_bytes())?;
            file.write_all(b"\n")?;
            written += row.len() + 1;
        }

        file.flush()?;
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn lines(buffer: &Buffer) -> Vec<&[u8]> {
        buffer.rows().iter().map(|r| r.as_bytes()).collect()
    }

    #[test]
    fn test_file_with_trailing_newline() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "line1").unwrap();
        writeln!(file, "line2").unwrap();
        file.flush().unwrap();

        let buffer = FileIO::open(file.path()).unwrap();

        assert_eq!(lines(&buffer), vec![&b"line1"[..], b"line2"]);
    }

    #[test]
    fn test_file_without_trailing_newline() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "line1\nline2").unwrap();
        file.flush().unwrap();

        let buffer = FileIO::open(file.path()).unwrap();

        assert_eq!(lines(&buffer), vec![&b"line1"[..], b"line2"]);
    }

    #[test]
    fn test_crlf_is_stripped() {
        let buffer = FileIO::parse(b"dos\r\nline\r\n").unwrap();
        assert_eq!(lines(&buffer), vec![&b"dos"[..], b"line"]);
    }

    #[test]
    fn test_empty_file() {
        let file = NamedTempFile::new().unwrap();

        let buffer = FileIO::open(file.path()).unwrap();

        assert!(buffer.is_empty());
    }

    #[test]
    fn test_file_with_only_newline_is_one_empty_line() {
        let buffer = FileIO::parse(b"\n").unwrap();
        assert_eq!(lines(&buffer), vec![&b""[..]]);
    }

    #[test]
    fn test_blank_lines_are_kept() {
        let buffer = FileIO::parse(b"a\n\n\nb\n\n").unwrap();
        assert_eq!(lines(&buffer), vec![&b"a"[..], b"", b"", b"b", b""]);
    }

    #[test]
    fn test_open_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = FileIO::open(dir.path().join("missing.txt"));
        assert_eq!(result.err().unwrap().kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_save_appends_newline_to_every_line() {
        let file = NamedTempFile::new().unwrap();
        let buffer = FileIO::parse(b"hello\nworld").unwrap();

        let written = FileIO::save(file.path(), &buffer).unwrap();

        let content = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(content, "hello\nworld\n");
        assert_eq!(written, content.len());
    }

    #[test]
    fn test_save_truncates_existing_content() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "a much longer previous content\nwith two lines\n").unwrap();
        file.flush().unwrap();

        let buffer = FileIO::parse(b"short").unwrap();
        FileIO::save(file.path(), &buffer).unwrap();

        let content = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(content, "short\n");
    }

    #[test]
    fn test_save_empty_buffer_writes_empty_file() {
        let file = NamedTempFile::new().unwrap();

        FileIO::save(file.path(), &Buffer::new()).unwrap();

        assert_eq!(std::fs::read(file.path()).unwrap(), b"");
    }

    #[test]
    fn test_round_trip() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "first\n\nthird\n").unwrap();

        let buffer = FileIO::open(file.path()).unwrap();
        FileIO::save(file.path(), &buffer).unwrap();

        let content = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(content, "first\n\nthird\n");
    }
}
