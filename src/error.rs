use std::collections::TryReserveError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BufferError {
    /// 領域確保に失敗した (バッファは変更されない)
    #[error("failed to grow buffer by {additional} bytes: {source}")]
    Alloc {
        additional: usize,
        #[source]
        source: TryReserveError,
    },
}
