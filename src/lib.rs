pub mod buffer;
pub mod byte_buffer;
pub mod command;
pub mod cursor;
pub mod editor;
pub mod error;
pub mod file_io;
pub mod logger;
pub mod mode;
pub mod screen;
pub mod terminal;

// 画面レイアウト定数
pub const STATUS_LINE_HEIGHT: u16 = 1;
/// 行番号の表示桁数
pub const LINE_NUMBER_WIDTH: usize = 4;
/// 行番号と本文の間の空白 2 桁を含むガター幅
pub const GUTTER_WIDTH: u16 = LINE_NUMBER_WIDTH as u16 + 2;

/// debug build でのログ出力先
pub const LOG_FILE: &str = "type.log";
