/// コマンドラインで実行できるコマンド
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `:w`
    Write,
    /// `:q`
    Quit,
}

impl Command {
    /// 入力されたコマンドラインを解釈する
    ///
    /// 先頭の 1 バイトだけで判定し、未知のコマンドは `None`
    pub fn parse(input: &[u8]) -> Option<Self> {
        match input.first()? {
            b'w' => Some(Command::Write),
            b'q' => Some(Command::Quit),
            _ => None,
        }
    }
}
