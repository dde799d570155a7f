#[derive(Clone, Copy, PartialEq, Eq)]
pub(super) enum State {
    Normal,
    SingleQuoted,
    DoubleQuoted,
    Backticked,
    Bracketed,
    LineComment,
    BlockComment,
}

pub(super) fn is_line_comment_start(bytes: &[u8], idx: usize) -> bool {
    bytes.get(idx) == Some(&b'-') && bytes.get(idx + 1) == Some(&b'-')
}

pub(super) fn is_block_comment_start(bytes: &[u8], idx: usize) -> bool {
    bytes.get(idx) == Some(&b'/') && bytes.get(idx + 1) == Some(&b'*')
}

pub(super) fn is_block_comment_end(bytes: &[u8], idx: usize) -> bool {
    bytes.get(idx) == Some(&b'*') && bytes.get(idx + 1) == Some(&b'/')
}

/// Closing byte for a quoted state, and whether doubling it escapes it.
pub(super) fn closing(state: State) -> Option<(u8, bool)> {
    match state {
        State::SingleQuoted => Some((b'\'', true)),
        State::DoubleQuoted => Some((b'"', true)),
        State::Backticked => Some((b'`', true)),
        State::Bracketed => Some((b']', false)),
        State::Normal | State::LineComment | State::BlockComment => None,
    }
}
