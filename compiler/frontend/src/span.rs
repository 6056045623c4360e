//! ソースコード上の位置情報。

use serde::Serialize;
use std::fmt;
use std::ops::Range;

/// 半開区間で表現したバイト範囲。`end` は常に `start` 以上。
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    /// `end < start` の場合は `start` に丸める。
    pub fn new(start: u32, end: u32) -> Self {
        if end < start {
            Self { start, end: start }
        } else {
            Self { start, end }
        }
    }

    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// 二つの範囲を覆う最小の範囲。
    pub fn join(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }

    /// `start` の 1 始まり行・列番号を求める。列は文字単位。
    pub fn line_col(&self, source: &str) -> (usize, usize) {
        let offset = (self.start as usize).min(source.len());
        let prefix = match source.get(..offset) {
            Some(prefix) => prefix,
            None => return (1, 1),
        };
        let line = prefix.matches('\n').count() + 1;
        let column = match prefix.rfind('\n') {
            Some(index) => prefix[index + 1..].chars().count() + 1,
            None => prefix.chars().count() + 1,
        };
        (line, column)
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Span::new(range.start as u32, range.end as u32)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}..{})", self.start, self.end)
    }
}
