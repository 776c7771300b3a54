//! Block comment tokenizer.
//!
//! Yields the bodies of `/* ... */` comments in source order together with the
//! byte offset and line of the opening delimiter. Comments do not nest: the first `*/`
//! closes the comment. An unterminated `/*` ends the sequence. Comment content
//! is never inspected here.

const OPEN: &str = "/*";
const CLOSE: &str = "*/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Comment<'a> {
    /// Text between the delimiters, delimiters excluded.
    pub body: &'a str,
    /// Byte offset of the opening `/*` in the scanned text.
    pub start: usize,
    /// 1-based line of the opening `/*`.
    pub line: usize,
}

/// Lazy iterator over the block comments of a text.
///
/// Lines are counted incrementally, so a full pass is linear in the text.
pub struct Comments<'a> {
    text: &'a str,
    pos: usize,
    /// Offset up to which newlines are counted into `line`.
    counted: usize,
    line: usize,
}

/// Scan `text` for block comments.
pub fn comments(text: &str) -> Comments<'_> {
    Comments {
        text,
        pos: 0,
        counted: 0,
        line: 1,
    }
}

impl<'a> Iterator for Comments<'a> {
    type Item = Comment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.text.get(self.pos..)?;
        let start = self.pos + rest.find(OPEN)?;
        self.line += newlines(&self.text.as_bytes()[self.counted..start]);
        self.counted = start;
        let body_start = start + OPEN.len();
        let body_len = self.text[body_start..].find(CLOSE);
        match body_len {
            Some(len) => {
                let body_end = body_start + len;
                self.pos = body_end + CLOSE.len();
                Some(Comment {
                    body: &self.text[body_start..body_end],
                    start,
                    line: self.line,
                })
            }
            None => {
                self.pos = self.text.len();
                None
            }
        }
    }
}

/// 1-based line number of a byte offset, counting the `\n`s before it.
pub fn line_of(text: &str, offset: usize) -> usize {
    let end = offset.min(text.len());
    newlines(&text.as_bytes()[..end]) + 1
}

fn newlines(bytes: &[u8]) -> usize {
    bytes.iter().filter(|b| **b == b'\n').count()
}
