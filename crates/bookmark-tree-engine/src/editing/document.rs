use std::borrow::Cow;
use xi_rope::Rope;

/// Read access to the current contents of an open document
pub trait LineSource {
    /// Text of the 0-based `line` without its line break, or `None` past the end
    fn line_text(&self, line: usize) -> Option<Cow<'_, str>>;

    /// True when nothing but whitespace precedes `column` on `line`.
    ///
    /// A line that does not exist counts as blank.
    fn prefix_is_blank(&self, line: usize, column: usize) -> bool {
        self.line_text(line)
            .is_none_or(|text| text.chars().take(column).all(char::is_whitespace))
    }

    /// Trimmed text of `line`, the form cached on a bookmark
    fn snippet(&self, line: usize) -> Option<String> {
        self.line_text(line).map(|text| text.trim().to_string())
    }
}

impl LineSource for str {
    fn line_text(&self, line: usize) -> Option<Cow<'_, str>> {
        self.lines().nth(line).map(Cow::Borrowed)
    }
}

impl LineSource for String {
    fn line_text(&self, line: usize) -> Option<Cow<'_, str>> {
        self.as_str().line_text(line)
    }
}

impl LineSource for Rope {
    fn line_text(&self, line: usize) -> Option<Cow<'_, str>> {
        self.lines(..).nth(line)
    }
}
