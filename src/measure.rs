use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Terminal cell metrics for text grids.
pub struct TextMetrics {
    /// Widest a single cell may get before it is truncated.
    pub max_cell_width: usize,
    pub ellipsis: char,
}

impl Default for TextMetrics {
    fn default() -> Self {
        Self {
            max_cell_width: 40,
            ellipsis: '…',
        }
    }
}

impl TextMetrics {
    /// Display width in terminal cells. Wide (e.g. CJK) characters count as 2.
    pub fn text_width(&self, text: &str) -> usize {
        UnicodeWidthStr::width(text)
    }

    /// Cut `text` so it fits in `width` cells, marking the cut with the ellipsis.
    pub fn truncate(&self, text: &str, width: usize) -> String {
        if self.text_width(text) <= width {
            return text.to_string();
        }
        let ellipsis_width = UnicodeWidthChar::width(self.ellipsis).unwrap_or(1);
        let budget = width.saturating_sub(ellipsis_width);

        let mut out = String::new();
        let mut used = 0;
        for c in text.chars() {
            let w = UnicodeWidthChar::width(c).unwrap_or(0);
            if used + w > budget {
                break;
            }
            used += w;
            out.push(c);
        }
        if width >= ellipsis_width {
            out.push(self.ellipsis);
        }
        out
    }

    /// Left-align `text` in a field of `width` cells.
    pub fn pad(&self, text: &str, width: usize) -> String {
        let fill = width.saturating_sub(self.text_width(text));
        format!("{}{}", text, " ".repeat(fill))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_width() {
        let m = TextMetrics::default();
        assert_eq!(m.text_width("User"), 4);
    }

    #[test]
    fn test_unicode_width() {
        let m = TextMetrics::default();
        // Full-width characters take two cells.
        assert_eq!(m.text_width("ユーザー"), 8);
        assert_eq!(m.text_width("Userテスト"), 10);
    }

    #[test]
    fn test_truncate() {
        let m = TextMetrics::default();
        assert_eq!(m.truncate("short", 10), "short");
        assert_eq!(m.truncate("a long value", 6), "a lon…");
        assert_eq!(m.text_width(&m.truncate("ユーザー名前", 7)), 7);
    }

    #[test]
    fn test_pad_wide_text() {
        let m = TextMetrics::default();
        assert_eq!(m.pad("名前", 6), "名前  ");
        assert_eq!(m.pad("toolong", 3), "toolong");
    }
}
