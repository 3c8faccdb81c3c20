//! 文本处理辅助函数

/// 将文本截断到最多`max_words`个词
///
/// 未超出上限的文本只去掉首尾空白；超出时在第`max_words`个词之后截断，
/// 保留原有的换行与缩进。
pub fn truncate_words(text: &str, max_words: usize) -> String {
    let text = text.trim();
    if max_words == 0 {
        return String::new();
    }

    let mut words = 0;
    let mut in_word = false;
    for (offset, ch) in text.char_indices() {
        if ch.is_whitespace() {
            if in_word && words == max_words {
                return text[..offset].to_string();
            }
            in_word = false;
        } else if !in_word {
            in_word = true;
            words += 1;
        }
    }

    text.to_string()
}

/// 返回markdown文本中第一个标题的内容（不含`#`前缀）
pub fn first_heading(markdown: &str) -> Option<String> {
    markdown
        .lines()
        .map(str::trim)
        .find(|line| line.starts_with('#'))
        .map(|line| line.trim_start_matches('#').trim().to_string())
        .filter(|heading| !heading.is_empty())
}

/// 转义HTML特殊字符
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
