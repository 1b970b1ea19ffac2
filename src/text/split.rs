/// One character of a split title
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharSpan {
    pub index: usize,
    pub ch: char,
}

impl CharSpan {
    /// Class attribute of the character's span
    pub fn classes(&self) -> String {
        format!("txt txt-{}", self.index)
    }

    pub fn is_space(&self) -> bool {
        self.ch == ' '
    }

    /// Markup content: spaces become `&nbsp;`, everything else is escaped
    pub fn content(&self) -> String {
        match self.ch {
            ' ' => "&nbsp;".to_string(),
            '&' => "&amp;".to_string(),
            '<' => "&lt;".to_string(),
            '>' => "&gt;".to_string(),
            '"' => "&quot;".to_string(),
            '\'' => "&#39;".to_string(),
            c => c.to_string(),
        }
    }
}

/// Title text split into individually animated characters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitText {
    chars: Vec<CharSpan>,
}

impl SplitText {
    /// Surrounding whitespace is dropped before splitting
    pub fn new(text: &str) -> Self {
        let chars = text
            .trim()
            .chars()
            .enumerate()
            .map(|(index, ch)| CharSpan { index, ch })
            .collect();
        Self { chars }
    }

    pub fn chars(&self) -> &[CharSpan] {
        &self.chars
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn to_markup(&self) -> String {
        self.chars
            .iter()
            .map(|span| format!("<span class=\"{}\">{}</span>", span.classes(), span.content()))
            .collect()
    }
}
