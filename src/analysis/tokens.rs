//! Lossless whitespace tokenization.

/// A run of text produced by [`tokenize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// A contiguous non-whitespace run.
    Word(&'a str),
    /// A contiguous whitespace run, kept so re-assembly is lossless.
    Space(&'a str),
}

impl<'a> Token<'a> {
    pub fn as_str(&self) -> &'a str {
        match self {
            Token::Word(s) | Token::Space(s) => s,
        }
    }

    pub fn is_word(&self) -> bool {
        matches!(self, Token::Word(_))
    }
}

/// Split text into alternating word and whitespace tokens.
///
/// Concatenating the tokens yields the input exactly.
pub fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut in_space: Option<bool> = None;

    for (idx, ch) in text.char_indices() {
        let space = ch.is_whitespace();
        match in_space {
            Some(prev) if prev != space => {
                tokens.push(make_token(&text[start..idx], prev));
                start = idx;
            }
            _ => {}
        }
        in_space = Some(space);
    }
    if let Some(space) = in_space {
        tokens.push(make_token(&text[start..], space));
    }
    tokens
}

fn make_token(s: &str, space: bool) -> Token<'_> {
    if space { Token::Space(s) } else { Token::Word(s) }
}
