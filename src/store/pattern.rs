//! Glob matching for KEYS and SCAN
//!
//! Supports `*` (any run of characters, including none), `?` (exactly one
//! character) and `\` (take the next character literally). Every other
//! character, brackets included, matches itself. A pattern that ends in a
//! lone `\` is malformed and matches nothing.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Star,
    Any,
    Literal(char),
}

/// Compile a pattern, None when it ends in a dangling escape
fn tokenize(pattern: &str) -> Option<Vec<Token>> {
    let mut tokens = Vec::with_capacity(pattern.len());
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        let token = match c {
            '*' => Token::Star,
            '?' => Token::Any,
            '\\' => Token::Literal(chars.next()?),
            c => Token::Literal(c),
        };
        // consecutive stars match the same runs as one
        if token == Token::Star && tokens.last() == Some(&Token::Star) {
            continue;
        }
        tokens.push(token);
    }
    Some(tokens)
}

/// Iterative matcher that only ever backtracks to the most recent star
fn glob_match(tokens: &[Token], text: &[char]) -> bool {
    let mut ti = 0;
    let mut pi = 0;
    // token index after the last star, and the text position it resumes at
    let mut star: Option<(usize, usize)> = None;

    while ti < text.len() {
        match tokens.get(pi) {
            Some(Token::Star) => {
                pi += 1;
                star = Some((pi, ti));
                continue;
            }
            Some(Token::Any) => {
                pi += 1;
                ti += 1;
                continue;
            }
            Some(Token::Literal(c)) if *c == text[ti] => {
                pi += 1;
                ti += 1;
                continue;
            }
            _ => {}
        }
        match star {
            Some((resume, from)) => {
                pi = resume;
                ti = from + 1;
                star = Some((resume, ti));
            }
            None => return false,
        }
    }
    tokens[pi..].iter().all(|t| *t == Token::Star)
}

/// Check whether `key` matches `pattern`
pub fn matches(pattern: &str, key: &str) -> bool {
    let Some(tokens) = tokenize(pattern) else {
        return false;
    };
    let text: Vec<char> = key.chars().collect();
    glob_match(&tokens, &text)
}

/// Keep the keys that match `pattern`, preserving their order
pub fn filter_keys(keys: Vec<String>, pattern: &str) -> Vec<String> {
    let Some(tokens) = tokenize(pattern) else {
        return Vec::new();
    };
    keys.into_iter()
        .filter(|key| {
            let text: Vec<char> = key.chars().collect();
            glob_match(&tokens, &text)
        })
        .collect()
}
