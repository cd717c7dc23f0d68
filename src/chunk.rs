//! Text chunking
//!
//! Splits raw document text into bounded fragments for embedding:
//! - Greedy word wrap over whitespace-delimited tokens
//! - Never splits inside a word
//! - Deterministic output for identical input

/// Split `text` into fragments of at most `max_chars` characters.
///
/// Tokens are accumulated into the current fragment (joined by single
/// spaces) while the running length stays within the limit; a token that
/// would overflow it starts the next fragment. A single token longer
/// than `max_chars` is emitted verbatim as its own oversized fragment.
/// Empty or whitespace-only input yields no fragments.
///
/// Lengths are counted in characters, not bytes, so multi-byte text is
/// never cut mid character.
pub fn chunk(text: &str, max_chars: usize) -> Vec<String> {
    let mut fragments = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0usize;

    for token in text.split_whitespace() {
        let token_chars = token.chars().count();

        if current_chars == 0 {
            if token_chars > max_chars {
                fragments.push(token.to_string());
            } else {
                current.push_str(token);
                current_chars = token_chars;
            }
            continue;
        }

        if current_chars + 1 + token_chars <= max_chars {
            current.push(' ');
            current.push_str(token);
            current_chars += 1 + token_chars;
        } else {
            fragments.push(std::mem::take(&mut current));
            current_chars = 0;
            if token_chars > max_chars {
                fragments.push(token.to_string());
            } else {
                current.push_str(token);
                current_chars = token_chars;
            }
        }
    }

    if current_chars > 0 {
        fragments.push(current);
    }

    fragments
}
