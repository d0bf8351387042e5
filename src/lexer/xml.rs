use super::{Token, TokenKind};

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}

fn tag(kind: &TokenKind) -> &'static str {
    match kind {
        TokenKind::Keyword(_) => "keyword",
        TokenKind::Symbol(_) => "symbol",
        TokenKind::IntConst(_) => "integerConstant",
        TokenKind::StringConst(_) => "stringConstant",
        TokenKind::Identifier(_) => "identifier",
    }
}

/// One token as a single-line element, e.g. `<symbol> &lt; </symbol>`.
/// String constants appear without their quotes.
pub fn element(token: &Token) -> String {
    let tag = tag(&token.kind);
    format!("<{tag}> {} </{tag}>", escape(&token.kind.lexeme()))
}

/// Renders a token stream as a `<tokens>` document, one element per line.
pub fn tokens_to_xml(tokens: &[Token]) -> String {
    let mut out = String::from("<tokens>\n");
    for token in tokens {
        out.push_str(&element(token));
        out.push('\n');
    }
    out.push_str("</tokens>\n");
    out
}
