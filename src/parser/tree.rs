use crate::lexer::{xml, Token};

/// Records the parse as nested XML while the translator runs: one element per
/// production, one line per consumed token, two spaces of indent per level.
#[derive(Debug, Default)]
pub struct SyntaxTree {
    out: String,
    depth: usize,
}

impl SyntaxTree {
    fn indent(&mut self) {
        for _ in 0..self.depth {
            self.out.push_str("  ");
        }
    }

    pub fn open(&mut self, node: &str) {
        self.indent();
        self.out.push_str(&format!("<{}>\n", node));
        self.depth += 1;
    }

    pub fn close(&mut self, node: &str) {
        self.depth = self.depth.saturating_sub(1);
        self.indent();
        self.out.push_str(&format!("</{}>\n", node));
    }

    pub fn terminal(&mut self, token: &Token) {
        self.indent();
        self.out.push_str(&xml::element(token));
        self.out.push('\n');
    }

    pub fn into_xml(self) -> String {
        self.out
    }
}
