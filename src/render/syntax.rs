//! Syntax classification for result snippets
//!
//! Rust, Python, JavaScript and TypeScript go through tree-sitter. Go, Java,
//! C and C++ use a small lexical scanner. Anything else is plain text.

use std::ops::Range;

use tracing::warn;
use tree_sitter::{Node, Parser};

/// Highlighting mode picked from a result's `language` field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxMode {
    Rust,
    Python,
    JavaScript,
    TypeScript,
    Go,
    Java,
    C,
    Cpp,
    PlainText,
}

impl SyntaxMode {
    pub fn from_language(language: &str) -> Self {
        match language.trim().to_lowercase().as_str() {
            "rust" | "rs" => SyntaxMode::Rust,
            "python" | "py" => SyntaxMode::Python,
            "javascript" | "js" | "jsx" | "mjs" => SyntaxMode::JavaScript,
            "typescript" | "ts" | "tsx" => SyntaxMode::TypeScript,
            "go" | "golang" => SyntaxMode::Go,
            "java" => SyntaxMode::Java,
            "c" | "h" => SyntaxMode::C,
            "cpp" | "c++" | "cc" | "cxx" | "hpp" => SyntaxMode::Cpp,
            _ => SyntaxMode::PlainText,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SyntaxMode::Rust => "Rust",
            SyntaxMode::Python => "Python",
            SyntaxMode::JavaScript => "JavaScript",
            SyntaxMode::TypeScript => "TypeScript",
            SyntaxMode::Go => "Go",
            SyntaxMode::Java => "Java",
            SyntaxMode::C => "C",
            SyntaxMode::Cpp => "C++",
            SyntaxMode::PlainText => "Plain text",
        }
    }

    fn keywords(&self) -> &'static [&'static str] {
        match self {
            SyntaxMode::Go => &[
                "break", "case", "chan", "const", "continue", "default", "defer", "else",
                "fallthrough", "for", "func", "go", "goto", "if", "import", "interface", "map",
                "package", "range", "return", "select", "struct", "switch", "type", "var", "nil",
                "true", "false",
            ],
            SyntaxMode::Java => &[
                "abstract", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
                "continue", "default", "do", "double", "else", "enum", "extends", "final",
                "finally", "float", "for", "if", "implements", "import", "instanceof", "int",
                "interface", "long", "new", "package", "private", "protected", "public", "return",
                "short", "static", "super", "switch", "synchronized", "this", "throw", "throws",
                "try", "void", "volatile", "while", "null", "true", "false",
            ],
            SyntaxMode::C => &[
                "auto", "break", "case", "char", "const", "continue", "default", "do", "double",
                "else", "enum", "extern", "float", "for", "goto", "if", "inline", "int", "long",
                "register", "return", "short", "signed", "sizeof", "static", "struct", "switch",
                "typedef", "union", "unsigned", "void", "volatile", "while", "NULL",
            ],
            SyntaxMode::Cpp => &[
                "auto", "bool", "break", "case", "catch", "char", "class", "const", "constexpr",
                "continue", "default", "delete", "do", "double", "else", "enum", "explicit",
                "extern", "false", "float", "for", "friend", "if", "inline", "int", "long",
                "namespace", "new", "nullptr", "operator", "private", "protected", "public",
                "return", "short", "signed", "sizeof", "static", "struct", "switch", "template",
                "this", "throw", "true", "try", "typedef", "typename", "union", "unsigned",
                "using", "virtual", "void", "volatile", "while",
            ],
            _ => &[],
        }
    }
}

impl std::fmt::Display for SyntaxMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenClass {
    Plain,
    Keyword,
    String,
    Comment,
    Number,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub class: TokenClass,
    pub text: String,
}

impl Token {
    fn new(class: TokenClass, text: &str) -> Self {
        Self {
            class,
            text: text.to_string(),
        }
    }
}

type Spans = Vec<(Range<usize>, TokenClass)>;

/// Snippet highlighter with one tree-sitter parser per supported grammar
pub struct Highlighter {
    rust_parser: Option<Parser>,
    python_parser: Option<Parser>,
    javascript_parser: Option<Parser>,
    typescript_parser: Option<Parser>,
}

fn make_parser(language: tree_sitter::Language, name: &str) -> Option<Parser> {
    let mut parser = Parser::new();
    match parser.set_language(language) {
        Ok(()) => Some(parser),
        Err(err) => {
            warn!("Failed to set {name} grammar, falling back to plain text: {err}");
            None
        }
    }
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter {
    pub fn new() -> Self {
        Self {
            rust_parser: make_parser(tree_sitter_rust::language(), "Rust"),
            python_parser: make_parser(tree_sitter_python::language(), "Python"),
            javascript_parser: make_parser(tree_sitter_javascript::language(), "JavaScript"),
            typescript_parser: make_parser(
                tree_sitter_typescript::language_typescript(),
                "TypeScript",
            ),
        }
    }

    /// Split `code` into physical lines (on `\n`) of classified tokens
    pub fn highlight(&mut self, code: &str, mode: SyntaxMode) -> Vec<Vec<Token>> {
        let spans = match mode {
            SyntaxMode::Rust => self.tree_spans(code, Grammar::Rust),
            SyntaxMode::Python => self.tree_spans(code, Grammar::Python),
            SyntaxMode::JavaScript => self.tree_spans(code, Grammar::JavaScript),
            SyntaxMode::TypeScript => self.tree_spans(code, Grammar::TypeScript),
            SyntaxMode::Go | SyntaxMode::Java | SyntaxMode::C | SyntaxMode::Cpp => {
                lexical_spans(code, mode)
            }
            SyntaxMode::PlainText => Vec::new(),
        };
        spans_to_lines(code, &spans)
    }

    fn tree_spans(&mut self, code: &str, grammar: Grammar) -> Spans {
        let parser = match grammar {
            Grammar::Rust => self.rust_parser.as_mut(),
            Grammar::Python => self.python_parser.as_mut(),
            Grammar::JavaScript => self.javascript_parser.as_mut(),
            Grammar::TypeScript => self.typescript_parser.as_mut(),
        };
        let Some(tree) = parser.and_then(|p| p.parse(code, None)) else {
            return Vec::new();
        };

        let mut spans = Vec::new();
        collect_spans(tree.root_node(), &mut spans);
        spans
    }
}

#[derive(Clone, Copy)]
enum Grammar {
    Rust,
    Python,
    JavaScript,
    TypeScript,
}

/// Pre-order walk; classified nodes are not descended into, so spans come
/// out sorted and non-overlapping.
fn collect_spans(node: Node, spans: &mut Spans) {
    if let Some(class) = classify(node) {
        spans.push((node.byte_range(), class));
        return;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_spans(child, spans);
    }
}

fn classify(node: Node) -> Option<TokenClass> {
    let kind = node.kind();
    if kind.contains("comment") {
        return Some(TokenClass::Comment);
    }
    if kind == "string"
        || kind == "template_string"
        || kind == "char_literal"
        || kind.ends_with("string_literal")
    {
        return Some(TokenClass::String);
    }
    match kind {
        "integer_literal" | "float_literal" | "integer" | "float" | "number" => {
            return Some(TokenClass::Number)
        }
        "true" | "false" | "none" | "null" | "undefined" | "boolean_literal" | "self" => {
            return Some(TokenClass::Keyword)
        }
        _ => {}
    }
    let is_word = kind.len() > 1 && kind.chars().all(|c| c.is_ascii_alphabetic() || c == '_');
    if !node.is_named() && is_word {
        return Some(TokenClass::Keyword);
    }
    None
}

/// Keyword/string/comment/number scanner for C-family languages
fn lexical_spans(code: &str, mode: SyntaxMode) -> Spans {
    let keywords = mode.keywords();
    let bytes = code.as_bytes();
    let mut spans = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        let start = i;
        match b {
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
                spans.push((start..i, TokenClass::Comment));
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i += 2;
                while i < bytes.len() && !(bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/')) {
                    i += 1;
                }
                i = (i + 2).min(bytes.len());
                spans.push((start..i, TokenClass::Comment));
            }
            b'"' | b'\'' | b'`' => {
                let quote = b;
                i += 1;
                while i < bytes.len() && bytes[i] != quote {
                    if bytes[i] == b'\\' && quote != b'`' {
                        i += 1;
                    }
                    if bytes[i.min(bytes.len() - 1)] == b'\n' && quote != b'`' {
                        break;
                    }
                    i += 1;
                }
                i = (i + 1).min(bytes.len());
                spans.push((start..i, TokenClass::String));
            }
            b'0'..=b'9' => {
                while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'.' || bytes[i] == b'_') {
                    i += 1;
                }
                spans.push((start..i, TokenClass::Number));
            }
            b if b.is_ascii_alphabetic() || b == b'_' => {
                while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                    i += 1;
                }
                if keywords.contains(&&code[start..i]) {
                    spans.push((start..i, TokenClass::Keyword));
                }
            }
            _ => i += 1,
        }
    }

    spans
}

/// Cut classified byte ranges along line boundaries
fn spans_to_lines(code: &str, spans: &[(Range<usize>, TokenClass)]) -> Vec<Vec<Token>> {
    let mut lines = Vec::new();
    let mut offset = 0;
    let mut first_span = 0;

    for line in code.split('\n') {
        let start = offset;
        let end = offset + line.len();
        let mut tokens = Vec::new();
        let mut cursor = start;

        while first_span < spans.len() && spans[first_span].0.end <= start {
            first_span += 1;
        }

        for (range, class) in spans[first_span..].iter() {
            if range.start >= end {
                break;
            }
            let s = range.start.max(cursor);
            let e = range.end.min(end);
            if s >= e {
                continue;
            }
            if s > cursor {
                tokens.push(Token::new(TokenClass::Plain, &code[cursor..s]));
            }
            tokens.push(Token::new(*class, &code[s..e]));
            cursor = e;
        }

        if cursor < end {
            tokens.push(Token::new(TokenClass::Plain, &code[cursor..end]));
        }

        lines.push(tokens);
        offset = end + 1;
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classes_of(line: &[Token], class: TokenClass) -> Vec<&str> {
        line.iter()
            .filter(|t| t.class == class)
            .map(|t| t.text.as_str())
            .collect()
    }

    fn joined(line: &[Token]) -> String {
        line.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_mode_detection() {
        assert_eq!(SyntaxMode::from_language("python"), SyntaxMode::Python);
        assert_eq!(SyntaxMode::from_language("rs"), SyntaxMode::Rust);
        assert_eq!(SyntaxMode::from_language("C++"), SyntaxMode::Cpp);
        assert_eq!(SyntaxMode::from_language("cobol"), SyntaxMode::PlainText);
        assert_eq!(SyntaxMode::from_language(""), SyntaxMode::PlainText);
    }

    #[test]
    fn test_rust_highlighting() {
        let mut hl = Highlighter::new();
        let code = "// entry\nfn main() {\n    let n = 42;\n    println!(\"hi\");\n}";
        let lines = hl.highlight(code, SyntaxMode::Rust);

        assert_eq!(lines.len(), 5);
        assert_eq!(classes_of(&lines[0], TokenClass::Comment), vec!["// entry"]);
        assert!(classes_of(&lines[1], TokenClass::Keyword).contains(&"fn"));
        assert!(classes_of(&lines[2], TokenClass::Keyword).contains(&"let"));
        assert_eq!(classes_of(&lines[2], TokenClass::Number), vec!["42"]);
        assert!(joined(&lines[3]).contains("\"hi\""));
    }

    #[test]
    fn test_python_keywords() {
        let mut hl = Highlighter::new();
        let lines = hl.highlight("def bfs(graph):\n    return None", SyntaxMode::Python);
        assert!(classes_of(&lines[0], TokenClass::Keyword).contains(&"def"));
        assert!(classes_of(&lines[1], TokenClass::Keyword).contains(&"return"));
    }

    #[test]
    fn test_lexical_go() {
        let mut hl = Highlighter::new();
        let code = "func walk(n int) {\n\t/* multi\n\tline */ s := \"x\" // done\n}";
        let lines = hl.highlight(code, SyntaxMode::Go);

        assert_eq!(lines.len(), 4);
        assert_eq!(classes_of(&lines[0], TokenClass::Keyword), vec!["func"]);
        assert_eq!(classes_of(&lines[1], TokenClass::Comment), vec!["/* multi"]);
        assert_eq!(classes_of(&lines[2], TokenClass::Comment), vec!["\tline */", "// done"]);
        assert_eq!(classes_of(&lines[2], TokenClass::String), vec!["\"x\""]);
    }

    #[test]
    fn test_plain_text_preserves_text() {
        let mut hl = Highlighter::new();
        let code = "just words\n\nmore";
        let lines = hl.highlight(code, SyntaxMode::PlainText);
        assert_eq!(lines.len(), 3);
        assert_eq!(joined(&lines[0]), "just words");
        assert!(lines[1].is_empty());
        assert_eq!(lines[2][0].class, TokenClass::Plain);
    }

    #[test]
    fn test_tokens_reassemble_every_line() {
        let mut hl = Highlighter::new();
        let code = "const x = `a\nb`;\nfunction f() { return 1.5; }";
        let lines = hl.highlight(code, SyntaxMode::JavaScript);
        let rebuilt: Vec<String> = lines.iter().map(|l| joined(l)).collect();
        assert_eq!(rebuilt.join("\n"), code);
    }
}
