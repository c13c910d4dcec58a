use lazy_static::lazy_static;
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

lazy_static! {
    static ref SYNTAX_SET: SyntaxSet = SyntaxSet::load_defaults_newlines();
    static ref THEME_SET: ThemeSet = ThemeSet::load_defaults();
}

fn highlight(code: &str, extension: &str) -> String {
    let syntax = SYNTAX_SET
        .find_syntax_by_extension(extension)
        .unwrap_or_else(|| SYNTAX_SET.find_syntax_plain_text());
    let mut h = HighlightLines::new(syntax, &THEME_SET.themes["base16-ocean.dark"]);

    let mut highlighted = String::new();
    for line in LinesWithEndings::from(code) {
        match h.highlight_line(line, &SYNTAX_SET) {
            Ok(ranges) => {
                highlighted.push_str(&syntect::util::as_24_bit_terminal_escaped(&ranges, true))
            }
            Err(_) => highlighted.push_str(line),
        }
    }
    highlighted.push_str("\x1b[0m");
    highlighted
}

/// Crystal has no bundled grammar; Ruby's is close enough for signatures
pub fn highlight_crystal_code(code: &str) -> String {
    highlight(code, "rb")
}

pub fn highlight_markdown(text: &str) -> String {
    highlight(text, "md")
}
