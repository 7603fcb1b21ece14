//! Lexical and block rules for each declared language.
//!
//! The built-in backends share one lexer and one structure checker; a
//! [`Dialect`] is the table that tells them how a given language spells
//! comments, strings and blocks.

use polyc_core::Language;

/// How one language is tokenized and checked.
#[derive(Debug)]
pub struct Dialect {
    pub language: Language,
    /// Markers that start a comment running to end of line.
    pub line_comments: &'static [&'static str],
    /// Line-comment keywords such as Basic's `REM`, matched as whole words.
    pub comment_keywords: &'static [&'static str],
    pub block_comment: Option<(&'static str, &'static str)>,
    /// Quotes delimiting single-line literals.
    pub quotes: &'static [char],
    /// Quotes delimiting literals that may span lines.
    pub multiline_quotes: &'static [char],
    /// `\` escapes the next character inside a literal.
    pub backslash_escapes: bool,
    /// A doubled quote (`""`) stands for one quote inside a literal.
    pub doubled_quote_escapes: bool,
    /// Prefix turning the following `"` literal into a verbatim one.
    pub verbatim_prefix: Option<char>,
    /// `/…/flags` is a regular-expression literal where an operand may start.
    pub regex_literals: bool,
    /// A `#` line at line start is a preprocessor line. Unless the dialect
    /// is line oriented, a trailing `\` continues it onto the next line.
    pub preprocessor_lines: bool,
    /// Newlines end statements, so they are kept as tokens.
    pub line_oriented: bool,
    pub case_sensitive: bool,
    /// Digit separator inside numeric literals besides `_`.
    pub digit_separator: Option<char>,
    /// Extra characters allowed in identifiers.
    pub identifier_extra: &'static [char],
    /// Keywords introducing a named top-level declaration.
    pub declaration_keywords: &'static [&'static str],
    /// Keywords opening a block closed by `End <keyword>`.
    pub end_blocks: &'static [&'static str],
    /// Switches such as `/optionexplicit` are understood.
    pub basic_options: bool,
}

impl Dialect {
    /// The dialect for a language.
    pub fn for_language(language: Language) -> &'static Dialect {
        match language {
            Language::CSharp => &C_SHARP,
            Language::VisualBasic => &BASIC,
            Language::JScript => &JSCRIPT,
            Language::Cpp => &CPP,
        }
    }

    /// Compare a word against a keyword using the dialect's case rules.
    pub fn keyword_eq(&self, word: &str, keyword: &str) -> bool {
        if self.case_sensitive {
            word == keyword
        } else {
            word.eq_ignore_ascii_case(keyword)
        }
    }

    pub fn is_declaration_keyword(&self, word: &str) -> bool {
        self.declaration_keywords
            .iter()
            .any(|kw| self.keyword_eq(word, kw))
    }

    /// The canonical spelling of a block keyword, if `word` is one.
    pub fn end_block(&self, word: &str) -> Option<&'static str> {
        self.end_blocks
            .iter()
            .copied()
            .find(|kw| self.keyword_eq(word, kw))
    }
}

pub static C_SHARP: Dialect = Dialect {
    language: Language::CSharp,
    line_comments: &["//"],
    comment_keywords: &[],
    block_comment: Some(("/*", "*/")),
    quotes: &['"', '\''],
    multiline_quotes: &[],
    backslash_escapes: true,
    doubled_quote_escapes: false,
    verbatim_prefix: Some('@'),
    regex_literals: false,
    preprocessor_lines: true,
    line_oriented: false,
    case_sensitive: true,
    digit_separator: None,
    identifier_extra: &[],
    declaration_keywords: &["class", "struct", "interface", "enum", "namespace"],
    end_blocks: &[],
    basic_options: false,
};

pub static BASIC: Dialect = Dialect {
    language: Language::VisualBasic,
    line_comments: &["'"],
    comment_keywords: &["REM"],
    block_comment: None,
    quotes: &['"'],
    multiline_quotes: &[],
    backslash_escapes: false,
    doubled_quote_escapes: true,
    verbatim_prefix: None,
    regex_literals: false,
    preprocessor_lines: true,
    line_oriented: true,
    case_sensitive: false,
    digit_separator: None,
    identifier_extra: &[],
    declaration_keywords: &[
        "Namespace",
        "Module",
        "Class",
        "Structure",
        "Interface",
        "Enum",
        "Sub",
        "Function",
    ],
    end_blocks: &[
        "Namespace",
        "Module",
        "Class",
        "Structure",
        "Interface",
        "Enum",
        "Sub",
        "Function",
    ],
    basic_options: true,
};

pub static JSCRIPT: Dialect = Dialect {
    language: Language::JScript,
    line_comments: &["//"],
    comment_keywords: &[],
    block_comment: Some(("/*", "*/")),
    quotes: &['"', '\''],
    multiline_quotes: &['`'],
    backslash_escapes: true,
    doubled_quote_escapes: false,
    verbatim_prefix: None,
    regex_literals: true,
    preprocessor_lines: false,
    line_oriented: false,
    case_sensitive: true,
    digit_separator: None,
    identifier_extra: &['$'],
    declaration_keywords: &["function", "class", "interface", "package"],
    end_blocks: &[],
    basic_options: false,
};

pub static CPP: Dialect = Dialect {
    language: Language::Cpp,
    line_comments: &["//"],
    comment_keywords: &[],
    block_comment: Some(("/*", "*/")),
    quotes: &['"', '\''],
    multiline_quotes: &[],
    backslash_escapes: true,
    doubled_quote_escapes: false,
    verbatim_prefix: None,
    regex_literals: false,
    preprocessor_lines: true,
    line_oriented: false,
    case_sensitive: true,
    digit_separator: Some('\''),
    identifier_extra: &[],
    declaration_keywords: &["class", "struct", "union", "enum", "namespace"],
    end_blocks: &[],
    basic_options: false,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_language_has_a_dialect() {
        for language in Language::ALL {
            assert_eq!(Dialect::for_language(language).language, language);
        }
    }

    #[test]
    fn basic_keywords_ignore_case() {
        assert_eq!(BASIC.end_block("SUB"), Some("Sub"));
        assert!(BASIC.is_declaration_keyword("class"));
        assert!(C_SHARP.is_declaration_keyword("class"));
        assert!(!C_SHARP.is_declaration_keyword("Class"));
    }
}
