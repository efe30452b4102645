//! Free-text search expressions.
//!
//! ```text
//! expression := term { [connector] term }
//! connector  := "and" | "or"
//! term       := ["not" | "!"] [field ":"] value
//! value      := '"' chars '"' | bare-word
//! ```
//!
//! A value starting with `=` matches exactly (case-insensitive); anything
//! else is a substring match. A term without a known field searches title,
//! authors, tags, series, and comments.

use super::composer::escape_query;

/// Appended to every pattern so the backslash escapes written by
/// [`escape_query`] stay literal.
const LIKE_ESCAPE: &str = r" ESCAPE '\'";

/// How a term joins the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connector {
    /// Both terms must match. Implied between adjacent terms.
    And,
    /// Either term may match.
    Or,
}

impl Connector {
    fn sql(self) -> &'static str {
        match self {
            Connector::And => "AND",
            Connector::Or => "OR",
        }
    }
}

/// Catalog field a `field:value` term is restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    /// Any linked author name.
    Authors,
    /// Book description.
    Comments,
    /// File format, e.g. `EPUB`.
    Formats,
    /// Identifier value such as an ISBN.
    Identifiers,
    /// Language code, e.g. `eng`.
    Languages,
    /// Publisher name.
    Publisher,
    /// Series name.
    Series,
    /// Any linked tag.
    Tags,
    /// Book title.
    Title,
}

impl SearchField {
    /// Case-insensitive; singular and plural spellings both work.
    pub fn from_alias(alias: &str) -> Option<Self> {
        let field = match alias.to_ascii_lowercase().as_str() {
            "authors" | "author" => SearchField::Authors,
            "comments" | "comment" => SearchField::Comments,
            "formats" | "format" => SearchField::Formats,
            "identifiers" | "identifier" => SearchField::Identifiers,
            "languages" | "language" | "lang" => SearchField::Languages,
            "publisher" | "publishers" => SearchField::Publisher,
            "series" => SearchField::Series,
            "tags" | "tag" => SearchField::Tags,
            "title" => SearchField::Title,
            _ => return None,
        };
        Some(field)
    }

    fn condition(self, pattern: &str) -> String {
        match self {
            SearchField::Title => format!("(b.title LIKE {pattern})"),
            SearchField::Authors => format!(
                "(b.id IN (SELECT bal.book FROM books_authors_link bal JOIN authors a ON(a.id = bal.author) WHERE (a.name LIKE {pattern})))"
            ),
            SearchField::Comments => format!(
                "(b.id IN (SELECT c.book FROM comments c WHERE (c.text LIKE {pattern})))"
            ),
            SearchField::Formats => format!(
                "(b.id IN (SELECT d.book FROM data d WHERE (d.format LIKE {pattern})))"
            ),
            SearchField::Identifiers => format!(
                "(b.id IN (SELECT i.book FROM identifiers i WHERE (i.val LIKE {pattern})))"
            ),
            SearchField::Languages => format!(
                "(b.id IN (SELECT bll.book FROM books_languages_link bll JOIN languages l ON(l.id = bll.lang_code) WHERE (l.lang_code LIKE {pattern})))"
            ),
            SearchField::Publisher => format!(
                "(b.id IN (SELECT bpl.book FROM books_publishers_link bpl JOIN publishers p ON(p.id = bpl.publisher) WHERE (p.name LIKE {pattern})))"
            ),
            SearchField::Series => format!(
                "(b.id IN (SELECT bsl.book FROM books_series_link bsl JOIN series s ON(s.id = bsl.series) WHERE (s.name LIKE {pattern})))"
            ),
            SearchField::Tags => format!(
                "(b.id IN (SELECT btl.book FROM books_tags_link btl JOIN tags t ON(t.id = btl.tag) WHERE (t.name LIKE {pattern})))"
            ),
        }
    }
}

/// Fields an unqualified term is matched against.
const DEFAULT_FIELDS: [SearchField; 5] = [
    SearchField::Title,
    SearchField::Authors,
    SearchField::Tags,
    SearchField::Series,
    SearchField::Comments,
];

/// One parsed term of a search expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm {
    /// Joins this term to the previous one; ignored on the first term.
    pub connector: Connector,
    /// Set by `not` or a leading `!`.
    pub negated: bool,
    /// `None` searches the default fields.
    pub field: Option<SearchField>,
    /// Unquoted, unescaped text.
    pub value: String,
    /// Whole-value match instead of substring.
    pub exact: bool,
}

impl SearchTerm {
    fn condition(&self) -> String {
        // Single quotes: a double-quoted value naming a column would be
        // read as that column.
        let escaped = escape_query(&self.value).replace('\'', "''");
        let pattern = if self.exact {
            format!("'{escaped}'{LIKE_ESCAPE}")
        } else {
            format!("'%{escaped}%'{LIKE_ESCAPE}")
        };
        let condition = match self.field {
            Some(field) => field.condition(&pattern),
            None => {
                let alternatives = DEFAULT_FIELDS
                    .iter()
                    .map(|field| field.condition(&pattern))
                    .collect::<Vec<_>>()
                    .join(" OR ");
                format!("({alternatives})")
            }
        };
        if self.negated {
            format!("NOT {condition}")
        } else {
            condition
        }
    }
}

/// A parsed search expression.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchExpression {
    terms: Vec<SearchTerm>,
}

/// Raw word from the expression, with quotes removed.
struct Word {
    text: String,
    /// Byte offset in `text` where the first quoted segment started.
    quoted_from: Option<usize>,
}

fn split_words(expression: &str) -> Vec<Word> {
    let mut words = Vec::new();
    let mut text = String::new();
    let mut quoted_from = None;
    let mut in_quotes = false;
    let mut started = false;

    for ch in expression.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                started = true;
                quoted_from.get_or_insert(text.len());
            }
            ch if ch.is_whitespace() && !in_quotes => {
                if started {
                    words.push(Word {
                        text: std::mem::take(&mut text),
                        quoted_from: quoted_from.take(),
                    });
                    started = false;
                }
            }
            ch => {
                text.push(ch);
                started = true;
            }
        }
    }
    if started {
        words.push(Word { text, quoted_from });
    }
    words
}

impl SearchExpression {
    /// Parses leniently: unknown field prefixes stay part of the value and
    /// dangling connectors are dropped.
    pub fn parse(expression: &str) -> Self {
        let mut terms = Vec::new();
        let mut connector = Connector::And;
        let mut negated = false;

        for word in split_words(expression) {
            if word.quoted_from.is_none() {
                match word.text.to_ascii_lowercase().as_str() {
                    "and" => {
                        connector = Connector::And;
                        continue;
                    }
                    "or" => {
                        connector = Connector::Or;
                        continue;
                    }
                    "not" => {
                        negated = !negated;
                        continue;
                    }
                    _ => {}
                }
            }

            let unquoted_len = word.quoted_from.unwrap_or(word.text.len());
            let mut text = word.text.as_str();
            let mut unquoted = unquoted_len;
            if unquoted > 0
                && let Some(rest) = text.strip_prefix('!')
            {
                negated = !negated;
                text = rest;
                unquoted -= 1;
            }

            let mut field = None;
            if let Some(colon) = text[..unquoted].find(':')
                && let Some(known) = SearchField::from_alias(&text[..colon])
            {
                field = Some(known);
                text = &text[colon + 1..];
                unquoted -= colon + 1;
            }

            let mut exact = false;
            if unquoted > 0
                && let Some(rest) = text.strip_prefix('=')
            {
                exact = true;
                text = rest;
            }

            if !text.is_empty() {
                terms.push(SearchTerm {
                    connector,
                    negated,
                    field,
                    value: text.to_string(),
                    exact,
                });
            }
            connector = Connector::And;
            negated = false;
        }

        Self { terms }
    }

    /// Terms in expression order.
    pub fn terms(&self) -> &[SearchTerm] {
        &self.terms
    }

    /// True when the expression holds no searchable term.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// `WHERE (...) ` fragment, or an empty string when there is nothing
    /// to match.
    pub fn clause(&self) -> String {
        if self.terms.is_empty() {
            return String::new();
        }
        let mut body = String::new();
        for (idx, term) in self.terms.iter().enumerate() {
            if idx > 0 {
                body.push(' ');
                body.push_str(term.connector.sql());
                body.push(' ');
            }
            body.push_str(&term.condition());
        }
        format!("WHERE ({body}) ")
    }
}
