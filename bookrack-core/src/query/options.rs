//! Per-visitor query state and its compact token form.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use bookrack_contracts::virtual_library::VirtualLibraryResolver;
use bookrack_model::{EntityFilter, GuiLang, Layout, SortBy, Theme};

/// Form or query-string parameters of a single request.
pub type RequestParams = HashMap<String, String>;

/// Page size used when none is configured.
pub const DEFAULT_BOOKS_PER_PAGE: u32 = 24;

/// Token spelling of an empty virtual library.
const NO_VIRTUAL_LIBRARY: &str = "-";

/// Everything that shapes one catalog listing: filter, search text, sort
/// order, pagination cursor, and presentation preferences.
///
/// The value travels between requests as an opaque token produced by
/// [`QueryOptions::serialize`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// Secondary filter key; `0` means no restriction.
    pub id: i64,
    /// Direction applied to every sort column.
    pub descending: bool,
    /// Which relation `id` refers to.
    pub entity: EntityFilter,
    /// Interface language.
    pub gui_lang: GuiLang,
    /// Listing layout.
    pub layout: Layout,
    /// Page size.
    pub limit_length: u32,
    /// Offset of the first row of the current page.
    pub limit_start: u32,
    /// Search expression; non-empty selects text search over listing.
    pub matching: String,
    /// Total match count of the last executed query.
    pub query_count: u32,
    /// Primary sort column.
    pub sort_by: SortBy,
    /// Colour theme.
    pub theme: Theme,
    /// Selected virtual library name, empty for none.
    pub virt_lib: String,
}

/// Navigation request carried in the `page` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageTurn {
    /// Back to offset zero.
    First,
    /// One page back.
    Prev,
    /// One page forward.
    Next,
    /// Page holding the last match; needs `query_count` from a prior query.
    Last,
}

impl FromStr for PageTurn {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first" => Ok(PageTurn::First),
            "prev" => Ok(PageTurn::Prev),
            "next" => Ok(PageTurn::Next),
            "last" => Ok(PageTurn::Last),
            _ => Err(()),
        }
    }
}

impl QueryOptions {
    /// Options for a fresh visitor: newest acquisitions first.
    pub fn new(books_per_page: u32) -> Self {
        Self {
            descending: true,
            limit_length: if books_per_page == 0 {
                DEFAULT_BOOKS_PER_PAGE
            } else {
                books_per_page
            },
            sort_by: SortBy::Acquisition,
            ..Self::default()
        }
    }

    /// Advances one page. Running past the end yields an empty page.
    pub fn increment_page(&mut self) -> &mut Self {
        self.limit_start = self.limit_start.saturating_add(self.limit_length);
        self
    }

    /// Goes back one page, stopping at the first.
    pub fn decrement_page(&mut self) -> &mut Self {
        if self.limit_start > 0 {
            if self.limit_start <= self.limit_length {
                self.limit_start = 0;
            } else {
                self.limit_start -= self.limit_length;
            }
        }
        self
    }

    /// Rewinds to offset zero.
    pub fn first_page(&mut self) -> &mut Self {
        self.limit_start = 0;
        self
    }

    /// Moves to the start of the final page of the last known result set.
    pub fn last_page(&mut self) -> &mut Self {
        self.limit_start = if self.query_count == 0 || self.limit_length == 0 {
            0
        } else {
            ((self.query_count - 1) / self.limit_length) * self.limit_length
        };
        self
    }

    /// Dispatches a [`PageTurn`] to the matching move.
    pub fn turn_page(&mut self, turn: PageTurn) -> &mut Self {
        match turn {
            PageTurn::First => self.first_page(),
            PageTurn::Prev => self.decrement_page(),
            PageTurn::Next => self.increment_page(),
            PageTurn::Last => self.last_page(),
        }
    }

    /// Encodes every field positionally:
    /// `|ID|Descending|Entity|GuiLang|Layout|LimitLength|LimitStart|Matching|QueryCount|SortBy|Theme|VirtLib|`.
    pub fn serialize(&self) -> String {
        let virt_lib = if self.virt_lib.is_empty() {
            NO_VIRTUAL_LIBRARY
        } else {
            self.virt_lib.as_str()
        };
        format!(
            "|{}|{}|{}|{}|{}|{}|{}|{}|{}|{}|{}|{}|",
            self.id,
            self.descending,
            quote(self.entity.name()),
            self.gui_lang.code(),
            self.layout.code(),
            self.limit_length,
            self.limit_start,
            quote(&self.matching),
            self.query_count,
            self.sort_by.code(),
            self.theme.code(),
            quote(virt_lib),
        )
    }

    /// Best-effort inverse of [`QueryOptions::serialize`].
    ///
    /// Decoding stops at the first field that does not parse; that field
    /// and all following ones keep their zero value.
    pub fn deserialize(token: &str) -> Self {
        let mut options = Self::default();
        let _ = scan_token(&mut options, token);
        options
    }

    /// Reconciles the options with the parameters of a request.
    ///
    /// A missing (or empty) parameter selects that parameter's default
    /// instead of leaving the current value alone. Changing the search
    /// text, sort field, sort direction, or virtual library rewinds to the
    /// first page.
    pub fn apply_request(
        &mut self,
        params: &RequestParams,
        libraries: &dyn VirtualLibraryResolver,
    ) -> &mut Self {
        let param = |name: &str| {
            params
                .get(name)
                .map(String::as_str)
                .filter(|value| !value.is_empty())
        };

        self.gui_lang = param("guilang")
            .and_then(GuiLang::from_name)
            .unwrap_or_default();
        self.layout = param("layout")
            .and_then(Layout::from_name)
            .unwrap_or_default();

        if let Some(length) = param("limitlength").and_then(|v| v.parse::<u32>().ok())
            && length != self.limit_length
        {
            self.decrement_page();
            self.limit_length = length;
        }

        match param("matching").map(str::trim).filter(|v| !v.is_empty()) {
            Some(matching) => {
                if matching != self.matching {
                    self.matching = matching.to_string();
                    self.clear_filter();
                    self.limit_start = 0;
                    self.virt_lib.clear();
                }
            }
            None => {
                self.clear_filter();
                self.matching.clear();
            }
        }

        match param("order") {
            Some(order) => {
                let descending = order == "descending";
                if descending != self.descending {
                    self.descending = descending;
                    self.limit_start = 0;
                }
            }
            None => self.descending = false,
        }

        match param("sortby") {
            Some(name) => {
                let sort_by = SortBy::from_name(name);
                if sort_by != self.sort_by {
                    self.sort_by = sort_by;
                    self.limit_start = 0;
                }
            }
            None => self.sort_by = SortBy::Acquisition,
        }

        self.theme = param("theme")
            .and_then(Theme::from_name)
            .unwrap_or_default();

        match param("virtlib") {
            Some(requested) => {
                let requested = requested.trim();
                let name = if requested == NO_VIRTUAL_LIBRARY {
                    ""
                } else {
                    requested
                };
                if name != self.virt_lib {
                    self.virt_lib = name.to_string();
                    if !name.is_empty()
                        && let Some(library) = libraries.resolve(name)
                    {
                        self.matching = library.definition.trim().to_string();
                    }
                    self.clear_filter();
                    self.limit_start = 0;
                }
            }
            None => self.virt_lib.clear(),
        }

        self
    }

    fn clear_filter(&mut self) {
        self.entity = EntityFilter::None;
        self.id = 0;
    }
}

impl fmt::Display for QueryOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

impl FromStr for QueryOptions {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::deserialize(s))
    }
}

fn quote(value: &str) -> String {
    // Serializing a str into JSON cannot fail.
    serde_json::to_string(value).unwrap_or_else(|_| String::from("\"\""))
}

fn scan_token(options: &mut QueryOptions, token: &str) -> Option<()> {
    let mut scanner = TokenScanner::new(token);

    scanner.delimiter()?;
    options.id = scanner.integer()?;
    scanner.delimiter()?;
    options.descending = scanner.boolean()?;
    scanner.delimiter()?;
    options.entity = EntityFilter::from_name(&scanner.quoted()?).unwrap_or_default();
    scanner.delimiter()?;
    options.gui_lang = GuiLang::from_code(scanner.integer()?)?;
    scanner.delimiter()?;
    options.layout = Layout::from_code(scanner.integer()?)?;
    scanner.delimiter()?;
    options.limit_length = scanner.integer()?;
    scanner.delimiter()?;
    options.limit_start = scanner.integer()?;
    scanner.delimiter()?;
    options.matching = scanner.quoted()?.trim().to_string();
    scanner.delimiter()?;
    options.query_count = scanner.integer()?;
    scanner.delimiter()?;
    options.sort_by = SortBy::from_code(scanner.integer()?)?;
    scanner.delimiter()?;
    options.theme = Theme::from_code(scanner.integer()?)?;
    scanner.delimiter()?;
    let virt_lib = scanner.quoted()?;
    options.virt_lib = if virt_lib == NO_VIRTUAL_LIBRARY {
        String::new()
    } else {
        virt_lib.trim().to_string()
    };

    Some(())
}

/// Cursor over a serialized options token.
struct TokenScanner<'a> {
    rest: &'a str,
}

impl<'a> TokenScanner<'a> {
    fn new(token: &'a str) -> Self {
        Self {
            rest: token.trim(),
        }
    }

    fn delimiter(&mut self) -> Option<()> {
        self.rest = self.rest.strip_prefix('|')?;
        Some(())
    }

    fn integer<T: FromStr>(&mut self) -> Option<T> {
        let sign = usize::from(self.rest.starts_with('-'));
        let digits = self.rest[sign..]
            .bytes()
            .take_while(u8::is_ascii_digit)
            .count();
        if digits == 0 {
            return None;
        }
        let (number, rest) = self.rest.split_at(sign + digits);
        let value = number.parse().ok()?;
        self.rest = rest;
        Some(value)
    }

    fn boolean(&mut self) -> Option<bool> {
        for (literal, value) in [("true", true), ("false", false)] {
            if let Some(rest) = self.rest.strip_prefix(literal) {
                self.rest = rest;
                return Some(value);
            }
        }
        None
    }

    fn quoted(&mut self) -> Option<String> {
        if !self.rest.starts_with('"') {
            return None;
        }
        let mut stream =
            serde_json::Deserializer::from_str(self.rest).into_iter::<String>();
        let value = stream.next()?.ok()?;
        self.rest = &self.rest[stream.byte_offset()..];
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookrack_contracts::virtual_library::{NoVirtualLibraries, VirtualLibrary};

    struct OneLibrary;

    impl VirtualLibraryResolver for OneLibrary {
        fn resolve(&self, name: &str) -> Option<VirtualLibrary> {
            (name == "Sci-Fi").then(|| VirtualLibrary {
                name: name.to_string(),
                definition: "tags:\"science fiction\"".to_string(),
            })
        }

        fn names(&self) -> Vec<String> {
            vec!["Sci-Fi".to_string()]
        }
    }

    fn params(pairs: &[(&str, &str)]) -> RequestParams {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn serialize_uses_fixed_field_order() {
        let options = QueryOptions {
            id: 12,
            descending: true,
            entity: EntityFilter::Tag,
            gui_lang: GuiLang::English,
            layout: Layout::Grid,
            limit_length: 24,
            limit_start: 48,
            matching: String::new(),
            query_count: 99,
            sort_by: SortBy::Title,
            theme: Theme::Dark,
            virt_lib: String::new(),
        };
        assert_eq!(
            options.serialize(),
            r#"|12|true|"tag"|1|1|24|48|""|99|10|1|"-"|"#
        );
        assert_eq!(options.to_string(), options.serialize());
    }

    #[test]
    fn token_round_trips_quotes_and_pipes() {
        let mut options = QueryOptions::new(24);
        options.matching = r#"title:"a|b" and "quoted \ text""#.to_string();
        options.virt_lib = "Lib | One".to_string();
        options.query_count = 7;
        let decoded = QueryOptions::deserialize(&options.serialize());
        assert_eq!(decoded, options);
    }

    #[test]
    fn deserialize_stops_at_first_bad_field() {
        let decoded = QueryOptions::deserialize(r#"|5|true|"author"|x|1|24|0|"m"|3|2|1|"v"|"#);
        assert_eq!(decoded.id, 5);
        assert!(decoded.descending);
        assert_eq!(decoded.entity, EntityFilter::Author);
        assert_eq!(decoded.layout, Layout::List);
        assert_eq!(decoded.limit_length, 0);
        assert_eq!(decoded.matching, "");
        assert_eq!(decoded.virt_lib, "");
    }

    #[test]
    fn deserialize_garbage_yields_zero_value() {
        assert_eq!(QueryOptions::deserialize("not a token"), QueryOptions::default());
        assert_eq!(QueryOptions::deserialize(""), QueryOptions::default());
    }

    #[test]
    fn deserialize_trims_free_text_and_maps_sentinel() {
        let decoded =
            QueryOptions::deserialize(r#"|0|false|"nonsense"|0|0|9|0|"  dune "|0|1|0|"-"|"#);
        assert_eq!(decoded.entity, EntityFilter::None);
        assert_eq!(decoded.matching, "dune");
        assert_eq!(decoded.virt_lib, "");
        assert_eq!(decoded.sort_by, SortBy::Acquisition);
    }

    #[test]
    fn decrement_never_goes_negative() {
        let mut options = QueryOptions::new(24);
        options.decrement_page();
        assert_eq!(options.limit_start, 0);
        options.limit_start = 10;
        options.decrement_page();
        assert_eq!(options.limit_start, 0);
        options.limit_start = 50;
        options.decrement_page();
        assert_eq!(options.limit_start, 26);
    }

    #[test]
    fn increment_has_no_upper_bound() {
        let mut options = QueryOptions::new(24);
        options.query_count = 10;
        options.increment_page().increment_page();
        assert_eq!(options.limit_start, 48);
    }

    #[test]
    fn last_page_starts_at_final_page_boundary() {
        let mut options = QueryOptions::new(10);
        options.query_count = 25;
        options.last_page();
        assert_eq!(options.limit_start, 20);
        options.query_count = 20;
        options.last_page();
        assert_eq!(options.limit_start, 10);
        options.query_count = 0;
        options.last_page();
        assert_eq!(options.limit_start, 0);
    }

    #[test]
    fn absent_parameters_select_defaults() {
        let mut options = QueryOptions::new(24);
        options.gui_lang = GuiLang::English;
        options.theme = Theme::Dark;
        options.entity = EntityFilter::Series;
        options.id = 4;
        options.sort_by = SortBy::Title;
        options.virt_lib = "Sci-Fi".to_string();

        options.apply_request(&RequestParams::new(), &NoVirtualLibraries);

        assert_eq!(options.gui_lang, GuiLang::German);
        assert_eq!(options.layout, Layout::List);
        assert_eq!(options.theme, Theme::Light);
        assert!(!options.descending);
        assert_eq!(options.sort_by, SortBy::Acquisition);
        assert_eq!(options.entity, EntityFilter::None);
        assert_eq!(options.id, 0);
        assert_eq!(options.virt_lib, "");
        assert_eq!(options.limit_length, 24);
    }

    #[test]
    fn changing_sort_rewinds_pagination() {
        let mut options = QueryOptions::new(24);
        options.limit_start = 72;
        options.apply_request(
            &params(&[("order", "descending"), ("sortby", "acquisition")]),
            &NoVirtualLibraries,
        );
        assert_eq!(options.limit_start, 72);

        options.apply_request(
            &params(&[("order", "descending"), ("sortby", "series")]),
            &NoVirtualLibraries,
        );
        assert_eq!(options.sort_by, SortBy::Series);
        assert_eq!(options.limit_start, 0);
    }

    #[test]
    fn new_search_text_clears_entity_filter() {
        let mut options = QueryOptions::new(24);
        options.entity = EntityFilter::Author;
        options.id = 3;
        options.limit_start = 24;
        options.virt_lib = "Sci-Fi".to_string();
        options.apply_request(
            &params(&[("matching", "dune"), ("order", "descending"), ("virtlib", "Sci-Fi")]),
            &NoVirtualLibraries,
        );
        assert_eq!(options.matching, "dune");
        assert_eq!(options.entity, EntityFilter::None);
        assert_eq!(options.id, 0);
        assert_eq!(options.limit_start, 0);
    }

    #[test]
    fn page_size_change_steps_back_one_page() {
        let mut options = QueryOptions::new(24);
        options.limit_start = 48;
        options.apply_request(
            &params(&[("limitlength", "48"), ("order", "descending")]),
            &NoVirtualLibraries,
        );
        assert_eq!(options.limit_length, 48);
        assert_eq!(options.limit_start, 24);

        options.apply_request(
            &params(&[("limitlength", "many"), ("order", "descending")]),
            &NoVirtualLibraries,
        );
        assert_eq!(options.limit_length, 48);
    }

    #[test]
    fn selecting_virtual_library_substitutes_its_definition() {
        let mut options = QueryOptions::new(24);
        options.apply_request(&params(&[("virtlib", "Sci-Fi")]), &OneLibrary);
        assert_eq!(options.virt_lib, "Sci-Fi");
        assert_eq!(options.matching, "tags:\"science fiction\"");
        assert_eq!(options.limit_start, 0);

        options.apply_request(&params(&[("virtlib", "-")]), &OneLibrary);
        assert_eq!(options.virt_lib, "");
    }

    #[test]
    fn options_from_requests_round_trip() {
        let mut options = QueryOptions::new(24);
        options.apply_request(
            &params(&[
                ("guilang", "en"),
                ("layout", "grid"),
                ("limitlength", "9"),
                ("matching", "  \"Le Guin\" or tolkien "),
                ("order", "descending"),
                ("sortby", "rating"),
                ("theme", "dark"),
            ]),
            &OneLibrary,
        );
        options.query_count = 31;
        options.increment_page();
        assert_eq!(QueryOptions::deserialize(&options.serialize()), options);

        options.apply_request(&params(&[("virtlib", "Sci-Fi")]), &OneLibrary);
        assert_eq!(QueryOptions::deserialize(&options.serialize()), options);

        options.apply_request(&params(&[("virtlib", " - ")]), &OneLibrary);
        assert_eq!(options.virt_lib, "");
        assert_eq!(QueryOptions::deserialize(&options.serialize()), options);

        options.apply_request(&params(&[("virtlib", "  Sci-Fi ")]), &OneLibrary);
        assert_eq!(options.virt_lib, "Sci-Fi");
        assert_eq!(QueryOptions::deserialize(&options.serialize()), options);
    }

    #[test]
    fn page_turns_parse_from_names() {
        assert_eq!("next".parse::<PageTurn>(), Ok(PageTurn::Next));
        assert!("later".parse::<PageTurn>().is_err());
    }
}
