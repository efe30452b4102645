/// Display order of a document listing.
///
/// The numeric codes are part of the serialized query-options token and
/// must not be renumbered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[repr(u8)]
pub enum SortBy {
    #[default]
    Unsorted = 0,
    /// Acquisition date (the catalog's `timestamp` column).
    Acquisition = 1,
    Author = 2,
    Language = 3,
    Publisher = 4,
    Rating = 5,
    Series = 6,
    Size = 7,
    Tags = 8,
    /// Publication date.
    Time = 9,
    Title = 10,
}

impl SortBy {
    pub const ALL: [SortBy; 11] = [
        SortBy::Unsorted,
        SortBy::Acquisition,
        SortBy::Author,
        SortBy::Language,
        SortBy::Publisher,
        SortBy::Rating,
        SortBy::Series,
        SortBy::Size,
        SortBy::Tags,
        SortBy::Time,
        SortBy::Title,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(usize::from(code)).copied()
    }

    /// Form/query parameter name; empty for [`SortBy::Unsorted`].
    pub fn name(self) -> &'static str {
        match self {
            SortBy::Unsorted => "",
            SortBy::Acquisition => "acquisition",
            SortBy::Author => "author",
            SortBy::Language => "language",
            SortBy::Publisher => "publisher",
            SortBy::Rating => "rating",
            SortBy::Series => "series",
            SortBy::Size => "size",
            SortBy::Tags => "tags",
            SortBy::Time => "time",
            SortBy::Title => "title",
        }
    }

    /// Unknown names map to [`SortBy::Unsorted`].
    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|candidate| {
                *candidate != SortBy::Unsorted && candidate.name() == name
            })
            .unwrap_or(SortBy::Unsorted)
    }
}

impl std::fmt::Display for SortBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_token_numbering() {
        for (idx, sort) in SortBy::ALL.iter().enumerate() {
            assert_eq!(usize::from(sort.code()), idx);
            assert_eq!(SortBy::from_code(sort.code()), Some(*sort));
        }
        assert_eq!(SortBy::from_code(11), None);
    }

    #[test]
    fn names_round_trip_except_unsorted() {
        assert_eq!(SortBy::from_name("series"), SortBy::Series);
        assert_eq!(SortBy::from_name("title"), SortBy::Title);
        assert_eq!(SortBy::from_name(""), SortBy::Unsorted);
        assert_eq!(SortBy::from_name("popularity"), SortBy::Unsorted);
    }
}
