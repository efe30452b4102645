/// Which related entity a listing is restricted to.
///
/// [`EntityFilter::None`] and [`EntityFilter::All`] both mean "no
/// restriction"; they are kept apart because each has its own spelling in
/// the serialized query-options token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum EntityFilter {
    #[default]
    None,
    All,
    Author,
    Format,
    Lang,
    Publisher,
    Series,
    Tag,
}

impl EntityFilter {
    pub fn name(self) -> &'static str {
        match self {
            EntityFilter::None => "",
            EntityFilter::All => "all",
            EntityFilter::Author => "author",
            EntityFilter::Format => "format",
            EntityFilter::Lang => "lang",
            EntityFilter::Publisher => "publisher",
            EntityFilter::Series => "series",
            EntityFilter::Tag => "tag",
        }
    }

    /// Returns `None` for names outside the fixed entity table.
    pub fn from_name(name: &str) -> Option<Self> {
        let filter = match name {
            "" => EntityFilter::None,
            "all" => EntityFilter::All,
            "author" => EntityFilter::Author,
            "format" => EntityFilter::Format,
            "lang" => EntityFilter::Lang,
            "publisher" => EntityFilter::Publisher,
            "series" => EntityFilter::Series,
            "tag" => EntityFilter::Tag,
            _ => return None,
        };
        Some(filter)
    }
}

impl std::fmt::Display for EntityFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
