//! Decoding of packed one-to-many columns.
//!
//! The base projection folds related rows into a single text column of
//! `name|id[|extra]` segments joined by `", "`.

use bookrack_model::{EntityList, EntityRecord};

const SEGMENT_SEPARATOR: &str = ", ";
const PART_SEPARATOR: char = '|';

/// Parts per segment for most packed columns: `name|id`.
pub const NAME_ID: usize = 2;
/// Parts per segment for identifiers: `type|id|value`.
pub const NAME_ID_VALUE: usize = 3;

fn decode_segment(segment: &str, parts: usize) -> EntityRecord {
    let mut split = segment.splitn(parts, PART_SEPARATOR);
    let name = split.next().unwrap_or_default();
    let id = split
        .next()
        .and_then(|raw| raw.parse::<i64>().ok())
        .unwrap_or(0);
    let url = if parts > NAME_ID {
        split.next().unwrap_or_default()
    } else {
        ""
    };
    EntityRecord::new(id, name).with_url(url)
}

fn segments(packed: &str) -> impl Iterator<Item = &str> {
    packed
        .split(SEGMENT_SEPARATOR)
        .filter(|segment| !segment.is_empty())
}

/// Decodes every segment and sorts the result by name, ascending.
///
/// Unparsable ids become `0`. The sort is stable, so entries sharing a
/// name keep their column order.
pub fn decode_entities(packed: &str, parts: usize) -> EntityList {
    let mut list: EntityList = segments(packed)
        .map(|segment| decode_segment(segment, parts))
        .collect();
    if list.len() > 1 {
        list.sort_by(|a, b| a.name.cmp(&b.name));
    }
    list
}

/// Decodes only the first segment; used for one-per-book relations such
/// as publisher and series.
pub fn decode_single(packed: &str) -> Option<EntityRecord> {
    segments(packed)
        .next()
        .map(|segment| decode_segment(segment, NAME_ID))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_column_decodes_to_empty_list() {
        assert!(decode_entities("", NAME_ID).is_empty());
        assert!(decode_entities(", , ", NAME_ID).is_empty());
        assert_eq!(decode_single(""), None);
    }

    #[test]
    fn entries_are_sorted_by_name() {
        let authors = decode_entities("Tolkien|3, Le Guin|7, Banks|1", NAME_ID);
        let names: Vec<_> = authors.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["Banks", "Le Guin", "Tolkien"]);
        assert_eq!(authors[0].id, 1);
        assert!(!authors[0].has_url());
    }

    #[test]
    fn equal_names_keep_column_order() {
        let tags = decode_entities("Same|2, Same|1", NAME_ID);
        assert_eq!(tags[0].id, 2);
        assert_eq!(tags[1].id, 1);
    }

    #[test]
    fn bad_or_missing_ids_become_zero() {
        let list = decode_entities("Orphan, Broken|x1", NAME_ID);
        assert_eq!(list[0], EntityRecord::new(0, "Broken"));
        assert_eq!(list[1], EntityRecord::new(0, "Orphan"));
    }

    #[test]
    fn identifiers_keep_value_including_pipes() {
        let ids = decode_entities("isbn|4|9780000000001, url|5|http://x|y", NAME_ID_VALUE);
        assert_eq!(ids[0], EntityRecord::new(4, "isbn").with_url("9780000000001"));
        assert_eq!(ids[1].url, "http://x|y");
    }

    #[test]
    fn two_part_decoding_keeps_trailing_pipes_in_id() {
        let list = decode_entities("Name|5|extra", NAME_ID);
        assert_eq!(list[0], EntityRecord::new(0, "Name"));
    }

    #[test]
    fn single_relation_takes_first_segment_only() {
        assert_eq!(
            decode_single("Tor|2, Gollancz|9"),
            Some(EntityRecord::new(2, "Tor"))
        );
    }
}
