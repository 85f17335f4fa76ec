//! RIS tag → column name table.

/// Separator used when flattening multi-valued fields into one cell.
pub const LIST_SEPARATOR: &str = "; ";

const TAG_COLUMNS: &[(&str, &str)] = &[
    ("TY", "type_of_reference"),
    ("A1", "first_authors"),
    ("A2", "secondary_authors"),
    ("A3", "tertiary_authors"),
    ("A4", "subsidiary_authors"),
    ("AB", "abstract"),
    ("AD", "author_address"),
    ("AN", "accession_number"),
    ("AU", "authors"),
    ("C1", "custom1"),
    ("CN", "call_number"),
    ("CY", "place_published"),
    ("DA", "date"),
    ("DB", "name_of_database"),
    ("DO", "doi"),
    ("DP", "database_provider"),
    ("EP", "end_page"),
    ("ET", "edition"),
    ("ID", "id"),
    ("IS", "number"),
    ("J2", "alternate_title3"),
    ("JA", "alternate_title2"),
    ("JF", "alternate_title1"),
    ("JO", "journal_name"),
    ("KW", "keywords"),
    ("L1", "file_attachments1"),
    ("L4", "figure"),
    ("LA", "language"),
    ("LB", "label"),
    ("M1", "note"),
    ("M3", "type_of_work"),
    ("N1", "notes"),
    ("N2", "notes_abstract"),
    ("NV", "number_of_volumes"),
    ("OP", "original_publication"),
    ("PB", "publisher"),
    ("PY", "year"),
    ("RN", "research_notes"),
    ("SE", "section"),
    ("SN", "issn"),
    ("SP", "start_page"),
    ("ST", "short_title"),
    ("T1", "primary_title"),
    ("T2", "secondary_title"),
    ("T3", "tertiary_title"),
    ("TI", "title"),
    ("TT", "translated_title"),
    ("UR", "urls"),
    ("VL", "volume"),
    ("Y1", "publication_year"),
    ("Y2", "access_date"),
];

const MULTI_VALUED: &[&str] = &["A1", "A2", "A3", "A4", "AU", "KW", "N1", "UR"];

/// Readable column name for a tag; unknown tags map to themselves.
#[must_use]
pub fn column_for_tag(tag: &str) -> &str {
    TAG_COLUMNS
        .iter()
        .find(|(known, _)| *known == tag)
        .map_or(tag, |&(_, column)| column)
}

/// True for tags that may repeat within one entry and accumulate values.
#[must_use]
pub fn is_multi_valued(tag: &str) -> bool {
    MULTI_VALUED.contains(&tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_tags_map_to_names() {
        assert_eq!(column_for_tag("TI"), "title");
        assert_eq!(column_for_tag("DO"), "doi");
        assert_eq!(column_for_tag("PY"), "year");
    }

    #[test]
    fn test_unknown_tag_maps_to_itself() {
        assert_eq!(column_for_tag("ZZ"), "ZZ");
    }

    #[test]
    fn test_multi_valued_tags() {
        assert!(is_multi_valued("AU"));
        assert!(is_multi_valued("KW"));
        assert!(!is_multi_valued("TI"));
    }

    #[test]
    fn test_tag_table_has_no_duplicate_tags() {
        let mut tags: Vec<&str> = TAG_COLUMNS.iter().map(|(tag, _)| *tag).collect();
        tags.sort_unstable();
        tags.dedup();
        assert_eq!(tags.len(), TAG_COLUMNS.len());
    }
}
