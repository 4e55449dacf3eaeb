//! Rows and district choices for the mismatch explorer.

use std::collections::BTreeSet;

use depriv_map_analytics_models::MismatchColumn;
use depriv_map_geography_models::ComparisonRecord;

/// Columns of the mismatch explorer, in display order.
pub const MISMATCH_COLUMNS: &[MismatchColumn] = &[
    MismatchColumn {
        name: "LSOA code",
        id: "lsoaCode",
        numeric: false,
    },
    MismatchColumn {
        name: "LSOA name",
        id: "lsoaName",
        numeric: false,
    },
    MismatchColumn {
        name: "Local authority",
        id: "ladName",
        numeric: false,
    },
    MismatchColumn {
        name: "PPFI decile",
        id: "ppfiDecile",
        numeric: true,
    },
    MismatchColumn {
        name: "IMD decile",
        id: "imdDecile",
        numeric: true,
    },
    MismatchColumn {
        name: "PPFI \u{2013} IMD",
        id: "diff",
        numeric: true,
    },
    MismatchColumn {
        name: "|difference|",
        id: "absDiff",
        numeric: true,
    },
];

/// Sorted, de-duplicated district names present in the comparison table.
#[must_use]
pub fn district_names(records: &[ComparisonRecord]) -> Vec<&str> {
    records
        .iter()
        .filter_map(|r| r.lad_name.as_deref())
        .filter(|name| !name.trim().is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Comparison rows, optionally restricted to one district by exact name.
///
/// Order is preserved, so rows come out largest `abs_diff` first.
#[must_use]
pub fn mismatch_rows<'a>(
    records: &'a [ComparisonRecord],
    district_name: Option<&str>,
) -> Vec<&'a ComparisonRecord> {
    match district_name.filter(|name| !name.is_empty()) {
        Some(name) => {
            let rows: Vec<_> = records
                .iter()
                .filter(|r| r.lad_name.as_deref() == Some(name))
                .collect();
            log::debug!("Mismatch rows for '{name}': {}", rows.len());
            rows
        }
        None => records.iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(code: &str, lad: Option<&str>, ppfi: i64, imd: i64) -> ComparisonRecord {
        ComparisonRecord::new(
            code.to_string(),
            Some(format!("{code} name")),
            None,
            lad.map(str::to_string),
            Some(ppfi),
            Some(imd),
            None,
        )
    }

    fn records() -> Vec<ComparisonRecord> {
        vec![
            record("E01000003", Some("York"), 10, 1),
            record("E01000001", Some("Leeds"), 8, 3),
            record("E01000002", Some("York"), 2, 5),
            record("E01000004", None, 4, 4),
            record("E01000005", Some(" "), 4, 5),
        ]
    }

    #[test]
    fn district_names_are_sorted_and_unique() {
        let records = records();
        assert_eq!(district_names(&records), vec!["Leeds", "York"]);
    }

    #[test]
    fn rows_filter_by_exact_name() {
        let records = records();
        let york: Vec<&str> = mismatch_rows(&records, Some("York"))
            .iter()
            .map(|r| r.lsoa_code.as_str())
            .collect();
        assert_eq!(york, vec!["E01000003", "E01000002"]);

        assert!(mismatch_rows(&records, Some("york")).is_empty());
        assert_eq!(mismatch_rows(&records, None).len(), 5);
        assert_eq!(mismatch_rows(&records, Some("")).len(), 5);
    }

    #[test]
    fn column_ids_match_serialized_records() {
        let value = serde_json::to_value(record("E01000001", Some("Leeds"), 8, 3)).unwrap();
        for column in MISMATCH_COLUMNS {
            assert!(value.get(column.id).is_some(), "missing {}", column.id);
        }
        assert_eq!(value["diff"], 5);
        assert_eq!(value["absDiff"], 5);
    }
}
