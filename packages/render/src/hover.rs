//! Per-feature hover content.

use depriv_map_analytics::classify;
use depriv_map_domains::{DomainRegistry, ResolvedDomain, pretty_domain};
use depriv_map_geography_models::IndexedRow;
use depriv_map_index_models::{Dataset, Geography};
use depriv_map_render_models::{HoverInfo, HoverMode};

/// Shown for values the source did not provide.
pub const MISSING_VALUE: &str = "N/A";

/// Everything needed to describe rows of one table, resolved once per
/// render.
#[derive(Debug, Clone, Copy)]
pub struct HoverContext<'a> {
    geography: Geography,
    dataset: Dataset,
    domain: ResolvedDomain<'a>,
    ppfi_column: Option<&'a str>,
    imd_column: Option<&'a str>,
    domain_column: Option<&'a str>,
    district_count: usize,
    mode: HoverMode,
}

impl<'a> HoverContext<'a> {
    /// Resolves the combined columns of both datasets and drops any the
    /// table does not have.
    #[must_use]
    pub fn new(
        registry: &'a DomainRegistry,
        geography: Geography,
        dataset: Dataset,
        domain: ResolvedDomain<'a>,
        has_column: impl Fn(&str) -> bool,
        district_count: usize,
        mode: HoverMode,
    ) -> Self {
        let present = |column: &'a str| has_column(column).then_some(column);

        Self {
            geography,
            dataset,
            domain,
            ppfi_column: present(registry.combined_column(geography, Dataset::Ppfi)),
            imd_column: present(registry.combined_column(geography, Dataset::Imd)),
            domain_column: present(domain.column),
            district_count,
            mode,
        }
    }

    /// Hover content for one row.
    #[must_use]
    pub fn describe<R: IndexedRow>(&self, row: &R) -> HoverInfo {
        let mut lines = Vec::with_capacity(6);

        // LAD names stand apart from the values below them.
        if self.geography == Geography::Lad {
            lines.push(String::new());
        }

        match self.mode {
            HoverMode::Full => {
                let scale = self.geography.scale_name();
                let ppfi = self.ppfi_column.and_then(|c| row.value(c));
                let imd = self.imd_column.and_then(|c| row.value(c));
                let difference = ppfi.zip(imd).map(|(p, i)| p - i);

                lines.push(format!("PPFI combined ({scale}): {}", display(ppfi)));
                lines.push(format!("IMD combined ({scale}): {}", display(imd)));
                lines.push(format!("Difference (PPFI \u{2212} IMD): {}", display(difference)));
                lines.push(
                    classify(difference, self.geography, self.district_count)
                        .map(|alignment| alignment.to_string())
                        .unwrap_or_default(),
                );
                lines.push(if self.domain.is_combined() {
                    String::new()
                } else {
                    self.domain_line(row)
                });
            }
            HoverMode::Compact => lines.push(self.domain_line(row)),
        }

        HoverInfo {
            title: row.name().to_string(),
            lines,
        }
    }

    /// `"{Domain} {scale} ({DATASET}): {value}"`, or empty if the table has
    /// no such column.
    fn domain_line<R: IndexedRow>(&self, row: &R) -> String {
        self.domain_column.map_or_else(String::new, |column| {
            format!(
                "{} {} ({}): {}",
                pretty_domain(self.domain.key),
                self.geography.scale_name(),
                self.dataset.label(),
                display(row.value(column))
            )
        })
    }
}

fn display(value: Option<i64>) -> String {
    value.map_or_else(|| MISSING_VALUE.to_string(), |v| v.to_string())
}
