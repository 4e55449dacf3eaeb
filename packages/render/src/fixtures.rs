//! Small in-memory store shared by the rendering tests.
//!
//! Four LADs side by side along a row of one-degree squares, each holding
//! three LSOAs. The IMD health column is deliberately absent.

use std::collections::{BTreeMap, BTreeSet};

use depriv_map_domains::DomainRegistry;
use depriv_map_geography::GeoStore;
use depriv_map_geography_models::{
    AreaUnit, ComparisonRecord, District, PARENT_CODE_COLUMN, Table,
};
use geo::{LineString, MultiPolygon, Polygon};

pub const DISTRICT_COUNT: i64 = 4;
pub const AREAS_PER_DISTRICT: i64 = 3;

pub fn district_code(i: i64) -> String {
    format!("E0700000{}", i + 1)
}

fn square(west: f64, south: f64, size: f64) -> MultiPolygon<f64> {
    MultiPolygon(vec![Polygon::new(
        LineString::from(vec![
            (west, south),
            (west + size, south),
            (west + size, south + size),
            (west, south + size),
            (west, south),
        ]),
        vec![],
    )])
}

#[allow(clippy::cast_precision_loss)]
pub fn store() -> (GeoStore, DomainRegistry) {
    let mut areas = Vec::new();
    let mut comparison = Vec::new();

    for d in 0..DISTRICT_COUNT {
        for a in 0..AREAS_PER_DISTRICT {
            let n = d * AREAS_PER_DISTRICT + a;
            let code = format!("E010000{n:02}");
            let ppfi = n % 10 + 1;
            let imd = (n * 7) % 10 + 1;

            areas.push(AreaUnit {
                code: code.clone(),
                name: format!("Area {n}"),
                district_code: Some(district_code(d)),
                geometry: square(-4.0 + d as f64 + 0.3 * a as f64, 52.2, 0.2),
                values: BTreeMap::from([
                    ("pp_dec_combined".to_string(), Some(ppfi)),
                    ("imd_decile".to_string(), Some(imd)),
                    ("imd_income_decile".to_string(), Some(imd)),
                    ("pp_dec_domain_fuel_poverty".to_string(), Some(ppfi)),
                ]),
            });
            comparison.push(ComparisonRecord::new(
                code,
                Some(format!("Area {n}")),
                Some(district_code(d)),
                Some(format!("District {d}")),
                Some(ppfi),
                Some(imd),
                None,
            ));
        }
    }

    let districts = (0..DISTRICT_COUNT)
        .map(|d| District {
            code: district_code(d),
            name: format!("District {d}"),
            geometry: square(-4.0 + d as f64, 52.0, 1.0),
            values: BTreeMap::from([
                ("combined".to_string(), Some(DISTRICT_COUNT - d)),
                ("imd_rank".to_string(), Some(d + 1)),
                ("income_rank".to_string(), Some(d + 1)),
            ]),
        })
        .collect();

    let area_columns = [
        "pp_dec_combined",
        "imd_decile",
        "imd_income_decile",
        "pp_dec_domain_fuel_poverty",
        PARENT_CODE_COLUMN,
    ];
    let district_columns = ["combined", "imd_rank", "income_rank"];

    let store = GeoStore::from_tables(
        Table::new(
            area_columns.iter().map(ToString::to_string).collect::<BTreeSet<_>>(),
            areas,
        ),
        Table::new(
            district_columns.iter().map(ToString::to_string).collect::<BTreeSet<_>>(),
            districts,
        ),
        comparison,
    )
    .unwrap();

    (store, DomainRegistry::embedded())
}
