//! Inline data files for the server tests: two districts with two LSOAs
//! each.

use depriv_map_domains::DomainRegistry;
use depriv_map_geography::{GeoStore, loader};

const LSOA: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        {
            "type": "Feature",
            "properties": { "LSOA21CD": "E01000001", "LSOA21NM": "North 001A", "pp_dec_combined": 8, "imd_decile": 3 },
            "geometry": { "type": "Polygon", "coordinates": [[[-1.0, 53.0], [-0.9, 53.0], [-0.9, 53.1], [-1.0, 53.0]]] }
        },
        {
            "type": "Feature",
            "properties": { "LSOA21CD": "E01000002", "LSOA21NM": "North 001B", "pp_dec_combined": 1, "imd_decile": 2 },
            "geometry": { "type": "Polygon", "coordinates": [[[-0.8, 53.2], [-0.7, 53.2], [-0.7, 53.3], [-0.8, 53.2]]] }
        },
        {
            "type": "Feature",
            "properties": { "LSOA21CD": "E01000003", "LSOA21NM": "South 001A", "pp_dec_combined": 5, "imd_decile": 5 },
            "geometry": { "type": "Polygon", "coordinates": [[[0.0, 51.0], [0.1, 51.0], [0.1, 51.1], [0.0, 51.0]]] }
        },
        {
            "type": "Feature",
            "properties": { "LSOA21CD": "E01000004", "LSOA21NM": "South 001B", "pp_dec_combined": 10, "imd_decile": 9 },
            "geometry": { "type": "Polygon", "coordinates": [[[0.2, 51.2], [0.3, 51.2], [0.3, 51.3], [0.2, 51.2]]] }
        }
    ]
}"#;

const LAD: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        {
            "type": "Feature",
            "properties": { "LAD24CD": "E07000001", "LAD24NM": "Northshire", "combined": 1, "imd_rank": 2 },
            "geometry": { "type": "Polygon", "coordinates": [[[-1.0, 53.0], [-0.5, 53.0], [-0.5, 53.5], [-1.0, 53.0]]] }
        },
        {
            "type": "Feature",
            "properties": { "LAD24CD": "E07000002", "LAD24NM": "Southshire", "combined": 2, "imd_rank": 1 },
            "geometry": { "type": "Polygon", "coordinates": [[[0.0, 51.0], [0.5, 51.0], [0.5, 51.5], [0.0, 51.0]]] }
        }
    ]
}"#;

const CSV: &str = "lsoa21cd,lsoa21nm,lad24cd,lad24nm,pp_dec_combined,imd_decile,ppfi_imd_diff\n\
    E01000001,North 001A,E07000001,Northshire,8,3,5\n\
    E01000002,North 001B,E07000001,Northshire,1,2,-1\n\
    E01000003,South 001A,E07000002,Southshire,5,5,0\n\
    E01000004,South 001B,E07000002,Southshire,10,9,1\n";

pub fn store() -> (GeoStore, DomainRegistry) {
    let registry = DomainRegistry::embedded();
    let store = loader::parse(LSOA, LAD, CSV, &registry).unwrap();
    (store, registry)
}
