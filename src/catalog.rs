// Fixed lookup tables for the Rest-Mex dataset: dataset-encoded region
// spellings, state capital coordinates and the polarity palette.
//
// The tables are closed: there is no dynamic region discovery. A region key
// that resolves to a name without coordinates is excluded from all
// geographic output, so `verify_catalog` makes sure the two tables agree
// before any data is loaded.
use once_cell::sync::Lazy;
use std::collections::{BTreeSet, HashMap};
use thiserror::Error;

/// Header columns the input CSV must carry (exact, case-sensitive).
pub const REQUIRED_COLUMNS: [&str; 6] = ["Title", "Review", "Polarity", "Town", "Region", "Type"];

/// Dataset spellings mapped to display names.
static REGION_ALIASES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("QuintanaRoo", "Quintana Roo"),
        ("Estado_de_Mexico", "Estado de Mexico"),
        ("Baja_CaliforniaSur", "Baja California Sur"),
        ("San_Luis_Potosi", "San Luis Potosi"),
        ("Michoacan", "Michoacan"),
        ("Queretaro", "Queretaro"),
        ("Yucatan", "Yucatan"),
        ("Nayarit", "Nayarit"),
        ("Chiapas", "Chiapas"),
        ("Chihuahua", "Chihuahua"),
        ("Guerrero", "Guerrero"),
        ("Puebla", "Puebla"),
        ("Jalisco", "Jalisco"),
        ("Coahuila", "Coahuila"),
        ("Veracruz", "Veracruz"),
        ("Hidalgo", "Hidalgo"),
        ("Morelos", "Morelos"),
        ("Oaxaca", "Oaxaca"),
        ("Guanajuato", "Guanajuato"),
    ])
});

/// State capital coordinates (lat, lon), keyed by display name.
static REGION_COORDINATES: Lazy<HashMap<&'static str, (f64, f64)>> = Lazy::new(|| {
    HashMap::from([
        ("Quintana Roo", (21.1619, -86.8515)),
        ("Estado de Mexico", (19.4326, -99.6795)),
        ("Baja California Sur", (24.1442, -110.3005)),
        ("San Luis Potosi", (22.1565, -100.9855)),
        ("Michoacan", (19.7007, -101.1884)),
        ("Queretaro", (20.5888, -100.3899)),
        ("Yucatan", (20.9674, -89.5926)),
        ("Nayarit", (21.7514, -104.8455)),
        ("Chiapas", (16.7569, -93.1292)),
        ("Chihuahua", (28.6353, -106.0889)),
        ("Guerrero", (17.4391, -99.5451)),
        ("Puebla", (19.0414, -98.2063)),
        ("Jalisco", (20.6597, -103.3496)),
        ("Coahuila", (25.4232, -101.0053)),
        ("Veracruz", (19.1738, -96.1342)),
        ("Hidalgo", (20.0911, -98.7624)),
        ("Morelos", (18.6813, -99.1013)),
        ("Oaxaca", (17.0732, -96.7266)),
        ("Guanajuato", (21.0190, -101.2574)),
    ])
});

/// Resolve a raw region key to its display name and coordinates.
///
/// Unknown keys fall back to themselves as the display name; keys whose
/// display name has no coordinates return `None` and are excluded from
/// geographic aggregation.
pub fn canonicalize(region_key: &str) -> Option<(&'static str, (f64, f64))> {
    match REGION_ALIASES.get(region_key) {
        Some(name) => REGION_COORDINATES.get(name).map(|&coords| (*name, coords)),
        None => REGION_COORDINATES
            .get_key_value(region_key)
            .map(|(name, &coords)| (*name, coords)),
    }
}

/// Display name for a raw region key, with identity fallback. Used for
/// console listings where a region without coordinates should still show up.
pub fn display_name(region_key: &str) -> &str {
    match REGION_ALIASES.get(region_key) {
        Some(&name) => name,
        None => region_key,
    }
}

pub fn polarity_color(polarity: u8) -> &'static str {
    match polarity {
        1 => "#DC2626",
        2 => "#F87171",
        3 => "#6B7280",
        4 => "#34D399",
        _ => "#10B981",
    }
}

pub fn polarity_label(polarity: u8) -> &'static str {
    match polarity {
        1 => "Muy Negativa",
        2 => "Negativa",
        3 => "Neutral",
        4 => "Positiva",
        _ => "Muy Positiva",
    }
}

/// Lowercase label used in generated file names (`mapa_polaridad_1_muy_negativa.html`).
pub fn polarity_slug(polarity: u8) -> &'static str {
    match polarity {
        1 => "muy_negativa",
        2 => "negativa",
        3 => "neutral",
        4 => "positiva",
        _ => "muy_positiva",
    }
}

#[derive(Debug, Error)]
#[error("region tables disagree on canonical names: {names:?}")]
pub struct CatalogError {
    pub names: Vec<String>,
}

/// Check that the alias targets and the coordinate keys are the same set.
///
/// A name present in one table but not the other would silently drop a
/// region from every map and table, so a mismatch aborts at startup.
pub fn verify_catalog() -> Result<(), CatalogError> {
    let alias_targets: BTreeSet<&str> = REGION_ALIASES.values().copied().collect();
    let coordinate_keys: BTreeSet<&str> = REGION_COORDINATES.keys().copied().collect();
    let names: Vec<String> = alias_targets
        .symmetric_difference(&coordinate_keys)
        .map(|n| n.to_string())
        .collect();
    if names.is_empty() {
        Ok(())
    } else {
        Err(CatalogError { names })
    }
}
