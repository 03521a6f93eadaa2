use std::sync::LazyLock;

use regex::Regex;

// Known place names, checked in list order against the lower-cased text.
// The first hit wins and its casing here is what gets returned, so the
// ordering is part of the behavior. Duplicates are harmless.
const GAZETTEER: &[&str] = &[
    "Antwerpen",
    "Brussel",
    "Gent",
    "Leuven",
    "Mechelen",
    "Hasselt",
    "Brugge",
    "Oostende",
    "Charleroi",
    "Liège",
    "Namur",
    "Mons",
    "Tournai",
    "Kortrijk",
    "Aalst",
    "Sint-Niklaas",
    "Genk",
    "Roeselare",
    "Mouscron",
    "Verviers",
    "Dendermonde",
    "Turnhout",
    "Lokeren",
    "Brasschaat",
    "Schoten",
    "Wijnegem",
    "Ekeren",
    "Berchem",
    "Wilrijk",
    "Schilde",
    "Deurne",
    "Borgerhout",
    "Merksem",
    "Hoboken",
    "Mortsel",
    "Edegem",
    "Kontich",
    "Hove",
    "Lint",
    "Boechout",
    "Wommelgem",
    "Ranst",
    "Zandhoven",
    "Wuustwezel",
    "Kapellen",
    "Stabroek",
    "Essen",
    "Kalmthout",
    "Zwijndrecht",
    "Beveren",
    "Lier",
    "Heist-op-den-Berg",
    "Aarschot",
    "Diest",
    "Tessenderlo",
    "Beringen",
    "Geel",
    "Mol",
    "Turnhout",
    "Hoogstraten",
    "Westerlo",
    "Herentals",
    "Retie",
    "Balen",
    "Dessel",
    "Ravels",
    "Arendonk",
    "Oud-Turnhout",
    "Vosselaar",
    "Rijkevorsel",
    "Merksplas",
    "Zoersel",
    "Malle",
    "Schilde",
    "Wuustwezel",
    "Brustem",
    "Brussegem",
    "Leest",
    "Durbuysur-Ourthe",
    "Durbuy",
];

static POSTAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{4}\s+([A-Za-z][A-Za-z\s\-]+)\b").unwrap());

// Preposition patterns, tried in order. A captured span only counts when it
// contains a known place name.
static PREPOSITION_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?:in|te)\s+([A-Za-z][A-Za-z\s\-]{2,20})(?:\s|,|\.)",
        r"(?:van|uit)\s+([A-Za-z][A-Za-z\s\-]{2,20})(?:\s|,|\.)",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Find a location mention. A direct gazetteer hit returns the canonical
/// place name; otherwise the text after a postal code or a place preposition
/// is taken.
pub fn extract(text: &str) -> Option<String> {
    if text.is_empty() {
        return None;
    }

    let lower = text.to_lowercase();
    if let Some(place) = GAZETTEER
        .iter()
        .find(|place| lower.contains(&place.to_lowercase()))
    {
        return Some((*place).to_string());
    }

    if let Some(caps) = POSTAL_RE.captures(text) {
        return Some(caps[1].trim().to_string());
    }

    for re in PREPOSITION_RES.iter() {
        if let Some(caps) = re.captures(text) {
            let span = caps[1].trim();
            let span_lower = span.to_lowercase();
            if GAZETTEER
                .iter()
                .any(|place| span_lower.contains(&place.to_lowercase()))
            {
                return Some(span.to_string());
            }
        }
    }
    None
}
