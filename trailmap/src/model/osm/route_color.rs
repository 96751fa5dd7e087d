use std::collections::HashMap;

/// the route colour as a 6-digit hex string without `#`: the `colour` (or
/// `color`) tag when present, otherwise a colour derived from the route name.
pub fn route_color(tags: &HashMap<String, String>, name: &str) -> String {
    let tagged = tags
        .get("colour")
        .or_else(|| tags.get("color"))
        .map(|c| c.trim().trim_start_matches('#'))
        .filter(|c| !c.is_empty());
    match tagged {
        Some(c) => c.to_string(),
        None => deterministic_color(name),
    }
}

/// a stable, saturated colour for a name. each channel is lifted to at least
/// 0x40 so no route renders near-black.
pub fn deterministic_color(name: &str) -> String {
    let h = seahash::hash(name.as_bytes()) >> 40;
    let r = ((h >> 16) & 0xFF) | 0x40;
    let g = ((h >> 8) & 0xFF) | 0x40;
    let b = (h & 0xFF) | 0x40;
    format!("{r:02x}{g:02x}{b:02x}")
}
