/// Text and number normalization helpers for scraped fields.
///
/// European classifieds print numbers as "12 500 €", "12.500" or "116.200 km",
/// with regular, no-break or narrow no-break spaces as thousands separators.
/// A separator followed by a group shorter than three digits is a decimal
/// comma; everything else is grouping.

const SEPARATORS: [char; 5] = ['.', ',', ' ', '\u{a0}', '\u{202f}'];

/// Extracts the first integer quantity from free text, e.g. "12.500 €" -> 12500.
/// Decimal fractions are rounded half-up. Returns None when no digit exists.
pub fn extract_integer(text: &str) -> Option<i64> {
    let chars: Vec<char> = text.chars().collect();
    let start = chars.iter().position(|c| c.is_ascii_digit())?;

    let mut groups: Vec<String> = vec![String::new()];
    let mut seps: Vec<char> = Vec::new();
    let mut i = start;
    while i < chars.len() {
        let c = chars[i];
        if c.is_ascii_digit() {
            groups.last_mut().unwrap().push(c);
            i += 1;
        } else if SEPARATORS.contains(&c)
            && i + 1 < chars.len()
            && chars[i + 1].is_ascii_digit()
        {
            seps.push(c);
            groups.push(String::new());
            i += 1;
        } else {
            break;
        }
    }

    let last_is_decimal = groups.len() > 1
        && groups.last().map(|g| g.len()) != Some(3)
        && matches!(seps.last(), Some('.') | Some(','));

    let (int_groups, fraction) = if last_is_decimal {
        let frac = groups.pop().unwrap();
        (groups, frac)
    } else {
        (groups, String::new())
    };

    let whole: String = int_groups.concat();
    let mut value: i64 = whole.parse().ok()?;
    if !fraction.is_empty() {
        let frac: f64 = format!("0.{fraction}").parse().ok()?;
        if frac >= 0.5 {
            value += 1;
        }
    }
    Some(value)
}

/// Trims and collapses internal whitespace runs (including no-break spaces).
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lower-cases and strips the diacritics that occur in French vehicle
/// descriptors ("électrique", "boîte", "Citroën").
pub fn fold(text: &str) -> String {
    text.chars()
        .flat_map(|c| c.to_lowercase())
        .map(|c| match c {
            'à' | 'â' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'î' | 'ï' => 'i',
            'ô' | 'ö' => 'o',
            'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            _ => c,
        })
        .collect()
}

/// Canonical form for make/model comparison: folded + whitespace-collapsed.
pub fn normalize_name(text: &str) -> String {
    collapse_whitespace(&fold(text))
}
