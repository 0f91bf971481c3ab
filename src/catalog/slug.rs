/// URL slug generation for category names
///
/// Lowercases, strips diacritics (Portuguese names are the norm here),
/// drops anything outside `[a-z0-9 _-]`, and collapses separator runs to a
/// single hyphen.

/// Build a URL-safe slug from a display name
pub fn slugify(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_separator = false;

    for ch in name.chars().flat_map(fold_diacritic) {
        let ch = ch.to_ascii_lowercase();
        match ch {
            'a'..='z' | '0'..='9' => {
                if pending_separator && !out.is_empty() {
                    out.push('-');
                }
                pending_separator = false;
                out.push(ch);
            }
            ' ' | '_' | '-' => pending_separator = true,
            _ => {}
        }
    }

    out
}

// Latin-1 diacritic folding; covers the accents that show up in
// Portuguese category names.
fn fold_diacritic(ch: char) -> std::option::IntoIter<char> {
    let folded = match ch {
        'á' | 'à' | 'â' | 'ã' | 'ä' | 'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' | 'É' | 'È' | 'Ê' | 'Ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' | 'Í' | 'Ì' | 'Î' | 'Ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' | 'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' | 'Ú' | 'Ù' | 'Û' | 'Ü' => 'u',
        'ç' | 'Ç' => 'c',
        'ñ' | 'Ñ' => 'n',
        other => other,
    };
    Some(folded).into_iter()
}
