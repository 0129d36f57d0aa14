use phf::{Map, phf_map};

static ATOMIC_NUMBERS: Map<&'static str, u8> = phf_map! {
    "H" => 1, "He" => 2,
    "Li" => 3, "Be" => 4, "B" => 5, "C" => 6, "N" => 7, "O" => 8, "F" => 9, "Ne" => 10,
    "Na" => 11, "Mg" => 12, "Al" => 13, "Si" => 14, "P" => 15, "S" => 16, "Cl" => 17, "Ar" => 18,
    "K" => 19, "Ca" => 20, "Sc" => 21, "Ti" => 22, "V" => 23, "Cr" => 24, "Mn" => 25, "Fe" => 26,
    "Co" => 27, "Ni" => 28, "Cu" => 29, "Zn" => 30, "Ga" => 31, "Ge" => 32, "As" => 33, "Se" => 34,
    "Br" => 35, "Kr" => 36,
    "Rb" => 37, "Sr" => 38, "Y" => 39, "Zr" => 40, "Nb" => 41, "Mo" => 42, "Tc" => 43, "Ru" => 44,
    "Rh" => 45, "Pd" => 46, "Ag" => 47, "Cd" => 48, "In" => 49, "Sn" => 50, "Sb" => 51, "Te" => 52,
    "I" => 53, "Xe" => 54,
    "Cs" => 55, "Ba" => 56, "La" => 57, "Ce" => 58, "Pr" => 59, "Nd" => 60, "Pm" => 61, "Sm" => 62,
    "Eu" => 63, "Gd" => 64, "Tb" => 65, "Dy" => 66, "Ho" => 67, "Er" => 68, "Tm" => 69, "Yb" => 70,
    "Lu" => 71, "Hf" => 72, "Ta" => 73, "W" => 74, "Re" => 75, "Os" => 76, "Ir" => 77, "Pt" => 78,
    "Au" => 79, "Hg" => 80, "Tl" => 81, "Pb" => 82, "Bi" => 83, "Po" => 84, "At" => 85, "Rn" => 86,
    "Fr" => 87, "Ra" => 88, "Ac" => 89, "Th" => 90, "Pa" => 91, "U" => 92, "Np" => 93, "Pu" => 94,
    "Am" => 95, "Cm" => 96, "Bk" => 97, "Cf" => 98, "Es" => 99, "Fm" => 100, "Md" => 101,
    "No" => 102, "Lr" => 103, "D" => 1,
};

/// Returns the atomic number of a canonical element symbol (`"Cu"`, not `"CU"`).
pub fn atomic_number(symbol: &str) -> Option<u8> {
    ATOMIC_NUMBERS.get(symbol).copied()
}

/// Normalises the capitalisation of an element symbol and checks that it exists.
///
/// `"cu"`, `"CU"` and `" Cu "` all map to `"Cu"`. Returns `None` for strings that are
/// not element symbols.
pub fn canonical_symbol(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let mut chars = trimmed.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }
    let mut symbol = String::with_capacity(trimmed.len());
    symbol.push(first.to_ascii_uppercase());
    for c in chars {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        symbol.push(c.to_ascii_lowercase());
    }
    ATOMIC_NUMBERS.contains_key(symbol.as_str()).then_some(symbol)
}

/// Extracts the element symbol from a crystallographic atom label or type symbol.
///
/// Labels such as `"Cu1"`, `"O12A"` or oxidation-state types such as `"Cu2+"` are reduced
/// to their leading alphabetic part. A second letter only counts when it is lowercase, so
/// `"CA1"` is a carbon while `"Ca1"` is calcium.
pub fn symbol_from_label(label: &str) -> Option<String> {
    let mut chars = label.trim().chars();
    let first = chars.next().filter(|c| c.is_ascii_uppercase())?;
    if let Some(second) = chars.next().filter(|c| c.is_ascii_lowercase()) {
        let pair: String = [first, second].iter().collect();
        if let Some(symbol) = canonical_symbol(&pair) {
            return Some(symbol);
        }
    }
    canonical_symbol(&first.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atomic_number_looks_up_canonical_symbols() {
        assert_eq!(atomic_number("H"), Some(1));
        assert_eq!(atomic_number("Cu"), Some(29));
        assert_eq!(atomic_number("Zr"), Some(40));
        assert_eq!(atomic_number("CU"), None);
        assert_eq!(atomic_number("Xx"), None);
    }

    #[test]
    fn canonical_symbol_normalises_case_and_whitespace() {
        assert_eq!(canonical_symbol("cu").as_deref(), Some("Cu"));
        assert_eq!(canonical_symbol("CU").as_deref(), Some("Cu"));
        assert_eq!(canonical_symbol(" O ").as_deref(), Some("O"));
        assert_eq!(canonical_symbol("zn").as_deref(), Some("Zn"));
    }

    #[test]
    fn canonical_symbol_rejects_non_elements() {
        assert_eq!(canonical_symbol(""), None);
        assert_eq!(canonical_symbol("Q"), None);
        assert_eq!(canonical_symbol("O2"), None);
        assert_eq!(canonical_symbol("O2_end"), None);
        assert_eq!(canonical_symbol("1H"), None);
    }

    #[test]
    fn symbol_from_label_handles_crystallographic_labels() {
        assert_eq!(symbol_from_label("Cu1").as_deref(), Some("Cu"));
        assert_eq!(symbol_from_label("Cu2+").as_deref(), Some("Cu"));
        assert_eq!(symbol_from_label("O12A").as_deref(), Some("O"));
        assert_eq!(symbol_from_label("Co3").as_deref(), Some("Co"));
        assert_eq!(symbol_from_label("CA1").as_deref(), Some("C"));
        assert_eq!(symbol_from_label("C7").as_deref(), Some("C"));
        assert_eq!(symbol_from_label("H1A").as_deref(), Some("H"));
    }

    #[test]
    fn symbol_from_label_falls_back_to_single_letter() {
        assert_eq!(symbol_from_label("OA").as_deref(), Some("O"));
        assert_eq!(symbol_from_label("Nx2").as_deref(), Some("N"));
    }

    #[test]
    fn symbol_from_label_rejects_labels_without_element() {
        assert_eq!(symbol_from_label("123"), None);
        assert_eq!(symbol_from_label(""), None);
        assert_eq!(symbol_from_label("Q1"), None);
        assert_eq!(symbol_from_label("cu1"), None);
    }
}
