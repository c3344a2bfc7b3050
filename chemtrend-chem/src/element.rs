//! Element table for the symbols accepted by the SMILES parser.

/// A chemical element with the valences SMILES uses for implicit hydrogens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Element {
    pub atomic_number: u8,
    pub symbol: &'static str,
    /// Allowed valences for organic-subset atoms, lowest first. Empty for
    /// elements that only appear in brackets.
    pub valences: &'static [u8],
}

impl Element {
    /// Whether the element may be written without brackets.
    pub fn is_organic_subset(&self) -> bool {
        !self.valences.is_empty()
    }

    /// Implicit hydrogen count for an unbracketed atom.
    ///
    /// `bond_sum` is the sum of explicit bond orders, with aromatic bonds
    /// counted as 1. Aromatic atoms spend one extra valence on the pi system
    /// and only ever use their lowest valence.
    pub fn implicit_hydrogens(&self, bond_sum: u8, aromatic: bool) -> u8 {
        if aromatic {
            let used = bond_sum.saturating_add(1);
            return match self.valences.first() {
                Some(&v) if v >= used => v - used,
                _ => 0,
            };
        }
        self.valences
            .iter()
            .find(|&&v| v >= bond_sum)
            .map_or(0, |&v| v - bond_sum)
    }
}

macro_rules! el {
    ($z:expr, $sym:expr) => {
        Element { atomic_number: $z, symbol: $sym, valences: &[] }
    };
    ($z:expr, $sym:expr, $($v:expr),+) => {
        Element { atomic_number: $z, symbol: $sym, valences: &[$($v),+] }
    };
}

static ELEMENTS: &[Element] = &[
    el!(1, "H"),
    el!(2, "He"),
    el!(3, "Li"),
    el!(4, "Be"),
    el!(5, "B", 3),
    el!(6, "C", 4),
    el!(7, "N", 3, 5),
    el!(8, "O", 2),
    el!(9, "F", 1),
    el!(10, "Ne"),
    el!(11, "Na"),
    el!(12, "Mg"),
    el!(13, "Al"),
    el!(14, "Si"),
    el!(15, "P", 3, 5),
    el!(16, "S", 2, 4, 6),
    el!(17, "Cl", 1),
    el!(18, "Ar"),
    el!(19, "K"),
    el!(20, "Ca"),
    el!(25, "Mn"),
    el!(26, "Fe"),
    el!(27, "Co"),
    el!(28, "Ni"),
    el!(29, "Cu"),
    el!(30, "Zn"),
    el!(31, "Ga"),
    el!(32, "Ge"),
    el!(33, "As"),
    el!(34, "Se"),
    el!(35, "Br", 1),
    el!(36, "Kr"),
    el!(37, "Rb"),
    el!(38, "Sr"),
    el!(44, "Ru"),
    el!(45, "Rh"),
    el!(46, "Pd"),
    el!(47, "Ag"),
    el!(48, "Cd"),
    el!(50, "Sn"),
    el!(51, "Sb"),
    el!(52, "Te"),
    el!(53, "I", 1),
    el!(54, "Xe"),
    el!(55, "Cs"),
    el!(56, "Ba"),
    el!(78, "Pt"),
    el!(79, "Au"),
    el!(80, "Hg"),
    el!(82, "Pb"),
    el!(83, "Bi"),
];

/// Look up an element by its symbol (case-sensitive, e.g. "C", "Cl").
pub fn element_by_symbol(symbol: &str) -> Option<&'static Element> {
    ELEMENTS.iter().find(|e| e.symbol == symbol)
}

/// Look up an element by atomic number.
pub fn element_by_number(z: u8) -> Option<&'static Element> {
    ELEMENTS.iter().find(|e| e.atomic_number == z)
}
