//! SMILES parser.
//!
//! Covers the OpenSMILES subset found in medicinal-chemistry tables:
//! organic-subset and bracket atoms, explicit bonds, branches, ring closures
//! (`1`-`9` and `%nn`) and dot-separated fragments. Stereo markers are read
//! and dropped since fingerprints here are two-dimensional.

use std::collections::BTreeMap;

use chemtrend_core::{Result, TrendError};

use crate::element::{element_by_number, element_by_symbol, Element};
use crate::molecule::{Atom, Bond, BondOrder, Molecule};

/// Parse a SMILES string into a [`Molecule`].
///
/// Only the first whitespace-delimited token is read, so a trailing title
/// (`"CCO ethanol"`) is ignored the same way SMILES files treat it.
pub fn parse_smiles(smiles: &str) -> Result<Molecule> {
    parse_smiles_named(smiles, "")
}

/// Parse a SMILES string into a [`Molecule`] with the given name.
pub fn parse_smiles_named(smiles: &str, name: &str) -> Result<Molecule> {
    let token = smiles
        .split_whitespace()
        .next()
        .ok_or_else(|| TrendError::Parse("empty SMILES".into()))?;

    let mut reader = Reader::new(token);
    reader.read()?;
    reader.check_closed()?;
    reader.assign_hydrogens();
    Ok(Molecule::new(name, reader.atoms, reader.bonds))
}

/// A ring-closure digit waiting for its partner.
struct OpenRing {
    atom: usize,
    order: Option<BondOrder>,
}

struct Reader<'a> {
    input: &'a [u8],
    pos: usize,
    atoms: Vec<Atom>,
    bonds: Vec<Bond>,
    open_rings: BTreeMap<u16, OpenRing>,
    /// Atoms to return to at each `)`.
    branches: Vec<usize>,
    prev: Option<usize>,
    pending: Option<BondOrder>,
}

impl<'a> Reader<'a> {
    fn new(input: &'a str) -> Self {
        Reader {
            input: input.as_bytes(),
            pos: 0,
            atoms: Vec::new(),
            bonds: Vec::new(),
            open_rings: BTreeMap::new(),
            branches: Vec::new(),
            prev: None,
            pending: None,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let ch = self.peek();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    fn error(&self, msg: impl std::fmt::Display) -> TrendError {
        TrendError::Parse(format!("{msg} at position {}", self.pos))
    }

    fn read(&mut self) -> Result<()> {
        while let Some(ch) = self.peek() {
            match ch {
                b'(' => {
                    let anchor = self
                        .prev
                        .ok_or_else(|| self.error("branch without a preceding atom"))?;
                    if self.pending.is_some() {
                        return Err(self.error("bond symbol before '('"));
                    }
                    self.bump();
                    self.branches.push(anchor);
                }
                b')' => {
                    if self.pending.is_some() {
                        return Err(self.error("dangling bond before ')'"));
                    }
                    let anchor = self
                        .branches
                        .pop()
                        .ok_or_else(|| self.error("unbalanced ')'"))?;
                    self.bump();
                    self.prev = Some(anchor);
                }
                b'-' | b'=' | b'#' | b':' | b'/' | b'\\' => {
                    if self.prev.is_none() {
                        return Err(self.error("bond without a preceding atom"));
                    }
                    if self.pending.is_some() {
                        return Err(self.error("consecutive bond symbols"));
                    }
                    self.bump();
                    self.pending = Some(match ch {
                        b'=' => BondOrder::Double,
                        b'#' => BondOrder::Triple,
                        b':' => BondOrder::Aromatic,
                        _ => BondOrder::Single,
                    });
                }
                b'.' => {
                    if self.pending.is_some() {
                        return Err(self.error("dangling bond before '.'"));
                    }
                    self.bump();
                    self.prev = None;
                }
                b'%' => {
                    self.bump();
                    let label = self.ring_label()?;
                    self.ring_closure(label)?;
                }
                b'0'..=b'9' => {
                    self.bump();
                    self.ring_closure((ch - b'0') as u16)?;
                }
                b'[' => {
                    let atom = self.bracket_atom()?;
                    self.attach(atom)?;
                }
                _ => {
                    let atom = self.organic_atom()?;
                    self.attach(atom)?;
                }
            }
        }
        Ok(())
    }

    fn organic_atom(&mut self) -> Result<Atom> {
        let start = self.pos;
        let ch = self.bump().ok_or_else(|| self.error("unexpected end of SMILES"))?;

        let (symbol, aromatic) = match ch {
            b'B' if self.peek() == Some(b'r') => ("Br", false),
            b'C' if self.peek() == Some(b'l') => ("Cl", false),
            b'B' => ("B", false),
            b'C' => ("C", false),
            b'N' => ("N", false),
            b'O' => ("O", false),
            b'P' => ("P", false),
            b'S' => ("S", false),
            b'F' => ("F", false),
            b'I' => ("I", false),
            b'b' => ("B", true),
            b'c' => ("C", true),
            b'n' => ("N", true),
            b'o' => ("O", true),
            b'p' => ("P", true),
            b's' => ("S", true),
            other => {
                self.pos = start;
                return Err(self.error(format_args!("unexpected character '{}'", other as char)));
            }
        };
        if symbol.len() == 2 {
            self.bump();
        }

        let element = element_by_symbol(symbol)
            .ok_or_else(|| self.error(format_args!("unknown element '{symbol}'")))?;
        Ok(Atom {
            atomic_number: element.atomic_number,
            formal_charge: 0,
            isotope: None,
            is_aromatic: aromatic,
            hydrogens: 0,
            bracket: false,
        })
    }

    fn bracket_atom(&mut self) -> Result<Atom> {
        self.bump(); // '['

        let isotope = self.number(3).map(|n| n as u16);

        let (element, aromatic) = self.bracket_symbol()?;
        self.skip_chirality();

        let hydrogens = if self.peek() == Some(b'H') {
            self.bump();
            self.number(1).unwrap_or(1) as u8
        } else {
            0
        };

        let formal_charge = self.charge()?;

        // Atom class: parsed for validity, not stored.
        if self.peek() == Some(b':') {
            self.bump();
            if self.number(4).is_none() {
                return Err(self.error("expected atom class after ':'"));
            }
        }

        if self.bump() != Some(b']') {
            return Err(self.error("expected ']' to close bracket atom"));
        }

        Ok(Atom {
            atomic_number: element.atomic_number,
            formal_charge,
            isotope,
            is_aromatic: aromatic,
            hydrogens,
            bracket: true,
        })
    }

    fn bracket_symbol(&mut self) -> Result<(&'static Element, bool)> {
        let first = self.bump().ok_or_else(|| self.error("unterminated bracket atom"))?;
        if !first.is_ascii_alphabetic() {
            return Err(self.error(format_args!(
                "unexpected character '{}' in bracket atom",
                first as char
            )));
        }

        let aromatic = first.is_ascii_lowercase();
        let head = first.to_ascii_uppercase() as char;

        // Two-letter symbols win when they exist ("Cl", "se", "As").
        if let Some(second) = self.peek().filter(u8::is_ascii_lowercase) {
            let two = format!("{head}{}", second as char);
            if let Some(element) = element_by_symbol(&two) {
                self.bump();
                return Ok((element, aromatic));
            }
        }

        let one = head.to_string();
        let element = element_by_symbol(&one)
            .ok_or_else(|| self.error(format_args!("unknown element '{one}'")))?;
        Ok((element, aromatic))
    }

    fn skip_chirality(&mut self) {
        if self.peek() != Some(b'@') {
            return;
        }
        while self.peek() == Some(b'@') {
            self.bump();
        }
        let class = self.input.get(self.pos..self.pos + 2);
        if matches!(class, Some(b"TH" | b"AL" | b"SP" | b"TB" | b"OH")) {
            self.pos += 2;
            self.number(2);
        }
    }

    fn charge(&mut self) -> Result<i8> {
        let sign: i16 = match self.peek() {
            Some(b'+') => 1,
            Some(b'-') => -1,
            _ => return Ok(0),
        };
        let symbol = self.bump();

        let magnitude = match self.number(2) {
            Some(n) => n as i16,
            None => {
                let mut count = 1i16;
                while self.peek() == symbol {
                    self.bump();
                    count += 1;
                }
                count
            }
        };
        i8::try_from(sign * magnitude).map_err(|_| self.error("charge out of range"))
    }

    /// Read up to `max_digits` decimal digits.
    fn number(&mut self, max_digits: usize) -> Option<u32> {
        let mut value: Option<u32> = None;
        for _ in 0..max_digits {
            match self.peek() {
                Some(d) if d.is_ascii_digit() => {
                    self.bump();
                    value = Some(value.unwrap_or(0) * 10 + (d - b'0') as u32);
                }
                _ => break,
            }
        }
        value
    }

    fn ring_label(&mut self) -> Result<u16> {
        match (self.bump(), self.bump()) {
            (Some(a), Some(b)) if a.is_ascii_digit() && b.is_ascii_digit() => {
                Ok((a - b'0') as u16 * 10 + (b - b'0') as u16)
            }
            _ => Err(self.error("expected two digits after '%'")),
        }
    }

    fn ring_closure(&mut self, label: u16) -> Result<()> {
        let current = self
            .prev
            .ok_or_else(|| self.error("ring closure without a preceding atom"))?;
        let written = self.pending.take();

        match self.open_rings.remove(&label) {
            Some(open) => {
                if open.atom == current {
                    return Err(self.error(format_args!(
                        "ring closure {label} bonds an atom to itself"
                    )));
                }
                let order = match (open.order, written) {
                    (Some(a), Some(b)) if a != b => {
                        return Err(self.error(format_args!(
                            "conflicting bond orders on ring closure {label}"
                        )));
                    }
                    (a, b) => b.or(a),
                };
                self.add_bond(open.atom, current, order)
            }
            None => {
                self.open_rings.insert(label, OpenRing { atom: current, order: written });
                Ok(())
            }
        }
    }

    /// Push an atom and bond it to the previous one on the chain.
    fn attach(&mut self, atom: Atom) -> Result<()> {
        let index = self.atoms.len();
        self.atoms.push(atom);
        let order = self.pending.take();
        if let Some(prev) = self.prev {
            self.add_bond(prev, index, order)?;
        }
        self.prev = Some(index);
        Ok(())
    }

    fn add_bond(&mut self, begin: usize, end: usize, written: Option<BondOrder>) -> Result<()> {
        let duplicate = self
            .bonds
            .iter()
            .any(|b| (b.begin == begin && b.end == end) || (b.begin == end && b.end == begin));
        if duplicate {
            return Err(self.error(format_args!(
                "duplicate bond between atoms {begin} and {end}"
            )));
        }

        let both_aromatic = self.atoms[begin].is_aromatic && self.atoms[end].is_aromatic;
        let order = match written {
            Some(order) => order,
            None if both_aromatic => BondOrder::Aromatic,
            None => BondOrder::Single,
        };
        self.bonds.push(Bond { begin, end, order });
        Ok(())
    }

    fn check_closed(&self) -> Result<()> {
        if self.pending.is_some() {
            return Err(self.error("dangling bond at end of SMILES"));
        }
        if !self.branches.is_empty() {
            return Err(self.error(format_args!("{} unclosed '('", self.branches.len())));
        }
        if let Some(label) = self.open_rings.keys().next() {
            return Err(self.error(format_args!("unclosed ring closure {label}")));
        }
        if self.atoms.is_empty() {
            return Err(TrendError::Parse("SMILES contains no atoms".into()));
        }
        Ok(())
    }

    fn assign_hydrogens(&mut self) {
        let mut bond_sums = vec![0u8; self.atoms.len()];
        for bond in &self.bonds {
            let v = bond.order.valence();
            bond_sums[bond.begin] = bond_sums[bond.begin].saturating_add(v);
            bond_sums[bond.end] = bond_sums[bond.end].saturating_add(v);
        }

        for (atom, bond_sum) in self.atoms.iter_mut().zip(bond_sums) {
            if atom.bracket {
                continue;
            }
            if let Some(element) = element_by_number(atom.atomic_number) {
                atom.hydrogens = element.implicit_hydrogens(bond_sum, atom.is_aromatic);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_ethanol() {
        let mol = parse_smiles("CCO").unwrap();
        assert_eq!(mol.atom_count(), 3);
        assert_eq!(mol.bond_count(), 2);
        let hydrogens: Vec<u8> = mol.atoms.iter().map(|a| a.hydrogens).collect();
        assert_eq!(hydrogens, vec![3, 2, 1]);
    }

    #[test]
    fn parse_benzene_ring_closure() {
        let mol = parse_smiles("c1ccccc1").unwrap();
        assert_eq!(mol.atom_count(), 6);
        assert_eq!(mol.bond_count(), 6);
        assert!(mol.bonds.iter().all(|b| b.order == BondOrder::Aromatic));
        assert!(mol.atoms.iter().all(|a| a.is_aromatic && a.hydrogens == 1));
    }

    #[test]
    fn parse_branches_and_multiple_bonds() {
        // Acetic acid
        let mol = parse_smiles("CC(=O)O").unwrap();
        assert_eq!(mol.atom_count(), 4);
        assert_eq!(mol.degree(1), 3);
        assert_eq!(mol.bond_between(1, 2).unwrap().order, BondOrder::Double);
        assert_eq!(mol.atoms[2].hydrogens, 0);
        assert_eq!(mol.atoms[3].hydrogens, 1);

        let mol = parse_smiles("C#N").unwrap();
        assert_eq!(mol.bonds[0].order, BondOrder::Triple);
        assert_eq!(mol.atoms[0].hydrogens, 1);
    }

    #[test]
    fn parse_halogens_and_two_letter_symbols() {
        let mol = parse_smiles("ClCBr").unwrap();
        let z: Vec<u8> = mol.atoms.iter().map(|a| a.atomic_number).collect();
        assert_eq!(z, vec![17, 6, 35]);
    }

    #[test]
    fn parse_bracket_atoms() {
        let mol = parse_smiles("[NH4+]").unwrap();
        assert_eq!(mol.atoms[0].atomic_number, 7);
        assert_eq!(mol.atoms[0].formal_charge, 1);
        assert_eq!(mol.atoms[0].hydrogens, 4);

        let mol = parse_smiles("[13CH3][O-]").unwrap();
        assert_eq!(mol.atoms[0].isotope, Some(13));
        assert_eq!(mol.atoms[0].hydrogens, 3);
        assert_eq!(mol.atoms[1].formal_charge, -1);

        let mol = parse_smiles("[Fe++]").unwrap();
        assert_eq!(mol.atoms[0].formal_charge, 2);

        let mol = parse_smiles("c1cc[nH]c1").unwrap();
        assert_eq!(mol.atoms[3].hydrogens, 1);
        assert!(mol.atoms[3].is_aromatic);

        let mol = parse_smiles("[se]1cccc1").unwrap();
        assert_eq!(mol.atoms[0].atomic_number, 34);
        assert!(mol.atoms[0].is_aromatic);
    }

    #[test]
    fn parse_stereo_markers() {
        let mol = parse_smiles("N[C@@H](C)C(=O)O").unwrap();
        assert_eq!(mol.atom_count(), 6);
        assert_eq!(mol.atoms[1].hydrogens, 1);

        let mol = parse_smiles("F/C=C/F").unwrap();
        assert_eq!(mol.bond_count(), 3);
        assert_eq!(mol.bonds[1].order, BondOrder::Double);

        let mol = parse_smiles("C[C@TH1H](O)N").unwrap();
        assert_eq!(mol.atom_count(), 4);
    }

    #[test]
    fn parse_percent_ring_closure() {
        let mol = parse_smiles("C%12CCCCC%12").unwrap();
        assert_eq!(mol.atom_count(), 6);
        assert_eq!(mol.bond_count(), 6);
    }

    #[test]
    fn parse_fragments_and_title() {
        let mol = parse_smiles("[Na+].[Cl-]").unwrap();
        assert_eq!(mol.atom_count(), 2);
        assert_eq!(mol.bond_count(), 0);

        let mol = parse_smiles_named("CCO ethanol", "ethanol").unwrap();
        assert_eq!(mol.atom_count(), 3);
        assert_eq!(mol.name, "ethanol");
    }

    #[test]
    fn ring_bond_order_on_either_digit() {
        let mol = parse_smiles("C=1CCCCC1").unwrap();
        assert_eq!(mol.bond_between(0, 5).unwrap().order, BondOrder::Double);
        let mol = parse_smiles("C1CCCCC=1").unwrap();
        assert_eq!(mol.bond_between(0, 5).unwrap().order, BondOrder::Double);
    }

    #[test]
    fn malformed_smiles_are_rejected() {
        for bad in [
            "", "   ", "C(", "C)", "C1CC", "[", "[C", "[Xx]", "CX", "C==C", "=C", "C=", "C(=)C",
            "C11", "C12CC12", "C=1CC#1", "%1", "()", "C.=C",
        ] {
            let err = parse_smiles(bad).unwrap_err();
            assert!(matches!(err, TrendError::Parse(_)), "{bad:?} gave {err:?}");
        }
    }
}
