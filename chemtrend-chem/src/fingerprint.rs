//! Hashed molecular fingerprints.
//!
//! Two families are provided:
//!
//! - [`path_fingerprint`] hashes every linear path of bonded atoms up to a
//!   maximum length (Daylight/FP2 style). This is the family the published
//!   similarity profiles were computed with.
//! - [`morgan_fingerprint`] hashes circular atom environments (ECFP style).

use chemtrend_core::ContentAddressable;
use sha2::{Digest, Sha256};

use crate::molecule::Molecule;
use crate::ring;

/// A fixed-width bit vector fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    words: Vec<u64>,
    nbits: usize,
}

impl Fingerprint {
    /// Create an empty fingerprint of `nbits` bits (storage rounded up to
    /// whole 64-bit words).
    ///
    /// # Panics
    ///
    /// Panics if `nbits` is zero.
    pub fn new(nbits: usize) -> Self {
        assert!(nbits > 0, "fingerprint width must be non-zero");
        Fingerprint {
            words: vec![0u64; nbits.div_ceil(64)],
            nbits,
        }
    }

    /// Set the bit at `pos` (folded into range).
    pub fn set_bit(&mut self, pos: usize) {
        let pos = pos % self.nbits;
        self.words[pos / 64] |= 1u64 << (pos % 64);
    }

    /// Test the bit at `pos` (folded into range).
    pub fn get_bit(&self, pos: usize) -> bool {
        let pos = pos % self.nbits;
        (self.words[pos / 64] >> (pos % 64)) & 1 == 1
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> u32 {
        self.words.iter().map(|w| w.count_ones()).sum()
    }

    /// Width in bits.
    pub fn nbits(&self) -> usize {
        self.nbits
    }

    /// Backing words, least significant bit first.
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    /// Whether no bit is set.
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }
}

impl ContentAddressable for Fingerprint {
    fn content_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update((self.nbits as u64).to_le_bytes());
        for word in &self.words {
            hasher.update(word.to_le_bytes());
        }
        hex::encode(hasher.finalize())
    }
}

// ── Hashing ────────────────────────────────────────────────────────────────

/// 64-bit FNV-1a, fed whole integers so bit assignments are stable across
/// platforms and releases.
#[derive(Clone, Copy)]
struct Fnv(u64);

impl Fnv {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    fn new() -> Self {
        Fnv(Self::OFFSET)
    }

    fn write(mut self, value: u64) -> Self {
        for byte in value.to_le_bytes() {
            self.0 ^= byte as u64;
            self.0 = self.0.wrapping_mul(Self::PRIME);
        }
        self
    }

    fn finish(self) -> u64 {
        self.0
    }
}

fn fold(hash: u64, nbits: usize) -> usize {
    (hash % nbits as u64) as usize
}

// ── Path fingerprint ───────────────────────────────────────────────────────

/// Linear-path fingerprint.
///
/// Every simple path of 1 to `max_length` atoms is encoded as the alternating
/// sequence of atom and bond codes, read in whichever direction compares
/// smaller so a path hashes identically from both ends.
///
/// # Panics
///
/// Panics if `nbits` is zero; [`PathSource::new`](crate::PathSource::new)
/// rejects that width with an error instead.
pub fn path_fingerprint(mol: &Molecule, max_length: usize, nbits: usize) -> Fingerprint {
    let mut fp = Fingerprint::new(nbits);
    if mol.atom_count() == 0 || max_length == 0 {
        return fp;
    }

    let in_ring = ring::ring_atoms(mol);
    let atom_codes: Vec<u64> = mol
        .atoms
        .iter()
        .enumerate()
        .map(|(i, atom)| {
            let mut code = atom.atomic_number as u64;
            code = code << 1 | atom.is_aromatic as u64;
            code = code << 1 | in_ring[i] as u64;
            code
        })
        .collect();

    let mut walker = PathWalker {
        mol,
        atom_codes: &atom_codes,
        max_length,
        visited: vec![false; mol.atom_count()],
        tokens: Vec::with_capacity(2 * max_length),
        fp: &mut fp,
    };
    for start in 0..mol.atom_count() {
        walker.visited[start] = true;
        walker.tokens.push(atom_codes[start]);
        walker.extend(start, 1);
        walker.tokens.pop();
        walker.visited[start] = false;
    }

    fp
}

struct PathWalker<'a> {
    mol: &'a Molecule,
    atom_codes: &'a [u64],
    max_length: usize,
    visited: Vec<bool>,
    /// atom, bond, atom, bond, ..., atom
    tokens: Vec<u64>,
    fp: &'a mut Fingerprint,
}

impl PathWalker<'_> {
    fn extend(&mut self, tail: usize, length: usize) {
        self.record();
        if length == self.max_length {
            return;
        }
        let mol = self.mol;
        for &(next, bond) in &mol.adjacency[tail] {
            if self.visited[next] {
                continue;
            }
            self.visited[next] = true;
            self.tokens.push(0x100 | mol.bonds[bond].order as u64);
            self.tokens.push(self.atom_codes[next]);
            self.extend(next, length + 1);
            self.tokens.truncate(self.tokens.len() - 2);
            self.visited[next] = false;
        }
    }

    fn record(&mut self) {
        let forward = self.tokens.iter();
        let backward = self.tokens.iter().rev();
        let hash = if backward.clone().lt(forward.clone()) {
            hash_tokens(backward)
        } else {
            hash_tokens(forward)
        };
        self.fp.set_bit(fold(hash, self.fp.nbits));
    }
}

/// Seeds path hashes apart from Morgan identifiers.
const PATH_SEED: u64 = 0x7061_7468;

fn hash_tokens<'a>(tokens: impl Iterator<Item = &'a u64>) -> u64 {
    tokens
        .fold(Fnv::new().write(PATH_SEED), |h, &t| h.write(t))
        .finish()
}

// ── Morgan fingerprint ─────────────────────────────────────────────────────

/// Morgan (ECFP-like) circular fingerprint.
///
/// `radius` controls the neighborhood size (2 = ECFP4, 3 = ECFP6).
///
/// # Panics
///
/// Panics if `nbits` is zero; [`MorganSource::new`](crate::MorganSource::new)
/// rejects that width with an error instead.
pub fn morgan_fingerprint(mol: &Molecule, radius: usize, nbits: usize) -> Fingerprint {
    let n = mol.atom_count();
    let mut fp = Fingerprint::new(nbits);
    if n == 0 {
        return fp;
    }

    let in_ring = ring::ring_atoms(mol);
    let mut ids: Vec<u64> = (0..n)
        .map(|i| {
            let atom = &mol.atoms[i];
            Fnv::new()
                .write(atom.atomic_number as u64)
                .write(mol.degree(i) as u64)
                .write(atom.hydrogens as u64)
                .write(atom.formal_charge as i64 as u64)
                .write(in_ring[i] as u64)
                .write(atom.is_aromatic as u64)
                .write(atom.isotope.unwrap_or(0) as u64)
                .finish()
        })
        .collect();
    for &id in &ids {
        fp.set_bit(fold(id, nbits));
    }

    for _ in 0..radius {
        let next: Vec<u64> = (0..n)
            .map(|i| {
                let mut env: Vec<(u64, u64)> = mol.adjacency[i]
                    .iter()
                    .map(|&(nbr, bond)| (mol.bonds[bond].order as u64, ids[nbr]))
                    .collect();
                env.sort_unstable();
                env.iter()
                    .fold(Fnv::new().write(ids[i]), |h, &(order, id)| h.write(order).write(id))
                    .finish()
            })
            .collect();
        for &id in &next {
            fp.set_bit(fold(id, nbits));
        }
        ids = next;
    }

    fp
}
