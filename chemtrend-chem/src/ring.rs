//! Ring perception.
//!
//! A bond lies on a ring exactly when it is not a bridge of the molecular
//! graph, so ring membership falls out of a single low-link depth-first
//! search without enumerating the rings themselves.

use crate::molecule::Molecule;

const UNVISITED: usize = usize::MAX;

/// Flag every bond that lies on at least one ring.
pub fn ring_bonds(mol: &Molecule) -> Vec<bool> {
    let n = mol.atom_count();
    let mut in_ring = vec![true; mol.bond_count()];
    let mut discovered = vec![UNVISITED; n];
    let mut low = vec![0usize; n];
    let mut clock = 0usize;

    for root in 0..n {
        if discovered[root] != UNVISITED {
            continue;
        }
        discovered[root] = clock;
        low[root] = clock;
        clock += 1;

        // (atom, bond used to reach it, next adjacency slot to visit)
        let mut stack: Vec<(usize, Option<usize>, usize)> = vec![(root, None, 0)];
        while let Some(frame) = stack.last_mut() {
            let (atom, via, slot) = *frame;
            if let Some(&(next, bond)) = mol.adjacency[atom].get(slot) {
                frame.2 += 1;
                if Some(bond) == via {
                    continue;
                }
                if discovered[next] == UNVISITED {
                    discovered[next] = clock;
                    low[next] = clock;
                    clock += 1;
                    stack.push((next, Some(bond), 0));
                } else {
                    low[atom] = low[atom].min(discovered[next]);
                }
            } else {
                stack.pop();
                if let (Some(bond), Some(&(parent, _, _))) = (via, stack.last()) {
                    low[parent] = low[parent].min(low[atom]);
                    if low[atom] > discovered[parent] {
                        in_ring[bond] = false;
                    }
                }
            }
        }
    }

    in_ring
}

/// Flag every atom that touches a ring bond.
pub fn ring_atoms(mol: &Molecule) -> Vec<bool> {
    let mut flags = vec![false; mol.atom_count()];
    for (bond, in_ring) in mol.bonds.iter().zip(ring_bonds(mol)) {
        if in_ring {
            flags[bond.begin] = true;
            flags[bond.end] = true;
        }
    }
    flags
}
