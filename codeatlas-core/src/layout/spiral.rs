//! Square-spiral indexing
//!
//! Index 0 is the center cell. Ring `r` holds the `8r` cells on the border of
//! the `(2r+1) x (2r+1)` square, walked up the right edge, leftwards along the
//! top, down the left edge, then rightwards along the bottom.

/// Ring holding spiral index `index`: `ceil((sqrt(index + 1) - 1) / 2)`
pub fn ring_for_index(index: usize) -> u64 {
    let target = index as u64 + 1;
    let mut ring = ((((target as f64).sqrt()) - 1.0) / 2.0).ceil().max(0.0) as u64;
    // Float rounding can land one ring off near perfect squares.
    while ring > 0 && side_cells(ring - 1) * side_cells(ring - 1) >= target {
        ring -= 1;
    }
    while side_cells(ring) * side_cells(ring) < target {
        ring += 1;
    }
    ring
}

const fn side_cells(ring: u64) -> u64 {
    2 * ring + 1
}

/// Integer grid offset `(x, z)` of spiral index `index` from the center
pub fn spiral_offset(index: usize) -> (i64, i64) {
    if index == 0 {
        return (0, 0);
    }

    let ring = ring_for_index(index) as i64;
    let cells_before = (2 * ring - 1) * (2 * ring - 1);
    let pos_in_ring = index as i64 - cells_before;
    let side_len = 2 * ring;
    let side = pos_in_ring / side_len;
    let pos_on_side = pos_in_ring % side_len;

    match side {
        0 => (ring, -ring + 1 + pos_on_side),
        1 => (ring - 1 - pos_on_side, ring),
        2 => (-ring, ring - 1 - pos_on_side),
        _ => (-ring + 1 + pos_on_side, -ring),
    }
}

/// Rings needed for a zone holding `file_count` files
pub fn zone_rings(file_count: usize) -> u64 {
    ring_for_index(file_count)
}

/// Half-width of the square a zone reserves; zero for an empty zone
pub fn zone_radius(file_count: usize, spacing: f64) -> f64 {
    if file_count == 0 {
        return 0.0;
    }
    (zone_rings(file_count) + 1) as f64 * spacing
}
