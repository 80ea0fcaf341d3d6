//! Tile ordering: full shuffles, shuffles that pin found groups, and
//! moving found groups to the top of the board.

use crate::puzzle::CategoryIndex;
use crate::tile::Tile;
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, instrument};

/// Uniformly permutes every tile.
#[instrument(skip_all, fields(tiles = tiles.len()))]
pub fn shuffle_all<R: Rng>(tiles: &mut [Tile], rng: &mut R) {
    tiles.shuffle(rng);
    debug!("Shuffled whole board");
}

/// Uniformly permutes the tiles whose category is not in `found`.
///
/// Found tiles keep their exact positions. The permutation is a
/// Fisher–Yates pass over the positions of the unfound tiles.
#[instrument(skip_all, fields(found = found.len()))]
pub fn shuffle_unfound<R: Rng>(tiles: &mut [Tile], found: &[CategoryIndex], rng: &mut R) {
    let open: Vec<usize> = tiles
        .iter()
        .enumerate()
        .filter(|(_, tile)| !found.contains(&tile.category()))
        .map(|(position, _)| position)
        .collect();

    for i in (1..open.len()).rev() {
        let j = rng.random_range(0..=i);
        tiles.swap(open[i], open[j]);
    }

    debug!(shuffled = open.len(), "Shuffled unfound tiles");
}

/// Reorders the board so found groups come first.
///
/// Groups appear in discovery order, each contiguous and keeping the
/// relative order its words already had. Unfound tiles follow in their
/// current relative order.
#[instrument(skip_all, fields(found = found.len()))]
pub fn organize_found(tiles: &mut Vec<Tile>, found: &[CategoryIndex]) {
    let mut ordered = Vec::with_capacity(tiles.len());

    for &category in found {
        ordered.extend(tiles.iter().filter(|t| t.category() == category).cloned());
    }
    ordered.extend(
        tiles
            .iter()
            .filter(|t| !found.contains(&t.category()))
            .cloned(),
    );

    *tiles = ordered;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn cat(i: usize) -> CategoryIndex {
        CategoryIndex::new(i).unwrap()
    }

    fn board() -> Vec<Tile> {
        // Interleaved so grouping is observable.
        (0..16).map(|i| Tile::new(format!("w{i}"), cat(i % 4))).collect()
    }

    fn words(tiles: &[Tile]) -> Vec<&str> {
        tiles.iter().map(|t| t.word()).collect()
    }

    #[test]
    fn test_organize_found_groups_in_discovery_order() {
        let mut tiles = board();
        organize_found(&mut tiles, &[cat(2), cat(0)]);

        assert_eq!(
            &words(&tiles)[..8],
            &["w2", "w6", "w10", "w14", "w0", "w4", "w8", "w12"]
        );
        assert_eq!(
            &words(&tiles)[8..],
            &["w1", "w5", "w9", "w13", "w3", "w7", "w11", "w15"]
        );
    }

    #[test]
    fn test_organize_found_with_nothing_found_is_identity() {
        let mut tiles = board();
        let before = tiles.clone();
        organize_found(&mut tiles, &[]);
        assert_eq!(tiles, before);
    }

    #[test]
    fn test_shuffle_unfound_pins_found_positions() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut tiles = board();
        organize_found(&mut tiles, &[cat(1)]);
        let pinned: Vec<Tile> = tiles[..4].to_vec();

        for _ in 0..50 {
            shuffle_unfound(&mut tiles, &[cat(1)], &mut rng);
            assert_eq!(&tiles[..4], pinned.as_slice());
        }
    }

    #[test]
    fn test_shuffle_unfound_keeps_composition() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut tiles = board();
        shuffle_unfound(&mut tiles, &[], &mut rng);

        let mut shuffled = words(&tiles);
        shuffled.sort_unstable();
        let original = board();
        let mut expected = words(&original);
        expected.sort_unstable();
        assert_eq!(shuffled, expected);
    }

    #[test]
    fn test_shuffle_all_is_seed_deterministic() {
        let mut a = board();
        let mut b = board();
        shuffle_all(&mut a, &mut StdRng::seed_from_u64(42));
        shuffle_all(&mut b, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}
