/*
Prefix doubling over cyclic rotations.

Every rotation starts ranked by its first byte. Each pass sorts rotations by the pair
(rank of the first k bytes, rank of the k bytes after them) and re-ranks, so after the pass the
ranks order the first 2k bytes. Because rotations wrap, the second half is simply the rank of the
rotation starting k positions later. Once 2k covers the block, equal ranks mean equal rotations,
and those are put in index order.

Cost is O(n log^2 n) regardless of how repetitive the block is.
*/

/// Order all rotations of `block`. Equal rotations keep index order.
pub fn doubling_sort(block: &[u8]) -> Vec<u32> {
    let n = block.len();
    let mut index = (0_u32..n as u32).collect::<Vec<u32>>();
    if n == 0 {
        return index;
    }
    let mut rank: Vec<u32> = block.iter().map(|&b| b as u32).collect();
    let mut next_rank = vec![0_u32; n];

    let mut k = 1;
    while k < n {
        let key = |i: u32| (rank[i as usize], rank[(i as usize + k) % n]);
        index.sort_unstable_by_key(|&i| key(i));

        next_rank[index[0] as usize] = 0;
        for j in 1..n {
            let step = (key(index[j]) != key(index[j - 1])) as u32;
            next_rank[index[j] as usize] = next_rank[index[j - 1] as usize] + step;
        }
        std::mem::swap(&mut rank, &mut next_rank);

        // Every rotation already has its own rank.
        if rank[index[n - 1] as usize] as usize == n - 1 {
            break;
        }
        k *= 2;
    }

    index.sort_unstable_by_key(|&i| (rank[i as usize], i));
    index
}
