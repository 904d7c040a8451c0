use std::ops::Range;

/// Contiguous half-open slice of the dataset owned by one user.
///
/// User `u` (1-indexed) of `n` users over a dataset of length `len` owns
/// `[len*(u-1)/n, len*u/n)` with floor division. Consecutive users tile the
/// dataset without gaps or overlap. When `len` does not divide evenly the
/// remainder is absorbed unevenly by the later slices, and every boundary
/// shifts whenever the user count changes, so a cursor stored before such a
/// change may point at a different item afterwards. Both are known properties
/// of the scheme and are deliberately left as is.
///
/// Out-of-pool ids (`user_id > user_count`, possible because ids are
/// auto-increment and deletions leave holes) clamp to the dataset end and
/// yield an empty slice.
pub fn assignment(user_id: i64, user_count: i64, dataset_len: usize) -> Range<usize> {
    if user_id < 1 || user_count < 1 {
        return 0..0;
    }
    // u128 keeps len * id exact even for pathological auto-increment ids;
    // clamp before narrowing so the cast cannot truncate
    let len = dataset_len as u128;
    let lo = len * (user_id as u128 - 1) / user_count as u128;
    let hi = len * user_id as u128 / user_count as u128;
    let lo = lo.min(len) as usize;
    let hi = hi.min(len) as usize;
    lo..hi
}
