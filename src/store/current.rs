//! Current-record invariant: within a group, a non-empty collection has
//! exactly one record marked current. The store calls back into this module
//! after every write so the invariant is re-established mechanically.

use super::records::Current;

/// Mark `records[target]` as current and demote every other current record
/// in the same group. A group holding more than one current record going in
/// is a pre-existing violation; demoting all of them repairs it in passing.
pub fn promote<R, G>(records: &mut [R], target: usize, in_group: G)
where
    R: Current,
    G: Fn(&R) -> bool,
{
    for (i, record) in records.iter_mut().enumerate() {
        if i == target {
            record.set_current(true);
        } else if in_group(record) && record.is_current() {
            record.set_current(false);
        }
    }
}

/// Re-establish the invariant for one group after a deletion. If the group
/// still has a current record nothing changes (a lingering violation is
/// tolerated rather than repaired here); otherwise the last remaining
/// record in insertion order is promoted, so the most recently added
/// record survives as current.
pub fn heal_after_delete<R, G>(records: &mut [R], in_group: G)
where
    R: Current,
    G: Fn(&R) -> bool,
{
    let mut last = None;
    for (i, record) in records.iter().enumerate() {
        if in_group(record) {
            if record.is_current() {
                return;
            }
            last = Some(i);
        }
    }
    if let Some(i) = last {
        records[i].set_current(true);
    }
}
