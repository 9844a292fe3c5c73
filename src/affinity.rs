//! CPU-affinity pinning, used to keep both benchmark processes on one
//! logical core so cross-core migration doesn't inflate the timings.

/// Pin the calling thread to the first core the OS reports.
///
/// "First" is deterministic for a given machine, so a parent and a child
/// that both call this end up on the same core without coordinating.
pub fn pin_to_first_core() -> bool {
    let Some(ids) = core_affinity::get_core_ids() else {
        return false;
    };
    let Some(&first) = ids.first() else {
        return false;
    };
    core_affinity::set_for_current(first)
}

/// Pin, downgrading failure to a stderr warning. An unpinned run is
/// noisier but still valid, so this never aborts.
pub fn pin_or_warn(role: &str) {
    if !pin_to_first_core() {
        eprintln!(
            "warning: could not pin {role} to a single core; continuing unpinned \
             (expect noisier results)"
        );
    }
}
