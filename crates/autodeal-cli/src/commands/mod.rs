pub mod chat;
pub mod compare;
pub mod lease;
pub mod loan;
pub mod rates;
pub mod schedule;

/// Replace `target` when a flag was given on the command line.
pub(crate) fn override_with<T>(target: &mut T, flag: Option<T>) {
    if let Some(value) = flag {
        *target = value;
    }
}
