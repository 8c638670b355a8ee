use super::records::Wallet;

/// Prepare wallets for display: give every unlabeled wallet a default
/// `"Wallet {n}"` label (1-indexed, in storage order), then order the list
/// with the current wallet first and the rest by label.
///
/// Labels are assigned before sorting, so the numbering is reproducible
/// for the same stored set no matter how often this runs.
pub fn sort_wallets(wallets: &mut [Wallet]) {
    for (i, wallet) in wallets.iter_mut().enumerate() {
        if wallet.label.is_none() {
            wallet.label = Some(format!("Wallet {}", i + 1));
        }
    }
    wallets.sort_by_key(|w| {
        let label = if w.current {
            String::new()
        } else {
            w.label.clone().unwrap_or_default()
        };
        (!w.current, label)
    });
}
