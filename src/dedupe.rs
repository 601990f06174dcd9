use ahash::AHashSet;

/// Keep the first item for each key, preserving order. Returns the number dropped.
///
/// The key is borrowed from the item, so no key is cloned for items that are
/// dropped; retained keys are copied once into the seen-set.
pub fn dedupe_first_by<T>(items: &mut Vec<T>, key: impl Fn(&T) -> &str) -> usize {
    let before = items.len();
    let mut seen: AHashSet<String> = AHashSet::with_capacity(before);
    items.retain(|item| {
        let k = key(item);
        if seen.contains(k) {
            false
        } else {
            seen.insert(k.to_string());
            true
        }
    });
    before - items.len()
}
