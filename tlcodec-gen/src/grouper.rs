//! Groups generated items by namespace for organised code output.

use std::collections::BTreeMap;

/// Bucket `items` by their (single-level) namespace; `""` is the root.
///
/// Buckets keep the order in which items were given.
pub(crate) fn group_by_ns<'m, T>(
    items: impl IntoIterator<Item = &'m T>,
    namespace: impl Fn(&T) -> &[String],
) -> Result<BTreeMap<String, Vec<&'m T>>, String>
where
    T: 'm,
{
    let mut map: BTreeMap<String, Vec<&T>> = BTreeMap::new();
    for item in items {
        let ns = match namespace(item) {
            [] => String::new(),
            [one] => one.clone(),
            deeper => return Err(format!("nested namespace {} is not supported", deeper.join("."))),
        };
        map.entry(ns).or_default().push(item);
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buckets_by_first_namespace() {
        let items = vec![vec![], vec!["chat".to_owned()], vec![], vec!["user".to_owned()]];
        let map = group_by_ns(&items, |ns| ns.as_slice()).unwrap();
        assert_eq!(map.keys().collect::<Vec<_>>(), ["", "chat", "user"]);
        assert_eq!(map[""].len(), 2);
    }

    #[test]
    fn rejects_nested_namespaces() {
        let items = vec![vec!["a".to_owned(), "b".to_owned()]];
        assert!(group_by_ns(&items, |ns| ns.as_slice()).is_err());
    }
}
