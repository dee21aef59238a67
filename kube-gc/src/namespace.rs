//! Picks the namespaces a run looks at.

/// Namespaces that hold QA builds end with this suffix.
pub const QA_SUFFIX: &str = "-qa";

/// Namespaces skipped by the eviction check.
pub const PROTECTED_NAMESPACES: [&str; 3] = ["kube-system", "default", "cloud-sql"];

/// Whether `namespace` ends with `suffix` and is not one of `excluded`. An empty suffix matches every namespace.
pub fn is_selected<S: AsRef<str>>(namespace: &str, suffix: &str, excluded: &[S]) -> bool {
    namespace.ends_with(suffix)
        && !excluded
            .iter()
            .any(|excluded| excluded.as_ref() == namespace)
}

/// Keeps the namespaces that pass [`is_selected`], in input order.
pub fn select_namespaces<N, S>(all: &[N], suffix: &str, excluded: &[S]) -> Vec<String>
where
    N: AsRef<str>,
    S: AsRef<str>,
{
    all.iter()
        .map(AsRef::as_ref)
        .filter(|namespace| is_selected(namespace, suffix, excluded))
        .map(str::to_owned)
        .collect()
}
