use std::collections::BTreeSet;

/// Relative paths that must exist locally after a sync.
///
/// Members are either bare paths (`config.json`, `Seg.mlmodelc`) or
/// variant-prefixed bundle paths (`variant-a/Seg.mlmodelc`). Iteration order
/// is sorted, which keeps sync plans deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequiredFileSet {
    paths: BTreeSet<String>,
}

impl RequiredFileSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>) -> bool {
        self.paths.insert(path.into())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Members that place `path` under a named sub-folder, i.e. that end in
    /// `"/" + path`. Yields the leading segment of each such member.
    pub fn subfolders_for<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.paths.iter().filter_map(move |member| {
            let prefix = member.strip_suffix(path)?.strip_suffix('/')?;
            prefix.split('/').next().filter(|s| !s.is_empty())
        })
    }
}

impl<S: Into<String>> FromIterator<S> for RequiredFileSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            paths: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subfolders_use_leading_segment() {
        let required: RequiredFileSet = ["variant-a/Seg.mlmodelc", "a/b/Seg.mlmodelc", "Seg.mlmodelc"]
            .into_iter()
            .collect();
        let subfolders: Vec<_> = required.subfolders_for("Seg.mlmodelc").collect();
        assert_eq!(subfolders, vec!["a", "variant-a"]);
    }

    #[test]
    fn suffix_must_follow_a_slash() {
        let required: RequiredFileSet = ["MySeg.mlmodelc"].into_iter().collect();
        assert_eq!(required.subfolders_for("Seg.mlmodelc").count(), 0);
    }
}
