//! Query splitting and location building.

/// One segment of a query together with the location reached after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step<'q> {
    /// The segment used as a lookup key.
    pub key: &'q str,
    /// Base location joined with every segment up to and including `key`.
    pub location: String,
}

/// Iterator over the segments of a query, threading the accumulated location.
///
/// Splitting follows `str::split`: the empty query is the single segment `""`,
/// and a trailing separator produces a trailing empty segment.
pub struct Steps<'w, 'q> {
    segments: std::str::Split<'q, &'w str>,
    separator: &'w str,
    location: String,
}

impl<'w, 'q> Steps<'w, 'q> {
    pub(crate) fn new(query: &'q str, separator: &'w str, base: &str) -> Self {
        Steps {
            segments: query.split(separator),
            separator,
            location: base.to_owned(),
        }
    }
}

impl<'w, 'q> Iterator for Steps<'w, 'q> {
    type Item = Step<'q>;

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.segments.next()?;
        self.location = join(&self.location, self.separator, key);
        Some(Step {
            key,
            location: self.location.clone(),
        })
    }
}

/// Appends `key` to `location`, without a leading separator when `location` is empty.
pub(crate) fn join(location: &str, separator: &str, key: &str) -> String {
    if location.is_empty() {
        key.to_owned()
    } else {
        let mut joined = String::with_capacity(location.len() + separator.len() + key.len());
        joined.push_str(location);
        joined.push_str(separator);
        joined.push_str(key);
        joined
    }
}
