/// Local cache sub-namespace, disambiguating otherwise-identical relative
/// cache paths (a source object and its thumbnail can share a file name).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKind {
    Objects,
    Thumbs,
}

impl CacheKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheKind::Objects => "objects",
            CacheKind::Thumbs => "thumbs",
        }
    }
}

impl std::fmt::Display for CacheKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
