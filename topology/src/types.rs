/// One entry of a parameter-store listing, value already decrypted.
#[derive(Clone, Debug, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub value: String,
}

impl Parameter {
    pub fn new<N, V>(name: N, value: V) -> Self
    where
        N: Into<String>,
        V: Into<String>,
    {
        Parameter {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Number of `/` separators in the parameter name.
    pub fn depth(&self) -> usize {
        self.name.matches('/').count()
    }
}

/// A tenant key path and the domain serving its traffic.
#[derive(Clone, Debug, PartialEq)]
pub struct TopologyRecord {
    pub key_path: String,
    pub domain: String,
}

impl TopologyRecord {
    pub fn new<K, D>(key_path: K, domain: D) -> Self
    where
        K: Into<String>,
        D: Into<String>,
    {
        TopologyRecord {
            key_path: key_path.into(),
            domain: domain.into(),
        }
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.key_path.split('/')
    }
}
