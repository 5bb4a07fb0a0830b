use switchcast_common::StreamName;

/// Streams currently publishing to the upstream media server, in publish order.
#[derive(Debug, Clone, Default)]
pub struct StreamRegistry {
    names: Vec<StreamName>,
}

impl StreamRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name`. Returns `false` if it was already publishing.
    pub fn publish(&mut self, name: StreamName) -> bool {
        if self.contains(&name) {
            return false;
        }
        self.names.push(name);
        true
    }

    /// Remove `name`, keeping the order of the others. Returns whether it was present.
    pub fn unpublish(&mut self, name: &StreamName) -> bool {
        match self.names.iter().position(|n| n == name) {
            Some(index) => {
                self.names.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, name: &StreamName) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn names(&self) -> &[StreamName] {
        &self.names
    }

    /// The longest-publishing stream.
    pub fn first(&self) -> Option<&StreamName> {
        self.names.first()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
