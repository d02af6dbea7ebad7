/// Policy applied when a node with incident edges is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletePolicy {
    /// Delete the incident edges first, recording one diff per removed edge.
    CascadeEdges,
    /// Refuse the delete while incident edges exist.
    Restrict,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub delete_policy: DeletePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            delete_policy: DeletePolicy::CascadeEdges,
        }
    }
}

impl Config {
    pub fn restrict_deletes() -> Self {
        Self {
            delete_policy: DeletePolicy::Restrict,
        }
    }
}
