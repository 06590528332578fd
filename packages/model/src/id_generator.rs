use crc32fast::Hasher;

/// Derive an id seed from the diagram and the actor minting ids.
///
/// Every collaborator gets a distinct seed, so two peers never hand out the
/// same entity or field id for one diagram.
pub fn get_actor_seed(diagram_id: &str, actor_id: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(diagram_id.as_bytes());
    hasher.update(b"/");
    hasher.update(actor_id.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential ID generator for entities, fields and relationships
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String,
    count: u32,
}

impl IdGenerator {
    pub fn new(diagram_id: &str, actor_id: &str) -> Self {
        Self {
            seed: get_actor_seed(diagram_id, actor_id),
            count: 0,
        }
    }

    /// Generate next sequential ID
    pub fn new_id(&mut self) -> String {
        self.count += 1;
        format!("{}-{}", self.seed, self.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_is_stable() {
        assert_eq!(get_actor_seed("d1", "alice"), get_actor_seed("d1", "alice"));
    }

    #[test]
    fn test_actors_get_distinct_seeds() {
        assert_ne!(get_actor_seed("d1", "alice"), get_actor_seed("d1", "bob"));
        assert_ne!(get_actor_seed("d1", "alice"), get_actor_seed("d2", "alice"));
    }

    #[test]
    fn test_sequential_ids() {
        let mut gen = IdGenerator::new("d1", "alice");

        let id1 = gen.new_id();
        let id2 = gen.new_id();

        assert!(id1.ends_with("-1"));
        assert!(id2.ends_with("-2"));
        assert!(id1.starts_with(&get_actor_seed("d1", "alice")));
    }
}
