//! Identifier generation for synthesized document nodes.
//!
//! One [`IdGenerator`] is scoped to a single conversion call. Ids combine a
//! random per-call scope with a monotonic counter, so ids minted by the same
//! generator never collide and ids from different calls are unlikely to.

/// Number of hex characters of the random scope kept in each id.
const SCOPE_LENGTH: usize = 8;

#[derive(Debug, Clone)]
pub struct IdGenerator {
    scope: String,
    counter: u64,
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator {
    /// Create a generator with a random scope.
    pub fn new() -> Self {
        let mut scope = uuid::Uuid::new_v4().simple().to_string();
        scope.truncate(SCOPE_LENGTH);
        Self::with_scope(scope)
    }

    /// Create a generator with a fixed scope (deterministic ids for tests
    /// and reproducible imports).
    pub fn with_scope(scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            counter: 0,
        }
    }

    /// Mint the next id, e.g. `el-3f9a1c2b-7`.
    pub fn next_id(&mut self, prefix: &str) -> String {
        self.counter += 1;
        format!("{prefix}-{}-{}", self.scope, self.counter)
    }

    /// How many ids this generator has minted.
    pub fn issued(&self) -> u64 {
        self.counter
    }
}
