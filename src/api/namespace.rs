/// Hands out deterministic chart namespaces (`c1`, `c2`, ...).
///
/// Element ids end with the namespace, so two allocators started fresh
/// produce identical scenes for identical inputs.
#[derive(Debug, Clone, Default)]
pub struct NamespaceAllocator {
    issued: u64,
}

impl NamespaceAllocator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_namespace(&mut self) -> String {
        self.issued += 1;
        format!("c{}", self.issued)
    }

    #[must_use]
    pub fn issued(&self) -> u64 {
        self.issued
    }
}
