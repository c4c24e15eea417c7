//! Name disambiguation context threaded through the zone loop.
//!
//! Disambiguation is order-dependent: earlier zones keep their authored
//! name, later duplicates get a numeric suffix. The registry is an explicit
//! context object so the dependency is visible at every bake call.

#[derive(Debug, Default)]
pub struct NameRegistry {
    used: Vec<String>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a name as taken without handing it to any claimant. Later
    /// claims of the same name are forced onto a suffix.
    pub fn reserve(&mut self, name: &str) {
        if !self.used.iter().any(|u| u == name) {
            self.used.push(name.to_string());
        }
    }

    /// Claim a unique name derived from `base`. The first claimant gets
    /// `base` itself; later ones get `base 2`, `base 3`, ...
    pub fn claim(&mut self, base: &str) -> String {
        let mut candidate = base.to_string();
        let mut n = 1u32;
        while self.used.iter().any(|u| u == &candidate) {
            n += 1;
            candidate = format!("{base} {n}");
        }
        self.used.push(candidate.clone());
        candidate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicates_get_deterministic_suffixes() {
        let mut names = NameRegistry::new();
        assert_eq!(names.claim("Hole"), "Hole");
        assert_eq!(names.claim("Hole"), "Hole 2");
        assert_eq!(names.claim("Hole"), "Hole 3");
        assert_eq!(names.claim("Ring"), "Ring");
    }

    #[test]
    fn claim_avoids_an_authored_name_that_matches_a_suffix() {
        let mut names = NameRegistry::new();
        assert_eq!(names.claim("Hole 2"), "Hole 2");
        assert_eq!(names.claim("Hole"), "Hole");
        assert_eq!(names.claim("Hole"), "Hole 3");
    }

    #[test]
    fn reserved_names_push_claimants_onto_a_suffix() {
        let mut names = NameRegistry::new();
        names.reserve("comparison");
        names.reserve("comparison");
        assert_eq!(names.claim("comparison"), "comparison 2");
        assert_eq!(names.claim("Hole"), "Hole");
    }
}
