//! Test utilities for property-based testing
//!
//! This module provides generators and helpers for proptest.

#[cfg(test)]
pub mod generators {
    use proptest::prelude::*;

    use crate::core::module::Module;

    fn module(index: usize, deps: Vec<String>) -> Module {
        let name = format!("pkg-{index}");
        Module::new(name.clone(), format!("/repo/packages/{name}"), deps)
    }

    /// Generate an acyclic module set of 1 to `max` modules
    ///
    /// Module `i` may only depend on modules with a lower index, plus the odd
    /// external package. The result is shuffled so discovery order does not
    /// match build order.
    pub fn acyclic_modules(max: usize) -> impl Strategy<Value = Vec<Module>> {
        (1..=max)
            .prop_flat_map(|n| {
                (
                    proptest::collection::vec(proptest::collection::vec(any::<bool>(), n), n),
                    proptest::collection::vec(any::<bool>(), n),
                )
            })
            .prop_map(|(matrix, external)| {
                matrix
                    .iter()
                    .enumerate()
                    .map(|(i, row)| {
                        let mut deps: Vec<String> = row
                            .iter()
                            .take(i)
                            .enumerate()
                            .filter(|(_, edge)| **edge)
                            .map(|(j, _)| format!("pkg-{j}"))
                            .collect();
                        if external[i] {
                            deps.push("lodash".to_string());
                        }
                        module(i, deps)
                    })
                    .collect::<Vec<_>>()
            })
            .prop_shuffle()
    }

    /// Generate a module set of 2 to `max` modules containing a ring
    ///
    /// Module `i` depends on module `(i + 1) % n`; extra forward edges are
    /// sprinkled on top.
    pub fn cyclic_modules(max: usize) -> impl Strategy<Value = Vec<Module>> {
        (2..=max)
            .prop_flat_map(|n| proptest::collection::vec(proptest::collection::vec(any::<bool>(), n), n))
            .prop_map(|matrix| {
                let n = matrix.len();
                matrix
                    .iter()
                    .enumerate()
                    .map(|(i, row)| {
                        let mut deps = vec![format!("pkg-{}", (i + 1) % n)];
                        deps.extend(
                            row.iter()
                                .enumerate()
                                .filter(|(j, edge)| **edge && *j > i)
                                .map(|(j, _)| format!("pkg-{j}")),
                        );
                        module(i, deps)
                    })
                    .collect::<Vec<_>>()
            })
            .prop_shuffle()
    }
}

#[cfg(test)]
mod tests {
    use super::generators::*;
    use crate::config::defaults::MIN_PROPTEST_ITERATIONS;
    use proptest::prelude::*;
    use std::collections::HashSet;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(MIN_PROPTEST_ITERATIONS))]

        #[test]
        fn test_acyclic_generator_names_are_unique(modules in acyclic_modules(10)) {
            let names: HashSet<&str> = modules.iter().map(|m| m.name()).collect();
            prop_assert_eq!(names.len(), modules.len());
        }

        #[test]
        fn test_cyclic_generator_has_ring(modules in cyclic_modules(10)) {
            prop_assert!(modules.len() >= 2);
            prop_assert!(modules.iter().all(|m| !m.dependencies().is_empty()));
        }
    }
}
