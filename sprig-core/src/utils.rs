//! Utility functions for the container
//!
//! Naming conventions for bean names and the creation-stack bookkeeping the
//! factory uses to detect re-entrant construction.

/// Naming convention utilities for bean names
pub mod naming {
    /// Converts a PascalCase type name to camelCase for bean naming.
    ///
    /// This is the default bean naming strategy, similar to Spring's behavior
    /// where `UserService` becomes `userService`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sprig_core::utils::naming::to_camel_case;
    ///
    /// assert_eq!(to_camel_case("UserService"), "userService");
    /// assert_eq!(to_camel_case("A"), "a");
    /// assert_eq!(to_camel_case(""), "");
    /// ```
    pub fn to_camel_case(s: &str) -> String {
        let mut chars = s.chars();
        match chars.next() {
            None => String::new(),
            Some(first) => {
                let mut result = String::with_capacity(s.len());
                result.extend(first.to_lowercase());
                result.push_str(chars.as_str());
                result
            }
        }
    }

    /// Converts a snake_case field name to camelCase.
    ///
    /// Used for the default reference target of a wire marker: a Rust field
    /// `hello_world_service` resolves against the bean named
    /// `helloWorldService`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sprig_core::utils::naming::snake_to_camel;
    ///
    /// assert_eq!(snake_to_camel("hello_world_service"), "helloWorldService");
    /// assert_eq!(snake_to_camel("text"), "text");
    /// ```
    pub fn snake_to_camel(s: &str) -> String {
        let mut result = String::with_capacity(s.len());
        let mut upper_next = false;
        for ch in s.chars() {
            if ch == '_' {
                upper_next = true;
            } else if upper_next {
                result.extend(ch.to_uppercase());
                upper_next = false;
            } else {
                result.push(ch);
            }
        }
        result
    }
}

/// Creation-stack bookkeeping for re-entrant construction detection
pub mod dependency {
    use std::cell::RefCell;

    thread_local! {
        static CREATING: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
    }

    /// Tracks the beans currently being constructed on this thread.
    ///
    /// Construction is a synchronous pipeline, so recursion is always
    /// confined to a single thread; keeping the stack thread-local means two
    /// threads constructing the same prototype concurrently are not
    /// misreported as a cycle.
    pub struct CreationStack;

    impl CreationStack {
        /// Marks a bean as being created on this thread.
        ///
        /// Returns a guard that pops the entry on drop, or the full creation
        /// chain (ending with `name`) when the bean is already on the stack,
        /// which means construction has recursed back into itself.
        pub fn enter(name: &str) -> Result<CreationGuard, Vec<String>> {
            CREATING.with(|stack| {
                let mut stack = stack.borrow_mut();
                if stack.iter().any(|entry| entry == name) {
                    let mut chain = stack.clone();
                    chain.push(name.to_string());
                    return Err(chain);
                }
                stack.push(name.to_string());
                Ok(CreationGuard {
                    name: name.to_string(),
                })
            })
        }

        /// Whether `name` is currently being constructed on this thread.
        pub fn is_creating(name: &str) -> bool {
            CREATING.with(|stack| stack.borrow().iter().any(|entry| entry == name))
        }

        /// Snapshot of the current creation chain, outermost first.
        pub fn current_chain() -> Vec<String> {
            CREATING.with(|stack| stack.borrow().clone())
        }
    }

    /// RAII guard returned by [`CreationStack::enter`].
    #[derive(Debug)]
    pub struct CreationGuard {
        name: String,
    }

    impl Drop for CreationGuard {
        fn drop(&mut self) {
            CREATING.with(|stack| {
                let mut stack = stack.borrow_mut();
                if let Some(position) = stack.iter().rposition(|entry| entry == &self.name) {
                    stack.remove(position);
                }
            });
        }
    }
}

#[cfg(test)]
mod tests {
    mod naming_tests {
        use super::super::naming::*;

        #[test]
        fn test_to_camel_case() {
            assert_eq!(to_camel_case("UserService"), "userService");
            assert_eq!(to_camel_case("WrapService"), "wrapService");
            assert_eq!(to_camel_case("A"), "a");
            assert_eq!(to_camel_case(""), "");
            assert_eq!(to_camel_case("lowerCase"), "lowerCase");
        }

        #[test]
        fn test_snake_to_camel() {
            assert_eq!(snake_to_camel("hello_world_service"), "helloWorldService");
            assert_eq!(snake_to_camel("text"), "text");
            assert_eq!(snake_to_camel(""), "");
        }
    }

    mod dependency_tests {
        use super::super::dependency::*;

        #[test]
        fn test_creation_stack_detects_reentry() {
            let _a = CreationStack::enter("serviceA").unwrap();
            assert!(CreationStack::is_creating("serviceA"));

            let chain = CreationStack::enter("serviceA").unwrap_err();
            assert_eq!(chain, vec!["serviceA".to_string(), "serviceA".to_string()]);
        }

        #[test]
        fn test_creation_stack_guard_pops_on_drop() {
            {
                let _a = CreationStack::enter("serviceB").unwrap();
                let _b = CreationStack::enter("serviceC").unwrap();
                assert_eq!(
                    CreationStack::current_chain(),
                    vec!["serviceB".to_string(), "serviceC".to_string()]
                );
            }
            assert!(!CreationStack::is_creating("serviceB"));
            assert!(!CreationStack::is_creating("serviceC"));
        }

        #[test]
        fn test_creation_stack_chain_reports_cycle_path() {
            let _a = CreationStack::enter("a").unwrap();
            let _b = CreationStack::enter("b").unwrap();
            let chain = CreationStack::enter("a").unwrap_err();
            assert_eq!(chain.join(" -> "), "a -> b -> a");
        }
    }
}
