//! Macros for ergonomic state machine construction.

/// Generate a `Copy` state enum and its `State` trait implementation.
///
/// Variants are indexed in declaration order. The optional clauses come in
/// this order:
///
/// - `final: [..]` lists terminal states.
/// - `composite: { Parent => [First, ..] }` nests children under a parent;
///   the first child listed is the parent's initial child.
/// - `history: [..]` lists composites that resume their last active child.
///
/// # Example
///
/// ```
/// use tickfsm::core::State;
/// use tickfsm::state_enum;
///
/// state_enum! {
///     pub enum Boiler {
///         Cold,
///         Heating,
///         Ready,
///         Shutdown,
///     }
///     final: [Shutdown]
/// }
///
/// assert_eq!(Boiler::count(), 4);
/// assert_eq!(Boiler::Ready.index(), 2);
/// assert!(Boiler::Shutdown.is_final());
/// ```
///
/// Nested states:
///
/// ```
/// use tickfsm::core::State;
/// use tickfsm::state_enum;
///
/// state_enum! {
///     enum Oven {
///         Off,
///         On,
///         Preheat,
///         Bake,
///     }
///     composite: { On => [Preheat, Bake] }
///     history: [On]
/// }
///
/// assert_eq!(Oven::Bake.parent(), Some(Oven::On));
/// assert_eq!(Oven::On.initial_child(), Some(Oven::Preheat));
/// assert!(Oven::On.keeps_history());
/// assert_eq!(Oven::Off.parent(), None);
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }

        $(final: [$($final:ident),* $(,)?])?

        $(composite: {
            $($parent:ident => [$first:ident $(, $child:ident)* $(,)?]),* $(,)?
        })?

        $(history: [$($remembering:ident),* $(,)?])?
    ) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize,
        )]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::State for $name {
            const ALL: &'static [Self] = &[$(Self::$variant),*];

            fn index(&self) -> usize {
                *self as usize
            }

            fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }

            fn is_final(&self) -> bool {
                match self {
                    $($(Self::$final => true,)*)?
                    #[allow(unreachable_patterns)]
                    _ => false,
                }
            }

            fn parent(&self) -> Option<Self> {
                $($(
                    if [Self::$first $(, Self::$child)*].contains(self) {
                        return Some(Self::$parent);
                    }
                )*)?
                None
            }

            fn initial_child(&self) -> Option<Self> {
                match self {
                    $($(Self::$parent => Some(Self::$first),)*)?
                    #[allow(unreachable_patterns)]
                    _ => None,
                }
            }

            fn keeps_history(&self) -> bool {
                match self {
                    $($(Self::$remembering => true,)*)?
                    #[allow(unreachable_patterns)]
                    _ => false,
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::core::State;

    state_enum! {
        enum TestState {
            Standby,
            Active,
            Tripped,
        }
        final: [Tripped]
    }

    #[test]
    fn state_enum_macro_generates_trait() {
        assert_eq!(TestState::Standby.name(), "Standby");
        assert_eq!(TestState::ALL, &[TestState::Standby, TestState::Active, TestState::Tripped]);
        assert!(!TestState::Active.is_final());
        assert!(TestState::Tripped.is_final());
    }

    #[test]
    fn indices_follow_declaration_order() {
        for (position, state) in TestState::ALL.iter().enumerate() {
            assert_eq!(state.index(), position);
        }
        assert!(crate::core::enumeration_mismatches::<TestState>().is_empty());
    }

    state_enum! {
        enum Nested {
            Standby,
            Cycle,
            Fill,
            Wash,
            Drain,
            Rinse,
            Soak,
        }
        composite: {
            Cycle => [Fill, Wash, Drain],
            Wash => [Rinse, Soak],
        }
        history: [Wash]
    }

    #[test]
    fn composite_clause_builds_tree() {
        assert_eq!(Nested::Standby.parent(), None);
        assert_eq!(Nested::Drain.parent(), Some(Nested::Cycle));
        assert_eq!(Nested::Soak.parent(), Some(Nested::Wash));
        assert_eq!(Nested::Cycle.initial_child(), Some(Nested::Fill));
        assert_eq!(Nested::Wash.initial_child(), Some(Nested::Rinse));
        assert!(Nested::Wash.keeps_history());
        assert!(!Nested::Cycle.keeps_history());
        assert!(crate::core::enumeration_mismatches::<Nested>().is_empty());
    }

    #[test]
    fn state_enum_supports_visibility() {
        state_enum! {
            pub enum PublicState {
                A,
                B,
            }
            final: [B]
        }

        assert!(PublicState::B.is_final());
    }

    #[test]
    fn state_enum_works_without_final() {
        state_enum! {
            enum MinimalState {
                One,
                Two,
            }
        }

        assert!(!MinimalState::One.is_final());
        assert!(!MinimalState::Two.is_final());
    }
}
