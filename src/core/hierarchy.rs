//! Walking the parent links of nested states.
//!
//! Every walk is bounded by `S::count()` steps, so a malformed parent chain
//! cannot loop forever; builders reject such chains up front.

use super::state::State;

/// `state` and its ancestors, outermost first.
///
/// # Example
///
/// ```rust
/// use tickfsm::core::lineage;
/// use tickfsm::state_enum;
///
/// state_enum! {
///     enum Press {
///         Idle,
///         Cycle,
///         Close,
///         Hold,
///     }
///     composite: { Cycle => [Close, Hold] }
/// }
///
/// assert_eq!(lineage(Press::Hold), vec![Press::Cycle, Press::Hold]);
/// assert_eq!(lineage(Press::Idle), vec![Press::Idle]);
/// ```
pub fn lineage<S: State>(state: S) -> Vec<S> {
    let mut path = vec![state];
    let mut cursor = state.parent();
    while let Some(ancestor) = cursor {
        if path.len() > S::count() {
            break;
        }
        path.push(ancestor);
        cursor = ancestor.parent();
    }
    path.reverse();
    path
}

/// Whether `state` is `scope` or nested somewhere inside it.
pub fn is_within<S: State>(state: S, scope: S) -> bool {
    lineage(state).contains(&scope)
}

/// Number of leading states two lineages share.
pub(crate) fn shared_prefix<S: State>(a: &[S], b: &[S]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

/// States entered below `state` until a leaf is reached, outermost first.
///
/// A composite that keeps history resumes the child recorded in
/// `last_child` (indexed by [`State::index`]); otherwise its initial child
/// is entered.
pub(crate) fn descend<S: State>(state: S, last_child: &[Option<S>]) -> Vec<S> {
    let mut entered = Vec::new();
    let mut cursor = state;
    while let Some(initial) = cursor.initial_child() {
        if entered.len() > S::count() {
            break;
        }
        let remembered = if cursor.keeps_history() {
            last_child.get(cursor.index()).copied().flatten()
        } else {
            None
        };
        let child = remembered.unwrap_or(initial);
        entered.push(child);
        cursor = child;
    }
    entered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_enum;

    state_enum! {
        enum Washer {
            Idle,
            Running,
            Fill,
            Agitate,
            Slow,
            Fast,
        }
        composite: {
            Running => [Fill, Agitate],
            Agitate => [Slow, Fast],
        }
        history: [Agitate]
    }

    #[test]
    fn lineage_lists_outermost_first() {
        assert_eq!(
            lineage(Washer::Fast),
            vec![Washer::Running, Washer::Agitate, Washer::Fast]
        );
    }

    #[test]
    fn is_within_includes_self_and_ancestors() {
        assert!(is_within(Washer::Slow, Washer::Slow));
        assert!(is_within(Washer::Slow, Washer::Running));
        assert!(!is_within(Washer::Running, Washer::Slow));
        assert!(!is_within(Washer::Fill, Washer::Agitate));
    }

    #[test]
    fn shared_prefix_finds_common_ancestors() {
        let a = lineage(Washer::Fast);
        let b = lineage(Washer::Fill);
        assert_eq!(shared_prefix(&a, &b), 1);
        assert_eq!(shared_prefix(&a, &lineage(Washer::Idle)), 0);
    }

    #[test]
    fn descend_follows_initial_children() {
        let none = vec![None; 6];
        assert_eq!(descend(Washer::Running, &none), vec![Washer::Fill]);
        assert_eq!(descend(Washer::Agitate, &none), vec![Washer::Slow]);
        assert!(descend(Washer::Idle, &none).is_empty());
    }

    #[test]
    fn descend_resumes_history_only_where_kept() {
        let mut last = vec![None; 6];
        last[Washer::Running as usize] = Some(Washer::Agitate);
        last[Washer::Agitate as usize] = Some(Washer::Fast);

        // Running does not keep history, Agitate does.
        assert_eq!(descend(Washer::Running, &last), vec![Washer::Fill]);
        assert_eq!(descend(Washer::Agitate, &last), vec![Washer::Fast]);
    }
}
