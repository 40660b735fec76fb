//! Habit display ordering
//!
//! Habits carry an optional `order` value. Habits created before ordering
//! existed have none; [`ensure_order`] backfills it once from their position
//! in the loaded list and persists the result. Display order is ascending
//! `order` (missing counts as 0), then case-insensitive name, then id.

use std::cmp::Ordering;
use tracing::debug;

use crate::domain::Habit;
use crate::state::{HabitWriter, StateResponse};

/// Direction for moving a habit in the display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            _ => Err(format!("Unknown direction: {}. Use: up or down", s)),
        }
    }
}

/// Give every habit lacking an order its index in `habits`
///
/// Returns the indices that were changed.
pub fn assign_missing_order(habits: &mut [Habit]) -> Vec<usize> {
    let mut changed = Vec::new();
    for (index, habit) in habits.iter_mut().enumerate() {
        if habit.order.is_none() {
            habit.order = Some(index as i64);
            changed.push(index);
        }
    }
    changed
}

/// Backfill missing order values and persist each habit that changed
///
/// Running it on an already ordered list performs no writes.
pub async fn ensure_order<W>(writer: &W, mut habits: Vec<Habit>) -> StateResponse<Vec<Habit>>
where
    W: HabitWriter + ?Sized,
{
    let changed = assign_missing_order(&mut habits);
    if !changed.is_empty() {
        debug!(count = changed.len(), "ensure_order: backfilling order");
    }
    for index in changed {
        writer.put_habit(habits[index].clone()).await?;
    }
    Ok(habits)
}

/// Display comparison between two habits
pub fn compare_habits(a: &Habit, b: &Habit) -> Ordering {
    a.order
        .unwrap_or(0)
        .cmp(&b.order.unwrap_or(0))
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.id.cmp(&b.id))
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.order.cmp(&b.order))
}

/// Habits in display order
pub fn sort_habits(habits: &[Habit]) -> Vec<Habit> {
    let mut sorted = habits.to_vec();
    sorted.sort_by(compare_habits);
    sorted
}

/// Exchange two habits' order values and persist both
///
/// If the second write fails the first stays applied; both habits still hold
/// well-defined orders and the name tiebreak keeps sorting deterministic.
pub async fn swap_order<W>(writer: &W, a: &mut Habit, b: &mut Habit) -> StateResponse<()>
where
    W: HabitWriter + ?Sized,
{
    std::mem::swap(&mut a.order, &mut b.order);
    writer.put_habit(a.clone()).await?;
    writer.put_habit(b.clone()).await?;
    Ok(())
}

/// Move the habit at `index` of a sorted list one slot up or down
///
/// Returns false (and writes nothing) when it cannot move further.
pub async fn move_habit<W>(writer: &W, sorted: &[Habit], index: usize, direction: Direction) -> StateResponse<bool>
where
    W: HabitWriter + ?Sized,
{
    let target = match direction {
        Direction::Up => index.checked_sub(1),
        Direction::Down => index.checked_add(1).filter(|i| *i < sorted.len()),
    };
    let (Some(target), Some(habit)) = (target, sorted.get(index)) else {
        return Ok(false);
    };

    let mut moving = habit.clone();
    let mut neighbor = sorted[target].clone();
    moving.order.get_or_insert(index as i64);
    neighbor.order.get_or_insert(target as i64);

    debug!(habit_id = %moving.id, neighbor_id = %neighbor.id, ?direction, "move_habit: swapping");
    swap_order(writer, &mut moving, &mut neighbor).await?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::HabitKind;
    use crate::state::StateError;
    use async_trait::async_trait;
    use proptest::prelude::*;
    use std::sync::Mutex;

    /// Writer that records every habit it is asked to persist
    #[derive(Default)]
    struct RecordingWriter {
        writes: Mutex<Vec<Habit>>,
        fail_after: Option<usize>,
    }

    impl RecordingWriter {
        fn failing_after(n: usize) -> Self {
            Self {
                writes: Mutex::new(Vec::new()),
                fail_after: Some(n),
            }
        }

        fn writes(&self) -> Vec<Habit> {
            self.writes.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl HabitWriter for RecordingWriter {
        async fn put_habit(&self, habit: Habit) -> StateResponse<()> {
            let mut writes = self.writes.lock().unwrap();
            if self.fail_after.is_some_and(|n| writes.len() >= n) {
                return Err(StateError::StoreError("disk full".to_string()));
            }
            writes.push(habit);
            Ok(())
        }
    }

    fn habit(id: &str, name: &str, order: Option<i64>) -> Habit {
        let mut h = Habit::new(id, name, HabitKind::check(true));
        h.order = order;
        h
    }

    #[tokio::test]
    async fn test_ensure_order_backfills_by_position() {
        let writer = RecordingWriter::default();
        let habits = vec![habit("a", "A", None), habit("b", "B", Some(7)), habit("c", "C", None)];

        let ordered = ensure_order(&writer, habits).await.unwrap();
        let orders: Vec<_> = ordered.iter().map(|h| h.order).collect();
        assert_eq!(orders, vec![Some(0), Some(7), Some(2)]);

        let written: Vec<_> = writer.writes().into_iter().map(|h| h.id).collect();
        assert_eq!(written, vec!["a", "c"]);
    }

    #[tokio::test]
    async fn test_ensure_order_is_idempotent() {
        let writer = RecordingWriter::default();
        let habits = vec![habit("a", "A", None), habit("b", "B", None)];

        let once = ensure_order(&writer, habits).await.unwrap();
        let first_writes = writer.writes().len();
        let twice = ensure_order(&writer, once.clone()).await.unwrap();

        assert_eq!(once, twice);
        assert_eq!(first_writes, 2);
        assert_eq!(writer.writes().len(), 2, "second pass must not write");
    }

    #[test]
    fn test_sort_by_order_then_name() {
        let habits = vec![
            habit("1", "zebra", Some(1)),
            habit("2", "Apple", Some(1)),
            habit("3", "banana", Some(0)),
            habit("4", "apple", Some(1)),
        ];
        let ids: Vec<_> = sort_habits(&habits).into_iter().map(|h| h.id).collect();
        // "Apple" and "apple" tie on name, id decides
        assert_eq!(ids, vec!["3", "2", "4", "1"]);
    }

    #[test]
    fn test_sort_treats_missing_order_as_zero() {
        let habits = vec![habit("1", "B", Some(1)), habit("2", "A", None)];
        let ids: Vec<_> = sort_habits(&habits).into_iter().map(|h| h.id).collect();
        assert_eq!(ids, vec!["2", "1"]);
    }

    #[tokio::test]
    async fn test_swap_twice_restores() {
        let writer = RecordingWriter::default();
        let mut a = habit("a", "A", Some(3));
        let mut b = habit("b", "B", Some(9));

        swap_order(&writer, &mut a, &mut b).await.unwrap();
        assert_eq!((a.order, b.order), (Some(9), Some(3)));

        swap_order(&writer, &mut a, &mut b).await.unwrap();
        assert_eq!((a.order, b.order), (Some(3), Some(9)));
        assert_eq!(writer.writes().len(), 4);
    }

    #[tokio::test]
    async fn test_move_up_and_down() {
        let writer = RecordingWriter::default();
        let sorted = vec![habit("a", "A", Some(0)), habit("b", "B", Some(1)), habit("c", "C", Some(2))];

        assert!(move_habit(&writer, &sorted, 2, Direction::Up).await.unwrap());
        let written = writer.writes();
        assert_eq!(written.len(), 2);
        assert_eq!((written[0].id.as_str(), written[0].order), ("c", Some(1)));
        assert_eq!((written[1].id.as_str(), written[1].order), ("b", Some(2)));
    }

    #[tokio::test]
    async fn test_move_at_edges_is_noop() {
        let writer = RecordingWriter::default();
        let sorted = vec![habit("a", "A", Some(0)), habit("b", "B", Some(1))];

        assert!(!move_habit(&writer, &sorted, 0, Direction::Up).await.unwrap());
        assert!(!move_habit(&writer, &sorted, 1, Direction::Down).await.unwrap());
        assert!(!move_habit(&writer, &sorted, 5, Direction::Up).await.unwrap());
        assert!(writer.writes().is_empty());
    }

    #[tokio::test]
    async fn test_move_falls_back_to_index_for_unset_order() {
        let writer = RecordingWriter::default();
        let sorted = vec![habit("a", "A", Some(0)), habit("b", "B", None)];

        assert!(move_habit(&writer, &sorted, 0, Direction::Down).await.unwrap());
        let written = writer.writes();
        assert_eq!(written[0].order, Some(1));
        assert_eq!(written[1].order, Some(0));
    }

    #[tokio::test]
    async fn test_failed_second_write_keeps_sort_deterministic() {
        let writer = RecordingWriter::failing_after(1);
        let sorted = vec![habit("a", "Alpha", Some(0)), habit("b", "Beta", Some(1))];

        let result = move_habit(&writer, &sorted, 0, Direction::Down).await;
        assert!(result.is_err());

        // Only "a" was persisted (now order 1), so both share order 1
        let mut state = vec![sorted[1].clone()];
        state.extend(writer.writes());
        let ids: Vec<_> = sort_habits(&state).into_iter().map(|h| h.id).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(sort_habits(&state), sort_habits(&[state[1].clone(), state[0].clone()]));
    }

    #[test]
    fn test_direction_from_str() {
        assert_eq!("UP".parse::<Direction>().unwrap(), Direction::Up);
        assert_eq!("down".parse::<Direction>().unwrap(), Direction::Down);
        assert!("left".parse::<Direction>().is_err());
    }

    fn arb_habit() -> impl Strategy<Value = Habit> {
        ("[a-z]{1,6}", "[A-Za-z]{1,6}", proptest::option::of(-5i64..5)).prop_map(|(id, name, order)| habit(&id, &name, order))
    }

    proptest! {
        #[test]
        fn prop_sort_is_transitive(a in arb_habit(), b in arb_habit(), c in arb_habit()) {
            if compare_habits(&a, &b) != Ordering::Greater && compare_habits(&b, &c) != Ordering::Greater {
                prop_assert_ne!(compare_habits(&a, &c), Ordering::Greater);
            }
        }

        #[test]
        fn prop_sort_is_antisymmetric(a in arb_habit(), b in arb_habit()) {
            prop_assert_eq!(compare_habits(&a, &b), compare_habits(&b, &a).reverse());
        }

        #[test]
        fn prop_sort_ignores_input_order(habits in proptest::collection::vec(arb_habit(), 0..8)) {
            let mut reversed = habits.clone();
            reversed.reverse();
            let forward: Vec<_> = sort_habits(&habits).into_iter().map(|h| (h.order, h.name, h.id)).collect();
            let backward: Vec<_> = sort_habits(&reversed).into_iter().map(|h| (h.order, h.name, h.id)).collect();
            prop_assert_eq!(forward, backward);
        }

        #[test]
        fn prop_assign_missing_order_is_idempotent(habits in proptest::collection::vec(arb_habit(), 0..8)) {
            let mut once = habits.clone();
            assign_missing_order(&mut once);
            let mut twice = once.clone();
            let changed = assign_missing_order(&mut twice);
            prop_assert!(changed.is_empty());
            prop_assert_eq!(once, twice);
        }
    }
}
