//! Batched mutation through a live list: ordering, atomicity and re-keying.

#![allow(clippy::unwrap_used)]

use listnode::{Batch, Completion, ListError, Operation, OperationKind};
use listnode_test::{numbered_items, tight_config, DelegateEvent, ListHarness};
use proptest::prelude::*;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}

/// Harness that keeps every cell within 20 indices of the viewport.
fn retaining(count: usize) -> ListHarness<String> {
    ListHarness::with_config(
        tight_config().with_retention_margin(20),
        100.0,
        numbered_items(count),
    )
}

#[test]
fn test_delete_then_insert_applies_in_order() {
    let mut harness = ListHarness::new(strings(&["x", "y"]));
    harness
        .list_mut()
        .perform_batch_with(|b| {
            b.delete(0, 1).insert(0, ["a".to_string()]);
        })
        .unwrap();
    assert_eq!(harness.list().items(), ["a", "y"]);
}

#[test]
fn test_insert_then_delete_removes_the_inserted_item() {
    let mut harness = ListHarness::new(strings(&["x", "y"]));
    harness
        .list_mut()
        .perform_batch_with(|b| {
            b.insert(0, ["a".to_string()]).delete(0, 1);
        })
        .unwrap();
    assert_eq!(harness.list().items(), ["x", "y"]);
}

#[test]
fn test_later_operations_see_the_running_length() {
    let mut harness = ListHarness::new(strings(&["x"]));
    // Index 2 only exists after the first insert lands
    harness
        .list_mut()
        .perform_batch_with(|b| {
            b.insert(1, strings(&["a", "b"])).delete(2, 1);
        })
        .unwrap();
    assert_eq!(harness.list().items(), ["x", "a"]);
}

#[test]
fn test_insert_rekeys_cells_without_creating_them_again() {
    let mut harness = retaining(50);
    let before = harness.cell_ids();
    let created = harness.creations();

    harness
        .list_mut()
        .perform_batch_with(|b| {
            b.insert(3, strings(&["new0", "new1"]));
        })
        .unwrap();

    for j in 0..3 {
        harness.assert_cell(j, before[j].unwrap());
    }
    for j in 3..10 {
        harness.assert_cell(j + 2, before[j].unwrap());
    }
    // Only the two inserted rows needed cells
    harness.assert_creations(created + 2);
    assert!(harness.renderer().retired().is_empty());
}

#[test]
fn test_delete_releases_cells_and_shifts_the_rest() {
    let mut harness = retaining(50);
    let before = harness.cell_ids();

    harness
        .list_mut()
        .perform_batch_with(|b| {
            b.delete(2, 3);
        })
        .unwrap();

    let released: Vec<u64> = before[2..5].iter().map(|id| id.unwrap()).collect();
    assert_eq!(harness.renderer().retired_ids(), released);
    for j in 5..10 {
        harness.assert_cell(j - 3, before[j].unwrap());
    }
    for id in released {
        assert!(!harness.cell_ids().contains(&Some(id)));
    }
}

#[test]
fn test_move_carries_cells_with_their_items() {
    let mut harness = retaining(10);
    let before = harness.cell_ids();

    harness
        .list_mut()
        .perform_batch_with(|b| {
            b.move_items(0, 2, 5);
        })
        .unwrap();

    assert_eq!(
        harness.list().items()[..8],
        strings(&["item2", "item3", "item4", "item5", "item6", "item0", "item1", "item7"])
    );
    harness
        .assert_cell(5, before[0].unwrap())
        .assert_cell(6, before[1].unwrap())
        .assert_cell(0, before[2].unwrap());
    harness.assert_creations(10);
}

#[test]
fn test_replace_recreates_only_the_replaced_cells() {
    let mut harness = retaining(10);
    let before = harness.cell_ids();

    harness
        .list_mut()
        .perform_batch_with(|b| {
            b.replace(4, strings(&["fresh"]));
        })
        .unwrap();

    assert_eq!(harness.renderer().retired_ids(), vec![before[4].unwrap()]);
    assert_eq!(harness.list().cached_cell(4).unwrap().label, "\"fresh\"");
    harness.assert_cell(5, before[5].unwrap());
    harness.assert_creations(11);
}

#[test]
fn test_rejected_batch_leaves_everything_untouched() {
    let mut harness = ListHarness::new(numbered_items(20));
    let items = harness.list().items().to_vec();
    let cells = harness.cell_ids();
    let generation = harness.list().generation();
    let extent = harness.list_mut().content_extent();
    let created = harness.creations();
    harness.delegate().clear();

    let mut batch = Batch::new();
    batch
        .insert(0, strings(&["a"]))
        .delete(0, 1)
        .delete(25, 1);
    let err = harness.list_mut().perform_batch(batch).unwrap_err();

    assert_eq!(
        err,
        ListError::OutOfRange {
            position: 2,
            kind: OperationKind::Delete,
            index: 25,
            count: 1,
            len: 20,
        }
    );
    assert_eq!(harness.list().items(), items.as_slice());
    assert_eq!(harness.cell_ids(), cells);
    assert_eq!(harness.list().generation(), generation);
    assert_eq!(harness.list_mut().content_extent(), extent);
    assert_eq!(harness.list().number_of_items_in_section(0).unwrap(), 20);
    harness.assert_creations(created);
    assert!(harness.renderer().retired().is_empty());
    assert!(harness.delegate().events().is_empty());
}

#[test]
fn test_applied_batch_notifies_delegate() {
    let mut harness = ListHarness::new(numbered_items(5));
    harness.delegate().clear();
    harness
        .list_mut()
        .perform_batch(Batch::from_iter([Operation::delete(0, 2)]))
        .unwrap();
    assert!(harness.delegate().events().contains(&DelegateEvent::BatchApplied {
        initial_len: 5,
        final_len: 3,
    }));
}

#[test]
fn test_deferred_cells_from_before_a_batch_are_dropped() {
    let mut harness = ListHarness::deferred(numbered_items(20));
    let stale: Vec<_> = harness.renderer().requests();
    assert_eq!(stale.len(), 10);

    harness
        .list_mut()
        .perform_batch_with(|b| {
            b.insert(0, strings(&["head"]));
        })
        .unwrap();

    let outcomes = harness.deliver_deferred();
    let (dropped, registered): (Vec<_>, Vec<_>) = outcomes
        .iter()
        .partition(|(ticket, _)| stale.contains(ticket));

    assert!(dropped.iter().all(|(_, c)| *c == Completion::Stale));
    assert!(registered.iter().all(|(_, c)| *c == Completion::Registered));
    assert_eq!(harness.list().cache_stats().stale_drops, 10);
    assert_eq!(harness.renderer().retired().len(), 10);
    assert_eq!(harness.list().cached_cell(0).unwrap().label, "\"head\"");
    assert_eq!(harness.list().cached_cell(1).unwrap().label, "\"item0\"");
}

/// Raw operation parameters, mapped onto a valid operation for whatever
/// length the list has when it is applied.
#[derive(Debug, Clone)]
struct RawOp {
    kind: u8,
    a: usize,
    b: usize,
    c: usize,
}

fn raw_op() -> impl Strategy<Value = RawOp> {
    (0u8..4, 0usize..64, 0usize..6, 0usize..64).prop_map(|(kind, a, b, c)| RawOp { kind, a, b, c })
}

fn concrete(raw: &RawOp, len: usize, fresh: &mut usize) -> Operation<String> {
    let mut take = |n: usize| -> Vec<String> {
        (0..n)
            .map(|_| {
                *fresh += 1;
                format!("new{fresh}")
            })
            .collect()
    };
    match raw.kind {
        0 => Operation::insert(raw.a % (len + 1), take(raw.b + 1)),
        _ if len == 0 => Operation::insert(0, take(raw.b + 1)),
        1 => {
            let at = raw.a % len;
            Operation::delete(at, raw.b.min(len - at))
        }
        2 => {
            let from = raw.a % len;
            let count = raw.b.min(len - from);
            Operation::move_items(from, count, raw.c % (len - count + 1))
        }
        _ => {
            let at = raw.a % len;
            let count = raw.b.min(len - at).max(1);
            Operation::replace(at, take(count))
        }
    }
}

proptest! {
    #[test]
    fn test_valid_batches_keep_cells_matched_to_items(
        initial in 0usize..40,
        raw in prop::collection::vec(raw_op(), 1..12),
        scroll in 0.0f32..300.0,
    ) {
        let mut harness = retaining(initial);
        harness.scroll(scroll);

        let mut fresh = 0;
        let mut len = initial;
        let mut batch = Batch::new();
        let mut expected = len as isize;
        for op in &raw {
            let op = concrete(op, len, &mut fresh);
            expected += op.length_delta();
            len = (len as isize + op.length_delta()) as usize;
            batch.add_operation(op);
        }

        let applied = harness.list_mut().perform_batch(batch).unwrap();
        prop_assert_eq!(applied.final_len as isize, expected);
        prop_assert_eq!(harness.list().len(), len);
        prop_assert_eq!(harness.list().number_of_items_in_section(0).unwrap(), len);

        for index in 0..len {
            if let Some(cell) = harness.list().cached_cell(index) {
                let item = &harness.list().items()[index];
                prop_assert_eq!(cell.label, format!("{item:?}"));
            }
        }
    }

    #[test]
    fn test_batch_with_a_bad_tail_changes_nothing(
        initial in 1usize..40,
        raw in prop::collection::vec(raw_op(), 0..6),
        overshoot in 1usize..10,
    ) {
        let mut harness = retaining(initial);
        let items = harness.list().items().to_vec();
        let cells = harness.cell_ids();

        let mut fresh = 0;
        let mut len = initial;
        let mut batch = Batch::new();
        for op in &raw {
            let op = concrete(op, len, &mut fresh);
            len = (len as isize + op.length_delta()) as usize;
            batch.add_operation(op);
        }
        batch.delete(len, overshoot);

        prop_assert!(harness.list_mut().perform_batch(batch).is_err());
        prop_assert_eq!(harness.list().items(), items.as_slice());
        prop_assert_eq!(harness.cell_ids(), cells);
    }
}
