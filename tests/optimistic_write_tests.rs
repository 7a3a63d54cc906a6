use pixelaw_canvas::cache::{MergeOutcome, PixelCache};
use pixelaw_canvas::core::{Cell, Color, Pixel};
use pixelaw_canvas::error::{CanvasError, RemoteError};
use pixelaw_canvas::write::{
    GENERIC_WRITE_ERROR, Receipt, WriteConfig, WriteCoordinator, WriteOutcome, WritePhase,
};

const RED: Color = Color::rgb(255, 0, 0);
const GREEN: Color = Color::rgb(0, 255, 0);
const BLUE: Color = Color::rgb(0, 0, 255);

fn cell() -> Cell {
    Cell::new(12, 34)
}

fn receipt() -> Receipt {
    Receipt {
        transaction_hash: "0xfeed".to_owned(),
    }
}

fn cache_with_red() -> PixelCache {
    let mut cache = PixelCache::new();
    cache.merge_remote(Pixel::new(cell(), RED));
    cache
}

fn no_reflection() -> WriteConfig {
    WriteConfig {
        wait_for_reflection: false,
        ..WriteConfig::default()
    }
}

#[test]
fn issue_paints_immediately_and_returns_submission() {
    let mut cache = cache_with_red();
    let mut writes = WriteCoordinator::new(WriteConfig::default());

    let request = writes.issue(&mut cache, "0xabc", cell(), BLUE, 0.0);

    assert_eq!(cache.get(cell()), Some(BLUE));
    assert_eq!(cache.locked_by(cell()), Some(request.transaction_id));
    assert_eq!(request.account, "0xabc");
    assert_eq!(request.cell, cell());
    assert_eq!(request.packed_color(), 0x0000_ffff);
    let pending = writes.pending(request.transaction_id).expect("pending write");
    assert_eq!(pending.patches.inverse.color, Some(RED));
    assert_eq!(pending.phase, WritePhase::Submitting);
}

#[test]
fn transaction_ids_are_unique() {
    let mut cache = PixelCache::new();
    let mut writes = WriteCoordinator::new(WriteConfig::default());

    let first = writes.issue(&mut cache, "0xabc", Cell::new(0, 0), RED, 0.0);
    let second = writes.issue(&mut cache, "0xabc", Cell::new(1, 0), RED, 0.0);

    assert_ne!(first.transaction_id, second.transaction_id);
}

#[test]
fn rejection_restores_previous_color_with_humanized_message() {
    let mut cache = cache_with_red();
    let mut writes = WriteCoordinator::new(WriteConfig::default());
    let request = writes.issue(&mut cache, "0xabc", cell(), BLUE, 0.0);

    let outcome = writes
        .complete(
            &mut cache,
            request.transaction_id,
            Err(RemoteError::Rejected("Cooldown not over".to_owned())),
            5.0,
        )
        .expect("complete");

    match outcome {
        WriteOutcome::RolledBack { cell: c, message, .. } => {
            assert_eq!(c, cell());
            assert_eq!(
                message,
                "Cooldown period is not over. Please wait and try again later."
            );
        }
        other => panic!("expected rollback, got {other:?}"),
    }
    assert_eq!(cache.get(cell()), Some(RED));
    assert_eq!(cache.locked_by(cell()), None);
    assert_eq!(writes.pending_count(), 0);
}

#[test]
fn rejection_of_first_paint_on_empty_cell_clears_it() {
    let mut cache = PixelCache::new();
    let mut writes = WriteCoordinator::new(WriteConfig::default());
    let request = writes.issue(&mut cache, "0xabc", cell(), BLUE, 0.0);

    let outcome = writes
        .complete(
            &mut cache,
            request.transaction_id,
            Err(RemoteError::Network("socket closed".to_owned())),
            5.0,
        )
        .expect("complete");

    assert!(matches!(
        outcome,
        WriteOutcome::RolledBack {
            message: GENERIC_WRITE_ERROR,
            ..
        }
    ));
    assert_eq!(cache.get(cell()), None);
    assert!(cache.is_empty());
}

#[test]
fn success_without_reflection_wait_confirms() {
    let mut cache = cache_with_red();
    let mut writes = WriteCoordinator::new(no_reflection());
    let request = writes.issue(&mut cache, "0xabc", cell(), BLUE, 0.0);

    let outcome = writes
        .complete(&mut cache, request.transaction_id, Ok(receipt()), 5.0)
        .expect("complete");

    assert_eq!(
        outcome,
        WriteOutcome::Confirmed {
            transaction_id: request.transaction_id,
            cell: cell()
        }
    );
    assert_eq!(cache.get(cell()), Some(BLUE));
    assert_eq!(cache.locked_by(cell()), None);
}

#[test]
fn submission_timeout_keeps_optimistic_value() {
    let mut cache = cache_with_red();
    let mut writes = WriteCoordinator::new(WriteConfig::default());
    let request = writes.issue(&mut cache, "0xabc", cell(), BLUE, 0.0);

    let outcome = writes
        .complete(&mut cache, request.transaction_id, Err(RemoteError::Timeout), 5.0)
        .expect("complete");

    assert!(matches!(outcome, WriteOutcome::Confirmed { .. }));
    assert_eq!(cache.get(cell()), Some(BLUE));
    assert_eq!(writes.pending_count(), 0);
}

#[test]
fn success_waits_for_remote_reflection() {
    let mut cache = cache_with_red();
    let mut writes = WriteCoordinator::new(WriteConfig::default());
    let request = writes.issue(&mut cache, "0xabc", cell(), BLUE, 0.0);

    let outcome = writes
        .complete(&mut cache, request.transaction_id, Ok(receipt()), 100.0)
        .expect("complete");
    assert_eq!(
        outcome,
        WriteOutcome::AwaitingReflection {
            transaction_id: request.transaction_id,
            deadline_ms: 10_100.0
        }
    );

    // A different color does not count as reflection.
    assert_eq!(writes.observe_remote(&mut cache, Pixel::new(cell(), GREEN)), None);

    let confirmed = writes.observe_remote(&mut cache, Pixel::new(cell(), BLUE));
    assert_eq!(confirmed, Some(request.transaction_id));
    assert_eq!(cache.merge_remote(Pixel::new(cell(), BLUE)), MergeOutcome::Unchanged);
    assert_eq!(cache.locked_by(cell()), None);
    assert_eq!(writes.pending_count(), 0);
}

#[test]
fn reflection_already_seen_confirms_on_submission() {
    let mut cache = cache_with_red();
    let mut writes = WriteCoordinator::new(WriteConfig::default());
    let request = writes.issue(&mut cache, "0xabc", cell(), BLUE, 0.0);
    assert_eq!(cache.merge_remote(Pixel::new(cell(), BLUE)), MergeOutcome::Deferred);

    let outcome = writes
        .complete(&mut cache, request.transaction_id, Ok(receipt()), 5.0)
        .expect("complete");

    assert!(matches!(outcome, WriteOutcome::Confirmed { .. }));
}

#[test]
fn reflection_timeout_confirms_without_error() {
    let mut cache = cache_with_red();
    let mut writes = WriteCoordinator::new(WriteConfig::default());
    let request = writes.issue(&mut cache, "0xabc", cell(), BLUE, 0.0);
    writes
        .complete(&mut cache, request.transaction_id, Ok(receipt()), 0.0)
        .expect("complete");

    assert!(writes.expire(&mut cache, 9_999.0).is_empty());
    let expired = writes.expire(&mut cache, 10_000.0);

    assert_eq!(expired, vec![(request.transaction_id, cell())]);
    assert_eq!(cache.get(cell()), Some(BLUE));
    assert_eq!(writes.pending_count(), 0);
}

#[test]
fn remote_data_does_not_clobber_pending_write() {
    let mut cache = cache_with_red();
    let mut writes = WriteCoordinator::new(WriteConfig::default());
    writes.issue(&mut cache, "0xabc", cell(), BLUE, 0.0);

    assert_eq!(cache.merge_remote(Pixel::new(cell(), RED)), MergeOutcome::Deferred);

    assert_eq!(cache.get(cell()), Some(BLUE));
    assert_eq!(cache.deferred_remote(cell()), Some(RED));
}

#[test]
fn rollback_prefers_remote_value_seen_while_pending() {
    let mut cache = cache_with_red();
    let mut writes = WriteCoordinator::new(WriteConfig::default());
    let request = writes.issue(&mut cache, "0xabc", cell(), BLUE, 0.0);
    cache.merge_remote(Pixel::new(cell(), GREEN));

    writes
        .complete(
            &mut cache,
            request.transaction_id,
            Err(RemoteError::Rejected("transaction reverted".to_owned())),
            5.0,
        )
        .expect("complete");

    assert_eq!(cache.get(cell()), Some(GREEN));
}

#[test]
fn chained_writes_roll_back_to_the_last_known_good_color() {
    let mut cache = cache_with_red();
    let mut writes = WriteCoordinator::new(no_reflection());
    let first = writes.issue(&mut cache, "0xabc", cell(), BLUE, 0.0);
    let second = writes.issue(&mut cache, "0xabc", cell(), GREEN, 1.0);
    assert_eq!(cache.get(cell()), Some(GREEN));
    assert_eq!(
        writes
            .pending(second.transaction_id)
            .expect("pending")
            .patches
            .inverse
            .color,
        Some(RED)
    );

    writes
        .complete(&mut cache, first.transaction_id, Ok(receipt()), 2.0)
        .expect("confirm first");
    writes
        .complete(
            &mut cache,
            second.transaction_id,
            Err(RemoteError::Rejected("execution_error".to_owned())),
            3.0,
        )
        .expect("reject second");

    assert_eq!(cache.get(cell()), Some(BLUE));
    assert_eq!(cache.locked_by(cell()), None);
}

#[test]
fn rejecting_newer_write_shows_older_pending_write_again() {
    let mut cache = cache_with_red();
    let mut writes = WriteCoordinator::new(no_reflection());
    let first = writes.issue(&mut cache, "0xabc", cell(), BLUE, 0.0);
    let second = writes.issue(&mut cache, "0xabc", cell(), GREEN, 1.0);

    writes
        .complete(
            &mut cache,
            second.transaction_id,
            Err(RemoteError::Rejected("nope".to_owned())),
            2.0,
        )
        .expect("reject second");
    assert_eq!(cache.get(cell()), Some(BLUE));
    assert_eq!(cache.locked_by(cell()), Some(first.transaction_id));

    writes
        .complete(
            &mut cache,
            first.transaction_id,
            Err(RemoteError::Rejected("nope".to_owned())),
            3.0,
        )
        .expect("reject first");
    assert_eq!(cache.get(cell()), Some(RED));
    assert_eq!(cache.locked_by(cell()), None);
}

#[test]
fn unknown_or_repeated_completion_is_an_error() {
    let mut cache = PixelCache::new();
    let mut writes = WriteCoordinator::new(WriteConfig::default());
    let request = writes.issue(&mut cache, "0xabc", cell(), BLUE, 0.0);
    writes
        .complete(&mut cache, request.transaction_id, Ok(receipt()), 0.0)
        .expect("complete");

    let repeated = writes.complete(&mut cache, request.transaction_id, Ok(receipt()), 1.0);
    assert!(matches!(repeated, Err(CanvasError::InvalidData(_))));

    writes.expire(&mut cache, 20_000.0);
    let unknown = writes.complete(&mut cache, request.transaction_id, Ok(receipt()), 1.0);
    assert!(matches!(unknown, Err(CanvasError::UnknownTransaction(_))));
}
