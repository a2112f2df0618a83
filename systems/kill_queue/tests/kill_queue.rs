use coin_shooter_core::Timestamp;
use coin_shooter_storage::{KeyValueStore, MemoryStore, PENDING_KILLS_KEY};
use coin_shooter_system_kill_queue::KillQueue;

#[test]
fn additions_accumulate_and_persist() {
    let mut store = MemoryStore::new();
    let mut queue = KillQueue::load(&store);

    assert_eq!(queue.add_kills(3, Timestamp::from_millis(10), &mut store), 3);
    assert_eq!(queue.add_kills(2, Timestamp::from_millis(20), &mut store), 5);
    assert_eq!(queue.pending_kills(), 5);

    let restored = KillQueue::load(&store);
    assert_eq!(restored.pending_kills(), 5);
    assert_eq!(restored.last_update(), Timestamp::from_millis(20));
}

#[test]
fn claim_threshold_is_ten() {
    let mut store = MemoryStore::new();
    let mut queue = KillQueue::load(&store);

    let _ = queue.add_kills(9, Timestamp::from_millis(0), &mut store);
    assert!(!queue.can_claim());
    let _ = queue.add_kill(Timestamp::from_millis(1), &mut store);
    assert!(queue.can_claim());
}

#[test]
fn custom_minimum_overrides_the_default() {
    let mut store = MemoryStore::new();
    let mut queue = KillQueue::load(&store);
    assert!(!queue.meets_minimum(0), "an empty queue is never claimable");

    let _ = queue.add_kills(11, Timestamp::from_millis(0), &mut store);
    assert!(queue.can_claim());
    assert!(!queue.meets_minimum(20));
    assert!(queue.meets_minimum(11));
}

#[test]
fn zero_additions_do_not_touch_the_record() {
    let mut store = MemoryStore::new();
    let mut queue = KillQueue::load(&store);
    assert_eq!(queue.add_kills(0, Timestamp::from_millis(5), &mut store), 0);
    assert!(store.is_empty());
}

#[test]
fn clearing_removes_the_record() {
    let mut store = MemoryStore::new();
    let mut queue = KillQueue::load(&store);
    let _ = queue.add_kills(12, Timestamp::from_millis(0), &mut store);

    assert!(queue.clear_kills(&mut store));
    assert_eq!(queue.pending_kills(), 0);
    assert_eq!(store.read(PENDING_KILLS_KEY).expect("read"), None);
}

#[test]
fn settling_keeps_kills_queued_during_a_claim() {
    let mut store = MemoryStore::new();
    let mut queue = KillQueue::load(&store);
    let _ = queue.add_kills(12, Timestamp::from_millis(0), &mut store);
    let _ = queue.add_kills(3, Timestamp::from_millis(1), &mut store);

    assert_eq!(queue.settle(12, Timestamp::from_millis(2), &mut store), 3);
    assert_eq!(KillQueue::load(&store).pending_kills(), 3);

    assert_eq!(queue.settle(3, Timestamp::from_millis(3), &mut store), 0);
    assert_eq!(store.read(PENDING_KILLS_KEY).expect("read"), None);
}

#[test]
fn unavailable_store_keeps_counting_in_memory() {
    let mut store = MemoryStore::unavailable();
    let mut queue = KillQueue::load(&store);
    assert_eq!(queue.add_kills(4, Timestamp::from_millis(0), &mut store), 4);
    assert!(!queue.clear_kills(&mut store));
    assert_eq!(queue.pending_kills(), 0);
}
