use super::*;

#[test]
fn capacity_bookkeeping() {
    let mut r = Resource::new(2);
    assert!(r.has_capacity());
    r.enqueue(AgentId(0));
    let a = r.admit_front();
    assert_eq!(a, AgentId(0));
    assert_eq!(r.len_users(), 1);
    assert!(r.has_capacity());

    r.enqueue(AgentId(1));
    r.admit_front();
    assert_eq!(r.len_users(), 2);
    assert!(!r.has_capacity());
}

#[test]
fn fifo_order_preserved() {
    let mut r = Resource::new(1);
    r.enqueue(AgentId(0));
    r.enqueue(AgentId(1));
    assert_eq!(r.front(), Some(AgentId(0)));
    r.admit_front();
    assert_eq!(r.front(), Some(AgentId(1)));
}

#[test]
fn remove_user_frees_capacity() {
    let mut r = Resource::new(1);
    r.enqueue(AgentId(5));
    r.admit_front();
    assert!(!r.has_capacity());
    assert!(r.remove_user(AgentId(5)));
    assert!(r.has_capacity());
    assert!(!r.remove_user(AgentId(5)), "already removed");
}

#[test]
#[should_panic]
fn admit_front_without_capacity_panics() {
    let mut r = Resource::new(1);
    r.enqueue(AgentId(0));
    r.admit_front();
    r.enqueue(AgentId(1));
    r.admit_front();
}
