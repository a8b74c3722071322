use ringq::ring::handle;
use ringq::{RingBuffer, RingError};

fn contents(buf: &RingBuffer) -> Vec<f64> {
    (0..buf.len()).map(|i| *buf.element_at(i).unwrap()).collect()
}

#[test]
fn wrapped_buffer_grows_in_order() {
    let mut buf = RingBuffer::new(4);
    for v in [1.0, 2.0, 3.0, 4.0] {
        buf.append(v).unwrap();
    }
    assert_eq!(buf.pop(), 1.0);
    assert_eq!((buf.start(), buf.len()), (1, 3));
    buf.append(5.0).unwrap();
    assert!(buf.is_wrapped());

    buf.resize(6).unwrap();
    assert_eq!(buf.capacity(), 6);
    assert_eq!(contents(&buf), vec![2.0, 3.0, 4.0, 5.0]);
}

#[test]
fn resize_to_exact_length_succeeds() {
    let mut buf = RingBuffer::new(4);
    for v in [9.0, 9.0, 1.0, 2.0] {
        buf.append(v).unwrap();
    }
    buf.pop();
    buf.pop();
    buf.append(3.0).unwrap();
    assert_eq!((buf.start(), buf.len()), (2, 3));

    buf.resize(3).unwrap();
    assert_eq!(buf.capacity(), 3);
    assert!(buf.is_full());
    assert_eq!(contents(&buf), vec![1.0, 2.0, 3.0]);
}

#[test]
fn resize_below_length_fails_and_preserves_state() {
    let mut buf = RingBuffer::new(5);
    for v in [1.0, 2.0, 3.0] {
        buf.append(v).unwrap();
    }
    let before = (buf.capacity(), buf.start(), contents(&buf));

    assert_eq!(buf.resize(2), Err(RingError::WouldTruncate { len: 3, requested: 2 }));
    assert_eq!((buf.capacity(), buf.start(), contents(&buf)), before);
}

#[test]
fn zero_capacity_buffer_needs_a_resize_before_append() {
    let mut buf = RingBuffer::new(0);
    assert_eq!(buf.len(), 0);
    assert!(buf.append(1.0).is_err());
    buf.resize(1).unwrap();
    buf.append(1.0).unwrap();
    assert_eq!(buf.pop(), 1.0);
}

#[test]
fn fill_then_drain_round_trip() {
    let n = 7;
    let mut buf = RingBuffer::new(n);
    let values: Vec<f64> = (0..n).map(|i| i as f64 * 1.5).collect();
    for &v in &values {
        buf.append(v).unwrap();
    }
    let drained: Vec<f64> = (0..n).map(|_| buf.pop()).collect();
    assert_eq!(drained, values);
    assert!(buf.is_empty());
    assert_eq!(buf.pop(), 0.0);
}

#[test]
fn grow_and_shrink_cycle_keeps_queue_order() {
    let mut buf = RingBuffer::new(3);
    let mut next = 0.0;
    let mut expected = std::collections::VecDeque::new();

    for cap in [5, 4, 9, 6, 3, 10, 4] {
        while buf.len() > cap {
            assert_eq!(Some(buf.pop()), expected.pop_front());
        }
        buf.resize(cap).unwrap();
        while !buf.is_full() {
            buf.append(next).unwrap();
            expected.push_back(next);
            next += 1.0;
        }
        assert_eq!(buf.pop(), expected.pop_front().unwrap());
        assert_eq!(contents(&buf), expected.iter().copied().collect::<Vec<_>>());
    }
}

#[test]
fn absent_handle_never_panics() {
    assert_eq!(handle::length_of::<ringq::Heap>(None), 0);
    assert_eq!(handle::pop::<ringq::Heap>(None), 0.0);
    assert_eq!(handle::append::<ringq::Heap>(None, 2.0), Err(RingError::Absent));
}
