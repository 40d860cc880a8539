use super::*;

fn cfg() -> SinkConfig {
    SinkConfig {
        size: FrameSize::new(2, 2).unwrap(),
        fps: Fps::whole(10).unwrap(),
    }
}

#[test]
fn captures_frames_in_order() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg()).unwrap();
    let f = Frame::black(cfg().size);
    sink.push_frame(FrameIndex(0), &f).unwrap();
    sink.push_frame(FrameIndex(1), &f).unwrap();
    sink.end().unwrap();
    assert!(sink.is_finalized());
    assert_eq!(sink.frames().len(), 2);
    assert_eq!(sink.config(), Some(cfg()));
}

#[test]
fn rejects_out_of_order_and_wrong_size() {
    let mut sink = InMemorySink::new();
    let f = Frame::black(cfg().size);
    assert!(sink.push_frame(FrameIndex(0), &f).is_err());

    sink.begin(cfg()).unwrap();
    sink.push_frame(FrameIndex(3), &f).unwrap();
    assert!(sink.push_frame(FrameIndex(3), &f).is_err());
    assert!(sink.push_frame(FrameIndex(2), &f).is_err());

    let big = Frame::black(FrameSize::new(4, 2).unwrap());
    assert!(sink.push_frame(FrameIndex(4), &big).is_err());
}

#[test]
fn finalizing_twice_is_an_error() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg()).unwrap();
    sink.end().unwrap();
    assert!(sink.end().is_err());
    assert!(sink.push_frame(FrameIndex(0), &Frame::black(cfg().size)).is_err());
}
