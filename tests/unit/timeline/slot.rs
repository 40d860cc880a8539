use super::*;

fn slot(index: usize, frames: u64) -> ImageSlot {
    ImageSlot {
        index,
        source: PathBuf::from(format!("img{index}.png")),
        effect_names: Vec::new(),
        chain: EffectChain::passthrough(),
        frames,
        first_frame: FrameIndex(999),
    }
}

#[test]
fn first_frames_follow_slot_order() {
    let tl = Timeline::new(
        Fps::whole(10).unwrap(),
        3.0,
        vec![slot(0, 10), slot(1, 0), slot(2, 20)],
    );
    let firsts: Vec<u64> = tl.slots().iter().map(|s| s.first_frame.0).collect();
    assert_eq!(firsts, vec![0, 10, 10]);
    assert_eq!(tl.total_frames(), 30);
    assert!(tl.slots()[1].is_empty());
    assert_eq!(tl.frame_size(), None);
}

#[test]
fn locate_skips_empty_slots() {
    let tl = Timeline::new(
        Fps::whole(10).unwrap(),
        3.0,
        vec![slot(0, 10), slot(1, 0), slot(2, 20)],
    );
    let (s, local) = tl.locate(FrameIndex(9)).unwrap();
    assert_eq!((s.index, local), (0, 9));
    let (s, local) = tl.locate(FrameIndex(10)).unwrap();
    assert_eq!((s.index, local), (2, 0));
    assert!(tl.locate(FrameIndex(30)).is_none());
}
