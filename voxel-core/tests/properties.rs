//! Property tests for frame sequencing, buffering and pixel mapping

use proptest::prelude::*;

use voxel_core::config::{VoxelModuleGeometry, MAX_MODULE_Y_SIZE};
use voxel_core::frame::{Enqueued, FrameRingBuffer, FrameSequencer};
use voxel_core::render::gamma::{gamma8, GAMMA8};
use voxel_core::render::VoxelCursor;

type Ring = FrameRingBuffer<6, 3>;

proptest! {
    #[test]
    fn test_gamma_monotonic(a in any::<u8>(), b in any::<u8>()) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(gamma8(lo) <= gamma8(hi));
        prop_assert_eq!(gamma8(a), GAMMA8[a as usize]);
    }

    #[test]
    fn test_sequencer_rule(last in any::<u16>(), id in any::<u16>()) {
        let mut seq = FrameSequencer::new();
        seq.accept(last);
        let expected = (1..256).contains(&id) || id > last;
        prop_assert_eq!(seq.accept(id), expected);
        let now = if expected { id } else { last };
        prop_assert_eq!(seq.last_known(), Some(now));
    }

    #[test]
    fn test_sequencer_first_frame(id in any::<u16>()) {
        let mut seq = FrameSequencer::new();
        prop_assert!(seq.accept(id));
    }

    #[test]
    fn test_ring_keeps_newest(count in 0usize..40) {
        let mut ring = Ring::new();
        let geometry = VoxelModuleGeometry::DEFAULT;
        for id in 0..count as u16 {
            let outcome = ring.enqueue(id, geometry, &[id as u8; 3]).unwrap();
            if (id as usize) < ring.capacity() {
                prop_assert_eq!(outcome, Enqueued::Stored);
            } else {
                prop_assert_eq!(outcome, Enqueued::Evicted { id: id - 6 });
            }
            prop_assert!(ring.len() <= ring.capacity());
        }

        let first = count.saturating_sub(6) as u16;
        for id in first..count as u16 {
            let frame = ring.dequeue().unwrap();
            prop_assert_eq!(frame.id(), id);
            prop_assert_eq!(frame.payload(), &[id as u8; 3][..]);
        }
        prop_assert!(ring.is_empty());
    }

    #[test]
    fn test_mapping_is_bijective(y in 1..=MAX_MODULE_Y_SIZE as u8) {
        let geometry = VoxelModuleGeometry::new(y).unwrap();
        let mut seen = vec![false; geometry.leds_per_module()];
        let mut last_offset = None;
        for (offset, index) in VoxelCursor::new(geometry) {
            prop_assert!(!seen[index]);
            seen[index] = true;
            prop_assert_eq!(offset, last_offset.map_or(0, |o| o + 3));
            last_offset = Some(offset);
        }
        prop_assert!(seen.iter().all(|s| *s));
        prop_assert_eq!(last_offset, Some(geometry.frame_len() - 3));
    }
}
