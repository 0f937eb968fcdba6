use bevm_emu::{Flag, Memory, Registers, Word};
use proptest::prelude::*;

const SMALL_MEMORY:usize = 64;

#[test]
fn flag_writes_keep_other_bits_for_every_status_word() {
    for start in 0u16..(1 << 9) {
        for flag in Flag::ALL.iter().copied() {
            for on in [false, true] {
                let mut r = Registers::new();
                r.program_state = Word::from(start);
                r.set_flag(flag, on).unwrap();

                let mask = 1u16 << flag.bit();
                let after = r.program_state.to_unsigned().unwrap();
                assert_eq!(after & !mask, start & !mask, "flag {:?} leaked into other bits", flag);
                assert_eq!(after & mask != 0, on);
                assert_eq!(r.flag(flag).unwrap(), on);
            }
        }
    }
}

proptest! {
    #[test]
    fn word_round_trips(v in any::<u16>()) {
        prop_assert_eq!(Word::from_unsigned(v as u32).to_unsigned().unwrap(), v);
    }

    #[test]
    fn word_truncates_wide_values(v in any::<u32>()) {
        prop_assert_eq!(Word::from_unsigned(v).to_unsigned().unwrap(), (v & 0xFFFF) as u16);
    }

    #[test]
    fn increment_wraps(v in any::<u16>()) {
        let next = Word::from(v).increment().unwrap().to_unsigned().unwrap();
        prop_assert_eq!(next, ((v as u32 + 1) % 0x1_0000) as u16);
    }

    #[test]
    fn last_write_wins(address in 0..SMALL_MEMORY, a in any::<u16>(), b in any::<u16>()) {
        let mut mem = Memory::new(SMALL_MEMORY);
        prop_assert!(mem.get(address).unwrap().to_unsigned().is_err());
        mem.set(address, Word::from(a)).unwrap();
        mem.set(address, Word::from(b)).unwrap();
        prop_assert_eq!(mem.get(address).unwrap().to_unsigned().unwrap(), b);
    }

    #[test]
    fn load_then_dump_is_identity(image in proptest::collection::vec(any::<u8>(), SMALL_MEMORY * 2)) {
        let mut mem = Memory::new(SMALL_MEMORY);
        mem.load(&image).unwrap();
        prop_assert_eq!(mem.dump().unwrap(), image);
    }

    #[test]
    fn recalc_matches_accumulator(v in any::<u16>()) {
        let mut r = Registers::new();
        r.accumulator = Word::from(v);
        r.recalc_from_accumulator().unwrap();
        prop_assert_eq!(r.zero().unwrap(), v == 0);
        prop_assert_eq!(r.sign().unwrap(), v & 0x80 != 0);
    }
}
