use emu8_core::{Chip8, Chip8Error, Options, KEY_COUNT};
use proptest::prelude::*;

fn machine(program: &[u8]) -> Chip8 {
    let mut chip8 = Chip8::with_options(Options {
        seed: Some(0),
        ..Options::default()
    });
    chip8.load_program(program).unwrap();
    chip8
}

fn run(chip8: &mut Chip8, steps: usize) {
    for _ in 0..steps {
        chip8.step().unwrap();
    }
}

proptest! {
    #[test]
    fn add_with_carry(a in any::<u8>(), b in any::<u8>()) {
        // V0 = a; V1 = b; V0 += V1
        let mut chip8 = machine(&[0x60, a, 0x61, b, 0x80, 0x14]);
        run(&mut chip8, 3);
        let sum = u16::from(a) + u16::from(b);
        prop_assert_eq!(chip8.registers().v[0x0], (sum % 256) as u8);
        prop_assert_eq!(chip8.registers().v[0xF], (sum > 255) as u8);
    }

    #[test]
    fn drawing_twice_restores_the_frame(
        x in any::<u8>(),
        y in any::<u8>(),
        sprite in prop::collection::vec(any::<u8>(), 1..16),
    ) {
        // V0 = x; V1 = y; I = 0x20A; draw; draw; sprite bytes
        let n = sprite.len() as u8;
        let mut program = vec![0x60, x, 0x61, y, 0xA2, 0x0A, 0xD0, 0x10 | n, 0xD0, 0x10 | n];
        program.extend_from_slice(&sprite);
        let mut chip8 = machine(&program);

        run(&mut chip8, 4);
        prop_assert_eq!(chip8.registers().v[0xF], 0);
        run(&mut chip8, 1);

        prop_assert!(chip8.frame().rows().iter().flatten().all(|&lit| !lit));
        let any_lit = sprite.iter().any(|&row| row != 0);
        prop_assert_eq!(chip8.registers().v[0xF], any_lit as u8);
    }

    #[test]
    fn delay_timer_reaches_zero(delay in any::<u8>(), extra in 0usize..8) {
        // V0 = delay; DT = V0
        let mut chip8 = machine(&[0x60, delay, 0xF0, 0x15]);
        run(&mut chip8, 2);
        prop_assert_eq!(chip8.delay_timer(), delay);
        for _ in 0..delay as usize + extra {
            chip8.tick_timers();
        }
        prop_assert_eq!(chip8.delay_timer(), 0);
    }

    #[test]
    fn skip_if_equal(a in any::<u8>(), b in any::<u8>()) {
        // V0 = a; skip if V0 == b
        let mut chip8 = machine(&[0x60, a, 0x30, b]);
        run(&mut chip8, 2);
        let expected = if a == b { 0x206 } else { 0x204 };
        prop_assert_eq!(chip8.registers().pc, expected);
    }

    #[test]
    fn calls_and_returns_balance(depth in 1usize..=16) {
        // main calls 0x300 then spins; each level calls the next and returns
        let mut program = vec![0; 0x100 + 4 * depth];
        program[0..4].copy_from_slice(&[0x23, 0x00, 0x12, 0x02]);
        for level in 0..depth {
            let base = 0x100 + 4 * level;
            if level + 1 < depth {
                let next = 0x300 + 4 * (level as u16 + 1);
                program[base..base + 4]
                    .copy_from_slice(&[0x20 | (next >> 8) as u8, next as u8, 0x00, 0xEE]);
            } else {
                program[base..base + 2].copy_from_slice(&[0x00, 0xEE]);
            }
        }
        let mut chip8 = machine(&program);

        run(&mut chip8, depth);
        prop_assert_eq!(chip8.stack_depth(), depth);
        run(&mut chip8, depth);
        prop_assert_eq!(chip8.stack_depth(), 0);
        prop_assert_eq!(chip8.registers().pc, 0x202);
    }

    #[test]
    fn key_wait_holds_until_pressed(
        x in 0u8..16,
        idle_steps in 1usize..32,
        key in 0usize..KEY_COUNT,
    ) {
        // Vx = 0xAA; wait for a key into Vx
        let mut chip8 = machine(&[0x60 | x, 0xAA, 0xF0 | x, 0x0A]);
        run(&mut chip8, 1);
        run(&mut chip8, idle_steps);
        prop_assert!(chip8.is_waiting_for_key());
        prop_assert_eq!(chip8.registers().pc, 0x202);
        prop_assert_eq!(chip8.registers().v[x as usize], 0xAA);

        let mut keys = [false; KEY_COUNT];
        keys[key] = true;
        chip8.set_keys(keys);
        run(&mut chip8, 1);
        prop_assert!(!chip8.is_waiting_for_key());
        prop_assert_eq!(chip8.registers().v[x as usize], key as u8);
        prop_assert_eq!(chip8.registers().pc, 0x204);
    }

    #[test]
    fn oversized_load_changes_nothing(
        program in prop::collection::vec(any::<u8>(), 0..0xE00),
        excess in 1usize..64,
    ) {
        let mut chip8 = machine(&program);
        let before = chip8.memory().as_bytes().to_vec();

        let oversized = vec![0x5A; 0xE00 + excess];
        prop_assert_eq!(
            chip8.load_program(&oversized),
            Err(Chip8Error::LoadOverflow { size: 0xE00 + excess, capacity: 0xE00 })
        );
        prop_assert_eq!(chip8.memory().as_bytes(), &before[..]);
    }
}
