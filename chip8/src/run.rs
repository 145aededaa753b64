use std::time::Instant;

use anyhow::{Context, Result};
use log::{debug, info};
use sdl2::event::Event;
use sdl2::keyboard::Keycode;

use display::Display;
use emu8_core::Chip8;

use crate::audio::Beeper;
use crate::clock::Clock;
use crate::keymap::{keymap, HeldKeys};
use crate::Args;

/// Steps per loop while fast-forwarding
const FAST_FORWARD_STEPS: u32 = 64;

pub fn run(args: &Args) -> Result<()> {
    let mut chip8 = Chip8::with_options(args.options());

    // Load ROM
    let rom = std::fs::read(&args.rom)
        .with_context(|| format!("unable to read ROM {}", args.rom.display()))?;
    chip8
        .load_program(&rom)
        .with_context(|| format!("unable to load ROM {}", args.rom.display()))?;
    info!("loaded {} ({} bytes)", args.rom.display(), rom.len());

    // Get SDL2 context
    let sdl = sdl2::init().map_err(anyhow::Error::msg)?;
    let title = match args.rom.file_name() {
        Some(name) => format!("Emu-8 - {}", name.to_string_lossy()),
        None => String::from("Emu-8"),
    };
    let mut display = Display::new(&sdl, &title, args.scale).map_err(anyhow::Error::msg)?;
    let mut beeper = Beeper::new(&sdl, args.tone_hz).map_err(anyhow::Error::msg)?;
    let mut events = sdl.event_pump().map_err(anyhow::Error::msg)?;

    let mut held = HeldKeys::default();
    let mut clock = Clock::new(args.clock_hz, Instant::now());

    // Whether or not the clock speed should be respected
    let mut fast_forward = false;

    'event: loop {
        // Handle input
        let mut keys_changed = false;
        for event in events.poll_iter() {
            match event {
                Event::Quit { .. } => break 'event,
                Event::KeyDown {
                    keycode: Some(key), ..
                } => match (key, keymap(key)) {
                    (_, Some(kc)) => keys_changed |= held.set(kc, true),
                    (Keycode::Space, _) => fast_forward = true,
                    (Keycode::Escape, _) => break 'event,
                    _ => continue,
                },
                Event::KeyUp {
                    keycode: Some(key), ..
                } => match (key, keymap(key)) {
                    (_, Some(kc)) => keys_changed |= held.set(kc, false),
                    (Keycode::Space, _) => fast_forward = false,
                    _ => continue,
                },
                _ => continue,
            };
        }
        if keys_changed {
            chip8.set_keys(held.snapshot());
        }

        // Update state
        let due = clock.due(Instant::now());
        let steps = if fast_forward {
            FAST_FORWARD_STEPS
        } else {
            due.steps
        };
        for _ in 0..steps {
            chip8
                .step()
                .with_context(|| format!("execution stopped at {:04X}", chip8.registers().pc))?;
        }
        for _ in 0..due.ticks {
            chip8.tick_timers();
        }
        beeper.update(chip8.sound_active());

        // If the frame changed, render it
        if let Some(frame) = chip8.take_frame() {
            display.render(&frame).map_err(anyhow::Error::msg)?;
        }

        // Handle timing
        if !fast_forward {
            std::thread::sleep(clock.until_next(Instant::now()));
        }
    }

    debug!("window closed");
    Ok(())
}
