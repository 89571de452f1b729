//! Boot sequence and scripted input, end to end.

use nes_system::{Button, Cartridge, Mirroring, Nes};

/// Standard NES init: SEI/CLD/TXS, two VBlank waits polling $2002, then an
/// idle loop at $800F.
fn boot_rom() -> Cartridge {
    let mut prg = vec![0u8; 0x8000];
    let code: &[u8] = &[
        0x78, // SEI
        0xD8, // CLD
        0xA2, 0xFF, // LDX #$FF
        0x9A, // TXS
        0xAD, 0x02, 0x20, // vblank1: LDA $2002
        0x10, 0xFB, //          BPL vblank1
        0xAD, 0x02, 0x20, // vblank2: LDA $2002
        0x10, 0xFB, //          BPL vblank2
        0x4C, 0x0F, 0x80, // idle: JMP $800F
    ];
    prg[..code.len()].copy_from_slice(code);
    prg[0x7FFA] = 0x0F; // NMI vector → idle loop
    prg[0x7FFB] = 0x80;
    prg[0x7FFC] = 0x00; // reset vector → $8000
    prg[0x7FFD] = 0x80;
    prg[0x7FFE] = 0x0F; // IRQ vector → idle loop
    prg[0x7FFF] = 0x80;
    Cartridge::new(prg, vec![0; 0x2000], 0, Mirroring::Horizontal).expect("NROM")
}

#[test]
fn boot_reaches_idle_loop_after_two_vblank_waits() {
    let mut nes = Nes::new(boot_rom());
    assert_eq!(nes.pc(), 0x8000, "reset vector");

    // Two VBlank waits need two frames; five frames is plenty of margin.
    // The idle JMP spans $800F-$8011, and the PC may be sampled anywhere
    // inside it.
    let idle = 0x800Fu16..=0x8011;
    for _ in 0..5 {
        nes.run_until_frame();
        assert!(nes.is_running());
        if idle.contains(&nes.pc()) {
            return;
        }
    }
    panic!("did not reach the idle loop, stuck at ${:04X}", nes.pc());
}

#[test]
fn scripted_input_is_applied_at_frame_boundaries() {
    let mut nes = Nes::new(boot_rom());
    nes.input_queue().enqueue_button(Button::Start, 0, 2);

    nes.run_until_frame();

    // Strobe and shift out: A, B, Select, Start
    nes.cpu_bus_write(0x4016, 1);
    nes.cpu_bus_write(0x4016, 0);
    assert_eq!(nes.cpu_bus_read(0x4016), 0);
    assert_eq!(nes.cpu_bus_read(0x4016), 0);
    assert_eq!(nes.cpu_bus_read(0x4016), 0);
    assert_eq!(nes.cpu_bus_read(0x4016), 1, "Start pressed at frame 0");

    // The release fires at frame 2
    nes.run_until_frame();
    nes.run_until_frame();
    nes.cpu_bus_write(0x4016, 1);
    nes.cpu_bus_write(0x4016, 0);
    for _ in 0..4 {
        assert_eq!(nes.cpu_bus_read(0x4016), 0);
    }
}
