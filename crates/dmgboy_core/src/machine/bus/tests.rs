use super::*;
use crate::machine::cartridge::rom_image;

fn dmg_bus() -> MemoryBus {
    let rom = rom_image(0x8000, 0x00, 0x00, 0x00);
    MemoryBus::new(Cartridge::from_rom(&rom).unwrap())
}

#[test]
fn every_address_has_one_owner() {
    let bus = dmg_bus();
    for addr in 0..=u16::MAX {
        assert!(bus.owner(addr).is_ok(), "{addr:#06X}");
    }
}

#[test]
fn unmapped_address_is_fatal() {
    let bus = MemoryBus::with_components(vec![Component::Ram(Ram::new("work-ram", WRAM))]);
    assert_eq!(
        bus.read_byte(0x8000),
        Err(GbError::UnmappedAddress { addr: 0x8000 })
    );
}

#[test]
fn overlapping_components_are_reported_by_name() {
    let mut bus = MemoryBus::with_components(vec![
        Component::Ram(Ram::new("work-ram", WRAM)),
        Component::Ram(Ram::new("shadow", 0xD000..=0xD0FF)),
    ]);
    assert_eq!(bus.read_byte(0xC000), Ok(0));
    assert_eq!(
        bus.write_byte(0xD010, 1),
        Err(GbError::AmbiguousAddress {
            addr: 0xD010,
            owners: vec!["work-ram", "shadow"],
        })
    );
}

#[test]
fn echo_ram_mirrors_work_ram() {
    let mut bus = dmg_bus();
    bus.write_byte(0xC123, 0xAB).unwrap();
    assert_eq!(bus.read_byte(0xE123), Ok(0xAB));
    bus.write_byte(0xFDFF, 0x5C).unwrap();
    assert_eq!(bus.read_byte(0xDDFF), Ok(0x5C));
}

#[test]
fn words_are_little_endian() {
    let mut bus = dmg_bus();
    bus.write_word(0xC000, 0xBEEF).unwrap();
    assert_eq!(bus.read_byte(0xC000), Ok(0xEF));
    assert_eq!(bus.read_byte(0xC001), Ok(0xBE));
    assert_eq!(bus.read_word(0xC000), Ok(0xBEEF));
}

#[test]
fn interrupt_enable_reads_back() {
    let mut bus = dmg_bus();
    bus.write_byte(IE_ADDR, 0x1F).unwrap();
    assert_eq!(bus.read_byte(IE_ADDR), Ok(0x1F));
}

#[test]
fn unusable_region_reads_zero() {
    let mut bus = dmg_bus();
    bus.write_byte(0xFEA0, 0x12).unwrap();
    assert_eq!(bus.read_byte(0xFEA0), Ok(0x00));
}

#[test]
fn rom_write_on_plain_cartridge_is_fatal() {
    let mut bus = dmg_bus();
    assert!(matches!(
        bus.write_byte(0x2000, 1),
        Err(GbError::UnsupportedWrite { .. })
    ));
}

#[test]
fn dma_copies_into_oam() {
    let mut bus = dmg_bus();
    for i in 0..0xA0u16 {
        bus.write_byte(0xC100 + i, i as u8).unwrap();
    }
    bus.write_byte(0xFF46, 0xC1).unwrap();
    assert_eq!(bus.read_byte(0xFE00), Ok(0x00));
    assert_eq!(bus.read_byte(0xFE9F), Ok(0x9F));
}

#[test]
fn read_only_register_write_is_fatal() {
    let mut bus = dmg_bus();
    assert!(matches!(
        bus.write_byte(0xFF44, 0),
        Err(GbError::ReadOnlyRegister { name: "LY", .. })
    ));
}

#[test]
fn device_side_io_writes_are_visible_on_the_bus() {
    let mut bus = dmg_bus();
    bus.io_mut().unwrap().poke(0xFF44, 0x90);
    assert_eq!(bus.read_byte(0xFF44), Ok(0x90));
}

#[test]
fn cartridge_is_reachable_through_the_bus() {
    let bus = dmg_bus();
    let cart = bus.cartridge().unwrap();
    assert_eq!(cart.name(), "rom-only cartridge");
    assert_eq!(cart.switched_rom_bank(), 1);
    assert!(MemoryBus::with_components(Vec::new()).cartridge().is_none());
}
