use crate::layout::{ConfigError, IdTransform, Options, Parts};

#[test]
fn default_layout_is_forty_bit_low_segment() {
    let layout = Options::new().layout().unwrap();

    assert_eq!(layout.low_bits(), 40);
    assert_eq!(layout.high_bits(), 24);
    assert_eq!(layout.section_bits(), 0);
    assert_eq!(layout.max_high(), 0xFF_FFFF);
    assert_eq!(layout.renew_interval(), 1 << 33);
    assert_eq!(layout.critical_value(), 879_609_302_220);
    assert_eq!(layout.exhaust_value(), 1_055_531_162_664);
    assert_eq!(layout.first_renew_boundary(), 103 << 33);
    assert!(!layout.is_signed());
}

#[test]
fn compose_places_each_field() {
    let layout = Options::new().layout().unwrap();

    assert_eq!(layout.compose(1, 1), 0x0000_0100_0000_0001);
    assert_eq!(layout.compose(1, 1), (1 << 40) | 1);
    assert_eq!(
        layout.decompose(0x0000_0200_0000_0005),
        Parts {
            section: 0,
            high: 2,
            low: 5
        }
    );
}

#[test]
fn section_occupies_top_bits() {
    let layout = Options::new().with_section(4, 15).layout().unwrap();

    assert_eq!(layout.high_bits(), 20);
    let id = layout.compose(0xF_FFFF, 123);
    assert_eq!(id >> 60, 15);
    assert_eq!(layout.section_of(id), 15);
    assert_eq!(layout.high(id), 0xF_FFFF);
    assert_eq!(layout.low(id), 123);
}

#[test]
fn compose_masks_oversized_high() {
    let layout = Options::new().with_section(4, 5).layout().unwrap();

    // the extra bit would spill into the section without masking
    let id = layout.compose(layout.max_high() + 1, 0);
    assert_eq!(layout.section_of(id), 5);
    assert_eq!(layout.high(id), 0);
}

#[test]
fn signed_transform_keeps_top_bit_clear() {
    let layout = Options::new()
        .with_section(8, 0xFF)
        .with_min_high_bits(15)
        .with_transform(IdTransform::Signed63)
        .layout()
        .unwrap();

    assert!(layout.is_signed());
    assert_eq!(layout.high_bits(), 15);

    let id = layout.compose(layout.max_high(), (1 << 40) - 1);
    assert_eq!(id >> 63, 0);
    assert!(i64::try_from(id).is_ok());
    assert_eq!(layout.section_of(id), 0xFF);
}

#[test]
fn rejects_wide_section() {
    let err = Options::new().with_section(9, 0).layout().unwrap_err();
    assert_eq!(err, ConfigError::SectionBits { bits: 9, max: 8 });
}

#[test]
fn rejects_section_value_outside_width() {
    let err = Options::new().with_section(4, 16).layout().unwrap_err();
    assert_eq!(
        err,
        ConfigError::SectionOutOfRange {
            section: 16,
            bits: 4
        }
    );

    let err = Options::new().with_section(0, 1).layout().unwrap_err();
    assert_eq!(err, ConfigError::SectionOutOfRange { section: 1, bits: 0 });
}

#[test]
fn rejects_out_of_range_low_width() {
    assert_eq!(
        Options::new().with_low_bits(0).layout().unwrap_err(),
        ConfigError::LowBits { bits: 0 }
    );
    assert_eq!(
        Options::new().with_low_bits(64).layout().unwrap_err(),
        ConfigError::LowBits { bits: 64 }
    );
}

#[test]
fn rejects_overcommitted_layout() {
    let err = Options::new()
        .with_section(8, 0)
        .with_transform(IdTransform::Signed63)
        .layout()
        .unwrap_err();

    assert_eq!(
        err,
        ConfigError::Overcommitted {
            section_bits: 8,
            high_bits: 16,
            low_bits: 40,
            usable_bits: 63,
        }
    );
}

#[test]
fn rejects_renew_interval_that_is_not_a_power_of_two() {
    let err = Options::new().with_renew_interval(3).layout().unwrap_err();
    assert_eq!(err, ConfigError::RenewInterval { interval: 3 });

    let err = Options::new()
        .with_low_bits(8)
        .with_renew_interval(512)
        .layout()
        .unwrap_err();
    assert_eq!(err, ConfigError::RenewInterval { interval: 512 });
}

#[test]
fn rejects_thresholds_without_headroom() {
    let err = Options::new()
        .with_low_bits(8)
        .with_critical_value(250)
        .with_exhaust_value(200)
        .layout()
        .unwrap_err();
    assert_eq!(
        err,
        ConfigError::Thresholds {
            critical: 250,
            exhaust: 200
        }
    );

    // exhaust must be reachable before the low segment wraps
    assert!(matches!(
        Options::new()
            .with_low_bits(8)
            .with_exhaust_value(256)
            .layout(),
        Err(ConfigError::Thresholds { .. })
    ));

    // the only boundary after 201 with an interval of 64 is 256
    assert!(matches!(
        Options::new()
            .with_low_bits(8)
            .with_renew_interval(64)
            .with_critical_value(201)
            .with_exhaust_value(250)
            .layout(),
        Err(ConfigError::Thresholds { .. })
    ));
}

#[test]
fn renew_boundary_fires_on_interval_past_critical() {
    let layout = Options::new().with_low_bits(8).layout().unwrap();

    assert_eq!(layout.renew_interval(), 2);
    assert_eq!(layout.critical_value(), 204);
    assert_eq!(layout.exhaust_value(), 245);
    assert_eq!(layout.first_renew_boundary(), 204);

    assert!(!layout.is_renew_boundary(0));
    assert!(!layout.is_renew_boundary(202));
    assert!(layout.is_renew_boundary(204));
    assert!(!layout.is_renew_boundary(205));
    assert!(layout.is_renew_boundary(206));
}

#[test]
fn first_boundary_rounds_critical_up() {
    let layout = Options::new()
        .with_low_bits(12)
        .with_renew_interval(256)
        .with_critical_value(1000)
        .layout()
        .unwrap();

    assert_eq!(layout.first_renew_boundary(), 1024);
    assert!(!layout.is_renew_boundary(1000));
    assert!(layout.is_renew_boundary(1024));
    assert!(layout.is_renew_boundary(1280));
}
