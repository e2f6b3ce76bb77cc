use std::io::Write;

use vpager_config::{
    Color, ConfigError, ConfigLoader, HorizontalAnchor, IndicatorKind,
    IndicatorLayout, VerticalAnchor,
};

const TOML_OPTIONS: &str = r##"
cacheSize = 2
pageIndicatorColor = "#30FF6B6B"

[pageIndicator]
type = 1
currentPageIndicatorColor = "#FF6B6B"
activeDotSize = 10
layout = "full"
right = 16
bottom = 100
"##;

fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("temp file");
    file.write_all(contents.as_bytes()).expect("write options");
    file
}

#[test]
fn loads_toml_file() {
    let file = write_temp(".toml", TOML_OPTIONS);
    let load = ConfigLoader::new().load_path(file.path()).unwrap();

    assert!(load.warnings.is_empty(), "{:?}", load.warnings);
    let settings = load.settings;
    assert_eq!(settings.cache_size, 2);
    assert_eq!(settings.style.active_dot_size, 10.0);
    assert_eq!(settings.style.layout, IndicatorLayout::Full);
    assert_eq!(
        settings.style.inactive_color,
        Color::from_argb(0x30, 0xFF, 0x6B, 0x6B)
    );

    let mount = settings.indicator.expect("indicator mounted");
    assert_eq!(mount.kind, IndicatorKind::Vertical);
    assert_eq!(mount.placement.horizontal, HorizontalAnchor::Right(16));
    assert_eq!(mount.placement.vertical, VerticalAnchor::Bottom(100));
}

#[test]
fn loads_json_file_with_partial_warnings() {
    let file = write_temp(
        ".json",
        r##"{
            "cacheSize": 5,
            "pageIndicator": { "type": 3 },
            "currentPageIndicatorColor": "#4ECDC4"
        }"##,
    );
    let load = ConfigLoader::new().load_path(file.path()).unwrap();

    assert_eq!(load.settings.cache_size, 5);
    assert!(load.settings.indicator.is_none());
    assert_eq!(
        load.settings.style.active_color,
        Color::from_rgb(0x4E, 0xCD, 0xC4)
    );
    assert_eq!(load.warnings.len(), 1);
    assert_eq!(load.warnings[0].option, "pageIndicator");
}

#[test]
fn base_settings_survive_a_bad_source() {
    let base = ConfigLoader::new()
        .from_toml_str(TOML_OPTIONS)
        .unwrap()
        .settings;

    let load = ConfigLoader::with_base(base)
        .from_json_str(r#"{ "pageIndicator": 42 }"#)
        .unwrap();

    assert_eq!(load.settings, base);
    assert_eq!(load.warnings.len(), 1);
}

#[test]
fn rejects_unknown_extension_and_missing_file() {
    let file = write_temp(".yaml", "cacheSize: 3");
    assert!(matches!(
        ConfigLoader::new().load_path(file.path()),
        Err(ConfigError::UnsupportedFormat(_))
    ));

    assert!(matches!(
        ConfigLoader::new().load_path("/definitely/not/here.toml"),
        Err(ConfigError::Io { .. })
    ));
}

#[test]
fn rejects_structurally_invalid_documents() {
    assert!(matches!(
        ConfigLoader::new().from_json_str(r#"{ "cacheSize": "lots" }"#),
        Err(ConfigError::Json(_))
    ));
    assert!(matches!(
        ConfigLoader::new().from_toml_str("cacheSize = [1, 2"),
        Err(ConfigError::Toml(_))
    ));
}

#[test]
fn float_cache_size_loads() {
    let load = ConfigLoader::new().from_toml_str("cacheSize = 4.0").unwrap();
    assert!(load.warnings.is_empty());
    assert_eq!(load.settings.cache_size, 4);
}
