//! End-to-end setup from files and config.

use std::collections::HashMap;

use babel_i18n::{t, tp, Format, I18n, I18nConfig, I18nError};
use babel_test_utils::{assert_err, assert_ok, localizations_dir, write_file, EN_YAML, IT_JSON};

#[test]
fn translates_from_localization_directory() {
    let dir = localizations_dir();
    let i18n = assert_ok!(I18n::new(&I18nConfig::with_path(["en", "it"], dir.path())));

    let en = i18n.match_locale("en-US").code();
    let it = i18n.match_locale("it-CH").code();

    assert_eq!(t!(i18n, &en, "GEM", "Marco"), "Something went wrong Marco");
    assert_eq!(
        tp!(i18n, &it, "GEM", "Marco"),
        "Alcune cose sono andate storte Marco"
    );
    assert_eq!(tp!(i18n, &it, "ITEMS", 4), "4 elementi");
    assert_eq!(t!(i18n, &en, "ITEMS", 1), "1 item");
}

#[test]
fn accept_language_selects_catalog() {
    let dir = localizations_dir();
    let i18n = assert_ok!(I18n::new(&I18nConfig::with_path(["en", "it"], dir.path())));

    let locale = i18n.match_locale("de-DE, it;q=0.7, en;q=0.3").code();
    assert_eq!(locale, "it");

    let locale = i18n.match_locale("ja, zh;q=0.9").code();
    assert_eq!(locale, "en");
}

#[test]
fn missing_locale_file_fails_setup() {
    let dir = localizations_dir();
    let error = assert_err!(I18n::new(&I18nConfig::with_path(
        ["en", "it", "fr"],
        dir.path()
    )));
    assert!(matches!(error, I18nError::MissingFile { ref locale, .. } if locale == "fr"));
}

#[test]
fn config_file_with_relative_path() {
    let root = babel_test_utils::temp_dir();
    std::fs::create_dir(root.path().join("localizations")).unwrap();
    write_file(&root.path().join("localizations"), "en.yml", EN_YAML);
    write_file(&root.path().join("localizations"), "it.json", IT_JSON);
    let config = write_file(
        root.path(),
        "i18n.yaml",
        "locales: [en, it]\npath: localizations\n",
    );

    let i18n = assert_ok!(I18n::from_config_file(&config));
    assert_eq!(
        i18n.t("it", "GEM", &["Marco".into()]),
        "Qualcosa è andato storto Marco"
    );
}

#[test]
fn config_file_errors_are_wrapped() {
    let root = babel_test_utils::temp_dir();
    let error = assert_err!(I18n::from_config_file(root.path().join("missing.yaml")));
    assert!(matches!(error, I18nError::Config(_)));
}

#[test]
fn byte_blobs_with_explicit_format() {
    let blobs = HashMap::from([("en", EN_YAML)]);
    let i18n = assert_ok!(I18n::from_bytes(&["en"], Format::Yaml, &blobs));
    assert_eq!(i18n.tp("en", "ITEMS", &[2.into()]), "2 items");

    let error = assert_err!(I18n::from_bytes(&["en"], Format::Json, &blobs));
    assert!(matches!(error, I18nError::Decode { format: "json", .. }));
}
