use std::path::Path;

use super::*;

const MINIMAL: &str = r"
keywords: [brake, filter]
stores:
  - domain: RockAuto.com
    kind: online
    priority: 1
  - domain: autozone.com
brands:
  toyota:
    oem_sites: [parts.toyota.com]
    compatible_brands: [lexus]
  ford:
    oem_sites: [parts.ford.com]
    compatible_brands: [lincoln, mercury]
    models: [f-150, mustang]
placeholder_prices:
  default: 19.99
";

#[test]
fn parse_minimal_registry() {
    let registry = parse_registry(MINIMAL).unwrap();
    assert_eq!(registry.keywords().count(), 2);
    assert_eq!(
        registry.store_domains().collect::<Vec<_>>(),
        vec!["rockauto.com", "autozone.com"],
        "store domains are lowercased and keep file order"
    );
    assert_eq!(registry.stores()[0].kind, Some(StoreKind::Online));
    assert_eq!(registry.stores()[1].kind, None);
    assert!(registry.placeholder_categories().is_empty());
    assert!((registry.default_placeholder_price() - 19.99).abs() < f64::EPSILON);
}

#[test]
fn brand_names_iterate_alphabetically() {
    let registry = parse_registry(MINIMAL).unwrap();
    assert_eq!(
        registry.brand_names().collect::<Vec<_>>(),
        vec!["ford", "toyota"]
    );
}

#[test]
fn brand_lookup_ignores_case_and_whitespace() {
    let registry = parse_registry(MINIMAL).unwrap();
    let ford = registry.brand("  Ford ").expect("ford should resolve");
    assert_eq!(ford.compatible_brands, vec!["lincoln", "mercury"]);
    assert_eq!(ford.models, vec!["f-150", "mustang"]);
    assert!(registry.brand("yugo").is_none());
}

#[test]
fn missing_models_default_to_empty() {
    let registry = parse_registry(MINIMAL).unwrap();
    assert!(registry.brand("toyota").unwrap().models.is_empty());
}

#[test]
fn rejects_empty_keywords() {
    let yaml = r"
keywords: []
stores: [{ domain: rockauto.com }]
brands: {}
placeholder_prices: { default: 10.0 }
";
    let err = parse_registry(yaml).unwrap_err();
    assert!(err.to_string().contains("keyword set"), "got: {err}");
}

#[test]
fn rejects_empty_store_list() {
    let yaml = r"
keywords: [brake]
stores: []
brands: {}
placeholder_prices: { default: 10.0 }
";
    let err = parse_registry(yaml).unwrap_err();
    assert!(err.to_string().contains("at least one domain"), "got: {err}");
}

#[test]
fn rejects_duplicate_store_domain() {
    let yaml = r"
keywords: [brake]
stores:
  - domain: rockauto.com
  - domain: ROCKAUTO.com
brands: {}
placeholder_prices: { default: 10.0 }
";
    let err = parse_registry(yaml).unwrap_err();
    assert!(err.to_string().contains("duplicate store domain"), "got: {err}");
}

#[test]
fn rejects_store_with_path() {
    let yaml = r"
keywords: [brake]
stores:
  - domain: rockauto.com/catalog
brands: {}
placeholder_prices: { default: 10.0 }
";
    let err = parse_registry(yaml).unwrap_err();
    assert!(err.to_string().contains("bare hostname"), "got: {err}");
}

#[test]
fn rejects_uppercase_brand_identifier() {
    let yaml = r"
keywords: [brake]
stores: [{ domain: rockauto.com }]
brands:
  Ford:
    oem_sites: [parts.ford.com]
placeholder_prices: { default: 10.0 }
";
    let err = parse_registry(yaml).unwrap_err();
    assert!(err.to_string().contains("trimmed lowercase"), "got: {err}");
}

#[test]
fn rejects_self_compatible_brand() {
    let yaml = r"
keywords: [brake]
stores: [{ domain: rockauto.com }]
brands:
  gmc:
    compatible_brands: [gmc]
placeholder_prices: { default: 10.0 }
";
    let err = parse_registry(yaml).unwrap_err();
    assert!(err.to_string().contains("lists itself"), "got: {err}");
}

#[test]
fn rejects_non_positive_placeholder_price() {
    let yaml = r"
keywords: [brake]
stores: [{ domain: rockauto.com }]
brands: {}
placeholder_prices:
  default: 10.0
  categories:
    - { token: brake, price: 0.0 }
";
    let err = parse_registry(yaml).unwrap_err();
    assert!(err.to_string().contains("'brake'"), "got: {err}");
}

#[test]
fn rejects_malformed_yaml() {
    let err = parse_registry("keywords: [brake").unwrap_err();
    assert!(matches!(err, ConfigError::RegistryFileParse(_)), "got: {err:?}");
}

#[test]
fn load_registry_reports_missing_file() {
    let err = load_registry(Path::new("/definitely/not/here.yaml")).unwrap_err();
    assert!(
        matches!(err, ConfigError::RegistryFileIo { ref path, .. } if path.contains("not/here")),
        "got: {err:?}"
    );
}

#[test]
fn load_registry_from_real_file() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("config")
        .join("registry.yaml");
    assert!(
        path.exists(),
        "registry.yaml missing at {path:?}, required for this test"
    );
    let result = load_registry(&path);
    assert!(result.is_ok(), "failed to load registry.yaml: {result:?}");
    let registry = result.unwrap();
    assert_eq!(registry.brand_names().count(), 10);
    assert_eq!(registry.store_domains().count(), 10);
    assert!(registry.keywords().any(|k| k == "cv-joint"));
}

#[test]
fn bundled_registry_matches_shipped_data() {
    let registry = Registry::bundled().unwrap();
    let ford = registry.brand("ford").unwrap();
    assert_eq!(ford.oem_sites, vec!["parts.ford.com", "tascaparts.com"]);
    assert_eq!(ford.compatible_brands, vec!["lincoln", "mercury"]);
    let volkswagen = registry.brand("volkswagen").unwrap();
    assert_eq!(volkswagen.compatible_brands, vec!["audi"]);
    assert_eq!(registry.brand_names().next(), Some("bmw"));
}

#[test]
fn store_kind_display() {
    assert_eq!(StoreKind::Oem.to_string(), "oem");
    assert_eq!(StoreKind::Specialized.to_string(), "specialized");
}
